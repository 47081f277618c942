use super::{Color, FrameInput, Renderer, Scene, Viewport};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::PI;

const DOT_COUNT: usize = 1500;
const RADIUS_RATIO: f32 = 0.45;
/// Seconds added per frame for the twinkle phase (about 60fps).
const FRAME_TIME: f32 = 0.016;

const STAR_COLORS: [Color; 6] = [
    Color::rgba(255, 215, 0, 0.9),
    Color::rgba(255, 223, 0, 0.8),
    Color::rgba(255, 200, 0, 0.8),
    Color::rgba(255, 185, 15, 0.7),
    Color::rgba(238, 180, 34, 0.7),
    Color::rgba(255, 235, 100, 0.7),
];

#[derive(Clone, Debug)]
struct Dot {
    /// Position on the unit sphere.
    x: f32,
    y: f32,
    z: f32,
    size: f32,
    color: Color,
    brightness: f32,
    twinkle: f32,
    twinkle_offset: f32,
}

/// A rotating sphere of gold stars behind the "GOLD RUSH" title.
pub struct StarrySphere {
    seed: u64,
    viewport: Viewport,
    dots: Vec<Dot>,
    angle: f32,
    time: f32,
}

impl StarrySphere {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            viewport: Viewport::new(350.0, 350.0),
            dots: Vec::new(),
            angle: 0.0,
            time: 0.0,
        }
    }

    pub fn dot_count(&self) -> usize {
        self.dots.len()
    }

    fn generate(&mut self) {
        let mut rng = StdRng::seed_from_u64(self.seed);
        self.dots = (0..DOT_COUNT)
            .map(|_| {
                // Uniform on the sphere surface
                let theta = 2.0 * PI * rng.gen_range(0.0..1.0f32);
                let phi = (2.0 * rng.gen_range(0.0..1.0f32) - 1.0).acos();
                let random_size: f32 = rng.gen_range(0.0..1.0);
                Dot {
                    x: phi.sin() * theta.cos(),
                    y: phi.sin() * theta.sin(),
                    z: phi.cos(),
                    size: random_size * 2.5 + 0.3,
                    color: STAR_COLORS[rng.gen_range(0..STAR_COLORS.len())],
                    brightness: random_size * 0.7 + 0.3,
                    twinkle: rng.gen_range(0.04..0.12),
                    twinkle_offset: rng.gen_range(0.0..2.0 * PI),
                }
            })
            .collect();
    }
}

impl Renderer for StarrySphere {
    fn init(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        if self.dots.is_empty() {
            self.generate();
        }
    }

    fn frame(&mut self, input: &FrameInput) -> Scene {
        let mut scene = Scene::new(self.viewport);
        let audio = input.audio;
        let (cx, cy) = self.viewport.center();
        let (cx, cy) = (cx.floor(), cy.floor());
        let radius = self.viewport.min_side() * RADIUS_RATIO;
        let level = audio.effective_level();

        // Title
        let font_size = self.viewport.min_side()
            * 0.08
            * if audio.active {
                audio.audio_factor() * 0.8
            } else {
                1.0
            };
        let text_alpha = 0.7 + level * 0.3;
        scene.styled_text(
            cx,
            cy,
            font_size,
            true,
            font_size * (0.3 + level * 0.5),
            Color::GOLD.with_alpha(text_alpha),
            "GOLD RUSH",
        );

        self.angle += audio.rotation_speed();
        self.time += FRAME_TIME;
        let (sin, cos) = self.angle.sin_cos();
        let clip = radius * audio.sphere_scale();

        for dot in &self.dots {
            let (x, y, z) = (dot.x * radius, dot.y * radius, dot.z * radius);
            let rotated_x = x * cos - z * sin;
            let rotated_z = x * sin + z * cos;

            let depth = (rotated_z + radius) / (radius * 2.0);
            let twinkle = (self.time * dot.twinkle + dot.twinkle_offset).sin() * 0.3 + 0.7;
            let size = dot.size * (0.5 + depth) * twinkle;
            let alpha = (0.1 + depth * dot.brightness) * twinkle;

            let px = (cx + rotated_x).round();
            let py = (cy + y).round();
            if ((px - cx).powi(2) + (py - cy).powi(2)).sqrt() > clip {
                continue;
            }

            scene.circle(px, py, size, dot.color.with_alpha(alpha));

            if dot.size > 1.5 {
                scene.circle(px, py, size * 1.8, dot.color.with_alpha(alpha * 0.25));

                if dot.size > 2.0 {
                    let reach = size * 3.0;
                    let ray = Color::GOLD.with_alpha(alpha * 0.3);
                    scene.line((px - reach, py), (px + reach, py), size * 0.5, ray);
                    scene.line((px, py - reach), (px, py + reach), size * 0.5, ray);
                }
            }
        }

        // Faint rim
        scene.circle(cx, cy, radius, Color::GOLD.with_alpha(0.04));
        scene
    }

    fn dispose(&mut self) {
        self.angle = 0.0;
        self.time = 0.0;
    }
}
