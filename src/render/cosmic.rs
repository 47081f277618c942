use super::{Color, FrameInput, Renderer, Scene, Viewport};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::PI;
use std::time::Duration;

pub const DURATION: Duration = Duration::from_millis(5000);
/// Pause on the last frame before the map reports completion.
pub const COMPLETION_DELAY: Duration = Duration::from_millis(200);
pub const BACKGROUND: Color = Color::rgba(10, 5, 20, 0.3);

const STAR_COUNT: usize = 200;
const LOGO_SIZE: f32 = 80.0;
const PULSE_PERIOD_MS: u128 = 2000;

/// Named constellation template: relative center, radius in px, point count.
pub struct ConstellationLayout {
    pub name: &'static str,
    pub center: (f32, f32),
    pub radius: f32,
    pub points: usize,
}

pub const CONSTELLATIONS: [ConstellationLayout; 5] = [
    ConstellationLayout { name: "AIクラスター", center: (0.3, 0.3), radius: 100.0, points: 6 },
    ConstellationLayout { name: "宇宙開発領域", center: (0.7, 0.3), radius: 120.0, points: 7 },
    ConstellationLayout { name: "バイオテック", center: (0.5, 0.7), radius: 110.0, points: 5 },
    ConstellationLayout { name: "フィンテック", center: (0.2, 0.6), radius: 90.0, points: 6 },
    ConstellationLayout { name: "持続可能エネルギー", center: (0.8, 0.6), radius: 100.0, points: 8 },
];

/// Business idea node: label, relative position, indices of linked nodes.
pub struct IdeaNodeLayout {
    pub idea: &'static str,
    pub at: (f32, f32),
    pub links: &'static [usize],
}

pub const IDEA_NODES: [IdeaNodeLayout; 5] = [
    IdeaNodeLayout { idea: "AI医療診断", at: (0.4, 0.3), links: &[0, 2] },
    IdeaNodeLayout { idea: "宇宙観光プラットフォーム", at: (0.6, 0.4), links: &[1, 4] },
    IdeaNodeLayout { idea: "合成生物学", at: (0.3, 0.5), links: &[2, 3] },
    IdeaNodeLayout { idea: "カーボンオフセット取引", at: (0.5, 0.6), links: &[3, 4] },
    IdeaNodeLayout { idea: "量子コンピューティング", at: (0.7, 0.5), links: &[0, 1] },
];

#[derive(Clone, Debug)]
struct Star {
    x: f32,
    y: f32,
    z: f32,
    size: f32,
    alpha: f32,
}

#[derive(Clone, Debug)]
struct Constellation {
    name: &'static str,
    center: (f32, f32),
    points: Vec<(f32, f32)>,
    color: Color,
}

#[derive(Clone, Debug)]
struct Node {
    idea: &'static str,
    x: f32,
    y: f32,
    size: f32,
    links: &'static [usize],
}

fn ramp(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}

/// Camera zoom at `progress`: in for the first 70%, then back out.
pub fn camera_zoom(progress: f32) -> f32 {
    if progress < 0.7 {
        1.0 + progress * 0.5
    } else {
        1.35 - (progress - 0.7) * 1.2
    }
}

/// The five second star map played after the logo is clicked.
pub struct CosmicMap {
    seed: u64,
    viewport: Viewport,
    stars: Vec<Star>,
    constellations: Vec<Constellation>,
    nodes: Vec<Node>,
}

impl CosmicMap {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            viewport: Viewport::new(1280.0, 720.0),
            stars: Vec::new(),
            constellations: Vec::new(),
            nodes: Vec::new(),
        }
    }

    pub fn progress(elapsed: Duration) -> f32 {
        (elapsed.as_secs_f32() / DURATION.as_secs_f32()).min(1.0)
    }

    fn generate(&mut self) {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let Viewport { width, height } = self.viewport;

        self.stars = (0..STAR_COUNT)
            .map(|_| Star {
                x: rng.gen_range(0.0..width.max(1.0)),
                y: rng.gen_range(0.0..height.max(1.0)),
                z: rng.gen_range(0.1..3.1),
                size: rng.gen_range(0.5..2.5),
                alpha: rng.gen_range(0.1..0.6),
            })
            .collect();

        self.constellations = CONSTELLATIONS
            .iter()
            .map(|layout| {
                let center = (width * layout.center.0, height * layout.center.1);
                let points = (0..layout.points)
                    .map(|_| {
                        let angle = rng.gen_range(0.0..2.0 * PI);
                        let distance = rng.gen_range(0.2..1.0) * layout.radius;
                        (
                            center.0 + angle.cos() * distance,
                            center.1 + angle.sin() * distance,
                        )
                    })
                    .collect();
                let color = Color::hsl(
                    rng.gen_range(40.0..60.0),
                    rng.gen_range(80.0..100.0),
                    rng.gen_range(50.0..70.0),
                );
                Constellation {
                    name: layout.name,
                    center,
                    points,
                    color,
                }
            })
            .collect();

        self.nodes = IDEA_NODES
            .iter()
            .map(|layout| Node {
                idea: layout.idea,
                x: width * layout.at.0,
                y: height * layout.at.1,
                size: rng.gen_range(6.0..10.0),
                links: layout.links,
            })
            .collect();
    }

    fn draw_stars(&self, scene: &mut Scene, progress: f32) {
        let (cx, cy) = self.viewport.center();
        let visible = (progress * 2.0).min(1.0);
        for star in &self.stars {
            let perspective = 1.0 + star.z * progress * 2.0;
            let x = star.x + (star.x - cx) * progress * 0.1 * star.z;
            let y = star.y + (star.y - cy) * progress * 0.1 * star.z;
            let size = star.size * perspective * visible;
            let alpha = star.alpha * visible;
            scene.circle(x, y, size, Color::WHITE.with_alpha(alpha));

            if size > 1.5 && progress > 0.2 {
                let ray = Color::WHITE.with_alpha(alpha * 0.5);
                scene.line((x - size * 2.0, y), (x + size * 2.0, y), 0.5, ray);
                scene.line((x, y - size * 2.0), (x, y + size * 2.0), 0.5, ray);
            }
        }
    }

    fn draw_constellations(&self, scene: &mut Scene, progress: f32) {
        for (index, constellation) in self.constellations.iter().enumerate() {
            let shown = ramp((progress - index as f32 * 0.1) * 3.0);
            if shown <= 0.0 {
                continue;
            }

            let point_progress = (shown * 2.0).min(1.0);
            for (i, &(x, y)) in constellation.points.iter().enumerate() {
                scene.circle(
                    x,
                    y,
                    2.0 + point_progress * 3.0,
                    constellation.color.with_alpha(point_progress * 0.8),
                );

                if shown > 0.3 {
                    if let Some(&(nx, ny)) = constellation.points.get(i + 1) {
                        let drawn = ((shown - 0.3) * 2.0).min(1.0);
                        scene.line(
                            (x, y),
                            (x + (nx - x) * drawn, y + (ny - y) * drawn),
                            drawn,
                            constellation.color.with_alpha(drawn * 0.6),
                        );
                    }
                }
            }

            if progress > 0.5 {
                let opacity = ((progress - 0.5) * 4.0).min(1.0);
                let (x, y) = constellation.center;
                scene.text(x, y, 14.0, Color::GOLD.with_alpha(opacity * 0.8), constellation.name);
            }
        }
    }

    fn draw_nodes(&self, scene: &mut Scene, progress: f32, elapsed: Duration) {
        if progress <= 0.4 {
            return;
        }
        let pulse = (elapsed.as_millis() % PULSE_PERIOD_MS) as f32 / PULSE_PERIOD_MS as f32;

        for (index, node) in self.nodes.iter().enumerate() {
            let shown = ramp((progress - 0.4 - index as f32 * 0.05) * 3.0);
            if shown <= 0.0 {
                continue;
            }

            scene.circle(node.x, node.y, node.size * 2.0, Color::GOLD.with_alpha(shown * 0.4));
            scene.circle(node.x, node.y, node.size * 0.7, Color::WHITE.with_alpha(shown * 0.9));

            if progress > 0.6 {
                let opacity = ((progress - 0.6) * 5.0).min(1.0);
                scene.styled_text(
                    node.x,
                    node.y - node.size * 2.0 - 8.0,
                    12.0,
                    true,
                    4.0,
                    Color::WHITE.with_alpha(opacity * 0.9),
                    node.idea,
                );
            }

            if progress > 0.65 {
                let opacity = ((progress - 0.65) * 4.0).min(1.0);
                for &target in node.links {
                    if target == index {
                        continue;
                    }
                    let Some(target) = self.nodes.get(target) else {
                        continue;
                    };
                    scene.line(
                        (node.x, node.y),
                        (target.x, target.y),
                        1.5 * opacity,
                        Color::GOLD.with_alpha(opacity * 0.5),
                    );
                    scene.circle(
                        node.x + (target.x - node.x) * pulse,
                        node.y + (target.y - node.y) * pulse,
                        2.0 * opacity,
                        Color::WHITE.with_alpha(opacity * 0.8),
                    );
                }
            }
        }
    }

    fn draw_logo(&self, scene: &mut Scene, progress: f32) {
        if progress <= 0.85 {
            return;
        }
        let opacity = ((progress - 0.85) * 6.0).min(1.0);
        let (cx, cy) = self.viewport.center();
        scene.circle(cx, cy, LOGO_SIZE * 2.0, Color::GOLD.with_alpha(opacity * 0.2));
        scene.styled_text(
            cx,
            cy,
            LOGO_SIZE,
            true,
            15.0,
            Color::GOLD.with_alpha(opacity),
            "GOLD RUSH",
        );
        scene.text(
            cx,
            cy + LOGO_SIZE / 2.0 + 10.0,
            LOGO_SIZE / 4.0,
            Color::WHITE.with_alpha(opacity * 0.9),
            "FUTURE VENTURES",
        );
    }
}

impl Renderer for CosmicMap {
    fn init(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.generate();
    }

    fn frame(&mut self, input: &FrameInput) -> Scene {
        let progress = Self::progress(input.elapsed);
        let mut scene = Scene::new(self.viewport);
        scene.zoom = camera_zoom(progress);

        self.draw_stars(&mut scene, progress);
        self.draw_constellations(&mut scene, progress);
        self.draw_nodes(&mut scene, progress, input.elapsed);
        self.draw_logo(&mut scene, progress);
        scene
    }

    fn dispose(&mut self) {
        self.stars.clear();
        self.constellations.clear();
        self.nodes.clear();
    }

    fn is_finished(&self, input: &FrameInput) -> bool {
        input.elapsed >= DURATION + COMPLETION_DELAY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map() -> CosmicMap {
        let mut map = CosmicMap::new(5);
        map.init(Viewport::new(1280.0, 720.0));
        map
    }

    fn at(ms: u64) -> FrameInput {
        FrameInput::at(Duration::from_millis(ms))
    }

    #[test]
    fn zoom_peaks_at_seventy_percent() {
        assert_eq!(camera_zoom(0.0), 1.0);
        assert!((camera_zoom(0.69) - 1.345).abs() < 1e-4);
        assert!((camera_zoom(1.0) - 0.99).abs() < 1e-4);
    }

    #[test]
    fn finishes_two_hundred_ms_after_the_end() {
        let map = map();
        assert!(!map.is_finished(&at(5000)));
        assert!(!map.is_finished(&at(5199)));
        assert!(map.is_finished(&at(5200)));
    }

    #[test]
    fn first_frame_is_empty() {
        let mut map = map();
        assert!(map.frame(&at(0)).shapes.is_empty());
    }

    #[test]
    fn labels_appear_in_order() {
        let mut map = map();
        let early: Vec<String> = map.frame(&at(2000)).texts().map(String::from).collect();
        assert!(early.is_empty());

        let middle: Vec<String> = map.frame(&at(3200)).texts().map(String::from).collect();
        assert!(middle.iter().any(|t| t == "AIクラスター"));
        assert!(middle.iter().any(|t| t == "AI医療診断"));
        assert!(!middle.iter().any(|t| t == "GOLD RUSH"));

        let end: Vec<String> = map.frame(&at(5000)).texts().map(String::from).collect();
        assert!(end.iter().any(|t| t == "GOLD RUSH"));
        assert!(end.iter().any(|t| t == "FUTURE VENTURES"));
    }

    #[test]
    fn self_links_are_skipped() {
        let mut map = map();
        let scene = map.frame(&at(5000));
        let node = &map.nodes[0];
        let degenerate = scene.shapes.iter().any(|shape| {
            matches!(shape, super::super::Shape::Line { from, to, .. }
                if *from == (node.x, node.y) && *to == (node.x, node.y))
        });
        assert!(!degenerate);
    }

    #[test]
    fn layout_scales_with_viewport() {
        let mut map = map();
        map.init(Viewport::new(2000.0, 1000.0));
        assert_eq!((map.nodes[0].x, map.nodes[0].y), (800.0, 300.0));
        assert_eq!(map.constellations[2].center, (1000.0, 700.0));
    }
}
