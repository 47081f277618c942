use super::{Color, FrameInput, Renderer, Scene, Viewport, estimate_text_width};
use crate::content::BUSINESS_IDEAS;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::time::Duration;

pub const SPAWN_INTERVAL: Duration = Duration::from_millis(320);
pub const MAX_LIVE: usize = 20;
const MIN_GAP: f32 = 40.0;
const EDGE_MARGIN: f32 = 10.0;
const MAX_ATTEMPTS: u32 = 100;
/// Fraction of a label's life spent fading in, and again fading out.
const FADE_SHARE: f32 = 0.2;

#[derive(Clone, Debug, PartialEq)]
struct Idea {
    text: &'static str,
    x: f32,
    y: f32,
    size: f32,
    width: f32,
    color: Color,
    glow: f32,
    born: Duration,
    lifetime: Duration,
}

impl Idea {
    fn height(&self) -> f32 {
        self.size * 1.5
    }

    fn progress(&self, now: Duration) -> f32 {
        now.saturating_sub(self.born).as_secs_f32() / self.lifetime.as_secs_f32()
    }
}

/// Opacity of a label at `progress` through its life: fade in over the first
/// fifth, hold, fade out over the last fifth.
pub fn idea_opacity(progress: f32) -> f32 {
    if progress < FADE_SHARE {
        (progress / FADE_SHARE).max(0.0)
    } else if progress > 1.0 - FADE_SHARE {
        ((1.0 - progress) / FADE_SHARE).max(0.0)
    } else {
        1.0
    }
}

/// Business idea labels drifting in and out around the startup logo.
pub struct IdeaField {
    rng: StdRng,
    viewport: Viewport,
    ideas: Vec<Idea>,
    next_spawn: Duration,
}

impl IdeaField {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            viewport: Viewport::new(1280.0, 720.0),
            ideas: Vec::new(),
            next_spawn: SPAWN_INTERVAL,
        }
    }

    pub fn live(&self) -> usize {
        self.ideas.len()
    }

    /// The centered area kept clear for the logo, as `(x, y, width, height)`.
    pub fn safe_area(&self) -> (f32, f32, f32, f32) {
        let width = (self.viewport.width * 0.25).max(300.0);
        let height = (self.viewport.height * 0.3).max(300.0);
        let (cx, cy) = self.viewport.center();
        (cx - width / 2.0, cy - height / 2.0, width, height)
    }

    fn in_safe_area(&self, x: f32, y: f32) -> bool {
        let (left, top, width, height) = self.safe_area();
        x >= left && x <= left + width && y >= top && y <= top + height
    }

    fn overlaps(&self, x: f32, y: f32, width: f32, height: f32) -> bool {
        self.ideas.iter().any(|other| {
            (x - other.x).abs() < width / 2.0 + other.width / 2.0 + MIN_GAP
                && (y - other.y).abs() < height / 2.0 + other.height() / 2.0 + MIN_GAP
        })
    }

    fn off_screen(&self, x: f32, y: f32, width: f32, height: f32) -> bool {
        x - width / 2.0 < EDGE_MARGIN
            || x + width / 2.0 > self.viewport.width - EDGE_MARGIN
            || y - height / 2.0 < EDGE_MARGIN
            || y + height / 2.0 > self.viewport.height - EDGE_MARGIN
    }

    fn spawn(&mut self, now: Duration) {
        let text = BUSINESS_IDEAS.choose(&mut self.rng).copied().unwrap_or_default();
        let mut size = self.rng.gen_range(14.0..30.0);
        let mut attempts = 0;
        let (x, y) = loop {
            let x = self.rng.gen_range(0.0..self.viewport.width.max(1.0));
            let y = self.rng.gen_range(0.0..self.viewport.height.max(1.0));
            attempts += 1;
            // Smaller labels fit into more gaps
            if attempts > MAX_ATTEMPTS / 2 && size > 16.0 {
                size = self.rng.gen_range(14.0..20.0);
            }
            let width = estimate_text_width(text, size);
            let height = size * 1.5;
            if attempts >= MAX_ATTEMPTS
                || !(self.in_safe_area(x, y)
                    || self.overlaps(x, y, width, height)
                    || self.off_screen(x, y, width, height))
            {
                break (x, y);
            }
        };

        let color = Color::hsl(
            self.rng.gen_range(45.0..55.0),
            self.rng.gen_range(80.0..100.0),
            self.rng.gen_range(50.0..80.0),
        );
        let idea = Idea {
            text,
            x,
            y,
            size,
            width: estimate_text_width(text, size),
            color,
            glow: self.rng.gen_range(0.0..10.0),
            born: now,
            lifetime: Duration::from_millis(self.rng.gen_range(2500..7000)),
        };
        self.ideas.push(idea);
    }
}

impl Renderer for IdeaField {
    fn init(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn frame(&mut self, input: &FrameInput) -> Scene {
        let now = input.elapsed;
        while self.next_spawn <= now {
            if self.ideas.len() < MAX_LIVE {
                self.spawn(self.next_spawn);
            }
            self.next_spawn += SPAWN_INTERVAL;
        }
        self.ideas.retain(|idea| idea.progress(now) < 1.0);

        let mut scene = Scene::new(self.viewport);
        for idea in &self.ideas {
            let opacity = idea_opacity(idea.progress(now));
            scene.styled_text(
                idea.x,
                idea.y,
                idea.size,
                false,
                idea.glow,
                idea.color.with_alpha(opacity),
                idea.text,
            );
        }
        scene
    }

    fn dispose(&mut self) {
        self.ideas.clear();
        self.next_spawn = SPAWN_INTERVAL;
    }
}
