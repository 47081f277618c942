//! Procedural animations as plain draw lists.
//!
//! A [`Renderer`] is initialised with a viewport and asked for one [`Scene`]
//! per frame. Scenes are framework-free (circles, lines, text) so the UI can
//! paint them however it likes and tests can inspect them directly. Every
//! renderer takes a seed; the same seed and inputs give the same frames.

mod cosmic;
mod ideas;
mod sphere;

pub use cosmic::{BACKGROUND as COSMIC_BACKGROUND, CONSTELLATIONS, CosmicMap, IDEA_NODES, camera_zoom};
pub use ideas::{IdeaField, idea_opacity};
pub use sphere::StarrySphere;

use crate::audio::AudioReactivity;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.width / 2.0, self.height / 2.0)
    }

    pub fn min_side(&self) -> f32 {
        self.width.min(self.height)
    }
}

/// Per-frame inputs. `elapsed` is measured from `init`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameInput {
    pub elapsed: Duration,
    pub audio: AudioReactivity,
}

impl FrameInput {
    pub fn at(elapsed: Duration) -> Self {
        Self {
            elapsed,
            audio: AudioReactivity::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const GOLD: Color = Color::rgba(255, 215, 0, 1.0);
    pub const WHITE: Color = Color::rgba(255, 255, 255, 1.0);

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// `h` in degrees, `s` and `l` in percent.
    pub fn hsl(h: f32, s: f32, l: f32) -> Self {
        let s = (s / 100.0).clamp(0.0, 1.0);
        let l = (l / 100.0).clamp(0.0, 1.0);
        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let h = h.rem_euclid(360.0) / 60.0;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = l - c / 2.0;
        let channel = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Self::rgba(channel(r), channel(g), channel(b), 1.0)
    }

    pub fn css(&self) -> String {
        format!("rgba({}, {}, {}, {:.3})", self.r, self.g, self.b, self.a)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Circle {
        x: f32,
        y: f32,
        radius: f32,
        fill: Color,
    },
    Line {
        from: (f32, f32),
        to: (f32, f32),
        width: f32,
        stroke: Color,
    },
    /// Centered on `(x, y)`.
    Text {
        x: f32,
        y: f32,
        size: f32,
        bold: bool,
        fill: Color,
        glow: f32,
        content: String,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    pub viewport: Viewport,
    /// Camera scale about the viewport center.
    pub zoom: f32,
    pub shapes: Vec<Shape>,
}

impl Scene {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            zoom: 1.0,
            shapes: Vec::new(),
        }
    }

    pub fn circle(&mut self, x: f32, y: f32, radius: f32, fill: Color) {
        if radius > 0.0 && fill.a > 0.0 {
            self.shapes.push(Shape::Circle { x, y, radius, fill });
        }
    }

    pub fn line(&mut self, from: (f32, f32), to: (f32, f32), width: f32, stroke: Color) {
        if width > 0.0 && stroke.a > 0.0 {
            self.shapes.push(Shape::Line {
                from,
                to,
                width,
                stroke,
            });
        }
    }

    pub fn text(&mut self, x: f32, y: f32, size: f32, fill: Color, content: impl Into<String>) {
        self.styled_text(x, y, size, false, 0.0, fill, content);
    }

    #[allow(clippy::too_many_arguments)]
    pub fn styled_text(
        &mut self,
        x: f32,
        y: f32,
        size: f32,
        bold: bool,
        glow: f32,
        fill: Color,
        content: impl Into<String>,
    ) {
        if fill.a > 0.0 {
            self.shapes.push(Shape::Text {
                x,
                y,
                size,
                bold,
                fill,
                glow,
                content: content.into(),
            });
        }
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.shapes.iter().filter_map(|shape| match shape {
            Shape::Text { content, .. } => Some(content.as_str()),
            _ => None,
        })
    }
}

pub trait Renderer {
    /// Called once before the first frame and again on every resize.
    fn init(&mut self, viewport: Viewport);

    fn frame(&mut self, input: &FrameInput) -> Scene;

    /// Release per-run state. The renderer may be `init`ed again afterwards.
    fn dispose(&mut self) {}

    /// Renderers with a fixed length report when they are done.
    fn is_finished(&self, _input: &FrameInput) -> bool {
        false
    }
}

/// Rough rendered width of a single line of text. Wide (CJK) characters count
/// as a full em, everything else as a bit over half.
pub fn estimate_text_width(text: &str, size: f32) -> f32 {
    text.chars()
        .map(|c| if c.is_ascii() { 0.55 } else { 1.0 })
        .sum::<f32>()
        * size
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hsl_matches_known_colors() {
        assert_eq!(Color::hsl(0.0, 100.0, 50.0), Color::rgba(255, 0, 0, 1.0));
        assert_eq!(Color::hsl(120.0, 100.0, 50.0), Color::rgba(0, 255, 0, 1.0));
        assert_eq!(Color::hsl(0.0, 0.0, 100.0), Color::WHITE);
    }

    #[test]
    fn invisible_shapes_are_dropped() {
        let mut scene = Scene::new(Viewport::new(100.0, 100.0));
        scene.circle(1.0, 1.0, 0.0, Color::GOLD);
        scene.circle(1.0, 1.0, 2.0, Color::GOLD.with_alpha(0.0));
        scene.line((0.0, 0.0), (1.0, 1.0), 0.0, Color::GOLD);
        assert!(scene.shapes.is_empty());
    }

    #[test]
    fn wide_characters_measure_wider() {
        assert!(estimate_text_width("宇宙", 10.0) > estimate_text_width("ab", 10.0));
        assert_eq!(estimate_text_width("", 10.0), 0.0);
    }

    #[test]
    fn css_formats_alpha() {
        assert_eq!(Color::GOLD.with_alpha(0.5).css(), "rgba(255, 215, 0, 0.500)");
    }
}
