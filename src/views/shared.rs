use crate::audio::AudioReactivity;
use crate::render::{FrameInput, Renderer, Scene, Shape, Viewport};
use comrak::{ComrakOptions, markdown_to_html as render_markdown};
use dioxus::prelude::*;
use once_cell::sync::Lazy;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Logical size every animation is laid out in; the SVG scales it to fit.
pub const STAGE: Viewport = Viewport {
    width: 1280.0,
    height: 720.0,
};
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

static MARKDOWN_OPTIONS: Lazy<ComrakOptions> = Lazy::new(|| {
    let mut options = ComrakOptions::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.tasklist = true;
    options.extension.autolink = true;
    options
});

/// Assistant replies are markdown. Raw HTML blocks are dropped from the
/// output, leaving comrak's `raw HTML omitted` comment in their place.
pub fn markdown_to_html(md: &str) -> String {
    render_markdown(md, &MARKDOWN_OPTIONS)
}

/// Drive a renderer at roughly 60fps. Returns the latest scene and whether
/// the renderer has reported it is done.
pub fn use_scene<R: Renderer + 'static>(
    make: impl FnOnce() -> R,
    audio: Signal<AudioReactivity>,
) -> (Signal<Scene>, Signal<bool>) {
    let mut scene = use_signal(|| Scene::new(STAGE));
    let mut finished = use_signal(|| false);
    let renderer = use_hook(|| {
        let mut renderer = make();
        renderer.init(STAGE);
        Rc::new(RefCell::new(renderer))
    });

    let driver = renderer.clone();
    use_future(move || {
        let renderer = driver.clone();
        async move {
            let started = Instant::now();
            loop {
                let input = FrameInput {
                    elapsed: started.elapsed(),
                    audio: *audio.peek(),
                };
                let done = {
                    let mut renderer = renderer.borrow_mut();
                    scene.set(renderer.frame(&input));
                    renderer.is_finished(&input)
                };
                if done {
                    finished.set(true);
                    break;
                }
                tokio::time::sleep(FRAME_INTERVAL).await;
            }
        }
    });

    use_drop(move || renderer.borrow_mut().dispose());

    (scene, finished)
}

fn shape_node(shape: &Shape) -> Element {
    match shape {
        Shape::Circle { x, y, radius, fill } => rsx! {
            circle { cx: "{x}", cy: "{y}", r: "{radius}", fill: "{fill.css()}" }
        },
        Shape::Line {
            from,
            to,
            width,
            stroke,
        } => rsx! {
            line {
                x1: "{from.0}",
                y1: "{from.1}",
                x2: "{to.0}",
                y2: "{to.1}",
                stroke: "{stroke.css()}",
                stroke_width: "{width}",
            }
        },
        Shape::Text {
            x,
            y,
            size,
            bold,
            fill,
            glow,
            content,
        } => {
            let weight = if *bold { "700" } else { "400" };
            let style = if *glow > 0.0 {
                format!("filter: drop-shadow(0 0 {glow}px rgba(255, 215, 0, 0.8));")
            } else {
                String::new()
            };
            rsx! {
                text {
                    x: "{x}",
                    y: "{y}",
                    font_size: "{size}",
                    font_weight: weight,
                    fill: "{fill.css()}",
                    text_anchor: "middle",
                    dominant_baseline: "middle",
                    style: "{style}",
                    "{content}"
                }
            }
        }
    }
}

#[component]
pub fn SceneView(scene: Signal<Scene>, class: &'static str) -> Element {
    let scene = scene.read();
    let Viewport { width, height } = scene.viewport;
    let (cx, cy) = scene.viewport.center();
    let transform = format!(
        "translate({cx} {cy}) scale({}) translate({} {})",
        scene.zoom, -cx, -cy
    );
    rsx! {
        svg {
            class,
            "viewBox": "0 0 {width} {height}",
            "preserveAspectRatio": "xMidYMid slice",
            g { transform,
                for shape in scene.shapes.iter() {
                    {shape_node(shape)}
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markdown_drops_raw_html() {
        let html = markdown_to_html("**市場規模**\n\n<script>alert(1)</script>");
        assert!(html.contains("<strong>市場規模</strong>"));
        assert!(!html.contains("<script>"));
        assert!(!html.contains("&lt;script&gt;"));
        assert!(html.contains("raw HTML omitted"));
    }

    #[test]
    fn markdown_renders_tables() {
        let html = markdown_to_html("| a | b |\n|---|---|\n| 1 | 2 |");
        assert!(html.contains("<table>"));
    }
}
