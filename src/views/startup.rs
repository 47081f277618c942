use crate::audio::AudioReactivity;
use crate::render::{COSMIC_BACKGROUND, CosmicMap, IdeaField};
use crate::views::shared::{SceneView, use_scene};
use dioxus::prelude::*;

/// Idea field and logo until the user logs in, then the cosmic map.
#[component]
pub fn StartupScreen(on_login: EventHandler<()>, on_complete: EventHandler<()>) -> Element {
    let mut entering = use_signal(|| false);

    rsx! {
        div { class: "startup",
            if entering() {
                CosmicStage { on_complete }
            } else {
                IdeaStage {}
                button {
                    class: "startup-logo",
                    onclick: move |_| {
                        entering.set(true);
                        on_login.call(());
                    },
                    h1 { "GOLD RUSH" }
                    p { class: "startup-hint", "クリックしてログイン" }
                }
            }
        }
    }
}

#[component]
fn IdeaStage() -> Element {
    let audio = use_signal(AudioReactivity::default);
    let (scene, _) = use_scene(|| IdeaField::new(rand::random()), audio);
    rsx! {
        SceneView { scene, class: "startup-canvas" }
    }
}

#[component]
fn CosmicStage(on_complete: EventHandler<()>) -> Element {
    let audio = use_signal(AudioReactivity::default);
    let (scene, finished) = use_scene(|| CosmicMap::new(rand::random()), audio);

    use_effect(move || {
        if finished() {
            on_complete.call(());
        }
    });

    rsx! {
        div {
            class: "cosmic-stage",
            style: "background: {COSMIC_BACKGROUND.with_alpha(1.0).css()};",
            SceneView { scene, class: "startup-canvas" }
        }
    }
}
