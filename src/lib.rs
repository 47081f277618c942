//! GOLD RUSH: a scripted AI business-ideation demo.
//!
//! The library holds everything that does not need a UI toolkit: chat
//! plumbing and LLM backends, the demo sequencer, procedural animations,
//! persistence, and the HTTP proxy. The Dioxus front end lives behind the
//! `dioxus` feature.

pub mod ai;
pub mod audio;
pub mod background;
pub mod chat;
pub mod config;
pub mod content;
pub mod history;
pub mod logging;
pub mod render;
pub mod sequencer;
#[cfg(not(target_arch = "wasm32"))]
pub mod server;
pub mod storage;
pub mod theme;
pub mod types;

#[cfg(feature = "dioxus")]
pub mod ui;
#[cfg(feature = "dioxus")]
pub mod views;
