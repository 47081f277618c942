use crate::ai::{ChatTransport, ReportSlot};
use crate::audio::{
    AudioCue, AudioError, AudioPlayer, AudioReactivity, CUE_FALLBACK, STARTUP_REACTION,
    play_with_fallback,
};
use crate::background::BackgroundStore;
use crate::chat::{ChatSession, MARKET_RESEARCH_ALWAYS};
use crate::config::Config;
use crate::history::ChatHistoryStore;
use crate::sequencer::{Effect, Event, Sequencer, SystemClock};
use crate::storage::KeyValueStore;
use crate::theme::theme_definition;
use crate::views::{ChatView, DemoView, Sidebar, StartupScreen};
use async_trait::async_trait;
use dioxus::prelude::*;
use std::sync::Arc;
use std::time::{Duration, Instant};

const GOLDRUSH_CSS: Asset = asset!("/assets/goldrush.css");
/// Sequencer tick, about one frame.
const TICK_INTERVAL: Duration = Duration::from_millis(16);

/// Long-lived handles the views call into.
#[derive(Clone)]
pub struct Services {
    pub transport: Arc<dyn ChatTransport>,
    pub player: Arc<dyn AudioPlayer>,
    pub store: Arc<dyn KeyValueStore>,
}

impl Services {
    fn from_env() -> Self {
        let config = Config::from_env().unwrap_or_else(|err| {
            tracing::warn!("invalid configuration, using defaults: {err}");
            Config::default()
        });
        Self {
            transport: transport_for(&config),
            player: Arc::new(EvalPlayer),
            store: store_for(&config),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn transport_for(config: &Config) -> Arc<dyn ChatTransport> {
    Arc::new(crate::ai::DirectTransport::new(crate::ai::backend_from_config(config)))
}

#[cfg(target_arch = "wasm32")]
fn transport_for(config: &Config) -> Arc<dyn ChatTransport> {
    Arc::new(crate::ai::ApiTransport::new(config.api_url.clone()))
}

#[cfg(not(target_arch = "wasm32"))]
fn store_for(config: &Config) -> Arc<dyn KeyValueStore> {
    use crate::storage::FileStore;
    let store = match &config.data_dir {
        Some(dir) => FileStore::new(dir),
        None => FileStore::in_data_dir(),
    };
    tracing::info!("storing chat history under {}", store.root().display());
    Arc::new(store)
}

#[cfg(target_arch = "wasm32")]
fn store_for(_config: &Config) -> Arc<dyn KeyValueStore> {
    Arc::new(crate::storage::MemoryStore::new())
}

/// Plays cues through the webview's `Audio` element.
struct EvalPlayer;

/// The cue's asset paths as a JS array body, primary first.
fn cue_sources(cue: AudioCue) -> String {
    std::iter::once(cue.asset_path())
        .chain(cue.fallback_path())
        .map(|path| format!("{path:?}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn cue_script(cue: AudioCue) -> String {
    let sources = cue_sources(cue);
    format!(
        r#"
for (const src of [{sources}]) {{
    try {{
        const audio = new Audio(src);
        await audio.play();
        await new Promise((resolve) => {{ audio.onended = resolve; audio.onerror = resolve; }});
        return "ok";
    }} catch (e) {{}}
}}
return "unavailable";
"#
    )
}

/// Plays the startup jingle through an analyser and streams one byte
/// spectrum per animation frame back to Rust, then `null` when done.
fn analyser_script() -> String {
    let sources = cue_sources(AudioCue::Startup);
    format!(
        r#"
let audio = null;
for (const src of [{sources}]) {{
    try {{
        const candidate = new Audio(src);
        await candidate.play();
        audio = candidate;
        break;
    }} catch (e) {{}}
}}
if (audio) {{
    const context = new AudioContext();
    if (context.state === "suspended") {{ await context.resume(); }}
    const analyser = context.createAnalyser();
    analyser.fftSize = 256;
    context.createMediaElementSource(audio).connect(analyser);
    analyser.connect(context.destination);
    const bins = new Uint8Array(analyser.frequencyBinCount);
    while (!audio.ended && !audio.paused) {{
        analyser.getByteFrequencyData(bins);
        dioxus.send(Array.from(bins));
        await new Promise((resolve) => requestAnimationFrame(resolve));
    }}
    await context.close();
}}
dioxus.send(null);
"#
    )
}

/// Drive the startup animations from the jingle's spectrum for the
/// reaction window, then go back to rest.
async fn react_to_startup(mut audio: Signal<AudioReactivity>) {
    audio.set(AudioReactivity::new(true, 0.0));
    let mut eval = document::eval(&analyser_script());
    let frames = async move {
        while let Ok(Some(bins)) = eval.recv::<Option<Vec<u8>>>().await {
            audio.set(AudioReactivity::from_spectrum(&bins));
        }
    };
    if tokio::time::timeout(STARTUP_REACTION, frames).await.is_err() {
        tracing::debug!("startup jingle outlasted the reaction window");
    }
    audio.set(AudioReactivity::default());
}

#[async_trait]
impl AudioPlayer for EvalPlayer {
    async fn play(&self, cue: AudioCue) -> Result<(), AudioError> {
        // The eval handle is tied to the UI thread; hand the result back
        // through a channel.
        let (tx, rx) = futures::channel::oneshot::channel();
        let script = cue_script(cue);
        spawn(async move {
            let outcome = match document::eval(&script).await {
                Ok(value) if value == "ok" => Ok(()),
                Ok(value) => Err(AudioError::Unavailable(value.to_string())),
                Err(err) => Err(AudioError::Playback(format!("{err:?}"))),
            };
            let _ = tx.send(outcome);
        });
        rx.await
            .map_err(|_| AudioError::Playback("cue task dropped".to_string()))?
    }
}

/// App state handles plus the glue between sequencer effects and the
/// outside world. Copyable so event handlers can capture it freely.
#[derive(Clone, Copy, PartialEq)]
pub struct Controller {
    pub services: Signal<Services>,
    pub sequencer: Signal<Sequencer>,
    /// Sequencer clock, refreshed every tick while something animates.
    pub now: Signal<Duration>,
    pub session: Signal<ChatSession>,
    pub history: Signal<ChatHistoryStore>,
    pub current_chat: Signal<String>,
    pub backgrounds: Signal<BackgroundStore>,
    pub audio: Signal<AudioReactivity>,
    pub report: Signal<ReportSlot>,
}

impl Controller {
    /// Feed an event to the sequencer and carry out what it asks for.
    pub fn dispatch(self, event: Event) -> Vec<Effect> {
        let mut sequencer = self.sequencer;
        let effects = sequencer.write().handle(event);
        for effect in &effects {
            self.apply(effect.clone());
        }
        effects
    }

    /// Chat composer submit. Starts the demo when it is idle; otherwise the
    /// text just goes to the assistant.
    pub fn submit(self, text: String) {
        let effects = self.dispatch(Event::Submit(text.clone()));
        if !effects.iter().any(|e| matches!(e, Effect::SendChat(_))) {
            self.send_chat(text);
        }
    }

    fn apply(self, effect: Effect) {
        match effect {
            Effect::SendChat(text) => {
                self.send_chat(text.clone());
                self.research(text);
            }
            Effect::PlayCue(cue) => self.play_cue(cue),
            Effect::ScrollToTop => {
                let _ = document::eval("window.scrollTo({ top: 0, behavior: 'smooth' });");
            }
        }
    }

    fn play_cue(self, cue: AudioCue) {
        let player = self.services.peek().player.clone();
        spawn(async move {
            let outcome = play_with_fallback(player.as_ref(), cue, CUE_FALLBACK).await;
            tracing::debug!(?cue, ?outcome, "cue settled");
            self.dispatch(Event::CueSettled(cue));
        });
    }

    pub fn send_chat(self, text: String) {
        let mut session = self.session;
        let Some(pending) = session.write().begin_send(&text) else {
            return;
        };
        self.record_history();
        let transport = self.services.peek().transport.clone();
        spawn(async move {
            let result = transport.send(&pending.messages, MARKET_RESEARCH_ALWAYS).await;
            if session.write().finish_send(pending.epoch, result) {
                self.record_history();
            }
        });
    }

    /// Background market research for the submitted idea. Shown next to the
    /// business plan when it arrives; failures only get logged.
    fn research(self, query: String) {
        let mut report = self.report;
        let ticket = report.write().request();
        let transport = self.services.peek().transport.clone();
        spawn(async move {
            match transport.market_research(&query).await {
                Ok(found) => {
                    report.write().fill(ticket, found);
                }
                Err(err) => tracing::warn!("market research unavailable: {err}"),
            }
        });
    }

    fn record_history(self) {
        let id = self.current_chat.peek().clone();
        let mut history = self.history;
        history.write().record_session(&id, &self.session.peek());
    }

    pub fn clear_chat(self) {
        let mut session = self.session;
        session.write().clear();
        self.record_history();
    }

    pub fn delete_message(self, id: u64) {
        let mut session = self.session;
        session.write().delete(id);
        self.record_history();
    }

    pub fn new_chat(self) {
        let mut history = self.history;
        let mut current = self.current_chat;
        let mut session = self.session;
        let id = history.write().add_chat(None);
        current.set(id);
        session.write().reset();
    }

    pub fn open_chat(self, id: String) {
        let mut current = self.current_chat;
        let mut session = self.session;
        if *current.peek() != id {
            current.set(id);
            session.write().reset();
        }
    }

    pub fn delete_chat(self, id: &str) {
        let mut history = self.history;
        let mut current = self.current_chat;
        history.write().delete_chat(id);
        if *current.peek() == id {
            let next = history.write().ensure_current();
            current.set(next);
            let mut session = self.session;
            session.write().reset();
        }
    }
}

fn use_controller() -> Controller {
    let services = use_signal(Services::from_env);
    let store = services.peek().store.clone();
    let history_store = store.clone();
    let mut initial_chat = String::new();
    let history = use_signal(|| {
        let mut history = ChatHistoryStore::load(history_store);
        initial_chat = history.ensure_current();
        history
    });
    let current_chat = use_signal(move || initial_chat);

    let controller = Controller {
        services,
        sequencer: use_signal(|| Sequencer::new(Arc::new(SystemClock::new()))),
        now: use_signal(|| Duration::ZERO),
        session: use_signal(ChatSession::new),
        history,
        current_chat,
        backgrounds: use_signal(move || BackgroundStore::load(store)),
        audio: use_signal(AudioReactivity::default),
        report: use_signal(ReportSlot::default),
    };

    use_future(move || async move {
        let mut sequencer = controller.sequencer;
        let mut now = controller.now;
        loop {
            tokio::time::sleep(TICK_INTERVAL).await;
            let (due, clock) = {
                let current = sequencer.peek();
                let clock = current.now();
                (current.next_deadline().is_some_and(|at| at <= clock), clock)
            };
            if due {
                sequencer.write().tick();
            }
            if sequencer.peek().is_animating() {
                now.set(clock);
            }
        }
    });

    controller
}

#[component]
pub fn App() -> Element {
    let controller = use_controller();
    let mut show_startup = use_signal(|| true);
    let mut logged_in_at = use_signal(|| Option::<Instant>::None);

    let on_login = move |_| {
        spawn(react_to_startup(controller.audio));
    };

    let on_complete = move |_| {
        show_startup.set(false);
        logged_in_at.set(Some(Instant::now()));
    };

    rsx! {
        ThemeStyles { controller }
        if show_startup() {
            StartupScreen { on_login, on_complete }
        } else {
            div { class: "app-shell",
                Sidebar { controller }
                main { class: "workspace",
                    AppHeader { controller }
                    DemoView { controller }
                    ChatView { controller, logged_in_at: logged_in_at() }
                }
            }
        }
    }
}

#[component]
fn ThemeStyles(controller: Controller) -> Element {
    let definition = theme_definition(controller.backgrounds.read().selected());
    rsx! {
        document::Link { rel: "stylesheet", href: GOLDRUSH_CSS }
        style { dangerous_inner_html: "{definition.css}" }
    }
}

#[component]
fn AppHeader(controller: Controller) -> Element {
    let wordmark = theme_definition(controller.backgrounds.read().selected()).wordmark_class;
    rsx! {
        div { class: "header",
            div { class: "header-content",
                h1 { class: wordmark, "GOLD RUSH" }
                span { class: "header-tagline", "FUTURE VENTURES" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startup_cue_script_tries_the_backup() {
        let script = cue_script(AudioCue::Startup);
        assert!(script.contains("\"/sounds/goldrush-startup.mp3\", \"/sounds/goldrush-startup-backup.mp3\""));
        let script = cue_script(AudioCue::Submit);
        assert!(script.contains("[\"/sounds/submit.mp3\"]"));
    }

    #[test]
    fn startup_analyser_streams_the_jingle_spectrum() {
        let script = analyser_script();
        assert!(script.contains("\"/sounds/goldrush-startup.mp3\", \"/sounds/goldrush-startup-backup.mp3\""));
        assert!(script.contains("createAnalyser"));
        assert!(script.contains("getByteFrequencyData"));
        assert!(script.contains("dioxus.send(Array.from(bins))"));
        assert!(script.trim_end().ends_with("dioxus.send(null);"));
    }
}
