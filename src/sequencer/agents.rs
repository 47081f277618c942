//! Timing of the four market agent panels.
//!
//! Every value is a pure function of the time since the phase began, so the
//! view can be recomputed on any tick without keeping counters around.

use super::typewriter::{self, AGENT_CHAR_INTERVAL};
use crate::content::{AgentPanel, MARKET_AGENTS};
use std::time::Duration;

pub const PROGRESS_TICK: Duration = Duration::from_millis(160);
pub const PROGRESS_STEP: u8 = 10;
/// Hold after the last paragraph finishes.
pub const PAUSE_AFTER_REVEAL: Duration = Duration::from_secs(1);
pub const FADE_OUT: Duration = Duration::from_millis(600);

#[derive(Debug, Clone, PartialEq)]
pub struct PanelView {
    pub name: &'static str,
    pub role: &'static str,
    pub progress: u8,
    pub revealed: &'static str,
    pub complete: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AgentsView {
    pub panels: Vec<PanelView>,
    /// 1.0 until the fade begins, then down to 0.0.
    pub opacity: f32,
}

/// Time for a panel to count from 0 to 100.
pub fn fill_duration() -> Duration {
    PROGRESS_TICK * u32::from(100 / PROGRESS_STEP)
}

/// All four bars start together and step in lockstep.
pub fn progress(elapsed: Duration) -> u8 {
    let steps = elapsed.as_millis() / PROGRESS_TICK.as_millis();
    (steps * u128::from(PROGRESS_STEP)).min(100) as u8
}

/// When the paragraphs start typing: right after the bars are full.
pub fn reveal_starts_at() -> Duration {
    fill_duration()
}

pub fn panel_done_at(panel: &AgentPanel) -> Duration {
    reveal_starts_at() + typewriter::duration_for(panel.finding, AGENT_CHAR_INTERVAL)
}

pub fn all_revealed_at() -> Duration {
    MARKET_AGENTS
        .iter()
        .map(panel_done_at)
        .max()
        .unwrap_or_default()
}

pub fn fade_starts_at() -> Duration {
    all_revealed_at() + PAUSE_AFTER_REVEAL
}

/// When the phase hands over to patent loading.
pub fn finished_at() -> Duration {
    fade_starts_at() + FADE_OUT
}

pub fn panel_view(panel: &'static AgentPanel, elapsed: Duration) -> PanelView {
    let revealed = match elapsed.checked_sub(reveal_starts_at()) {
        Some(typing) => typewriter::reveal(panel.finding, typing, AGENT_CHAR_INTERVAL),
        None => "",
    };
    PanelView {
        name: panel.name,
        role: panel.role,
        progress: progress(elapsed),
        revealed,
        complete: elapsed >= panel_done_at(panel),
    }
}

pub fn snapshot(elapsed: Duration) -> AgentsView {
    let opacity = match elapsed.checked_sub(fade_starts_at()) {
        Some(fading) => 1.0 - (fading.as_secs_f32() / FADE_OUT.as_secs_f32()).min(1.0),
        None => 1.0,
    };
    AgentsView {
        panels: MARKET_AGENTS
            .iter()
            .map(|panel| panel_view(panel, elapsed))
            .collect(),
        opacity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_is_monotonic_and_reaches_exactly_100() {
        let mut last = 0;
        let mut t = Duration::ZERO;
        while t < reveal_starts_at() + PROGRESS_TICK {
            let now = progress(t);
            assert!(now >= last);
            assert_eq!(now % PROGRESS_STEP, 0);
            last = now;
            t += Duration::from_millis(40);
        }
        assert_eq!(last, 100);
        assert_eq!(progress(Duration::from_secs(3600)), 100);
    }

    #[test]
    fn reveal_waits_for_a_full_bar() {
        for panel in &MARKET_AGENTS {
            let before = reveal_starts_at() - Duration::from_millis(1);
            let view = panel_view(panel, before);
            assert!(view.progress < 100);
            assert!(view.revealed.is_empty());

            let after = reveal_starts_at() + AGENT_CHAR_INTERVAL;
            let view = panel_view(panel, after);
            assert_eq!(view.progress, 100);
            assert_eq!(view.revealed.chars().count(), 1);
        }
    }

    #[test]
    fn panels_fill_together() {
        let view = snapshot(Duration::from_millis(320));
        assert!(view.panels.iter().all(|panel| panel.progress == 20));
        let view = snapshot(Duration::from_millis(159));
        assert!(view.panels.iter().all(|panel| panel.progress == 0));
        assert_eq!(reveal_starts_at(), Duration::from_millis(1600));
    }

    #[test]
    fn fade_runs_after_the_pause() {
        assert_eq!(snapshot(all_revealed_at()).opacity, 1.0);
        assert!(snapshot(all_revealed_at()).panels.iter().all(|p| p.complete));
        assert_eq!(snapshot(fade_starts_at()).opacity, 1.0);
        let halfway = fade_starts_at() + FADE_OUT / 2;
        assert!((snapshot(halfway).opacity - 0.5).abs() < 0.01);
        assert_eq!(snapshot(finished_at()).opacity, 0.0);
    }
}
