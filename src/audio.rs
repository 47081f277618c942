//! Sound cues and the audio level that drives the animations.
//!
//! Playback is best effort: [`play_with_fallback`] never fails and never
//! waits longer than its limit, so nothing in the demo blocks on sound.

use async_trait::async_trait;
use std::time::Duration;

/// How long the startup sound keeps the sphere reacting.
pub const STARTUP_REACTION: Duration = Duration::from_millis(8000);

/// Upper bound on waiting for a cue before moving on.
pub const CUE_FALLBACK: Duration = Duration::from_secs(1);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AudioCue {
    Startup,
    Submit,
    ExecutePlan,
    PatentSelected,
    CreatePlan,
}

impl AudioCue {
    pub fn asset_path(self) -> &'static str {
        match self {
            AudioCue::Startup => "/sounds/goldrush-startup.mp3",
            AudioCue::Submit => "/sounds/submit.mp3",
            AudioCue::ExecutePlan => "/sounds/execute-plan.mp3",
            AudioCue::PatentSelected => "/sounds/patent-select.mp3",
            AudioCue::CreatePlan => "/sounds/create-plan.mp3",
        }
    }

    /// Backup asset tried when the primary one will not play.
    pub fn fallback_path(self) -> Option<&'static str> {
        match self {
            AudioCue::Startup => Some("/sounds/goldrush-startup-backup.mp3"),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("audio output unavailable: {0}")]
    Unavailable(String),

    #[error("playback failed: {0}")]
    Playback(String),
}

/// Platform audio output. `play` resolves once the cue has finished.
#[async_trait]
pub trait AudioPlayer: Send + Sync {
    async fn play(&self, cue: AudioCue) -> Result<(), AudioError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CueOutcome {
    Finished,
    Failed,
    TimedOut,
}

/// Play a cue, giving up after `limit`. Failures are logged and swallowed.
pub async fn play_with_fallback(
    player: &dyn AudioPlayer,
    cue: AudioCue,
    limit: Duration,
) -> CueOutcome {
    match tokio::time::timeout(limit, player.play(cue)).await {
        Ok(Ok(())) => CueOutcome::Finished,
        Ok(Err(err)) => {
            tracing::warn!(?cue, "audio cue failed: {err}");
            CueOutcome::Failed
        }
        Err(_) => {
            tracing::debug!(?cue, "audio cue still playing after {limit:?}; moving on");
            CueOutcome::TimedOut
        }
    }
}

/// Mean of an analyser's byte spectrum, scaled to `0.0..=1.0`.
pub fn level_from_spectrum(bins: &[u8]) -> f32 {
    if bins.is_empty() {
        return 0.0;
    }
    let sum: u32 = bins.iter().map(|&b| u32::from(b)).sum();
    sum as f32 / bins.len() as f32 / 255.0
}

/// Cosmetic inputs for the animations.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AudioReactivity {
    pub active: bool,
    pub level: f32,
}

impl AudioReactivity {
    pub fn new(active: bool, level: f32) -> Self {
        Self {
            active,
            level: level.clamp(0.0, 1.0),
        }
    }

    /// Active reactivity driven by one frame of analyser output.
    pub fn from_spectrum(bins: &[u8]) -> Self {
        Self::new(true, level_from_spectrum(bins))
    }

    /// While active the animations never fall fully still.
    pub fn effective_level(&self) -> f32 {
        if self.active {
            self.level.max(0.1)
        } else {
            0.0
        }
    }

    /// Multiplier for text size and glow.
    pub fn audio_factor(&self) -> f32 {
        1.0 + self.effective_level() * 1.5
    }

    /// Multiplier for the sphere radius.
    pub fn sphere_scale(&self) -> f32 {
        1.0 + self.effective_level() * 0.3
    }

    /// Radians per frame.
    pub fn rotation_speed(&self) -> f32 {
        0.006 + self.effective_level() * 0.02
    }
}
