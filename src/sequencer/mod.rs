//! The scripted demo that plays after the first chat submission.
//!
//! One [`Phase`] value describes where the demo is; events from the UI and a
//! single [`Timeline`] of pending transitions move it forward. Time comes from
//! an injected [`Clock`], so the whole run can be stepped in tests.
//!
//! Phases only move forward within a run. The one exception is cancelling
//! from the business plan, which ends the run and returns to `Idle`.

pub mod agents;
mod clock;
pub mod presentation;
mod timeline;
pub mod typewriter;

pub use clock::{Clock, ManualClock, SystemClock};
pub use presentation::PresentationView;
pub use timeline::Timeline;

use crate::audio::{AudioCue, CUE_FALLBACK};
use crate::content::{PATENTS, TALENT_ROSTERS};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

pub const BUSINESS_LOADING: Duration = Duration::from_secs(5);
pub const PATENT_LOADING: Duration = Duration::from_secs(4);
pub const TALENT_LOADING: Duration = Duration::from_secs(4);

/// A person picked from one of the two rosters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TalentPick {
    pub roster: usize,
    pub index: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Phase {
    Idle,
    BusinessLoading {
        query: String,
    },
    BusinessPlan {
        query: String,
        /// Execute was clicked; waiting on the cue or its fallback.
        executing: bool,
    },
    MarketAgents {
        query: String,
        started: Duration,
    },
    PatentLoading,
    PatentGallery {
        focus: usize,
    },
    TalentLoading {
        patent: usize,
    },
    TalentManagement {
        patent: usize,
        selected: BTreeSet<TalentPick>,
    },
    Presentation {
        patent: usize,
        team: Vec<TalentPick>,
        view: PresentationView,
        view_started: Duration,
    },
}

/// [`Phase`] without its data, in run order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PhaseKind {
    Idle,
    BusinessLoading,
    BusinessPlan,
    MarketAgents,
    PatentLoading,
    PatentGallery,
    TalentLoading,
    TalentManagement,
    Presentation,
}

impl Phase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            Phase::Idle => PhaseKind::Idle,
            Phase::BusinessLoading { .. } => PhaseKind::BusinessLoading,
            Phase::BusinessPlan { .. } => PhaseKind::BusinessPlan,
            Phase::MarketAgents { .. } => PhaseKind::MarketAgents,
            Phase::PatentLoading => PhaseKind::PatentLoading,
            Phase::PatentGallery { .. } => PhaseKind::PatentGallery,
            Phase::TalentLoading { .. } => PhaseKind::TalentLoading,
            Phase::TalentManagement { .. } => PhaseKind::TalentManagement,
            Phase::Presentation { .. } => PhaseKind::Presentation,
        }
    }

    /// The submitted text, echoed while the early phases are on screen.
    pub fn query(&self) -> Option<&str> {
        match self {
            Phase::BusinessLoading { query }
            | Phase::BusinessPlan { query, .. }
            | Phase::MarketAgents { query, .. } => Some(query),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    Submit(String),
    ExecutePlan,
    CancelPlan,
    /// A cue finished playing (or failed).
    CueSettled(AudioCue),
    /// Rotate the patent carousel by this many cards.
    FocusPatent(isize),
    SelectPatent(usize),
    ToggleTalent { roster: usize, index: usize },
    CreatePlan,
    ShowVerification,
    ShowSlides,
}

/// Side effects the UI must carry out.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    SendChat(String),
    PlayCue(AudioCue),
    ScrollToTop,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Timer {
    BusinessReady,
    CueFallback,
    AgentsFinished,
    PatentsReady,
    TalentReady,
}

pub struct Sequencer {
    clock: Arc<dyn Clock>,
    phase: Phase,
    timeline: Timeline<Timer>,
}

impl Sequencer {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            phase: Phase::Idle,
            timeline: Timeline::new(),
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn kind(&self) -> PhaseKind {
        self.phase.kind()
    }

    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Earliest pending transition, for UIs that sleep until then.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timeline.next_deadline()
    }

    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        let now = self.clock.now();
        let before = self.kind();
        let effects = self.apply(event, now);
        if self.kind() != before {
            tracing::debug!(from = ?before, to = ?self.kind(), "demo phase changed");
        }
        effects
    }

    fn apply(&mut self, event: Event, now: Duration) -> Vec<Effect> {
        match (&mut self.phase, event) {
            (Phase::Idle, Event::Submit(text)) => {
                let query = text.trim();
                if query.is_empty() {
                    return Vec::new();
                }
                self.phase = Phase::BusinessLoading {
                    query: query.to_string(),
                };
                self.timeline.schedule(now + BUSINESS_LOADING, Timer::BusinessReady);
                vec![
                    Effect::SendChat(text),
                    Effect::PlayCue(AudioCue::Submit),
                ]
            }

            (Phase::BusinessPlan { executing, .. }, Event::ExecutePlan) if !*executing => {
                *executing = true;
                self.timeline.schedule(now + CUE_FALLBACK, Timer::CueFallback);
                vec![Effect::PlayCue(AudioCue::ExecutePlan)]
            }

            (
                Phase::BusinessPlan {
                    executing: true, ..
                },
                Event::CueSettled(AudioCue::ExecutePlan),
            ) => {
                self.timeline.cancel(&Timer::CueFallback);
                self.enter_market_agents(now);
                Vec::new()
            }

            (Phase::BusinessPlan { .. }, Event::CancelPlan) => {
                self.timeline.clear();
                self.phase = Phase::Idle;
                Vec::new()
            }

            (Phase::PatentGallery { focus }, Event::FocusPatent(delta)) => {
                let len = PATENTS.len() as isize;
                *focus = (*focus as isize + delta).rem_euclid(len) as usize;
                Vec::new()
            }

            (Phase::PatentGallery { .. }, Event::SelectPatent(patent)) if patent < PATENTS.len() => {
                self.phase = Phase::TalentLoading { patent };
                self.timeline.schedule(now + TALENT_LOADING, Timer::TalentReady);
                vec![Effect::PlayCue(AudioCue::PatentSelected)]
            }

            (Phase::TalentManagement { selected, .. }, Event::ToggleTalent { roster, index }) => {
                let exists = TALENT_ROSTERS
                    .get(roster)
                    .is_some_and(|r| index < r.members.len());
                if exists {
                    let pick = TalentPick { roster, index };
                    if !selected.remove(&pick) {
                        selected.insert(pick);
                    }
                }
                Vec::new()
            }

            (Phase::TalentManagement { patent, selected }, Event::CreatePlan)
                if !selected.is_empty() =>
            {
                self.phase = Phase::Presentation {
                    patent: *patent,
                    team: selected.iter().copied().collect(),
                    view: PresentationView::Slides,
                    view_started: now,
                };
                vec![Effect::PlayCue(AudioCue::CreatePlan), Effect::ScrollToTop]
            }

            (Phase::Presentation { view, view_started, .. }, Event::ShowVerification)
                if *view == PresentationView::Slides =>
            {
                *view = PresentationView::Verification;
                *view_started = now;
                Vec::new()
            }

            (Phase::Presentation { view, view_started, .. }, Event::ShowSlides)
                if *view == PresentationView::Verification =>
            {
                *view = PresentationView::Slides;
                *view_started = now;
                Vec::new()
            }

            (phase, event) => {
                tracing::trace!(phase = ?phase.kind(), ?event, "event ignored");
                Vec::new()
            }
        }
    }

    /// Fire every transition that has come due. Returns whether the phase
    /// changed.
    pub fn tick(&mut self) -> bool {
        let now = self.clock.now();
        let before = self.kind();
        loop {
            let due = self.timeline.drain_due(now);
            if due.is_empty() {
                break;
            }
            for (deadline, timer) in due {
                self.fire(timer, deadline);
            }
        }
        let changed = self.kind() != before;
        if changed {
            tracing::debug!(from = ?before, to = ?self.kind(), "demo phase advanced");
        }
        changed
    }

    /// Transitions chain from the deadline that fired rather than from `now`,
    /// so a late tick lands in the same place as a punctual one.
    fn fire(&mut self, timer: Timer, at: Duration) {
        match (&self.phase, timer) {
            (Phase::BusinessLoading { query }, Timer::BusinessReady) => {
                self.phase = Phase::BusinessPlan {
                    query: query.clone(),
                    executing: false,
                };
            }
            (Phase::BusinessPlan { executing: true, .. }, Timer::CueFallback) => {
                self.enter_market_agents(at);
            }
            (Phase::MarketAgents { .. }, Timer::AgentsFinished) => {
                self.phase = Phase::PatentLoading;
                self.timeline.schedule(at + PATENT_LOADING, Timer::PatentsReady);
            }
            (Phase::PatentLoading, Timer::PatentsReady) => {
                self.phase = Phase::PatentGallery { focus: 0 };
            }
            (Phase::TalentLoading { patent }, Timer::TalentReady) => {
                self.phase = Phase::TalentManagement {
                    patent: *patent,
                    selected: BTreeSet::new(),
                };
            }
            (phase, timer) => {
                tracing::trace!(phase = ?phase.kind(), ?timer, "stale timer dropped");
            }
        }
    }

    fn enter_market_agents(&mut self, started: Duration) {
        let query = self.phase.query().unwrap_or_default().to_string();
        self.phase = Phase::MarketAgents { query, started };
        self.timeline
            .schedule(started + agents::finished_at(), Timer::AgentsFinished);
    }

    /// Whether the current phase still changes with time alone. The UI only
    /// refreshes its clock every frame while this holds.
    pub fn is_animating(&self) -> bool {
        let now = self.now();
        match &self.phase {
            Phase::MarketAgents { .. } => true,
            Phase::Presentation {
                view, view_started, ..
            } => {
                let elapsed = now.saturating_sub(*view_started);
                match view {
                    PresentationView::Slides => elapsed < presentation::slides_done_at(),
                    PresentationView::Verification => {
                        elapsed < presentation::verification_done_at()
                    }
                }
            }
            _ => false,
        }
    }

    /// Panel state while the market agents are running.
    pub fn agents_view(&self) -> Option<agents::AgentsView> {
        match &self.phase {
            Phase::MarketAgents { started, .. } => {
                Some(agents::snapshot(self.now().saturating_sub(*started)))
            }
            _ => None,
        }
    }

    pub fn slide_views(&self) -> Option<Vec<presentation::SlideView>> {
        match &self.phase {
            Phase::Presentation {
                view: PresentationView::Slides,
                view_started,
                ..
            } => Some(presentation::slide_views(
                self.now().saturating_sub(*view_started),
            )),
            _ => None,
        }
    }

    pub fn card_views(&self) -> Option<Vec<presentation::CardView>> {
        match &self.phase {
            Phase::Presentation {
                view: PresentationView::Verification,
                view_started,
                ..
            } => Some(presentation::card_views(
                self.now().saturating_sub(*view_started),
            )),
            _ => None,
        }
    }
}
