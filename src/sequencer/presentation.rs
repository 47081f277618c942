use super::typewriter::{self, SLIDE_CHAR_INTERVAL};
use crate::content::{SLIDES, Slide, VERIFICATION_ITEMS, VerificationItem, slide_source};
use std::time::Duration;

pub const VERIFICATION_DURATION: Duration = Duration::from_secs(30);
pub const VERIFICATION_STAGGER: Duration = Duration::from_millis(500);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PresentationView {
    Slides,
    Verification,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SlideView {
    pub slide: &'static Slide,
    pub typed: String,
    /// The source has finished typing and the slide image is shown.
    pub code_complete: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CardView {
    pub item: &'static VerificationItem,
    pub progress: u8,
}

/// All slides type their source at the same time.
pub fn slide_views(elapsed: Duration) -> Vec<SlideView> {
    SLIDES
        .iter()
        .map(|slide| {
            let source = slide_source(slide);
            SlideView {
                slide,
                typed: typewriter::reveal(&source, elapsed, SLIDE_CHAR_INTERVAL).to_string(),
                code_complete: typewriter::is_complete(&source, elapsed, SLIDE_CHAR_INTERVAL),
            }
        })
        .collect()
}

/// When the longest slide source has finished typing.
pub fn slides_done_at() -> Duration {
    SLIDES
        .iter()
        .map(|slide| typewriter::duration_for(&slide_source(slide), SLIDE_CHAR_INTERVAL))
        .max()
        .unwrap_or_default()
}

/// Card `index` starts `index * 500ms` after the grid appears and runs
/// linearly to 100 over thirty seconds.
pub fn card_progress(index: usize, elapsed: Duration) -> u8 {
    let start = VERIFICATION_STAGGER * index as u32;
    let Some(running) = elapsed.checked_sub(start) else {
        return 0;
    };
    let percent = running.as_millis() * 100 / VERIFICATION_DURATION.as_millis();
    percent.min(100) as u8
}

pub fn card_views(elapsed: Duration) -> Vec<CardView> {
    VERIFICATION_ITEMS
        .iter()
        .enumerate()
        .map(|(index, item)| CardView {
            item,
            progress: card_progress(index, elapsed),
        })
        .collect()
}

/// When the last card reaches 100.
pub fn verification_done_at() -> Duration {
    VERIFICATION_STAGGER * (VERIFICATION_ITEMS.len() as u32 - 1) + VERIFICATION_DURATION
}
