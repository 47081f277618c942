//! Character-by-character reveals computed from elapsed time.

use crate::content::GREETING_POPUP;
use std::time::Duration;

/// Agent panel paragraphs.
pub const AGENT_CHAR_INTERVAL: Duration = Duration::from_millis(18);
/// Slide source code.
pub const SLIDE_CHAR_INTERVAL: Duration = Duration::from_millis(20);
/// The greeting popup after login.
pub const POPUP_CHAR_INTERVAL: Duration = Duration::from_millis(50);
/// Wait between login and the greeting popup appearing.
pub const POPUP_DELAY: Duration = Duration::from_secs(1);

/// Characters shown after `elapsed`, one more per `interval`.
pub fn visible_chars(elapsed: Duration, interval: Duration) -> usize {
    if interval.is_zero() {
        return usize::MAX;
    }
    (elapsed.as_millis() / interval.as_millis()) as usize
}

/// Prefix of `text` visible after `elapsed`.
pub fn reveal(text: &str, elapsed: Duration, interval: Duration) -> &str {
    let count = visible_chars(elapsed, interval);
    match text.char_indices().nth(count) {
        Some((cut, _)) => &text[..cut],
        None => text,
    }
}

/// Time needed to type all of `text`.
pub fn duration_for(text: &str, interval: Duration) -> Duration {
    interval * text.chars().count() as u32
}

pub fn is_complete(text: &str, elapsed: Duration, interval: Duration) -> bool {
    elapsed >= duration_for(text, interval)
}

/// The greeting popup text at `since_login`, or `None` before it appears.
pub fn greeting(since_login: Duration) -> Option<&'static str> {
    since_login
        .checked_sub(POPUP_DELAY)
        .map(|typing| reveal(GREETING_POPUP, typing, POPUP_CHAR_INTERVAL))
}
