//! The chat pane's message list and send flow.

use crate::ai::{ChatResult, ChatTransport};
use crate::content::{OPENING_MESSAGE, WELCOME_MESSAGE};
use crate::types::{ChatHistoryPatch, ChatMessage, Role};
use time::macros::format_description;
use time::{Duration, OffsetDateTime, UtcOffset};

/// The demo chat always asks for market research framing.
pub const MARKET_RESEARCH_ALWAYS: bool = true;

const TITLE_CHARS: usize = 30;
const PREVIEW_CHARS: usize = 60;

#[derive(Debug, Clone, PartialEq)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    next_id: u64,
    loading: bool,
    error: Option<String>,
    /// Bumped by [`ChatSession::reset`]; replies tagged with an older epoch
    /// are dropped.
    epoch: u64,
}

/// A send in flight: the conversation to transmit, tagged with the epoch of
/// the session it was started from.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSend {
    pub messages: Vec<ChatMessage>,
    pub epoch: u64,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    /// A session seeded with the opening line, stamped an hour in the past.
    pub fn new() -> Self {
        let opening = ChatMessage {
            id: 1,
            role: Role::Assistant,
            content: OPENING_MESSAGE.to_string(),
            timestamp: OffsetDateTime::now_utc() - Duration::hours(1),
        };
        Self::with_messages(vec![opening])
    }

    pub fn with_messages(messages: Vec<ChatMessage>) -> Self {
        let next_id = messages.iter().map(|m| m.id).max().unwrap_or(0) + 1;
        Self {
            messages,
            next_id,
            loading: false,
            error: None,
            epoch: 0,
        }
    }

    /// Start over for another conversation. Any send still in flight belongs
    /// to the old conversation and its reply will be ignored.
    pub fn reset(&mut self) {
        let epoch = self.epoch + 1;
        *self = Self::new();
        self.epoch = epoch;
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn append(&mut self, role: Role, content: impl Into<String>) -> &ChatMessage {
        let message = ChatMessage {
            id: self.next_id,
            role,
            content: content.into(),
            timestamp: OffsetDateTime::now_utc(),
        };
        self.next_id += 1;
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }

    /// Reset to the welcome greeting.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.error = None;
        self.append(Role::Assistant, WELCOME_MESSAGE);
    }

    pub fn delete(&mut self, id: u64) {
        self.messages.retain(|message| message.id != id);
    }

    /// Start a send: returns the conversation to transmit, or `None` when the
    /// text is blank or a send is already in flight.
    pub fn begin_send(&mut self, text: &str) -> Option<PendingSend> {
        if text.trim().is_empty() || self.loading {
            return None;
        }
        self.loading = true;
        self.error = None;
        self.append(Role::User, text);
        Some(PendingSend {
            messages: self.messages.clone(),
            epoch: self.epoch,
        })
    }

    /// Apply the outcome of a send. Returns `false`, leaving the session
    /// untouched, when the session was reset while the send was in flight.
    pub fn finish_send(&mut self, epoch: u64, result: ChatResult<String>) -> bool {
        if epoch != self.epoch {
            tracing::debug!("dropping reply for a conversation that is no longer open");
            return false;
        }
        self.loading = false;
        match result {
            Ok(reply) => {
                self.append(Role::Assistant, reply);
            }
            Err(err) => {
                tracing::warn!("chat send failed: {err}");
                self.error = Some(err.user_message().to_string());
            }
        }
        true
    }

    /// Returns whether anything was sent.
    pub async fn send_message(&mut self, transport: &dyn ChatTransport, text: &str) -> bool {
        let Some(pending) = self.begin_send(text) else {
            return false;
        };
        let result = transport.send(&pending.messages, MARKET_RESEARCH_ALWAYS).await;
        self.finish_send(pending.epoch, result)
    }

    /// Sidebar summary: titled by the first user message, previewing the
    /// latest one. `None` until the user has said something.
    pub fn history_summary(&self) -> Option<ChatHistoryPatch> {
        let first_user = self.messages.iter().find(|m| m.role == Role::User)?;
        let last = self.messages.last()?;
        Some(ChatHistoryPatch {
            title: Some(truncate_chars(&first_user.content, TITLE_CHARS)),
            last_message: Some(truncate_chars(&last.content, PREVIEW_CHARS)),
            timestamp: Some(OffsetDateTime::now_utc()),
        })
    }
}

/// First `limit` characters, with `...` appended when anything was cut.
pub fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

fn local_offset() -> UtcOffset {
    UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC)
}

/// `HH:MM` in the local time zone.
pub fn format_clock(timestamp: OffsetDateTime) -> String {
    format_clock_in(timestamp, local_offset())
}

pub fn format_clock_in(timestamp: OffsetDateTime, offset: UtcOffset) -> String {
    timestamp
        .to_offset(offset)
        .format(format_description!("[hour]:[minute]"))
        .unwrap_or_default()
}

/// Sidebar date: the clock for today's chats, `M月D日` otherwise.
pub fn format_history_date(timestamp: OffsetDateTime, now: OffsetDateTime) -> String {
    let offset = local_offset();
    format_history_date_in(timestamp, now, offset)
}

pub fn format_history_date_in(
    timestamp: OffsetDateTime,
    now: OffsetDateTime,
    offset: UtcOffset,
) -> String {
    let local = timestamp.to_offset(offset);
    if local.date() == now.to_offset(offset).date() {
        return format_clock_in(timestamp, offset);
    }
    format!("{}月{}日", u8::from(local.month()), local.day())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{ChatError, MarketReport};
    use crate::content::ERROR_REQUEST_FAILED;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use time::macros::{datetime, offset};

    /// Echoes the last message and remembers the flag it was sent with.
    #[derive(Default)]
    struct Echo {
        flags: Mutex<Vec<bool>>,
    }

    #[async_trait]
    impl ChatTransport for Echo {
        async fn send(&self, messages: &[ChatMessage], market_research: bool) -> ChatResult<String> {
            self.flags.lock().unwrap().push(market_research);
            Ok(format!("echo: {}", messages.last().unwrap().content))
        }

        async fn market_research(&self, _query: &str) -> ChatResult<MarketReport> {
            Ok(MarketReport::default())
        }
    }

    #[tokio::test]
    async fn send_message_appends_user_then_reply() {
        let transport = Echo::default();
        let mut session = ChatSession::new();
        assert!(session.send_message(&transport, "EV充電").await);

        let contents: Vec<_> = session.messages().iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec![OPENING_MESSAGE, "EV充電", "echo: EV充電"]);
        assert_eq!(*transport.flags.lock().unwrap(), vec![true]);
        assert!(!session.send_message(&transport, "").await);
    }

    #[test]
    fn starts_with_opening_line() {
        let session = ChatSession::new();
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.messages()[0].content, OPENING_MESSAGE);
        assert_eq!(session.messages()[0].role, Role::Assistant);
    }

    #[test]
    fn append_adds_to_the_end_with_unique_ids() {
        let mut session = ChatSession::new();
        let a = session.append(Role::User, "a").id;
        let b = session.append(Role::Assistant, "b").id;
        assert_ne!(a, b);
        assert_eq!(session.messages().last().map(|m| m.content.as_str()), Some("b"));
    }

    #[test]
    fn clear_leaves_only_the_welcome() {
        let mut session = ChatSession::new();
        session.append(Role::User, "hello");
        session.clear();
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.messages()[0].content, WELCOME_MESSAGE);
        assert_eq!(session.messages()[0].role, Role::Assistant);
    }

    #[test]
    fn delete_removes_only_the_match() {
        let mut session = ChatSession::new();
        let id = session.append(Role::User, "bye").id;
        session.append(Role::User, "stay");
        session.delete(id);
        assert!(session.messages().iter().all(|m| m.id != id));
        assert_eq!(session.messages().len(), 2);
    }

    #[test]
    fn blank_send_is_ignored() {
        let mut session = ChatSession::new();
        assert!(session.begin_send("   ").is_none());
        assert!(!session.is_loading());
        assert_eq!(session.messages().len(), 1);
    }

    #[test]
    fn second_send_waits_for_the_first() {
        let mut session = ChatSession::new();
        let pending = session.begin_send("one").unwrap();
        assert!(session.begin_send("two").is_none());
        assert!(session.finish_send(pending.epoch, Ok("reply".into())));
        assert!(!session.is_loading());
        assert!(session.begin_send("two").is_some());
    }

    #[test]
    fn failed_send_records_error_without_reply() {
        let mut session = ChatSession::new();
        let pending = session.begin_send("hi").unwrap();
        assert_eq!(pending.messages.last().map(|m| m.role), Some(Role::User));
        session.finish_send(pending.epoch, Err(ChatError::Network("refused".into())));
        assert_eq!(session.error(), Some(ERROR_REQUEST_FAILED));
        assert_eq!(session.messages().last().map(|m| m.role), Some(Role::User));
    }

    #[test]
    fn reply_after_reset_is_dropped() {
        let mut session = ChatSession::new();
        let pending = session.begin_send("old chat").unwrap();

        session.reset();
        assert!(!session.is_loading());
        assert_eq!(session.messages().len(), 1);

        assert!(!session.finish_send(pending.epoch, Ok("late reply".into())));
        assert_eq!(session.messages().len(), 1);
        assert!(session.messages().iter().all(|m| m.content != "late reply"));
    }

    #[test]
    fn reset_frees_the_composer_for_the_new_chat() {
        let mut session = ChatSession::new();
        let stale = session.begin_send("first").unwrap();
        session.reset();

        let fresh = session.begin_send("second").unwrap();
        assert!(!session.finish_send(stale.epoch, Ok("for first".into())));
        assert!(session.is_loading());
        assert!(session.finish_send(fresh.epoch, Ok("for second".into())));

        let contents: Vec<_> = session.messages().iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec![OPENING_MESSAGE, "second", "for second"]);
    }

    #[test]
    fn summary_truncates_title_and_preview() {
        let mut session = ChatSession::new();
        assert!(session.history_summary().is_none());

        let long = "あ".repeat(31);
        session.append(Role::User, long.clone());
        session.append(Role::Assistant, "い".repeat(61));
        let summary = session.history_summary().unwrap();
        assert_eq!(summary.title, Some(format!("{}...", "あ".repeat(30))));
        assert_eq!(summary.last_message, Some(format!("{}...", "い".repeat(60))));
    }

    #[test]
    fn truncate_keeps_short_text() {
        assert_eq!(truncate_chars("short", 30), "short");
        assert_eq!(truncate_chars(&"x".repeat(30), 30), "x".repeat(30));
    }

    #[test]
    fn clock_uses_the_given_offset() {
        let ts = datetime!(2024-05-01 23:05:00 UTC);
        assert_eq!(format_clock_in(ts, UtcOffset::UTC), "23:05");
        assert_eq!(format_clock_in(ts, offset!(+9)), "08:05");
    }

    #[test]
    fn history_date_shows_clock_only_for_today() {
        let now = datetime!(2024-05-01 12:00:00 UTC);
        let today = datetime!(2024-05-01 09:30:00 UTC);
        let earlier = datetime!(2024-03-07 09:30:00 UTC);
        assert_eq!(format_history_date_in(today, now, UtcOffset::UTC), "09:30");
        assert_eq!(format_history_date_in(earlier, now, UtcOffset::UTC), "3月7日");
    }
}
