use crate::chat::ChatSession;
use crate::content::DEFAULT_CHAT_TITLE;
use crate::storage::KeyValueStore;
use crate::types::{ChatHistoryEntry, ChatHistoryPatch};
use std::sync::Arc;
use time::OffsetDateTime;

pub const HISTORY_KEY: &str = "chatHistory";

/// Conversation summaries shown in the sidebar, newest first.
///
/// The whole list is written back to storage after every mutation; a slot that
/// fails to parse on load is treated as empty history.
pub struct ChatHistoryStore {
    store: Arc<dyn KeyValueStore>,
    entries: Vec<ChatHistoryEntry>,
}

impl ChatHistoryStore {
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let entries = match store.get(HISTORY_KEY) {
            Some(raw) => match serde_json::from_str::<Vec<ChatHistoryEntry>>(&raw) {
                Ok(entries) => entries,
                Err(err) => {
                    tracing::warn!("discarding unreadable chat history: {err}");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };
        Self { store, entries }
    }

    pub fn entries(&self) -> &[ChatHistoryEntry] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&ChatHistoryEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Case-insensitive match on title or last message; empty query matches all.
    pub fn search(&self, query: &str) -> Vec<&ChatHistoryEntry> {
        let needle = query.to_lowercase();
        self.entries
            .iter()
            .filter(|entry| {
                entry.title.to_lowercase().contains(&needle)
                    || entry.last_message.to_lowercase().contains(&needle)
            })
            .collect()
    }

    pub fn add_chat(&mut self, title: Option<&str>) -> String {
        self.add_chat_at(title, OffsetDateTime::now_utc())
    }

    /// Ids are the creation time in epoch milliseconds, bumped past any id
    /// already in the list.
    pub fn add_chat_at(&mut self, title: Option<&str>, now: OffsetDateTime) -> String {
        let mut millis = (now.unix_timestamp_nanos() / 1_000_000) as i64;
        while self.get(&millis.to_string()).is_some() {
            millis += 1;
        }
        let id = millis.to_string();
        self.entries.insert(
            0,
            ChatHistoryEntry {
                id: id.clone(),
                title: title.unwrap_or(DEFAULT_CHAT_TITLE).to_string(),
                last_message: String::new(),
                timestamp: now,
            },
        );
        self.persist();
        id
    }

    pub fn update_chat(&mut self, id: &str, patch: ChatHistoryPatch) {
        let Some(entry) = self.entries.iter_mut().find(|entry| entry.id == id) else {
            return;
        };
        if let Some(title) = patch.title {
            entry.title = title;
        }
        if let Some(last_message) = patch.last_message {
            entry.last_message = last_message;
        }
        if let Some(timestamp) = patch.timestamp {
            entry.timestamp = timestamp;
        }
        self.persist();
    }

    /// Refresh chat `id` from its message list. Called after every change to
    /// the list; a session where the user has not spoken leaves it alone.
    pub fn record_session(&mut self, id: &str, session: &ChatSession) {
        if let Some(patch) = session.history_summary() {
            self.update_chat(id, patch);
        }
    }

    pub fn delete_chat(&mut self, id: &str) {
        self.entries.retain(|entry| entry.id != id);
        self.persist();
    }

    pub fn clear_all(&mut self) {
        self.entries.clear();
        self.persist();
    }

    /// The chat to show on startup: the newest one, or a fresh one when empty.
    pub fn ensure_current(&mut self) -> String {
        match self.entries.first() {
            Some(entry) => entry.id.clone(),
            None => self.add_chat(None),
        }
    }

    fn persist(&self) {
        let serialized = match serde_json::to_string(&self.entries) {
            Ok(serialized) => serialized,
            Err(err) => {
                tracing::error!("failed to serialize chat history: {err}");
                return;
            }
        };
        if let Err(err) = self.store.set(HISTORY_KEY, &serialized) {
            tracing::warn!("failed to persist chat history: {err}");
        }
    }
}
