//! Integration tests for persisted state
//!
//! Chat history and the background choice written through a file store must
//! survive a reload from the same directory.

use goldrush::background::{AVAILABLE_BACKGROUNDS, BACKGROUND_KEY, BackgroundError, BackgroundStore};
use goldrush::history::{ChatHistoryStore, HISTORY_KEY};
use goldrush::storage::{FileStore, KeyValueStore};
use goldrush::types::ChatHistoryPatch;
use std::sync::Arc;
use time::macros::datetime;

fn file_store(dir: &tempfile::TempDir) -> Arc<dyn KeyValueStore> {
    Arc::new(FileStore::new(dir.path().join("storage")))
}

mod file_store_tests {
    use super::*;

    #[test]
    fn set_get_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        store.set("greeting", "\"hello\"").unwrap();
        assert_eq!(store.get("greeting").as_deref(), Some("\"hello\""));

        store.remove("greeting").unwrap();
        assert_eq!(store.get("greeting"), None);
    }

    #[test]
    fn removing_a_missing_key_is_fine() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        store.remove("never-written").unwrap();
    }

    #[test]
    fn creates_its_directory_on_first_write() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("nested").join("storage");
        let store = FileStore::new(&root);

        store.set("key", "value").unwrap();
        assert!(root.is_dir());
        assert_eq!(store.root(), root.as_path());
    }

    #[test]
    fn keys_with_path_characters_stay_inside_the_root() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        store.set("../escape", "x").unwrap();
        assert_eq!(store.get("../escape").as_deref(), Some("x"));
        assert!(!dir.path().parent().unwrap().join("escape.json").exists());
    }
}

mod history_tests {
    use super::*;

    #[test]
    fn history_survives_a_reload() {
        let dir = tempfile::tempdir().unwrap();
        let store = file_store(&dir);

        let mut history = ChatHistoryStore::load(store.clone());
        let first = history.add_chat_at(None, datetime!(2024-05-01 09:00 UTC));
        let second = history.add_chat_at(Some("宇宙ビジネス"), datetime!(2024-05-02 09:00 UTC));
        history.update_chat(
            &first,
            ChatHistoryPatch {
                last_message: Some("農業ドローン".into()),
                timestamp: Some(datetime!(2024-05-03 10:30:15.123456789 UTC)),
                ..ChatHistoryPatch::title("農業")
            },
        );

        let reloaded = ChatHistoryStore::load(store);
        assert_eq!(reloaded.entries(), history.entries());
        let ids: Vec<&str> = reloaded.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec![second.as_str(), first.as_str()]);
        let entry = reloaded.get(&first).unwrap();
        assert_eq!(entry.title, "農業");
        assert_eq!(entry.last_message, "農業ドローン");
        assert_eq!(entry.timestamp, datetime!(2024-05-03 10:30:15.123456789 UTC));
        assert_eq!(
            reloaded.get(&second).unwrap().timestamp,
            datetime!(2024-05-02 09:00 UTC)
        );
    }

    #[test]
    fn corrupt_history_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = file_store(&dir);
        store.set(HISTORY_KEY, "{not json").unwrap();

        let mut history = ChatHistoryStore::load(store);
        assert!(history.entries().is_empty());

        let id = history.ensure_current();
        assert_eq!(history.entries().len(), 1);
        assert_eq!(history.ensure_current(), id);
    }

    #[test]
    fn deleting_persists() {
        let dir = tempfile::tempdir().unwrap();
        let store = file_store(&dir);

        let mut history = ChatHistoryStore::load(store.clone());
        let id = history.add_chat(Some("temp"));
        history.delete_chat(&id);

        assert!(ChatHistoryStore::load(store).entries().is_empty());
    }
}

mod background_tests {
    use super::*;

    #[test]
    fn selection_survives_a_reload() {
        let dir = tempfile::tempdir().unwrap();
        let store = file_store(&dir);

        let mut backgrounds = BackgroundStore::load(store.clone());
        assert_eq!(backgrounds.selected(), &AVAILABLE_BACKGROUNDS[0]);
        backgrounds.select("ocean").unwrap();

        let reloaded = BackgroundStore::load(store.clone());
        assert_eq!(reloaded.selected().id, "ocean");
        assert!(store.get(BACKGROUND_KEY).unwrap().contains("/backgrounds/ocean.jpg"));
    }

    #[test]
    fn invalid_numbers_leave_the_selection_alone() {
        let dir = tempfile::tempdir().unwrap();
        let mut backgrounds = BackgroundStore::load(file_store(&dir));

        for input in ["0", "7", "abc", ""] {
            assert_eq!(
                backgrounds.select_by_number(input).unwrap_err(),
                BackgroundError::InvalidSelection
            );
        }
        assert_eq!(backgrounds.selected().id, "default");

        assert_eq!(backgrounds.select_by_number(" 4 ").unwrap().id, "space");
    }
}
