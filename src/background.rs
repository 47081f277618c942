use crate::content::ERROR_INVALID_SELECTION;
use crate::storage::KeyValueStore;
use crate::types::Background;
use once_cell::sync::Lazy;
use std::sync::Arc;

pub const BACKGROUND_KEY: &str = "selectedBackground";

pub static AVAILABLE_BACKGROUNDS: Lazy<Vec<Background>> = Lazy::new(|| {
    [
        (
            "default",
            "デフォルト (山)",
            "https://images.unsplash.com/photo-1506905925346-21bda4d32df4?q=80&w=2070&auto=format&fit=crop",
            "/backgrounds/thumb-mountain.jpg",
        ),
        (
            "goldrush",
            "GOLD RUSH",
            "/backgrounds/GOLDRUSH.jpg",
            "/backgrounds/thumb-goldrush.jpg",
        ),
        ("ocean", "深海", "/backgrounds/ocean.jpg", "/backgrounds/thumb-ocean.jpg"),
        ("space", "宇宙", "/backgrounds/space.jpg", "/backgrounds/thumb-space.jpg"),
        ("forest", "森林", "/backgrounds/forest.jpg", "/backgrounds/thumb-forest.jpg"),
        ("city", "都市", "/backgrounds/city.jpg", "/backgrounds/thumb-city.jpg"),
    ]
    .into_iter()
    .map(|(id, name, path, thumbnail)| Background {
        id: id.to_string(),
        name: name.to_string(),
        path: path.to_string(),
        thumbnail: thumbnail.to_string(),
    })
    .collect()
});

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BackgroundError {
    #[error("unknown background: {0}")]
    Unknown(String),

    #[error("{}", ERROR_INVALID_SELECTION)]
    InvalidSelection,
}

/// The selected backdrop, persisted as the full catalog object.
pub struct BackgroundStore {
    store: Arc<dyn KeyValueStore>,
    selected: Background,
}

impl BackgroundStore {
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let selected = store
            .get(BACKGROUND_KEY)
            .and_then(|raw| match serde_json::from_str::<Background>(&raw) {
                Ok(background) => Some(background),
                Err(err) => {
                    tracing::warn!("failed to read saved background: {err}");
                    None
                }
            })
            .unwrap_or_else(|| AVAILABLE_BACKGROUNDS[0].clone());
        Self { store, selected }
    }

    pub fn selected(&self) -> &Background {
        &self.selected
    }

    pub fn select(&mut self, id: &str) -> Result<&Background, BackgroundError> {
        let background = AVAILABLE_BACKGROUNDS
            .iter()
            .find(|bg| bg.id == id)
            .ok_or_else(|| BackgroundError::Unknown(id.to_string()))?;
        self.selected = background.clone();
        self.persist();
        Ok(&self.selected)
    }

    /// Selection from the numbered picker, where `1` is the first entry.
    pub fn select_by_number(&mut self, input: &str) -> Result<&Background, BackgroundError> {
        let index = input
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .filter(|&index| index < AVAILABLE_BACKGROUNDS.len())
            .ok_or(BackgroundError::InvalidSelection)?;
        let id = AVAILABLE_BACKGROUNDS[index].id.clone();
        self.select(&id)
    }

    /// Prompt text for the numbered picker.
    pub fn picker_prompt() -> String {
        let lines = AVAILABLE_BACKGROUNDS
            .iter()
            .enumerate()
            .map(|(index, bg)| format!("{}. {}", index + 1, bg.name))
            .collect::<Vec<_>>()
            .join("\n");
        format!("背景を選択してください（番号を入力）:\n{lines}")
    }

    fn persist(&self) {
        match serde_json::to_string(&self.selected) {
            Ok(serialized) => {
                if let Err(err) = self.store.set(BACKGROUND_KEY, &serialized) {
                    tracing::warn!("failed to persist background: {err}");
                }
            }
            Err(err) => tracing::error!("failed to serialize background: {err}"),
        }
    }
}
