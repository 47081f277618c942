use crate::background::{AVAILABLE_BACKGROUNDS, BackgroundStore};
use crate::chat::format_history_date;
use crate::types::ChatHistoryEntry;
use crate::ui::Controller;
use dioxus::prelude::*;
use time::OffsetDateTime;

#[component]
pub fn Sidebar(controller: Controller) -> Element {
    let mut query = use_signal(String::new);
    let mut picking_background = use_signal(|| false);

    let current = controller.current_chat.read().clone();
    let entries: Vec<ChatHistoryEntry> = controller
        .history
        .read()
        .search(&query())
        .into_iter()
        .cloned()
        .collect();
    let now = OffsetDateTime::now_utc();

    rsx! {
        aside { class: "sidebar",
            button {
                class: "btn btn-primary sidebar-new",
                onclick: move |_| controller.new_chat(),
                "＋ 新しいチャット"
            }
            input {
                class: "sidebar-search",
                r#type: "search",
                placeholder: "チャットを検索",
                value: "{query}",
                oninput: move |ev| query.set(ev.value()),
            }
            ul { class: "history-list",
                for entry in entries {
                    HistoryItem {
                        key: "{entry.id}",
                        controller,
                        active: entry.id == current,
                        date: format_history_date(entry.timestamp, now),
                        entry,
                    }
                }
            }
            div { class: "sidebar-footer",
                button {
                    class: "btn btn-ghost",
                    onclick: move |_| picking_background.toggle(),
                    "背景を変更"
                }
                if picking_background() {
                    BackgroundPicker { controller }
                }
            }
        }
    }
}

#[component]
fn HistoryItem(
    controller: Controller,
    entry: ChatHistoryEntry,
    active: bool,
    date: String,
) -> Element {
    let open_id = entry.id.clone();
    let delete_id = entry.id.clone();
    let class = if active { "history-item active" } else { "history-item" };
    rsx! {
        li { class,
            onclick: move |_| controller.open_chat(open_id.clone()),
            div { class: "history-head",
                span { class: "history-title", "{entry.title}" }
                span { class: "history-date", "{date}" }
            }
            p { class: "history-preview", "{entry.last_message}" }
            button {
                class: "action-btn",
                title: "Delete chat",
                onclick: move |ev| {
                    ev.stop_propagation();
                    controller.delete_chat(&delete_id);
                },
                "削除"
            }
        }
    }
}

fn numbered_prompt_script() -> String {
    format!("return prompt({:?});", BackgroundStore::picker_prompt())
}

/// Ask for a catalog number with the browser prompt. Cancelling does
/// nothing; anything that is not a listed number gets an alert.
async fn pick_by_number(mut backgrounds: Signal<BackgroundStore>) {
    let answer = match document::eval(&numbered_prompt_script()).await {
        Ok(answer) => answer,
        Err(err) => {
            tracing::warn!("background prompt failed: {err:?}");
            return;
        }
    };
    let Some(input) = answer.as_str() else {
        return;
    };
    if let Err(err) = backgrounds.write().select_by_number(input) {
        tracing::warn!("background selection failed: {err}");
        let _ = document::eval(&format!("alert({:?});", err.to_string()));
    }
}

#[component]
fn BackgroundPicker(controller: Controller) -> Element {
    let selected = controller.backgrounds.read().selected().id.clone();
    rsx! {
        button {
            class: "btn btn-ghost",
            onclick: move |_| {
                spawn(pick_by_number(controller.backgrounds));
            },
            "番号で選択"
        }
        div { class: "background-grid",
            for background in AVAILABLE_BACKGROUNDS.iter() {
                button {
                    key: "{background.id}",
                    class: if background.id == selected { "background-thumb active" } else { "background-thumb" },
                    title: "{background.name}",
                    onclick: {
                        let id = background.id.clone();
                        move |_| {
                            let mut backgrounds = controller.backgrounds;
                            if let Err(err) = backgrounds.write().select(&id) {
                                tracing::warn!("background selection failed: {err}");
                            }
                        }
                    },
                    img { src: "{background.thumbnail}", alt: "{background.name}" }
                    span { "{background.name}" }
                }
            }
        }
    }
}
