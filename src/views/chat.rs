use crate::chat::format_clock;
use crate::content::GREETING_POPUP;
use crate::sequencer::typewriter::{POPUP_CHAR_INTERVAL, greeting};
use crate::types::{ChatMessage, Role};
use crate::ui::Controller;
use crate::views::shared::markdown_to_html;
use dioxus::events::Key;
use dioxus::prelude::*;
use std::time::Instant;

fn role_class(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Assistant | Role::System => "assistant",
    }
}

#[component]
pub fn ChatView(controller: Controller, logged_in_at: Option<Instant>) -> Element {
    let mut input = use_signal(String::new);
    let session = controller.session;

    let mut send_message = move |text: String| {
        if text.trim().is_empty() || session.peek().is_loading() {
            return;
        }
        input.set(String::new());
        controller.submit(text.trim().to_string());
    };

    let snapshot = session.read();
    let loading = snapshot.is_loading();
    let error = snapshot.error().map(str::to_string);
    let messages: Vec<ChatMessage> = snapshot
        .messages()
        .iter()
        .filter(|msg| msg.role != Role::System)
        .cloned()
        .collect();
    drop(snapshot);

    rsx! {
        section { class: "chat-pane",
            div { class: "chat-toolbar",
                span { class: "chat-title", "AIアシスタント" }
                button {
                    class: "btn btn-ghost",
                    title: "Clear conversation",
                    onclick: move |_| controller.clear_chat(),
                    "クリア"
                }
            }
            if let Some(at) = logged_in_at {
                GreetingPopup { logged_in_at: at }
            }
            div { id: "chat-list", class: "chat-list",
                for msg in messages {
                    MessageRow { key: "{msg.id}", controller, message: msg }
                }
                if loading {
                    div { class: "message-row assistant",
                        div { class: "bubble assistant",
                            span { class: "shimmer-text", "考え中…" }
                        }
                    }
                }
                if let Some(error) = error {
                    div { class: "message-row assistant",
                        div { class: "bubble error", "{error}" }
                    }
                }
            }
            form { class: "composer",
                onsubmit: move |ev| {
                    ev.prevent_default();
                    send_message(input());
                },
                textarea {
                    rows: "1",
                    placeholder: "ビジネスアイデアを入力してください",
                    value: "{input}",
                    oninput: move |ev| input.set(ev.value()),
                    onkeydown: move |ev| {
                        if ev.key() == Key::Enter && !ev.modifiers().shift() {
                            ev.prevent_default();
                            send_message(input());
                        }
                    },
                    disabled: loading,
                }
                button {
                    class: "btn btn-primary",
                    r#type: "submit",
                    disabled: loading || input().trim().is_empty(),
                    "送信"
                }
            }
        }
    }
}

#[component]
fn MessageRow(controller: Controller, message: ChatMessage) -> Element {
    let class = role_class(message.role);
    let id = message.id;
    let body = match message.role {
        Role::User => rsx! { "{message.content}" },
        _ => {
            let html = markdown_to_html(&message.content);
            rsx! { div { class: "md", dangerous_inner_html: "{html}" } }
        }
    };
    rsx! {
        div { class: "message-row {class}",
            if message.role != Role::User {
                div { class: "avatar assistant", "G" }
            }
            div { class: "message-stack",
                div { class: "bubble {class}", {body} }
                div { class: "message-meta",
                    span { class: "message-timestamp", "{format_clock(message.timestamp)}" }
                    button {
                        class: "action-btn",
                        title: "Delete message",
                        onclick: move |_| controller.delete_message(id),
                        "削除"
                    }
                }
            }
        }
    }
}

/// The assistant's greeting, typed out a second after login.
#[component]
fn GreetingPopup(logged_in_at: Instant) -> Element {
    let mut shown = use_signal(|| Option::<&'static str>::None);
    let mut dismissed = use_signal(|| false);

    use_future(move || async move {
        loop {
            let text = greeting(logged_in_at.elapsed());
            shown.set(text);
            if text == Some(GREETING_POPUP) {
                break;
            }
            tokio::time::sleep(POPUP_CHAR_INTERVAL).await;
        }
    });

    let Some(text) = shown() else {
        return rsx! {};
    };
    if dismissed() {
        return rsx! {};
    }
    rsx! {
        div { class: "greeting-popup",
            onclick: move |_| dismissed.set(true),
            div { class: "avatar assistant", "G" }
            p { "{text}" }
        }
    }
}
