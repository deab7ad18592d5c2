use chatpilot_shared::{DeliveryState, Message};
use dioxus::prelude::*;

use crate::app::{use_store_signals, use_stores};
use crate::components::ui::{Card, Notice, NoticeKind};

fn delivery_badge(state: DeliveryState) -> (&'static str, &'static str) {
    match state {
        DeliveryState::Sent => ("Sent", "bg-slate-100 text-slate-600"),
        DeliveryState::Delivered => ("Delivered", "bg-blue-100 text-blue-700"),
        DeliveryState::Read => ("Read", "bg-emerald-100 text-emerald-700"),
        DeliveryState::Failed => ("Failed", "bg-red-100 text-red-700"),
    }
}

#[component]
pub fn MessagesView() -> Element {
    let stores = use_stores();
    let signals = use_store_signals();
    let mut search = use_signal(String::new);

    let dashboard = stores.dashboard.clone();
    use_future(move || {
        let dashboard = dashboard.clone();
        async move {
            let _ = dashboard.fetch_messages().await;
        }
    });

    let state = signals.dashboard.read().clone();
    let term = search();
    let visible: Vec<Message> = state
        .messages
        .iter()
        .filter(|m| m.matches(&term))
        .cloned()
        .collect();
    let now = chrono::Utc::now();

    rsx! {
        div { class: "space-y-6",
            h1 { class: "text-2xl font-bold text-slate-900", "Messages" }
            Notice { kind: NoticeKind::Error, message: state.error.clone() }
            input {
                class: "w-full max-w-sm rounded-lg border border-slate-300 px-3 py-2 text-sm",
                placeholder: "Search messages or numbers",
                value: "{term}",
                oninput: move |e| search.set(e.value()),
            }
            Card {
                if visible.is_empty() {
                    p { class: "text-sm text-slate-500", "No messages found." }
                }
                ul { class: "divide-y divide-slate-100",
                    for message in visible {
                        {
                            let (label, badge) = delivery_badge(message.delivery_state);
                            rsx! {
                                li { key: "{message.id}", class: "py-4",
                                    div { class: "flex items-center justify-between",
                                        span { class: "text-sm font-semibold text-slate-900", "{message.from}" }
                                        div { class: "flex items-center gap-2",
                                            span { class: "rounded-full px-2 py-0.5 text-xs {badge}", "{label}" }
                                            span { class: "text-xs text-slate-400", "{message.age_label(now)}" }
                                        }
                                    }
                                    p { class: "mt-2 text-sm text-slate-700", "{message.body}" }
                                    if let Some(response) = &message.response {
                                        div { class: "mt-2 rounded-lg bg-emerald-50 p-3 text-sm text-emerald-900",
                                            p { "{response}" }
                                            if let Some(provider) = &message.ai_provider {
                                                p { class: "mt-1 text-xs text-emerald-600",
                                                    "{provider} {message.ai_model.clone().unwrap_or_default()}"
                                                }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
