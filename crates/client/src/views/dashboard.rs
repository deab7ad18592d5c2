//! Overview page: bot connection, recent messages, active AI provider.

use chatpilot_shared::ConnectionStatus;
use dioxus::prelude::*;

use crate::app::{use_store_signals, use_stores};
use crate::components::ui::{Button, ButtonVariant, Card, Notice, NoticeKind, StatCard};
use crate::Route;

const RECENT_MESSAGES: usize = 5;

#[component]
pub fn DashboardView() -> Element {
    let stores = use_stores();
    let signals = use_store_signals();

    // Polling only starts one interval from now; load once on mount.
    let dashboard = stores.dashboard.clone();
    use_future(move || {
        let dashboard = dashboard.clone();
        async move {
            let _ = dashboard.refresh_all().await;
        }
    });

    let state = signals.dashboard.read().clone();
    let now = chrono::Utc::now();
    let refresh = stores.dashboard.clone();
    let clear = stores.dashboard.clone();

    let active_provider = state
        .active_provider()
        .map(|p| p.provider.display_name().to_string())
        .unwrap_or_else(|| "None configured".to_string());
    let last_message = state
        .messages
        .first()
        .map(|m| m.age_label(now))
        .unwrap_or_else(|| "No messages yet".to_string());

    rsx! {
        div { class: "space-y-6",
            div { class: "flex items-center justify-between",
                h1 { class: "text-2xl font-bold text-slate-900", "Dashboard" }
                Button {
                    variant: ButtonVariant::Secondary,
                    busy: state.is_loading(),
                    onclick: move |_| {
                        let refresh = refresh.clone();
                        spawn(async move {
                            let _ = refresh.refresh_all().await;
                        });
                    },
                    "Refresh"
                }
            }

            Notice {
                kind: NoticeKind::Error,
                message: state.error.clone(),
                on_dismiss: move |_| clear.clear_error(),
            }

            div { class: "grid grid-cols-1 gap-4 md:grid-cols-3",
                StatCard { label: "Connection".to_string(), value: state.status.label().to_string() }
                StatCard {
                    label: "Messages".to_string(),
                    value: state.messages.len().to_string(),
                    hint: last_message,
                }
                StatCard { label: "Active AI provider".to_string(), value: active_provider }
            }

            ConnectionPanel { status: state.status.clone() }

            Card { title: "Recent messages".to_string(),
                if state.messages.is_empty() {
                    p { class: "text-sm text-slate-500", "No messages yet." }
                }
                ul { class: "divide-y divide-slate-100",
                    for message in state.messages.iter().take(RECENT_MESSAGES) {
                        li { key: "{message.id}", class: "py-3",
                            div { class: "flex justify-between text-sm",
                                span { class: "font-medium text-slate-900", "{message.from}" }
                                span { class: "text-slate-400", "{message.age_label(now)}" }
                            }
                            p { class: "mt-1 truncate text-sm text-slate-600", "{message.body}" }
                        }
                    }
                }
                Link { class: "mt-3 inline-block text-sm font-semibold text-emerald-600", to: Route::MessagesView {}, "View all messages" }
            }
        }
    }
}

#[component]
fn ConnectionPanel(status: ConnectionStatus) -> Element {
    rsx! {
        Card { title: "Messaging account".to_string(),
            match status {
                ConnectionStatus::Connected { last_connected_at } => {
                    let since = last_connected_at.format("%Y-%m-%d %H:%M").to_string();
                    rsx! {
                        p { class: "text-sm text-emerald-700", "Connected since {since}" }
                    }
                }
                ConnectionStatus::QrNeeded { qr_image: Some(image) } => rsx! {
                    p { class: "mb-3 text-sm text-slate-600",
                        "Scan this code from the messaging app to link the bot."
                    }
                    img { class: "h-48 w-48 rounded border border-slate-200", src: "{image}", alt: "QR code" }
                },
                ConnectionStatus::QrNeeded { qr_image: None } => rsx! {
                    p { class: "text-sm text-slate-500", "Waiting for QR code..." }
                },
                ConnectionStatus::Disconnected => rsx! {
                    p { class: "text-sm text-slate-500", "The bot is not connected." }
                },
            }
        }
    }
}
