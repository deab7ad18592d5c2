//! Layout for every page that needs a session.
//!
//! Owns the dashboard polling lifecycle: polling runs while a session
//! exists and this layout is mounted, and stops on unmount or logout.

use dioxus::prelude::*;

use crate::app::{use_store_signals, use_stores};
use crate::Route;

/// Sidebar entries: label, target, admin only.
fn nav_items() -> [(&'static str, Route, bool); 7] {
    [
        ("Dashboard", Route::DashboardView {}, false),
        ("Messages", Route::MessagesView {}, false),
        ("API Settings", Route::ApiSettingsView {}, false),
        ("Knowledge Base", Route::KnowledgeView {}, false),
        ("Bot Settings", Route::BotSettingsView {}, false),
        ("Profile", Route::ProfileView {}, false),
        ("Admin", Route::AdminView {}, true),
    ]
}

#[component]
pub fn ProtectedLayout() -> Element {
    let stores = use_stores();
    let signals = use_store_signals();
    let nav = use_navigator();
    let route = use_route::<Route>();

    let authed = use_memo(move || signals.auth.read().is_authenticated());

    let dashboard = stores.dashboard.clone();
    use_effect(move || {
        if authed() {
            dashboard.start_polling();
        } else {
            dashboard.stop_polling();
            nav.replace(Route::Login {});
        }
    });

    let dashboard = stores.dashboard.clone();
    use_drop(move || dashboard.stop_polling());

    if !authed() {
        return rsx! {
            div { class: "flex min-h-screen items-center justify-center text-slate-500",
                "Redirecting..."
            }
        };
    }

    let auth_state = signals.auth.read().clone();
    let is_admin = auth_state.role().is_some_and(|r| r == chatpilot_shared::Role::Admin);
    let (name, role) = auth_state
        .user()
        .map(|u| (u.name.clone(), u.role.as_str()))
        .unwrap_or_default();

    let auth = stores.auth.clone();

    rsx! {
        div { class: "flex min-h-screen bg-slate-50",
            aside { class: "flex w-60 flex-col border-r border-slate-200 bg-white",
                div { class: "px-6 py-5 text-xl font-bold text-emerald-600", "ChatPilot" }
                nav { class: "flex-1 space-y-1 px-3",
                    for (label, target, admin_only) in nav_items() {
                        if !admin_only || is_admin {
                            {
                                let link_class = if target == route {
                                    "block rounded-lg bg-emerald-50 px-3 py-2 text-sm font-semibold text-emerald-700"
                                } else {
                                    "block rounded-lg px-3 py-2 text-sm text-slate-600 hover:bg-slate-100"
                                };
                                rsx! {
                                    Link { key: "{label}", class: link_class, to: target, "{label}" }
                                }
                            }
                        }
                    }
                }
                div { class: "border-t border-slate-200 px-6 py-4",
                    p { class: "text-sm font-medium text-slate-900", "{name}" }
                    p { class: "text-xs uppercase tracking-wide text-slate-400", "{role}" }
                    button {
                        class: "mt-3 text-sm font-semibold text-red-600 hover:text-red-500",
                        onclick: move |_| {
                            auth.logout();
                            nav.replace(Route::Login {});
                        },
                        "Log out"
                    }
                }
            }
            main { class: "flex-1 overflow-y-auto p-8",
                Outlet::<Route> {}
            }
        }
    }
}
