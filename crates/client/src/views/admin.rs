//! User management, visible to admins only.

use chatpilot_shared::{endpoints, AccountStatus, AdminUser};
use dioxus::prelude::*;

use crate::app::{use_store_signals, use_stores};
use crate::components::ui::{Button, ButtonVariant, Card, Notice, NoticeKind};
use crate::hooks::{use_api_query, use_query_client};

#[component]
pub fn AdminView() -> Element {
    let signals = use_store_signals();
    let is_admin = signals
        .auth
        .read()
        .role()
        .is_some_and(|r| r == chatpilot_shared::Role::Admin);

    if !is_admin {
        return rsx! {
            Card { title: "Access denied".to_string(),
                p { class: "text-sm text-slate-500", "Only administrators can manage users." }
            }
        };
    }

    rsx! { UserTable {} }
}

#[component]
fn UserTable() -> Element {
    let stores = use_stores();
    let users = use_api_query::<Vec<AdminUser>>(endpoints::ADMIN_USERS);
    let queries = use_query_client();
    let mut search = use_signal(String::new);
    let mut status_filter = use_signal(|| None::<AccountStatus>);
    let mut error = use_signal(|| None::<String>);

    let own_id = stores.auth.user().map(|u| u.id).unwrap_or_default();
    let term = search();
    let filter = status_filter();
    let (rows, load_error) = match &*users.read() {
        Some(Ok(list)) => (
            list.iter()
                .filter(|u| u.matches(&term, filter))
                .cloned()
                .collect::<Vec<_>>(),
            None,
        ),
        Some(Err(e)) => (Vec::new(), Some(e.to_string())),
        None => (Vec::new(), None),
    };

    rsx! {
        div { class: "space-y-6",
            h1 { class: "text-2xl font-bold text-slate-900", "User Management" }
            Notice { kind: NoticeKind::Error, message: load_error.or(error()) }

            div { class: "flex gap-3",
                input {
                    class: "w-full max-w-sm rounded-lg border border-slate-300 px-3 py-2 text-sm",
                    placeholder: "Search by name or email",
                    value: "{term}",
                    oninput: move |e| search.set(e.value()),
                }
                select {
                    class: "rounded-lg border border-slate-300 px-3 py-2 text-sm",
                    onchange: move |e| {
                        status_filter.set(match e.value().as_str() {
                            "active" => Some(AccountStatus::Active),
                            "suspended" => Some(AccountStatus::Suspended),
                            _ => None,
                        })
                    },
                    option { value: "all", "All statuses" }
                    option { value: "active", "Active" }
                    option { value: "suspended", "Suspended" }
                }
            }

            Card {
                table { class: "w-full text-left text-sm",
                    thead {
                        tr { class: "text-xs uppercase text-slate-400",
                            th { class: "py-2", "Name" }
                            th { "Email" }
                            th { "Role" }
                            th { "Status" }
                            th {}
                        }
                    }
                    tbody {
                        for user in rows {
                            {
                                let queries = queries.clone();
                                let is_self = user.id == own_id;
                                let (next, action) = match user.status {
                                    AccountStatus::Active => (AccountStatus::Suspended, "Suspend"),
                                    AccountStatus::Suspended => (AccountStatus::Active, "Activate"),
                                };
                                let status_label = match user.status {
                                    AccountStatus::Active => "Active",
                                    AccountStatus::Suspended => "Suspended",
                                };
                                let id = user.id.clone();
                                rsx! {
                                    tr { key: "{user.id}", class: "border-t border-slate-100",
                                        td { class: "py-3 font-medium text-slate-900", "{user.name}" }
                                        td { class: "text-slate-600", "{user.email}" }
                                        td { class: "text-slate-600", "{user.role.as_str()}" }
                                        td { class: "text-slate-600", "{status_label}" }
                                        td { class: "text-right",
                                            if !is_self {
                                                Button {
                                                    variant: if next == AccountStatus::Suspended { ButtonVariant::Danger } else { ButtonVariant::Secondary },
                                                    onclick: move |_| {
                                                        let queries = queries.clone();
                                                        let id = id.clone();
                                                        spawn(async move {
                                                            if let Err(e) = queries.mutate(queries.api().set_user_status(&id, next)).await {
                                                                error.set(Some(format!("Failed to update user: {e}")));
                                                            }
                                                        });
                                                    },
                                                    "{action}"
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
