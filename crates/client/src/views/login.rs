use dioxus::prelude::*;

use crate::app::{use_store_signals, use_stores};
use crate::components::ui::{Button, Card, Field, InputType, Notice, NoticeKind};
use crate::fixtures::{SEEDED_ADMIN, SEEDED_USER};
use crate::Route;

#[component]
pub fn Login() -> Element {
    let stores = use_stores();
    let signals = use_store_signals();
    let nav = use_navigator();
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);

    // Already signed in (e.g. restored session): skip the form.
    use_effect(move || {
        if signals.auth.read().is_authenticated() {
            nav.replace(Route::DashboardView {});
        }
    });

    let auth_state = signals.auth.read().clone();
    let auth = stores.auth.clone();
    let clear_auth = stores.auth.clone();

    rsx! {
        div { class: "flex min-h-screen items-center justify-center bg-slate-50 px-4",
            div { class: "w-full max-w-md",
                Card {
                    title: "Sign in to ChatPilot".to_string(),
                    subtitle: "Manage your messaging bot".to_string(),
                    Notice {
                        kind: NoticeKind::Error,
                        message: auth_state.error.clone(),
                        on_dismiss: move |_| clear_auth.clear_error(),
                    }
                    form {
                        class: "space-y-4",
                        onsubmit: move |e| {
                            e.prevent_default();
                            let auth = auth.clone();
                            async move {
                                if auth.is_loading() {
                                    return;
                                }
                                // The effect above navigates once the session lands.
                                let _ = auth.login(&email(), &password()).await;
                            }
                        },
                        Field {
                            label: "Email".to_string(),
                            value: email(),
                            input_type: InputType::Email,
                            placeholder: "you@example.com".to_string(),
                            oninput: move |e: FormEvent| email.set(e.value()),
                        }
                        Field {
                            label: "Password".to_string(),
                            value: password(),
                            input_type: InputType::Password,
                            oninput: move |e: FormEvent| password.set(e.value()),
                        }
                        Button {
                            r#type: "submit".to_string(),
                            class: "w-full".to_string(),
                            busy: auth_state.is_loading,
                            if auth_state.is_loading { "Signing in..." } else { "Sign in" }
                        }
                    }
                    div { class: "mt-4 flex justify-between text-sm",
                        Link { class: "text-emerald-600 hover:text-emerald-500", to: Route::Register {}, "Create an account" }
                        Link { class: "text-slate-500 hover:text-slate-700", to: Route::ResetPassword {}, "Forgot password?" }
                    }
                    div { class: "mt-6 rounded-lg bg-slate-100 p-3 text-xs text-slate-500",
                        p { class: "font-semibold", "Demo accounts" }
                        p { "{SEEDED_ADMIN.email} / {SEEDED_ADMIN.password}" }
                        p { "{SEEDED_USER.email} / {SEEDED_USER.password}" }
                    }
                }
            }
        }
    }
}
