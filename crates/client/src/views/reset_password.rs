use dioxus::prelude::*;

use crate::app::{use_store_signals, use_stores};
use crate::components::ui::{Button, Card, Field, InputType, Notice, NoticeKind};
use crate::Route;

#[component]
pub fn ResetPassword() -> Element {
    let stores = use_stores();
    let signals = use_store_signals();
    let mut email = use_signal(String::new);
    let mut sent = use_signal(|| false);

    let auth_state = signals.auth.read().clone();
    let auth = stores.auth.clone();

    rsx! {
        div { class: "flex min-h-screen items-center justify-center bg-slate-50 px-4",
            div { class: "w-full max-w-md",
                Card {
                    title: "Reset your password".to_string(),
                    subtitle: "We'll email you a reset link".to_string(),
                    Notice { kind: NoticeKind::Error, message: auth_state.error.clone() }
                    if sent() {
                        Notice {
                            kind: NoticeKind::Success,
                            message: format!("If an account exists for {}, a reset link is on its way.", email()),
                        }
                    }
                    form {
                        class: "space-y-4",
                        onsubmit: move |e| {
                            e.prevent_default();
                            let auth = auth.clone();
                            async move {
                                sent.set(false);
                                if auth.reset_password(&email()).await.is_ok() {
                                    sent.set(true);
                                }
                            }
                        },
                        Field {
                            label: "Email".to_string(),
                            value: email(),
                            input_type: InputType::Email,
                            oninput: move |e: FormEvent| email.set(e.value()),
                        }
                        Button {
                            r#type: "submit".to_string(),
                            class: "w-full".to_string(),
                            busy: auth_state.is_loading,
                            "Send reset link"
                        }
                    }
                    p { class: "mt-4 text-center text-sm",
                        Link { class: "text-emerald-600 hover:text-emerald-500", to: Route::Login {}, "Back to sign in" }
                    }
                }
            }
        }
    }
}
