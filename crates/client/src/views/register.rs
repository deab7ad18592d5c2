use dioxus::prelude::*;

use crate::app::{use_store_signals, use_stores};
use crate::components::ui::{Button, Card, Field, InputType, Notice, NoticeKind};
use crate::error::ClientError;
use crate::forms::RegisterForm;
use crate::Route;

#[component]
pub fn Register() -> Element {
    let stores = use_stores();
    let signals = use_store_signals();
    let nav = use_navigator();
    let mut form = use_signal(RegisterForm::default);
    let mut invalid = use_signal(|| None::<(&'static str, String)>);

    let field_error = move |field: &str| {
        invalid
            .read()
            .as_ref()
            .filter(|(f, _)| *f == field)
            .map(|(_, message)| message.clone())
    };

    let auth_state = signals.auth.read().clone();
    let auth = stores.auth.clone();
    let clear_auth = stores.auth.clone();
    let current = form.read().clone();

    rsx! {
        div { class: "flex min-h-screen items-center justify-center bg-slate-50 px-4",
            div { class: "w-full max-w-md",
                Card {
                    title: "Create an account".to_string(),
                    subtitle: "Start automating replies in minutes".to_string(),
                    Notice {
                        kind: NoticeKind::Error,
                        message: if invalid.read().is_none() { auth_state.error.clone() } else { None },
                        on_dismiss: move |_| clear_auth.clear_error(),
                    }
                    form {
                        class: "space-y-4",
                        onsubmit: move |e| {
                            e.prevent_default();
                            let auth = auth.clone();
                            async move {
                                invalid.set(None);
                                let submitted = form.read().clone();
                                match auth.register(&submitted).await {
                                    Ok(_) => {
                                        nav.push(Route::DashboardView {});
                                    }
                                    Err(ClientError::Validation { field, message }) => {
                                        invalid.set(Some((field, message)));
                                    }
                                    Err(_) => {}
                                }
                            }
                        },
                        Field {
                            label: "Full name".to_string(),
                            value: current.name.clone(),
                            error: field_error("name"),
                            oninput: move |e: FormEvent| form.write().name = e.value(),
                        }
                        Field {
                            label: "Email".to_string(),
                            value: current.email.clone(),
                            input_type: InputType::Email,
                            error: field_error("email"),
                            oninput: move |e: FormEvent| form.write().email = e.value(),
                        }
                        Field {
                            label: "Password".to_string(),
                            value: current.password.clone(),
                            input_type: InputType::Password,
                            error: field_error("password"),
                            oninput: move |e: FormEvent| form.write().password = e.value(),
                        }
                        Field {
                            label: "Confirm password".to_string(),
                            value: current.confirm_password.clone(),
                            input_type: InputType::Password,
                            error: field_error("confirm_password"),
                            oninput: move |e: FormEvent| form.write().confirm_password = e.value(),
                        }
                        Button {
                            r#type: "submit".to_string(),
                            class: "w-full".to_string(),
                            busy: auth_state.is_loading,
                            "Create account"
                        }
                    }
                    p { class: "mt-4 text-center text-sm text-slate-500",
                        "Already have an account? "
                        Link { class: "font-semibold text-emerald-600 hover:text-emerald-500", to: Route::Login {}, "Sign in" }
                    }
                }
            }
        }
    }
}
