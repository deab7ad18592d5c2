use chatpilot_shared::{endpoints, ChangePasswordRequest, UpdateProfileRequest, User, UserProfile};
use dioxus::prelude::*;

use crate::app::use_stores;
use crate::components::ui::{Button, Card, Field, InputType, Notice, NoticeKind};
use crate::forms::{self, ChangePasswordForm};
use crate::hooks::{use_api_query, use_query_client};

#[component]
pub fn ProfileView() -> Element {
    let stores = use_stores();
    let profile = use_api_query::<UserProfile>(endpoints::USER_PROFILE);
    let queries = use_query_client();

    let mut name = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut loaded = use_signal(|| false);
    let mut passwords = use_signal(ChangePasswordForm::default);
    let mut saving = use_signal(|| false);
    let mut error = use_signal(|| None::<String>);
    let mut success = use_signal(|| None::<String>);

    use_effect(move || {
        if let Some(Ok(p)) = &*profile.read() {
            if !*loaded.peek() {
                name.set(p.name.clone());
                email.set(p.email.clone());
                loaded.set(true);
            }
        }
    });

    let save_client = queries.clone();
    let auth = stores.auth.clone();
    let save_profile = move |_: MouseEvent| {
        let queries = save_client.clone();
        let auth = auth.clone();
        spawn(async move {
            error.set(None);
            success.set(None);
            if let Err(e) = forms::validate_email(&email()) {
                error.set(Some(e.to_string()));
                return;
            }
            saving.set(true);
            let update = UpdateProfileRequest {
                name: name().trim().to_string(),
                email: email(),
            };
            match queries.mutate_message(queries.api().update_profile(&update)).await {
                Ok(message) => {
                    if let Some(user) = auth.user() {
                        auth.set_user(User {
                            name: update.name,
                            email: update.email,
                            ..user
                        });
                    }
                    success.set(Some(message));
                }
                Err(e) => error.set(Some(e.to_string())),
            }
            saving.set(false);
        });
    };

    let change_password = move |_: MouseEvent| {
        let queries = queries.clone();
        spawn(async move {
            error.set(None);
            success.set(None);
            let form = passwords();
            if let Err(e) = form.validate() {
                error.set(Some(e.to_string()));
                return;
            }
            let req = ChangePasswordRequest {
                current_password: form.current_password,
                new_password: form.new_password,
            };
            match queries.mutate_message(queries.api().change_password(&req)).await {
                Ok(message) => {
                    passwords.set(ChangePasswordForm::default());
                    success.set(Some(message));
                }
                Err(e) => error.set(Some(e.to_string())),
            }
        });
    };

    let pw = passwords();

    rsx! {
        div { class: "max-w-2xl space-y-6",
            h1 { class: "text-2xl font-bold text-slate-900", "Profile" }
            Notice { kind: NoticeKind::Error, message: error() }
            Notice { kind: NoticeKind::Success, message: success() }

            Card { title: "Account details".to_string(),
                div { class: "space-y-4",
                    Field {
                        label: "Name".to_string(),
                        value: name(),
                        oninput: move |e: FormEvent| name.set(e.value()),
                    }
                    Field {
                        label: "Email".to_string(),
                        value: email(),
                        input_type: InputType::Email,
                        oninput: move |e: FormEvent| email.set(e.value()),
                    }
                    Button { busy: saving(), onclick: save_profile, "Save profile" }
                }
            }

            Card { title: "Change password".to_string(),
                div { class: "space-y-4",
                    Field {
                        label: "Current password".to_string(),
                        value: pw.current_password.clone(),
                        input_type: InputType::Password,
                        oninput: move |e: FormEvent| passwords.write().current_password = e.value(),
                    }
                    Field {
                        label: "New password".to_string(),
                        value: pw.new_password.clone(),
                        input_type: InputType::Password,
                        oninput: move |e: FormEvent| passwords.write().new_password = e.value(),
                    }
                    Field {
                        label: "Confirm new password".to_string(),
                        value: pw.confirm_password.clone(),
                        input_type: InputType::Password,
                        oninput: move |e: FormEvent| passwords.write().confirm_password = e.value(),
                    }
                    Button { onclick: change_password, "Update password" }
                }
            }
        }
    }
}
