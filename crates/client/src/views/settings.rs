//! AI provider keys and bot prompt settings.

use chatpilot_shared::{
    add_provider, endpoints, remove_provider, set_provider_priority, BotSettings, Language,
    ProviderConfig, ProviderId,
};
use dioxus::prelude::*;

use crate::components::ui::{Button, ButtonVariant, Card, Notice, NoticeKind};
use crate::hooks::{use_api_query, use_query_client};

#[component]
pub fn ApiSettingsView() -> Element {
    let providers = use_api_query::<Vec<ProviderConfig>>(endpoints::API_SETTINGS);
    let queries = use_query_client();

    let mut draft = use_signal(Vec::<ProviderConfig>::new);
    let mut loaded = use_signal(|| false);
    let mut new_provider = use_signal(|| 0usize);
    let mut new_key = use_signal(String::new);
    let mut saving = use_signal(|| false);
    let mut error = use_signal(|| None::<String>);
    let mut success = use_signal(|| None::<String>);

    use_effect(move || {
        if let Some(Ok(list)) = &*providers.read() {
            if !*loaded.peek() {
                draft.set(list.clone());
                loaded.set(true);
            }
        }
    });

    let load_error = match &*providers.read() {
        Some(Err(e)) => Some(e.to_string()),
        _ => None,
    };
    let rows = draft();

    rsx! {
        div { class: "space-y-6",
            h1 { class: "text-2xl font-bold text-slate-900", "API Settings" }
            Notice { kind: NoticeKind::Error, message: load_error.or(error()) }
            Notice { kind: NoticeKind::Success, message: success() }

            Card {
                title: "AI providers".to_string(),
                subtitle: "Priority 1 is tried first".to_string(),
                if rows.is_empty() {
                    p { class: "text-sm text-slate-500", "No providers configured." }
                }
                ul { class: "divide-y divide-slate-100",
                    for (index, provider) in rows.into_iter().enumerate() {
                        li { key: "{index}", class: "flex items-center justify-between py-3",
                            div {
                                p { class: "text-sm font-semibold text-slate-900", "{provider.provider.display_name()}" }
                                p { class: "font-mono text-xs text-slate-500", "{provider.redacted_key()}" }
                            }
                            div { class: "flex items-center gap-3",
                                label { class: "text-xs text-slate-500", "Priority" }
                                input {
                                    class: "w-16 rounded border border-slate-300 px-2 py-1 text-sm",
                                    r#type: "number",
                                    min: "1",
                                    value: "{provider.priority}",
                                    oninput: move |e| {
                                        if let Ok(priority) = e.value().parse::<u32>() {
                                            let updated = set_provider_priority(&draft.read(), index, priority);
                                            draft.set(updated);
                                        }
                                    },
                                }
                                Button {
                                    variant: ButtonVariant::Danger,
                                    onclick: move |_| {
                                        let updated = remove_provider(&draft.read(), index);
                                        draft.set(updated);
                                    },
                                    "Remove"
                                }
                            }
                        }
                    }
                }
            }

            Card { title: "Add provider".to_string(),
                div { class: "flex flex-wrap items-end gap-3",
                    select {
                        class: "rounded-lg border border-slate-300 px-3 py-2 text-sm",
                        onchange: move |e| new_provider.set(e.value().parse().unwrap_or(0)),
                        for (i, id) in ProviderId::ALL.iter().enumerate() {
                            option { key: "{i}", value: "{i}", selected: i == new_provider(), "{id.display_name()}" }
                        }
                    }
                    input {
                        class: "flex-1 rounded-lg border border-slate-300 px-3 py-2 text-sm",
                        r#type: "password",
                        placeholder: "API key",
                        value: "{new_key}",
                        oninput: move |e| new_key.set(e.value()),
                    }
                    Button {
                        variant: ButtonVariant::Secondary,
                        disabled: new_key.read().trim().is_empty(),
                        onclick: move |_| {
                            let id = ProviderId::ALL[new_provider().min(ProviderId::ALL.len() - 1)];
                            let updated = add_provider(&draft.read(), id, new_key.read().trim());
                            draft.set(updated);
                            new_key.set(String::new());
                        },
                        "Add"
                    }
                }
            }

            Button {
                busy: saving(),
                onclick: move |_| {
                    let queries = queries.clone();
                    spawn(async move {
                        saving.set(true);
                        error.set(None);
                        success.set(None);
                        let body = draft();
                        match queries.mutate_message(queries.api().save_providers(&body)).await {
                            Ok(message) => success.set(Some(message)),
                            Err(e) => error.set(Some(e.to_string())),
                        }
                        saving.set(false);
                    });
                },
                "Save changes"
            }
        }
    }
}

#[component]
pub fn BotSettingsView() -> Element {
    let settings = use_api_query::<BotSettings>(endpoints::BOT_SETTINGS);
    let queries = use_query_client();

    let mut draft = use_signal(BotSettings::default);
    let mut loaded = use_signal(|| false);
    let mut saving = use_signal(|| false);
    let mut error = use_signal(|| None::<String>);
    let mut success = use_signal(|| None::<String>);

    use_effect(move || {
        if let Some(Ok(current)) = &*settings.read() {
            if !*loaded.peek() {
                draft.set(current.clone());
                loaded.set(true);
            }
        }
    });

    let load_error = match &*settings.read() {
        Some(Err(e)) => Some(e.to_string()),
        _ => None,
    };
    let current = draft();

    rsx! {
        div { class: "space-y-6",
            h1 { class: "text-2xl font-bold text-slate-900", "Bot Settings" }
            Notice { kind: NoticeKind::Error, message: load_error.or(error()) }
            Notice { kind: NoticeKind::Success, message: success() }

            Card { title: "Prompt template".to_string(),
                textarea {
                    class: "h-64 w-full rounded-lg border border-slate-300 p-3 font-mono text-sm",
                    value: "{current.prompt_template}",
                    oninput: move |e| draft.write().prompt_template = e.value(),
                }
                p { class: "mt-1 text-xs text-slate-400", "{current.prompt_template.chars().count()} characters" }
            }

            Card { title: "Reply language".to_string(),
                select {
                    class: "rounded-lg border border-slate-300 px-3 py-2 text-sm",
                    onchange: move |e| {
                        if let Some(language) = e.value().parse::<usize>().ok().and_then(|i| Language::ALL.get(i)) {
                            draft.write().language = *language;
                        }
                    },
                    for (i, language) in Language::ALL.iter().enumerate() {
                        option { key: "{i}", value: "{i}", selected: *language == current.language, "{language.label()}" }
                    }
                }
            }

            div { class: "flex gap-3",
                Button {
                    busy: saving(),
                    onclick: move |_| {
                        let queries = queries.clone();
                        spawn(async move {
                            saving.set(true);
                            error.set(None);
                            success.set(None);
                            let body = draft();
                            match queries.mutate_message(queries.api().save_bot_settings(&body)).await {
                                Ok(message) => success.set(Some(message)),
                                Err(e) => error.set(Some(e.to_string())),
                            }
                            saving.set(false);
                        });
                    },
                    "Save settings"
                }
                Button {
                    variant: ButtonVariant::Secondary,
                    onclick: move |_| draft.write().prompt_template = chatpilot_shared::DEFAULT_PROMPT.to_string(),
                    "Reset to default"
                }
            }
        }
    }
}
