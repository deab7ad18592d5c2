//! Knowledge-base documents the bot answers from.

use chatpilot_shared::{endpoints, format_file_size, KnowledgeDocument};
use dioxus::prelude::*;

use crate::components::ui::{Button, ButtonVariant, Card, Notice, NoticeKind};
use crate::forms;
use crate::hooks::{use_api_query, use_query_client};

#[component]
pub fn KnowledgeView() -> Element {
    let documents = use_api_query::<Vec<KnowledgeDocument>>(endpoints::KNOWLEDGE_LIST);
    let queries = use_query_client();
    let mut uploading = use_signal(|| false);
    let mut error = use_signal(|| None::<String>);
    let mut success = use_signal(|| None::<String>);

    let upload_client = queries.clone();
    let on_upload = move |evt: FormEvent| {
        let queries = upload_client.clone();
        async move {
            error.set(None);
            success.set(None);
            for file in evt.files() {
                let name = file.name();
                if let Err(e) = forms::validate_upload(&name, file.size()) {
                    error.set(Some(format!("{name}: {e}")));
                    continue;
                }
                uploading.set(true);
                let result = match file.read_bytes().await {
                    Ok(bytes) => queries
                        .api()
                        .upload_document(&name, &bytes)
                        .await
                        .map_err(|e| e.to_string()),
                    Err(e) => Err(e.to_string()),
                };
                uploading.set(false);
                match result {
                    Ok(uploaded) => {
                        success.set(Some(format!("Uploaded {}", uploaded.file_name)));
                        queries.invalidate_all();
                    }
                    Err(e) => error.set(Some(format!("Failed to upload {name}: {e}"))),
                }
            }
        }
    };

    let list = match &*documents.read() {
        Some(Ok(list)) => list.clone(),
        _ => Vec::new(),
    };
    let load_error = match &*documents.read() {
        Some(Err(e)) => Some(e.to_string()),
        _ => None,
    };

    rsx! {
        div { class: "space-y-6",
            h1 { class: "text-2xl font-bold text-slate-900", "Knowledge Base" }
            Notice { kind: NoticeKind::Error, message: load_error.or(error()) }
            Notice { kind: NoticeKind::Success, message: success() }

            Card {
                title: "Upload documents".to_string(),
                subtitle: "Supported formats: PDF, TXT, CSV (max 10MB per file)".to_string(),
                input {
                    class: "text-sm",
                    r#type: "file",
                    accept: ".pdf,.txt,.csv",
                    multiple: true,
                    disabled: uploading(),
                    onchange: on_upload,
                }
                if uploading() {
                    p { class: "mt-2 text-sm text-slate-500", "Uploading..." }
                }
            }

            Card { title: "Documents".to_string(),
                if list.is_empty() {
                    p { class: "text-sm text-slate-500", "No documents uploaded yet." }
                }
                ul { class: "divide-y divide-slate-100",
                    for doc in list {
                        {
                            let queries = queries.clone();
                            let id = doc.id.clone();
                            let details = format!(
                                "{} · {}",
                                format_file_size(doc.size),
                                doc.uploaded_at.format("%Y-%m-%d")
                            );
                            rsx! {
                                li { key: "{doc.id}", class: "flex items-center justify-between py-3",
                                    div { class: "flex items-center gap-3",
                                        span { class: "rounded bg-slate-100 px-2 py-1 text-xs font-semibold text-slate-600", "{doc.kind().label()}" }
                                        div {
                                            p { class: "text-sm font-medium text-slate-900", "{doc.file_name}" }
                                            p { class: "text-xs text-slate-400", "{details}" }
                                        }
                                    }
                                    Button {
                                        variant: ButtonVariant::Danger,
                                        onclick: move |_| {
                                            let queries = queries.clone();
                                            let id = id.clone();
                                            spawn(async move {
                                                match queries.mutate_message(queries.api().delete_document(&id)).await {
                                                    Ok(message) => success.set(Some(message)),
                                                    Err(e) => error.set(Some(format!("Failed to delete document: {e}"))),
                                                }
                                            });
                                        },
                                        "Delete"
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
