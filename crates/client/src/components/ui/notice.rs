use dioxus::prelude::*;

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Error,
    Success,
}

/// Inline banner for a failed or completed action. Hidden when `message`
/// is `None`.
#[component]
pub fn Notice(
    kind: NoticeKind,
    message: Option<String>,
    #[props(optional)] on_dismiss: Option<EventHandler<()>>,
) -> Element {
    let Some(message) = message else {
        return rsx! {};
    };
    let class = match kind {
        NoticeKind::Error => "border-red-200 bg-red-50 text-red-700",
        NoticeKind::Success => "border-emerald-200 bg-emerald-50 text-emerald-700",
    };

    rsx! {
        div { class: "mb-4 flex items-start justify-between gap-3 rounded-lg border p-3 text-sm {class}",
            p { "{message}" }
            if let Some(handler) = on_dismiss {
                button {
                    class: "text-xs font-semibold opacity-70 hover:opacity-100",
                    onclick: move |_| handler.call(()),
                    "Dismiss"
                }
            }
        }
    }
}
