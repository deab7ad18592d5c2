use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct CardProps {
    #[props(optional)]
    pub title: Option<String>,
    #[props(optional)]
    pub subtitle: Option<String>,
    #[props(optional)]
    pub class: Option<String>,
    pub children: Element,
}

#[component]
pub fn Card(props: CardProps) -> Element {
    let base = "rounded-xl border border-slate-200 bg-white shadow-sm";
    let class = match props.class {
        Some(extra) if !extra.is_empty() => format!("{base} {extra}"),
        _ => base.to_string(),
    };

    rsx! {
        div { class,
            if let Some(title) = &props.title {
                div { class: "px-6 pt-5 pb-1",
                    h2 { class: "text-lg font-semibold text-slate-900", "{title}" }
                    if let Some(sub) = &props.subtitle {
                        p { class: "mt-1 text-sm text-slate-500", "{sub}" }
                    }
                }
            }
            div { class: "px-6 pb-6 pt-4", {props.children} }
        }
    }
}

/// A labelled figure for the dashboard overview.
#[component]
pub fn StatCard(label: String, value: String, #[props(optional)] hint: Option<String>) -> Element {
    rsx! {
        Card {
            p { class: "text-sm text-slate-500", "{label}" }
            p { class: "mt-1 text-2xl font-bold text-slate-900", "{value}" }
            if let Some(hint) = hint {
                p { class: "mt-1 text-xs text-slate-400", "{hint}" }
            }
        }
    }
}
