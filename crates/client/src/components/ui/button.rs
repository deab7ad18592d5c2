use dioxus::prelude::*;

#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonVariant {
    #[default]
    Primary,
    Secondary,
    Danger,
}

impl ButtonVariant {
    fn class(self) -> &'static str {
        match self {
            Self::Primary => "bg-emerald-600 text-white hover:bg-emerald-500 focus:ring-emerald-500",
            Self::Secondary => "bg-slate-200 text-slate-800 hover:bg-slate-300 focus:ring-slate-400",
            Self::Danger => "bg-red-600 text-white hover:bg-red-500 focus:ring-red-500",
        }
    }
}

#[derive(Props, Clone, PartialEq)]
pub struct ButtonProps {
    #[props(optional)]
    pub class: Option<String>,
    #[props(optional)]
    pub variant: Option<ButtonVariant>,
    #[props(optional)]
    pub r#type: Option<String>,
    #[props(optional)]
    pub disabled: Option<bool>,
    /// Shows a spinner and disables the button.
    #[props(optional)]
    pub busy: Option<bool>,
    #[props(optional)]
    pub onclick: Option<EventHandler<MouseEvent>>,
    pub children: Element,
}

#[component]
pub fn Button(props: ButtonProps) -> Element {
    let busy = props.busy.unwrap_or(false);
    let disabled = busy || props.disabled.unwrap_or(false);

    let base = "inline-flex items-center justify-center gap-2 rounded-lg px-4 py-2 text-sm font-semibold transition-colors focus:outline-none focus:ring-2 focus:ring-offset-2 disabled:opacity-50 disabled:pointer-events-none";
    let variant = props.variant.unwrap_or_default().class();
    let class = match props.class {
        Some(extra) if !extra.is_empty() => format!("{base} {variant} {extra}"),
        _ => format!("{base} {variant}"),
    };

    rsx! {
        button {
            class,
            r#type: props.r#type.unwrap_or_else(|| "button".to_string()),
            disabled,
            onclick: move |evt| {
                if disabled {
                    return;
                }
                if let Some(handler) = &props.onclick {
                    handler.call(evt);
                }
            },
            if busy {
                Spinner {}
            }
            {props.children}
        }
    }
}

#[component]
pub fn Spinner() -> Element {
    rsx! {
        span { class: "inline-block h-4 w-4 animate-spin rounded-full border-2 border-current border-t-transparent" }
    }
}
