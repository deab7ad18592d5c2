use dioxus::prelude::*;

#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub enum InputType {
    #[default]
    Text,
    Email,
    Password,
}

impl InputType {
    fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Email => "email",
            Self::Password => "password",
        }
    }
}

/// Labelled text input with an optional inline validation message.
#[derive(Props, Clone, PartialEq)]
pub struct FieldProps {
    pub label: String,
    pub value: String,
    pub oninput: EventHandler<FormEvent>,
    #[props(optional)]
    pub input_type: Option<InputType>,
    #[props(optional)]
    pub placeholder: Option<String>,
    #[props(optional)]
    pub error: Option<String>,
}

#[component]
pub fn Field(props: FieldProps) -> Element {
    let border = if props.error.is_some() {
        "border-red-400 focus:ring-red-400/50"
    } else {
        "border-slate-300 focus:ring-emerald-500/50"
    };

    rsx! {
        label { class: "block",
            span { class: "mb-1 block text-sm font-medium text-slate-700", "{props.label}" }
            input {
                class: "w-full rounded-lg border bg-white px-3 py-2 text-sm text-slate-900 placeholder-slate-400 focus:outline-none focus:ring-2 {border}",
                r#type: props.input_type.unwrap_or_default().as_str(),
                value: "{props.value}",
                placeholder: props.placeholder.unwrap_or_default(),
                oninput: move |e| props.oninput.call(e),
            }
            if let Some(err) = &props.error {
                span { class: "mt-1 block text-xs text-red-500", "{err}" }
            }
        }
    }
}
