use dioxus::prelude::*;

use crate::Route;

#[component]
pub fn NotFound(segments: Vec<String>) -> Element {
    let path = format!("/{}", segments.join("/"));
    rsx! {
        div { class: "flex min-h-screen flex-col items-center justify-center bg-slate-50 text-center",
            h1 { class: "text-5xl font-bold text-slate-900", "404" }
            p { class: "mt-2 text-slate-500", "Nothing lives at {path}." }
            Link { class: "mt-6 font-semibold text-emerald-600 hover:text-emerald-500", to: Route::DashboardView {}, "Go to dashboard" }
        }
    }
}
