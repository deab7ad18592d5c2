//! ChatPilot dashboard - main entry point
//!
//! Runs on the web (WASM) and as a desktop app.

#![allow(non_snake_case)]

use chatpilot_client::{app::StoreProvider, logging, routes::Route};
use dioxus::prelude::*;

fn main() {
    logging::init();
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        StoreProvider {
            Router::<Route> {}
        }
    }
}
