//! Application routing configuration.

use dioxus::prelude::*;

use crate::views::{
    AdminView, ApiSettingsView, BotSettingsView, DashboardView, KnowledgeView, Login,
    MessagesView, NotFound, ProfileView, ProtectedLayout, Register, ResetPassword,
};

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[redirect("/", || Route::DashboardView {})]

    // Public auth pages
    #[route("/login")]
    Login {},
    #[route("/register")]
    Register {},
    #[route("/reset-password")]
    ResetPassword {},

    // Everything else needs a session
    #[layout(ProtectedLayout)]
        #[route("/dashboard")]
        DashboardView {},
        #[route("/api-settings")]
        ApiSettingsView {},
        #[route("/knowledge")]
        KnowledgeView {},
        #[route("/bot-settings")]
        BotSettingsView {},
        #[route("/messages")]
        MessagesView {},
        #[route("/profile")]
        ProfileView {},
        #[route("/admin")]
        AdminView {},
    #[end_layout]

    #[route("/:..segments")]
    NotFound { segments: Vec<String> },
}
