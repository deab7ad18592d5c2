//! Page components for the application.

pub mod admin;
pub mod dashboard;
pub mod knowledge;
pub mod layouts;
pub mod login;
pub mod messages;
pub mod not_found;
pub mod profile;
pub mod register;
pub mod reset_password;
pub mod settings;

pub use admin::AdminView;
pub use dashboard::DashboardView;
pub use knowledge::KnowledgeView;
pub use layouts::ProtectedLayout;
pub use login::Login;
pub use messages::MessagesView;
pub use not_found::NotFound;
pub use profile::ProfileView;
pub use register::Register;
pub use reset_password::ResetPassword;
pub use settings::{ApiSettingsView, BotSettingsView};
