//! Layout components wrapping groups of routes.

pub mod protected_layout;

pub use protected_layout::ProtectedLayout;
