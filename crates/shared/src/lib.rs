//! Shared types and utilities for the ChatPilot dashboard client and backend.

pub mod endpoints;
pub mod error;
pub mod models;

pub use endpoints::*;
pub use error::*;
pub use models::*;
