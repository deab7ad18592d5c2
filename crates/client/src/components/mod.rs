//! Reusable UI components.

pub mod ui;
