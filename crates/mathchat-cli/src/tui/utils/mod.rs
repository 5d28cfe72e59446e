//! TUI utilities

pub mod text;
