//! CLI command handlers

pub mod commands;

pub use commands::{check_template, extract, generate, layout, load_layout};
