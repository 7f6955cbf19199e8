// File: src/lib.rs
pub mod client;
pub mod config;
pub mod mobile;
pub mod model;
pub mod orchestrator;
pub mod paths;
pub mod presenter;
pub mod screen;

#[cfg(feature = "tui")]
pub mod tui;

#[cfg(feature = "gui")]
pub mod gui;

uniffi::setup_scaffolding!();
