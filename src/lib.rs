pub mod browser;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod exit;
pub mod platform;
pub mod probe;
pub mod ui;
