mod app;
pub mod cli;
pub mod config;
mod controller;
mod effects;
pub mod logging;
mod ui;

pub use app::run_app;
