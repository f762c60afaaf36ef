pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;

pub use marble_core as core;
pub use marble_core::model;

pub use marble_core::AppConfig;
