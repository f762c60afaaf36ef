pub use marble_cli::cli;
pub use marble_cli::commands;
pub use marble_cli::config;
pub use marble_cli::logging;
pub use marble_cli::AppConfig;

pub use marble_core as core;
pub use marble_core::model;
pub use marble_core::palette;
