pub use marble_core::config::*;

use crate::cli::Cli;

pub fn from_cli(cli: &Cli) -> anyhow::Result<AppConfig> {
    AppConfig::discover(cli.root.clone(), cli.themes_dir.clone())
}
