pub mod applier;
pub mod colors;
pub mod config;
pub mod error;
pub mod files;
pub mod generator;
pub mod installer;
pub mod model;
pub mod palette;
pub mod removal;
pub mod services;
pub mod staging;
pub mod tweaks;
pub mod version;

pub use config::AppConfig;
pub use error::{Result, ThemeError};
pub use generator::ColorReplacementGenerator;
pub use installer::{ColorSelection, InstallUnit, ThemeInstaller, UnitOutcome};
pub use model::*;
pub use palette::Palette;
pub use services::{InstallOptions, InstallReport, InstallService, VersionSource};
