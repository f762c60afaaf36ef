mod install;

pub use install::{InstallOptions, InstallReport, InstallService, VersionSource};
