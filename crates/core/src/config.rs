use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::BaseDirs;
use once_cell::sync::Lazy;

static ENV_ROOT: &str = "MARBLE_ROOT";
static ENV_THEMES_DIR: &str = "MARBLE_THEMES_DIR";

static PALETTE_FILE: &str = "colors.json";
static TEMP_DIR: &str = ".temp";
static THEME_SOURCES_DIR: &str = "theme";
static TWEAKS_DIR: &str = "tweaks";
static USER_THEMES_DIR: &str = ".themes";

pub static GNOME_SHELL: &str = "gnome-shell";

static BASE_DIRS: Lazy<Option<BaseDirs>> = Lazy::new(BaseDirs::new);

/// Where the template theme lives and where installed themes go.
#[derive(Debug, Clone)]
pub struct AppConfig {
    root: PathBuf,
    themes_dir: PathBuf,
}

impl AppConfig {
    /// Construct [`AppConfig`] by resolving the project root and themes directory using
    /// the provided overrides, environment variables, and platform defaults.
    pub fn discover(root_override: Option<PathBuf>, themes_override: Option<PathBuf>) -> Result<Self> {
        let root = resolve_root(root_override)?;
        let themes_dir = resolve_themes_dir(themes_override)?;
        let palette = root.join(PALETTE_FILE);
        if !palette.is_file() {
            anyhow::bail!(
                "No {} found in {}. Run from the theme checkout or pass --root",
                PALETTE_FILE,
                root.display()
            );
        }
        Ok(Self::from_dirs(root, themes_dir))
    }

    /// Construct [`AppConfig`] directly from resolved directories.
    pub fn from_dirs(root: PathBuf, themes_dir: PathBuf) -> Self {
        Self { root, themes_dir }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn themes_dir(&self) -> &Path {
        &self.themes_dir
    }

    pub fn palette_path(&self) -> PathBuf {
        self.root.join(PALETTE_FILE)
    }

    pub fn tweaks_dir(&self) -> PathBuf {
        self.root.join(TWEAKS_DIR)
    }

    pub fn source_dir(&self) -> PathBuf {
        self.root.join(THEME_SOURCES_DIR).join(GNOME_SHELL)
    }

    pub fn temp_dir(&self) -> PathBuf {
        self.root.join(TEMP_DIR)
    }

    pub fn staging_dir(&self) -> PathBuf {
        self.temp_dir().join(GNOME_SHELL)
    }
}

fn resolve_root(root_override: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = root_override {
        return Ok(dir);
    }

    if let Ok(env_dir) = env::var(ENV_ROOT) {
        return Ok(PathBuf::from(env_dir));
    }

    env::current_dir().context("Failed to read the current directory")
}

fn resolve_themes_dir(themes_override: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = themes_override {
        return Ok(dir);
    }

    if let Ok(env_dir) = env::var(ENV_THEMES_DIR) {
        return Ok(PathBuf::from(env_dir));
    }

    if let Some(base) = &*BASE_DIRS {
        return Ok(base.home_dir().join(USER_THEMES_DIR));
    }

    Ok(env::current_dir()?.join(USER_THEMES_DIR))
}
