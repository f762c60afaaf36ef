use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::error::Result;
use crate::files;
use crate::model::Mode;

static THEME_FOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Marble-(?P<color>.+)-(?P<mode>[^-]+)$").expect("valid regex"));

/// An installed `Marble-<color>-<mode>` folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstalledTheme {
    pub color: String,
    pub mode: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
pub struct RemoveResult {
    pub path: PathBuf,
    pub removed: bool,
    pub error: Option<String>,
}

/// Split a theme folder name into color and mode.
pub fn parse_theme_folder(folder: &str) -> Option<(String, String)> {
    let caps = THEME_FOLDER_RE.captures(folder)?;
    Some((caps["color"].to_string(), caps["mode"].to_string()))
}

/// List installed themes under `themes_dir`, sorted by folder name.
pub fn detect_themes(themes_dir: &Path) -> Result<Vec<InstalledTheme>> {
    let mut themes = Vec::new();
    for name in files::sorted_entries(themes_dir)? {
        if let Some((color, mode)) = parse_theme_folder(&name) {
            themes.push(InstalledTheme {
                color,
                mode,
                path: themes_dir.join(&name),
            });
        }
    }
    Ok(themes)
}

/// Keep themes matching `colors` (all of them when `colors` is `None`) and `mode`.
pub fn filter_themes(
    themes: Vec<InstalledTheme>,
    colors: Option<&[String]>,
    mode: Option<Mode>,
) -> Vec<InstalledTheme> {
    themes
        .into_iter()
        .filter(|theme| colors.map_or(true, |colors| colors.contains(&theme.color)))
        .filter(|theme| mode.map_or(true, |mode| theme.mode == mode.as_str()))
        .collect()
}

/// Delete every theme folder, continuing past failures.
pub fn remove_themes(themes: &[InstalledTheme]) -> Vec<RemoveResult> {
    themes
        .iter()
        .map(|theme| match fs::remove_dir_all(&theme.path) {
            Ok(()) => {
                tracing::info!(path = %theme.path.display(), "removed theme");
                RemoveResult {
                    path: theme.path.clone(),
                    removed: true,
                    error: None,
                }
            }
            Err(err) => {
                tracing::warn!(path = %theme.path.display(), error = %err, "failed to remove theme");
                RemoveResult {
                    path: theme.path.clone(),
                    removed: false,
                    error: Some(err.to_string()),
                }
            }
        })
        .collect()
}
