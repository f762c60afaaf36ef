//! Working copy of the template theme.
//!
//! Installation never edits the template directly: the source folder is copied into a
//! temp folder, its stylesheet fragments are combined into one main stylesheet, and
//! tweaks add their styles and assets here before any color is applied.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::applier;
use crate::error::{IoResultExt, Result};
use crate::files;
use crate::model::ColorReplacement;
use crate::version;

/// Folder holding stylesheet fragments that make up the main stylesheet.
pub const FRAGMENTS_DIR: &str = ".css";
/// Folder holding per-GNOME-version overrides.
pub const VERSIONS_DIR: &str = ".versions";

/// Token swaps that make buttons use the filled accent style.
pub const FILLED_KEYWORDS: [(&str, &str); 6] = [
    ("BUTTON-COLOR", "ACCENT-FILLED-COLOR"),
    ("BUTTON_HOVER", "ACCENT-FILLED_HOVER"),
    ("BUTTON_ACTIVE", "ACCENT-FILLED_ACTIVE"),
    ("BUTTON_INSENSITIVE", "ACCENT-FILLED_INSENSITIVE"),
    ("BUTTON-TEXT-COLOR", "TEXT-BLACK-COLOR"),
    ("BUTTON-TEXT_SECONDARY", "TEXT-BLACK_SECONDARY"),
];

#[derive(Debug, Clone)]
pub struct StagingArea {
    source_dir: PathBuf,
    temp_dir: PathBuf,
    main_styles: PathBuf,
}

impl StagingArea {
    pub fn new(source_dir: impl Into<PathBuf>, temp_dir: impl Into<PathBuf>, theme_name: &str) -> Self {
        let temp_dir = temp_dir.into();
        let main_styles = temp_dir.join(format!("{theme_name}.css"));
        Self {
            source_dir: source_dir.into(),
            temp_dir,
            main_styles,
        }
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    pub fn temp_dir(&self) -> &Path {
        &self.temp_dir
    }

    pub fn main_styles(&self) -> &Path {
        &self.main_styles
    }

    /// Copy the template into a fresh temp folder and build the main stylesheet.
    ///
    /// `shell_version` selects which `.versions` overrides apply; `None` skips them.
    pub fn prepare(&self, shell_version: Option<&str>) -> Result<()> {
        files::remove_dir_if_exists(&self.temp_dir)?;
        files::copy_tree(&self.source_dir, &self.temp_dir)?;
        self.combine_styles(shell_version)?;
        files::remove_dir_if_exists(&self.temp_dir.join(FRAGMENTS_DIR))?;
        files::remove_dir_if_exists(&self.temp_dir.join(VERSIONS_DIR))?;
        tracing::debug!(temp = %self.temp_dir.display(), "staged template theme");
        Ok(())
    }

    fn combine_styles(&self, shell_version: Option<&str>) -> Result<()> {
        let mut combined = String::new();
        let fragments = self.source_dir.join(FRAGMENTS_DIR);
        push_fragments(&mut combined, &fragments)?;

        if let Some(shell_version) = shell_version {
            let versions_dir = self.source_dir.join(VERSIONS_DIR);
            let folders = files::sorted_entries(&versions_dir)?;
            for folder in version::matching_version_folders(shell_version, &folders) {
                let folder_path = versions_dir.join(&folder);
                push_fragments(&mut combined, &folder_path.join(FRAGMENTS_DIR))?;

                for name in files::sorted_entries(&folder_path)? {
                    let path = folder_path.join(&name);
                    if path.is_file() && name.ends_with(".svg") {
                        files::copy_into(&path, &self.temp_dir)?;
                    }
                }
                tracing::debug!(folder = folder.as_str(), "applied version overrides");
            }
        }

        fs::write(&self.main_styles, combined).at_path(&self.main_styles)
    }

    /// Append styles to the end of the main stylesheet.
    pub fn append(&self, content: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.main_styles)
            .at_path(&self.main_styles)?;
        writeln!(file, "{content}").at_path(&self.main_styles)
    }

    /// Insert styles before everything else in the main stylesheet.
    pub fn prepend(&self, content: &str) -> Result<()> {
        let existing = fs::read_to_string(&self.main_styles).at_path(&self.main_styles)?;
        fs::write(&self.main_styles, format!("{content}\n{existing}")).at_path(&self.main_styles)
    }

    pub fn append_from_file(&self, path: &Path) -> Result<()> {
        let content = fs::read_to_string(path).at_path(path)?;
        self.append(&content)
    }

    /// Copy a file, or the contents of a directory, into the staged theme.
    pub fn add_asset(&self, path: &Path) -> Result<()> {
        if path.is_dir() {
            files::copy_tree(path, &self.temp_dir)
        } else {
            files::copy_into(path, &self.temp_dir)
        }
    }

    /// Swap button tokens for their filled counterparts in every staged template.
    pub fn apply_filled(&self) -> Result<()> {
        let swaps: Vec<ColorReplacement> = FILLED_KEYWORDS.iter().copied().map(Into::into).collect();
        for name in files::sorted_entries(&self.temp_dir)? {
            applier::replace_keywords(&self.temp_dir.join(name), &swaps)?;
        }
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        files::remove_dir_if_exists(&self.temp_dir)
    }
}

fn push_fragments(combined: &mut String, directory: &Path) -> Result<()> {
    for name in files::sorted_entries(directory)? {
        let path = directory.join(name);
        if path.is_file() {
            combined.push_str(&fs::read_to_string(&path).at_path(&path)?);
            combined.push('\n');
        }
    }
    Ok(())
}
