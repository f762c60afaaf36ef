use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::applier;
use crate::error::{Result, ThemeError};
use crate::files;
use crate::generator::ColorReplacementGenerator;
use crate::model::{InstallationRequest, Mode};
use crate::palette::Palette;

pub const THEME_PREFIX: &str = "Marble";

/// `<themes>/Marble-<name>-<mode>/<theme_type>`
pub fn theme_path(themes_dir: &Path, name: &str, mode: Mode, theme_type: &str) -> PathBuf {
    themes_dir
        .join(format!("{THEME_PREFIX}-{name}-{mode}"))
        .join(theme_type)
}

/// Copies the staged theme to its destinations and colors each copy.
#[derive(Debug, Clone)]
pub struct ThemeInstaller {
    theme_type: String,
    staged_dir: PathBuf,
    themes_dir: PathBuf,
}

impl ThemeInstaller {
    pub fn new(
        theme_type: impl Into<String>,
        staged_dir: impl Into<PathBuf>,
        themes_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            theme_type: theme_type.into(),
            staged_dir: staged_dir.into(),
            themes_dir: themes_dir.into(),
        }
    }

    pub fn themes_dir(&self) -> &Path {
        &self.themes_dir
    }

    /// Install one color in every requested mode. Returns the directories written.
    pub fn install(
        &self,
        palette: &Palette,
        request: &InstallationRequest,
        name: &str,
    ) -> Result<Vec<PathBuf>> {
        let generator = ColorReplacementGenerator::new(palette);
        let mut written = Vec::with_capacity(request.modes().len());

        for &mode in request.modes() {
            let replacements = generator.convert(mode, request)?;
            let destination = theme_path(&self.themes_dir, name, mode, &self.theme_type);
            files::copy_tree(&self.staged_dir, &destination)?;
            applier::apply(&replacements, &destination)?;
            tracing::info!(
                theme = name,
                mode = mode.as_str(),
                destination = %destination.display(),
                "installed theme"
            );
            written.push(destination);
        }

        Ok(written)
    }
}

/// One color to install, as chosen on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallUnit {
    pub name: String,
    pub request: InstallationRequest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorSelection {
    Custom {
        hue: u16,
        name: Option<String>,
    },
    Presets {
        all: bool,
        names: Vec<String>,
    },
}

/// Turn a color selection into install units, resolving preset names against the palette.
///
/// A preset that carries its own saturation (gray) ignores `saturation`.
pub fn plan_units(
    palette: &Palette,
    selection: &ColorSelection,
    saturation: Option<u16>,
    mode: Option<Mode>,
) -> Result<Vec<InstallUnit>> {
    let units = match selection {
        ColorSelection::Custom { hue, name } => {
            let name = name.clone().unwrap_or_else(|| format!("hue{hue}"));
            vec![InstallUnit {
                name,
                request: InstallationRequest::for_mode(*hue, saturation, mode)?,
            }]
        }
        ColorSelection::Presets { all, names } => {
            for name in names {
                if palette.accent(name).is_none() {
                    return Err(ThemeError::lookup(name.clone()));
                }
            }
            palette
                .accents()
                .iter()
                .filter(|accent| *all || names.contains(&accent.name))
                .map(|accent| {
                    let request = InstallationRequest::for_mode(
                        accent.hue,
                        accent.saturation.or(saturation),
                        mode,
                    )?;
                    Ok(InstallUnit {
                        name: accent.name.clone(),
                        request,
                    })
                })
                .collect::<Result<Vec<_>>>()?
        }
    };

    if units.is_empty() {
        return Err(ThemeError::validation(
            "No color arguments specified. Use -h or --help to see the available options.",
        ));
    }
    Ok(units)
}

/// Result of one unit in a batch; failures are kept so siblings can still report.
#[derive(Debug, Clone, Serialize)]
pub struct UnitOutcome {
    pub name: String,
    pub modes: Vec<Mode>,
    pub destinations: Vec<PathBuf>,
    pub error: Option<String>,
}

impl UnitOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }

    pub(crate) fn from_result(unit: &InstallUnit, result: Result<Vec<PathBuf>>) -> Self {
        let (destinations, error) = match result {
            Ok(destinations) => (destinations, None),
            Err(err) => (Vec::new(), Some(err.to_string())),
        };
        Self {
            name: unit.name.clone(),
            modes: unit.request.modes().to_vec(),
            destinations,
            error,
        }
    }
}
