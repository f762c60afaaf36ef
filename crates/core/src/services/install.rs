use anyhow::{Context, Result};

use crate::config::{AppConfig, GNOME_SHELL};
use crate::installer::{self, ColorSelection, InstallUnit, ThemeInstaller, UnitOutcome};
use crate::model::Mode;
use crate::palette::Palette;
use crate::removal::{self, InstalledTheme, RemoveResult};
use crate::staging::StagingArea;
use crate::tweaks::{self, TweakContext, TweakOptions};
use crate::version;

/// How the GNOME Shell version used for `.versions` overrides is obtained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum VersionSource {
    /// Ask `gnome-shell --version`, skipping overrides if that fails.
    #[default]
    Detect,
    Fixed(String),
    Ignore,
}

#[derive(Debug, Clone)]
pub struct InstallOptions {
    pub selection: ColorSelection,
    pub saturation: Option<u16>,
    pub mode: Option<Mode>,
    pub filled: bool,
    pub tweaks: TweakOptions,
    pub version: VersionSource,
    pub parallel: bool,
}

impl InstallOptions {
    pub fn new(selection: ColorSelection) -> Self {
        Self {
            selection,
            saturation: None,
            mode: None,
            filled: false,
            tweaks: TweakOptions::default(),
            version: VersionSource::default(),
            parallel: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct InstallReport {
    pub shell_version: Option<String>,
    pub outcomes: Vec<UnitOutcome>,
}

impl InstallReport {
    pub fn failures(&self) -> impl Iterator<Item = &UnitOutcome> {
        self.outcomes.iter().filter(|outcome| !outcome.succeeded())
    }
}

#[derive(Debug, Clone)]
pub struct InstallService {
    config: AppConfig,
}

impl InstallService {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn load_palette(&self) -> Result<Palette> {
        let path = self.config.palette_path();
        Palette::load(&path).with_context(|| format!("failed to load palette {}", path.display()))
    }

    pub fn staging(&self) -> StagingArea {
        StagingArea::new(self.config.source_dir(), self.config.staging_dir(), GNOME_SHELL)
    }

    pub fn installer(&self) -> ThemeInstaller {
        ThemeInstaller::new(GNOME_SHELL, self.config.staging_dir(), self.config.themes_dir())
    }

    /// Stage the template, apply filled buttons and tweaks once, then install every
    /// selected color. The staging folder is removed afterwards even when units fail.
    pub fn install(&self, options: &InstallOptions) -> Result<InstallReport> {
        let mut palette = self.load_palette()?;
        let units = installer::plan_units(
            &palette,
            &options.selection,
            options.saturation,
            options.mode,
        )?;

        let shell_version = resolve_version(&options.version);
        let staging = self.staging();
        if let Err(err) = staging.prepare(shell_version.as_deref()) {
            release(&staging);
            return Err(err).context("failed to stage the template theme");
        }

        let outcomes = self
            .customize(&staging, &mut palette, options)
            .and_then(|()| run_units(&self.installer(), &palette, units, options.parallel));

        finish(&staging, shell_version, outcomes)
    }

    fn customize(
        &self,
        staging: &StagingArea,
        palette: &mut Palette,
        options: &InstallOptions,
    ) -> Result<()> {
        if options.filled {
            staging.apply_filled().context("failed to apply filled buttons")?;
        }

        let tweaks_dir = self.config.tweaks_dir();
        let mut ctx = TweakContext {
            palette,
            staging,
            tweaks_dir: &tweaks_dir,
        };
        tweaks::apply_tweaks(&options.tweaks.build(), &mut ctx).context("failed to apply tweaks")
    }

    /// Installed themes matching `colors` (every color when `None`) and `mode`.
    pub fn installed(
        &self,
        colors: Option<&[String]>,
        mode: Option<Mode>,
    ) -> Result<Vec<InstalledTheme>> {
        let themes = removal::detect_themes(self.config.themes_dir())?;
        Ok(removal::filter_themes(themes, colors, mode))
    }

    pub fn remove(&self, themes: &[InstalledTheme]) -> Vec<RemoveResult> {
        removal::remove_themes(themes)
    }
}

/// Remove the staging folder. Failing to do so only costs disk space, so it is logged.
fn release(staging: &StagingArea) {
    if let Err(err) = staging.clear() {
        tracing::warn!(
            temp = %staging.temp_dir().display(),
            error = %err,
            "failed to remove staging folder"
        );
    }
}

fn finish(
    staging: &StagingArea,
    shell_version: Option<String>,
    outcomes: Result<Vec<UnitOutcome>>,
) -> Result<InstallReport> {
    release(staging);
    Ok(InstallReport {
        shell_version,
        outcomes: outcomes?,
    })
}

fn resolve_version(source: &VersionSource) -> Option<String> {
    match source {
        VersionSource::Detect => match version::gnome_shell_version() {
            Ok(detected) => Some(detected),
            Err(err) => {
                tracing::warn!(error = %err, "could not detect GNOME Shell version; skipping version overrides");
                None
            }
        },
        VersionSource::Fixed(fixed) => Some(fixed.clone()),
        VersionSource::Ignore => None,
    }
}

/// Install each unit, in parallel on a blocking pool when asked. Outcomes keep unit order
/// and a failed unit never stops the others.
pub(crate) fn run_units(
    installer: &ThemeInstaller,
    palette: &Palette,
    units: Vec<InstallUnit>,
    parallel: bool,
) -> Result<Vec<UnitOutcome>> {
    if !parallel || units.len() < 2 {
        return Ok(units
            .iter()
            .map(|unit| {
                let result = installer.install(palette, &unit.request, &unit.name);
                UnitOutcome::from_result(unit, result)
            })
            .collect());
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;

    let outcomes = runtime.block_on(async {
        let handles: Vec<_> = units
            .into_iter()
            .map(|unit| {
                let installer = installer.clone();
                let palette = palette.clone();
                let fallback = UnitOutcome::from_result(&unit, Ok(Vec::new()));
                let handle = tokio::task::spawn_blocking(move || {
                    let result = installer.install(&palette, &unit.request, &unit.name);
                    UnitOutcome::from_result(&unit, result)
                });
                (fallback, handle)
            })
            .collect();

        let mut outcomes = Vec::with_capacity(handles.len());
        for (mut fallback, handle) in handles {
            match handle.await {
                Ok(outcome) => outcomes.push(outcome),
                Err(err) => {
                    fallback.error = Some(format!("installation task failed: {err}"));
                    outcomes.push(fallback);
                }
            }
        }
        outcomes
    });

    Ok(outcomes)
}
