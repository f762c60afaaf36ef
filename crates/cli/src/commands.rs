use std::fmt;
use std::io::{BufRead, Write};

use anyhow::{anyhow, Result};

use crate::cli::{Action, Cli};
use crate::config::AppConfig;
use crate::core::installer::{ColorSelection, UnitOutcome};
use crate::core::removal::{InstalledTheme, RemoveResult};
use crate::core::services::{InstallOptions, InstallService};
use crate::core::tweaks::TweakOptions;

pub fn execute<R: BufRead, W: Write>(
    config: &AppConfig,
    cli: &Cli,
    mut input: R,
    mut writer: W,
) -> Result<()> {
    let service = InstallService::new(config.clone());
    match cli.action() {
        Action::Install => handle_install(&service, cli, &mut writer),
        Action::Remove => handle_remove(&service, cli, &mut input, &mut writer).map(|_| ()),
        Action::Reinstall => match handle_remove(&service, cli, &mut input, &mut writer)? {
            RemoveStep::Cancelled => Ok(()),
            RemoveStep::Finished => handle_install(&service, cli, &mut writer),
        },
    }
}

fn install_options(cli: &Cli) -> InstallOptions {
    let mut options = InstallOptions::new(cli.selection());
    options.saturation = cli.style.sat;
    options.mode = cli.style.mode;
    options.filled = cli.style.filled;
    options.tweaks = TweakOptions::from(&cli.tweaks);
    options.parallel = !cli.actions.sequential;
    options
}

fn handle_install<W: Write>(service: &InstallService, cli: &Cli, mut writer: W) -> Result<()> {
    let report = service.install(&install_options(cli))?;
    let summary = InstallSummary::from_outcomes(&report.outcomes);
    summary.write_to(&mut writer)?;

    if summary.failed > 0 {
        return Err(anyhow!(
            "{} of {} themes failed to install",
            summary.failed,
            report.outcomes.len()
        ));
    }
    Ok(())
}

enum RemoveStep {
    Cancelled,
    Finished,
}

/// Colors whose installed themes should go. `None` means every Marble theme.
fn removal_colors(cli: &Cli) -> Option<Vec<String>> {
    match cli.selection() {
        ColorSelection::Custom { hue, name } => {
            Some(vec![name.unwrap_or_else(|| format!("hue{hue}"))])
        }
        ColorSelection::Presets { all: true, .. } => None,
        ColorSelection::Presets { names, .. } => Some(names),
    }
}

fn handle_remove<R: BufRead, W: Write>(
    service: &InstallService,
    cli: &Cli,
    mut input: R,
    mut writer: W,
) -> Result<RemoveStep> {
    let colors = removal_colors(cli);
    let themes = service.installed(colors.as_deref(), cli.style.mode)?;
    if themes.is_empty() {
        writeln!(writer, "No matching themes found.")?;
        return Ok(RemoveStep::Finished);
    }

    writeln!(
        writer,
        "The following themes will be deleted: {}.",
        describe(&themes)
    )?;
    if !cli.actions.yes && !confirm(&mut input, &mut writer)? {
        writeln!(writer, "Operation cancelled.")?;
        return Ok(RemoveStep::Cancelled);
    }

    let results = service.remove(&themes);
    let summary = RemoveSummary::from_results(&results);
    summary.write_to(&mut writer)?;
    if !summary.failed.is_empty() {
        return Err(anyhow!("{} themes could not be removed", summary.failed.len()));
    }
    Ok(RemoveStep::Finished)
}

fn describe(themes: &[InstalledTheme]) -> String {
    themes
        .iter()
        .map(|theme| format!("{} ({})", theme.color, theme.mode))
        .collect::<Vec<_>>()
        .join(", ")
}

fn confirm<R: BufRead, W: Write>(mut input: R, mut writer: W) -> Result<bool> {
    write!(writer, "Proceed? (y/N) ")?;
    writer.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}

struct InstallSummary {
    installed: usize,
    failed: usize,
    lines: Vec<String>,
}

impl InstallSummary {
    fn from_outcomes(outcomes: &[UnitOutcome]) -> Self {
        let mut installed = 0usize;
        let mut failed = 0usize;
        let mut lines = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            let modes = outcome
                .modes
                .iter()
                .map(|mode| mode.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            match &outcome.error {
                None => {
                    installed += 1;
                    lines.push(format!("{} ({modes}): done", outcome.name));
                }
                Some(error) => {
                    failed += 1;
                    lines.push(format!("{} ({modes}): {error}", outcome.name));
                }
            }
        }
        Self {
            installed,
            failed,
            lines,
        }
    }

    fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        for line in &self.lines {
            writeln!(writer, "{line}")?;
        }
        writeln!(writer, "{}", SummaryLine::Installed(self.installed))?;
        Ok(())
    }
}

struct RemoveSummary {
    removed: usize,
    failed: Vec<String>,
}

impl RemoveSummary {
    fn from_results(results: &[RemoveResult]) -> Self {
        let mut removed = 0usize;
        let mut failed = Vec::new();
        for result in results {
            if result.removed {
                removed += 1;
            } else {
                let reason = result.error.as_deref().unwrap_or("unknown error");
                failed.push(format!("{} ({reason})", result.path.display()));
            }
        }
        Self { removed, failed }
    }

    fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        writeln!(writer, "{}", SummaryLine::Removed(self.removed))?;
        if !self.failed.is_empty() {
            writeln!(writer, "Could not remove: {}", self.failed.join(", "))?;
        }
        Ok(())
    }
}

enum SummaryLine {
    Installed(usize),
    Removed(usize),
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

impl fmt::Display for SummaryLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SummaryLine::Installed(0) => write!(f, "No themes installed"),
            SummaryLine::Installed(count) => {
                write!(f, "Installed {} color{}", count, plural(*count))
            }
            SummaryLine::Removed(0) => write!(f, "No themes removed"),
            SummaryLine::Removed(count) => {
                write!(f, "Removed {} theme{}", count, plural(*count))
            }
        }
    }
}
