use std::process::Command;

use crate::error::{Result, ThemeError};

/// Ask the running GNOME Shell for its version, e.g. `"46.2"`.
pub fn gnome_shell_version() -> Result<String> {
    let output = Command::new("gnome-shell")
        .arg("--version")
        .output()
        .map_err(|err| ThemeError::Command {
            program: "gnome-shell".into(),
            message: err.to_string(),
        })?;
    if !output.status.success() {
        return Err(ThemeError::Command {
            program: "gnome-shell".into(),
            message: format!("exited with {}", output.status),
        });
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_version_output(&stdout).ok_or_else(|| ThemeError::Command {
        program: "gnome-shell".into(),
        message: format!("unexpected version output '{}'", stdout.trim()),
    })
}

/// Extract the version from `GNOME Shell 46.2`.
pub fn parse_version_output(output: &str) -> Option<String> {
    output.split_whitespace().nth(2).map(str::to_string)
}

/// Pick version folders that apply to `version`.
///
/// Folder names are a major version (`45`), a closed range (`43..45`), or an open
/// range (`46..`, `..44`). Only the major component of `version` is compared.
pub fn matching_version_folders<S: AsRef<str>>(version: &str, folders: &[S]) -> Vec<String> {
    let Some(major) = version
        .split('.')
        .next()
        .and_then(|part| part.trim().parse::<u32>().ok())
    else {
        return Vec::new();
    };

    folders
        .iter()
        .map(AsRef::as_ref)
        .filter(|folder| folder_matches(folder, major))
        .map(str::to_string)
        .collect()
}

fn folder_matches(folder: &str, major: u32) -> bool {
    match folder.split_once("..") {
        Some((from, to)) => {
            let from = from.parse::<u32>().ok();
            let to = to.parse::<u32>().ok();
            match (from, to) {
                (Some(from), Some(to)) => (from..=to).contains(&major),
                (Some(from), None) => major >= from,
                (None, Some(to)) => major <= to,
                (None, None) => false,
            }
        }
        None => match folder.parse::<u32>() {
            Ok(exact) => exact == major,
            Err(_) => {
                tracing::warn!(folder, "ignoring unrecognized version folder");
                false
            }
        },
    }
}
