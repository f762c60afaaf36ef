use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ThemeError};

pub const MAX_HUE: u16 = 360;
pub const MAX_SATURATION: u16 = 250;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Light,
    Dark,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::Light, Mode::Dark];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Light => "light",
            Mode::Dark => "dark",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Mode {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Mode::Light),
            "dark" => Ok(Mode::Dark),
            other => Err(ThemeError::lookup(other)),
        }
    }
}

impl ValueEnum for Mode {
    fn value_variants<'a>() -> &'a [Self] {
        &Mode::ALL
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(clap::builder::PossibleValue::new(self.as_str()))
    }
}

/// Opacity as written in the palette document. Rendered verbatim, so `1.0` stays `1.0`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Alpha(serde_json::Number);

impl Alpha {
    pub fn opaque() -> Self {
        Alpha(serde_json::Number::from(1))
    }

    pub fn value(&self) -> f64 {
        self.0.as_f64().unwrap_or(f64::NAN)
    }
}

impl fmt::Display for Alpha {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One mode's color recipe: lightness and saturation in percent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ColorDefinition {
    pub l: u8,
    pub s: u8,
    pub a: Alpha,
}

/// Hue, optional saturation scale and the modes to install for one color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallationRequest {
    hue: u16,
    saturation: Option<u16>,
    modes: Vec<Mode>,
}

impl InstallationRequest {
    pub fn new(hue: u16, saturation: Option<u16>, modes: Vec<Mode>) -> Result<Self> {
        if hue > MAX_HUE {
            return Err(ThemeError::validation(format!(
                "Hue must be between 0 and {MAX_HUE}, not {hue}"
            )));
        }
        if modes.is_empty() {
            return Err(ThemeError::validation("At least one mode must be requested"));
        }
        let mut unique = Vec::with_capacity(modes.len());
        for mode in modes {
            if !unique.contains(&mode) {
                unique.push(mode);
            }
        }
        Ok(Self {
            hue,
            saturation,
            modes: unique,
        })
    }

    /// Request for a single mode, or both modes when `mode` is `None`.
    pub fn for_mode(hue: u16, saturation: Option<u16>, mode: Option<Mode>) -> Result<Self> {
        let modes = match mode {
            Some(mode) => vec![mode],
            None => Mode::ALL.to_vec(),
        };
        Self::new(hue, saturation, modes)
    }

    pub fn hue(&self) -> u16 {
        self.hue
    }

    pub fn saturation(&self) -> Option<u16> {
        self.saturation
    }

    pub fn modes(&self) -> &[Mode] {
        &self.modes
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColorReplacement {
    pub token: String,
    pub value: String,
}

impl ColorReplacement {
    pub fn new(token: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            value: value.into(),
        }
    }
}

impl<T: Into<String>, V: Into<String>> From<(T, V)> for ColorReplacement {
    fn from((token, value): (T, V)) -> Self {
        Self::new(token, value)
    }
}

/// A named accent preset such as `blue` or `gray`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccentColor {
    pub name: String,
    pub hue: u16,
    pub saturation: Option<u16>,
}
