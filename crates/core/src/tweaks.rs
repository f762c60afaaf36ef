//! Optional adjustments applied once, before any color is installed.
//!
//! Tweaks may edit the palette (the only place it is mutated) and add styles or
//! assets to the staged theme.

use std::path::{Path, PathBuf};

use crate::colors::hex_to_rgba;
use crate::error::Result;
use crate::model::{Alpha, Mode};
use crate::palette::Palette;
use crate::staging::StagingArea;

pub const BACKGROUND_ROLE: &str = "BACKGROUND-COLOR";

pub struct TweakContext<'a> {
    pub palette: &'a mut Palette,
    pub staging: &'a StagingArea,
    pub tweaks_dir: &'a Path,
}

pub trait Tweak: Send + Sync {
    fn name(&self) -> &'static str;

    fn apply(&self, ctx: &mut TweakContext<'_>) -> Result<()>;
}

/// Make menu and popover backgrounds fully opaque.
#[derive(Debug, Clone, Copy, Default)]
pub struct Opaque;

impl Tweak for Opaque {
    fn name(&self) -> &'static str {
        "opaque"
    }

    fn apply(&self, ctx: &mut TweakContext<'_>) -> Result<()> {
        for mode in Mode::ALL {
            ctx.palette.set_alpha(BACKGROUND_ROLE, mode, Alpha::opaque())?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Panel {
    pub default_size: bool,
    pub no_pill: bool,
    pub text_color: Option<String>,
}

impl Panel {
    fn folder(tweaks_dir: &Path) -> PathBuf {
        tweaks_dir.join("panel")
    }
}

impl Tweak for Panel {
    fn name(&self) -> &'static str {
        "panel"
    }

    fn apply(&self, ctx: &mut TweakContext<'_>) -> Result<()> {
        let folder = Self::folder(ctx.tweaks_dir);
        if self.default_size {
            ctx.staging.append_from_file(&folder.join("def-size.css"))?;
        }
        if self.no_pill {
            ctx.staging.append_from_file(&folder.join("no-pill.css"))?;
        }
        if let Some(hex) = &self.text_color {
            let color = hex_to_rgba(hex)?;
            ctx.staging.append(&panel_text_rule(&color.to_string()))?;
        }
        Ok(())
    }
}

fn panel_text_rule(color: &str) -> String {
    format!(".panel-button, .clock, .clock-display StIcon {{ color: {color}; }}")
}

/// Swap the Show Apps icon for a Launchpad-style one.
#[derive(Debug, Clone, Copy, Default)]
pub struct Launchpad;

impl Tweak for Launchpad {
    fn name(&self) -> &'static str {
        "launchpad"
    }

    fn apply(&self, ctx: &mut TweakContext<'_>) -> Result<()> {
        let folder = ctx.tweaks_dir.join("overview").join("launchpad");
        ctx.staging.append_from_file(&folder.join("launchpad.css"))?;
        ctx.staging.add_asset(&folder.join("launchpad.png"))
    }
}

/// Which tweaks the user asked for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TweakOptions {
    pub opaque: bool,
    pub panel_default_size: bool,
    pub panel_no_pill: bool,
    pub panel_text_color: Option<String>,
    pub launchpad: bool,
}

impl TweakOptions {
    pub fn build(&self) -> Vec<Box<dyn Tweak>> {
        let mut tweaks: Vec<Box<dyn Tweak>> = Vec::new();
        if self.opaque {
            tweaks.push(Box::new(Opaque));
        }
        if self.panel_default_size || self.panel_no_pill || self.panel_text_color.is_some() {
            tweaks.push(Box::new(Panel {
                default_size: self.panel_default_size,
                no_pill: self.panel_no_pill,
                text_color: self.panel_text_color.clone(),
            }));
        }
        if self.launchpad {
            tweaks.push(Box::new(Launchpad));
        }
        tweaks
    }
}

pub fn apply_tweaks(tweaks: &[Box<dyn Tweak>], ctx: &mut TweakContext<'_>) -> Result<()> {
    for tweak in tweaks {
        tweak.apply(ctx)?;
        tracing::info!(tweak = tweak.name(), "applied tweak");
    }
    Ok(())
}
