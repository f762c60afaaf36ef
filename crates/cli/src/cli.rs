use std::path::PathBuf;

use clap::{value_parser, ArgAction, Args, Parser};

use crate::core::installer::ColorSelection;
use crate::core::tweaks::TweakOptions;
use crate::model::Mode;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "marble",
    version,
    about = "Install the Marble GNOME Shell theme in any accent color.",
    after_help = "Examples:\n  marble -a                            all accent colors, light & dark mode\n  marble --all --mode dark             all accent colors, dark mode\n  marble --color purple --mode light   purple accent color, light mode\n  marble --hue 150 --name coldgreen    custom coldgreen accent color, light & dark mode\n  marble --color red,green --sat 70    red and green, 70% of stock saturation\n  marble --remove --color blue         remove installed blue themes"
)]
pub struct Cli {
    /// Theme checkout holding colors.json, theme/ and tweaks/ (defaults to $MARBLE_ROOT or the current dir)
    #[arg(long, value_name = "PATH")]
    pub root: Option<PathBuf>,

    /// Where themes are installed (defaults to $MARBLE_THEMES_DIR or ~/.themes)
    #[arg(long = "themes-dir", value_name = "PATH")]
    pub themes_dir: Option<PathBuf>,

    /// Override the tracing filter (e.g. "info", "debug")
    #[arg(long = "log", value_name = "DIRECTIVE")]
    pub log_filter: Option<String>,

    #[command(flatten)]
    pub colors: ColorArgs,

    #[command(flatten)]
    pub style: StyleArgs,

    #[command(flatten)]
    pub tweaks: TweakArgs,

    #[command(flatten)]
    pub actions: ActionArgs,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ColorArgs {
    /// All available accent colors
    #[arg(short = 'a', long)]
    pub all: bool,

    /// Accent colors from colors.json (comma-separated or repeated flag)
    #[arg(long, value_name = "NAME", value_delimiter = ',', action = ArgAction::Append)]
    pub color: Vec<String>,

    /// Generate the theme from a hue
    #[arg(long, value_name = "0-360", value_parser = value_parser!(u16).range(0..=360))]
    pub hue: Option<u16>,

    /// Name for a custom hue theme (defaults to hue<HUE>)
    #[arg(long, requires = "hue")]
    pub name: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct StyleArgs {
    /// Install only this theme mode
    #[arg(long, value_enum)]
    pub mode: Option<Mode>,

    /// Percentage of stock saturation (<100 reduces, >100 increases)
    #[arg(long, value_name = "0-250", value_parser = value_parser!(u16).range(0..=250))]
    pub sat: Option<u16>,

    /// Make the accent color more vibrant on buttons
    #[arg(long)]
    pub filled: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct TweakArgs {
    /// Make menu and popover backgrounds opaque
    #[arg(long)]
    pub opaque: bool,

    /// Keep the stock panel height
    #[arg(long = "panel-default-size")]
    pub panel_default_size: bool,

    /// Drop the pill shape around panel buttons
    #[arg(long = "panel-no-pill")]
    pub panel_no_pill: bool,

    /// Panel text color as hex (#rgb, #rrggbb or #rrggbbaa)
    #[arg(long = "panel-text-color", value_name = "HEX")]
    pub panel_text_color: Option<String>,

    /// Use a Launchpad-style Show Apps icon
    #[arg(long)]
    pub launchpad: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ActionArgs {
    /// Remove installed Marble themes
    #[arg(short = 'r', long, conflicts_with = "reinstall")]
    pub remove: bool,

    /// Remove the selected themes, then install them again
    #[arg(long)]
    pub reinstall: bool,

    /// Do not ask before deleting themes
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Install colors one after another instead of in parallel
    #[arg(long)]
    pub sequential: bool,
}

/// What the invocation asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Install,
    Remove,
    Reinstall,
}

impl Cli {
    pub fn action(&self) -> Action {
        if self.actions.remove {
            Action::Remove
        } else if self.actions.reinstall {
            Action::Reinstall
        } else {
            Action::Install
        }
    }

    /// A custom hue wins over preset colors.
    pub fn selection(&self) -> ColorSelection {
        match self.colors.hue {
            Some(hue) => ColorSelection::Custom {
                hue,
                name: self.colors.name.clone(),
            },
            None => ColorSelection::Presets {
                all: self.colors.all,
                names: self.colors.color.clone(),
            },
        }
    }
}

impl From<&TweakArgs> for TweakOptions {
    fn from(args: &TweakArgs) -> Self {
        TweakOptions {
            opaque: args.opaque,
            panel_default_size: args.panel_default_size,
            panel_no_pill: args.panel_no_pill,
            panel_text_color: args.panel_text_color.clone(),
            launchpad: args.launchpad,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("marble").chain(args.iter().copied()))
            .expect("valid arguments")
    }

    #[test]
    fn parses_presets_and_style() {
        let cli = parse(&["--color", "red,blue", "--color", "gray", "--mode", "dark", "--sat", "70"]);
        assert_eq!(cli.action(), Action::Install);
        assert_eq!(
            cli.selection(),
            ColorSelection::Presets {
                all: false,
                names: vec!["red".into(), "blue".into(), "gray".into()],
            }
        );
        assert_eq!(cli.style.mode, Some(Mode::Dark));
        assert_eq!(cli.style.sat, Some(70));
    }

    #[test]
    fn custom_hue_takes_precedence() {
        let cli = parse(&["-a", "--hue", "150", "--name", "coldgreen"]);
        assert_eq!(
            cli.selection(),
            ColorSelection::Custom {
                hue: 150,
                name: Some("coldgreen".into()),
            }
        );
    }

    #[test]
    fn maps_tweak_flags() {
        let cli = parse(&["-a", "--opaque", "--panel-no-pill", "--panel-text-color", "#fff"]);
        let options = TweakOptions::from(&cli.tweaks);
        assert!(options.opaque);
        assert!(options.panel_no_pill);
        assert!(!options.launchpad);
        assert_eq!(options.panel_text_color.as_deref(), Some("#fff"));
    }

    #[rstest]
    #[case(&["-r", "-a"], Action::Remove)]
    #[case(&["--reinstall", "--color", "red"], Action::Reinstall)]
    #[case(&["--hue", "0"], Action::Install)]
    fn resolves_action(#[case] args: &[&str], #[case] expected: Action) {
        assert_eq!(parse(args).action(), expected);
    }

    #[rstest]
    #[case(&["--hue", "361"])]
    #[case(&["--sat", "251", "-a"])]
    #[case(&["--mode", "dim", "-a"])]
    #[case(&["--name", "teal"])]
    #[case(&["--remove", "--reinstall", "-a"])]
    fn rejects_invalid_arguments(#[case] args: &[&str]) {
        let result = Cli::try_parse_from(std::iter::once("marble").chain(args.iter().copied()));
        assert!(result.is_err());
    }
}
