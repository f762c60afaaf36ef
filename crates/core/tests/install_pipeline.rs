use std::fs;
use std::path::{Path, PathBuf};

use marble_core::installer::ColorSelection;
use marble_core::{AppConfig, InstallOptions, InstallService, Mode, VersionSource};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const PALETTE: &str = r#"{
    "elements": {
        "ACCENT-COLOR": {
            "light": {"l": 45, "s": 70, "a": 1},
            "dark": {"l": 50, "s": 80, "a": 1.0}
        },
        "ACCENT-FILLED-COLOR": {
            "default": "ACCENT-COLOR"
        },
        "BUTTON-COLOR": {
            "light": {"l": 90, "s": 0, "a": 1},
            "dark": {"l": 20, "s": 0, "a": 1}
        },
        "BACKGROUND-COLOR": {
            "light": {"l": 95, "s": 10, "a": 0.9},
            "dark": {"l": 12, "s": 10, "a": 0.85}
        }
    },
    "colors": {
        "red": {"h": 0},
        "gray": {"h": 0, "s": 0}
    }
}"#;

const ICON: [u8; 8] = [0x89, b'P', b'N', b'G', b'A', b'C', b'C', b'E'];

fn write(path: &Path, content: impl AsRef<[u8]>) {
    fs::create_dir_all(path.parent().expect("parent")).expect("create dirs");
    fs::write(path, content).expect("write file");
}

fn checkout(root: &Path) -> AppConfig {
    write(&root.join("colors.json"), PALETTE);

    let source = root.join("theme/gnome-shell");
    write(&source.join(".css/a-base.css"), ".accent { color: ACCENT-COLOR; }");
    write(&source.join(".css/b-button.css"), ".button { background: BUTTON-COLOR; }");
    write(&source.join(".versions/45..46/.css/quick.css"), ".quick { color: BACKGROUND-COLOR; }");
    write(&source.join(".versions/47../.css/new.css"), ".new {}");
    write(&source.join("toggle-on.svg"), "<svg fill=\"ACCENT-COLOR\"/>");
    write(&source.join("assets/nested.svg"), "<svg fill=\"ACCENT-COLOR\"/>");

    let launchpad = root.join("tweaks/overview/launchpad");
    write(&launchpad.join("launchpad.css"), ".show-apps { background: ACCENT-COLOR; }");
    write(&launchpad.join("launchpad.png"), ICON);

    AppConfig::from_dirs(root.to_path_buf(), root.join("themes"))
}

fn installed(config: &AppConfig, folder: &str, file: &str) -> PathBuf {
    config.themes_dir().join(folder).join("gnome-shell").join(file)
}

#[test]
fn staged_install_with_filled_buttons_and_tweaks() {
    let dir = TempDir::new().expect("temp dir");
    let config = checkout(dir.path());
    let service = InstallService::new(config.clone());

    let mut options = InstallOptions::new(ColorSelection::Presets {
        all: true,
        names: vec![],
    });
    options.mode = Some(Mode::Dark);
    options.filled = true;
    options.tweaks.opaque = true;
    options.tweaks.launchpad = true;
    options.version = VersionSource::Fixed("46.2".into());

    let report = service.install(&options).expect("install");
    assert_eq!(report.shell_version.as_deref(), Some("46.2"));
    assert_eq!(report.failures().count(), 0);

    let css = fs::read_to_string(installed(&config, "Marble-red-dark", "gnome-shell.css"))
        .expect("red stylesheet");
    assert_eq!(
        css,
        concat!(
            ".accent { color: rgba(230, 25, 25, 1.0); }\n",
            ".button { background: rgba(230, 25, 25, 1.0); }\n",
            ".quick { color: rgba(34, 28, 28, 1); }\n",
            ".show-apps { background: rgba(230, 25, 25, 1.0); }\n",
        )
    );

    let gray = fs::read_to_string(installed(&config, "Marble-gray-dark", "gnome-shell.css"))
        .expect("gray stylesheet");
    assert!(gray.starts_with(".accent { color: rgba(128, 128, 128, 1.0); }"));

    assert_eq!(
        fs::read_to_string(installed(&config, "Marble-red-dark", "toggle-on.svg")).unwrap(),
        "<svg fill=\"rgba(230, 25, 25, 1.0)\"/>"
    );
    // only top-level files are colored
    assert_eq!(
        fs::read_to_string(installed(&config, "Marble-red-dark", "assets/nested.svg")).unwrap(),
        "<svg fill=\"ACCENT-COLOR\"/>"
    );
    assert_eq!(
        fs::read(installed(&config, "Marble-red-dark", "launchpad.png")).unwrap(),
        ICON.to_vec()
    );

    assert!(!config.themes_dir().join("Marble-red-light").exists());
    assert!(!config.staging_dir().exists());
    assert_eq!(
        fs::read_to_string(config.source_dir().join(".css/b-button.css")).unwrap(),
        ".button { background: BUTTON-COLOR; }"
    );
}

#[test]
fn custom_hue_installs_both_modes_under_default_name() {
    let dir = TempDir::new().expect("temp dir");
    let config = checkout(dir.path());
    let service = InstallService::new(config.clone());

    let mut options = InstallOptions::new(ColorSelection::Custom {
        hue: 360,
        name: None,
    });
    options.version = VersionSource::Ignore;
    options.parallel = false;

    let report = service.install(&options).expect("install");
    assert_eq!(report.outcomes.len(), 1);
    assert_eq!(report.outcomes[0].name, "hue360");
    assert_eq!(report.outcomes[0].modes, vec![Mode::Light, Mode::Dark]);

    let dark = fs::read_to_string(installed(&config, "Marble-hue360-dark", "gnome-shell.css"))
        .expect("dark stylesheet");
    assert!(dark.starts_with(".accent { color: rgba(230, 25, 25, 1.0); }"));
    assert!(dark.contains(".button { background: rgba(51, 51, 51, 1); }"));
    assert!(!dark.contains(".quick"));
    assert!(installed(&config, "Marble-hue360-light", "gnome-shell.css").exists());
}
