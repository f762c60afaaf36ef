//! Palette document loading.
//!
//! The document maps role tokens to per-mode color recipes and lists the named accent
//! presets. `default` references are resolved once here, so conversions never chase
//! them at runtime.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{IoResultExt, Result, ThemeError};
use crate::model::{AccentColor, Alpha, ColorDefinition, Mode, MAX_HUE};

#[derive(Debug, Deserialize)]
struct PaletteDocument {
    elements: Map<String, Value>,
    #[serde(default)]
    colors: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct RawRole {
    light: Option<ColorDefinition>,
    dark: Option<ColorDefinition>,
    default: Option<String>,
    replace: Option<String>,
}

impl RawRole {
    fn direct(&self, mode: Mode) -> Option<&ColorDefinition> {
        match mode {
            Mode::Light => self.light.as_ref(),
            Mode::Dark => self.dark.as_ref(),
        }
    }

    fn default_role(&self) -> Option<&str> {
        self.default.as_deref().filter(|name| !name.is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct RawAccent {
    h: u16,
    s: Option<u16>,
}

#[derive(Debug, Clone, PartialEq)]
struct ModeEntry {
    definition: ColorDefinition,
    borrowed_from: Option<String>,
}

/// A role with its `default` reference already resolved for each mode.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRole {
    name: String,
    token: String,
    light: Option<ModeEntry>,
    dark: Option<ModeEntry>,
}

impl ResolvedRole {
    /// Key of the role in the palette document.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Placeholder text searched for in template files.
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn definition(&self, mode: Mode) -> Result<&ColorDefinition> {
        self.entry(mode)
            .map(|entry| &entry.definition)
            .ok_or_else(|| ThemeError::lookup(format!("{}.{}", self.name, mode)))
    }

    fn entry(&self, mode: Mode) -> Option<&ModeEntry> {
        match mode {
            Mode::Light => self.light.as_ref(),
            Mode::Dark => self.dark.as_ref(),
        }
    }

    fn entry_mut(&mut self, mode: Mode) -> Option<&mut ModeEntry> {
        match mode {
            Mode::Light => self.light.as_mut(),
            Mode::Dark => self.dark.as_mut(),
        }
    }
}

/// Flattened color-role table plus accent presets.
///
/// Cloning is cheap enough to hand every concurrent installation its own copy.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    roles: Vec<ResolvedRole>,
    accents: Vec<AccentColor>,
}

impl Palette {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).at_path(path)?;
        Self::parse(&raw, path)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Self::parse(json, Path::new("<inline>"))
    }

    fn parse(json: &str, origin: &Path) -> Result<Self> {
        let palette_error = |source| ThemeError::Palette {
            path: PathBuf::from(origin),
            source,
        };
        let document: PaletteDocument = serde_json::from_str(json).map_err(palette_error)?;

        let mut raw_roles = Vec::with_capacity(document.elements.len());
        for (name, value) in document.elements {
            let role: RawRole = serde_json::from_value(value).map_err(palette_error)?;
            raw_roles.push((name, role));
        }

        let mut accents = Vec::with_capacity(document.colors.len());
        for (name, value) in document.colors {
            let accent: RawAccent = serde_json::from_value(value).map_err(palette_error)?;
            if accent.h > MAX_HUE {
                return Err(ThemeError::validation(format!(
                    "Accent '{name}' has hue {} outside 0-{MAX_HUE}",
                    accent.h
                )));
            }
            accents.push(AccentColor {
                name,
                hue: accent.h,
                saturation: accent.s,
            });
        }

        let roles = flatten(&raw_roles)?;
        Ok(Self { roles, accents })
    }

    /// Roles in document order.
    pub fn roles(&self) -> &[ResolvedRole] {
        &self.roles
    }

    pub fn role(&self, name: &str) -> Option<&ResolvedRole> {
        self.roles.iter().find(|role| role.name == name)
    }

    pub fn accents(&self) -> &[AccentColor] {
        &self.accents
    }

    pub fn accent(&self, name: &str) -> Option<&AccentColor> {
        self.accents.iter().find(|accent| accent.name == name)
    }

    pub fn set_alpha(&mut self, name: &str, mode: Mode, alpha: Alpha) -> Result<()> {
        if !(0.0..=1.0).contains(&alpha.value()) {
            return Err(ThemeError::validation(format!(
                "Alpha must be between 0 and 1, not {alpha}"
            )));
        }
        self.update_definition(name, mode, |definition| definition.a = alpha.clone())
    }

    pub fn set_lightness(&mut self, name: &str, mode: Mode, lightness: u8) -> Result<()> {
        if lightness > 100 {
            return Err(ThemeError::validation(format!(
                "Lightness must be between 0 and 100, not {lightness}"
            )));
        }
        self.update_definition(name, mode, |definition| definition.l = lightness)
    }

    /// Mutate a role's own definition for `mode`. Roles borrowing that definition
    /// through `default` see the change too.
    fn update_definition<F>(&mut self, name: &str, mode: Mode, mut apply: F) -> Result<()>
    where
        F: FnMut(&mut ColorDefinition),
    {
        let owner = self
            .roles
            .iter_mut()
            .find(|role| role.name == name)
            .ok_or_else(|| ThemeError::lookup(name))?;
        let entry = owner
            .entry_mut(mode)
            .filter(|entry| entry.borrowed_from.is_none())
            .ok_or_else(|| ThemeError::lookup(format!("{name}.{mode}")))?;
        apply(&mut entry.definition);

        for role in &mut self.roles {
            if let Some(entry) = role.entry_mut(mode) {
                if entry.borrowed_from.as_deref() == Some(name) {
                    apply(&mut entry.definition);
                }
            }
        }
        Ok(())
    }
}

fn flatten(raw_roles: &[(String, RawRole)]) -> Result<Vec<ResolvedRole>> {
    let find = |name: &str| raw_roles.iter().find(|(key, _)| key == name).map(|(_, role)| role);

    let mut tokens = HashSet::new();
    let mut resolved = Vec::with_capacity(raw_roles.len());

    for (name, role) in raw_roles {
        if role.light.is_none() && role.dark.is_none() && role.default_role().is_none() {
            return Err(ThemeError::validation(format!(
                "Role '{name}' defines no colors and no default"
            )));
        }

        let token = role
            .replace
            .clone()
            .filter(|token| !token.is_empty())
            .unwrap_or_else(|| name.clone());
        if !tokens.insert(token.clone()) {
            return Err(ThemeError::validation(format!(
                "Token '{token}' is defined more than once"
            )));
        }

        let mut entries = [None, None];
        for (slot, mode) in entries.iter_mut().zip(Mode::ALL) {
            *slot = resolve_entry(name, role, mode, &find)?;
        }
        let [light, dark] = entries;

        resolved.push(ResolvedRole {
            name: name.clone(),
            token,
            light,
            dark,
        });
    }

    Ok(resolved)
}

fn resolve_entry<'a, F>(name: &str, role: &RawRole, mode: Mode, find: &F) -> Result<Option<ModeEntry>>
where
    F: Fn(&str) -> Option<&'a RawRole>,
{
    if let Some(definition) = role.direct(mode) {
        validate_definition(name, mode, definition)?;
        return Ok(Some(ModeEntry {
            definition: definition.clone(),
            borrowed_from: None,
        }));
    }

    let Some(default_name) = role.default_role() else {
        return Ok(None);
    };
    let default_role = find(default_name).ok_or_else(|| {
        ThemeError::validation(format!(
            "Role '{name}' defaults to unknown role '{default_name}'"
        ))
    })?;
    let definition = default_role.direct(mode).ok_or_else(|| {
        ThemeError::validation(format!(
            "Role '{name}' defaults to '{default_name}', which has no {mode} color of its own"
        ))
    })?;
    validate_definition(default_name, mode, definition)?;

    Ok(Some(ModeEntry {
        definition: definition.clone(),
        borrowed_from: Some(default_name.to_string()),
    }))
}

fn validate_definition(name: &str, mode: Mode, definition: &ColorDefinition) -> Result<()> {
    if definition.l > 100 || definition.s > 100 {
        return Err(ThemeError::validation(format!(
            "Role '{name}' ({mode}) lightness and saturation must be 0-100"
        )));
    }
    if !(0.0..=1.0).contains(&definition.a.value()) {
        return Err(ThemeError::validation(format!(
            "Role '{name}' ({mode}) alpha must be between 0 and 1, not {}",
            definition.a
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"{
        "elements": {
            "BACKGROUND-COLOR": {
                "light": {"l": 95, "s": 10, "a": 0.9},
                "dark": {"l": 12, "s": 10, "a": 0.85}
            },
            "ACCENT-COLOR": {
                "light": {"l": 45, "s": 70, "a": 1},
                "dark": {"l": 60, "s": 75, "a": 1}
            },
            "POPUP-COLOR": {
                "light": {"l": 98, "s": 5, "a": 0.9},
                "default": "BACKGROUND-COLOR"
            }
        },
        "colors": {
            "red": {"h": 0},
            "gray": {"h": 0, "s": 0}
        }
    }"#;

    #[test]
    fn keeps_document_order_and_resolves_defaults() {
        let palette = Palette::from_json(SAMPLE).unwrap();
        let names: Vec<_> = palette.roles().iter().map(|role| role.name()).collect();
        assert_eq!(names, vec!["BACKGROUND-COLOR", "ACCENT-COLOR", "POPUP-COLOR"]);

        let popup = palette.role("POPUP-COLOR").unwrap();
        let background = palette.role("BACKGROUND-COLOR").unwrap();
        assert_eq!(
            popup.definition(Mode::Dark).unwrap(),
            background.definition(Mode::Dark).unwrap()
        );
        assert_eq!(popup.definition(Mode::Light).unwrap().l, 98);
    }

    #[test]
    fn reads_accent_presets() {
        let palette = Palette::from_json(SAMPLE).unwrap();
        assert_eq!(palette.accents().len(), 2);
        assert_eq!(palette.accent("gray").unwrap().saturation, Some(0));
        assert_eq!(palette.accent("red").unwrap().saturation, None);
        assert!(palette.accent("teal").is_none());
    }

    #[test]
    fn replace_key_overrides_token() {
        let palette = Palette::from_json(
            r#"{"elements": {"accent": {"dark": {"l": 50, "s": 80, "a": 1.0}, "replace": "ACCENT-COLOR"}}}"#,
        )
        .unwrap();
        assert_eq!(palette.roles()[0].token(), "ACCENT-COLOR");
    }

    #[test]
    fn missing_mode_without_default_is_lookup_error() {
        let palette =
            Palette::from_json(r#"{"elements": {"ONLY-DARK": {"dark": {"l": 50, "s": 80, "a": 1}}}}"#)
                .unwrap();
        let err = palette.roles()[0].definition(Mode::Light).unwrap_err();
        assert!(matches!(err, ThemeError::Lookup { .. }));
    }

    #[test]
    fn rejects_two_hop_default_chain() {
        let err = Palette::from_json(
            r#"{"elements": {
                "A": {"light": {"l": 50, "s": 50, "a": 1}, "dark": {"l": 20, "s": 50, "a": 1}},
                "B": {"light": {"l": 50, "s": 50, "a": 1}, "default": "A"},
                "C": {"light": {"l": 50, "s": 50, "a": 1}, "default": "B"}
            }}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ThemeError::Validation { .. }));
        assert!(err.to_string().contains("'C' defaults to 'B'"));
    }

    #[test]
    fn rejects_unknown_default_and_empty_roles() {
        let unknown = Palette::from_json(
            r#"{"elements": {"A": {"light": {"l": 50, "s": 50, "a": 1}, "default": "NOPE"}}}"#,
        )
        .unwrap_err();
        assert!(unknown.to_string().contains("unknown role 'NOPE'"));

        let empty = Palette::from_json(r#"{"elements": {"A": {}}}"#).unwrap_err();
        assert!(matches!(empty, ThemeError::Validation { .. }));
    }

    #[test]
    fn rejects_out_of_range_definitions() {
        let err = Palette::from_json(r#"{"elements": {"A": {"dark": {"l": 150, "s": 50, "a": 1}}}}"#)
            .unwrap_err();
        assert!(matches!(err, ThemeError::Validation { .. }));

        let err = Palette::from_json(r#"{"elements": {"A": {"dark": {"l": 50, "s": 50, "a": 2}}}}"#)
            .unwrap_err();
        assert!(matches!(err, ThemeError::Validation { .. }));
    }

    #[test]
    fn malformed_json_is_palette_error() {
        let err = Palette::from_json("{not json").unwrap_err();
        assert!(matches!(err, ThemeError::Palette { .. }));
    }

    #[test]
    fn set_alpha_propagates_to_borrowers() {
        let mut palette = Palette::from_json(SAMPLE).unwrap();
        palette
            .set_alpha("BACKGROUND-COLOR", Mode::Dark, Alpha::opaque())
            .unwrap();

        let popup = palette.role("POPUP-COLOR").unwrap();
        assert_eq!(popup.definition(Mode::Dark).unwrap().a.to_string(), "1");
        assert_eq!(popup.definition(Mode::Light).unwrap().a.to_string(), "0.9");
    }

    #[test]
    fn cannot_mutate_borrowed_or_unknown_entries() {
        let mut palette = Palette::from_json(SAMPLE).unwrap();
        assert!(palette.set_lightness("POPUP-COLOR", Mode::Dark, 20).is_err());
        assert!(palette.set_lightness("MISSING", Mode::Dark, 20).is_err());
        assert!(palette.set_lightness("ACCENT-COLOR", Mode::Dark, 101).is_err());

        palette.set_lightness("ACCENT-COLOR", Mode::Dark, 20).unwrap();
        let accent = palette.role("ACCENT-COLOR").unwrap();
        assert_eq!(accent.definition(Mode::Dark).unwrap().l, 20);
    }
}
