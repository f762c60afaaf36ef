use crate::colors::hsl_to_rgb;
use crate::error::Result;
use crate::model::{ColorReplacement, InstallationRequest, Mode};
use crate::palette::{Palette, ResolvedRole};

/// Turns a palette plus a requested hue into literal `rgba(...)` replacements.
#[derive(Debug, Clone, Copy)]
pub struct ColorReplacementGenerator<'a> {
    palette: &'a Palette,
}

impl<'a> ColorReplacementGenerator<'a> {
    pub fn new(palette: &'a Palette) -> Self {
        Self { palette }
    }

    /// One replacement per palette role, in palette order.
    pub fn convert(
        &self,
        mode: Mode,
        request: &InstallationRequest,
    ) -> Result<Vec<ColorReplacement>> {
        self.palette
            .roles()
            .iter()
            .map(|role| {
                let value = rgba_value(role, mode, request)?;
                Ok(ColorReplacement::new(role.token(), value))
            })
            .collect()
    }
}

fn rgba_value(role: &ResolvedRole, mode: Mode, request: &InstallationRequest) -> Result<String> {
    let definition = role.definition(mode)?;

    let lightness = f64::from(definition.l) / 100.0;
    let stock_saturation = f64::from(definition.s) / 100.0;
    let saturation = effective_saturation(stock_saturation, request.saturation());

    let (red, green, blue) = hsl_to_rgb(f64::from(request.hue()), saturation, lightness)?;
    Ok(format!("rgba({red}, {green}, {blue}, {})", definition.a))
}

/// Scale stock saturation by a percentage, capped at full saturation.
pub fn effective_saturation(stock: f64, scale_percent: Option<u16>) -> f64 {
    match scale_percent {
        Some(scale) => (stock * f64::from(scale) / 100.0).min(1.0),
        None => stock,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ThemeError;
    use pretty_assertions::assert_eq;

    fn palette() -> Palette {
        Palette::from_json(
            r#"{"elements": {
                "ACCENT-COLOR": {
                    "light": {"l": 45, "s": 70, "a": 1},
                    "dark": {"l": 50, "s": 80, "a": 1.0}
                },
                "ACCENT_HOVER": {
                    "light": {"l": 40, "s": 60, "a": 0.8}
                },
                "BUTTON-COLOR": {
                    "light": {"l": 90, "s": 20, "a": 0.5},
                    "default": "ACCENT-COLOR"
                }
            }}"#,
        )
        .unwrap()
    }

    fn request(hue: u16, saturation: Option<u16>) -> InstallationRequest {
        InstallationRequest::new(hue, saturation, vec![Mode::Dark]).unwrap()
    }

    #[test]
    fn converts_accent_role_in_dark_mode() {
        let palette = Palette::from_json(
            r#"{"elements": {"ACCENT-COLOR": {"dark": {"l": 50, "s": 80, "a": 1.0}, "replace": "ACCENT-COLOR"}}}"#,
        )
        .unwrap();
        let generator = ColorReplacementGenerator::new(&palette);

        let replacements = generator.convert(Mode::Dark, &request(0, None)).unwrap();
        assert_eq!(
            replacements,
            vec![ColorReplacement::new("ACCENT-COLOR", "rgba(230, 25, 25, 1.0)")]
        );
    }

    #[test]
    fn output_follows_palette_order_and_is_deterministic() {
        let palette = palette();
        let generator = ColorReplacementGenerator::new(&palette);
        let request = InstallationRequest::new(210, Some(60), vec![Mode::Light]).unwrap();

        let first = generator.convert(Mode::Light, &request).unwrap();
        let second = generator.convert(Mode::Light, &request).unwrap();
        assert_eq!(first, second);

        let tokens: Vec<_> = first.iter().map(|r| r.token.as_str()).collect();
        assert_eq!(tokens, vec!["ACCENT-COLOR", "ACCENT_HOVER", "BUTTON-COLOR"]);
    }

    #[test]
    fn default_role_matches_direct_conversion() {
        let palette = palette();
        let generator = ColorReplacementGenerator::new(&palette);

        let replacements = generator.convert(Mode::Dark, &request(0, None));
        // ACCENT_HOVER has no dark entry and no default.
        assert!(matches!(replacements, Err(ThemeError::Lookup { .. })));

        let accent_only = Palette::from_json(
            r#"{"elements": {
                "ACCENT-COLOR": {"dark": {"l": 50, "s": 80, "a": 1.0}},
                "BUTTON-COLOR": {"light": {"l": 90, "s": 20, "a": 0.5}, "default": "ACCENT-COLOR"}
            }}"#,
        )
        .unwrap();
        let generator = ColorReplacementGenerator::new(&accent_only);
        let replacements = generator.convert(Mode::Dark, &request(140, Some(70))).unwrap();
        assert_eq!(replacements[0].value, replacements[1].value);
        assert_eq!(replacements[1].token, "BUTTON-COLOR");
    }

    #[test]
    fn saturation_scale_is_clamped() {
        assert_eq!(effective_saturation(0.8, Some(200)), 1.0);
        assert_eq!(effective_saturation(0.8, None), 0.8);
        assert!((effective_saturation(0.8, Some(50)) - 0.4).abs() < 1e-12);

        let palette = Palette::from_json(
            r#"{"elements": {"ACCENT-COLOR": {"dark": {"l": 50, "s": 80, "a": 1}}}}"#,
        )
        .unwrap();
        let generator = ColorReplacementGenerator::new(&palette);
        let boosted = generator.convert(Mode::Dark, &request(0, Some(999))).unwrap();
        assert_eq!(boosted[0].value, "rgba(255, 0, 0, 1)");
    }

    #[test]
    fn zero_saturation_yields_gray() {
        let palette = Palette::from_json(
            r#"{"elements": {"ACCENT-COLOR": {"dark": {"l": 50, "s": 80, "a": 1}}}}"#,
        )
        .unwrap();
        let generator = ColorReplacementGenerator::new(&palette);
        let gray = generator.convert(Mode::Dark, &request(0, Some(0))).unwrap();
        assert_eq!(gray[0].value, "rgba(128, 128, 128, 1)");
    }

    #[test]
    fn channels_on_a_half_round_to_even() {
        let palette = Palette::from_json(
            r#"{"elements": {
                "BORDER-COLOR": {"dark": {"l": 30, "s": 0, "a": 1}},
                "SHADOW-COLOR": {"dark": {"l": 15, "s": 100, "a": 0.5}}
            }}"#,
        )
        .unwrap();
        let generator = ColorReplacementGenerator::new(&palette);
        let replacements = generator.convert(Mode::Dark, &request(0, None)).unwrap();
        assert_eq!(replacements[0].value, "rgba(76, 76, 76, 1)");
        assert_eq!(replacements[1].value, "rgba(76, 0, 0, 0.5)");
    }

    #[test]
    fn hue_wraps_at_full_circle() {
        let palette = palette();
        let generator = ColorReplacementGenerator::new(&palette);
        let at_zero = InstallationRequest::new(0, None, vec![Mode::Light]).unwrap();
        let at_full = InstallationRequest::new(360, None, vec![Mode::Light]).unwrap();
        assert_eq!(
            generator.convert(Mode::Light, &at_zero).unwrap(),
            generator.convert(Mode::Light, &at_full).unwrap()
        );
    }
}
