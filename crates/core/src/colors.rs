use std::fmt;

use crate::error::{Result, ThemeError};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: f64,
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rgba({}, {}, {}, {:?})",
            self.red, self.green, self.blue, self.alpha
        )
    }
}

/// Convert hue in degrees plus saturation and lightness fractions to RGB bytes.
///
/// The hue is wrapped onto `[0, 1)` before conversion, so 0 and 360 give the same color.
/// Channels round half to even, and the arithmetic follows the usual HLS formulation
/// step for step so that results near a tie land on the same byte.
pub fn hsl_to_rgb(hue: f64, saturation: f64, lightness: f64) -> Result<(u8, u8, u8)> {
    if !(0.0..=360.0).contains(&hue) {
        return Err(ThemeError::validation(format!(
            "Hue must be between 0 and 360, not {hue}"
        )));
    }
    if !(0.0..=1.0).contains(&saturation) {
        return Err(ThemeError::validation(format!(
            "Saturation must be between 0 and 1, not {saturation}"
        )));
    }
    if !(0.0..=1.0).contains(&lightness) {
        return Err(ThemeError::validation(format!(
            "Lightness must be between 0 and 1, not {lightness}"
        )));
    }

    if saturation == 0.0 {
        let v = to_byte(lightness);
        return Ok((v, v, v));
    }

    let h = hue / 360.0;
    let q = if lightness <= 0.5 {
        lightness * (1.0 + saturation)
    } else {
        lightness + saturation - lightness * saturation
    };
    let p = 2.0 * lightness - q;

    let r = hue_to_channel(p, q, h + ONE_THIRD);
    let g = hue_to_channel(p, q, h);
    let b = hue_to_channel(p, q, h - ONE_THIRD);

    Ok((to_byte(r), to_byte(g), to_byte(b)))
}

const ONE_THIRD: f64 = 1.0 / 3.0;
const ONE_SIXTH: f64 = 1.0 / 6.0;
const TWO_THIRDS: f64 = 2.0 / 3.0;

fn hue_to_channel(p: f64, q: f64, t: f64) -> f64 {
    let t = t.rem_euclid(1.0);
    if t < ONE_SIXTH {
        return p + (q - p) * t * 6.0;
    }
    if t < 0.5 {
        return q;
    }
    if t < TWO_THIRDS {
        return p + (q - p) * (TWO_THIRDS - t) * 6.0;
    }
    p
}

fn to_byte(fraction: f64) -> u8 {
    (fraction * 255.0).round_ties_even().clamp(0.0, 255.0) as u8
}

/// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` (leading `#` optional) into RGBA.
pub fn hex_to_rgba(hex: &str) -> Result<Rgba> {
    let invalid = || ThemeError::validation(format!("Invalid HEX color code: {hex}"));

    let digits = hex.trim().trim_start_matches('#');
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).chain("ff".chars()).collect(),
        6 => format!("{digits}ff"),
        8 => digits.to_string(),
        _ => return Err(invalid()),
    };

    let byte = |index: usize| {
        u8::from_str_radix(&expanded[index..index + 2], 16).map_err(|_| invalid())
    };
    Ok(Rgba {
        red: byte(0)?,
        green: byte(2)?,
        blue: byte(4)?,
        alpha: f64::from(byte(6)?) / 255.0,
    })
}
