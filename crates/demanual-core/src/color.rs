//! RGBA colors in the CSS notation the site styles were written in.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// An sRGB color with straight (non-premultiplied) alpha in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 1.0);
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 1.0);

    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Same color with a different alpha.
    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Composite this color over an opaque background ("source-over").
    pub fn over(self, background: Rgba) -> (u8, u8, u8) {
        let a = self.a.clamp(0.0, 1.0);
        let mix = |fg: u8, bg: u8| (fg as f32 * a + bg as f32 * (1.0 - a)).round() as u8;
        (
            mix(self.r, background.r),
            mix(self.g, background.g),
            mix(self.b, background.b),
        )
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// Error returned when a color string is not `#rrggbb`, `rgb(..)` or `rgba(..)`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color: {0:?}")]
pub struct ParseColorError(String);

impl FromStr for Rgba {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseColorError(s.to_string());
        let trimmed = s.trim();

        if let Some(hex) = trimmed.strip_prefix('#') {
            if hex.len() != 6 || !hex.is_ascii() {
                return Err(err());
            }
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
            return Ok(Rgba::opaque(channel(0)?, channel(2)?, channel(4)?));
        }

        let (body, expect_alpha) = if let Some(rest) = trimmed.strip_prefix("rgba(") {
            (rest, true)
        } else if let Some(rest) = trimmed.strip_prefix("rgb(") {
            (rest, false)
        } else {
            return Err(err());
        };
        let body = body.strip_suffix(')').ok_or_else(err)?;
        let parts: Vec<&str> = body.split(',').map(str::trim).collect();
        let expected = if expect_alpha { 4 } else { 3 };
        if parts.len() != expected {
            return Err(err());
        }

        let channel = |p: &str| p.parse::<u8>().map_err(|_| err());
        let a = if expect_alpha {
            let a = parts[3].parse::<f32>().map_err(|_| err())?;
            if !(0.0..=1.0).contains(&a) {
                return Err(err());
            }
            a
        } else {
            1.0
        };

        Ok(Rgba::new(
            channel(parts[0])?,
            channel(parts[1])?,
            channel(parts[2])?,
            a,
        ))
    }
}

impl TryFrom<String> for Rgba {
    type Error = ParseColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgba> for String {
    fn from(value: Rgba) -> Self {
        if value.a >= 1.0 {
            format!("#{:02x}{:02x}{:02x}", value.r, value.g, value.b)
        } else {
            value.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_css_forms() {
        assert_eq!(
            "rgba(200, 200, 200, 0.2)".parse::<Rgba>(),
            Ok(Rgba::new(200, 200, 200, 0.2))
        );
        assert_eq!("#7fd7fc".parse::<Rgba>(), Ok(Rgba::opaque(127, 215, 252)));
        assert_eq!("rgb(1,2,3)".parse::<Rgba>(), Ok(Rgba::opaque(1, 2, 3)));
        assert!("rgba(1, 2, 3)".parse::<Rgba>().is_err());
        assert!("#12345".parse::<Rgba>().is_err());
        assert!("rgba(1, 2, 3, 1.5)".parse::<Rgba>().is_err());
        assert!("blue".parse::<Rgba>().is_err());
    }

    #[test]
    fn test_display_matches_css() {
        assert_eq!(
            Rgba::new(92, 148, 250, 0.5).to_string(),
            "rgba(92, 148, 250, 0.5)"
        );
    }

    #[test]
    fn test_over_white() {
        let line = Rgba::new(200, 200, 200, 0.2);
        assert_eq!(line.over(Rgba::WHITE), (244, 244, 244));
        assert_eq!(Rgba::BLACK.over(Rgba::WHITE), (0, 0, 0));
        assert_eq!(Rgba::BLACK.with_alpha(0.0).over(Rgba::WHITE), (255, 255, 255));
    }

    #[test]
    fn test_parse_error_message() {
        let err = "chartreuse".parse::<Rgba>().unwrap_err();
        assert_eq!(err.to_string(), "invalid color: \"chartreuse\"");
    }
}
