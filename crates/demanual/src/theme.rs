//! Text colors chosen to read well on the configured background.

use demanual_core::Rgba;
use ratatui::style::{Color, Modifier, Style};

/// Accent of the site, the third glow tone (#5c94fa).
const ACCENT: Color = Color::Rgb(92, 148, 250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub code: Color,
}

impl Theme {
    /// Dark text on light backgrounds, light text on dark ones.
    pub fn for_background(background: Rgba) -> Self {
        let (r, g, b) = background.over(Rgba::BLACK);
        let luma = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
        if luma >= 128.0 {
            Self {
                text: Color::Rgb(17, 24, 39),
                muted: Color::Rgb(75, 85, 99),
                accent: ACCENT,
                code: Color::Rgb(137, 103, 252),
            }
        } else {
            Self {
                text: Color::Rgb(229, 231, 235),
                muted: Color::Rgb(156, 163, 175),
                accent: Color::Rgb(127, 215, 252),
                code: Color::Rgb(137, 103, 252),
            }
        }
    }

    pub fn text(&self) -> Style {
        Style::new().fg(self.text)
    }

    pub fn muted(&self) -> Style {
        Style::new().fg(self.muted)
    }

    pub fn accent(&self) -> Style {
        Style::new().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    pub fn code(&self) -> Style {
        Style::new().fg(self.code)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::for_background(Rgba::WHITE)
    }
}
