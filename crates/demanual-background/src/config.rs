//! Tuning for one engine instance.

use demanual_core::{AgingMode, Page, Rgba};

/// Neutral stroke color of an unlit grid line.
pub const LINE_COLOR: Rgba = Rgba::new(200, 200, 200, 0.2);

/// The three blue tones glows cycle through (#7fd7fc, #8967fc, #5c94fa).
pub const BLUE_TONES: [Rgba; 3] = [
    Rgba::opaque(127, 215, 252),
    Rgba::opaque(137, 103, 252),
    Rgba::opaque(92, 148, 250),
];

/// Configuration of a [`GlowEngine`](crate::GlowEngine).
///
/// Lengths are in surface units, times in milliseconds.
#[derive(Debug, Clone, PartialEq)]
pub struct GlowConfig {
    /// Spacing between lattice points.
    pub cell_size: f32,
    /// Spring constant pulling a point back to its anchor.
    pub stiffness: f32,
    /// Multiplicative velocity damping per frame.
    pub damping: f32,
    /// Maximum distance a point may drift from its anchor.
    pub max_displacement: f32,
    /// Width of the uniform random impulse added to velocity each frame.
    pub jitter: f32,
    /// Distance at which a glow stops lighting points.
    pub interaction_radius: f32,
    /// Minimum time between spawn attempts.
    pub glow_interval_ms: f64,
    /// Life a new glow source starts with.
    pub glow_duration_ms: f64,
    pub max_active_glows: usize,
    /// Fraction of the remaining distance a glow covers per frame.
    pub glow_move_speed: f32,
    /// Scale of the light cast along a glow's path.
    pub path_intensity: f32,
    pub line_color: Rgba,
    pub palette: Vec<Rgba>,
    pub color_cycle_ms: f64,
    /// Per-source offset into the color cycle.
    pub color_phase_ms: f64,
    pub aging: AgingMode,
}

impl GlowConfig {
    /// The tuning a page uses.
    ///
    /// The home page runs a calmer variant: fewer, rarer glows and a
    /// fainter palette. All other pages share the livelier one.
    pub fn for_page(page: Page) -> Self {
        match page {
            Page::Home => Self::base(2000.0, 3, 0.7, 0.3),
            _ => Self::base(1000.0, 5, 0.9, 0.5),
        }
    }

    /// Replace the palette opacity, keeping the tones.
    pub fn with_palette_opacity(mut self, opacity: f32) -> Self {
        for color in &mut self.palette {
            *color = color.with_alpha(opacity);
        }
        self
    }

    fn base(
        glow_interval_ms: f64,
        max_active_glows: usize,
        path_intensity: f32,
        palette_opacity: f32,
    ) -> Self {
        Self {
            cell_size: 50.0,
            stiffness: 0.03,
            damping: 0.9,
            max_displacement: 5.0,
            jitter: 0.3,
            interaction_radius: 100.0,
            glow_interval_ms,
            glow_duration_ms: 3000.0,
            max_active_glows,
            glow_move_speed: 0.05,
            path_intensity,
            line_color: LINE_COLOR,
            palette: BLUE_TONES.to_vec(),
            color_cycle_ms: 3000.0,
            color_phase_ms: 1000.0,
            aging: AgingMode::default(),
        }
        .with_palette_opacity(palette_opacity)
    }
}

impl Default for GlowConfig {
    fn default() -> Self {
        Self::for_page(Page::Home)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_home_preset() {
        let config = GlowConfig::for_page(Page::Home);
        assert_eq!(config.glow_interval_ms, 2000.0);
        assert_eq!(config.max_active_glows, 3);
        assert_eq!(config.path_intensity, 0.7);
        assert!(config.palette.iter().all(|c| c.a == 0.3));
    }

    #[test]
    fn test_other_pages_share_lively_preset() {
        for page in [Page::About, Page::Services, Page::Contact, Page::Blog, Page::NotFound] {
            let config = GlowConfig::for_page(page);
            assert_eq!(config.glow_interval_ms, 1000.0);
            assert_eq!(config.max_active_glows, 5);
            assert_eq!(config.path_intensity, 0.9);
            assert_eq!(config.palette[2], Rgba::new(92, 148, 250, 0.5));
        }
    }
}
