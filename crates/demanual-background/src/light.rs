//! Per-point illumination from glow sources.

use crate::config::GlowConfig;
use crate::glow::GlowSource;
use crate::grid::Grid;
use crate::palette::cycling_color;

/// Recolor every grid point from the glows currently on the surface.
///
/// Each glow lights a point by inverse-linear falloff of the direct
/// distance, and, while moving, by the falloff of the distance to its
/// path ahead scaled by `path_intensity`. The strongest source wins the
/// point; a point nothing reaches goes back to the neutral line color.
pub fn illuminate(grid: &mut Grid, glows: &[GlowSource], config: &GlowConfig, timestamp_ms: f64) {
    let radius = config.interaction_radius;

    for point in grid.points_mut() {
        point.target_color = config.line_color;
        point.color_transition = 0.0;

        if radius > 0.0 {
            let mut max_intensity = 0.0f32;

            for (index, glow) in glows.iter().enumerate() {
                let direct = 1.0 - point.position.distance(glow.position) / radius;
                let path = if glow.is_moving {
                    let d = point.position.distance_to_segment(glow.position, glow.target);
                    (1.0 - d / radius).max(0.0) * config.path_intensity
                } else {
                    0.0
                };

                let intensity = direct.max(path);
                if intensity > max_intensity {
                    max_intensity = intensity;
                    point.target_color = cycling_color(
                        &config.palette,
                        config.color_cycle_ms,
                        config.color_phase_ms,
                        timestamp_ms,
                        index,
                    )
                    .unwrap_or(config.line_color);
                    point.color_transition =
                        max_intensity * glow.life_fraction(config.glow_duration_ms);
                }
            }
        }

        point.color = point.target_color;
    }
}
