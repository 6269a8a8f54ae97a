//! Time-driven palette cycling.

use demanual_core::Rgba;

/// Palette entry for glow source `index` at `timestamp_ms`.
///
/// The cycle walks the palette once every `cycle_ms`; each source is
/// shifted by `index * phase_ms` so concurrent glows do not change color
/// in lockstep. Pure in `(timestamp, index)`. Returns `None` for an empty
/// palette.
pub fn cycling_color(
    palette: &[Rgba],
    cycle_ms: f64,
    phase_ms: f64,
    timestamp_ms: f64,
    index: usize,
) -> Option<Rgba> {
    if palette.is_empty() {
        return None;
    }
    if !(cycle_ms > 0.0) {
        return palette.first().copied();
    }

    let phase = (timestamp_ms + index as f64 * phase_ms).rem_euclid(cycle_ms);
    let position = phase / cycle_ms;
    let slot = ((position * palette.len() as f64).floor() as usize).min(palette.len() - 1);
    palette.get(slot).copied()
}
