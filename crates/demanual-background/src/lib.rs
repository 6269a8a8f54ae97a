//! Animated glow grid background for the demanual site.
//!
//! A lattice of spring-damped points covers the viewport and jitters in
//! place, while a few roaming glow sources light up the points they pass
//! and the trail ahead of them. The engine itself only knows about a
//! [`Surface`] it strokes lines onto; [`GlowBackground`] adapts it to a
//! ratatui frame.

mod config;
mod engine;
mod glow;
mod grid;
mod light;
mod palette;
mod surface;
mod widget;

pub use config::{BLUE_TONES, GlowConfig, LINE_COLOR};
pub use engine::GlowEngine;
pub use glow::{GlowField, GlowSource};
pub use grid::{Grid, GridPoint};
pub use light::illuminate;
pub use palette::cycling_color;
pub use surface::{Stroke, StrokeBuffer, Surface};
pub use widget::{GlowBackground, UNITS_PER_COLUMN, UNITS_PER_ROW};
