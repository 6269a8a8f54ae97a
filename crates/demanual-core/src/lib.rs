//! Core types shared by the demanual crates.

mod color;
mod geometry;
mod page;

use serde::{Deserialize, Serialize};

pub use color::{ParseColorError, Rgba};
pub use geometry::{Point2, Viewport};
pub use page::{Page, ParsePageError};

/// How glow sources lose life between frames.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "mode")]
pub enum AgingMode {
    /// Subtract a constant step every frame, whatever the real frame time.
    FixedStep {
        #[serde(default = "default_step_ms")]
        step_ms: f64,
    },
    /// Subtract the measured time between successive frame timestamps.
    Measured,
}

fn default_step_ms() -> f64 {
    AgingMode::NOMINAL_FRAME_MS
}

impl AgingMode {
    /// Nominal frame duration of a 60 Hz display.
    pub const NOMINAL_FRAME_MS: f64 = 16.0;

    /// Life to subtract for a frame, given the measured delta since the last one.
    pub fn step(self, measured_delta_ms: f64) -> f64 {
        match self {
            AgingMode::FixedStep { step_ms } => step_ms,
            AgingMode::Measured => measured_delta_ms.max(0.0),
        }
    }
}

impl Default for AgingMode {
    fn default() -> Self {
        AgingMode::FixedStep {
            step_ms: Self::NOMINAL_FRAME_MS,
        }
    }
}
