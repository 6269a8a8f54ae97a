//! Drawing targets for the engine.

use demanual_core::{Point2, Rgba};

/// Something the engine can paint a wireframe onto.
pub trait Surface {
    /// Erase the previous frame.
    fn clear(&mut self);

    /// Draw a straight line.
    fn stroke(&mut self, from: Point2, to: Point2, color: Rgba);
}

/// A single recorded line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub from: Point2,
    pub to: Point2,
    pub color: Rgba,
}

/// A surface that records the strokes of the latest frame.
#[derive(Debug, Clone, Default)]
pub struct StrokeBuffer {
    strokes: Vec<Stroke>,
}

impl StrokeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }
}

impl Surface for StrokeBuffer {
    fn clear(&mut self) {
        self.strokes.clear();
    }

    fn stroke(&mut self, from: Point2, to: Point2, color: Rgba) {
        self.strokes.push(Stroke { from, to, color });
    }
}
