//! Terminal rendering of the glow grid.

use demanual_core::{Rgba, Viewport};
use ratatui::{
    Frame,
    layout::Rect,
    style::Color,
    symbols::Marker,
    widgets::canvas::{Canvas, Line},
};

use crate::config::GlowConfig;
use crate::engine::GlowEngine;
use crate::surface::StrokeBuffer;

/// Surface units per terminal column (a typical cell is 8 pixels wide).
pub const UNITS_PER_COLUMN: f32 = 8.0;

/// Surface units per terminal row (a typical cell is 16 pixels tall).
pub const UNITS_PER_ROW: f32 = 16.0;

/// A glow grid painted behind the rest of a ratatui frame.
#[derive(Debug)]
pub struct GlowBackground {
    engine: GlowEngine,
    strokes: StrokeBuffer,
    background: Rgba,
    area: Option<Rect>,
    stopped: bool,
}

impl GlowBackground {
    pub fn new(config: GlowConfig, background: Rgba) -> Self {
        Self {
            engine: GlowEngine::new(config),
            strokes: StrokeBuffer::new(),
            background,
            area: None,
            stopped: false,
        }
    }

    pub fn engine(&self) -> &GlowEngine {
        &self.engine
    }

    /// Viewport in surface units covering `area`.
    pub fn viewport_for(area: Rect) -> Viewport {
        Viewport::new(
            area.width as f32 * UNITS_PER_COLUMN,
            area.height as f32 * UNITS_PER_ROW,
        )
    }

    /// Advance one frame and paint it over `area`.
    ///
    /// The engine starts on the first call and is resized whenever `area`
    /// changes. Nothing is painted once [`stop`](Self::stop) was called.
    pub fn render(&mut self, frame: &mut Frame, area: Rect, timestamp_ms: f64) {
        if self.stopped {
            return;
        }
        match self.area {
            None => self.engine.start(Self::viewport_for(area)),
            Some(previous) if previous != area => self.engine.resize(Self::viewport_for(area)),
            Some(_) => {}
        }
        self.area = Some(area);

        if !self.engine.frame(timestamp_ms, &mut self.strokes) {
            return;
        }

        let viewport = self.engine.viewport();
        let background = self.background;
        let strokes = &self.strokes;
        let height = viewport.height as f64;
        let (r, g, b) = background.over(Rgba::BLACK);

        let canvas = Canvas::default()
            .background_color(Color::Rgb(r, g, b))
            .marker(Marker::Braille)
            .x_bounds([0.0, viewport.width as f64])
            .y_bounds([0.0, height])
            .paint(move |ctx| {
                for stroke in strokes.strokes() {
                    let (r, g, b) = stroke.color.over(background);
                    // Canvas y grows upwards, surface y grows downwards.
                    ctx.draw(&Line::new(
                        stroke.from.x as f64,
                        height - stroke.from.y as f64,
                        stroke.to.x as f64,
                        height - stroke.to.y as f64,
                        Color::Rgb(r, g, b),
                    ));
                }
            });

        frame.render_widget(canvas, area);
    }

    /// Forward a pointer position given in terminal cells.
    pub fn pointer_moved(&mut self, column: u16, row: u16) {
        if let Some(area) = self.area {
            let x = (column.saturating_sub(area.x) as f32 + 0.5) * UNITS_PER_COLUMN;
            let y = (row.saturating_sub(area.y) as f32 + 0.5) * UNITS_PER_ROW;
            self.engine.pointer_moved(x, y);
        }
    }

    /// Stop the animation; later renders paint nothing.
    pub fn stop(&mut self) {
        self.stopped = true;
        self.engine.stop();
        self.strokes = StrokeBuffer::new();
    }
}

impl Drop for GlowBackground {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use demanual_core::Page;
    use ratatui::{Terminal, backend::TestBackend};

    fn terminal() -> Terminal<TestBackend> {
        Terminal::new(TestBackend::new(40, 12)).unwrap()
    }

    #[test]
    fn test_viewport_for_area() {
        let viewport = GlowBackground::viewport_for(Rect::new(0, 0, 100, 30));
        assert_eq!(viewport, Viewport::new(800.0, 480.0));
    }

    #[test]
    fn test_render_starts_and_paints() {
        let mut terminal = terminal();
        let mut background = GlowBackground::new(GlowConfig::for_page(Page::Home), Rgba::BLACK);

        terminal
            .draw(|frame| {
                let area = frame.area();
                background.render(frame, area, 0.0);
            })
            .unwrap();

        assert!(background.engine().is_running());
        assert_eq!(
            background.engine().viewport(),
            Viewport::new(320.0, 192.0)
        );
        let buffer = terminal.backend().buffer();
        assert!(buffer.content().iter().any(|cell| cell.symbol() != " "));
    }

    #[test]
    fn test_render_after_stop_paints_nothing() {
        let mut terminal = terminal();
        let mut background = GlowBackground::new(GlowConfig::for_page(Page::Blog), Rgba::BLACK);
        terminal
            .draw(|frame| {
                let area = frame.area();
                background.render(frame, area, 0.0);
            })
            .unwrap();

        background.stop();
        background.stop();
        terminal.clear().unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                background.render(frame, area, 16.0);
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        assert!(buffer.content().iter().all(|cell| cell.symbol() == " "));
    }

    #[test]
    fn test_stop_before_first_render_never_starts() {
        let mut terminal = terminal();
        let mut background = GlowBackground::new(GlowConfig::for_page(Page::Home), Rgba::BLACK);
        background.stop();

        terminal
            .draw(|frame| {
                let area = frame.area();
                background.render(frame, area, 0.0);
            })
            .unwrap();

        assert!(!background.engine().is_running());
        let buffer = terminal.backend().buffer();
        assert!(buffer.content().iter().all(|cell| cell.symbol() == " "));
    }

    #[test]
    fn test_pointer_maps_cells_to_units() {
        let mut terminal = terminal();
        let mut background = GlowBackground::new(GlowConfig::default(), Rgba::WHITE);
        terminal
            .draw(|frame| {
                let area = frame.area();
                background.render(frame, area, 0.0);
            })
            .unwrap();

        background.pointer_moved(2, 1);
        let pointer = background.engine().pointer().unwrap();
        assert_eq!((pointer.x, pointer.y), (20.0, 24.0));
    }
}
