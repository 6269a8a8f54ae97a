//! Engine lifecycle and the per-frame pipeline.

use demanual_core::{AgingMode, Point2, Viewport};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::config::GlowConfig;
use crate::glow::{GlowField, GlowSource};
use crate::grid::Grid;
use crate::light::illuminate;
use crate::surface::Surface;

/// One running instance of the glow grid.
///
/// The host drives it: `start` once the surface size is known, call
/// [`frame`](Self::frame) on every display refresh, `resize` when the
/// surface changes size and `stop` on teardown. A stopped engine never
/// touches a surface again until restarted.
#[derive(Debug)]
pub struct GlowEngine<R = StdRng> {
    config: GlowConfig,
    viewport: Viewport,
    grid: Grid,
    glows: GlowField,
    running: bool,
    last_frame_ms: Option<f64>,
    /// Latest pointer position; recorded but not yet used by the effect.
    pointer: Option<Point2>,
    rng: R,
}

impl GlowEngine<StdRng> {
    pub fn new(config: GlowConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }
}

impl<R: Rng> GlowEngine<R> {
    /// Engine drawing its randomness from `rng`.
    pub fn with_rng(config: GlowConfig, rng: R) -> Self {
        Self {
            config,
            viewport: Viewport::default(),
            grid: Grid::default(),
            glows: GlowField::new(),
            running: false,
            last_frame_ms: None,
            pointer: None,
            rng,
        }
    }

    /// Lay out the lattice for `viewport`, forget all glows and begin animating.
    pub fn start(&mut self, viewport: Viewport) {
        tracing::debug!(width = viewport.width, height = viewport.height, "glow engine started");
        self.rebuild(viewport);
        self.glows.clear();
        self.last_frame_ms = None;
        self.running = true;
    }

    /// Rebuild the lattice for a new surface size. Glows carry over.
    pub fn resize(&mut self, viewport: Viewport) {
        if viewport == self.viewport {
            return;
        }
        tracing::debug!(width = viewport.width, height = viewport.height, "glow engine resized");
        self.rebuild(viewport);
    }

    /// Stop animating and drop the pointer hook. Safe to call repeatedly.
    pub fn stop(&mut self) {
        if self.running {
            tracing::debug!("glow engine stopped");
        }
        self.running = false;
        self.pointer = None;
        self.last_frame_ms = None;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Record the pointer position relative to the surface.
    ///
    /// Kept for interactive effects; the current physics and lighting
    /// ignore it.
    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        if self.running {
            self.pointer = Some(Point2::new(x, y));
        }
    }

    pub fn pointer(&self) -> Option<Point2> {
        self.pointer
    }

    pub fn config(&self) -> &GlowConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn glows(&self) -> &[GlowSource] {
        self.glows.sources()
    }

    /// Advance the animation to `timestamp_ms` and paint it onto `surface`.
    ///
    /// Returns `false`, leaving the surface untouched, when the engine is
    /// stopped or the viewport has no area.
    pub fn frame<S: Surface + ?Sized>(&mut self, timestamp_ms: f64, surface: &mut S) -> bool {
        if !self.running || self.viewport.is_empty() {
            return false;
        }

        let delta_ms = self
            .last_frame_ms
            .map(|last| timestamp_ms - last)
            .unwrap_or(AgingMode::NOMINAL_FRAME_MS);
        self.last_frame_ms = Some(timestamp_ms);

        self.glows
            .spawn(timestamp_ms, self.viewport, &self.config, &mut self.rng);
        self.glows.advance(self.config.glow_move_speed);
        self.grid.step_physics(&self.config, &mut self.rng);
        illuminate(&mut self.grid, self.glows.sources(), &self.config, timestamp_ms);
        self.paint(surface);
        self.glows.age(self.config.aging.step(delta_ms));

        true
    }

    fn paint<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.clear();
        // Each edge takes the color of its first endpoint.
        for (from, to) in self.grid.edges() {
            surface.stroke(from.position, to.position, from.color);
        }
    }

    fn rebuild(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.grid = Grid::build(viewport, self.config.cell_size, self.config.line_color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::StrokeBuffer;
    use demanual_core::{Page, Rgba};

    /// Counts every mutation it receives.
    #[derive(Default)]
    struct CountingSurface {
        clears: usize,
        strokes: usize,
    }

    impl Surface for CountingSurface {
        fn clear(&mut self) {
            self.clears += 1;
        }

        fn stroke(&mut self, _from: Point2, _to: Point2, _color: Rgba) {
            self.strokes += 1;
        }
    }

    fn engine(page: Page) -> GlowEngine {
        GlowEngine::with_rng(GlowConfig::for_page(page), StdRng::seed_from_u64(42))
    }

    #[test]
    fn test_frame_before_start_draws_nothing() {
        let mut engine = engine(Page::Home);
        let mut surface = CountingSurface::default();
        assert!(!engine.frame(0.0, &mut surface));
        assert_eq!((surface.clears, surface.strokes), (0, 0));
    }

    #[test]
    fn test_frame_strokes_every_edge() {
        let mut engine = engine(Page::Home);
        engine.start(Viewport::new(200.0, 100.0));
        let mut buffer = StrokeBuffer::new();

        assert!(engine.frame(0.0, &mut buffer));
        // 3 rows x 5 cols: 3*4 horizontal + 5*2 vertical
        assert_eq!(buffer.len(), 22);

        // The buffer holds only the latest frame.
        assert!(engine.frame(16.0, &mut buffer));
        assert_eq!(buffer.len(), 22);
    }

    #[test]
    fn test_zero_viewport_is_a_no_op() {
        let mut engine = engine(Page::About);
        engine.start(Viewport::new(0.0, 0.0));
        let mut surface = CountingSurface::default();
        for i in 0..10 {
            assert!(!engine.frame(i as f64 * 16.0, &mut surface));
        }
        assert_eq!((surface.clears, surface.strokes), (0, 0));
        assert_eq!((engine.grid().rows(), engine.grid().cols()), (1, 1));
    }

    #[test]
    fn test_stop_twice_halts_drawing() {
        let mut engine = engine(Page::Contact);
        engine.start(Viewport::new(300.0, 300.0));
        let mut surface = CountingSurface::default();
        assert!(engine.frame(0.0, &mut surface));

        engine.stop();
        engine.stop();
        let before = (surface.clears, surface.strokes);
        for i in 1..20 {
            assert!(!engine.frame(i as f64 * 16.0, &mut surface));
        }
        assert_eq!((surface.clears, surface.strokes), before);
        assert!(!engine.is_running());
    }

    #[test]
    fn test_resize_rebuilds_lattice() {
        let mut engine = engine(Page::Services);
        engine.start(Viewport::new(100.0, 100.0));
        assert_eq!((engine.grid().rows(), engine.grid().cols()), (3, 3));

        engine.resize(Viewport::new(260.0, 40.0));
        assert_eq!((engine.grid().rows(), engine.grid().cols()), (2, 7));
        assert!(engine.is_running());
        assert!(engine.grid().points().iter().all(|p| p.position == p.base));
    }

    #[test]
    fn test_resize_keeps_glows() {
        let mut engine = engine(Page::Blog);
        engine.start(Viewport::new(400.0, 400.0));
        let mut buffer = StrokeBuffer::new();
        let mut t = 0.0;
        while engine.glows().is_empty() {
            t += 16.0;
            assert!(t < 5000.0, "no glow spawned");
            engine.frame(t, &mut buffer);
        }
        let glows = engine.glows().to_vec();

        engine.resize(Viewport::new(800.0, 240.0));
        assert_eq!((engine.grid().rows(), engine.grid().cols()), (6, 17));
        assert_eq!(engine.glows(), glows.as_slice());
        assert!(engine.frame(t + 16.0, &mut buffer));
        assert!(!engine.glows().is_empty());
    }

    #[test]
    fn test_glow_invariants_over_many_frames() {
        let mut engine = engine(Page::NotFound);
        engine.start(Viewport::new(640.0, 480.0));
        let mut buffer = StrokeBuffer::new();
        let max = engine.config().max_active_glows;
        let mut previous: Option<f64> = None;
        let mut seen_glow = false;

        // Twenty seconds of 60 Hz frames.
        for i in 0..1250 {
            engine.frame(i as f64 * 16.0, &mut buffer);
            assert!(engine.glows().len() <= max);
            for glow in engine.glows() {
                assert!(glow.remaining_life > 0.0);
            }
            if let Some(glow) = engine.glows().first() {
                seen_glow = true;
                // A source is only replaced after a frame with none alive.
                if let Some(prev) = previous {
                    assert!(glow.remaining_life <= prev);
                }
                previous = Some(glow.remaining_life);
            } else {
                previous = None;
            }
            for point in engine.grid().points() {
                assert!(point.displacement() <= engine.config().max_displacement + 1e-3);
            }
        }
        assert!(seen_glow);
    }

    #[test]
    fn test_measured_aging_uses_timestamps() {
        let mut config = GlowConfig::for_page(Page::About);
        config.aging = AgingMode::Measured;
        let mut engine = GlowEngine::with_rng(config, StdRng::seed_from_u64(9));
        engine.start(Viewport::new(400.0, 400.0));
        let mut buffer = StrokeBuffer::new();

        // First frame past the interval spawns a glow, aged by the nominal step.
        engine.frame(1001.0, &mut buffer);
        assert_eq!(engine.glows()[0].remaining_life, 3000.0 - 16.0);

        engine.frame(1101.0, &mut buffer);
        assert_eq!(engine.glows()[0].remaining_life, 3000.0 - 116.0);
    }

    #[test]
    fn test_pointer_is_recorded_only_while_running() {
        let mut engine = engine(Page::Home);
        engine.pointer_moved(1.0, 2.0);
        assert_eq!(engine.pointer(), None);

        engine.start(Viewport::new(100.0, 100.0));
        engine.pointer_moved(1.0, 2.0);
        assert_eq!(engine.pointer(), Some(Point2::new(1.0, 2.0)));

        engine.stop();
        assert_eq!(engine.pointer(), None);
    }

    #[test]
    fn test_restart_resets_glows() {
        let mut engine = engine(Page::Blog);
        engine.start(Viewport::new(400.0, 400.0));
        let mut buffer = StrokeBuffer::new();
        engine.frame(1500.0, &mut buffer);
        assert_eq!(engine.glows().len(), 1);

        engine.stop();
        engine.start(Viewport::new(400.0, 400.0));
        assert!(engine.glows().is_empty());
        assert!(engine.frame(0.0, &mut buffer));
    }
}
