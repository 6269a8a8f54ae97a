//! The deformable point lattice.

use demanual_core::{Point2, Rgba, Viewport};
use rand::Rng;

use crate::config::GlowConfig;

/// A node of the lattice.
#[derive(Debug, Clone, PartialEq)]
pub struct GridPoint {
    /// Fixed anchor on the lattice.
    pub base: Point2,
    /// Current, displaced location.
    pub position: Point2,
    pub velocity: Point2,
    /// Color the point is stroked with this frame.
    pub color: Rgba,
    pub target_color: Rgba,
    /// Blend weight of the strongest glow at this point, in `0.0..=1.0`.
    pub color_transition: f32,
}

impl GridPoint {
    fn at_rest(base: Point2, color: Rgba) -> Self {
        Self {
            base,
            position: base,
            velocity: Point2::ORIGIN,
            color,
            target_color: color,
            color_transition: 0.0,
        }
    }

    /// Current distance from the anchor.
    pub fn displacement(&self) -> f32 {
        self.position.distance(self.base)
    }
}

/// Row-major lattice of [`GridPoint`]s.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    points: Vec<GridPoint>,
}

impl Grid {
    /// Lay out a lattice covering `viewport` at `cell_size` spacing.
    ///
    /// The lattice has `ceil(h / cell) + 1` rows and `ceil(w / cell) + 1`
    /// columns so the last line sits on or past the far edge. A
    /// non-positive or non-finite cell size yields an empty grid.
    pub fn build(viewport: Viewport, cell_size: f32, color: Rgba) -> Self {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Self::default();
        }

        let span = |len: f32| {
            if len.is_finite() && len > 0.0 {
                (len / cell_size).ceil() as usize + 1
            } else {
                1
            }
        };
        let rows = span(viewport.height);
        let cols = span(viewport.width);

        let points = (0..rows)
            .flat_map(|i| {
                (0..cols).map(move |j| {
                    GridPoint::at_rest(
                        Point2::new(j as f32 * cell_size, i as f32 * cell_size),
                        color,
                    )
                })
            })
            .collect();

        Self { rows, cols, points }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn point(&self, row: usize, col: usize) -> Option<&GridPoint> {
        if row < self.rows && col < self.cols {
            self.points.get(row * self.cols + col)
        } else {
            None
        }
    }

    pub fn points(&self) -> &[GridPoint] {
        &self.points
    }

    pub fn points_mut(&mut self) -> &mut [GridPoint] {
        &mut self.points
    }

    /// Every lattice edge as `(start, end)`: horizontal edges row by row,
    /// then vertical edges column by column.
    pub fn edges(&self) -> impl Iterator<Item = (&GridPoint, &GridPoint)> + '_ {
        let horizontal = (0..self.rows).flat_map(move |i| {
            (0..self.cols.saturating_sub(1)).map(move |j| {
                let at = i * self.cols + j;
                (&self.points[at], &self.points[at + 1])
            })
        });
        let vertical = (0..self.cols).flat_map(move |j| {
            (0..self.rows.saturating_sub(1)).map(move |i| {
                let at = i * self.cols + j;
                (&self.points[at], &self.points[at + self.cols])
            })
        });
        horizontal.chain(vertical)
    }

    /// Advance every point by one physics step.
    pub fn step_physics<R: Rng + ?Sized>(&mut self, config: &GlowConfig, rng: &mut R) {
        for point in &mut self.points {
            point.velocity.x += (rng.r#gen::<f32>() - 0.5) * config.jitter;
            point.velocity.y += (rng.r#gen::<f32>() - 0.5) * config.jitter;

            point.velocity.x += (point.base.x - point.position.x) * config.stiffness;
            point.velocity.y += (point.base.y - point.position.y) * config.stiffness;

            point.velocity.x *= config.damping;
            point.velocity.y *= config.damping;

            point.position.x += point.velocity.x;
            point.position.y += point.velocity.y;

            clamp_displacement(point, config.max_displacement);
        }
    }
}

/// Pull a point back onto the circle of radius `max` around its anchor
/// when it has drifted past it.
fn clamp_displacement(point: &mut GridPoint, max: f32) {
    if point.displacement() > max {
        let angle = (point.position.y - point.base.y).atan2(point.position.x - point.base.x);
        point.position.x = point.base.x + angle.cos() * max;
        point.position.y = point.base.y + angle.sin() * max;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    const GRAY: Rgba = Rgba::new(200, 200, 200, 0.2);

    #[test]
    fn test_build_dimensions() {
        for (w, h) in [(0.0, 0.0), (1.0, 1.0), (50.0, 50.0), (51.0, 100.0), (1920.0, 1080.0)] {
            let grid = Grid::build(Viewport::new(w, h), 50.0, GRAY);
            let rows = (h / 50.0f32).ceil() as usize + 1;
            let cols = (w / 50.0f32).ceil() as usize + 1;
            assert_eq!((grid.rows(), grid.cols()), (rows, cols), "viewport {w}x{h}");
            assert_eq!(grid.points().len(), rows * cols);
        }
    }

    #[test]
    fn test_build_points_at_rest() {
        let grid = Grid::build(Viewport::new(120.0, 80.0), 50.0, GRAY);
        for point in grid.points() {
            assert_eq!(point.position, point.base);
            assert_eq!(point.velocity, Point2::ORIGIN);
            assert_eq!(point.color, GRAY);
        }
        assert_eq!(grid.point(1, 2).map(|p| p.base), Some(Point2::new(100.0, 50.0)));
        assert!(grid.point(2, 0).is_some());
        assert!(grid.point(3, 0).is_none());
    }

    #[test]
    fn test_build_invalid_cell_size() {
        assert!(Grid::build(Viewport::new(100.0, 100.0), 0.0, GRAY).is_empty());
        assert!(Grid::build(Viewport::new(100.0, 100.0), f32::NAN, GRAY).is_empty());
    }

    #[test]
    fn test_edge_count() {
        let grid = Grid::build(Viewport::new(100.0, 50.0), 50.0, GRAY);
        // 2 rows x 3 cols: 2*2 horizontal + 3*1 vertical
        assert_eq!(grid.edges().count(), 7);
        assert_eq!(Grid::default().edges().count(), 0);
        let single = Grid::build(Viewport::default(), 50.0, GRAY);
        assert_eq!(single.edges().count(), 0);
    }

    #[test]
    fn test_displacement_stays_clamped() {
        let mut config = GlowConfig::default();
        config.jitter = 40.0;
        let mut rng = StdRng::seed_from_u64(7);
        let mut grid = Grid::build(Viewport::new(300.0, 300.0), config.cell_size, GRAY);

        for _ in 0..200 {
            grid.step_physics(&config, &mut rng);
            for point in grid.points() {
                assert!(point.displacement() <= config.max_displacement + 1e-3);
            }
        }
    }

    #[test]
    fn test_spring_settles_without_jitter() {
        let mut config = GlowConfig::default();
        config.jitter = 0.0;
        let mut rng = StdRng::seed_from_u64(1);
        let mut grid = Grid::build(Viewport::new(50.0, 50.0), config.cell_size, GRAY);
        grid.points_mut()[0].position = Point2::new(4.0, 0.0);

        for _ in 0..500 {
            grid.step_physics(&config, &mut rng);
        }
        assert!(grid.points()[0].displacement() < 1e-2);
    }
}
