//! Roaming glow sources.

use demanual_core::{Point2, Viewport};
use rand::Rng;

use crate::config::GlowConfig;

/// A point of light easing towards a target.
#[derive(Debug, Clone, PartialEq)]
pub struct GlowSource {
    pub position: Point2,
    pub target: Point2,
    /// Milliseconds of life left; the source is dropped once this reaches zero.
    pub remaining_life: f64,
    pub is_moving: bool,
}

impl GlowSource {
    /// Remaining life as a fraction of `duration_ms`, clamped to `0.0..=1.0`.
    pub fn life_fraction(&self, duration_ms: f64) -> f32 {
        if duration_ms > 0.0 {
            (self.remaining_life / duration_ms).clamp(0.0, 1.0) as f32
        } else {
            0.0
        }
    }

    pub fn is_expired(&self) -> bool {
        self.remaining_life <= 0.0
    }
}

/// The active glow sources of one engine and their spawn clock.
#[derive(Debug, Clone, Default)]
pub struct GlowField {
    sources: Vec<GlowSource>,
    last_spawn_ms: f64,
}

impl GlowField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sources(&self) -> &[GlowSource] {
        &self.sources
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Timestamp of the last spawn tick that ran.
    pub fn last_spawn_ms(&self) -> f64 {
        self.last_spawn_ms
    }

    /// Spawn tick, run at most once per `glow_interval_ms`.
    ///
    /// Expired sources are dropped first. While below the cap, idle
    /// sources are sent off to fresh random targets, and a single new
    /// source appears when none are left. Returns whether the tick ran.
    pub fn spawn<R: Rng + ?Sized>(
        &mut self,
        timestamp_ms: f64,
        viewport: Viewport,
        config: &GlowConfig,
        rng: &mut R,
    ) -> bool {
        if timestamp_ms - self.last_spawn_ms <= config.glow_interval_ms {
            return false;
        }

        self.sources.retain(|glow| !glow.is_expired());
        if self.sources.len() >= config.max_active_glows {
            return false;
        }

        for glow in self.sources.iter_mut().filter(|glow| !glow.is_moving) {
            glow.target = random_point(viewport, rng);
            glow.is_moving = true;
        }

        if self.sources.is_empty() {
            let position = random_point(viewport, rng);
            let target = random_point(viewport, rng);
            tracing::trace!(?position, ?target, "glow spawned");
            self.sources.push(GlowSource {
                position,
                target,
                remaining_life: config.glow_duration_ms,
                is_moving: true,
            });
        }

        self.last_spawn_ms = timestamp_ms;
        true
    }

    /// Ease every moving source a fixed fraction of the way to its target.
    ///
    /// A source within one unit of its target stops where it is.
    pub fn advance(&mut self, speed: f32) {
        for glow in self.sources.iter_mut().filter(|glow| glow.is_moving) {
            let dx = glow.target.x - glow.position.x;
            let dy = glow.target.y - glow.position.y;
            if (dx * dx + dy * dy).sqrt() > 1.0 {
                glow.position.x += dx * speed;
                glow.position.y += dy * speed;
            } else {
                glow.is_moving = false;
            }
        }
    }

    /// Take `step_ms` of life from every source and drop the expired ones.
    pub fn age(&mut self, step_ms: f64) {
        for glow in &mut self.sources {
            glow.remaining_life -= step_ms;
        }
        self.sources.retain(|glow| !glow.is_expired());
    }

    pub fn clear(&mut self) {
        self.sources.clear();
        self.last_spawn_ms = 0.0;
    }
}

fn random_point<R: Rng + ?Sized>(viewport: Viewport, rng: &mut R) -> Point2 {
    Point2::new(
        rng.r#gen::<f32>() * viewport.width.max(0.0),
        rng.r#gen::<f32>() * viewport.height.max(0.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn viewport() -> Viewport {
        Viewport::new(800.0, 600.0)
    }

    #[test]
    fn test_no_spawn_before_interval() {
        let config = GlowConfig::default();
        let mut rng = StdRng::seed_from_u64(3);
        let mut field = GlowField::new();

        assert!(!field.spawn(0.0, viewport(), &config, &mut rng));
        assert!(!field.spawn(config.glow_interval_ms, viewport(), &config, &mut rng));
        assert!(field.is_empty());

        assert!(field.spawn(config.glow_interval_ms + 1.0, viewport(), &config, &mut rng));
        assert_eq!(field.len(), 1);
        assert_eq!(field.sources()[0].remaining_life, config.glow_duration_ms);
        assert!(field.sources()[0].is_moving);
        assert_eq!(field.last_spawn_ms(), config.glow_interval_ms + 1.0);
    }

    #[test]
    fn test_spawn_inside_viewport() {
        let config = GlowConfig::default();
        let mut rng = StdRng::seed_from_u64(11);
        let mut field = GlowField::new();
        field.spawn(5000.0, viewport(), &config, &mut rng);

        let glow = &field.sources()[0];
        for p in [glow.position, glow.target] {
            assert!((0.0..=800.0).contains(&p.x));
            assert!((0.0..=600.0).contains(&p.y));
        }
    }

    #[test]
    fn test_idle_source_gets_new_target() {
        let config = GlowConfig::default();
        let mut rng = StdRng::seed_from_u64(5);
        let mut field = GlowField::new();
        field.spawn(5000.0, viewport(), &config, &mut rng);
        field.sources[0].is_moving = false;
        let old_target = field.sources[0].target;

        assert!(field.spawn(10_000.0, viewport(), &config, &mut rng));
        assert_eq!(field.len(), 1);
        assert!(field.sources()[0].is_moving);
        assert_ne!(field.sources()[0].target, old_target);
    }

    #[test]
    fn test_spawn_skipped_at_cap() {
        let mut config = GlowConfig::default();
        config.max_active_glows = 0;
        let mut rng = StdRng::seed_from_u64(5);
        let mut field = GlowField::new();

        assert!(!field.spawn(5000.0, viewport(), &config, &mut rng));
        assert!(field.is_empty());
        assert_eq!(field.last_spawn_ms(), 0.0);
    }

    #[test]
    fn test_advance_eases_then_stops_short() {
        let mut field = GlowField::new();
        field.sources.push(GlowSource {
            position: Point2::new(0.0, 0.0),
            target: Point2::new(100.0, 0.0),
            remaining_life: 3000.0,
            is_moving: true,
        });

        field.advance(0.05);
        assert!((field.sources()[0].position.x - 5.0).abs() < 1e-4);

        for _ in 0..200 {
            field.advance(0.05);
        }
        let glow = &field.sources()[0];
        assert!(!glow.is_moving);
        assert!(glow.position.distance(glow.target) <= 1.0);
        assert_ne!(glow.position, glow.target);
    }

    #[test]
    fn test_age_drops_expired() {
        let mut field = GlowField::new();
        field.sources.push(GlowSource {
            position: Point2::ORIGIN,
            target: Point2::ORIGIN,
            remaining_life: 40.0,
            is_moving: false,
        });

        field.age(16.0);
        field.age(16.0);
        assert_eq!(field.sources()[0].remaining_life, 8.0);
        field.age(16.0);
        assert!(field.is_empty());
    }

    #[test]
    fn test_life_fraction() {
        let glow = GlowSource {
            position: Point2::ORIGIN,
            target: Point2::ORIGIN,
            remaining_life: 1500.0,
            is_moving: true,
        };
        assert_eq!(glow.life_fraction(3000.0), 0.5);
        assert_eq!(glow.life_fraction(0.0), 0.0);
    }
}
