//! A running session: the anchor grid, particle store, field evaluator and
//! spawn PRNG for one viewport and one fixed configuration.
//!
//! Each [`Simulation::tick`] runs spawn, integrate, cull, then field
//! evaluation, in that order.

use crate::clock::FrameInputs;
use crate::error::SimError;
use crate::field::{FieldConfig, Vector, VectorField};
use crate::geometry::AnchorGrid;
use crate::particle::{Particle, ParticleConfig, ParticleStore};
use crate::prng::Xorshift64;
use crate::seed::Seed;
use crate::simulation::{Frame, Simulation};
use serde_json::{json, Value};

/// Owns all per-session simulation state.
pub struct Session {
    grid: AnchorGrid,
    field: VectorField,
    store: ParticleStore,
    rng: Xorshift64,
    seed: u64,
    tick: u64,
}

impl Session {
    /// Starts a session for a `width` x `height` viewport.
    ///
    /// Both configs are validated up front; the tick path never checks them again.
    pub fn new(
        width: f64,
        height: f64,
        field: FieldConfig,
        particles: ParticleConfig,
        seed: u64,
    ) -> Result<Self, SimError> {
        field.validate()?;
        particles.validate()?;
        let grid = AnchorGrid::new(width, height, field.grid_spacing)?;
        tracing::debug!(width, height, anchors = grid.len(), seed, "session started");
        Ok(Self {
            grid,
            field: VectorField::new(field),
            store: ParticleStore::new(particles),
            rng: Xorshift64::new(seed),
            seed,
            tick: 0,
        })
    }

    /// Starts a session from a recipe, validating it first.
    pub fn from_seed(seed: &Seed) -> Result<Self, SimError> {
        seed.validate()?;
        Self::new(
            seed.width,
            seed.height,
            seed.field_config(),
            seed.particle_config(),
            seed.seed,
        )
    }

    /// Regenerates the grid for a new viewport. Live particles are kept.
    ///
    /// On error the previous grid stays in place.
    pub fn resize(&mut self, width: f64, height: f64) -> Result<(), SimError> {
        let grid = AnchorGrid::new(width, height, self.grid.spacing())?;
        tracing::debug!(width, height, anchors = grid.len(), "grid regenerated");
        self.grid = grid;
        self.field.clear();
        Ok(())
    }

    /// Clears particles and vectors, rewinds the tick counter and reseeds the PRNG.
    pub fn reset(&mut self) {
        tracing::debug!(tick = self.tick, live = self.store.len(), "session reset");
        self.store.clear();
        self.field.clear();
        self.rng = Xorshift64::new(self.seed);
        self.tick = 0;
    }

    pub fn grid(&self) -> &AnchorGrid {
        &self.grid
    }

    pub fn field_config(&self) -> &FieldConfig {
        self.field.config()
    }

    pub fn particle_config(&self) -> &ParticleConfig {
        self.store.config()
    }

    /// Ticks completed since start or the last reset.
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Snapshot of the latest tick for a renderer.
    pub fn frame(&self) -> Frame<'_> {
        Frame {
            tick: self.tick,
            vectors: self.field.vectors(),
            particles: self.store.particles(),
        }
    }
}

impl Simulation for Session {
    fn tick(&mut self, inputs: &FrameInputs) {
        let attractor = inputs.attractor;
        self.store.spawn(attractor, inputs.dt, &mut self.rng);
        self.store.step(attractor, &self.grid, inputs.dt);
        self.store.cull();
        self.field.evaluate_into(&self.grid, attractor);
        self.tick += 1;
    }

    fn vectors(&self) -> &[Vector] {
        self.field.vectors()
    }

    fn particles(&self) -> &[Particle] {
        self.store.particles()
    }

    fn params(&self) -> Value {
        json!({
            "field": self.field.config().to_json(),
            "particles": self.store.config().to_json(),
        })
    }

    fn param_schema(&self) -> Value {
        json!({
            "field": FieldConfig::param_schema(),
            "particles": ParticleConfig::param_schema(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{distance, Point};

    fn session(seed: u64) -> Session {
        let field = FieldConfig {
            grid_spacing: 40.0,
            ..FieldConfig::default()
        };
        let particles = ParticleConfig {
            spawn_rate: 120.0,
            ..ParticleConfig::default()
        };
        Session::new(320.0, 240.0, field, particles, seed).unwrap()
    }

    fn run(s: &mut Session, ticks: usize, attractor: Point) {
        for _ in 0..ticks {
            s.tick(&FrameInputs::new(attractor, 0.05));
        }
    }

    #[test]
    fn new_builds_grid_for_viewport() {
        let s = session(1);
        assert_eq!(s.grid().len(), 48);
        assert_eq!(s.tick_count(), 0);
        assert!(s.vectors().is_empty());
        assert!(s.particles().is_empty());
    }

    #[test]
    fn new_rejects_invalid_config() {
        let bad = ParticleConfig {
            velocity_damping: 1.0,
            ..ParticleConfig::default()
        };
        assert!(Session::new(320.0, 240.0, FieldConfig::default(), bad, 1).is_err());
        assert!(matches!(
            Session::new(0.0, 240.0, FieldConfig::default(), ParticleConfig::default(), 1),
            Err(SimError::InvalidDimensions)
        ));
    }

    #[test]
    fn tick_produces_one_vector_per_anchor() {
        let mut s = session(1);
        s.tick(&FrameInputs::new(Point::new(160.0, 120.0), 0.016));
        assert_eq!(s.vectors().len(), s.grid().len());
        assert_eq!(s.tick_count(), 1);
    }

    #[test]
    fn tick_spawns_near_pointer() {
        let mut s = session(1);
        let at = Point::new(160.0, 120.0);
        s.tick(&FrameInputs::new(at, 0.1));
        // 120/s * 0.1s = 12 births
        assert_eq!(s.particles().len(), 12);
        for p in s.particles() {
            assert!(distance(p.pos, at) < 10.0);
        }
    }

    #[test]
    fn absent_pointer_spawns_nothing_but_still_ages() {
        let mut s = session(1);
        run(&mut s, 5, Point::new(160.0, 120.0));
        let live = s.particles().len();
        assert!(live > 0);
        s.tick(&FrameInputs::from_pointer(None, 0.05));
        assert_eq!(s.particles().len(), live);
        assert!(s.particles().iter().all(|p| p.life < p.max_life));
        assert!(s.vectors().iter().all(Vector::is_visible));
    }

    #[test]
    fn live_count_stays_under_cap() {
        let field = FieldConfig::default();
        let particles = ParticleConfig {
            spawn_rate: 10_000.0,
            max_particles: 200,
            ..ParticleConfig::default()
        };
        let mut s = Session::new(800.0, 600.0, field, particles, 3).unwrap();
        run(&mut s, 30, Point::new(400.0, 300.0));
        assert_eq!(s.particles().len(), 200);
    }

    #[test]
    fn same_seed_replays_identically() {
        let mut a = session(77);
        let mut b = session(77);
        let path = [Point::new(40.0, 40.0), Point::new(120.0, 90.0), Point::new(300.0, 200.0)];
        for &p in path.iter().cycle().take(30) {
            a.tick(&FrameInputs::new(p, 0.033));
            b.tick(&FrameInputs::new(p, 0.033));
        }
        assert_eq!(a.particles(), b.particles());
        assert_eq!(a.vectors(), b.vectors());
    }

    #[test]
    fn different_seed_changes_spawn_positions() {
        let mut a = session(1);
        let mut b = session(2);
        a.tick(&FrameInputs::new(Point::new(100.0, 100.0), 0.1));
        b.tick(&FrameInputs::new(Point::new(100.0, 100.0), 0.1));
        assert_ne!(a.particles(), b.particles());
    }

    #[test]
    fn zero_dt_tick_changes_no_particles() {
        let mut s = session(1);
        run(&mut s, 3, Point::new(160.0, 120.0));
        let before: Vec<Particle> = s.particles().to_vec();
        s.tick(&FrameInputs::new(Point::new(160.0, 120.0), 0.0));
        assert_eq!(s.particles(), before.as_slice());
        s.tick(&FrameInputs::new(Point::new(160.0, 120.0), -2.0));
        assert_eq!(s.particles(), before.as_slice());
    }

    #[test]
    fn resize_regenerates_grid_and_keeps_particles() {
        let mut s = session(1);
        run(&mut s, 3, Point::new(160.0, 120.0));
        let live = s.particles().len();
        s.resize(640.0, 480.0).unwrap();
        assert_eq!(s.grid().len(), 16 * 12);
        assert_eq!(s.particles().len(), live);
        assert!(s.vectors().is_empty());
        s.tick(&FrameInputs::new(Point::new(160.0, 120.0), 0.016));
        assert_eq!(s.vectors().len(), 16 * 12);
    }

    #[test]
    fn failed_resize_keeps_previous_grid() {
        let mut s = session(1);
        assert!(s.resize(-1.0, 480.0).is_err());
        assert_eq!(s.grid().len(), 48);
    }

    #[test]
    fn reset_clears_and_reseeds() {
        let mut s = session(5);
        s.tick(&FrameInputs::new(Point::new(100.0, 100.0), 0.1));
        let first: Vec<Particle> = s.particles().to_vec();
        run(&mut s, 4, Point::new(100.0, 100.0));
        s.reset();
        assert_eq!(s.tick_count(), 0);
        assert!(s.particles().is_empty());
        assert!(s.vectors().is_empty());
        s.tick(&FrameInputs::new(Point::new(100.0, 100.0), 0.1));
        assert_eq!(s.particles(), first.as_slice());
    }

    #[test]
    fn from_seed_uses_recipe_configs() {
        let mut recipe = Seed::new(320.0, 240.0, 9);
        recipe.params = json!({"field": {"grid_spacing": 40.0}, "particles": {"max_particles": 5}});
        let s = Session::from_seed(&recipe).unwrap();
        assert_eq!(s.grid().len(), 48);
        assert_eq!(s.particle_config().max_particles, 5);
        assert_eq!(s.field_config().grid_spacing, 40.0);
    }

    #[test]
    fn params_and_schema_have_both_sections() {
        let s = session(1);
        let params = s.params();
        assert_eq!(params["field"]["grid_spacing"], 40.0);
        assert_eq!(params["particles"]["spawn_rate"], 120.0);
        let schema = s.param_schema();
        assert!(schema["field"].get("keep_out_radius").is_some());
        assert!(schema["particles"].get("velocity_damping").is_some());
    }

    #[test]
    fn frame_matches_trait_accessors() {
        let mut s = session(1);
        run(&mut s, 2, Point::new(160.0, 120.0));
        let frame = s.frame();
        assert_eq!(frame.tick, 2);
        assert_eq!(frame.vectors, s.vectors());
        assert_eq!(frame.particles, s.particles());
    }
}
