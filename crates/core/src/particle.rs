//! Particle lifecycle: rate-controlled spawning at the attractor, advection
//! along the local field with damping, aging and culling.
//!
//! Units: `dt` is always seconds. Particle life is tracked in milliseconds and
//! the aging step is the only place the two meet (`life -= dt * 1000`).
//! Velocity is stored in per-tick units, so the force term is scaled by `dt`
//! but the position update is not.

use crate::error::SimError;
use crate::geometry::{bearing, distance, AnchorGrid, Point};
use crate::params::{param_f64, param_usize};
use crate::prng::Xorshift64;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Milliseconds per second, for aging.
pub const MILLIS_PER_SEC: f64 = 1000.0;

/// Sentinel attractor position reported when no pointer is present.
pub const ABSENT_ATTRACTOR: Point = Point::new(-1000.0, -1000.0);

/// Coordinates below this on either axis are treated as "pointer absent".
const ABSENT_THRESHOLD: f64 = -500.0;

const DEFAULT_SPAWN_RATE: f64 = 3.0;
const DEFAULT_MAX_PARTICLES: usize = 200;
const DEFAULT_PARTICLE_LIFE_MS: f64 = 2000.0;
const DEFAULT_PARTICLE_SIZE: f64 = 3.0;
const DEFAULT_VELOCITY_DAMPING: f64 = 0.95;
const DEFAULT_SPAWN_JITTER: f64 = 10.0;
const DEFAULT_ACCELERATION: f64 = 0.5;
const DEFAULT_FORCE_RANGE: f64 = 400.0;

/// Whether `p` is the absent-pointer sentinel (or anything equally far off-screen).
pub fn is_absent(p: Point) -> bool {
    p.x < ABSENT_THRESHOLD || p.y < ABSENT_THRESHOLD
}

/// Clamps negative and non-finite deltas to zero.
pub fn sanitize_dt(dt: f64) -> f64 {
    if dt.is_finite() && dt > 0.0 {
        dt
    } else {
        0.0
    }
}

/// Particle configuration, fixed for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleConfig {
    /// Births per second while the pointer is present.
    pub spawn_rate: f64,
    /// Hard cap on the live set.
    pub max_particles: usize,
    /// Lifetime of a fresh particle, in milliseconds.
    pub particle_life_ms: f64,
    /// Render radius carried on each particle.
    pub particle_size: f64,
    /// Per-tick velocity multiplier, strictly inside (0, 1).
    pub velocity_damping: f64,
    /// Full width of the uniform spawn offset window on each axis.
    pub spawn_jitter: f64,
    /// Peak acceleration applied by the local field.
    pub acceleration: f64,
    /// Distance at which the pull on a particle reaches zero.
    pub force_range: f64,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            spawn_rate: DEFAULT_SPAWN_RATE,
            max_particles: DEFAULT_MAX_PARTICLES,
            particle_life_ms: DEFAULT_PARTICLE_LIFE_MS,
            particle_size: DEFAULT_PARTICLE_SIZE,
            velocity_damping: DEFAULT_VELOCITY_DAMPING,
            spawn_jitter: DEFAULT_SPAWN_JITTER,
            acceleration: DEFAULT_ACCELERATION,
            force_range: DEFAULT_FORCE_RANGE,
        }
    }
}

impl ParticleConfig {
    /// Extracts a config from a JSON object, falling back to defaults per key.
    pub fn from_json(params: &Value) -> Self {
        Self {
            spawn_rate: param_f64(params, "spawn_rate", DEFAULT_SPAWN_RATE),
            max_particles: param_usize(params, "max_particles", DEFAULT_MAX_PARTICLES),
            particle_life_ms: param_f64(params, "particle_life_ms", DEFAULT_PARTICLE_LIFE_MS),
            particle_size: param_f64(params, "particle_size", DEFAULT_PARTICLE_SIZE),
            velocity_damping: param_f64(params, "velocity_damping", DEFAULT_VELOCITY_DAMPING),
            spawn_jitter: param_f64(params, "spawn_jitter", DEFAULT_SPAWN_JITTER),
            acceleration: param_f64(params, "acceleration", DEFAULT_ACCELERATION),
            force_range: param_f64(params, "force_range", DEFAULT_FORCE_RANGE),
        }
    }

    pub fn to_json(&self) -> Value {
        json!({
            "spawn_rate": self.spawn_rate,
            "max_particles": self.max_particles,
            "particle_life_ms": self.particle_life_ms,
            "particle_size": self.particle_size,
            "velocity_damping": self.velocity_damping,
            "spawn_jitter": self.spawn_jitter,
            "acceleration": self.acceleration,
            "force_range": self.force_range,
        })
    }

    /// Checks every value against its legal range.
    pub fn validate(&self) -> Result<(), SimError> {
        let non_negative = [
            ("spawn_rate", self.spawn_rate),
            ("particle_size", self.particle_size),
            ("spawn_jitter", self.spawn_jitter),
            ("acceleration", self.acceleration),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(SimError::invalid_param(name, value, "must be non-negative and finite"));
            }
        }
        let positive = [
            ("particle_life_ms", self.particle_life_ms),
            ("force_range", self.force_range),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(SimError::invalid_param(name, value, "must be positive and finite"));
            }
        }
        let damping = self.velocity_damping;
        if !(damping > 0.0 && damping < 1.0) {
            return Err(SimError::invalid_param(
                "velocity_damping",
                damping,
                "must lie strictly between 0 and 1",
            ));
        }
        Ok(())
    }

    pub fn param_schema() -> Value {
        json!({
            "spawn_rate": {
                "type": "number",
                "default": DEFAULT_SPAWN_RATE,
                "min": 0.0,
                "max": 1000.0,
                "description": "Particles born per second while the pointer is present"
            },
            "max_particles": {
                "type": "integer",
                "default": DEFAULT_MAX_PARTICLES,
                "min": 0,
                "max": 100_000,
                "description": "Hard cap on live particles; extra births are dropped"
            },
            "particle_life_ms": {
                "type": "number",
                "default": DEFAULT_PARTICLE_LIFE_MS,
                "min": 1.0,
                "max": 60_000.0,
                "description": "Lifetime of a new particle in milliseconds"
            },
            "particle_size": {
                "type": "number",
                "default": DEFAULT_PARTICLE_SIZE,
                "min": 0.0,
                "max": 50.0,
                "description": "Render radius carried on each particle"
            },
            "velocity_damping": {
                "type": "number",
                "default": DEFAULT_VELOCITY_DAMPING,
                "min": 0.0,
                "max": 1.0,
                "description": "Per-tick velocity multiplier, exclusive of both ends"
            },
            "spawn_jitter": {
                "type": "number",
                "default": DEFAULT_SPAWN_JITTER,
                "min": 0.0,
                "max": 100.0,
                "description": "Width of the uniform spawn offset window per axis"
            },
            "acceleration": {
                "type": "number",
                "default": DEFAULT_ACCELERATION,
                "min": 0.0,
                "max": 10.0,
                "description": "Peak acceleration from the local field"
            },
            "force_range": {
                "type": "number",
                "default": DEFAULT_FORCE_RANGE,
                "min": 1.0,
                "max": 5000.0,
                "description": "Distance from the attractor at which the pull fades to zero"
            }
        })
    }
}

/// A short-lived particle advected along the field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Point,
    /// Per-tick displacement.
    pub vel: Point,
    /// Remaining life in milliseconds.
    pub life: f64,
    pub max_life: f64,
    pub size: f64,
}

impl Particle {
    /// A fresh particle at rest with full life.
    pub fn new(pos: Point, config: &ParticleConfig) -> Self {
        Self {
            pos,
            vel: Point::ZERO,
            life: config.particle_life_ms,
            max_life: config.particle_life_ms,
            size: config.particle_size,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }

    /// Remaining life as a fraction of the original, clamped to [0, 1].
    pub fn life_ratio(&self) -> f64 {
        if self.max_life > 0.0 {
            (self.life / self.max_life).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Opacity curve for fading out: square root of [`Self::life_ratio`].
    pub fn fade(&self) -> f64 {
        self.life_ratio().sqrt()
    }

    pub fn speed(&self) -> f64 {
        self.vel.length()
    }
}

/// Pull strength at distance `d`: 1 at the attractor, linear to 0 at `range`.
pub fn force_strength(d: f64, range: f64) -> f64 {
    (1.0 - d / range).max(0.0)
}

/// Advances one particle by `dt` seconds.
///
/// The force direction comes from the nearest anchor's bearing to the
/// attractor, while its magnitude comes from the particle's own distance to
/// the attractor. A zero (or sanitized-to-zero) `dt` leaves the particle
/// untouched.
pub fn integrate(
    particle: &mut Particle,
    attractor: Point,
    grid: &AnchorGrid,
    dt: f64,
    config: &ParticleConfig,
) {
    let dt = sanitize_dt(dt);
    if dt == 0.0 {
        return;
    }

    if let Some(anchor) = grid.nearest(particle.pos) {
        let angle = bearing(anchor, attractor);
        let strength = force_strength(distance(particle.pos, attractor), config.force_range);
        particle.vel += Point::from_angle(angle) * (config.acceleration * strength * dt);
    }

    particle.vel *= config.velocity_damping;
    particle.pos += particle.vel;
    particle.life -= dt * MILLIS_PER_SEC;
}

/// Owns the live particle set, in birth order.
#[derive(Debug, Clone, Default)]
pub struct ParticleStore {
    config: ParticleConfig,
    particles: Vec<Particle>,
}

impl ParticleStore {
    pub fn new(config: ParticleConfig) -> Self {
        Self {
            config,
            particles: Vec::with_capacity(config.max_particles.min(4096)),
        }
    }

    pub fn config(&self) -> &ParticleConfig {
        &self.config
    }

    /// Live particles, oldest first.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Slots left before the cap is reached.
    pub fn capacity(&self) -> usize {
        self.config.max_particles.saturating_sub(self.particles.len())
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Births `floor(spawn_rate * dt)` particles around `attractor`, up to the cap.
    ///
    /// Does nothing while the attractor is absent. Returns how many were
    /// actually spawned; births beyond the cap are dropped.
    pub fn spawn(&mut self, attractor: Point, dt: f64, rng: &mut Xorshift64) -> usize {
        if is_absent(attractor) {
            return 0;
        }
        let dt = sanitize_dt(dt);
        // `as` saturates, so a huge dt cannot overflow the count.
        let requested = (self.config.spawn_rate * dt).floor() as usize;
        let count = requested.min(self.capacity());
        if count < requested {
            tracing::trace!(requested, spawned = count, "particle cap reached, dropping births");
        }

        let jitter = self.config.spawn_jitter;
        for _ in 0..count {
            let offset = Point::new(rng.next_signed(jitter), rng.next_signed(jitter));
            self.particles
                .push(Particle::new(attractor + offset, &self.config));
        }
        count
    }

    /// Integrates every live particle by `dt` seconds.
    pub fn step(&mut self, attractor: Point, grid: &AnchorGrid, dt: f64) {
        let config = self.config;
        for particle in &mut self.particles {
            integrate(particle, attractor, grid, dt, &config);
        }
    }

    /// Removes expired particles, keeping survivors in their original order.
    pub fn cull(&mut self) -> usize {
        let before = self.particles.len();
        self.particles.retain(Particle::is_alive);
        before - self.particles.len()
    }
}
