//! Reproducible recipe for a simulation run.
//!
//! A [`Seed`] holds the viewport, configuration, PRNG seed and the fixed
//! frame cadence. Replaying the same recipe with the same pointer script
//! produces identical frames.

use crate::error::SimError;
use crate::field::FieldConfig;
use crate::params::param_section;
use crate::particle::ParticleConfig;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Default frame duration, roughly 60 Hz.
pub const DEFAULT_FRAME_MS: f64 = 16.0;

/// Reproducible specification of a run.
///
/// `params` has two optional sections, `field` and `particles`, each read
/// leniently by the matching config's `from_json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Seed {
    pub width: f64,
    pub height: f64,
    pub params: Value,
    pub seed: u64,
    pub ticks: usize,
    #[serde(default = "default_frame_ms")]
    pub frame_ms: f64,
}

fn default_frame_ms() -> f64 {
    DEFAULT_FRAME_MS
}

impl Seed {
    /// Creates a recipe with empty params, zero ticks and the default cadence.
    pub fn new(width: f64, height: f64, seed: u64) -> Self {
        Self {
            width,
            height,
            params: Value::Object(serde_json::Map::new()),
            seed,
            ticks: 0,
            frame_ms: DEFAULT_FRAME_MS,
        }
    }

    pub fn field_config(&self) -> FieldConfig {
        FieldConfig::from_json(param_section(&self.params, "field"))
    }

    pub fn particle_config(&self) -> ParticleConfig {
        ParticleConfig::from_json(param_section(&self.params, "particles"))
    }

    /// Rebuilds `params` from concrete configs so every key is explicit.
    pub fn with_configs(mut self, field: &FieldConfig, particles: &ParticleConfig) -> Self {
        self.params = json!({
            "field": field.to_json(),
            "particles": particles.to_json(),
        });
        self
    }

    /// Checks dimensions, cadence and both configs.
    pub fn validate(&self) -> Result<(), SimError> {
        let dims_ok = self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0;
        if !dims_ok {
            return Err(SimError::InvalidDimensions);
        }
        if !self.frame_ms.is_finite() || self.frame_ms < 0.0 {
            return Err(SimError::invalid_param(
                "frame_ms",
                self.frame_ms,
                "must be non-negative and finite",
            ));
        }
        self.field_config().validate()?;
        self.particle_config().validate()
    }
}
