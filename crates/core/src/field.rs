//! Field evaluation: one directional indicator per anchor, bent toward the
//! attractor.
//!
//! Each anchor gets a [`Vector`] whose angle points at the attractor and whose
//! length follows [`falloff`]: zero inside the keep-out radius, easing up to
//! `max_vector_length` across the influence range.

use crate::error::SimError;
use crate::geometry::{bearing, distance, falloff, AnchorGrid, Point};
use crate::params::param_f64;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Default spacing between anchors, in viewport units.
const DEFAULT_GRID_SPACING: f64 = 35.0;
/// Default dead-zone radius around the attractor.
const DEFAULT_KEEP_OUT_RADIUS: f64 = 60.0;
/// Default saturated indicator length.
const DEFAULT_MAX_VECTOR_LENGTH: f64 = 25.0;
/// Default width of the easing band beyond the dead zone.
const DEFAULT_INFLUENCE_RANGE: f64 = 120.0;

/// Field configuration, fixed for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    /// Distance between neighbouring anchors.
    pub grid_spacing: f64,
    /// Radius around the attractor where indicators vanish.
    pub keep_out_radius: f64,
    /// Indicator length once fully saturated.
    pub max_vector_length: f64,
    /// Distance over which length eases from 0 to `max_vector_length`.
    pub influence_range: f64,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            grid_spacing: DEFAULT_GRID_SPACING,
            keep_out_radius: DEFAULT_KEEP_OUT_RADIUS,
            max_vector_length: DEFAULT_MAX_VECTOR_LENGTH,
            influence_range: DEFAULT_INFLUENCE_RANGE,
        }
    }
}

impl FieldConfig {
    /// Extracts a config from a JSON object, falling back to defaults per key.
    pub fn from_json(params: &Value) -> Self {
        Self {
            grid_spacing: param_f64(params, "grid_spacing", DEFAULT_GRID_SPACING),
            keep_out_radius: param_f64(params, "keep_out_radius", DEFAULT_KEEP_OUT_RADIUS),
            max_vector_length: param_f64(params, "max_vector_length", DEFAULT_MAX_VECTOR_LENGTH),
            influence_range: param_f64(params, "influence_range", DEFAULT_INFLUENCE_RANGE),
        }
    }

    pub fn to_json(&self) -> Value {
        json!({
            "grid_spacing": self.grid_spacing,
            "keep_out_radius": self.keep_out_radius,
            "max_vector_length": self.max_vector_length,
            "influence_range": self.influence_range,
        })
    }

    /// Checks every value against its legal range.
    pub fn validate(&self) -> Result<(), SimError> {
        if !self.grid_spacing.is_finite() || self.grid_spacing <= 0.0 {
            return Err(SimError::invalid_param(
                "grid_spacing",
                self.grid_spacing,
                "must be positive and finite",
            ));
        }
        if !self.keep_out_radius.is_finite() || self.keep_out_radius < 0.0 {
            return Err(SimError::invalid_param(
                "keep_out_radius",
                self.keep_out_radius,
                "must be non-negative and finite",
            ));
        }
        if !self.max_vector_length.is_finite() || self.max_vector_length < 0.0 {
            return Err(SimError::invalid_param(
                "max_vector_length",
                self.max_vector_length,
                "must be non-negative and finite",
            ));
        }
        if !self.influence_range.is_finite() || self.influence_range <= 0.0 {
            return Err(SimError::invalid_param(
                "influence_range",
                self.influence_range,
                "must be positive and finite",
            ));
        }
        Ok(())
    }

    pub fn param_schema() -> Value {
        json!({
            "grid_spacing": {
                "type": "number",
                "default": DEFAULT_GRID_SPACING,
                "min": 1.0,
                "max": 200.0,
                "description": "Distance between neighbouring anchors"
            },
            "keep_out_radius": {
                "type": "number",
                "default": DEFAULT_KEEP_OUT_RADIUS,
                "min": 0.0,
                "max": 500.0,
                "description": "Dead-zone radius around the attractor where indicators vanish"
            },
            "max_vector_length": {
                "type": "number",
                "default": DEFAULT_MAX_VECTOR_LENGTH,
                "min": 0.0,
                "max": 200.0,
                "description": "Indicator length once saturated"
            },
            "influence_range": {
                "type": "number",
                "default": DEFAULT_INFLUENCE_RANGE,
                "min": 1.0,
                "max": 1000.0,
                "description": "Distance beyond the dead zone over which length eases in"
            }
        })
    }
}

/// A directional indicator at one anchor. Recomputed every tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    pub anchor: Point,
    /// Radians, pointing from the anchor toward the attractor.
    pub angle: f64,
    /// Zero means no visible indicator.
    pub length: f64,
}

impl Vector {
    pub fn is_visible(&self) -> bool {
        self.length > 0.0
    }

    /// End point of the indicator.
    pub fn tip(&self) -> Point {
        self.anchor + Point::from_angle(self.angle) * self.length
    }
}

/// Evaluates the indicator at a single anchor.
pub fn evaluate_anchor(anchor: Point, attractor: Point, config: &FieldConfig) -> Vector {
    let d = distance(anchor, attractor);
    Vector {
        anchor,
        angle: bearing(anchor, attractor),
        length: falloff(
            d,
            config.keep_out_radius,
            config.max_vector_length,
            config.influence_range,
        ),
    }
}

/// One [`Vector`] per anchor, in grid order.
pub fn evaluate(grid: &[Point], attractor: Point, config: &FieldConfig) -> Vec<Vector> {
    grid.iter()
        .map(|&anchor| evaluate_anchor(anchor, attractor, config))
        .collect()
}

/// Field evaluator that reuses its output buffer across ticks.
#[derive(Debug, Clone, Default)]
pub struct VectorField {
    config: FieldConfig,
    vectors: Vec<Vector>,
}

impl VectorField {
    pub fn new(config: FieldConfig) -> Self {
        Self {
            config,
            vectors: Vec::new(),
        }
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// Vectors from the most recent evaluation.
    pub fn vectors(&self) -> &[Vector] {
        &self.vectors
    }

    /// Recomputes every vector for `attractor`, replacing the previous output.
    pub fn evaluate_into(&mut self, grid: &AnchorGrid, attractor: Point) {
        let config = self.config;
        self.vectors.clear();
        self.vectors.extend(
            grid.points()
                .iter()
                .map(|&anchor| evaluate_anchor(anchor, attractor, &config)),
        );
    }

    /// Drops the previous output, e.g. after a resize.
    pub fn clear(&mut self) {
        self.vectors.clear();
    }
}
