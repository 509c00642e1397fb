//! The `Simulation` trait driven once per frame, and the `Renderer` boundary
//! that consumes its output.
//!
//! Both traits are object-safe so a driver can hold `Box<dyn Simulation>` and
//! `&mut dyn Renderer`.

use crate::clock::FrameInputs;
use crate::error::SimError;
use crate::field::Vector;
use crate::particle::Particle;
use serde::Serialize;
use serde_json::Value;

/// A frame-driven simulation.
///
/// A tick runs to completion before the next one starts; nothing observes
/// intermediate state.
pub trait Simulation {
    /// Advance by one frame. Never fails: bad deltas degrade to no-ops.
    fn tick(&mut self, inputs: &FrameInputs);

    /// Per-anchor vectors from the latest tick.
    fn vectors(&self) -> &[Vector];

    /// Live particles after the latest tick, oldest first.
    fn particles(&self) -> &[Particle];

    /// Current configuration as a JSON object.
    fn params(&self) -> Value;

    /// Schema describing every parameter: type, range, default.
    fn param_schema(&self) -> Value;
}

/// Read-only snapshot of one tick's output, valid until the next tick.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Frame<'a> {
    pub tick: u64,
    pub vectors: &'a [Vector],
    pub particles: &'a [Particle],
}

impl<'a> Frame<'a> {
    /// Captures the current output of `sim`.
    pub fn capture(tick: u64, sim: &'a dyn Simulation) -> Self {
        Self {
            tick,
            vectors: sim.vectors(),
            particles: sim.particles(),
        }
    }

    /// Number of vectors with a non-zero length.
    pub fn visible_vectors(&self) -> usize {
        self.vectors.iter().filter(|v| v.is_visible()).count()
    }
}

/// Consumer of per-tick snapshots (arrow and particle drawing live behind this).
pub trait Renderer {
    fn render(&mut self, frame: &Frame<'_>) -> Result<(), SimError>;
}
