//! Scripted pointer paths standing in for live pointer events.

use clap::ValueEnum;
use std::f64::consts::TAU;
use vector_field_core::Point;

/// Ticks per revolution of the orbit path.
const ORBIT_PERIOD_TICKS: f64 = 240.0;
/// Fraction of the run the sweep spends inside the viewport before leaving.
const SWEEP_ACTIVE_FRACTION: f64 = 0.8;

/// Pointer motion to replay during a headless run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PointerPath {
    /// Circles the viewport centre.
    Orbit,
    /// Crosses left to right along the middle row, then leaves.
    Sweep,
    /// No pointer at all.
    Absent,
}

impl PointerPath {
    /// Pointer position at `tick` of a `ticks`-long run, `None` when absent.
    pub fn position(self, tick: usize, ticks: usize, width: f64, height: f64) -> Option<Point> {
        let centre = Point::new(width / 2.0, height / 2.0);
        match self {
            PointerPath::Orbit => {
                let radius = 0.3 * width.min(height);
                let angle = TAU * tick as f64 / ORBIT_PERIOD_TICKS;
                Some(centre + Point::from_angle(angle) * radius)
            }
            PointerPath::Sweep => {
                let t = tick as f64 / ticks.max(1) as f64;
                (t < SWEEP_ACTIVE_FRACTION)
                    .then(|| Point::new(width * t / SWEEP_ACTIVE_FRACTION, centre.y))
            }
            PointerPath::Absent => None,
        }
    }
}
