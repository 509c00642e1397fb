//! Per-frame inputs and the clock that turns monotonic timestamps into `dt`.

use crate::geometry::Point;
use crate::particle::{sanitize_dt, ABSENT_ATTRACTOR, MILLIS_PER_SEC};
use serde::{Deserialize, Serialize};

/// Everything one tick needs from the outside world.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameInputs {
    /// Current pointer position, or [`ABSENT_ATTRACTOR`] when there is none.
    pub attractor: Point,
    /// Seconds since the previous tick.
    pub dt: f64,
}

impl FrameInputs {
    pub fn new(attractor: Point, dt: f64) -> Self {
        Self { attractor, dt }
    }

    /// Maps an optional pointer onto the sentinel convention.
    pub fn from_pointer(pointer: Option<Point>, dt: f64) -> Self {
        Self::new(pointer.unwrap_or(ABSENT_ATTRACTOR), dt)
    }
}

/// Derives tick deltas (seconds) from millisecond timestamps.
///
/// The first sample yields `0.0`. Backwards or non-finite steps yield `0.0`
/// too. Large gaps pass through unchanged unless a cap is set with
/// [`TickClock::with_max_dt`].
#[derive(Debug, Clone, Default)]
pub struct TickClock {
    last_ms: Option<f64>,
    max_dt: Option<f64>,
}

impl TickClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Caps every delta at `max_dt` seconds.
    pub fn with_max_dt(mut self, max_dt: f64) -> Self {
        self.max_dt = Some(max_dt);
        self
    }

    /// Records `now_ms` and returns the elapsed seconds since the last sample.
    pub fn sample(&mut self, now_ms: f64) -> f64 {
        let dt = match self.last_ms {
            Some(last) => sanitize_dt((now_ms - last) / MILLIS_PER_SEC),
            None => 0.0,
        };
        if now_ms.is_finite() {
            self.last_ms = Some(now_ms);
        }
        match self.max_dt {
            Some(cap) => dt.min(cap),
            None => dt,
        }
    }

    /// Forgets the previous timestamp so the next sample yields `0.0`.
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_pointer_maps_none_to_sentinel() {
        let absent = FrameInputs::from_pointer(None, 0.016);
        assert_eq!(absent.attractor, ABSENT_ATTRACTOR);
        let present = FrameInputs::from_pointer(Some(Point::new(4.0, 5.0)), 0.016);
        assert_eq!(present.attractor, Point::new(4.0, 5.0));
    }

    #[test]
    fn first_sample_is_zero() {
        let mut clock = TickClock::new();
        assert_eq!(clock.sample(12_345.0), 0.0);
    }

    #[test]
    fn converts_milliseconds_to_seconds() {
        let mut clock = TickClock::new();
        clock.sample(1000.0);
        assert!((clock.sample(1200.0) - 0.2).abs() < 1e-12);
        assert!((clock.sample(2200.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn backwards_time_yields_zero() {
        let mut clock = TickClock::new();
        clock.sample(500.0);
        assert_eq!(clock.sample(400.0), 0.0);
        assert!((clock.sample(450.0) - 0.05).abs() < 1e-12);
    }

    #[test]
    fn non_finite_timestamp_is_ignored() {
        let mut clock = TickClock::new();
        clock.sample(100.0);
        assert_eq!(clock.sample(f64::NAN), 0.0);
        assert!((clock.sample(200.0) - 0.1).abs() < 1e-12);
    }

    #[test]
    fn stalled_frame_passes_through_unless_capped() {
        let mut raw = TickClock::new();
        raw.sample(0.0);
        assert!((raw.sample(5000.0) - 5.0).abs() < 1e-12);

        let mut capped = TickClock::new().with_max_dt(0.1);
        capped.sample(0.0);
        assert_eq!(capped.sample(5000.0), 0.1);
    }

    #[test]
    fn reset_restarts_from_zero() {
        let mut clock = TickClock::new();
        clock.sample(0.0);
        clock.sample(16.0);
        clock.reset();
        assert_eq!(clock.sample(1000.0), 0.0);
    }
}
