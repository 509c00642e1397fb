//! Geometry primitives: distance, bearing, the smoothstep falloff curve and
//! the anchor lattice.
//!
//! Everything here is pure. [`AnchorGrid`] is the only type with a
//! constructor that can fail, and only on bad viewport input.

use crate::error::SimError;
use glam::DVec2;

/// A real-valued 2D coordinate.
pub type Point = DVec2;

/// Euclidean distance between `a` and `b`.
pub fn distance(a: Point, b: Point) -> f64 {
    a.distance(b)
}

/// Angle in radians of the vector from `from` to `to`, in `(-π, π]`.
///
/// Uses a four-quadrant arctangent. Coincident points yield `0.0`.
pub fn bearing(from: Point, to: Point) -> f64 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Cubic ease `t²(3 - 2t)` with zero slope at both ends.
///
/// `t` is expected in [0, 1]; callers clamp first.
pub fn smoothstep(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

/// Field-strength curve for indicator length at distance `d` from the attractor.
///
/// Returns exactly 0 inside the dead zone (`d < keep_out`). Beyond it the
/// length eases from 0 up to `max_len` across `influence_range`, then stays
/// saturated. A non-positive `influence_range` degenerates to a hard step at
/// `keep_out`.
pub fn falloff(d: f64, keep_out: f64, max_len: f64, influence_range: f64) -> f64 {
    if d < keep_out {
        return 0.0;
    }
    let t = if influence_range > 0.0 {
        ((d - keep_out) / influence_range).clamp(0.0, 1.0)
    } else {
        1.0
    };
    max_len * smoothstep(t)
}

/// Regular lattice of anchors with spacing `spacing`, offset by `spacing / 2`
/// in both axes so it sits centred in the viewport.
///
/// Points are emitted row by row (y outer, x inner). Non-finite or
/// non-positive inputs produce an empty lattice.
pub fn generate_grid(width: f64, height: f64, spacing: f64) -> Vec<Point> {
    if !(width.is_finite() && height.is_finite() && spacing.is_finite()) || spacing <= 0.0 {
        return Vec::new();
    }
    let half = spacing / 2.0;
    let axis = |extent: f64| {
        (0_u32..)
            .map(move |i| half + f64::from(i) * spacing)
            .take_while(move |&v| v < extent)
    };
    axis(height)
        .flat_map(|y| axis(width).map(move |x| Point::new(x, y)))
        .collect()
}

/// The anchor lattice for one viewport size.
///
/// Immutable once built; a resize builds a new grid.
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorGrid {
    width: f64,
    height: f64,
    spacing: f64,
    points: Vec<Point>,
}

impl AnchorGrid {
    /// Upper bound on lattice size, guarding against absurd viewport/spacing ratios.
    pub const MAX_ANCHORS: usize = 1 << 22;

    /// Builds the lattice for a `width` x `height` viewport.
    ///
    /// Returns `SimError::InvalidDimensions` for non-positive or non-finite
    /// dimensions or a lattice larger than [`Self::MAX_ANCHORS`], and
    /// `SimError::InvalidParam` for a bad spacing.
    pub fn new(width: f64, height: f64, spacing: f64) -> Result<Self, SimError> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(SimError::InvalidDimensions);
        }
        if !spacing.is_finite() || spacing <= 0.0 {
            return Err(SimError::invalid_param(
                "grid_spacing",
                spacing,
                "must be positive and finite",
            ));
        }
        let cols = (width / spacing).ceil() as usize;
        let rows = (height / spacing).ceil() as usize;
        match cols.checked_mul(rows) {
            Some(n) if n <= Self::MAX_ANCHORS => {}
            _ => return Err(SimError::InvalidDimensions),
        }
        Ok(Self {
            width,
            height,
            spacing,
            points: generate_grid(width, height, spacing),
        })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    /// Anchors in row-major order.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Nearest anchor to `p` by linear scan.
    ///
    /// Ties go to the anchor that comes first in grid order. Returns `None`
    /// only for an empty grid.
    pub fn nearest(&self, p: Point) -> Option<Point> {
        let mut best = None;
        let mut best_d2 = f64::INFINITY;
        for &anchor in &self.points {
            let d2 = anchor.distance_squared(p);
            if d2 < best_d2 {
                best_d2 = d2;
                best = Some(anchor);
            }
        }
        best
    }
}
