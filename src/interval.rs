//! Closed intervals over f32.
//!
//! Used for the barycentric acceptance range of the triangle test and for
//! clamping color channels into the 8-bit output range.

/// Closed interval [min, max].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    /// Minimum value of the interval
    pub min: f32,
    /// Maximum value of the interval
    pub max: f32,
}

impl Interval {
    /// The unit interval [0, 1] that barycentric coordinates must lie in.
    pub const UNIT: Interval = Interval { min: 0.0, max: 1.0 };

    /// The range of an 8-bit color channel, [0, 255].
    pub const BYTE: Interval = Interval {
        min: 0.0,
        max: 255.0,
    };

    /// [0, +inf], the lower half of the barycentric rule.
    pub const NON_NEGATIVE: Interval = Interval {
        min: 0.0,
        max: f32::INFINITY,
    };

    /// [-inf, 1], the upper half of the barycentric rule.
    pub const AT_MOST_ONE: Interval = Interval {
        min: f32::NEG_INFINITY,
        max: 1.0,
    };

    /// Check if the value lies strictly outside the interval.
    ///
    /// NaN compares false against both bounds and is therefore never
    /// excluded.
    pub fn excludes(&self, x: f32) -> bool {
        x < self.min || x > self.max
    }

    /// Clamp the given value to be within this interval's bounds.
    ///
    /// NaN clamps to `min`.
    pub fn clamp(&self, x: f32) -> f32 {
        if x.is_nan() {
            return self.min;
        }
        x.clamp(self.min, self.max)
    }
}
