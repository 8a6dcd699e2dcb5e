//! Numeric primitives shared by the scoring layers
//!
//! Ramps replace hard clinical cutoffs so that neighbouring measurements on either side of
//! a threshold receive nearly identical scores.

/// Restrict `x` to `[lo, hi]`
pub fn clamp(x: f64, lo: f64, hi: f64) -> f64 {
    if x < lo {
        lo
    } else if x > hi {
        hi
    } else {
        x
    }
}

/// Linear score where lower raw values are healthier
///
/// Returns 1.0 at or below `good`, 0.0 at or above `bad`, interpolated between.
pub fn ramp_down(x: f64, good: f64, bad: f64) -> f64 {
    if x <= good {
        return 1.0;
    }
    if x >= bad {
        return 0.0;
    }
    clamp((bad - x) / (bad - good), 0.0, 1.0)
}

/// Linear score where higher raw values are healthier
///
/// Returns 0.0 at or below `bad`, 1.0 at or above `good`, interpolated between.
pub fn ramp_up(x: f64, bad: f64, good: f64) -> f64 {
    if x <= bad {
        return 0.0;
    }
    if x >= good {
        return 1.0;
    }
    clamp((x - bad) / (good - bad), 0.0, 1.0)
}

/// Round half away from zero to the nearest integer
pub fn round_for_display(x: f64) -> i32 {
    x.round() as i32
}
