//! L4 Atomic Layer: Pure easing functions for timeline animations
//!
//! Provides mathematical easing functions that map input [0, 1] to output [0, 1]
//! with various acceleration curves.

use serde::{Deserialize, Serialize};

/// Easing curve applied to a normalized progress value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    /// Fast start, gentle landing: f(t) = 1 - (1-t)³
    #[default]
    CubicOut,
    /// Gentle start, fast finish: f(t) = t³
    CubicIn,
    QuinticOut,
    ExpoOut,
}

impl Easing {
    /// Apply the easing function to a progress value
    ///
    /// # Arguments
    /// * `t` - Progress value, clamped into [0, 1] (NaN reads as 0)
    ///
    /// # Returns
    /// Eased value in range [0, 1]
    #[inline]
    pub fn apply(self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Easing::Linear => t,
            Easing::CubicOut => ease_out_cubic(t),
            Easing::CubicIn => ease_in_cubic(t),
            Easing::QuinticOut => quintic_ease_out(t),
            Easing::ExpoOut => exponential_ease_out(t),
        }
    }
}

/// Cubic ease-out: f(t) = 1 - (1-t)³
#[inline]
pub fn ease_out_cubic(t: f64) -> f64 {
    let inv = 1.0 - t;
    1.0 - inv * inv * inv
}

/// Cubic ease-in: f(t) = t³
#[inline]
pub fn ease_in_cubic(t: f64) -> f64 {
    t * t * t
}

#[inline]
fn quintic_ease_out(t: f64) -> f64 {
    let inv = 1.0 - t;
    1.0 - inv * inv * inv * inv * inv
}

#[inline]
fn exponential_ease_out(t: f64) -> f64 {
    if t >= 1.0 {
        1.0
    } else {
        1.0 - 2.0_f64.powf(-10.0 * t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 5] = [
        Easing::Linear,
        Easing::CubicOut,
        Easing::CubicIn,
        Easing::QuinticOut,
        Easing::ExpoOut,
    ];

    #[test]
    fn test_easing_boundaries() {
        for easing in ALL {
            assert!(easing.apply(0.0).abs() < 0.001, "{:?} at t=0", easing);
            assert!((easing.apply(1.0) - 1.0).abs() < 0.001, "{:?} at t=1", easing);
        }
    }

    #[test]
    fn test_easing_monotonic() {
        for easing in ALL {
            let mut prev = 0.0;
            for i in 0..=20 {
                let t = i as f64 / 20.0;
                let v = easing.apply(t);
                assert!(v >= prev, "{:?} not monotonic at t={}", easing, t);
                prev = v;
            }
        }
    }

    #[test]
    fn test_out_of_range_input_is_clamped() {
        assert_eq!(Easing::CubicOut.apply(-0.5), 0.0);
        assert_eq!(Easing::CubicIn.apply(1.7), 1.0);
        assert_eq!(Easing::CubicOut.apply(f64::NAN), 0.0);
    }

    #[test]
    fn test_cubic_midpoints() {
        assert!((ease_out_cubic(0.5) - 0.875).abs() < 1e-9);
        assert!((ease_in_cubic(0.5) - 0.125).abs() < 1e-9);
    }
}
