//! L4 Atomic Layer: Time calculation utilities for frame-driven animations
//!
//! Timestamps are high-resolution milliseconds as handed out by a frame
//! scheduler. Every helper here tolerates clock drift: negative or NaN deltas
//! collapse to zero instead of leaking into easing functions.

/// Millisecond timestamp or duration
pub type Millis = f64;

/// Elapsed time between `start` and `now`, never negative
#[inline]
pub fn elapsed_since(start: Millis, now: Millis) -> Millis {
    let delta = now - start;
    if delta.is_nan() || delta < 0.0 {
        0.0
    } else {
        delta
    }
}

/// Calculate animation progress (0.0 to 1.0) from elapsed time and duration
///
/// A zero-length span counts as already complete.
#[inline]
pub fn progress(elapsed: Millis, duration: Millis) -> f64 {
    if duration <= 0.0 {
        return 1.0;
    }
    let ratio = elapsed / duration;
    if ratio.is_nan() {
        0.0
    } else {
        ratio.clamp(0.0, 1.0)
    }
}

/// Linear interpolation between two values
#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp() {
        assert!((lerp(0.0, 100.0, 0.0) - 0.0).abs() < 0.001);
        assert!((lerp(0.0, 100.0, 0.5) - 50.0).abs() < 0.001);
        assert!((lerp(24.0, 0.0, 1.0) - 0.0).abs() < 0.001);
    }

    #[test]
    fn test_elapsed_clamps_backwards_clock() {
        assert_eq!(elapsed_since(100.0, 90.0), 0.0);
        assert_eq!(elapsed_since(100.0, f64::NAN), 0.0);
        assert_eq!(elapsed_since(100.0, 150.0), 50.0);
    }

    #[test]
    fn test_progress_zero_duration() {
        assert!((progress(0.0, 0.0) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_progress_clamped() {
        assert_eq!(progress(-10.0, 100.0), 0.0);
        assert_eq!(progress(250.0, 100.0), 1.0);
        assert!((progress(25.0, 100.0) - 0.25).abs() < 1e-9);
    }
}
