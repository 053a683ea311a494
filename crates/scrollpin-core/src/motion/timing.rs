//! Time calculation utilities
//!
//! Window fractions work on unit-timeline time; `progress` works on wall
//! clock readings supplied by the caller so animations stay testable.

use std::time::{Duration, Instant};

/// Fraction of the window `[start, start + duration)` covered at `t`
///
/// Returns `None` before the window opens. A zero-length window is fully
/// covered as soon as it is reached.
#[inline]
pub fn window_fraction(start: f64, duration: f64, t: f64) -> Option<f64> {
    if t < start {
        return None;
    }
    if duration <= 0.0 || t >= start + duration {
        return Some(1.0);
    }
    Some(((t - start) / duration).clamp(0.0, 1.0))
}

/// Calculate animation progress (0.0 to 1.0) at `now`
#[inline]
pub fn progress(start: Instant, duration: Duration, now: Instant) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    let elapsed = now.saturating_duration_since(start);
    let ratio = elapsed.as_secs_f64() / duration.as_secs_f64();
    ratio.clamp(0.0, 1.0)
}

/// Check if an animation started at `start` has run its course by `now`
#[inline]
pub fn is_complete(start: Instant, duration: Duration, now: Instant) -> bool {
    now.saturating_duration_since(start) >= duration
}

/// Linear interpolation between two values, exact at both ends
#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from * (1.0 - t) + to * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp() {
        assert!((lerp(0.0, 100.0, 0.0) - 0.0).abs() < 0.001);
        assert!((lerp(0.0, 100.0, 0.5) - 50.0).abs() < 0.001);
        assert!((lerp(0.0, 100.0, 1.0) - 100.0).abs() < 0.001);
        assert!((lerp(1.0, 0.94, 0.5) - 0.97).abs() < 1e-9);
        assert_eq!(lerp(0.97, 0.94, 1.0), 0.94);
        assert_eq!(lerp(-10.0, 0.0, 1.0), 0.0);
    }

    #[test]
    fn test_window_fraction() {
        assert_eq!(window_fraction(1.0, 0.5, 0.99), None);
        assert_eq!(window_fraction(1.0, 0.5, 1.0), Some(0.0));
        assert_eq!(window_fraction(1.0, 0.5, 1.25), Some(0.5));
        assert_eq!(window_fraction(1.0, 0.5, 1.5), Some(1.0));
        assert_eq!(window_fraction(1.0, 0.5, 9.0), Some(1.0));
    }

    #[test]
    fn test_zero_length_window_is_a_step() {
        assert_eq!(window_fraction(2.0, 0.0, 1.999), None);
        assert_eq!(window_fraction(2.0, 0.0, 2.0), Some(1.0));
    }

    #[test]
    fn test_progress_zero_duration() {
        let start = Instant::now();
        assert!((progress(start, Duration::ZERO, start) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_progress_with_injected_clock() {
        let start = Instant::now();
        let duration = Duration::from_millis(200);
        assert_eq!(progress(start, duration, start), 0.0);
        let half = progress(start, duration, start + Duration::from_millis(100));
        assert!((half - 0.5).abs() < 1e-9);
        assert!(is_complete(start, duration, start + duration));
        assert!(!is_complete(start, duration, start + Duration::from_millis(199)));
    }
}
