//! Seek Navigator: jump the page to the scroll offset of a choreography step.
//!
//! Resolving a seek is pure: index → mark on the unit timeline → scroll
//! offset inside the bound range. Moving the page there is the job of
//! [`SeekAnimator`], an interruptible smooth scroll with a hard duration cap.

use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::debug;

use crate::config::{EasingType, ScrollConfig};
use crate::motion::lerp;
use crate::motion::timing::{is_complete, progress};
use crate::range::Range;
use crate::timeline::Timeline;

/// Where a seek lands
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeekTarget {
    /// Index as requested by the caller
    pub requested: i64,
    /// Index after clamping into the participant range
    pub index: usize,
    pub unit_time: f64,
    pub scroll: f64,
}

/// Resolve `index` against a bound range and timeline
///
/// Out-of-range indices clamp to the nearest valid one. Returns `None` when
/// the timeline has nothing to seek to.
pub fn resolve(range: &Range, timeline: &Timeline, index: i64) -> Option<SeekTarget> {
    let length = timeline.length();
    if length <= 0.0 {
        return None;
    }
    let last = timeline.marks().len().checked_sub(1)?;
    let clamped = index.clamp(0, last as i64) as usize;
    if clamped as i64 != index {
        debug!(requested = index, clamped, "Seek index out of range, clamped");
    }

    let unit_time = timeline.mark(clamped as i64)?;
    Some(SeekTarget {
        requested: index,
        index: clamped,
        unit_time,
        scroll: range.start + (unit_time / length) * range.distance,
    })
}

/// Active seek animation state
#[derive(Debug, Clone)]
struct ActiveSeek {
    /// Animation start time
    start: Instant,
    /// Starting scroll position
    from: f64,
    /// Target scroll position
    to: f64,
    /// Animation duration, already capped
    duration: Duration,
    /// Easing function
    easing: EasingType,
    /// Binding generation the seek was issued under
    generation: u64,
    /// Position most recently handed to the host
    emitted: f64,
}

/// Interruptible smooth scroll driven by the host's clock
///
/// Call [`SeekAnimator::start`] to begin, then [`SeekAnimator::update`] on each
/// frame to get the next scroll position. A scroll reported by the host that
/// does not match what the animator emitted is treated as user input and
/// cancels the seek.
#[derive(Debug, Clone, Default)]
pub struct SeekAnimator {
    animation: Option<ActiveSeek>,
    config: ScrollConfig,
}

impl SeekAnimator {
    pub fn new(config: ScrollConfig) -> Self {
        Self {
            animation: None,
            config,
        }
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Destination of the running seek
    pub fn target(&self) -> Option<f64> {
        self.animation.as_ref().map(|a| a.to)
    }

    /// Generation the running seek belongs to
    pub fn generation(&self) -> Option<u64> {
        self.animation.as_ref().map(|a| a.generation)
    }

    /// Effective duration: configured duration capped by the hard maximum
    pub fn duration(&self) -> Duration {
        let ms = self
            .config
            .animation_duration_ms
            .min(self.config.max_duration_ms);
        Duration::from_millis(ms)
    }

    fn is_smooth(&self) -> bool {
        self.config.smooth_enabled && !self.duration().is_zero()
    }

    /// Begin a seek from `from` to `to`
    ///
    /// Returns the position to apply immediately: the target itself when
    /// smooth scrolling is off or there is nowhere to go, otherwise `None`
    /// and positions follow from [`SeekAnimator::update`].
    pub fn start(&mut self, from: f64, to: f64, now: Instant, generation: u64) -> Option<f64> {
        if !self.is_smooth() || (to - from).abs() < f64::EPSILON {
            self.animation = None;
            return Some(to);
        }

        self.animation = Some(ActiveSeek {
            start: now,
            from,
            to,
            duration: self.duration(),
            easing: self.config.easing,
            generation,
            emitted: from,
        });
        None
    }

    /// Advance to `now` and return the scroll position to apply, if any
    pub fn update(&mut self, now: Instant) -> Option<f64> {
        let anim = self.animation.as_mut()?;

        if is_complete(anim.start, anim.duration, now) {
            let to = anim.to;
            self.animation = None;
            return Some(to);
        }

        let t = anim.easing.apply(progress(anim.start, anim.duration, now));
        anim.emitted = lerp(anim.from, anim.to, t);
        Some(anim.emitted)
    }

    /// Report a scroll position seen by the host
    ///
    /// Returns `true` when the position reveals a user-initiated scroll, in
    /// which case the seek is abandoned.
    pub fn observe(&mut self, position: f64) -> bool {
        let Some(anim) = self.animation.as_ref() else {
            return false;
        };
        if (position - anim.emitted).abs() <= self.config.interrupt_tolerance_px {
            return false;
        }
        debug!(
            position,
            expected = anim.emitted,
            "Seek interrupted by user scroll"
        );
        self.animation = None;
        true
    }

    /// Cancel any active seek and stop where the page is
    pub fn cancel(&mut self) {
        self.animation = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StackConfig;
    use crate::geometry::Geometry;
    use crate::timeline::{Choreographer, StackChoreographer};

    fn fixture(n: usize) -> (Range, Timeline) {
        let range = Range {
            start: 960.0,
            distance: 2080.0,
        };
        let timeline = StackChoreographer::new(StackConfig::default())
            .build(n, &Geometry::new(1280.0, 800.0))
            .unwrap();
        (range, timeline)
    }

    #[test]
    fn test_resolve_formula() {
        let (range, timeline) = fixture(5);
        let target = resolve(&range, &timeline, 1).unwrap();
        assert!((target.unit_time - 0.999).abs() < 1e-12);
        let expected = 960.0 + (0.999 / 3.0) * 2080.0;
        assert!((target.scroll - expected).abs() < 1e-9);
    }

    #[test]
    fn test_resolve_clamps_both_ends() {
        let (range, timeline) = fixture(5);
        let low = resolve(&range, &timeline, -1).unwrap();
        let high = resolve(&range, &timeline, 5).unwrap();
        assert_eq!(low.index, 0);
        assert_eq!(low.requested, -1);
        assert_eq!(high.index, 4);
        assert_eq!(high.scroll, resolve(&range, &timeline, 4).unwrap().scroll);
    }

    #[test]
    fn test_resolve_on_empty_timeline() {
        let (range, _) = fixture(5);
        assert!(resolve(&range, &Timeline::empty(), 0).is_none());
    }

    #[test]
    fn test_instant_seek_when_disabled() {
        let config = ScrollConfig {
            smooth_enabled: false,
            ..Default::default()
        };
        let mut animator = SeekAnimator::new(config);
        assert_eq!(animator.start(0.0, 500.0, Instant::now(), 1), Some(500.0));
        assert!(!animator.is_animating());
    }

    #[test]
    fn test_animation_reaches_target() {
        let mut animator = SeekAnimator::new(ScrollConfig::default());
        let t0 = Instant::now();
        assert_eq!(animator.start(100.0, 900.0, t0, 3), None);
        assert_eq!(animator.generation(), Some(3));
        assert_eq!(animator.target(), Some(900.0));

        let mid = animator.update(t0 + Duration::from_millis(300)).unwrap();
        assert!(mid > 100.0 && mid < 900.0);

        let end = animator.update(t0 + Duration::from_millis(600)).unwrap();
        assert_eq!(end, 900.0);
        assert!(!animator.is_animating());
        assert_eq!(animator.update(t0 + Duration::from_millis(700)), None);
    }

    #[test]
    fn test_duration_is_capped() {
        let config = ScrollConfig {
            animation_duration_ms: 10_000,
            max_duration_ms: 800,
            ..Default::default()
        };
        let mut animator = SeekAnimator::new(config);
        let t0 = Instant::now();
        animator.start(0.0, 1000.0, t0, 1);
        assert_eq!(
            animator.update(t0 + Duration::from_millis(800)),
            Some(1000.0)
        );
        assert!(!animator.is_animating());
    }

    #[test]
    fn test_user_scroll_interrupts() {
        let mut animator = SeekAnimator::new(ScrollConfig::default());
        let t0 = Instant::now();
        animator.start(0.0, 1000.0, t0, 1);
        let pos = animator.update(t0 + Duration::from_millis(100)).unwrap();

        // host echoes our own position back: not an interruption
        assert!(!animator.observe(pos));
        assert!(animator.is_animating());

        // the user wheels somewhere else
        assert!(animator.observe(pos - 250.0));
        assert!(!animator.is_animating());
    }
}
