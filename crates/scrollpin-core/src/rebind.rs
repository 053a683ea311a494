//! Responsive Re-binder: turns bursts of environment events into single,
//! debounced rebuild requests.
//!
//! Nothing here owns a thread or a timer. Deadlines are plain [`Instant`]s and
//! the host advances them by calling [`Rebinder::poll`] from its tick.

use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::config::RebindConfig;
use crate::geometry::NARROW_MAX_WIDTH;

/// Environment change reported by the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnvironmentEvent {
    Resize { width: f64, height: f64 },
    OrientationChange,
    VisibilityHidden,
    VisibilityRestored,
}

/// Why a rebuild happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebindCause {
    Mount,
    /// Deferred confirmation after the first bind
    Settle,
    Resize,
    Orientation,
    Visibility,
}

impl RebindCause {
    pub fn as_str(&self) -> &'static str {
        match self {
            RebindCause::Mount => "mount",
            RebindCause::Settle => "settle",
            RebindCause::Resize => "resize",
            RebindCause::Orientation => "orientation",
            RebindCause::Visibility => "visibility",
        }
    }
}

impl std::fmt::Display for RebindCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cancelable single-shot deadline that restarts on every schedule
#[derive(Debug, Clone, Default)]
pub struct Debouncer {
    pending: Option<(Instant, RebindCause)>,
}

impl Debouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// (Re)start the quiet period; the most recent cause wins
    pub fn schedule(&mut self, cause: RebindCause, now: Instant, delay: Duration) {
        self.pending = Some((now + delay, cause));
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.map(|(at, _)| at)
    }

    /// Fire if the quiet period has elapsed
    pub fn poll(&mut self, now: Instant) -> Option<RebindCause> {
        match self.pending {
            Some((at, cause)) if now >= at => {
                self.pending = None;
                Some(cause)
            }
            _ => None,
        }
    }
}

/// Soft-keyboard heuristic: on a narrow layout a height-only change smaller
/// than `ratio` of the previous height is transient and not worth a rebuild.
pub fn is_transient_resize(previous: (f64, f64), next: (f64, f64), ratio: f64) -> bool {
    let (prev_w, prev_h) = previous;
    let (next_w, next_h) = next;
    if next_w > NARROW_MAX_WIDTH || prev_h <= 0.0 {
        return false;
    }
    if (next_w - prev_w).abs() >= 1.0 {
        return false;
    }
    ((next_h - prev_h).abs() / prev_h) < ratio
}

#[derive(Debug, Clone)]
pub struct Rebinder {
    config: RebindConfig,
    debouncer: Debouncer,
    /// Post-mount confirmation pass
    settle: Option<Instant>,
    /// Viewport size the current binding was computed for
    bound_size: Option<(f64, f64)>,
    hidden: bool,
}

impl Rebinder {
    pub fn new(config: RebindConfig) -> Self {
        Self {
            config,
            debouncer: Debouncer::new(),
            settle: None,
            bound_size: None,
            hidden: false,
        }
    }

    pub fn config(&self) -> &RebindConfig {
        &self.config
    }

    /// Arm the one-shot confirmation pass after the first bind
    pub fn mount(&mut self, now: Instant) {
        self.settle = Some(now + Duration::from_millis(self.config.settle_delay_ms));
    }

    /// Remember the viewport the binding was built against
    pub fn record_size(&mut self, width: f64, height: f64) {
        self.bound_size = Some((width, height));
    }

    /// Feed one event. Returns `true` when a rebuild was (re)scheduled.
    pub fn observe(&mut self, event: EnvironmentEvent, now: Instant) -> bool {
        let (cause, delay_ms) = match event {
            EnvironmentEvent::Resize { width, height } => {
                if self.config.ignore_mobile_resize {
                    if let Some(previous) = self.bound_size {
                        if is_transient_resize(
                            previous,
                            (width, height),
                            self.config.keyboard_resize_ratio,
                        ) {
                            trace!(width, height, "Ignoring transient resize");
                            return false;
                        }
                    }
                }
                (RebindCause::Resize, self.config.resize_debounce_ms)
            }
            EnvironmentEvent::OrientationChange => {
                (RebindCause::Orientation, self.config.orientation_delay_ms)
            }
            EnvironmentEvent::VisibilityRestored => {
                self.hidden = false;
                (RebindCause::Visibility, self.config.visibility_delay_ms)
            }
            EnvironmentEvent::VisibilityHidden => {
                self.hidden = true;
                return false;
            }
        };

        debug!(%cause, delay_ms, "Rebuild scheduled");
        self.debouncer
            .schedule(cause, now, Duration::from_millis(delay_ms));
        true
    }

    /// Whether the host reported the section hidden
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Collect a due rebuild, if any. A debounced rebuild also satisfies the
    /// settle pass; work is never done twice for one tick.
    pub fn poll(&mut self, now: Instant) -> Option<RebindCause> {
        // hold pending work while hidden; restoring reschedules it
        let debounced = if self.hidden {
            None
        } else {
            self.debouncer.poll(now)
        };
        let settled = match self.settle {
            Some(at) if now >= at && !self.hidden => {
                self.settle = None;
                Some(RebindCause::Settle)
            }
            _ => None,
        };
        if debounced.is_some() {
            self.settle = None;
        }
        debounced.or(settled)
    }

    /// Earliest pending deadline
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.debouncer.deadline(), self.settle) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn cancel_all(&mut self) {
        self.debouncer.cancel();
        self.settle = None;
    }
}
