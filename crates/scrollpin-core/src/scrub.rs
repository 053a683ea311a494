//! Scrub Driver: maps a scroll position to the visual state of every participant.

use std::time::Instant;

use serde::Serialize;

use crate::range::Range;
use crate::timeline::{Timeline, VisualState};

/// One scroll reading, tagged with the binding generation it was taken under
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollSample {
    pub position: f64,
    pub at: Instant,
    pub generation: u64,
}

impl ScrollSample {
    pub fn new(position: f64, at: Instant, generation: u64) -> Self {
        Self {
            position,
            at,
            generation,
        }
    }
}

/// Everything the host needs to paint one sample
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Frame {
    pub generation: u64,
    pub scroll: f64,
    /// Progress through the pinned range, [0, 1]
    pub progress: f64,
    /// Position on the unit timeline, [0, T]
    pub unit_time: f64,
    pub states: Vec<VisualState>,
}

impl Frame {
    /// Frame showing a timeline's initial states
    pub fn initial(timeline: &Timeline, generation: u64) -> Self {
        Self {
            generation,
            scroll: 0.0,
            progress: 0.0,
            unit_time: 0.0,
            states: timeline.initial_states().to_vec(),
        }
    }

    pub fn visible_count(&self) -> usize {
        self.states.iter().filter(|s| s.is_visible()).count()
    }

    /// Participant currently frontmost, if any is stacked and visible
    pub fn front(&self) -> Option<usize> {
        self.states
            .iter()
            .position(|s| s.depth == Some(0) && s.is_visible())
    }
}

/// Progress `p = clamp((scroll - start) / distance, 0, 1)`
#[inline]
pub fn progress(range: &Range, scroll: f64) -> f64 {
    range.progress_at(scroll)
}

/// Unit time `p * T` for a scroll position
#[inline]
pub fn unit_time(range: &Range, timeline: &Timeline, scroll: f64) -> f64 {
    progress(range, scroll) * timeline.length()
}

/// Computes frames; keeps one buffer so steady scrolling does not allocate
#[derive(Debug, Default)]
pub struct ScrubDriver {
    frame: Frame,
}

impl ScrubDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate the timeline for `scroll`. Depends only on the arguments.
    pub fn sample(
        &mut self,
        range: &Range,
        timeline: &Timeline,
        scroll: f64,
        generation: u64,
    ) -> &Frame {
        let progress = progress(range, scroll);
        let unit_time = progress * timeline.length();

        self.frame.generation = generation;
        self.frame.scroll = scroll;
        self.frame.progress = progress;
        self.frame.unit_time = unit_time;
        timeline.evaluate_into(unit_time, &mut self.frame.states);
        &self.frame
    }

    /// Show the initial states without sampling
    pub fn reset(&mut self, timeline: &Timeline, generation: u64) -> &Frame {
        self.frame = Frame::initial(timeline, generation);
        &self.frame
    }

    pub fn last(&self) -> &Frame {
        &self.frame
    }
}
