//! Range Binder: the scroll interval across which the section stays pinned.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::BindError;
use crate::geometry::{Geometry, SectionMetrics};

/// Scroll-pixel interval `[start, start + distance)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub start: f64,
    pub distance: f64,
}

impl Range {
    pub fn end(&self) -> f64 {
        self.start + self.distance
    }

    /// Progress through the range at a scroll position, clamped to [0, 1]
    #[inline]
    pub fn progress_at(&self, scroll: f64) -> f64 {
        if self.distance <= 0.0 {
            return if scroll < self.start { 0.0 } else { 1.0 };
        }
        ((scroll - self.start) / self.distance).clamp(0.0, 1.0)
    }

    /// Scroll position at which the range reaches `progress`
    #[inline]
    pub fn scroll_at(&self, progress: f64) -> f64 {
        self.start + progress.clamp(0.0, 1.0) * self.distance
    }

    pub fn contains(&self, scroll: f64) -> bool {
        scroll >= self.start && scroll < self.end()
    }
}

/// Pin instruction handed to the host
///
/// While the scroll position lies in `[start, end)` the section's top stays
/// at `top_offset` from the viewport top. `spacer` is the padding the host
/// inserts after the section so following content moves down by the pinned
/// distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PinState {
    pub start: f64,
    pub end: f64,
    pub top_offset: f64,
    pub spacer: f64,
}

impl PinState {
    pub fn for_range(range: &Range, top_offset: f64) -> Self {
        Self {
            start: range.start,
            end: range.end(),
            top_offset,
            spacer: range.distance,
        }
    }

    /// Whether the section is held in place at this scroll position
    pub fn is_pinned_at(&self, scroll: f64) -> bool {
        scroll >= self.start && scroll < self.end
    }

    /// Where the section's top sits relative to the viewport top
    pub fn section_screen_top(&self, section_top: f64, scroll: f64) -> f64 {
        if scroll < self.start {
            section_top - scroll
        } else if scroll < self.end {
            self.top_offset
        } else {
            // released: the spacer has carried the section down by `spacer`
            section_top + self.spacer - scroll
        }
    }
}

/// Derives the pinned range from section and viewport geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeBinder {
    /// Pin distance as a multiple of viewport height
    pub distance_factor: f64,
    /// Viewport offset at which the section is held
    pub pin_offset: f64,
}

impl RangeBinder {
    pub fn new(distance_factor: f64, pin_offset: f64) -> Self {
        Self {
            distance_factor,
            pin_offset,
        }
    }

    /// Compute the range for a section. Pure: same geometry, same range.
    pub fn bind(
        &self,
        section: Option<&SectionMetrics>,
        geometry: &Geometry,
    ) -> Result<Range, BindError> {
        let section = section.ok_or(BindError::MissingElement("section"))?;

        let distance = geometry.effective_height() * self.distance_factor;
        if !distance.is_finite() || distance <= 0.0 {
            return Err(BindError::DegenerateGeometry { distance });
        }

        let range = Range {
            start: section.top - self.pin_offset,
            distance,
        };
        debug!(
            start = range.start,
            distance = range.distance,
            viewport_height = geometry.effective_height(),
            "Bound pin range"
        );
        Ok(range)
    }

    pub fn pin_for(&self, range: &Range) -> PinState {
        PinState::for_range(range, self.pin_offset)
    }
}
