//! Geometry Sampler: viewport and section measurements read from the host.

use serde::{Deserialize, Serialize};

/// Fallback height when the host reports no usable viewport
pub const FALLBACK_VIEWPORT_HEIGHT: f64 = 800.0;

/// Widths at or below this count as a narrow layout
pub const NARROW_MAX_WIDTH: f64 = 768.0;

/// One reading of the viewport
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub viewport_width: f64,
    pub viewport_height: f64,
    /// Narrow (phone-like) layout; only biases the entry offset
    pub narrow: bool,
}

impl Geometry {
    /// Build a reading, classifying the layout by width
    pub fn new(viewport_width: f64, viewport_height: f64) -> Self {
        Self {
            viewport_width,
            viewport_height,
            narrow: viewport_width <= NARROW_MAX_WIDTH,
        }
    }

    /// Viewport height with the fallback applied to unusable readings
    pub fn effective_height(&self) -> f64 {
        if self.viewport_height.is_finite() && self.viewport_height > 0.0 {
            self.viewport_height
        } else {
            FALLBACK_VIEWPORT_HEIGHT
        }
    }
}

/// Layout facts about the pinned section
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectionMetrics {
    /// Document offset of the section's top edge
    pub top: f64,
    /// Number of animated participants found inside the section
    pub participants: usize,
}

/// Reads current geometry on demand. Implementations must not cache across calls.
pub trait GeometrySampler {
    fn sample(&self) -> Geometry;
}
