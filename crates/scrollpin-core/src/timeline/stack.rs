//! Stacked-cards choreography
//!
//! Card `i` enters at `i * step`. Each arrival pushes the cards still in the
//! foreground one layer back, and once the stack holds `max_visible` cards
//! the oldest one is dropped at the very instant the newcomer is revealed.
//! The visible set is therefore a sliding window of at most `max_visible`
//! cards, ordered by recency, and the swap is never observable half-done
//! from either side of the arrival boundary.

use tracing::debug;

use crate::config::{EasingType, StackConfig};
use crate::error::BindError;
use crate::geometry::Geometry;
use crate::range::RangeBinder;

use super::{Channel, Choreographer, Role, Slot, Target, Timeline, TimelineBuilder, VisualState};

/// Pixel values derived from one geometry reading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageMetrics {
    /// Vertical gap between neighbouring depths
    pub spacing: f64,
    /// Offset a card enters from
    pub entry_offset: f64,
    /// Tilt before entrance, degrees
    pub tilt: f64,
}

#[derive(Debug, Clone)]
pub struct StackChoreographer {
    config: StackConfig,
}

impl StackChoreographer {
    pub fn new(config: StackConfig) -> Self {
        Self { config }
    }

    pub fn metrics(&self, geometry: &Geometry) -> StageMetrics {
        let height = geometry.effective_height();
        let bias = if geometry.narrow {
            self.config.entry_bias_narrow
        } else {
            self.config.entry_bias_wide
        };
        StageMetrics {
            spacing: height * self.config.spacing_ratio,
            entry_offset: height * (1.0 - bias),
            tilt: self.config.tilt_degrees,
        }
    }

    /// Entrance offset of card `index`
    #[inline]
    pub fn offset(&self, index: usize) -> f64 {
        index as f64 * self.config.step
    }

    /// Timeline length for `participants` cards: `(N - 1) * step + settle_span`
    pub fn length(&self, participants: usize) -> f64 {
        match participants {
            0 => 0.0,
            n => self.offset(n - 1) + self.config.settle_span,
        }
    }

    /// Unit time at which card `index` is frontmost with the stack settled
    pub fn seek_time(&self, index: usize) -> f64 {
        self.offset(index + 1) - self.config.seek_epsilon
    }

    /// Resting vertical offset for a depth; deeper cards sit higher
    fn rest_offset(&self, depth: usize, metrics: &StageMetrics) -> f64 {
        let back = self.config.max_visible.saturating_sub(1 + depth);
        back as f64 * metrics.spacing
    }

    fn depth_scale(&self, depth: usize) -> f64 {
        self.config
            .depth_scales
            .get(depth)
            .or_else(|| self.config.depth_scales.last())
            .copied()
            .unwrap_or(1.0)
    }

    pub fn build_with(&self, participants: usize, metrics: &StageMetrics) -> Timeline {
        if participants == 0 {
            return Timeline::empty();
        }

        let cfg = &self.config;
        let depth_limit = cfg.max_visible;

        let initial = (0..participants)
            .map(|_| VisualState {
                translate_y: metrics.entry_offset,
                rotation: metrics.tilt,
                opacity: 0.0,
                ..VisualState::default()
            })
            .collect();
        let mut builder = TimelineBuilder::new(initial);

        for i in 0..participants {
            let offset = self.offset(i);

            builder
                .schedule(
                    i,
                    Role::Reveal,
                    offset,
                    offset,
                    EasingType::None,
                    &[(Channel::Opacity, Target::To(1.0))],
                    Some(Slot::Depth(0)),
                )
                .schedule(
                    i,
                    Role::Entrance,
                    offset,
                    offset + cfg.entrance_duration,
                    cfg.entrance_easing,
                    &[
                        (Channel::TranslateY, Target::To(self.rest_offset(0, metrics))),
                        (Channel::Scale, Target::To(self.depth_scale(0))),
                        (Channel::Rotation, Target::To(0.0)),
                    ],
                    None,
                );

            let window_start = (i + 1).saturating_sub(depth_limit);
            for j in window_start..i {
                let depth = i - j;
                builder.schedule(
                    j,
                    Role::Recede,
                    offset,
                    offset + cfg.recede_duration,
                    cfg.recede_easing,
                    &[
                        (Channel::TranslateY, Target::To(self.rest_offset(depth, metrics))),
                        (Channel::Scale, Target::To(self.depth_scale(depth))),
                    ],
                    Some(Slot::Depth(depth)),
                );
            }

            if i >= depth_limit {
                builder.schedule(
                    i - depth_limit,
                    Role::FadeOut,
                    offset,
                    offset,
                    EasingType::None,
                    &[(Channel::Opacity, Target::To(0.0))],
                    Some(Slot::Retired),
                );
            }
        }

        let length = self.length(participants);
        let marks = (0..participants)
            .map(|i| self.seek_time(i).min(length))
            .collect();
        let timeline = builder.finish(length, marks);

        debug!(
            participants,
            length,
            animations = timeline.animations().len(),
            "Built stack timeline"
        );
        timeline
    }
}

impl Choreographer for StackChoreographer {
    fn name(&self) -> &'static str {
        "stack"
    }

    fn range_binder(&self) -> RangeBinder {
        RangeBinder::new(self.config.distance_factor, self.config.pin_offset)
    }

    fn build(&self, participants: usize, geometry: &Geometry) -> Result<Timeline, BindError> {
        Ok(self.build_with(participants, &self.metrics(geometry)))
    }
}
