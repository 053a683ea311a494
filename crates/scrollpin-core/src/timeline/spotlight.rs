//! Spotlight choreography: five grid cards rise around a centred card
//!
//! Participants 0..5 are the cards, participant 5 is their container.
//! Desktop only; narrow viewports leave the section in normal flow.

use tracing::debug;

use crate::config::{EasingType, SpotlightConfig};
use crate::error::BindError;
use crate::geometry::Geometry;
use crate::range::RangeBinder;

use super::{Channel, Choreographer, Role, Slot, Target, Timeline, TimelineBuilder, VisualState};

/// Cards the choreography animates
pub const SPOTLIGHT_CARDS: usize = 5;

/// Participant index of the grid container
pub const SPOTLIGHT_CONTAINER: usize = SPOTLIGHT_CARDS;

const CENTRE: usize = 2;
const LENGTH: f64 = 1.0;

#[derive(Debug, Clone)]
pub struct SpotlightChoreographer {
    config: SpotlightConfig,
    seek_epsilon: f64,
}

impl SpotlightChoreographer {
    pub fn new(config: SpotlightConfig, seek_epsilon: f64) -> Self {
        Self {
            config,
            seek_epsilon,
        }
    }

    pub fn build_for_height(&self, viewport_height: f64) -> Timeline {
        let linear = EasingType::Linear;
        let side = self.config.side_offset;

        let mut initial = vec![VisualState::default(); SPOTLIGHT_CARDS + 1];
        for (index, state) in initial.iter_mut().enumerate().take(SPOTLIGHT_CARDS) {
            state.translate_y = viewport_height.round();
            state.depth = Some(1);
            if index == CENTRE {
                state.translate_y = 30.0;
                state.scale = 1.6;
                state.depth = Some(0);
            }
        }
        initial[SPOTLIGHT_CONTAINER].scale = 1.2;
        initial[SPOTLIGHT_CONTAINER].translate_y = 30.0;

        let mut builder = TimelineBuilder::new(initial);

        // centre card settles
        builder.schedule(
            CENTRE,
            Role::Settle,
            0.0,
            0.5,
            linear,
            &[
                (Channel::TranslateY, Target::To(0.0)),
                (Channel::Scale, Target::To(1.5)),
            ],
            None,
        );

        // inner pair rises with side offsets
        for (card, dx) in [(1, -side), (3, side)] {
            builder.schedule(
                card,
                Role::Entrance,
                0.0,
                0.4,
                linear,
                &[
                    (Channel::TranslateY, Target::To(0.0)),
                    (Channel::TranslateX, Target::To(dx)),
                    (Channel::Scale, Target::To(1.5)),
                ],
                None,
            );
        }

        // outer pair rises
        for card in [0, 4] {
            builder.schedule(
                card,
                Role::Entrance,
                0.5,
                0.9,
                linear,
                &[(Channel::TranslateY, Target::To(0.0))],
                None,
            );
        }

        builder.schedule(
            SPOTLIGHT_CONTAINER,
            Role::Settle,
            0.5,
            1.0,
            linear,
            &[
                (Channel::Scale, Target::To(1.1)),
                (Channel::TranslateY, Target::To(0.0)),
            ],
            None,
        );

        // every card normalises into the grid
        for card in 0..SPOTLIGHT_CARDS {
            builder.schedule(
                card,
                Role::Settle,
                0.5,
                1.0,
                linear,
                &[
                    (Channel::Scale, Target::To(1.1)),
                    (Channel::TranslateX, Target::To(0.0)),
                    (Channel::TranslateY, Target::To(0.0)),
                ],
                None,
            );
        }

        builder.schedule(
            CENTRE,
            Role::Settle,
            LENGTH,
            LENGTH,
            EasingType::None,
            &[],
            Some(Slot::Depth(1)),
        );

        builder.finish(LENGTH, vec![0.5, LENGTH - self.seek_epsilon])
    }
}

impl Choreographer for SpotlightChoreographer {
    fn name(&self) -> &'static str {
        "spotlight"
    }

    fn range_binder(&self) -> RangeBinder {
        RangeBinder::new(self.config.distance_factor, self.config.pin_offset)
    }

    fn build(&self, participants: usize, geometry: &Geometry) -> Result<Timeline, BindError> {
        if geometry.viewport_width < self.config.min_width {
            return Err(BindError::UnsupportedLayout {
                width: geometry.viewport_width,
                min_width: self.config.min_width,
            });
        }
        if participants < SPOTLIGHT_CARDS {
            return Err(BindError::MissingElement("spotlight cards"));
        }
        if participants > SPOTLIGHT_CARDS + 1 {
            debug!(
                participants,
                "Spotlight animates the first {} cards only", SPOTLIGHT_CARDS
            );
        }
        Ok(self.build_for_height(geometry.effective_height()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spotlight() -> SpotlightChoreographer {
        SpotlightChoreographer::new(SpotlightConfig::default(), 0.001)
    }

    #[test]
    fn test_initial_layout() {
        let timeline = spotlight().build(5, &Geometry::new(1440.0, 900.0)).unwrap();
        let states = timeline.evaluate(0.0);
        assert_eq!(states.len(), 6);
        assert_eq!(states[CENTRE].scale, 1.6);
        assert_eq!(states[CENTRE].translate_y, 30.0);
        assert_eq!(states[0].translate_y, 900.0);
        assert_eq!(states[SPOTLIGHT_CONTAINER].scale, 1.2);
    }

    #[test]
    fn test_inner_pair_spreads_then_normalises() {
        let timeline = spotlight().build(5, &Geometry::new(1440.0, 900.0)).unwrap();

        let mid = timeline.evaluate(0.45);
        assert_eq!(mid[1].translate_x, -80.0);
        assert_eq!(mid[3].translate_x, 80.0);
        assert_eq!(mid[1].translate_y, 0.0);
        // outer pair has not started rising
        assert_eq!(mid[0].translate_y, 900.0);

        let end = timeline.evaluate(1.0);
        for card in end.iter().take(SPOTLIGHT_CARDS) {
            assert_eq!(card.translate_x, 0.0);
            assert_eq!(card.translate_y, 0.0);
            assert_eq!(card.scale, 1.1);
            assert_eq!(card.depth, Some(1));
        }
        assert_eq!(end[SPOTLIGHT_CONTAINER].scale, 1.1);
    }

    #[test]
    fn test_centre_stays_in_front_until_the_end() {
        let timeline = spotlight().build(5, &Geometry::new(1440.0, 900.0)).unwrap();
        assert_eq!(timeline.evaluate(0.999)[CENTRE].depth, Some(0));
        assert_eq!(timeline.evaluate(1.0)[CENTRE].depth, Some(1));
    }

    #[test]
    fn test_narrow_viewport_is_unsupported() {
        let result = spotlight().build(5, &Geometry::new(800.0, 900.0));
        assert!(matches!(result, Err(BindError::UnsupportedLayout { .. })));
    }

    #[test]
    fn test_requires_five_cards() {
        let result = spotlight().build(4, &Geometry::new(1440.0, 900.0));
        assert_eq!(result, Err(BindError::MissingElement("spotlight cards")));
    }

    #[test]
    fn test_scrub_back_restores_state() {
        let timeline = spotlight().build(5, &Geometry::new(1440.0, 900.0)).unwrap();
        let before = timeline.evaluate(0.3);
        let _ = timeline.evaluate(0.95);
        assert_eq!(timeline.evaluate(0.3), before);
    }
}
