//! Timeline Builder output and its pure evaluator
//!
//! A [`Timeline`] is a static table of sub-animations over a unit axis
//! `[0, length]`. Evaluating it at a unit time is a pure function of that
//! time and the table: no state carries over between evaluations, so
//! scrubbing backwards restores exactly what was shown before.
//!
//! Choreographies:
//! - `stack` - sliding window of stacked cards, newest in front
//! - `spotlight` - five-card grid rising around a centred card

mod spotlight;
mod stack;

pub use spotlight::{SpotlightChoreographer, SPOTLIGHT_CARDS, SPOTLIGHT_CONTAINER};
pub use stack::{StackChoreographer, StageMetrics};

use serde::Serialize;

use crate::config::EasingType;
use crate::error::BindError;
use crate::geometry::Geometry;
use crate::motion::{lerp, window_fraction};
use crate::range::RangeBinder;

/// Animatable property of a participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    TranslateX,
    TranslateY,
    Scale,
    Rotation,
    Opacity,
}

/// Rendered state of one participant
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VisualState {
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale: f64,
    /// Tilt in degrees
    pub rotation: f64,
    pub opacity: f64,
    /// Rank in the foreground stack, 0 = frontmost; `None` when not stacked
    pub depth: Option<usize>,
}

impl Default for VisualState {
    fn default() -> Self {
        Self {
            translate_x: 0.0,
            translate_y: 0.0,
            scale: 1.0,
            rotation: 0.0,
            opacity: 1.0,
            depth: None,
        }
    }
}

impl VisualState {
    pub fn get(&self, channel: Channel) -> f64 {
        match channel {
            Channel::TranslateX => self.translate_x,
            Channel::TranslateY => self.translate_y,
            Channel::Scale => self.scale,
            Channel::Rotation => self.rotation,
            Channel::Opacity => self.opacity,
        }
    }

    pub fn set(&mut self, channel: Channel, value: f64) {
        match channel {
            Channel::TranslateX => self.translate_x = value,
            Channel::TranslateY => self.translate_y = value,
            Channel::Scale => self.scale = value,
            Channel::Rotation => self.rotation = value,
            Channel::Opacity => self.opacity = value,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.opacity > 0.0
    }
}

/// What a sub-animation does, for tracing and inspection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Participant becomes visible
    Reveal,
    /// Participant travels from its entry pose to the front
    Entrance,
    /// Participant is pushed one layer back by a newer arrival
    Recede,
    /// Participant leaves the visible stack
    FadeOut,
    /// Participant moves into its resting layout
    Settle,
}

/// Stack position assigned when a sub-animation is reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Depth(usize),
    Retired,
}

/// One channel's interpolation inside a sub-animation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Tween {
    pub channel: Channel,
    pub from: f64,
    pub to: f64,
}

/// Target for a channel when scheduling a sub-animation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Target {
    To(f64),
    By(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubAnimation {
    pub participant: usize,
    pub role: Role,
    pub start: f64,
    pub end: f64,
    pub easing: EasingType,
    pub tweens: Vec<Tween>,
    pub slot: Option<Slot>,
}

impl SubAnimation {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Eased fraction of this window covered at `t`, `None` before it opens
    #[inline]
    fn eased_fraction(&self, t: f64) -> Option<f64> {
        if t >= self.end {
            return Some(1.0);
        }
        window_fraction(self.start, self.duration(), t).map(|f| self.easing.apply(f))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Timeline {
    length: f64,
    initial: Vec<VisualState>,
    /// Sorted by start; ties keep scheduling order
    animations: Vec<SubAnimation>,
    /// Unit times a seek index maps to
    marks: Vec<f64>,
}

impl Timeline {
    pub fn empty() -> Self {
        Self {
            length: 0.0,
            initial: Vec::new(),
            animations: Vec::new(),
            marks: Vec::new(),
        }
    }

    /// Total length `T` in timeline units
    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn participants(&self) -> usize {
        self.initial.len()
    }

    pub fn animations(&self) -> &[SubAnimation] {
        &self.animations
    }

    pub fn marks(&self) -> &[f64] {
        &self.marks
    }

    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }

    /// State every participant is reset to before the first sample
    pub fn initial_states(&self) -> &[VisualState] {
        &self.initial
    }

    /// Evaluate every participant at `unit_time`
    pub fn evaluate(&self, unit_time: f64) -> Vec<VisualState> {
        let mut states = self.initial.clone();
        self.apply(unit_time, &mut states);
        states
    }

    /// Write the state at `unit_time` into `states`, which is first reset to
    /// the initial states. Later-starting sub-animations win on a shared
    /// channel; disjoint channels compose.
    pub fn evaluate_into(&self, unit_time: f64, states: &mut Vec<VisualState>) {
        states.clear();
        states.extend_from_slice(&self.initial);
        self.apply(unit_time, states);
    }

    fn apply(&self, unit_time: f64, states: &mut [VisualState]) {
        for anim in &self.animations {
            let Some(eased) = anim.eased_fraction(unit_time) else {
                // sorted by start, nothing later is reached either
                break;
            };
            let state = &mut states[anim.participant];
            for tween in &anim.tweens {
                state.set(tween.channel, lerp(tween.from, tween.to, eased));
            }
            if let Some(slot) = anim.slot {
                state.depth = match slot {
                    Slot::Depth(depth) => Some(depth),
                    Slot::Retired => None,
                };
            }
        }
    }

    /// Unit time for seek index `index`, clamped into the mark list
    pub fn mark(&self, index: i64) -> Option<f64> {
        let last = self.marks.len().checked_sub(1)?;
        let index = index.clamp(0, last as i64) as usize;
        self.marks.get(index).copied()
    }
}

/// Accumulates sub-animations, resolving each tween's start value from
/// what is already scheduled so the finished table needs no runtime state.
#[derive(Debug)]
pub struct TimelineBuilder {
    initial: Vec<VisualState>,
    animations: Vec<SubAnimation>,
}

impl TimelineBuilder {
    pub fn new(initial: Vec<VisualState>) -> Self {
        Self {
            initial,
            animations: Vec::new(),
        }
    }

    /// Value of one channel at `t` given everything scheduled so far
    fn value_at(&self, participant: usize, channel: Channel, t: f64) -> f64 {
        let mut value = self.initial[participant].get(channel);
        for anim in self
            .animations
            .iter()
            .filter(|a| a.participant == participant && a.start <= t)
        {
            let Some(eased) = anim.eased_fraction(t) else {
                continue;
            };
            if let Some(tween) = anim.tweens.iter().find(|tw| tw.channel == channel) {
                value = lerp(tween.from, tween.to, eased);
            }
        }
        value
    }

    #[allow(clippy::too_many_arguments)]
    pub fn schedule(
        &mut self,
        participant: usize,
        role: Role,
        start: f64,
        end: f64,
        easing: EasingType,
        targets: &[(Channel, Target)],
        slot: Option<Slot>,
    ) -> &mut Self {
        debug_assert!(participant < self.initial.len());
        debug_assert!(end >= start);

        let tweens = targets
            .iter()
            .map(|&(channel, target)| {
                let from = self.value_at(participant, channel, start);
                let to = match target {
                    Target::To(value) => value,
                    Target::By(delta) => from + delta,
                };
                Tween { channel, from, to }
            })
            .collect();

        let position = self.animations.partition_point(|a| a.start <= start);
        self.animations.insert(
            position,
            SubAnimation {
                participant,
                role,
                start,
                end,
                easing,
                tweens,
                slot,
            },
        );
        self
    }

    pub fn finish(self, length: f64, marks: Vec<f64>) -> Timeline {
        debug_assert!(self.animations.iter().all(|a| a.end <= length + 1e-9));
        Timeline {
            length,
            initial: self.initial,
            animations: self.animations,
            marks,
        }
    }
}

/// A choreography the engine can bind to a section
///
/// Implementations pair a pin policy with a Timeline Builder.
pub trait Choreographer: std::fmt::Debug {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Pin policy for this choreography
    fn range_binder(&self) -> RangeBinder;

    /// Build the timeline for `participants` animated units at `geometry`
    fn build(&self, participants: usize, geometry: &Geometry) -> Result<Timeline, BindError>;
}
