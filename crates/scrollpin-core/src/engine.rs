//! One engine instance per pinned section.
//!
//! The engine owns the Binding (range, timeline, generation) and wires the
//! Range Binder, Timeline Builder, Scrub Driver, Seek Navigator and
//! Re-binder together. The host drives it with scroll samples, environment
//! events and a periodic [`Engine::tick`]; the engine never polls.

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::{AppConfig, Choreography, RebindConfig, ResizePolicy, ScrollConfig};
use crate::error::BindError;
use crate::geometry::{GeometrySampler, SectionMetrics};
use crate::range::{PinState, Range};
use crate::rebind::{EnvironmentEvent, RebindCause, Rebinder};
use crate::scrub::{Frame, ScrollSample, ScrubDriver};
use crate::seek::{self, SeekAnimator, SeekTarget};
use crate::timeline::{Choreographer, SpotlightChoreographer, StackChoreographer, Timeline};

/// Host surface the engine reads from and writes to
pub trait Stage: GeometrySampler {
    /// Section layout, `None` when the section is not in the document
    fn section(&self) -> Option<SectionMetrics>;

    /// Current scroll offset in pixels
    fn scroll_position(&self) -> f64;

    /// Establish, update (`Some`) or release (`None`) the pin
    fn set_pin(&mut self, pin: Option<PinState>);

    /// Paint one frame of participant states
    fn render(&mut self, frame: &Frame);

    /// Move the page; used by seeks and by progress-preserving rebinds
    fn scroll_to(&mut self, position: f64);
}

/// Build the choreographer selected in the config
pub fn choreographer_for(config: &AppConfig) -> Box<dyn Choreographer> {
    match config.ui.choreography {
        Choreography::Stack => Box::new(StackChoreographer::new(config.stack.clone())),
        Choreography::Spotlight => Box::new(SpotlightChoreographer::new(
            config.spotlight.clone(),
            config.stack.seek_epsilon,
        )),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Lifecycle {
    /// Created, not yet mounted
    Idle,
    Active,
    /// Binding failed; the page scrolls normally
    Inert(BindError),
    /// Unbound; every call is a no-op
    Released,
}

/// Range, timeline and pin of one successful bind
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub generation: u64,
    pub range: Range,
    pub timeline: Timeline,
    pub pin: PinState,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EngineStats {
    pub generation: u64,
    pub rebinds: u64,
    pub applied_samples: u64,
    pub dropped_samples: u64,
    pub seeks_issued: u64,
    pub seeks_interrupted: u64,
}

pub struct Engine<S: Stage> {
    id: Uuid,
    stage: S,
    choreographer: Box<dyn Choreographer>,
    rebinder: Rebinder,
    animator: SeekAnimator,
    driver: ScrubDriver,
    binding: Option<Binding>,
    lifecycle: Lifecycle,
    generation: u64,
    stats: EngineStats,
}

impl<S: Stage> Engine<S> {
    /// Create an engine with default rebind and scroll settings
    pub fn new(stage: S, choreographer: Box<dyn Choreographer>) -> Self {
        Self {
            id: Uuid::new_v4(),
            stage,
            choreographer,
            rebinder: Rebinder::new(RebindConfig::default()),
            animator: SeekAnimator::new(ScrollConfig::default()),
            driver: ScrubDriver::new(),
            binding: None,
            lifecycle: Lifecycle::Idle,
            generation: 0,
            stats: EngineStats::default(),
        }
    }

    /// Create an engine configured entirely from an [`AppConfig`]
    pub fn from_config(stage: S, config: &AppConfig) -> Self {
        Self::new(stage, choreographer_for(config))
            .with_rebind(config.rebind.clone())
            .with_scroll(config.scroll.clone())
    }

    pub fn with_rebind(mut self, config: RebindConfig) -> Self {
        self.rebinder = Rebinder::new(config);
        self
    }

    pub fn with_scroll(mut self, config: ScrollConfig) -> Self {
        self.animator = SeekAnimator::new(config);
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn stage(&self) -> &S {
        &self.stage
    }

    pub fn stage_mut(&mut self) -> &mut S {
        &mut self.stage
    }

    pub fn choreography(&self) -> &'static str {
        self.choreographer.name()
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    pub fn is_active(&self) -> bool {
        self.lifecycle == Lifecycle::Active
    }

    /// Current binding generation
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn binding(&self) -> Option<&Binding> {
        self.binding.as_ref()
    }

    /// Last frame handed to the stage
    pub fn frame(&self) -> &Frame {
        self.driver.last()
    }

    pub fn stats(&self) -> EngineStats {
        EngineStats {
            generation: self.generation,
            ..self.stats
        }
    }

    pub fn is_seeking(&self) -> bool {
        self.animator.is_animating()
    }

    /// Earliest instant at which [`Engine::tick`] has work to do
    pub fn next_deadline(&self) -> Option<Instant> {
        self.rebinder.next_deadline()
    }

    /// Bind for the first time and arm the confirmation pass
    pub fn mount(&mut self, now: Instant) {
        if self.lifecycle != Lifecycle::Idle {
            debug!(engine = %self.id, "Mount ignored, engine already mounted");
            return;
        }
        info!(
            engine = %self.id,
            choreography = self.choreographer.name(),
            "Mounting section"
        );
        self.rebind(RebindCause::Mount);
        self.rebinder.mount(now);
    }

    /// Tag a scroll reading with the current generation
    pub fn sample_at(&self, position: f64, at: Instant) -> ScrollSample {
        ScrollSample::new(position, at, self.generation)
    }

    /// Convenience for hosts that read and apply in one step
    pub fn on_scroll_position(&mut self, position: f64, at: Instant) {
        let sample = self.sample_at(position, at);
        self.on_scroll(sample);
    }

    /// Apply a scroll sample. Samples from an older generation are dropped.
    pub fn on_scroll(&mut self, sample: ScrollSample) {
        if self.lifecycle == Lifecycle::Released {
            return;
        }
        if sample.generation != self.generation {
            debug!(
                sample_generation = sample.generation,
                generation = self.generation,
                "Dropping stale scroll sample"
            );
            self.stats.dropped_samples += 1;
            return;
        }
        if self.animator.observe(sample.position) {
            self.stats.seeks_interrupted += 1;
        }
        self.apply(sample.position);
    }

    /// Where `seek(index)` would land under the current binding
    pub fn seek_target(&self, index: i64) -> Option<SeekTarget> {
        let binding = self.binding.as_ref()?;
        seek::resolve(&binding.range, &binding.timeline, index)
    }

    /// Scroll so that participant `index` is in front with the stack settled.
    /// Out-of-range indices clamp; without a binding this does nothing.
    pub fn seek(&mut self, index: i64, now: Instant) {
        if !self.is_active() {
            debug!(index, "Seek ignored, section not bound");
            return;
        }
        let Some(target) = self.seek_target(index) else {
            return;
        };
        self.stats.seeks_issued += 1;
        debug!(
            index = target.index,
            unit_time = target.unit_time,
            scroll = target.scroll,
            "Seeking"
        );

        let from = self.stage.scroll_position();
        if let Some(position) = self.animator.start(from, target.scroll, now, self.generation) {
            self.scroll_stage(position);
        }
    }

    /// Report an environment change; the rebuild happens on a later tick
    pub fn on_event(&mut self, event: EnvironmentEvent, now: Instant) {
        if self.lifecycle == Lifecycle::Released {
            return;
        }
        self.rebinder.observe(event, now);
    }

    /// Advance timers: due rebuilds first, then any running seek
    pub fn tick(&mut self, now: Instant) {
        if self.lifecycle == Lifecycle::Released {
            return;
        }
        if let Some(cause) = self.rebinder.poll(now) {
            self.rebind(cause);
        }

        if self.animator.generation().is_some_and(|g| g != self.generation) {
            debug!("Cancelling seek from a superseded binding");
            self.animator.cancel();
        }
        if let Some(position) = self.animator.update(now) {
            self.scroll_stage(position);
        }
    }

    /// Release the pin and cancel every pending timer. Idempotent.
    pub fn unbind(&mut self) {
        if self.lifecycle == Lifecycle::Released {
            return;
        }
        if self.binding.take().is_some() {
            self.stage.set_pin(None);
        }
        self.rebinder.cancel_all();
        self.animator.cancel();
        self.lifecycle = Lifecycle::Released;
        info!(engine = %self.id, generation = self.generation, "Section unbound");
    }

    /// Move the page and scrub at wherever the host actually landed
    fn scroll_stage(&mut self, position: f64) {
        self.stage.scroll_to(position);
        let landed = self.stage.scroll_position();
        self.apply(landed);
    }

    fn apply(&mut self, position: f64) {
        let Some(binding) = self.binding.as_ref() else {
            return;
        };
        let frame = self.driver.sample(
            &binding.range,
            &binding.timeline,
            position,
            binding.generation,
        );
        self.stage.render(frame);
        self.stats.applied_samples += 1;
    }

    /// Measure, build and bind; on failure degrade to normal flow
    fn try_bind(&self) -> Result<(Range, Timeline, PinState), BindError> {
        let geometry = self.stage.sample();
        let section = self.stage.section();
        let binder = self.choreographer.range_binder();

        let range = binder.bind(section.as_ref(), &geometry)?;
        let participants = section.map(|s| s.participants).unwrap_or(0);
        if participants == 0 {
            return Err(BindError::MissingElement("participants"));
        }
        let timeline = self.choreographer.build(participants, &geometry)?;
        if timeline.is_empty() {
            return Err(BindError::EmptyTimeline);
        }
        Ok((range, timeline, binder.pin_for(&range)))
    }

    fn rebind(&mut self, cause: RebindCause) {
        let geometry = self.stage.sample();
        let scroll = self.stage.scroll_position();
        // progress is only worth restoring from inside the pinned range
        let previous_progress = self
            .binding
            .as_ref()
            .filter(|b| b.range.contains(scroll))
            .map(|b| b.range.progress_at(scroll));

        let (range, timeline, pin) = match self.try_bind() {
            Ok(parts) => parts,
            Err(e) => {
                self.generation += 1;
                self.stats.rebinds += 1;
                if self.binding.take().is_some() {
                    self.stage.set_pin(None);
                }
                self.animator.cancel();
                warn!(engine = %self.id, %cause, "Section left unanimated: {}", e);
                self.lifecycle = Lifecycle::Inert(e);
                return;
            }
        };

        if let Some(current) = &self.binding {
            if cause != RebindCause::Mount
                && current.range == range
                && current.timeline == timeline
            {
                debug!(%cause, generation = self.generation, "Binding unchanged");
                self.rebinder
                    .record_size(geometry.viewport_width, geometry.viewport_height);
                return;
            }
        }

        self.generation += 1;
        self.stats.rebinds += 1;
        self.rebinder
            .record_size(geometry.viewport_width, geometry.viewport_height);
        self.stage.set_pin(Some(pin));
        self.binding = Some(Binding {
            generation: self.generation,
            range,
            timeline,
            pin,
        });
        self.lifecycle = Lifecycle::Active;

        info!(
            engine = %self.id,
            %cause,
            generation = self.generation,
            start = range.start,
            distance = range.distance,
            "Section bound"
        );

        if let Some(binding) = &self.binding {
            let frame = self.driver.reset(&binding.timeline, self.generation);
            self.stage.render(frame);
        }

        match (self.rebinder.config().resize_policy, previous_progress) {
            (ResizePolicy::PreserveProgress, Some(progress)) => {
                let target = range.scroll_at(progress);
                debug!(progress, target, "Restoring progress after rebind");
                self.scroll_stage(target);
            }
            _ => {
                // the host may have clamped the page when the spacer changed
                let landed = self.stage.scroll_position();
                self.apply(landed);
            }
        }
    }
}

impl<S: Stage> Drop for Engine<S> {
    fn drop(&mut self) {
        self.unbind();
    }
}

impl<S: Stage> std::fmt::Debug for Engine<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("id", &self.id)
            .field("choreography", &self.choreographer.name())
            .field("lifecycle", &self.lifecycle)
            .field("generation", &self.generation)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;
    use std::time::Duration;

    use super::*;
    use crate::config::{SpotlightConfig, StackConfig};
    use crate::geometry::Geometry;

    #[derive(Debug)]
    struct MockStage {
        geometry: Geometry,
        section: Option<SectionMetrics>,
        scroll: f64,
        pin: Option<PinState>,
        releases: Rc<Cell<usize>>,
        frames: Vec<Frame>,
        scroll_requests: Vec<f64>,
        /// Page ends where the pin releases, like a document with no footer
        clamp_to_pin_end: bool,
    }

    impl MockStage {
        fn new(participants: usize) -> Self {
            Self {
                geometry: Geometry::new(1280.0, 800.0),
                section: Some(SectionMetrics {
                    top: 1000.0,
                    participants,
                }),
                scroll: 0.0,
                pin: None,
                releases: Rc::new(Cell::new(0)),
                frames: Vec::new(),
                scroll_requests: Vec::new(),
                clamp_to_pin_end: false,
            }
        }
    }

    impl GeometrySampler for MockStage {
        fn sample(&self) -> Geometry {
            self.geometry
        }
    }

    impl Stage for MockStage {
        fn section(&self) -> Option<SectionMetrics> {
            self.section
        }

        fn scroll_position(&self) -> f64 {
            self.scroll
        }

        fn set_pin(&mut self, pin: Option<PinState>) {
            if pin.is_none() {
                self.releases.set(self.releases.get() + 1);
            }
            self.pin = pin;
            if let (true, Some(pin)) = (self.clamp_to_pin_end, pin) {
                self.scroll = self.scroll.min(pin.end);
            }
        }

        fn render(&mut self, frame: &Frame) {
            self.frames.push(frame.clone());
        }

        fn scroll_to(&mut self, position: f64) {
            self.scroll = position;
            self.scroll_requests.push(position);
        }
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn instant_scroll() -> ScrollConfig {
        ScrollConfig {
            smooth_enabled: false,
            ..Default::default()
        }
    }

    fn stack_engine(stage: MockStage) -> Engine<MockStage> {
        Engine::new(stage, Box::new(StackChoreographer::new(StackConfig::default())))
    }

    fn mounted(participants: usize, t0: Instant) -> Engine<MockStage> {
        let mut engine = stack_engine(MockStage::new(participants)).with_scroll(instant_scroll());
        engine.mount(t0);
        engine
    }

    #[test]
    fn test_mount_pins_and_renders_initial_state() {
        let t0 = Instant::now();
        let engine = mounted(5, t0);

        assert!(engine.is_active());
        assert_eq!(engine.generation(), 1);
        let pin = engine.stage().pin.unwrap();
        assert_eq!(pin.start, 960.0);
        assert!((pin.end - 3040.0).abs() < 1e-9);
        assert_eq!(pin.top_offset, 40.0);

        // initial frame, then one scrub at the current scroll
        assert_eq!(engine.stage().frames.len(), 2);
        assert_eq!(engine.frame().unit_time, 0.0);
        assert_eq!(engine.frame().visible_count(), 1);
    }

    #[test]
    fn test_missing_section_stays_inert() {
        let t0 = Instant::now();
        let mut stage = MockStage::new(5);
        stage.section = None;
        let mut engine = stack_engine(stage);
        engine.mount(t0);

        assert_eq!(
            engine.lifecycle(),
            &Lifecycle::Inert(BindError::MissingElement("section"))
        );
        assert!(engine.stage().pin.is_none());

        engine.on_scroll_position(2000.0, t0);
        engine.seek(2, t0);
        assert!(engine.stage().frames.is_empty());
        assert!(engine.stage().scroll_requests.is_empty());
    }

    #[test]
    fn test_zero_participants_stays_inert() {
        let engine = mounted(0, Instant::now());
        assert_eq!(
            engine.lifecycle(),
            &Lifecycle::Inert(BindError::MissingElement("participants"))
        );
        assert!(engine.binding().is_none());
    }

    #[test]
    fn test_settle_pass_recovers_late_section() {
        let t0 = Instant::now();
        let mut stage = MockStage::new(5);
        stage.section = None;
        let mut engine = stack_engine(stage);
        engine.mount(t0);
        assert!(!engine.is_active());

        engine.stage_mut().section = Some(SectionMetrics {
            top: 1000.0,
            participants: 5,
        });
        engine.tick(t0 + ms(80));
        assert!(engine.is_active());
        assert_eq!(engine.generation(), 2);
    }

    #[test]
    fn test_settle_pass_keeps_unchanged_binding() {
        let t0 = Instant::now();
        let mut engine = mounted(5, t0);
        engine.tick(t0 + ms(80));
        assert_eq!(engine.generation(), 1);
        assert_eq!(engine.next_deadline(), None);
    }

    #[test]
    fn test_scroll_scrubs_the_stack() {
        let t0 = Instant::now();
        let mut engine = mounted(5, t0);
        // p = 2/3 of the range: unit time 2.0
        let position = 960.0 + 2080.0 * 2.0 / 3.0;
        engine.on_scroll_position(position, t0);

        let frame = engine.frame();
        assert!((frame.unit_time - 2.0).abs() < 1e-9);
        assert_eq!(frame.front(), Some(4));
        assert_eq!(frame.visible_count(), 3);
        assert_eq!(engine.stats().applied_samples, 2);
    }

    #[test]
    fn test_seek_agrees_with_scrub() {
        let t0 = Instant::now();
        let mut engine = mounted(5, t0);

        for index in 0..5 {
            engine.seek(index, t0);
            let frame = engine.frame().clone();
            assert_eq!(frame.front(), Some(index as usize), "seek {}", index);
            for depth in 1..3 {
                if index as usize >= depth {
                    assert_eq!(frame.states[index as usize - depth].depth, Some(depth));
                }
            }
            if index >= 3 {
                assert_eq!(frame.states[index as usize - 3].opacity, 0.0);
            }

            // continuous scrub at the same position agrees
            let position = engine.stage().scroll;
            engine.on_scroll_position(position, t0);
            assert_eq!(engine.frame().states, frame.states);
        }
        assert_eq!(engine.stats().seeks_issued, 5);
    }

    #[test]
    fn test_seek_clamps_out_of_range() {
        let t0 = Instant::now();
        let mut engine = mounted(5, t0);

        engine.seek(-1, t0);
        assert_eq!(engine.frame().front(), Some(0));
        let first = engine.stage().scroll;

        engine.seek(5, t0);
        assert_eq!(engine.frame().front(), Some(4));
        let last = engine.seek_target(4).map(|t| SeekTarget { requested: 5, ..t });
        assert_eq!(engine.seek_target(5), last);
        assert!(engine.stage().scroll > first);
    }

    #[test]
    fn test_smooth_seek_runs_on_ticks() {
        let t0 = Instant::now();
        let mut engine = stack_engine(MockStage::new(5));
        engine.mount(t0);

        engine.seek(3, t0);
        assert!(engine.is_seeking());
        assert!(engine.stage().scroll_requests.is_empty());

        engine.tick(t0 + ms(300));
        let midway = engine.stage().scroll;
        let target = engine.seek_target(3).unwrap().scroll;
        assert!(midway > 0.0 && midway < target);

        engine.tick(t0 + ms(600));
        assert_eq!(engine.stage().scroll, target);
        assert!(!engine.is_seeking());
        assert_eq!(engine.frame().front(), Some(3));
    }

    #[test]
    fn test_user_scroll_interrupts_seek() {
        let t0 = Instant::now();
        let mut engine = stack_engine(MockStage::new(5));
        engine.mount(t0);

        engine.seek(4, t0);
        engine.tick(t0 + ms(100));
        let position = engine.stage().scroll;
        engine.on_scroll_position(position + 400.0, t0 + ms(110));

        assert!(!engine.is_seeking());
        assert_eq!(engine.stats().seeks_interrupted, 1);
        engine.tick(t0 + ms(700));
        assert_eq!(engine.stage().scroll, position);
    }

    #[test]
    fn test_stale_sample_is_dropped() {
        let t0 = Instant::now();
        let mut engine = mounted(5, t0);
        let stale = engine.sample_at(1500.0, t0);

        engine.stage_mut().geometry = Geometry::new(1280.0, 1000.0);
        engine.on_event(
            EnvironmentEvent::Resize {
                width: 1280.0,
                height: 1000.0,
            },
            t0,
        );
        engine.tick(t0 + ms(150));
        assert_eq!(engine.generation(), 2);

        let before = engine.frame().clone();
        engine.on_scroll(stale);
        assert_eq!(engine.frame(), &before);
        assert_eq!(engine.stats().dropped_samples, 1);
    }

    #[test]
    fn test_resize_preserves_offset_by_default() {
        let t0 = Instant::now();
        let mut engine = mounted(5, t0);
        let position = 960.0 + 0.4 * 2080.0;
        engine.stage_mut().scroll = position;
        engine.on_scroll_position(position, t0);
        assert!((engine.frame().progress - 0.4).abs() < 1e-12);

        engine.stage_mut().geometry = Geometry::new(1280.0, 1000.0);
        engine.on_event(
            EnvironmentEvent::Resize {
                width: 1280.0,
                height: 1000.0,
            },
            t0 + ms(1000),
        );
        engine.tick(t0 + ms(1150));

        let binding = engine.binding().unwrap();
        assert!((binding.range.distance - 2600.0).abs() < 1e-9);
        assert_eq!(engine.stage().scroll, position);
        assert!((engine.frame().progress - 832.0 / 2600.0).abs() < 1e-12);
        assert!(engine.stage().scroll_requests.is_empty());
    }

    #[test]
    fn test_resize_can_preserve_progress() {
        let t0 = Instant::now();
        let rebind = RebindConfig {
            resize_policy: ResizePolicy::PreserveProgress,
            ..Default::default()
        };
        let mut engine = stack_engine(MockStage::new(5))
            .with_scroll(instant_scroll())
            .with_rebind(rebind);
        engine.mount(t0);
        let position = 960.0 + 0.4 * 2080.0;
        engine.stage_mut().scroll = position;
        engine.on_scroll_position(position, t0);

        engine.stage_mut().geometry = Geometry::new(1280.0, 1000.0);
        engine.on_event(
            EnvironmentEvent::Resize {
                width: 1280.0,
                height: 1000.0,
            },
            t0 + ms(1000),
        );
        engine.tick(t0 + ms(1150));

        assert!((engine.stage().scroll - (960.0 + 0.4 * 2600.0)).abs() < 1e-9);
        assert!((engine.frame().progress - 0.4).abs() < 1e-12);
    }

    fn resize_to(engine: &mut Engine<MockStage>, height: f64, now: Instant) {
        engine.stage_mut().geometry = Geometry::new(1280.0, height);
        engine.on_event(
            EnvironmentEvent::Resize {
                width: 1280.0,
                height,
            },
            now,
        );
    }

    fn progress_preserving(t0: Instant) -> Engine<MockStage> {
        let rebind = RebindConfig {
            resize_policy: ResizePolicy::PreserveProgress,
            ..Default::default()
        };
        let mut engine = stack_engine(MockStage::new(5))
            .with_scroll(instant_scroll())
            .with_rebind(rebind);
        engine.mount(t0);
        engine
    }

    #[test]
    fn test_preserve_progress_leaves_reader_above_section() {
        let t0 = Instant::now();
        let mut engine = progress_preserving(t0);

        resize_to(&mut engine, 1000.0, t0 + ms(1000));
        engine.tick(t0 + ms(1150));

        assert_eq!(engine.generation(), 2);
        assert_eq!(engine.stage().scroll, 0.0);
        assert!(engine.stage().scroll_requests.is_empty());
        assert_eq!(engine.frame().progress, 0.0);
    }

    #[test]
    fn test_preserve_progress_leaves_reader_below_section() {
        let t0 = Instant::now();
        let mut engine = progress_preserving(t0);
        engine.stage_mut().scroll = 5000.0;
        engine.on_scroll_position(5000.0, t0);

        resize_to(&mut engine, 1000.0, t0 + ms(1000));
        engine.tick(t0 + ms(1150));

        assert_eq!(engine.generation(), 2);
        assert_eq!(engine.stage().scroll, 5000.0);
        assert!(engine.stage().scroll_requests.is_empty());
        assert_eq!(engine.frame().progress, 1.0);
    }

    #[test]
    fn test_rebind_scrubs_where_host_clamped_the_page() {
        let t0 = Instant::now();
        let mut engine = mounted(5, t0);
        engine.stage_mut().clamp_to_pin_end = true;
        engine.stage_mut().scroll = 3000.0;
        engine.on_scroll_position(3000.0, t0);

        // shorter viewport: the range now ends at 960 + 1560 = 2520
        resize_to(&mut engine, 600.0, t0 + ms(1000));
        engine.tick(t0 + ms(1150));

        assert_eq!(engine.stage().scroll, 2520.0);
        assert_eq!(engine.frame().scroll, 2520.0);
        assert_eq!(engine.frame().progress, 1.0);
    }

    #[test]
    fn test_seek_from_superseded_binding_is_cancelled() {
        let t0 = Instant::now();
        let mut engine = stack_engine(MockStage::new(5));
        engine.mount(t0);
        engine.tick(t0 + ms(80));

        engine.seek(4, t0 + ms(100));
        engine.tick(t0 + ms(200));
        assert!(engine.is_seeking());
        let requests = engine.stage().scroll_requests.len();
        assert_eq!(requests, 1);

        resize_to(&mut engine, 1000.0, t0 + ms(200));
        engine.tick(t0 + ms(350));
        assert_eq!(engine.generation(), 2);
        assert!(!engine.is_seeking());

        engine.tick(t0 + ms(1000));
        assert_eq!(engine.stage().scroll_requests.len(), requests);
    }

    #[test]
    fn test_rebind_resets_before_scrubbing() {
        let t0 = Instant::now();
        let mut engine = mounted(5, t0);
        engine.stage_mut().scroll = 2500.0;
        engine.on_scroll_position(2500.0, t0);

        engine.stage_mut().geometry = Geometry::new(1280.0, 900.0);
        engine.on_event(EnvironmentEvent::OrientationChange, t0);
        engine.tick(t0 + ms(200));

        let frames = &engine.stage().frames;
        let reset = &frames[frames.len() - 2];
        let scrubbed = &frames[frames.len() - 1];
        assert_eq!(reset.generation, 2);
        assert_eq!(reset.unit_time, 0.0);
        assert_eq!(scrubbed.generation, 2);
        assert_eq!(scrubbed.scroll, 2500.0);
    }

    #[test]
    fn test_resize_burst_rebinds_once() {
        let t0 = Instant::now();
        let mut engine = mounted(5, t0);
        engine.tick(t0 + ms(80));

        for (k, height) in [820.0, 860.0, 900.0].into_iter().enumerate() {
            engine.stage_mut().geometry = Geometry::new(1280.0, height);
            engine.on_event(
                EnvironmentEvent::Resize {
                    width: 1280.0,
                    height,
                },
                t0 + ms(1000 + 100 * k as u64),
            );
        }
        engine.tick(t0 + ms(1300));
        assert_eq!(engine.generation(), 1);
        engine.tick(t0 + ms(1350));
        assert_eq!(engine.generation(), 2);
        assert_eq!(engine.stats().rebinds, 2);
    }

    #[test]
    fn test_unbind_releases_and_ignores_later_calls() {
        let t0 = Instant::now();
        let mut engine = mounted(5, t0);
        engine.on_event(EnvironmentEvent::OrientationChange, t0);
        engine.unbind();

        assert!(engine.stage().pin.is_none());
        assert_eq!(engine.lifecycle(), &Lifecycle::Released);
        assert_eq!(engine.next_deadline(), None);

        let frames = engine.stage().frames.len();
        engine.on_scroll_position(2000.0, t0);
        engine.seek(3, t0);
        engine.tick(t0 + ms(500));
        engine.unbind();
        assert_eq!(engine.stage().frames.len(), frames);
        assert!(engine.stage().scroll_requests.is_empty());
        assert_eq!(engine.stage().releases.get(), 1);
    }

    #[test]
    fn test_drop_releases_pin() {
        let stage = MockStage::new(5);
        let releases = Rc::clone(&stage.releases);
        {
            let mut engine = stack_engine(stage);
            engine.mount(Instant::now());
        }
        assert_eq!(releases.get(), 1);
    }

    #[test]
    fn test_spotlight_requires_desktop() {
        let t0 = Instant::now();
        let mut stage = MockStage::new(5);
        stage.geometry = Geometry::new(800.0, 900.0);
        let mut engine = Engine::new(
            stage,
            Box::new(SpotlightChoreographer::new(SpotlightConfig::default(), 0.001)),
        );
        engine.mount(t0);
        assert!(matches!(
            engine.lifecycle(),
            Lifecycle::Inert(BindError::UnsupportedLayout { .. })
        ));

        // widening the window brings it to life
        engine.stage_mut().geometry = Geometry::new(1440.0, 900.0);
        engine.on_event(
            EnvironmentEvent::Resize {
                width: 1440.0,
                height: 900.0,
            },
            t0,
        );
        engine.tick(t0 + ms(150));
        assert!(engine.is_active());
        assert_eq!(engine.choreography(), "spotlight");
    }

    #[test]
    fn test_from_config_selects_choreography() {
        let mut config = AppConfig::default();
        config.ui.choreography = Choreography::Spotlight;
        let engine = Engine::from_config(MockStage::new(5), &config);
        assert_eq!(engine.choreography(), "spotlight");
    }
}
