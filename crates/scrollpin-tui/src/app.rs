use std::sync::Arc;
use std::time::Instant;

use scrollpin_core::timeline::SPOTLIGHT_CARDS;
use scrollpin_core::{AppConfig, Choreography, Engine, EnvironmentEvent, Lifecycle};

use crate::stage::{TerminalStage, COL_PX, ROW_PX};
use crate::theme::Theme;

/// Application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Normal browsing mode
    Normal,
    /// Help overlay
    Help,
}

/// How participants are laid out on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckLayout {
    /// Cards share one centred slot and overlap by depth
    Stack,
    /// Cards sit in a row inside a container participant
    Grid { columns: usize, container: usize },
}

/// Application state
pub struct App {
    /// Application configuration
    pub config: Arc<AppConfig>,
    pub theme: Theme,
    /// Engine bound to the terminal stage
    pub engine: Engine<TerminalStage>,
    pub mode: Mode,
    /// Whether the app should quit
    pub should_quit: bool,
    /// Status message
    pub status_message: Option<String>,
    /// Pending key for multi-key sequences (e.g., 'gg')
    pub pending_key: Option<char>,
}

/// Participants the stage exposes for a choreography
pub fn participants_for(config: &AppConfig) -> usize {
    match config.ui.choreography {
        Choreography::Stack => config.ui.cards,
        // five cards plus their container
        Choreography::Spotlight => SPOTLIGHT_CARDS + 1,
    }
}

impl App {
    pub fn new(config: Arc<AppConfig>, theme: Theme, cols: u16, rows: u16) -> Self {
        let stage = TerminalStage::new(cols, rows, participants_for(&config));
        let engine = Engine::from_config(stage, &config);
        Self {
            config,
            theme,
            engine,
            mode: Mode::Normal,
            should_quit: false,
            status_message: None,
            pending_key: None,
        }
    }

    pub fn mount(&mut self, now: Instant) {
        self.engine.mount(now);
        if let Lifecycle::Inert(reason) = self.engine.lifecycle() {
            self.status_message = Some(format!("Not pinned: {}", reason));
        }
    }

    pub fn stage(&self) -> &TerminalStage {
        self.engine.stage()
    }

    pub fn deck_layout(&self) -> DeckLayout {
        match self.config.ui.choreography {
            Choreography::Stack => DeckLayout::Stack,
            Choreography::Spotlight => DeckLayout::Grid {
                columns: SPOTLIGHT_CARDS,
                container: SPOTLIGHT_CARDS,
            },
        }
    }

    /// Labels for the tab bar, one per seek target
    pub fn tab_labels(&self) -> Vec<String> {
        let marks = self
            .engine
            .binding()
            .map(|b| b.timeline.marks().len())
            .unwrap_or(0);
        match self.config.ui.choreography {
            Choreography::Stack => (1..=marks).map(|i| format!("Card {}", i)).collect(),
            Choreography::Spotlight => ["Rise", "Grid"]
                .iter()
                .take(marks)
                .map(|s| s.to_string())
                .collect(),
        }
    }

    /// Tab whose card is currently in front, if any
    pub fn active_tab(&self) -> Option<usize> {
        match self.deck_layout() {
            DeckLayout::Stack => self.stage().frame().front(),
            DeckLayout::Grid { .. } => {
                let t = self.stage().frame().unit_time;
                let marks = self.engine.binding()?.timeline.marks().to_vec();
                Some(marks.iter().rposition(|&m| t >= m).unwrap_or(0))
            }
        }
    }

    /// Scroll by whole rows
    pub fn scroll_rows(&mut self, rows: i32, now: Instant) {
        self.engine.stage_mut().scroll_by(f64::from(rows) * ROW_PX);
        let position = self.engine.stage().scroll();
        self.engine.on_scroll_position(position, now);
    }

    pub fn scroll_page(&mut self, pages: f64, now: Instant) {
        let rows = (f64::from(self.stage().rows()) * pages).round() as i32;
        self.scroll_rows(rows, now);
    }

    pub fn jump_to(&mut self, position: f64, now: Instant) {
        let current = self.stage().scroll();
        self.engine.stage_mut().scroll_by(position - current);
        let position = self.engine.stage().scroll();
        self.engine.on_scroll_position(position, now);
    }

    pub fn jump_to_bottom(&mut self, now: Instant) {
        let max = self.stage().max_scroll();
        self.jump_to(max, now);
    }

    pub fn seek(&mut self, index: i64, now: Instant) {
        if !self.engine.is_active() {
            self.set_status("Nothing to seek: section is not pinned");
            return;
        }
        self.engine.seek(index, now);
    }

    pub fn next_tab(&mut self, now: Instant) {
        let next = self.active_tab().map(|t| t + 1).unwrap_or(0);
        self.seek(next as i64, now);
    }

    pub fn prev_tab(&mut self, now: Instant) {
        let prev = self.active_tab().map(|t| t as i64 - 1).unwrap_or(0);
        self.seek(prev, now);
    }

    /// Terminal resized to `cols` x `rows` cells
    pub fn resize(&mut self, cols: u16, rows: u16, now: Instant) {
        self.engine.stage_mut().resize(cols, rows);
        self.engine.on_event(
            EnvironmentEvent::Resize {
                width: f64::from(cols) * COL_PX,
                height: f64::from(rows) * ROW_PX,
            },
            now,
        );
    }

    pub fn set_visible(&mut self, visible: bool, now: Instant) {
        let event = if visible {
            EnvironmentEvent::VisibilityRestored
        } else {
            EnvironmentEvent::VisibilityHidden
        };
        self.engine.on_event(event, now);
    }

    /// Rebuild as if the device had rotated
    pub fn request_rebind(&mut self, now: Instant) {
        self.engine.on_event(EnvironmentEvent::OrientationChange, now);
        self.set_status("Rebind requested");
    }

    pub fn tick(&mut self, now: Instant) {
        let generation = self.engine.generation();
        self.engine.tick(now);
        if self.engine.generation() != generation {
            match self.engine.lifecycle() {
                Lifecycle::Inert(reason) => {
                    self.status_message = Some(format!("Not pinned: {}", reason));
                }
                _ => self.status_message = None,
            }
        }
    }

    /// Release the section; the page scrolls on without animation
    pub fn unbind(&mut self) {
        self.engine.unbind();
        self.set_status("Section unbound");
    }

    /// Whether the next poll should run at the animation frame rate
    pub fn needs_fast_update(&self) -> bool {
        self.engine.is_seeking()
    }

    pub fn toggle_help(&mut self) {
        self.mode = match self.mode {
            Mode::Help => Mode::Normal,
            Mode::Normal => Mode::Help,
        };
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }
}
