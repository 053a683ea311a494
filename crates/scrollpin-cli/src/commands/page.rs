//! Headless page used by the non-interactive commands

use std::time::Instant;

use anyhow::{anyhow, Result};
use scrollpin_core::{
    AppConfig, Engine, Frame, Geometry, GeometrySampler, Lifecycle, PinState, SectionMetrics,
    Stage,
};
use scrollpin_tui::app::participants_for;

/// A page with one viewport of content above the section
#[derive(Debug, Clone)]
pub struct Page {
    geometry: Geometry,
    participants: usize,
    scroll: f64,
    pin: Option<PinState>,
}

impl Page {
    pub fn new(width: f64, height: f64, participants: usize) -> Self {
        Self {
            geometry: Geometry::new(width, height),
            participants,
            scroll: 0.0,
            pin: None,
        }
    }

    pub fn pin(&self) -> Option<PinState> {
        self.pin
    }
}

impl GeometrySampler for Page {
    fn sample(&self) -> Geometry {
        self.geometry
    }
}

impl Stage for Page {
    fn section(&self) -> Option<SectionMetrics> {
        Some(SectionMetrics {
            top: self.geometry.effective_height(),
            participants: self.participants,
        })
    }

    fn scroll_position(&self) -> f64 {
        self.scroll
    }

    fn set_pin(&mut self, pin: Option<PinState>) {
        self.pin = pin;
    }

    // the engine keeps the last frame; nothing to paint headless
    fn render(&mut self, _frame: &Frame) {}

    fn scroll_to(&mut self, position: f64) {
        self.scroll = position.max(0.0);
    }
}

/// Mount an engine on a fresh page; fails when the section would stay unpinned
pub fn mount(config: &AppConfig, width: f64, height: f64) -> Result<Engine<Page>> {
    let page = Page::new(width, height, participants_for(config));
    let mut engine = Engine::from_config(page, config);
    engine.mount(Instant::now());

    match engine.lifecycle() {
        Lifecycle::Active => Ok(engine),
        Lifecycle::Inert(reason) => Err(anyhow!("Section not pinned: {}", reason)),
        other => Err(anyhow!("Unexpected engine state: {:?}", other)),
    }
}

/// One-line summary of participant states, front card marked with `*`
pub fn describe(frame: &Frame) -> String {
    frame
        .states
        .iter()
        .enumerate()
        .map(|(i, s)| match (s.is_visible(), s.depth) {
            (false, _) => format!("{}:--", i),
            (true, Some(0)) => format!("{}:*0", i),
            (true, Some(d)) => format!("{}:d{}", i, d),
            (true, None) => format!("{}:on", i),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
