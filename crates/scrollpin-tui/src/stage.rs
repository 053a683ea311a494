//! Terminal stage: a virtual scrolling document measured in pixels.
//!
//! The document is one viewport of intro, the pinned section, the pin
//! spacer and one viewport of outro. Terminal cells map to fixed pixel
//! sizes so the engine sees the same units a browser host would.

use scrollpin_core::{Frame, Geometry, GeometrySampler, PinState, SectionMetrics, Stage};

/// Pixel height of one terminal row
pub const ROW_PX: f64 = 16.0;
/// Pixel width of one terminal column
pub const COL_PX: f64 = 8.0;

#[derive(Debug, Clone)]
pub struct TerminalStage {
    cols: u16,
    rows: u16,
    scroll: f64,
    participants: usize,
    pin: Option<PinState>,
    frame: Frame,
}

impl TerminalStage {
    pub fn new(cols: u16, rows: u16, participants: usize) -> Self {
        Self {
            cols,
            rows,
            scroll: 0.0,
            participants,
            pin: None,
            frame: Frame::default(),
        }
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn viewport_width(&self) -> f64 {
        self.cols as f64 * COL_PX
    }

    pub fn viewport_height(&self) -> f64 {
        self.rows as f64 * ROW_PX
    }

    /// Resize the viewport, keeping the scroll offset inside the document
    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
        self.scroll = self.scroll.clamp(0.0, self.max_scroll());
    }

    /// Document offset of the section's top: one viewport of intro
    pub fn section_top(&self) -> f64 {
        self.viewport_height()
    }

    pub fn section_height(&self) -> f64 {
        self.viewport_height()
    }

    pub fn document_height(&self) -> f64 {
        let spacer = self.pin.map(|p| p.spacer).unwrap_or(0.0);
        self.section_top() + self.section_height() + spacer + self.viewport_height()
    }

    pub fn max_scroll(&self) -> f64 {
        (self.document_height() - self.viewport_height()).max(0.0)
    }

    pub fn scroll(&self) -> f64 {
        self.scroll
    }

    /// Scroll by `delta` pixels; returns the new offset
    pub fn scroll_by(&mut self, delta: f64) -> f64 {
        self.scroll = (self.scroll + delta).clamp(0.0, self.max_scroll());
        self.scroll
    }

    pub fn pin(&self) -> Option<PinState> {
        self.pin
    }

    pub fn is_pinned(&self) -> bool {
        self.pin.is_some_and(|p| p.is_pinned_at(self.scroll))
    }

    /// Last frame the engine rendered
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Section top relative to the viewport, in pixels
    pub fn section_screen_top(&self) -> f64 {
        match self.pin {
            Some(pin) => pin.section_screen_top(self.section_top(), self.scroll),
            None => self.section_top() - self.scroll,
        }
    }

    /// Screen row of the first row after the section, spacer included
    pub fn outro_screen_top(&self) -> f64 {
        let spacer = self.pin.map(|p| p.spacer).unwrap_or(0.0);
        self.section_top() + self.section_height() + spacer - self.scroll
    }
}

impl GeometrySampler for TerminalStage {
    fn sample(&self) -> Geometry {
        Geometry::new(self.viewport_width(), self.viewport_height())
    }
}

impl Stage for TerminalStage {
    fn section(&self) -> Option<SectionMetrics> {
        Some(SectionMetrics {
            top: self.section_top(),
            participants: self.participants,
        })
    }

    fn scroll_position(&self) -> f64 {
        self.scroll
    }

    fn set_pin(&mut self, pin: Option<PinState>) {
        self.pin = pin;
        self.scroll = self.scroll.clamp(0.0, self.max_scroll());
    }

    fn render(&mut self, frame: &Frame) {
        self.frame.clone_from(frame);
    }

    fn scroll_to(&mut self, position: f64) {
        self.scroll = position.clamp(0.0, self.max_scroll());
    }
}
