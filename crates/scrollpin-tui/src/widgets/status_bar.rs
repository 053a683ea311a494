use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use scrollpin_core::Lifecycle;

use crate::app::App;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let stage = app.stage();
        let stats = app.engine.stats();
        let snapshot = stage.frame();

        let state_str = match app.engine.lifecycle() {
            Lifecycle::Idle => "IDLE",
            Lifecycle::Active if stage.is_pinned() => "PINNED",
            Lifecycle::Active => "FLOW",
            Lifecycle::Inert(_) => "INERT",
            Lifecycle::Released => "RELEASED",
        };

        let status_text = if let Some(msg) = &app.status_message {
            format!(" {} | {}", state_str, msg)
        } else {
            format!(
                " {} | {} | gen {} | {:>3.0}% | t {:.3} | px {:.0} | samples {}/{} dropped",
                state_str,
                app.engine.choreography(),
                stats.generation,
                snapshot.progress * 100.0,
                snapshot.unit_time,
                stage.scroll(),
                stats.applied_samples,
                stats.dropped_samples,
            )
        };

        let help_hint = " q:quit j/k:scroll 1-9:seek r:rebind ?:help ";
        let padding_len = (area.width as usize)
            .saturating_sub(status_text.chars().count() + help_hint.len());

        let line = Line::from(vec![
            Span::styled(status_text, Style::default().fg(theme.fg0).bg(theme.bg2)),
            Span::styled(" ".repeat(padding_len), Style::default().bg(theme.bg2)),
            Span::styled(help_hint, Style::default().fg(theme.grey2).bg(theme.bg2)),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}
