use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;

/// One label per seek target; the active one follows the scroll position
pub struct TabBarWidget;

impl TabBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let labels = app.tab_labels();
        let active = app.active_tab();

        let mut spans = vec![Span::styled(" ", Style::default().bg(theme.bg1))];
        if labels.is_empty() {
            spans.push(Span::styled(
                "no seek targets",
                Style::default().fg(theme.grey1).bg(theme.bg1),
            ));
        }
        for (index, label) in labels.iter().enumerate() {
            let style = if Some(index) == active {
                Style::default()
                    .fg(theme.bg0)
                    .bg(theme.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.fg0).bg(theme.bg1)
            };
            spans.push(Span::styled(format!(" {}:{} ", index + 1, label), style));
            spans.push(Span::styled(" ", Style::default().bg(theme.bg1)));
        }

        frame.render_widget(
            Paragraph::new(Line::from(spans)).style(Style::default().bg(theme.bg1)),
            area,
        );
    }
}
