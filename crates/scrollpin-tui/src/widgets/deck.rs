use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use scrollpin_core::VisualState;

use crate::app::{App, DeckLayout};
use crate::stage::{COL_PX, ROW_PX};
use crate::theme::Theme;

/// Renders the virtual document: intro, pinned section with its cards, outro
pub struct DeckWidget;

impl DeckWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let stage = app.stage();

        frame.render_widget(Block::default().style(Style::default().bg(theme.bg0)), area);

        let section_top = stage.section_screen_top() / ROW_PX;
        let section_rows = stage.section_height() / ROW_PX;
        let outro_top = stage.outro_screen_top() / ROW_PX;

        render_caption(
            frame,
            area,
            section_top - f64::from(area.height) / 2.0,
            "Scroll down  (j / Ctrl-d)",
            theme,
        );
        render_caption(frame, area, outro_top + 2.0, "End of pinned section", theme);

        let Some(section) = place(area, 0.0, section_top, f64::from(area.width), section_rows)
        else {
            return;
        };
        let border = if stage.is_pinned() {
            theme.pinned
        } else {
            theme.bg2
        };
        frame.render_widget(
            Block::default()
                .borders(Borders::TOP | Borders::BOTTOM)
                .border_style(Style::default().fg(border))
                .style(Style::default().bg(theme.bg0)),
            section,
        );

        let states = &stage.frame().states;
        let slot = Slot {
            x: 0.0,
            y: section_top,
            width: f64::from(area.width),
            height: section_rows,
        };
        match app.deck_layout() {
            DeckLayout::Stack => render_stack(frame, area, slot, states, theme),
            DeckLayout::Grid { columns, container } => {
                render_grid(frame, area, slot, states, columns, container, theme)
            }
        }
    }
}

/// Fractional cell rectangle before clipping
#[derive(Debug, Clone, Copy)]
struct Slot {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

/// Clip a fractional rectangle, relative to `area`, into a drawable cell rect
fn place(area: Rect, x: f64, y: f64, width: f64, height: f64) -> Option<Rect> {
    let left = x.round().max(0.0);
    let top = y.round().max(0.0);
    let right = (x + width).round().min(f64::from(area.width));
    let bottom = (y + height).round().min(f64::from(area.height));
    if right - left < 1.0 || bottom - top < 1.0 {
        return None;
    }
    Some(Rect::new(
        area.x + left as u16,
        area.y + top as u16,
        (right - left) as u16,
        (bottom - top) as u16,
    ))
}

fn render_caption(frame: &mut Frame, area: Rect, row: f64, text: &str, theme: &Theme) {
    if let Some(rect) = place(area, 0.0, row, f64::from(area.width), 1.0) {
        let paragraph = Paragraph::new(Line::from(Span::styled(
            text,
            Style::default().fg(theme.grey2),
        )))
        .alignment(Alignment::Center);
        frame.render_widget(paragraph, rect);
    }
}

/// Back-to-front order: unstacked first, then deepest to frontmost
fn paint_order(states: &[VisualState]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..states.len())
        .filter(|&i| states[i].is_visible())
        .collect();
    order.sort_by_key(|&i| std::cmp::Reverse(states[i].depth.unwrap_or(usize::MAX)));
    order
}

fn render_stack(frame: &mut Frame, area: Rect, slot: Slot, states: &[VisualState], theme: &Theme) {
    let base_w = slot.width * 0.5;
    let base_h = slot.height * 0.5;

    for index in paint_order(states) {
        let state = &states[index];
        let w = base_w * state.scale;
        let h = base_h * state.scale;
        let x = slot.x + (slot.width - w) / 2.0 + state.translate_x / COL_PX;
        let y = slot.y + (slot.height - base_h) / 2.0 + state.translate_y / ROW_PX;
        if let Some(rect) = place(area, x, y, w, h) {
            render_card(frame, rect, index, state, theme);
        }
    }
}

fn render_grid(
    frame: &mut Frame,
    area: Rect,
    slot: Slot,
    states: &[VisualState],
    columns: usize,
    container: usize,
    theme: &Theme,
) {
    let Some(holder) = states.get(container) else {
        return;
    };
    let cw = (slot.width * 0.7 * holder.scale).min(slot.width);
    let ch = slot.height * 0.6 * holder.scale;
    let cx = slot.x + (slot.width - cw) / 2.0 + holder.translate_x / COL_PX;
    let cy = slot.y + (slot.height - ch) / 2.0 + holder.translate_y / ROW_PX;
    if let Some(rect) = place(area, cx, cy, cw, ch) {
        frame.render_widget(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.bg2)),
            rect,
        );
    }

    let cell_w = cw / columns.max(1) as f64;
    let cards: Vec<usize> = paint_order(states)
        .into_iter()
        .filter(|&i| i != container)
        .collect();
    for index in cards {
        let state = &states[index];
        let w = cell_w * 0.8 * state.scale / 1.1;
        let h = ch * 0.7 * state.scale / 1.1;
        let centre_x = cx + cell_w * (index as f64 + 0.5);
        let x = centre_x - w / 2.0 + state.translate_x / COL_PX;
        let y = cy + (ch - h) / 2.0 + state.translate_y / ROW_PX;
        if let Some(rect) = place(area, x, y, w, h) {
            render_card(frame, rect, index, state, theme);
        }
    }
}

fn render_card(frame: &mut Frame, rect: Rect, index: usize, state: &VisualState, theme: &Theme) {
    let front = state.depth == Some(0);
    let mut style = Style::default().fg(theme.fg0).bg(theme.bg1);
    if state.opacity < 1.0 {
        style = style.add_modifier(Modifier::DIM);
    }
    let border = if front {
        Style::default().fg(theme.front_border).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.card_border)
    };

    let depth = match state.depth {
        Some(d) => format!("depth {}", d),
        None => "unstacked".to_string(),
    };
    let mut lines = vec![Line::from(Span::styled(
        depth,
        Style::default().fg(theme.aqua),
    ))];
    if state.rotation.abs() >= 0.5 {
        lines.push(Line::from(Span::styled(
            format!("tilt {:.0}°", state.rotation),
            Style::default().fg(theme.purple),
        )));
    }
    lines.push(Line::from(Span::styled(
        format!("scale {:.2}", state.scale),
        Style::default().fg(theme.grey1),
    )));

    let block = Block::default()
        .title(format!(" Card {} ", index + 1))
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(border)
        .style(style);

    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block),
        rect,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area() -> Rect {
        Rect::new(0, 1, 100, 40)
    }

    #[test]
    fn test_place_clips_to_area() {
        let rect = place(area(), -10.0, 35.0, 30.0, 20.0).unwrap();
        assert_eq!(rect, Rect::new(0, 36, 20, 5));
    }

    #[test]
    fn test_place_rejects_offscreen() {
        assert!(place(area(), 0.0, 45.0, 10.0, 10.0).is_none());
        assert!(place(area(), 0.0, -20.0, 10.0, 10.0).is_none());
    }

    #[test]
    fn test_paint_order_puts_front_last() {
        let state = |depth, opacity| VisualState {
            depth,
            opacity,
            ..VisualState::default()
        };
        let states = vec![
            state(None, 0.0),
            state(Some(2), 1.0),
            state(Some(0), 1.0),
            state(Some(1), 1.0),
        ];
        assert_eq!(paint_order(&states), vec![1, 3, 2]);
    }
}
