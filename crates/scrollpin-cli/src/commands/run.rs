use std::io;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use crossterm::{
    event::{DisableFocusChange, EnableFocusChange},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, size, EnterAlternateScreen, LeaveAlternateScreen,
        SetTitle,
    },
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};
use tracing::info;

use scrollpin_core::AppConfig;
use scrollpin_tui::{
    app::{App, Mode},
    event::{AppEvent, EventHandler},
    input::{handle_key_event, Action},
    load_theme,
    widgets::{DeckWidget, HelpWidget, StatusBarWidget, TabBarWidget},
};

/// Rows taken by the tab bar and the status bar
const CHROME_ROWS: u16 = 2;

pub async fn run(config: Arc<AppConfig>) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableFocusChange, SetTitle("scrollpin"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = main_loop(&mut terminal, config);

    // Restore terminal even when the loop failed
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableFocusChange
    )?;
    terminal.show_cursor()?;

    result
}

fn main_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: Arc<AppConfig>,
) -> Result<()> {
    let (cols, rows) = size()?;
    let theme = load_theme(&config.ui.theme);
    let mut app = App::new(
        config.clone(),
        theme,
        cols,
        rows.saturating_sub(CHROME_ROWS),
    );
    app.mount(Instant::now());
    info!("Preview started: {}", app.engine.choreography());

    let event_handler =
        EventHandler::with_animation_fps(config.ui.tick_rate_ms, config.scroll.animation_fps);

    loop {
        app.tick(Instant::now());

        terminal.draw(|frame| {
            let size = frame.area();

            // Main layout: tab bar + deck + status bar
            let main_layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(1),
                    Constraint::Min(1),
                    Constraint::Length(1),
                ])
                .split(size);

            TabBarWidget::render(frame, main_layout[0], &app);
            DeckWidget::render(frame, main_layout[1], &app);
            StatusBarWidget::render(frame, main_layout[2], &app);

            if app.mode == Mode::Help {
                HelpWidget::render(frame, &app.theme);
            }
        })?;

        // Use the animation frame rate while a seek is moving the page
        let event = if app.needs_fast_update() {
            event_handler.next_animation()?
        } else {
            event_handler.next()?
        };
        let now = Instant::now();
        if let Some(event) = event {
            match event {
                AppEvent::Key(key) => {
                    let action = handle_key_event(key, &app);
                    handle_action(&mut app, action, now);
                }
                AppEvent::Resize(cols, rows) => {
                    app.resize(cols, rows.saturating_sub(CHROME_ROWS), now);
                }
                AppEvent::FocusGained => app.set_visible(true, now),
                AppEvent::FocusLost => app.set_visible(false, now),
                AppEvent::Tick => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    let stats = app.engine.stats();
    info!(
        "Preview finished: {} rebinds, {} samples, {} seeks",
        stats.rebinds, stats.applied_samples, stats.seeks_issued
    );
    Ok(())
}

fn handle_action(app: &mut App, action: Action, now: Instant) {
    // Any action other than the first 'g' clears the pending key
    if action != Action::PendingG {
        app.pending_key = None;
    }
    if action != Action::None && action != Action::PendingG {
        app.clear_status();
    }

    match action {
        Action::Quit => app.should_quit = true,
        Action::ScrollDown => app.scroll_rows(1, now),
        Action::ScrollUp => app.scroll_rows(-1, now),
        Action::ScrollHalfPageDown => app.scroll_page(0.5, now),
        Action::ScrollHalfPageUp => app.scroll_page(-0.5, now),
        Action::ScrollPageDown => app.scroll_page(1.0, now),
        Action::ScrollPageUp => app.scroll_page(-1.0, now),
        Action::JumpToTop => app.jump_to(0.0, now),
        Action::JumpToBottom => app.jump_to_bottom(now),
        Action::PendingG => app.pending_key = Some('g'),
        Action::Seek(index) => app.seek(index, now),
        Action::NextTab => app.next_tab(now),
        Action::PrevTab => app.prev_tab(now),
        Action::Rebind => app.request_rebind(now),
        Action::Unbind => app.unbind(),
        Action::ToggleHelp => app.toggle_help(),
        Action::ExitMode => app.mode = Mode::Normal,
        Action::None => {}
    }
}
