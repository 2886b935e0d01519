pub mod app;
pub mod event;
pub mod theme;
pub mod ui;

pub use app::App;
pub use theme::ThemeColors;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use event::{Event, EventHandler};

use crate::usecase::Factor;

/// Run the interactive session until the user quits.
///
/// Edits live only in memory; nothing is written back to the seed file.
pub async fn run_tui(mut app: App) -> anyhow::Result<()> {
    // Buffer stderr while TUI is active to prevent output corrupting the display
    crate::stderr_buffer::activate();

    // Init terminal (sets up panic hooks automatically)
    let mut terminal = ratatui::init();
    let mut events = EventHandler::new(250);

    tracing::debug!(rows = app.session.len(), "tui started");

    let result = event_loop(&mut app, &mut events, |app| {
        terminal.draw(|frame| ui::draw(frame, app))?;
        Ok(())
    })
    .await;

    ratatui::restore();

    // Flush buffered stderr messages now that the terminal is restored
    for msg in crate::stderr_buffer::drain() {
        eprintln!("{}", msg);
    }

    result
}

/// Draw, wait for an event, apply it; until the user quits or input ends.
async fn event_loop<D>(app: &mut App, events: &mut EventHandler, mut draw: D) -> anyhow::Result<()>
where
    D: FnMut(&mut App) -> anyhow::Result<()>,
{
    loop {
        draw(app)?;

        match events.next().await {
            Some(Event::Key(key)) => handle_key_event(app, key),
            Some(Event::Tick) => app.update_flash(),
            None => {
                // No more key presses can arrive, so nothing could ever quit
                tracing::debug!("input closed, leaving tui");
                return Ok(());
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn weight_for_key(c: char) -> Option<Factor> {
    let digit = c.to_digit(10)? as usize;
    digit.checked_sub(1).and_then(|i| Factor::ALL.get(i)).copied()
}

pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    match app.input_mode {
        app::InputMode::Normal => match key.code {
            // Quit
            KeyCode::Char('q') => app.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.should_quit = true
            }

            // Navigation
            KeyCode::Char('j') | KeyCode::Down => app.next_row(),
            KeyCode::Char('k') | KeyCode::Up => app.previous_row(),

            // Tab switching
            KeyCode::Tab => app.toggle_view(),

            // Weights
            KeyCode::Char(c @ '1'..='5') => {
                if let Some(factor) = weight_for_key(c) {
                    app.select_weight(factor);
                }
            }
            KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Right => {
                app.adjust_selected_weight(1)
            }
            KeyCode::Char('-') | KeyCode::Left => app.adjust_selected_weight(-1),

            // Table editing
            KeyCode::Char('a') => app.add_use_case(),
            KeyCode::Char('d') | KeyCode::Delete => app.delete_selected(),
            KeyCode::Char('e') | KeyCode::Enter => app.start_edit(),

            // Summary size
            KeyCode::Char('>') | KeyCode::Char('.') => app.increase_top_n(),
            KeyCode::Char('<') | KeyCode::Char(',') => app.decrease_top_n(),

            KeyCode::Char('?') => app.show_help(),
            KeyCode::Char('b') => app.show_score_breakdown(),

            _ => {}
        },
        app::InputMode::Edit => match key.code {
            KeyCode::Enter => app.confirm_edit(),
            KeyCode::Esc => app.cancel_edit(),
            KeyCode::Tab | KeyCode::Down => app.edit_cycle_field(true),
            KeyCode::BackTab | KeyCode::Up => app.edit_cycle_field(false),
            KeyCode::Backspace => app.edit_backspace(),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.edit_push(c)
            }

            // Ignore all other keys (don't propagate to Normal mode)
            _ => {}
        },
        app::InputMode::ScoreBreakdown => match key.code {
            KeyCode::Esc | KeyCode::Char('b') => app.dismiss_score_breakdown(),
            KeyCode::Char('j') | KeyCode::Down => app.next_row(),
            KeyCode::Char('k') | KeyCode::Up => app.previous_row(),
            _ => {}
        },
        app::InputMode::Help => {
            // Any key exits help
            app.dismiss_help();
        }
    }
}
