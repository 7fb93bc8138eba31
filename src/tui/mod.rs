pub mod app;
pub mod event;
pub mod theme;
pub mod ui;

pub use app::{App, AppContext};
pub use theme::{resolve_theme, Theme, ThemeColors};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use event::{Event, EventHandler};
use tokio::task::JoinHandle;

use crate::backend::{BackendClient, SubmissionReceipt};
use app::{InputMode, Screen};

pub async fn run_tui(mut app: App) -> anyhow::Result<()> {
    let client = app.backend.as_ref().map(BackendClient::new).transpose()?;
    let mut pending_submit: Option<JoinHandle<anyhow::Result<SubmissionReceipt>>> = None;

    // Hold log output back while the TUI owns the terminal
    crate::stderr_buffer::activate();

    // Sets up panic hooks that restore the terminal
    let mut terminal = ratatui::init();
    let mut events = EventHandler::new(250);

    let result = loop {
        if let Err(e) = terminal.draw(|frame| ui::draw(frame, &app)) {
            break Err(e.into());
        }

        match events.next().await {
            Event::Key(key) => handle_key_event(&mut app, key),
            Event::Tick => app.update_flash(),
        }

        // Check if a background submission has completed
        if pending_submit.as_ref().is_some_and(|h| h.is_finished()) {
            if let Some(handle) = pending_submit.take() {
                match handle.await {
                    Ok(receipt) => app.finish_submit(receipt),
                    Err(e) => app.finish_submit(Err(anyhow::anyhow!("submit task failed: {}", e))),
                }
            }
        }

        if pending_submit.is_none() {
            if let Some(client) = &client {
                if let Some(submission) = app.take_submission() {
                    let client = client.clone();
                    pending_submit = Some(tokio::spawn(async move {
                        client.submit_result(&submission).await
                    }));
                }
            }
        }

        if app.should_quit {
            break Ok(());
        }
    };

    ratatui::restore();

    for msg in crate::stderr_buffer::drain() {
        eprintln!("{}", msg);
    }

    result
}

fn handle_key_event(app: &mut App, key: KeyEvent) {
    if app.input_mode == InputMode::Help {
        // Any key exits help
        app.dismiss_help();
        return;
    }

    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
            return;
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
            return;
        }
        KeyCode::Char('?') => {
            app.show_help();
            return;
        }
        _ => {}
    }

    match app.screen() {
        Screen::Welcome => {
            if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('n')) {
                app.start();
            }
        }
        Screen::Question => match key.code {
            KeyCode::Char(c @ '1'..='7') => {
                if let Some(value) = c.to_digit(10) {
                    app.answer(value as u8);
                }
            }
            KeyCode::Left | KeyCode::Char('h') => app.decrement(),
            KeyCode::Right | KeyCode::Char('l') => app.increment(),
            KeyCode::Enter | KeyCode::Char('n') => app.next(),
            KeyCode::Char('p') | KeyCode::Backspace => app.previous(),
            _ => {}
        },
        Screen::Result => match key.code {
            KeyCode::Char('s') => app.save_result(),
            KeyCode::Char('e') => {
                app.export_report();
            }
            KeyCode::Char('u') => app.request_submit(),
            KeyCode::Char('r') => app.restart(),
            _ => {}
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{ProfileLabel, ScoringConfig};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app() -> App {
        App::new(AppContext {
            scoring: ScoringConfig::default(),
            user: None,
            results_path: std::env::temp_dir().join("get-authentic-unused.json"),
            report_dir: std::env::temp_dir(),
            theme: ThemeColors::dark(),
            backend: None,
        })
    }

    #[test]
    fn test_keys_drive_full_questionnaire() {
        let mut app = app();
        handle_key_event(&mut app, key(KeyCode::Enter));
        assert_eq!(app.screen(), Screen::Question);

        for _ in 0..app.quiz.len() {
            handle_key_event(&mut app, key(KeyCode::Char('7')));
            handle_key_event(&mut app, key(KeyCode::Enter));
        }

        assert_eq!(app.screen(), Screen::Result);
        let outcome = app.outcome.as_ref().unwrap();
        assert_eq!(outcome.result.profile, ProfileLabel::CulturalFoodTraveler);
    }

    #[test]
    fn test_arrow_keys_adjust_answer() {
        let mut app = app();
        app.start();
        handle_key_event(&mut app, key(KeyCode::Right));
        handle_key_event(&mut app, key(KeyCode::Right));
        assert_eq!(app.quiz.current_answer(), Some(6));
        handle_key_event(&mut app, key(KeyCode::Char('h')));
        assert_eq!(app.quiz.current_answer(), Some(5));
    }

    #[test]
    fn test_back_key_bounded() {
        let mut app = app();
        app.start();
        handle_key_event(&mut app, key(KeyCode::Backspace));
        assert_eq!(app.quiz.current_index(), Some(0));
        handle_key_event(&mut app, key(KeyCode::Char('n')));
        handle_key_event(&mut app, key(KeyCode::Char('p')));
        assert_eq!(app.quiz.current_index(), Some(0));
    }

    #[test]
    fn test_out_of_scale_digits_ignored() {
        let mut app = app();
        app.start();
        handle_key_event(&mut app, key(KeyCode::Char('9')));
        handle_key_event(&mut app, key(KeyCode::Char('0')));
        assert_eq!(app.quiz.current_answer(), Some(4));
    }

    #[test]
    fn test_help_swallows_next_key() {
        let mut app = app();
        handle_key_event(&mut app, key(KeyCode::Char('?')));
        assert_eq!(app.input_mode, InputMode::Help);
        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_quit() {
        let mut app = app();
        handle_key_event(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(app.should_quit);
    }

    #[test]
    fn test_submit_key_without_backend_flashes_error() {
        let mut app = app();
        app.start();
        for _ in 0..app.quiz.len() {
            handle_key_event(&mut app, key(KeyCode::Enter));
        }
        handle_key_event(&mut app, key(KeyCode::Char('u')));
        assert!(!app.needs_submit);
        assert!(app.flash_message.is_some());
    }

    #[test]
    fn test_default_answers_classify_leisure() {
        let mut app = app();
        app.start();
        for _ in 0..app.quiz.len() {
            handle_key_event(&mut app, key(KeyCode::Enter));
        }
        let outcome = app.outcome.as_ref().unwrap();
        assert_eq!(outcome.result.profile, ProfileLabel::LeisureTraveler);
    }
}
