use crate::application::{App, AppMode, FormField};
use crate::infrastructure::{ClipboardSink, QuoteRepository};
use crossterm::event::{KeyCode, KeyModifiers};

const CONDITION_PAGE_STEP: i32 = 10;

pub struct InputHandler;

impl InputHandler {
    pub fn handle_key_event(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        match app.mode {
            AppMode::Normal => Self::handle_normal_mode(app, key, modifiers),
            AppMode::Help => Self::handle_help_mode(app, key),
            AppMode::SaveQuote | AppMode::ExportCsv => Self::handle_filename_input_mode(app, key),
        }
    }

    fn handle_normal_mode(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            match key {
                KeyCode::Char('r') => app.reset(),
                KeyCode::Char('s') => app.start_save_quote(),
                KeyCode::Char('e') => app.start_csv_export(),
                KeyCode::Char('y') => match app.result_text() {
                    Some(text) => {
                        let result = ClipboardSink::copy_text(&text);
                        app.set_copy_result(result);
                    }
                    None => app.status_message = Some("Nothing to copy yet, submit the form first".to_string()),
                },
                _ => {}
            }
            return;
        }

        match key {
            KeyCode::Tab | KeyCode::Down => app.focus_next(),
            KeyCode::BackTab | KeyCode::Up => app.focus_previous(),
            KeyCode::Right => app.cycle_option(true),
            KeyCode::Left => app.cycle_option(false),
            KeyCode::PageUp if app.focus == FormField::Condition => app.adjust_condition(CONDITION_PAGE_STEP),
            KeyCode::PageDown if app.focus == FormField::Condition => app.adjust_condition(-CONDITION_PAGE_STEP),
            KeyCode::Backspace | KeyCode::Delete => app.clear_focused(),
            KeyCode::Enter => app.submit(),
            KeyCode::F(1) | KeyCode::Char('?') => {
                app.mode = AppMode::Help;
                app.help_scroll = 0;
            }
            KeyCode::Char(c) if app.focus == FormField::Age && (c.is_ascii_digit() || c == '-') => {
                app.push_age_char(c);
            }
            KeyCode::Char('q') => {
                // Will be handled by main loop
            }
            _ => {}
        }
    }

    fn handle_help_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Char('q') => {
                app.mode = AppMode::Normal;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                app.help_scroll = app.help_scroll.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.help_scroll += 1;
            }
            KeyCode::PageUp => {
                app.help_scroll = app.help_scroll.saturating_sub(5);
            }
            KeyCode::PageDown => {
                app.help_scroll += 5;
            }
            KeyCode::Home => {
                app.help_scroll = 0;
            }
            _ => {}
        }
    }

    // `cursor_position` is a byte offset that always sits on a char boundary.
    fn handle_filename_input_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Enter => match app.mode {
                AppMode::SaveQuote => {
                    let filename = app.get_save_filename();
                    let result = match app.last_quote() {
                        Some(quote) => QuoteRepository::save_quote(quote, &filename),
                        None => Err("no quote to save".to_string()),
                    };
                    app.set_save_result(result);
                }
                AppMode::ExportCsv => {
                    let filename = app.get_csv_export_filename();
                    let result = match app.outcome.as_ref().and_then(|o| o.result_rows.as_deref()) {
                        Some(rows) => QuoteRepository::export_rows_csv(rows, &filename),
                        None => Err("no result to export".to_string()),
                    };
                    app.set_csv_export_result(result);
                }
                AppMode::Normal | AppMode::Help => {}
            },
            KeyCode::Esc => {
                app.cancel_filename_input();
            }
            KeyCode::Backspace => {
                if let Some(c) = app.filename_input[..app.cursor_position].chars().next_back() {
                    app.cursor_position -= c.len_utf8();
                    app.filename_input.remove(app.cursor_position);
                }
            }
            KeyCode::Delete => {
                if app.cursor_position < app.filename_input.len() {
                    app.filename_input.remove(app.cursor_position);
                }
            }
            KeyCode::Left => {
                if let Some(c) = app.filename_input[..app.cursor_position].chars().next_back() {
                    app.cursor_position -= c.len_utf8();
                }
            }
            KeyCode::Right => {
                if let Some(c) = app.filename_input[app.cursor_position..].chars().next() {
                    app.cursor_position += c.len_utf8();
                }
            }
            KeyCode::Home => {
                app.cursor_position = 0;
            }
            KeyCode::End => {
                app.cursor_position = app.filename_input.len();
            }
            KeyCode::Char(c) => {
                app.filename_input.insert(app.cursor_position, c);
                app.cursor_position += c.len_utf8();
            }
            _ => {}
        }
    }
}
