//! Application state for the terminal valuation form.
//!
//! This module holds the interactive session: which field has focus, the
//! raw age text being typed, the last submit outcome and the dialogs for
//! saving and exporting a quote.

use crate::application::form::{FormEvent, FormField, FormStateController};
use crate::application::presenter::{ResultPresenter, SubmitOutcome};
use crate::domain::{Catalog, Quote, MAX_CONDITION};
use log::{debug, info};

const DEFAULT_QUOTE_FILENAME: &str = "quote.json";
const DEFAULT_CSV_FILENAME: &str = "quote.csv";
const MAX_AGE_INPUT_LEN: usize = 5;

/// Represents the current mode of the application.
///
/// The mode decides how key presses are interpreted and which overlay,
/// if any, is drawn on top of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Form navigation and editing
    Normal,
    /// Help screen is displayed
    Help,
    /// Prompting for the JSON file that receives the quote
    SaveQuote,
    /// Prompting for the CSV file that receives the result rows
    ExportCsv,
}

/// Interactive session state rendered by the presentation layer.
///
/// # Examples
///
/// ```
/// use guitar_quote::application::{App, FormField};
/// use guitar_quote::domain::Catalog;
///
/// let catalog = Catalog::builtin();
/// let app = App::new(&catalog);
/// assert_eq!(app.focus, FormField::Category);
/// assert!(app.outcome.is_none());
/// ```
#[derive(Debug)]
pub struct App<'a> {
    /// Field selections and enablement
    pub form: FormStateController<'a>,
    /// Current application mode
    pub mode: AppMode,
    /// Field receiving key presses
    pub focus: FormField,
    /// Age as typed, parsed on every change
    pub age_input: String,
    /// Outcome of the last submit. Cleared on reset, and once an edit makes
    /// it stale
    pub outcome: Option<SubmitOutcome>,
    /// Temporary status message to display
    pub status_message: Option<String>,
    /// Input buffer for filename entry
    pub filename_input: String,
    /// Cursor position within the filename buffer
    pub cursor_position: usize,
    /// Scroll position in help text
    pub help_scroll: usize,
}

impl<'a> App<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            form: FormStateController::new(catalog),
            mode: AppMode::Normal,
            focus: FormField::Category,
            age_input: String::new(),
            outcome: None,
            status_message: None,
            filename_input: String::new(),
            cursor_position: 0,
            help_scroll: 0,
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_previous(&mut self) {
        self.focus = self.focus.previous();
    }

    /// Moves the focused field to its next (or previous) option.
    ///
    /// Selectors wrap around their option lists. The age and condition
    /// fields step by one.
    pub fn cycle_option(&mut self, forward: bool) {
        let catalog = self.form.catalog();
        match self.focus {
            FormField::Category => {
                let ids: Vec<&str> = catalog.categories().iter().map(|c| c.id.as_str()).collect();
                let next = cycle(&ids, self.form.state().category_id(), forward).map(str::to_string);
                if let Some(id) = next {
                    self.apply(FormEvent::CategorySelected(id));
                }
            }
            FormField::Wood => {
                let ids: Vec<&str> = catalog.woods().iter().map(|w| w.id.as_str()).collect();
                let next = cycle(&ids, self.form.state().wood_id(), forward).map(str::to_string);
                if let Some(id) = next {
                    self.apply(FormEvent::WoodSelected(Some(id)));
                }
            }
            FormField::StringCount => {
                let view = self.form.view();
                if !view.enablement.string_count {
                    self.status_message = Some("Select an instrument category first".to_string());
                    return;
                }
                if let Some(count) = cycle(&view.string_options, view.selected_string_count, forward) {
                    self.apply(FormEvent::StringCountSelected(count));
                }
            }
            FormField::Age => {
                let current = self.form.age().unwrap_or(0);
                let next = if forward { current.saturating_add(1) } else { current.saturating_sub(1) };
                self.set_age_text(next.to_string());
            }
            FormField::Condition => self.adjust_condition(if forward { 1 } else { -1 }),
        }
    }

    /// Moves the condition slider, clamped to `0..=50`.
    pub fn adjust_condition(&mut self, delta: i32) {
        let value = self.form.condition().saturating_add(delta).clamp(0, MAX_CONDITION as i32);
        self.apply(FormEvent::ConditionChanged(value));
    }

    /// Clears the focused selector, or deletes the last age character.
    pub fn clear_focused(&mut self) {
        match self.focus {
            FormField::Category => {
                self.apply(FormEvent::CategoryCleared);
            }
            FormField::Wood => {
                self.apply(FormEvent::WoodSelected(None));
            }
            FormField::Age => self.pop_age_char(),
            FormField::StringCount | FormField::Condition => {}
        }
    }

    /// Appends a typed character to the age. Only digits and a leading
    /// minus sign are accepted.
    pub fn push_age_char(&mut self, c: char) {
        let accepted = c.is_ascii_digit() || (c == '-' && self.age_input.is_empty());
        if !accepted || self.age_input.len() >= MAX_AGE_INPUT_LEN {
            return;
        }
        let mut text = self.age_input.clone();
        text.push(c);
        self.set_age_text(text);
    }

    pub fn pop_age_char(&mut self) {
        let mut text = self.age_input.clone();
        if text.pop().is_some() {
            self.set_age_text(text);
        }
    }

    fn set_age_text(&mut self, text: String) {
        let age = text.parse::<i32>().ok();
        if self.apply(FormEvent::AgeEntered(age)) {
            self.age_input = text;
        }
    }

    /// Submits the form if submit is currently enabled.
    pub fn submit(&mut self) {
        if !self.form.enablement().submit {
            self.status_message = Some(if self.form.is_submit_blocked() {
                "Correct the highlighted problem before submitting again".to_string()
            } else {
                "Choose an instrument category and a wood first".to_string()
            });
            return;
        }

        let outcome = self.form.submit();
        match &outcome.quote {
            Some(quote) => info!("Quoted {} / {} at {:.2}", quote.category_id, quote.wood_id, quote.breakdown.final_price),
            None => debug!("Submit rejected: {}", outcome.message),
        }
        self.status_message = None;
        self.outcome = Some(outcome);
    }

    /// Returns the form to its initial state and clears the result.
    pub fn reset(&mut self) {
        self.apply(FormEvent::ResetRequested);
        self.age_input.clear();
        self.outcome = None;
        self.status_message = None;
        self.focus = FormField::Category;
    }

    /// The quote behind the last successful submit.
    pub fn last_quote(&self) -> Option<&Quote> {
        self.outcome.as_ref().and_then(|outcome| outcome.quote.as_ref())
    }

    /// Result rows as plain text, for the clipboard.
    pub fn result_text(&self) -> Option<String> {
        self.outcome
            .as_ref()
            .and_then(|outcome| outcome.result_rows.as_deref())
            .map(ResultPresenter::plain_text)
    }

    fn apply(&mut self, event: FormEvent) -> bool {
        let before = self.form.request();
        match self.form.handle(event) {
            Ok(_) => {
                self.status_message = None;
                if self.form.request() != before {
                    self.drop_stale_outcome();
                }
                true
            }
            Err(err) => {
                self.status_message = Some(err.to_string());
                false
            }
        }
    }

    /// A quote no longer matches the edited form. An error stays on screen
    /// until the edit resolves it.
    fn drop_stale_outcome(&mut self) {
        let stale = self
            .outcome
            .as_ref()
            .is_some_and(|outcome| outcome.is_success() || !self.form.is_submit_blocked());
        if stale {
            debug!("Discarding result of the previous submit");
            self.outcome = None;
        }
    }

    /// Switches to save mode to prompt for a filename.
    pub fn start_save_quote(&mut self) {
        if self.last_quote().is_none() {
            self.status_message = Some("Nothing to save yet, submit the form first".to_string());
            return;
        }
        self.mode = AppMode::SaveQuote;
        self.filename_input = DEFAULT_QUOTE_FILENAME.to_string();
        self.cursor_position = self.filename_input.len();
        self.status_message = None;
    }

    /// Switches to CSV export mode to prompt for a filename.
    pub fn start_csv_export(&mut self) {
        if self.last_quote().is_none() {
            self.status_message = Some("Nothing to export yet, submit the form first".to_string());
            return;
        }
        self.mode = AppMode::ExportCsv;
        self.filename_input = DEFAULT_CSV_FILENAME.to_string();
        self.cursor_position = self.filename_input.len();
        self.status_message = None;
    }

    /// Cancels filename input and returns to normal mode.
    pub fn cancel_filename_input(&mut self) {
        self.mode = AppMode::Normal;
        self.filename_input.clear();
        self.cursor_position = 0;
    }

    pub fn get_save_filename(&self) -> String {
        if self.filename_input.is_empty() {
            DEFAULT_QUOTE_FILENAME.to_string()
        } else {
            self.filename_input.clone()
        }
    }

    pub fn get_csv_export_filename(&self) -> String {
        if self.filename_input.is_empty() {
            DEFAULT_CSV_FILENAME.to_string()
        } else {
            self.filename_input.clone()
        }
    }

    pub fn set_save_result(&mut self, result: Result<String, String>) {
        self.status_message = Some(match result {
            Ok(filename) => format!("Saved quote to {}", filename),
            Err(error) => format!("Save failed: {}", error),
        });
        self.cancel_filename_input();
    }

    pub fn set_csv_export_result(&mut self, result: Result<String, String>) {
        self.status_message = Some(match result {
            Ok(filename) => format!("Exported to {}", filename),
            Err(error) => format!("Export failed: {}", error),
        });
        self.cancel_filename_input();
    }

    pub fn set_copy_result(&mut self, result: Result<(), String>) {
        self.status_message = Some(match result {
            Ok(()) => "Result copied to clipboard".to_string(),
            Err(error) => format!("Copy failed: {}", error),
        });
    }
}

/// Picks the entry after (or before) `current`, wrapping around. With no
/// current entry the first (or last) one is chosen.
fn cycle<T: Copy + PartialEq>(options: &[T], current: Option<T>, forward: bool) -> Option<T> {
    if options.is_empty() {
        return None;
    }
    let len = options.len();
    let index = match current.and_then(|value| options.iter().position(|option| *option == value)) {
        Some(index) if forward => (index + 1) % len,
        Some(index) => (index + len - 1) % len,
        None if forward => 0,
        None => len - 1,
    };
    Some(options[index])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::FormPhase;

    fn ready_app(catalog: &Catalog) -> App<'_> {
        let mut app = App::new(catalog);
        app.cycle_option(true);
        app.focus_next();
        app.cycle_option(true);
        app
    }

    #[test]
    fn test_app_default() {
        let catalog = Catalog::builtin();
        let app = App::new(&catalog);
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.focus, FormField::Category);
        assert!(app.age_input.is_empty());
        assert!(app.outcome.is_none());
        assert!(app.status_message.is_none());
        assert!(app.filename_input.is_empty());
        assert_eq!(app.cursor_position, 0);
        assert_eq!(app.help_scroll, 0);
        assert_eq!(app.form.phase(), FormPhase::Empty);
    }

    #[test]
    fn test_cycle_wraps_in_both_directions() {
        let options = [4, 5, 6];
        assert_eq!(cycle(&options, None, true), Some(4));
        assert_eq!(cycle(&options, None, false), Some(6));
        assert_eq!(cycle(&options, Some(6), true), Some(4));
        assert_eq!(cycle(&options, Some(4), false), Some(6));
        assert_eq!(cycle::<u32>(&[], None, true), None);
    }

    #[test]
    fn test_cycling_selectors_reaches_ready() {
        let catalog = Catalog::builtin();
        let app = ready_app(&catalog);

        assert_eq!(app.form.state().category_id(), Some("electric"));
        assert_eq!(app.form.state().wood_id(), Some("mahogany"));
        assert_eq!(app.form.phase(), FormPhase::Ready);
    }

    #[test]
    fn test_cycling_string_counts() {
        let catalog = Catalog::builtin();
        let mut app = App::new(&catalog);

        app.focus = FormField::StringCount;
        app.cycle_option(true);
        assert_eq!(app.status_message.as_deref(), Some("Select an instrument category first"));

        app.focus = FormField::Category;
        app.cycle_option(true);
        app.focus = FormField::StringCount;
        app.cycle_option(true);
        assert_eq!(app.form.view().selected_string_count, Some(7));
        app.cycle_option(false);
        app.cycle_option(false);
        assert_eq!(app.form.view().selected_string_count, Some(8));
    }

    #[test]
    fn test_age_typing() {
        let catalog = Catalog::builtin();
        let mut app = ready_app(&catalog);

        app.focus = FormField::Age;
        app.push_age_char('1');
        app.push_age_char('x');
        app.push_age_char('2');
        assert_eq!(app.age_input, "12");
        assert_eq!(app.form.age(), Some(12));

        app.pop_age_char();
        app.pop_age_char();
        assert!(app.age_input.is_empty());
        assert_eq!(app.form.age(), None);

        app.push_age_char('-');
        assert_eq!(app.form.age(), None);
        app.push_age_char('5');
        assert_eq!(app.form.age(), Some(-5));
    }

    #[test]
    fn test_age_rejected_before_ready() {
        let catalog = Catalog::builtin();
        let mut app = App::new(&catalog);

        app.push_age_char('3');
        assert!(app.age_input.is_empty());
        assert_eq!(app.status_message.as_deref(), Some("Age (years) is not available yet"));
    }

    #[test]
    fn test_condition_is_clamped() {
        let catalog = Catalog::builtin();
        let mut app = App::new(&catalog);

        app.adjust_condition(-5);
        assert_eq!(app.form.condition(), 0);
        app.adjust_condition(45);
        app.adjust_condition(10);
        assert_eq!(app.form.condition(), 50);
    }

    #[test]
    fn test_submit_disabled_before_ready() {
        let catalog = Catalog::builtin();
        let mut app = App::new(&catalog);

        app.submit();
        assert!(app.outcome.is_none());
        assert_eq!(
            app.status_message.as_deref(),
            Some("Choose an instrument category and a wood first")
        );
    }

    #[test]
    fn test_full_submit_flow() {
        let catalog = Catalog::builtin();
        let mut app = ready_app(&catalog);

        app.focus = FormField::Age;
        app.push_age_char('5');
        app.adjust_condition(10);
        app.submit();

        let outcome = app.outcome.as_ref().unwrap();
        assert!(outcome.message.is_empty());
        assert_eq!(
            app.last_quote().map(|q| format!("{:.2}", q.breakdown.final_price)),
            Some("10260.00".to_string())
        );
        assert!(app.result_text().unwrap().contains("10260.00 UAH"));
    }

    #[test]
    fn test_rejected_submit_blocks_until_edit() {
        let catalog = Catalog::builtin();
        let mut app = ready_app(&catalog);

        app.submit();
        assert_eq!(app.outcome.as_ref().unwrap().message, "Please enter the instrument's age");
        assert!(app.last_quote().is_none());

        app.submit();
        assert_eq!(
            app.status_message.as_deref(),
            Some("Correct the highlighted problem before submitting again")
        );

        app.focus = FormField::Age;
        app.push_age_char('7');
        app.submit();
        assert!(app.last_quote().is_some());
    }

    #[test]
    fn test_edit_after_quote_discards_result() {
        let catalog = Catalog::builtin();
        let mut app = ready_app(&catalog);
        app.focus = FormField::Age;
        app.push_age_char('4');
        app.submit();
        assert!(app.last_quote().is_some());

        app.focus = FormField::Wood;
        app.cycle_option(true);
        assert_eq!(app.form.state().wood_id(), Some("maple"));
        assert!(app.outcome.is_none());
        assert!(app.result_text().is_none());

        app.start_save_quote();
        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.status_message.unwrap().starts_with("Nothing to save"));
    }

    #[test]
    fn test_error_kept_until_resolved() {
        let catalog = Catalog::builtin();
        let mut app = ready_app(&catalog);
        app.focus = FormField::Age;
        app.push_age_char('9');
        app.push_age_char('9');
        app.submit();
        assert!(app.outcome.as_ref().unwrap().message.contains("80"));

        app.adjust_condition(5);
        assert!(app.outcome.is_some());

        app.pop_age_char();
        assert!(app.outcome.is_none());
        assert!(app.form.enablement().submit);
    }

    #[test]
    fn test_reset_clears_form_and_result() {
        let catalog = Catalog::builtin();
        let mut app = ready_app(&catalog);
        app.focus = FormField::Age;
        app.push_age_char('9');
        app.submit();
        assert!(app.outcome.is_some());

        app.reset();
        assert!(app.outcome.is_none());
        assert!(app.age_input.is_empty());
        assert_eq!(app.focus, FormField::Category);
        assert_eq!(app.form.phase(), FormPhase::Empty);
        assert!(!app.form.enablement().submit);
    }

    #[test]
    fn test_clear_focused_selectors() {
        let catalog = Catalog::builtin();
        let mut app = ready_app(&catalog);

        app.focus = FormField::Wood;
        app.clear_focused();
        assert_eq!(app.form.phase(), FormPhase::CategoryChosen);

        app.focus = FormField::Category;
        app.clear_focused();
        assert_eq!(app.form.phase(), FormPhase::Empty);
    }

    #[test]
    fn test_save_requires_quote() {
        let catalog = Catalog::builtin();
        let mut app = App::new(&catalog);

        app.start_save_quote();
        assert_eq!(app.mode, AppMode::Normal);
        app.start_csv_export();
        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.status_message.unwrap().starts_with("Nothing to export"));
    }

    #[test]
    fn test_filename_dialogs() {
        let catalog = Catalog::builtin();
        let mut app = ready_app(&catalog);
        app.focus = FormField::Age;
        app.push_age_char('2');
        app.submit();

        app.start_save_quote();
        assert_eq!(app.mode, AppMode::SaveQuote);
        assert_eq!(app.filename_input, "quote.json");
        assert_eq!(app.cursor_position, 10);

        app.filename_input.clear();
        assert_eq!(app.get_save_filename(), "quote.json");

        app.set_save_result(Ok("mine.json".to_string()));
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.status_message.as_deref(), Some("Saved quote to mine.json"));

        app.start_csv_export();
        assert_eq!(app.mode, AppMode::ExportCsv);
        assert_eq!(app.get_csv_export_filename(), "quote.csv");
        app.set_csv_export_result(Err("disk full".to_string()));
        assert_eq!(app.status_message.as_deref(), Some("Export failed: disk full"));
        assert!(app.filename_input.is_empty());
    }

    #[test]
    fn test_copy_result_messages() {
        let catalog = Catalog::builtin();
        let mut app = App::new(&catalog);

        app.set_copy_result(Ok(()));
        assert_eq!(app.status_message.as_deref(), Some("Result copied to clipboard"));
        app.set_copy_result(Err("no display".to_string()));
        assert_eq!(app.status_message.as_deref(), Some("Copy failed: no display"));
    }
}
