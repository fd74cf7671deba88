//! Maps pricing outcomes into display-ready text.
//!
//! Nothing here makes business decisions: the presenter only formats what
//! the pricing engine produced.

use crate::domain::{Quote, ValidationError};
use serde::Serialize;

/// Currency code appended to every amount.
pub const CURRENCY: &str = "UAH";

/// One labeled line of the result table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultRow {
    pub label: &'static str,
    pub value: String,
}

impl ResultRow {
    fn new(label: &'static str, value: String) -> Self {
        Self { label, value }
    }
}

/// What the form shows after a submit attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmitOutcome {
    /// Validation message, empty on success.
    pub message: String,
    pub result_rows: Option<Vec<ResultRow>>,
    pub submit_disabled: bool,
    /// The priced quote behind `result_rows`, kept for export.
    #[serde(skip)]
    pub quote: Option<Quote>,
}

impl SubmitOutcome {
    pub fn is_success(&self) -> bool {
        self.result_rows.is_some()
    }
}

pub struct ResultPresenter;

impl ResultPresenter {
    /// Turns an engine result into the message, rows and submit flag.
    ///
    /// # Examples
    ///
    /// ```
    /// use guitar_quote::application::ResultPresenter;
    /// use guitar_quote::domain::ValidationError;
    ///
    /// let outcome = ResultPresenter::present(&Err(ValidationError::NegativeAge));
    /// assert_eq!(outcome.message, "Age cannot be negative");
    /// assert!(outcome.result_rows.is_none());
    /// assert!(outcome.submit_disabled);
    /// ```
    pub fn present(result: &Result<Quote, ValidationError>) -> SubmitOutcome {
        match result {
            Ok(quote) => SubmitOutcome {
                message: String::new(),
                result_rows: Some(Self::rows(quote)),
                submit_disabled: false,
                quote: Some(quote.clone()),
            },
            Err(err) => SubmitOutcome {
                message: Self::error_message(err),
                result_rows: None,
                submit_disabled: true,
                quote: None,
            },
        }
    }

    pub fn error_message(err: &ValidationError) -> String {
        err.to_string()
    }

    pub fn rows(quote: &Quote) -> Vec<ResultRow> {
        let breakdown = &quote.breakdown;
        vec![
            ResultRow::new("Instrument", quote.category_name.clone()),
            ResultRow::new("Wood", quote.wood_name.clone()),
            ResultRow::new("Strings", quote.string_count.to_string()),
            ResultRow::new("Age", format_years(quote.age)),
            ResultRow::new("Condition", breakdown.condition_label.to_string()),
            ResultRow::new("Base price", format_currency(breakdown.base_price)),
            ResultRow::new("Wood multiplier", format!("{:.2}", breakdown.wood_multiplier)),
            ResultRow::new("Strings bonus", format!("+{}", format_percent(breakdown.strings_bonus))),
            ResultRow::new("Age discount", format!("-{}", format_percent(breakdown.age_discount))),
            ResultRow::new("Condition penalty", format!("-{}", format_percent(breakdown.condition_penalty))),
            ResultRow::new("Estimated value", format_currency(breakdown.final_price)),
        ]
    }

    /// Renders rows as aligned `label: value` lines.
    pub fn plain_text(rows: &[ResultRow]) -> String {
        let width = rows.iter().map(|row| row.label.len()).max().unwrap_or(0) + 1;
        rows.iter()
            .map(|row| format!("{:<width$} {}", format!("{}:", row.label), row.value))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub fn format_currency(amount: f64) -> String {
    format!("{amount:.2} {CURRENCY}")
}

/// Formats a ratio as a percentage with one decimal place.
pub fn format_percent(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

fn format_years(age: u32) -> String {
    if age == 1 {
        "1 year".to_string()
    } else {
        format!("{age} years")
    }
}
