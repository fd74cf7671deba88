//! Field dependency state machine for the valuation form.
//!
//! The form moves through three phases. `Empty` has no category, so the
//! string count, age and submit are disabled. `CategoryChosen` has a
//! category but no wood: string counts are offered, age and submit stay
//! disabled. `Ready` has both and enables everything.
//!
//! Enablement is a UI concern only. Every submit is validated again by the
//! pricing engine regardless of phase.

use crate::application::presenter::{ResultPresenter, SubmitOutcome};
use crate::domain::{Catalog, CatalogError, PricingEngine, QuoteRequest, ValidationError};
use log::{debug, warn};
use std::fmt;
use thiserror::Error;

/// Input fields of the form, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Category,
    Wood,
    StringCount,
    Age,
    Condition,
}

impl FormField {
    pub const ALL: [FormField; 5] = [
        FormField::Category,
        FormField::Wood,
        FormField::StringCount,
        FormField::Age,
        FormField::Condition,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Category => "Instrument",
            FormField::Wood => "Wood",
            FormField::StringCount => "Strings",
            FormField::Age => "Age (years)",
            FormField::Condition => "Condition (0-50)",
        }
    }

    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|field| *field == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        let index = Self::ALL.iter().position(|field| *field == self).unwrap_or(0);
        Self::ALL[(index + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Events raised by the UI layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    CategorySelected(String),
    CategoryCleared,
    WoodSelected(Option<String>),
    StringCountSelected(u32),
    AgeEntered(Option<i32>),
    ConditionChanged(i32),
    ResetRequested,
}

impl FormEvent {
    /// Fields whose value this event can change.
    pub fn touched_fields(&self) -> &'static [FormField] {
        match self {
            FormEvent::CategorySelected(_) | FormEvent::CategoryCleared => {
                &[FormField::Category, FormField::StringCount]
            }
            FormEvent::WoodSelected(_) => &[FormField::Wood],
            FormEvent::StringCountSelected(_) => &[FormField::StringCount],
            FormEvent::AgeEntered(_) => &[FormField::Age],
            FormEvent::ConditionChanged(_) => &[FormField::Condition],
            FormEvent::ResetRequested => &FormField::ALL,
        }
    }
}

/// Fields a user has to edit to get past a rejected submit.
///
/// The age limit depends on the category, so either one resolves it.
fn blamed_fields(err: &ValidationError) -> &'static [FormField] {
    match err {
        ValidationError::MissingCategory | ValidationError::UnknownCategory(_) => &[FormField::Category],
        ValidationError::MissingWood | ValidationError::UnknownWood(_) => &[FormField::Wood],
        ValidationError::MissingStringCount | ValidationError::UnsupportedStringCount { .. } => {
            &[FormField::StringCount]
        }
        ValidationError::MissingAge | ValidationError::NegativeAge => &[FormField::Age],
        ValidationError::AgeExceedsMax { .. } => &[FormField::Age, FormField::Category],
        ValidationError::ConditionOutOfRange(_) => &[FormField::Condition],
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("{0} is not available yet")]
    FieldDisabled(FormField),
    #[error("{category} instruments do not come with {selected} strings")]
    UnsupportedStringCount { category: String, selected: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Empty,
    CategoryChosen,
    Ready,
}

/// Selection state. A wood may be picked before the category, so `Empty`
/// still remembers it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormState {
    Empty {
        wood_id: Option<String>,
    },
    CategoryChosen {
        category_id: String,
        string_count: u32,
    },
    Ready {
        category_id: String,
        wood_id: String,
        string_count: u32,
    },
}

impl Default for FormState {
    fn default() -> Self {
        FormState::Empty { wood_id: None }
    }
}

impl FormState {
    pub fn phase(&self) -> FormPhase {
        match self {
            FormState::Empty { .. } => FormPhase::Empty,
            FormState::CategoryChosen { .. } => FormPhase::CategoryChosen,
            FormState::Ready { .. } => FormPhase::Ready,
        }
    }

    pub fn category_id(&self) -> Option<&str> {
        match self {
            FormState::Empty { .. } => None,
            FormState::CategoryChosen { category_id, .. } | FormState::Ready { category_id, .. } => {
                Some(category_id)
            }
        }
    }

    pub fn wood_id(&self) -> Option<&str> {
        match self {
            FormState::Empty { wood_id } => wood_id.as_deref(),
            FormState::CategoryChosen { .. } => None,
            FormState::Ready { wood_id, .. } => Some(wood_id),
        }
    }

    pub fn string_count(&self) -> Option<u32> {
        match self {
            FormState::Empty { .. } => None,
            FormState::CategoryChosen { string_count, .. } | FormState::Ready { string_count, .. } => {
                Some(*string_count)
            }
        }
    }

    /// Applies one event. Age and condition events do not change the
    /// selection state and pass through unchanged.
    ///
    /// # Errors
    ///
    /// Fails for ids unknown to the catalog, for a string count outside the
    /// chosen category, and for a string count picked before any category.
    pub fn transition(self, event: &FormEvent, catalog: &Catalog) -> Result<FormState, FormError> {
        match event {
            FormEvent::CategorySelected(id) => {
                let category = catalog.category_by_id(id)?;
                let string_count = category
                    .default_string_count()
                    .ok_or_else(|| CatalogError::NoStringCounts(category.id.clone()))?;
                let category_id = category.id.clone();

                Ok(match self.wood_id() {
                    Some(wood_id) => FormState::Ready {
                        category_id,
                        wood_id: wood_id.to_string(),
                        string_count,
                    },
                    None => FormState::CategoryChosen {
                        category_id,
                        string_count,
                    },
                })
            }
            FormEvent::CategoryCleared => Ok(FormState::Empty {
                wood_id: self.wood_id().map(str::to_string),
            }),
            FormEvent::WoodSelected(wood) => {
                if let Some(id) = wood {
                    catalog.wood_by_id(id)?;
                }
                Ok(match (self, wood) {
                    (FormState::Empty { .. }, wood) => FormState::Empty { wood_id: wood.clone() },
                    (
                        FormState::CategoryChosen { category_id, string_count }
                        | FormState::Ready { category_id, string_count, .. },
                        Some(wood_id),
                    ) => FormState::Ready {
                        category_id,
                        wood_id: wood_id.clone(),
                        string_count,
                    },
                    (
                        FormState::CategoryChosen { category_id, string_count }
                        | FormState::Ready { category_id, string_count, .. },
                        None,
                    ) => FormState::CategoryChosen { category_id, string_count },
                })
            }
            FormEvent::StringCountSelected(selected) => match self {
                FormState::Empty { .. } => Err(FormError::FieldDisabled(FormField::StringCount)),
                FormState::CategoryChosen { category_id, .. } => {
                    check_string_count(catalog, &category_id, *selected)?;
                    Ok(FormState::CategoryChosen {
                        category_id,
                        string_count: *selected,
                    })
                }
                FormState::Ready { category_id, wood_id, .. } => {
                    check_string_count(catalog, &category_id, *selected)?;
                    Ok(FormState::Ready {
                        category_id,
                        wood_id,
                        string_count: *selected,
                    })
                }
            },
            FormEvent::AgeEntered(_) | FormEvent::ConditionChanged(_) => Ok(self),
            FormEvent::ResetRequested => Ok(FormState::default()),
        }
    }
}

fn check_string_count(catalog: &Catalog, category_id: &str, selected: u32) -> Result<(), FormError> {
    let category = catalog.category_by_id(category_id)?;
    if category.supports_string_count(selected) {
        Ok(())
    } else {
        Err(FormError::UnsupportedStringCount {
            category: category.name.clone(),
            selected,
        })
    }
}

/// Which inputs the UI should currently accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldEnablement {
    pub string_count: bool,
    pub age: bool,
    pub submit: bool,
}

impl FieldEnablement {
    pub fn is_enabled(&self, field: FormField) -> bool {
        match field {
            FormField::Category | FormField::Wood | FormField::Condition => true,
            FormField::StringCount => self.string_count,
            FormField::Age => self.age,
        }
    }
}

/// Snapshot returned after every accepted event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    pub phase: FormPhase,
    pub string_options: Vec<u32>,
    pub selected_string_count: Option<u32>,
    pub enablement: FieldEnablement,
}

/// Per-session form state. Never share one controller between sessions.
///
/// # Examples
///
/// ```
/// use guitar_quote::application::{FormEvent, FormPhase, FormStateController};
/// use guitar_quote::domain::Catalog;
///
/// let catalog = Catalog::builtin();
/// let mut form = FormStateController::new(&catalog);
///
/// let view = form.handle(FormEvent::CategorySelected("electric".to_string())).unwrap();
/// assert_eq!(view.phase, FormPhase::CategoryChosen);
/// assert_eq!(view.string_options, vec![6, 7, 8]);
/// assert_eq!(view.selected_string_count, Some(6));
/// assert!(!view.enablement.submit);
///
/// let view = form.handle(FormEvent::WoodSelected(Some("maple".to_string()))).unwrap();
/// assert_eq!(view.phase, FormPhase::Ready);
/// assert!(view.enablement.submit);
/// ```
#[derive(Debug, Clone)]
pub struct FormStateController<'a> {
    catalog: &'a Catalog,
    state: FormState,
    age: Option<i32>,
    condition: i32,
    /// Error of the last rejected submit. Cleared once one of the fields it
    /// blames is edited.
    rejection: Option<ValidationError>,
}

impl<'a> FormStateController<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            state: FormState::default(),
            age: None,
            condition: 0,
            rejection: None,
        }
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn phase(&self) -> FormPhase {
        self.state.phase()
    }

    pub fn age(&self) -> Option<i32> {
        self.age
    }

    pub fn condition(&self) -> i32 {
        self.condition
    }

    /// Applies a UI event and returns the resulting view.
    ///
    /// A rejected event leaves the form untouched.
    ///
    /// # Errors
    ///
    /// Returns a [`FormError`] for unknown ids, unsupported string counts
    /// and edits to disabled fields.
    pub fn handle(&mut self, event: FormEvent) -> Result<FormView, FormError> {
        if matches!(event, FormEvent::AgeEntered(_)) && self.phase() != FormPhase::Ready {
            warn!("Ignoring age entry while the form is {:?}", self.phase());
            return Err(FormError::FieldDisabled(FormField::Age));
        }

        let touched = event.touched_fields();
        let next = match self.state.clone().transition(&event, self.catalog) {
            Ok(next) => next,
            Err(err) => {
                warn!("Rejected form event {event:?}: {err}");
                return Err(err);
            }
        };

        match event {
            FormEvent::AgeEntered(age) => self.age = age,
            FormEvent::ConditionChanged(condition) => self.condition = condition,
            FormEvent::ResetRequested => {
                self.age = None;
                self.condition = 0;
            }
            _ => {}
        }

        if next.phase() != self.phase() {
            debug!("Form moved from {:?} to {:?}", self.phase(), next.phase());
        }
        self.state = next;

        let resolved = self
            .rejection
            .as_ref()
            .is_some_and(|err| blamed_fields(err).iter().any(|field| touched.contains(field)));
        if resolved {
            debug!("Edit to {touched:?} lifts the submit block");
            self.rejection = None;
        }

        Ok(self.view())
    }

    pub fn enablement(&self) -> FieldEnablement {
        let phase = self.phase();
        FieldEnablement {
            string_count: phase != FormPhase::Empty,
            age: phase == FormPhase::Ready,
            submit: phase == FormPhase::Ready && !self.is_submit_blocked(),
        }
    }

    /// Whether the last submit was rejected and none of the fields it
    /// blamed have been edited since.
    pub fn is_submit_blocked(&self) -> bool {
        self.rejection.is_some()
    }

    pub fn view(&self) -> FormView {
        let string_options = self
            .state
            .category_id()
            .and_then(|id| self.catalog.category_by_id(id).ok())
            .map(|category| category.string_counts.clone())
            .unwrap_or_default();

        FormView {
            phase: self.phase(),
            string_options,
            selected_string_count: self.state.string_count(),
            enablement: self.enablement(),
        }
    }

    /// Builds a request from the current field values.
    pub fn request(&self) -> QuoteRequest {
        QuoteRequest {
            category_id: self.state.category_id().map(str::to_string),
            wood_id: self.state.wood_id().map(str::to_string),
            string_count: self.state.string_count(),
            age: self.age,
            condition: self.condition,
        }
    }

    /// Prices the current field values.
    pub fn submit(&mut self) -> SubmitOutcome {
        let request = self.request();
        self.submit_request(&request)
    }

    /// Prices an externally built request. A rejected request keeps submit
    /// disabled until a field named by the error is edited.
    pub fn submit_request(&mut self, request: &QuoteRequest) -> SubmitOutcome {
        let result = PricingEngine::new(self.catalog).quote(request);
        let outcome = ResultPresenter::present(&result);
        self.rejection = result.err();
        outcome
    }
}
