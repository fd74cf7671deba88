//! Pricing services for instrument valuation.
//!
//! This module validates quote requests against the catalog and computes
//! the itemized price of a valid request. Both steps are pure: the same
//! request always produces the same outcome.

use super::catalog::Catalog;
use super::errors::ValidationError;
use super::models::{
    ConditionLabel, InstrumentCategory, Quote, QuoteBreakdown, QuoteRequest, WoodType, MAX_CONDITION,
};
use log::debug;

/// Uplift applied at the highest string count of a category.
pub const MAX_STRINGS_BONUS: f64 = 0.5;
/// Share of the price lost per year of age.
pub const AGE_DISCOUNT_PER_YEAR: f64 = 0.01;
/// Share of the price lost per condition point.
pub const CONDITION_PENALTY_PER_POINT: f64 = 0.01;

/// A request whose fields have all been checked and resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatedRequest<'a> {
    pub category: &'a InstrumentCategory,
    pub wood: &'a WoodType,
    pub string_count: u32,
    pub age: u32,
    pub condition: u32,
}

/// Validates requests and prices the valid ones.
///
/// # Examples
///
/// ```
/// use guitar_quote::domain::{Catalog, PricingEngine, QuoteRequest};
///
/// let catalog = Catalog::builtin();
/// let engine = PricingEngine::new(&catalog);
///
/// let quote = engine.quote(&QuoteRequest::complete("electric", "mahogany", 6, 5, 10)).unwrap();
/// assert_eq!(format!("{:.2}", quote.breakdown.final_price), "10260.00");
///
/// let missing = QuoteRequest { category_id: None, ..QuoteRequest::complete("", "maple", 6, 5, 10) };
/// assert!(engine.quote(&missing).is_err());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PricingEngine<'a> {
    catalog: &'a Catalog,
}

impl<'a> PricingEngine<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Checks a request, stopping at the first failing rule.
    ///
    /// Rules run in this order: category, wood, string count and age must
    /// be present; the ids must exist in the catalog; the age must not
    /// exceed the category maximum; the age must not be negative; the
    /// string count must belong to the category; the condition must lie
    /// in `0..=50`.
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationError`] of the first rule that fails.
    pub fn validate(&self, request: &QuoteRequest) -> Result<ValidatedRequest<'a>, ValidationError> {
        let category_id = present(request.category_id.as_deref()).ok_or(ValidationError::MissingCategory)?;
        let wood_id = present(request.wood_id.as_deref()).ok_or(ValidationError::MissingWood)?;
        let string_count = request.string_count.ok_or(ValidationError::MissingStringCount)?;
        let age = request.age.ok_or(ValidationError::MissingAge)?;

        let category = self
            .catalog
            .category_by_id(category_id)
            .map_err(|_| ValidationError::UnknownCategory(category_id.to_string()))?;
        let wood = self
            .catalog
            .wood_by_id(wood_id)
            .map_err(|_| ValidationError::UnknownWood(wood_id.to_string()))?;

        if let Some(max_age) = category.max_age {
            if i64::from(age) > i64::from(max_age) {
                return Err(ValidationError::AgeExceedsMax { max_age });
            }
        }
        let age = u32::try_from(age).map_err(|_| ValidationError::NegativeAge)?;

        if !category.supports_string_count(string_count) {
            return Err(ValidationError::UnsupportedStringCount {
                category: category.name.clone(),
                selected: string_count,
            });
        }

        let condition = u32::try_from(request.condition)
            .ok()
            .filter(|condition| *condition <= MAX_CONDITION)
            .ok_or(ValidationError::ConditionOutOfRange(request.condition))?;

        Ok(ValidatedRequest {
            category,
            wood,
            string_count,
            age,
            condition,
        })
    }

    /// Computes the itemized price of a validated request.
    ///
    /// The final price is clamped at zero; the individual fractions are
    /// reported as computed.
    pub fn compute(request: &ValidatedRequest<'_>) -> QuoteBreakdown {
        let base_price = request.category.base_price;
        let wood_multiplier = request.wood.multiplier;
        let strings_bonus = strings_bonus(request.category, request.string_count);
        let age_discount = AGE_DISCOUNT_PER_YEAR * f64::from(request.age);
        let condition_penalty = CONDITION_PENALTY_PER_POINT * f64::from(request.condition);

        let final_price = base_price
            * wood_multiplier
            * (1.0 + strings_bonus)
            * (1.0 - age_discount)
            * (1.0 - condition_penalty);

        QuoteBreakdown {
            base_price,
            wood_multiplier,
            strings_bonus,
            age_discount,
            condition_penalty,
            condition_label: ConditionLabel::from_score(request.condition as i32),
            final_price: final_price.max(0.0),
        }
    }

    /// Validates and prices a request in one step.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found; nothing is computed then.
    pub fn quote(&self, request: &QuoteRequest) -> Result<Quote, ValidationError> {
        let validated = match self.validate(request) {
            Ok(validated) => validated,
            Err(err) => {
                debug!("Rejected quote request {request:?}: {err}");
                return Err(err);
            }
        };

        let breakdown = Self::compute(&validated);
        debug!(
            "Priced {} / {} ({} strings, {} years, condition {}) at {:.2}",
            validated.category.id,
            validated.wood.id,
            validated.string_count,
            validated.age,
            validated.condition,
            breakdown.final_price
        );

        Ok(Quote {
            category_id: validated.category.id.clone(),
            category_name: validated.category.name.clone(),
            wood_id: validated.wood.id.clone(),
            wood_name: validated.wood.name.clone(),
            string_count: validated.string_count,
            age: validated.age,
            condition: validated.condition,
            breakdown,
        })
    }
}

/// Linear uplift from 0 at the category's lowest string count to
/// [`MAX_STRINGS_BONUS`] at its highest. Fixed-count categories get none.
pub fn strings_bonus(category: &InstrumentCategory, string_count: u32) -> f64 {
    match (category.min_strings(), category.max_strings()) {
        (Some(min), Some(max)) if min < max => {
            let span = f64::from(max - min);
            let offset = f64::from(string_count) - f64::from(min);
            MAX_STRINGS_BONUS * offset / span
        }
        _ => 0.0,
    }
}

fn present(id: Option<&str>) -> Option<&str> {
    id.filter(|id| !id.is_empty())
}
