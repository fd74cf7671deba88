use thiserror::Error;

/// Reasons a quote request is rejected before any price is computed.
///
/// Every variant is an expected user-input condition. The display text is
/// the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please select an instrument category")]
    MissingCategory,
    #[error("Please select a wood type")]
    MissingWood,
    #[error("Please select a string count")]
    MissingStringCount,
    #[error("Please enter the instrument's age")]
    MissingAge,
    #[error("Unknown instrument category: {0}")]
    UnknownCategory(String),
    #[error("Unknown wood type: {0}")]
    UnknownWood(String),
    #[error("The maximum age for this instrument category is {max_age} years")]
    AgeExceedsMax { max_age: u32 },
    #[error("Age cannot be negative")]
    NegativeAge,
    #[error("{category} instruments do not come with {selected} strings")]
    UnsupportedStringCount { category: String, selected: u32 },
    #[error("Condition must be between 0 and 50, got {0}")]
    ConditionOutOfRange(i32),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("Unknown instrument category: {0}")]
    CategoryNotFound(String),
    #[error("Unknown wood type: {0}")]
    WoodNotFound(String),
    #[error("Duplicate catalog id: {0}")]
    DuplicateId(String),
    #[error("Instrument category {0} has no valid string counts")]
    NoStringCounts(String),
    #[error("Instrument category {0} must have a positive base price")]
    NonPositiveBasePrice(String),
    #[error("Wood type {0} must have a positive multiplier")]
    NonPositiveMultiplier(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;
