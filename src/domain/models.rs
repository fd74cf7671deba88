use serde::{Deserialize, Serialize};
use std::fmt;

/// Worst possible condition score. Zero is pristine.
pub const MAX_CONDITION: u32 = 50;

/// An instrument type with its own pricing parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentCategory {
    pub id: String,
    pub name: String,
    pub base_price: f64,
    /// Valid string counts in ascending order.
    pub string_counts: Vec<u32>,
    /// Oldest accepted instrument in years, `None` when unbounded.
    pub max_age: Option<u32>,
}

impl InstrumentCategory {
    /// Creates a category, sorting and deduplicating the string counts.
    pub fn new(id: &str, name: &str, base_price: f64, string_counts: &[u32], max_age: Option<u32>) -> Self {
        let mut string_counts = string_counts.to_vec();
        string_counts.sort_unstable();
        string_counts.dedup();

        Self {
            id: id.to_string(),
            name: name.to_string(),
            base_price,
            string_counts,
            max_age,
        }
    }

    pub fn min_strings(&self) -> Option<u32> {
        self.string_counts.first().copied()
    }

    pub fn max_strings(&self) -> Option<u32> {
        self.string_counts.last().copied()
    }

    /// String count preselected when the category is chosen.
    pub fn default_string_count(&self) -> Option<u32> {
        self.min_strings()
    }

    pub fn supports_string_count(&self, count: u32) -> bool {
        self.string_counts.contains(&count)
    }

    /// True when the category only ships with one string count.
    pub fn has_fixed_string_count(&self) -> bool {
        self.min_strings() == self.max_strings()
    }
}

/// A wood type and its effect on the base price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WoodType {
    pub id: String,
    pub name: String,
    /// Scalar applied to the base price. Values below 1 are discount woods.
    pub multiplier: f64,
}

impl WoodType {
    pub fn new(id: &str, name: &str, multiplier: f64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            multiplier,
        }
    }
}

/// Raw form input for a single valuation attempt.
///
/// Fields are optional because the form can be submitted half filled;
/// the pricing engine rejects incomplete requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub category_id: Option<String>,
    pub wood_id: Option<String>,
    pub string_count: Option<u32>,
    pub age: Option<i32>,
    pub condition: i32,
}

impl QuoteRequest {
    /// Builds a request with every field filled in.
    ///
    /// # Examples
    ///
    /// ```
    /// use guitar_quote::domain::QuoteRequest;
    ///
    /// let request = QuoteRequest::complete("electric", "mahogany", 6, 5, 10);
    /// assert_eq!(request.category_id.as_deref(), Some("electric"));
    /// assert_eq!(request.age, Some(5));
    /// ```
    pub fn complete(category_id: &str, wood_id: &str, string_count: u32, age: i32, condition: i32) -> Self {
        Self {
            category_id: Some(category_id.to_string()),
            wood_id: Some(wood_id.to_string()),
            string_count: Some(string_count),
            age: Some(age),
            condition,
        }
    }
}

/// Display label derived from the condition score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionLabel {
    New,
    Excellent,
    VeryGood,
    Good,
    Poor,
}

impl ConditionLabel {
    /// Maps a score to its band. Each band includes its upper bound.
    pub fn from_score(score: i32) -> Self {
        match score {
            ..=10 => ConditionLabel::New,
            11..=20 => ConditionLabel::Excellent,
            21..=30 => ConditionLabel::VeryGood,
            31..=40 => ConditionLabel::Good,
            _ => ConditionLabel::Poor,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionLabel::New => "New",
            ConditionLabel::Excellent => "Excellent",
            ConditionLabel::VeryGood => "Very good",
            ConditionLabel::Good => "Good",
            ConditionLabel::Poor => "Poor",
        }
    }
}

impl fmt::Display for ConditionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Itemized price computed for a validated request.
///
/// Fractions are stored as plain ratios (0.05 is five percent).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuoteBreakdown {
    pub base_price: f64,
    pub wood_multiplier: f64,
    pub strings_bonus: f64,
    pub age_discount: f64,
    pub condition_penalty: f64,
    pub condition_label: ConditionLabel,
    pub final_price: f64,
}

/// A priced instrument: the validated inputs next to their breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub category_id: String,
    pub category_name: String,
    pub wood_id: String,
    pub wood_name: String,
    pub string_count: u32,
    pub age: u32,
    pub condition: u32,
    pub breakdown: QuoteBreakdown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_sorts_and_dedups_string_counts() {
        let category = InstrumentCategory::new("harp", "Harp", 100.0, &[8, 6, 7, 6], None);
        assert_eq!(category.string_counts, vec![6, 7, 8]);
        assert_eq!(category.min_strings(), Some(6));
        assert_eq!(category.max_strings(), Some(8));
        assert_eq!(category.default_string_count(), Some(6));
        assert!(!category.has_fixed_string_count());
    }

    #[test]
    fn test_single_string_count_is_fixed() {
        let category = InstrumentCategory::new("ukulele", "Ukulele", 3000.0, &[4], Some(40));
        assert!(category.has_fixed_string_count());
        assert!(category.supports_string_count(4));
        assert!(!category.supports_string_count(6));
    }

    #[test]
    fn test_condition_label_bands() {
        assert_eq!(ConditionLabel::from_score(0), ConditionLabel::New);
        assert_eq!(ConditionLabel::from_score(10), ConditionLabel::New);
        assert_eq!(ConditionLabel::from_score(11), ConditionLabel::Excellent);
        assert_eq!(ConditionLabel::from_score(20), ConditionLabel::Excellent);
        assert_eq!(ConditionLabel::from_score(21), ConditionLabel::VeryGood);
        assert_eq!(ConditionLabel::from_score(30), ConditionLabel::VeryGood);
        assert_eq!(ConditionLabel::from_score(31), ConditionLabel::Good);
        assert_eq!(ConditionLabel::from_score(40), ConditionLabel::Good);
        assert_eq!(ConditionLabel::from_score(41), ConditionLabel::Poor);
        assert_eq!(ConditionLabel::from_score(50), ConditionLabel::Poor);
    }

    #[test]
    fn test_condition_label_text() {
        assert_eq!(ConditionLabel::VeryGood.to_string(), "Very good");
        assert_eq!(ConditionLabel::Poor.as_str(), "Poor");
    }

    #[test]
    fn test_quote_request_default_is_empty() {
        let request = QuoteRequest::default();
        assert!(request.category_id.is_none());
        assert!(request.wood_id.is_none());
        assert!(request.string_count.is_none());
        assert!(request.age.is_none());
        assert_eq!(request.condition, 0);
    }
}
