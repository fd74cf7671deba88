//! Reference tables of instrument categories and wood types.
//!
//! The catalog is built once at startup and only ever read afterwards.
//! Entries keep their insertion order, which is the order used to populate
//! selection lists.

use super::errors::{CatalogError, CatalogResult};
use super::models::{InstrumentCategory, WoodType};
use std::collections::HashSet;

/// Immutable lookup tables for categories and woods.
///
/// # Examples
///
/// ```
/// use guitar_quote::domain::Catalog;
///
/// let catalog = Catalog::builtin();
/// let bass = catalog.category_by_id("bass").unwrap();
/// assert_eq!(bass.max_age, Some(80));
/// assert!(catalog.wood_by_id("bamboo").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Catalog {
    categories: Vec<InstrumentCategory>,
    woods: Vec<WoodType>,
}

impl Catalog {
    /// Builds a catalog from the given tables after checking them.
    ///
    /// String counts are sorted ascending and deduplicated, so the first
    /// entry is always the lowest count.
    ///
    /// # Errors
    ///
    /// Fails on duplicate ids, categories without string counts, and
    /// non-positive prices or multipliers.
    pub fn new(mut categories: Vec<InstrumentCategory>, woods: Vec<WoodType>) -> CatalogResult<Self> {
        for category in &mut categories {
            category.string_counts.sort_unstable();
            category.string_counts.dedup();
        }

        let mut seen = HashSet::new();
        for category in &categories {
            if !seen.insert(category.id.as_str()) {
                return Err(CatalogError::DuplicateId(category.id.clone()));
            }
            if category.string_counts.is_empty() {
                return Err(CatalogError::NoStringCounts(category.id.clone()));
            }
            if !(category.base_price > 0.0) {
                return Err(CatalogError::NonPositiveBasePrice(category.id.clone()));
            }
        }

        let mut seen = HashSet::new();
        for wood in &woods {
            if !seen.insert(wood.id.as_str()) {
                return Err(CatalogError::DuplicateId(wood.id.clone()));
            }
            if !(wood.multiplier > 0.0) {
                return Err(CatalogError::NonPositiveMultiplier(wood.id.clone()));
            }
        }

        Ok(Self { categories, woods })
    }

    /// The tables shipped with the application.
    pub fn builtin() -> Self {
        Self {
            categories: vec![
                InstrumentCategory::new("electric", "Electric", 10000.0, &[6, 7, 8], Some(80)),
                InstrumentCategory::new("acoustic", "Acoustic", 6000.0, &[6], None),
                InstrumentCategory::new("bass", "Bass", 8000.0, &[4, 5], Some(80)),
                InstrumentCategory::new("ukulele", "Ukulele", 3000.0, &[4], Some(40)),
            ],
            woods: vec![
                WoodType::new("mahogany", "Mahogany", 1.2),
                WoodType::new("maple", "Maple", 1.1),
                WoodType::new("oak", "Oak", 0.8),
                WoodType::new("cedar", "Cedar", 0.9),
                WoodType::new("rosewood", "Rosewood", 1.05),
                WoodType::new("spruce", "Spruce", 1.15),
            ],
        }
    }

    pub fn category_by_id(&self, id: &str) -> CatalogResult<&InstrumentCategory> {
        self.categories
            .iter()
            .find(|category| category.id == id)
            .ok_or_else(|| CatalogError::CategoryNotFound(id.to_string()))
    }

    pub fn wood_by_id(&self, id: &str) -> CatalogResult<&WoodType> {
        self.woods
            .iter()
            .find(|wood| wood.id == id)
            .ok_or_else(|| CatalogError::WoodNotFound(id.to_string()))
    }

    pub fn categories(&self) -> &[InstrumentCategory] {
        &self.categories
    }

    pub fn woods(&self) -> &[WoodType] {
        &self.woods
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_passes_validation() {
        let builtin = Catalog::builtin();
        let rebuilt = Catalog::new(builtin.categories().to_vec(), builtin.woods().to_vec());
        assert!(rebuilt.is_ok());
    }

    #[test]
    fn test_builtin_enumeration_order() {
        let catalog = Catalog::builtin();
        let category_ids: Vec<&str> = catalog.categories().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(category_ids, vec!["electric", "acoustic", "bass", "ukulele"]);

        let wood_ids: Vec<&str> = catalog.woods().iter().map(|w| w.id.as_str()).collect();
        assert_eq!(wood_ids, vec!["mahogany", "maple", "oak", "cedar", "rosewood", "spruce"]);
    }

    #[test]
    fn test_category_lookup() {
        let catalog = Catalog::builtin();
        let electric = catalog.category_by_id("electric").unwrap();
        assert_eq!(electric.base_price, 10000.0);
        assert_eq!(electric.string_counts, vec![6, 7, 8]);
        assert_eq!(electric.max_age, Some(80));

        let acoustic = catalog.category_by_id("acoustic").unwrap();
        assert_eq!(acoustic.max_age, None);

        assert_eq!(
            catalog.category_by_id("banjo"),
            Err(CatalogError::CategoryNotFound("banjo".to_string()))
        );
    }

    #[test]
    fn test_wood_lookup() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.wood_by_id("oak").unwrap().multiplier, 0.8);
        assert_eq!(catalog.wood_by_id("spruce").unwrap().multiplier, 1.15);
        assert_eq!(
            catalog.wood_by_id("bamboo"),
            Err(CatalogError::WoodNotFound("bamboo".to_string()))
        );
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let categories = vec![
            InstrumentCategory::new("bass", "Bass", 8000.0, &[4, 5], Some(80)),
            InstrumentCategory::new("bass", "Other bass", 7000.0, &[4], None),
        ];
        let result = Catalog::new(categories, Vec::new());
        assert_eq!(result.unwrap_err(), CatalogError::DuplicateId("bass".to_string()));

        let woods = vec![WoodType::new("oak", "Oak", 0.8), WoodType::new("oak", "Red oak", 0.85)];
        let result = Catalog::new(Vec::new(), woods);
        assert_eq!(result.unwrap_err(), CatalogError::DuplicateId("oak".to_string()));
    }

    #[test]
    fn test_rejects_empty_string_counts() {
        let categories = vec![InstrumentCategory::new("lyre", "Lyre", 500.0, &[], None)];
        let result = Catalog::new(categories, Vec::new());
        assert_eq!(result.unwrap_err(), CatalogError::NoStringCounts("lyre".to_string()));
    }

    #[test]
    fn test_normalizes_unsorted_string_counts() {
        let categories = vec![InstrumentCategory {
            id: "electric".to_string(),
            name: "Electric".to_string(),
            base_price: 10000.0,
            string_counts: vec![8, 6, 7, 6],
            max_age: Some(80),
        }];
        let catalog = Catalog::new(categories, Vec::new()).unwrap();
        let electric = catalog.category_by_id("electric").unwrap();

        assert_eq!(electric.string_counts, vec![6, 7, 8]);
        assert_eq!(electric.default_string_count(), Some(6));
        assert!(!electric.has_fixed_string_count());
        assert_eq!(crate::domain::strings_bonus(electric, 6), 0.0);
        assert_eq!(crate::domain::strings_bonus(electric, 8), 0.5);
    }

    #[test]
    fn test_rejects_non_positive_prices() {
        let categories = vec![InstrumentCategory::new("free", "Free", 0.0, &[6], None)];
        assert_eq!(
            Catalog::new(categories, Vec::new()).unwrap_err(),
            CatalogError::NonPositiveBasePrice("free".to_string())
        );

        let woods = vec![WoodType::new("void", "Void", -1.0)];
        assert_eq!(
            Catalog::new(Vec::new(), woods).unwrap_err(),
            CatalogError::NonPositiveMultiplier("void".to_string())
        );
    }
}
