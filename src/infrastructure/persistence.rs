use crate::application::ResultRow;
use crate::domain::Quote;
use log::{info, warn};
use std::fs;

pub struct QuoteRepository;

impl QuoteRepository {
    /// Writes the quote as pretty-printed JSON and returns the filename.
    pub fn save_quote(quote: &Quote, filename: &str) -> Result<String, String> {
        let json = serde_json::to_string_pretty(quote).map_err(|e| format!("Serialization failed: {}", e))?;
        match fs::write(filename, json) {
            Ok(()) => {
                info!("Saved quote to {}", filename);
                Ok(filename.to_string())
            }
            Err(e) => {
                warn!("Could not write {}: {}", filename, e);
                Err(e.to_string())
            }
        }
    }

    /// Writes the result rows as a two-column CSV file.
    pub fn export_rows_csv(rows: &[ResultRow], filename: &str) -> Result<String, String> {
        let mut writer = csv::Writer::from_path(filename).map_err(|e| {
            warn!("Could not create {}: {}", filename, e);
            e.to_string()
        })?;

        writer.write_record(["field", "value"]).map_err(|e| e.to_string())?;
        for row in rows {
            writer
                .write_record([row.label, row.value.as_str()])
                .map_err(|e| e.to_string())?;
        }
        writer.flush().map_err(|e| e.to_string())?;

        info!("Exported {} rows to {}", rows.len(), filename);
        Ok(filename.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ResultPresenter;
    use crate::domain::{Catalog, PricingEngine, QuoteRequest};
    use tempfile::tempdir;

    fn sample_quote() -> Quote {
        let catalog = Catalog::builtin();
        PricingEngine::new(&catalog)
            .quote(&QuoteRequest::complete("electric", "maple", 6, 10, 10))
            .unwrap()
    }

    #[test]
    fn test_save_quote_writes_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("quote.json");
        let filename = path.to_str().unwrap();

        let result = QuoteRepository::save_quote(&sample_quote(), filename);
        assert_eq!(result, Ok(filename.to_string()));

        let content = fs::read_to_string(&path).unwrap();
        let json: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(json["category_id"], "electric");
        assert_eq!(json["wood_name"], "Maple");
        assert_eq!(json["age"], 10);
        assert_eq!(json["breakdown"]["condition_label"], "New");
        let price = json["breakdown"]["final_price"].as_f64().unwrap();
        assert!((price - 8910.0).abs() < 1e-6);
    }

    #[test]
    fn test_save_quote_reports_io_errors() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("quote.json");

        let result = QuoteRepository::save_quote(&sample_quote(), path.to_str().unwrap());
        assert!(result.is_err());
    }

    #[test]
    fn test_export_rows_csv() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("quote.csv");
        let filename = path.to_str().unwrap();
        let rows = ResultPresenter::rows(&sample_quote());

        let result = QuoteRepository::export_rows_csv(&rows, filename);
        assert_eq!(result, Ok(filename.to_string()));

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), rows.len() + 1);
        assert_eq!(lines[0], "field,value");
        assert_eq!(lines[1], "Instrument,Electric");
        assert_eq!(lines[11], "Estimated value,8910.00 UAH");
    }
}
