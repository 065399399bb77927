// src/storage/mod.rs
use std::fs;
use std::path::{Path, PathBuf};
use crate::extractors::features::Extraction;
use crate::scoring::RiskLabel;
use crate::utils::error::StorageError;

pub struct StorageManager {
    base_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager with the specified base directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        // Create the base directory if it doesn't exist
        if !base_path.exists() {
            fs::create_dir_all(&base_path)
                .map_err(StorageError::IoError)?;
        }

        Ok(Self { base_dir: base_path })
    }

    /// Directory for debug artifacts of one statement, created on demand
    pub fn debug_dir(&self, statement: &Path) -> Result<PathBuf, StorageError> {
        let dir = self.base_dir.join(format!("{}_debug", file_stem(statement)));
        fs::create_dir_all(&dir).map_err(StorageError::IoError)?;
        Ok(dir)
    }

    /// Saves the labeled financial report as JSON
    pub fn save_report(&self, statement: &Path, extraction: &Extraction) -> Result<PathBuf, StorageError> {
        let file_path = self.base_dir.join(format!("{}_report.json", file_stem(statement)));

        let report_str = serde_json::to_string_pretty(&extraction.report)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        fs::write(&file_path, report_str)
            .map_err(StorageError::IoError)?;

        tracing::info!("Saved report to {}", file_path.display());

        Ok(file_path)
    }

    /// Saves the prediction together with the features it was made from
    pub fn save_assessment(&self, statement: &Path, label: RiskLabel, extraction: &Extraction) -> Result<PathBuf, StorageError> {
        let file_path = self.base_dir.join(format!("{}_assessment.json", file_stem(statement)));

        let source_file = statement
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let metadata = serde_json::json!({
            "source_file": source_file,
            "label": label.code(),
            "prediction": label.message(),
            "features": extraction.features,
            "feature_columns": extraction.features.columns(),
            "feature_values": extraction.features.values(),
            "matched_lines": extraction.totals.matched_lines,
            "skipped_pages": extraction.totals.skipped_pages,
            "statement_period": extraction.totals.period,
            "extraction_timestamp": chrono::Utc::now().to_rfc3339(),
        });

        let metadata_str = serde_json::to_string_pretty(&metadata)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        fs::write(&file_path, metadata_str)
            .map_err(StorageError::IoError)?;

        tracing::info!("Saved assessment to {}", file_path.display());

        Ok(file_path)
    }

    /// Saves report and assessment. Either failing is an error.
    pub fn save_results(&self, statement: &Path, label: RiskLabel, extraction: &Extraction) -> Result<(PathBuf, PathBuf), StorageError> {
        let report_path = self.save_report(statement, extraction)?;
        let assessment_path = self.save_assessment(statement, label, extraction)?;
        Ok((report_path, assessment_path))
    }
}

fn file_stem(statement: &Path) -> String {
    statement
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "statement".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::features::StatementFeatureExtractor;

    fn temp_base(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("mpesa_risk_{}_{}", name, std::process::id()))
    }

    #[test]
    fn test_saves_report_and_assessment() {
        let base = temp_base("storage");
        let storage = StorageManager::new(&base).unwrap();
        assert!(base.is_dir(), "Base directory should be created");

        let extraction = StatementFeatureExtractor::new()
            .extract_text("01/02/2024 SALARY 10,000 CR\n02/02/2024 LOAN REPAYMENT 500 DR")
            .unwrap();
        let statement = Path::new("/uploads/jan_statement.pdf");

        let report_path = storage.save_report(statement, &extraction).unwrap();
        assert_eq!(report_path.file_name().unwrap(), "jan_statement_report.json");
        let report: serde_json::Value = serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
        assert_eq!(report["Total Income"], 10000.0);
        assert_eq!(report["Repayment History"], 1);

        let assessment_path = storage.save_assessment(statement, RiskLabel::Low, &extraction).unwrap();
        let assessment: serde_json::Value = serde_json::from_str(&fs::read_to_string(&assessment_path).unwrap()).unwrap();
        assert_eq!(assessment["source_file"], "jan_statement.pdf");
        assert_eq!(assessment["label"], 0);
        assert_eq!(assessment["prediction"], "Low Risk: Likely to Repay");
        assert_eq!(assessment["matched_lines"], 2);
        assert_eq!(assessment["feature_columns"][7], "Credit_Score_Indicator");
        assert_eq!(assessment["feature_values"][4], 1.0);
        assert!(assessment["extraction_timestamp"].is_string());

        let _ = fs::remove_dir_all(&base);
    }

    #[test]
    fn test_save_results_fails_when_report_cannot_be_written() {
        let base = temp_base("blocked");
        let storage = StorageManager::new(&base).unwrap();
        let extraction = StatementFeatureExtractor::new()
            .extract_text("01/02/2024 SALARY 10 CR")
            .unwrap();

        // A directory where the report file should go makes the write fail
        fs::create_dir_all(base.join("feb_report.json")).unwrap();

        let result = storage.save_results(Path::new("feb.pdf"), RiskLabel::Low, &extraction);
        assert!(matches!(result, Err(StorageError::IoError(_))), "Expected I/O error, got {:?}", result);
        assert!(!base.join("feb_assessment.json").exists(), "Assessment should not be written after a failed report");

        let _ = fs::remove_dir_all(&base);
    }

    #[test]
    fn test_save_results_writes_both_files() {
        let base = temp_base("both");
        let storage = StorageManager::new(&base).unwrap();
        let extraction = StatementFeatureExtractor::new()
            .extract_text("01/02/2024 SALARY 10 CR")
            .unwrap();

        let (report, assessment) = storage.save_results(Path::new("feb.pdf"), RiskLabel::High, &extraction).unwrap();
        assert!(report.is_file());
        assert!(assessment.is_file());

        let _ = fs::remove_dir_all(&base);
    }

    #[test]
    fn test_debug_dir_named_after_statement() {
        let base = temp_base("debug_dir");
        let storage = StorageManager::new(&base).unwrap();
        let dir = storage.debug_dir(Path::new("march.txt")).unwrap();
        assert!(dir.is_dir());
        assert!(dir.ends_with("march_debug"));
        let _ = fs::remove_dir_all(&base);
    }
}
