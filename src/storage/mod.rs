// src/storage/mod.rs
//
// Output layout: one JSON file per document under its namespace directory,
// `<id>_error.json` for failed conversions, plus a run-level report.json with
// counts and failure summaries.

use crate::schema::ConvertedDocument;
use crate::utils::error::{MigrationError, StorageError};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

pub struct StorageManager {
    base: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct FailureRecord {
    pub id: u64,
    pub namespace: String,
    pub code: String,
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RunReport {
    pub generated_at: String,
    pub total: usize,
    pub succeeded: usize,
    pub warnings: usize,
    pub failed: usize,
    pub failures: Vec<FailureRecord>,
}

impl RunReport {
    pub fn new() -> Self {
        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            total: 0,
            succeeded: 0,
            warnings: 0,
            failed: 0,
            failures: Vec::new(),
        }
    }
}

impl Default for RunReport {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageManager {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn save_document(
        &self,
        namespace: &str,
        id: u64,
        doc: &ConvertedDocument,
    ) -> Result<PathBuf, StorageError> {
        let path = self.namespace_dir(namespace)?.join(format!("{}.json", id));
        write_json(&path, doc)?;
        tracing::debug!(path = %path.display(), "Saved converted document");
        Ok(path)
    }

    pub fn save_failure(
        &self,
        namespace: &str,
        id: u64,
        error: &MigrationError,
    ) -> Result<PathBuf, StorageError> {
        let path = self.namespace_dir(namespace)?.join(format!("{}_error.json", id));
        let record = serde_json::json!({
            "code": error.code,
            "message": error.message,
            "fragment": error.fragment,
        });
        write_json(&path, &record)?;
        Ok(path)
    }

    pub fn save_report(&self, report: &RunReport) -> Result<PathBuf, StorageError> {
        fs::create_dir_all(&self.base)?;
        let path = self.base.join("report.json");
        write_json(&path, report)?;
        tracing::info!(path = %path.display(), "Saved run report");
        Ok(path)
    }

    fn namespace_dir(&self, namespace: &str) -> Result<PathBuf, StorageError> {
        let dir = self.base.join(namespace);
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|e| StorageError::SerializationError(e.to_string()))?;
    fs::write(path, rendered)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::BuildMode;
    use crate::walker::convert_document;
    use crate::utils::error::ErrorCode;

    fn temp_base(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("lp_migrator_storage_{}", name));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn document_is_saved_under_namespace() {
        let base = temp_base("doc");
        let storage = StorageManager::new(&base);
        let doc = convert_document("<h1>T</h1><p>x</p>", BuildMode::Strict).unwrap();
        let path = storage.save_document("health-insurance", 42, &doc).unwrap();
        assert_eq!(path, base.join("health-insurance").join("42.json"));
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"title\": \"T\""));
    }

    #[test]
    fn failure_record_carries_code_and_fragment() {
        let base = temp_base("fail");
        let storage = StorageManager::new(&base);
        let err = convert_document("<object></object>", BuildMode::Strict).unwrap_err();
        let path = storage.save_failure("car-insurance", 7, &err).unwrap();
        assert!(path.ends_with("car-insurance/7_error.json"));
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("UNKNOWN_TAG"));
        assert_eq!(err.code, ErrorCode::UnknownTag);
    }

    #[test]
    fn report_is_written_at_base_root() {
        let base = temp_base("report");
        let storage = StorageManager::new(&base);
        let mut report = RunReport::new();
        report.total = 3;
        report.succeeded = 2;
        report.failed = 1;
        let path = storage.save_report(&report).unwrap();
        assert_eq!(path, base.join("report.json"));
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"total\": 3"));
    }
}
