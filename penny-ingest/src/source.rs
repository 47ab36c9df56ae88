//! Where raw SMS batches come from. Re-read on every call, never cached.

use penny_core::store;
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::types::RawMessage;

pub trait MessageSource {
    /// Fetch the current batch. An unreadable or malformed batch is an empty batch.
    fn fetch(&self) -> Vec<RawMessage>;
}

impl MessageSource for Vec<RawMessage> {
    fn fetch(&self) -> Vec<RawMessage> {
        self.clone()
    }
}

/// A JSON array of SMS records on disk.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MessageSource for JsonFileSource {
    fn fetch(&self) -> Vec<RawMessage> {
        let values = match store::read_json::<Vec<Value>>(&self.path) {
            Ok(Some(values)) => values,
            Ok(None) => {
                tracing::debug!(path = %self.path.display(), "no SMS file");
                return Vec::new();
            }
            Err(e) => {
                tracing::warn!(error = %e, "SMS file unreadable, treating batch as empty");
                return Vec::new();
            }
        };

        // Records that do not decode are dropped individually, not the whole batch.
        values
            .into_iter()
            .enumerate()
            .filter_map(|(index, value)| match serde_json::from_value::<RawMessage>(value) {
                Ok(raw) => Some(raw),
                Err(e) => {
                    tracing::debug!(index, error = %e, "skipping undecodable SMS record");
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_missing_file_is_empty_batch() {
        let dir = tempfile::tempdir().unwrap();
        assert!(JsonFileSource::new(dir.path().join("mock_sms.json")).fetch().is_empty());
    }

    #[test]
    fn test_malformed_file_is_empty_batch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mock_sms.json");
        fs::write(&path, "not json at all").unwrap();
        assert!(JsonFileSource::new(&path).fetch().is_empty());
    }

    #[test]
    fn test_bad_record_dropped_individually() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mock_sms.json");
        fs::write(
            &path,
            r#"[
                {"id": 1, "message": "Debit NGN500.00", "date": "2025-07-01", "source": "GTBank"},
                {"id": 2, "message": 42},
                "not an object",
                {"id": "3", "message": "Credit alert"}
            ]"#,
        )
        .unwrap();

        let batch = JsonFileSource::new(&path).fetch();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].key(), "1");
        assert_eq!(batch[0].source.as_deref(), Some("GTBank"));
        assert_eq!(batch[1].key(), "3");
    }
}
