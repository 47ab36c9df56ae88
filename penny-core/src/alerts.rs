//! Persistent log of budget alerts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::store::{self, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub message: String,
    pub raised_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct AlertLog {
    path: PathBuf,
}

impl AlertLog {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn alerts(&self) -> Result<Vec<Alert>> {
        Ok(store::read_json(&self.path)?.unwrap_or_default())
    }

    /// Append an alert to the log.
    pub fn raise(&self, message: impl Into<String>) -> Result<Alert> {
        let alert = Alert {
            message: message.into(),
            raised_at: Utc::now(),
        };
        let mut alerts = self.alerts()?;
        alerts.push(alert.clone());
        store::write_json(&self.path, &alerts)?;
        tracing::warn!(alert = %alert.message, "budget alert raised");
        Ok(alert)
    }
}
