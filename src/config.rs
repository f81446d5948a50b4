use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::export::EXPORT_FILE_NAME;
use crate::data::model::{
    CLIENT_ID, DOCUMENTS_CREATED, MRN_CREATED, PAYMENT_RECEIVED, PICK_UP_STATUS,
    QUANTITY_CONFIRMED, QUANTITY_SENT, TRANSFER_ACTIVATED,
};

/// Settings file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "luxvers_dashboard.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("reading {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("parsing {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// What to load and which columns drive the filters and the summary.
/// Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub title: String,
    /// Path or URL loaded at startup.
    pub source: Option<String>,
    /// Columns offered as multiselect filters.
    pub filter_columns: Vec<String>,
    /// Columns tallied in the status summary, in display order.
    pub status_columns: Vec<String>,
    /// Numeric columns whose totals are shown when present.
    pub quantity_columns: Vec<String>,
    pub export_file_name: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: "Luxvers Supplier Order Tracking Dashboard".to_string(),
            source: Some("luxvers_order_tracking_cleaned.csv".to_string()),
            filter_columns: strings(&[CLIENT_ID, PICK_UP_STATUS, TRANSFER_ACTIVATED]),
            status_columns: strings(&[
                TRANSFER_ACTIVATED,
                DOCUMENTS_CREATED,
                PAYMENT_RECEIVED,
                MRN_CREATED,
                PICK_UP_STATUS,
            ]),
            quantity_columns: strings(&[QUANTITY_SENT, QUANTITY_CONFIRMED]),
            export_file_name: EXPORT_FILE_NAME.to_string(),
        }
    }
}

fn strings(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

impl DashboardConfig {
    /// Read the config from `path`; a missing file means defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.display().to_string(),
                    source,
                })
            }
        };
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = DashboardConfig::load(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.status_columns.len(), 5);
        assert_eq!(config.export_file_name, "luxvers_filtered_orders.csv");
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(
            &path,
            r#"{ "source": "https://docs.example.com/export?format=csv", "filter_columns": ["CLIENT ID"] }"#,
        )
        .unwrap();
        let config = DashboardConfig::load(&path).unwrap();
        assert_eq!(
            config.source.as_deref(),
            Some("https://docs.example.com/export?format=csv")
        );
        assert_eq!(config.filter_columns, vec![CLIENT_ID.to_string()]);
        assert_eq!(config.status_columns, DashboardConfig::default().status_columns);
    }

    #[test]
    fn invalid_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            DashboardConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
