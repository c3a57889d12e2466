use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::REVIEWS_STREAM;
use crate::error::Result;

const REVIEWS_SCHEMA: &str = include_str!("../../schemas/reviews.json");

/// Singer catalog: the streams this tap can produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub streams: Vec<CatalogEntry>,
}

/// One stream in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub tap_stream_id: String,
    pub stream: String,
    pub schema: Value,
    #[serde(default)]
    pub key_properties: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected: Option<bool>,
    #[serde(default)]
    pub metadata: Vec<MetadataEntry>,
}

/// Breadcrumb-addressed stream metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataEntry {
    pub breadcrumb: Vec<String>,
    pub metadata: Value,
}

impl CatalogEntry {
    /// A stream is selected by its top-level flag or by `selected` in its
    /// stream-level (empty breadcrumb) metadata.
    #[must_use]
    pub fn is_selected(&self) -> bool {
        if self.selected == Some(true) {
            return true;
        }
        self.metadata
            .iter()
            .filter(|entry| entry.breadcrumb.is_empty())
            .any(|entry| entry.metadata.get("selected").and_then(Value::as_bool) == Some(true))
    }

    /// Bookmark properties declared for this stream.
    #[must_use]
    pub fn bookmark_properties(&self) -> Vec<String> {
        self.replication_key.iter().cloned().collect()
    }
}

impl Catalog {
    /// Read a catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a catalog.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    #[must_use]
    pub fn selected_streams(&self) -> Vec<&CatalogEntry> {
        self.streams.iter().filter(|s| s.is_selected()).collect()
    }

    #[must_use]
    pub fn stream(&self, tap_stream_id: &str) -> Option<&CatalogEntry> {
        self.streams.iter().find(|s| s.tap_stream_id == tap_stream_id)
    }
}

/// Build the catalog describing the `reviews` stream.
///
/// # Errors
///
/// Returns an error if the embedded schema is not valid JSON.
pub fn discover() -> Result<Catalog> {
    let schema: Value = serde_json::from_str(REVIEWS_SCHEMA)?;

    let metadata = vec![MetadataEntry {
        breadcrumb: Vec::new(),
        metadata: serde_json::json!({
            "selected": true,
            "inclusion": "available",
            "table-key-properties": ["path"],
            "forced-replication-method": "INCREMENTAL",
            "valid-replication-keys": ["date"],
        }),
    }];

    Ok(Catalog {
        streams: vec![CatalogEntry {
            tap_stream_id: REVIEWS_STREAM.to_string(),
            stream: REVIEWS_STREAM.to_string(),
            schema,
            key_properties: vec!["path".to_string()],
            replication_key: Some("date".to_string()),
            replication_method: Some("INCREMENTAL".to_string()),
            selected: Some(true),
            metadata,
        }],
    })
}
