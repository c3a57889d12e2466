use std::collections::BTreeMap;
use std::path::Path;

use chrono::DateTime;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Latest replication-key value seen for one plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub date: String,
}

/// Singer state: `bookmarks.<stream>.<plugin>.date`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    #[serde(default)]
    pub bookmarks: BTreeMap<String, BTreeMap<String, Bookmark>>,
}

impl State {
    /// Read state from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    #[must_use]
    pub fn bookmark(&self, stream: &str, plugin: &str) -> Option<&str> {
        self.bookmarks
            .get(stream)?
            .get(plugin)
            .map(|bookmark| bookmark.date.as_str())
    }

    /// Record `date` for `plugin` unless an equal or later one is already kept.
    /// Dates that cannot be compared replace nothing that can.
    pub fn advance(&mut self, stream: &str, plugin: &str, date: &str) {
        let plugins = self.bookmarks.entry(stream.to_string()).or_default();
        let replace = plugins
            .get(plugin)
            .map_or(true, |current| is_later(date, &current.date));
        if replace {
            plugins.insert(
                plugin.to_string(),
                Bookmark {
                    date: date.to_string(),
                },
            );
        }
    }
}

fn is_later(candidate: &str, current: &str) -> bool {
    match (
        DateTime::parse_from_rfc3339(candidate),
        DateTime::parse_from_rfc3339(current),
    ) {
        (Ok(candidate), Ok(current)) => candidate > current,
        (Ok(_), Err(_)) => true,
        (Err(_), _) => false,
    }
}
