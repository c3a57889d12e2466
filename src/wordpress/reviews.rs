use serde_json::{Map, Value};
use tracing::info;

use crate::error::Result;
use crate::wordpress::client::WordpressClient;
use crate::wordpress::cursor::{Advance, ReviewCursor};

/// Pulls up to `number` reviews from each requested plugin in turn.
///
/// Plugins are drained one after another in request order; an exhausted
/// plugin ends early and the next one starts. Records are produced one at
/// a time as they are loaded.
#[derive(Debug)]
pub struct WordpressReviews {
    client: WordpressClient,
    plugins: Vec<String>,
    number: usize,
    current: usize,
    taken: usize,
    cursor: Option<ReviewCursor>,
}

impl WordpressReviews {
    #[must_use]
    pub fn new(client: WordpressClient, plugins: Vec<String>, number: usize) -> Self {
        Self {
            client,
            plugins,
            number,
            current: 0,
            taken: 0,
            cursor: None,
        }
    }

    #[must_use]
    pub fn plugins(&self) -> &[String] {
        &self.plugins
    }

    #[must_use]
    pub fn number(&self) -> usize {
        self.number
    }

    /// Next review record tagged with its `plugin`, or `None` once every
    /// plugin is done.
    ///
    /// # Errors
    ///
    /// Any fetch or parse failure aborts the whole run.
    pub async fn next_record(&mut self) -> Result<Option<Map<String, Value>>> {
        loop {
            let Some(plugin) = self.plugins.get(self.current).cloned() else {
                return Ok(None);
            };

            if self.taken >= self.number {
                self.finish_plugin(&plugin);
                continue;
            }

            let client = &self.client;
            let cursor = self
                .cursor
                .get_or_insert_with(|| ReviewCursor::new(client.clone(), plugin.clone()));

            match cursor.advance().await? {
                Advance::Review(review) => {
                    self.taken += 1;
                    let mut record = review.to_map()?;
                    record.insert("plugin".to_string(), Value::String(plugin));
                    return Ok(Some(record));
                }
                Advance::Exhausted => self.finish_plugin(&plugin),
            }
        }
    }

    fn finish_plugin(&mut self, plugin: &str) {
        info!(plugin, reviews = self.taken, "Finished plugin");
        self.current += 1;
        self.taken = 0;
        self.cursor = None;
    }
}
