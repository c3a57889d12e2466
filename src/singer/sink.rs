use std::io::Write;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Map, Value};

use crate::error::Result;
use crate::singer::state::State;

/// Destination for schema, record and state messages.
pub trait Sink {
    /// Declare the schema of a stream before any of its records.
    ///
    /// # Errors
    ///
    /// Returns an error if the message cannot be written.
    fn write_schema(
        &mut self,
        stream: &str,
        schema: &Value,
        key_properties: &[String],
        bookmark_properties: &[String],
    ) -> Result<()>;

    /// Emit one record.
    ///
    /// # Errors
    ///
    /// Returns an error if the message cannot be written.
    fn write_record(
        &mut self,
        stream: &str,
        record: Map<String, Value>,
        time_extracted: DateTime<Utc>,
    ) -> Result<()>;

    /// Emit the current bookmarks.
    ///
    /// # Errors
    ///
    /// Returns an error if the message cannot be written.
    fn write_state(&mut self, state: &State) -> Result<()>;
}

/// Writes Singer messages as newline-delimited JSON.
#[derive(Debug)]
pub struct SingerWriter<W: Write> {
    out: W,
}

impl<W: Write> SingerWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, message: &Value) -> Result<()> {
        serde_json::to_writer(&mut self.out, message)?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> Sink for SingerWriter<W> {
    fn write_schema(
        &mut self,
        stream: &str,
        schema: &Value,
        key_properties: &[String],
        bookmark_properties: &[String],
    ) -> Result<()> {
        let mut message = json!({
            "type": "SCHEMA",
            "stream": stream,
            "schema": schema,
            "key_properties": key_properties,
        });
        if !bookmark_properties.is_empty() {
            message["bookmark_properties"] = json!(bookmark_properties);
        }
        self.emit(&message)
    }

    fn write_record(
        &mut self,
        stream: &str,
        record: Map<String, Value>,
        time_extracted: DateTime<Utc>,
    ) -> Result<()> {
        self.emit(&json!({
            "type": "RECORD",
            "stream": stream,
            "record": record,
            "time_extracted": time_extracted.to_rfc3339_opts(SecondsFormat::Micros, true),
        }))
    }

    fn write_state(&mut self, state: &State) -> Result<()> {
        self.emit(&json!({
            "type": "STATE",
            "value": state,
        }))
    }
}
