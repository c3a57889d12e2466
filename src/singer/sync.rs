use chrono::Utc;
use serde_json::Value;
use tracing::{info, warn};

use crate::constants::REVIEWS_STREAM;
use crate::error::Result;
use crate::singer::catalog::Catalog;
use crate::singer::sink::Sink;
use crate::singer::state::State;
use crate::wordpress::WordpressReviews;

/// Counts reported after a sync run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncStats {
    pub streams: usize,
    pub records: usize,
}

/// Sync every selected stream into `sink`.
///
/// Each record is written as soon as it is loaded. After all streams are
/// done a single state message carries the latest `date` per plugin,
/// merged over `state`.
///
/// # Errors
///
/// Any fetch, parse or write failure aborts the run.
pub async fn sync<S: Sink>(
    reviews: &mut WordpressReviews,
    catalog: &Catalog,
    mut state: State,
    sink: &mut S,
) -> Result<SyncStats> {
    info!("Sync");
    let mut stats = SyncStats::default();

    for stream in catalog.selected_streams() {
        if stream.tap_stream_id != REVIEWS_STREAM {
            warn!(stream = %stream.tap_stream_id, "Skipping unknown stream");
            continue;
        }
        info!(stream = %stream.tap_stream_id, "Syncing stream");
        stats.streams += 1;

        sink.write_schema(
            &stream.tap_stream_id,
            &stream.schema,
            &stream.key_properties,
            &stream.bookmark_properties(),
        )?;

        while let Some(record) = reviews.next_record().await? {
            if let (Some(Value::String(plugin)), Some(Value::String(date))) =
                (record.get("plugin"), record.get("date"))
            {
                state.advance(&stream.tap_stream_id, plugin, date);
            }
            sink.write_record(&stream.tap_stream_id, record, Utc::now())?;
            stats.records += 1;
        }
    }

    sink.write_state(&state)?;
    info!(
        streams = stats.streams,
        records = stats.records,
        "Sync complete"
    );
    Ok(stats)
}
