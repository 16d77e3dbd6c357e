mod csv_recorder;

use crate::{CoreResult, SessionRecord};

pub use csv_recorder::{CSV_HEADER, CsvRecorder};

/// Durable, append-only store for finalized sessions.
pub trait SessionRecorder: Send + Sync {
    /// Append one record. Storage failures are surfaced, never retried.
    fn record(&self, record: &SessionRecord) -> CoreResult<()>;

    /// Human-readable storage target (reported to API callers).
    fn target(&self) -> String;
}
