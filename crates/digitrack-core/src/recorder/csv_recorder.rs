use crate::{CoreResult, SessionRecord, TrackerError, recorder::SessionRecorder};

use std::{
    fs::{self, OpenOptions},
    panic::Location,
    path::{Path, PathBuf},
};

use csv::{Terminator, WriterBuilder};
use error_location::ErrorLocation;
use tracing::{debug, info, instrument};

/// Header row written when the file is first created.
pub const CSV_HEADER: [&str; 4] = ["Production Order", "Total Time (HH:MM:SS)", "From", "To"];

/// Appends session records to a comma-delimited file.
///
/// The file and its parent directory are created on first use. Existing
/// rows are never rewritten.
#[derive(Debug, Clone)]
pub struct CsvRecorder {
    path: PathBuf,
}

impl CsvRecorder {
    /// Recorder targeting `path`.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Target file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[track_caller]
    fn storage_error(&self, source: std::io::Error) -> TrackerError {
        TrackerError::StorageIo {
            path: self.path.clone(),
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl SessionRecorder for CsvRecorder {
    #[instrument(skip(self, record), fields(path = ?self.path, session_id = %record.session_id))]
    fn record(&self, record: &SessionRecord) -> CoreResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| self.storage_error(e))?;
                debug!(dir = ?parent, "Created storage directory");
            }
        }

        let needs_header = fs::metadata(&self.path)
            .map(|m| m.len() == 0)
            .unwrap_or(true);

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.storage_error(e))?;

        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .terminator(Terminator::CRLF)
            .from_writer(file);

        if needs_header {
            writer
                .write_record(CSV_HEADER)
                .map_err(|e| self.storage_error(e.into()))?;
        }

        writer
            .write_record([
                record.order_id.as_str(),
                record.formatted_duration().as_str(),
                record.formatted_start().as_str(),
                record.formatted_stop().as_str(),
            ])
            .map_err(|e| self.storage_error(e.into()))?;

        writer.flush().map_err(|e| self.storage_error(e))?;

        info!(
            order_id = %record.order_id,
            total_time = %record.formatted_duration(),
            "Session record appended"
        );

        Ok(())
    }

    fn target(&self) -> String {
        self.path.display().to_string()
    }
}
