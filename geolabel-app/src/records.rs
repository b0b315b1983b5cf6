//! Persistence of committed labels.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to write record to {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// One labelled location.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelRecord {
    pub longitude: f64,
    pub latitude: f64,
    pub label: String,
}

impl LabelRecord {
    /// `longitude,latitude,label`, quoting the label when it needs it.
    pub fn to_csv_row(&self) -> String {
        format!(
            "{},{},{}",
            self.longitude,
            self.latitude,
            csv_field(&self.label)
        )
    }
}

/// Sink for committed labels.
pub trait RecordWriter {
    fn append_record(&mut self, longitude: f64, latitude: f64, label: &str)
        -> Result<(), WriteError>;
}

/// Appends one CSV row per record to a file, creating it on first use.
#[derive(Debug, Clone)]
pub struct CsvRecordWriter {
    path: PathBuf,
}

impl CsvRecordWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordWriter for CsvRecordWriter {
    fn append_record(
        &mut self,
        longitude: f64,
        latitude: f64,
        label: &str,
    ) -> Result<(), WriteError> {
        let io_err = |source| WriteError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let row = LabelRecord {
            longitude,
            latitude,
            label: label.to_string(),
        }
        .to_csv_row();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(io_err)?;
        writeln!(file, "{row}").map_err(io_err)?;
        debug!("Appended record to {}", self.path.display());
        Ok(())
    }
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
