//! Export format abstraction.

use qcb_types::{QcbError, Tick};
use std::io::Write;
use thiserror::Error;

/// Export format identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExportFormat {
    /// CSV format.
    #[default]
    Csv,
    /// JSON array format.
    Json,
    /// Newline-delimited JSON format.
    Ndjson,
    /// Apache Parquet format.
    Parquet,
}

impl ExportFormat {
    /// Returns the file extension for this format.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Ndjson => "ndjson",
            Self::Parquet => "parquet",
        }
    }

    /// Returns all available formats.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Csv, Self::Json, Self::Ndjson, Self::Parquet]
    }

    /// Writes ticks with the default exporter for this format.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails, or [`ExportError::Unsupported`] for
    /// Parquet when the `parquet` feature is disabled.
    pub fn write_ticks<W: Write + Send>(
        &self,
        ticks: &[Tick],
        writer: W,
    ) -> Result<(), ExportError> {
        match self {
            Self::Csv => crate::CsvExporter::new().write_ticks(ticks, writer),
            Self::Json => crate::JsonExporter::new().write_ticks(ticks, writer),
            Self::Ndjson => crate::JsonExporter::ndjson().write_ticks(ticks, writer),
            #[cfg(feature = "parquet")]
            Self::Parquet => crate::ParquetExporter::new().write_ticks(ticks, writer),
            #[cfg(not(feature = "parquet"))]
            Self::Parquet => {
                drop(writer);
                Err(ExportError::Unsupported(*self))
            }
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "ndjson" | "jsonl" => Ok(Self::Ndjson),
            "parquet" | "pq" => Ok(Self::Parquet),
            _ => Err(ExportError::UnknownFormat(s.to_string())),
        }
    }
}

/// Errors that can occur during export.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Unknown export format.
    #[error("Unknown format: {0}")]
    UnknownFormat(String),

    /// Format not compiled into this build.
    #[error("Format not supported in this build: {0}")]
    Unsupported(ExportFormat),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Arrow/Parquet error.
    #[error("Parquet error: {0}")]
    Parquet(String),
}

impl From<ExportError> for QcbError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::Io(e) => Self::Io(e),
            ExportError::Json(e) => Self::Json(e),
            other => Self::Export(other.to_string()),
        }
    }
}

/// Trait for tick exporters.
pub trait Exporter: Send + Sync {
    /// Writes ticks to the output.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_ticks<W: Write + Send>(&self, ticks: &[Tick], writer: W) -> Result<(), ExportError>;

    /// Returns the file extension for this format.
    fn extension(&self) -> &str;
}
