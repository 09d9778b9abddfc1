//! Export of decoded ticks.
//!
//! This crate provides exporters for writing decoded QCB ticks to
//! interchange formats:
//!
//! - [`CsvExporter`] - CSV or TSV
//! - [`JsonExporter`] - JSON array or NDJSON
//! - [`ParquetExporter`] - Apache Parquet columnar format

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/qcb/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod csv;
mod exporter;
mod json;

#[cfg(feature = "parquet")]
mod parquet;

pub use crate::csv::CsvExporter;
pub use exporter::{ExportError, ExportFormat, Exporter};
pub use json::{JsonExporter, JsonStyle};

#[cfg(feature = "parquet")]
pub use crate::parquet::ParquetExporter;
