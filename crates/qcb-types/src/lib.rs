//! Core types for the QCB binary tick format.
//!
//! This crate provides the fundamental data structures used throughout qcb:
//!
//! - [`Header`] - Stream header carrying the price and time scale
//! - [`Tick`] - A decoded bid/ask/volume observation
//! - [`TickKind`], [`Field`], [`FieldFlags`], [`WidthCode`], [`RecordOptions`] -
//!   Building blocks of a delta-encoded tick record
//! - [`FormatError`] and [`QcbError`] - Error types

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/qcb/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod header;
mod record;
mod tick;

pub use error::{FormatError, QcbError, Result};
pub use header::{FORMAT_VERSION, Header};
pub use record::{Field, FieldFlags, MAX_RECORD_SIZE, RecordOptions, TickKind, WidthCode};
pub use tick::Tick;

/// Re-exported so downstream crates agree on the decimal type.
pub use rust_decimal::Decimal;
