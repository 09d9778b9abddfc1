//! Delta tick codec and streaming readers for the QCB binary tick format.
//!
//! This crate provides the encode/decode pipeline:
//!
//! - [`header`] - Fixed-layout stream header codec
//! - [`TickEncoder`] / [`TickDecoder`] - Stateful per-record delta codec
//! - [`ChunkedTickReader`] - Decodes from an `io::Read` in fixed-size chunks
//! - [`SequentialTickReader`] - Decodes a stream held in memory
//! - [`QcbWriter`] - Writes a stream

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/qcb/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod delta;
pub mod header;
mod sequential;
mod stream;
mod window;
mod writer;

pub use config::ReaderConfig;
pub use delta::{Decoded, EncodedRecord, TickDecoder, TickEncoder, record_len};
pub use header::{decode_header, encode_header, read_header, write_header};
pub use sequential::{SequentialTickReader, decode_all};
pub use stream::ChunkedTickReader;
pub use window::ByteWindow;
pub use writer::{QcbWriter, encode_all};
