//! Rust library for reading and writing QCB binary tick streams.
//!
//! This is a facade crate that re-exports functionality from the qcb
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```
//! use qcb_lib::prelude::*;
//! use rust_decimal_macros::dec;
//!
//! # fn main() -> qcb_lib::Result<()> {
//! let header = Header::new(dec!(0.0001), 1000)?;
//! let bytes = encode_all(
//!     &header,
//!     [
//!         (1000, dec!(1.1000), dec!(1.1002)),
//!         (2000, dec!(1.1000), dec!(1.1005)),
//!     ],
//! )?;
//!
//! let mut reader = ChunkedTickReader::new(bytes.as_slice(), ReaderConfig::default())?;
//! while let Some(tick) = reader.next_tick()? {
//!     println!("{} {} {}", tick.timestamp, tick.bid, tick.ask);
//! }
//! # Ok(())
//! # }
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/qcb/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use qcb_types::*;

// Re-export the codec
pub use qcb_codec::{
    ByteWindow, ChunkedTickReader, Decoded, EncodedRecord, QcbWriter, ReaderConfig,
    SequentialTickReader, TickDecoder, TickEncoder, decode_all, decode_header, encode_all,
    encode_header, read_header, record_len, write_header,
};

// Re-export exporters
#[cfg(feature = "export")]
pub use qcb_export::{CsvExporter, ExportError, ExportFormat, Exporter, JsonExporter, JsonStyle};

#[cfg(feature = "parquet")]
pub use qcb_export::ParquetExporter;

/// Prelude module for convenient imports.
///
/// ```
/// use qcb_lib::prelude::*;
/// ```
pub mod prelude {
    pub use qcb_types::{Decimal, FormatError, Header, QcbError, Result, Tick};

    pub use qcb_codec::{
        ChunkedTickReader, QcbWriter, ReaderConfig, SequentialTickReader, decode_all, encode_all,
    };

    #[cfg(feature = "export")]
    pub use qcb_export::{CsvExporter, ExportFormat, Exporter, JsonExporter};

    #[cfg(feature = "parquet")]
    pub use qcb_export::ParquetExporter;
}
