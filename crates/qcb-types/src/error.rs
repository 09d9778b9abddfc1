//! Error types for qcb.

use rust_decimal::Decimal;
use thiserror::Error;

/// Result type alias for qcb operations.
pub type Result<T> = std::result::Result<T, QcbError>;

/// Errors caused by bytes that do not form a valid QCB stream.
///
/// Every variant is terminal for the stream it was raised on: the delta state
/// cannot be resynchronized once a record has been misread.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// Fewer bytes than the fixed header size were available.
    #[error("Truncated header: {available} bytes available (expected {expected})")]
    TruncatedHeader {
        /// Bytes that were available.
        available: usize,
        /// Size of a complete header.
        expected: usize,
    },

    /// The header violates an invariant (non-positive tick size or time slice).
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// A record's kind bits are not `Bid | Ask`.
    #[error("Invalid tick kind: {0:#04b}")]
    InvalidTickKind(u8),

    /// A width code outside `0..=3`.
    #[error("Invalid width code: {0}")]
    InvalidWidthCode(u8),

    /// The stream ended inside a record.
    #[error("Truncated record: stream ended with {pending} unconsumed bytes")]
    TruncatedRecord {
        /// Bytes of the incomplete record that were read.
        pending: usize,
    },

    /// A price cannot be expressed as a signed 64-bit multiple of the tick size.
    #[error("Price out of range: {0}")]
    PriceOutOfRange(Decimal),

    /// An accumulated tick count times the tick size overflows the decimal range.
    #[error("Tick count {ticks} at tick size {tick_size} overflows the price range")]
    TickOverflow {
        /// Accumulated price in whole ticks.
        ticks: i64,
        /// Tick size from the stream header.
        tick_size: Decimal,
    },
}

/// Errors that can occur while reading, writing or exporting QCB streams.
#[derive(Error, Debug)]
pub enum QcbError {
    /// I/O error from the underlying stream, propagated unchanged.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed stream contents.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// Export error.
    #[error("Export error: {0}")]
    Export(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl QcbError {
    /// Returns the format error, if this is one.
    #[must_use]
    pub const fn as_format(&self) -> Option<&FormatError> {
        match self {
            Self::Format(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error_display() {
        let err = FormatError::InvalidTickKind(0b01);
        assert_eq!(err.to_string(), "Invalid tick kind: 0b01");

        let err = FormatError::TruncatedHeader {
            available: 3,
            expected: 28,
        };
        assert!(err.to_string().contains("3 bytes"));
    }

    #[test]
    fn test_tick_overflow_display() {
        let err = FormatError::TickOverflow {
            ticks: 12,
            tick_size: Decimal::new(5, 1),
        };
        assert_eq!(
            err.to_string(),
            "Tick count 12 at tick size 0.5 overflows the price range"
        );
    }

    #[test]
    fn test_qcb_error_from_format() {
        let err: QcbError = FormatError::TruncatedRecord { pending: 2 }.into();
        assert_eq!(
            err.as_format(),
            Some(&FormatError::TruncatedRecord { pending: 2 })
        );
    }

    #[test]
    fn test_io_error_is_not_format() {
        let err: QcbError = std::io::Error::other("boom").into();
        assert!(err.as_format().is_none());
        assert!(err.to_string().contains("boom"));
    }
}
