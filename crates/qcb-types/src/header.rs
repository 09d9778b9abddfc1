//! Stream header.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::FormatError;

/// Format version written by default.
pub const FORMAT_VERSION: i32 = 1;

/// Header read once at the start of every QCB stream.
///
/// The header fixes the scale used to turn the integer accumulators of the
/// delta codec back into prices and timestamps. It is immutable for the
/// lifetime of a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Header {
    /// Format version. Stored and surfaced, never dispatched on.
    pub version: i32,
    /// Free-form flags. Stored and surfaced, never dispatched on.
    pub flags: i32,
    /// Minimum price increment (tick size for futures, pipette size for forex).
    pub tick_size: Decimal,
    /// Native time units (100ns ticks) per encoded time unit.
    pub time_slice_ticks: i32,
}

impl Header {
    /// Size in bytes of an encoded header.
    ///
    /// `version: i32`, `flags: i32`, `tick_size: 16-byte decimal`,
    /// `time_slice_ticks: i32`.
    pub const SIZE: usize = 28;

    /// Creates a header with the current format version and no flags.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::InvalidHeader`] if `tick_size` or
    /// `time_slice_ticks` is not strictly positive.
    pub fn new(tick_size: Decimal, time_slice_ticks: i32) -> Result<Self, FormatError> {
        let header = Self {
            version: FORMAT_VERSION,
            flags: 0,
            tick_size,
            time_slice_ticks,
        };
        header.validate()?;
        Ok(header)
    }

    /// Sets the version.
    #[must_use]
    pub const fn with_version(mut self, version: i32) -> Self {
        self.version = version;
        self
    }

    /// Sets the flags.
    #[must_use]
    pub const fn with_flags(mut self, flags: i32) -> Self {
        self.flags = flags;
        self
    }

    /// Checks the header invariants.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::InvalidHeader`] if `tick_size <= 0` or
    /// `time_slice_ticks <= 0`.
    pub fn validate(&self) -> Result<(), FormatError> {
        if self.tick_size <= Decimal::ZERO {
            return Err(FormatError::InvalidHeader(format!(
                "tick size must be positive, got {}",
                self.tick_size
            )));
        }
        if self.time_slice_ticks <= 0 {
            return Err(FormatError::InvalidHeader(format!(
                "time slice must be positive, got {}",
                self.time_slice_ticks
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_new_header() {
        let header = Header::new(dec!(0.0001), 1000).unwrap();
        assert_eq!(header.version, FORMAT_VERSION);
        assert_eq!(header.flags, 0);
        assert_eq!(header.tick_size, dec!(0.0001));
        assert_eq!(header.time_slice_ticks, 1000);
    }

    #[test]
    fn test_builders() {
        let header = Header::new(dec!(0.25), 1)
            .unwrap()
            .with_version(7)
            .with_flags(0b101);
        assert_eq!(header.version, 7);
        assert_eq!(header.flags, 0b101);
    }

    #[test]
    fn test_rejects_non_positive_tick_size() {
        assert!(matches!(
            Header::new(Decimal::ZERO, 1),
            Err(FormatError::InvalidHeader(_))
        ));
        assert!(matches!(
            Header::new(dec!(-0.01), 1),
            Err(FormatError::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_rejects_non_positive_time_slice() {
        assert!(matches!(
            Header::new(dec!(0.01), 0),
            Err(FormatError::InvalidHeader(_))
        ));
        assert!(matches!(
            Header::new(dec!(0.01), -5),
            Err(FormatError::InvalidHeader(_))
        ));
    }
}
