//! Decoded tick representation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single decoded bid/ask/volume observation.
///
/// Values are absolute: the delta accumulators have already been scaled by
/// the stream header's tick size and time slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Tick {
    /// Timestamp in native time units (100ns ticks).
    pub timestamp: i64,
    /// Bid price.
    pub bid: Decimal,
    /// Ask (offer) price.
    pub ask: Decimal,
    /// Raw volume count.
    pub volume: i64,
}

impl Tick {
    /// Creates a new tick.
    #[must_use]
    pub const fn new(timestamp: i64, bid: Decimal, ask: Decimal, volume: i64) -> Self {
        Self {
            timestamp,
            bid,
            ask,
            volume,
        }
    }

    /// Returns the mid price (average of ask and bid).
    #[must_use]
    pub fn mid(&self) -> Decimal {
        (self.ask + self.bid) / Decimal::TWO
    }

    /// Returns the spread (ask - bid).
    #[must_use]
    pub fn spread(&self) -> Decimal {
        self.ask - self.bid
    }
}
