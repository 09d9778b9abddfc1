//! Layout primitives of a delta-encoded tick record.
//!
//! A record is laid out as:
//!
//! ```text
//! byte 0    header  : kind (bits 0-1) | presence flags (bits 3-6)
//! byte 1    options : width code per field at bits 0, 2, 4, 6 (only if a flag is set)
//! bytes 2.. deltas  : one little-endian signed integer per present field,
//!                     in order Time, Price, Volume, ExtraPrice
//! ```

use crate::FormatError;

/// Largest possible record: header, options and four 64-bit deltas.
pub const MAX_RECORD_SIZE: usize = 1 + 1 + 4 * 8;

/// Kind bits of a record header byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TickKind {
    /// Bid only.
    Bid = 0b01,
    /// Ask only.
    Ask = 0b10,
    /// Bid and ask. The only kind valid in a QCB stream.
    BidAsk = 0b11,
}

impl TickKind {
    /// Mask selecting the kind bits of a header byte.
    pub const MASK: u8 = 0b11;

    /// Extracts the kind from a record header byte.
    ///
    /// Returns `None` when no kind bit is set.
    #[must_use]
    pub const fn from_header_byte(byte: u8) -> Option<Self> {
        match byte & Self::MASK {
            0b01 => Some(Self::Bid),
            0b10 => Some(Self::Ask),
            0b11 => Some(Self::BidAsk),
            _ => None,
        }
    }

    /// Returns the kind bits.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self as u8
    }
}

/// A delta-encoded field of a record, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Timestamp, in time slices.
    Time,
    /// Bid price, in ticks.
    Price,
    /// Volume.
    Volume,
    /// Ask price, in ticks.
    ExtraPrice,
}

impl Field {
    /// All fields in the order their deltas appear on the wire.
    pub const ALL: [Self; 4] = [Self::Time, Self::Price, Self::Volume, Self::ExtraPrice];

    /// Position of the field in wire order.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Time => 0,
            Self::Price => 1,
            Self::Volume => 2,
            Self::ExtraPrice => 3,
        }
    }

    /// Presence bit of the field in a record header byte.
    #[must_use]
    pub const fn presence_bit(self) -> u8 {
        0x08 << self.index()
    }

    /// Bit offset of the field's width code in the options byte.
    #[must_use]
    pub const fn width_shift(self) -> u32 {
        2 * self.index() as u32
    }
}

/// Presence flags of a record header byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FieldFlags(u8);

impl FieldFlags {
    /// Mask selecting the presence bits of a header byte.
    pub const MASK: u8 = 0x78;

    /// No field present.
    pub const EMPTY: Self = Self(0);

    /// Extracts the presence flags from a record header byte.
    ///
    /// Reserved bits are ignored.
    #[must_use]
    pub const fn from_header_byte(byte: u8) -> Self {
        Self(byte & Self::MASK)
    }

    /// Returns true if the field is present.
    #[must_use]
    pub const fn contains(self, field: Field) -> bool {
        self.0 & field.presence_bit() != 0
    }

    /// Marks the field as present.
    pub const fn insert(&mut self, field: Field) {
        self.0 |= field.presence_bit();
    }

    /// Returns true if no field is present.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns the presence bits, already shifted into header-byte position.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Iterates over the present fields in wire order.
    pub fn iter(self) -> impl Iterator<Item = Field> {
        Field::ALL.into_iter().filter(move |f| self.contains(*f))
    }
}

/// Width of a signed delta on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(u8)]
pub enum WidthCode {
    /// `i8`.
    #[default]
    I8 = 0,
    /// `i16`.
    I16 = 1,
    /// `i32`.
    I32 = 2,
    /// `i64`.
    I64 = 3,
}

impl WidthCode {
    /// Selects the smallest width that holds `delta` losslessly.
    #[must_use]
    pub const fn for_delta(delta: i64) -> Self {
        if delta >= i8::MIN as i64 && delta <= i8::MAX as i64 {
            Self::I8
        } else if delta >= i16::MIN as i64 && delta <= i16::MAX as i64 {
            Self::I16
        } else if delta >= i32::MIN as i64 && delta <= i32::MAX as i64 {
            Self::I32
        } else {
            Self::I64
        }
    }

    /// Parses a 2-bit width code.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::InvalidWidthCode`] for values above 3.
    pub const fn from_bits(bits: u8) -> Result<Self, FormatError> {
        match bits {
            0 => Ok(Self::I8),
            1 => Ok(Self::I16),
            2 => Ok(Self::I32),
            3 => Ok(Self::I64),
            other => Err(FormatError::InvalidWidthCode(other)),
        }
    }

    /// Returns the 2-bit code.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Number of bytes a delta of this width occupies.
    #[must_use]
    pub const fn byte_len(self) -> usize {
        1 << (self as usize)
    }
}

/// Options byte of a record: one width code per field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RecordOptions(u8);

impl RecordOptions {
    /// Wraps a raw options byte.
    #[must_use]
    pub const fn from_byte(byte: u8) -> Self {
        Self(byte)
    }

    /// Returns the raw options byte.
    #[must_use]
    pub const fn byte(self) -> u8 {
        self.0
    }

    /// Returns the width code of `field`.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::InvalidWidthCode`] if the code is out of range.
    pub const fn width(self, field: Field) -> Result<WidthCode, FormatError> {
        WidthCode::from_bits((self.0 >> field.width_shift()) & 0b11)
    }

    /// Sets the width code of `field`.
    pub const fn set_width(&mut self, field: Field, width: WidthCode) {
        let shift = field.width_shift();
        self.0 = (self.0 & !(0b11 << shift)) | (width.bits() << shift);
    }
}
