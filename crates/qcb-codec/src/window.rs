//! Bounds-checked cursor over a borrowed byte slice.

use byteorder::{ByteOrder, LittleEndian};
use qcb_types::WidthCode;

/// Forward-only reader over a byte slice.
///
/// Every read checks the remaining length first and returns `None` instead of
/// reading past the end, leaving the position untouched. A `None` therefore
/// means "the record continues beyond this window", never garbage.
#[derive(Debug, Clone, Copy)]
pub struct ByteWindow<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> ByteWindow<'a> {
    /// Creates a window positioned at the start of `bytes`.
    #[must_use]
    pub const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    /// Bytes consumed so far.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Bytes left to read.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.bytes.len() - self.position
    }

    /// Reads one byte.
    pub fn read_u8(&mut self) -> Option<u8> {
        let byte = *self.bytes.get(self.position)?;
        self.position += 1;
        Some(byte)
    }

    /// Reads a little-endian signed integer of the given width, sign-extended.
    pub fn read_signed(&mut self, width: WidthCode) -> Option<i64> {
        let len = width.byte_len();
        let bytes = self.bytes.get(self.position..self.position + len)?;
        let value = match width {
            WidthCode::I8 => i64::from(bytes[0] as i8),
            WidthCode::I16 => i64::from(LittleEndian::read_i16(bytes)),
            WidthCode::I32 => i64::from(LittleEndian::read_i32(bytes)),
            WidthCode::I64 => LittleEndian::read_i64(bytes),
        };
        self.position += len;
        Some(value)
    }
}
