//! Stream header codec.
//!
//! The header is 28 bytes, little-endian:
//!
//! ```text
//! offset  size  field
//! 0       4     version           i32
//! 4       4     flags             i32
//! 8       16    tick_size         decimal (lo, mid, hi, flags as u32)
//! 24      4     time_slice_ticks  i32
//! ```
//!
//! The decimal uses the 96-bit mantissa layout of `System.Decimal`: three
//! 32-bit words of magnitude followed by a flags word holding the scale in
//! bits 16-23 and the sign in bit 31.

use byteorder::{ByteOrder, LittleEndian};
use qcb_types::{FormatError, Header};
use rust_decimal::Decimal;
use std::io::{Read, Write};

const DECIMAL_SIGN_BIT: u32 = 0x8000_0000;
const DECIMAL_SCALE_SHIFT: u32 = 16;
const DECIMAL_SCALE_MASK: u32 = 0x00FF_0000;
const DECIMAL_MAX_SCALE: u32 = 28;

/// Serializes a header into its fixed-size byte form.
#[must_use]
pub fn encode_header(header: &Header) -> [u8; Header::SIZE] {
    let mut bytes = [0u8; Header::SIZE];
    LittleEndian::write_i32(&mut bytes[0..4], header.version);
    LittleEndian::write_i32(&mut bytes[4..8], header.flags);
    encode_decimal(header.tick_size, &mut bytes[8..24]);
    LittleEndian::write_i32(&mut bytes[24..28], header.time_slice_ticks);
    bytes
}

/// Parses a header from the start of `bytes`.
///
/// Bytes past [`Header::SIZE`] are ignored.
///
/// # Errors
///
/// Returns [`FormatError::TruncatedHeader`] if fewer than [`Header::SIZE`]
/// bytes are given, or [`FormatError::InvalidHeader`] if the decimal is
/// malformed or an invariant is violated.
pub fn decode_header(bytes: &[u8]) -> Result<Header, FormatError> {
    if bytes.len() < Header::SIZE {
        return Err(FormatError::TruncatedHeader {
            available: bytes.len(),
            expected: Header::SIZE,
        });
    }

    let header = Header {
        version: LittleEndian::read_i32(&bytes[0..4]),
        flags: LittleEndian::read_i32(&bytes[4..8]),
        tick_size: decode_decimal(&bytes[8..24])?,
        time_slice_ticks: LittleEndian::read_i32(&bytes[24..28]),
    };
    header.validate()?;
    Ok(header)
}

/// Reads a header from the start of a stream.
///
/// # Errors
///
/// Returns [`FormatError::TruncatedHeader`] if the stream ends early, any
/// other header format error, or the underlying I/O error unchanged.
pub fn read_header<R: Read>(reader: &mut R) -> qcb_types::Result<Header> {
    let mut bytes = [0u8; Header::SIZE];
    let mut filled = 0;
    while filled < bytes.len() {
        let read = reader.read(&mut bytes[filled..])?;
        if read == 0 {
            break;
        }
        filled += read;
    }
    Ok(decode_header(&bytes[..filled])?)
}

/// Writes a header to a stream.
///
/// # Errors
///
/// Returns [`FormatError::InvalidHeader`] if the header violates an
/// invariant, or the underlying I/O error.
pub fn write_header<W: Write>(writer: &mut W, header: &Header) -> qcb_types::Result<()> {
    header.validate()?;
    writer.write_all(&encode_header(header))?;
    Ok(())
}

fn encode_decimal(value: Decimal, out: &mut [u8]) {
    let magnitude = value.mantissa().unsigned_abs();
    let mut flags = value.scale() << DECIMAL_SCALE_SHIFT;
    if value.is_sign_negative() {
        flags |= DECIMAL_SIGN_BIT;
    }
    LittleEndian::write_u32(&mut out[0..4], magnitude as u32);
    LittleEndian::write_u32(&mut out[4..8], (magnitude >> 32) as u32);
    LittleEndian::write_u32(&mut out[8..12], (magnitude >> 64) as u32);
    LittleEndian::write_u32(&mut out[12..16], flags);
}

fn decode_decimal(bytes: &[u8]) -> Result<Decimal, FormatError> {
    let lo = LittleEndian::read_u32(&bytes[0..4]);
    let mid = LittleEndian::read_u32(&bytes[4..8]);
    let hi = LittleEndian::read_u32(&bytes[8..12]);
    let flags = LittleEndian::read_u32(&bytes[12..16]);

    let scale = (flags & DECIMAL_SCALE_MASK) >> DECIMAL_SCALE_SHIFT;
    if flags & !(DECIMAL_SCALE_MASK | DECIMAL_SIGN_BIT) != 0 || scale > DECIMAL_MAX_SCALE {
        return Err(FormatError::InvalidHeader(format!(
            "malformed decimal flags {flags:#010x}"
        )));
    }

    Ok(Decimal::from_parts(
        lo,
        mid,
        hi,
        flags & DECIMAL_SIGN_BIT != 0,
        scale,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use qcb_types::QcbError;
    use rust_decimal_macros::dec;
    use std::io::Cursor;

    fn forex_header() -> Header {
        Header::new(dec!(0.0001), 1000).unwrap()
    }

    #[test]
    fn test_encode_layout() {
        let bytes = encode_header(&forex_header().with_flags(2));

        assert_eq!(&bytes[0..4], &1i32.to_le_bytes());
        assert_eq!(&bytes[4..8], &2i32.to_le_bytes());
        // 0.0001 = mantissa 1, scale 4
        assert_eq!(&bytes[8..12], &1u32.to_le_bytes());
        assert_eq!(&bytes[12..20], &[0u8; 8]);
        assert_eq!(&bytes[20..24], &(4u32 << 16).to_le_bytes());
        assert_eq!(&bytes[24..28], &1000i32.to_le_bytes());
    }

    #[test]
    fn test_decode_encoded() {
        let header = Header::new(dec!(0.25), 600_000_000)
            .unwrap()
            .with_version(3)
            .with_flags(-1);
        let decoded = decode_header(&encode_header(&header)).unwrap();
        assert_eq!(decoded, header);
        assert_eq!(decoded.tick_size.scale(), 2);
    }

    #[test]
    fn test_wide_mantissa() {
        let tick_size = Decimal::from_parts(0xDEAD_BEEF, 0x0123_4567, 0x89AB, false, 20);
        let header = Header::new(tick_size, 1).unwrap();
        let decoded = decode_header(&encode_header(&header)).unwrap();
        assert_eq!(decoded.tick_size, tick_size);
    }

    #[test]
    fn test_truncated_header() {
        let bytes = encode_header(&forex_header());
        let result = decode_header(&bytes[..27]);
        assert_eq!(
            result,
            Err(FormatError::TruncatedHeader {
                available: 27,
                expected: 28
            })
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(
            decode_header(&[]),
            Err(FormatError::TruncatedHeader { available: 0, .. })
        ));
    }

    #[test]
    fn test_rejects_zero_tick_size() {
        let mut bytes = encode_header(&forex_header());
        bytes[8..24].fill(0);
        assert!(matches!(
            decode_header(&bytes),
            Err(FormatError::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_rejects_negative_time_slice() {
        let mut bytes = encode_header(&forex_header());
        bytes[24..28].copy_from_slice(&(-1i32).to_le_bytes());
        assert!(matches!(
            decode_header(&bytes),
            Err(FormatError::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_rejects_malformed_decimal_flags() {
        let mut bytes = encode_header(&forex_header());
        // scale 29
        bytes[20..24].copy_from_slice(&(29u32 << 16).to_le_bytes());
        assert!(matches!(
            decode_header(&bytes),
            Err(FormatError::InvalidHeader(_))
        ));

        let mut bytes = encode_header(&forex_header());
        bytes[20..24].copy_from_slice(&((4u32 << 16) | 1).to_le_bytes());
        assert!(matches!(
            decode_header(&bytes),
            Err(FormatError::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_read_header_from_stream() {
        let mut data = encode_header(&forex_header()).to_vec();
        data.extend_from_slice(&[0x03, 0xFF]);
        let mut cursor = Cursor::new(data);

        let header = read_header(&mut cursor).unwrap();
        assert_eq!(header, forex_header());
        assert_eq!(cursor.position(), 28);
    }

    #[test]
    fn test_read_header_short_stream() {
        let mut cursor = Cursor::new(vec![1u8, 0, 0]);
        let err = read_header(&mut cursor).unwrap_err();
        assert!(matches!(
            err,
            QcbError::Format(FormatError::TruncatedHeader { available: 3, .. })
        ));
    }

    #[test]
    fn test_write_header() {
        let mut out = Vec::new();
        write_header(&mut out, &forex_header()).unwrap();
        assert_eq!(out.len(), Header::SIZE);
        assert_eq!(decode_header(&out).unwrap(), forex_header());
    }
}
