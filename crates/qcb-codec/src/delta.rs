//! Per-record delta codec.
//!
//! Each record stores, for every field that changed since the previous
//! record, the signed difference of its scaled-integer value at the smallest
//! width that holds it. Unchanged fields cost nothing but a cleared presence
//! bit, so a tick that only moves the ask by a few pipettes encodes in four
//! bytes.

use byteorder::{ByteOrder, LittleEndian};
use qcb_types::{
    Field, FieldFlags, FormatError, Header, MAX_RECORD_SIZE, RecordOptions, Tick, TickKind,
    WidthCode,
};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::ByteWindow;

/// Price and time scale recovered from the stream header.
#[derive(Debug, Clone, Copy)]
struct Scale {
    tick_size: Decimal,
    time_slice: i64,
}

impl Scale {
    fn from_header(header: &Header) -> Self {
        Self {
            tick_size: header.tick_size,
            time_slice: i64::from(header.time_slice_ticks),
        }
    }

    /// Converts a price into whole ticks, rounding toward negative infinity.
    ///
    /// The quotient is rounded to 28 significant digits before flooring, which
    /// can lift a value just below a whole tick onto it; the product check
    /// steps such results back down.
    fn price_to_ticks(&self, price: Decimal) -> Result<i64, FormatError> {
        let out_of_range = FormatError::PriceOutOfRange(price);
        let ticks = price
            .checked_div(self.tick_size)
            .and_then(|ticks| ticks.floor().to_i64())
            .ok_or_else(|| out_of_range.clone())?;
        match Decimal::from(ticks).checked_mul(self.tick_size) {
            Some(floor) if floor > price => ticks.checked_sub(1).ok_or(out_of_range),
            _ => Ok(ticks),
        }
    }

    fn ticks_to_price(&self, ticks: i64) -> Result<Decimal, FormatError> {
        Decimal::from(ticks)
            .checked_mul(self.tick_size)
            .ok_or(FormatError::TickOverflow {
                ticks,
                tick_size: self.tick_size,
            })
    }

    const fn time_to_slices(&self, timestamp: i64) -> i64 {
        timestamp / self.time_slice
    }

    const fn slices_to_time(&self, slices: i64) -> i64 {
        slices.wrapping_mul(self.time_slice)
    }
}

/// Last absolute value of every field, in scaled-integer units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Accumulators([i64; 4]);

impl Accumulators {
    const fn get(&self, field: Field) -> i64 {
        self.0[field.index()]
    }

    const fn set(&mut self, field: Field, value: i64) {
        self.0[field.index()] = value;
    }
}

/// Deltas of one record, parsed but not yet applied.
#[derive(Debug, Clone, Copy, Default)]
struct RecordDeltas {
    flags: FieldFlags,
    deltas: [i64; 4],
}

impl RecordDeltas {
    const fn delta(&self, field: Field) -> i64 {
        self.deltas[field.index()]
    }
}

/// Outcome of parsing one record out of a byte window.
enum Parse {
    Complete(RecordDeltas, usize),
    Incomplete(usize),
}

/// Returns the total length of a record from its first two bytes.
///
/// `options` is ignored when the header byte has no presence flag set.
///
/// # Errors
///
/// Returns [`FormatError::InvalidWidthCode`] if a present field carries an
/// out-of-range width code.
pub fn record_len(header: u8, options: u8) -> Result<usize, FormatError> {
    let flags = FieldFlags::from_header_byte(header);
    if flags.is_empty() {
        return Ok(1);
    }
    let options = RecordOptions::from_byte(options);
    let mut len = 2;
    for field in flags.iter() {
        len += options.width(field)?.byte_len();
    }
    Ok(len)
}

/// Reads one record without touching any codec state.
fn parse_record(bytes: &[u8]) -> Result<Parse, FormatError> {
    let mut window = ByteWindow::new(bytes);

    let Some(header) = window.read_u8() else {
        return Ok(Parse::Incomplete(1));
    };
    if TickKind::from_header_byte(header) != Some(TickKind::BidAsk) {
        return Err(FormatError::InvalidTickKind(header & TickKind::MASK));
    }

    let flags = FieldFlags::from_header_byte(header);
    let mut record = RecordDeltas {
        flags,
        deltas: [0; 4],
    };
    if flags.is_empty() {
        return Ok(Parse::Complete(record, window.position()));
    }

    let Some(options_byte) = window.read_u8() else {
        return Ok(Parse::Incomplete(2));
    };
    let options = RecordOptions::from_byte(options_byte);

    for field in flags.iter() {
        let width = options.width(field)?;
        let Some(delta) = window.read_signed(width) else {
            return Ok(Parse::Incomplete(record_len(header, options_byte)?));
        };
        record.deltas[field.index()] = delta;
    }

    Ok(Parse::Complete(record, window.position()))
}

/// Result of a decode attempt over a byte window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoded {
    /// A full record was decoded.
    Tick {
        /// The tick after applying the record.
        tick: Tick,
        /// Bytes the record occupied.
        consumed: usize,
    },
    /// The window ends inside the record. No state was changed.
    Incomplete {
        /// Lower bound on the record length, as far as it could be read.
        needed: usize,
    },
}

/// Stateful decoder for one delta-encoded tick stream.
///
/// A decoder is built from the stream's header and must see every record of
/// that stream in order, exactly once.
#[derive(Debug, Clone)]
pub struct TickDecoder {
    scale: Scale,
    state: Accumulators,
    tick: Tick,
    decoded: u64,
}

impl TickDecoder {
    /// Creates a decoder for a stream with the given header.
    #[must_use]
    pub fn new(header: &Header) -> Self {
        let scale = Scale::from_header(header);
        let zero = Decimal::new(0, scale.tick_size.scale());
        Self {
            scale,
            state: Accumulators::default(),
            tick: Tick::new(0, zero, zero, 0),
            decoded: 0,
        }
    }

    /// Decodes the record at the start of `bytes`.
    ///
    /// The attempt is all-or-nothing: when `bytes` ends inside the record,
    /// [`Decoded::Incomplete`] is returned and the decoder is unchanged, so
    /// the same record can be retried once more bytes are available.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::InvalidTickKind`] or
    /// [`FormatError::InvalidWidthCode`] on a corrupt record, and
    /// [`FormatError::TickOverflow`] if a price overflows the decimal range.
    pub fn decode(&mut self, bytes: &[u8]) -> Result<Decoded, FormatError> {
        let (record, consumed) = match parse_record(bytes)? {
            Parse::Complete(record, consumed) => (record, consumed),
            Parse::Incomplete(needed) => return Ok(Decoded::Incomplete { needed }),
        };

        let mut state = self.state;
        let mut tick = self.tick;
        for field in record.flags.iter() {
            let value = state.get(field).wrapping_add(record.delta(field));
            state.set(field, value);
            match field {
                Field::Time => tick.timestamp = self.scale.slices_to_time(value),
                Field::Price => tick.bid = self.scale.ticks_to_price(value)?,
                Field::Volume => tick.volume = value,
                Field::ExtraPrice => tick.ask = self.scale.ticks_to_price(value)?,
            }
        }

        self.state = state;
        self.tick = tick;
        self.decoded += 1;
        Ok(Decoded::Tick { tick, consumed })
    }

    /// Returns the most recently decoded tick.
    #[must_use]
    pub const fn last_tick(&self) -> Tick {
        self.tick
    }

    /// Number of records decoded so far.
    #[must_use]
    pub const fn decoded(&self) -> u64 {
        self.decoded
    }
}

/// One encoded record, held inline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodedRecord {
    bytes: [u8; MAX_RECORD_SIZE],
    len: usize,
}

impl EncodedRecord {
    /// Returns the record bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// Returns the record length in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Always false: a record holds at least its header byte.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn push(&mut self, byte: u8) {
        self.bytes[self.len] = byte;
        self.len += 1;
    }

    fn push_signed(&mut self, value: i64, width: WidthCode) {
        let out = &mut self.bytes[self.len..self.len + width.byte_len()];
        match width {
            WidthCode::I8 => out[0] = value as i8 as u8,
            WidthCode::I16 => LittleEndian::write_i16(out, value as i16),
            WidthCode::I32 => LittleEndian::write_i32(out, value as i32),
            WidthCode::I64 => LittleEndian::write_i64(out, value),
        }
        self.len += width.byte_len();
    }
}

impl AsRef<[u8]> for EncodedRecord {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

/// Stateful encoder for one delta-encoded tick stream.
#[derive(Debug, Clone)]
pub struct TickEncoder {
    scale: Scale,
    state: Accumulators,
    encoded: u64,
}

impl TickEncoder {
    /// Creates an encoder for a stream with the given header.
    #[must_use]
    pub fn new(header: &Header) -> Self {
        Self {
            scale: Scale::from_header(header),
            state: Accumulators::default(),
            encoded: 0,
        }
    }

    /// Encodes one bid/ask observation.
    ///
    /// The timestamp is truncated to whole time slices and both prices are
    /// floored to whole ticks. Volume is never encoded: its delta is always
    /// zero, so decoders report the volume of a stream as 0.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::PriceOutOfRange`] if a price divided by the tick
    /// size does not fit an `i64`. The encoder is unchanged in that case.
    pub fn encode(
        &mut self,
        timestamp: i64,
        bid: Decimal,
        ask: Decimal,
    ) -> Result<EncodedRecord, FormatError> {
        let mut next = self.state;
        next.set(Field::Time, self.scale.time_to_slices(timestamp));
        next.set(Field::Price, self.scale.price_to_ticks(bid)?);
        next.set(Field::ExtraPrice, self.scale.price_to_ticks(ask)?);

        let mut flags = FieldFlags::EMPTY;
        let mut options = RecordOptions::default();
        let mut deltas = [0i64; 4];
        for field in Field::ALL {
            let delta = next.get(field).wrapping_sub(self.state.get(field));
            if delta != 0 {
                flags.insert(field);
                options.set_width(field, WidthCode::for_delta(delta));
                deltas[field.index()] = delta;
            }
        }

        let mut record = EncodedRecord {
            bytes: [0; MAX_RECORD_SIZE],
            len: 0,
        };
        record.push(TickKind::BidAsk.bits() | flags.bits());
        if !flags.is_empty() {
            record.push(options.byte());
            for field in flags.iter() {
                let width = options.width(field)?;
                record.push_signed(deltas[field.index()], width);
            }
        }

        self.state = next;
        self.encoded += 1;
        Ok(record)
    }

    /// Number of records encoded so far.
    #[must_use]
    pub const fn encoded(&self) -> u64 {
        self.encoded
    }
}
