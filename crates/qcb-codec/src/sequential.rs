//! Sequential decoder over a stream held in memory.

use qcb_types::{FormatError, Header, Result, Tick};
use std::iter::FusedIterator;

use crate::{Decoded, TickDecoder, decode_header};

/// Decodes a QCB stream whose bytes are all addressable as one slice.
///
/// With the whole stream at hand there are no chunk boundaries to carry
/// records across: a record that runs past the end of the slice is simply
/// truncated.
#[derive(Debug, Clone)]
pub struct SequentialTickReader<'a> {
    body: &'a [u8],
    position: usize,
    header: Header,
    decoder: TickDecoder,
    done: bool,
}

impl<'a> SequentialTickReader<'a> {
    /// Reads the header at the start of `bytes` and positions the reader on
    /// the first record.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::TruncatedHeader`] or
    /// [`FormatError::InvalidHeader`] for a bad header.
    pub fn new(bytes: &'a [u8]) -> Result<Self> {
        let header = decode_header(bytes)?;
        Ok(Self::with_header(header, &bytes[Header::SIZE..]))
    }

    /// Creates a reader over record bytes whose header was read separately.
    #[must_use]
    pub fn with_header(header: Header, body: &'a [u8]) -> Self {
        Self {
            body,
            position: 0,
            header,
            decoder: TickDecoder::new(&header),
            done: false,
        }
    }

    /// Returns the stream header.
    #[must_use]
    pub const fn header(&self) -> &Header {
        &self.header
    }

    /// Offset of the next record within the record bytes.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Length of the record bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.body.len()
    }

    /// Returns true if there are no record bytes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Number of ticks decoded so far.
    #[must_use]
    pub const fn ticks_read(&self) -> u64 {
        self.decoder.decoded()
    }

    /// Decodes the next tick.
    ///
    /// Returns `Ok(None)` once the position reaches the end of the record
    /// bytes. After an error, every further call returns `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::TruncatedRecord`] if the last record is cut
    /// short, or any other [`FormatError`] on a corrupt record.
    pub fn next_tick(&mut self) -> Result<Option<Tick>> {
        if self.done || self.position == self.body.len() {
            return Ok(None);
        }

        let remaining = &self.body[self.position..];
        match self.decoder.decode(remaining) {
            Ok(Decoded::Tick { tick, consumed }) => {
                self.position += consumed;
                Ok(Some(tick))
            }
            Ok(Decoded::Incomplete { needed }) => {
                self.done = true;
                tracing::warn!(
                    position = self.position,
                    pending = remaining.len(),
                    needed,
                    "QCB stream ends inside a record"
                );
                Err(FormatError::TruncatedRecord {
                    pending: remaining.len(),
                }
                .into())
            }
            Err(e) => {
                self.done = true;
                tracing::warn!(position = self.position, error = %e, "Corrupt QCB record");
                Err(e.into())
            }
        }
    }
}

impl Iterator for SequentialTickReader<'_> {
    type Item = Result<Tick>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_tick().transpose()
    }
}

impl FusedIterator for SequentialTickReader<'_> {}

/// Decodes a complete in-memory QCB stream.
///
/// # Errors
///
/// Returns the first header or record error encountered.
pub fn decode_all(bytes: &[u8]) -> Result<(Header, Vec<Tick>)> {
    let reader = SequentialTickReader::new(bytes)?;
    let header = *reader.header();
    let ticks = reader.collect::<Result<Vec<_>>>()?;
    tracing::debug!(ticks = ticks.len(), bytes = bytes.len(), "Decoded QCB stream");
    Ok((header, ticks))
}
