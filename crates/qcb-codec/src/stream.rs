//! Chunked streaming decoder.
//!
//! Records carry no length prefix, so a record may begin near the end of one
//! read chunk and finish in the next. The reader decodes speculatively: when
//! the valid part of the buffer ends inside a record, the partial bytes are
//! parked in an overflow buffer, the next chunk is read in *behind* them, and
//! the same record is decoded again from the start of the buffer. No byte is
//! skipped or seen twice, whatever the chunk size.

use qcb_types::{FormatError, Header, MAX_RECORD_SIZE, Result, Tick};
use std::fs::File;
use std::io::Read;
use std::iter::FusedIterator;
use std::path::Path;

use crate::{Decoded, ReaderConfig, TickDecoder, read_header};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReaderState {
    Active,
    Finished,
    Failed,
}

/// Decodes a QCB stream from any [`Read`] source in fixed-size chunks.
///
/// The reader owns its source; dropping the reader releases it.
///
/// # Example
///
/// ```ignore
/// use qcb_codec::{ChunkedTickReader, ReaderConfig};
///
/// let mut reader = ChunkedTickReader::open("eurusd.qcb", ReaderConfig::default())?;
/// println!("tick size {}", reader.header().tick_size);
/// while let Some(tick) = reader.next_tick()? {
///     println!("{} {} {}", tick.timestamp, tick.bid, tick.ask);
/// }
/// ```
#[derive(Debug)]
pub struct ChunkedTickReader<R> {
    source: R,
    header: Header,
    decoder: TickDecoder,
    chunk_size: usize,
    buffer: Box<[u8]>,
    cursor: usize,
    valid: usize,
    overflow: [u8; MAX_RECORD_SIZE],
    overflow_len: usize,
    state: ReaderState,
}

impl ChunkedTickReader<File> {
    /// Opens a QCB file and reads its header.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or its header is invalid.
    pub fn open(path: impl AsRef<Path>, config: ReaderConfig) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::new(file, config)
    }
}

impl<R: Read> ChunkedTickReader<R> {
    /// Reads the stream header from `source` and prepares to decode ticks.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::TruncatedHeader`] or
    /// [`FormatError::InvalidHeader`] for a bad header, or the I/O error of
    /// the source.
    pub fn new(mut source: R, config: ReaderConfig) -> Result<Self> {
        let header = read_header(&mut source)?;
        let chunk_size = config.chunk_size.get();

        tracing::debug!(
            version = header.version,
            flags = header.flags,
            tick_size = %header.tick_size,
            time_slice_ticks = header.time_slice_ticks,
            chunk_size,
            "Opened QCB stream"
        );

        Ok(Self {
            source,
            header,
            decoder: TickDecoder::new(&header),
            chunk_size,
            buffer: vec![0u8; chunk_size + MAX_RECORD_SIZE].into_boxed_slice(),
            cursor: 0,
            valid: 0,
            overflow: [0u8; MAX_RECORD_SIZE],
            overflow_len: 0,
            state: ReaderState::Active,
        })
    }

    /// Returns the stream header.
    #[must_use]
    pub const fn header(&self) -> &Header {
        &self.header
    }

    /// Number of ticks decoded so far.
    #[must_use]
    pub const fn ticks_read(&self) -> u64 {
        self.decoder.decoded()
    }

    /// Decodes the next tick.
    ///
    /// Returns `Ok(None)` at the clean end of the stream. After an error or
    /// the end of the stream, every further call returns `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::TruncatedRecord`] if the source ends inside a
    /// record, any other [`FormatError`] on a corrupt record, or the I/O error
    /// of the source unchanged.
    pub fn next_tick(&mut self) -> Result<Option<Tick>> {
        if self.state != ReaderState::Active {
            return Ok(None);
        }

        match self.advance() {
            Ok(Some(tick)) => Ok(Some(tick)),
            Ok(None) => {
                self.state = ReaderState::Finished;
                tracing::debug!(ticks = self.ticks_read(), "End of QCB stream");
                Ok(None)
            }
            Err(e) => {
                self.state = ReaderState::Failed;
                tracing::warn!(ticks = self.ticks_read(), error = %e, "QCB stream failed");
                Err(e)
            }
        }
    }

    /// Consumes the reader, returning the source.
    pub fn into_inner(self) -> R {
        self.source
    }

    fn advance(&mut self) -> Result<Option<Tick>> {
        loop {
            if self.cursor == self.valid && !self.refill()? {
                return Ok(None);
            }

            match self.decoder.decode(&self.buffer[self.cursor..self.valid])? {
                Decoded::Tick { tick, consumed } => {
                    self.cursor += consumed;
                    return Ok(Some(tick));
                }
                Decoded::Incomplete { needed } => {
                    let pending = self.valid - self.cursor;
                    self.overflow[..pending].copy_from_slice(&self.buffer[self.cursor..self.valid]);
                    self.overflow_len = pending;
                    self.cursor = self.valid;
                    tracing::trace!(pending, needed, "Record straddles chunk boundary");
                }
            }
        }
    }

    /// Moves any overflow to the start of the buffer and reads the next chunk
    /// behind it. Returns false at the clean end of the stream.
    fn refill(&mut self) -> Result<bool> {
        let carried = self.overflow_len;
        self.buffer[..carried].copy_from_slice(&self.overflow[..carried]);
        let read = self
            .source
            .read(&mut self.buffer[carried..carried + self.chunk_size])?;

        self.overflow_len = 0;
        self.cursor = 0;
        self.valid = carried + read;
        tracing::trace!(carried, read, "Refilled read buffer");

        if read == 0 {
            if carried > 0 {
                return Err(FormatError::TruncatedRecord { pending: carried }.into());
            }
            return Ok(false);
        }
        Ok(true)
    }
}

impl<R: Read> Iterator for ChunkedTickReader<R> {
    type Item = Result<Tick>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_tick().transpose()
    }
}

impl<R: Read> FusedIterator for ChunkedTickReader<R> {}
