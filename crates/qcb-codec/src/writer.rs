//! Stream writer.

use qcb_types::{Header, Result};
use rust_decimal::Decimal;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::{TickEncoder, write_header};

/// Writes a QCB stream: the header once, then one delta record per tick.
#[derive(Debug)]
pub struct QcbWriter<W: Write> {
    sink: W,
    header: Header,
    encoder: TickEncoder,
    bytes_written: u64,
}

impl QcbWriter<BufWriter<File>> {
    /// Creates (or truncates) a QCB file and writes its header.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or the header is invalid.
    pub fn create(path: impl AsRef<Path>, header: Header) -> Result<Self> {
        let file = File::create(path.as_ref())?;
        Self::new(BufWriter::new(file), header)
    }
}

impl<W: Write> QcbWriter<W> {
    /// Writes the header to `sink`.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::InvalidHeader`](qcb_types::FormatError::InvalidHeader)
    /// or the I/O error of the sink.
    pub fn new(mut sink: W, header: Header) -> Result<Self> {
        write_header(&mut sink, &header)?;
        tracing::debug!(
            version = header.version,
            tick_size = %header.tick_size,
            time_slice_ticks = header.time_slice_ticks,
            "Wrote QCB header"
        );
        Ok(Self {
            sink,
            header,
            encoder: TickEncoder::new(&header),
            bytes_written: Header::SIZE as u64,
        })
    }

    /// Returns the stream header.
    #[must_use]
    pub const fn header(&self) -> &Header {
        &self.header
    }

    /// Encodes and writes one tick, returning the record length.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::PriceOutOfRange`](qcb_types::FormatError::PriceOutOfRange)
    /// if a price cannot be scaled, or the I/O error of the sink.
    pub fn write_tick(&mut self, timestamp: i64, bid: Decimal, ask: Decimal) -> Result<usize> {
        let record = self.encoder.encode(timestamp, bid, ask)?;
        self.sink.write_all(record.as_bytes())?;
        self.bytes_written += record.len() as u64;
        Ok(record.len())
    }

    /// Number of ticks written so far.
    #[must_use]
    pub const fn ticks_written(&self) -> u64 {
        self.encoder.encoded()
    }

    /// Bytes written so far, header included.
    #[must_use]
    pub const fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Flushes the sink and returns it.
    ///
    /// # Errors
    ///
    /// Returns the I/O error of the final flush.
    pub fn finish(mut self) -> Result<W> {
        self.sink.flush()?;
        tracing::debug!(
            ticks = self.ticks_written(),
            bytes = self.bytes_written,
            "Finished QCB stream"
        );
        Ok(self.sink)
    }
}

/// Encodes a complete stream into memory.
///
/// # Errors
///
/// Returns the first header or encoding error.
pub fn encode_all<I>(header: &Header, ticks: I) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = (i64, Decimal, Decimal)>,
{
    let mut writer = QcbWriter::new(Vec::new(), *header)?;
    for (timestamp, bid, ask) in ticks {
        writer.write_tick(timestamp, bid, ask)?;
    }
    writer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ChunkedTickReader, ReaderConfig, decode_header};
    use qcb_types::{FormatError, QcbError};
    use rust_decimal_macros::dec;

    fn header() -> Header {
        Header::new(dec!(0.0001), 1000).unwrap()
    }

    #[test]
    fn test_counters() {
        let mut writer = QcbWriter::new(Vec::new(), header()).unwrap();
        assert_eq!(writer.bytes_written(), 28);

        assert_eq!(writer.write_tick(1000, dec!(1.1000), dec!(1.1002)).unwrap(), 7);
        assert_eq!(writer.write_tick(2000, dec!(1.1000), dec!(1.1005)).unwrap(), 4);
        assert_eq!(writer.ticks_written(), 2);
        assert_eq!(writer.bytes_written(), 39);

        let bytes = writer.finish().unwrap();
        assert_eq!(bytes.len(), 39);
        assert_eq!(decode_header(&bytes).unwrap(), header());
        assert_eq!(
            &bytes[28..],
            &[0x5B, 0x44, 0x01, 0xF8, 0x2A, 0xFA, 0x2A, 0x4B, 0x00, 0x01, 0x03]
        );
    }

    #[test]
    fn test_rejects_invalid_header() {
        let header = Header {
            time_slice_ticks: 0,
            ..header()
        };
        let err = QcbWriter::new(Vec::new(), header).unwrap_err();
        assert!(matches!(
            err,
            QcbError::Format(FormatError::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_failed_tick_writes_nothing() {
        let mut writer = QcbWriter::new(Vec::new(), header()).unwrap();
        let err = writer
            .write_tick(0, dec!(79228162514264337593543950335), dec!(1))
            .unwrap_err();
        assert!(matches!(
            err.as_format(),
            Some(FormatError::PriceOutOfRange(_))
        ));
        assert_eq!(writer.ticks_written(), 0);
        assert_eq!(writer.finish().unwrap().len(), Header::SIZE);
    }

    #[test]
    fn test_create_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ticks.qcb");

        let mut writer = QcbWriter::create(&path, header()).unwrap();
        writer.write_tick(1000, dec!(1.1), dec!(1.2)).unwrap();
        writer.finish().unwrap();

        let reader = ChunkedTickReader::open(&path, ReaderConfig::default()).unwrap();
        let ticks: Vec<_> = reader.collect::<Result<_>>().unwrap();
        assert_eq!(ticks.len(), 1);
        assert_eq!(ticks[0].ask, dec!(1.2000));
    }
}
