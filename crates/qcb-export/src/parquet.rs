//! Apache Parquet export.

use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use qcb_types::Tick;
use rust_decimal::prelude::ToPrimitive;
use std::io::Write;
use std::sync::Arc;

use crate::{ExportError, Exporter};

/// Parquet exporter.
///
/// Prices are stored twice: as `Float64` for analysis and as exact decimal
/// strings (`bid_exact`, `ask_exact`).
#[derive(Debug, Clone)]
pub struct ParquetExporter {
    row_group_size: usize,
    compression: Compression,
}

impl Default for ParquetExporter {
    fn default() -> Self {
        Self {
            row_group_size: 100_000,
            compression: Compression::SNAPPY,
        }
    }
}

impl ParquetExporter {
    /// Creates a Parquet exporter with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the row group size. Zero is treated as one.
    #[must_use]
    pub const fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = if size == 0 { 1 } else { size };
        self
    }

    /// Sets the compression codec.
    #[must_use]
    pub const fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    fn tick_schema() -> Schema {
        Schema::new(vec![
            Field::new("timestamp", DataType::Int64, false),
            Field::new("bid", DataType::Float64, false),
            Field::new("ask", DataType::Float64, false),
            Field::new("volume", DataType::Int64, false),
            Field::new("bid_exact", DataType::Utf8, false),
            Field::new("ask_exact", DataType::Utf8, false),
        ])
    }

    fn ticks_to_batch(schema: &Arc<Schema>, ticks: &[Tick]) -> Result<RecordBatch, ExportError> {
        let timestamps: Vec<_> = ticks.iter().map(|t| t.timestamp).collect();
        let bids: Vec<_> = ticks.iter().map(|t| t.bid.to_f64().unwrap_or(f64::NAN)).collect();
        let asks: Vec<_> = ticks.iter().map(|t| t.ask.to_f64().unwrap_or(f64::NAN)).collect();
        let volumes: Vec<_> = ticks.iter().map(|t| t.volume).collect();
        let bid_exact: Vec<_> = ticks.iter().map(|t| t.bid.to_string()).collect();
        let ask_exact: Vec<_> = ticks.iter().map(|t| t.ask.to_string()).collect();

        RecordBatch::try_new(
            Arc::clone(schema),
            vec![
                Arc::new(Int64Array::from(timestamps)),
                Arc::new(Float64Array::from(bids)),
                Arc::new(Float64Array::from(asks)),
                Arc::new(Int64Array::from(volumes)),
                Arc::new(StringArray::from(bid_exact)),
                Arc::new(StringArray::from(ask_exact)),
            ],
        )
        .map_err(|e| ExportError::Parquet(e.to_string()))
    }
}

impl Exporter for ParquetExporter {
    fn write_ticks<W: Write + Send>(&self, ticks: &[Tick], writer: W) -> Result<(), ExportError> {
        let schema = Arc::new(Self::tick_schema());
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();

        let mut arrow_writer = ArrowWriter::try_new(writer, Arc::clone(&schema), Some(props))
            .map_err(|e| ExportError::Parquet(e.to_string()))?;

        for chunk in ticks.chunks(self.row_group_size) {
            let batch = Self::ticks_to_batch(&schema, chunk)?;
            arrow_writer
                .write(&batch)
                .map_err(|e| ExportError::Parquet(e.to_string()))?;
        }

        arrow_writer
            .close()
            .map_err(|e| ExportError::Parquet(e.to_string()))?;

        Ok(())
    }

    fn extension(&self) -> &str {
        "parquet"
    }
}
