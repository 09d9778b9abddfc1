//! JSON export.

use qcb_types::Tick;
use std::io::Write;

use crate::{ExportError, Exporter};

/// JSON output style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    /// JSON array (standard JSON).
    #[default]
    Array,
    /// Newline-delimited JSON (NDJSON/JSONL).
    Ndjson,
}

/// JSON exporter.
///
/// Prices serialize as strings so they survive the round trip exactly.
#[derive(Debug, Clone, Default)]
pub struct JsonExporter {
    style: JsonStyle,
    pretty: bool,
}

impl JsonExporter {
    /// Creates a JSON array exporter.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            style: JsonStyle::Array,
            pretty: false,
        }
    }

    /// Creates an NDJSON exporter.
    #[must_use]
    pub const fn ndjson() -> Self {
        Self {
            style: JsonStyle::Ndjson,
            pretty: false,
        }
    }

    /// Sets whether to pretty-print output (array style only).
    #[must_use]
    pub const fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Sets the output style.
    #[must_use]
    pub const fn with_style(mut self, style: JsonStyle) -> Self {
        self.style = style;
        self
    }
}

impl Exporter for JsonExporter {
    fn write_ticks<W: Write + Send>(
        &self,
        ticks: &[Tick],
        mut writer: W,
    ) -> Result<(), ExportError> {
        match self.style {
            JsonStyle::Array => {
                if self.pretty {
                    serde_json::to_writer_pretty(&mut writer, ticks)?;
                } else {
                    serde_json::to_writer(&mut writer, ticks)?;
                }
                writeln!(writer)?;
            }
            JsonStyle::Ndjson => {
                for tick in ticks {
                    serde_json::to_writer(&mut writer, tick)?;
                    writeln!(writer)?;
                }
            }
        }
        writer.flush()?;
        Ok(())
    }

    fn extension(&self) -> &str {
        match self.style {
            JsonStyle::Array => "json",
            JsonStyle::Ndjson => "ndjson",
        }
    }
}
