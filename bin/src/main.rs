//! qcb CLI - Inspect, encode and export QCB binary tick files.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use qcb_lib::prelude::*;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod display;

use display::Format;

#[derive(Parser)]
#[command(name = "qcb")]
#[command(about = "Inspect, encode and export QCB binary tick files", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress progress output and logs)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the header and tick count of a QCB file
    Info {
        /// QCB file to inspect
        file: PathBuf,
    },

    /// Decode a QCB file and export its ticks
    Dump {
        /// QCB file to decode
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "csv")]
        format: Format,

        /// Output file path. Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Bytes read from the file per chunk
        #[arg(long, default_value_t = ReaderConfig::DEFAULT_CHUNK_SIZE)]
        chunk_size: usize,

        /// Stop after this many ticks
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Encode a CSV of timestamp,bid,ask rows into a QCB file
    Encode {
        /// CSV input with a timestamp,bid,ask header row
        input: PathBuf,

        /// QCB file to write
        #[arg(short, long)]
        output: PathBuf,

        /// Minimum price increment, e.g. 0.00001
        #[arg(long)]
        tick_size: Decimal,

        /// Native time units (100ns) per encoded time unit
        #[arg(long, default_value = "1")]
        time_slice: i32,

        /// Format version to record in the header
        #[arg(long, default_value_t = qcb_lib::FORMAT_VERSION)]
        format_version: i32,

        /// Header flags to record
        #[arg(long, default_value = "0")]
        flags: i32,
    },

    /// Check that chunked decoding matches whole-file decoding
    Verify {
        /// QCB file to verify
        file: PathBuf,

        /// Chunk sizes to test (repeatable). Defaults to 1, 2, 5, 34 and 4096.
        #[arg(long = "chunk-size")]
        chunk_sizes: Vec<usize>,
    },
}

/// Installs the log subscriber. `RUST_LOG` wins over the command line.
fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "off",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Info { file } => commands::info::show_info(&file, cli.quiet),
        Commands::Dump {
            file,
            format,
            output,
            chunk_size,
            limit,
        } => commands::dump::dump(&file, format, output.as_deref(), chunk_size, limit, cli.quiet),
        Commands::Encode {
            input,
            output,
            tick_size,
            time_slice,
            format_version,
            flags,
        } => {
            let header = Header::new(tick_size, time_slice)?
                .with_version(format_version)
                .with_flags(flags);
            commands::encode::encode(&input, &output, header, cli.quiet)
        }
        Commands::Verify { file, chunk_sizes } => {
            commands::verify::verify(&file, &chunk_sizes, cli.quiet)
        }
    }
}
