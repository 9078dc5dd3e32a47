//! `bin2mem`: combine the text and data segments of an executable into one
//! binary image.
//!
//! ```text
//! bin2mem [-d <data start address>] <text segment> <data segment> <output file>
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::error::ErrorKind;
use clap::{ArgAction, Parser};
use memimage::{parse_number, segment};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Combine the text (instruction) and data segments into one binary file.
#[derive(Parser, Debug)]
#[command(name = "bin2mem", version)]
struct Cli {
    /// Byte offset of the data segment in the image [default: right after the text]
    #[arg(short = 'd', long = "data-start", value_name = "ADDRESS", value_parser = parse_number)]
    data_start: Option<u64>,

    /// Log more detail to stderr (repeat for more)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Text segment binary
    text: PathBuf,

    /// Data segment binary
    data: PathBuf,

    /// Image to write
    output: PathBuf,
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let layout = segment::combine_files(&cli.text, &cli.data, &cli.output, cli.data_start)
        .with_context(|| format!("building {}", cli.output.display()))?;

    info!(
        text = layout.text_len(),
        gap = layout.gap(),
        data_start = %format!("{:#x}", layout.data_start()),
        data = layout.data_len(),
        pad = layout.pad(),
        "wrote {} ({} bytes)",
        cli.output.display(),
        layout.total_len()
    );
    Ok(())
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };

    init_logging(cli.verbose, cli.quiet);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
