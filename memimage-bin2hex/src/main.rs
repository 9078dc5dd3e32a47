//! `bin2hex`: binary to hex listing for FPGA block RAM initialization.
//!
//! ```text
//! bin2hex [-p <pad length>] [-b] <input> <output>
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::error::ErrorKind;
use clap::{ArgAction, Parser};
use memimage::{hex, parse_number, HexOptions};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Convert binary data into hex data, one 32-bit word per line.
#[derive(Parser, Debug)]
#[command(name = "bin2hex", version)]
struct Cli {
    /// Pad the listing with zero words up to this many words
    #[arg(short = 'p', long = "pad", value_name = "WORDS", default_value = "0", value_parser = parse_pad)]
    pad_words: u32,

    /// Byte-swap every word (big endian)
    #[arg(short = 'b', long = "big-endian")]
    swap: bool,

    /// Log more detail to stderr (repeat for more)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Binary file to convert
    input: PathBuf,

    /// Hex listing to write
    output: PathBuf,
}

fn parse_pad(text: &str) -> Result<u32, String> {
    let words = parse_number(text)?;
    u32::try_from(words).map_err(|_| format!("pad length {} is too large", words))
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
    let options = HexOptions {
        swap: cli.swap,
        pad_words: cli.pad_words,
    };

    let counts = hex::convert_file(&cli.input, &cli.output, options).with_context(|| {
        format!(
            "converting {} to {}",
            cli.input.display(),
            cli.output.display()
        )
    })?;

    info!(
        words = counts.total(),
        full = counts.full,
        partial = counts.partial,
        padding = counts.padding,
        "wrote {}",
        cli.output.display()
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
