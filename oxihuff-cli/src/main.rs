//! OxiHuff CLI - block-streaming Huffman compressor
//!
//! Compresses single files into self-describing `.huf` streams and back.

mod commands;
mod utils;

use clap::{Parser, Subcommand};
use commands::{cmd_compress, cmd_decompress, cmd_info, cmd_test};
use oxihuff::DEFAULT_BLOCK_SIZE;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "oxihuff")]
#[command(author, version, about = "Pure Rust Huffman file compressor")]
#[command(long_about = "
OxiHuff compresses a file with a single static Huffman code built from
the byte frequencies of the whole input, and writes it as a stream of
length-prefixed blocks.

Examples:
  oxihuff compress notes.txt
  oxihuff compress -b 4096 dump.bin dump.huf
  oxihuff decompress notes.txt.huf
  oxihuff info notes.txt.huf --json
  oxihuff test notes.txt.huf

Set RUST_LOG to control log output, e.g. RUST_LOG=oxihuff=trace.
")]
struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress a file
    #[command(visible_alias = "c", alias = "e")]
    Compress {
        /// File to compress
        input: PathBuf,

        /// Output file (default: <input>.huf)
        output: Option<PathBuf>,

        /// Raw bytes per block record
        #[arg(short, long, default_value_t = DEFAULT_BLOCK_SIZE)]
        block_size: usize,

        /// Overwrite the output file if it exists
        #[arg(short, long)]
        force: bool,

        /// Show progress bar
        #[arg(short = 'P', long)]
        progress: bool,
    },

    /// Decompress a file
    #[command(visible_alias = "d", alias = "x")]
    Decompress {
        /// Compressed file
        input: PathBuf,

        /// Output file (default: input without .huf, or <input>.out)
        output: Option<PathBuf>,

        /// Overwrite the output file if it exists
        #[arg(short, long)]
        force: bool,

        /// Show progress
        #[arg(short = 'P', long)]
        progress: bool,
    },

    /// Show header and block statistics of a compressed file
    #[command(alias = "i")]
    Info {
        /// Compressed file to inspect
        input: PathBuf,

        /// Output as JSON (machine-readable)
        #[arg(short, long)]
        json: bool,
    },

    /// Decode a compressed file without writing output
    #[command(alias = "t")]
    Test {
        /// Compressed file to test
        input: PathBuf,
    },
}

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise only warnings are shown unless
/// `verbose` raises the oxihuff crates to debug.
fn init_logging(verbose: bool) {
    let default = if verbose {
        "warn,oxihuff=debug,oxihuff_core=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Compress {
            input,
            output,
            block_size,
            force,
            progress,
        } => cmd_compress(&input, output.as_deref(), block_size, force, progress),
        Commands::Decompress {
            input,
            output,
            force,
            progress,
        } => cmd_decompress(&input, output.as_deref(), force, progress),
        Commands::Info { input, json } => cmd_info(&input, json),
        Commands::Test { input } => cmd_test(&input),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_compress_defaults() {
        let cli = Cli::parse_from(["oxihuff", "c", "data.bin"]);
        match cli.command {
            Commands::Compress {
                input,
                output,
                block_size,
                force,
                progress,
            } => {
                assert_eq!(input, PathBuf::from("data.bin"));
                assert!(output.is_none());
                assert_eq!(block_size, DEFAULT_BLOCK_SIZE);
                assert!(!force && !progress);
            }
            _ => panic!("expected compress"),
        }
    }

    #[test]
    fn test_parse_global_verbose() {
        let cli = Cli::parse_from(["oxihuff", "info", "data.huf", "--json", "-v"]);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Info { json: true, .. }));
    }
}
