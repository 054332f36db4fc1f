//! Test command implementation.

use oxihuff::decompress_stream;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

pub fn cmd_test(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let reader = BufReader::new(File::open(input)?);

    println!("Testing {}", input.display());

    match decompress_stream(reader, io::sink()) {
        Ok(summary) => {
            println!(
                "  OK: {} bytes in {} blocks",
                summary.output_bytes, summary.blocks
            );
            Ok(())
        }
        Err(e) => {
            let kind = if e.is_corruption() {
                "damaged stream"
            } else {
                "read failure"
            };
            println!("  FAILED: {} - {}", kind, e);
            Err(format!("{} failed integrity test", input.display()).into())
        }
    }
}
