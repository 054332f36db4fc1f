//! Compress command implementation.

use crate::utils::{compressed_path, create_output, create_progress_bar};
use oxihuff::{HuffmanConfig, compress_stream_with_progress};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::info;

pub fn cmd_compress(
    input: &Path,
    output: Option<&Path>,
    block_size: usize,
    force: bool,
    progress: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = HuffmanConfig::new(block_size)?;
    let output = output.map_or_else(|| compressed_path(input), Path::to_path_buf);

    let file = File::open(input)?;
    let input_len = file.metadata()?.len();
    let mut reader = BufReader::new(file);
    let writer = create_output(input, &output, force)?;

    info!(input = %input.display(), output = %output.display(), block_size, "compressing");

    let pb = create_progress_bar(input_len, progress);
    let result =
        compress_stream_with_progress(&mut reader, writer, &config, |done| pb.set_position(done));
    pb.finish_and_clear();

    let summary = match result {
        Ok(summary) => summary,
        Err(e) => {
            let _ = std::fs::remove_file(&output);
            return Err(e.into());
        }
    };

    if summary.input_bytes == 0 {
        println!("{}: empty input, wrote empty {}", input.display(), output.display());
        return Ok(());
    }

    println!(
        "{} -> {}: {} -> {} bytes ({:.1}% saved, {} blocks, {} symbols)",
        input.display(),
        output.display(),
        summary.input_bytes,
        summary.output_bytes,
        summary.space_savings(),
        summary.blocks,
        summary.alphabet_size
    );

    Ok(())
}
