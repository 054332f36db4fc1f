//! Decompress command implementation.

use crate::utils::{create_output, create_spinner, decompressed_path};
use oxihuff::decompress_stream_with_progress;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::info;

pub fn cmd_decompress(
    input: &Path,
    output: Option<&Path>,
    force: bool,
    progress: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let output = output.map_or_else(|| decompressed_path(input), Path::to_path_buf);

    let reader = BufReader::new(File::open(input)?);
    let writer = create_output(input, &output, force)?;

    info!(input = %input.display(), output = %output.display(), "decompressing");

    let pb = create_spinner(progress);
    let result = decompress_stream_with_progress(reader, writer, |done| pb.set_position(done));
    pb.finish_and_clear();

    let summary = match result {
        Ok(summary) => summary,
        Err(e) => {
            // Leave no half-written output behind.
            let _ = std::fs::remove_file(&output);
            return Err(e.into());
        }
    };

    println!(
        "{} -> {}: {} -> {} bytes ({} blocks)",
        input.display(),
        output.display(),
        summary.input_bytes,
        summary.output_bytes,
        summary.blocks
    );

    Ok(())
}
