//! Info command implementation.

use oxihuff::StreamInfo;
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Machine-readable form of [`StreamInfo`].
#[derive(Serialize)]
struct InfoReport {
    file: String,
    compressed_bytes: u64,
    empty: bool,
    alphabet_size: Option<u16>,
    tree_bits: Option<u32>,
    tree_depth: Option<usize>,
    blocks: u64,
    payload_bits: u64,
    alphabet: Vec<u8>,
}

impl InfoReport {
    fn new(path: &Path, compressed_bytes: u64, info: Option<&StreamInfo>) -> Self {
        Self {
            file: path.display().to_string(),
            compressed_bytes,
            empty: info.is_none(),
            alphabet_size: info.map(|i| i.header.alphabet_size),
            tree_bits: info.map(|i| i.header.tree_bit_length),
            tree_depth: info.map(|i| i.tree_depth),
            blocks: info.map_or(0, |i| i.blocks),
            payload_bits: info.map_or(0, |i| i.payload_bits),
            alphabet: info.map(|i| i.alphabet.clone()).unwrap_or_default(),
        }
    }
}

pub fn cmd_info(input: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let file = File::open(input)?;
    let size = file.metadata()?.len();
    let info = StreamInfo::inspect(BufReader::new(file))?;

    if json {
        let report = InfoReport::new(input, size, info.as_ref());
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Stream Information");
    println!("==================");
    println!("File: {}", input.display());
    println!("Size: {} bytes", size);

    let Some(info) = info else {
        println!("Empty stream (compressed from empty input)");
        return Ok(());
    };

    println!();
    println!("Tree:");
    println!("  Alphabet size: {}", info.header.alphabet_size);
    println!("  Shape bits: {}", info.header.tree_bit_length);
    println!("  Depth: {}", info.tree_depth);
    println!("  Record size: {} bytes", info.header.tree_record_len());
    println!();
    println!("Blocks:");
    println!("  Count: {}", info.blocks);
    println!("  Payload bits: {}", info.payload_bits);
    if info.blocks > 0 {
        println!(
            "  Average block: {:.1} bits",
            info.payload_bits as f64 / info.blocks as f64
        );
    }

    Ok(())
}
