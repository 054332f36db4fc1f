//! Self-describing block stream format.
//!
//! ```text
//! ┌──────────────────────────┬─────────────────────────────────────────┐
//! │ alphabet_size   u16 LE   │ distinct leaf symbols (incl. filler)    │
//! │ tree_bit_length u32 LE   │ shape sequence length in bits           │
//! │ tree_shape_bits u64 LE * │ ceil(tree_bit_length / 64) words        │
//! │ alphabet_bytes  u8 *     │ alphabet_size bytes, leaf visit order   │
//! ├──────────────────────────┼─────────────────────────────────────────┤
//! │ block_bit_length u32 LE  │ repeated until end of stream            │
//! │ block_bits      u64 LE * │ ceil(block_bit_length / 64) words       │
//! └──────────────────────────┴─────────────────────────────────────────┘
//! ```
//!
//! Empty input produces an empty stream with no header at all. End of
//! stream is only legal where a block length would start.

use crate::codebook::Codebook;
use crate::config::HuffmanConfig;
use crate::decoder::BlockDecoder;
use crate::encoder::BlockEncoder;
use crate::frequency::{ALPHABET_SIZE, FrequencyTable};
use crate::tree::HuffmanTree;
use oxihuff_core::record::{RecordReader, RecordWriter, padded_byte_len, read_up_to};
use oxihuff_core::{BitBuffer, HuffError, Result};
use std::io::{Read, Seek, SeekFrom, Write};
use tracing::{debug, trace};

/// Size of the fixed header fields in bytes.
pub const HEADER_LEN: usize = 6;

/// Fixed header of a compressed stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamHeader {
    /// Number of leaf symbols, including any filler leaf.
    pub alphabet_size: u16,
    /// Length of the serialized tree shape in bits.
    pub tree_bit_length: u32,
}

impl StreamHeader {
    /// Header describing a serialized tree.
    pub fn for_tree(shape: &BitBuffer, alphabet: &[u8]) -> Result<Self> {
        let header = Self {
            alphabet_size: u16::try_from(alphabet.len())
                .map_err(|_| HuffError::corrupt_tree("alphabet too large"))?,
            tree_bit_length: u32::try_from(shape.len())
                .map_err(|_| HuffError::corrupt_tree("tree shape too long"))?,
        };
        header.validate()?;
        Ok(header)
    }

    /// Check that the header can describe a valid tree.
    ///
    /// A tree over `k` leaves has exactly `2k - 1` shape bits, with
    /// `2 <= k <= 256`.
    pub fn validate(&self) -> Result<()> {
        let alphabet = self.alphabet_size as usize;
        if alphabet > ALPHABET_SIZE {
            return Err(HuffError::corrupt_tree(format!(
                "alphabet size {} exceeds {}",
                alphabet, ALPHABET_SIZE
            )));
        }
        if alphabet < 2 {
            return Err(HuffError::corrupt_tree(format!(
                "alphabet size {} is below the minimum of 2",
                alphabet
            )));
        }
        if self.tree_bit_length as usize != 2 * alphabet - 1 {
            return Err(HuffError::corrupt_tree(format!(
                "tree of {} leaves cannot have {} shape bits",
                alphabet, self.tree_bit_length
            )));
        }
        Ok(())
    }

    /// Number of 64-bit words holding the shape sequence.
    pub fn shape_words(&self) -> usize {
        (self.tree_bit_length as usize).div_ceil(oxihuff_core::WORD_BITS)
    }

    /// Size in bytes of the tree record following the header.
    pub fn tree_record_len(&self) -> usize {
        padded_byte_len(self.tree_bit_length as usize) + self.alphabet_size as usize
    }

    /// Write the header fields.
    pub fn write_to<W: Write>(&self, writer: &mut RecordWriter<W>) -> Result<()> {
        writer.write_u16(self.alphabet_size)?;
        writer.write_u32(self.tree_bit_length)
    }

    /// Read and validate the header fields.
    pub fn read_from<R: Read>(reader: &mut RecordReader<R>) -> Result<Self> {
        Self::try_read_from(reader)?.ok_or_else(|| HuffError::truncated(HEADER_LEN, 0))
    }

    /// Read and validate the header, or `None` if the stream is empty.
    pub fn try_read_from<R: Read>(reader: &mut RecordReader<R>) -> Result<Option<Self>> {
        let Some(alphabet_size) = reader.try_read_u16()? else {
            return Ok(None);
        };
        let header = Self {
            alphabet_size,
            tree_bit_length: reader.read_u32()?,
        };
        header.validate()?;
        Ok(Some(header))
    }

    /// Read the tree record that follows this header and rebuild the tree.
    fn read_tree<R: Read>(&self, reader: &mut RecordReader<R>) -> Result<HuffmanTree> {
        let shape = reader.read_bits(self.tree_bit_length as usize)?;
        let alphabet = reader.read_bytes(self.alphabet_size as usize)?;
        HuffmanTree::deserialize(&shape, &alphabet)
    }
}

/// Statistics of a finished compression run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeSummary {
    /// Raw bytes consumed.
    pub input_bytes: u64,
    /// Compressed bytes produced, header included.
    pub output_bytes: u64,
    /// Block records written.
    pub blocks: u64,
    /// Leaf symbols in the tree.
    pub alphabet_size: usize,
    /// Serialized tree shape length in bits.
    pub tree_bits: u64,
    /// Codeword bits across all blocks, before word padding.
    pub payload_bits: u64,
}

impl EncodeSummary {
    /// Compressed size relative to the input (0.0 for empty input).
    pub fn ratio(&self) -> f64 {
        if self.input_bytes == 0 {
            return 0.0;
        }
        self.output_bytes as f64 / self.input_bytes as f64
    }

    /// Space saved as a percentage of the input size.
    pub fn space_savings(&self) -> f64 {
        if self.input_bytes == 0 {
            return 0.0;
        }
        (1.0 - self.ratio()) * 100.0
    }
}

/// Statistics of a finished decompression run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeSummary {
    /// Compressed bytes consumed.
    pub input_bytes: u64,
    /// Raw bytes produced.
    pub output_bytes: u64,
    /// Block records read.
    pub blocks: u64,
}

/// Writes the header, tree record and block records of one stream.
///
/// The tree must be final before construction: the header and tree record
/// are written immediately, ahead of any block.
#[derive(Debug)]
pub struct StreamEncoder<W: Write> {
    writer: RecordWriter<W>,
    encoder: BlockEncoder,
    header: StreamHeader,
    summary: EncodeSummary,
}

impl<W: Write> StreamEncoder<W> {
    /// Start a stream for `tree`, writing its header and tree record.
    pub fn new(writer: W, tree: &HuffmanTree) -> Result<Self> {
        let (shape, alphabet) = tree.serialize();
        let header = StreamHeader::for_tree(&shape, &alphabet)?;

        let mut writer = RecordWriter::new(writer);
        header.write_to(&mut writer)?;
        writer.write_bits(&shape)?;
        writer.write_bytes(&alphabet)?;

        debug!(
            alphabet_size = header.alphabet_size,
            tree_bits = header.tree_bit_length,
            "wrote stream header"
        );

        Ok(Self {
            writer,
            encoder: BlockEncoder::new(tree.codebook()),
            header,
            summary: EncodeSummary {
                alphabet_size: header.alphabet_size as usize,
                tree_bits: header.tree_bit_length as u64,
                ..EncodeSummary::default()
            },
        })
    }

    /// The stream header.
    pub fn header(&self) -> StreamHeader {
        self.header
    }

    /// The codebook blocks are encoded with.
    pub fn codebook(&self) -> &Codebook {
        self.encoder.codebook()
    }

    /// Encode `bytes` and write them as one block record.
    ///
    /// Empty input writes nothing.
    pub fn write_block(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.is_empty() {
            return Ok(());
        }

        let bits = self.encoder.encode(bytes)?;
        let bit_len = u32::try_from(bits.len()).map_err(|_| {
            HuffError::invalid_config(format!(
                "block of {} bytes encodes to {} bits, beyond the u32 length prefix",
                bytes.len(),
                bits.len()
            ))
        })?;

        self.writer.write_u32(bit_len)?;
        self.writer.write_bits(&bits)?;

        self.summary.blocks += 1;
        self.summary.input_bytes += bytes.len() as u64;
        self.summary.payload_bits += bits.len() as u64;
        trace!(
            block = self.summary.blocks,
            bytes = bytes.len(),
            bits = bits.len(),
            "wrote block"
        );
        Ok(())
    }

    /// Flush the writer and return the run statistics.
    pub fn finish(mut self) -> Result<EncodeSummary> {
        self.writer.flush()?;
        self.summary.output_bytes = self.writer.bytes_written();
        debug!(
            input_bytes = self.summary.input_bytes,
            output_bytes = self.summary.output_bytes,
            blocks = self.summary.blocks,
            "finished stream"
        );
        Ok(self.summary)
    }
}

/// Reads a stream header, rebuilds the tree and decodes block records.
///
/// One [`BlockDecoder`] is kept for the whole stream so codewords that
/// straddle block records decode correctly.
#[derive(Debug)]
pub struct StreamDecoder<R: Read> {
    reader: RecordReader<R>,
    header: StreamHeader,
    decoder: BlockDecoder,
    summary: DecodeSummary,
}

impl<R: Read> StreamDecoder<R> {
    /// Read the header and tree, or return `None` for an empty stream.
    pub fn open(reader: R) -> Result<Option<Self>> {
        let mut reader = RecordReader::new(reader);
        let Some(header) = StreamHeader::try_read_from(&mut reader)? else {
            return Ok(None);
        };
        let tree = header.read_tree(&mut reader)?;

        debug!(
            alphabet_size = header.alphabet_size,
            tree_bits = header.tree_bit_length,
            depth = tree.depth(),
            "read stream header"
        );

        Ok(Some(Self {
            reader,
            header,
            decoder: BlockDecoder::new(tree),
            summary: DecodeSummary::default(),
        }))
    }

    /// Read the header and tree; an empty stream is a truncation error.
    pub fn new(reader: R) -> Result<Self> {
        Self::open(reader)?.ok_or_else(|| HuffError::truncated(HEADER_LEN, 0))
    }

    /// The stream header.
    pub fn header(&self) -> StreamHeader {
        self.header
    }

    /// The rebuilt tree.
    pub fn tree(&self) -> &HuffmanTree {
        self.decoder.tree()
    }

    /// Raw bytes decoded so far.
    pub fn bytes_decoded(&self) -> u64 {
        self.summary.output_bytes
    }

    /// Decode the next block record, or `None` at end of stream.
    pub fn next_block(&mut self) -> Result<Option<Vec<u8>>> {
        let mut out = Vec::new();
        Ok(self.next_block_into(&mut out)?.then_some(out))
    }

    /// Decode the next block record into `out`.
    ///
    /// Returns `false` at end of stream.
    pub fn next_block_into(&mut self, out: &mut Vec<u8>) -> Result<bool> {
        let Some(bit_len) = self.reader.try_read_u32()? else {
            return Ok(false);
        };
        let bits = self.reader.read_bits(bit_len as usize)?;

        let before = out.len();
        self.decoder.decode_into(&bits, out);

        self.summary.blocks += 1;
        self.summary.output_bytes += (out.len() - before) as u64;
        trace!(
            block = self.summary.blocks,
            bits = bit_len,
            bytes = out.len() - before,
            "read block"
        );
        Ok(true)
    }

    /// Verify the stream ended on a codeword boundary and return the run
    /// statistics.
    pub fn finish(mut self) -> Result<DecodeSummary> {
        self.decoder.finish()?;
        self.summary.input_bytes = self.reader.bytes_read();
        debug!(
            input_bytes = self.summary.input_bytes,
            output_bytes = self.summary.output_bytes,
            blocks = self.summary.blocks,
            "finished stream"
        );
        Ok(self.summary)
    }
}

/// Structural statistics of a compressed stream, gathered without decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamInfo {
    /// The stream header.
    pub header: StreamHeader,
    /// Depth of the stored tree (longest codeword).
    pub tree_depth: usize,
    /// Leaf symbols in alphabet order.
    pub alphabet: Vec<u8>,
    /// Number of block records.
    pub blocks: u64,
    /// Codeword bits across all blocks.
    pub payload_bits: u64,
    /// Total stream size in bytes.
    pub compressed_bytes: u64,
}

impl StreamInfo {
    /// Walk a stream's records, or return `None` for an empty stream.
    ///
    /// The tree is rebuilt to validate it; block payloads are skipped.
    pub fn inspect<R: Read>(reader: R) -> Result<Option<Self>> {
        let mut reader = RecordReader::new(reader);
        let Some(header) = StreamHeader::try_read_from(&mut reader)? else {
            return Ok(None);
        };
        let tree = header.read_tree(&mut reader)?;
        let (_, alphabet) = tree.serialize();

        let mut blocks = 0u64;
        let mut payload_bits = 0u64;
        while let Some(bit_len) = reader.try_read_u32()? {
            reader.skip_bits(bit_len as usize)?;
            blocks += 1;
            payload_bits += bit_len as u64;
        }

        Ok(Some(Self {
            header,
            tree_depth: tree.depth(),
            alphabet,
            blocks,
            payload_bits,
            compressed_bytes: reader.bytes_read(),
        }))
    }
}

/// Compress a seekable source into `writer`.
///
/// Makes a frequency pass over `reader`, rewinds to where it started, then
/// encodes in blocks of `config.block_size` bytes. Empty input writes
/// nothing.
pub fn compress_stream<R, W>(
    reader: &mut R,
    writer: W,
    config: &HuffmanConfig,
) -> Result<EncodeSummary>
where
    R: Read + Seek,
    W: Write,
{
    compress_stream_with_progress(reader, writer, config, |_| {})
}

/// [`compress_stream`] reporting the running count of encoded input bytes
/// after every block.
pub fn compress_stream_with_progress<R, W, F>(
    reader: &mut R,
    writer: W,
    config: &HuffmanConfig,
    mut progress: F,
) -> Result<EncodeSummary>
where
    R: Read + Seek,
    W: Write,
    F: FnMut(u64),
{
    config.validate()?;

    let start = reader.stream_position()?;
    let mut block = vec![0u8; config.block_size];

    let mut freqs = FrequencyTable::new();
    loop {
        let n = read_up_to(reader, &mut block)?;
        freqs.record(&block[..n]);
        if n < block.len() {
            break;
        }
    }

    if freqs.is_empty() {
        debug!("empty input, nothing to write");
        return Ok(EncodeSummary::default());
    }

    let tree = HuffmanTree::from_frequencies(&freqs)?;
    reader.seek(SeekFrom::Start(start))?;

    let mut encoder = StreamEncoder::new(writer, &tree)?;
    let mut encoded = 0u64;
    loop {
        let n = read_up_to(reader, &mut block)?;
        if n > 0 {
            encoder.write_block(&block[..n])?;
            encoded += n as u64;
            progress(encoded);
        }
        if n < block.len() {
            break;
        }
    }

    let expected = freqs.total();
    if encoded != expected {
        return Err(HuffError::truncated(
            usize::try_from(expected).unwrap_or(usize::MAX),
            usize::try_from(encoded).unwrap_or(usize::MAX),
        ));
    }

    encoder.finish()
}

/// Decompress a stream from `reader` into `writer`.
///
/// An empty stream produces empty output.
pub fn decompress_stream<R: Read, W: Write>(reader: R, writer: W) -> Result<DecodeSummary> {
    decompress_stream_with_progress(reader, writer, |_| {})
}

/// [`decompress_stream`] reporting the running count of decoded bytes after
/// every block.
pub fn decompress_stream_with_progress<R, W, F>(
    reader: R,
    mut writer: W,
    mut progress: F,
) -> Result<DecodeSummary>
where
    R: Read,
    W: Write,
    F: FnMut(u64),
{
    let Some(mut decoder) = StreamDecoder::open(reader)? else {
        debug!("empty stream, nothing to decode");
        return Ok(DecodeSummary::default());
    };

    let mut out = Vec::new();
    loop {
        out.clear();
        if !decoder.next_block_into(&mut out)? {
            break;
        }
        writer.write_all(&out)?;
        progress(decoder.bytes_decoded());
    }
    writer.flush()?;

    decoder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn compress_bytes(data: &[u8], block_size: usize) -> Vec<u8> {
        let config = HuffmanConfig::new(block_size).unwrap();
        let mut output = Vec::new();
        compress_stream(&mut Cursor::new(data), &mut output, &config).unwrap();
        output
    }

    #[test]
    fn test_exact_layout() {
        // b -> 0, a -> 1; shape 011, alphabet [b, a]
        let output = compress_bytes(b"aab", 64);
        let expected: Vec<u8> = [
            &[2u8, 0][..],
            &[3, 0, 0, 0],
            &[0b110, 0, 0, 0, 0, 0, 0, 0],
            b"ba",
            &[3, 0, 0, 0],
            &[0b011, 0, 0, 0, 0, 0, 0, 0],
        ]
        .concat();
        assert_eq!(output, expected);
    }

    #[test]
    fn test_header_roundtrip() {
        let header = StreamHeader {
            alphabet_size: 256,
            tree_bit_length: 511,
        };
        let mut output = Vec::new();
        header.write_to(&mut RecordWriter::new(&mut output)).unwrap();
        assert_eq!(output.len(), HEADER_LEN);

        let mut reader = RecordReader::new(Cursor::new(output));
        assert_eq!(StreamHeader::read_from(&mut reader).unwrap(), header);
        assert_eq!(header.shape_words(), 8);
        assert_eq!(header.tree_record_len(), 64 + 256);
    }

    #[test]
    fn test_header_validation() {
        let too_many = StreamHeader {
            alphabet_size: 257,
            tree_bit_length: 513,
        };
        assert!(matches!(
            too_many.validate(),
            Err(HuffError::CorruptTree { .. })
        ));

        let mismatched = StreamHeader {
            alphabet_size: 4,
            tree_bit_length: 6,
        };
        assert!(mismatched.validate().is_err());

        let lone = StreamHeader {
            alphabet_size: 1,
            tree_bit_length: 1,
        };
        assert!(lone.validate().is_err());
    }

    #[test]
    fn test_empty_stream() {
        assert!(compress_bytes(b"", 16).is_empty());

        let mut output = Vec::new();
        let summary = decompress_stream(Cursor::new(Vec::new()), &mut output).unwrap();
        assert!(output.is_empty());
        assert_eq!(summary, DecodeSummary::default());

        assert!(StreamDecoder::open(Cursor::new(Vec::new())).unwrap().is_none());
        assert!(StreamDecoder::new(Cursor::new(Vec::new())).is_err());
        assert!(StreamInfo::inspect(Cursor::new(Vec::new())).unwrap().is_none());
    }

    #[test]
    fn test_encoder_decoder_blocks() {
        let data = b"pack my box with five dozen liquor jugs";
        let mut freqs = FrequencyTable::new();
        freqs.record(data);
        let tree = HuffmanTree::from_frequencies(&freqs).unwrap();

        let mut output = Vec::new();
        let mut encoder = StreamEncoder::new(&mut output, &tree).unwrap();
        for chunk in data.chunks(5) {
            encoder.write_block(chunk).unwrap();
        }
        encoder.write_block(b"").unwrap();
        let summary = encoder.finish().unwrap();
        assert_eq!(summary.blocks, 8);
        assert_eq!(summary.input_bytes, data.len() as u64);
        assert_eq!(summary.output_bytes, output.len() as u64);

        let mut decoder = StreamDecoder::new(Cursor::new(&output)).unwrap();
        assert_eq!(decoder.tree(), &tree);

        let mut decoded = Vec::new();
        while let Some(block) = decoder.next_block().unwrap() {
            decoded.extend(block);
        }
        assert_eq!(decoded, data.to_vec());

        let summary = decoder.finish().unwrap();
        assert_eq!(summary.blocks, 8);
        assert_eq!(summary.input_bytes, output.len() as u64);
    }

    #[test]
    fn test_stream_info() {
        let data = b"inspect me without decoding".repeat(20);
        let output = compress_bytes(&data, 100);

        let info = StreamInfo::inspect(Cursor::new(&output)).unwrap().unwrap();
        assert_eq!(info.blocks, data.len().div_ceil(100) as u64);
        assert_eq!(info.compressed_bytes, output.len() as u64);
        assert_eq!(info.alphabet.len(), info.header.alphabet_size as usize);
        assert!(info.payload_bits > 0);
    }

    #[test]
    fn test_progress_reports() {
        let data = vec![7u8; 1000];
        let mut seen = Vec::new();
        let mut output = Vec::new();
        compress_stream_with_progress(
            &mut Cursor::new(&data),
            &mut output,
            &HuffmanConfig::new(300).unwrap(),
            |done| seen.push(done),
        )
        .unwrap();
        assert_eq!(seen, vec![300, 600, 900, 1000]);

        let mut seen = Vec::new();
        let mut decoded = Vec::new();
        decompress_stream_with_progress(Cursor::new(&output), &mut decoded, |done| {
            seen.push(done)
        })
        .unwrap();
        assert_eq!(seen, vec![300, 600, 900, 1000]);
        assert_eq!(decoded, data);
    }

    #[test]
    fn test_progress_on_exact_block_multiple() {
        let data = vec![3u8; 900];
        let mut seen = Vec::new();
        let mut output = Vec::new();
        compress_stream_with_progress(
            &mut Cursor::new(&data),
            &mut output,
            &HuffmanConfig::new(300).unwrap(),
            |done| seen.push(done),
        )
        .unwrap();
        assert_eq!(seen, vec![300, 600, 900]);
    }

    #[test]
    fn test_compress_from_offset() {
        let mut source = Cursor::new(b"skip:payload payload".to_vec());
        source.set_position(5);

        let mut output = Vec::new();
        compress_stream(&mut source, &mut output, &HuffmanConfig::default()).unwrap();

        let mut decoded = Vec::new();
        decompress_stream(Cursor::new(&output), &mut decoded).unwrap();
        assert_eq!(decoded, b"payload payload".to_vec());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = HuffmanConfig { block_size: 0 };
        let mut output = Vec::new();
        let err = compress_stream(&mut Cursor::new(b"abc"), &mut output, &config).unwrap_err();
        assert!(matches!(err, HuffError::InvalidConfig { .. }));
    }
}
