//! Fixed-width binary records over byte streams.
//!
//! The container format is a sequence of little-endian integers and
//! word-padded bit sequences. [`RecordWriter`] and [`RecordReader`] wrap any
//! `Write` / `Read` implementation and provide exact-length field I/O.
//!
//! A short read never zero-fills: it surfaces as
//! [`HuffError::TruncatedStream`]. A short read is only allowed when
//! [`RecordReader::try_read_u16`] or [`RecordReader::try_read_u32`] hit a
//! clean end of stream before the first byte of the field.
//!
//! # Example
//!
//! ```
//! use oxihuff_core::record::{RecordReader, RecordWriter};
//! use oxihuff_core::BitBuffer;
//! use std::io::Cursor;
//!
//! let bits: BitBuffer = [true, false, true].into_iter().collect();
//!
//! let mut output = Vec::new();
//! {
//!     let mut writer = RecordWriter::new(&mut output);
//!     writer.write_u32(bits.len() as u32).unwrap();
//!     writer.write_bits(&bits).unwrap();
//! }
//! assert_eq!(output.len(), 4 + 8);
//!
//! let mut reader = RecordReader::new(Cursor::new(output));
//! let len = reader.read_u32().unwrap() as usize;
//! assert_eq!(reader.read_bits(len).unwrap(), bits);
//! assert_eq!(reader.try_read_u32().unwrap(), None);
//! ```

use crate::bitbuf::{BitBuffer, WORD_BITS};
use crate::error::{HuffError, Result};
use std::io::{self, Read, Write};

/// Bytes per serialized word.
pub const WORD_BYTES: usize = WORD_BITS / 8;

/// Scratch size for streaming word-padded bit records (a multiple of 8).
const CHUNK_BYTES: usize = 8192;

/// Read into `buf` until it is full or the source reaches end of stream.
///
/// Returns the number of bytes read; anything less than `buf.len()` means
/// the source is exhausted. Interrupted reads are retried.
pub fn read_up_to<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Number of bytes a word-padded record of `bit_len` bits occupies.
#[inline]
pub fn padded_byte_len(bit_len: usize) -> usize {
    bit_len.div_ceil(WORD_BITS) * WORD_BYTES
}

/// Writes fixed-width little-endian records to any `Write` implementation.
#[derive(Debug)]
pub struct RecordWriter<W: Write> {
    /// Underlying writer.
    writer: W,
    /// Total bytes written.
    bytes_written: u64,
}

impl<W: Write> RecordWriter<W> {
    /// Create a new `RecordWriter` wrapping the given writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            bytes_written: 0,
        }
    }

    /// Get a reference to the underlying writer.
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Get a mutable reference to the underlying writer.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    /// Consume this `RecordWriter` and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Get the total number of bytes written so far.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Write raw bytes.
    pub fn write_bytes(&mut self, buf: &[u8]) -> Result<()> {
        self.writer.write_all(buf)?;
        self.bytes_written += buf.len() as u64;
        Ok(())
    }

    /// Write a little-endian `u16`.
    pub fn write_u16(&mut self, value: u16) -> Result<()> {
        self.write_bytes(&value.to_le_bytes())
    }

    /// Write a little-endian `u32`.
    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        self.write_bytes(&value.to_le_bytes())
    }

    /// Write the backing words of `bits`, each as 8 little-endian bytes.
    ///
    /// The bit length itself is not written; callers prefix it as the
    /// format requires.
    pub fn write_bits(&mut self, bits: &BitBuffer) -> Result<()> {
        let mut chunk = [0u8; CHUNK_BYTES];
        for words in bits.words().chunks(CHUNK_BYTES / WORD_BYTES) {
            for (dst, word) in chunk.chunks_exact_mut(WORD_BYTES).zip(words) {
                dst.copy_from_slice(&word.to_le_bytes());
            }
            self.write_bytes(&chunk[..words.len() * WORD_BYTES])?;
        }
        Ok(())
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Reads fixed-width little-endian records from any `Read` implementation.
#[derive(Debug)]
pub struct RecordReader<R: Read> {
    /// Underlying reader.
    reader: R,
    /// Total bytes read.
    bytes_read: u64,
}

impl<R: Read> RecordReader<R> {
    /// Create a new `RecordReader` wrapping the given reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            bytes_read: 0,
        }
    }

    /// Get a reference to the underlying reader.
    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    /// Get a mutable reference to the underlying reader.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.reader
    }

    /// Consume this `RecordReader` and return the underlying reader.
    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Get the total number of bytes read so far.
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Fill `buf` as far as possible, counting the bytes consumed.
    fn fill(&mut self, buf: &mut [u8]) -> Result<usize> {
        let n = read_up_to(&mut self.reader, buf)?;
        self.bytes_read += n as u64;
        Ok(n)
    }

    /// Fill `buf` exactly or fail with `TruncatedStream`.
    fn fill_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        let n = self.fill(buf)?;
        if n < buf.len() {
            return Err(HuffError::truncated(buf.len(), n));
        }
        Ok(())
    }

    /// Read a little-endian `u16`.
    pub fn read_u16(&mut self) -> Result<u16> {
        let mut buf = [0u8; 2];
        self.fill_exact(&mut buf)?;
        Ok(u16::from_le_bytes(buf))
    }

    /// Read a little-endian `u32`.
    pub fn read_u32(&mut self) -> Result<u32> {
        let mut buf = [0u8; 4];
        self.fill_exact(&mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }

    /// Read a little-endian `u16`, or `None` at a clean end of stream.
    ///
    /// A partially present field is still a `TruncatedStream` error.
    pub fn try_read_u16(&mut self) -> Result<Option<u16>> {
        let mut buf = [0u8; 2];
        match self.fill(&mut buf)? {
            0 => Ok(None),
            2 => Ok(Some(u16::from_le_bytes(buf))),
            n => Err(HuffError::truncated(2, n)),
        }
    }

    /// Read a little-endian `u32`, or `None` at a clean end of stream.
    ///
    /// A partially present field is still a `TruncatedStream` error.
    pub fn try_read_u32(&mut self) -> Result<Option<u32>> {
        let mut buf = [0u8; 4];
        match self.fill(&mut buf)? {
            0 => Ok(None),
            4 => Ok(Some(u32::from_le_bytes(buf))),
            n => Err(HuffError::truncated(4, n)),
        }
    }

    /// Read exactly `len` raw bytes.
    pub fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; len];
        self.fill_exact(&mut buf)?;
        Ok(buf)
    }

    /// Read a word-padded bit record holding `bit_len` valid bits.
    ///
    /// Words are pulled in fixed-size chunks so a forged length cannot force
    /// a large allocation ahead of the data actually being present.
    pub fn read_bits(&mut self, bit_len: usize) -> Result<BitBuffer> {
        let total = padded_byte_len(bit_len);
        let mut words = Vec::with_capacity(total.min(CHUNK_BYTES) / WORD_BYTES);

        self.stream_words(total, |chunk| {
            words.extend(chunk.chunks_exact(WORD_BYTES).map(le_word));
        })?;

        BitBuffer::from_words(words, bit_len)
    }

    /// Skip over a word-padded bit record holding `bit_len` bits.
    pub fn skip_bits(&mut self, bit_len: usize) -> Result<()> {
        self.stream_words(padded_byte_len(bit_len), |_| {})
    }

    /// Read `total` bytes in chunks, handing each chunk to `sink`.
    fn stream_words<F: FnMut(&[u8])>(&mut self, total: usize, mut sink: F) -> Result<()> {
        let mut chunk = [0u8; CHUNK_BYTES];
        let mut done = 0;

        while done < total {
            let want = (total - done).min(CHUNK_BYTES);
            let n = self.fill(&mut chunk[..want])?;
            if n < want {
                return Err(HuffError::truncated(total, done + n));
            }
            sink(&chunk[..want]);
            done += want;
        }

        Ok(())
    }
}

/// Decode one little-endian word from an 8-byte slice.
#[inline]
fn le_word(bytes: &[u8]) -> u64 {
    let mut word = [0u8; WORD_BYTES];
    word.copy_from_slice(bytes);
    u64::from_le_bytes(word)
}
