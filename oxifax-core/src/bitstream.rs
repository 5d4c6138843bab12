//! MSB-first bit channel.
//!
//! Both CCITT fax coding and TIFF LZW pack codes most significant bit first:
//! the first bit of a code lands in bit 7 of the current output byte. This
//! module provides [`MsbBitReader`] and [`MsbBitWriter`] on top of the
//! [`ByteSource`]/[`ByteSink`] capabilities.
//!
//! The reader splits lookahead from consumption. Table-driven prefix-code
//! decoders peek a fixed number of bits, look them up, and only then
//! consume the length of the code that actually matched.
//!
//! # Example
//!
//! ```
//! use oxifax_core::bitstream::{MsbBitReader, MsbBitWriter};
//!
//! let mut output = Vec::new();
//! {
//!     let mut writer = MsbBitWriter::new(&mut output);
//!     writer.write_bits(0b101, 3).unwrap();
//!     writer.write_bits(0b1100, 4).unwrap();
//!     writer.flush().unwrap();
//! }
//! assert_eq!(output, vec![0b1011_1000]);
//!
//! let mut reader = MsbBitReader::new(&output[..]);
//! assert_eq!(reader.peek_bits(3).unwrap(), 0b101);
//! reader.consume(3).unwrap();
//! assert_eq!(reader.read_bits(4).unwrap(), 0b1100);
//! ```

use crate::error::{ChannelError, Result};
use crate::traits::{ByteSink, ByteSource};
use std::io;

/// Widest code the channel reads or writes in one call.
pub const MAX_CODE_BITS: u8 = 24;

#[inline]
fn check_count(count: u8) -> Result<()> {
    if count == 0 || count > MAX_CODE_BITS {
        return Err(ChannelError::InvalidBitCount(count));
    }
    Ok(())
}

/// MSB-first bit reader.
#[derive(Debug)]
pub struct MsbBitReader<S: ByteSource> {
    /// Underlying byte source.
    source: S,
    /// Bit accumulator, left-aligned. Bits below the valid ones are zero.
    buffer: u32,
    /// Number of valid bits in the accumulator.
    bits_in_buffer: u8,
    /// The source reported end of data.
    exhausted: bool,
    /// Total bits consumed (for error reporting).
    total_bits_read: u64,
}

impl<S: ByteSource> MsbBitReader<S> {
    /// Create a new reader pulling bytes from `source`.
    pub fn new(source: S) -> Self {
        Self {
            source,
            buffer: 0,
            bits_in_buffer: 0,
            exhausted: false,
            total_bits_read: 0,
        }
    }

    /// Get a reference to the underlying source.
    pub fn get_ref(&self) -> &S {
        &self.source
    }

    /// Consume the reader and return the underlying source.
    ///
    /// Bits already pulled into the accumulator are lost.
    pub fn into_inner(self) -> S {
        self.source
    }

    /// Total number of bits consumed so far.
    pub fn bits_read(&self) -> u64 {
        self.total_bits_read
    }

    /// Number of bits currently held in the accumulator.
    pub fn bits_buffered(&self) -> u8 {
        self.bits_in_buffer
    }

    /// Discard the accumulator contents.
    pub fn reset(&mut self) {
        self.buffer = 0;
        self.bits_in_buffer = 0;
    }

    /// Pull whole bytes until at least `count` bits are buffered.
    ///
    /// Returns `false` if the source ran dry first.
    fn fill(&mut self, count: u8) -> Result<bool> {
        while self.bits_in_buffer < count {
            if self.exhausted {
                return Ok(false);
            }
            let mut byte = [0u8; 1];
            match self.source.read_bytes(&mut byte) {
                Ok(()) => {
                    self.buffer |= (byte[0] as u32) << (24 - self.bits_in_buffer);
                    self.bits_in_buffer += 8;
                }
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                    self.exhausted = true;
                    return Ok(false);
                }
                Err(e) => return Err(ChannelError::read(self.total_bits_read, e)),
            }
        }
        Ok(true)
    }

    /// Peek at the next `count` bits without consuming them.
    pub fn peek_bits(&mut self, count: u8) -> Result<u32> {
        check_count(count)?;
        if !self.fill(count)? {
            return Err(ChannelError::read_eof(self.total_bits_read));
        }
        Ok(self.buffer >> (32 - count))
    }

    /// Peek at the next `count` bits, zero-extending past the end of data.
    ///
    /// Lets a table lookup look further ahead than the final code of a
    /// stream. [`consume`](Self::consume) still refuses to eat the padding.
    pub fn peek_bits_padded(&mut self, count: u8) -> Result<u32> {
        check_count(count)?;
        self.fill(count)?;
        Ok(self.buffer >> (32 - count))
    }

    /// Discard `count` previously peeked bits.
    pub fn consume(&mut self, count: u8) -> Result<()> {
        if count == 0 {
            return Ok(());
        }
        check_count(count)?;
        if count > self.bits_in_buffer {
            return Err(ChannelError::read_eof(self.total_bits_read));
        }
        self.buffer <<= count;
        self.bits_in_buffer -= count;
        self.total_bits_read += count as u64;
        Ok(())
    }

    /// Read the next `count` bits.
    pub fn read_bits(&mut self, count: u8) -> Result<u32> {
        let value = self.peek_bits(count)?;
        self.consume(count)?;
        Ok(value)
    }

    /// Read a single bit.
    pub fn read_bit(&mut self) -> Result<bool> {
        Ok(self.read_bits(1)? != 0)
    }
}

/// MSB-first bit writer.
///
/// Completed bytes go to the sink as soon as they are full. Call
/// [`flush`](Self::flush) at the end of a stream to emit the last partial
/// byte.
#[derive(Debug)]
pub struct MsbBitWriter<S: ByteSink> {
    /// Underlying byte sink.
    sink: S,
    /// Bit accumulator, left-aligned.
    buffer: u32,
    /// Number of pending bits (always below 8 between calls).
    bits_in_buffer: u8,
    /// Total bits written.
    total_bits_written: u64,
}

impl<S: ByteSink> MsbBitWriter<S> {
    /// Create a new writer pushing bytes into `sink`.
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            buffer: 0,
            bits_in_buffer: 0,
            total_bits_written: 0,
        }
    }

    /// Get a reference to the underlying sink.
    pub fn get_ref(&self) -> &S {
        &self.sink
    }

    /// Get a mutable reference to the underlying sink.
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Consume the writer and return the underlying sink.
    ///
    /// Pending bits are not flushed; call [`flush`](Self::flush) first.
    pub fn into_inner(self) -> S {
        self.sink
    }

    /// Total number of bits written so far (including pending ones).
    pub fn bits_written(&self) -> u64 {
        self.total_bits_written
    }

    /// Number of bits waiting for a byte boundary.
    pub fn pending_bits(&self) -> u8 {
        self.bits_in_buffer
    }

    /// Drop pending bits without writing them.
    pub fn reset(&mut self) {
        self.buffer = 0;
        self.bits_in_buffer = 0;
    }

    /// Append the low `count` bits of `value`.
    pub fn write_bits(&mut self, value: u32, count: u8) -> Result<()> {
        check_count(count)?;

        let value = value & ((1u32 << count) - 1);
        self.buffer |= value << (32 - self.bits_in_buffer - count);
        self.bits_in_buffer += count;
        self.total_bits_written += count as u64;

        let mut out = [0u8; 4];
        let mut len = 0;
        while self.bits_in_buffer >= 8 {
            out[len] = (self.buffer >> 24) as u8;
            len += 1;
            self.buffer <<= 8;
            self.bits_in_buffer -= 8;
        }
        if len > 0 {
            self.sink
                .write_bytes(&out[..len])
                .map_err(|e| ChannelError::write(self.total_bits_written, e))?;
        }
        Ok(())
    }

    /// Pad the final partial byte with zero bits and emit it.
    pub fn flush(&mut self) -> Result<()> {
        if self.bits_in_buffer == 0 {
            return Ok(());
        }
        let byte = (self.buffer >> 24) as u8;
        self.total_bits_written += (8 - self.bits_in_buffer) as u64;
        self.reset();
        self.sink
            .write_bytes(&[byte])
            .map_err(|e| ChannelError::write(self.total_bits_written, e))
    }
}
