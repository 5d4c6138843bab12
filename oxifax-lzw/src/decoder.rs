//! LZW decoder (decompression).
//!
//! The decoder is pull-driven: each [`LzwDecoder::decode`] call fills the
//! caller's buffer, reading codes only as output space allows. Expansions
//! that do not fit stay on the dictionary stack for the next call.

use crate::config::LzwConfig;
use crate::dictionary::DecodeTable;
use crate::error::{LzwError, Result};
use log::{debug, trace, warn};
use oxifax_core::{ByteSource, MsbBitReader};

/// Outcome of one [`LzwDecoder::decode`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStatus {
    /// The output buffer was filled completely; call again for more.
    NeedsOutput,
    /// The END code was reached after writing this many bytes.
    Done(usize),
}

/// Streaming LZW decoder.
#[derive(Debug)]
pub struct LzwDecoder<R: ByteSource> {
    config: LzwConfig,
    reader: MsbBitReader<R>,
    table: DecodeTable,
    /// Previously decoded code; `None` right after CLEAR.
    prefix: Option<u16>,
    /// Code the next dictionary entry will receive.
    next_code: u16,
    /// Current code width.
    bits: u8,
    /// END has been read.
    finished: bool,
}

impl<R: ByteSource> LzwDecoder<R> {
    /// Create a new decoder reading from `source`.
    pub fn new(config: LzwConfig, source: R) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            reader: MsbBitReader::new(source),
            table: DecodeTable::new(),
            prefix: None,
            next_code: config.first_code(),
            bits: config.min_bits,
            finished: false,
        })
    }

    /// Configuration in use.
    pub fn config(&self) -> &LzwConfig {
        &self.config
    }

    /// Current code width in bits.
    pub fn code_bits(&self) -> u8 {
        self.bits
    }

    /// Code the next dictionary entry will receive.
    pub fn next_code(&self) -> u16 {
        self.next_code
    }

    /// Total bits consumed so far.
    pub fn bits_read(&self) -> u64 {
        self.reader.bits_read()
    }

    /// Consume the decoder and return the source.
    pub fn into_inner(self) -> R {
        self.reader.into_inner()
    }

    /// The table holds every code the maximum width can address.
    fn table_full(&self) -> bool {
        self.bits == self.config.max_bits
            && self.next_code >= self.config.width_limit(self.config.max_bits)
    }

    fn reset_table(&mut self) {
        self.prefix = None;
        self.next_code = self.config.first_code();
        self.bits = self.config.min_bits;
    }

    /// Add `prefix + byte` unless the table is full.
    fn define(&mut self, prefix: u16, byte: u8) -> bool {
        if self.table_full() {
            return false;
        }
        self.table.define(self.next_code, prefix, byte);
        self.next_code += 1;
        true
    }

    /// Decode into `out`.
    ///
    /// Returns [`DecodeStatus::NeedsOutput`] when `out` was filled before the
    /// END code, and [`DecodeStatus::Done`] with the number of bytes written
    /// by this call once END is read. Further calls after END return
    /// `Done(0)` until [`restart`](Self::restart).
    pub fn decode(&mut self, out: &mut [u8]) -> Result<DecodeStatus> {
        let mut written = 0;

        loop {
            let pending = self.table.pending();
            if !pending.is_empty() {
                let count = pending.len().min(out.len() - written);
                out[written..written + count].copy_from_slice(&pending[..count]);
                self.table.advance(count);
                written += count;
            }
            if self.finished {
                return Ok(DecodeStatus::Done(written));
            }
            if written == out.len() {
                return Ok(DecodeStatus::NeedsOutput);
            }

            let code = self.reader.read_bits(self.bits)? as u16;
            trace!("lzw code {} ({} bits)", code, self.bits);

            if code == self.config.clear_code() {
                self.reset_table();
                continue;
            }
            if code == self.config.end_code() {
                debug!("lzw end code after {} bits", self.reader.bits_read());
                self.finished = true;
                return Ok(DecodeStatus::Done(written));
            }

            let defined = if code < self.config.clear_code()
                || (code >= self.config.first_code() && code < self.next_code)
            {
                let first = self.table.push_expansion(code);
                match self.prefix {
                    Some(prefix) => self.define(prefix, first),
                    None => false,
                }
            } else if code == self.next_code && !self.table_full() {
                let Some(prefix) = self.prefix else {
                    return Err(LzwError::InvalidCode {
                        code,
                        next_code: self.next_code,
                    });
                };
                let first = self.table.push_self_reference(prefix);
                self.define(prefix, first)
            } else {
                return Err(LzwError::InvalidCode {
                    code,
                    next_code: self.next_code,
                });
            };
            self.prefix = Some(code);

            if defined && self.next_code == self.config.width_limit(self.bits) {
                if self.bits < self.config.max_bits {
                    self.bits += 1;
                    debug!("lzw code width now {} bits", self.bits);
                } else {
                    warn!("lzw table full, no further entries until CLEAR");
                }
            }
        }
    }

    /// Decode the rest of the stream into a vector.
    pub fn decode_to_end(&mut self) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            match self.decode(&mut chunk)? {
                DecodeStatus::NeedsOutput => output.extend_from_slice(&chunk),
                DecodeStatus::Done(n) => {
                    output.extend_from_slice(&chunk[..n]);
                    return Ok(output);
                }
            }
        }
    }

    /// Reset to the initial state so a new stream can follow.
    ///
    /// Bits buffered from the previous stream are dropped, so the next
    /// stream starts on a byte boundary.
    pub fn restart(&mut self) {
        self.reader.reset();
        self.table.clear_stack();
        self.reset_table();
        self.finished = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxifax_core::MsbBitWriter;

    /// Pack codes of the given width into an MSB-first stream.
    fn pack(codes: &[(u16, u8)]) -> Vec<u8> {
        let mut out = Vec::new();
        let mut writer = MsbBitWriter::new(&mut out);
        for &(code, bits) in codes {
            writer.write_bits(code as u32, bits).unwrap();
        }
        writer.flush().unwrap();
        out
    }

    #[test]
    fn test_decode_known_codes() {
        let data = pack(&[(256, 9), (65, 9), (66, 9), (258, 9), (260, 9), (257, 9)]);
        let mut decoder = LzwDecoder::new(LzwConfig::TIFF, &data[..]).unwrap();
        assert_eq!(decoder.decode_to_end().unwrap(), b"ABABABA");
    }

    #[test]
    fn test_small_output_buffer() {
        let data = pack(&[(256, 9), (65, 9), (66, 9), (258, 9), (260, 9), (257, 9)]);
        let mut decoder = LzwDecoder::new(LzwConfig::TIFF, &data[..]).unwrap();

        let mut out = Vec::new();
        let mut buf = [0u8; 2];
        loop {
            match decoder.decode(&mut buf).unwrap() {
                DecodeStatus::NeedsOutput => out.extend_from_slice(&buf),
                DecodeStatus::Done(n) => {
                    out.extend_from_slice(&buf[..n]);
                    break;
                }
            }
        }
        assert_eq!(out, b"ABABABA");
        assert_eq!(decoder.decode(&mut buf).unwrap(), DecodeStatus::Done(0));
    }

    #[test]
    fn test_exact_fit_reports_done_on_next_call() {
        let data = pack(&[(256, 9), (65, 9), (66, 9), (257, 9)]);
        let mut decoder = LzwDecoder::new(LzwConfig::TIFF, &data[..]).unwrap();
        let mut buf = [0u8; 2];
        assert_eq!(decoder.decode(&mut buf).unwrap(), DecodeStatus::NeedsOutput);
        assert_eq!(&buf, b"AB");
        assert_eq!(decoder.decode(&mut buf).unwrap(), DecodeStatus::Done(0));
    }

    #[test]
    fn test_invalid_code() {
        let data = pack(&[(256, 9), (65, 9), (300, 9), (257, 9)]);
        let mut decoder = LzwDecoder::new(LzwConfig::TIFF, &data[..]).unwrap();
        let err = decoder.decode_to_end().unwrap_err();
        assert!(matches!(
            err,
            LzwError::InvalidCode {
                code: 300,
                next_code: 258
            }
        ));
        assert_eq!(err.code(), -5);
    }

    #[test]
    fn test_self_reference_needs_prefix() {
        let data = pack(&[(256, 9), (258, 9), (257, 9)]);
        let mut decoder = LzwDecoder::new(LzwConfig::TIFF, &data[..]).unwrap();
        assert!(matches!(
            decoder.decode_to_end(),
            Err(LzwError::InvalidCode { code: 258, .. })
        ));
    }

    #[test]
    fn test_truncated_stream_is_read_error() {
        let data = pack(&[(256, 9), (65, 9), (66, 9)]);
        let mut decoder = LzwDecoder::new(LzwConfig::TIFF, &data[..]).unwrap();
        let err = decoder.decode_to_end().unwrap_err();
        assert!(matches!(err, LzwError::Read { .. }));
        assert_eq!(err.code(), -2);
    }

    #[test]
    fn test_clear_mid_stream() {
        let data = pack(&[
            (256, 9),
            (65, 9),
            (65, 9),
            (256, 9),
            (66, 9),
            (66, 9),
            (258, 9),
            (257, 9),
        ]);
        let mut decoder = LzwDecoder::new(LzwConfig::STANDARD, &data[..]).unwrap();
        assert_eq!(decoder.decode_to_end().unwrap(), b"AABBBB");
        assert_eq!(decoder.next_code(), 260);
    }

    #[test]
    fn test_restart_reads_second_stream() {
        let mut data = pack(&[(256, 9), (72, 9), (73, 9), (257, 9)]);
        data.extend(pack(&[(256, 9), (79, 9), (75, 9), (257, 9)]));
        let mut decoder = LzwDecoder::new(LzwConfig::TIFF, &data[..]).unwrap();
        assert_eq!(decoder.decode_to_end().unwrap(), b"HI");
        decoder.restart();
        assert_eq!(decoder.decode_to_end().unwrap(), b"OK");
    }
}
