//! LZW encoder (compression).

use crate::config::LzwConfig;
use crate::dictionary::EncodeTable;
use crate::error::Result;
use log::{debug, trace};
use oxifax_core::{ByteSink, MsbBitWriter};

/// Streaming LZW encoder.
///
/// Bytes are fed with [`encode`](Self::encode) in chunks of any size and the
/// stream is terminated with [`finish`](Self::finish). Codes are written to
/// the sink as soon as whole bytes are available.
#[derive(Debug)]
pub struct LzwEncoder<W: ByteSink> {
    config: LzwConfig,
    writer: MsbBitWriter<W>,
    table: EncodeTable,
    /// Code of the longest matched string; `None` at a table boundary.
    prefix: Option<u16>,
    /// Code the next new string will receive.
    next_code: u16,
    /// Current code width.
    bits: u8,
    /// A CLEAR has been written and nothing coded since.
    cleared: bool,
}

impl<W: ByteSink> LzwEncoder<W> {
    /// Create a new encoder writing to `sink`.
    pub fn new(config: LzwConfig, sink: W) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            writer: MsbBitWriter::new(sink),
            table: EncodeTable::new(),
            prefix: None,
            next_code: config.first_code(),
            bits: config.min_bits,
            cleared: false,
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

    /// Total bits written so far.
    pub fn bits_written(&self) -> u64 {
        self.writer.bits_written()
    }

    /// Get a reference to the underlying sink.
    pub fn get_ref(&self) -> &W {
        self.writer.get_ref()
    }

    /// Consume the encoder and return the sink.
    ///
    /// Call [`finish`](Self::finish) first or the stream is incomplete.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    fn write_code(&mut self, code: u16) -> Result<()> {
        trace!("lzw code {} ({} bits)", code, self.bits);
        self.writer.write_bits(u32::from(code), self.bits)?;
        Ok(())
    }

    /// Emit CLEAR and start a fresh table.
    fn emit_clear(&mut self) -> Result<()> {
        self.write_code(self.config.clear_code())?;
        self.table.clear();
        self.next_code = self.config.first_code();
        self.bits = self.config.min_bits;
        self.cleared = true;
        Ok(())
    }

    /// Encode a chunk of input.
    pub fn encode(&mut self, data: &[u8]) -> Result<()> {
        let mut pos = 0;
        while pos < data.len() {
            let Some(mut prefix) = self.prefix else {
                if !self.cleared {
                    self.emit_clear()?;
                }
                self.cleared = false;
                self.prefix = Some(u16::from(data[pos]));
                pos += 1;
                continue;
            };

            while pos < data.len() {
                let byte = data[pos];
                if let Some(code) = self.table.find_or_insert(prefix, byte, self.next_code) {
                    prefix = code;
                    pos += 1;
                    continue;
                }

                self.next_code += 1;
                self.write_code(prefix)?;
                prefix = u16::from(byte);

                let added = self.next_code - 1;
                if self.bits == self.config.max_bits
                    && added == self.config.width_limit(self.bits) - 1
                {
                    // Restart one code early so the width never exceeds
                    // the maximum. `byte` starts the next table.
                    debug!("lzw table full at code {}, clearing", added);
                    self.prefix = None;
                    break;
                }
                if added == self.config.width_limit(self.bits) {
                    self.bits += 1;
                    debug!("lzw code width now {} bits", self.bits);
                }
                pos += 1;
            }

            if self.prefix.is_some() {
                self.prefix = Some(prefix);
            }
        }
        Ok(())
    }

    /// Write the pending prefix code.
    ///
    /// The decoder defines an entry when it reads this code, and may widen
    /// its code before reading the next one. Mirror that so the following
    /// CLEAR or END uses the same width.
    fn flush_prefix(&mut self) -> Result<()> {
        let Some(prefix) = self.prefix.take() else {
            return Ok(());
        };
        self.write_code(prefix)?;
        if self.next_code > self.config.first_code() {
            let added = self.next_code;
            self.next_code += 1;
            if self.bits < self.config.max_bits && added == self.config.width_limit(self.bits) {
                self.bits += 1;
            }
        }
        Ok(())
    }

    /// Force a CLEAR code now, resetting the dictionary on both sides.
    pub fn clear(&mut self) -> Result<()> {
        self.flush_prefix()?;
        self.emit_clear()
    }

    /// Terminate the stream: pending prefix, END, then zero padding.
    ///
    /// An encoder that saw no input since the last restart writes CLEAR
    /// followed by END.
    pub fn finish(&mut self) -> Result<()> {
        if self.prefix.is_none() && !self.cleared {
            self.write_code(self.config.clear_code())?;
        }
        self.flush_prefix()?;
        self.write_code(self.config.end_code())?;
        self.writer.flush()?;
        debug!(
            "lzw stream finished, {} bits written",
            self.writer.bits_written()
        );
        Ok(())
    }

    /// Reset to the initial state so a new stream can follow.
    ///
    /// Pending bits that were not flushed by [`finish`](Self::finish) are
    /// dropped.
    pub fn restart(&mut self) {
        self.writer.reset();
        self.table.clear();
        self.prefix = None;
        self.next_code = self.config.first_code();
        self.bits = self.config.min_bits;
        self.cleared = false;
    }
}
