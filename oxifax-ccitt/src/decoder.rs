//! Fax stream decoder.

use crate::config::{FaxConfig, FaxMode};
use crate::error::{FaxError, Result};
use crate::line::{LineEnd, decode_1d, decode_2d};
use crate::runlength;
use crate::tables::EOL;
use log::{debug, trace};
use oxifax_core::{ByteSource, MsbBitReader};

/// Outcome of [`FaxDecoder::decode_row`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStatus {
    /// A row was written to the output buffer.
    Line,
    /// The end-of-stream framing was read; no row was produced.
    EndOfStream,
}

/// Streaming CCITT decoder: codes in, one packed row out per call.
#[derive(Debug)]
pub struct FaxDecoder<R: ByteSource> {
    config: FaxConfig,
    width: usize,
    reader: MsbBitReader<R>,
    reference: Vec<usize>,
    coding: Vec<usize>,
    lines_done: u64,
    finished: bool,
}

impl<R: ByteSource> FaxDecoder<R> {
    /// Create a decoder reading from `source`.
    pub fn new(config: FaxConfig, source: R) -> Result<Self> {
        config.validate()?;
        let width = config.effective_width();
        debug!("fax decoder: {:?}, width {}", config.mode, width);
        let mut decoder = Self {
            config,
            width,
            reader: MsbBitReader::new(source),
            reference: Vec::with_capacity(width + 2),
            coding: Vec::with_capacity(width + 2),
            lines_done: 0,
            finished: false,
        };
        decoder.reset_reference();
        Ok(decoder)
    }

    fn reset_reference(&mut self) {
        self.reference.clear();
        self.reference.extend([self.width, self.width + 1]);
    }

    /// Configuration in use.
    pub fn config(&self) -> &FaxConfig {
        &self.config
    }

    /// Line width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Rows decoded since creation or the last restart.
    pub fn lines_done(&self) -> u64 {
        self.lines_done
    }

    /// Total bits consumed so far.
    pub fn bits_read(&self) -> u64 {
        self.reader.bits_read()
    }

    /// Consume the decoder and return the source.
    pub fn into_inner(self) -> R {
        self.reader.into_inner()
    }

    /// Consume a G3 EOL, skipping fill bits in front of it.
    fn read_eol(&mut self) -> Result<()> {
        let mut fill = 0u64;
        loop {
            let bits = self.reader.peek_bits(EOL.len)?;
            if bits == u32::from(EOL.bits) {
                self.reader.consume(EOL.len)?;
                if fill > 0 {
                    trace!("skipped {} fill bits before EOL", fill);
                }
                return Ok(());
            }
            if bits != 0 {
                return Err(FaxError::wrong_code(
                    self.reader.bits_read(),
                    "expected EOL before line",
                ));
            }
            self.reader.consume(1)?;
            fill += 1;
        }
    }

    /// Decode the next row into `row`.
    ///
    /// `row` must hold at least `width.div_ceil(8)` bytes. Once the end of
    /// the stream has been reported, later calls report it again until
    /// [`restart`](Self::restart).
    pub fn decode_row(&mut self, row: &mut [u8]) -> Result<LineStatus> {
        let needed = self.width.div_ceil(8);
        if row.len() < needed {
            return Err(FaxError::InvalidArgument(format!(
                "row has {} bytes, width {} needs {}",
                row.len(),
                self.width,
                needed
            )));
        }
        if self.finished {
            return Ok(LineStatus::EndOfStream);
        }

        let end = match self.config.mode {
            FaxMode::G4 => decode_2d(
                &mut self.reader,
                &self.reference,
                &mut self.coding,
                self.width,
                true,
            )?,
            FaxMode::G3OneDimensional => {
                self.read_eol()?;
                decode_1d(&mut self.reader, &mut self.coding, self.width)?
            }
            FaxMode::G3TwoDimensional { .. } => {
                self.read_eol()?;
                if self.reader.read_bit()? {
                    decode_1d(&mut self.reader, &mut self.coding, self.width)?
                } else {
                    decode_2d(
                        &mut self.reader,
                        &self.reference,
                        &mut self.coding,
                        self.width,
                        false,
                    )?
                }
            }
        };

        if end == LineEnd::EndOfStream {
            debug!("fax end of stream after {} rows", self.lines_done);
            self.finished = true;
            return Ok(LineStatus::EndOfStream);
        }

        runlength::decode_row(&self.coding, self.width, row);
        trace!(
            "fax row {}: {} changes",
            self.lines_done,
            self.coding.len() - 2
        );
        std::mem::swap(&mut self.reference, &mut self.coding);
        self.lines_done += 1;
        Ok(LineStatus::Line)
    }

    /// Start a new image: all-white reference line, row counter reset,
    /// buffered bits dropped so the next image starts on a byte boundary.
    pub fn restart(&mut self) {
        self.reader.reset();
        self.reset_reference();
        self.lines_done = 0;
        self.finished = false;
        debug!("fax decoder restarted");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::FaxEncoder;

    #[test]
    fn test_g4_white_page() {
        let data = [0xC0, 0x04, 0x00, 0x40];
        let mut decoder = FaxDecoder::new(FaxConfig::new(FaxMode::G4, 16), &data[..]).unwrap();
        let mut row = [0xFFu8; 2];
        assert_eq!(decoder.decode_row(&mut row).unwrap(), LineStatus::Line);
        assert_eq!(row, [0, 0]);
        assert_eq!(decoder.decode_row(&mut row).unwrap(), LineStatus::Line);
        assert_eq!(
            decoder.decode_row(&mut row).unwrap(),
            LineStatus::EndOfStream
        );
        assert_eq!(decoder.lines_done(), 2);
        assert_eq!(
            decoder.decode_row(&mut row).unwrap(),
            LineStatus::EndOfStream
        );
    }

    #[test]
    fn test_g3_fill_bits_tolerated() {
        // EOL, 5 fill zeros, EOL, white 8, then RTC.
        let mut data = Vec::new();
        {
            let mut writer = oxifax_core::MsbBitWriter::new(&mut data);
            writer.write_bits(0, 5).unwrap();
            writer.write_bits(1, 12).unwrap();
            writer.write_bits(0b10011, 5).unwrap();
            for _ in 0..2 {
                writer.write_bits(1, 12).unwrap();
            }
            writer.flush().unwrap();
        }
        let config = FaxConfig::new(FaxMode::G3OneDimensional, 8);
        let mut decoder = FaxDecoder::new(config, &data[..]).unwrap();
        let mut row = [0xAAu8];
        assert_eq!(decoder.decode_row(&mut row).unwrap(), LineStatus::Line);
        assert_eq!(row, [0]);
        assert_eq!(
            decoder.decode_row(&mut row).unwrap(),
            LineStatus::EndOfStream
        );
    }

    #[test]
    fn test_g3_missing_eol() {
        let data = [0xFF, 0xFF];
        let config = FaxConfig::new(FaxMode::G3OneDimensional, 8);
        let mut decoder = FaxDecoder::new(config, &data[..]).unwrap();
        let mut row = [0u8];
        assert!(matches!(
            decoder.decode_row(&mut row),
            Err(FaxError::WrongCode { .. })
        ));
    }

    #[test]
    fn test_restart_between_images() {
        let config = FaxConfig::new(FaxMode::G4, 8);
        let mut encoder = FaxEncoder::new(config, Vec::new()).unwrap();
        encoder.encode_row(&[0xF0]).unwrap();
        encoder.finish().unwrap();
        encoder.restart();
        encoder.encode_row(&[0x0F]).unwrap();
        encoder.finish().unwrap();
        let data = encoder.into_inner();

        let mut decoder = FaxDecoder::new(config, &data[..]).unwrap();
        let mut row = [0u8];
        assert_eq!(decoder.decode_row(&mut row).unwrap(), LineStatus::Line);
        assert_eq!(row, [0xF0]);
        assert_eq!(
            decoder.decode_row(&mut row).unwrap(),
            LineStatus::EndOfStream
        );
        decoder.restart();
        assert_eq!(decoder.decode_row(&mut row).unwrap(), LineStatus::Line);
        assert_eq!(row, [0x0F]);
    }
}
