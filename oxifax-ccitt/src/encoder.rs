//! Fax stream encoder.

use crate::config::{FaxConfig, FaxMode};
use crate::error::{FaxError, Result};
use crate::line::{encode_1d, encode_2d, write_code};
use crate::runlength;
use crate::tables::EOL;
use log::{debug, trace};
use oxifax_core::{ByteSink, MsbBitWriter};

/// Number of EOL codes in the G3 return-to-control sequence.
const RTC_EOLS: usize = 7;

/// Streaming CCITT encoder: one packed row in, codes out.
#[derive(Debug)]
pub struct FaxEncoder<W: ByteSink> {
    config: FaxConfig,
    width: usize,
    writer: MsbBitWriter<W>,
    /// Change elements of the previous row.
    reference: Vec<usize>,
    /// Change elements of the row being coded.
    coding: Vec<usize>,
    lines_done: u64,
}

impl<W: ByteSink> FaxEncoder<W> {
    /// Create an encoder writing to `sink`.
    pub fn new(config: FaxConfig, sink: W) -> Result<Self> {
        config.validate()?;
        let width = config.effective_width();
        debug!("fax encoder: {:?}, width {}", config.mode, width);
        let mut encoder = Self {
            config,
            width,
            writer: MsbBitWriter::new(sink),
            reference: Vec::with_capacity(width + 2),
            coding: Vec::with_capacity(width + 2),
            lines_done: 0,
        };
        encoder.reset_reference();
        Ok(encoder)
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

    /// Rows encoded since creation or the last restart.
    pub fn lines_done(&self) -> u64 {
        self.lines_done
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

    /// Encode one packed row (1 = black, MSB first).
    ///
    /// `row` must hold at least `width.div_ceil(8)` bytes.
    pub fn encode_row(&mut self, row: &[u8]) -> Result<()> {
        let needed = self.width.div_ceil(8);
        if row.len() < needed {
            return Err(FaxError::InvalidArgument(format!(
                "row has {} bytes, width {} needs {}",
                row.len(),
                self.width,
                needed
            )));
        }

        runlength::encode_row(row, self.width, &mut self.coding);
        self.coding.push(self.width + 1);

        match self.config.mode {
            FaxMode::G4 => {
                encode_2d(&mut self.writer, &self.reference, &self.coding, self.width)?;
            }
            FaxMode::G3OneDimensional => {
                write_code(&mut self.writer, EOL)?;
                encode_1d(&mut self.writer, &self.coding, self.width)?;
            }
            FaxMode::G3TwoDimensional { k } => {
                write_code(&mut self.writer, EOL)?;
                if self.lines_done % u64::from(k) == 0 {
                    self.writer.write_bits(1, 1)?;
                    encode_1d(&mut self.writer, &self.coding, self.width)?;
                } else {
                    self.writer.write_bits(0, 1)?;
                    encode_2d(&mut self.writer, &self.reference, &self.coding, self.width)?;
                }
            }
        }
        trace!(
            "fax row {}: {} changes",
            self.lines_done,
            self.coding.len() - 1
        );

        std::mem::swap(&mut self.reference, &mut self.coding);
        self.lines_done += 1;
        Ok(())
    }

    /// Write the end-of-stream framing and pad to a byte boundary.
    ///
    /// Group 4 ends with EOFB (two EOLs); Group 3 with seven EOLs, each
    /// followed by the 1D tag bit in two-dimensional mode.
    pub fn finish(&mut self) -> Result<()> {
        match self.config.mode {
            FaxMode::G4 => {
                write_code(&mut self.writer, EOL)?;
                write_code(&mut self.writer, EOL)?;
            }
            FaxMode::G3OneDimensional => {
                for _ in 0..RTC_EOLS {
                    write_code(&mut self.writer, EOL)?;
                }
            }
            FaxMode::G3TwoDimensional { .. } => {
                for _ in 0..RTC_EOLS {
                    write_code(&mut self.writer, EOL)?;
                    self.writer.write_bits(1, 1)?;
                }
            }
        }
        self.writer.flush()?;
        debug!(
            "fax stream finished: {} rows, {} bits",
            self.lines_done,
            self.writer.bits_written()
        );
        Ok(())
    }

    /// Start a new image: all-white reference line, row counter reset,
    /// pending bits dropped.
    pub fn restart(&mut self) {
        self.writer.reset();
        self.reset_reference();
        self.lines_done = 0;
        debug!("fax encoder restarted");
    }
}
