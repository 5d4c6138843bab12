//! LZW configuration (code widths and early change).

use crate::error::{LzwError, Result};

/// LZW configuration parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LzwConfig {
    /// Minimum code size in bits (9 for a byte alphabet).
    pub min_bits: u8,
    /// Maximum code size in bits (at most 12).
    pub max_bits: u8,
    /// Whether to use early code change.
    /// TIFF and PDF widen the code one code earlier than strictly needed.
    pub early_change: bool,
}

impl LzwConfig {
    /// TIFF/PDF LZW: 9-12 bit codes, MSB-first, early code change.
    pub const TIFF: Self = Self {
        min_bits: 9,
        max_bits: 12,
        early_change: true,
    };

    /// Classic LZW: 9-12 bit codes, MSB-first, no early change.
    pub const STANDARD: Self = Self {
        min_bits: 9,
        max_bits: 12,
        early_change: false,
    };

    /// Create a configuration with the standard widths.
    pub fn new(early_change: bool) -> Self {
        Self {
            early_change,
            ..Self::TIFF
        }
    }

    /// Check that the widths describe a byte-alphabet LZW stream.
    pub fn validate(&self) -> Result<()> {
        if self.min_bits != 9 {
            return Err(LzwError::InvalidBitWidth(self.min_bits));
        }
        if self.max_bits < self.min_bits || self.max_bits > 12 {
            return Err(LzwError::InvalidBitWidth(self.max_bits));
        }
        Ok(())
    }

    /// Get the clear code value (256 for 8-bit initial code size).
    pub fn clear_code(&self) -> u16 {
        1 << (self.min_bits - 1)
    }

    /// Get the end-of-information code value (clear_code + 1).
    pub fn end_code(&self) -> u16 {
        self.clear_code() + 1
    }

    /// Get the first available code for dictionary entries.
    pub fn first_code(&self) -> u16 {
        self.end_code() + 1
    }

    /// Get the largest code representable at the maximum width.
    pub fn max_code(&self) -> u16 {
        (1 << self.max_bits) - 1
    }

    /// How many codes early the width grows (0 or 1).
    pub fn early_offset(&self) -> u16 {
        u16::from(self.early_change)
    }

    /// Next code value at which a `bits`-wide code stops being enough.
    pub(crate) fn width_limit(&self, bits: u8) -> u16 {
        ((1u32 << bits) - u32::from(self.early_offset())) as u16
    }
}

impl Default for LzwConfig {
    fn default() -> Self {
        Self::TIFF
    }
}
