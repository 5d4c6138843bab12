//! Fax stream configuration (coding scheme and line width).

use crate::error::{FaxError, Result};

/// Line coding scheme of a fax stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaxMode {
    /// Group 4 (T.6, MMR): every line two-dimensional, no EOL framing,
    /// terminated by EOFB.
    G4,
    /// Group 3 one-dimensional (T.4, MH): every line Modified Huffman,
    /// each preceded by EOL.
    G3OneDimensional,
    /// Group 3 two-dimensional (T.4, MR): one MH line every `k` lines, the
    /// rest Modified READ. Each line is preceded by EOL and a tag bit.
    G3TwoDimensional {
        /// Distance between forced one-dimensional lines.
        k: u32,
    },
}

impl FaxMode {
    /// Decode the historical K parameter: `-1` G4, `0` G3 1D, `>0` G3 2D.
    pub fn from_k(k: i32) -> Result<Self> {
        match k {
            -1 => Ok(Self::G4),
            0 => Ok(Self::G3OneDimensional),
            k if k > 0 => Ok(Self::G3TwoDimensional { k: k as u32 }),
            k => Err(FaxError::InvalidArgument(format!(
                "K must be -1, 0 or positive, got {k}"
            ))),
        }
    }

    /// Historical K parameter for this mode.
    pub fn k(&self) -> i32 {
        match *self {
            Self::G4 => -1,
            Self::G3OneDimensional => 0,
            Self::G3TwoDimensional { k } => k.min(i32::MAX as u32) as i32,
        }
    }

    /// Whether lines are framed by EOL codes.
    pub fn is_g3(&self) -> bool {
        !matches!(self, Self::G4)
    }
}

/// Fax codec configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaxConfig {
    /// Coding scheme.
    pub mode: FaxMode,
    /// Line width in pixels; 0 selects [`FaxConfig::DEFAULT_WIDTH`].
    pub width: usize,
}

impl FaxConfig {
    /// Standard A4 fax line width.
    pub const DEFAULT_WIDTH: usize = 1728;

    /// Group 4 at the default width.
    pub const G4: Self = Self {
        mode: FaxMode::G4,
        width: Self::DEFAULT_WIDTH,
    };

    /// Group 3 one-dimensional at the default width.
    pub const G3: Self = Self {
        mode: FaxMode::G3OneDimensional,
        width: Self::DEFAULT_WIDTH,
    };

    /// Create a configuration.
    pub fn new(mode: FaxMode, width: usize) -> Self {
        Self { mode, width }
    }

    /// Width actually used by the codec.
    pub fn effective_width(&self) -> usize {
        if self.width == 0 {
            Self::DEFAULT_WIDTH
        } else {
            self.width
        }
    }

    /// Bytes per packed row.
    pub fn row_bytes(&self) -> usize {
        self.effective_width().div_ceil(8)
    }

    /// Check the configuration.
    pub fn validate(&self) -> Result<()> {
        if let FaxMode::G3TwoDimensional { k: 0 } = self.mode {
            return Err(FaxError::InvalidArgument(
                "two-dimensional G3 needs K > 0".into(),
            ));
        }
        Ok(())
    }
}

impl Default for FaxConfig {
    fn default() -> Self {
        Self::G4
    }
}
