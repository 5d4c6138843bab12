//! LZW-specific error types.

use oxifax_core::ChannelError;
use std::io;
use thiserror::Error;

/// LZW compression/decompression errors.
#[derive(Debug, Error)]
pub enum LzwError {
    /// A required argument was missing or out of range.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Invalid code width configuration.
    #[error("Invalid bit width: {0} (must be 9-12)")]
    InvalidBitWidth(u8),

    /// The byte source failed or ran out before the END code.
    #[error("Read error at bit position {bit_position}: {source}")]
    Read {
        /// Bit position where reading failed.
        bit_position: u64,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The byte sink failed.
    #[error("Write error at bit position {bit_position}: {source}")]
    Write {
        /// Bit position where writing failed.
        bit_position: u64,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A code referenced a dictionary entry that does not exist yet.
    #[error("Invalid LZW code: {code} (next code is {next_code})")]
    InvalidCode {
        /// The offending code.
        code: u16,
        /// The code the dictionary would assign next.
        next_code: u16,
    },
}

/// Result type for LZW operations.
pub type Result<T> = std::result::Result<T, LzwError>;

impl LzwError {
    /// Status code of the historical C interface for this error.
    pub fn code(&self) -> i32 {
        match self {
            Self::InvalidArgument(_) | Self::InvalidBitWidth(_) => -1,
            Self::Read { .. } => -2,
            Self::Write { .. } => -3,
            Self::InvalidCode { .. } => -5,
        }
    }
}

impl From<ChannelError> for LzwError {
    fn from(err: ChannelError) -> Self {
        match err {
            ChannelError::Read {
                bit_position,
                source,
            } => Self::Read {
                bit_position,
                source,
            },
            ChannelError::Write {
                bit_position,
                source,
            } => Self::Write {
                bit_position,
                source,
            },
            ChannelError::InvalidBitCount(bits) => Self::InvalidBitWidth(bits),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_error_mapping() {
        let err: LzwError = ChannelError::read_eof(17).into();
        assert!(matches!(err, LzwError::Read { bit_position: 17, .. }));
        assert_eq!(err.code(), -2);

        let err: LzwError = ChannelError::InvalidBitCount(0).into();
        assert_eq!(err.code(), -1);
    }

    #[test]
    fn test_invalid_code_display() {
        let err = LzwError::InvalidCode {
            code: 600,
            next_code: 300,
        };
        assert!(err.to_string().contains("600"));
        assert_eq!(err.code(), -5);
    }
}
