//! Fax codec error types.

use oxifax_core::ChannelError;
use std::io;
use thiserror::Error;

/// CCITT fax encoding/decoding errors.
#[derive(Debug, Error)]
pub enum FaxError {
    /// A row buffer or configuration value is unusable.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The byte source failed or ran out of data mid-code.
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

    /// The bits do not form any code of the table in use.
    #[error("Unknown code at bit position {bit_position}")]
    UnknownCode {
        /// Bit position of the first bit of the code.
        bit_position: u64,
    },

    /// A valid code appeared where the protocol forbids it.
    #[error("Wrong code at bit position {bit_position}: {reason}")]
    WrongCode {
        /// Bit position just after the offending code.
        bit_position: u64,
        /// What was wrong.
        reason: &'static str,
    },
}

/// Result type for fax operations.
pub type Result<T> = std::result::Result<T, FaxError>;

impl FaxError {
    /// Create a wrong-code error.
    pub fn wrong_code(bit_position: u64, reason: &'static str) -> Self {
        Self::WrongCode {
            bit_position,
            reason,
        }
    }

    /// Status code of the historical C interface for this error.
    pub fn code(&self) -> i32 {
        match self {
            Self::InvalidArgument(_) => -1,
            Self::Read { .. } => -2,
            Self::Write { .. } => -3,
            Self::UnknownCode { .. } => -4,
            Self::WrongCode { .. } => -5,
        }
    }
}

impl From<ChannelError> for FaxError {
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
            ChannelError::InvalidBitCount(bits) => {
                Self::InvalidArgument(format!("bit count {bits} out of range"))
            }
        }
    }
}
