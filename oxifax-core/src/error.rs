//! Error types for bit channel operations.
//!
//! The bit channel only fails when the caller-supplied byte source or sink
//! fails, or when it is asked for a code wider than its accumulator allows.
//! Codec crates fold these variants into their own error enums.

use std::io;
use thiserror::Error;

/// Errors raised by the MSB-first bit channel.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// The byte source failed or ran out of data.
    #[error("Read error at bit position {bit_position}: {source}")]
    Read {
        /// Number of bits consumed before the failure.
        bit_position: u64,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The byte sink refused the data.
    #[error("Write error at bit position {bit_position}: {source}")]
    Write {
        /// Number of bits written before the failure.
        bit_position: u64,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A read or write asked for an unsupported number of bits.
    #[error("Invalid bit count: {0} (must be 1-24)")]
    InvalidBitCount(u8),
}

/// Result type alias for bit channel operations.
pub type Result<T> = std::result::Result<T, ChannelError>;

impl ChannelError {
    /// Create a read error.
    pub fn read(bit_position: u64, source: io::Error) -> Self {
        Self::Read {
            bit_position,
            source,
        }
    }

    /// Create a read error for a source that ran dry.
    pub fn read_eof(bit_position: u64) -> Self {
        Self::read(
            bit_position,
            io::Error::new(io::ErrorKind::UnexpectedEof, "byte source exhausted"),
        )
    }

    /// Create a write error.
    pub fn write(bit_position: u64, source: io::Error) -> Self {
        Self::Write {
            bit_position,
            source,
        }
    }

    /// Bit position associated with this error, if any.
    pub fn bit_position(&self) -> Option<u64> {
        match self {
            Self::Read { bit_position, .. } | Self::Write { bit_position, .. } => {
                Some(*bit_position)
            }
            Self::InvalidBitCount(_) => None,
        }
    }
}
