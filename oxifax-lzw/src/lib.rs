//! # OxiFax-LZW: Streaming TIFF/GIF-style LZW
//!
//! Adaptive-dictionary LZW over a byte alphabet with MSB-first code
//! packing, as used by TIFF and PDF.
//!
//! ## Stream format
//!
//! - **Reserved codes**: CLEAR (256) resets the dictionary, END (257)
//!   terminates the stream. Literal bytes are codes 0-255 and new strings
//!   are numbered from 258.
//! - **9-12 bit codes**: the width starts at 9 bits and grows as the
//!   dictionary fills.
//! - **Early change**: TIFF widens the code one entry before strictly
//!   necessary. [`LzwConfig::TIFF`] enables it, [`LzwConfig::STANDARD`]
//!   does not.
//! - **Table full**: the encoder emits CLEAR itself one code before the
//!   12-bit table would need a 13th bit. A decoder fed a stream that keeps
//!   going stops adding entries and reads 12-bit codes until CLEAR or END.
//!
//! ## Streaming
//!
//! [`LzwEncoder`] accepts input in chunks of any size and writes to any
//! [`ByteSink`](oxifax_core::ByteSink). [`LzwDecoder`] fills caller buffers
//! of any size from any [`ByteSource`](oxifax_core::ByteSource), keeping
//! expansions that did not fit for the next call.
//!
//! ## Example
//!
//! ```rust
//! use oxifax_lzw::{compress_tiff, decompress_tiff};
//!
//! let original = b"TOBEORNOTTOBEORTOBEORNOT";
//! let compressed = compress_tiff(original).unwrap();
//! let decompressed = decompress_tiff(&compressed).unwrap();
//! assert_eq!(decompressed, original);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

mod config;
mod decoder;
mod dictionary;
mod encoder;
mod error;

pub use config::LzwConfig;
pub use decoder::{DecodeStatus, LzwDecoder};
pub use encoder::LzwEncoder;
pub use error::{LzwError, Result};

/// Compress data with LZW using the given configuration.
///
/// # Example
///
/// ```rust
/// use oxifax_lzw::{compress, LzwConfig};
///
/// let data = b"TOBEORNOTTOBEORTOBEORNOT";
/// let compressed = compress(data, LzwConfig::TIFF).unwrap();
/// assert!(compressed.len() < data.len());
/// ```
pub fn compress(data: &[u8], config: LzwConfig) -> Result<Vec<u8>> {
    let mut encoder = LzwEncoder::new(config, Vec::with_capacity(data.len() / 2 + 4))?;
    encoder.encode(data)?;
    encoder.finish()?;
    Ok(encoder.into_inner())
}

/// Decompress an LZW stream up to its END code.
///
/// # Example
///
/// ```rust
/// use oxifax_lzw::{compress, decompress, LzwConfig};
///
/// let original = b"Hello, World!";
/// let compressed = compress(original, LzwConfig::STANDARD).unwrap();
/// let decompressed = decompress(&compressed, LzwConfig::STANDARD).unwrap();
/// assert_eq!(decompressed, original);
/// ```
pub fn decompress(data: &[u8], config: LzwConfig) -> Result<Vec<u8>> {
    let mut decoder = LzwDecoder::new(config, data)?;
    decoder.decode_to_end()
}

/// Compress data with TIFF LZW.
///
/// Equivalent to `compress(data, LzwConfig::TIFF)`.
pub fn compress_tiff(data: &[u8]) -> Result<Vec<u8>> {
    compress(data, LzwConfig::TIFF)
}

/// Decompress TIFF LZW data.
///
/// Equivalent to `decompress(data, LzwConfig::TIFF)`.
pub fn decompress_tiff(data: &[u8]) -> Result<Vec<u8>> {
    decompress(data, LzwConfig::TIFF)
}
