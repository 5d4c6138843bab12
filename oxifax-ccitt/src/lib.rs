//! # OxiFax-CCITT: Group 3/4 Fax Coding
//!
//! Streaming encoder and decoder for bilevel images in the ITU-T T.4/T.6
//! formats used by fax machines, TIFF and PDF:
//!
//! - **G3 1D** (Modified Huffman): every line run-length coded.
//! - **G3 2D** (Modified READ): one MH line every K lines, the others coded
//!   against the line above.
//! - **G4** (MMR): every line coded against the line above, no EOLs.
//!
//! Rows are packed one bit per pixel, most significant bit first, with 1
//! meaning black. Each row is padded to a whole byte.
//!
//! ## Example
//!
//! ```rust
//! use oxifax_ccitt::{FaxConfig, FaxMode, decode_image, encode_image};
//!
//! let config = FaxConfig::new(FaxMode::G4, 16);
//! let raster = [0x00, 0x00, 0x0F, 0xF0, 0x3F, 0xFC];
//!
//! let encoded = encode_image(&raster, 3, config).unwrap();
//! let decoded = decode_image(&encoded, config).unwrap();
//!
//! assert_eq!(decoded.height, 3);
//! assert_eq!(decoded.raster, raster);
//! ```
//!
//! ## Streaming
//!
//! [`FaxEncoder`] and [`FaxDecoder`] handle one row per call and keep only
//! the previous row's change elements between calls. They work on any
//! [`ByteSink`](oxifax_core::ByteSink) / [`ByteSource`](oxifax_core::ByteSource).

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

mod config;
mod decoder;
mod encoder;
mod error;
mod line;
pub mod runlength;
pub mod tables;

pub use config::{FaxConfig, FaxMode};
pub use decoder::{FaxDecoder, LineStatus};
pub use encoder::FaxEncoder;
pub use error::{FaxError, Result};

/// A decoded bilevel image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// Packed rows, `width.div_ceil(8)` bytes each.
    pub raster: Vec<u8>,
    /// Number of rows.
    pub height: usize,
}

/// Encode `height` packed rows and terminate the stream.
pub fn encode_image(raster: &[u8], height: usize, config: FaxConfig) -> Result<Vec<u8>> {
    let row_bytes = config.row_bytes();
    if raster.len() < row_bytes * height {
        return Err(FaxError::InvalidArgument(format!(
            "raster has {} bytes, {} rows need {}",
            raster.len(),
            height,
            row_bytes * height
        )));
    }

    let mut encoder = FaxEncoder::new(config, Vec::new())?;
    if row_bytes > 0 {
        for row in raster.chunks_exact(row_bytes).take(height) {
            encoder.encode_row(row)?;
        }
    }
    encoder.finish()?;
    Ok(encoder.into_inner())
}

/// Decode rows until the end-of-stream framing.
pub fn decode_image(data: &[u8], config: FaxConfig) -> Result<DecodedImage> {
    let mut decoder = FaxDecoder::new(config, data)?;
    let mut row = vec![0u8; config.row_bytes()];
    let mut raster = Vec::new();
    let mut height = 0;
    while decoder.decode_row(&mut row)? == LineStatus::Line {
        raster.extend_from_slice(&row);
        height += 1;
    }
    Ok(DecodedImage { raster, height })
}
