//! # OxiFax Core
//!
//! Core components shared by the OxiFax codecs.
//!
//! - [`bitstream`]: MSB-first bit reader/writer with split peek/consume
//! - [`traits`]: byte source/sink capabilities supplied by the caller
//! - [`error`]: error types
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ L3: Front end                                           │
//! │     oxifax CLI, PBM raster I/O, MMR framing header      │
//! ├─────────────────────────────────────────────────────────┤
//! │ L2: Codec                                               │
//! │     CCITT G3/G4 (MH + MR), TIFF LZW                     │
//! ├─────────────────────────────────────────────────────────┤
//! │ L1: Bit channel (this crate)                            │
//! │     MsbBitReader/MsbBitWriter, ByteSource/ByteSink      │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use oxifax_core::{MsbBitReader, MsbBitWriter};
//!
//! let mut stream = Vec::new();
//! let mut writer = MsbBitWriter::new(&mut stream);
//! writer.write_bits(0x001, 12).unwrap();
//! writer.flush().unwrap();
//!
//! let mut reader = MsbBitReader::new(&stream[..]);
//! assert_eq!(reader.read_bits(12).unwrap(), 0x001);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod bitstream;
pub mod error;
pub mod traits;

pub use bitstream::{MAX_CODE_BITS, MsbBitReader, MsbBitWriter};
pub use error::{ChannelError, Result};
pub use traits::{ByteSink, ByteSource};
