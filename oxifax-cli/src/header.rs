//! MMR framing header.
//!
//! Eight bytes in front of a G4 stream: the signature `MMR`, a flags byte,
//! then width and height as big-endian `u16`.

use std::io::{self, Read, Write};
use thiserror::Error;

pub const SIGNATURE: [u8; 3] = *b"MMR";
pub const HEADER_LEN: usize = 8;

/// Pixel value 0 is black (inverse of PBM polarity).
const FLAG_MIN_IS_BLACK: u8 = 0x01;
/// Data is split into strips.
const FLAG_STRIPPED: u8 = 0x02;
const FLAGS_KNOWN: u8 = FLAG_MIN_IS_BLACK | FLAG_STRIPPED;

#[derive(Debug, Error)]
pub enum HeaderError {
    #[error("Can't read MMR header: {0}")]
    Io(#[from] io::Error),

    #[error("Corrupted MMR header")]
    Corrupted,

    #[error("Stripped data format for G4/MMR is unsupported")]
    Stripped,

    #[error("Image size {width}x{height} is too large for MMR header")]
    TooLarge { width: usize, height: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MmrHeader {
    pub width: u16,
    pub height: u16,
    /// Colors must be inverted after decoding.
    pub min_is_black: bool,
}

impl MmrHeader {
    /// Header for an image of the given size, PBM polarity.
    pub fn for_image(width: usize, height: usize) -> Result<Self, HeaderError> {
        match (u16::try_from(width), u16::try_from(height)) {
            (Ok(width), Ok(height)) => Ok(Self {
                width,
                height,
                min_is_black: false,
            }),
            _ => Err(HeaderError::TooLarge { width, height }),
        }
    }

    pub fn parse(bytes: &[u8; HEADER_LEN]) -> Result<Self, HeaderError> {
        let flags = bytes[3];
        if bytes[..3] != SIGNATURE || flags & !FLAGS_KNOWN != 0 {
            return Err(HeaderError::Corrupted);
        }
        if flags & FLAG_STRIPPED != 0 {
            return Err(HeaderError::Stripped);
        }
        Ok(Self {
            width: u16::from_be_bytes([bytes[4], bytes[5]]),
            height: u16::from_be_bytes([bytes[6], bytes[7]]),
            min_is_black: flags & FLAG_MIN_IS_BLACK != 0,
        })
    }

    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let flags = if self.min_is_black { FLAG_MIN_IS_BLACK } else { 0 };
        let width = self.width.to_be_bytes();
        let height = self.height.to_be_bytes();
        [
            SIGNATURE[0],
            SIGNATURE[1],
            SIGNATURE[2],
            flags,
            width[0],
            width[1],
            height[0],
            height[1],
        ]
    }

    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self, HeaderError> {
        let mut bytes = [0u8; HEADER_LEN];
        reader.read_exact(&mut bytes)?;
        Self::parse(&bytes)
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.to_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_bytes() {
        let header = MmrHeader::for_image(1728, 300).unwrap();
        let bytes = header.to_bytes();
        assert_eq!(bytes, [b'M', b'M', b'R', 0, 0x06, 0xC0, 0x01, 0x2C]);
        assert_eq!(MmrHeader::parse(&bytes).unwrap(), header);
    }

    #[test]
    fn test_min_is_black_flag() {
        let header = MmrHeader::parse(b"MMR\x01\x00\x08\x00\x02").unwrap();
        assert!(header.min_is_black);
        assert_eq!((header.width, header.height), (8, 2));
    }

    #[test]
    fn test_rejects_bad_headers() {
        assert!(matches!(
            MmrHeader::parse(b"MMX\x00\x00\x08\x00\x02"),
            Err(HeaderError::Corrupted)
        ));
        assert!(matches!(
            MmrHeader::parse(b"MMR\x04\x00\x08\x00\x02"),
            Err(HeaderError::Corrupted)
        ));
        assert!(matches!(
            MmrHeader::parse(b"MMR\x02\x00\x08\x00\x02"),
            Err(HeaderError::Stripped)
        ));
        assert!(matches!(
            MmrHeader::for_image(65536, 1),
            Err(HeaderError::TooLarge { .. })
        ));
        assert!(matches!(
            MmrHeader::read_from(&mut &b"MMR\x00"[..]),
            Err(HeaderError::Io(_))
        ));
    }
}
