//! Portable bitmap (PBM) reading and writing.
//!
//! Supports the plain `P1` and raw `P4` variants. Rows are packed MSB
//! first and padded to whole bytes; a set bit is black.

use crate::utils::row_bytes;
use std::io::{self, Read, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PbmError {
    #[error("Not a PBM file (expected P1 or P4 magic)")]
    BadMagic,

    #[error("Malformed PBM header: {0}")]
    BadHeader(&'static str),

    #[error("Invalid pixel character {0:?} in plain PBM")]
    BadPixel(char),

    #[error("PBM raster truncated: expected {expected} bytes, found {found}")]
    Truncated { expected: usize, found: usize },

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// A packed bilevel image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl Bitmap {
    /// Wrap packed rows, dropping any trailing partial row.
    pub fn from_rows(width: usize, mut data: Vec<u8>) -> Self {
        let stride = row_bytes(width);
        let height = if stride == 0 { 0 } else { data.len() / stride };
        data.truncate(stride * height);
        Self {
            width,
            height,
            data,
        }
    }

    /// Swap black and white, keeping row padding clear.
    pub fn invert(&mut self) {
        let stride = row_bytes(self.width);
        let tail = match self.width % 8 {
            0 => 0xFF,
            rem => 0xFFu8 << (8 - rem),
        };
        for row in self.data.chunks_mut(stride) {
            for byte in row.iter_mut() {
                *byte = !*byte;
            }
            if let Some(last) = row.last_mut() {
                *last &= tail;
            }
        }
    }

    /// Parse a complete PBM file.
    pub fn parse(input: &[u8]) -> Result<Self, PbmError> {
        let plain = match input {
            [b'P', b'1', ..] => true,
            [b'P', b'4', ..] => false,
            _ => return Err(PbmError::BadMagic),
        };
        let mut cursor = Cursor { input, pos: 2 };

        let width = cursor.number()?;
        let height = cursor.number()?;
        if width == 0 || height == 0 {
            return Err(PbmError::BadHeader("zero image dimension"));
        }
        if !cursor.next().is_some_and(|c| c.is_ascii_whitespace()) {
            return Err(PbmError::BadHeader("missing whitespace after height"));
        }

        let stride = row_bytes(width);
        let expected = stride * height;
        let data = if plain {
            let mut data = vec![0u8; expected];
            for y in 0..height {
                for x in 0..width {
                    match cursor.skip_whitespace() {
                        Some(b'1') => data[y * stride + x / 8] |= 0x80 >> (x % 8),
                        Some(b'0') => {}
                        Some(c) => return Err(PbmError::BadPixel(c as char)),
                        None => {
                            return Err(PbmError::Truncated {
                                expected,
                                found: y * stride + x / 8,
                            });
                        }
                    }
                }
            }
            data
        } else {
            let rest = &input[cursor.pos..];
            if rest.len() < expected {
                return Err(PbmError::Truncated {
                    expected,
                    found: rest.len(),
                });
            }
            rest[..expected].to_vec()
        };

        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Write as `P1` (plain) or `P4` (raw).
    pub fn write_to<W: Write>(&self, mut out: W, plain: bool) -> io::Result<()> {
        let stride = row_bytes(self.width);
        if plain {
            writeln!(out, "P1 {} {}", self.width, self.height)?;
            let mut line = String::with_capacity(self.width + 1);
            for row in self.data.chunks(stride.max(1)).take(self.height) {
                line.clear();
                for x in 0..self.width {
                    line.push(if row[x / 8] & (0x80 >> (x % 8)) != 0 { '1' } else { '0' });
                }
                line.push('\n');
                out.write_all(line.as_bytes())?;
            }
        } else {
            writeln!(out, "P4 {} {}", self.width, self.height)?;
            out.write_all(&self.data[..stride * self.height])?;
        }
        out.flush()
    }
}

/// Read a whole PBM file from `reader`.
pub fn read_pbm<R: Read>(mut reader: R) -> Result<Bitmap, PbmError> {
    let mut input = Vec::new();
    reader.read_to_end(&mut input)?;
    Bitmap::parse(&input)
}

struct Cursor<'a> {
    input: &'a [u8],
    pos: usize,
}

impl Cursor<'_> {
    fn next(&mut self) -> Option<u8> {
        let byte = self.input.get(self.pos).copied();
        if byte.is_some() {
            self.pos += 1;
        }
        byte
    }

    /// Next byte that is neither whitespace nor part of a comment.
    fn skip_whitespace(&mut self) -> Option<u8> {
        loop {
            match self.next()? {
                b'#' => while self.next()? != b'\n' {},
                c if c.is_ascii_whitespace() => {}
                c => return Some(c),
            }
        }
    }

    fn number(&mut self) -> Result<usize, PbmError> {
        let first = self
            .skip_whitespace()
            .ok_or(PbmError::BadHeader("missing dimension"))?;
        if !first.is_ascii_digit() {
            return Err(PbmError::BadHeader("dimension is not a number"));
        }
        let mut value = (first - b'0') as usize;
        while let Some(&c) = self.input.get(self.pos) {
            if !c.is_ascii_digit() {
                break;
            }
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add((c - b'0') as usize))
                .ok_or(PbmError::BadHeader("dimension too large"))?;
            self.pos += 1;
        }
        Ok(value)
    }
}
