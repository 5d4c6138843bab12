//! ASCII bit-string transport.
//!
//! Each byte travels as eight `'0'`/`'1'` characters, most significant bit
//! first. Handy for inspecting codes by eye.

use std::io::{self, Read, Write};

/// Reads `'0'`/`'1'` characters and yields the packed bytes.
///
/// Line breaks are skipped. If the text ends inside a byte, the missing
/// low bits are zero.
pub struct BitStringReader<R: Read> {
    inner: io::Bytes<R>,
}

impl<R: Read> BitStringReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner: inner.bytes(),
        }
    }

    /// Next significant character, `None` at end of input.
    fn next_char(&mut self) -> io::Result<Option<u8>> {
        loop {
            match self.inner.next().transpose()? {
                Some(b'\r' | b'\n') => continue,
                other => return Ok(other),
            }
        }
    }

    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        let mut byte = 0u8;
        for bit in 0..8 {
            match self.next_char()? {
                Some(b'1') => byte |= 0x80 >> bit,
                Some(b'0') => {}
                Some(c) => {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidData,
                        format!("invalid bit-string character {:?}", c as char),
                    ));
                }
                None if bit == 0 => return Ok(None),
                None => break,
            }
        }
        Ok(Some(byte))
    }
}

impl<R: Read> Read for BitStringReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.next_byte()? {
                Some(byte) => {
                    buf[filled] = byte;
                    filled += 1;
                }
                None => break,
            }
        }
        Ok(filled)
    }
}

/// Writes each byte as eight `'0'`/`'1'` characters.
pub struct BitStringWriter<W: Write> {
    inner: W,
}

impl<W: Write> BitStringWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Terminate the text with a newline and return the inner writer.
    pub fn finish(mut self) -> io::Result<W> {
        self.inner.write_all(b"\n")?;
        self.inner.flush()?;
        Ok(self.inner)
    }
}

impl<W: Write> Write for BitStringWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut text = Vec::with_capacity(buf.len() * 8);
        for &byte in buf {
            text.extend((0..8).map(|bit| if byte & (0x80 >> bit) != 0 { b'1' } else { b'0' }));
        }
        self.inner.write_all(&text)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
