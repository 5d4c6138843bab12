//! Byte transport capabilities used by the bit channel.
//!
//! Codecs never talk to files or sockets directly. They pull bytes from a
//! [`ByteSource`] and push bytes into a [`ByteSink`]. Each call transfers the
//! whole buffer or fails; there is no partial-transfer contract.
//!
//! Every [`std::io::Read`] is a `ByteSource` and every [`std::io::Write`] is a
//! `ByteSink`, so `&[u8]`, `Vec<u8>`, files and cursors work out of the box.

use std::io::{self, Read, Write};

/// A source of bytes for decoding.
pub trait ByteSource {
    /// Fill `buf` completely.
    ///
    /// Running out of data is reported as an error of kind
    /// [`io::ErrorKind::UnexpectedEof`].
    fn read_bytes(&mut self, buf: &mut [u8]) -> io::Result<()>;
}

/// A sink of bytes for encoding.
pub trait ByteSink {
    /// Accept all of `buf`.
    fn write_bytes(&mut self, buf: &[u8]) -> io::Result<()>;
}

impl<R: Read> ByteSource for R {
    fn read_bytes(&mut self, buf: &mut [u8]) -> io::Result<()> {
        self.read_exact(buf)
    }
}

impl<W: Write> ByteSink for W {
    fn write_bytes(&mut self, buf: &[u8]) -> io::Result<()> {
        self.write_all(buf)
    }
}
