//! ITU-T T.4 code tables and their decode tries.
//!
//! Encode tables are built at compile time from the canonical bit strings
//! of the recommendation. Decode tables are flat tries generated from the
//! same lists on first use.
//!
//! # Trie layout
//!
//! A [`CodeTrie`] is a vector of nodes of `2^chunk` entries each. Decoding
//! peeks `chunk` bits and indexes the current node:
//!
//! - [`TrieEntry::Leaf`]: a complete code; consume what is left of it.
//! - [`TrieEntry::Next`]: consume the chunk and continue in the child node.
//! - [`TrieEntry::Invalid`]: no code starts with these bits.

use crate::error::{FaxError, Result};
use oxifax_core::{ByteSource, ChannelError, MsbBitReader};
use std::sync::LazyLock;

/// A variable-length code, right-aligned in `bits`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Code {
    /// Code bits, most significant first.
    pub bits: u16,
    /// Code length in bits.
    pub len: u8,
}

const fn code(pattern: &str) -> Code {
    let bytes = pattern.as_bytes();
    let mut bits = 0u16;
    let mut i = 0;
    while i < bytes.len() {
        bits = (bits << 1) | (bytes[i] - b'0') as u16;
        i += 1;
    }
    Code {
        bits,
        len: bytes.len() as u8,
    }
}

const fn codes<const N: usize>(patterns: [&str; N]) -> [Code; N] {
    let mut out = [Code { bits: 0, len: 0 }; N];
    let mut i = 0;
    while i < N {
        out[i] = code(patterns[i]);
        i += 1;
    }
    out
}

/// White terminating codes, run lengths 0-63.
pub const WHITE_TERMINATING: [Code; 64] = codes([
    "00110101", "000111", "0111", "1000", "1011", "1100", "1110", "1111",
    "10011", "10100", "00111", "01000", "001000", "000011", "110100", "110101",
    "101010", "101011", "0100111", "0001100", "0001000", "0010111", "0000011", "0000100",
    "0101000", "0101011", "0010011", "0100100", "0011000", "00000010", "00000011", "00011010",
    "00011011", "00010010", "00010011", "00010100", "00010101", "00010110", "00010111", "00101000",
    "00101001", "00101010", "00101011", "00101100", "00101101", "00000100", "00000101", "00001010",
    "00001011", "01010010", "01010011", "01010100", "01010101", "00100100", "00100101", "01011000",
    "01011001", "01011010", "01011011", "01001010", "01001011", "00110010", "00110011", "00110100",
]);

/// White makeup codes, run lengths 64-1728 in steps of 64.
pub const WHITE_MAKEUP: [Code; 27] = codes([
    "11011", "10010", "010111", "0110111", "00110110", "00110111", "01100100", "01100101",
    "01101000", "01100111", "011001100", "011001101", "011010010", "011010011", "011010100",
    "011010101", "011010110", "011010111", "011011000", "011011001", "011011010", "011011011",
    "010011000", "010011001", "010011010", "011000", "010011011",
]);

/// Black terminating codes, run lengths 0-63.
pub const BLACK_TERMINATING: [Code; 64] = codes([
    "0000110111", "010", "11", "10", "011", "0011", "0010", "00011",
    "000101", "000100", "0000100", "0000101", "0000111", "00000100", "00000111", "000011000",
    "0000010111", "0000011000", "0000001000", "00001100111", "00001101000", "00001101100",
    "00000110111", "00000101000", "00000010111", "00000011000", "000011001010", "000011001011",
    "000011001100", "000011001101", "000001101000", "000001101001", "000001101010",
    "000001101011", "000011010010", "000011010011", "000011010100", "000011010101",
    "000011010110", "000011010111", "000001101100", "000001101101", "000011011010",
    "000011011011", "000001010100", "000001010101", "000001010110", "000001010111",
    "000001100100", "000001100101", "000001010010", "000001010011", "000000100100",
    "000000110111", "000000111000", "000000100111", "000000101000", "000001011000",
    "000001011001", "000000101011", "000000101100", "000001011010", "000001100110",
    "000001100111",
]);

/// Black makeup codes, run lengths 64-1728 in steps of 64.
pub const BLACK_MAKEUP: [Code; 27] = codes([
    "0000001111", "000011001000", "000011001001", "000001011011", "000000110011",
    "000000110100", "000000110101", "0000001101100", "0000001101101", "0000001001010",
    "0000001001011", "0000001001100", "0000001001101", "0000001110010", "0000001110011",
    "0000001110100", "0000001110101", "0000001110110", "0000001110111", "0000001010010",
    "0000001010011", "0000001010100", "0000001010101", "0000001011010", "0000001011011",
    "0000001100100", "0000001100101",
]);

/// Makeup codes shared by both colors, run lengths 1792-2560.
pub const EXTENDED_MAKEUP: [Code; 13] = codes([
    "00000001000", "00000001100", "00000001101", "000000010010", "000000010011",
    "000000010100", "000000010101", "000000010110", "000000010111", "000000011100",
    "000000011101", "000000011110", "000000011111",
]);

/// End-of-line code.
pub const EOL: Code = code("000000000001");

/// Longest run a single makeup code can carry.
pub const MAX_MAKEUP: usize = 2560;

/// Pass mode.
pub const MODE_PASS: Code = code("0001");
/// Horizontal mode.
pub const MODE_HORIZONTAL: Code = code("001");
/// Vertical mode codes for `a1 - b1` = -3..=3.
pub const MODE_VERTICAL: [Code; 7] = codes([
    "0000010", "000010", "010", "1", "011", "000011", "0000011",
]);
/// Extension (uncompressed mode entry); recognised but not supported.
pub const MODE_EXTENSION: Code = code("0000001");

/// Pixel color of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    /// Background, bit value 0.
    White,
    /// Foreground, bit value 1.
    Black,
}

impl Color {
    /// The other color.
    #[inline]
    pub fn flip(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }
}

/// Terminating code for a run below 64.
pub fn terminating_code(color: Color, run: usize) -> Code {
    debug_assert!(run < 64);
    match color {
        Color::White => WHITE_TERMINATING[run],
        Color::Black => BLACK_TERMINATING[run],
    }
}

/// Makeup code for a multiple of 64 in 64..=2560.
pub fn makeup_code(color: Color, run: usize) -> Code {
    debug_assert!((64..=MAX_MAKEUP).contains(&run) && run % 64 == 0);
    if run >= 1792 {
        return EXTENDED_MAKEUP[(run - 1792) / 64];
    }
    match color {
        Color::White => WHITE_MAKEUP[run / 64 - 1],
        Color::Black => BLACK_MAKEUP[run / 64 - 1],
    }
}

/// Vertical mode code for offset `a1 - b1`.
pub fn vertical_code(offset: isize) -> Code {
    debug_assert!((-3..=3).contains(&offset));
    MODE_VERTICAL[(offset + 3) as usize]
}

/// Symbols of the run-length tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunSymbol {
    /// Terminating (below 64) or makeup (64 and up) run length.
    Run(u16),
    /// End-of-line code.
    Eol,
}

/// Symbols of the two-dimensional mode table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeSymbol {
    /// Pass mode.
    Pass,
    /// Horizontal mode.
    Horizontal,
    /// Vertical mode with offset `a1 - b1`.
    Vertical(i8),
    /// End-of-line code.
    Eol,
    /// Extension code.
    Extension,
}

/// One trie slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrieEntry<T> {
    /// No code starts with these bits.
    Invalid,
    /// Continue in the node starting at this index.
    Next(u32),
    /// Complete code of `len` bits.
    Leaf {
        /// Total code length.
        len: u8,
        /// Decoded symbol.
        symbol: T,
    },
}

/// Flat prefix-code decode table.
#[derive(Debug)]
pub struct CodeTrie<T> {
    chunk: u8,
    entries: Vec<TrieEntry<T>>,
}

impl<T: Copy> CodeTrie<T> {
    /// Build a trie reading `chunk` bits per step.
    ///
    /// The code list must be prefix-free.
    pub fn build(chunk: u8, codes: &[(Code, T)]) -> Self {
        let mut trie = Self {
            chunk,
            entries: vec![TrieEntry::Invalid; 1 << chunk],
        };
        for &(code, symbol) in codes {
            trie.insert(code, symbol);
        }
        trie
    }

    fn insert(&mut self, code: Code, symbol: T) {
        let chunk = self.chunk;
        let mut node = 0usize;
        let mut depth = 0u8;

        while code.len - depth > chunk {
            let shift = code.len - depth - chunk;
            let index = node + ((code.bits >> shift) as usize & ((1 << chunk) - 1));
            node = match self.entries[index] {
                TrieEntry::Next(child) => child as usize,
                TrieEntry::Invalid => {
                    let child = self.entries.len();
                    self.entries
                        .resize(child + (1 << chunk), TrieEntry::Invalid);
                    self.entries[index] = TrieEntry::Next(child as u32);
                    child
                }
                TrieEntry::Leaf { .. } => {
                    debug_assert!(false, "code {code:?} extends a shorter code");
                    return;
                }
            };
            depth += chunk;
        }

        let rest = code.len - depth;
        let tail = (code.bits as usize & ((1 << rest) - 1)) << (chunk - rest);
        for slot in &mut self.entries[node + tail..node + tail + (1 << (chunk - rest))] {
            debug_assert!(
                matches!(slot, TrieEntry::Invalid),
                "code {code:?} collides with another code"
            );
            *slot = TrieEntry::Leaf {
                len: code.len,
                symbol,
            };
        }
    }

    /// Number of slots (for diagnostics).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the trie has no slots.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Decode one code from `reader`.
    pub fn decode<S: ByteSource>(&self, reader: &mut MsbBitReader<S>) -> Result<T> {
        let start = reader.bits_read();
        let mut node = 0usize;
        let mut consumed = 0u8;
        loop {
            let bits = reader.peek_bits_padded(self.chunk)?;
            match self.entries[node + bits as usize] {
                TrieEntry::Leaf { len, symbol } => {
                    reader.consume(len - consumed)?;
                    return Ok(symbol);
                }
                TrieEntry::Next(child) => {
                    reader.consume(self.chunk)?;
                    consumed += self.chunk;
                    node = child as usize;
                }
                TrieEntry::Invalid => {
                    if reader.bits_buffered() < self.chunk {
                        // Padding decided the lookup; the stream just ended.
                        return Err(ChannelError::read_eof(reader.bits_read()).into());
                    }
                    return Err(FaxError::UnknownCode {
                        bit_position: start,
                    });
                }
            }
        }
    }
}

fn run_trie(terminating: &[Code; 64], makeup: &[Code; 27]) -> CodeTrie<RunSymbol> {
    let mut list: Vec<(Code, RunSymbol)> = Vec::with_capacity(64 + 27 + 13 + 1);
    list.extend(
        terminating
            .iter()
            .enumerate()
            .map(|(run, &c)| (c, RunSymbol::Run(run as u16))),
    );
    list.extend(
        makeup
            .iter()
            .enumerate()
            .map(|(i, &c)| (c, RunSymbol::Run(((i + 1) * 64) as u16))),
    );
    list.extend(
        EXTENDED_MAKEUP
            .iter()
            .enumerate()
            .map(|(i, &c)| (c, RunSymbol::Run((1792 + i * 64) as u16))),
    );
    list.push((EOL, RunSymbol::Eol));
    CodeTrie::build(8, &list)
}

/// Decode table for white runs.
pub static WHITE_RUNS: LazyLock<CodeTrie<RunSymbol>> =
    LazyLock::new(|| run_trie(&WHITE_TERMINATING, &WHITE_MAKEUP));

/// Decode table for black runs.
pub static BLACK_RUNS: LazyLock<CodeTrie<RunSymbol>> =
    LazyLock::new(|| run_trie(&BLACK_TERMINATING, &BLACK_MAKEUP));

/// Decode table for two-dimensional mode codes.
pub static MODES: LazyLock<CodeTrie<ModeSymbol>> = LazyLock::new(|| {
    let mut list = vec![
        (MODE_PASS, ModeSymbol::Pass),
        (MODE_HORIZONTAL, ModeSymbol::Horizontal),
        (EOL, ModeSymbol::Eol),
        (MODE_EXTENSION, ModeSymbol::Extension),
    ];
    list.extend(
        MODE_VERTICAL
            .iter()
            .zip(-3i8..=3)
            .map(|(&c, offset)| (c, ModeSymbol::Vertical(offset))),
    );
    CodeTrie::build(4, &list)
});

/// Decode table for runs of `color`.
pub fn run_trie_for(color: Color) -> &'static CodeTrie<RunSymbol> {
    match color {
        Color::White => &WHITE_RUNS,
        Color::Black => &BLACK_RUNS,
    }
}
