//! LZW dictionary (code table) structures.
//!
//! Encoding and decoding need different views of the same table, so each
//! side gets its own structure:
//!
//! - [`EncodeTable`]: open-addressing hash table keyed by
//!   `(prefix code, next byte)`, yielding the code assigned to that string.
//! - [`DecodeTable`]: direct-indexed `code -> (prefix code, last byte)`
//!   table plus the stack used to reverse a prefix chain into output order.
//!
//! Both pack an entry into one `u32`:
//!
//! ```text
//! bits 31..20  code (encode side only)
//! bits 19..8   prefix code
//! bits  7..0   trailing byte
//! ```

/// Number of slots in the encoder hash table.
///
/// Prime and more than twice the 4096 addressable codes, so linear probing
/// always reaches an empty slot.
pub const HASH_SIZE: usize = 9001;

/// Highest number of codes any configuration can address.
const MAX_CODES: usize = 1 << 12;

#[inline]
fn pack(code: u16, prefix: u16, byte: u8) -> u32 {
    (u32::from(code) << 20) | (u32::from(prefix) << 8) | u32::from(byte)
}

#[inline]
fn entry_code(entry: u32) -> u16 {
    ((entry >> 20) & 0xFFF) as u16
}

#[inline]
fn entry_prefix(entry: u32) -> u16 {
    ((entry >> 8) & 0xFFF) as u16
}

#[inline]
fn entry_byte(entry: u32) -> u8 {
    (entry & 0xFF) as u8
}

#[inline]
fn hash(prefix: u16, byte: u8) -> usize {
    let key = (u64::from(prefix) << 8) | u64::from(byte);
    ((key << 11) % HASH_SIZE as u64) as usize
}

/// Encoder dictionary: `(prefix, byte) -> code`.
#[derive(Debug)]
pub struct EncodeTable {
    /// Packed entries; zero marks an empty slot (codes start at 258).
    slots: Vec<u32>,
    /// Number of occupied slots.
    len: usize,
}

impl EncodeTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            slots: vec![0; HASH_SIZE],
            len: 0,
        }
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.slots.fill(0);
        self.len = 0;
    }

    /// Number of strings stored.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no strings are stored.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Look up `prefix + byte`.
    ///
    /// Returns the existing code on a hit. On a miss the string is stored
    /// under `new_code` and `None` is returned.
    pub fn find_or_insert(&mut self, prefix: u16, byte: u8, new_code: u16) -> Option<u16> {
        debug_assert!(self.len < MAX_CODES, "hash table must never fill");

        let mut slot = hash(prefix, byte);
        loop {
            let entry = self.slots[slot];
            if entry == 0 {
                break;
            }
            if entry_prefix(entry) == prefix && entry_byte(entry) == byte {
                return Some(entry_code(entry));
            }
            slot = (slot + 1) % HASH_SIZE;
        }

        self.slots[slot] = pack(new_code, prefix, byte);
        self.len += 1;
        None
    }
}

impl Default for EncodeTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Decoder dictionary: `code -> (prefix, byte)` plus the reversal stack.
#[derive(Debug)]
pub struct DecodeTable {
    /// Packed `(prefix, byte)` entries indexed by code.
    entries: Vec<u32>,
    /// Expansion stack; valid bytes are `stack[top..]`, in output order.
    stack: Vec<u8>,
    /// Index of the first pending byte.
    top: usize,
}

impl DecodeTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            entries: vec![0; MAX_CODES],
            stack: vec![0; MAX_CODES],
            top: MAX_CODES,
        }
    }

    /// Drop any pending output.
    pub fn clear_stack(&mut self) {
        self.top = self.stack.len();
    }

    /// Define `code` as `prefix + byte`.
    pub fn define(&mut self, code: u16, prefix: u16, byte: u8) {
        self.entries[code as usize] = pack(0, prefix, byte);
    }

    /// Bytes expanded but not yet delivered.
    pub fn pending(&self) -> &[u8] {
        &self.stack[self.top..]
    }

    /// Mark `count` pending bytes as delivered.
    pub fn advance(&mut self, count: usize) {
        self.top = (self.top + count).min(self.stack.len());
    }

    #[inline]
    fn push(&mut self, byte: u8) {
        // Chains strictly decrease towards a literal, so the depth is
        // bounded by the code count and fits the stack.
        debug_assert!(self.top > 0, "expansion stack overflow");
        self.top -= 1;
        self.stack[self.top] = byte;
    }

    /// Push the string for `code` onto the stack and return its first byte.
    ///
    /// `code` must be a literal or a defined dictionary code.
    pub fn push_expansion(&mut self, mut code: u16) -> u8 {
        while code > 0xFF {
            let entry = self.entries[code as usize];
            self.push(entry_byte(entry));
            code = entry_prefix(entry);
        }
        let first = code as u8;
        self.push(first);
        first
    }

    /// Push `string(prefix) + first byte of string(prefix)`.
    ///
    /// This is the expansion of the code being defined by this very step
    /// (the `KwKwK` case). Returns the first byte.
    pub fn push_self_reference(&mut self, prefix: u16) -> u8 {
        self.push(0);
        let tail = self.top;
        let first = self.push_expansion(prefix);
        self.stack[tail] = first;
        first
    }
}

impl Default for DecodeTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_table_insert_and_find() {
        let mut table = EncodeTable::new();
        assert!(table.is_empty());

        assert_eq!(table.find_or_insert(b'A' as u16, b'B', 258), None);
        assert_eq!(table.find_or_insert(b'A' as u16, b'B', 259), Some(258));
        assert_eq!(table.find_or_insert(258, b'C', 259), None);
        assert_eq!(table.find_or_insert(258, b'C', 260), Some(259));
        assert_eq!(table.len(), 2);

        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.find_or_insert(b'A' as u16, b'B', 258), None);
    }

    #[test]
    fn test_encode_table_survives_full_code_space() {
        // Every possible code lands somewhere; probing never cycles.
        let mut table = EncodeTable::new();
        let mut code = 258u16;
        'outer: for prefix in 0..4096u16 {
            for byte in 0..=255u8 {
                if code == 4096 {
                    break 'outer;
                }
                assert_eq!(table.find_or_insert(prefix, byte, code), None);
                code += 1;
            }
        }
        assert_eq!(table.len(), 4096 - 258);
        assert_eq!(table.find_or_insert(0, 0, 0), Some(258));
    }

    #[test]
    fn test_decode_table_expansion() {
        let mut table = DecodeTable::new();
        table.define(258, b'A' as u16, b'B');
        table.define(259, 258, b'C');

        let first = table.push_expansion(259);
        assert_eq!(first, b'A');
        assert_eq!(table.pending(), b"ABC");

        table.advance(2);
        assert_eq!(table.pending(), b"C");
        table.advance(1);
        assert!(table.pending().is_empty());
    }

    #[test]
    fn test_decode_table_self_reference() {
        let mut table = DecodeTable::new();
        table.define(258, b'A' as u16, b'B');

        let first = table.push_self_reference(258);
        assert_eq!(first, b'A');
        assert_eq!(table.pending(), b"ABA");

        table.clear_stack();
        assert!(table.pending().is_empty());
    }

    #[test]
    fn test_literal_expansion() {
        let mut table = DecodeTable::new();
        assert_eq!(table.push_expansion(b'z' as u16), b'z');
        assert_eq!(table.pending(), b"z");
    }
}
