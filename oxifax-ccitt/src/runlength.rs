//! Conversion between packed rows and change-element lists.
//!
//! A change element is the column where the pixel color toggles. A row is
//! described by its ascending change elements, starting from an implicit
//! white run at column 0 and ending with `width`. A row that starts black
//! gets a leading `0` (an empty white run) so even indices always end white
//! runs and odd indices end black runs.

/// Run lengths inside each byte value, one nibble per run, first run in
/// the low nibble. Only bytes starting with a zero bit are filled in (at
/// most eight runs, so eight nibbles); bytes starting with a one bit are
/// looked up by their complement.
const RUNS: [u32; 128] = build_runs();

const fn build_runs() -> [u32; 128] {
    let mut table = [0u32; 128];
    let mut value = 0;
    while value < 128 {
        let mut packed = 0u32;
        let mut shift = 0;
        let mut run = 0u32;
        let mut current = 0;
        let mut bit = 7i32;
        while bit >= 0 {
            let b = (value >> bit) & 1;
            if b == current {
                run += 1;
            } else {
                packed |= run << shift;
                shift += 4;
                run = 1;
                current = b;
            }
            bit -= 1;
        }
        packed |= run << shift;
        table[value] = packed;
        value += 1;
    }
    table
}

/// Partial-byte masks: the top `n` bits set.
const MASKS: [u8; 8] = [0x00, 0x80, 0xC0, 0xE0, 0xF0, 0xF8, 0xFC, 0xFE];

#[inline]
fn runs_of(byte: u8) -> u32 {
    if byte & 0x80 != 0 {
        RUNS[(byte ^ 0xFF) as usize]
    } else {
        RUNS[byte as usize]
    }
}

/// Append the change elements of a packed row to `line`.
///
/// `row` holds at least `width.div_ceil(8)` bytes, 1 = black, most
/// significant bit first. Padding bits past `width` are ignored.
pub fn encode_row(row: &[u8], width: usize, line: &mut Vec<usize>) {
    debug_assert!(row.len() * 8 >= width);
    line.clear();
    if width == 0 {
        line.push(width);
        return;
    }

    let mut index = 0;
    if row[0] & 0x80 != 0 {
        line.push(0);
    }
    let mut runs = runs_of(row[0]);
    let mut pos = (runs & 0xF) as usize;

    while pos < width {
        runs >>= 4;
        if runs == 0 {
            // Byte exhausted; a change happens only if the next byte starts
            // with the other color.
            let last_black = row[index] & 1 != 0;
            index += 1;
            let first_black = row[index] & 0x80 != 0;
            if last_black != first_black {
                line.push(pos);
            }
            runs = runs_of(row[index]);
        } else {
            line.push(pos);
        }
        pos += (runs & 0xF) as usize;
    }
    line.push(width);
}

/// Render change elements into a packed row.
///
/// Elements above `width` (the decoder's sentinel) end the list. The row is
/// cleared first, so only black spans are written.
pub fn decode_row(line: &[usize], width: usize, row: &mut [u8]) {
    let bytes = width.div_ceil(8);
    row[..bytes].fill(0);

    let mut pos = 0;
    let mut black = false;
    for &change in line {
        if change > width {
            break;
        }
        while change > pos {
            let bit = pos & 7;
            if change - pos >= 8 - bit {
                if black {
                    row[pos / 8] |= 0xFF >> bit;
                }
                pos += 8 - bit;
            } else {
                if black {
                    row[pos / 8] |= MASKS[change - pos] >> bit;
                }
                pos = change;
            }
        }
        black = !black;
    }
}
