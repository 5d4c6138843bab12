//! Per-line coding: Modified Huffman (1D) and Modified READ (2D).
//!
//! Lines are handled as change-element lists (see [`crate::runlength`]).
//! The coding line is the one being produced; the reference line is the
//! previous one. Both end with `width`; decoded lines additionally end with
//! the `width + 1` sentinel.
//!
//! Column names follow T.4: `a0` is the current position on the coding
//! line, `a1`/`a2` the next changes on it, `b1`/`b2` the next changes of
//! opposite color on the reference line.

use crate::error::{FaxError, Result};
use crate::tables::{
    self, Code, Color, EOL, MAX_MAKEUP, MODE_HORIZONTAL, MODE_PASS, MODES, ModeSymbol, RunSymbol,
    makeup_code, terminating_code, vertical_code,
};
use oxifax_core::{ByteSink, ByteSource, MsbBitReader, MsbBitWriter};

/// How a line decode ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnd {
    /// A complete line is in the coding buffer.
    Line,
    /// End-of-stream framing was read instead of a line.
    EndOfStream,
}

/// Result of reading one run length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunRead {
    Length(usize),
    Eol,
}

#[inline]
pub(crate) fn write_code<W: ByteSink>(writer: &mut MsbBitWriter<W>, code: Code) -> Result<()> {
    writer.write_bits(u32::from(code.bits), code.len)?;
    Ok(())
}

/// Write a run length: 2560-makeups, at most one smaller makeup, then a
/// terminating code.
pub(crate) fn write_run<W: ByteSink>(
    writer: &mut MsbBitWriter<W>,
    color: Color,
    mut run: usize,
) -> Result<()> {
    while run >= MAX_MAKEUP {
        write_code(writer, makeup_code(color, MAX_MAKEUP))?;
        run -= MAX_MAKEUP;
    }
    if run >= 64 {
        write_code(writer, makeup_code(color, run / 64 * 64))?;
        run %= 64;
    }
    write_code(writer, terminating_code(color, run))
}

fn wrong<S: ByteSource>(reader: &MsbBitReader<S>, reason: &'static str) -> FaxError {
    FaxError::wrong_code(reader.bits_read(), reason)
}

/// Read one run length of at most `limit` pixels.
fn read_run<S: ByteSource>(
    reader: &mut MsbBitReader<S>,
    color: Color,
    limit: usize,
) -> Result<RunRead> {
    let trie = tables::run_trie_for(color);
    let mut total = 0usize;
    loop {
        match trie.decode(reader)? {
            RunSymbol::Eol if total == 0 => return Ok(RunRead::Eol),
            RunSymbol::Eol => return Err(wrong(reader, "EOL inside a run length")),
            RunSymbol::Run(length) => {
                let length = length as usize;
                if length >= 64 && total % MAX_MAKEUP != 0 {
                    return Err(wrong(reader, "makeup code after a partial makeup"));
                }
                total += length;
                if total > limit {
                    return Err(wrong(reader, "run extends past the line end"));
                }
                if length < 64 {
                    return Ok(RunRead::Length(total));
                }
            }
        }
    }
}

/// Append a decoded change, refusing more than a line can hold.
fn push_change<S: ByteSource>(
    reader: &MsbBitReader<S>,
    coding: &mut Vec<usize>,
    change: usize,
    width: usize,
) -> Result<()> {
    if coding.len() > width {
        return Err(wrong(reader, "too many changes in one line"));
    }
    coding.push(change);
    Ok(())
}

/// Encode a line with Modified Huffman.
pub(crate) fn encode_1d<W: ByteSink>(
    writer: &mut MsbBitWriter<W>,
    coding: &[usize],
    width: usize,
) -> Result<()> {
    let mut a0 = 0;
    let mut color = Color::White;
    for &a1 in coding {
        debug_assert!(a1 >= a0 && a1 <= width);
        write_run(writer, color, a1 - a0)?;
        a0 = a1;
        color = color.flip();
        if a0 >= width {
            break;
        }
    }
    Ok(())
}

/// Move `bi` to the first reference change right of `a0` with the color
/// parity it already has.
#[inline]
fn advance_reference(reference: &[usize], bi: &mut usize, a0: usize, width: usize) {
    while reference[*bi] < width && reference[*bi] <= a0 {
        *bi += 1;
        if reference[*bi] < width {
            *bi += 1;
        }
    }
}

/// Re-aim `bi` after a vertical step flipped the color.
#[inline]
fn vertical_reference(reference: &[usize], bi: &mut usize, a0: usize, width: usize) {
    if *bi > 0 && reference[*bi - 1] > a0 {
        *bi -= 1;
    } else if reference[*bi] < width {
        *bi += 1;
    }
}

/// Encode a line with Modified READ against `reference`.
pub(crate) fn encode_2d<W: ByteSink>(
    writer: &mut MsbBitWriter<W>,
    reference: &[usize],
    coding: &[usize],
    width: usize,
) -> Result<()> {
    let mut a0 = 0;
    let mut ci = 0;
    let mut bi = 0;
    let mut color = Color::White;

    loop {
        let a1 = coding[ci];
        let b1 = reference[bi];
        debug_assert!(a1 <= width && b1 <= width);

        if b1 < width && reference[bi + 1] < a1 {
            write_code(writer, MODE_PASS)?;
            a0 = reference[bi + 1];
        } else if a1.abs_diff(b1) <= 3 {
            write_code(writer, vertical_code(a1 as isize - b1 as isize))?;
            a0 = a1;
            if a0 >= width {
                break;
            }
            ci += 1;
            color = color.flip();
            vertical_reference(reference, &mut bi, a0, width);
        } else {
            write_code(writer, MODE_HORIZONTAL)?;
            write_run(writer, color, a1 - a0)?;
            a0 = a1;
            if a0 < width {
                ci += 1;
            }
            // At the line end the second run is empty.
            write_run(writer, color.flip(), coding[ci] - a0)?;
            a0 = coding[ci];
            if a0 >= width {
                break;
            }
            ci += 1;
        }
        advance_reference(reference, &mut bi, a0, width);
    }
    Ok(())
}

/// Decode a Modified Huffman line into `coding`.
///
/// An EOL where the first run is expected ends the stream.
pub(crate) fn decode_1d<S: ByteSource>(
    reader: &mut MsbBitReader<S>,
    coding: &mut Vec<usize>,
    width: usize,
) -> Result<LineEnd> {
    coding.clear();
    let mut a0 = 0;
    let mut color = Color::White;
    loop {
        match read_run(reader, color, width - a0)? {
            RunRead::Eol if coding.is_empty() => return Ok(LineEnd::EndOfStream),
            RunRead::Eol => return Err(wrong(reader, "EOL inside a line")),
            RunRead::Length(0) if !coding.is_empty() => {
                return Err(wrong(reader, "empty run inside a line"));
            }
            RunRead::Length(run) => {
                a0 += run;
                push_change(reader, coding, a0, width)?;
                color = color.flip();
                if a0 >= width {
                    break;
                }
            }
        }
    }
    coding.push(width + 1);
    Ok(LineEnd::Line)
}

/// Decode a Modified READ line into `coding`.
///
/// With `end_of_block` set (Group 4), an EOL at the start of a line must be
/// followed by a second EOL and ends the stream.
pub(crate) fn decode_2d<S: ByteSource>(
    reader: &mut MsbBitReader<S>,
    reference: &[usize],
    coding: &mut Vec<usize>,
    width: usize,
    end_of_block: bool,
) -> Result<LineEnd> {
    coding.clear();
    let mut a0 = 0;
    let mut bi = 0;
    let mut color = Color::White;
    let mut first = true;

    loop {
        let start = reader.bits_read();
        match MODES.decode(reader)? {
            ModeSymbol::Pass => {
                let b1 = reference[bi];
                if b1 >= width || reference[bi + 1] >= width {
                    return Err(wrong(reader, "pass mode beyond the reference line"));
                }
                a0 = reference[bi + 1];
            }
            ModeSymbol::Horizontal => {
                for (second, run_color) in [(false, color), (true, color.flip())] {
                    let RunRead::Length(run) = read_run(reader, run_color, width - a0)? else {
                        return Err(wrong(reader, "EOL in horizontal mode"));
                    };
                    if second && a0 == width {
                        // The line ended with the first run; the limit forced
                        // this one to be empty.
                        continue;
                    }
                    if run == 0 && (second || !first) {
                        return Err(wrong(reader, "empty run in horizontal mode"));
                    }
                    a0 += run;
                    push_change(reader, coding, a0, width)?;
                }
            }
            ModeSymbol::Vertical(offset) => {
                let a1 = reference[bi] as isize + offset as isize;
                let lowest = if first { 0 } else { a0 as isize + 1 };
                if a1 < lowest || a1 > width as isize {
                    return Err(wrong(reader, "vertical mode out of range"));
                }
                a0 = a1 as usize;
                push_change(reader, coding, a0, width)?;
                color = color.flip();
                vertical_reference(reference, &mut bi, a0, width);
            }
            ModeSymbol::Eol => {
                if !end_of_block {
                    return Err(wrong(reader, "EOL inside a two-dimensional line"));
                }
                if !first {
                    return Err(wrong(reader, "end of block inside a line"));
                }
                if reader.peek_bits(EOL.len)? != u32::from(EOL.bits) {
                    return Err(wrong(reader, "incomplete end of block"));
                }
                reader.consume(EOL.len)?;
                return Ok(LineEnd::EndOfStream);
            }
            ModeSymbol::Extension => {
                return Err(FaxError::UnknownCode {
                    bit_position: start,
                });
            }
        }
        first = false;
        if a0 >= width {
            break;
        }
        advance_reference(reference, &mut bi, a0, width);
    }
    coding.push(width + 1);
    Ok(LineEnd::Line)
}
