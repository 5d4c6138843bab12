//! LZW encode/decode command implementations.

use crate::pbm::{Bitmap, read_pbm};
use crate::utils::{create_output, create_progress_bar, open_input, row_bytes};
use indicatif::ProgressBar;
use log::{info, warn};
use oxifax_lzw::{DecodeStatus, LzwConfig, LzwDecoder, LzwEncoder, LzwError};
use std::io::{self, Read, Write};
use std::path::Path;

const CHUNK_SIZE: usize = 4096;

pub fn cmd_lzw_encode(
    input: Option<&Path>,
    output: Option<&Path>,
    config: LzwConfig,
    pbm: bool,
    progress: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut reader = open_input(input)?;
    let mut encoder = LzwEncoder::new(config, create_output(output)?)?;
    let pb = create_progress_bar(None, progress);

    if pbm {
        let bitmap = read_pbm(reader)?;
        info!("Encoding {}x{} bitmap", bitmap.width, bitmap.height);
        encoder.encode(&bitmap.data)?;
        pb.inc(bitmap.data.len() as u64);
    } else {
        let mut chunk = [0u8; CHUNK_SIZE];
        loop {
            let n = match reader.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            encoder.encode(&chunk[..n])?;
            pb.inc(n as u64);
        }
    }
    encoder.finish()?;
    pb.finish_and_clear();
    info!("Wrote {} bits", encoder.bits_written());

    encoder.into_inner().flush()?;
    Ok(())
}

pub fn cmd_lzw_decode(
    input: Option<&Path>,
    output: Option<&Path>,
    config: LzwConfig,
    pbm_width: Option<usize>,
    progress: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut decoder = LzwDecoder::new(config, open_input(input)?)?;
    let pb = create_progress_bar(None, progress);

    match pbm_width {
        Some(width) => {
            let stride = row_bytes(width);
            let mut data = Vec::new();
            let result = pump(&mut decoder, stride, &mut data, &pb);
            pb.finish_and_clear();

            if data.len() % stride != 0 {
                warn!("Incomplete last line dropped");
            }
            let bitmap = Bitmap::from_rows(width, data);
            bitmap.write_to(create_output(output)?, false)?;
            result
        }
        None => {
            let mut out = create_output(output)?;
            let result = pump(&mut decoder, CHUNK_SIZE, &mut out, &pb);
            pb.finish_and_clear();
            out.flush()?;
            result
        }
    }
}

/// Decode the whole stream into `out`, `chunk_len` bytes at a time.
///
/// A stream that stops without an END code is accepted with a warning; the
/// bytes of the last unfinished chunk are lost.
fn pump<R: Read, W: Write>(
    decoder: &mut LzwDecoder<R>,
    chunk_len: usize,
    out: &mut W,
    pb: &ProgressBar,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut chunk = vec![0u8; chunk_len];
    loop {
        match decoder.decode(&mut chunk) {
            Ok(DecodeStatus::NeedsOutput) => {
                out.write_all(&chunk)?;
                pb.inc(chunk_len as u64);
            }
            Ok(DecodeStatus::Done(n)) => {
                out.write_all(&chunk[..n])?;
                pb.inc(n as u64);
                return Ok(());
            }
            Err(LzwError::Read { bit_position, source })
                if source.kind() == io::ErrorKind::UnexpectedEof =>
            {
                warn!("Stream ended at bit {} without END code", bit_position);
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        }
    }
}
