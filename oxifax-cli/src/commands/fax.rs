//! Fax encode/decode command implementations.

use crate::bitstring::{BitStringReader, BitStringWriter};
use crate::header::MmrHeader;
use crate::pbm::{Bitmap, read_pbm};
use crate::utils::{create_output, create_progress_bar, open_input, row_bytes};
use indicatif::ProgressBar;
use log::{info, warn};
use oxifax_ccitt::{FaxConfig, FaxDecoder, FaxEncoder, FaxError, FaxMode, LineStatus};
use std::io::{Read, Write};
use std::path::Path;

/// Options shared by `fax encode` and `fax decode`.
#[derive(Debug, Clone, Copy)]
pub struct FaxOptions {
    pub mode: FaxMode,
    /// Read/write the MMR framing header.
    pub header: bool,
    /// Compressed stream as ASCII bit-string.
    pub bits: bool,
    pub progress: bool,
}

pub fn cmd_fax_encode(
    input: Option<&Path>,
    output: Option<&Path>,
    options: FaxOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let bitmap = read_pbm(open_input(input)?)?;
    info!(
        "Encoding {}x{} image, K={}",
        bitmap.width,
        bitmap.height,
        options.mode.k()
    );

    let mut out = create_output(output)?;
    if options.header {
        MmrHeader::for_image(bitmap.width, bitmap.height)?.write_to(&mut out)?;
    }

    let config = FaxConfig::new(options.mode, bitmap.width);
    let pb = create_progress_bar(Some(bitmap.height as u64), options.progress);

    let mut out = if options.bits {
        let sink = encode_rows(&bitmap, config, BitStringWriter::new(out), &pb)?;
        sink.finish()?
    } else {
        encode_rows(&bitmap, config, out, &pb)?
    };
    out.flush()?;
    pb.finish_and_clear();

    Ok(())
}

fn encode_rows<W: Write>(
    bitmap: &Bitmap,
    config: FaxConfig,
    sink: W,
    pb: &ProgressBar,
) -> Result<W, FaxError> {
    let mut encoder = FaxEncoder::new(config, sink)?;
    for row in bitmap.data.chunks(row_bytes(bitmap.width)) {
        encoder.encode_row(row)?;
        pb.inc(1);
    }
    encoder.finish()?;
    info!("Encoded {} rows into {} bits", encoder.lines_done(), encoder.bits_written());
    Ok(encoder.into_inner())
}

pub fn cmd_fax_decode(
    input: Option<&Path>,
    output: Option<&Path>,
    width: Option<usize>,
    plain: bool,
    options: FaxOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut reader = open_input(input)?;

    let mut width = width.unwrap_or(FaxConfig::DEFAULT_WIDTH);
    let mut expected_height = None;
    let mut invert = false;
    if options.header {
        let header = MmrHeader::read_from(&mut reader)?;
        info!(
            "MMR header: {}x{}{}",
            header.width,
            header.height,
            if header.min_is_black { ", min-is-black" } else { "" }
        );
        width = header.width as usize;
        if header.height > 0 {
            expected_height = Some(header.height as usize);
        }
        invert = header.min_is_black;
    }

    let config = FaxConfig::new(options.mode, width);
    let width = config.effective_width();
    let pb = create_progress_bar(expected_height.map(|h| h as u64), options.progress);

    let mut data = Vec::new();
    let result = if options.bits {
        decode_rows(config, BitStringReader::new(reader), &mut data, &pb)
    } else {
        decode_rows(config, reader, &mut data, &pb)
    };
    pb.finish_and_clear();

    let mut bitmap = Bitmap::from_rows(width, data);
    match &result {
        Ok(()) => {
            if let Some(height) = expected_height.filter(|&h| h != bitmap.height) {
                warn!(
                    "Header announces {} rows but the stream holds {}",
                    height, bitmap.height
                );
            }
        }
        Err(e) => warn!(
            "Decoder error {} after {} rows, writing partial image",
            e.code(),
            bitmap.height
        ),
    }
    if invert {
        bitmap.invert();
    }

    bitmap.write_to(create_output(output)?, plain)?;
    result.map_err(Into::into)
}

fn decode_rows<R: Read>(
    config: FaxConfig,
    source: R,
    data: &mut Vec<u8>,
    pb: &ProgressBar,
) -> Result<(), FaxError> {
    let mut decoder = FaxDecoder::new(config, source)?;
    let mut row = vec![0u8; config.row_bytes()];
    loop {
        match decoder.decode_row(&mut row)? {
            LineStatus::Line => {
                data.extend_from_slice(&row);
                pb.inc(1);
            }
            LineStatus::EndOfStream => {
                info!(
                    "Decoded {} rows from {} bits",
                    decoder.lines_done(),
                    decoder.bits_read()
                );
                return Ok(());
            }
        }
    }
}
