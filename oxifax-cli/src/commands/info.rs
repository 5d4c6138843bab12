//! Info command implementation.

use crate::header::{HEADER_LEN, MmrHeader};
use crate::utils::open_input;
use oxifax_ccitt::{FaxConfig, FaxDecoder, FaxMode, LineStatus};
use serde::Serialize;
use std::path::Path;

/// Summary of a headered G4 file.
#[derive(Debug, Serialize)]
pub struct InfoReport {
    pub file: String,
    pub file_size: u64,
    pub width: u16,
    pub height: u16,
    pub min_is_black: bool,
    pub decoded_rows: u64,
    pub stream_bits: u64,
    /// Decoder error, if the stream is damaged.
    pub error: Option<String>,
}

pub fn cmd_info(file: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let report = inspect(file)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("MMR File Information");
    println!("====================");
    println!("File: {}", report.file);
    println!("Size: {} bytes", report.file_size);
    println!("Width: {}", report.width);
    println!("Height: {}", report.height);
    println!(
        "Polarity: {}",
        if report.min_is_black { "min-is-black" } else { "min-is-white" }
    );
    println!();
    println!("Stream:");
    println!("  Compressed size: {} bytes", report.file_size.saturating_sub(HEADER_LEN as u64));
    println!("  Decoded rows: {}", report.decoded_rows);
    println!("  Bits consumed: {}", report.stream_bits);
    if report.height > 0 && report.stream_bits > 0 {
        let raw_bits = report.width as f64 * report.height as f64;
        println!("  Compression ratio: {:.1}:1", raw_bits / report.stream_bits as f64);
    }
    match &report.error {
        Some(e) => println!("  Status: damaged ({})", e),
        None => println!("  Status: OK"),
    }

    Ok(())
}

pub fn inspect(file: &Path) -> Result<InfoReport, Box<dyn std::error::Error>> {
    let mut reader = open_input(Some(file))?;
    let file_size = std::fs::metadata(file)?.len();
    let header = MmrHeader::read_from(&mut reader)?;

    let config = FaxConfig::new(FaxMode::G4, header.width as usize);
    let mut decoder = FaxDecoder::new(config, reader)?;
    let mut row = vec![0u8; config.row_bytes()];
    let error = loop {
        match decoder.decode_row(&mut row) {
            Ok(LineStatus::Line) => {}
            Ok(LineStatus::EndOfStream) => break None,
            Err(e) => break Some(e.to_string()),
        }
    };

    Ok(InfoReport {
        file: file.display().to_string(),
        file_size,
        width: header.width,
        height: header.height,
        min_is_black: header.min_is_black,
        decoded_rows: decoder.lines_done(),
        stream_bits: decoder.bits_read(),
        error,
    })
}
