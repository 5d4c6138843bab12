//! Fax codec integration tests.

use oxifax_ccitt::runlength::{decode_row, encode_row};
use oxifax_ccitt::{
    FaxConfig, FaxDecoder, FaxEncoder, FaxError, FaxMode, LineStatus, decode_image, encode_image,
};
use oxifax_core::MsbBitWriter;

struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u32 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (self.0 >> 33) as u32
    }
}

/// Clear the padding bits of every row.
fn mask_padding(raster: &mut [u8], width: usize) {
    let row_bytes = width.div_ceil(8);
    if width % 8 == 0 {
        return;
    }
    let mask = 0xFFu8 << (8 - width % 8);
    for row in raster.chunks_mut(row_bytes) {
        row[row_bytes - 1] &= mask;
    }
}

fn noise(width: usize, height: usize, seed: u64) -> Vec<u8> {
    let mut rng = Lcg(seed);
    let mut raster: Vec<u8> = (0..width.div_ceil(8) * height)
        .map(|_| rng.next() as u8)
        .collect();
    mask_padding(&mut raster, width);
    raster
}

/// Document-like content: blocks of black that drift a little per row.
fn blocks(width: usize, height: usize, seed: u64) -> Vec<u8> {
    let row_bytes = width.div_ceil(8);
    let mut rng = Lcg(seed);
    let mut raster = vec![0u8; row_bytes * height];
    let mut spans: Vec<(usize, usize)> = (0..6)
        .map(|_| {
            let start = rng.next() as usize % width;
            let len = 1 + rng.next() as usize % (width / 4 + 1);
            (start, (start + len).min(width))
        })
        .collect();
    for y in 0..height {
        for span in &mut spans {
            let jitter = rng.next() % 5;
            if jitter == 0 && span.0 > 0 {
                span.0 -= 1;
            } else if jitter == 1 && span.1 < width {
                span.1 += 1;
            }
            for x in span.0..span.1 {
                raster[y * row_bytes + x / 8] |= 0x80 >> (x % 8);
            }
        }
    }
    raster
}

fn round_trip(raster: &[u8], width: usize, height: usize, k: i32) {
    let config = FaxConfig::new(FaxMode::from_k(k).unwrap(), width);
    let encoded = encode_image(raster, height, config).expect("encode failed");
    let decoded = decode_image(&encoded, config).expect("decode failed");
    assert_eq!(decoded.height, height, "width {width}, K={k}");
    assert_eq!(decoded.raster, raster, "width {width}, K={k}");
}

#[test]
fn test_round_trip_widths_and_modes() {
    for width in [1usize, 8, 17, 1728] {
        for k in [-1, 0, 2, 4] {
            round_trip(&noise(width, 12, width as u64), width, 12, k);
            round_trip(&blocks(width, 30, (k + 9) as u64), width, 30, k);
        }
    }
}

#[test]
fn test_round_trip_uniform_pages() {
    for k in [-1, 0, 2] {
        let width = 1728;
        round_trip(&vec![0x00; 216 * 5], width, 5, k);
        round_trip(&vec![0xFF; 216 * 5], width, 5, k);
        let mut stripes = vec![0x55; 216 * 4];
        stripes[216..432].fill(0xAA);
        round_trip(&stripes, width, 4, k);
    }
}

#[test]
fn test_long_runs_use_large_makeups() {
    let width = 6000;
    let row_bytes = width / 8;
    let mut raster = vec![0u8; row_bytes * 3];
    // Row 1: black from 100 to 5800; row 2: black from 0 to 2623.
    for x in 100..5800 {
        raster[row_bytes + x / 8] |= 0x80 >> (x % 8);
    }
    for x in 0..2623 {
        raster[2 * row_bytes + x / 8] |= 0x80 >> (x % 8);
    }
    for k in [-1, 0, 3] {
        round_trip(&raster, width, 3, k);
    }
}

#[test]
fn test_streaming_rows() {
    let width = 64;
    let raster = blocks(width, 20, 3);
    let config = FaxConfig::new(FaxMode::G3TwoDimensional { k: 4 }, width);

    let mut encoder = FaxEncoder::new(config, Vec::new()).unwrap();
    for row in raster.chunks(8) {
        encoder.encode_row(row).unwrap();
    }
    assert_eq!(encoder.lines_done(), 20);
    encoder.finish().unwrap();
    let data = encoder.into_inner();

    let mut decoder = FaxDecoder::new(config, &data[..]).unwrap();
    let mut row = [0u8; 8];
    for expected in raster.chunks(8) {
        assert_eq!(decoder.decode_row(&mut row).unwrap(), LineStatus::Line);
        assert_eq!(&row, expected);
    }
    assert_eq!(decoder.decode_row(&mut row).unwrap(), LineStatus::EndOfStream);
}

#[test]
fn test_change_element_properties() {
    let mut rng = Lcg(5);
    let mut line = Vec::new();
    for width in [1usize, 8, 17, 100, 1728] {
        let bytes = width.div_ceil(8);
        for _ in 0..50 {
            let mut row: Vec<u8> = (0..bytes).map(|_| rng.next() as u8).collect();
            mask_padding(&mut row, width);
            encode_row(&row, width, &mut line);

            assert!(line.windows(2).all(|w| w[0] < w[1]), "not ascending");
            assert_eq!(line.last(), Some(&width));

            line.push(width + 1);
            let mut back = vec![0u8; bytes];
            decode_row(&line, width, &mut back);
            assert_eq!(back, row);
        }

        encode_row(&vec![0u8; bytes], width, &mut line);
        assert_eq!(line, vec![width]);
    }

    // Every pixel flips: one change per column.
    encode_row(&[0x55; 216], 1728, &mut line);
    assert_eq!(line.len(), 1728);
}

fn write_bits(bits: &[(u32, u8)]) -> Vec<u8> {
    let mut data = Vec::new();
    let mut writer = MsbBitWriter::new(&mut data);
    for &(value, len) in bits {
        writer.write_bits(value, len).unwrap();
    }
    writer.flush().unwrap();
    data
}

#[test]
fn test_large_makeup_after_partial_value_is_wrong_code() {
    // G3 1D, width 4000: EOL, white makeup 64, then makeup 2560.
    let data = write_bits(&[(1, 12), (0b11011, 5), (0b000000011111, 12), (0, 12)]);
    let config = FaxConfig::new(FaxMode::G3OneDimensional, 4000);
    let mut decoder = FaxDecoder::new(config, &data[..]).unwrap();
    let mut row = vec![0u8; 500];
    let err = decoder.decode_row(&mut row).unwrap_err();
    assert!(matches!(err, FaxError::WrongCode { .. }), "got {err:?}");
}

#[test]
fn test_g4_end_of_block_accepted() {
    // V0 (one white row), EOL, EOL.
    let data = write_bits(&[(1, 1), (1, 12), (1, 12)]);
    let decoded = decode_image(&data, FaxConfig::new(FaxMode::G4, 8)).unwrap();
    assert_eq!(decoded.height, 1);
    assert_eq!(decoded.raster, vec![0]);
}

#[test]
fn test_g4_single_eol_rejected() {
    // V0, EOL, then a horizontal-mode code instead of the second EOL.
    let data = write_bits(&[(1, 1), (1, 12), (0b001, 3), (0xFFFF, 16)]);
    let err = decode_image(&data, FaxConfig::new(FaxMode::G4, 8)).unwrap_err();
    assert!(matches!(err, FaxError::WrongCode { .. }), "got {err:?}");
    assert_eq!(err.code(), -5);
}

#[test]
fn test_g4_end_of_block_mid_line_rejected() {
    // Width 16: horizontal white 3, black 2, then EOFB with a0 at column 5.
    let data = write_bits(&[
        (0b001, 3),
        (0b1000, 4),
        (0b11, 2),
        (1, 12),
        (1, 12),
    ]);
    let err = decode_image(&data, FaxConfig::new(FaxMode::G4, 16)).unwrap_err();
    assert!(matches!(err, FaxError::WrongCode { .. }), "got {err:?}");
}

#[test]
fn test_truncated_stream_keeps_decoded_rows() {
    let width = 200;
    let raster = blocks(width, 40, 11);
    let config = FaxConfig::new(FaxMode::G4, width);
    let encoded = encode_image(&raster, 40, config).unwrap();
    let cut = &encoded[..encoded.len() / 2];

    let mut decoder = FaxDecoder::new(config, cut).unwrap();
    let mut row = vec![0u8; width.div_ceil(8)];
    let mut good = 0;
    let err = loop {
        match decoder.decode_row(&mut row) {
            Ok(LineStatus::Line) => {
                assert_eq!(&row[..], &raster[good * 25..(good + 1) * 25]);
                good += 1;
            }
            Ok(LineStatus::EndOfStream) => panic!("truncated stream reported complete"),
            Err(err) => break err,
        }
    };
    assert!(good > 0 && good < 40);
    assert!(matches!(
        err,
        FaxError::Read { .. } | FaxError::UnknownCode { .. } | FaxError::WrongCode { .. }
    ));
}

#[test]
fn test_default_width() {
    let config = FaxConfig::new(FaxMode::G4, 0);
    let raster = blocks(1728, 4, 1);
    let encoded = encode_image(&raster, 4, config).unwrap();
    let decoded = decode_image(&encoded, FaxConfig::G4).unwrap();
    assert_eq!(decoded.raster, raster);
}
