//! G4 interoperability with the `fax` crate.

use fax::decoder::{decode_g4, pels};
use fax::encoder::Encoder;
use fax::{Color, VecWriter};
use oxifax_ccitt::{FaxConfig, FaxDecoder, FaxMode, LineStatus, decode_image, encode_image};

/// Rows of drifting black bars with a sprinkle of isolated dots.
fn page(width: usize, height: usize, seed: u64) -> Vec<u8> {
    let row_bytes = width.div_ceil(8);
    let mut state = seed;
    let mut raster = vec![0u8; row_bytes * height];
    for y in 0..height {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let r = (state >> 33) as usize;
        let start = (y * 3 + r % 5) % width;
        let end = (start + 1 + r % (width / 3 + 1)).min(width);
        for x in start..end {
            raster[y * row_bytes + x / 8] |= 0x80 >> (x % 8);
        }
        if r % 4 == 0 {
            let dot = (r >> 8) % width;
            raster[y * row_bytes + dot / 8] ^= 0x80 >> (dot % 8);
        }
    }
    raster
}

fn colors(row: &[u8], width: usize) -> impl Iterator<Item = Color> + '_ {
    (0..width).map(move |x| {
        if row[x / 8] & (0x80 >> (x % 8)) != 0 {
            Color::Black
        } else {
            Color::White
        }
    })
}

fn pack(line: impl Iterator<Item = Color>, row_bytes: usize) -> Vec<u8> {
    let mut row = vec![0u8; row_bytes];
    for (x, color) in line.enumerate() {
        if color == Color::Black {
            row[x / 8] |= 0x80 >> (x % 8);
        }
    }
    row
}

const WIDTHS: [usize; 6] = [1, 8, 17, 100, 333, 1728];

#[test]
fn test_fax_crate_decodes_our_g4() {
    for width in WIDTHS {
        let height = 40;
        let raster = page(width, height, width as u64);
        let config = FaxConfig::new(FaxMode::G4, width);
        let encoded = encode_image(&raster, height, config).unwrap();

        let row_bytes = width.div_ceil(8);
        let mut decoded = Vec::new();
        let mut rows = 0;
        decode_g4(
            encoded.iter().copied(),
            width as u16,
            Some(height as u16),
            |transitions| {
                decoded.extend(pack(pels(transitions, width as u16), row_bytes));
                rows += 1;
            },
        )
        .expect("fax crate rejected the stream");
        assert_eq!(rows, height, "width {width}");
        assert_eq!(decoded, raster, "width {width}");
    }
}

#[test]
fn test_we_decode_fax_crate_g4() {
    for width in WIDTHS {
        let height = 40;
        let raster = page(width, height, 99 + width as u64);
        let row_bytes = width.div_ceil(8);

        let mut encoder = Encoder::new(VecWriter::new());
        for row in raster.chunks(row_bytes) {
            encoder.encode_line(colors(row, width), width as u16).unwrap();
        }
        let encoded = encoder.finish().unwrap().finish();

        let config = FaxConfig::new(FaxMode::G4, width);
        let mut decoder = FaxDecoder::new(config, &encoded[..]).unwrap();
        let mut row = vec![0u8; row_bytes];
        for (y, expected) in raster.chunks(row_bytes).enumerate() {
            assert_eq!(
                decoder.decode_row(&mut row).unwrap(),
                LineStatus::Line,
                "width {width} row {y}"
            );
            assert_eq!(&row[..], expected, "width {width} row {y}");
        }

        // The fax crate closes the page with EOFB.
        let image = decode_image(&encoded, config).unwrap();
        assert_eq!(image.height, height);
        assert_eq!(image.raster, raster);
    }
}
