//! Fax codec throughput benchmarks.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use oxifax_ccitt::runlength::encode_row;
use oxifax_ccitt::{FaxConfig, FaxMode, decode_image, encode_image};
use std::hint::black_box;

const WIDTH: usize = 1728;
const HEIGHT: usize = 1100;

type PageGenerator = fn() -> Vec<u8>;

mod pages {
    use super::{HEIGHT, WIDTH};

    pub fn blank() -> Vec<u8> {
        vec![0x00; WIDTH / 8 * HEIGHT]
    }

    /// Text-like page: short black strokes on lines of "glyphs".
    pub fn text() -> Vec<u8> {
        let row_bytes = WIDTH / 8;
        let mut seed: u64 = 42;
        let mut page = vec![0u8; row_bytes * HEIGHT];
        for y in 0..HEIGHT {
            if (y / 24) % 2 == 1 || y % 24 > 16 {
                continue;
            }
            for x in (80..WIDTH - 80).step_by(12) {
                seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
                if (seed >> 61) < 5 {
                    let len = 1 + (seed >> 40) as usize % 6;
                    for px in x..x + len {
                        page[y * row_bytes + px / 8] |= 0x80 >> (px % 8);
                    }
                }
            }
        }
        page
    }

    /// Checkerboard of 4-pixel cells, dense in changes.
    pub fn dither() -> Vec<u8> {
        let row_bytes = WIDTH / 8;
        (0..row_bytes * HEIGHT)
            .map(|i| if (i / row_bytes / 4) % 2 == 0 { 0x0F } else { 0xF0 })
            .collect()
    }
}

const PAGES: [(&str, PageGenerator); 3] = [
    ("blank", pages::blank as PageGenerator),
    ("text", pages::text as PageGenerator),
    ("dither", pages::dither as PageGenerator),
];

const MODES: [(&str, FaxMode); 3] = [
    ("g3_1d", FaxMode::G3OneDimensional),
    ("g3_2d_k4", FaxMode::G3TwoDimensional { k: 4 }),
    ("g4", FaxMode::G4),
];

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("fax_encode");
    for (page_name, generator) in PAGES {
        let page = generator();
        group.throughput(Throughput::Bytes(page.len() as u64));
        for (mode_name, mode) in MODES {
            let config = FaxConfig::new(mode, WIDTH);
            group.bench_with_input(BenchmarkId::new(mode_name, page_name), &page, |b, page| {
                b.iter(|| black_box(encode_image(black_box(page), HEIGHT, config).unwrap()))
            });
        }
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("fax_decode");
    for (page_name, generator) in PAGES {
        let page = generator();
        group.throughput(Throughput::Bytes(page.len() as u64));
        for (mode_name, mode) in MODES {
            let config = FaxConfig::new(mode, WIDTH);
            let encoded = encode_image(&page, HEIGHT, config).unwrap();
            group.bench_with_input(
                BenchmarkId::new(mode_name, page_name),
                &encoded,
                |b, encoded| b.iter(|| black_box(decode_image(black_box(encoded), config).unwrap())),
            );
        }
    }
    group.finish();
}

fn bench_change_elements(c: &mut Criterion) {
    let mut group = c.benchmark_group("change_elements");
    for (page_name, generator) in PAGES {
        let page = generator();
        group.throughput(Throughput::Bytes(page.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(page_name), &page, |b, page| {
            let mut line = Vec::with_capacity(WIDTH + 2);
            b.iter(|| {
                for row in page.chunks(WIDTH / 8) {
                    encode_row(black_box(row), WIDTH, &mut line);
                }
                black_box(line.len())
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode, bench_change_elements);
criterion_main!(benches);
