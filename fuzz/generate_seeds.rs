#!/usr/bin/env -S cargo +nightly -Zscript
//! Generate seed corpus files for fuzzing.
//! Run: cargo +nightly -Zscript fuzz/generate_seeds.rs

fn main() {
    use std::fs;
    let dir = "fuzz/corpus/fuzz_decode";
    fs::create_dir_all(dir).unwrap();

    // Header layout matches fuzz_decode: width, height, bits selector,
    // samples, flags, tile size, chunk length.

    // 4x3 gray, one strip
    let mut gray = vec![4, 3, 0, 1, 0, 0, 12];
    gray.extend(0..12u8);
    fs::write(format!("{dir}/gray_4x3.bin"), gray).unwrap();

    // 2x2 RGB 16-bit, two strips
    let mut rgb = vec![2, 2, 1, 3, 0, 0, 12];
    rgb.extend((0..12u16).flat_map(|v| (v * 1000).to_ne_bytes()));
    fs::write(format!("{dir}/rgb16_2x2.bin"), rgb).unwrap();

    // 3x1 separate planes
    let mut planar = vec![3, 1, 0, 2, 1, 0, 3];
    planar.extend([1, 2, 3, 4, 5, 6]);
    fs::write(format!("{dir}/separate_3x1.bin"), planar).unwrap();

    // 2x2 palette with three tables of 16 entries
    let mut palette = vec![2, 2, 0, 1, 8 | 48, 0, 16];
    palette.extend([0, 5, 10, 15]);
    fs::write(format!("{dir}/palette_2x2.bin"), palette).unwrap();

    // 5x3 in 2x2 tiles
    let mut tiled = vec![5, 3, 0, 1, 64, 2, 4];
    tiled.extend(1..=24u8);
    fs::write(format!("{dir}/tiled_5x3.bin"), tiled).unwrap();

    // 12-bit, rejected
    fs::write(format!("{dir}/bits12.bin"), [2, 2, 3, 1, 0, 0, 4, 0, 0, 0, 0]).unwrap();

    // Truncated
    fs::write(format!("{dir}/truncated.bin"), [4, 3, 0]).unwrap();
}
