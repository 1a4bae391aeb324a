#![no_main]
use libfuzzer_sys::fuzz_target;
use zentiff::*;

// Header: width, height, bits selector, samples, flags, tile size, split.
// Everything after it is sample data.
const HEADER: usize = 7;

fuzz_target!(|data: &[u8]| {
    if data.len() < HEADER {
        return;
    }
    let (header, samples) = data.split_at(HEADER);
    let width = u32::from(header[0]);
    let height = u32::from(header[1]);
    let bits: u16 = [8, 16, 32, 12, 24][usize::from(header[2] % 5)];
    let spp = u16::from(header[3] % 5);
    let flags = header[4];
    let tile = u32::from(header[5] % 32);

    let mut dir = MemoryDirectory::new(width, height)
        .with_field(Tag::BITS_PER_SAMPLE, bits)
        .with_field(Tag::SAMPLES_PER_PIXEL, spp)
        .with_field(Tag::PLANAR_CONFIG, if flags & 1 != 0 { 2u16 } else { 1 })
        .with_field(Tag::SAMPLE_FORMAT, u16::from(flags >> 1 & 3));
    if flags & 8 != 0 {
        let len = usize::from(header[6]);
        let table: Vec<u16> = (0..len as u16).map(|i| i.wrapping_mul(257)).collect();
        let channels = usize::from(flags >> 4 & 3).max(1);
        dir = dir.with_color_map(vec![table; channels]);
    }
    if tile != 0 && flags & 64 != 0 {
        dir = dir
            .with_field(Tag::TILE_WIDTH, tile)
            .with_field(Tag::TILE_LENGTH, tile);
        let mut chunks = samples.chunks(usize::from(header[6]).max(1));
        for y in (0..height).step_by(tile as usize) {
            for x in (0..width).step_by(tile as usize) {
                dir = dir.with_tile(x, y, chunks.next().unwrap_or_default().to_vec());
            }
        }
    } else {
        for chunk in samples.chunks(usize::from(header[6]).max(1)) {
            dir = dir.with_strip(chunk.to_vec());
        }
    }

    // Must never panic.
    let mut c = MemoryContainer::new(vec![dir]);
    let limits = Limits {
        max_pixels: Some(1 << 16),
        ..Default::default()
    };
    let _ = DecodeRequest::new(&mut c)
        .with_limits(&limits)
        .decode(enough::Unstoppable);
    let _ = metadata::extract(&c);
});
