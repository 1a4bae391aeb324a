#![no_main]
use libfuzzer_sys::fuzz_target;
use zentiff::*;

fuzz_target!(|data: &[u8]| {
    // Packing then unpacking any tensor must reproduce its samples.
    let [h, w, p, depth, rest @ ..] = data else {
        return;
    };
    let (height, width, planes) = (u32::from(h % 16), u32::from(w % 16), u16::from(p % 4));
    let (bit_depth, float) = match depth % 4 {
        0 => (BitDepth::Eight, false),
        1 => (BitDepth::Sixteen, false),
        2 => (BitDepth::ThirtyTwo, false),
        _ => (BitDepth::ThirtyTwo, true),
    };
    let max = match bit_depth {
        BitDepth::Eight => f64::from(u8::MAX),
        BitDepth::Sixteen => f64::from(u16::MAX),
        _ => f64::from(u32::MAX),
    };
    let mut bytes = rest.iter().copied().cycle();
    let Ok(tensor) = Tensor::from_fn(height, width, planes, |_, _, _| {
        let v = f64::from(bytes.next().unwrap_or(0)) * 257.0;
        if float { v / 7.0 } else { v.min(max) }
    }) else {
        return;
    };

    let mut writer = MemoryWriter::new();
    EncodeRequest::new(bit_depth)
        .with_float(float)
        .encode(&mut writer, &[tensor.clone()], enough::Unstoppable)
        .expect("encode failed");
    let mut reader = writer.into_reader();
    let decoded = DecodeRequest::new(&mut reader)
        .decode(enough::Unstoppable)
        .expect("re-encoded data failed to decode");

    assert_eq!(decoded.len(), 1);
    let out = decoded[0].tensor();
    assert_eq!(out.dims(), tensor.dims());
    for (a, b) in tensor.as_slice().iter().zip(out.as_slice()) {
        let expected = if float { f64::from(*a as f32) } else { *a };
        assert_eq!(*b, expected, "roundtrip sample mismatch");
    }
});
