use zentiff::*;

fn noise_tensor(h: u32, w: u32, p: u16, max: u32) -> Tensor {
    let mut state: u32 = 0xDEAD_BEEF;
    Tensor::from_fn(h, w, p, |_, _, _| {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        f64::from(state % (max + 1))
    })
    .unwrap()
}

fn roundtrip(tensors: &[Tensor], request: &EncodeRequest) -> Vec<DecodeOutput> {
    let mut writer = MemoryWriter::new();
    let out = request.encode(&mut writer, tensors, Unstoppable).unwrap();
    assert_eq!(out.images, tensors.len());
    let mut reader = writer.into_reader();
    DecodeRequest::new(&mut reader).decode(Unstoppable).unwrap()
}

#[test]
fn u8_roundtrip_exact() {
    let t = noise_tensor(5, 7, 3, 255);
    let decoded = roundtrip(&[t.clone()], &EncodeRequest::new(BitDepth::Eight));
    assert_eq!(decoded.len(), 1);
    assert_eq!(decoded[0].tensor(), &t);
    assert_eq!(decoded[0].planes(), 3);
}

#[test]
fn u16_roundtrip_exact() {
    let t = noise_tensor(4, 9, 1, 65535);
    let decoded = roundtrip(&[t.clone()], &EncodeRequest::new(BitDepth::Sixteen));
    assert_eq!(decoded[0].tensor(), &t);
}

#[test]
fn u32_roundtrip_exact() {
    let t = Tensor::from_fn(3, 3, 2, |r, c, p| {
        f64::from(u32::MAX - r * 1_000_003 - c * 7 - u32::from(p))
    })
    .unwrap();
    let decoded = roundtrip(&[t.clone()], &EncodeRequest::new(BitDepth::ThirtyTwo));
    assert_eq!(decoded[0].tensor(), &t);
}

#[test]
fn f32_roundtrip_within_precision() {
    let t = Tensor::from_fn(6, 5, 2, |r, c, p| {
        (f64::from(r) - 2.5) * 0.1 + f64::from(c) * 1e3 + f64::from(p) * 1e-3
    })
    .unwrap();
    let request = EncodeRequest::new(BitDepth::ThirtyTwo).with_float(true);
    let decoded = roundtrip(&[t.clone()], &request);
    let out = decoded[0].tensor();
    assert_eq!(decoded[0].layout.sample_format, SampleFormat::Float);
    for (i, (a, b)) in t.as_slice().iter().zip(out.as_slice()).enumerate() {
        assert_eq!(*b, f64::from(*a as f32), "float mismatch at {i}: {a} vs {b}");
    }
}

#[test]
fn float_max_survives() {
    let t = Tensor::from_vec(1, 2, 1, vec![FLOAT_MAX, -FLOAT_MAX]).unwrap();
    let request = EncodeRequest::new(BitDepth::ThirtyTwo).with_float(true);
    let decoded = roundtrip(&[t.clone()], &request);
    assert_eq!(decoded[0].tensor(), &t);
}

#[test]
fn sequence_roundtrip_keeps_order_and_shapes() {
    let images = [
        noise_tensor(2, 3, 1, 255),
        noise_tensor(4, 1, 3, 255),
        noise_tensor(1, 1, 2, 255),
    ];
    let decoded = roundtrip(&images, &EncodeRequest::new(BitDepth::Eight));
    assert_eq!(decoded.len(), 3);
    for (i, (d, t)) in decoded.iter().zip(&images).enumerate() {
        assert_eq!(d.directory, i as u32 + 1);
        assert_eq!(d.tensor(), t);
    }
    let shapes: Vec<_> = decoded.into_iter().map(DecodeOutput::into_tensor).collect();
    assert_eq!(dims(&shapes), vec![(2, 3, 1), (4, 1, 3), (1, 1, 2)]);
}

#[test]
fn filtered_decode_picks_directories() {
    let images: Vec<Tensor> = (0..4u8)
        .map(|i| Tensor::from_vec(1, 1, 1, vec![f64::from(i)]).unwrap())
        .collect();
    let mut writer = MemoryWriter::new();
    EncodeRequest::new(BitDepth::Eight)
        .encode(&mut writer, &images, Unstoppable)
        .unwrap();
    let mut reader = writer.into_reader();
    let decoded = DecodeRequest::new(&mut reader)
        .with_directories(&[2, 4])
        .decode(Unstoppable)
        .unwrap();
    let values: Vec<f64> = decoded.iter().map(|d| d.tensor().as_slice()[0]).collect();
    assert_eq!(values, [1.0, 3.0]);
    assert_eq!(decoded[1].directory, 4);
}

#[test]
fn filtered_decode_stops_quietly_past_the_end() {
    let images = [Tensor::zeros(1, 1, 1).unwrap(), Tensor::zeros(1, 1, 1).unwrap()];
    let mut writer = MemoryWriter::new();
    EncodeRequest::new(BitDepth::Eight)
        .encode(&mut writer, &images, Unstoppable)
        .unwrap();
    let mut reader = writer.into_reader();
    let decoded = DecodeRequest::new(&mut reader)
        .with_directories(&[2, 5, 9])
        .decode(Unstoppable)
        .unwrap();
    assert_eq!(decoded.len(), 1);
    assert_eq!(decoded[0].directory, 2);
}

#[test]
fn path_roundtrip_through_store() {
    let store = MemoryStore::new();
    let images = [noise_tensor(3, 2, 1, 255), noise_tensor(2, 2, 3, 255)];
    let request = EncodeRequest::new(BitDepth::Eight).with_tags(EncodeTags {
        copyright: Some("CC0".into()),
        date_time: Some("2024:01:01 00:00:00".into()),
        ..Default::default()
    });
    let out = write_path(&store, "a.tif", &request, &images, Unstoppable).unwrap();
    assert_eq!(out.images, 2);
    assert_eq!(count_path(&store, "a.tif").unwrap(), 2);

    let decoded = read_path(&store, "a.tif", None, None, Unstoppable).unwrap();
    assert_eq!(decoded[1].tensor(), &images[1]);
    assert_eq!(decoded[0].metadata.get("copyright"), Some(&TagValue::Text("CC0".into())));
    assert_eq!(decoded[1].metadata.get("samples_per_pixel"), Some(&TagValue::Int(3)));

    let meta = read_metadata_path(&store, "a.tif", Some(&[1]), Unstoppable).unwrap();
    assert_eq!(meta.len(), 1);
    assert_eq!(meta[0].get("copyright"), Some(&TagValue::Text("CC0".into())));
    assert_eq!(meta[0].get("compression"), Some(&TagValue::Text("none".into())));
    assert_eq!(meta[0].get("color_space"), Some(&TagValue::Text("black is zero".into())));
}

#[test]
fn missing_file_is_io_error() {
    let store = MemoryStore::new();
    let err = read_path(&store, "missing.tif", None, None, Unstoppable).unwrap_err();
    assert!(matches!(err, TiffError::Io { .. }), "got {err:?}");
}

#[test]
fn empty_sequence_creates_nothing() {
    let store = MemoryStore::new();
    let request = EncodeRequest::new(BitDepth::Eight);
    let out = write_path(&store, "empty.tif", &request, &[], Unstoppable).unwrap();
    assert_eq!(out.advisories, [Advisory::EmptySequence]);
    assert!(store.get(std::path::Path::new("empty.tif")).is_none());
}

#[test]
fn limits_reject_large() {
    let t = noise_tensor(4, 4, 1, 255);
    let mut writer = MemoryWriter::new();
    EncodeRequest::new(BitDepth::Eight)
        .encode(&mut writer, &[t], Unstoppable)
        .unwrap();
    let mut reader = writer.into_reader();
    let limits = Limits {
        max_pixels: Some(15),
        ..Default::default()
    };
    let result = DecodeRequest::new(&mut reader)
        .with_limits(&limits)
        .decode(Unstoppable);
    match result.unwrap_err() {
        TiffError::LimitExceeded(_) => {}
        other => panic!("expected LimitExceeded, got {other:?}"),
    }
}

#[test]
fn directory_limit_stops_sequence() {
    let images = [Tensor::zeros(1, 1, 1).unwrap(), Tensor::zeros(1, 1, 1).unwrap()];
    let mut writer = MemoryWriter::new();
    EncodeRequest::new(BitDepth::Eight)
        .encode(&mut writer, &images, Unstoppable)
        .unwrap();
    let mut reader = writer.into_reader();
    let limits = Limits {
        max_directories: Some(1),
        ..Default::default()
    };
    let result = DecodeRequest::new(&mut reader)
        .with_limits(&limits)
        .decode(Unstoppable);
    assert!(matches!(result, Err(TiffError::LimitExceeded(_))));
}
