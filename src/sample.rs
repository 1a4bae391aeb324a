//! Per-sample numeric conversion between raw native-endian bytes and f64.

use crate::layout::{BitDepth, SampleFormat};

/// Storage type of one sample, selected once per directory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SampleKind {
    U8,
    U16,
    U32,
    F32,
}

impl SampleKind {
    /// Signed formats share the unsigned kinds: their bit patterns are read
    /// as unsigned. Float is only honored at 32 bits.
    pub(crate) fn new(depth: BitDepth, format: SampleFormat) -> Self {
        match (depth, format) {
            (BitDepth::Eight, _) => SampleKind::U8,
            (BitDepth::Sixteen, _) => SampleKind::U16,
            (BitDepth::ThirtyTwo, SampleFormat::Float) => SampleKind::F32,
            (BitDepth::ThirtyTwo, _) => SampleKind::U32,
        }
    }

    /// Integer kind of the same width, used for palette indices.
    pub(crate) fn as_index(self) -> Self {
        match self {
            SampleKind::F32 => SampleKind::U32,
            other => other,
        }
    }

    pub(crate) fn bytes(self) -> usize {
        match self {
            SampleKind::U8 => 1,
            SampleKind::U16 => 2,
            SampleKind::U32 | SampleKind::F32 => 4,
        }
    }

    /// Read one sample from the start of `v`. `v` must hold `self.bytes()` bytes.
    #[inline]
    pub(crate) fn read(self, v: &[u8]) -> f64 {
        match self {
            SampleKind::U8 => f64::from(v[0]),
            SampleKind::U16 => f64::from(u16::from_ne_bytes([v[0], v[1]])),
            SampleKind::U32 => f64::from(u32::from_ne_bytes([v[0], v[1], v[2], v[3]])),
            SampleKind::F32 => f64::from(f32::from_ne_bytes([v[0], v[1], v[2], v[3]])),
        }
    }

    /// Read one sample as an unsigned integer (palette index).
    #[inline]
    pub(crate) fn read_index(self, v: &[u8]) -> u32 {
        match self.as_index() {
            SampleKind::U8 => u32::from(v[0]),
            SampleKind::U16 => u32::from(u16::from_ne_bytes([v[0], v[1]])),
            _ => u32::from_ne_bytes([v[0], v[1], v[2], v[3]]),
        }
    }

    /// Narrow `value` and write it to the start of `out`.
    ///
    /// Integers truncate toward zero and saturate at the type bounds; NaN
    /// becomes 0.
    #[inline]
    pub(crate) fn write(self, value: f64, out: &mut [u8]) {
        match self {
            SampleKind::U8 => out[0] = value as u8,
            SampleKind::U16 => out[..2].copy_from_slice(&(value as u16).to_ne_bytes()),
            SampleKind::U32 => out[..4].copy_from_slice(&(value as u32).to_ne_bytes()),
            SampleKind::F32 => out[..4].copy_from_slice(&(value as f32).to_ne_bytes()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widening_is_exact() {
        assert_eq!(SampleKind::U8.read(&[255]), 255.0);
        assert_eq!(SampleKind::U16.read(&65535u16.to_ne_bytes()), 65535.0);
        assert_eq!(SampleKind::U32.read(&u32::MAX.to_ne_bytes()), 4294967295.0);
        assert_eq!(SampleKind::F32.read(&0.1f32.to_ne_bytes()), f64::from(0.1f32));
    }

    #[test]
    fn signed_reads_bit_pattern() {
        let kind = SampleKind::new(BitDepth::Sixteen, SampleFormat::Int);
        assert_eq!(kind.read(&(-1i16).to_ne_bytes()), 65535.0);
    }

    #[test]
    fn float_index_reads_integer() {
        let kind = SampleKind::new(BitDepth::ThirtyTwo, SampleFormat::Float);
        assert_eq!(kind.read_index(&7u32.to_ne_bytes()), 7);
    }

    #[test]
    fn narrowing_truncates() {
        let mut out = [0u8; 4];
        SampleKind::U8.write(3.9, &mut out);
        assert_eq!(out[0], 3);
        SampleKind::U16.write(70000.0, &mut out);
        assert_eq!(u16::from_ne_bytes([out[0], out[1]]), u16::MAX);
        SampleKind::F32.write(0.5, &mut out);
        assert_eq!(f32::from_ne_bytes(out), 0.5);
    }
}
