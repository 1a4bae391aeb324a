use alloc::format;

use crate::error::TiffError;
use crate::layout::ImageLayout;

/// Resource limits for decode operations.
///
/// All fields default to `None` (no limit). Layout limits are checked per
/// directory, before the output tensor is allocated.
#[derive(Clone, Debug, Default)]
pub struct Limits {
    pub max_width: Option<u64>,
    pub max_height: Option<u64>,
    /// Maximum pixel count (width * height).
    pub max_pixels: Option<u64>,
    /// Maximum bytes of one output tensor.
    pub max_memory_bytes: Option<u64>,
    /// Highest 1-based directory index that may be decoded.
    pub max_directories: Option<u32>,
}

fn exceeds(what: &str, value: u64, limit: Option<u64>) -> Result<(), TiffError> {
    match limit {
        Some(max) if value > max => Err(TiffError::LimitExceeded(format!(
            "{what} {value} exceeds limit {max}"
        ))),
        _ => Ok(()),
    }
}

impl Limits {
    /// Check one directory's layout: dimensions, pixel count and the size
    /// of the tensor it expands to.
    pub(crate) fn check_layout(&self, layout: &ImageLayout) -> Result<(), TiffError> {
        let (w, h) = (u64::from(layout.width), u64::from(layout.height));
        exceeds("width", w, self.max_width)?;
        exceeds("height", h, self.max_height)?;
        exceeds("pixel count", w * h, self.max_pixels)?;
        let bytes = (w * h)
            .saturating_mul(u64::from(layout.out_samples))
            .saturating_mul(core::mem::size_of::<f64>() as u64);
        exceeds("tensor bytes", bytes, self.max_memory_bytes)
    }

    pub(crate) fn check_directory(&self, index: u32) -> Result<(), TiffError> {
        exceeds(
            "directory",
            u64::from(index),
            self.max_directories.map(u64::from),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{BitDepth, PlanarConfig, SampleFormat};

    fn layout(width: u32, height: u32, planes: u16) -> ImageLayout {
        ImageLayout {
            width,
            height,
            samples_per_pixel: planes,
            out_samples: planes,
            bit_depth: BitDepth::Eight,
            sample_format: SampleFormat::Uint,
            planar: PlanarConfig::Chunky,
            tiles: None,
        }
    }

    #[test]
    fn no_limits_accepts_everything() {
        let limits = Limits::default();
        assert!(limits.check_layout(&layout(u32::MAX, u32::MAX, u16::MAX)).is_ok());
        assert!(limits.check_directory(u32::MAX).is_ok());
    }

    #[test]
    fn pixel_and_memory_limits() {
        let limits = Limits {
            max_pixels: Some(12),
            max_memory_bytes: Some(192),
            ..Default::default()
        };
        assert!(limits.check_layout(&layout(4, 3, 2)).is_ok());
        assert!(matches!(
            limits.check_layout(&layout(5, 3, 1)),
            Err(TiffError::LimitExceeded(_))
        ));
        assert!(limits.check_layout(&layout(4, 3, 3)).is_err());
    }

    #[test]
    fn directory_limit() {
        let limits = Limits {
            max_directories: Some(2),
            ..Default::default()
        };
        assert!(limits.check_directory(2).is_ok());
        assert!(limits.check_directory(3).is_err());
    }
}
