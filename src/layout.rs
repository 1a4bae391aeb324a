//! Image layout derived from a directory's fields.

use alloc::vec::Vec;

use crate::container::{ContainerReader, field_u16, field_u32};
use crate::error::{Advisory, TiffError};
use crate::palette::{Palette, effective_samples};
use crate::sample::SampleKind;
use crate::tag::Tag;

/// Supported bits per sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BitDepth {
    Eight,
    Sixteen,
    ThirtyTwo,
}

impl BitDepth {
    /// Validate a bits-per-sample value. 12-bit gets its own error.
    pub fn from_bits(bits: u16) -> Result<Self, TiffError> {
        match bits {
            8 => Ok(BitDepth::Eight),
            16 => Ok(BitDepth::Sixteen),
            32 => Ok(BitDepth::ThirtyTwo),
            12 => Err(TiffError::UnsupportedBitDepth12),
            other => Err(TiffError::UnsupportedBitDepth(other)),
        }
    }

    pub fn bits(self) -> u16 {
        match self {
            BitDepth::Eight => 8,
            BitDepth::Sixteen => 16,
            BitDepth::ThirtyTwo => 32,
        }
    }

    pub fn bytes(self) -> usize {
        usize::from(self.bits() / 8)
    }
}

/// Numeric interpretation of stored samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SampleFormat {
    #[default]
    Uint,
    Int,
    Float,
}

impl SampleFormat {
    /// Codes other than signed (2) and IEEE float (3) read as unsigned.
    pub fn from_code(code: u16) -> Self {
        match code {
            2 => SampleFormat::Int,
            3 => SampleFormat::Float,
            _ => SampleFormat::Uint,
        }
    }

    pub fn code(self) -> u16 {
        match self {
            SampleFormat::Uint => 1,
            SampleFormat::Int => 2,
            SampleFormat::Float => 3,
        }
    }
}

/// Whether samples of one pixel are interleaved or stored plane by plane.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PlanarConfig {
    #[default]
    Chunky,
    Separate,
}

impl PlanarConfig {
    pub fn from_code(code: u16) -> Self {
        if code == 2 {
            PlanarConfig::Separate
        } else {
            PlanarConfig::Chunky
        }
    }
}

/// Effective decode plan for one directory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageLayout {
    pub width: u32,
    pub height: u32,
    /// Samples per pixel as declared by the directory.
    pub samples_per_pixel: u16,
    /// Planes in the output tensor (after palette expansion).
    pub out_samples: u16,
    pub bit_depth: BitDepth,
    pub sample_format: SampleFormat,
    pub planar: PlanarConfig,
    /// Tile width and height, `None` for strip-organized images.
    pub tiles: Option<(u32, u32)>,
}

/// Result of [`ImageLayout::describe`].
#[derive(Clone, Debug)]
pub struct Described {
    pub layout: ImageLayout,
    /// Color map, kept only when it expands single-sample images.
    pub palette: Option<Palette>,
    pub advisories: Vec<Advisory>,
}

impl ImageLayout {
    /// Derive the layout of the container's current directory.
    ///
    /// Fails before any strip or tile is read when the layout can't be
    /// decoded.
    pub fn describe<C: ContainerReader + ?Sized>(c: &C) -> Result<Described, TiffError> {
        let width = field_u32(c, Tag::IMAGE_WIDTH, 0);
        let height = field_u32(c, Tag::IMAGE_LENGTH, 0);

        let tile_width = field_u32(c, Tag::TILE_WIDTH, 0);
        let tile_height = field_u32(c, Tag::TILE_LENGTH, 0);
        let tiles = (tile_width != 0 && tile_height != 0).then_some((tile_width, tile_height));

        let planar = PlanarConfig::from_code(field_u16(c, Tag::PLANAR_CONFIG, 1));
        let bits = field_u16(c, Tag::BITS_PER_SAMPLE, 8);
        let samples_per_pixel = field_u16(c, Tag::SAMPLES_PER_PIXEL, 1);
        let sample_format = SampleFormat::from_code(field_u16(c, Tag::SAMPLE_FORMAT, 1));

        let palette = c
            .get_array_field(Tag::COLOR_MAP)
            .and_then(Palette::from_tables);

        let bit_depth = BitDepth::from_bits(bits)?;

        let palette = palette.filter(|_| samples_per_pixel == 1);
        let out_samples = effective_samples(samples_per_pixel, palette.as_ref());

        let mut advisories = Vec::new();
        if sample_format == SampleFormat::Int {
            log::warn!("{}", Advisory::SignedFormat);
            advisories.push(Advisory::SignedFormat);
        }

        if tiles.is_some() {
            if samples_per_pixel > 1 && planar == PlanarConfig::Separate {
                return Err(TiffError::UnsupportedPlanarTiled);
            }
            if palette.is_some() {
                return Err(TiffError::UnsupportedPaletteTiled);
            }
        }

        let layout = ImageLayout {
            width,
            height,
            samples_per_pixel,
            out_samples,
            bit_depth,
            sample_format,
            planar,
            tiles,
        };
        log::debug!(
            "image {width} x {height}, tiles {:?}, bps = {bits}, spp = {samples_per_pixel} \
             (output {out_samples}), config = {planar:?}, colormap = {}",
            tiles,
            if palette.is_some() { "yes" } else { "no" },
        );

        Ok(Described {
            layout,
            palette,
            advisories,
        })
    }

    pub fn is_tiled(&self) -> bool {
        self.tiles.is_some()
    }

    /// `width * height`, checked.
    pub fn pixel_count(&self) -> Result<usize, TiffError> {
        (self.width as usize)
            .checked_mul(self.height as usize)
            .ok_or(TiffError::DimensionsTooLarge {
                width: self.width,
                height: self.height,
            })
    }

    /// Number of f64 values in the output tensor.
    pub fn tensor_len(&self) -> Result<usize, TiffError> {
        self.pixel_count()?
            .checked_mul(usize::from(self.out_samples))
            .ok_or(TiffError::DimensionsTooLarge {
                width: self.width,
                height: self.height,
            })
    }

    pub(crate) fn sample_kind(&self) -> SampleKind {
        SampleKind::new(self.bit_depth, self.sample_format)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::memory::{MemoryContainer, MemoryDirectory};

    fn describe(dir: MemoryDirectory) -> Result<Described, TiffError> {
        ImageLayout::describe(&MemoryContainer::new(vec![dir]))
    }

    #[test]
    fn defaults_apply() {
        let d = describe(MemoryDirectory::default()).unwrap();
        assert_eq!(d.layout.width, 0);
        assert_eq!(d.layout.height, 0);
        assert_eq!(d.layout.bit_depth, BitDepth::Eight);
        assert_eq!(d.layout.samples_per_pixel, 1);
        assert_eq!(d.layout.sample_format, SampleFormat::Uint);
        assert_eq!(d.layout.planar, PlanarConfig::Chunky);
        assert!(!d.layout.is_tiled());
        assert_eq!(d.layout.tensor_len().unwrap(), 0);
    }

    #[test]
    fn twelve_bit_has_its_own_error() {
        let dir = MemoryDirectory::new(2, 2).with_field(Tag::BITS_PER_SAMPLE, 12u16);
        assert!(matches!(describe(dir), Err(TiffError::UnsupportedBitDepth12)));
        let dir = MemoryDirectory::new(2, 2).with_field(Tag::BITS_PER_SAMPLE, 24u16);
        assert!(matches!(describe(dir), Err(TiffError::UnsupportedBitDepth(24))));
    }

    #[test]
    fn tile_requires_both_dimensions() {
        let dir = MemoryDirectory::new(4, 4).with_field(Tag::TILE_WIDTH, 16u32);
        assert!(!describe(dir).unwrap().layout.is_tiled());
        let dir = MemoryDirectory::new(4, 4)
            .with_field(Tag::TILE_WIDTH, 16u32)
            .with_field(Tag::TILE_LENGTH, 0u32);
        assert!(!describe(dir).unwrap().layout.is_tiled());
        let dir = MemoryDirectory::new(4, 4)
            .with_field(Tag::TILE_WIDTH, 16u32)
            .with_field(Tag::TILE_LENGTH, 16u32);
        assert_eq!(describe(dir).unwrap().layout.tiles, Some((16, 16)));
    }

    #[test]
    fn tiled_separate_multisample_rejected() {
        let dir = MemoryDirectory::new(4, 4)
            .with_field(Tag::TILE_WIDTH, 16u32)
            .with_field(Tag::TILE_LENGTH, 16u32)
            .with_field(Tag::SAMPLES_PER_PIXEL, 3u16)
            .with_field(Tag::PLANAR_CONFIG, 2u16);
        assert!(matches!(describe(dir), Err(TiffError::UnsupportedPlanarTiled)));

        // A single sample makes the planar config irrelevant.
        let dir = MemoryDirectory::new(4, 4)
            .with_field(Tag::TILE_WIDTH, 16u32)
            .with_field(Tag::TILE_LENGTH, 16u32)
            .with_field(Tag::PLANAR_CONFIG, 2u16);
        assert!(describe(dir).is_ok());
    }

    #[test]
    fn tiled_palette_rejected() {
        let dir = MemoryDirectory::new(4, 4)
            .with_field(Tag::TILE_WIDTH, 16u32)
            .with_field(Tag::TILE_LENGTH, 16u32)
            .with_color_map(vec![vec![0; 256]]);
        assert!(matches!(describe(dir), Err(TiffError::UnsupportedPaletteTiled)));
    }

    #[test]
    fn palette_expands_single_sample_only() {
        let tables = vec![vec![0; 256], vec![0; 256], vec![0; 256]];
        let d = describe(MemoryDirectory::new(2, 2).with_color_map(tables.clone())).unwrap();
        assert_eq!(d.layout.out_samples, 3);
        assert!(d.palette.is_some());

        let d = describe(
            MemoryDirectory::new(2, 2)
                .with_field(Tag::SAMPLES_PER_PIXEL, 2u16)
                .with_color_map(tables),
        )
        .unwrap();
        assert_eq!(d.layout.out_samples, 2);
        assert!(d.palette.is_none());
    }

    #[test]
    fn signed_format_is_advisory() {
        let dir = MemoryDirectory::new(1, 1).with_field(Tag::SAMPLE_FORMAT, 2u16);
        let d = describe(dir).unwrap();
        assert_eq!(d.advisories, [Advisory::SignedFormat]);
        assert_eq!(d.layout.sample_format, SampleFormat::Int);
    }
}
