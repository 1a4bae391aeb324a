//! Pixel packing: dense tensors into interleaved single-strip directories.

use alloc::format;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use enough::Stop;

use crate::container::ContainerWriter;
use crate::error::{Advisory, TiffError};
use crate::layout::{BitDepth, SampleFormat};
use crate::sample::SampleKind;
use crate::tag::{Compression, FieldValue, Tag};
use crate::tensor::Tensor;

/// Written to the software tag of every directory.
const SOFTWARE: &str = concat!("zentiff ", env!("CARGO_PKG_VERSION"));

/// Photometric interpretation written for every image.
const PHOTOMETRIC_MINISBLACK: u16 = 1;

/// Optional descriptive tags applied to every written directory.
///
/// `None` fields are not written.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EncodeTags {
    pub x_resolution: Option<f64>,
    pub y_resolution: Option<f64>,
    /// 1 = none, 2 = inch, 3 = centimeter.
    pub resolution_unit: Option<u16>,
    /// 1..=8, see the TIFF orientation tag.
    pub orientation: Option<u16>,
    pub x_position: Option<f64>,
    pub y_position: Option<f64>,
    pub copyright: Option<String>,
    pub artist: Option<String>,
    pub document_name: Option<String>,
    pub date_time: Option<String>,
}

impl EncodeTags {
    fn apply<W: ContainerWriter + ?Sized>(&self, w: &mut W) -> Result<(), TiffError> {
        let floats = [
            (Tag::X_RESOLUTION, self.x_resolution),
            (Tag::Y_RESOLUTION, self.y_resolution),
            (Tag::X_POSITION, self.x_position),
            (Tag::Y_POSITION, self.y_position),
        ];
        for (tag, value) in floats {
            if let Some(v) = value {
                // Stored as 32-bit float / rational by the container.
                w.set_field(tag, FieldValue::Float(f64::from(v as f32)))?;
            }
        }
        let shorts = [
            (Tag::RESOLUTION_UNIT, self.resolution_unit),
            (Tag::ORIENTATION, self.orientation),
        ];
        for (tag, value) in shorts {
            if let Some(v) = value {
                w.set_field(tag, v.into())?;
            }
        }
        let texts = [
            (Tag::COPYRIGHT, &self.copyright),
            (Tag::ARTIST, &self.artist),
            (Tag::DOCUMENT_NAME, &self.document_name),
            (Tag::DATE_TIME, &self.date_time),
        ];
        for (tag, value) in texts {
            if let Some(v) = value {
                w.set_field(tag, v.as_str().into())?;
            }
        }
        Ok(())
    }
}

/// Summary of an encode call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodeOutput {
    /// Directories written.
    pub images: usize,
    pub advisories: Vec<Advisory>,
}

impl EncodeOutput {
    pub(crate) fn empty_sequence() -> Self {
        log::warn!("{}", Advisory::EmptySequence);
        Self {
            images: 0,
            advisories: vec![Advisory::EmptySequence],
        }
    }
}

/// Encode request: output sample representation plus per-directory tags.
///
/// ```
/// use zentiff::{BitDepth, EncodeRequest, MemoryWriter, Tensor, Unstoppable};
///
/// let tensor = Tensor::from_vec(1, 2, 1, vec![3.0, 4.0])?;
/// let mut writer = MemoryWriter::new();
/// EncodeRequest::new(BitDepth::Eight).encode(&mut writer, &[tensor], Unstoppable)?;
/// assert_eq!(writer.finish()[0].strips[0], [3, 4]);
/// # Ok::<(), zentiff::TiffError>(())
/// ```
#[derive(Clone, Debug)]
pub struct EncodeRequest {
    bit_depth: BitDepth,
    float: bool,
    compression: Compression,
    tags: EncodeTags,
}

impl EncodeRequest {
    pub fn new(bit_depth: BitDepth) -> Self {
        Self {
            bit_depth,
            float: false,
            compression: Compression::None,
            tags: EncodeTags::default(),
        }
    }

    /// Write IEEE float samples. Requires [`BitDepth::ThirtyTwo`].
    pub fn with_float(mut self, float: bool) -> Self {
        self.float = float;
        self
    }

    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    pub fn with_tags(mut self, tags: EncodeTags) -> Self {
        self.tags = tags;
        self
    }

    /// Write each tensor as its own directory, in order.
    ///
    /// An empty slice writes nothing and reports [`Advisory::EmptySequence`].
    pub fn encode<W: ContainerWriter + ?Sized>(
        &self,
        writer: &mut W,
        tensors: &[Tensor],
        stop: impl Stop,
    ) -> Result<EncodeOutput, TiffError> {
        if tensors.is_empty() {
            return Ok(EncodeOutput::empty_sequence());
        }
        let kind = self.sample_kind()?;

        for (i, tensor) in tensors.iter().enumerate() {
            stop.check()?;
            let (height, width, planes) = tensor.dims();
            log::debug!("writing image {}: {width} x {height} x {planes}", i + 1);
            self.write_fields(writer, width, height, planes)?;
            let buf = pack_with(tensor, kind, &stop)?;
            writer.write_encoded_strip(&buf)?;
            writer.write_directory()?;
        }

        Ok(EncodeOutput {
            images: tensors.len(),
            advisories: Vec::new(),
        })
    }

    pub(crate) fn sample_kind(&self) -> Result<SampleKind, TiffError> {
        if self.float && self.bit_depth != BitDepth::ThirtyTwo {
            return Err(TiffError::UnsupportedVariant(format!(
                "float samples need 32 bits, got {}",
                self.bit_depth.bits()
            )));
        }
        Ok(SampleKind::new(self.bit_depth, self.sample_format()))
    }

    fn sample_format(&self) -> SampleFormat {
        if self.float {
            SampleFormat::Float
        } else {
            SampleFormat::Uint
        }
    }

    fn write_fields<W: ContainerWriter + ?Sized>(
        &self,
        w: &mut W,
        width: u32,
        height: u32,
        planes: u16,
    ) -> Result<(), TiffError> {
        w.set_field(Tag::IMAGE_WIDTH, width.into())?;
        w.set_field(Tag::IMAGE_LENGTH, height.into())?;
        w.set_field(Tag::PLANAR_CONFIG, 1u16.into())?;
        w.set_field(Tag::SOFTWARE, SOFTWARE.into())?;
        w.set_field(Tag::BITS_PER_SAMPLE, self.bit_depth.bits().into())?;
        w.set_field(Tag::SAMPLES_PER_PIXEL, planes.into())?;
        w.set_field(Tag::SAMPLE_FORMAT, self.sample_format().code().into())?;
        w.set_field(Tag::ROWS_PER_STRIP, height.into())?;
        w.set_field(Tag::COMPRESSION, self.compression.code().into())?;
        w.set_field(Tag::PHOTOMETRIC, PHOTOMETRIC_MINISBLACK.into())?;
        self.tags.apply(w)
    }
}

/// Pack a tensor into one chunky (interleaved) buffer, row by row.
///
/// Sample `(row, col, plane)` lands at element `(col + row * width) * planes + plane`.
pub fn pack(tensor: &Tensor, bit_depth: BitDepth, float: bool) -> Result<Vec<u8>, TiffError> {
    let kind = EncodeRequest::new(bit_depth).with_float(float).sample_kind()?;
    pack_with(tensor, kind, &enough::Unstoppable)
}

fn pack_with(tensor: &Tensor, kind: SampleKind, stop: &dyn Stop) -> Result<Vec<u8>, TiffError> {
    let (height, width, planes) = tensor.dims();
    let bytes = kind.bytes();
    let len = tensor
        .as_slice()
        .len()
        .checked_mul(bytes)
        .ok_or(TiffError::DimensionsTooLarge { width, height })?;
    let mut buf = vec![0u8; len];

    let w = width as usize;
    let p = usize::from(planes);
    for row in 0..height {
        if row % 16 == 0 {
            stop.check()?;
        }
        for col in 0..width {
            for plane in 0..planes {
                let at = ((col as usize + row as usize * w) * p + usize::from(plane)) * bytes;
                kind.write(tensor.get(row, col, plane), &mut buf[at..at + bytes]);
            }
        }
    }
    Ok(buf)
}
