//! TIFF tag numbers, field values and the names of enumerated tag values.

use alloc::string::String;

/// A TIFF tag number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tag(pub u16);

impl Tag {
    pub const IMAGE_WIDTH: Tag = Tag(256);
    pub const IMAGE_LENGTH: Tag = Tag(257);
    pub const BITS_PER_SAMPLE: Tag = Tag(258);
    pub const COMPRESSION: Tag = Tag(259);
    pub const PHOTOMETRIC: Tag = Tag(262);
    pub const THRESHHOLDING: Tag = Tag(263);
    pub const DOCUMENT_NAME: Tag = Tag(269);
    pub const IMAGE_DESCRIPTION: Tag = Tag(270);
    pub const ORIENTATION: Tag = Tag(274);
    pub const SAMPLES_PER_PIXEL: Tag = Tag(277);
    pub const ROWS_PER_STRIP: Tag = Tag(278);
    pub const X_RESOLUTION: Tag = Tag(282);
    pub const Y_RESOLUTION: Tag = Tag(283);
    pub const PLANAR_CONFIG: Tag = Tag(284);
    pub const X_POSITION: Tag = Tag(286);
    pub const Y_POSITION: Tag = Tag(287);
    pub const RESOLUTION_UNIT: Tag = Tag(296);
    pub const SOFTWARE: Tag = Tag(305);
    pub const DATE_TIME: Tag = Tag(306);
    pub const ARTIST: Tag = Tag(315);
    pub const COLOR_MAP: Tag = Tag(320);
    pub const TILE_WIDTH: Tag = Tag(322);
    pub const TILE_LENGTH: Tag = Tag(323);
    pub const SAMPLE_FORMAT: Tag = Tag(339);
    pub const INDEXED: Tag = Tag(346);
    pub const IMAGE_DEPTH: Tag = Tag(32997);
    pub const COPYRIGHT: Tag = Tag(33432);
}

/// A scalar field value as stored in or read from a directory.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    /// SHORT or LONG.
    Int(u32),
    /// FLOAT, DOUBLE or RATIONAL (converted to floating point).
    Float(f64),
    /// ASCII.
    Ascii(String),
}

impl FieldValue {
    pub fn as_u32(&self) -> Option<u32> {
        match *self {
            FieldValue::Int(v) => Some(v),
            _ => None,
        }
    }

    /// Integer values narrowed to u16 (SHORT fields). `None` if out of range.
    pub fn as_u16(&self) -> Option<u16> {
        self.as_u32().and_then(|v| u16::try_from(v).ok())
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            FieldValue::Float(v) => Some(v),
            FieldValue::Int(v) => Some(f64::from(v)),
            FieldValue::Ascii(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Ascii(s) => Some(s),
            _ => None,
        }
    }
}

impl From<u16> for FieldValue {
    fn from(v: u16) -> Self {
        FieldValue::Int(u32::from(v))
    }
}

impl From<u32> for FieldValue {
    fn from(v: u32) -> Self {
        FieldValue::Int(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Ascii(v.into())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Ascii(v)
    }
}

/// Compression scheme requested from the container when encoding.
///
/// The container performs the actual compression.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Compression {
    #[default]
    None,
    CcittRle,
    CcittGroup3,
    CcittGroup4,
    Lzw,
    OldJpeg,
    Jpeg,
    Deflate,
    JbigBw,
    JbigColor,
    PackBits,
    /// Any other TIFF compression code.
    Other(u16),
}

impl Compression {
    pub fn code(self) -> u16 {
        match self {
            Compression::None => 1,
            Compression::CcittRle => 2,
            Compression::CcittGroup3 => 3,
            Compression::CcittGroup4 => 4,
            Compression::Lzw => 5,
            Compression::OldJpeg => 6,
            Compression::Jpeg => 7,
            Compression::Deflate => 8,
            Compression::JbigBw => 9,
            Compression::JbigColor => 10,
            Compression::PackBits => 32773,
            Compression::Other(c) => c,
        }
    }

    pub fn from_code(code: u16) -> Self {
        match code {
            1 => Compression::None,
            2 => Compression::CcittRle,
            3 => Compression::CcittGroup3,
            4 => Compression::CcittGroup4,
            5 => Compression::Lzw,
            6 => Compression::OldJpeg,
            7 => Compression::Jpeg,
            8 => Compression::Deflate,
            9 => Compression::JbigBw,
            10 => Compression::JbigColor,
            32773 => Compression::PackBits,
            other => Compression::Other(other),
        }
    }

    /// Human-readable name, `None` for codes without one.
    pub fn name(self) -> Option<&'static str> {
        Some(match self {
            Compression::None => "none",
            Compression::CcittRle => "CCITT RLE",
            Compression::CcittGroup3 => "CCITT Group 3 fax",
            Compression::CcittGroup4 => "CCITT Group 4 fax",
            Compression::Lzw => "LZW",
            Compression::OldJpeg => "old JPEG",
            Compression::Jpeg => "JPEG",
            Compression::Deflate => "deflate",
            Compression::JbigBw => "JBIG b/w",
            Compression::JbigColor => "JBIG color",
            Compression::PackBits => "PackBits",
            Compression::Other(_) => return None,
        })
    }
}

pub(crate) fn sample_format_name(code: u16) -> Option<&'static str> {
    Some(match code {
        1 => "uint",
        2 => "int",
        3 => "float",
        4 => "undefined",
        5 => "complex int",
        6 => "complex float",
        _ => return None,
    })
}

pub(crate) fn planar_config_name(code: u16) -> Option<&'static str> {
    match code {
        1 => Some("contiguous"),
        2 => Some("separate"),
        _ => None,
    }
}

pub(crate) fn resolution_unit_name(code: u16) -> &'static str {
    match code {
        1 => "none",
        2 => "inch",
        3 => "cm",
        _ => "unknown",
    }
}

pub(crate) fn orientation_name(code: u16) -> &'static str {
    match code {
        1 => "top_left",
        2 => "top_right",
        3 => "bottom_right",
        4 => "bottom_left",
        5 => "left_top",
        6 => "right_top",
        7 => "right_bottom",
        8 => "left_bottom",
        _ => "<invalid>",
    }
}

pub(crate) fn photometric_name(code: u16) -> Option<&'static str> {
    Some(match code {
        0 => "white is zero",
        1 => "black is zero",
        2 => "RGB",
        3 => "palette",
        4 => "mask",
        5 => "separated",
        6 => "YCbCr",
        8 => "CIELAB",
        9 => "ICCLab",
        10 => "ITULab",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compression_codes_roundtrip() {
        for code in [1u16, 2, 3, 4, 5, 6, 7, 8, 9, 10, 32773, 34712] {
            assert_eq!(Compression::from_code(code).code(), code);
        }
        assert_eq!(Compression::from_code(8).name(), Some("deflate"));
        assert_eq!(Compression::Other(34712).name(), None);
    }

    #[test]
    fn field_value_accessors() {
        assert_eq!(FieldValue::Int(70000).as_u16(), None);
        assert_eq!(FieldValue::Int(300).as_u16(), Some(300));
        assert_eq!(FieldValue::Int(3).as_f64(), Some(3.0));
        assert_eq!(FieldValue::from("abc").as_str(), Some("abc"));
        assert_eq!(FieldValue::Float(1.5).as_u32(), None);
    }
}
