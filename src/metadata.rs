//! Descriptive tag extraction.
//!
//! A fixed set of tags is read from a directory into name → value pairs.
//! Enumerated tags (compression, orientation, ...) are reported by name.

use alloc::format;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use enough::Stop;

use crate::container::{ContainerReader, field_u16};
use crate::decode::for_each_directory;
use crate::error::TiffError;
use crate::palette::table_len;
use crate::tag::{
    Compression, Tag, orientation_name, photometric_name, planar_config_name,
    resolution_unit_name, sample_format_name,
};

/// Value of one extracted tag.
#[derive(Clone, Debug, PartialEq)]
pub enum TagValue {
    Int(u32),
    Float(f64),
    Bool(bool),
    Text(String),
    Palette(PaletteMatrix),
}

/// The color map as a `rows × 3` matrix with columns red, green, blue.
///
/// Stored column-major; channels missing from the directory are zero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaletteMatrix {
    rows: usize,
    data: Vec<u16>,
}

impl PaletteMatrix {
    pub const COLUMNS: [&'static str; 3] = ["red", "green", "blue"];

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Column 0 = red, 1 = green, 2 = blue.
    pub fn column(&self, col: usize) -> &[u16] {
        &self.data[col * self.rows..(col + 1) * self.rows]
    }

    pub fn get(&self, row: usize, col: usize) -> u16 {
        self.data[col * self.rows + row]
    }

    /// Rows as `[red, green, blue]` triples.
    pub fn to_rows(&self) -> Vec<[u16; 3]> {
        (0..self.rows)
            .map(|r| [self.get(r, 0), self.get(r, 1), self.get(r, 2)])
            .collect()
    }
}

/// How a supported tag's value is read and presented.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FieldKind {
    Int,
    Float,
    Bool,
    Text,
    SampleFormat,
    PlanarConfig,
    Compression,
    ResolutionUnit,
    Orientation,
    Photometric,
    ColorMap,
}

/// A tag this crate knows how to extract.
#[derive(Clone, Copy, Debug)]
pub struct SupportedTag {
    pub tag: Tag,
    /// Key in [`Metadata`].
    pub name: &'static str,
    /// The TIFF field name, as libtiff reports it.
    pub field_name: &'static str,
    kind: FieldKind,
}

const fn supported(
    tag: Tag,
    name: &'static str,
    field_name: &'static str,
    kind: FieldKind,
) -> SupportedTag {
    SupportedTag {
        tag,
        name,
        field_name,
        kind,
    }
}

/// Tags extracted by [`extract`], in output order.
pub const SUPPORTED_TAGS: &[SupportedTag] = &[
    supported(Tag::IMAGE_WIDTH, "width", "ImageWidth", FieldKind::Int),
    supported(Tag::IMAGE_LENGTH, "length", "ImageLength", FieldKind::Int),
    supported(Tag::IMAGE_DEPTH, "depth", "ImageDepth", FieldKind::Int),
    supported(Tag::BITS_PER_SAMPLE, "bits_per_sample", "BitsPerSample", FieldKind::Int),
    supported(Tag::SAMPLES_PER_PIXEL, "samples_per_pixel", "SamplesPerPixel", FieldKind::Int),
    supported(Tag::SAMPLE_FORMAT, "sample_format", "SampleFormat", FieldKind::SampleFormat),
    supported(Tag::PLANAR_CONFIG, "planar_config", "PlanarConfiguration", FieldKind::PlanarConfig),
    supported(Tag::ROWS_PER_STRIP, "rows_per_strip", "RowsPerStrip", FieldKind::Int),
    supported(Tag::TILE_WIDTH, "tile_width", "TileWidth", FieldKind::Int),
    supported(Tag::TILE_LENGTH, "tile_length", "TileLength", FieldKind::Int),
    supported(Tag::COMPRESSION, "compression", "Compression", FieldKind::Compression),
    supported(Tag::THRESHHOLDING, "threshholding", "Threshholding", FieldKind::Int),
    supported(Tag::X_RESOLUTION, "x_resolution", "XResolution", FieldKind::Float),
    supported(Tag::Y_RESOLUTION, "y_resolution", "YResolution", FieldKind::Float),
    supported(Tag::X_POSITION, "x_position", "XPosition", FieldKind::Float),
    supported(Tag::Y_POSITION, "y_position", "YPosition", FieldKind::Float),
    supported(Tag::RESOLUTION_UNIT, "resolution_unit", "ResolutionUnit", FieldKind::ResolutionUnit),
    supported(Tag::INDEXED, "indexed", "Indexed", FieldKind::Bool),
    supported(Tag::ORIENTATION, "orientation", "Orientation", FieldKind::Orientation),
    supported(Tag::COPYRIGHT, "copyright", "Copyright", FieldKind::Text),
    supported(Tag::ARTIST, "artist", "Artist", FieldKind::Text),
    supported(Tag::DOCUMENT_NAME, "document_name", "DocumentName", FieldKind::Text),
    supported(Tag::DATE_TIME, "date_time", "DateTime", FieldKind::Text),
    supported(Tag::IMAGE_DESCRIPTION, "description", "ImageDescription", FieldKind::Text),
    supported(Tag::SOFTWARE, "software", "Software", FieldKind::Text),
    supported(Tag::PHOTOMETRIC, "color_space", "Photometric", FieldKind::Photometric),
    supported(Tag::COLOR_MAP, "color_map", "ColorMap", FieldKind::ColorMap),
];

/// Supported tag numbers with the snake_case keys used in [`Metadata`]
/// (`"width"`, `"x_resolution"`, ...), not the TIFF field names.
pub fn supported_tags() -> impl Iterator<Item = (Tag, &'static str)> {
    SUPPORTED_TAGS.iter().map(|t| (t.tag, t.name))
}

/// Supported tag numbers with their TIFF field names (`"ImageWidth"`, ...).
pub fn supported_field_names() -> impl Iterator<Item = (Tag, &'static str)> {
    SUPPORTED_TAGS.iter().map(|t| (t.tag, t.field_name))
}

/// Extracted tags of one directory, in [`SUPPORTED_TAGS`] order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Metadata {
    entries: Vec<(&'static str, TagValue)>,
}

impl Metadata {
    pub fn get(&self, name: &str) -> Option<&TagValue> {
        self.entries.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &TagValue)> {
        self.entries.iter().map(|(n, v)| (*n, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn named(name: Option<&'static str>, code: u16) -> TagValue {
    match name {
        Some(n) => TagValue::Text(n.into()),
        None => TagValue::Text(format!("unknown ({code})")),
    }
}

/// Extract the supported tags present in the container's current directory.
///
/// Absent tags are omitted, except `sample_format`, which reports `"uint"`
/// when absent. Tags the container has no field descriptor for are skipped.
pub fn extract<C: ContainerReader + ?Sized>(c: &C) -> Metadata {
    let mut entries = Vec::new();
    for supported in SUPPORTED_TAGS {
        if !c.has_field_info(supported.tag) {
            continue;
        }
        if let Some(value) = extract_one(c, supported) {
            entries.push((supported.name, value));
        }
    }
    Metadata { entries }
}

fn extract_one<C: ContainerReader + ?Sized>(c: &C, supported: &SupportedTag) -> Option<TagValue> {
    if supported.kind == FieldKind::ColorMap {
        return palette_matrix(c).map(TagValue::Palette);
    }
    let field = c.get_field(supported.tag);
    if supported.kind == FieldKind::SampleFormat && field.is_none() {
        return Some(TagValue::Text("uint".into()));
    }
    let field = field?;
    let code = || field.as_u16();
    Some(match supported.kind {
        FieldKind::Int => TagValue::Int(field.as_u32()?),
        FieldKind::Float => TagValue::Float(field.as_f64()?),
        FieldKind::Bool => TagValue::Bool(field.as_u32()? != 0),
        FieldKind::Text => TagValue::Text(field.as_str()?.into()),
        FieldKind::SampleFormat => {
            let code = code()?;
            named(sample_format_name(code), code)
        }
        FieldKind::PlanarConfig => {
            let code = code()?;
            named(planar_config_name(code), code)
        }
        FieldKind::Compression => {
            let code = code()?;
            named(Compression::from_code(code).name(), code)
        }
        FieldKind::Photometric => {
            let code = code()?;
            named(photometric_name(code), code)
        }
        FieldKind::ResolutionUnit => TagValue::Text(resolution_unit_name(code()?).into()),
        FieldKind::Orientation => TagValue::Text(orientation_name(code()?).into()),
        FieldKind::ColorMap => return None,
    })
}

/// Largest palette matrix built from the bit depth; deeper images size
/// the matrix by their longest table instead.
const MAX_PALETTE_BITS: u16 = 16;

fn palette_matrix<C: ContainerReader + ?Sized>(c: &C) -> Option<PaletteMatrix> {
    let tables = c.get_array_field(Tag::COLOR_MAP)?;
    let bits = field_u16(c, Tag::BITS_PER_SAMPLE, 8);
    let rows = if bits <= MAX_PALETTE_BITS {
        table_len(bits)
    } else {
        tables.iter().map(Vec::len).max().unwrap_or(0)
    };
    let mut data = vec![0u16; rows * 3];
    for (col, table) in tables.iter().take(3).enumerate() {
        let n = table.len().min(rows);
        data[col * rows..col * rows + n].copy_from_slice(&table[..n]);
    }
    Some(PaletteMatrix { rows, data })
}

/// Extract metadata for the selected 1-based directories (all when `None`).
pub fn read_metadata<C: ContainerReader + ?Sized>(
    c: &mut C,
    directories: Option<&[u32]>,
    stop: impl Stop,
) -> Result<Vec<Metadata>, TiffError> {
    for_each_directory(c, directories, &stop, |c, _, _| Ok(extract(&*c)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Unstoppable;
    use crate::memory::{MemoryContainer, MemoryDirectory};

    #[test]
    fn enumerated_tags_are_named() {
        let c = MemoryContainer::new(vec![
            MemoryDirectory::new(4, 2)
                .with_field(Tag::COMPRESSION, 8u16)
                .with_field(Tag::PHOTOMETRIC, 2u16)
                .with_field(Tag::ORIENTATION, 6u16)
                .with_field(Tag::RESOLUTION_UNIT, 3u16)
                .with_field(Tag::PLANAR_CONFIG, 7u16)
                .with_field(Tag::X_RESOLUTION, 72.0)
                .with_field(Tag::ARTIST, "someone"),
        ]);
        let m = extract(&c);
        let text = |name| match m.get(name) {
            Some(TagValue::Text(s)) => s.clone(),
            other => panic!("{name}: {other:?}"),
        };
        assert_eq!(text("compression"), "deflate");
        assert_eq!(text("color_space"), "RGB");
        assert_eq!(text("orientation"), "right_top");
        assert_eq!(text("resolution_unit"), "cm");
        assert_eq!(text("planar_config"), "unknown (7)");
        assert_eq!(text("sample_format"), "uint");
        assert_eq!(text("artist"), "someone");
        assert_eq!(m.get("x_resolution"), Some(&TagValue::Float(72.0)));
        assert_eq!(m.get("width"), Some(&TagValue::Int(4)));
        assert_eq!(m.get("copyright"), None);
    }

    #[test]
    fn tags_without_descriptor_are_skipped() {
        let c = MemoryContainer::new(vec![
            MemoryDirectory::new(1, 1).with_field(Tag::SAMPLE_FORMAT, 3u16),
        ])
        .with_unknown_tag(Tag::SAMPLE_FORMAT);
        let m = extract(&c);
        assert_eq!(m.get("sample_format"), None);
        assert!(m.iter().all(|(name, _)| name != "sample_format"));
    }

    #[test]
    fn palette_is_a_full_matrix() {
        let c = MemoryContainer::new(vec![
            MemoryDirectory::new(1, 1).with_color_map(vec![vec![1, 2, 3], vec![4, 5, 6]]),
        ]);
        let m = extract(&c);
        let Some(TagValue::Palette(p)) = m.get("color_map") else {
            panic!("no palette");
        };
        assert_eq!(p.rows(), 256);
        assert_eq!(&p.column(0)[..3], &[1, 2, 3]);
        assert_eq!(&p.column(1)[..3], &[4, 5, 6]);
        assert!(p.column(2).iter().all(|&v| v == 0));
        assert_eq!(p.to_rows()[1], [2, 5, 0]);
    }

    #[test]
    fn reads_selected_directories() {
        let mut c = MemoryContainer::new(vec![
            MemoryDirectory::new(1, 1),
            MemoryDirectory::new(2, 2),
            MemoryDirectory::new(3, 3),
        ]);
        let all = read_metadata(&mut c, Some(&[2, 3]), Unstoppable).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].get("width"), Some(&TagValue::Int(2)));
        assert_eq!(all[1].get("width"), Some(&TagValue::Int(3)));
    }

    #[test]
    fn supported_tag_table() {
        let tags: Vec<_> = supported_tags().collect();
        assert!(tags.contains(&(Tag::COPYRIGHT, "copyright")));
        assert_eq!(tags.len(), SUPPORTED_TAGS.len());

        let fields: Vec<_> = supported_field_names().collect();
        assert_eq!(fields[0], (Tag::IMAGE_WIDTH, "ImageWidth"));
        assert!(fields.contains(&(Tag::PLANAR_CONFIG, "PlanarConfiguration")));
        assert_eq!(fields.len(), tags.len());
    }
}
