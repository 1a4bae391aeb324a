//! In-memory container: directories held as field maps plus already-decoded
//! strip and tile bytes.
//!
//! Useful for tests, fuzzing, and callers whose TIFF reader hands out raw
//! strips. Compression fields are recorded but never applied.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::format;
use alloc::vec::Vec;

use crate::container::{ContainerReader, ContainerWriter};
use crate::error::TiffError;
use crate::tag::{FieldValue, Tag};

/// One directory (image) of an in-memory container.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemoryDirectory {
    pub fields: BTreeMap<Tag, FieldValue>,
    pub arrays: BTreeMap<Tag, Vec<Vec<u16>>>,
    pub strips: Vec<Vec<u8>>,
    /// Tiles keyed by their (x, y) origin.
    pub tiles: BTreeMap<(u32, u32), Vec<u8>>,
}

impl MemoryDirectory {
    /// A directory with width and height set.
    pub fn new(width: u32, height: u32) -> Self {
        Self::default()
            .with_field(Tag::IMAGE_WIDTH, width)
            .with_field(Tag::IMAGE_LENGTH, height)
    }

    pub fn with_field(mut self, tag: Tag, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(tag, value.into());
        self
    }

    /// Attach a color map with one table per channel (1 to 3 tables).
    pub fn with_color_map(mut self, tables: Vec<Vec<u16>>) -> Self {
        self.arrays.insert(Tag::COLOR_MAP, tables);
        self
    }

    pub fn with_strip(mut self, bytes: Vec<u8>) -> Self {
        self.strips.push(bytes);
        self
    }

    pub fn with_tile(mut self, x: u32, y: u32, bytes: Vec<u8>) -> Self {
        self.tiles.insert((x, y), bytes);
        self
    }

    pub fn field(&self, tag: Tag) -> Option<&FieldValue> {
        self.fields.get(&tag)
    }

    fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.strips.is_empty() && self.tiles.is_empty()
    }
}

/// Reader over a list of [`MemoryDirectory`].
#[derive(Clone, Debug, Default)]
pub struct MemoryContainer {
    directories: Vec<MemoryDirectory>,
    current: usize,
    unknown_tags: BTreeSet<Tag>,
    strip_reads: usize,
    tile_reads: usize,
}

impl MemoryContainer {
    pub fn new(directories: Vec<MemoryDirectory>) -> Self {
        Self {
            directories,
            ..Self::default()
        }
    }

    /// Report `tag` as having no field descriptor.
    pub fn with_unknown_tag(mut self, tag: Tag) -> Self {
        self.unknown_tags.insert(tag);
        self
    }

    /// Zero-based index of the current directory.
    pub fn current_directory(&self) -> usize {
        self.current
    }

    /// Number of strip reads served so far.
    pub fn strip_reads(&self) -> usize {
        self.strip_reads
    }

    /// Number of tile reads served so far.
    pub fn tile_reads(&self) -> usize {
        self.tile_reads
    }

    fn directory(&self) -> Option<&MemoryDirectory> {
        self.directories.get(self.current)
    }
}

impl ContainerReader for MemoryContainer {
    fn get_field(&self, tag: Tag) -> Option<FieldValue> {
        if self.unknown_tags.contains(&tag) {
            return None;
        }
        self.directory()?.fields.get(&tag).cloned()
    }

    fn get_array_field(&self, tag: Tag) -> Option<Vec<Vec<u16>>> {
        if self.unknown_tags.contains(&tag) {
            return None;
        }
        self.directory()?.arrays.get(&tag).cloned()
    }

    fn has_field_info(&self, tag: Tag) -> bool {
        !self.unknown_tags.contains(&tag)
    }

    fn strip_count(&self) -> u32 {
        self.directory()
            .map_or(0, |d| u32::try_from(d.strips.len()).unwrap_or(u32::MAX))
    }

    fn read_strip(&mut self, index: u32, buf: &mut Vec<u8>) -> Result<usize, TiffError> {
        self.strip_reads += 1;
        let strip = self
            .directory()
            .and_then(|d| d.strips.get(index as usize))
            .ok_or_else(|| TiffError::Container(format!("strip {index} does not exist")))?;
        buf.clear();
        buf.extend_from_slice(strip);
        Ok(buf.len())
    }

    fn read_tile(&mut self, x: u32, y: u32, buf: &mut Vec<u8>) -> Result<usize, TiffError> {
        self.tile_reads += 1;
        let tile = self
            .directory()
            .and_then(|d| d.tiles.get(&(x, y)))
            .ok_or_else(|| TiffError::Container(format!("no tile at ({x}, {y})")))?;
        buf.clear();
        buf.extend_from_slice(tile);
        Ok(buf.len())
    }

    fn advance_directory(&mut self) -> Result<bool, TiffError> {
        if self.current + 1 < self.directories.len() {
            self.current += 1;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

/// Writer that collects directories in memory.
#[derive(Debug, Default)]
pub struct MemoryWriter {
    finished: Vec<MemoryDirectory>,
    pending: MemoryDirectory,
    #[cfg(feature = "std")]
    sink: Option<(MemoryStore, std::path::PathBuf)>,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directories written so far (excluding an unfinished one).
    pub fn directories(&self) -> &[MemoryDirectory] {
        &self.finished
    }

    /// Finish any pending directory and return all of them.
    pub fn finish(mut self) -> Vec<MemoryDirectory> {
        self.flush_pending();
        core::mem::take(&mut self.finished)
    }

    /// Finish and reopen the result for reading.
    pub fn into_reader(self) -> MemoryContainer {
        MemoryContainer::new(self.finish())
    }

    fn flush_pending(&mut self) {
        if !self.pending.is_empty() {
            self.finished.push(core::mem::take(&mut self.pending));
        }
    }
}

impl ContainerWriter for MemoryWriter {
    fn set_field(&mut self, tag: Tag, value: FieldValue) -> Result<(), TiffError> {
        self.pending.fields.insert(tag, value);
        Ok(())
    }

    fn write_encoded_strip(&mut self, bytes: &[u8]) -> Result<(), TiffError> {
        self.pending.strips.push(bytes.to_vec());
        Ok(())
    }

    fn write_directory(&mut self) -> Result<(), TiffError> {
        self.flush_pending();
        Ok(())
    }

    fn close(mut self) -> Result<(), TiffError> {
        self.flush_pending();
        #[cfg(feature = "std")]
        if let Some((store, path)) = self.sink.take() {
            store.insert(path, core::mem::take(&mut self.finished));
        }
        Ok(())
    }
}

/// A path-addressed set of in-memory containers, implementing
/// [`crate::ContainerOpener`].
#[cfg(feature = "std")]
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    files: std::rc::Rc<core::cell::RefCell<BTreeMap<std::path::PathBuf, Vec<MemoryDirectory>>>>,
}

#[cfg(feature = "std")]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: impl Into<std::path::PathBuf>, directories: Vec<MemoryDirectory>) {
        self.files.borrow_mut().insert(path.into(), directories);
    }

    pub fn get(&self, path: &std::path::Path) -> Option<Vec<MemoryDirectory>> {
        self.files.borrow().get(path).cloned()
    }
}

#[cfg(feature = "std")]
impl crate::container::ContainerOpener for MemoryStore {
    type Reader = MemoryContainer;
    type Writer = MemoryWriter;

    fn open_read(&self, path: &std::path::Path) -> std::io::Result<MemoryContainer> {
        self.get(path).map(MemoryContainer::new).ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such in-memory container")
        })
    }

    fn open_write(&self, path: &std::path::Path) -> std::io::Result<MemoryWriter> {
        Ok(MemoryWriter {
            sink: Some((self.clone(), path.to_path_buf())),
            ..MemoryWriter::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    #[test]
    fn reader_walks_directories() {
        let mut c = MemoryContainer::new(vec![
            MemoryDirectory::new(1, 1).with_strip(vec![7]),
            MemoryDirectory::new(2, 1).with_strip(vec![8, 9]),
        ]);
        let mut buf = Vec::new();
        assert_eq!(c.strip_count(), 1);
        assert_eq!(c.read_strip(0, &mut buf).unwrap(), 1);
        assert_eq!(buf, [7]);
        assert!(c.advance_directory().unwrap());
        assert_eq!(c.get_field(Tag::IMAGE_WIDTH), Some(FieldValue::Int(2)));
        assert_eq!(c.read_strip(0, &mut buf).unwrap(), 2);
        assert!(!c.advance_directory().unwrap());
        assert!(c.read_strip(5, &mut buf).is_err());
        assert_eq!(c.strip_reads(), 3);
    }

    #[test]
    fn writer_splits_directories() {
        let mut w = MemoryWriter::new();
        w.set_field(Tag::IMAGE_WIDTH, FieldValue::Int(1)).unwrap();
        w.write_encoded_strip(&[1]).unwrap();
        w.write_directory().unwrap();
        w.set_field(Tag::IMAGE_WIDTH, FieldValue::Int(2)).unwrap();
        w.write_encoded_strip(&[2, 3]).unwrap();
        // An empty pending directory is not emitted.
        w.write_directory().unwrap();
        w.write_directory().unwrap();
        let dirs = w.finish();
        assert_eq!(dirs.len(), 2);
        assert_eq!(dirs[1].strips, vec![vec![2, 3]]);
    }

    #[test]
    fn unknown_tags_hide_fields() {
        let c = MemoryContainer::new(vec![
            MemoryDirectory::new(1, 1).with_field(Tag::ARTIST, "someone"),
        ])
        .with_unknown_tag(Tag::ARTIST);
        assert!(!c.has_field_info(Tag::ARTIST));
        assert_eq!(c.get_field(Tag::ARTIST), None);
    }
}
