//! The container collaborator contract.
//!
//! `zentiff` does not parse TIFF bytes or run compression codecs. A
//! container implementation (libtiff bindings, a pure-Rust TIFF reader, or
//! the in-memory [`crate::memory`] store) supplies directory fields and
//! decoded strip/tile bytes through these traits.
//!
//! Strip and tile bytes are exchanged decompressed and in native byte order.

use alloc::vec::Vec;

use crate::error::TiffError;
use crate::tag::{FieldValue, Tag};

/// Read access to a container positioned at one directory.
pub trait ContainerReader {
    /// Scalar field of the current directory, `None` if absent.
    fn get_field(&self, tag: Tag) -> Option<FieldValue>;

    /// Array field of the current directory as per-channel u16 tables.
    ///
    /// Used for the color map: one table each for red, green and blue, any
    /// trailing ones possibly missing.
    fn get_array_field(&self, tag: Tag) -> Option<Vec<Vec<u16>>>;

    /// Whether the container knows a field descriptor for `tag`.
    fn has_field_info(&self, _tag: Tag) -> bool {
        true
    }

    /// Number of strips in the current directory.
    fn strip_count(&self) -> u32;

    /// Decode strip `index` into `buf`, replacing its contents.
    ///
    /// Returns the number of valid bytes.
    fn read_strip(&mut self, index: u32, buf: &mut Vec<u8>) -> Result<usize, TiffError>;

    /// Decode the tile whose origin is `(x, y)` into `buf`, replacing its
    /// contents. Edge tiles are padded to the full tile size.
    fn read_tile(&mut self, x: u32, y: u32, buf: &mut Vec<u8>) -> Result<usize, TiffError>;

    /// Move to the next directory. `Ok(false)` when there are no more.
    fn advance_directory(&mut self) -> Result<bool, TiffError>;
}

/// Write access to a container being built directory by directory.
pub trait ContainerWriter {
    fn set_field(&mut self, tag: Tag, value: FieldValue) -> Result<(), TiffError>;

    /// Append one encoded strip to the current directory. The container
    /// compresses it according to the compression field.
    fn write_encoded_strip(&mut self, bytes: &[u8]) -> Result<(), TiffError>;

    /// Finish the current directory and start a new one.
    fn write_directory(&mut self) -> Result<(), TiffError>;

    /// Flush and release the container.
    fn close(self) -> Result<(), TiffError>
    where
        Self: Sized;
}

/// Opens containers by path.
#[cfg(feature = "std")]
pub trait ContainerOpener {
    type Reader: ContainerReader;
    type Writer: ContainerWriter;

    fn open_read(&self, path: &std::path::Path) -> std::io::Result<Self::Reader>;

    fn open_write(&self, path: &std::path::Path) -> std::io::Result<Self::Writer>;
}

impl<C: ContainerReader + ?Sized> ContainerReader for &mut C {
    fn get_field(&self, tag: Tag) -> Option<FieldValue> {
        (**self).get_field(tag)
    }

    fn get_array_field(&self, tag: Tag) -> Option<Vec<Vec<u16>>> {
        (**self).get_array_field(tag)
    }

    fn has_field_info(&self, tag: Tag) -> bool {
        (**self).has_field_info(tag)
    }

    fn strip_count(&self) -> u32 {
        (**self).strip_count()
    }

    fn read_strip(&mut self, index: u32, buf: &mut Vec<u8>) -> Result<usize, TiffError> {
        (**self).read_strip(index, buf)
    }

    fn read_tile(&mut self, x: u32, y: u32, buf: &mut Vec<u8>) -> Result<usize, TiffError> {
        (**self).read_tile(x, y, buf)
    }

    fn advance_directory(&mut self) -> Result<bool, TiffError> {
        (**self).advance_directory()
    }
}

/// Read a scalar field as u16, falling back to `default`.
pub(crate) fn field_u16<C: ContainerReader + ?Sized>(c: &C, tag: Tag, default: u16) -> u16 {
    c.get_field(tag).and_then(|v| v.as_u16()).unwrap_or(default)
}

/// Read a scalar field as u32, falling back to `default`.
pub(crate) fn field_u32<C: ContainerReader + ?Sized>(c: &C, tag: Tag, default: u32) -> u32 {
    c.get_field(tag).and_then(|v| v.as_u32()).unwrap_or(default)
}
