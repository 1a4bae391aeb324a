//! Path-based entry points over a [`ContainerOpener`].
//!
//! The opened container is dropped, and so released, before any error
//! propagates.

use std::path::Path;

use enough::Stop;

use crate::container::{ContainerOpener, ContainerWriter};
use crate::decode::{DecodeOutput, DecodeRequest, count_directories};
use crate::encode::{EncodeOutput, EncodeRequest};
use crate::error::TiffError;
use crate::limits::Limits;
use crate::metadata::{Metadata, read_metadata};
use crate::tensor::Tensor;

fn io_error(path: &Path, source: std::io::Error) -> TiffError {
    TiffError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Decode the selected 1-based directories of the file at `path` (all of
/// them when `directories` is `None`).
pub fn read_path<O: ContainerOpener>(
    opener: &O,
    path: impl AsRef<Path>,
    directories: Option<&[u32]>,
    limits: Option<&Limits>,
    stop: impl Stop,
) -> Result<Vec<DecodeOutput>, TiffError> {
    let path = path.as_ref();
    let mut reader = opener.open_read(path).map_err(|e| io_error(path, e))?;
    let mut request = DecodeRequest::new(&mut reader);
    if let Some(dirs) = directories {
        request = request.with_directories(dirs);
    }
    if let Some(limits) = limits {
        request = request.with_limits(limits);
    }
    request.decode(stop)
}

/// Encode `tensors` into a new file at `path`, one directory each.
///
/// Nothing is created when `tensors` is empty.
pub fn write_path<O: ContainerOpener>(
    opener: &O,
    path: impl AsRef<Path>,
    request: &EncodeRequest,
    tensors: &[Tensor],
    stop: impl Stop,
) -> Result<EncodeOutput, TiffError> {
    let path = path.as_ref();
    if tensors.is_empty() {
        return Ok(EncodeOutput::empty_sequence());
    }
    request.sample_kind()?;
    let mut writer = opener.open_write(path).map_err(|e| io_error(path, e))?;
    let out = request.encode(&mut writer, tensors, stop)?;
    writer.close()?;
    Ok(out)
}

/// Number of directories in the file at `path`.
pub fn count_path<O: ContainerOpener>(opener: &O, path: impl AsRef<Path>) -> Result<u32, TiffError> {
    let path = path.as_ref();
    let mut reader = opener.open_read(path).map_err(|e| io_error(path, e))?;
    count_directories(&mut reader)
}

/// Extract metadata of the selected directories of the file at `path`.
pub fn read_metadata_path<O: ContainerOpener>(
    opener: &O,
    path: impl AsRef<Path>,
    directories: Option<&[u32]>,
    stop: impl Stop,
) -> Result<Vec<Metadata>, TiffError> {
    let path = path.as_ref();
    let mut reader = opener.open_read(path).map_err(|e| io_error(path, e))?;
    read_metadata(&mut reader, directories, stop)
}
