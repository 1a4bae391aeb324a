//! # zentiff
//!
//! Transcodes TIFF pixel data between strip/tile sample buffers and dense
//! `f64` tensors, in both directions.
//!
//! The TIFF container itself (directory parsing, strip offsets, compression
//! codecs) is supplied by the caller through the [`ContainerReader`] and
//! [`ContainerWriter`] traits. This crate does the layout work: bit depth,
//! sample format, chunky vs. separate planes, palette expansion, tiles vs.
//! strips, and multi-directory sequences.
//!
//! ## Tensor layout
//!
//! A decoded image is a [`Tensor`] of `height × width × planes` values with
//! row varying fastest, then column, then plane:
//! `index(row, col, plane) = plane * width * height + col * height + row`.
//!
//! ## Supported layouts
//!
//! - 8, 16 and 32 bits per sample; unsigned integer and IEEE float.
//!   Signed integers are read as unsigned bit patterns (with a logged
//!   [`Advisory`]).
//! - Chunky and separate planar configurations in strips.
//! - Chunky tiles, clipped at the image edges.
//! - Single-sample color-mapped images, expanded to 1–3 planes.
//!
//! ## Non-Goals
//!
//! - Parsing or writing TIFF bytes, or any compression codec
//! - 1/2/4/12/24-bit samples
//! - Separate-planar tiles, color-mapped tiles
//!
//! ## Usage
//!
//! ```
//! use zentiff::{BitDepth, DecodeRequest, EncodeRequest, MemoryWriter, Tensor, Unstoppable};
//!
//! let tensor = Tensor::from_fn(3, 4, 2, |row, col, plane| f64::from(row + col * 3 + u32::from(plane) * 12))?;
//!
//! let mut writer = MemoryWriter::new();
//! EncodeRequest::new(BitDepth::Sixteen).encode(&mut writer, &[tensor.clone()], Unstoppable)?;
//!
//! let mut reader = writer.into_reader();
//! let decoded = DecodeRequest::new(&mut reader).decode(Unstoppable)?;
//! assert_eq!(decoded[0].tensor(), &tensor);
//! # Ok::<(), zentiff::TiffError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

mod container;
mod decode;
mod encode;
mod error;
#[cfg(feature = "std")]
mod file;
mod layout;
mod limits;
pub mod memory;
pub mod metadata;
mod palette;
mod sample;
mod tag;
mod tensor;

// Re-exports
#[cfg(feature = "std")]
pub use container::ContainerOpener;
pub use container::{ContainerReader, ContainerWriter};
pub use decode::{DecodeOutput, DecodeRequest, count_directories};
pub use encode::{EncodeOutput, EncodeRequest, EncodeTags, pack};
pub use enough::{Stop, Unstoppable};
pub use error::{Advisory, TiffError};
#[cfg(feature = "std")]
pub use file::{count_path, read_metadata_path, read_path, write_path};
pub use layout::{BitDepth, Described, ImageLayout, PlanarConfig, SampleFormat};
pub use limits::Limits;
pub use memory::{MemoryContainer, MemoryDirectory, MemoryWriter};
#[cfg(feature = "std")]
pub use memory::MemoryStore;
pub use metadata::{Metadata, TagValue, read_metadata};
pub use palette::{Palette, effective_samples, table_len};
pub use tag::{Compression, FieldValue, Tag};
pub use tensor::{FLOAT_MAX, Tensor, dims, split_frames};
