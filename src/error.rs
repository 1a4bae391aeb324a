use alloc::string::String;
use enough::StopReason;

/// Errors from TIFF pixel decoding and encoding.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum TiffError {
    /// The container file could not be opened or created.
    #[cfg(feature = "std")]
    #[error("unable to open {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The container collaborator reported a failure (bad strip, codec error, ...).
    #[error("container error: {0}")]
    Container(String),

    #[error("12-bit images are not supported; convert the image to 16-bit")]
    UnsupportedBitDepth12,

    #[error("image has {0} bits/sample which is unsupported (expected 8, 16 or 32)")]
    UnsupportedBitDepth(u16),

    #[error("tiled images with multiple samples per pixel must use contiguous planar config")]
    UnsupportedPlanarTiled,

    #[error("tiled images with a color palette are not supported")]
    UnsupportedPaletteTiled,

    #[error("unsupported format variant: {0}")]
    UnsupportedVariant(String),

    /// Directory indices must be 1-based and strictly ascending.
    #[error("invalid directory index {0}")]
    InvalidDirectory(u32),

    #[error("palette index {index} out of range for table of {len} entries")]
    PaletteIndexOutOfRange { index: u32, len: usize },

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("tensor shape mismatch: expected {expected} values, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("operation cancelled")]
    Cancelled(StopReason),
}

impl From<StopReason> for TiffError {
    fn from(r: StopReason) -> Self {
        TiffError::Cancelled(r)
    }
}

/// Non-fatal conditions noticed while decoding or encoding.
///
/// These are logged through [`log::warn!`] when they occur and also
/// collected on the operation's output so callers can inspect them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Advisory {
    /// Signed integer samples were read as unsigned bit patterns, without
    /// sign extension.
    SignedFormat,
    /// Encode was called with no images; nothing was written.
    EmptySequence,
}

impl core::fmt::Display for Advisory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Advisory::SignedFormat => f.write_str(
                "only unsigned integer or float sample formats are supported; \
                 signed integer samples are read as unsigned bit patterns",
            ),
            Advisory::EmptySequence => f.write_str("empty image list, nothing to do"),
        }
    }
}
