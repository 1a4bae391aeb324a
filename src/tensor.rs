//! Dense f64 image tensor and helpers around its addressing convention.

use alloc::vec::Vec;

use crate::error::TiffError;

/// Largest finite value representable in 32-bit float output.
pub const FLOAT_MAX: f64 = f32::MAX as f64;

/// A `height × width × planes` array of f64 in plane-major, column-major
/// order: row varies fastest, then column, then plane.
///
/// `index(row, col, plane) = plane * width * height + col * height + row`.
#[derive(Clone, Debug, PartialEq)]
pub struct Tensor {
    height: u32,
    width: u32,
    planes: u16,
    data: Vec<f64>,
}

/// Value count of a shape whose f64 buffer fits in `isize::MAX` bytes.
fn shape_len(height: u32, width: u32, planes: u16) -> Result<usize, TiffError> {
    (height as usize)
        .checked_mul(width as usize)
        .and_then(|n| n.checked_mul(usize::from(planes)))
        .filter(|n| {
            n.checked_mul(core::mem::size_of::<f64>())
                .is_some_and(|bytes| bytes <= isize::MAX as usize)
        })
        .ok_or(TiffError::DimensionsTooLarge { width, height })
}

impl Tensor {
    /// Zero-filled tensor.
    pub fn zeros(height: u32, width: u32, planes: u16) -> Result<Self, TiffError> {
        let len = shape_len(height, width, planes)?;
        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| TiffError::DimensionsTooLarge { width, height })?;
        data.resize(len, 0.0);
        Ok(Self {
            height,
            width,
            planes,
            data,
        })
    }

    /// Wrap existing values, which must already follow the addressing
    /// convention.
    pub fn from_vec(height: u32, width: u32, planes: u16, data: Vec<f64>) -> Result<Self, TiffError> {
        let expected = shape_len(height, width, planes)?;
        if data.len() != expected {
            return Err(TiffError::ShapeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            height,
            width,
            planes,
            data,
        })
    }

    /// Build from a function of `(row, col, plane)`.
    pub fn from_fn(
        height: u32,
        width: u32,
        planes: u16,
        mut f: impl FnMut(u32, u32, u16) -> f64,
    ) -> Result<Self, TiffError> {
        let mut t = Self::zeros(height, width, planes)?;
        for plane in 0..planes {
            for col in 0..width {
                for row in 0..height {
                    let i = t.index(row, col, plane);
                    t.data[i] = f(row, col, plane);
                }
            }
        }
        Ok(t)
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn planes(&self) -> u16 {
        self.planes
    }

    /// `(height, width, planes)`.
    pub fn dims(&self) -> (u32, u32, u16) {
        (self.height, self.width, self.planes)
    }

    /// Flat offset of `(row, col, plane)`.
    #[inline]
    pub fn index(&self, row: u32, col: u32, plane: u16) -> usize {
        let h = self.height as usize;
        usize::from(plane) * (self.width as usize * h) + col as usize * h + row as usize
    }

    pub fn get(&self, row: u32, col: u32, plane: u16) -> f64 {
        self.data[self.index(row, col, plane)]
    }

    pub fn set(&mut self, row: u32, col: u32, plane: u16, value: f64) {
        let i = self.index(row, col, plane);
        self.data[i] = value;
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Split into one single-plane tensor per plane.
    pub fn split_planes(&self) -> Vec<Tensor> {
        let plane_len = self.height as usize * self.width as usize;
        if plane_len == 0 {
            return (0..self.planes)
                .map(|_| Tensor {
                    height: self.height,
                    width: self.width,
                    planes: 1,
                    data: Vec::new(),
                })
                .collect();
        }
        self.data
            .chunks_exact(plane_len)
            .map(|chunk| Tensor {
                height: self.height,
                width: self.width,
                planes: 1,
                data: chunk.to_vec(),
            })
            .collect()
    }

    /// For a 3-plane tensor, find each pixel's row in `palette` whose
    /// (red, green, blue) equals the pixel exactly.
    ///
    /// The result is a `height × width` matrix in the same column-major
    /// order as a single tensor plane. Pixels with no matching row are `None`.
    pub fn match_to_palette(&self, palette: &[[u16; 3]]) -> Result<Vec<Option<usize>>, TiffError> {
        if self.planes != 3 {
            return Err(TiffError::UnsupportedVariant(alloc::format!(
                "palette matching needs 3 planes, tensor has {}",
                self.planes
            )));
        }
        let n = self.height as usize * self.width as usize;
        let (r, rest) = self.data.split_at(n);
        let (g, b) = rest.split_at(n);
        Ok((0..n)
            .map(|i| {
                palette.iter().position(|entry| {
                    r[i] == f64::from(entry[0])
                        && g[i] == f64::from(entry[1])
                        && b[i] == f64::from(entry[2])
                })
            })
            .collect())
    }
}

/// Split a 4-d `height × width × planes × frames` array (same ordering,
/// frame slowest) into one tensor per frame.
pub fn split_frames(
    height: u32,
    width: u32,
    planes: u16,
    frames: usize,
    data: &[f64],
) -> Result<Vec<Tensor>, TiffError> {
    let frame_len = shape_len(height, width, planes)?;
    let expected = frame_len
        .checked_mul(frames)
        .ok_or(TiffError::DimensionsTooLarge { width, height })?;
    if data.len() != expected {
        return Err(TiffError::ShapeMismatch {
            expected,
            actual: data.len(),
        });
    }
    Ok((0..frames)
        .map(|j| Tensor {
            height,
            width,
            planes,
            data: data[j * frame_len..(j + 1) * frame_len].to_vec(),
        })
        .collect())
}

/// Shapes of a list of tensors.
pub fn dims(tensors: &[Tensor]) -> Vec<(u32, u32, u16)> {
    tensors.iter().map(Tensor::dims).collect()
}
