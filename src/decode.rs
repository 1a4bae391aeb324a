//! Pixel unpacking: strip and tile sample buffers into a dense tensor.

use alloc::vec::Vec;

use enough::Stop;

use crate::container::ContainerReader;
use crate::error::{Advisory, TiffError};
use crate::layout::{ImageLayout, PlanarConfig};
use crate::limits::Limits;
use crate::metadata::{Metadata, extract};
use crate::palette::Palette;
use crate::sample::SampleKind;
use crate::tensor::Tensor;

/// One decoded directory.
#[derive(Clone, Debug)]
pub struct DecodeOutput {
    tensor: Tensor,
    /// 1-based directory index within the container.
    pub directory: u32,
    pub layout: ImageLayout,
    /// Descriptive tags of the directory the image came from.
    pub metadata: Metadata,
    pub advisories: Vec<Advisory>,
}

impl DecodeOutput {
    pub fn tensor(&self) -> &Tensor {
        &self.tensor
    }

    pub fn into_tensor(self) -> Tensor {
        self.tensor
    }

    pub fn width(&self) -> u32 {
        self.layout.width
    }

    pub fn height(&self) -> u32 {
        self.layout.height
    }

    /// Planes in the tensor (samples per pixel after palette expansion).
    pub fn planes(&self) -> u16 {
        self.layout.out_samples
    }
}

/// Decode request for the directories of one container.
///
/// ```
/// use zentiff::{DecodeRequest, MemoryContainer, MemoryDirectory, Unstoppable};
///
/// let mut container = MemoryContainer::new(vec![
///     MemoryDirectory::new(2, 1).with_strip(vec![10, 20]),
/// ]);
/// let images = DecodeRequest::new(&mut container).decode(Unstoppable)?;
/// assert_eq!(images[0].tensor().as_slice(), &[10.0, 20.0]);
/// # Ok::<(), zentiff::TiffError>(())
/// ```
pub struct DecodeRequest<'a, C: ContainerReader + ?Sized> {
    container: &'a mut C,
    directories: Option<&'a [u32]>,
    limits: Option<&'a Limits>,
}

impl<'a, C: ContainerReader + ?Sized> DecodeRequest<'a, C> {
    /// Decode every directory, starting from the container's current one.
    pub fn new(container: &'a mut C) -> Self {
        Self {
            container,
            directories: None,
            limits: None,
        }
    }

    /// Only decode these 1-based directory indices (strictly ascending).
    pub fn with_directories(mut self, directories: &'a [u32]) -> Self {
        self.directories = Some(directories);
        self
    }

    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Decode the selected directories in storage order.
    ///
    /// Stops without error if the container runs out of directories
    /// before every requested index was reached.
    pub fn decode(self, stop: impl Stop) -> Result<Vec<DecodeOutput>, TiffError> {
        let limits = self.limits;
        for_each_directory(self.container, self.directories, &stop, |c, index, stop| {
            if let Some(limits) = limits {
                limits.check_directory(index)?;
            }
            decode_directory(c, index, limits, stop)
        })
    }
}

/// Visit the selected 1-based directories in storage order, starting from
/// the container's current directory.
pub(crate) fn for_each_directory<C, T>(
    c: &mut C,
    directories: Option<&[u32]>,
    stop: &dyn Stop,
    mut visit: impl FnMut(&mut C, u32, &dyn Stop) -> Result<T, TiffError>,
) -> Result<Vec<T>, TiffError>
where
    C: ContainerReader + ?Sized,
{
    if let Some(dirs) = directories {
        check_directory_list(dirs)?;
    }

    let mut out = Vec::new();
    let mut next_wanted = 0usize;
    let mut index = 1u32;
    loop {
        stop.check()?;
        let selected = match directories {
            None => true,
            Some(dirs) => match dirs.get(next_wanted) {
                None => break,
                Some(&d) if d == index => {
                    next_wanted += 1;
                    true
                }
                Some(_) => false,
            },
        };

        if selected {
            out.push(visit(c, index, stop)?);
        } else {
            log::debug!("skipping directory {index}");
        }

        if directories.is_some_and(|dirs| next_wanted >= dirs.len()) {
            break;
        }
        if !c.advance_directory()? {
            if let Some(dirs) = directories {
                log::debug!(
                    "container has {index} directories; {} requested ones not present",
                    dirs.len() - next_wanted
                );
            }
            break;
        }
        index += 1;
    }
    Ok(out)
}

fn check_directory_list(dirs: &[u32]) -> Result<(), TiffError> {
    let mut prev = 0u32;
    for &d in dirs {
        if d <= prev {
            return Err(TiffError::InvalidDirectory(d));
        }
        prev = d;
    }
    Ok(())
}

/// Decode the container's current directory.
pub(crate) fn decode_directory<C: ContainerReader + ?Sized>(
    c: &mut C,
    directory: u32,
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<DecodeOutput, TiffError> {
    let described = ImageLayout::describe(&*c)?;
    let layout = described.layout;
    if let Some(limits) = limits {
        limits.check_layout(&layout)?;
    }
    stop.check()?;

    let mut tensor = Tensor::zeros(layout.height, layout.width, layout.out_samples)?;
    if !tensor.as_slice().is_empty() {
        let out = tensor.as_mut_slice();
        match layout.tiles {
            None => unpack_strips(c, &layout, described.palette.as_ref(), out, stop)?,
            Some(tile) => unpack_tiles(c, &layout, tile, out, stop)?,
        }
    }

    Ok(DecodeOutput {
        tensor,
        directory,
        layout,
        metadata: extract(&*c),
        advisories: described.advisories,
    })
}

/// How one sample group maps onto tensor planes.
#[derive(Clone, Copy)]
enum GroupMode<'p> {
    /// One palette index expanded through every present table.
    Indexed(&'p Palette),
    /// One sample, written at the given offset (single plane, or the
    /// current plane of a separate-planar scan).
    Single,
    /// `samples_per_pixel` interleaved samples, one per plane.
    Interleaved,
}

struct Unpacker<'p> {
    mode: GroupMode<'p>,
    kind: SampleKind,
    /// Bytes consumed per sample group.
    step: usize,
    /// `width * height`.
    plane_len: usize,
}

impl<'p> Unpacker<'p> {
    fn new(layout: &ImageLayout, palette: Option<&'p Palette>) -> Self {
        let kind = layout.sample_kind();
        let spp = usize::from(layout.samples_per_pixel);
        let (mode, step) = match palette {
            Some(p) if spp == 1 => (GroupMode::Indexed(p), kind.as_index().bytes()),
            _ if spp > 1 && layout.planar == PlanarConfig::Chunky => {
                (GroupMode::Interleaved, spp * kind.bytes())
            }
            _ => (GroupMode::Single, kind.bytes()),
        };
        Self {
            mode,
            kind,
            step,
            plane_len: layout.width as usize * layout.height as usize,
        }
    }

    /// Write one group whose first-plane tensor offset is `at`.
    #[inline]
    fn write(&self, group: &[u8], at: usize, out: &mut [f64]) -> Result<(), TiffError> {
        match self.mode {
            GroupMode::Indexed(palette) => {
                let mut values = [0.0; 3];
                palette.lookup(self.kind.read_index(group), &mut values)?;
                for (k, v) in values.iter().take(palette.channels()).enumerate() {
                    out[k * self.plane_len + at] = *v;
                }
            }
            GroupMode::Single => out[at] = self.kind.read(group),
            GroupMode::Interleaved => {
                for (k, sample) in group.chunks_exact(self.kind.bytes()).enumerate() {
                    out[k * self.plane_len + at] = self.kind.read(sample);
                }
            }
        }
        Ok(())
    }
}

/// Strips are consecutive slices of one raster scan; the cursor runs across
/// strip boundaries. With separate planar config the scan repeats once per
/// plane.
fn unpack_strips<C: ContainerReader + ?Sized>(
    c: &mut C,
    layout: &ImageLayout,
    palette: Option<&Palette>,
    out: &mut [f64],
    stop: &dyn Stop,
) -> Result<(), TiffError> {
    let unpacker = Unpacker::new(layout, palette);
    let separate = layout.samples_per_pixel > 1 && layout.planar == PlanarConfig::Separate;
    let w = layout.width as usize;
    let h = layout.height as usize;

    let mut buf = Vec::new();
    let (mut x, mut y, mut plane_offset) = (0usize, 0usize, 0usize);
    let strips = c.strip_count();
    log::trace!("{strips} strips");
    for strip in 0..strips {
        if strip % 16 == 0 {
            stop.check()?;
        }
        let n = c.read_strip(strip, &mut buf)?.min(buf.len());
        log::trace!("strip {strip}: {n} bytes");
        for group in buf[..n].chunks_exact(unpacker.step) {
            if y >= h || plane_offset >= out.len() {
                log::debug!("ignoring sample data past the end of the image");
                return Ok(());
            }
            unpacker.write(group, plane_offset + x * h + y, out)?;
            x += 1;
            if x >= w {
                x -= w;
                y += 1;
                if separate && y >= h {
                    y -= h;
                    plane_offset += unpacker.plane_len;
                }
            }
        }
    }
    Ok(())
}

/// Tiles are decoded with a tile-local cursor; samples falling in the edge
/// padding beyond the image are dropped.
fn unpack_tiles<C: ContainerReader + ?Sized>(
    c: &mut C,
    layout: &ImageLayout,
    (tile_width, tile_height): (u32, u32),
    out: &mut [f64],
    stop: &dyn Stop,
) -> Result<(), TiffError> {
    let unpacker = Unpacker::new(layout, None);
    let h = layout.height as usize;
    let tw = tile_width as usize;
    let th = tile_height as usize;

    let mut buf = Vec::new();
    for tile_y in (0..layout.height).step_by(th) {
        for tile_x in (0..layout.width).step_by(tw) {
            stop.check()?;
            let n = c.read_tile(tile_x, tile_y, &mut buf)?.min(buf.len());
            log::trace!("tile ({tile_x}, {tile_y}): {n} bytes");
            let (mut xoff, mut yoff) = (0usize, 0usize);
            for group in buf[..n].chunks_exact(unpacker.step) {
                if yoff >= th {
                    break;
                }
                let col = tile_x as usize + xoff;
                let row = tile_y as usize + yoff;
                if col < layout.width as usize && row < h {
                    unpacker.write(group, col * h + row, out)?;
                }
                xoff += 1;
                if xoff >= tw {
                    xoff = 0;
                    yoff += 1;
                }
            }
        }
    }
    Ok(())
}

/// Count the directories remaining in the container, starting at (and
/// including) the current one. Leaves the container at its last directory.
pub fn count_directories<C: ContainerReader + ?Sized>(c: &mut C) -> Result<u32, TiffError> {
    let mut n = 1;
    while c.advance_directory()? {
        n += 1;
    }
    Ok(n)
}
