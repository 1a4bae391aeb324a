//! Color map (palette) resolution.

use alloc::vec::Vec;

use crate::error::TiffError;

/// Expected table length for `bits_per_sample`: `2^bits`.
///
/// Saturates for depths beyond the platform's address width.
pub fn table_len(bits_per_sample: u16) -> usize {
    1usize.checked_shl(u32::from(bits_per_sample)).unwrap_or(usize::MAX)
}

/// Up to three parallel 16-bit lookup tables (red, green, blue).
///
/// Belongs to a single directory's decode pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    red: Vec<u16>,
    green: Option<Vec<u16>>,
    blue: Option<Vec<u16>>,
}

impl Palette {
    /// Build from the color map tables in channel order.
    ///
    /// Returns `None` when no red table is present. A blue table without a
    /// green one is ignored, as the channels are positional.
    pub fn from_tables(tables: Vec<Vec<u16>>) -> Option<Self> {
        let mut it = tables.into_iter();
        let red = it.next()?;
        let green = it.next();
        let blue = if green.is_some() { it.next() } else { None };
        Some(Self { red, green, blue })
    }

    pub fn red(&self) -> &[u16] {
        &self.red
    }

    pub fn green(&self) -> Option<&[u16]> {
        self.green.as_deref()
    }

    pub fn blue(&self) -> Option<&[u16]> {
        self.blue.as_deref()
    }

    /// Number of output channels the palette expands to (1, 2 or 3).
    pub fn channels(&self) -> usize {
        if self.blue.is_some() {
            3
        } else if self.green.is_some() {
            2
        } else {
            1
        }
    }

    /// Tables in channel order.
    pub fn tables(&self) -> impl Iterator<Item = &[u16]> {
        core::iter::once(self.red.as_slice())
            .chain(self.green.as_deref())
            .chain(self.blue.as_deref())
    }

    /// Look up `index` in every present table.
    pub(crate) fn lookup(&self, index: u32, out: &mut [f64; 3]) -> Result<(), TiffError> {
        for (slot, table) in out.iter_mut().zip(self.tables()) {
            let value = table
                .get(index as usize)
                .ok_or(TiffError::PaletteIndexOutOfRange {
                    index,
                    len: table.len(),
                })?;
            *slot = f64::from(*value);
        }
        Ok(())
    }
}

/// Output samples per pixel after palette expansion.
///
/// Only single-sample images are expanded.
pub fn effective_samples(samples_per_pixel: u16, palette: Option<&Palette>) -> u16 {
    match palette {
        Some(p) if samples_per_pixel == 1 => p.channels() as u16,
        _ => samples_per_pixel,
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    #[test]
    fn table_lengths() {
        assert_eq!(table_len(8), 256);
        assert_eq!(table_len(16), 65536);
        assert_eq!(table_len(1), 2);
    }

    #[test]
    fn effective_sample_counts() {
        let red = Palette::from_tables(vec![vec![0; 4]]).unwrap();
        let rg = Palette::from_tables(vec![vec![0; 4], vec![0; 4]]).unwrap();
        let rgb = Palette::from_tables(vec![vec![0; 4], vec![0; 4], vec![0; 4]]).unwrap();
        assert_eq!(effective_samples(1, Some(&red)), 1);
        assert_eq!(effective_samples(1, Some(&rg)), 2);
        assert_eq!(effective_samples(1, Some(&rgb)), 3);
        assert_eq!(effective_samples(3, Some(&rg)), 3);
        assert_eq!(effective_samples(1, None), 1);
        assert!(Palette::from_tables(vec![]).is_none());
    }

    #[test]
    fn lookup_reads_each_table() {
        let p = Palette::from_tables(vec![vec![10, 11], vec![20, 21], vec![30, 31]]).unwrap();
        let mut out = [0.0; 3];
        p.lookup(1, &mut out).unwrap();
        assert_eq!(out, [11.0, 21.0, 31.0]);
        assert!(matches!(
            p.lookup(2, &mut out),
            Err(TiffError::PaletteIndexOutOfRange { index: 2, len: 2 })
        ));
    }
}
