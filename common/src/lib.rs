#[macro_use]
extern crate tracing;

use itertools::iproduct;
use rkyv::{Archive, Deserialize, Serialize};
use std::fmt;

pub mod codec;
pub mod format;

pub use codec::{ArchiveCodec, Decode, DecodeError, ImageCodec};
pub use format::write_lines;

/// Side length of the region printed when none is requested.
pub const DEFAULT_EXTENT: u32 = 32;

#[derive(Archive, Clone, Copy, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

#[derive(Archive, Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
pub struct PixelGrid {
    // layout: X(Y(pixel))
    columns: Vec<Vec<Pixel>>,
}

/// Width and height of a rectangle anchored at `(0, 0)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    pub width: u32,
    pub height: u32,
}

/// What to do when the requested region is larger than the image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Bounds {
    /// Refuse to print anything.
    #[default]
    Strict,
    /// Print only the part of the region the image covers.
    Clamp,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// The image is narrower or shorter than the requested region.
    #[error("region {requested} does not fit in a {actual} image")]
    RegionOutOfBounds { requested: Region, actual: Region },

    /// Columns of a grid must all have the same height.
    #[error("column {column} holds {found} pixels, expected {expected}")]
    RaggedColumn {
        column: usize,
        expected: usize,
        found: usize,
    },
}

impl Region {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub const fn square(extent: u32) -> Self {
        Self::new(extent, extent)
    }

    pub fn area(self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Every coordinate in the region, x outer and y inner.
    pub fn coords(self) -> impl Iterator<Item = (u32, u32)> {
        iproduct!(0..self.width, 0..self.height)
    }

    fn fits_in(self, other: Region) -> bool {
        self.width <= other.width && self.height <= other.height
    }

    fn intersect(self, other: Region) -> Region {
        Region::new(self.width.min(other.width), self.height.min(other.height))
    }
}

impl Default for Region {
    fn default() -> Self {
        Self::square(DEFAULT_EXTENT)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl PixelGrid {
    /// Builds a grid from columns of pixels, rejecting columns of uneven height.
    pub fn from_columns(columns: Vec<Vec<Pixel>>) -> Result<Self, GridError> {
        Self { columns }.validated()
    }

    pub fn from_fn(width: u32, height: u32, mut pixel_at: impl FnMut(u32, u32) -> Pixel) -> Self {
        let columns = (0..width)
            .map(|x| (0..height).map(|y| pixel_at(x, y)).collect())
            .collect();

        Self { columns }
    }

    pub(crate) fn validated(self) -> Result<Self, GridError> {
        let expected = self.columns.first().map_or(0, Vec::len);
        let ragged = self
            .columns
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|(_, found)| *found != expected);

        if let Some((column, found)) = ragged {
            return Err(GridError::RaggedColumn {
                column,
                expected,
                found,
            });
        }

        Ok(self)
    }

    pub fn width(&self) -> u32 {
        self.columns.len() as u32
    }

    pub fn height(&self) -> u32 {
        self.columns.first().map_or(0, |column| column.len() as u32)
    }

    pub fn dimensions(&self) -> Region {
        Region::new(self.width(), self.height())
    }

    pub fn get(&self, x: u32, y: u32) -> Option<&Pixel> {
        self.columns.get(x as usize)?.get(y as usize)
    }

    /// Checks `region` against the grid and returns the window that will be printed.
    pub fn window(&self, region: Region, bounds: Bounds) -> Result<Window<'_>, GridError> {
        let actual = self.dimensions();

        let region = match bounds {
            Bounds::Strict if !region.fits_in(actual) => {
                return Err(GridError::RegionOutOfBounds {
                    requested: region,
                    actual,
                });
            }
            Bounds::Strict => region,
            Bounds::Clamp => {
                let clamped = region.intersect(actual);
                if clamped != region {
                    warn!(%region, %clamped, "image smaller than region, clamping");
                }
                clamped
            }
        };

        Ok(Window { grid: self, region })
    }
}

/// A region that is known to lie inside its grid.
#[derive(Clone, Copy, Debug)]
pub struct Window<'a> {
    grid: &'a PixelGrid,
    region: Region,
}

impl<'a> Window<'a> {
    pub fn region(&self) -> Region {
        self.region
    }

    /// Pixels of the window in output order.
    pub fn pixels(self) -> impl Iterator<Item = &'a Pixel> {
        let grid = self.grid;
        self.region
            .coords()
            .map(move |(x, y)| &grid.columns[x as usize][y as usize])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> PixelGrid {
        PixelGrid::from_fn(width, height, |x, y| Pixel {
            r: x as u8,
            g: y as u8,
            b: 0,
        })
    }

    #[test]
    fn test_from_fn_indexes_by_x_then_y() {
        let grid = gradient(3, 2);
        assert_eq!(grid.dimensions(), Region::new(3, 2));
        assert_eq!(grid.get(2, 1), Some(&Pixel { r: 2, g: 1, b: 0 }));
        assert_eq!(grid.get(3, 0), None);
        assert_eq!(grid.get(0, 2), None);
    }

    #[test]
    fn test_from_columns_rejects_ragged() {
        let pixel = Pixel { r: 0, g: 0, b: 0 };
        let err = PixelGrid::from_columns(vec![vec![pixel; 4], vec![pixel; 4], vec![pixel; 3]])
            .unwrap_err();

        assert_eq!(
            err,
            GridError::RaggedColumn {
                column: 2,
                expected: 4,
                found: 3
            }
        );
    }

    #[test]
    fn test_empty_grid() {
        let grid = PixelGrid::from_columns(Vec::new()).unwrap();
        assert_eq!(grid.dimensions(), Region::new(0, 0));
        assert_eq!(grid.window(Region::default(), Bounds::Clamp).unwrap().pixels().count(), 0);
    }

    #[test]
    fn test_coords_order() {
        let coords: Vec<_> = Region::default().coords().collect();
        assert_eq!(coords.len(), 1024);
        assert_eq!(coords[0], (0, 0));
        assert_eq!(coords[1], (0, 1));
        assert_eq!(coords[31], (0, 31));
        assert_eq!(coords[32], (1, 0));
        assert_eq!(coords[1023], (31, 31));
    }

    #[test]
    fn test_strict_window_rejects_undersized() {
        let grid = gradient(31, 32);
        let err = grid.window(Region::default(), Bounds::Strict).unwrap_err();

        assert_eq!(
            err,
            GridError::RegionOutOfBounds {
                requested: Region::square(32),
                actual: Region::new(31, 32),
            }
        );
        assert_eq!(err.to_string(), "region 32x32 does not fit in a 31x32 image");
    }

    #[test]
    fn test_strict_window_accepts_oversized() {
        let grid = gradient(40, 50);
        let window = grid.window(Region::default(), Bounds::Strict).unwrap();
        assert_eq!(window.region(), Region::square(32));
        assert_eq!(window.pixels().count(), 1024);
    }

    #[test]
    fn test_clamp_window_shrinks() {
        let grid = gradient(20, 10);
        let window = grid.window(Region::default(), Bounds::Clamp).unwrap();
        assert_eq!(window.region(), Region::new(20, 10));

        let pixels: Vec<_> = window.pixels().collect();
        assert_eq!(pixels.len(), 200);
        assert_eq!(*pixels[10], Pixel { r: 1, g: 0, b: 0 });
        assert_eq!(*pixels[199], Pixel { r: 19, g: 9, b: 0 });
    }
}
