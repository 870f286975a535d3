//! Decoders that turn the raw bytes of an input file into a [`PixelGrid`].
//!
//! [`ImageCodec`] handles ordinary raster files through the `image` crate.
//! [`ArchiveCodec`] reads grids that were decoded ahead of time and stored
//! with `rkyv` by `bgrdump-process`.

use crate::{GridError, Pixel, PixelGrid};
use image::{GenericImageView, Pixel as _};
use rkyv::util::AlignedVec;

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("image decode failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("invalid pixel archive: {0}")]
    Archive(#[from] rkyv::rancor::Error),

    #[error(transparent)]
    Grid(#[from] GridError),
}

pub trait Decode {
    fn decode(&self, bytes: &[u8]) -> Result<PixelGrid, DecodeError>;
}

/// Decodes any format the `image` crate recognises. Alpha is dropped.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageCodec;

impl Decode for ImageCodec {
    fn decode(&self, bytes: &[u8]) -> Result<PixelGrid, DecodeError> {
        let image = image::load_from_memory(bytes)?;
        let (width, height) = image.dimensions();
        debug!(width, height, color = ?image.color(), "decoded image");

        Ok(PixelGrid::from_fn(width, height, |x, y| {
            let [r, g, b] = image.get_pixel(x, y).to_rgb().0;
            Pixel { r, g, b }
        }))
    }
}

/// Reads a validated `rkyv` archive of a [`PixelGrid`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ArchiveCodec;

impl Decode for ArchiveCodec {
    fn decode(&self, bytes: &[u8]) -> Result<PixelGrid, DecodeError> {
        // validation rejects a root that is not suitably aligned
        let mut aligned: AlignedVec = AlignedVec::with_capacity(bytes.len());
        aligned.extend_from_slice(bytes);

        let grid = rkyv::from_bytes::<PixelGrid, rkyv::rancor::Error>(&aligned)?;
        debug!(width = grid.width(), height = grid.height(), "read pixel archive");

        Ok(grid.validated()?)
    }
}
