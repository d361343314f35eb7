//! Tile records: identifier, original pixels and precomputed average color
//!
//! A tile is immutable once built. Its average color is taken from the
//! original (un-resized) pixels, so it does not depend on any cell size the
//! tile is later resized to.

use std::path::Path;

use image::RgbImage;
use ndarray::Array3;

use crate::analysis::patterns::{decode_rgb, resize_nearest, rgb_image_to_array};
use crate::io::error::{MosaicError, Result, invalid_parameter};
use crate::math::color::{CHANNELS, Color, RgbBuffer, mean_color};
use crate::spatial::grid::CellSize;

/// A source image that can be placed into mosaic cells
#[derive(Debug, Clone)]
pub struct Tile {
    id: String,
    pixels: RgbBuffer,
    average_color: Color,
}

impl Tile {
    /// Build a tile from an (height, width, 3) buffer
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer is empty or does not have three channels
    pub fn new(id: impl Into<String>, pixels: RgbBuffer) -> Result<Self> {
        let (height, width, channels) = pixels.dim();
        if height == 0 || width == 0 {
            return Err(MosaicError::EmptyImage { height, width });
        }
        if channels != CHANNELS {
            return Err(invalid_parameter(
                "pixels",
                &format!("{:?}", pixels.shape()),
                &"expected three color channels",
            ));
        }

        let average_color = mean_color(&pixels.view()).ok_or_else(|| MosaicError::EmptyImage {
            height,
            width,
        })?;

        Ok(Self {
            id: id.into(),
            pixels,
            average_color,
        })
    }

    /// Build a tile from a decoded RGB image
    ///
    /// # Errors
    ///
    /// Returns an error if the image is empty
    pub fn from_rgb_image(id: impl Into<String>, image: RgbImage) -> Result<Self> {
        Self::new(id, rgb_image_to_array(image)?)
    }

    /// Decode a tile from an image file, identified by its file name
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be decoded or holds an empty image
    pub fn from_path(path: &Path) -> Result<Self> {
        let id = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        Self::from_rgb_image(id, decode_rgb(path)?)
    }

    /// Tile filled with a single color
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is zero
    pub fn solid(
        id: impl Into<String>,
        height: usize,
        width: usize,
        rgb: [u8; CHANNELS],
    ) -> Result<Self> {
        let pixels = Array3::from_shape_fn((height, width, CHANNELS), |(_, _, c)| {
            rgb.get(c).copied().unwrap_or(0)
        });
        Self::new(id, pixels)
    }

    /// Stable identifier (the file name for tiles loaded from disk)
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Original pixels as loaded
    pub const fn pixels(&self) -> &RgbBuffer {
        &self.pixels
    }

    /// Per-channel mean of the original pixels
    pub const fn average_color(&self) -> Color {
        self.average_color
    }

    /// Original dimensions (height, width)
    pub fn dimensions(&self) -> (usize, usize) {
        let (height, width, _) = self.pixels.dim();
        (height, width)
    }

    /// Nearest-neighbour resample of the original pixels to one cell
    ///
    /// # Errors
    ///
    /// Returns an error if a cell dimension does not fit in `u32`
    pub fn resized(&self, size: CellSize) -> Result<RgbBuffer> {
        resize_nearest(&self.pixels.view(), size.height, size.width)
    }
}
