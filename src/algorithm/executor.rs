use std::collections::BTreeSet;

use ndarray::{Array2, Array3, ArrayView3};
use tracing::debug;

use crate::algorithm::assembly::assemble;
use crate::algorithm::cache::TileCache;
use crate::algorithm::matching::match_tiles;
use crate::io::error::Result;
use crate::math::color::RgbBuffer;
use crate::spatial::grid::{GridDescriptor, GridSize, partition_grid};

/// A generated mosaic together with how it was built
#[derive(Debug, Clone)]
pub struct Mosaic {
    /// Output pixels, same shape as the input image
    pub image: RgbBuffer,
    /// Tile index chosen for every cell, shape (rows, cols)
    pub matches: Array2<usize>,
    /// Average color of every input cell, shape (rows, cols, 3)
    pub cell_colors: Array3<f64>,
    /// Grid layout used for partitioning and placement
    pub grid: GridDescriptor,
}

impl Mosaic {
    /// Number of different tiles placed at least once
    pub fn distinct_tiles(&self) -> usize {
        self.matches.iter().collect::<BTreeSet<_>>().len()
    }
}

/// Runs partition, matching and assembly against one borrowed tile cache
///
/// The builder holds no state of its own, so one cache can serve many
/// builders and many images; resized tiles are reused across calls.
#[derive(Debug, Clone, Copy)]
pub struct MosaicBuilder<'a> {
    tile_cache: &'a TileCache,
}

impl<'a> MosaicBuilder<'a> {
    /// Create a builder over a loaded tile cache
    pub const fn new(tile_cache: &'a TileCache) -> Self {
        Self { tile_cache }
    }

    /// The tile cache this builder draws from
    pub const fn tile_cache(&self) -> &'a TileCache {
        self.tile_cache
    }

    /// Build a mosaic of `image` on a rows x cols grid
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The image is empty or the grid does not divide it exactly
    /// - Matching or tile resizing fails
    pub fn create_mosaic(&self, image: &ArrayView3<'_, u8>, grid: GridSize) -> Result<Mosaic> {
        let (cell_colors, descriptor) = partition_grid(image, grid)?;
        debug!(
            rows = descriptor.grid_rows,
            cols = descriptor.grid_cols,
            cell_height = descriptor.cell_height,
            cell_width = descriptor.cell_width,
            "partitioned image"
        );

        let matches = match_tiles(&cell_colors.view(), &self.tile_cache.average_colors())?;
        debug!(
            cells = descriptor.cell_count(),
            tiles = self.tile_cache.len(),
            "matched cells to tiles"
        );

        let output = assemble(
            &matches.view(),
            self.tile_cache,
            descriptor.cell_size(),
            &descriptor,
        )?;
        debug!(stats = ?self.tile_cache.stats(), "assembled mosaic");

        Ok(Mosaic {
            image: output,
            matches,
            cell_colors,
            grid: descriptor,
        })
    }

    /// Build a mosaic of `image` on an N x N grid
    ///
    /// # Errors
    ///
    /// See [`MosaicBuilder::create_mosaic`]
    pub fn create_square_mosaic(
        &self,
        image: &ArrayView3<'_, u8>,
        grid_size: usize,
    ) -> Result<Mosaic> {
        self.create_mosaic(image, GridSize::square(grid_size))
    }
}
