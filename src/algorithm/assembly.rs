//! Placement of matched tiles into the output buffer

use ndarray::{Array3, ArrayView2, Axis, Slice};

use crate::algorithm::cache::TileCache;
use crate::io::error::{Result, invalid_parameter};
use crate::math::color::{CHANNELS, RgbBuffer};
use crate::spatial::grid::{CellSize, GridDescriptor};

/// Build the mosaic image from per-cell tile indices
///
/// Every cell rectangle of the output receives one block copy of the
/// matched tile resized to `cell_size`. Cell rectangles tile the output
/// without gaps or overlaps, so each pixel is written exactly once.
///
/// # Errors
///
/// Returns an error if:
/// - `matches` does not have the grid's (rows, cols) shape
/// - `cell_size` differs from the grid's cell extent
/// - A matched index is not a loaded tile
pub fn assemble(
    matches: &ArrayView2<'_, usize>,
    tile_cache: &TileCache,
    cell_size: CellSize,
    grid: &GridDescriptor,
) -> Result<RgbBuffer> {
    if matches.dim() != (grid.grid_rows, grid.grid_cols) {
        return Err(invalid_parameter(
            "matches",
            &format!("{:?}", matches.shape()),
            &format!("expected {}x{} grid", grid.grid_rows, grid.grid_cols),
        ));
    }
    if cell_size != grid.cell_size() {
        return Err(invalid_parameter(
            "cell_size",
            &format!("{}x{}", cell_size.height, cell_size.width),
            &format!(
                "grid cells are {}x{}",
                grid.cell_height, grid.cell_width
            ),
        ));
    }

    let (height, width) = grid.image_dimensions();
    let mut output = Array3::<u8>::zeros((height, width, CHANNELS));

    for ((row, col), &tile_index) in matches.indexed_iter() {
        let tile = tile_cache.resized(tile_index, cell_size)?;
        let (rows, cols) = grid.cell_region(row, col);
        let mut block = output.slice_axis_mut(Axis(0), Slice::from(rows));
        block.slice_axis_inplace(Axis(1), Slice::from(cols));
        block.assign(&*tile);
    }

    Ok(output)
}
