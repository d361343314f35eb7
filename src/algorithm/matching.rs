//! Nearest-color matching of grid cells to tiles
//!
//! Distances are computed as a broadcast (cells x tiles) matrix of squared
//! Euclidean RGB distances, one chunk of cells at a time, and reduced to the
//! index of the row minimum. Exact ties go to the lowest tile index.

use ndarray::{Array2, ArrayView1, ArrayView2, ArrayView3, Axis};

use crate::io::configuration::MATCH_CHUNK_CELLS;
use crate::io::error::{Result, invalid_parameter};
use crate::math::color::{CHANNELS, Color};

/// Closest tile index for every cell of an (rows, cols, 3) color grid
///
/// `tile_colors` is the (M, 3) table of tile average colors in cache order.
/// The result has shape (rows, cols) with the same row-major ordering as the
/// input cells.
///
/// # Errors
///
/// Returns an error if there are no tiles or either input does not have
/// exactly three color channels
pub fn match_tiles(
    cell_colors: &ArrayView3<'_, f64>,
    tile_colors: &ArrayView2<'_, f64>,
) -> Result<Array2<usize>> {
    let (rows, cols, channels) = cell_colors.dim();
    if channels != CHANNELS {
        return Err(invalid_parameter(
            "cell_colors",
            &format!("{:?}", cell_colors.shape()),
            &"expected three color channels",
        ));
    }
    validate_tile_colors(tile_colors)?;

    let standard = cell_colors.as_standard_layout();
    let flat = standard
        .view()
        .into_shape_with_order((rows * cols, CHANNELS))
        .map_err(|e| invalid_parameter("cell_colors", &format!("{rows}x{cols}"), &e))?;

    let mut indices = Vec::with_capacity(rows * cols);
    for chunk in flat.axis_chunks_iter(Axis(0), MATCH_CHUNK_CELLS) {
        let distances = squared_distances(&chunk, tile_colors);
        indices.extend(distances.rows().into_iter().map(|row| argmin_first(&row)));
    }

    Array2::from_shape_vec((rows, cols), indices)
        .map_err(|e| invalid_parameter("cell_colors", &format!("{rows}x{cols}"), &e))
}

/// Closest tile index for a single color
///
/// # Errors
///
/// Returns an error if there are no tiles or the tile table does not have
/// three color channels
pub fn nearest_tile(color: &Color, tile_colors: &ArrayView2<'_, f64>) -> Result<usize> {
    validate_tile_colors(tile_colors)?;
    let cell = ArrayView2::from_shape((1, CHANNELS), color.as_slice())
        .map_err(|e| invalid_parameter("color", &format!("{color:?}"), &e))?;
    let distances = squared_distances(&cell, tile_colors);
    Ok(distances
        .rows()
        .into_iter()
        .next()
        .map_or(0, |row| argmin_first(&row)))
}

/// Squared Euclidean distances between (K, 3) cell colors and (M, 3) tile colors
///
/// Returns a (K, M) matrix built by broadcasting the two tables against
/// each other.
pub fn squared_distances(
    cells: &ArrayView2<'_, f64>,
    tiles: &ArrayView2<'_, f64>,
) -> Array2<f64> {
    let differences = &cells.view().insert_axis(Axis(1)) - &tiles.view().insert_axis(Axis(0));
    differences.mapv(|d| d * d).sum_axis(Axis(2))
}

fn validate_tile_colors(tile_colors: &ArrayView2<'_, f64>) -> Result<()> {
    let (tile_count, channels) = tile_colors.dim();
    if tile_count == 0 {
        return Err(invalid_parameter(
            "tile_colors",
            &tile_count,
            &"at least one tile is required",
        ));
    }
    if channels != CHANNELS {
        return Err(invalid_parameter(
            "tile_colors",
            &format!("{:?}", tile_colors.shape()),
            &"expected three color channels",
        ));
    }
    Ok(())
}

// Strict comparison keeps the first of several equal minima
fn argmin_first(row: &ArrayView1<'_, f64>) -> usize {
    row.iter()
        .enumerate()
        .fold((0, f64::INFINITY), |(best_index, best), (index, &distance)| {
            if distance < best {
                (index, distance)
            } else {
                (best_index, best)
            }
        })
        .0
}
