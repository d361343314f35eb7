//! Uniform grid partitioning and per-cell average colors
//!
//! An image of `height` x `width` pixels is split into `rows` x `cols` cells of
//! identical size. Cell averages are produced by viewing the buffer as
//! (rows, cell_height, cols, cell_width, 3) and reducing the two in-cell
//! axes, so no code here walks individual pixels.

use std::ops::Range;

use ndarray::{Array3, ArrayView3, Axis};

use crate::io::error::{MosaicError, Result, invalid_parameter};
use crate::math::color::CHANNELS;

/// Requested number of grid rows and columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridSize {
    /// Number of cell rows
    pub rows: usize,
    /// Number of cell columns
    pub cols: usize,
}

impl GridSize {
    /// Grid with the given row and column counts
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Square N x N grid
    pub const fn square(n: usize) -> Self {
        Self { rows: n, cols: n }
    }

    /// Total number of cells
    pub const fn cell_count(&self) -> usize {
        self.rows * self.cols
    }
}

/// Pixel extent of one grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellSize {
    /// Cell height in pixels
    pub height: usize,
    /// Cell width in pixels
    pub width: usize,
}

impl CellSize {
    /// Cell of the given height and width
    pub const fn new(height: usize, width: usize) -> Self {
        Self { height, width }
    }

    /// Number of pixels in one cell
    pub const fn pixel_count(&self) -> usize {
        self.height * self.width
    }
}

/// Grid layout derived from image dimensions and a requested grid size
///
/// `cell_height * grid_rows` and `cell_width * grid_cols` equal the image
/// dimensions exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridDescriptor {
    /// Number of cell rows
    pub grid_rows: usize,
    /// Number of cell columns
    pub grid_cols: usize,
    /// Height of every cell in pixels
    pub cell_height: usize,
    /// Width of every cell in pixels
    pub cell_width: usize,
}

impl GridDescriptor {
    /// Pixel extent of one cell
    pub const fn cell_size(&self) -> CellSize {
        CellSize::new(self.cell_height, self.cell_width)
    }

    /// Dimensions (height, width) of the partitioned image
    pub const fn image_dimensions(&self) -> (usize, usize) {
        (
            self.grid_rows * self.cell_height,
            self.grid_cols * self.cell_width,
        )
    }

    /// Total number of cells
    pub const fn cell_count(&self) -> usize {
        self.grid_rows * self.grid_cols
    }

    /// Pixel row and column ranges covered by the cell at (row, col)
    pub const fn cell_region(&self, row: usize, col: usize) -> (Range<usize>, Range<usize>) {
        let top = row * self.cell_height;
        let left = col * self.cell_width;
        (top..top + self.cell_height, left..left + self.cell_width)
    }
}

/// Compute the grid layout for an image, rejecting grids that do not divide it
///
/// # Errors
///
/// Returns an error if:
/// - Either image dimension is zero
/// - Either grid dimension is zero or larger than the image extent
/// - The image dimensions are not exact multiples of the grid dimensions
pub fn describe_grid(height: usize, width: usize, grid: GridSize) -> Result<GridDescriptor> {
    if height == 0 || width == 0 {
        return Err(MosaicError::EmptyImage { height, width });
    }

    let invalid = |reason: &str| MosaicError::InvalidGrid {
        image_dimensions: (height, width),
        grid_dimensions: (grid.rows, grid.cols),
        reason: reason.to_string(),
    };

    if grid.rows == 0 || grid.cols == 0 {
        return Err(invalid("grid dimensions must be positive"));
    }
    if grid.rows > height || grid.cols > width {
        return Err(invalid("grid is larger than the image"));
    }
    if height % grid.rows != 0 || width % grid.cols != 0 {
        return Err(invalid("image dimensions are not divisible by the grid"));
    }

    Ok(GridDescriptor {
        grid_rows: grid.rows,
        grid_cols: grid.cols,
        cell_height: height / grid.rows,
        cell_width: width / grid.cols,
    })
}

/// Split an image into an N x N grid and average each cell
///
/// # Errors
///
/// See [`partition_grid`]
pub fn partition(
    image: &ArrayView3<'_, u8>,
    grid_size: usize,
) -> Result<(Array3<f64>, GridDescriptor)> {
    partition_grid(image, GridSize::square(grid_size))
}

/// Split an image into a rows x cols grid and average each cell
///
/// Returns an array of shape (rows, cols, 3) holding the per-channel mean of
/// every cell in row-major order, together with the grid layout. The input
/// is never modified.
///
/// # Errors
///
/// Returns an error if the buffer does not have three channels or the grid
/// does not evenly partition the image (see [`describe_grid`])
pub fn partition_grid(
    image: &ArrayView3<'_, u8>,
    grid: GridSize,
) -> Result<(Array3<f64>, GridDescriptor)> {
    let (height, width, channels) = image.dim();
    if channels != CHANNELS {
        return Err(invalid_parameter(
            "image",
            &format!("{:?}", image.shape()),
            &"expected three color channels",
        ));
    }
    let descriptor = describe_grid(height, width, grid)?;

    let shape = (
        descriptor.grid_rows,
        descriptor.cell_height,
        descriptor.grid_cols,
        descriptor.cell_width,
        CHANNELS,
    );
    let standard = image.as_standard_layout();
    let blocks = standard
        .view()
        .into_shape_with_order(shape)
        .map_err(|e| invalid_parameter("image", &format!("{shape:?}"), &e))?;

    // (rows, cell_h, cols, cell_w, 3) -> (rows, cell_h, cols, 3) -> (rows, cols, 3)
    let row_sums = blocks.fold_axis(Axis(3), 0.0_f64, |acc, &value| acc + f64::from(value));
    let cell_sums = row_sums.sum_axis(Axis(1));
    let pixel_count = descriptor.cell_size().pixel_count() as f64;

    Ok((cell_sums / pixel_count, descriptor))
}

/// Validate a (rows, cols) grid request: both positive and equal
///
/// # Errors
///
/// Returns an error if either dimension is zero or the grid is not square
pub fn validate_grid_size(rows: usize, cols: usize) -> Result<GridSize> {
    if rows == 0 || cols == 0 {
        return Err(invalid_parameter(
            "grid_size",
            &format!("{rows}x{cols}"),
            &"grid dimensions must be positive",
        ));
    }
    if rows != cols {
        return Err(invalid_parameter(
            "grid_size",
            &format!("{rows}x{cols}"),
            &"grid must be square",
        ));
    }
    Ok(GridSize::new(rows, cols))
}
