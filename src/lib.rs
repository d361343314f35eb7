//! Photomosaic generation by nearest-color tile matching on a uniform grid
//!
//! The source image is partitioned into equally sized cells, each cell's
//! average color is matched against the average colors of a cached tile
//! set, and the output is assembled from the matched tiles resized to the
//! cell extent. All per-cell work is expressed as array reductions and
//! broadcast distance computations.

#![forbid(unsafe_code)]

/// Mosaic pipeline: tile cache, matching, assembly and orchestration
pub mod algorithm;
/// Image preparation and fidelity metrics
pub mod analysis;
/// Input/output operations, configuration and error handling
pub mod io;
/// Color types and array-level color reductions
pub mod math;
/// Grid layout and tile records
pub mod spatial;

pub use algorithm::cache::TileCache;
pub use algorithm::executor::{Mosaic, MosaicBuilder};
pub use io::error::{MosaicError, Result};
pub use spatial::grid::{CellSize, GridDescriptor, GridSize, partition};
