//! Spatial data structures: the cell grid and the tiles placed into it
//!
//! This module contains:
//! - Grid layout computation and per-cell color reduction
//! - Tile records with their precomputed average colors

/// Grid partitioning and cell average colors
pub mod grid;
/// Tile records and per-tile resampling
pub mod tiles;

pub use grid::{CellSize, GridDescriptor, GridSize};
pub use tiles::Tile;
