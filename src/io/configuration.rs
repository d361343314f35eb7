//! Pipeline constants and runtime configuration defaults

/// Default side length (pixels) of the square buffer inputs are resized to
pub const DEFAULT_TARGET_SIZE: usize = 512;

/// Default number of grid rows and columns
pub const DEFAULT_GRID_SIZE: usize = 32;

// Bounds accepted from the command line; the core itself only needs N >= 1
/// Smallest grid size accepted by the CLI
pub const MIN_GRID_SIZE: usize = 8;
/// Largest grid size accepted by the CLI
pub const MAX_GRID_SIZE: usize = 64;

/// Directory scanned for tiles when none is given
pub const DEFAULT_TILE_DIRECTORY: &str = "tiles";

/// File extensions (lowercase, without dot) recognised as images
pub const VALID_IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "bmp"];

// Bounds the (cells x tiles x 3) broadcast buffer built during matching
/// Number of cells matched per batched distance computation
pub const MATCH_CHUNK_CELLS: usize = 1024;

// Progress bar display settings
/// Number of per-file progress lanes; larger batches add an overall counter
pub const MAX_INDIVIDUAL_PROGRESS_BARS: usize = 5;
/// Number of pipeline stages reported per file
pub const PIPELINE_STAGES: usize = 4;

// Output settings
/// Suffix added to output filenames
pub const OUTPUT_SUFFIX: &str = "_mosaic";
/// Extension of written mosaics
pub const OUTPUT_EXTENSION: &str = "png";

/// Returns true if the path has one of the recognised image extensions
pub fn has_image_extension(path: &std::path::Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            VALID_IMAGE_EXTENSIONS
                .iter()
                .any(|valid| ext.eq_ignore_ascii_case(valid))
        })
}
