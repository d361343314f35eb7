/// Placement of matched tiles into the output image
pub mod assembly;
/// Tile set with memoized per-size resizes
pub mod cache;
/// Pipeline orchestration from input image to mosaic
pub mod executor;
/// Batched nearest-color matching of cells to tiles
pub mod matching;
