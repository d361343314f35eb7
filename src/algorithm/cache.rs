use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use ndarray::{Array2, ArrayView2};
use tracing::{debug, info, warn};

use crate::io::configuration::has_image_extension;
use crate::io::error::{MosaicError, Result, WithContext, invalid_parameter};
use crate::math::color::{CHANNELS, Color, RgbBuffer};
use crate::spatial::grid::CellSize;
use crate::spatial::tiles::Tile;

/// Key for memoized tile resizes
///
/// Identifies one tile (by its position in the cache ordering) at one
/// target cell size.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct ResizeKey {
    /// Index of the tile in cache order
    pub tile_index: usize,
    /// Target cell extent
    pub size: CellSize,
}

impl ResizeKey {
    /// Create a resize key
    pub const fn new(tile_index: usize, size: CellSize) -> Self {
        Self { tile_index, size }
    }
}

// Filled at most once; held while resizing, outside the map lock
type ResizeSlot = Arc<Mutex<Option<Arc<RgbBuffer>>>>;

/// Loaded tile set with memoized per-size resizes
///
/// Tiles are ordered by identifier and fixed for the lifetime of the cache.
/// Average colors are computed once at construction. Resized buffers are
/// produced on first request for a (tile, size) key and shared afterwards.
///
/// The cache is `Send + Sync`: concurrent first requests for the same key
/// block on a single resize rather than racing.
pub struct TileCache {
    tiles: Vec<Tile>,
    average_colors: Array2<f64>,
    index_by_id: HashMap<String, usize>,
    resized: Mutex<HashMap<ResizeKey, ResizeSlot>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

/// Performance metrics for cache effectiveness
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Requests served from an existing resize
    pub hits: usize,
    /// Requests that performed a resize
    pub misses: usize,
}

impl TileCache {
    /// Load every decodable image in a directory as a tile
    ///
    /// Files are taken in file-name order. Files that fail to decode are
    /// logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The directory does not exist
    /// - The directory cannot be read
    /// - No file in the directory decodes to a usable tile
    pub fn load<P: AsRef<Path>>(directory: P) -> Result<Self> {
        let directory = directory.as_ref();
        if !directory.is_dir() {
            return Err(MosaicError::TileDirectoryMissing {
                path: directory.to_path_buf(),
            });
        }

        let mut candidates = Vec::new();
        for entry in std::fs::read_dir(directory).with_path(directory, "read tile directory")? {
            let path = entry.with_path(directory, "read tile directory")?.path();
            if path.is_file() && has_image_extension(&path) {
                candidates.push(path);
            }
        }
        candidates.sort();

        let mut tiles = Vec::with_capacity(candidates.len());
        let mut skipped = 0;
        for path in &candidates {
            match Tile::from_path(path) {
                Ok(tile) => tiles.push(tile),
                Err(error) => {
                    skipped += 1;
                    warn!(path = %path.display(), %error, "skipping unusable tile");
                }
            }
        }

        if tiles.is_empty() {
            return Err(MosaicError::NoTilesAvailable {
                source_name: directory.display().to_string(),
                skipped,
            });
        }

        info!(
            directory = %directory.display(),
            loaded = tiles.len(),
            skipped,
            "loaded tile set"
        );
        Self::from_tiles(tiles)
    }

    /// Build a cache from tiles that are already decoded
    ///
    /// The given order becomes the cache ordering used for tile indices.
    ///
    /// # Errors
    ///
    /// Returns an error if `tiles` is empty
    pub fn from_tiles(tiles: Vec<Tile>) -> Result<Self> {
        if tiles.is_empty() {
            return Err(MosaicError::NoTilesAvailable {
                source_name: "in-memory tile set".to_string(),
                skipped: 0,
            });
        }

        let flat: Vec<f64> = tiles.iter().flat_map(Tile::average_color).collect();
        let average_colors = Array2::from_shape_vec((tiles.len(), CHANNELS), flat)
            .map_err(|e| invalid_parameter("tiles", &tiles.len(), &e))?;

        let mut index_by_id = HashMap::with_capacity(tiles.len());
        for (index, tile) in tiles.iter().enumerate() {
            // First occurrence wins for duplicate identifiers
            index_by_id.entry(tile.id().to_string()).or_insert(index);
        }

        Ok(Self {
            tiles,
            average_colors,
            index_by_id,
            resized: Mutex::new(HashMap::new()),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        })
    }

    /// Number of loaded tiles
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Always false for a constructed cache; present for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Loaded tiles in cache order
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Tile at a cache index
    pub fn tile(&self, index: usize) -> Option<&Tile> {
        self.tiles.get(index)
    }

    /// Cache index of the tile with the given identifier
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    /// Tile identifiers in cache order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.tiles.iter().map(Tile::id)
    }

    /// Average colors of all tiles as an (M, 3) array in cache order
    pub fn average_colors(&self) -> ArrayView2<'_, f64> {
        self.average_colors.view()
    }

    /// Average color of one tile
    pub fn average_color(&self, index: usize) -> Option<Color> {
        self.tiles.get(index).map(Tile::average_color)
    }

    /// Resized pixels of a tile for the given cell size
    ///
    /// The first request for a key computes and stores the buffer; every
    /// later request returns the same shared buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of range or the size is empty
    pub fn resized(&self, tile_index: usize, size: CellSize) -> Result<Arc<RgbBuffer>> {
        let tile = self
            .tiles
            .get(tile_index)
            .ok_or(MosaicError::InvalidTileIndex {
                index: tile_index,
                max_tiles: self.tiles.len(),
            })?;
        if size.height == 0 || size.width == 0 {
            return Err(invalid_parameter(
                "size",
                &format!("{}x{}", size.height, size.width),
                &"cell size must be positive",
            ));
        }

        let key = ResizeKey::new(tile_index, size);
        let slot = {
            let mut slots = self.resized.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(slots.entry(key).or_default())
        };

        let mut filled = slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(buffer) = filled.as_ref() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(Arc::clone(buffer));
        }

        debug!(
            tile = tile.id(),
            height = size.height,
            width = size.width,
            "resizing tile"
        );
        let buffer = Arc::new(tile.resized(size)?);
        *filled = Some(Arc::clone(&buffer));
        self.misses.fetch_add(1, Ordering::Relaxed);

        Ok(buffer)
    }

    /// Resized pixels of the tile with the given identifier
    ///
    /// # Errors
    ///
    /// Returns an error if no tile has this identifier or the size is empty
    pub fn resized_by_id(&self, id: &str, size: CellSize) -> Result<Arc<RgbBuffer>> {
        let index = self.index_of(id).ok_or_else(|| MosaicError::UnknownTile {
            id: id.to_string(),
        })?;
        self.resized(index, size)
    }

    /// Resized pixels of every tile for one cell size, in cache order
    ///
    /// # Errors
    ///
    /// Returns an error if the size is empty
    pub fn resized_all(&self, size: CellSize) -> Result<Vec<Arc<RgbBuffer>>> {
        (0..self.tiles.len())
            .map(|index| self.resized(index, size))
            .collect()
    }

    /// Number of memoized (tile, size) buffers
    pub fn cached_entries(&self) -> usize {
        self.resized
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|slot| slot.lock().unwrap_or_else(PoisonError::into_inner).is_some())
            .count()
    }

    /// Snapshot of hit and miss counters
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl std::fmt::Debug for TileCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TileCache")
            .field("tiles", &self.tiles.len())
            .field("cached_entries", &self.cached_entries())
            .field("stats", &self.stats())
            .finish()
    }
}
