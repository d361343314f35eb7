//! Error types and context management for mosaic operations

use std::fmt;
use std::path::PathBuf;

/// Main error type for all mosaic operations
#[derive(Debug)]
pub enum MosaicError {
    /// Failed to decode an image from the filesystem
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image decoding error
        source: image::ImageError,
    },

    /// Failed to save a generated mosaic to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image encoding error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The tile directory does not exist or is not a directory
    TileDirectoryMissing {
        /// Directory that was requested
        path: PathBuf,
    },

    /// Scanning finished without a single decodable tile
    NoTilesAvailable {
        /// Directory or source that was scanned
        source_name: String,
        /// Number of candidate files that failed to decode
        skipped: usize,
    },

    /// Image has zero height or width
    EmptyImage {
        /// Image height in pixels
        height: usize,
        /// Image width in pixels
        width: usize,
    },

    /// Grid does not evenly partition the image
    ///
    /// Raised when a grid dimension is zero, exceeds the image extent,
    /// or does not divide the image dimension exactly.
    InvalidGrid {
        /// Image dimensions (height, width)
        image_dimensions: (usize, usize),
        /// Requested grid dimensions (rows, cols)
        grid_dimensions: (usize, usize),
        /// Explanation of the violated constraint
        reason: String,
    },

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Tile index exceeds the loaded tile set
    InvalidTileIndex {
        /// The invalid tile index
        index: usize,
        /// Number of loaded tiles
        max_tiles: usize,
    },

    /// No tile with the requested identifier is loaded
    UnknownTile {
        /// Requested tile identifier
        id: String,
    },

    /// Two buffers that must share a shape do not
    ShapeMismatch {
        /// Shape of the first buffer
        left: Vec<usize>,
        /// Shape of the second buffer
        right: Vec<usize>,
    },
}

impl fmt::Display for MosaicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::TileDirectoryMissing { path } => {
                write!(f, "Tile directory not found: '{}'", path.display())
            }
            Self::NoTilesAvailable {
                source_name,
                skipped,
            } => {
                write!(
                    f,
                    "No tiles available in {source_name} ({skipped} candidate file(s) skipped)"
                )
            }
            Self::EmptyImage { height, width } => {
                write!(f, "Image is empty ({height}x{width})")
            }
            Self::InvalidGrid {
                image_dimensions,
                grid_dimensions,
                reason,
            } => {
                write!(
                    f,
                    "Grid {}x{} cannot partition image {}x{}: {reason}",
                    grid_dimensions.0, grid_dimensions.1, image_dimensions.0, image_dimensions.1
                )
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::InvalidTileIndex { index, max_tiles } => {
                write!(
                    f,
                    "Tile index {index} is out of bounds ({max_tiles} tiles loaded)"
                )
            }
            Self::UnknownTile { id } => write!(f, "Unknown tile '{id}'"),
            Self::ShapeMismatch { left, right } => {
                write!(f, "Buffer shapes differ: {left:?} vs {right:?}")
            }
        }
    }
}

impl std::error::Error for MosaicError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for mosaic results
pub type Result<T> = std::result::Result<T, MosaicError>;

/// Placeholder path used by the blanket `From` conversions
const UNKNOWN_PATH: &str = "<unknown>";

/// Additional context to enrich error messages
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// File or directory the failing operation touched
    pub path: Option<PathBuf>,
    /// Operation being performed
    pub operation: Option<&'static str>,
}

/// Enriches errors raised through `?` with the path and operation involved
pub trait WithContext<T> {
    /// Add error context to a Result
    ///
    /// # Errors
    ///
    /// Propagates the original error with additional context applied
    fn with_context(self, context: ErrorContext) -> Result<T>;

    /// Attach the path and operation of a file system call
    ///
    /// # Errors
    ///
    /// Propagates the original error with the path and operation applied
    fn with_path(self, path: impl Into<PathBuf>, operation: &'static str) -> Result<T>;
}

impl<T, E> WithContext<T> for std::result::Result<T, E>
where
    E: Into<MosaicError>,
{
    fn with_context(self, context: ErrorContext) -> Result<T> {
        self.map_err(|e| {
            let mut error = e.into();
            // Only errors built by the blanket conversions carry placeholders
            match &mut error {
                MosaicError::FileSystem {
                    path, operation, ..
                } if path.as_os_str() == UNKNOWN_PATH => {
                    if let Some(context_path) = context.path {
                        *path = context_path;
                    }
                    if let Some(context_operation) = context.operation {
                        *operation = context_operation;
                    }
                }
                MosaicError::ImageLoad { path, .. } if path.as_os_str() == UNKNOWN_PATH => {
                    if let Some(context_path) = context.path {
                        *path = context_path;
                    }
                }
                _ => {}
            }
            error
        })
    }

    fn with_path(self, path: impl Into<PathBuf>, operation: &'static str) -> Result<T> {
        self.with_context(ErrorContext {
            path: Some(path.into()),
            operation: Some(operation),
        })
    }
}

impl From<image::ImageError> for MosaicError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageLoad {
            path: PathBuf::from(UNKNOWN_PATH),
            source: err,
        }
    }
}

impl From<std::io::Error> for MosaicError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from(UNKNOWN_PATH),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> MosaicError {
    MosaicError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create an invalid path error for CLI targets
pub fn io_error(msg: &str) -> MosaicError {
    MosaicError::InvalidParameter {
        parameter: "path",
        value: String::new(),
        reason: msg.to_string(),
    }
}
