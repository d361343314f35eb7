//! Command-line interface for batch mosaic generation

use crate::algorithm::cache::TileCache;
use crate::algorithm::executor::MosaicBuilder;
use crate::analysis::metrics::compute_metrics;
use crate::analysis::patterns::{load_image, preprocess_image};
use crate::io::configuration::{
    DEFAULT_GRID_SIZE, DEFAULT_TARGET_SIZE, DEFAULT_TILE_DIRECTORY, MAX_GRID_SIZE, MIN_GRID_SIZE,
    OUTPUT_EXTENSION, OUTPUT_SUFFIX, has_image_extension,
};
use crate::io::error::{Result, WithContext, invalid_parameter};
use crate::io::image::export_mosaic_as_png;
use crate::io::progress::{ProgressManager, Stage};
use crate::spatial::grid::{GridSize, validate_grid_size};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "tilemosaic")]
#[command(
    author,
    version,
    about = "Rebuild images as mosaics of color-matched tiles"
)]
/// Command-line arguments for the mosaic generator
pub struct Cli {
    /// Input image or directory of images to process
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Directory containing tile images
    #[arg(short, long, default_value = DEFAULT_TILE_DIRECTORY)]
    pub tiles: PathBuf,

    /// Number of grid rows and columns
    #[arg(short, long, default_value_t = DEFAULT_GRID_SIZE)]
    pub grid: usize,

    /// Side length (pixels) inputs are resized to before partitioning
    #[arg(short, long, default_value_t = DEFAULT_TARGET_SIZE)]
    pub size: usize,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Process files even if output exists
    #[arg(short, long)]
    pub no_skip: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Check if existing output files should be skipped
    pub const fn skip_existing(&self) -> bool {
        !self.no_skip
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Default log filter for the selected verbosity
    pub const fn log_filter(&self) -> &'static str {
        if self.verbose {
            "tilemosaic=debug"
        } else {
            "tilemosaic=info"
        }
    }

    /// Validate grid and size arguments before any file is touched
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The grid size is outside the supported range
    /// - The target size is zero or not a multiple of the grid size
    pub fn grid_size(&self) -> Result<GridSize> {
        if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&self.grid) {
            return Err(invalid_parameter(
                "grid",
                &self.grid,
                &format!("must be between {MIN_GRID_SIZE} and {MAX_GRID_SIZE}"),
            ));
        }
        if self.size == 0 || self.size % self.grid != 0 {
            return Err(invalid_parameter(
                "size",
                &self.size,
                &format!("must be a positive multiple of the grid size {}", self.grid),
            ));
        }
        validate_grid_size(self.grid, self.grid)
    }
}

/// Install the global tracing subscriber
///
/// `RUST_LOG` takes precedence over `default_filter`. Returns false when a
/// global subscriber was already installed; the existing one stays active.
pub fn init_logging(default_filter: &str) -> bool {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    match tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
    {
        Ok(()) => true,
        Err(error) => {
            debug!(%error, "keeping existing tracing subscriber");
            false
        }
    }
}

/// Outcome of a batch run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    /// Number of mosaics written
    pub processed: usize,
    /// Number of inputs skipped because their output exists
    pub skipped: usize,
}

/// Orchestrates batch mosaic generation with progress tracking
pub struct FileProcessor {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl FileProcessor {
    /// Create a new file processor with the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Process files according to CLI arguments
    ///
    /// Arguments and the tile directory are validated before any input is
    /// processed; the tile set is loaded once and shared by all inputs.
    ///
    /// # Errors
    ///
    /// Returns an error if argument validation, tile loading or the
    /// processing of any input fails
    pub fn process(&mut self) -> Result<BatchSummary> {
        let grid = self.cli.grid_size()?;
        let (files, skipped) = self.collect_files()?;

        let mut summary = BatchSummary {
            processed: 0,
            skipped,
        };
        if files.is_empty() {
            info!(skipped, "nothing to process");
            return Ok(summary);
        }

        let tile_cache = TileCache::load(&self.cli.tiles)?;
        let builder = MosaicBuilder::new(&tile_cache);

        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(files.len());
        }

        for (index, file) in files.iter().enumerate() {
            self.process_file(&builder, grid, file, index)?;
            summary.processed += 1;
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.finish();
        }

        info!(
            processed = summary.processed,
            skipped = summary.skipped,
            cache = ?tile_cache.stats(),
            "batch complete"
        );
        Ok(summary)
    }

    // Returns the inputs to process and how many were skipped
    fn collect_files(&self) -> Result<(Vec<PathBuf>, usize)> {
        let target = &self.cli.target;
        let candidates = if target.is_file() {
            if !has_image_extension(target) {
                return Err(crate::io::error::io_error(
                    "Target file must be a supported image",
                ));
            }
            vec![target.clone()]
        } else if target.is_dir() {
            let mut files = Vec::new();
            for entry in std::fs::read_dir(target).with_path(target, "read input directory")? {
                let path = entry.with_path(target, "read input directory")?.path();
                if path.is_file() && has_image_extension(&path) && !Self::is_output(&path) {
                    files.push(path);
                }
            }
            files.sort();
            files
        } else {
            return Err(crate::io::error::io_error(
                "Target must be an image file or directory",
            ));
        };

        let total = candidates.len();
        let files: Vec<PathBuf> = candidates
            .into_iter()
            .filter(|path| self.should_process_file(path))
            .collect();
        let skipped = total - files.len();
        Ok((files, skipped))
    }

    fn should_process_file(&self, input_path: &Path) -> bool {
        if !self.cli.skip_existing() {
            return true;
        }

        let output_path = Self::get_output_path(input_path);
        if output_path.exists() {
            info!(input = %input_path.display(), "skipping, output exists");
            false
        } else {
            true
        }
    }

    fn process_file(
        &mut self,
        builder: &MosaicBuilder<'_>,
        grid: GridSize,
        input_path: &Path,
        index: usize,
    ) -> Result<()> {
        let start_time = Instant::now();
        let output_path = Self::get_output_path(input_path);

        if let Some(ref mut pm) = self.progress_manager {
            pm.start_file(index, input_path);
        }

        let original = load_image(input_path)?;
        let processed = preprocess_image(&original.view(), self.cli.size)?;
        self.finish_stage(index, Stage::Load);

        let mosaic = builder.create_mosaic(&processed.view(), grid)?;
        self.finish_stage(index, Stage::Match);

        export_mosaic_as_png(&mosaic.image.view(), &output_path)?;
        self.finish_stage(index, Stage::Export);

        let metrics = compute_metrics(&processed.view(), &mosaic.image.view())?;
        self.finish_stage(index, Stage::Evaluate);

        let elapsed = start_time.elapsed();
        info!(
            input = %input_path.display(),
            output = %output_path.display(),
            grid = grid.rows,
            distinct_tiles = mosaic.distinct_tiles(),
            mse = metrics.mse,
            ssim = metrics.ssim,
            elapsed_ms = elapsed.as_millis() as u64,
            "mosaic generated"
        );

        if let Some(ref mut pm) = self.progress_manager {
            pm.complete_file(index, elapsed);
        }

        Ok(())
    }

    fn finish_stage(&mut self, index: usize, stage: Stage) {
        if let Some(ref mut pm) = self.progress_manager {
            pm.finish_stage(index, stage);
        }
    }

    /// Whether a path names a file this tool wrote
    pub fn is_output(path: &Path) -> bool {
        path.file_stem()
            .is_some_and(|stem| stem.to_string_lossy().ends_with(OUTPUT_SUFFIX))
    }

    /// Output path for an input: `<stem>_mosaic.png` next to the input
    pub fn get_output_path(input_path: &Path) -> PathBuf {
        let stem = input_path.file_stem().unwrap_or_default();
        let output_name = format!(
            "{}{}.{}",
            stem.to_string_lossy(),
            OUTPUT_SUFFIX,
            OUTPUT_EXTENSION
        );

        if let Some(parent) = input_path.parent() {
            parent.join(output_name)
        } else {
            PathBuf::from(output_name)
        }
    }
}
