//! Tests for argument parsing and batch processing

#[cfg(test)]
mod tests {
    use clap::Parser;
    use image::{Rgb, RgbImage};
    use std::path::{Path, PathBuf};
    use tilemosaic::MosaicError;
    use tilemosaic::io::cli::{BatchSummary, Cli, FileProcessor, init_logging};
    use tilemosaic::io::configuration::{DEFAULT_GRID_SIZE, DEFAULT_TARGET_SIZE};

    fn write_tiles(dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
        RgbImage::from_pixel(6, 6, Rgb([255, 0, 0])).save(dir.join("red.png"))?;
        RgbImage::from_pixel(6, 6, Rgb([0, 0, 255])).save(dir.join("blue.png"))?;
        Ok(())
    }

    // Tests defaults apply when only the target is given
    // Verified by changing the default grid size
    #[test]
    fn test_cli_defaults() -> Result<(), Box<dyn std::error::Error>> {
        let cli = Cli::try_parse_from(["tilemosaic", "photo.jpg"])?;

        assert_eq!(cli.target, PathBuf::from("photo.jpg"));
        assert_eq!(cli.tiles, PathBuf::from("tiles"));
        assert_eq!(cli.grid, DEFAULT_GRID_SIZE);
        assert_eq!(cli.size, DEFAULT_TARGET_SIZE);
        assert!(cli.skip_existing());
        assert!(cli.should_show_progress());
        assert_eq!(cli.log_filter(), "tilemosaic=info");

        let grid = cli.grid_size()?;
        assert_eq!((grid.rows, grid.cols), (DEFAULT_GRID_SIZE, DEFAULT_GRID_SIZE));
        Ok(())
    }

    // Tests out-of-range grids and incompatible sizes are rejected
    // Verified by accepting any positive grid
    #[test]
    fn test_cli_grid_validation() -> Result<(), Box<dyn std::error::Error>> {
        let too_small = Cli::try_parse_from(["tilemosaic", "a.png", "--grid", "4"])?;
        assert!(matches!(
            too_small.grid_size(),
            Err(MosaicError::InvalidParameter { parameter: "grid", .. })
        ));

        let too_large = Cli::try_parse_from(["tilemosaic", "a.png", "-g", "128"])?;
        assert!(too_large.grid_size().is_err());

        let uneven = Cli::try_parse_from(["tilemosaic", "a.png", "-g", "24", "-s", "500"])?;
        assert!(matches!(
            uneven.grid_size(),
            Err(MosaicError::InvalidParameter { parameter: "size", .. })
        ));

        let verbose = Cli::try_parse_from(["tilemosaic", "a.png", "-v", "-q", "-n"])?;
        assert_eq!(verbose.log_filter(), "tilemosaic=debug");
        assert!(!verbose.should_show_progress());
        assert!(!verbose.skip_existing());
        Ok(())
    }

    // Tests a second logging setup reports and keeps the first subscriber
    // Verified by panicking when a global subscriber already exists
    #[test]
    fn test_init_logging_twice() {
        let _ = init_logging("tilemosaic=info");
        assert!(!init_logging("tilemosaic=debug"));
    }

    // Tests output naming and recognition of generated files
    // Verified by keeping the input extension on outputs
    #[test]
    fn test_output_paths() {
        let output = FileProcessor::get_output_path(Path::new("shots/beach.jpg"));
        assert_eq!(output, PathBuf::from("shots/beach_mosaic.png"));

        assert!(FileProcessor::is_output(&output));
        assert!(!FileProcessor::is_output(Path::new("shots/beach.jpg")));
    }

    // Tests a directory batch writes mosaics and skips them on rerun
    // Verified by ignoring existing outputs
    #[test]
    fn test_process_directory() -> Result<(), Box<dyn std::error::Error>> {
        let root = tempfile::tempdir()?;
        let tiles = root.path().join("tiles");
        let inputs = root.path().join("inputs");
        std::fs::create_dir_all(&tiles)?;
        std::fs::create_dir_all(&inputs)?;
        write_tiles(&tiles)?;
        RgbImage::from_pixel(20, 12, Rgb([250, 5, 5])).save(inputs.join("warm.png"))?;
        RgbImage::from_pixel(9, 9, Rgb([5, 5, 250])).save(inputs.join("cool.bmp"))?;

        let args = |extra: &[&str]| {
            let mut args = vec![
                "tilemosaic".to_string(),
                inputs.display().to_string(),
                "--tiles".to_string(),
                tiles.display().to_string(),
                "--grid".to_string(),
                "8".to_string(),
                "--size".to_string(),
                "64".to_string(),
                "--quiet".to_string(),
            ];
            args.extend(extra.iter().map(|s| (*s).to_string()));
            args
        };

        let summary = FileProcessor::new(Cli::try_parse_from(args(&[]))?).process()?;
        assert_eq!(
            summary,
            BatchSummary {
                processed: 2,
                skipped: 0
            }
        );

        let warm = image::open(inputs.join("warm_mosaic.png"))?.to_rgb8();
        assert_eq!(warm.dimensions(), (64, 64));
        assert!(warm.pixels().all(|p| *p == Rgb([255, 0, 0])));
        let cool = image::open(inputs.join("cool_mosaic.png"))?.to_rgb8();
        assert!(cool.pixels().all(|p| *p == Rgb([0, 0, 255])));

        let rerun = FileProcessor::new(Cli::try_parse_from(args(&[]))?).process()?;
        assert_eq!(rerun.processed, 0);
        assert_eq!(rerun.skipped, 2);

        let forced = FileProcessor::new(Cli::try_parse_from(args(&["--no-skip"]))?).process()?;
        assert_eq!(forced.processed, 2);
        Ok(())
    }

    // Tests a missing tile directory fails before any output is written
    // Verified by loading tiles lazily per file
    #[test]
    fn test_process_missing_tiles() -> Result<(), Box<dyn std::error::Error>> {
        let root = tempfile::tempdir()?;
        let input = root.path().join("photo.png");
        RgbImage::from_pixel(16, 16, Rgb([1, 2, 3])).save(&input)?;

        let cli = Cli::try_parse_from([
            "tilemosaic".to_string(),
            input.display().to_string(),
            "--tiles".to_string(),
            root.path().join("absent").display().to_string(),
            "--grid".to_string(),
            "8".to_string(),
            "--size".to_string(),
            "16".to_string(),
            "-q".to_string(),
        ])?;

        let result = FileProcessor::new(cli).process();
        assert!(matches!(result, Err(MosaicError::TileDirectoryMissing { .. })));
        assert!(!root.path().join("photo_mosaic.png").exists());
        Ok(())
    }
}
