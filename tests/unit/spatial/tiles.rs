//! Tests for tile construction, average colors and resampling

#[cfg(test)]
mod tests {
    use image::{Rgb, RgbImage};
    use ndarray::{Array3, s};
    use tilemosaic::MosaicError;
    use tilemosaic::spatial::grid::CellSize;
    use tilemosaic::spatial::tiles::Tile;

    // Tests average color is taken from the original pixels
    // Verified by averaging the resized buffer instead
    #[test]
    fn test_average_color_from_original() -> Result<(), MosaicError> {
        let mut pixels = Array3::<u8>::zeros((1, 2, 3));
        pixels.slice_mut(s![0, 1, ..]).fill(255);
        let tile = Tile::new("half.png", pixels)?;

        assert_eq!(tile.average_color(), [127.5, 127.5, 127.5]);

        let shrunk = tile.resized(CellSize::new(1, 1))?;
        assert_eq!(shrunk.dim(), (1, 1, 3));
        assert_eq!(tile.average_color(), [127.5, 127.5, 127.5]);
        Ok(())
    }

    // Tests empty and non-RGB buffers are rejected
    // Verified by removing the channel check
    #[test]
    fn test_new_rejects_invalid_buffers() {
        assert!(matches!(
            Tile::new("empty", Array3::<u8>::zeros((0, 3, 3))),
            Err(MosaicError::EmptyImage { .. })
        ));
        assert!(matches!(
            Tile::new("rgba", Array3::<u8>::zeros((2, 2, 4))),
            Err(MosaicError::InvalidParameter { .. })
        ));
    }

    // Tests solid tiles report their color and dimensions
    // Verified by swapping height and width
    #[test]
    fn test_solid_tile() -> Result<(), MosaicError> {
        let tile = Tile::solid("blue", 3, 5, [0, 0, 255])?;
        assert_eq!(tile.id(), "blue");
        assert_eq!(tile.dimensions(), (3, 5));
        assert_eq!(tile.average_color(), [0.0, 0.0, 255.0]);
        assert!(tile.pixels().iter().skip(2).step_by(3).all(|&b| b == 255));
        Ok(())
    }

    // Tests nearest-neighbour upscaling replicates source pixels in blocks
    // Verified by sampling from the cell corner instead of its center
    #[test]
    fn test_resized_upscale_blocks() -> Result<(), MosaicError> {
        let pixels = Array3::from_shape_fn((2, 2, 3), |(y, x, _)| (y * 2 + x) as u8 * 50);
        let tile = Tile::new("grid", pixels)?;
        let resized = tile.resized(CellSize::new(4, 6))?;

        assert_eq!(resized.dim(), (4, 6, 3));
        assert!(resized.slice(s![0..2, 0..3, ..]).iter().all(|&v| v == 0));
        assert!(resized.slice(s![0..2, 3..6, ..]).iter().all(|&v| v == 50));
        assert!(resized.slice(s![2..4, 0..3, ..]).iter().all(|&v| v == 100));
        assert!(resized.slice(s![2..4, 3..6, ..]).iter().all(|&v| v == 150));
        Ok(())
    }

    // Tests resizing is deterministic for repeated calls
    // Verified by seeding the sampler with the call count
    #[test]
    fn test_resized_deterministic() -> Result<(), MosaicError> {
        let pixels = Array3::from_shape_fn((7, 9, 3), |(y, x, c)| (y * 31 + x * 7 + c) as u8);
        let tile = Tile::new("noise", pixels)?;
        let size = CellSize::new(4, 3);
        assert_eq!(tile.resized(size)?, tile.resized(size)?);
        Ok(())
    }

    // Tests decoding a tile file uses the file name as identifier
    // Verified by using the full path as identifier
    #[test]
    fn test_from_path() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("green.png");
        RgbImage::from_pixel(4, 2, Rgb([0, 255, 0])).save(&path)?;

        let tile = Tile::from_path(&path)?;
        assert_eq!(tile.id(), "green.png");
        assert_eq!(tile.dimensions(), (2, 4));
        assert_eq!(tile.average_color(), [0.0, 255.0, 0.0]);
        Ok(())
    }

    // Tests undecodable files produce an image load error
    // Verified by mapping decode failures to empty tiles
    #[test]
    fn test_from_path_corrupt_file() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"definitely not a png")?;

        assert!(matches!(
            Tile::from_path(&path),
            Err(MosaicError::ImageLoad { .. })
        ));
        Ok(())
    }
}
