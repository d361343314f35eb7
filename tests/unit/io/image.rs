//! Tests for PNG export

#[cfg(test)]
mod tests {
    use image::Rgb;
    use ndarray::Array3;
    use tilemosaic::MosaicError;
    use tilemosaic::io::image::export_mosaic_as_png;

    // Tests exported pixels decode back unchanged
    // Verified by writing a lossy format
    #[test]
    fn test_export_round_trip() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("nested").join("out_mosaic.png");
        let buffer = Array3::from_shape_fn((6, 4, 3), |(y, x, c)| (y * 30 + x * 5 + c) as u8);

        export_mosaic_as_png(&buffer.view(), &path)?;

        let decoded = image::open(&path)?.to_rgb8();
        assert_eq!(decoded.dimensions(), (4, 6));
        assert_eq!(decoded.get_pixel(3, 5), &Rgb([165, 166, 167]));
        Ok(())
    }

    // Tests non-RGB buffers are refused before touching the disk
    // Verified by creating the file first
    #[test]
    fn test_export_rejects_bad_buffer() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("gray.png");
        let buffer = Array3::<u8>::zeros((4, 4, 1));

        assert!(matches!(
            export_mosaic_as_png(&buffer.view(), &path),
            Err(MosaicError::InvalidParameter { .. })
        ));
        assert!(!path.exists());
        Ok(())
    }
}
