//! PNG export of generated mosaics

use std::path::Path;

use ndarray::ArrayView3;

use crate::analysis::patterns::array_to_rgb_image;
use crate::io::error::{MosaicError, Result};

/// Write an (height, width, 3) buffer to disk as a PNG image
///
/// # Errors
///
/// Returns an error if:
/// - The buffer is not a three-channel image
/// - The parent directory cannot be created
/// - The image cannot be saved to the specified path
pub fn export_mosaic_as_png(buffer: &ArrayView3<'_, u8>, output_path: &Path) -> Result<()> {
    let img = array_to_rgb_image(buffer)?;

    if let Some(parent) = output_path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
    {
        std::fs::create_dir_all(parent).map_err(|e| MosaicError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    img.save_with_format(output_path, image::ImageFormat::Png)
        .map_err(|e| MosaicError::ImageExport {
            path: output_path.to_path_buf(),
            source: e,
        })?;

    Ok(())
}
