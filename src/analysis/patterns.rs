//! Image decoding, buffer conversion and nearest-neighbour resampling

use crate::io::configuration::has_image_extension;
use crate::io::error::{MosaicError, Result, WithContext, invalid_parameter};
use crate::math::color::{CHANNELS, RgbBuffer};
use image::RgbImage;
use image::imageops::{self, FilterType};
use ndarray::{Array3, ArrayView3};
use std::path::Path;

/// Load an image from disk as an RGB buffer of shape (height, width, 3)
///
/// # Errors
///
/// Returns an error if:
/// - The file does not exist
/// - The extension is not one of the recognised image types
/// - The file cannot be decoded
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<RgbBuffer> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(MosaicError::FileSystem {
            path: path.to_path_buf(),
            operation: "open image",
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "image file not found"),
        });
    }
    if !has_image_extension(path) {
        return Err(invalid_parameter(
            "path",
            &path.display(),
            &"unsupported image file type",
        ));
    }

    rgb_image_to_array(decode_rgb(path)?)
}

/// Decode any supported image file and convert it to 8-bit RGB
///
/// # Errors
///
/// Returns an error if the file cannot be opened or decoded
pub fn decode_rgb(path: &Path) -> Result<RgbImage> {
    let image = image::open(path).with_path(path, "decode image")?;
    Ok(image.to_rgb8())
}

/// Convert a decoded RGB image into an (height, width, 3) buffer without copying
///
/// # Errors
///
/// Returns an error if the raw sample count does not match the image dimensions
pub fn rgb_image_to_array(image: RgbImage) -> Result<RgbBuffer> {
    let (width, height) = image.dimensions();
    let shape = (height as usize, width as usize, CHANNELS);
    Array3::from_shape_vec(shape, image.into_raw())
        .map_err(|e| invalid_parameter("image", &format!("{shape:?}"), &e))
}

/// Convert an (height, width, 3) buffer into an `RgbImage`
///
/// # Errors
///
/// Returns an error if the buffer does not have three channels or its
/// dimensions do not fit in `u32`
pub fn array_to_rgb_image(buffer: &ArrayView3<'_, u8>) -> Result<RgbImage> {
    let (height, width, channels) = buffer.dim();
    if channels != CHANNELS {
        return Err(invalid_parameter(
            "buffer",
            &format!("{:?}", buffer.shape()),
            &"expected three color channels",
        ));
    }
    let width_px = u32::try_from(width)
        .map_err(|e| invalid_parameter("width", &width, &e))?;
    let height_px = u32::try_from(height)
        .map_err(|e| invalid_parameter("height", &height, &e))?;

    // Logical iteration order is row-major regardless of memory layout
    let raw: Vec<u8> = buffer.iter().copied().collect();
    RgbImage::from_raw(width_px, height_px, raw).ok_or_else(|| {
        invalid_parameter(
            "buffer",
            &format!("{:?}", buffer.shape()),
            &"sample count does not match dimensions",
        )
    })
}

/// Nearest-neighbour resample of an (height, width, 3) view
///
/// Each output pixel copies the source pixel whose center is closest, so
/// the result depends only on the input and the target size.
///
/// # Errors
///
/// Returns an error if the buffer is not a three-channel image or a
/// dimension does not fit in `u32`
pub fn resize_nearest(
    pixels: &ArrayView3<'_, u8>,
    height: usize,
    width: usize,
) -> Result<RgbBuffer> {
    let source = array_to_rgb_image(pixels)?;
    let width_px = u32::try_from(width).map_err(|e| invalid_parameter("width", &width, &e))?;
    let height_px =
        u32::try_from(height).map_err(|e| invalid_parameter("height", &height, &e))?;

    rgb_image_to_array(imageops::resize(
        &source,
        width_px,
        height_px,
        FilterType::Nearest,
    ))
}

/// Resize an image to a square `target_size` x `target_size` RGB buffer
///
/// Any grid size that divides `target_size` then partitions the result exactly.
///
/// # Errors
///
/// Returns an error if the image or the target size is empty, or the
/// buffer does not have three channels
pub fn preprocess_image(image: &ArrayView3<'_, u8>, target_size: usize) -> Result<RgbBuffer> {
    let (height, width, channels) = image.dim();
    if height == 0 || width == 0 {
        return Err(MosaicError::EmptyImage { height, width });
    }
    if channels != CHANNELS {
        return Err(invalid_parameter(
            "image",
            &format!("{:?}", image.shape()),
            &"expected three color channels",
        ));
    }
    if target_size == 0 {
        return Err(invalid_parameter(
            "target_size",
            &target_size,
            &"must be positive",
        ));
    }

    resize_nearest(image, target_size, target_size)
}
