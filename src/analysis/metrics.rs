//! Fidelity metrics between an image and its mosaic
//!
//! Both metrics require buffers of identical shape; nothing is cropped or
//! resized to make shapes agree.

use ndarray::{ArrayView3, Axis, Zip};

use crate::io::error::{MosaicError, Result};

// Stability constants of the SSIM formula for unit dynamic range
const SSIM_C1: f64 = 0.01 * 0.01;
const SSIM_C2: f64 = 0.03 * 0.03;

/// Mean squared error and structural similarity of one comparison
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityMetrics {
    /// Mean of squared per-sample differences
    pub mse: f64,
    /// Global SSIM averaged over the color channels
    pub ssim: f64,
}

/// Mean of squared per-sample differences over two equal-shaped buffers
///
/// `mse(a, a)` is zero and `mse(a, b) == mse(b, a)`.
///
/// # Errors
///
/// Returns an error if the shapes differ or the buffers are empty
pub fn mse(a: &ArrayView3<'_, u8>, b: &ArrayView3<'_, u8>) -> Result<f64> {
    check_shapes(a, b)?;

    let total = Zip::from(a).and(b).fold(0.0_f64, |acc, &x, &y| {
        let diff = f64::from(x) - f64::from(y);
        acc + diff * diff
    });

    Ok(total / a.len() as f64)
}

/// Window-free structural similarity averaged over the RGB channels
///
/// Each channel is compared globally using its mean, population variance
/// and the covariance between the two buffers. The result lies in
/// [-1, 1], with 1 for identical buffers.
///
/// # Errors
///
/// Returns an error if the shapes differ or the buffers are empty
pub fn ssim(a: &ArrayView3<'_, u8>, b: &ArrayView3<'_, u8>) -> Result<f64> {
    check_shapes(a, b)?;

    let channels = a.len_of(Axis(2));
    let total: f64 = a
        .axis_iter(Axis(2))
        .zip(b.axis_iter(Axis(2)))
        .map(|(x, y)| ssim_channel(&x.mapv(f64::from).view(), &y.mapv(f64::from).view()))
        .sum();

    Ok(total / channels as f64)
}

/// Compute both MSE and SSIM
///
/// # Errors
///
/// Returns an error if the shapes differ or the buffers are empty
pub fn compute_metrics(a: &ArrayView3<'_, u8>, b: &ArrayView3<'_, u8>) -> Result<QualityMetrics> {
    Ok(QualityMetrics {
        mse: mse(a, b)?,
        ssim: ssim(a, b)?,
    })
}

fn ssim_channel(x: &ndarray::ArrayView2<'_, f64>, y: &ndarray::ArrayView2<'_, f64>) -> f64 {
    let count = x.len() as f64;
    let mu_x = x.sum() / count;
    let mu_y = y.sum() / count;

    let dx = x.mapv(|v| v - mu_x);
    let dy = y.mapv(|v| v - mu_y);

    let sigma_x = (&dx * &dx).sum() / count;
    let sigma_y = (&dy * &dy).sum() / count;
    let sigma_xy = (&dx * &dy).sum() / count;

    let numerator = (2.0 * mu_x * mu_y + SSIM_C1) * (2.0 * sigma_xy + SSIM_C2);
    let denominator = (mu_x * mu_x + mu_y * mu_y + SSIM_C1) * (sigma_x + sigma_y + SSIM_C2);

    numerator / denominator
}

fn check_shapes(a: &ArrayView3<'_, u8>, b: &ArrayView3<'_, u8>) -> Result<()> {
    if a.shape() != b.shape() {
        return Err(MosaicError::ShapeMismatch {
            left: a.shape().to_vec(),
            right: b.shape().to_vec(),
        });
    }
    if a.is_empty() {
        let (height, width, _) = a.dim();
        return Err(MosaicError::EmptyImage { height, width });
    }
    Ok(())
}
