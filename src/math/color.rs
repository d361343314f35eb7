//! RGB color representation and array-level color reductions

use ndarray::{Array3, ArrayView1, ArrayView3, Axis};

/// Number of channels in every pixel buffer (R, G, B)
pub const CHANNELS: usize = 3;

/// Owned pixel buffer of shape (height, width, 3), channel order R, G, B
pub type RgbBuffer = Array3<u8>;

/// Real-valued RGB color, one mean per channel
pub type Color = [f64; CHANNELS];

/// Per-channel mean over every pixel of an (height, width, 3) view
///
/// Reduces whole rows at a time rather than visiting pixels individually.
/// Returns `None` for an empty view or a view without exactly three channels.
pub fn mean_color(pixels: &ArrayView3<'_, u8>) -> Option<Color> {
    let (height, width, channels) = pixels.dim();
    if height == 0 || width == 0 || channels != CHANNELS {
        return None;
    }

    let column_sums = pixels.fold_axis(Axis(1), 0.0_f64, |acc, &value| acc + f64::from(value));
    let totals = column_sums.sum_axis(Axis(0));
    let pixel_count = (height * width) as f64;

    color_from_lane(&(totals / pixel_count).view())
}

/// Read a three-element lane (e.g. one row of an (M, 3) color table) as a color
pub fn color_from_lane(lane: &ArrayView1<'_, f64>) -> Option<Color> {
    if lane.len() != CHANNELS {
        return None;
    }
    let mut color = [0.0; CHANNELS];
    for (slot, value) in color.iter_mut().zip(lane.iter()) {
        *slot = *value;
    }
    Some(color)
}

/// Squared Euclidean distance between two colors in RGB space
pub fn squared_distance(a: &Color, b: &Color) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Round a real-valued color to the nearest 8-bit RGB triple
pub fn to_rgb8(color: &Color) -> [u8; CHANNELS] {
    let mut rgb = [0u8; CHANNELS];
    for (slot, value) in rgb.iter_mut().zip(color) {
        *slot = value.round().clamp(0.0, 255.0) as u8;
    }
    rgb
}
