//! Image preparation and quality analysis of generated mosaics

/// Fidelity metrics between an image and its mosaic
pub mod metrics;
/// Image decoding, buffer conversion and resampling
pub mod patterns;
