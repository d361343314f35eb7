//! Numerical helpers shared across the pipeline

/// RGB color type, buffer alias and block reductions
pub mod color;
