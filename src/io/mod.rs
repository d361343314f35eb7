//! Input/output: command line, configuration, errors, export and progress

/// Command-line interface and batch file processing
pub mod cli;
/// Pipeline constants and defaults
pub mod configuration;
/// Error types and context management
pub mod error;
/// PNG export of generated mosaics
pub mod image;
/// Terminal progress display for batch runs
pub mod progress;
