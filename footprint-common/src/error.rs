//! Common error types for footprint

use thiserror::Error;

/// Common result type for footprint operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types shared by the footprint crates
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}
