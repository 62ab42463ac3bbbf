//! Common error types for Medicate

use thiserror::Error;

/// Common result type for Medicate operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across Medicate services
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration parse error
    #[error("Configuration error: {0}")]
    Config(String),
}
