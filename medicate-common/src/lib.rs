//! # Medicate Common Library
//!
//! Shared code for the Medicate services including:
//! - Error types
//! - Bootstrap configuration loading (TOML + environment)
//! - Barcode normalization and validation

pub mod barcode;
pub mod config;
pub mod error;

pub use error::{Error, Result};
