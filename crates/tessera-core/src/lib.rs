//! Core array types and elementwise combination functions for Tessera.
//!
//! This crate provides the foundational abstractions that the other Tessera crates depend on:
//! - Array-like operands (`Array`, `ArrayData`, `DataType`)
//! - NumPy-style broadcasting (`broadcast_shape`)
//! - Pure elementwise combination functions (`elementwise`)

pub mod broadcast;
pub mod elementwise;
pub mod types;

// Re-export commonly used types
pub use broadcast::{broadcast_index, broadcast_shape};
pub use types::{Array, ArrayData, DataType};

/// Result type using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for Tessera operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// An elementwise function rejected its operands.
    #[error("Combination error: {0}")]
    Combination(String),

    #[error("Shape error: {0}")]
    Shape(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// Setup-time misconfiguration (bad catalog entry, bad parameters).
    #[error("Configuration error: {0}")]
    Configuration(String),
}
