//! Error types for generator construction.

use thiserror::Error;

/// Errors raised while registering basis fields.
#[derive(Debug, Error)]
pub enum FieldError {
    /// Field extents must be strictly positive.
    #[error("field size must be positive, got {size}")]
    InvalidSize { size: f32 },
}
