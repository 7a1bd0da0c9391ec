//! Error types for LIF cells and layers.

use thiserror::Error;

/// Errors raised when a step, cell or layer receives inconsistent inputs.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LifError {
    #[error("Shape mismatch for {tensor}: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        tensor: &'static str,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid time step: dt must be finite and positive, got {0}")]
    InvalidTimeStep(f64),
}

pub type Result<T> = std::result::Result<T, LifError>;

/// Fail fast unless `actual` matches `expected` exactly.
pub(crate) fn check_shape(tensor: &'static str, expected: &[usize], actual: &[usize]) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(LifError::ShapeMismatch {
            tensor,
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        })
    }
}
