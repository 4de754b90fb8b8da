//! Error types for block evaluation.

use pf_core::error::PfError;
use thiserror::Error;

/// Errors that can occur while constructing or evaluating a block.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComponentError {
    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },

    #[error("Not supported: {what}")]
    NotSupported { what: &'static str },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Input arity mismatch for {block}: expected {expected}, got {actual}")]
    Arity {
        block: String,
        expected: usize,
        actual: usize,
    },
}

pub type ComponentResult<T> = Result<T, ComponentError>;

impl From<ComponentError> for PfError {
    fn from(e: ComponentError) -> Self {
        match e {
            ComponentError::NonPhysical { what } => PfError::InvalidArg { what },
            ComponentError::NotSupported { what } => PfError::InvalidArg { what },
            ComponentError::InvalidArg { what } => PfError::InvalidArg { what },
            ComponentError::Arity { .. } => PfError::Invariant {
                what: e.to_string(),
            },
        }
    }
}
