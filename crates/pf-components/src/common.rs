//! Common utilities for block calculations.

use pf_core::numeric::ensure_finite;

use crate::error::{ComponentError, ComponentResult};

/// Ensure a value is finite, returning ComponentError if not.
pub fn check_finite(value: f64, what: &'static str) -> ComponentResult<()> {
    ensure_finite(value, what).map_err(|_| ComponentError::NonPhysical { what })?;
    Ok(())
}

/// Ensure every element of a computed output is finite.
pub fn check_all_finite(values: &[f64], what: &'static str) -> ComponentResult<()> {
    values.iter().try_for_each(|&v| check_finite(v, what))
}

/// Efficiencies live in (0, 1].
pub fn check_efficiency(eta: f64, what: &'static str) -> ComponentResult<()> {
    if eta > 0.0 && eta <= 1.0 {
        Ok(())
    } else {
        Err(ComponentError::InvalidArg { what })
    }
}

/// Weights, specific weights and costs must be finite and non-negative.
pub fn check_non_negative(value: f64, what: &'static str) -> ComponentResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ComponentError::InvalidArg { what })
    }
}

/// Guard the input count handed to `compute`.
pub fn check_arity(block: &str, inputs: &[Vec<f64>], expected: usize) -> ComponentResult<()> {
    if inputs.len() == expected {
        Ok(())
    } else {
        Err(ComponentError::Arity {
            block: block.to_string(),
            expected,
            actual: inputs.len(),
        })
    }
}

/// Linear sizing law used by most hardware: `rating * specific + base`.
pub fn sized(rating: f64, specific: f64, base: f64) -> f64 {
    rating * specific + base
}

/// First element of a scalar input.
pub fn scalar(values: &[f64]) -> f64 {
    values.first().copied().unwrap_or(0.0)
}
