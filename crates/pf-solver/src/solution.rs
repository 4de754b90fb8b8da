//! Converged values of every signal.

use nalgebra::DVector;
use pf_core::SignalId;
use pf_graph::IndexMap;

use crate::error::SolverResult;

/// Solution state for a compiled graph.
#[derive(Clone, Debug)]
pub struct Solution {
    values: Vec<f64>,
    index: IndexMap,
    /// Converged unknowns
    pub unknowns: DVector<f64>,
    /// Residual norm at convergence
    pub residual_norm: f64,
    /// Number of iterations
    pub iterations: usize,
}

impl Solution {
    pub(crate) fn new(
        values: Vec<f64>,
        index: IndexMap,
        unknowns: DVector<f64>,
        residual_norm: f64,
        iterations: usize,
    ) -> Self {
        Self {
            values,
            index,
            unknowns,
            residual_norm,
            iterations,
        }
    }

    /// Values of a signal.
    pub fn value(&self, id: SignalId) -> SolverResult<&[f64]> {
        Ok(&self.values[self.index.value_range(id)?])
    }

    /// First value of a signal (for scalars).
    pub fn scalar(&self, id: SignalId) -> SolverResult<f64> {
        Ok(self.value(id)?.first().copied().unwrap_or(0.0))
    }

    /// Flat value buffer.
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}
