//! Core trait for block models.

use pf_graph::Interface;

use crate::error::{ComponentError, ComponentResult};

/// A numeric block: the narrow input/output contract a graph node evaluates.
///
/// Inputs arrive in declaration order, each already broadcast to its declared
/// length. Blocks are deterministic and hold no mutable state, so one graph
/// may be evaluated from several threads at once (finite-difference columns).
pub trait Block: Send + Sync {
    /// Block name for debugging and identification.
    fn name(&self) -> &str;

    /// Port layout of this block.
    fn interface(&self) -> Interface;

    /// Compute outputs from inputs (explicit blocks).
    fn compute(&self, inputs: &[Vec<f64>]) -> ComponentResult<Vec<Vec<f64>>>;

    /// Residuals for implicit blocks, one per output element, given the
    /// current inputs and the solver's values for the outputs.
    ///
    /// Default implementation returns NotSupported.
    fn residuals(&self, _inputs: &[Vec<f64>], _outputs: &[Vec<f64>]) -> ComponentResult<Vec<f64>> {
        Err(ComponentError::NotSupported {
            what: "residuals not implemented for this block",
        })
    }
}
