//! Throttle balance: the implicit block behind every power-matched source.

use pf_core::SignalUnit;
use pf_graph::{InputDecl, Interface, OutputDecl};

use crate::common::check_arity;
use crate::error::{ComponentError, ComponentResult};
use crate::traits::Block;

/// Initial guess for every balanced throttle.
pub const THROTTLE_GUESS: f64 = 0.5;

/// Implicit block owning one throttle unknown per analysis point.
///
/// ```text
/// R = available(throttle) - required
/// ```
///
/// The throttle is unbounded; an infeasible demand shows up as solver
/// non-convergence, never as a clamped value.
#[derive(Clone, Debug)]
pub struct PowerBalance {
    pub name: String,
    pub num_nodes: usize,
    pub unit: SignalUnit,
}

impl PowerBalance {
    pub const REQUIRED: usize = 0;
    pub const AVAILABLE: usize = 1;

    pub const THROTTLE: usize = 0;

    pub fn new(name: impl Into<String>, num_nodes: usize, unit: SignalUnit) -> Self {
        Self {
            name: name.into(),
            num_nodes,
            unit,
        }
    }
}

impl Block for PowerBalance {
    fn name(&self) -> &str {
        &self.name
    }

    fn interface(&self) -> Interface {
        let n = self.num_nodes;
        Interface::implicit(
            vec![
                InputDecl::vector("required", n, self.unit, 1.0).required(),
                InputDecl::vector("available", n, self.unit, 1.0).required(),
            ],
            vec![OutputDecl::vector("throttle", n, SignalUnit::Unitless).with_initial(THROTTLE_GUESS)],
        )
    }

    fn compute(&self, _inputs: &[Vec<f64>]) -> ComponentResult<Vec<Vec<f64>>> {
        Err(ComponentError::NotSupported {
            what: "power balance outputs are solver unknowns",
        })
    }

    fn residuals(&self, inputs: &[Vec<f64>], _outputs: &[Vec<f64>]) -> ComponentResult<Vec<f64>> {
        check_arity(&self.name, inputs, 2)?;
        Ok(inputs[Self::AVAILABLE]
            .iter()
            .zip(&inputs[Self::REQUIRED])
            .map(|(a, r)| a - r)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pf_graph::NodeKind;

    #[test]
    fn residual_is_available_minus_required() {
        let b = PowerBalance::new("bal", 2, SignalUnit::Kilowatt);
        let r = b
            .residuals(&[vec![100.0, 50.0], vec![120.0, 50.0]], &[vec![0.5, 0.5]])
            .unwrap();
        assert_eq!(r, vec![20.0, 0.0]);
    }

    #[test]
    fn balance_is_implicit_with_guess() {
        let b = PowerBalance::new("bal", 3, SignalUnit::Kilowatt);
        let iface = b.interface();
        assert_eq!(iface.kind, NodeKind::Implicit);
        assert_eq!(iface.outputs[0].initial, THROTTLE_GUESS);
        assert!(b.compute(&[]).is_err());
    }
}
