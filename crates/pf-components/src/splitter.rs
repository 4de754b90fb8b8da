//! Fractional power splitter.

use pf_core::SignalUnit;
use pf_graph::{InputDecl, Interface, OutputDecl};

use crate::common::{check_all_finite, check_arity, check_efficiency, check_non_negative, scalar, sized};
use crate::error::ComponentResult;
use crate::traits::Block;

/// Divides incoming power between two branches by a per-point fraction.
///
/// ```text
/// P_A = eta * f * P_in
/// P_B = eta * (1 - f) * P_in
/// ```
///
/// The fraction is not clamped; the caller zeroes it on failed branches.
#[derive(Clone, Debug)]
pub struct PowerSplit {
    pub name: String,
    pub num_nodes: usize,
    pub efficiency: f64,
    pub weight_inc: f64,
    pub weight_base: f64,
}

impl PowerSplit {
    pub const POWER_IN: usize = 0;
    pub const POWER_SPLIT_FRACTION: usize = 1;
    pub const POWER_RATING: usize = 2;

    pub const POWER_OUT_A: usize = 0;
    pub const POWER_OUT_B: usize = 1;
    pub const HEAT_OUT: usize = 2;
    pub const COMPONENT_WEIGHT: usize = 3;

    pub fn new(name: impl Into<String>, num_nodes: usize, efficiency: f64) -> ComponentResult<Self> {
        check_efficiency(efficiency, "splitter efficiency must be in (0,1]")?;
        Ok(Self {
            name: name.into(),
            num_nodes,
            efficiency,
            weight_inc: 0.0,
            weight_base: 0.0,
        })
    }

    pub fn with_weight(mut self, weight_inc: f64, weight_base: f64) -> ComponentResult<Self> {
        check_non_negative(weight_inc, "splitter weight increment must be >= 0")?;
        check_non_negative(weight_base, "splitter base weight must be >= 0")?;
        self.weight_inc = weight_inc;
        self.weight_base = weight_base;
        Ok(self)
    }
}

impl Block for PowerSplit {
    fn name(&self) -> &str {
        &self.name
    }

    fn interface(&self) -> Interface {
        let n = self.num_nodes;
        Interface::explicit(
            vec![
                InputDecl::vector("power_in", n, SignalUnit::Kilowatt, 0.0).required(),
                InputDecl::vector("power_split_fraction", n, SignalUnit::Unitless, 0.5),
                InputDecl::scalar("power_rating", SignalUnit::Kilowatt, 99_999.999),
            ],
            vec![
                OutputDecl::vector("power_out_A", n, SignalUnit::Kilowatt),
                OutputDecl::vector("power_out_B", n, SignalUnit::Kilowatt),
                OutputDecl::vector("heat_out", n, SignalUnit::Kilowatt),
                OutputDecl::scalar("component_weight", SignalUnit::Kilogram),
            ],
        )
    }

    fn compute(&self, inputs: &[Vec<f64>]) -> ComponentResult<Vec<Vec<f64>>> {
        check_arity(&self.name, inputs, 3)?;
        let power = &inputs[Self::POWER_IN];
        let fraction = &inputs[Self::POWER_SPLIT_FRACTION];
        let rating = scalar(&inputs[Self::POWER_RATING]);

        let a: Vec<f64> = power
            .iter()
            .zip(fraction)
            .map(|(p, f)| p * f * self.efficiency)
            .collect();
        let b: Vec<f64> = power
            .iter()
            .zip(fraction)
            .map(|(p, f)| p * (1.0 - f) * self.efficiency)
            .collect();
        let heat: Vec<f64> = power.iter().map(|p| p * (1.0 - self.efficiency)).collect();

        check_all_finite(&a, "splitter branch A")?;
        check_all_finite(&b, "splitter branch B")?;
        Ok(vec![
            a,
            b,
            heat,
            vec![sized(rating, self.weight_inc, self.weight_base)],
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lossless_split_conserves_power() {
        let s = PowerSplit::new("split", 3, 1.0).unwrap();
        let out = s
            .compute(&[vec![100.0, 100.0, 50.0], vec![0.6, 0.0, 1.0], vec![1000.0]])
            .unwrap();
        assert_eq!(out[PowerSplit::POWER_OUT_A], vec![60.0, 0.0, 50.0]);
        assert!((out[PowerSplit::POWER_OUT_B][0] - 40.0).abs() < 1e-12);
        assert_eq!(out[PowerSplit::POWER_OUT_B][1], 100.0);
        assert_eq!(out[PowerSplit::POWER_OUT_B][2], 0.0);
        assert_eq!(out[PowerSplit::COMPONENT_WEIGHT], vec![0.0]);
    }

    #[test]
    fn lossy_split_reports_heat() {
        let s = PowerSplit::new("split", 1, 0.9).unwrap();
        let out = s.compute(&[vec![100.0], vec![0.5], vec![1.0]]).unwrap();
        assert!((out[PowerSplit::POWER_OUT_A][0] - 45.0).abs() < 1e-12);
        assert!((out[PowerSplit::HEAT_OUT][0] - 10.0).abs() < 1e-12);
    }
}
