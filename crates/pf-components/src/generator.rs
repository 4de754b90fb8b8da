//! Generator model.

use pf_core::SignalUnit;
use pf_graph::{InputDecl, Interface, OutputDecl};

use crate::common::{check_all_finite, check_arity, check_efficiency, check_non_negative, scalar, sized};
use crate::error::ComponentResult;
use crate::traits::Block;

/// Shaft-to-electric converter.
///
/// ```text
/// P_elec = eta * P_shaft
/// W      = P_rated * w_specific + w_base
/// cost   = P_rated * c_inc + c_base
/// ```
#[derive(Clone, Debug)]
pub struct Generator {
    pub name: String,
    pub num_nodes: usize,
    pub efficiency: f64,
    pub specific_weight: f64,
    pub base_weight: f64,
    pub cost_inc: f64,
    pub cost_base: f64,
}

impl Generator {
    pub const SHAFT_POWER_IN: usize = 0;
    pub const ELEC_POWER_RATING: usize = 1;

    pub const ELEC_POWER_OUT: usize = 0;
    pub const HEAT_OUT: usize = 1;
    pub const COMPONENT_WEIGHT: usize = 2;
    pub const COMPONENT_COST: usize = 3;

    pub fn new(
        name: impl Into<String>,
        num_nodes: usize,
        efficiency: f64,
        specific_weight: f64,
        base_weight: f64,
    ) -> ComponentResult<Self> {
        check_efficiency(efficiency, "generator efficiency must be in (0,1]")?;
        check_non_negative(specific_weight, "generator specific weight must be >= 0")?;
        check_non_negative(base_weight, "generator base weight must be >= 0")?;
        Ok(Self {
            name: name.into(),
            num_nodes,
            efficiency,
            specific_weight,
            base_weight,
            cost_inc: 0.0,
            cost_base: 0.0,
        })
    }

    pub fn with_cost(mut self, cost_inc: f64, cost_base: f64) -> ComponentResult<Self> {
        check_non_negative(cost_inc, "generator cost increment must be >= 0")?;
        check_non_negative(cost_base, "generator base cost must be >= 0")?;
        self.cost_inc = cost_inc;
        self.cost_base = cost_base;
        Ok(self)
    }
}

impl Block for Generator {
    fn name(&self) -> &str {
        &self.name
    }

    fn interface(&self) -> Interface {
        let n = self.num_nodes;
        Interface::explicit(
            vec![
                InputDecl::vector("shaft_power_in", n, SignalUnit::Kilowatt, 0.0).required(),
                InputDecl::scalar("elec_power_rating", SignalUnit::Kilowatt, 260.0),
            ],
            vec![
                OutputDecl::vector("elec_power_out", n, SignalUnit::Kilowatt),
                OutputDecl::vector("heat_out", n, SignalUnit::Kilowatt),
                OutputDecl::scalar("component_weight", SignalUnit::Kilogram),
                OutputDecl::scalar("component_cost", SignalUnit::Dollar),
            ],
        )
    }

    fn compute(&self, inputs: &[Vec<f64>]) -> ComponentResult<Vec<Vec<f64>>> {
        check_arity(&self.name, inputs, 2)?;
        let rating = scalar(&inputs[Self::ELEC_POWER_RATING]);
        let shaft = &inputs[Self::SHAFT_POWER_IN];

        let out: Vec<f64> = shaft.iter().map(|p| p * self.efficiency).collect();
        let heat: Vec<f64> = shaft.iter().map(|p| p * (1.0 - self.efficiency)).collect();

        check_all_finite(&out, "generator output power")?;
        Ok(vec![
            out,
            heat,
            vec![sized(rating, self.specific_weight, self.base_weight)],
            vec![sized(rating, self.cost_inc, self.cost_base)],
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generator_applies_efficiency_and_sizing() {
        let g = Generator::new("g", 2, 0.97, 0.2, 5.0)
            .unwrap()
            .with_cost(0.1, 1.0)
            .unwrap();
        let out = g.compute(&[vec![100.0, 0.0], vec![250.0]]).unwrap();
        assert!((out[Generator::ELEC_POWER_OUT][0] - 97.0).abs() < 1e-9);
        assert_eq!(out[Generator::ELEC_POWER_OUT][1], 0.0);
        assert!((out[Generator::COMPONENT_WEIGHT][0] - 55.0).abs() < 1e-9);
        assert!((out[Generator::COMPONENT_COST][0] - 26.0).abs() < 1e-9);
    }
}
