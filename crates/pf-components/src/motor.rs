//! Electric motor model.

use pf_core::SignalUnit;
use pf_graph::{InputDecl, Interface, OutputDecl};

use crate::common::{check_all_finite, check_arity, check_efficiency, check_non_negative, scalar, sized};
use crate::error::ComponentResult;
use crate::traits::Block;

/// Electric motor driven by a throttle.
///
/// ```text
/// P_elec  = throttle * P_rated
/// P_shaft = eta * P_elec
/// W       = P_rated * w_specific + w_base
/// ```
#[derive(Clone, Debug)]
pub struct Motor {
    pub name: String,
    pub num_nodes: usize,
    pub efficiency: f64,
    pub specific_weight: f64,
    pub base_weight: f64,
}

impl Motor {
    pub const THROTTLE: usize = 0;
    pub const ELEC_POWER_RATING: usize = 1;

    pub const SHAFT_POWER_OUT: usize = 0;
    pub const ELEC_LOAD: usize = 1;
    pub const HEAT_OUT: usize = 2;
    pub const COMPONENT_WEIGHT: usize = 3;

    pub fn new(
        name: impl Into<String>,
        num_nodes: usize,
        efficiency: f64,
        specific_weight: f64,
        base_weight: f64,
    ) -> ComponentResult<Self> {
        check_efficiency(efficiency, "motor efficiency must be in (0,1]")?;
        check_non_negative(specific_weight, "motor specific weight must be >= 0")?;
        check_non_negative(base_weight, "motor base weight must be >= 0")?;
        Ok(Self {
            name: name.into(),
            num_nodes,
            efficiency,
            specific_weight,
            base_weight,
        })
    }
}

impl Block for Motor {
    fn name(&self) -> &str {
        &self.name
    }

    fn interface(&self) -> Interface {
        let n = self.num_nodes;
        Interface::explicit(
            vec![
                InputDecl::vector("throttle", n, SignalUnit::Unitless, 0.0).required(),
                InputDecl::scalar("elec_power_rating", SignalUnit::Kilowatt, 260.0),
            ],
            vec![
                OutputDecl::vector("shaft_power_out", n, SignalUnit::Kilowatt),
                OutputDecl::vector("elec_load", n, SignalUnit::Kilowatt),
                OutputDecl::vector("heat_out", n, SignalUnit::Kilowatt),
                OutputDecl::scalar("component_weight", SignalUnit::Kilogram),
            ],
        )
    }

    fn compute(&self, inputs: &[Vec<f64>]) -> ComponentResult<Vec<Vec<f64>>> {
        check_arity(&self.name, inputs, 2)?;
        let rating = scalar(&inputs[Self::ELEC_POWER_RATING]);

        let load: Vec<f64> = inputs[Self::THROTTLE].iter().map(|t| t * rating).collect();
        let shaft: Vec<f64> = load.iter().map(|p| p * self.efficiency).collect();
        let heat: Vec<f64> = load.iter().map(|p| p * (1.0 - self.efficiency)).collect();

        check_all_finite(&load, "motor electrical load")?;
        Ok(vec![
            shaft,
            load,
            heat,
            vec![sized(rating, self.specific_weight, self.base_weight)],
        ])
    }
}
