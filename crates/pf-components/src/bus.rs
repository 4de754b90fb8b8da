//! Mechanical and electrical buses.

use pf_core::SignalUnit;
use pf_graph::{InputDecl, Interface, OutputDecl};

use crate::common::{check_all_finite, check_arity, check_efficiency, check_non_negative};
use crate::error::{ComponentError, ComponentResult};
use crate::traits::Block;

/// Shaft that merges sources and delivers at a fixed output speed.
///
/// ```text
/// P_out = eta * P_in
/// ```
#[derive(Clone, Debug)]
pub struct MechBus {
    pub name: String,
    pub num_nodes: usize,
    pub efficiency: f64,
    /// rpm
    pub output_rpm: f64,
    pub base_weight: f64,
}

impl MechBus {
    pub const SHAFT_POWER_IN: usize = 0;

    pub const SHAFT_POWER_OUT: usize = 0;
    pub const SHAFT_SPEED_OUT: usize = 1;
    pub const COMPONENT_WEIGHT: usize = 2;

    pub fn new(
        name: impl Into<String>,
        num_nodes: usize,
        efficiency: f64,
        output_rpm: f64,
    ) -> ComponentResult<Self> {
        check_efficiency(efficiency, "mechanical bus efficiency must be in (0,1]")?;
        if !(output_rpm > 0.0) {
            return Err(ComponentError::InvalidArg {
                what: "mechanical bus output rpm must be positive",
            });
        }
        Ok(Self {
            name: name.into(),
            num_nodes,
            efficiency,
            output_rpm,
            base_weight: 0.0,
        })
    }

    pub fn with_base_weight(mut self, base_weight: f64) -> ComponentResult<Self> {
        check_non_negative(base_weight, "mechanical bus base weight must be >= 0")?;
        self.base_weight = base_weight;
        Ok(self)
    }
}

impl Block for MechBus {
    fn name(&self) -> &str {
        &self.name
    }

    fn interface(&self) -> Interface {
        let n = self.num_nodes;
        Interface::explicit(
            vec![InputDecl::vector("shaft_power_in", n, SignalUnit::Kilowatt, 0.0).required()],
            vec![
                OutputDecl::vector("shaft_power_out", n, SignalUnit::Kilowatt),
                OutputDecl::scalar("shaft_speed_out", SignalUnit::Rpm),
                OutputDecl::scalar("component_weight", SignalUnit::Kilogram),
            ],
        )
    }

    fn compute(&self, inputs: &[Vec<f64>]) -> ComponentResult<Vec<Vec<f64>>> {
        check_arity(&self.name, inputs, 1)?;
        let out: Vec<f64> = inputs[Self::SHAFT_POWER_IN]
            .iter()
            .map(|p| p * self.efficiency)
            .collect();
        check_all_finite(&out, "mechanical bus power")?;
        Ok(vec![out, vec![self.output_rpm], vec![self.base_weight]])
    }
}

/// DC bus evaluated from its demand side: `P_in = P_out / eta`.
#[derive(Clone, Debug)]
pub struct DcBus {
    pub name: String,
    pub num_nodes: usize,
    pub efficiency: f64,
    pub base_weight: f64,
}

impl DcBus {
    pub const ELEC_POWER_OUT: usize = 0;

    pub const ELEC_POWER_IN: usize = 0;
    pub const HEAT_OUT: usize = 1;
    pub const COMPONENT_WEIGHT: usize = 2;

    pub fn new(name: impl Into<String>, num_nodes: usize, efficiency: f64) -> ComponentResult<Self> {
        check_efficiency(efficiency, "DC bus efficiency must be in (0,1]")?;
        Ok(Self {
            name: name.into(),
            num_nodes,
            efficiency,
            base_weight: 0.0,
        })
    }

    pub fn with_base_weight(mut self, base_weight: f64) -> ComponentResult<Self> {
        check_non_negative(base_weight, "DC bus base weight must be >= 0")?;
        self.base_weight = base_weight;
        Ok(self)
    }
}

impl Block for DcBus {
    fn name(&self) -> &str {
        &self.name
    }

    fn interface(&self) -> Interface {
        let n = self.num_nodes;
        Interface::explicit(
            vec![InputDecl::vector("elec_power_out", n, SignalUnit::Kilowatt, 0.0).required()],
            vec![
                OutputDecl::vector("elec_power_in", n, SignalUnit::Kilowatt),
                OutputDecl::vector("heat_out", n, SignalUnit::Kilowatt),
                OutputDecl::scalar("component_weight", SignalUnit::Kilogram),
            ],
        )
    }

    fn compute(&self, inputs: &[Vec<f64>]) -> ComponentResult<Vec<Vec<f64>>> {
        check_arity(&self.name, inputs, 1)?;
        let demand = &inputs[Self::ELEC_POWER_OUT];
        let drawn: Vec<f64> = demand.iter().map(|p| p / self.efficiency).collect();
        let heat: Vec<f64> = drawn.iter().zip(demand).map(|(i, o)| i - o).collect();
        check_all_finite(&drawn, "DC bus power")?;
        Ok(vec![drawn, heat, vec![self.base_weight]])
    }
}
