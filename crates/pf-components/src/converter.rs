//! Power electronics: rectifiers and inverters.

use pf_core::SignalUnit;
use pf_graph::{InputDecl, Interface, OutputDecl};

use crate::common::{check_all_finite, check_arity, check_efficiency, check_non_negative, scalar, sized};
use crate::error::ComponentResult;
use crate::traits::Block;

/// Which side of the converter is driven.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConverterMode {
    /// Input power is known: `out = eta * in` (rectifier feeding a bus).
    Forward,
    /// Output demand is known: `in = out / eta` (inverter behind a motor).
    Inverted,
}

/// Lossy electrical converter sized by its rated power.
#[derive(Clone, Debug)]
pub struct Converter {
    pub name: String,
    pub num_nodes: usize,
    pub mode: ConverterMode,
    pub efficiency: f64,
    pub specific_weight: f64,
    pub base_weight: f64,
    pub cost_inc: f64,
    pub cost_base: f64,
}

impl Converter {
    /// `elec_power_in` (forward) or `elec_power_out` (inverted).
    pub const DRIVEN: usize = 0;
    pub const ELEC_POWER_RATING: usize = 1;

    /// `elec_power_out` (forward) or `elec_power_in` (inverted).
    pub const RESULT: usize = 0;
    pub const HEAT_OUT: usize = 1;
    pub const COMPONENT_WEIGHT: usize = 2;
    pub const COMPONENT_COST: usize = 3;

    pub fn new(
        name: impl Into<String>,
        num_nodes: usize,
        mode: ConverterMode,
        efficiency: f64,
        specific_weight: f64,
        base_weight: f64,
    ) -> ComponentResult<Self> {
        check_efficiency(efficiency, "converter efficiency must be in (0,1]")?;
        check_non_negative(specific_weight, "converter specific weight must be >= 0")?;
        check_non_negative(base_weight, "converter base weight must be >= 0")?;
        Ok(Self {
            name: name.into(),
            num_nodes,
            mode,
            efficiency,
            specific_weight,
            base_weight,
            cost_inc: 0.0,
            cost_base: 0.0,
        })
    }

    pub fn with_cost(mut self, cost_inc: f64, cost_base: f64) -> ComponentResult<Self> {
        check_non_negative(cost_inc, "converter cost increment must be >= 0")?;
        check_non_negative(cost_base, "converter base cost must be >= 0")?;
        self.cost_inc = cost_inc;
        self.cost_base = cost_base;
        Ok(self)
    }

    fn port_names(&self) -> (&'static str, &'static str) {
        match self.mode {
            ConverterMode::Forward => ("elec_power_in", "elec_power_out"),
            ConverterMode::Inverted => ("elec_power_out", "elec_power_in"),
        }
    }
}

impl Block for Converter {
    fn name(&self) -> &str {
        &self.name
    }

    fn interface(&self) -> Interface {
        let n = self.num_nodes;
        let (driven, result) = self.port_names();
        Interface::explicit(
            vec![
                InputDecl::vector(driven, n, SignalUnit::Kilowatt, 0.0).required(),
                InputDecl::scalar("elec_power_rating", SignalUnit::Kilowatt, 100.0),
            ],
            vec![
                OutputDecl::vector(result, n, SignalUnit::Kilowatt),
                OutputDecl::vector("heat_out", n, SignalUnit::Kilowatt),
                OutputDecl::scalar("component_weight", SignalUnit::Kilogram),
                OutputDecl::scalar("component_cost", SignalUnit::Dollar),
            ],
        )
    }

    fn compute(&self, inputs: &[Vec<f64>]) -> ComponentResult<Vec<Vec<f64>>> {
        check_arity(&self.name, inputs, 2)?;
        let rating = scalar(&inputs[Self::ELEC_POWER_RATING]);
        let driven = &inputs[Self::DRIVEN];

        let result: Vec<f64> = match self.mode {
            ConverterMode::Forward => driven.iter().map(|p| p * self.efficiency).collect(),
            ConverterMode::Inverted => driven.iter().map(|p| p / self.efficiency).collect(),
        };
        // heat is the difference between the two sides
        let heat: Vec<f64> = driven
            .iter()
            .zip(&result)
            .map(|(a, b)| (a - b).abs())
            .collect();

        check_all_finite(&result, "converter power")?;
        Ok(vec![
            result,
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
    fn forward_and_inverted_are_inverse() {
        let fwd = Converter::new("r", 1, ConverterMode::Forward, 0.97, 0.1, 0.0).unwrap();
        let inv = Converter::new("i", 1, ConverterMode::Inverted, 0.97, 0.1, 0.0).unwrap();

        let drawn = inv.compute(&[vec![97.0], vec![100.0]]).unwrap();
        assert!((drawn[Converter::RESULT][0] - 100.0).abs() < 1e-9);
        let delivered = fwd.compute(&[vec![100.0], vec![100.0]]).unwrap();
        assert!((delivered[Converter::RESULT][0] - 97.0).abs() < 1e-9);
        assert!((delivered[Converter::HEAT_OUT][0] - 3.0).abs() < 1e-9);
        assert!((delivered[Converter::COMPONENT_WEIGHT][0] - 10.0).abs() < 1e-9);
    }

    #[test]
    fn port_names_follow_mode() {
        let inv = Converter::new("i", 2, ConverterMode::Inverted, 0.97, 0.1, 0.0).unwrap();
        let iface = inv.interface();
        assert_eq!(iface.inputs[Converter::DRIVEN].name, "elec_power_out");
        assert_eq!(iface.outputs[Converter::RESULT].name, "elec_power_in");
    }
}
