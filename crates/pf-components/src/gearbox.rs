//! Reduction gearbox model.

use pf_core::SignalUnit;
use pf_core::conversions::{kw_to_hp, lb_to_kg};
use pf_graph::{InputDecl, Interface, OutputDecl};

use crate::common::{check_all_finite, check_arity, check_efficiency, check_finite, scalar};
use crate::error::{ComponentError, ComponentResult};
use crate::traits::Block;

/// Speed-reducing gearbox between a shaft and a propeller.
///
/// ## Model
///
/// ```text
/// P_out = eta * P_in
/// W_lb  = 26 * P_hp^0.76 * rpm_in^0.13 / rpm_out^0.89
/// ```
///
/// Sizing uses the lowest output speed over the analysis points.
#[derive(Clone, Debug)]
pub struct Gearbox {
    pub name: String,
    pub num_nodes: usize,
    pub efficiency: f64,
}

impl Gearbox {
    pub const SHAFT_POWER_IN: usize = 0;
    pub const SHAFT_SPEED_IN: usize = 1;
    pub const SHAFT_SPEED_OUT: usize = 2;
    pub const SHAFT_POWER_RATING: usize = 3;

    pub const SHAFT_POWER_OUT: usize = 0;
    pub const COMPONENT_WEIGHT: usize = 1;

    pub fn new(name: impl Into<String>, num_nodes: usize, efficiency: f64) -> ComponentResult<Self> {
        check_efficiency(efficiency, "gearbox efficiency must be in (0,1]")?;
        Ok(Self {
            name: name.into(),
            num_nodes,
            efficiency,
        })
    }
}

impl Block for Gearbox {
    fn name(&self) -> &str {
        &self.name
    }

    fn interface(&self) -> Interface {
        let n = self.num_nodes;
        Interface::explicit(
            vec![
                InputDecl::vector("shaft_power_in", n, SignalUnit::Kilowatt, 0.0).required(),
                InputDecl::scalar("shaft_speed_in", SignalUnit::Rpm, 5500.0),
                InputDecl::vector("shaft_speed_out", n, SignalUnit::Rpm, 2000.0),
                InputDecl::scalar("shaft_power_rating", SignalUnit::Kilowatt, 240.0),
            ],
            vec![
                OutputDecl::vector("shaft_power_out", n, SignalUnit::Kilowatt),
                OutputDecl::scalar("component_weight", SignalUnit::Kilogram),
            ],
        )
    }

    fn compute(&self, inputs: &[Vec<f64>]) -> ComponentResult<Vec<Vec<f64>>> {
        check_arity(&self.name, inputs, 4)?;
        let rpm_in = scalar(&inputs[Self::SHAFT_SPEED_IN]);
        let rpm_out = inputs[Self::SHAFT_SPEED_OUT]
            .iter()
            .copied()
            .fold(f64::INFINITY, f64::min);
        if !(rpm_in > 0.0 && rpm_out > 0.0) || rpm_out.is_infinite() {
            return Err(ComponentError::NonPhysical {
                what: "gearbox shaft speeds must be positive",
            });
        }

        let out: Vec<f64> = inputs[Self::SHAFT_POWER_IN]
            .iter()
            .map(|p| p * self.efficiency)
            .collect();

        let hp = kw_to_hp(scalar(&inputs[Self::SHAFT_POWER_RATING]).max(0.0));
        let weight = lb_to_kg(26.0 * hp.powf(0.76) * rpm_in.powf(0.13) / rpm_out.powf(0.89));

        check_all_finite(&out, "gearbox output power")?;
        check_finite(weight, "gearbox weight")?;
        Ok(vec![out, vec![weight]])
    }
}
