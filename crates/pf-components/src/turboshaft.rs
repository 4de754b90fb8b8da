//! Turboshaft engine model.

use pf_core::SignalUnit;
use pf_core::conversions::psfc_to_kg_per_kw_s;
use pf_graph::{InputDecl, Interface, OutputDecl};

use crate::common::{check_all_finite, check_arity, check_non_negative, scalar, sized};
use crate::error::{ComponentError, ComponentResult};
use crate::traits::Block;

/// Fuel-burning shaft power source.
///
/// ## Model
///
/// ```text
/// P_shaft   = throttle * P_rated
/// mdot_fuel = psfc * P_shaft
/// W         = P_rated * w_specific + w_base
/// ```
///
/// Shaft power is strictly increasing in throttle, so the engine can be
/// throttled by a power balance.
#[derive(Clone, Debug)]
pub struct Turboshaft {
    pub name: String,
    pub num_nodes: usize,
    /// Power specific fuel consumption, kg/(kW·s)
    pub psfc: f64,
    /// kg per kW of rating
    pub specific_weight: f64,
    /// kg
    pub base_weight: f64,
}

impl Turboshaft {
    pub const THROTTLE: usize = 0;
    pub const SHAFT_POWER_RATING: usize = 1;

    pub const SHAFT_POWER_OUT: usize = 0;
    pub const FUEL_FLOW: usize = 1;
    pub const COMPONENT_WEIGHT: usize = 2;

    /// Create a turboshaft.
    ///
    /// `psfc_lb_per_hp_hr` is the catalogue fuel consumption in lb/(hp·h).
    pub fn new(
        name: impl Into<String>,
        num_nodes: usize,
        psfc_lb_per_hp_hr: f64,
        specific_weight: f64,
        base_weight: f64,
    ) -> ComponentResult<Self> {
        if !(psfc_lb_per_hp_hr > 0.0) {
            return Err(ComponentError::InvalidArg {
                what: "psfc must be positive",
            });
        }
        check_non_negative(specific_weight, "engine specific weight must be >= 0")?;
        check_non_negative(base_weight, "engine base weight must be >= 0")?;
        Ok(Self {
            name: name.into(),
            num_nodes,
            psfc: psfc_to_kg_per_kw_s(psfc_lb_per_hp_hr),
            specific_weight,
            base_weight,
        })
    }
}

impl Block for Turboshaft {
    fn name(&self) -> &str {
        &self.name
    }

    fn interface(&self) -> Interface {
        let n = self.num_nodes;
        Interface::explicit(
            vec![
                InputDecl::vector("throttle", n, SignalUnit::Unitless, 0.0).required(),
                InputDecl::scalar("shaft_power_rating", SignalUnit::Kilowatt, 260.0),
            ],
            vec![
                OutputDecl::vector("shaft_power_out", n, SignalUnit::Kilowatt),
                OutputDecl::vector("fuel_flow", n, SignalUnit::KilogramPerSecond),
                OutputDecl::scalar("component_weight", SignalUnit::Kilogram),
            ],
        )
    }

    fn compute(&self, inputs: &[Vec<f64>]) -> ComponentResult<Vec<Vec<f64>>> {
        check_arity(&self.name, inputs, 2)?;
        let rating = scalar(&inputs[Self::SHAFT_POWER_RATING]);

        let shaft: Vec<f64> = inputs[Self::THROTTLE].iter().map(|t| t * rating).collect();
        let fuel: Vec<f64> = shaft.iter().map(|p| p * self.psfc).collect();
        let weight = sized(rating, self.specific_weight, self.base_weight);

        check_all_finite(&shaft, "turboshaft shaft power")?;
        check_all_finite(&fuel, "turboshaft fuel flow")?;
        Ok(vec![shaft, fuel, vec![weight]])
    }
}
