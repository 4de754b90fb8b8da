//! Battery with state-of-charge tracking.

use pf_core::SignalUnit;
use pf_core::conversions::wh_per_kg_to_kj_per_kg;
use pf_graph::{InputDecl, Interface, OutputDecl};

use crate::common::{check_all_finite, check_arity, check_efficiency, check_non_negative, scalar, sized};
use crate::error::{ComponentError, ComponentResult};
use crate::traits::Block;

/// Battery pack that supplies whatever load is asked of it.
///
/// ## Model
///
/// ```text
/// E_max    = W * e_specific
/// dSOC/dt  = -P_load / E_max
/// SOC[0]   = SOC_initial
/// SOC[i]   = SOC[i-1] + dt/2 * (dSOC[i-1] + dSOC[i]),  dt = duration / (n - 1)
/// ```
///
/// Heat rejected is `P_load * (1 - eta)`.
#[derive(Clone, Debug)]
pub struct SocBattery {
    pub name: String,
    pub num_nodes: usize,
    /// kJ/kg
    pub specific_energy: f64,
    /// kW/kg
    pub specific_power: f64,
    pub efficiency: f64,
    pub initial_soc: f64,
    pub cost_inc: f64,
    pub cost_base: f64,
}

impl SocBattery {
    pub const ELEC_LOAD: usize = 0;
    pub const DURATION: usize = 1;
    pub const BATTERY_WEIGHT: usize = 2;

    pub const SOC: usize = 0;
    pub const MAX_ENERGY: usize = 1;
    pub const MAX_POWER: usize = 2;
    pub const HEAT_OUT: usize = 3;
    pub const COMPONENT_WEIGHT: usize = 4;
    pub const COMPONENT_COST: usize = 5;

    /// `specific_energy_wh_per_kg` in Wh/kg, `specific_power_w_per_kg` in W/kg.
    pub fn new(
        name: impl Into<String>,
        num_nodes: usize,
        specific_energy_wh_per_kg: f64,
        specific_power_w_per_kg: f64,
        efficiency: f64,
    ) -> ComponentResult<Self> {
        if !(specific_energy_wh_per_kg > 0.0) {
            return Err(ComponentError::InvalidArg {
                what: "battery specific energy must be positive",
            });
        }
        check_non_negative(specific_power_w_per_kg, "battery specific power must be >= 0")?;
        check_efficiency(efficiency, "battery efficiency must be in (0,1]")?;
        Ok(Self {
            name: name.into(),
            num_nodes,
            specific_energy: wh_per_kg_to_kj_per_kg(specific_energy_wh_per_kg),
            specific_power: specific_power_w_per_kg / 1000.0,
            efficiency,
            initial_soc: 1.0,
            cost_inc: 0.0,
            cost_base: 0.0,
        })
    }

    pub fn with_cost(mut self, cost_inc: f64, cost_base: f64) -> ComponentResult<Self> {
        check_non_negative(cost_inc, "battery cost increment must be >= 0")?;
        check_non_negative(cost_base, "battery base cost must be >= 0")?;
        self.cost_inc = cost_inc;
        self.cost_base = cost_base;
        Ok(self)
    }
}

impl Block for SocBattery {
    fn name(&self) -> &str {
        &self.name
    }

    fn interface(&self) -> Interface {
        let n = self.num_nodes;
        Interface::explicit(
            vec![
                InputDecl::vector("elec_load", n, SignalUnit::Kilowatt, 0.0).required(),
                InputDecl::scalar("duration", SignalUnit::Second, 1.0),
                InputDecl::scalar("battery_weight", SignalUnit::Kilogram, 1000.0),
            ],
            vec![
                OutputDecl::vector("SOC", n, SignalUnit::Unitless).with_initial(self.initial_soc),
                OutputDecl::scalar("max_energy", SignalUnit::Kilojoule),
                OutputDecl::scalar("max_power", SignalUnit::Kilowatt),
                OutputDecl::vector("heat_out", n, SignalUnit::Kilowatt),
                OutputDecl::scalar("component_weight", SignalUnit::Kilogram),
                OutputDecl::scalar("component_cost", SignalUnit::Dollar),
            ],
        )
    }

    fn compute(&self, inputs: &[Vec<f64>]) -> ComponentResult<Vec<Vec<f64>>> {
        check_arity(&self.name, inputs, 3)?;
        let load = &inputs[Self::ELEC_LOAD];
        let duration = scalar(&inputs[Self::DURATION]);
        let weight = scalar(&inputs[Self::BATTERY_WEIGHT]);

        let max_energy = weight * self.specific_energy;
        if !(max_energy > 0.0) {
            return Err(ComponentError::NonPhysical {
                what: "battery capacity must be positive",
            });
        }

        let n = load.len();
        let dt = if n > 1 { duration / (n - 1) as f64 } else { 0.0 };
        let rate: Vec<f64> = load.iter().map(|p| -p / max_energy).collect();

        let mut soc = Vec::with_capacity(n);
        let mut current = self.initial_soc;
        for i in 0..n {
            if i > 0 {
                current += 0.5 * dt * (rate[i - 1] + rate[i]);
            }
            soc.push(current);
        }
        let heat: Vec<f64> = load.iter().map(|p| p * (1.0 - self.efficiency)).collect();

        check_all_finite(&soc, "battery state of charge")?;
        Ok(vec![
            soc,
            vec![max_energy],
            vec![weight * self.specific_power],
            heat,
            vec![weight],
            vec![sized(weight, self.cost_inc, self.cost_base)],
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_load_depletes_linearly() {
        // 100 kg at 300 Wh/kg = 108 000 kJ; 100 kW for 300 s = 30 000 kJ
        let b = SocBattery::new("bat", 11, 300.0, 5000.0, 0.97).unwrap();
        let out = b
            .compute(&[vec![100.0; 11], vec![300.0], vec![100.0]])
            .unwrap();
        let soc = &out[SocBattery::SOC];
        assert_eq!(soc[0], 1.0);
        assert!((soc[10] - (1.0 - 30_000.0 / 108_000.0)).abs() < 1e-12);
        assert!((soc[5] - (1.0 - 15_000.0 / 108_000.0)).abs() < 1e-12);
        assert!((out[SocBattery::MAX_ENERGY][0] - 108_000.0).abs() < 1e-9);
        assert!((out[SocBattery::MAX_POWER][0] - 500.0).abs() < 1e-9);
        assert_eq!(out[SocBattery::COMPONENT_WEIGHT], vec![100.0]);
    }

    #[test]
    fn single_point_stays_full() {
        let b = SocBattery::new("bat", 1, 300.0, 5000.0, 0.97).unwrap();
        let out = b.compute(&[vec![50.0], vec![300.0], vec![100.0]]).unwrap();
        assert_eq!(out[SocBattery::SOC], vec![1.0]);
    }

    #[test]
    fn zero_weight_is_non_physical() {
        let b = SocBattery::new("bat", 2, 300.0, 5000.0, 0.97).unwrap();
        let err = b.compute(&[vec![1.0, 1.0], vec![1.0], vec![0.0]]).unwrap_err();
        assert!(matches!(err, ComponentError::NonPhysical { .. }));
    }
}
