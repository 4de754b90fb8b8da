//! Hardware element definitions.
//!
//! Elements are plain parameter records. They carry no wiring: a lane or
//! layer decides where an element sits, and identity is by position, never
//! by value. Every field has a default so case files only need to list what
//! differs from the catalogue values.

use serde::{Deserialize, Serialize};

macro_rules! named {
    ($($ty:ident),* $(,)?) => {
        $(
            impl $ty {
                /// Catalogue defaults under the given name.
                pub fn named(name: impl Into<String>) -> Self {
                    Self {
                        name: name.into(),
                        ..Self::default()
                    }
                }
            }
        )*
    };
}

named!(
    Propeller,
    Gearbox,
    Engine,
    Motor,
    Inverter,
    MechBus,
    MechSplitter,
    DcBus,
    ElecSplitter,
    Batteries,
    Generator,
    Rectifier,
);

/// Fixed-pitch propeller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Propeller {
    pub name: String,
    pub blades: u32,
    pub diameter_m: f64,
    pub power_rating_kw: f64,
    /// Speed used when the operating conditions do not override it.
    pub default_rpm: f64,
    pub design_efficiency: f64,
}

impl Default for Propeller {
    fn default() -> Self {
        Self {
            name: "prop".into(),
            blades: 4,
            diameter_m: 2.5,
            power_rating_kw: 240.0,
            default_rpm: 2000.0,
            design_efficiency: 0.85,
        }
    }
}

/// Reduction gearbox. Output speed follows the propeller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Gearbox {
    pub name: String,
    pub input_rpm: f64,
    pub efficiency: f64,
}

impl Default for Gearbox {
    fn default() -> Self {
        Self {
            name: "gearbox".into(),
            input_rpm: 5500.0,
            efficiency: 0.98,
        }
    }
}

/// Turboshaft engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Engine {
    pub name: String,
    pub power_rating_kw: f64,
    pub specific_weight_kg_per_kw: f64,
    pub base_weight_kg: f64,
    pub psfc_lb_per_hp_hr: f64,
    pub output_rpm: f64,
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            name: "turboshaft".into(),
            power_rating_kw: 260.0,
            specific_weight_kg_per_kw: 0.14,
            base_weight_kg: 104.0,
            psfc_lb_per_hp_hr: 0.6,
            output_rpm: 6000.0,
        }
    }
}

/// Electric motor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Motor {
    pub name: String,
    pub power_rating_kw: f64,
    pub efficiency: f64,
    pub specific_weight_kg_per_kw: f64,
    pub base_weight_kg: f64,
    pub output_rpm: f64,
}

impl Default for Motor {
    fn default() -> Self {
        Self {
            name: "elec_motor".into(),
            power_rating_kw: 260.0,
            efficiency: 0.97,
            specific_weight_kg_per_kw: 0.2,
            base_weight_kg: 0.0,
            output_rpm: 5500.0,
        }
    }
}

/// DC to AC inverter feeding a motor. Sized from the motor rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Inverter {
    pub name: String,
    pub efficiency: f64,
    pub specific_weight_kg_per_kw: f64,
    pub base_weight_kg: f64,
}

impl Default for Inverter {
    fn default() -> Self {
        Self {
            name: "inverter".into(),
            efficiency: 0.97,
            specific_weight_kg_per_kw: 0.1,
            base_weight_kg: 0.0,
        }
    }
}

/// Mechanical bus merging engine and motor shafts in a parallel hybrid lane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MechBus {
    pub name: String,
    pub efficiency: f64,
    pub output_rpm: f64,
    pub base_weight_kg: f64,
}

impl Default for MechBus {
    fn default() -> Self {
        Self {
            name: "mech_bus".into(),
            efficiency: 0.95,
            output_rpm: 5500.0,
            base_weight_kg: 0.0,
        }
    }
}

/// Mechanical power splitter. Output A goes to the motor, B to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MechSplitter {
    pub name: String,
    /// Fraction of lane power carried by the motor.
    #[serde(rename = "mech_DoH")]
    pub mech_doh: f64,
    pub efficiency: f64,
    pub power_rating_kw: f64,
}

impl Default for MechSplitter {
    fn default() -> Self {
        Self {
            name: "mech_split".into(),
            mech_doh: 0.5,
            efficiency: 1.0,
            power_rating_kw: 99_999.999,
        }
    }
}

/// DC bus, evaluated from the demand side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DcBus {
    pub name: String,
    pub efficiency: f64,
}

impl Default for DcBus {
    fn default() -> Self {
        Self {
            name: "dc_bus".into(),
            efficiency: 0.99,
        }
    }
}

/// Electrical power splitter. Output A goes to the battery, B to the engine chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ElecSplitter {
    pub name: String,
    /// Fraction of electrical demand carried by the battery.
    #[serde(rename = "elec_DoH")]
    pub elec_doh: f64,
    /// Kept at 1; losses belong to the DC bus.
    pub efficiency: f64,
    pub power_rating_kw: f64,
}

impl Default for ElecSplitter {
    fn default() -> Self {
        Self {
            name: "elec_split".into(),
            elec_doh: 0.5,
            efficiency: 1.0,
            power_rating_kw: 99_999.999,
        }
    }
}

/// Battery pack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Batteries {
    pub name: String,
    pub weight_kg: f64,
    pub specific_power_w_per_kg: f64,
    pub specific_energy_wh_per_kg: f64,
    pub efficiency: f64,
    pub cost_inc: f64,
    pub cost_base: f64,
}

impl Default for Batteries {
    fn default() -> Self {
        Self {
            name: "bat_pack".into(),
            weight_kg: 1000.0,
            specific_power_w_per_kg: 5000.0,
            specific_energy_wh_per_kg: 300.0,
            efficiency: 0.97,
            cost_inc: 50.0,
            cost_base: 1.0,
        }
    }
}

/// Generator driven by a chain engine. Sized from the engine rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Generator {
    pub name: String,
    pub efficiency: f64,
    pub specific_weight_kg_per_kw: f64,
    pub base_weight_kg: f64,
    pub cost_inc: f64,
    pub cost_base: f64,
}

impl Default for Generator {
    fn default() -> Self {
        Self {
            name: "generator".into(),
            efficiency: 0.97,
            specific_weight_kg_per_kw: 0.2,
            base_weight_kg: 0.0,
            cost_inc: 100.0 / 745.0,
            cost_base: 1.0,
        }
    }
}

/// AC to DC rectifier after a generator. Sized from the engine rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Rectifier {
    pub name: String,
    pub efficiency: f64,
    pub specific_weight_kg_per_kw: f64,
    pub base_weight_kg: f64,
    pub cost_inc: f64,
    pub cost_base: f64,
}

impl Default for Rectifier {
    fn default() -> Self {
        Self {
            name: "rectifier".into(),
            efficiency: 0.97,
            specific_weight_kg_per_kw: 0.1,
            base_weight_kg: 0.0,
            cost_inc: 100.0 / 745.0,
            cost_base: 1.0,
        }
    }
}

/// Engine, generator and rectifier producing DC power.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DcEngineChain {
    pub engine: Engine,
    pub generator: Generator,
    pub rectifier: Rectifier,
}

/// Engine and generator feeding an AC network. Recognized but not supported.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AcEngineChain {
    pub engine: Engine,
    pub generator: Generator,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_keeps_catalogue_defaults() {
        let e = Engine::named("left_engine");
        assert_eq!(e.name, "left_engine");
        assert_eq!(e.power_rating_kw, 260.0);
        assert_eq!(e.output_rpm, 6000.0);
    }

    #[test]
    fn yaml_fills_missing_fields() {
        let s: MechSplitter = serde_yaml::from_str("name: split\nmech_DoH: 0.3\n").unwrap();
        assert_eq!(s.mech_doh, 0.3);
        assert_eq!(s.efficiency, 1.0);

        let chain: DcEngineChain =
            serde_yaml::from_str("engine: {name: gen_engine, power_rating_kw: 400}\n").unwrap();
        assert_eq!(chain.engine.power_rating_kw, 400.0);
        assert_eq!(chain.rectifier.name, "rectifier");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(serde_yaml::from_str::<Motor>("name: m\nrating: 10\n").is_err());
    }
}
