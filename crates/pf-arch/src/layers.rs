//! Subsystem layers and the architecture they compose.

use serde::{Deserialize, Serialize};

use crate::element::{
    AcEngineChain, Batteries, DcBus, DcEngineChain, ElecSplitter, Engine, Gearbox, Inverter,
    MechBus, MechSplitter, Motor, Propeller,
};
use crate::error::{ArchError, ArchResult};

/// Either one element repeated on every lane or one optional entry per lane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PerLane<T> {
    Each(Vec<Option<T>>),
    All(T),
}

impl<T> PerLane<T> {
    /// Entry for every lane. A list must have exactly `lanes` entries.
    pub fn resolve(&self, lanes: usize, what: &str) -> ArchResult<Vec<Option<&T>>> {
        match self {
            PerLane::All(item) => Ok(vec![Some(item); lanes]),
            PerLane::Each(items) if items.len() == lanes => Ok(items.iter().map(Option::as_ref).collect()),
            PerLane::Each(items) => Err(ArchError::config(format!(
                "{} {what} given for {lanes} propellers",
                items.len()
            ))),
        }
    }
}

impl<T> From<T> for PerLane<T> {
    fn from(item: T) -> Self {
        PerLane::All(item)
    }
}

/// A single entry or a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> From<T> for OneOrMany<T> {
    fn from(item: T) -> Self {
        OneOrMany::One(item)
    }
}

/// Propellers, one per lane, with optional gearboxes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThrustLayer {
    pub propellers: Vec<Propeller>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gearboxes: Option<Vec<Option<Gearbox>>>,
}

impl ThrustLayer {
    pub fn new(propellers: Vec<Propeller>) -> Self {
        Self {
            propellers,
            gearboxes: None,
        }
    }

    pub fn with_gearboxes(mut self, gearboxes: Vec<Option<Gearbox>>) -> Self {
        self.gearboxes = Some(gearboxes);
        self
    }
}

/// Shaft power sources, replicated next to each propeller.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MechanicalLayer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engines: Option<PerLane<Engine>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub motors: Option<PerLane<Motor>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inverters: Option<PerLane<Inverter>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buses: Option<PerLane<MechBus>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub splitters: Option<PerLane<MechSplitter>>,
}

impl MechanicalLayer {
    pub fn with_engines(mut self, engines: impl Into<PerLane<Engine>>) -> Self {
        self.engines = Some(engines.into());
        self
    }

    pub fn with_motors(mut self, motors: impl Into<PerLane<Motor>>) -> Self {
        self.motors = Some(motors.into());
        self
    }

    pub fn with_inverters(mut self, inverters: impl Into<PerLane<Inverter>>) -> Self {
        self.inverters = Some(inverters.into());
        self
    }

    pub fn with_buses(mut self, buses: impl Into<PerLane<MechBus>>) -> Self {
        self.buses = Some(buses.into());
        self
    }

    pub fn with_splitters(mut self, splitters: impl Into<PerLane<MechSplitter>>) -> Self {
        self.splitters = Some(splitters.into());
        self
    }
}

/// Electrical supply for the motors. Only built when a motor exists.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ElectricalLayer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dc_bus: Option<DcBus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub splitter: Option<ElecSplitter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batteries: Option<OneOrMany<Batteries>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engines_dc: Option<OneOrMany<DcEngineChain>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engines_ac: Option<OneOrMany<AcEngineChain>>,
}

impl ElectricalLayer {
    pub fn with_dc_bus(mut self, bus: DcBus) -> Self {
        self.dc_bus = Some(bus);
        self
    }

    pub fn with_splitter(mut self, splitter: ElecSplitter) -> Self {
        self.splitter = Some(splitter);
        self
    }

    pub fn with_batteries(mut self, batteries: impl Into<OneOrMany<Batteries>>) -> Self {
        self.batteries = Some(batteries.into());
        self
    }

    pub fn with_engines_dc(mut self, chains: impl Into<OneOrMany<DcEngineChain>>) -> Self {
        self.engines_dc = Some(chains.into());
        self
    }
}

/// Full propulsion system description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Architecture {
    pub thrust: ThrustLayer,
    #[serde(default)]
    pub mech: MechanicalLayer,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub electric: Option<ElectricalLayer>,
}

impl Architecture {
    pub fn new(thrust: ThrustLayer, mech: MechanicalLayer) -> Self {
        Self {
            thrust,
            mech,
            electric: None,
        }
    }

    pub fn with_electric(mut self, electric: ElectricalLayer) -> Self {
        self.electric = Some(electric);
        self
    }

    pub fn num_lanes(&self) -> usize {
        self.thrust.propellers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_element_broadcasts_to_every_lane() {
        let engines: PerLane<Engine> = Engine::named("e").into();
        let lanes = engines.resolve(3, "engines").unwrap();
        assert_eq!(lanes.len(), 3);
        assert!(lanes.iter().all(|e| e.is_some_and(|e| e.name == "e")));
    }

    #[test]
    fn list_length_must_match_lanes() {
        let motors = PerLane::Each(vec![Some(Motor::named("m")), None]);
        assert_eq!(motors.resolve(2, "motors").unwrap()[1], None);
        let err = motors.resolve(3, "motors").unwrap_err();
        assert!(matches!(err, ArchError::Configuration { .. }));
    }

    #[test]
    fn per_lane_deserializes_from_map_or_list() {
        let one: PerLane<Engine> = serde_yaml::from_str("name: e\n").unwrap();
        assert!(matches!(one, PerLane::All(_)));

        let each: PerLane<Engine> = serde_yaml::from_str("- name: e1\n- null\n").unwrap();
        match each {
            PerLane::Each(v) => {
                assert_eq!(v.len(), 2);
                assert!(v[1].is_none());
            }
            PerLane::All(_) => panic!("expected a list"),
        }
    }

    #[test]
    fn batteries_accept_one_or_many() {
        let one: OneOrMany<Batteries> = serde_yaml::from_str("name: pack\n").unwrap();
        assert!(matches!(one, OneOrMany::One(_)));
        let many: OneOrMany<Batteries> = serde_yaml::from_str("- name: pack\n").unwrap();
        assert!(matches!(many, OneOrMany::Many(ref v) if v.len() == 1));
    }

    #[test]
    fn architecture_yaml_round_trip() {
        let arch = Architecture::new(
            ThrustLayer::new(vec![Propeller::named("prop1"), Propeller::named("prop2")]),
            MechanicalLayer::default().with_engines(Engine::named("turboshaft")),
        );
        let text = serde_yaml::to_string(&arch).unwrap();
        let back: Architecture = serde_yaml::from_str(&text).unwrap();
        assert_eq!(back, arch);
    }
}
