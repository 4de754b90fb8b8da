//! Topology resolution.
//!
//! Every lane and the electrical layer are resolved to one closed variant
//! before any node is created, so a configuration error never leaves a
//! partial graph behind.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;
use tracing::{debug, warn};

use crate::element::{
    Batteries, DcBus, DcEngineChain, ElecSplitter, Engine, Gearbox, Inverter, MechBus,
    MechSplitter, Motor, Propeller,
};
use crate::error::{ArchError, ArchResult};
use crate::layers::{Architecture, ElectricalLayer, OneOrMany};

/// Lane whose `propulsor_active` flag is honoured (zero-based).
///
/// Failure is modelled on exactly the second instantiated lane.
pub const OEI_LANE: usize = 1;

/// Shaft power source of one lane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LaneSource<'a> {
    EngineOnly {
        engine: &'a Engine,
    },
    MotorOnly {
        motor: &'a Motor,
        inverter: Option<&'a Inverter>,
    },
    ParallelHybrid {
        engine: &'a Engine,
        motor: &'a Motor,
        inverter: Option<&'a Inverter>,
        bus: &'a MechBus,
        splitter: &'a MechSplitter,
    },
}

impl LaneSource<'_> {
    pub fn kind(&self) -> LaneKind {
        match self {
            LaneSource::EngineOnly { .. } => LaneKind::EngineOnly,
            LaneSource::MotorOnly { .. } => LaneKind::MotorOnly,
            LaneSource::ParallelHybrid { .. } => LaneKind::ParallelHybrid,
        }
    }

    pub fn has_motor(&self) -> bool {
        !matches!(self, LaneSource::EngineOnly { .. })
    }
}

/// Shape of a resolved lane, without the element data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LaneKind {
    EngineOnly,
    MotorOnly,
    ParallelHybrid,
}

impl fmt::Display for LaneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LaneKind::EngineOnly => "engine only",
            LaneKind::MotorOnly => "motor only",
            LaneKind::ParallelHybrid => "parallel hybrid",
        })
    }
}

/// One propeller and its dedicated mechanical chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LanePlan<'a> {
    pub index: usize,
    pub propeller: &'a Propeller,
    pub gearbox: Option<&'a Gearbox>,
    pub source: LaneSource<'a>,
}

impl LanePlan<'_> {
    /// Thrust group name (`thrust1`, `thrust2`, ...).
    pub fn thrust_group(&self) -> String {
        format!("thrust{}", self.index + 1)
    }

    /// Mechanical sub-scope name (`mech1`, `mech2`, ...).
    pub fn mech_scope(&self) -> String {
        format!("mech{}", self.index + 1)
    }

    pub fn is_oei(&self) -> bool {
        self.index == OEI_LANE
    }
}

/// Electrical supply topology.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ElectricSource<'a> {
    Battery {
        bus: Option<&'a DcBus>,
        battery: &'a Batteries,
    },
    Turboelectric {
        bus: Option<&'a DcBus>,
        chain: &'a DcEngineChain,
    },
    SeriesHybrid {
        bus: &'a DcBus,
        splitter: &'a ElecSplitter,
        battery: &'a Batteries,
        chain: &'a DcEngineChain,
    },
}

impl ElectricSource<'_> {
    pub fn kind(&self) -> ElectricKind {
        match self {
            ElectricSource::Battery { .. } => ElectricKind::Battery,
            ElectricSource::Turboelectric { .. } => ElectricKind::Turboelectric,
            ElectricSource::SeriesHybrid { .. } => ElectricKind::SeriesHybrid,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ElectricKind {
    Battery,
    Turboelectric,
    SeriesHybrid,
}

impl fmt::Display for ElectricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ElectricKind::Battery => "battery",
            ElectricKind::Turboelectric => "turboelectric",
            ElectricKind::SeriesHybrid => "series hybrid",
        })
    }
}

/// Resolved architecture, borrowed from its definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan<'a> {
    pub lanes: Vec<LanePlan<'a>>,
    pub electric: Option<ElectricSource<'a>>,
}

impl Plan<'_> {
    pub fn needs_electric(&self) -> bool {
        self.lanes.iter().any(|l| l.source.has_motor())
    }
}

/// Resolve every lane and, if any lane has a motor, the electrical layer.
pub fn resolve(arch: &Architecture) -> ArchResult<Plan<'_>> {
    let n_lanes = arch.num_lanes();
    if n_lanes == 0 {
        return Err(ArchError::config("at least one propeller is required"));
    }

    let gearboxes: Vec<Option<&Gearbox>> = match &arch.thrust.gearboxes {
        None => vec![None; n_lanes],
        Some(list) if list.len() == n_lanes => list.iter().map(Option::as_ref).collect(),
        Some(list) => {
            return Err(ArchError::config(format!(
                "{} gearboxes given for {n_lanes} propellers",
                list.len()
            )));
        }
    };

    let mech = &arch.mech;
    let engines = per_lane(&mech.engines, n_lanes, "engines")?;
    let motors = per_lane(&mech.motors, n_lanes, "motors")?;
    let inverters = per_lane(&mech.inverters, n_lanes, "inverters")?;
    let buses = per_lane(&mech.buses, n_lanes, "mechanical buses")?;
    let splitters = per_lane(&mech.splitters, n_lanes, "mechanical splitters")?;

    let mut lanes = Vec::with_capacity(n_lanes);
    for (index, propeller) in arch.thrust.propellers.iter().enumerate() {
        let lane = index + 1;
        let source = match (engines[index], motors[index]) {
            (None, None) => {
                return Err(ArchError::config(format!(
                    "either an engine or a motor is required on lane {lane}"
                )));
            }
            (_, None) if inverters[index].is_some() => {
                return Err(ArchError::config(format!(
                    "inverter on lane {lane} has no motor"
                )));
            }
            (Some(engine), None) => {
                single_source_only(buses[index], splitters[index], lane)?;
                LaneSource::EngineOnly { engine }
            }
            (None, Some(motor)) => {
                single_source_only(buses[index], splitters[index], lane)?;
                LaneSource::MotorOnly {
                    motor,
                    inverter: inverters[index],
                }
            }
            (Some(engine), Some(motor)) => match (buses[index], splitters[index]) {
                (Some(bus), Some(splitter)) => LaneSource::ParallelHybrid {
                    engine,
                    motor,
                    inverter: inverters[index],
                    bus,
                    splitter,
                },
                _ => {
                    return Err(ArchError::config(format!(
                        "engine and motor on lane {lane} need both a mechanical bus and a splitter"
                    )));
                }
            },
        };

        let plan = LanePlan {
            index,
            propeller,
            gearbox: gearboxes[index],
            source,
        };
        check_lane_names(&plan)?;
        debug!(lane, kind = %source.kind(), oei = plan.is_oei(), "resolved lane");
        lanes.push(plan);
    }

    let mut plan = Plan {
        lanes,
        electric: None,
    };
    if plan.needs_electric() {
        let layer = arch.electric.as_ref().ok_or_else(|| {
            ArchError::config("electrical power is needed but no electrical layer is defined")
        })?;
        let source = resolve_electric(layer)?;
        check_electric_names(&source)?;
        debug!(kind = %source.kind(), "resolved electrical layer");
        plan.electric = Some(source);
    }
    Ok(plan)
}

fn per_lane<'a, T>(
    field: &'a Option<crate::layers::PerLane<T>>,
    lanes: usize,
    what: &str,
) -> ArchResult<Vec<Option<&'a T>>> {
    match field {
        Some(items) => items.resolve(lanes, what),
        None => Ok(vec![None; lanes]),
    }
}

fn single_source_only(bus: Option<&MechBus>, splitter: Option<&MechSplitter>, lane: usize) -> ArchResult<()> {
    if bus.is_some() || splitter.is_some() {
        return Err(ArchError::config(format!(
            "mechanical bus and splitter on lane {lane} need both an engine and a motor"
        )));
    }
    Ok(())
}

fn resolve_electric(layer: &ElectricalLayer) -> ArchResult<ElectricSource<'_>> {
    if layer.engines_ac.is_some() {
        return Err(ArchError::unimplemented("AC engine chains"));
    }

    let battery = match &layer.batteries {
        None => None,
        Some(OneOrMany::One(battery)) => Some(battery),
        Some(OneOrMany::Many(list)) => {
            return Err(match list.len() {
                0 => ArchError::config("battery pack list cannot be empty"),
                1 => ArchError::config("give a single battery pack directly, not as a one-element list"),
                _ => ArchError::unimplemented("multiple battery packs"),
            });
        }
    };

    let chain = match &layer.engines_dc {
        None => None,
        Some(OneOrMany::One(chain)) => Some(chain),
        Some(OneOrMany::Many(list)) => match list.as_slice() {
            [] => return Err(ArchError::config("DC engine chain list cannot be empty")),
            [chain] => Some(chain),
            _ => return Err(ArchError::unimplemented("multiple DC engine chains")),
        },
    };

    match (layer.dc_bus.as_ref(), &layer.splitter, battery, chain) {
        (None, Some(_), _, _) => Err(ArchError::config("an electrical splitter requires a DC bus")),
        (Some(bus), Some(splitter), Some(battery), Some(chain)) => Ok(ElectricSource::SeriesHybrid {
            bus,
            splitter,
            battery,
            chain,
        }),
        (_, Some(_), _, _) => Err(ArchError::config(
            "an electrical splitter requires both batteries and a DC engine chain",
        )),
        (_, None, Some(_), Some(_)) => Err(ArchError::config(
            "batteries and a DC engine chain together require an electrical splitter",
        )),
        (bus, None, Some(battery), None) => {
            if bus.is_none() {
                warn!(
                    battery = %battery.name,
                    "motor load is connected directly to the battery without a DC bus"
                );
            }
            Ok(ElectricSource::Battery { bus, battery })
        }
        (bus, None, None, Some(chain)) => Ok(ElectricSource::Turboelectric { bus, chain }),
        (_, None, None, None) => Err(ArchError::config(
            "the electrical layer needs batteries or a DC engine chain",
        )),
    }
}

fn check_lane_names(lane: &LanePlan<'_>) -> ArchResult<()> {
    let mut thrust = vec![lane.propeller.name.as_str()];
    thrust.extend(lane.gearbox.map(|g| g.name.as_str()));
    check_scope(&lane.thrust_group(), &thrust)?;

    let mech: Vec<&str> = match lane.source {
        LaneSource::EngineOnly { engine } => vec![engine.name.as_str()],
        LaneSource::MotorOnly { motor, inverter } => {
            let mut names = vec![motor.name.as_str()];
            names.extend(inverter.map(|i| i.name.as_str()));
            names
        }
        LaneSource::ParallelHybrid {
            engine,
            motor,
            inverter,
            bus,
            splitter,
        } => {
            let mut names = vec![
                engine.name.as_str(),
                motor.name.as_str(),
                bus.name.as_str(),
                splitter.name.as_str(),
            ];
            names.extend(inverter.map(|i| i.name.as_str()));
            names
        }
    };
    check_scope(&lane.mech_scope(), &mech)
}

fn check_electric_names(source: &ElectricSource<'_>) -> ArchResult<()> {
    let mut names = Vec::new();
    let chain_names = |chain: &DcEngineChain| {
        [
            chain.engine.name.clone(),
            chain.generator.name.clone(),
            chain.rectifier.name.clone(),
        ]
    };
    match source {
        ElectricSource::Battery { bus, battery } => {
            names.extend(bus.map(|b| b.name.clone()));
            names.push(battery.name.clone());
        }
        ElectricSource::Turboelectric { bus, chain } => {
            names.extend(bus.map(|b| b.name.clone()));
            names.extend(chain_names(chain));
        }
        ElectricSource::SeriesHybrid {
            bus,
            splitter,
            battery,
            chain,
        } => {
            names.push(bus.name.clone());
            names.push(splitter.name.clone());
            names.push(battery.name.clone());
            names.extend(chain_names(chain));
        }
    }
    let names: Vec<&str> = names.iter().map(String::as_str).collect();
    check_scope("elec", &names)
}

/// Node and alias names the layer builders place next to user elements.
const RESERVED_NAMES: &[&str] = &[
    "in_collect",
    "bat_in_collect",
    "eng_in_collect",
    "splitter_in_collect",
    "thrust",
    "weight",
    "fuel_flow",
    "SOC",
    "electric_load",
    "motors_elec_power",
    "combined_rating",
    "rated_power",
    "total_power",
    "motor_rating_active",
    "doh_active",
];

fn is_reserved(name: &str) -> bool {
    RESERVED_NAMES.contains(&name)
        || name.starts_with("failed_")
        || name.ends_with("_sum")
        || name.ends_with("_throttle_set")
}

/// Element names become path segments: non-empty, no dots, unique per scope,
/// and clear of the builders' own node names.
fn check_scope(scope: &str, names: &[&str]) -> ArchResult<()> {
    let mut seen = BTreeSet::new();
    for name in names {
        if name.is_empty() || name.contains('.') {
            return Err(ArchError::config(format!(
                "element name '{name}' in {scope} must be non-empty and contain no '.'"
            )));
        }
        if is_reserved(name) {
            return Err(ArchError::config(format!(
                "element name '{name}' in {scope} is reserved for a generated node"
            )));
        }
        if !seen.insert(*name) {
            return Err(ArchError::config(format!(
                "element name '{name}' is used twice in {scope}"
            )));
        }
    }
    Ok(())
}
