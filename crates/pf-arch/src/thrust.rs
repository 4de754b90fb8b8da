//! Thrust lanes: propeller with an optional reduction gearbox.

use pf_components::{Gearbox, Propeller};
use pf_core::{PortId, SignalId, SignalUnit};
use pf_graph::InputDecl;

use crate::aggregate::sum_node;
use crate::error::ArchResult;
use crate::model::{Collected, ModelBuilder, element, path};
use crate::topology::LanePlan;

pub const RPM: &str = "rpm";
pub const DURATION: &str = "duration";
pub const RHO: &str = "fltcond|rho";
pub const TAS: &str = "fltcond|Utrue";
pub const SHAFT_POWER: &str = "shaft_power";
pub const SHAFT_SPEED: &str = "shaft_speed";
pub const RATED_POWER: &str = "rated_power";

/// Ports and outputs of one built thrust lane.
#[derive(Debug, Clone)]
pub struct ThrustLane {
    pub group: String,
    pub inputs: Collected,
    pub thrust: SignalId,
    pub weight: SignalId,
}

impl ThrustLane {
    /// Shaft power the mechanical layer must drive.
    pub fn shaft_power_port(&self) -> ArchResult<PortId> {
        self.inputs.port(SHAFT_POWER)
    }

    /// Shaft speed and rated power, needed only with a gearbox.
    pub fn gearbox_ports(&self) -> ArchResult<Option<(PortId, PortId)>> {
        if !self.inputs.has(SHAFT_SPEED) {
            return Ok(None);
        }
        Ok(Some((
            self.inputs.port(SHAFT_SPEED)?,
            self.inputs.port(RATED_POWER)?,
        )))
    }
}

/// Build the propeller (and gearbox) sub-graph of one lane.
pub fn build_thrust_lane(model: &mut ModelBuilder, lane: &LanePlan<'_>, n: usize) -> ArchResult<ThrustLane> {
    let group = lane.thrust_group();
    let prop = lane.propeller;

    let mut decls = vec![
        InputDecl::vector(RPM, n, SignalUnit::Rpm, prop.default_rpm),
        InputDecl::scalar(DURATION, SignalUnit::Second, 1.0),
        InputDecl::vector(RHO, n, SignalUnit::KilogramPerCubicMeter, 1.225),
        InputDecl::vector(TAS, n, SignalUnit::MeterPerSecond, 100.0),
        InputDecl::vector(SHAFT_POWER, n, SignalUnit::Kilowatt, 1.0).required(),
        InputDecl::scalar("diameter", SignalUnit::Meter, prop.diameter_m),
        InputDecl::scalar("power", SignalUnit::Kilowatt, prop.power_rating_kw),
    ];
    if let Some(gearbox) = lane.gearbox {
        decls.push(InputDecl::scalar(SHAFT_SPEED, SignalUnit::Rpm, gearbox.input_rpm).required());
        decls.push(InputDecl::scalar(RATED_POWER, SignalUnit::Kilowatt, prop.power_rating_kw).required());
    }
    let inputs = model.collect_inputs(&group, "in_collect", decls);

    let propeller = element(
        &prop.name,
        Propeller::new(&prop.name, n, prop.blades, prop.design_efficiency),
    )?;
    let prop_node = model.add(path(&group, &prop.name), propeller);
    model.connect(inputs.signal(RHO)?, prop_node.input(Propeller::RHO))?;
    model.connect(inputs.signal(TAS)?, prop_node.input(Propeller::FLTCOND_UTRUE))?;
    model.connect(inputs.signal(RPM)?, prop_node.input(Propeller::RPM))?;
    model.connect(inputs.signal("diameter")?, prop_node.input(Propeller::DIAMETER))?;
    model.connect(inputs.signal("power")?, prop_node.input(Propeller::POWER_RATING))?;

    let mut weights = vec![prop_node.output(Propeller::COMPONENT_WEIGHT)];
    let mut shaft_power_in = prop_node.input(Propeller::SHAFT_POWER_IN);

    if let Some(gb) = lane.gearbox {
        let gearbox = element(&gb.name, Gearbox::new(&gb.name, n, gb.efficiency))?;
        let gear_node = model.add(path(&group, &gb.name), gearbox);
        model.connect(
            gear_node.output(Gearbox::SHAFT_POWER_OUT),
            prop_node.input(Propeller::SHAFT_POWER_IN),
        )?;
        model.connect(inputs.signal(SHAFT_SPEED)?, gear_node.input(Gearbox::SHAFT_SPEED_IN))?;
        model.connect(inputs.signal(RPM)?, gear_node.input(Gearbox::SHAFT_SPEED_OUT))?;
        model.connect(inputs.signal(RATED_POWER)?, gear_node.input(Gearbox::SHAFT_POWER_RATING))?;
        weights.push(gear_node.output(Gearbox::COMPONENT_WEIGHT));
        shaft_power_in = gear_node.input(Gearbox::SHAFT_POWER_IN);
    }
    model.connect(inputs.signal(SHAFT_POWER)?, shaft_power_in)?;

    let thrust = prop_node.output(Propeller::THRUST);
    model.alias(path(&group, "thrust"), thrust)?;
    let weight = sum_node(model, &group, "weight", &weights, SignalUnit::Kilogram, 1)?;

    Ok(ThrustLane {
        group,
        inputs,
        thrust,
        weight: weight.signal,
    })
}
