//! Top-level assembly: thrust, then mechanical, then (if needed) electrical.

use pf_components::Block;
use pf_core::{PortId, SignalId, SignalUnit};
use pf_graph::{Graph, IndexMap, InputDecl};
use tracing::info;

use crate::aggregate::sum_node;
use crate::balance::BalanceHandle;
use crate::electric::{self, build_electric_layer};
use crate::error::{ArchError, ArchResult};
use crate::layers::Architecture;
use crate::mech::{self, build_mech_layer};
use crate::model::ModelBuilder;
use crate::thrust::{self, build_thrust_lane};
use crate::topology::{ElectricKind, LaneKind, resolve};

pub const INPUTS: &str = "inputs";

/// External input ports of a compiled architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopInputs {
    pub rpm: PortId,
    pub throttle: PortId,
    pub duration: PortId,
    pub propulsor_active: PortId,
    pub density: PortId,
    pub airspeed: PortId,
}

/// The four aggregate outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopOutputs {
    pub fuel_flow: SignalId,
    pub weight: SignalId,
    pub thrust: SignalId,
    pub soc: SignalId,
}

/// Diagnostic signals of one lane.
#[derive(Debug, Clone, PartialEq)]
pub struct LaneSignals {
    pub index: usize,
    pub kind: LaneKind,
    pub thrust: SignalId,
    pub shaft_power: SignalId,
    pub weight: SignalId,
    pub elec_load: Option<SignalId>,
    pub fuel_flow: Option<SignalId>,
}

/// Diagnostic signals of the electrical layer.
#[derive(Debug, Clone, PartialEq)]
pub struct ElectricSignals {
    pub kind: ElectricKind,
    pub load: SignalId,
    pub battery_load: Option<SignalId>,
    pub chain_required: Option<SignalId>,
}

/// An architecture compiled for a fixed number of analysis points.
pub struct CompiledArchitecture {
    pub(crate) graph: Graph,
    pub(crate) blocks: Vec<Box<dyn Block>>,
    pub(crate) num_nodes: usize,
    pub(crate) inputs: TopInputs,
    pub(crate) outputs: TopOutputs,
    pub(crate) lanes: Vec<LaneSignals>,
    pub(crate) electric: Option<ElectricSignals>,
    pub(crate) balances: Vec<BalanceHandle>,
}

impl std::fmt::Debug for CompiledArchitecture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledArchitecture")
            .field("num_nodes", &self.num_nodes)
            .field("nodes", &self.graph.nodes().len())
            .field("lanes", &self.lanes)
            .field("electric", &self.electric)
            .field("balances", &self.balances)
            .finish()
    }
}

impl CompiledArchitecture {
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    pub fn inputs(&self) -> &TopInputs {
        &self.inputs
    }

    pub fn outputs(&self) -> &TopOutputs {
        &self.outputs
    }

    pub fn lanes(&self) -> &[LaneSignals] {
        &self.lanes
    }

    pub fn electric(&self) -> Option<&ElectricSignals> {
        self.electric.as_ref()
    }

    pub fn balances(&self) -> &[BalanceHandle] {
        &self.balances
    }

    /// Number of scalar unknowns the solver iterates on.
    pub fn unknown_count(&self) -> usize {
        IndexMap::from_graph(&self.graph).unknown_len()
    }

    /// Signal by dotted path, e.g. `thrust1.prop1.thrust` or `fuel_flow`.
    pub fn signal(&self, path: &str) -> ArchResult<SignalId> {
        self.graph
            .signal_by_path(path)
            .ok_or_else(|| ArchError::config(format!("no signal at '{path}'")))
    }
}

impl Architecture {
    /// Compile for `num_nodes` analysis points.
    pub fn compile(&self, num_nodes: usize) -> ArchResult<CompiledArchitecture> {
        compile(self, num_nodes)
    }
}

/// Compile an architecture into a graph.
///
/// All configuration checks run before the first node is created.
pub fn compile(arch: &Architecture, num_nodes: usize) -> ArchResult<CompiledArchitecture> {
    if num_nodes == 0 {
        return Err(ArchError::config("at least one analysis point is required"));
    }
    let plan = resolve(arch)?;
    let n = num_nodes;

    let mut model = ModelBuilder::new();
    let default_rpm = plan.lanes.first().map_or(2000.0, |l| l.propeller.default_rpm);
    let top = model.collect_inputs(
        "",
        INPUTS,
        vec![
            InputDecl::vector(thrust::RPM, n, SignalUnit::Rpm, default_rpm),
            InputDecl::vector(mech::THROTTLE, n, SignalUnit::Unitless, 1.0),
            InputDecl::scalar(thrust::DURATION, SignalUnit::Second, 1.0),
            InputDecl::vector(mech::ACTIVE, n, SignalUnit::Unitless, 1.0),
            InputDecl::vector(thrust::RHO, n, SignalUnit::KilogramPerCubicMeter, 1.225),
            InputDecl::vector(thrust::TAS, n, SignalUnit::MeterPerSecond, 100.0),
        ],
    );

    let thrust_lanes = plan
        .lanes
        .iter()
        .map(|lane| build_thrust_lane(&mut model, lane, n))
        .collect::<ArchResult<Vec<_>>>()?;
    let mech_layer = build_mech_layer(&mut model, &plan.lanes, &thrust_lanes, n)?;

    let elec_layer = if mech_layer.electric_power_needed() {
        let source = plan
            .electric
            .as_ref()
            .ok_or_else(|| ArchError::unwired("motors draw power but no electrical layer was resolved"))?;
        let layer = build_electric_layer(&mut model, source, n)?;
        model.connect(
            mech_layer.elec_load.signal,
            layer.inputs.port(electric::ELECTRIC_LOAD)?,
        )?;
        Some(layer)
    } else {
        None
    };

    // Shared external inputs go to every layer that declares them.
    for lane in &thrust_lanes {
        for name in [thrust::RPM, thrust::DURATION, thrust::RHO, thrust::TAS] {
            model.connect(top.signal(name)?, lane.inputs.port(name)?)?;
        }
    }
    for name in [
        mech::THROTTLE,
        mech::ACTIVE,
        thrust::DURATION,
        thrust::RHO,
        thrust::TAS,
    ] {
        model.connect(top.signal(name)?, mech_layer.inputs.port(name)?)?;
    }
    if let Some(layer) = &elec_layer {
        for name in [thrust::DURATION, thrust::RHO, thrust::TAS] {
            model.connect(top.signal(name)?, layer.inputs.port(name)?)?;
        }
    }

    let mut fuel_flows = vec![mech_layer.fuel_flow.signal];
    let mut weights: Vec<SignalId> = thrust_lanes.iter().map(|l| l.weight).collect();
    weights.push(mech_layer.weight.signal);
    let mut socs = Vec::new();
    if let Some(layer) = &elec_layer {
        fuel_flows.push(layer.fuel_flow.signal);
        weights.push(layer.weight.signal);
        socs.push(layer.soc.signal);
    }
    let thrusts: Vec<SignalId> = thrust_lanes.iter().map(|l| l.thrust).collect();

    let fuel_flow = sum_node(&mut model, "", "fuel_flow", &fuel_flows, SignalUnit::KilogramPerSecond, n)?;
    let weight = sum_node(
        &mut model,
        "",
        "propulsion_system_weight",
        &weights,
        SignalUnit::Kilogram,
        1,
    )?;
    let total_thrust = sum_node(&mut model, "", "thrust", &thrusts, SignalUnit::Newton, n)?;
    let soc = sum_node(&mut model, "", "SOC", &socs, SignalUnit::Unitless, n)?;

    let mut order = vec![INPUTS.to_string(), mech::GROUP.to_string()];
    order.extend(thrust_lanes.iter().map(|l| l.group.clone()));
    order.push(electric::GROUP.to_string());

    let lanes = mech_layer
        .lanes
        .iter()
        .zip(&thrust_lanes)
        .map(|(m, t)| LaneSignals {
            index: m.index,
            kind: m.kind,
            thrust: t.thrust,
            shaft_power: m.shaft_power,
            weight: t.weight,
            elec_load: m.elec_load,
            fuel_flow: m.fuel_flow,
        })
        .collect();

    let mut balances = mech_layer.balances.clone();
    let electric = match &elec_layer {
        Some(layer) => {
            balances.extend(layer.balances.iter().cloned());
            Some(ElectricSignals {
                kind: layer.kind,
                load: mech_layer.elec_load.signal,
                battery_load: layer.battery_load,
                chain_required: layer.chain_required,
            })
        }
        None => None,
    };

    let inputs = TopInputs {
        rpm: top.port(thrust::RPM)?,
        throttle: top.port(mech::THROTTLE)?,
        duration: top.port(thrust::DURATION)?,
        propulsor_active: top.port(mech::ACTIVE)?,
        density: top.port(thrust::RHO)?,
        airspeed: top.port(thrust::TAS)?,
    };
    let (graph, blocks) = model.finish(order)?;

    info!(
        lanes = plan.lanes.len(),
        nodes = graph.nodes().len(),
        balances = balances.len(),
        feedback = graph.feedback_count(),
        "compiled propulsion architecture"
    );

    Ok(CompiledArchitecture {
        graph,
        blocks,
        num_nodes,
        inputs,
        outputs: TopOutputs {
            fuel_flow: fuel_flow.signal,
            weight: weight.signal,
            thrust: total_thrust.signal,
            soc: soc.signal,
        },
        lanes,
        electric,
        balances,
    })
}
