//! Mechanical power chains: the shaft power source behind each propeller.
//!
//! Each lane resolves to one of three shapes. Engine-only and motor-only
//! lanes take the global throttle directly. A parallel hybrid lane turns the
//! throttle into a total shaft power demand, splits it between engine and
//! motor, and solves each source's throttle with a power balance.
//!
//! On the OEI lane the `propulsor_active` flag multiplies the throttle of a
//! single source, or the motor rating and hybridization of a hybrid lane.

use pf_components::{
    Converter, ConverterMode, MechBus, Motor, PowerSplit, Product, Turboshaft,
};
use pf_core::{SignalId, SignalUnit};
use pf_graph::{InputDecl, OutputDecl};

use crate::aggregate::{Aggregate, sum_node};
use crate::balance::{BalanceHandle, throttle_from_power_balance};
use crate::element::{Engine, Inverter, Motor as MotorElement};
use crate::error::{ArchError, ArchResult};
use crate::model::{Collected, ModelBuilder, element, path};
use crate::thrust::{DURATION, RHO, TAS, ThrustLane};
use crate::topology::{LaneKind, LanePlan, LaneSource};

pub const GROUP: &str = "mech";
pub const THROTTLE: &str = "throttle";
pub const ACTIVE: &str = "propulsor_active";
pub const FUEL_FLOW: &str = "fuel_flow";
pub const WEIGHT: &str = "weight";
pub const ELECTRIC_LOAD: &str = "motors_elec_power";

/// Outputs of one lane's mechanical chain.
#[derive(Debug, Clone, PartialEq)]
pub struct MechLane {
    pub index: usize,
    pub kind: LaneKind,
    /// Shaft power delivered to the thrust lane.
    pub shaft_power: SignalId,
    pub elec_load: Option<SignalId>,
    pub fuel_flow: Option<SignalId>,
}

/// The built mechanical layer.
#[derive(Debug, Clone)]
pub struct MechLayer {
    pub inputs: Collected,
    pub fuel_flow: Aggregate,
    pub weight: Aggregate,
    pub elec_load: Aggregate,
    pub lanes: Vec<MechLane>,
    pub balances: Vec<BalanceHandle>,
}

impl MechLayer {
    /// True when some motor draws electrical power.
    pub fn electric_power_needed(&self) -> bool {
        !self.elec_load.is_empty()
    }
}

/// What a lane hands back before it is wired to its propeller.
struct LaneOutput {
    shaft_power: SignalId,
    shaft_speed: SignalId,
    rated_power: SignalId,
}

/// Contributions accumulated across lanes.
#[derive(Default)]
struct Totals {
    fuel_flow: Vec<SignalId>,
    weight: Vec<SignalId>,
    elec_load: Vec<SignalId>,
    balances: Vec<BalanceHandle>,
}

/// Build every lane's source and drive the thrust lanes' shaft inputs.
pub fn build_mech_layer(
    model: &mut ModelBuilder,
    lanes: &[LanePlan<'_>],
    thrust: &[ThrustLane],
    n: usize,
) -> ArchResult<MechLayer> {
    if lanes.len() != thrust.len() {
        return Err(ArchError::unwired(format!(
            "{} mechanical lanes for {} thrust lanes",
            lanes.len(),
            thrust.len()
        )));
    }

    let inputs = model.collect_inputs(
        GROUP,
        "in_collect",
        vec![
            InputDecl::vector(THROTTLE, n, SignalUnit::Unitless, 1.0),
            InputDecl::scalar(DURATION, SignalUnit::Second, 1.0),
            InputDecl::vector(ACTIVE, n, SignalUnit::Unitless, 1.0),
            InputDecl::vector(RHO, n, SignalUnit::KilogramPerCubicMeter, 1.225),
            InputDecl::vector(TAS, n, SignalUnit::MeterPerSecond, 100.0),
        ],
    );

    let mut totals = Totals::default();
    let mut mech_lanes = Vec::with_capacity(lanes.len());

    for (lane, thrust_lane) in lanes.iter().zip(thrust) {
        let scope = path(GROUP, &lane.mech_scope());
        let fuel_before = totals.fuel_flow.len();
        let load_before = totals.elec_load.len();

        let out = match lane.source {
            LaneSource::EngineOnly { engine } => {
                engine_only(model, &scope, lane, engine, &inputs, n, &mut totals)?
            }
            LaneSource::MotorOnly { motor, inverter } => {
                motor_only(model, &scope, lane, motor, inverter, &inputs, n, &mut totals)?
            }
            LaneSource::ParallelHybrid { .. } => parallel_hybrid(model, &scope, lane, &inputs, n, &mut totals)?,
        };

        model.connect(out.shaft_power, thrust_lane.shaft_power_port()?)?;
        if let Some((speed_port, rating_port)) = thrust_lane.gearbox_ports()? {
            model.connect(out.shaft_speed, speed_port)?;
            model.connect(out.rated_power, rating_port)?;
        }

        mech_lanes.push(MechLane {
            index: lane.index,
            kind: lane.source.kind(),
            shaft_power: out.shaft_power,
            elec_load: totals.elec_load.get(load_before).copied(),
            fuel_flow: totals.fuel_flow.get(fuel_before).copied(),
        });
    }

    let fuel_flow = sum_node(
        model,
        GROUP,
        FUEL_FLOW,
        &totals.fuel_flow,
        SignalUnit::KilogramPerSecond,
        n,
    )?;
    let weight = sum_node(model, GROUP, WEIGHT, &totals.weight, SignalUnit::Kilogram, 1)?;
    let elec_load = sum_node(
        model,
        GROUP,
        ELECTRIC_LOAD,
        &totals.elec_load,
        SignalUnit::Kilowatt,
        n,
    )?;

    Ok(MechLayer {
        inputs,
        fuel_flow,
        weight,
        elec_load,
        lanes: mech_lanes,
        balances: totals.balances,
    })
}

fn engine_only(
    model: &mut ModelBuilder,
    scope: &str,
    lane: &LanePlan<'_>,
    engine: &Engine,
    layer: &Collected,
    n: usize,
    totals: &mut Totals,
) -> ArchResult<LaneOutput> {
    let params = model.collect_inputs(
        scope,
        "in_collect",
        vec![
            InputDecl::scalar("eng_rating", SignalUnit::Kilowatt, engine.power_rating_kw),
            InputDecl::scalar("eng_output_rpm", SignalUnit::Rpm, engine.output_rpm),
        ],
    );
    let eng = add_engine(model, scope, engine, params.signal("eng_rating")?, n, totals)?;

    let throttle = lane_throttle(model, scope, lane, layer, "engine", n)?;
    model.connect(throttle, eng.input(Turboshaft::THROTTLE))?;

    Ok(LaneOutput {
        shaft_power: eng.output(Turboshaft::SHAFT_POWER_OUT),
        shaft_speed: params.signal("eng_output_rpm")?,
        rated_power: params.signal("eng_rating")?,
    })
}

#[allow(clippy::too_many_arguments)]
fn motor_only(
    model: &mut ModelBuilder,
    scope: &str,
    lane: &LanePlan<'_>,
    motor: &MotorElement,
    inverter: Option<&Inverter>,
    layer: &Collected,
    n: usize,
    totals: &mut Totals,
) -> ArchResult<LaneOutput> {
    let params = model.collect_inputs(
        scope,
        "in_collect",
        vec![
            InputDecl::scalar("motor_rating", SignalUnit::Kilowatt, motor.power_rating_kw),
            InputDecl::scalar("motor_output_rpm", SignalUnit::Rpm, motor.output_rpm),
        ],
    );
    let mot = add_motor(model, scope, motor, inverter, params.signal("motor_rating")?, n, totals)?;

    let throttle = lane_throttle(model, scope, lane, layer, "motor", n)?;
    model.connect(throttle, mot.input(Motor::THROTTLE))?;

    Ok(LaneOutput {
        shaft_power: mot.output(Motor::SHAFT_POWER_OUT),
        shaft_speed: params.signal("motor_output_rpm")?,
        rated_power: params.signal("motor_rating")?,
    })
}

fn parallel_hybrid(
    model: &mut ModelBuilder,
    scope: &str,
    lane: &LanePlan<'_>,
    layer: &Collected,
    n: usize,
    totals: &mut Totals,
) -> ArchResult<LaneOutput> {
    let LaneSource::ParallelHybrid {
        engine,
        motor,
        inverter,
        bus,
        splitter,
    } = lane.source
    else {
        return Err(ArchError::unwired(format!(
            "lane {} is not a parallel hybrid",
            lane.index + 1
        )));
    };

    let params = model.collect_inputs(
        scope,
        "in_collect",
        vec![
            InputDecl::scalar("eng_rating", SignalUnit::Kilowatt, engine.power_rating_kw),
            InputDecl::scalar("motor_rating", SignalUnit::Kilowatt, motor.power_rating_kw),
            InputDecl::vector("mech_DoH", n, SignalUnit::Unitless, splitter.mech_doh),
            InputDecl::scalar("split_rating", SignalUnit::Kilowatt, splitter.power_rating_kw),
        ],
    );
    let eng_rating = params.signal("eng_rating")?;
    let motor_rating = params.signal("motor_rating")?;

    let eng = add_engine(model, scope, engine, eng_rating, n, totals)?;
    let mot = add_motor(model, scope, motor, inverter, motor_rating, n, totals)?;

    // A failed lane keeps its engine but loses the motor's share.
    let (motor_available, doh) = if lane.is_oei() {
        let active = layer.signal(ACTIVE)?;
        let available = scale(
            model,
            scope,
            "motor_rating_active",
            active,
            InputDecl::scalar("motor_rating", SignalUnit::Kilowatt, motor.power_rating_kw),
            motor_rating,
            OutputDecl::vector("motor_rating", n, SignalUnit::Kilowatt),
            n,
        )?;
        let doh = scale(
            model,
            scope,
            "doh_active",
            active,
            InputDecl::vector("mech_DoH", n, SignalUnit::Unitless, splitter.mech_doh),
            params.signal("mech_DoH")?,
            OutputDecl::vector("mech_DoH", n, SignalUnit::Unitless),
            n,
        )?;
        (available, doh)
    } else {
        (motor_rating, params.signal("mech_DoH")?)
    };

    let combined = sum_node(
        model,
        scope,
        "combined_rating",
        &[eng_rating, motor_available],
        SignalUnit::Kilowatt,
        n,
    )?;
    let total = scale(
        model,
        scope,
        "total_power",
        layer.signal(THROTTLE)?,
        InputDecl::vector("combined_rating", n, SignalUnit::Kilowatt, 0.0),
        combined.signal,
        OutputDecl::vector("shaft_power", n, SignalUnit::Kilowatt),
        n,
    )?;

    let mech_bus = element(
        &bus.name,
        MechBus::new(&bus.name, n, bus.efficiency, bus.output_rpm)
            .and_then(|b| b.with_base_weight(bus.base_weight_kg)),
    )?;
    let bus_node = model.add(path(scope, &bus.name), mech_bus);
    model.connect(total, bus_node.input(MechBus::SHAFT_POWER_IN))?;
    totals.weight.push(bus_node.output(MechBus::COMPONENT_WEIGHT));

    let split = element(&splitter.name, PowerSplit::new(&splitter.name, n, splitter.efficiency))?;
    let split_node = model.add(path(scope, &splitter.name), split);
    model.connect(total, split_node.input(PowerSplit::POWER_IN))?;
    model.connect(doh, split_node.input(PowerSplit::POWER_SPLIT_FRACTION))?;
    model.connect(params.signal("split_rating")?, split_node.input(PowerSplit::POWER_RATING))?;
    totals.weight.push(split_node.output(PowerSplit::COMPONENT_WEIGHT));

    totals.balances.push(throttle_from_power_balance(
        model,
        scope,
        &motor.name,
        split_node.output(PowerSplit::POWER_OUT_A),
        mot.output(Motor::SHAFT_POWER_OUT),
        mot.input(Motor::THROTTLE),
        SignalUnit::Kilowatt,
        n,
    )?);
    totals.balances.push(throttle_from_power_balance(
        model,
        scope,
        &engine.name,
        split_node.output(PowerSplit::POWER_OUT_B),
        eng.output(Turboshaft::SHAFT_POWER_OUT),
        eng.input(Turboshaft::THROTTLE),
        SignalUnit::Kilowatt,
        n,
    )?);

    let rated = sum_node(
        model,
        scope,
        "rated_power",
        &[eng_rating, motor_rating],
        SignalUnit::Kilowatt,
        1,
    )?;

    Ok(LaneOutput {
        shaft_power: bus_node.output(MechBus::SHAFT_POWER_OUT),
        shaft_speed: bus_node.output(MechBus::SHAFT_SPEED_OUT),
        rated_power: rated.signal,
    })
}

fn add_engine(
    model: &mut ModelBuilder,
    scope: &str,
    engine: &Engine,
    rating: SignalId,
    n: usize,
    totals: &mut Totals,
) -> ArchResult<pf_graph::NodeHandle> {
    let turboshaft = element(
        &engine.name,
        Turboshaft::new(
            &engine.name,
            n,
            engine.psfc_lb_per_hp_hr,
            engine.specific_weight_kg_per_kw,
            engine.base_weight_kg,
        ),
    )?;
    let node = model.add(path(scope, &engine.name), turboshaft);
    model.connect(rating, node.input(Turboshaft::SHAFT_POWER_RATING))?;
    totals.fuel_flow.push(node.output(Turboshaft::FUEL_FLOW));
    totals.weight.push(node.output(Turboshaft::COMPONENT_WEIGHT));
    Ok(node)
}

/// Motor plus optional inverter. The electrical load recorded is what the
/// inverter draws when present.
fn add_motor(
    model: &mut ModelBuilder,
    scope: &str,
    motor: &MotorElement,
    inverter: Option<&Inverter>,
    rating: SignalId,
    n: usize,
    totals: &mut Totals,
) -> ArchResult<pf_graph::NodeHandle> {
    let block = element(
        &motor.name,
        Motor::new(
            &motor.name,
            n,
            motor.efficiency,
            motor.specific_weight_kg_per_kw,
            motor.base_weight_kg,
        ),
    )?;
    let node = model.add(path(scope, &motor.name), block);
    model.connect(rating, node.input(Motor::ELEC_POWER_RATING))?;
    totals.weight.push(node.output(Motor::COMPONENT_WEIGHT));

    let mut load = node.output(Motor::ELEC_LOAD);
    if let Some(inv) = inverter {
        let converter = element(
            &inv.name,
            Converter::new(
                &inv.name,
                n,
                ConverterMode::Inverted,
                inv.efficiency,
                inv.specific_weight_kg_per_kw,
                inv.base_weight_kg,
            ),
        )?;
        let inv_node = model.add(path(scope, &inv.name), converter);
        model.connect(load, inv_node.input(Converter::DRIVEN))?;
        model.connect(rating, inv_node.input(Converter::ELEC_POWER_RATING))?;
        totals.weight.push(inv_node.output(Converter::COMPONENT_WEIGHT));
        load = inv_node.output(Converter::RESULT);
    }
    totals.elec_load.push(load);
    Ok(node)
}

/// Throttle for a single-source lane; gated by `propulsor_active` on the OEI lane.
fn lane_throttle(
    model: &mut ModelBuilder,
    scope: &str,
    lane: &LanePlan<'_>,
    layer: &Collected,
    source: &str,
    n: usize,
) -> ArchResult<SignalId> {
    let throttle = layer.signal(THROTTLE)?;
    if !lane.is_oei() {
        return Ok(throttle);
    }

    let product = element(
        source,
        Product::new(
            format!("failed_{source}"),
            InputDecl::vector("throttle_vec", n, SignalUnit::Unitless, 1.0),
            InputDecl::vector("propulsor_active_flag", n, SignalUnit::Unitless, 1.0),
            OutputDecl::vector(format!("{source}_throttle"), n, SignalUnit::Unitless),
        ),
    )?;
    let node = model.add(path(scope, &format!("failed_{source}")), product);
    model.connect(throttle, node.input(0))?;
    model.connect(layer.signal(ACTIVE)?, node.input(1))?;
    Ok(node.output(0))
}

/// `factor × value` through a product node at `scope.name`.
///
/// The first factor is always a per-point unitless vector (throttle or flag).
#[allow(clippy::too_many_arguments)]
fn scale(
    model: &mut ModelBuilder,
    scope: &str,
    name: &str,
    factor: SignalId,
    value_decl: InputDecl,
    value: SignalId,
    output: OutputDecl,
    n: usize,
) -> ArchResult<SignalId> {
    let product = element(
        name,
        Product::new(
            name,
            InputDecl::vector("factor", n, SignalUnit::Unitless, 1.0),
            value_decl,
            output,
        ),
    )?;
    let node = model.add(path(scope, name), product);
    model.connect(factor, node.input(0))?;
    model.connect(value, node.input(1))?;
    Ok(node.output(0))
}
