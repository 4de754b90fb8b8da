//! Electrical supply for the motors' aggregated load.
//!
//! A battery takes whatever load reaches it. A DC engine chain
//! (engine, generator, rectifier) is throttled by a power balance against the
//! load it must cover. In a series hybrid the DC bus demand is split between
//! the two by the electrical degree of hybridization.

use pf_components::{
    Converter, ConverterMode, DcBus, Generator, PowerSplit, SocBattery, Turboshaft,
};
use pf_core::{SignalId, SignalUnit};
use pf_graph::InputDecl;

use crate::aggregate::{Aggregate, sum_node};
use crate::balance::{BalanceHandle, throttle_from_power_balance};
use crate::element::{self as el, Batteries, DcEngineChain};
use crate::error::ArchResult;
use crate::model::{Collected, ModelBuilder, element, path};
use crate::thrust::{DURATION, RHO, TAS};
use crate::topology::{ElectricKind, ElectricSource};

pub const GROUP: &str = "elec";
pub const ELECTRIC_LOAD: &str = "electric_load";
pub const FUEL_FLOW: &str = "fuel_flow";
pub const WEIGHT: &str = "weight";
pub const SOC: &str = "SOC";

/// The built electrical layer.
#[derive(Debug, Clone)]
pub struct ElecLayer {
    pub kind: ElectricKind,
    pub inputs: Collected,
    pub fuel_flow: Aggregate,
    pub weight: Aggregate,
    pub soc: Aggregate,
    /// Load drawn from the battery, if there is one.
    pub battery_load: Option<SignalId>,
    /// Power the engine chain must deliver, if there is one.
    pub chain_required: Option<SignalId>,
    pub balances: Vec<BalanceHandle>,
}

#[derive(Default)]
struct Totals {
    fuel_flow: Vec<SignalId>,
    weight: Vec<SignalId>,
    soc: Vec<SignalId>,
    balances: Vec<BalanceHandle>,
}

/// Build the electrical layer. Its `electric_load` port must be driven by
/// the mechanical layer's aggregated motor load.
pub fn build_electric_layer(
    model: &mut ModelBuilder,
    source: &ElectricSource<'_>,
    n: usize,
) -> ArchResult<ElecLayer> {
    let inputs = model.collect_inputs(
        GROUP,
        "in_collect",
        vec![
            InputDecl::scalar(DURATION, SignalUnit::Second, 1.0),
            InputDecl::vector(RHO, n, SignalUnit::KilogramPerCubicMeter, 1.225),
            InputDecl::vector(TAS, n, SignalUnit::MeterPerSecond, 100.0),
            InputDecl::vector(ELECTRIC_LOAD, n, SignalUnit::Kilowatt, 0.0).required(),
        ],
    );
    let load = inputs.signal(ELECTRIC_LOAD)?;
    let mut totals = Totals::default();

    let (battery_load, chain_required) = match *source {
        ElectricSource::Battery { bus, battery } => {
            let demand = match bus {
                Some(bus) => add_bus(model, bus, load, n, &mut totals)?,
                None => load,
            };
            add_battery(model, battery, demand, &inputs, n, &mut totals)?;
            (Some(demand), None)
        }
        ElectricSource::Turboelectric { bus, chain } => {
            let demand = match bus {
                Some(bus) => add_bus(model, bus, load, n, &mut totals)?,
                None => load,
            };
            add_chain(model, chain, demand, n, &mut totals)?;
            (None, Some(demand))
        }
        ElectricSource::SeriesHybrid {
            bus,
            splitter,
            battery,
            chain,
        } => {
            let demand = add_bus(model, bus, load, n, &mut totals)?;

            let params = model.collect_inputs(
                GROUP,
                "splitter_in_collect",
                vec![
                    InputDecl::vector("elec_DoH", n, SignalUnit::Unitless, splitter.elec_doh),
                    InputDecl::scalar("split_rating", SignalUnit::Kilowatt, splitter.power_rating_kw),
                ],
            );
            let split = element(&splitter.name, PowerSplit::new(&splitter.name, n, splitter.efficiency))?;
            let split_node = model.add(path(GROUP, &splitter.name), split);
            model.connect(demand, split_node.input(PowerSplit::POWER_IN))?;
            model.connect(params.signal("elec_DoH")?, split_node.input(PowerSplit::POWER_SPLIT_FRACTION))?;
            model.connect(params.signal("split_rating")?, split_node.input(PowerSplit::POWER_RATING))?;
            totals.weight.push(split_node.output(PowerSplit::COMPONENT_WEIGHT));

            let to_battery = split_node.output(PowerSplit::POWER_OUT_A);
            let to_chain = split_node.output(PowerSplit::POWER_OUT_B);
            add_battery(model, battery, to_battery, &inputs, n, &mut totals)?;
            add_chain(model, chain, to_chain, n, &mut totals)?;
            (Some(to_battery), Some(to_chain))
        }
    };

    let fuel_flow = sum_node(
        model,
        GROUP,
        FUEL_FLOW,
        &totals.fuel_flow,
        SignalUnit::KilogramPerSecond,
        n,
    )?;
    let weight = sum_node(model, GROUP, WEIGHT, &totals.weight, SignalUnit::Kilogram, 1)?;
    let soc = sum_node(model, GROUP, SOC, &totals.soc, SignalUnit::Unitless, n)?;

    Ok(ElecLayer {
        kind: source.kind(),
        inputs,
        fuel_flow,
        weight,
        soc,
        battery_load,
        chain_required,
        balances: totals.balances,
    })
}

/// DC bus fed by `load`; returns the power drawn upstream of it.
fn add_bus(
    model: &mut ModelBuilder,
    bus: &el::DcBus,
    load: SignalId,
    n: usize,
    totals: &mut Totals,
) -> ArchResult<SignalId> {
    let block = element(&bus.name, DcBus::new(&bus.name, n, bus.efficiency))?;
    let node = model.add(path(GROUP, &bus.name), block);
    model.connect(load, node.input(DcBus::ELEC_POWER_OUT))?;
    totals.weight.push(node.output(DcBus::COMPONENT_WEIGHT));
    Ok(node.output(DcBus::ELEC_POWER_IN))
}

fn add_battery(
    model: &mut ModelBuilder,
    battery: &Batteries,
    load: SignalId,
    inputs: &Collected,
    n: usize,
    totals: &mut Totals,
) -> ArchResult<()> {
    let params = model.collect_inputs(
        GROUP,
        "bat_in_collect",
        vec![InputDecl::scalar("weight", SignalUnit::Kilogram, battery.weight_kg)],
    );
    let block = element(
        &battery.name,
        SocBattery::new(
            &battery.name,
            n,
            battery.specific_energy_wh_per_kg,
            battery.specific_power_w_per_kg,
            battery.efficiency,
        )
        .and_then(|b| b.with_cost(battery.cost_inc, battery.cost_base)),
    )?;
    let node = model.add(path(GROUP, &battery.name), block);
    model.connect(load, node.input(SocBattery::ELEC_LOAD))?;
    model.connect(inputs.signal(DURATION)?, node.input(SocBattery::DURATION))?;
    model.connect(params.signal("weight")?, node.input(SocBattery::BATTERY_WEIGHT))?;

    totals.weight.push(node.output(SocBattery::COMPONENT_WEIGHT));
    totals.soc.push(node.output(SocBattery::SOC));
    Ok(())
}

/// Engine, generator and rectifier whose engine throttle is balanced so the
/// rectifier delivers `required`.
fn add_chain(
    model: &mut ModelBuilder,
    chain: &DcEngineChain,
    required: SignalId,
    n: usize,
    totals: &mut Totals,
) -> ArchResult<()> {
    let (engine, generator, rectifier) = (&chain.engine, &chain.generator, &chain.rectifier);

    let params = model.collect_inputs(
        GROUP,
        "eng_in_collect",
        vec![InputDecl::scalar("rating", SignalUnit::Kilowatt, engine.power_rating_kw)],
    );
    let rating = params.signal("rating")?;

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
    let eng = model.add(path(GROUP, &engine.name), turboshaft);
    model.connect(rating, eng.input(Turboshaft::SHAFT_POWER_RATING))?;
    totals.fuel_flow.push(eng.output(Turboshaft::FUEL_FLOW));
    totals.weight.push(eng.output(Turboshaft::COMPONENT_WEIGHT));

    let gen_block = element(
        &generator.name,
        Generator::new(
            &generator.name,
            n,
            generator.efficiency,
            generator.specific_weight_kg_per_kw,
            generator.base_weight_kg,
        )
        .and_then(|g| g.with_cost(generator.cost_inc, generator.cost_base)),
    )?;
    let gen_node = model.add(path(GROUP, &generator.name), gen_block);
    model.connect(rating, gen_node.input(Generator::ELEC_POWER_RATING))?;
    model.connect(eng.output(Turboshaft::SHAFT_POWER_OUT), gen_node.input(Generator::SHAFT_POWER_IN))?;
    totals.weight.push(gen_node.output(Generator::COMPONENT_WEIGHT));

    let rect_block = element(
        &rectifier.name,
        Converter::new(
            &rectifier.name,
            n,
            ConverterMode::Forward,
            rectifier.efficiency,
            rectifier.specific_weight_kg_per_kw,
            rectifier.base_weight_kg,
        )
        .and_then(|r| r.with_cost(rectifier.cost_inc, rectifier.cost_base)),
    )?;
    let rect_node = model.add(path(GROUP, &rectifier.name), rect_block);
    model.connect(rating, rect_node.input(Converter::ELEC_POWER_RATING))?;
    model.connect(gen_node.output(Generator::ELEC_POWER_OUT), rect_node.input(Converter::DRIVEN))?;
    totals.weight.push(rect_node.output(Converter::COMPONENT_WEIGHT));

    totals.balances.push(throttle_from_power_balance(
        model,
        GROUP,
        &engine.name,
        required,
        rect_node.output(Converter::RESULT),
        eng.input(Turboshaft::THROTTLE),
        SignalUnit::Kilowatt,
        n,
    )?);
    Ok(())
}
