mod common;

use common::*;
use pf_arch::element::{Batteries, DcBus, Engine, MechBus, MechSplitter, Motor, Propeller};
use pf_arch::model::ModelBuilder;
use pf_arch::{
    Architecture, ElectricalLayer, MechanicalLayer, OneOrMany, OperatingConditions, ThrustLayer,
    sum_node, throttle_from_power_balance,
};
use pf_components::{Constant, Turboshaft};
use pf_core::{SignalId, SignalUnit};
use pf_solver::{Problem, evaluate, solve};
use proptest::prelude::*;

/// Sum of constant sources, evaluated without unknowns.
fn summed(values: &[Vec<f64>], len: usize) -> (Vec<f64>, usize) {
    let mut model = ModelBuilder::new();
    let ids: Vec<SignalId> = values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            model
                .add(
                    format!("src{i}"),
                    Constant::new(format!("src{i}"), "value", SignalUnit::Kilowatt, v.clone()),
                )
                .output(0)
        })
        .collect();
    let before = model.node_count();
    let agg = sum_node(&mut model, "", "total", &ids, SignalUnit::Kilowatt, len).unwrap();
    let added = model.node_count() - before;
    assert_eq!(agg.contributors, values.len());

    let (graph, blocks) = model.finish(Vec::<String>::new()).unwrap();
    let problem = Problem::new(&graph, &blocks).unwrap();
    let solution = evaluate(&problem).unwrap();
    let total = graph.signal_by_path("total").unwrap();
    assert_eq!(total, agg.signal);
    (solution.value(total).unwrap().to_vec(), added)
}

fn series(len: usize, count: impl Into<prop::collection::SizeRange>) -> impl Strategy<Value = Vec<Vec<f64>>> {
    prop::collection::vec(prop::collection::vec(-1e4..1e4f64, len), count)
}

#[test]
fn empty_sum_is_zero_of_requested_shape() {
    let (total, added) = summed(&[], 4);
    assert_eq!(total, vec![0.0; 4]);
    assert_eq!(added, 1);
}

proptest! {
    #[test]
    fn singleton_sum_is_the_input(values in series(3, 1)) {
        let (total, added) = summed(&values, 3);
        prop_assert_eq!(&total, &values[0]);
        prop_assert_eq!(added, 0);
    }

    #[test]
    fn sum_is_elementwise_and_order_independent(values in series(4, 2..6)) {
        let (forward, _) = summed(&values, 4);
        let reversed: Vec<_> = values.iter().rev().cloned().collect();
        let (backward, _) = summed(&reversed, 4);

        for i in 0..4 {
            let expected: f64 = values.iter().map(|v| v[i]).sum();
            prop_assert!((forward[i] - expected).abs() <= 1e-9 * expected.abs().max(1.0));
            prop_assert!((forward[i] - backward[i]).abs() <= 1e-9 * expected.abs().max(1.0));
        }
    }

    #[test]
    fn balanced_throttle_delivers_required_power(
        rating in 50.0..2000.0f64,
        fractions in prop::collection::vec(0.0..=1.0f64, 3),
    ) {
        let required: Vec<f64> = fractions.iter().map(|f| f * rating).collect();

        let mut model = ModelBuilder::new();
        let demand = model.add(
            "demand".into(),
            Constant::new("demand", "power", SignalUnit::Kilowatt, required.clone()),
        );
        let rated = model.add(
            "rating".into(),
            Constant::new("rating", "power", SignalUnit::Kilowatt, vec![rating]),
        );
        let engine = Turboshaft::new("engine", 3, 0.6, 0.14, 104.0).unwrap();
        let node = model.add("engine".into(), engine);
        model
            .connect(rated.output(0), node.input(Turboshaft::SHAFT_POWER_RATING))
            .unwrap();
        let handle = throttle_from_power_balance(
            &mut model,
            "",
            "engine",
            demand.output(0),
            node.output(Turboshaft::SHAFT_POWER_OUT),
            node.input(Turboshaft::THROTTLE),
            SignalUnit::Kilowatt,
            3,
        )
        .unwrap();

        let (graph, blocks) = model.finish(Vec::<String>::new()).unwrap();
        let problem = Problem::new(&graph, &blocks).unwrap();
        let solution = solve(&problem, None, None).unwrap();

        let available = solution.value(handle.available).unwrap();
        let throttle = solution.value(handle.throttle).unwrap();
        for i in 0..3 {
            prop_assert!((available[i] - required[i]).abs() <= 1e-6 * rating);
            prop_assert!((throttle[i] - fractions[i]).abs() <= 1e-6);
        }
    }
}

#[test]
fn failed_lane_is_zeroed_and_healthy_lane_untouched() {
    let arch = all_electric(2);
    let compiled = arch.compile(3).unwrap();
    let base = OperatingConditions::new(3).with_throttle_profile(vec![0.3, 0.6, 0.9]);

    let healthy = compiled.analyze(&base, None).unwrap();
    let failed = compiled.analyze(&base.clone().one_inoperative(), None).unwrap();

    let lane2 = &failed.lanes[1];
    assert_eq!(lane2.shaft_power_kw, vec![0.0; 3]);
    assert_eq!(lane2.thrust_n, vec![0.0; 3]);
    assert_eq!(lane2.elec_load_kw.as_deref(), Some(&[0.0; 3][..]));

    assert_eq!(failed.lanes[0], healthy.lanes[0]);
    assert_eq!(failed.thrust_n, healthy.lanes[0].thrust_n);
}

#[test]
fn failure_flag_can_vary_per_point() {
    let compiled = turboprop(2).compile(3).unwrap();
    let conditions = OperatingConditions::new(3).with_propulsor_active(vec![1.0, 0.0, 1.0]);
    let result = compiled.analyze(&conditions, None).unwrap();

    let lane2 = &result.lanes[1].shaft_power_kw;
    assert!(lane2[0] > 0.0);
    assert_eq!(lane2[1], 0.0);
    assert_eq!(lane2[0], lane2[2]);
    assert_eq!(result.lanes[0].shaft_power_kw[1], lane2[0]);
}

#[test]
fn hybrid_failed_lane_keeps_its_engine() {
    let compiled = parallel_hybrid(2, 0.5).compile(1).unwrap();
    let result = compiled
        .analyze(&OperatingConditions::new(1).with_throttle(0.8).one_inoperative(), None)
        .unwrap();

    let motor = result
        .balances
        .iter()
        .find(|b| b.element == "mech.mech2.elec_motor")
        .unwrap();
    let engine = result
        .balances
        .iter()
        .find(|b| b.element == "mech.mech2.turboshaft")
        .unwrap();
    assert_close(motor.required_kw[0], 0.0, 1e-12);
    assert_close(motor.throttle[0], 0.0, 1e-6);
    assert_close(engine.required_kw[0], 0.8 * 260.0, 1e-9);
    assert_close(result.lanes[1].elec_load_kw.as_ref().unwrap()[0], 0.0, 1e-6);
}

#[test]
fn electrical_layer_exists_only_with_motors() {
    // An electrical layer that would not resolve on its own.
    let unused = ElectricalLayer::default()
        .with_splitter(Default::default())
        .with_batteries(OneOrMany::Many(vec![Batteries::default()]));
    let arch = turboprop(2).with_electric(unused);

    let compiled = arch.compile(2).unwrap();
    assert!(compiled.electric().is_none());
    assert!(compiled.graph().nodes().iter().all(|n| !n.name.starts_with("elec.")));

    let result = compiled.analyze(&OperatingConditions::new(2), None).unwrap();
    assert_eq!(result.soc, vec![0.0; 2]);
    assert!(result.electric.is_none());

    let compiled = all_electric(2).compile(2).unwrap();
    assert!(compiled.electric().is_some());
    assert!(compiled.graph().nodes().iter().any(|n| n.name.starts_with("elec.")));
}

#[test]
fn misconfiguration_fails_before_building() {
    let splitter_without_bus = Architecture::new(
        thrust_layer(1),
        MechanicalLayer::default().with_motors(Motor::default()),
    )
    .with_electric(
        ElectricalLayer::default()
            .with_splitter(Default::default())
            .with_batteries(Batteries::default()),
    );
    let err = splitter_without_bus.compile(2).unwrap_err();
    assert!(err.is_configuration(), "{err}");

    let battery_list = Architecture::new(
        thrust_layer(1),
        MechanicalLayer::default().with_motors(Motor::default()),
    )
    .with_electric(
        ElectricalLayer::default()
            .with_dc_bus(DcBus::default())
            .with_batteries(OneOrMany::Many(vec![Batteries::default()])),
    );
    let err = battery_list.compile(2).unwrap_err();
    assert!(err.is_configuration(), "{err}");

    let hybrid_without_splitter = Architecture::new(
        thrust_layer(1),
        MechanicalLayer::default()
            .with_engines(Engine::default())
            .with_motors(Motor::default())
            .with_buses(MechBus::default()),
    )
    .with_electric(battery_bus());
    assert!(hybrid_without_splitter.compile(1).unwrap_err().is_configuration());

    let stray_splitter = turboprop(1).with_electric(battery_bus());
    let stray_splitter = Architecture {
        mech: stray_splitter.mech.with_splitters(MechSplitter::default()),
        ..stray_splitter
    };
    assert!(stray_splitter.compile(1).unwrap_err().is_configuration());
}

#[test]
fn generated_node_names_are_not_element_names() {
    let engines = Architecture::new(
        thrust_layer(2),
        MechanicalLayer::default().with_engines(Engine::named("failed_engine")),
    );
    let err = engines.compile(1).unwrap_err();
    assert!(err.is_configuration(), "{err}");
    assert!(err.to_string().contains("failed_engine"));

    let props = Architecture::new(
        ThrustLayer::new(vec![Propeller::named("in_collect")]),
        MechanicalLayer::default().with_engines(Engine::default()),
    );
    assert!(props.compile(1).unwrap_err().is_configuration());

    for name in ["weight", "motor_throttle_set", "fuel_flow_sum"] {
        let arch = Architecture::new(
            thrust_layer(1),
            MechanicalLayer::default().with_motors(Motor::default()),
        )
        .with_electric(
            ElectricalLayer::default()
                .with_dc_bus(DcBus::named(name))
                .with_batteries(Batteries::default()),
        );
        assert!(arch.compile(1).unwrap_err().is_configuration(), "{name}");
    }
}

#[test]
fn blocks_match_graph_nodes() {
    let compiled = series_hybrid(2, 0.5).compile(2).unwrap();
    let nodes = compiled.graph().nodes();
    assert!(nodes.iter().any(|n| n.name == "inputs"));
    assert!(nodes.iter().any(|n| n.name == "elec.elec_split"));
    assert!(nodes.iter().any(|n| n.name == "elec.turboshaft_throttle_set"));
    assert!(nodes.iter().any(|n| n.name == "thrust2.prop2"));
    assert!(compiled.signal("fuel_flow").is_ok());
    assert!(compiled.signal("thrust1.thrust").is_ok());
    assert!(compiled.signal("nope").unwrap_err().is_configuration());
    assert_eq!(compiled.graph().feedback_count(), 0);
}
