mod common;

use common::*;
use pf_arch::{ElectricKind, LaneKind, OperatingConditions, PropulsionResult};
use pf_core::s;

const N: usize = 3;

fn run(arch: &pf_arch::Architecture, conditions: OperatingConditions) -> PropulsionResult {
    arch.compile(N).unwrap().analyze(&conditions, None).unwrap()
}

fn cruise() -> OperatingConditions {
    OperatingConditions::new(N)
        .with_throttle(0.9)
        .with_duration(s(300.0))
}

#[test]
fn twin_turboprop_doubles_single_lane() {
    let twin = run(&turboprop(2), cruise());
    let single = run(&turboprop(1), cruise());

    assert_eq!(twin.lanes.len(), 2);
    assert!(twin.lanes.iter().all(|l| l.kind == LaneKind::EngineOnly));
    assert!(twin.balances.is_empty());
    assert_eq!(twin.iterations, 0);

    let doubled = |v: &[f64]| v.iter().map(|x| 2.0 * x).collect::<Vec<_>>();
    assert_all_close(&twin.fuel_flow_kg_per_s, &doubled(&single.fuel_flow_kg_per_s), 1e-12);
    assert_all_close(&twin.thrust_n, &doubled(&single.thrust_n), 1e-12);
    assert_close(
        twin.propulsion_system_weight_kg,
        2.0 * single.propulsion_system_weight_kg,
        1e-12,
    );

    // engine + propeller + gearbox
    let engine_weight = 260.0 * 0.14 + 104.0;
    assert_close(
        single.propulsion_system_weight_kg,
        single.lanes[0].weight_kg + engine_weight,
        1e-12,
    );
    assert!(single.fuel_flow_kg_per_s.iter().all(|f| *f > 0.0));
    assert!(single.thrust_n.iter().all(|t| *t > 0.0));
    assert_eq!(twin.soc, vec![0.0; N]);
}

#[test]
fn failed_lane_contributes_nothing() {
    let failed = run(&turboprop(2), cruise().one_inoperative());
    let single = run(&turboprop(1), cruise());

    let lane2 = &failed.lanes[1];
    assert_eq!(lane2.shaft_power_kw, vec![0.0; N]);
    assert_eq!(lane2.thrust_n, vec![0.0; N]);
    assert_eq!(lane2.fuel_flow_kg_per_s.as_deref(), Some(&[0.0; N][..]));

    assert_eq!(failed.fuel_flow_kg_per_s, single.fuel_flow_kg_per_s);
    assert_eq!(failed.thrust_n, single.thrust_n);
    assert_eq!(failed.lanes[0].shaft_power_kw, single.lanes[0].shaft_power_kw);
}

#[test]
fn parallel_hybrid_splits_rated_power_evenly() {
    let arch = parallel_hybrid(1, 0.5);
    let compiled = arch.compile(N).unwrap();
    assert_eq!(compiled.unknown_count(), 2 * N);

    let result = compiled
        .analyze(&OperatingConditions::new(N).with_throttle(1.0), None)
        .unwrap();
    assert_eq!(result.lanes[0].kind, LaneKind::ParallelHybrid);

    let combined = 260.0 + 260.0;
    let motor = result
        .balances
        .iter()
        .find(|b| b.element == "mech.mech1.elec_motor")
        .unwrap();
    let engine = result
        .balances
        .iter()
        .find(|b| b.element == "mech.mech1.turboshaft")
        .unwrap();

    for i in 0..N {
        assert_close(motor.required_kw[i], 0.5 * combined, 1e-9);
        assert_close(engine.required_kw[i], 0.5 * combined, 1e-9);

        assert_close(motor.available_kw[i], motor.required_kw[i], 1e-6);
        assert_close(engine.available_kw[i], engine.required_kw[i], 1e-6);

        // each throttle reproduces its share through its own power curve
        assert_close(engine.throttle[i] * 260.0, 0.5 * combined, 1e-6);
        assert_close(motor.throttle[i] * 260.0 * 0.97, 0.5 * combined, 1e-6);
    }

    // bus efficiency applies after the split
    assert_all_close(&result.lanes[0].shaft_power_kw, &[combined * 0.95; N], 1e-9);

    let electric = result.electric.as_ref().unwrap();
    assert_eq!(electric.kind, ElectricKind::Battery);
    let motor_load = motor.throttle[0] * 260.0;
    assert_close(result.lanes[0].elec_load_kw.as_ref().unwrap()[0], motor_load, 1e-6);
    assert_close(electric.battery_load_kw.as_ref().unwrap()[0], motor_load / 0.99, 1e-6);
}

#[test]
fn series_hybrid_splits_bus_power() {
    let arch = series_hybrid(2, 0.6);
    let conditions = OperatingConditions::new(N)
        .with_throttle_profile(vec![0.4, 0.6, 0.8])
        .with_duration(s(600.0));
    let result = run(&arch, conditions);

    let electric = result.electric.as_ref().unwrap();
    assert_eq!(electric.kind, ElectricKind::SeriesHybrid);

    let engine = result
        .balances
        .iter()
        .find(|b| b.element == "elec.turboshaft")
        .unwrap();
    let battery = electric.battery_load_kw.as_ref().unwrap();
    let chain = electric.chain_required_kw.as_ref().unwrap();

    for (i, throttle) in [0.4, 0.6, 0.8].into_iter().enumerate() {
        let motors = 2.0 * throttle * 260.0;
        assert_close(electric.load_kw[i], motors, 1e-12);

        let drawn = motors / 0.99;
        assert_close(battery[i], 0.6 * drawn, 1e-12);
        assert_close(chain[i], 0.4 * drawn, 1e-12);

        // engine -> generator -> rectifier
        assert_close(engine.throttle[i] * 260.0 * 0.97 * 0.97, chain[i], 1e-6);
        assert!(result.fuel_flow_kg_per_s[i] > 0.0);
    }

    assert_eq!(result.soc[0], 1.0);
    assert!(result.soc.windows(2).all(|w| w[1] < w[0]));
}

#[test]
fn turboelectric_has_no_state_of_charge() {
    let arch = pf_arch::Architecture::new(
        thrust_layer(2),
        pf_arch::MechanicalLayer::default().with_motors(pf_arch::element::Motor::default()),
    )
    .with_electric(
        pf_arch::ElectricalLayer::default()
            .with_dc_bus(pf_arch::element::DcBus::default())
            .with_engines_dc(pf_arch::element::DcEngineChain::default()),
    );
    let result = run(&arch, OperatingConditions::new(N).with_throttle(0.5));

    let electric = result.electric.as_ref().unwrap();
    assert_eq!(electric.kind, ElectricKind::Turboelectric);
    assert!(electric.battery_load_kw.is_none());
    assert_eq!(result.soc, vec![0.0; N]);

    let chain = electric.chain_required_kw.as_ref().unwrap();
    assert_close(chain[0], 2.0 * 0.5 * 260.0 / 0.99, 1e-12);
    assert!(result.fuel_flow_kg_per_s.iter().all(|f| *f > 0.0));
}

#[test]
fn results_serialize_for_reports() {
    let result = run(&turboprop(2), cruise());
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["lanes"][0]["kind"], "engine_only");
    assert_eq!(json["lanes"][1]["lane"], 2);
    assert!(json.get("SOC").is_some());
    assert!(json.get("electric").is_none());
}
