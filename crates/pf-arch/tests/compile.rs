mod common;

use std::sync::Arc;
use std::thread;

use common::*;
use pf_arch::{Architecture, ArchError, OperatingConditions};
use pf_solver::NewtonConfig;

#[test]
fn architecture_reads_from_yaml() {
    let yaml = r#"
thrust:
  propellers:
    - name: left
    - name: right
      diameter_m: 2.8
  gearboxes:
    - {}
    - null
mech:
  engines:
    name: pw127
    power_rating_kw: 2000
  motors:
    - null
    - name: emotor
  buses:
    - null
    - {}
  splitters:
    - null
    - mech_DoH: 0.3
electric:
  dc_bus: {}
  batteries:
    weight_kg: 500
"#;
    let arch: Architecture = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(arch.num_lanes(), 2);

    let compiled = arch.compile(2).unwrap();
    let kinds: Vec<_> = compiled.lanes().iter().map(|l| l.kind).collect();
    assert_eq!(
        kinds,
        vec![pf_arch::LaneKind::EngineOnly, pf_arch::LaneKind::ParallelHybrid]
    );
    assert!(compiled.graph().signal_by_path("thrust2.right.thrust").is_some());
    assert!(compiled.graph().signal_by_path("thrust1.gearbox.shaft_power_out").is_some());

    let result = compiled.analyze(&OperatingConditions::new(2), None).unwrap();
    assert!(result.thrust_n.iter().all(|t| *t > 0.0));
}

#[test]
fn unknown_keys_are_rejected() {
    let yaml = "thrust:\n  propellers:\n    - name: p\n      blade_count: 3\n";
    assert!(serde_yaml::from_str::<Architecture>(yaml).is_err());
}

#[test]
fn zero_points_is_a_configuration_error() {
    assert!(turboprop(1).compile(0).unwrap_err().is_configuration());
}

#[test]
fn conditions_must_match_point_count() {
    let compiled = turboprop(2).compile(3).unwrap();

    let err = compiled.analyze(&OperatingConditions::new(4), None).unwrap_err();
    assert!(err.is_configuration(), "{err}");

    let bad_profile = OperatingConditions::new(3).with_throttle_profile(vec![0.5, 0.6]);
    assert!(compiled.analyze(&bad_profile, None).unwrap_err().is_configuration());

    let nan = OperatingConditions::new(3).with_throttle(f64::NAN);
    assert!(compiled.analyze(&nan, None).unwrap_err().is_configuration());
}

#[test]
fn rpm_override_reaches_every_lane() {
    let compiled = turboprop(2).compile(1).unwrap();
    let slow = compiled
        .analyze(&OperatingConditions::new(1).with_rpm(pf_core::rpm(1500.0)), None)
        .unwrap();
    let fast = compiled
        .analyze(&OperatingConditions::new(1).with_rpm(pf_core::rpm(2500.0)), None)
        .unwrap();
    // gearbox weight falls with output speed
    assert!(slow.lanes[0].weight_kg > fast.lanes[0].weight_kg);
    assert!(slow.lanes[1].weight_kg > fast.lanes[1].weight_kg);
}

#[test]
fn component_failures_name_the_node() {
    let compiled = turboprop(1).compile(1).unwrap();
    let vacuum = OperatingConditions::new(1).with_density(pf_core::kg_per_m3(0.0));
    match compiled.analyze(&vacuum, None).unwrap_err() {
        ArchError::Solver(err) => assert!(err.to_string().contains("thrust1.prop1"), "{err}"),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn solver_settings_are_honoured() {
    let compiled = parallel_hybrid(2, 0.4).compile(2).unwrap();
    let config = NewtonConfig {
        central_differences: true,
        ..NewtonConfig::default()
    };
    let result = compiled
        .analyze(&OperatingConditions::new(2).with_throttle(0.7), Some(config))
        .unwrap();
    assert!(result.residual_norm < 1e-6);
    for b in &result.balances {
        assert_all_close(&b.available_kw, &b.required_kw, 1e-6);
    }
}

#[test]
fn compiled_models_can_be_shared_across_threads() {
    let compiled = Arc::new(series_hybrid(2, 0.5).compile(2).unwrap());
    let throttles = [0.2, 0.4, 0.6, 0.8];

    let handles: Vec<_> = throttles
        .iter()
        .map(|&t| {
            let compiled = Arc::clone(&compiled);
            thread::spawn(move || {
                compiled
                    .analyze(&OperatingConditions::new(2).with_throttle(t), None)
                    .unwrap()
                    .fuel_flow_kg_per_s[0]
            })
        })
        .collect();
    let fuel: Vec<f64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(fuel.windows(2).all(|w| w[0] < w[1]));

    // independent compiles of the same architecture agree
    let again = series_hybrid(2, 0.5).compile(2).unwrap();
    assert_eq!(again.graph().nodes().len(), compiled.graph().nodes().len());
    assert_eq!(again.unknown_count(), compiled.unknown_count());
}
