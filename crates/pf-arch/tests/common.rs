#![allow(dead_code)]

use pf_arch::element::{
    Batteries, DcBus, DcEngineChain, ElecSplitter, Engine, Gearbox, MechBus, MechSplitter, Motor,
    Propeller,
};
use pf_arch::{Architecture, ElectricalLayer, MechanicalLayer, ThrustLayer};

pub fn assert_close(actual: f64, expected: f64, tol: f64) {
    let scale = expected.abs().max(1.0);
    assert!(
        (actual - expected).abs() <= tol * scale,
        "{actual} differs from {expected}"
    );
}

pub fn assert_all_close(actual: &[f64], expected: &[f64], tol: f64) {
    assert_eq!(actual.len(), expected.len());
    for (a, e) in actual.iter().zip(expected) {
        assert_close(*a, *e, tol);
    }
}

/// `count` propeller + gearbox lanes.
pub fn thrust_layer(count: usize) -> ThrustLayer {
    let props = (1..=count).map(|i| Propeller::named(format!("prop{i}"))).collect();
    ThrustLayer::new(props).with_gearboxes(vec![Some(Gearbox::default()); count])
}

/// Propeller + gearbox + turboshaft on every lane.
pub fn turboprop(count: usize) -> Architecture {
    Architecture::new(
        thrust_layer(count),
        MechanicalLayer::default().with_engines(Engine::default()),
    )
}

pub fn battery_bus() -> ElectricalLayer {
    ElectricalLayer::default()
        .with_dc_bus(DcBus::default())
        .with_batteries(Batteries::default())
}

/// Motor on every lane, fed by a battery.
pub fn all_electric(count: usize) -> Architecture {
    Architecture::new(
        thrust_layer(count),
        MechanicalLayer::default().with_motors(Motor::default()),
    )
    .with_electric(battery_bus())
}

/// Engine and motor on every lane, sharing a gear bus.
pub fn parallel_hybrid(count: usize, mech_doh: f64) -> Architecture {
    Architecture::new(
        thrust_layer(count),
        MechanicalLayer::default()
            .with_engines(Engine::default())
            .with_motors(Motor::default())
            .with_buses(MechBus::default())
            .with_splitters(MechSplitter {
                mech_doh,
                ..MechSplitter::default()
            }),
    )
    .with_electric(battery_bus())
}

/// Motor on every lane; battery and generator share the DC bus.
pub fn series_hybrid(count: usize, elec_doh: f64) -> Architecture {
    Architecture::new(
        thrust_layer(count),
        MechanicalLayer::default().with_motors(Motor::default()),
    )
    .with_electric(
        ElectricalLayer::default()
            .with_dc_bus(DcBus::default())
            .with_splitter(ElecSplitter {
                elec_doh,
                ..ElecSplitter::default()
            })
            .with_batteries(Batteries::default())
            .with_engines_dc(DcEngineChain::default()),
    )
}
