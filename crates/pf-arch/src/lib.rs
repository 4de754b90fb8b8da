//! Propulsion architecture compiler.
//!
//! An [`Architecture`] lists the hardware of an aircraft propulsion system
//! in three layers: thrust (propellers and gearboxes, one lane per
//! propeller), mechanical (the shaft power source of each lane) and an
//! optional electrical layer that feeds the motors. Compiling it produces a
//! dataflow graph in which every power-producing element has its throttle
//! solved so that it delivers exactly the power drawn downstream.
//!
//! ```no_run
//! use pf_arch::{Architecture, MechanicalLayer, OperatingConditions, ThrustLayer};
//! use pf_arch::element::{Engine, Propeller};
//!
//! let arch = Architecture::new(
//!     ThrustLayer::new(vec![Propeller::named("prop1"), Propeller::named("prop2")]),
//!     MechanicalLayer::default().with_engines(Engine::named("turboshaft")),
//! );
//! let compiled = arch.compile(3)?;
//! let result = compiled.analyze(&OperatingConditions::new(3).with_throttle(0.8), None)?;
//! println!("fuel flow {:?} kg/s", result.fuel_flow_kg_per_s);
//! # Ok::<(), pf_arch::ArchError>(())
//! ```

pub mod aggregate;
pub mod analysis;
pub mod assemble;
pub mod balance;
pub mod electric;
pub mod element;
pub mod error;
pub mod layers;
pub mod mech;
pub mod model;
pub mod thrust;
pub mod topology;

pub use aggregate::{Aggregate, sum_node};
pub use analysis::{BalanceResult, ElectricResult, LaneResult, OperatingConditions, PropulsionResult};
pub use assemble::{CompiledArchitecture, ElectricSignals, LaneSignals, TopInputs, TopOutputs, compile};
pub use balance::{BalanceHandle, throttle_from_power_balance};
pub use error::{ArchError, ArchResult};
pub use layers::{Architecture, ElectricalLayer, MechanicalLayer, OneOrMany, PerLane, ThrustLayer};
pub use topology::{ElectricKind, LaneKind, OEI_LANE};
