//! pf-components: block library for propulsion graphs.
//!
//! Provides the numeric models a propulsion architecture is compiled into:
//! - Thrust hardware: propeller, gearbox
//! - Mechanical sources: turboshaft, electric motor, mechanical bus
//! - Electrical chain: generator, inverter/rectifier, DC bus, battery
//! - Power splitters and the throttle balance used to match power demand
//! - Math blocks (constants, pass-through labels, sums, products)
//!
//! All blocks implement the `Block` trait and are deterministic functions of
//! their inputs and parameters, so a graph of them can be evaluated repeatedly
//! by a nonlinear solver.
//!
//! # Example
//!
//! ```
//! use pf_components::{Block, Turboshaft};
//!
//! let engine = Turboshaft::new("engine", 3, 0.6, 0.14, 104.0).unwrap();
//! let out = engine
//!     .compute(&[vec![1.0, 0.5, 0.0], vec![260.0]])
//!     .unwrap();
//!
//! assert_eq!(out[Turboshaft::SHAFT_POWER_OUT], vec![260.0, 130.0, 0.0]);
//! assert!((out[Turboshaft::COMPONENT_WEIGHT][0] - 140.4).abs() < 1e-9);
//! ```

pub mod balance;
pub mod battery;
pub mod bus;
pub mod common;
pub mod converter;
pub mod error;
pub mod gearbox;
pub mod generator;
pub mod math;
pub mod motor;
pub mod propeller;
pub mod splitter;
pub mod traits;
pub mod turboshaft;

pub use balance::PowerBalance;
pub use battery::SocBattery;
pub use bus::{DcBus, MechBus};
pub use converter::{Converter, ConverterMode};
pub use error::{ComponentError, ComponentResult};
pub use gearbox::Gearbox;
pub use generator::Generator;
pub use math::{Constant, Passthrough, PassthroughEntry, Product, Sum};
pub use motor::Motor;
pub use propeller::Propeller;
pub use splitter::PowerSplit;
pub use traits::Block;
pub use turboshaft::Turboshaft;
