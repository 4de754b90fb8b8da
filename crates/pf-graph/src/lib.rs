//! pf-graph: computational graph layer for propflow.
//!
//! Provides:
//! - Arena-owned graph data structures (Node, Port, Signal, Graph)
//! - Incremental builder that hands out typed port/signal handles
//! - Validation (references, shapes, units, required inputs, loops)
//! - Evaluation order and stable value layout for solver integration
//!
//! Nodes are either explicit (outputs computed from inputs) or implicit
//! (outputs are solver unknowns, inputs feed residual equations).
//!
//! # Example
//!
//! ```
//! use pf_core::SignalUnit;
//! use pf_graph::{GraphBuilder, InputDecl, Interface, NodeKind, OutputDecl};
//!
//! let mut builder = GraphBuilder::new();
//! let src = builder.add_node(
//!     "inputs",
//!     Interface::explicit(
//!         vec![InputDecl::vector("throttle", 3, SignalUnit::Unitless, 1.0)],
//!         vec![OutputDecl::vector("throttle", 3, SignalUnit::Unitless)],
//!     ),
//! );
//! let sink = builder.add_node(
//!     "engine",
//!     Interface::explicit(
//!         vec![InputDecl::vector("throttle", 3, SignalUnit::Unitless, 0.0).required()],
//!         vec![OutputDecl::vector("shaft_power_out", 3, SignalUnit::Kilowatt)],
//!     ),
//! );
//! builder.connect(src.output(0), sink.input(0)).unwrap();
//! let graph = builder.build().unwrap();
//!
//! assert_eq!(graph.nodes().len(), 2);
//! assert_eq!(graph.evaluation_order(), &[src.id, sink.id]);
//! assert_eq!(graph.node(sink.id).map(|n| n.kind), Some(NodeKind::Explicit));
//! ```

pub mod builder;
pub mod error;
pub mod graph;
pub mod indexing;
pub(crate) mod order;
pub(crate) mod validate;

pub use builder::{GraphBuilder, NodeHandle};
pub use error::{GraphError, GraphResult};
pub use graph::{Graph, InputDecl, Interface, Node, NodeKind, OutputDecl, Port, Signal};
pub use indexing::IndexMap;
