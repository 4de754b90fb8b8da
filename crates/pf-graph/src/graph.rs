//! Core graph data structures.

use std::collections::BTreeMap;

use pf_core::{NodeId, PortId, Real, SignalId, SignalUnit};

/// How a node takes part in evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Outputs are a function of inputs, evaluated in topological order.
    Explicit,
    /// Outputs are solver unknowns; inputs and outputs feed residual equations.
    Implicit,
}

/// Declaration of one input port of a block.
#[derive(Debug, Clone, PartialEq)]
pub struct InputDecl {
    pub name: String,
    /// 1 for scalars, the analysis-point count for vectors.
    pub len: usize,
    pub unit: SignalUnit,
    /// Value used when nothing drives the port.
    pub default: Vec<Real>,
    /// A required port must be connected before the graph can be built.
    pub required: bool,
}

impl InputDecl {
    pub fn scalar(name: impl Into<String>, unit: SignalUnit, default: Real) -> Self {
        Self::vector(name, 1, unit, default)
    }

    pub fn vector(name: impl Into<String>, len: usize, unit: SignalUnit, default: Real) -> Self {
        Self {
            name: name.into(),
            len,
            unit,
            default: vec![default; len],
            required: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Declaration of one output of a block.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputDecl {
    pub name: String,
    pub len: usize,
    pub unit: SignalUnit,
    /// Starting value; for implicit nodes this is the solver's initial guess.
    pub initial: Real,
}

impl OutputDecl {
    pub fn scalar(name: impl Into<String>, unit: SignalUnit) -> Self {
        Self::vector(name, 1, unit)
    }

    pub fn vector(name: impl Into<String>, len: usize, unit: SignalUnit) -> Self {
        Self {
            name: name.into(),
            len,
            unit,
            initial: 0.0,
        }
    }

    pub fn with_initial(mut self, initial: Real) -> Self {
        self.initial = initial;
        self
    }
}

/// Port layout of a block.
#[derive(Debug, Clone, PartialEq)]
pub struct Interface {
    pub kind: NodeKind,
    pub inputs: Vec<InputDecl>,
    pub outputs: Vec<OutputDecl>,
}

impl Interface {
    pub fn explicit(inputs: Vec<InputDecl>, outputs: Vec<OutputDecl>) -> Self {
        Self {
            kind: NodeKind::Explicit,
            inputs,
            outputs,
        }
    }

    pub fn implicit(inputs: Vec<InputDecl>, outputs: Vec<OutputDecl>) -> Self {
        Self {
            kind: NodeKind::Implicit,
            inputs,
            outputs,
        }
    }
}

/// One block instance in the graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    /// Full dotted path, unique within the graph (e.g. `mech.mech1.turboshaft`).
    pub name: String,
    /// Top-level group, used by the evaluation order hint.
    pub group: String,
    pub kind: NodeKind,
    pub inputs: Vec<PortId>,
    pub outputs: Vec<SignalId>,
}

/// An input port. Driven by at most one signal.
#[derive(Debug, Clone, PartialEq)]
pub struct Port {
    pub id: PortId,
    pub node: NodeId,
    pub name: String,
    pub len: usize,
    pub unit: SignalUnit,
    pub default: Vec<Real>,
    pub required: bool,
    pub source: Option<SignalId>,
}

/// An output value produced by a node.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    pub id: SignalId,
    pub node: NodeId,
    pub name: String,
    pub len: usize,
    pub unit: SignalUnit,
    pub initial: Real,
}

/// The graph: a validated, immutable arena of nodes, ports, and signals.
///
/// All objects live in vectors indexed by their IDs. The evaluation order
/// covers explicit nodes only; implicit nodes are listed separately in
/// declaration order, which is also the order of solver unknowns.
#[derive(Debug, Clone)]
pub struct Graph {
    pub(crate) nodes: Vec<Node>,
    pub(crate) ports: Vec<Port>,
    pub(crate) signals: Vec<Signal>,
    pub(crate) aliases: BTreeMap<String, SignalId>,
    pub(crate) order: Vec<NodeId>,
    pub(crate) implicit: Vec<NodeId>,
    pub(crate) feedback: usize,
}

impl Graph {
    /// Return all nodes.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Return all input ports.
    pub fn ports(&self) -> &[Port] {
        &self.ports
    }

    /// Return all signals.
    pub fn signals(&self) -> &[Signal] {
        &self.signals
    }

    /// Get a node by ID (returns None if ID out of bounds).
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.slot())
    }

    /// Get a port by ID (returns None if ID out of bounds).
    pub fn port(&self, id: PortId) -> Option<&Port> {
        self.ports.get(id.slot())
    }

    /// Get a signal by ID (returns None if ID out of bounds).
    pub fn signal(&self, id: SignalId) -> Option<&Signal> {
        self.signals.get(id.slot())
    }

    /// Explicit nodes in the order they must be evaluated.
    pub fn evaluation_order(&self) -> &[NodeId] {
        &self.order
    }

    /// Implicit nodes, in declaration order.
    pub fn implicit_nodes(&self) -> &[NodeId] {
        &self.implicit
    }

    /// Connections whose producer belongs to a group hinted to run after the consumer's group.
    pub fn feedback_count(&self) -> usize {
        self.feedback
    }

    /// Alternate names registered for existing signals.
    pub fn aliases(&self) -> &BTreeMap<String, SignalId> {
        &self.aliases
    }

    /// Dotted path of a signal (`node.output`).
    pub fn signal_path(&self, id: SignalId) -> Option<String> {
        let signal = self.signal(id)?;
        let node = self.node(signal.node)?;
        Some(format!("{}.{}", node.name, signal.name))
    }

    /// Dotted path of a port (`node.input`).
    pub fn port_path(&self, id: PortId) -> Option<String> {
        let port = self.port(id)?;
        let node = self.node(port.node)?;
        Some(format!("{}.{}", node.name, port.name))
    }

    /// Look a signal up by alias or by `node.output` path.
    pub fn signal_by_path(&self, path: &str) -> Option<SignalId> {
        if let Some(&id) = self.aliases.get(path) {
            return Some(id);
        }
        let (node_name, output) = path.rsplit_once('.')?;
        let node = self.nodes.iter().find(|n| n.name == node_name)?;
        node.outputs
            .iter()
            .copied()
            .find(|&s| self.signals[s.slot()].name == output)
    }

    /// Look a port up by `node.input` path.
    pub fn port_by_path(&self, path: &str) -> Option<PortId> {
        let (node_name, input) = path.rsplit_once('.')?;
        let node = self.nodes.iter().find(|n| n.name == node_name)?;
        node.inputs
            .iter()
            .copied()
            .find(|&p| self.ports[p.slot()].name == input)
    }

    /// Ports driven by a signal.
    pub fn consumers(&self, id: SignalId) -> Vec<PortId> {
        self.ports
            .iter()
            .filter(|p| p.source == Some(id))
            .map(|p| p.id)
            .collect()
    }
}
