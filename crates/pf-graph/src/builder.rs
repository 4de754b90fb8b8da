//! Incremental graph builder.

use std::collections::BTreeMap;

use pf_core::{NodeId, PortId, SignalId};

use crate::error::{GraphError, GraphResult};
use crate::graph::{Graph, Interface, Node, Port, Signal};
use crate::{order, validate};

/// Handles returned when a node is added: its ID plus port and signal IDs
/// in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeHandle {
    pub id: NodeId,
    pub inputs: Vec<PortId>,
    pub outputs: Vec<SignalId>,
}

impl NodeHandle {
    /// Port for the `i`-th declared input (panics if out of range).
    pub fn input(&self, i: usize) -> PortId {
        self.inputs[i]
    }

    /// Signal for the `i`-th declared output (panics if out of range).
    pub fn output(&self, i: usize) -> SignalId {
        self.outputs[i]
    }
}

/// Builder for constructing a graph incrementally.
///
/// Use `add_node`, `connect` and `alias` to build up the graph,
/// then call `build()` to validate and freeze it into an immutable `Graph`.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: Vec<Node>,
    ports: Vec<Port>,
    signals: Vec<Signal>,
    aliases: BTreeMap<String, SignalId>,
    group_order: Vec<String>,
}

impl GraphBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node with the given port layout.
    ///
    /// The node's group is the first segment of its dotted name.
    pub fn add_node(&mut self, name: impl Into<String>, interface: Interface) -> NodeHandle {
        let name = name.into();
        let id = NodeId::from_index(self.nodes.len() as u32);
        let group = name.split('.').next().unwrap_or_default().to_string();

        let mut inputs = Vec::with_capacity(interface.inputs.len());
        for decl in interface.inputs {
            let port_id = PortId::from_index(self.ports.len() as u32);
            self.ports.push(Port {
                id: port_id,
                node: id,
                name: decl.name,
                len: decl.len,
                unit: decl.unit,
                default: decl.default,
                required: decl.required,
                source: None,
            });
            inputs.push(port_id);
        }

        let mut outputs = Vec::with_capacity(interface.outputs.len());
        for decl in interface.outputs {
            let signal_id = SignalId::from_index(self.signals.len() as u32);
            self.signals.push(Signal {
                id: signal_id,
                node: id,
                name: decl.name,
                len: decl.len,
                unit: decl.unit,
                initial: decl.initial,
            });
            outputs.push(signal_id);
        }

        self.nodes.push(Node {
            id,
            name,
            group,
            kind: interface.kind,
            inputs: inputs.clone(),
            outputs: outputs.clone(),
        });

        NodeHandle {
            id,
            inputs,
            outputs,
        }
    }

    /// Drive `to` with `from`.
    ///
    /// Shapes and units are checked immediately so the error names the
    /// offending connection.
    pub fn connect(&mut self, from: SignalId, to: PortId) -> GraphResult<()> {
        let signal = self
            .signals
            .get(from.slot())
            .ok_or(GraphError::InvalidSignalRef { signal: from })?;
        let port = self
            .ports
            .get(to.slot())
            .ok_or(GraphError::InvalidPortRef { port: to })?;

        if port.source.is_some() {
            return Err(GraphError::AlreadyConnected {
                port: self.port_path(port),
            });
        }
        validate::check_connection(
            signal,
            port,
            || self.signal_path(signal),
            || self.port_path(port),
        )?;

        self.ports[to.slot()].source = Some(from);
        Ok(())
    }

    /// Register an additional path for an existing signal without adding a node.
    pub fn alias(&mut self, path: impl Into<String>, signal: SignalId) -> GraphResult<()> {
        if signal.slot() >= self.signals.len() {
            return Err(GraphError::InvalidSignalRef { signal });
        }
        let path = path.into();
        if self.aliases.contains_key(&path) {
            return Err(GraphError::DuplicateName { name: path });
        }
        self.aliases.insert(path, signal);
        Ok(())
    }

    /// Preferred group order for evaluation. Groups not listed run last.
    pub fn set_group_order<I, S>(&mut self, groups: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group_order = groups.into_iter().map(Into::into).collect();
    }

    /// Length of a signal, if it exists.
    pub fn signal_len(&self, id: SignalId) -> Option<usize> {
        self.signals.get(id.slot()).map(|s| s.len)
    }

    /// Number of nodes added so far.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether a port already has a driver.
    pub fn is_connected(&self, id: PortId) -> bool {
        self.ports
            .get(id.slot())
            .is_some_and(|p| p.source.is_some())
    }

    /// Build and validate the graph, returning an immutable `Graph`.
    pub fn build(self) -> GraphResult<Graph> {
        validate::validate_structure(&self.nodes, &self.ports, &self.signals, &self.aliases)?;

        let order = order::evaluation_order(&self.nodes, &self.ports, &self.signals, &self.group_order)?;

        Ok(Graph {
            nodes: self.nodes,
            ports: self.ports,
            signals: self.signals,
            aliases: self.aliases,
            order: order.explicit,
            implicit: order.implicit,
            feedback: order.feedback,
        })
    }

    fn signal_path(&self, signal: &Signal) -> String {
        format!("{}.{}", self.nodes[signal.node.slot()].name, signal.name)
    }

    fn port_path(&self, port: &Port) -> String {
        format!("{}.{}", self.nodes[port.node.slot()].name, port.name)
    }
}
