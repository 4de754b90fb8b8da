//! Graph plus the blocks behind its nodes, built side by side.

use pf_components::{Block, ComponentResult, Passthrough, PassthroughEntry};
use pf_core::{PortId, SignalId};
use pf_graph::{Graph, GraphBuilder, InputDecl, NodeHandle};

use crate::error::{ArchError, ArchResult};

/// Join a scope and a name into a dotted path.
pub fn path(scope: &str, name: &str) -> String {
    if scope.is_empty() {
        name.to_string()
    } else {
        format!("{scope}.{name}")
    }
}

/// Map a component constructor error onto the element that caused it.
pub fn element<T>(name: &str, result: ComponentResult<T>) -> ArchResult<T> {
    result.map_err(|source| ArchError::InvalidElement {
        element: name.to_string(),
        source,
    })
}

/// Incremental model: every node added to the graph gets its block.
#[derive(Default)]
pub struct ModelBuilder {
    graph: GraphBuilder,
    blocks: Vec<Box<dyn Block>>,
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `block` as the node at `path`.
    pub fn add(&mut self, path: String, block: impl Block + 'static) -> NodeHandle {
        let handle = self.graph.add_node(path, block.interface());
        self.blocks.push(Box::new(block));
        handle
    }

    pub fn connect(&mut self, from: SignalId, to: PortId) -> ArchResult<()> {
        Ok(self.graph.connect(from, to)?)
    }

    pub fn alias(&mut self, path: String, signal: SignalId) -> ArchResult<()> {
        Ok(self.graph.alias(path, signal)?)
    }

    pub fn signal_len(&self, id: SignalId) -> ArchResult<usize> {
        self.graph
            .signal_len(id)
            .ok_or_else(|| ArchError::unwired(format!("signal {id} does not exist")))
    }

    /// Default-valued ports that the enclosing layer may drive.
    ///
    /// Each port is mirrored by an output of the same name.
    pub fn collect_inputs(&mut self, scope: &str, name: &str, inputs: Vec<InputDecl>) -> Collected {
        let names = inputs.iter().map(|d| d.name.clone()).collect();
        let entries = inputs.into_iter().map(PassthroughEntry::same).collect();
        let node = path(scope, name);
        let handle = self.add(node.clone(), Passthrough::new(name, entries));
        Collected {
            node,
            handle,
            names,
        }
    }

    pub fn node_count(&self) -> usize {
        self.blocks.len()
    }

    /// Validate and freeze.
    pub fn finish<I, S>(mut self, group_order: I) -> ArchResult<(Graph, Vec<Box<dyn Block>>)>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.graph.set_group_order(group_order);
        let graph = self.graph.build()?;
        Ok((graph, self.blocks))
    }
}

/// Handle to a `collect_inputs` node.
#[derive(Debug, Clone)]
pub struct Collected {
    node: String,
    handle: NodeHandle,
    names: Vec<String>,
}

impl Collected {
    fn position(&self, name: &str) -> ArchResult<usize> {
        self.names
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| ArchError::unwired(format!("{}.{name} is not declared", self.node)))
    }

    /// Port feeding the value in.
    pub fn port(&self, name: &str) -> ArchResult<PortId> {
        Ok(self.handle.input(self.position(name)?))
    }

    /// Signal carrying the value on.
    pub fn signal(&self, name: &str) -> ArchResult<SignalId> {
        Ok(self.handle.output(self.position(name)?))
    }

    pub fn has(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }
}
