//! Stable value layout for solver integration.
//!
//! Every signal gets a contiguous slice of one flat value buffer, and every
//! implicit output gets a contiguous slice of the unknown vector. Both are
//! laid out in ID order so repeated builds of the same architecture agree.

use std::ops::Range;

use pf_core::{PfResult, SignalId};

use crate::error::GraphError;
use crate::graph::Graph;

#[derive(Debug, Clone)]
pub struct IndexMap {
    /// Start of each signal in the value buffer, by signal slot.
    value_offsets: Vec<usize>,
    value_lens: Vec<usize>,
    value_len: usize,

    /// Start of each signal in the unknown vector (None for explicit outputs).
    unknown_offsets: Vec<Option<usize>>,
    unknown_signals: Vec<SignalId>,
    unknown_len: usize,
}

impl IndexMap {
    /// Build an index map from a graph.
    pub fn from_graph(graph: &Graph) -> Self {
        let signals = graph.signals();

        let mut value_offsets = Vec::with_capacity(signals.len());
        let mut value_lens = Vec::with_capacity(signals.len());
        let mut value_len = 0;
        for signal in signals {
            value_offsets.push(value_len);
            value_lens.push(signal.len);
            value_len += signal.len;
        }

        let mut unknown_offsets = vec![None; signals.len()];
        let mut unknown_signals = Vec::new();
        let mut unknown_len = 0;
        for &node_id in graph.implicit_nodes() {
            let Some(node) = graph.node(node_id) else {
                continue;
            };
            for &signal in &node.outputs {
                unknown_offsets[signal.slot()] = Some(unknown_len);
                unknown_signals.push(signal);
                unknown_len += value_lens[signal.slot()];
            }
        }

        Self {
            value_offsets,
            value_lens,
            value_len,
            unknown_offsets,
            unknown_signals,
            unknown_len,
        }
    }

    /// Length of the flat value buffer.
    pub fn value_len(&self) -> usize {
        self.value_len
    }

    /// Length of the unknown vector.
    pub fn unknown_len(&self) -> usize {
        self.unknown_len
    }

    /// Signals backed by unknowns, in unknown-vector order.
    pub fn unknown_signals(&self) -> &[SignalId] {
        &self.unknown_signals
    }

    /// Slice of the value buffer holding a signal.
    pub fn value_range(&self, id: SignalId) -> PfResult<Range<usize>> {
        let slot = id.slot();
        let start = *self
            .value_offsets
            .get(slot)
            .ok_or(GraphError::IdNotFound { what: "SignalId" })?;
        Ok(start..start + self.value_lens[slot])
    }

    /// Slice of the unknown vector holding an implicit output.
    pub fn unknown_range(&self, id: SignalId) -> PfResult<Range<usize>> {
        let slot = id.slot();
        let start = self
            .unknown_offsets
            .get(slot)
            .copied()
            .flatten()
            .ok_or(GraphError::IdNotFound {
                what: "unknown SignalId",
            })?;
        Ok(start..start + self.value_lens[slot])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::GraphBuilder;
    use crate::graph::{InputDecl, Interface, OutputDecl};
    use pf_core::SignalUnit;

    #[test]
    fn value_layout_is_contiguous() {
        let mut b = GraphBuilder::new();
        let a = b.add_node(
            "a",
            Interface::explicit(
                vec![],
                vec![
                    OutputDecl::vector("v", 3, SignalUnit::Kilowatt),
                    OutputDecl::scalar("w", SignalUnit::Kilogram),
                ],
            ),
        );
        let graph = b.build().unwrap();
        let idx = IndexMap::from_graph(&graph);

        assert_eq!(idx.value_len(), 4);
        assert_eq!(idx.value_range(a.output(0)).unwrap(), 0..3);
        assert_eq!(idx.value_range(a.output(1)).unwrap(), 3..4);
        assert_eq!(idx.unknown_len(), 0);
        assert!(idx.unknown_range(a.output(0)).is_err());
    }

    #[test]
    fn implicit_outputs_become_unknowns() {
        let mut b = GraphBuilder::new();
        b.add_node(
            "src",
            Interface::explicit(vec![], vec![OutputDecl::vector("p", 2, SignalUnit::Kilowatt)]),
        );
        let bal = b.add_node(
            "bal",
            Interface::implicit(
                vec![InputDecl::vector("required", 2, SignalUnit::Kilowatt, 0.0)],
                vec![OutputDecl::vector("throttle", 2, SignalUnit::Unitless).with_initial(0.5)],
            ),
        );
        let graph = b.build().unwrap();
        let idx = IndexMap::from_graph(&graph);

        assert_eq!(idx.unknown_len(), 2);
        assert_eq!(idx.unknown_signals(), &[bal.output(0)]);
        assert_eq!(idx.unknown_range(bal.output(0)).unwrap(), 0..2);
        assert_eq!(idx.value_range(bal.output(0)).unwrap(), 2..4);
    }

    #[test]
    fn invalid_id_is_reported() {
        let graph = GraphBuilder::new().build().unwrap();
        let idx = IndexMap::from_graph(&graph);
        assert!(idx.value_range(SignalId::from_index(999)).is_err());
    }
}
