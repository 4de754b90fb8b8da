//! Evaluation order for explicit nodes.
//!
//! Kahn's algorithm over producer -> consumer edges, picking the ready node
//! with the lowest (group rank, declaration index) at each step. Edges into
//! implicit nodes are dropped: their inputs only feed residuals, and their
//! outputs are set from solver unknowns before the explicit pass runs.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use pf_core::NodeId;

use crate::error::{GraphError, GraphResult};
use crate::graph::{Node, NodeKind, Port, Signal};

pub(crate) struct Order {
    pub explicit: Vec<NodeId>,
    pub implicit: Vec<NodeId>,
    pub feedback: usize,
}

pub(crate) fn evaluation_order(
    nodes: &[Node],
    ports: &[Port],
    signals: &[Signal],
    group_order: &[String],
) -> GraphResult<Order> {
    let rank = |node: &Node| {
        group_order
            .iter()
            .position(|g| *g == node.group)
            .unwrap_or(group_order.len())
    };

    let mut deps: DiGraph<NodeId, ()> = DiGraph::with_capacity(nodes.len(), ports.len());
    let indices: Vec<NodeIndex> = nodes.iter().map(|n| deps.add_node(n.id)).collect();

    let mut feedback = 0;
    for port in ports {
        let Some(source) = port.source else {
            continue;
        };
        let producer = &nodes[signals[source.slot()].node.slot()];
        let consumer = &nodes[port.node.slot()];
        if consumer.kind == NodeKind::Implicit || producer.kind == NodeKind::Implicit {
            continue;
        }
        if rank(producer) > rank(consumer) {
            feedback += 1;
        }
        deps.add_edge(indices[producer.id.slot()], indices[consumer.id.slot()], ());
    }

    let mut in_degree: Vec<usize> = vec![0; nodes.len()];
    for edge in deps.raw_edges() {
        in_degree[edge.target().index()] += 1;
    }

    let explicit_count = nodes
        .iter()
        .filter(|n| n.kind == NodeKind::Explicit)
        .count();

    let mut ready = BinaryHeap::new();
    for node in nodes.iter().filter(|n| n.kind == NodeKind::Explicit) {
        if in_degree[node.id.slot()] == 0 {
            ready.push(Reverse((rank(node), node.id.slot())));
        }
    }

    let mut explicit = Vec::with_capacity(explicit_count);
    while let Some(Reverse((_, slot))) = ready.pop() {
        explicit.push(nodes[slot].id);
        for next in deps.neighbors(indices[slot]) {
            // parallel edges are visited once per edge, matching in_degree
            let i = next.index();
            in_degree[i] -= 1;
            if in_degree[i] == 0 {
                ready.push(Reverse((rank(&nodes[i]), i)));
            }
        }
    }

    if explicit.len() < explicit_count {
        return Err(GraphError::AlgebraicLoop {
            nodes: loop_members(&deps, nodes),
        });
    }

    let implicit = nodes
        .iter()
        .filter(|n| n.kind == NodeKind::Implicit)
        .map(|n| n.id)
        .collect();

    Ok(Order {
        explicit,
        implicit,
        feedback,
    })
}

fn loop_members(deps: &DiGraph<NodeId, ()>, nodes: &[Node]) -> Vec<String> {
    tarjan_scc(deps)
        .into_iter()
        .find(|scc| scc.len() > 1 || deps.contains_edge(scc[0], scc[0]))
        .map(|scc| {
            let mut names: Vec<String> = scc
                .into_iter()
                .map(|ix| nodes[deps[ix].slot()].name.clone())
                .collect();
            names.sort();
            names
        })
        .unwrap_or_default()
}
