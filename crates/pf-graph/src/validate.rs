//! Graph validation logic.

use std::collections::{BTreeMap, HashSet};

use pf_core::SignalId;

use crate::error::{GraphError, GraphResult};
use crate::graph::{Node, Port, Signal};

/// Shape and unit compatibility of a single connection.
pub(crate) fn check_connection(
    signal: &Signal,
    port: &Port,
    from: impl FnOnce() -> String,
    to: impl FnOnce() -> String,
) -> GraphResult<()> {
    if signal.unit != port.unit {
        return Err(GraphError::UnitMismatch {
            from: from(),
            to: to(),
            from_unit: signal.unit,
            to_unit: port.unit,
        });
    }
    if signal.len != port.len && signal.len != 1 {
        return Err(GraphError::ShapeMismatch {
            from: from(),
            to: to(),
            from_len: signal.len,
            to_len: port.len,
        });
    }
    Ok(())
}

/// Validate the graph structure: unique names, live references, compatible
/// connections, and every required port driven.
pub(crate) fn validate_structure(
    nodes: &[Node],
    ports: &[Port],
    signals: &[Signal],
    aliases: &BTreeMap<String, SignalId>,
) -> GraphResult<()> {
    let mut names: HashSet<&str> = HashSet::with_capacity(nodes.len());
    for node in nodes {
        if !names.insert(node.name.as_str()) {
            return Err(GraphError::DuplicateName {
                name: node.name.clone(),
            });
        }
    }

    for &signal in aliases.values() {
        if signal.slot() >= signals.len() {
            return Err(GraphError::InvalidSignalRef { signal });
        }
    }

    let port_path = |port: &Port| format!("{}.{}", nodes[port.node.slot()].name, port.name);

    for port in ports {
        match port.source {
            Some(id) => {
                let signal = signals
                    .get(id.slot())
                    .ok_or(GraphError::InvalidSignalRef { signal: id })?;
                check_connection(
                    signal,
                    port,
                    || format!("{}.{}", nodes[signal.node.slot()].name, signal.name),
                    || port_path(port),
                )?;
            }
            None if port.required => {
                return Err(GraphError::UnconnectedInput {
                    port: port_path(port),
                });
            }
            None => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeKind;
    use pf_core::{Id, SignalUnit};

    fn node(i: u32, name: &str) -> Node {
        Node {
            id: Id::from_index(i),
            name: name.into(),
            group: name.into(),
            kind: NodeKind::Explicit,
            inputs: vec![],
            outputs: vec![],
        }
    }

    fn port(source: Option<u32>, required: bool) -> Port {
        Port {
            id: Id::from_index(0),
            node: Id::from_index(0),
            name: "x".into(),
            len: 2,
            unit: SignalUnit::Kilowatt,
            default: vec![0.0; 2],
            required,
            source: source.map(Id::from_index),
        }
    }

    #[test]
    fn validate_empty_graph() {
        assert!(validate_structure(&[], &[], &[], &BTreeMap::new()).is_ok());
    }

    #[test]
    fn duplicate_node_names() {
        let nodes = vec![node(0, "a"), node(1, "a")];
        let err = validate_structure(&nodes, &[], &[], &BTreeMap::new()).unwrap_err();
        assert_eq!(err, GraphError::DuplicateName { name: "a".into() });
    }

    #[test]
    fn required_port_must_be_driven() {
        let nodes = vec![node(0, "sink")];
        let err = validate_structure(&nodes, &[port(None, true)], &[], &BTreeMap::new())
            .unwrap_err();
        assert_eq!(
            err,
            GraphError::UnconnectedInput {
                port: "sink.x".into()
            }
        );
        assert!(validate_structure(&nodes, &[port(None, false)], &[], &BTreeMap::new()).is_ok());
    }

    #[test]
    fn dangling_source_is_reported() {
        let nodes = vec![node(0, "sink")];
        let err = validate_structure(&nodes, &[port(Some(9), false)], &[], &BTreeMap::new())
            .unwrap_err();
        assert!(matches!(err, GraphError::InvalidSignalRef { .. }));
    }
}
