//! Graph-specific error types.

use pf_core::{PfError, PortId, SignalId, SignalUnit};

pub type GraphResult<T> = Result<T, GraphError>;

/// Graph construction and validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// Two nodes (or a node and an alias) share a path.
    #[error("Name '{name}' is used more than once")]
    DuplicateName { name: String },

    /// A connection refers to a signal that doesn't exist.
    #[error("Signal {signal} does not exist")]
    InvalidSignalRef { signal: SignalId },

    #[error("Port {port} does not exist")]
    InvalidPortRef { port: PortId },

    /// A port already has a driving signal.
    #[error("Port '{port}' is already driven by another signal")]
    AlreadyConnected { port: String },

    /// Signal and port lengths are incompatible (only scalar-to-vector broadcasts).
    #[error("Cannot connect '{from}' (len {from_len}) to '{to}' (len {to_len})")]
    ShapeMismatch {
        from: String,
        to: String,
        from_len: usize,
        to_len: usize,
    },

    #[error("Cannot connect '{from}' [{from_unit}] to '{to}' [{to_unit}]")]
    UnitMismatch {
        from: String,
        to: String,
        from_unit: SignalUnit,
        to_unit: SignalUnit,
    },

    /// A required port was never driven.
    #[error("Required input '{port}' is not connected")]
    UnconnectedInput { port: String },

    /// Explicit nodes depend on each other in a cycle.
    #[error("Algebraic loop through: {}", nodes.join(" -> "))]
    AlgebraicLoop { nodes: Vec<String> },

    #[error("{what} not found in index map")]
    IdNotFound { what: &'static str },
}

impl From<GraphError> for PfError {
    fn from(err: GraphError) -> Self {
        PfError::Invariant {
            what: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offender() {
        let dup = GraphError::DuplicateName { name: "thrust1.prop1".into() };
        assert_eq!(dup.to_string(), "Name 'thrust1.prop1' is used more than once");

        let cycle = GraphError::AlgebraicLoop {
            nodes: vec!["a".into(), "b".into()],
        };
        assert_eq!(cycle.to_string(), "Algebraic loop through: a -> b");

        let pf: PfError = dup.into();
        assert!(pf.to_string().contains("thrust1.prop1"));
    }
}
