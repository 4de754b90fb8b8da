//! Error types for architecture compilation and analysis.

use pf_components::ComponentError;
use pf_graph::GraphError;
use pf_solver::SolverError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ArchError {
    /// Invalid or incomplete combination of elements.
    #[error("configuration error: {what}")]
    Configuration { what: String },

    /// Recognized combination that is not supported yet.
    #[error("not implemented: {what}")]
    Unimplemented { what: String },

    /// A required connection point was never produced. Always a builder defect.
    #[error("unwired: {what}")]
    Unwired { what: String },

    #[error("invalid element '{element}': {source}")]
    InvalidElement {
        element: String,
        #[source]
        source: ComponentError,
    },

    #[error("graph error: {0}")]
    Graph(GraphError),

    #[error(transparent)]
    Solver(#[from] SolverError),
}

impl ArchError {
    pub(crate) fn config(what: impl Into<String>) -> Self {
        Self::Configuration { what: what.into() }
    }

    pub(crate) fn unimplemented(what: impl Into<String>) -> Self {
        Self::Unimplemented { what: what.into() }
    }

    pub(crate) fn unwired(what: impl Into<String>) -> Self {
        Self::Unwired { what: what.into() }
    }

    /// True for user-facing configuration problems (including unsupported combinations).
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. } | Self::Unimplemented { .. })
    }
}

impl From<GraphError> for ArchError {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::UnconnectedInput { port } => Self::Unwired {
                what: format!("input '{port}' has no source"),
            },
            other => Self::Graph(other),
        }
    }
}

pub type ArchResult<T> = Result<T, ArchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unconnected_input_is_reported_as_unwired() {
        let err: ArchError = GraphError::UnconnectedInput {
            port: "thrust1.in_collect.shaft_power".into(),
        }
        .into();
        assert!(matches!(err, ArchError::Unwired { .. }));
        assert!(!err.is_configuration());
    }

    #[test]
    fn unimplemented_counts_as_configuration() {
        assert!(ArchError::unimplemented("AC chains").is_configuration());
        assert!(ArchError::config("missing bus").is_configuration());
    }
}
