//! Error types for solver operations.

use pf_components::ComponentError;
use pf_core::error::PfError;
use thiserror::Error;

/// Errors that can occur while evaluating or solving a graph.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Problem setup error: {what}")]
    ProblemSetup { what: String },

    #[error("Convergence failed: {what}")]
    ConvergenceFailed { what: String },

    #[error("Invalid state: {what}")]
    InvalidState { what: String },

    #[error("Block '{node}' failed: {source}")]
    Component {
        node: String,
        #[source]
        source: ComponentError,
    },

    #[error("Graph error: {0}")]
    Graph(#[from] pf_graph::GraphError),

    #[error("Numeric error: {what}")]
    Numeric { what: String },

    #[error(transparent)]
    Core(#[from] PfError),
}

pub type SolverResult<T> = Result<T, SolverError>;

impl From<SolverError> for PfError {
    fn from(e: SolverError) -> Self {
        match e {
            SolverError::ProblemSetup { .. } => PfError::InvalidArg {
                what: "problem setup",
            },
            SolverError::ConvergenceFailed { .. } => PfError::InvalidArg {
                what: "convergence",
            },
            SolverError::InvalidState { .. } => PfError::InvalidArg { what: "state" },
            SolverError::Component { .. } => PfError::InvalidArg { what: "component" },
            SolverError::Graph(_) => PfError::InvalidArg { what: "graph" },
            SolverError::Numeric { .. } => PfError::InvalidArg { what: "numeric" },
            SolverError::Core(inner) => inner,
        }
    }
}
