//! Nonlinear solver for compiled propulsion graphs.
//!
//! The unknowns are the outputs of implicit nodes (balanced throttles) and
//! the residuals are the equations those nodes contribute. Each residual
//! evaluation runs every explicit node once in the graph's evaluation order.
//! A damped Newton iteration with a finite-difference Jacobian drives the
//! residuals to zero.

pub mod error;
pub mod jacobian;
pub mod newton;
pub mod problem;
pub mod solution;
pub mod solve;

pub use error::{SolverError, SolverResult};
pub use newton::{NewtonConfig, NewtonResult};
pub use problem::Problem;
pub use solution::Solution;
pub use solve::{evaluate, solve};
