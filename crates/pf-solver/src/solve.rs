//! Solve entry points.

use nalgebra::DVector;
use tracing::info;

use crate::error::{SolverError, SolverResult};
use crate::jacobian::{central_difference_jacobian, finite_difference_jacobian};
use crate::newton::{NewtonConfig, newton_solve};
use crate::problem::Problem;
use crate::solution::Solution;

/// Evaluate a graph without implicit nodes.
pub fn evaluate(problem: &Problem<'_>) -> SolverResult<Solution> {
    if problem.num_unknowns() != 0 {
        return Err(SolverError::ProblemSetup {
            what: format!(
                "graph has {} unknowns; use solve()",
                problem.num_unknowns()
            ),
        });
    }
    let x = DVector::zeros(0);
    let values = problem.evaluate(&x)?;
    Ok(Solution::new(values, problem.index().clone(), x, 0.0, 0))
}

/// Drive all residuals to zero.
///
/// Starts from `initial_guess` when given (e.g. the previous segment's
/// solution of the same graph), otherwise from the declared initial values.
pub fn solve(
    problem: &Problem<'_>,
    config: Option<NewtonConfig>,
    initial_guess: Option<&Solution>,
) -> SolverResult<Solution> {
    let config = config.unwrap_or_default();
    let n = problem.num_unknowns();
    if n == 0 {
        return evaluate(problem);
    }

    let x0 = match initial_guess {
        Some(prev) if prev.unknowns.len() == n => prev.unknowns.clone(),
        Some(prev) => {
            return Err(SolverError::ProblemSetup {
                what: format!(
                    "initial guess has {} unknowns, problem has {}",
                    prev.unknowns.len(),
                    n
                ),
            });
        }
        None => problem.initial_guess(),
    };

    let residual = |x: &DVector<f64>| problem.residuals(x);
    let epsilon = config.fd_epsilon;
    let result = if config.central_differences {
        newton_solve(
            x0,
            residual,
            |x| central_difference_jacobian(x, residual, epsilon),
            &config,
        )?
    } else {
        newton_solve(
            x0,
            residual,
            |x| finite_difference_jacobian(x, residual, epsilon),
            &config,
        )?
    };

    let values = problem.evaluate(&result.x)?;
    info!(
        unknowns = n,
        iterations = result.iterations,
        residual_norm = result.residual_norm,
        "solve converged"
    );
    Ok(Solution::new(
        values,
        problem.index().clone(),
        result.x,
        result.residual_norm,
        result.iterations,
    ))
}
