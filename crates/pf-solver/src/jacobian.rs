//! Finite difference Jacobian computation.
//!
//! Columns are independent, so they are evaluated in parallel.

use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;

use crate::error::SolverResult;

/// Compute Jacobian using forward finite differences.
///
/// For each column j, perturbs x[j] by epsilon and computes (f(x+e) - f(x))/epsilon.
pub fn finite_difference_jacobian<F>(
    x: &DVector<f64>,
    f: F,
    epsilon: f64,
) -> SolverResult<DMatrix<f64>>
where
    F: Fn(&DVector<f64>) -> SolverResult<DVector<f64>> + Sync,
{
    let f_x = f(x)?;
    let columns: Vec<DVector<f64>> = (0..x.len())
        .into_par_iter()
        .map(|j| -> SolverResult<DVector<f64>> {
            let dx = epsilon * x[j].abs().max(1.0);
            let mut x_perturbed = x.clone();
            x_perturbed[j] += dx;
            Ok((f(&x_perturbed)? - &f_x) / dx)
        })
        .collect::<SolverResult<_>>()?;

    Ok(assemble(f_x.len(), columns))
}

/// Compute Jacobian using central finite differences (more accurate but 2x cost).
pub fn central_difference_jacobian<F>(
    x: &DVector<f64>,
    f: F,
    epsilon: f64,
) -> SolverResult<DMatrix<f64>>
where
    F: Fn(&DVector<f64>) -> SolverResult<DVector<f64>> + Sync,
{
    let columns: Vec<DVector<f64>> = (0..x.len())
        .into_par_iter()
        .map(|j| -> SolverResult<DVector<f64>> {
            let dx = epsilon * x[j].abs().max(1.0);

            let mut x_plus = x.clone();
            x_plus[j] += dx;
            let f_plus = f(&x_plus)?;

            let mut x_minus = x.clone();
            x_minus[j] -= dx;
            let f_minus = f(&x_minus)?;

            Ok((f_plus - f_minus) / (2.0 * dx))
        })
        .collect::<SolverResult<_>>()?;

    let m = match columns.first() {
        Some(c) => c.len(),
        None => f(x)?.len(),
    };
    Ok(assemble(m, columns))
}

fn assemble(m: usize, columns: Vec<DVector<f64>>) -> DMatrix<f64> {
    let mut jac = DMatrix::zeros(m, columns.len());
    for (j, column) in columns.iter().enumerate() {
        jac.set_column(j, column);
    }
    jac
}
