use crate::PfError;

/// Floating point type used throughout the system.
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, PfError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(PfError::NonFinite { what, value: v })
    }
}

/// Stretch a scalar to `len` points, or pass a vector of exactly `len` through.
pub fn broadcast(values: &[Real], len: usize, what: &'static str) -> Result<Vec<Real>, PfError> {
    match values.len() {
        n if n == len => Ok(values.to_vec()),
        1 => Ok(vec![values[0]; len]),
        n => Err(PfError::IndexOob {
            what,
            index: n,
            len,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearly_equal_basic() {
        let tol = Tolerances {
            abs: 1e-12,
            rel: 1e-9,
        };
        assert!(nearly_equal(1.0, 1.0 + 1e-12, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn broadcast_scalar_and_vector() {
        assert_eq!(broadcast(&[2.0], 3, "x").unwrap(), vec![2.0, 2.0, 2.0]);
        assert_eq!(broadcast(&[1.0, 2.0], 2, "x").unwrap(), vec![1.0, 2.0]);
        assert!(broadcast(&[1.0, 2.0], 3, "x").is_err());
    }
}
