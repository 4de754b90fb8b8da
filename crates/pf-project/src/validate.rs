//! Case file validation logic.

use std::collections::HashSet;

use pf_arch::ArchError;

use crate::schema::{CaseFile, PointValues, RunDef, SolverDef};

pub const LATEST_VERSION: u32 = 1;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },

    #[error("Invalid architecture: {0}")]
    Architecture(#[from] ArchError),
}

fn invalid(field: impl Into<String>, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.into(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Structural checks plus topology resolution; does not build a graph.
pub fn validate_case(case: &CaseFile) -> Result<(), ValidationError> {
    if case.version == 0 || case.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: case.version,
        });
    }

    pf_arch::topology::resolve(&case.architecture)?;

    let mut names = HashSet::new();
    for run in &case.runs {
        if !names.insert(run.name.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: run.name.clone(),
                context: "runs".to_string(),
            });
        }
        validate_run(run)?;
    }

    if let Some(solver) = &case.solver {
        validate_solver(solver)?;
    }
    Ok(())
}

fn validate_run(run: &RunDef) -> Result<(), ValidationError> {
    let field = |name: &str| format!("runs.{}.{name}", run.name);

    if run.num_nodes == 0 {
        return Err(invalid(field("num_nodes"), 0, "at least one analysis point"));
    }
    if !(run.duration_s.is_finite() && run.duration_s >= 0.0) {
        return Err(invalid(field("duration_s"), run.duration_s, "must be finite and >= 0"));
    }

    let mut series = vec![
        ("density_kg_per_m3", &run.density_kg_per_m3),
        ("airspeed_m_per_s", &run.airspeed_m_per_s),
        ("throttle", &run.throttle),
        ("propulsor_active", &run.propulsor_active),
    ];
    if let Some(rpm) = &run.rpm {
        series.push(("rpm", rpm));
    }
    for (name, values) in series {
        check_shape(&field(name), values, run.num_nodes)?;
    }

    if let Some(bad) = run.density_kg_per_m3.values().into_iter().find(|v| *v <= 0.0) {
        return Err(invalid(field("density_kg_per_m3"), bad, "must be positive"));
    }
    if let Some(bad) = run
        .propulsor_active
        .values()
        .into_iter()
        .find(|v| *v != 0.0 && *v != 1.0)
    {
        return Err(invalid(field("propulsor_active"), bad, "must be 0 or 1"));
    }
    Ok(())
}

fn check_shape(field: &str, values: &PointValues, num_nodes: usize) -> Result<(), ValidationError> {
    if values.len() != 1 && values.len() != num_nodes {
        return Err(invalid(
            field,
            format!("{} values", values.len()),
            "give one value or one per analysis point",
        ));
    }
    if let Some(bad) = values.values().into_iter().find(|v| !v.is_finite()) {
        return Err(invalid(field, bad, "must be finite"));
    }
    Ok(())
}

fn validate_solver(solver: &SolverDef) -> Result<(), ValidationError> {
    if solver.max_iterations == Some(0) {
        return Err(invalid("solver.max_iterations", 0, "must be positive"));
    }
    for (name, value) in [
        ("solver.abs_tol", solver.abs_tol),
        ("solver.rel_tol", solver.rel_tol),
        ("solver.fd_epsilon", solver.fd_epsilon),
    ] {
        if let Some(v) = value
            && !(v.is_finite() && v > 0.0)
        {
            return Err(invalid(name, v, "must be positive"));
        }
    }
    if let Some(beta) = solver.line_search_beta
        && !(beta > 0.0 && beta < 1.0)
    {
        return Err(invalid("solver.line_search_beta", beta, "must be in (0, 1)"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pf_arch::element::{Engine, Propeller};
    use pf_arch::{Architecture, MechanicalLayer, ThrustLayer};

    fn case() -> CaseFile {
        CaseFile {
            version: 1,
            name: "test".into(),
            description: None,
            architecture: Architecture::new(
                ThrustLayer::new(vec![Propeller::default()]),
                MechanicalLayer::default().with_engines(Engine::default()),
            ),
            runs: vec![RunDef {
                name: "cruise".into(),
                num_nodes: 3,
                density_kg_per_m3: PointValues::Scalar(0.9),
                airspeed_m_per_s: PointValues::Series(vec![90.0, 95.0, 100.0]),
                rpm: None,
                throttle: PointValues::Scalar(0.8),
                propulsor_active: PointValues::Scalar(1.0),
                duration_s: 600.0,
            }],
            solver: None,
        }
    }

    #[test]
    fn valid_case_passes() {
        validate_case(&case()).unwrap();
    }

    #[test]
    fn duplicate_run_names_fail() {
        let mut c = case();
        c.runs.push(c.runs[0].clone());
        assert!(matches!(
            validate_case(&c),
            Err(ValidationError::DuplicateId { .. })
        ));
    }

    #[test]
    fn series_length_must_match() {
        let mut c = case();
        c.runs[0].throttle = PointValues::Series(vec![0.5, 0.6]);
        assert!(matches!(
            validate_case(&c),
            Err(ValidationError::InvalidValue { .. })
        ));
    }

    #[test]
    fn failure_flag_is_binary() {
        let mut c = case();
        c.runs[0].propulsor_active = PointValues::Scalar(0.5);
        assert!(validate_case(&c).is_err());
    }

    #[test]
    fn future_version_is_rejected() {
        let mut c = case();
        c.version = 7;
        assert!(matches!(
            validate_case(&c),
            Err(ValidationError::UnsupportedVersion { version: 7 })
        ));
    }

    #[test]
    fn architecture_errors_surface() {
        let mut c = case();
        c.architecture.mech = MechanicalLayer::default();
        assert!(matches!(
            validate_case(&c),
            Err(ValidationError::Architecture(e)) if e.is_configuration()
        ));
    }

    #[test]
    fn solver_tolerances_must_be_positive() {
        let mut c = case();
        c.solver = Some(SolverDef {
            abs_tol: Some(-1.0),
            ..SolverDef::default()
        });
        assert!(validate_case(&c).is_err());
    }
}
