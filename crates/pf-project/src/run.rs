//! Compile and solve the runs of a case.

use pf_arch::{CompiledArchitecture, PropulsionResult};
use serde::Serialize;
use tracing::info;

use crate::schema::{CaseFile, RunDef};
use crate::{ProjectError, ProjectResult};

/// Result of one named run.
#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    pub run: String,
    #[serde(flatten)]
    pub result: PropulsionResult,
}

/// Compile the case's architecture for `num_nodes` points.
pub fn compile_case(case: &CaseFile, num_nodes: usize) -> ProjectResult<CompiledArchitecture> {
    Ok(case.architecture.compile(num_nodes)?)
}

pub fn run_one(case: &CaseFile, run: &RunDef) -> ProjectResult<RunOutcome> {
    let compiled = compile_case(case, run.num_nodes)?;
    let result = compiled.analyze(&run.conditions(), Some(case.newton_config()))?;
    info!(
        case = %case.name,
        run = %run.name,
        iterations = result.iterations,
        "run complete"
    );
    Ok(RunOutcome {
        run: run.name.clone(),
        result,
    })
}

/// Run `name`, or every run when `name` is `None`.
pub fn run_case(case: &CaseFile, name: Option<&str>) -> ProjectResult<Vec<RunOutcome>> {
    match name {
        Some(name) => {
            let run = case.run(name).ok_or_else(|| ProjectError::UnknownRun {
                name: name.to_string(),
            })?;
            Ok(vec![run_one(case, run)?])
        }
        None => case.runs.iter().map(|run| run_one(case, run)).collect(),
    }
}
