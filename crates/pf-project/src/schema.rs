//! Case file schema definitions.

use pf_arch::{Architecture, OperatingConditions};
use pf_solver::NewtonConfig;
use serde::{Deserialize, Serialize};

/// One propulsion architecture and the operating points to analyze it at.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CaseFile {
    pub version: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub architecture: Architecture,
    #[serde(default)]
    pub runs: Vec<RunDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solver: Option<SolverDef>,
}

impl CaseFile {
    pub fn run(&self, name: &str) -> Option<&RunDef> {
        self.runs.iter().find(|r| r.name == name)
    }

    /// Solver settings with unset fields at their defaults.
    pub fn newton_config(&self) -> NewtonConfig {
        self.solver
            .as_ref()
            .map_or_else(NewtonConfig::default, SolverDef::to_config)
    }
}

/// A value given once for every analysis point, or once per point.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum PointValues {
    Scalar(f64),
    Series(Vec<f64>),
}

impl PointValues {
    pub fn values(&self) -> Vec<f64> {
        match self {
            PointValues::Scalar(v) => vec![*v],
            PointValues::Series(v) => v.clone(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            PointValues::Scalar(_) => 1,
            PointValues::Series(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Named set of operating conditions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RunDef {
    pub name: String,
    pub num_nodes: usize,
    #[serde(default = "default_density")]
    pub density_kg_per_m3: PointValues,
    #[serde(default = "default_airspeed")]
    pub airspeed_m_per_s: PointValues,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpm: Option<PointValues>,
    #[serde(default = "default_one")]
    pub throttle: PointValues,
    #[serde(default = "default_one")]
    pub propulsor_active: PointValues,
    #[serde(default = "default_duration")]
    pub duration_s: f64,
}

fn default_density() -> PointValues {
    PointValues::Scalar(1.225)
}

fn default_airspeed() -> PointValues {
    PointValues::Scalar(100.0)
}

fn default_one() -> PointValues {
    PointValues::Scalar(1.0)
}

fn default_duration() -> f64 {
    1.0
}

impl RunDef {
    pub fn conditions(&self) -> OperatingConditions {
        OperatingConditions {
            num_nodes: self.num_nodes,
            density: self.density_kg_per_m3.values(),
            airspeed: self.airspeed_m_per_s.values(),
            rpm: self.rpm.as_ref().map(PointValues::values),
            throttle: self.throttle.values(),
            propulsor_active: self.propulsor_active.values(),
            duration: self.duration_s,
        }
    }
}

/// Overrides for the Newton solver.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SolverDef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_iterations: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abs_tol: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rel_tol: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_search_beta: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_line_search_iters: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fd_epsilon: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub central_differences: Option<bool>,
}

impl SolverDef {
    pub fn to_config(&self) -> NewtonConfig {
        let d = NewtonConfig::default();
        NewtonConfig {
            max_iterations: self.max_iterations.unwrap_or(d.max_iterations),
            abs_tol: self.abs_tol.unwrap_or(d.abs_tol),
            rel_tol: self.rel_tol.unwrap_or(d.rel_tol),
            line_search_beta: self.line_search_beta.unwrap_or(d.line_search_beta),
            max_line_search_iters: self.max_line_search_iters.unwrap_or(d.max_line_search_iters),
            fd_epsilon: self.fd_epsilon.unwrap_or(d.fd_epsilon),
            central_differences: self.central_differences.unwrap_or(d.central_differences),
        }
    }
}
