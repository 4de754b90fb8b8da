//! Operating conditions in, aggregate and per-lane results out.

use pf_core::{AngularVelocity, Density, PortId, SignalId, Time, Velocity};
use pf_solver::{NewtonConfig, Problem, Solution};
use serde::Serialize;
use uom::si::angular_velocity::revolution_per_minute;
use uom::si::mass_density::kilogram_per_cubic_meter;
use uom::si::time::second;
use uom::si::velocity::meter_per_second;

use crate::assemble::CompiledArchitecture;
use crate::error::{ArchError, ArchResult};
use crate::topology::{ElectricKind, LaneKind};

/// Flight condition and control inputs for every analysis point.
///
/// Per-point quantities hold either one value (applied to every point) or
/// one value per point.
#[derive(Debug, Clone, PartialEq)]
pub struct OperatingConditions {
    pub num_nodes: usize,
    /// kg/m³
    pub density: Vec<f64>,
    /// m/s
    pub airspeed: Vec<f64>,
    /// Propeller speed override in rpm; the first propeller's default otherwise.
    pub rpm: Option<Vec<f64>>,
    pub throttle: Vec<f64>,
    pub propulsor_active: Vec<f64>,
    /// s
    pub duration: f64,
}

impl OperatingConditions {
    /// Sea-level standard density, 100 m/s, full throttle, all propulsors active, 1 s.
    pub fn new(num_nodes: usize) -> Self {
        Self {
            num_nodes,
            density: vec![1.225],
            airspeed: vec![100.0],
            rpm: None,
            throttle: vec![1.0],
            propulsor_active: vec![1.0],
            duration: 1.0,
        }
    }

    pub fn with_density(mut self, density: Density) -> Self {
        self.density = vec![density.get::<kilogram_per_cubic_meter>()];
        self
    }

    pub fn with_airspeed(mut self, airspeed: Velocity) -> Self {
        self.airspeed = vec![airspeed.get::<meter_per_second>()];
        self
    }

    pub fn with_airspeed_profile(mut self, airspeed: &[Velocity]) -> Self {
        self.airspeed = airspeed.iter().map(|v| v.get::<meter_per_second>()).collect();
        self
    }

    pub fn with_rpm(mut self, rpm: AngularVelocity) -> Self {
        self.rpm = Some(vec![rpm.get::<revolution_per_minute>()]);
        self
    }

    pub fn with_duration(mut self, duration: Time) -> Self {
        self.duration = duration.get::<second>();
        self
    }

    pub fn with_throttle(mut self, throttle: f64) -> Self {
        self.throttle = vec![throttle];
        self
    }

    pub fn with_throttle_profile(mut self, throttle: Vec<f64>) -> Self {
        self.throttle = throttle;
        self
    }

    pub fn with_propulsor_active(mut self, active: Vec<f64>) -> Self {
        self.propulsor_active = active;
        self
    }

    /// The OEI lane is failed at every point.
    pub fn one_inoperative(self) -> Self {
        self.with_propulsor_active(vec![0.0])
    }
}

/// Per-lane diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaneResult {
    /// 1-based, matching the `thrustN` group.
    pub lane: usize,
    pub kind: LaneKind,
    pub thrust_n: Vec<f64>,
    pub shaft_power_kw: Vec<f64>,
    pub weight_kg: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elec_load_kw: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuel_flow_kg_per_s: Option<Vec<f64>>,
}

/// One solved throttle balance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceResult {
    pub element: String,
    pub required_kw: Vec<f64>,
    pub available_kw: Vec<f64>,
    pub throttle: Vec<f64>,
}

/// Electrical layer diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElectricResult {
    pub kind: ElectricKind,
    pub load_kw: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery_load_kw: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain_required_kw: Option<Vec<f64>>,
}

/// Solved propulsion system.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropulsionResult {
    pub fuel_flow_kg_per_s: Vec<f64>,
    pub propulsion_system_weight_kg: f64,
    pub thrust_n: Vec<f64>,
    #[serde(rename = "SOC")]
    pub soc: Vec<f64>,
    pub lanes: Vec<LaneResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub electric: Option<ElectricResult>,
    pub balances: Vec<BalanceResult>,
    pub iterations: usize,
    pub residual_norm: f64,
}

impl CompiledArchitecture {
    /// Solver problem with the external inputs set from `conditions`.
    pub fn problem(&self, conditions: &OperatingConditions) -> ArchResult<Problem<'_>> {
        if conditions.num_nodes != self.num_nodes {
            return Err(ArchError::config(format!(
                "conditions have {} points, architecture was compiled for {}",
                conditions.num_nodes, self.num_nodes
            )));
        }

        let mut problem = Problem::new(&self.graph, &self.blocks)?;
        let inputs = self.inputs;
        self.set(&mut problem, inputs.density, &conditions.density, "density")?;
        self.set(&mut problem, inputs.airspeed, &conditions.airspeed, "airspeed")?;
        self.set(&mut problem, inputs.throttle, &conditions.throttle, "throttle")?;
        self.set(
            &mut problem,
            inputs.propulsor_active,
            &conditions.propulsor_active,
            "propulsor_active",
        )?;
        self.set(&mut problem, inputs.duration, &[conditions.duration], "duration")?;
        if let Some(rpm) = &conditions.rpm {
            self.set(&mut problem, inputs.rpm, rpm, "rpm")?;
        }
        Ok(problem)
    }

    fn set(&self, problem: &mut Problem<'_>, port: PortId, values: &[f64], what: &str) -> ArchResult<()> {
        if values.len() != 1 && values.len() != self.num_nodes {
            return Err(ArchError::config(format!(
                "{what} has {} values for {} analysis points",
                values.len(),
                self.num_nodes
            )));
        }
        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(ArchError::config(format!("{what} value {bad} is not finite")));
        }
        problem.set_input(port, values)?;
        Ok(())
    }

    /// Converge every balance for `conditions`.
    pub fn solve(&self, conditions: &OperatingConditions, config: Option<NewtonConfig>) -> ArchResult<Solution> {
        let problem = self.problem(conditions)?;
        Ok(pf_solver::solve(&problem, config, None)?)
    }

    /// Solve and collect the aggregate and per-lane results.
    pub fn analyze(
        &self,
        conditions: &OperatingConditions,
        config: Option<NewtonConfig>,
    ) -> ArchResult<PropulsionResult> {
        let solution = self.solve(conditions, config)?;
        self.summarize(&solution)
    }

    /// Values of the signal at `path` in a solution of this architecture.
    pub fn value(&self, solution: &Solution, path: &str) -> ArchResult<Vec<f64>> {
        Ok(solution.value(self.signal(path)?)?.to_vec())
    }

    pub fn summarize(&self, solution: &Solution) -> ArchResult<PropulsionResult> {
        let get = |id: SignalId| -> ArchResult<Vec<f64>> { Ok(solution.value(id)?.to_vec()) };

        let lanes = self
            .lanes
            .iter()
            .map(|lane| {
                Ok(LaneResult {
                    lane: lane.index + 1,
                    kind: lane.kind,
                    thrust_n: get(lane.thrust)?,
                    shaft_power_kw: get(lane.shaft_power)?,
                    weight_kg: solution.scalar(lane.weight)?,
                    elec_load_kw: lane.elec_load.map(get).transpose()?,
                    fuel_flow_kg_per_s: lane.fuel_flow.map(get).transpose()?,
                })
            })
            .collect::<ArchResult<Vec<_>>>()?;

        let balances = self
            .balances
            .iter()
            .map(|b| {
                Ok(BalanceResult {
                    element: b.element.clone(),
                    required_kw: get(b.required)?,
                    available_kw: get(b.available)?,
                    throttle: get(b.throttle)?,
                })
            })
            .collect::<ArchResult<Vec<_>>>()?;

        let electric = match &self.electric {
            Some(e) => Some(ElectricResult {
                kind: e.kind,
                load_kw: get(e.load)?,
                battery_load_kw: e.battery_load.map(get).transpose()?,
                chain_required_kw: e.chain_required.map(get).transpose()?,
            }),
            None => None,
        };

        Ok(PropulsionResult {
            fuel_flow_kg_per_s: get(self.outputs.fuel_flow)?,
            propulsion_system_weight_kg: solution.scalar(self.outputs.weight)?,
            thrust_n: get(self.outputs.thrust)?,
            soc: get(self.outputs.soc)?,
            lanes,
            electric,
            balances,
            iterations: solution.iterations,
            residual_norm: solution.residual_norm,
        })
    }
}
