//! Propeller model.

use std::f64::consts::PI;

use pf_core::SignalUnit;
use pf_core::conversions::{kw_to_hp, lb_to_kg, m_to_ft};
use pf_graph::{InputDecl, Interface, OutputDecl};

use crate::common::{check_all_finite, check_arity, check_finite, scalar};
use crate::error::{ComponentError, ComponentResult};
use crate::traits::Block;

/// Bisection steps for the actuator-disk thrust.
const THRUST_ITERATIONS: usize = 100;

/// Fixed-pitch propeller.
///
/// ## Model
///
/// Thrust follows actuator-disk momentum theory with a profile efficiency
/// applied to the delivered shaft power:
///
/// ```text
/// A     = pi * D^2 / 4
/// v_i   = (-V + sqrt(V^2 + 2 T / (rho A))) / 2
/// eta_p * P = T * (V + v_i)
/// ```
///
/// The root is bracketed by the static thrust `(2 rho A P^2)^(1/3)` and, in
/// forward flight, by `P / V`. Zero or negative power gives zero thrust.
///
/// Weight uses a diameter-power correlation:
///
/// ```text
/// W_lb = 31.92 * blades^0.391 * (D_ft * P_hp / 1000)^0.782
/// ```
#[derive(Clone, Debug)]
pub struct Propeller {
    pub name: String,
    pub num_nodes: usize,
    pub num_blades: u32,
    pub design_efficiency: f64,
}

impl Propeller {
    pub const RHO: usize = 0;
    pub const FLTCOND_UTRUE: usize = 1;
    pub const RPM: usize = 2;
    pub const SHAFT_POWER_IN: usize = 3;
    pub const DIAMETER: usize = 4;
    pub const POWER_RATING: usize = 5;

    pub const THRUST: usize = 0;
    pub const COMPONENT_WEIGHT: usize = 1;
    pub const ADVANCE_RATIO: usize = 2;

    pub fn new(
        name: impl Into<String>,
        num_nodes: usize,
        num_blades: u32,
        design_efficiency: f64,
    ) -> ComponentResult<Self> {
        if num_blades == 0 {
            return Err(ComponentError::InvalidArg {
                what: "propeller needs at least one blade",
            });
        }
        if !(design_efficiency > 0.0 && design_efficiency <= 1.0) {
            return Err(ComponentError::InvalidArg {
                what: "propeller efficiency must be in (0,1]",
            });
        }
        Ok(Self {
            name: name.into(),
            num_nodes,
            num_blades,
            design_efficiency,
        })
    }

    /// Thrust (N) for delivered power `p_w` (W) at airspeed `v` and density `rho`.
    fn thrust(&self, rho: f64, v: f64, p_w: f64, area: f64) -> f64 {
        let useful = self.design_efficiency * p_w;
        if useful <= 0.0 {
            return 0.0;
        }
        let v = v.max(0.0);
        let mut hi = (2.0 * rho * area * useful * useful).cbrt();
        if v > 0.0 {
            hi = hi.min(useful / v);
        }
        let mut lo = 0.0;
        let absorbed = |t: f64| 0.5 * t * (v + (v * v + 2.0 * t / (rho * area)).sqrt());
        for _ in 0..THRUST_ITERATIONS {
            let mid = 0.5 * (lo + hi);
            if absorbed(mid) > useful {
                hi = mid;
            } else {
                lo = mid;
            }
        }
        0.5 * (lo + hi)
    }
}

impl Block for Propeller {
    fn name(&self) -> &str {
        &self.name
    }

    fn interface(&self) -> Interface {
        let n = self.num_nodes;
        Interface::explicit(
            vec![
                InputDecl::vector("fltcond|rho", n, SignalUnit::KilogramPerCubicMeter, 1.225),
                InputDecl::vector("fltcond|Utrue", n, SignalUnit::MeterPerSecond, 100.0),
                InputDecl::vector("rpm", n, SignalUnit::Rpm, 2000.0),
                InputDecl::vector("shaft_power_in", n, SignalUnit::Kilowatt, 1.0).required(),
                InputDecl::scalar("diameter", SignalUnit::Meter, 2.5),
                InputDecl::scalar("power_rating", SignalUnit::Kilowatt, 240.0),
            ],
            vec![
                OutputDecl::vector("thrust", n, SignalUnit::Newton),
                OutputDecl::scalar("component_weight", SignalUnit::Kilogram),
                OutputDecl::vector("J", n, SignalUnit::Unitless),
            ],
        )
    }

    fn compute(&self, inputs: &[Vec<f64>]) -> ComponentResult<Vec<Vec<f64>>> {
        check_arity(&self.name, inputs, 6)?;
        let diameter = scalar(&inputs[Self::DIAMETER]);
        if !(diameter > 0.0) {
            return Err(ComponentError::NonPhysical {
                what: "propeller diameter must be positive",
            });
        }
        let area = PI * diameter * diameter / 4.0;

        let rho = &inputs[Self::RHO];
        let tas = &inputs[Self::FLTCOND_UTRUE];
        let rpm = &inputs[Self::RPM];
        let power = &inputs[Self::SHAFT_POWER_IN];

        let mut thrust = Vec::with_capacity(power.len());
        let mut advance = Vec::with_capacity(power.len());
        for i in 0..power.len() {
            if !(rho[i] > 0.0) {
                return Err(ComponentError::NonPhysical {
                    what: "air density must be positive",
                });
            }
            thrust.push(self.thrust(rho[i], tas[i], power[i] * 1000.0, area));
            let rps = rpm[i] / 60.0;
            advance.push(if rps > 0.0 { tas[i] / (rps * diameter) } else { 0.0 });
        }

        let rating_hp = kw_to_hp(scalar(&inputs[Self::POWER_RATING]).max(0.0));
        let weight_lb = 31.92
            * f64::from(self.num_blades).powf(0.391)
            * (m_to_ft(diameter) * rating_hp / 1000.0).powf(0.782);

        check_all_finite(&thrust, "propeller thrust")?;
        check_finite(weight_lb, "propeller weight")?;
        Ok(vec![thrust, vec![lb_to_kg(weight_lb)], advance])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prop() -> Propeller {
        Propeller::new("prop", 3, 4, 0.85).unwrap()
    }

    fn inputs(power: [f64; 3], tas: f64) -> Vec<Vec<f64>> {
        vec![
            vec![1.225; 3],
            vec![tas; 3],
            vec![2000.0; 3],
            power.to_vec(),
            vec![2.5],
            vec![240.0],
        ]
    }

    #[test]
    fn zero_power_gives_zero_thrust() {
        let out = prop().compute(&inputs([0.0, -5.0, 0.0], 90.0)).unwrap();
        assert_eq!(out[Propeller::THRUST], vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn thrust_increases_with_power() {
        let out = prop().compute(&inputs([50.0, 100.0, 200.0], 90.0)).unwrap();
        let t = &out[Propeller::THRUST];
        assert!(t[0] > 0.0 && t[0] < t[1] && t[1] < t[2]);
        // useful power cannot exceed eta * P
        assert!(t[2] * 90.0 <= 0.85 * 200_000.0 + 1e-6);
    }

    #[test]
    fn static_thrust_is_finite() {
        let out = prop().compute(&inputs([200.0, 200.0, 200.0], 0.0)).unwrap();
        let t = out[Propeller::THRUST][0];
        let area = PI * 2.5 * 2.5 / 4.0;
        let expected = (2.0 * 1.225 * area * (0.85 * 200_000.0_f64).powi(2)).cbrt();
        assert!((t - expected).abs() / expected < 1e-9);
        assert_eq!(out[Propeller::ADVANCE_RATIO][0], 0.0);
    }

    #[test]
    fn weight_is_positive() {
        let out = prop().compute(&inputs([0.0; 3], 90.0)).unwrap();
        let w = out[Propeller::COMPONENT_WEIGHT][0];
        assert!(w > 20.0 && w < 120.0, "weight {w}");
    }
}
