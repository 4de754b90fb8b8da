//! Math blocks used to wire architectures together.

use pf_core::SignalUnit;
use pf_core::numeric::broadcast;
use pf_graph::{InputDecl, Interface, OutputDecl};

use crate::common::{check_all_finite, check_arity};
use crate::error::{ComponentError, ComponentResult};
use crate::traits::Block;

/// Source of fixed values. Used for design parameters and for empty sums.
#[derive(Clone, Debug)]
pub struct Constant {
    pub name: String,
    pub output: String,
    pub unit: SignalUnit,
    pub values: Vec<f64>,
}

impl Constant {
    pub fn new(
        name: impl Into<String>,
        output: impl Into<String>,
        unit: SignalUnit,
        values: Vec<f64>,
    ) -> Self {
        Self {
            name: name.into(),
            output: output.into(),
            unit,
            values,
        }
    }

    /// Zero of the given shape.
    pub fn zeros(name: impl Into<String>, output: impl Into<String>, unit: SignalUnit, len: usize) -> Self {
        Self::new(name, output, unit, vec![0.0; len])
    }
}

impl Block for Constant {
    fn name(&self) -> &str {
        &self.name
    }

    fn interface(&self) -> Interface {
        Interface::explicit(
            vec![],
            vec![OutputDecl::vector(self.output.clone(), self.values.len(), self.unit)],
        )
    }

    fn compute(&self, _inputs: &[Vec<f64>]) -> ComponentResult<Vec<Vec<f64>>> {
        Ok(vec![self.values.clone()])
    }
}

/// One labelled pass-through channel.
#[derive(Clone, Debug, PartialEq)]
pub struct PassthroughEntry {
    pub input: InputDecl,
    pub output: String,
}

impl PassthroughEntry {
    /// Input and output share `name`.
    pub fn same(input: InputDecl) -> Self {
        let output = input.name.clone();
        Self { input, output }
    }

    pub fn renamed(input: InputDecl, output: impl Into<String>) -> Self {
        Self {
            input,
            output: output.into(),
        }
    }
}

/// Copies each input to a labelled output.
///
/// Layer builders use it to expose default-valued input ports that the
/// enclosing layer may or may not drive.
#[derive(Clone, Debug)]
pub struct Passthrough {
    pub name: String,
    pub entries: Vec<PassthroughEntry>,
}

impl Passthrough {
    pub fn new(name: impl Into<String>, entries: Vec<PassthroughEntry>) -> Self {
        Self {
            name: name.into(),
            entries,
        }
    }
}

impl Block for Passthrough {
    fn name(&self) -> &str {
        &self.name
    }

    fn interface(&self) -> Interface {
        let inputs = self.entries.iter().map(|e| e.input.clone()).collect();
        let outputs = self
            .entries
            .iter()
            .map(|e| OutputDecl::vector(e.output.clone(), e.input.len, e.input.unit))
            .collect();
        Interface::explicit(inputs, outputs)
    }

    fn compute(&self, inputs: &[Vec<f64>]) -> ComponentResult<Vec<Vec<f64>>> {
        check_arity(&self.name, inputs, self.entries.len())?;
        Ok(inputs.to_vec())
    }
}

/// Elementwise sum of `count` inputs named `sum_input_0..count-1`.
#[derive(Clone, Debug)]
pub struct Sum {
    pub name: String,
    pub output: String,
    pub unit: SignalUnit,
    pub len: usize,
    pub count: usize,
}

impl Sum {
    pub fn new(
        name: impl Into<String>,
        output: impl Into<String>,
        unit: SignalUnit,
        len: usize,
        count: usize,
    ) -> Self {
        Self {
            name: name.into(),
            output: output.into(),
            unit,
            len,
            count,
        }
    }

    pub fn input_name(i: usize) -> String {
        format!("sum_input_{i}")
    }
}

impl Block for Sum {
    fn name(&self) -> &str {
        &self.name
    }

    fn interface(&self) -> Interface {
        let inputs = (0..self.count)
            .map(|i| InputDecl::vector(Self::input_name(i), self.len, self.unit, 0.0).required())
            .collect();
        Interface::explicit(
            inputs,
            vec![OutputDecl::vector(self.output.clone(), self.len, self.unit)],
        )
    }

    fn compute(&self, inputs: &[Vec<f64>]) -> ComponentResult<Vec<Vec<f64>>> {
        check_arity(&self.name, inputs, self.count)?;
        let mut total = vec![0.0; self.len];
        for input in inputs {
            for (acc, v) in total.iter_mut().zip(input) {
                *acc += v;
            }
        }
        check_all_finite(&total, "sum output")?;
        Ok(vec![total])
    }
}

/// Elementwise product of two factors, either of which may be scalar.
#[derive(Clone, Debug)]
pub struct Product {
    pub name: String,
    pub factors: [InputDecl; 2],
    pub output: OutputDecl,
}

impl Product {
    pub fn new(name: impl Into<String>, a: InputDecl, b: InputDecl, output: OutputDecl) -> ComponentResult<Self> {
        for factor in [&a, &b] {
            if factor.len != 1 && factor.len != output.len {
                return Err(ComponentError::InvalidArg {
                    what: "product factors must be scalar or match the output length",
                });
            }
        }
        Ok(Self {
            name: name.into(),
            factors: [a, b],
            output,
        })
    }
}

impl Block for Product {
    fn name(&self) -> &str {
        &self.name
    }

    fn interface(&self) -> Interface {
        Interface::explicit(self.factors.to_vec(), vec![self.output.clone()])
    }

    fn compute(&self, inputs: &[Vec<f64>]) -> ComponentResult<Vec<Vec<f64>>> {
        check_arity(&self.name, inputs, 2)?;
        let len = self.output.len;
        let a = broadcast(&inputs[0], len, "product factor")
            .map_err(|_| ComponentError::InvalidArg {
                what: "product factor length",
            })?;
        let b = broadcast(&inputs[1], len, "product factor")
            .map_err(|_| ComponentError::InvalidArg {
                what: "product factor length",
            })?;
        Ok(vec![a.iter().zip(&b).map(|(x, y)| x * y).collect()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_zeros() {
        let c = Constant::zeros("z", "soc", SignalUnit::Unitless, 4);
        assert_eq!(c.compute(&[]).unwrap(), vec![vec![0.0; 4]]);
        assert_eq!(c.interface().outputs[0].len, 4);
    }

    #[test]
    fn passthrough_relabels() {
        let p = Passthrough::new(
            "inputs",
            vec![
                PassthroughEntry::same(InputDecl::scalar("duration", SignalUnit::Second, 1.0)),
                PassthroughEntry::renamed(
                    InputDecl::vector("rpm", 2, SignalUnit::Rpm, 2000.0),
                    "rpm_pass",
                ),
            ],
        );
        let iface = p.interface();
        assert_eq!(iface.outputs[1].name, "rpm_pass");
        assert_eq!(iface.outputs[1].unit, SignalUnit::Rpm);
        let out = p.compute(&[vec![3.0], vec![1.0, 2.0]]).unwrap();
        assert_eq!(out, vec![vec![3.0], vec![1.0, 2.0]]);
    }

    #[test]
    fn sum_ports_are_numbered() {
        let s = Sum::new("fuel", "fuel_flow", SignalUnit::KilogramPerSecond, 2, 3);
        let iface = s.interface();
        let names: Vec<_> = iface.inputs.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["sum_input_0", "sum_input_1", "sum_input_2"]);
        let out = s
            .compute(&[vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]])
            .unwrap();
        assert_eq!(out, vec![vec![9.0, 12.0]]);
    }

    #[test]
    fn product_broadcasts_scalar_factor() {
        let p = Product::new(
            "avail",
            InputDecl::scalar("rating", SignalUnit::Kilowatt, 0.0),
            InputDecl::vector("active", 3, SignalUnit::Unitless, 1.0),
            OutputDecl::vector("out", 3, SignalUnit::Kilowatt),
        )
        .unwrap();
        let out = p.compute(&[vec![200.0], vec![1.0, 0.0, 1.0]]).unwrap();
        assert_eq!(out, vec![vec![200.0, 0.0, 200.0]]);
    }

    #[test]
    fn product_rejects_mismatched_factor() {
        let err = Product::new(
            "bad",
            InputDecl::vector("a", 2, SignalUnit::Unitless, 0.0),
            InputDecl::scalar("b", SignalUnit::Unitless, 0.0),
            OutputDecl::vector("out", 3, SignalUnit::Unitless),
        );
        assert!(err.is_err());
    }
}
