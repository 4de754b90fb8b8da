//! Sum of named signals.

use pf_components::{Constant, Sum};
use pf_core::{SignalId, SignalUnit};

use crate::error::{ArchError, ArchResult};
use crate::model::{ModelBuilder, path};

/// Result of `sum_node`: the summed signal and how many inputs fed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Aggregate {
    pub signal: SignalId,
    pub contributors: usize,
}

impl Aggregate {
    pub fn is_empty(&self) -> bool {
        self.contributors == 0
    }
}

/// Sum `inputs` into `scope.output`.
///
/// - no inputs: a constant zero of length `len`
/// - one input of length `len`: that signal under the new path, no node added
/// - otherwise: a `Sum` node with ports `sum_input_0..N-1` wired in order
///
/// A scalar input broadcasts into a vector sum.
pub fn sum_node(
    model: &mut ModelBuilder,
    scope: &str,
    output: &str,
    inputs: &[SignalId],
    unit: SignalUnit,
    len: usize,
) -> ArchResult<Aggregate> {
    let node = path(scope, &format!("{output}_sum"));

    let signal = match inputs {
        [] => {
            let handle = model.add(node, Constant::zeros(format!("{output}_sum"), output, unit, len));
            handle.output(0)
        }
        [single] if model.signal_len(*single)? == len => *single,
        _ => {
            for &input in inputs {
                let input_len = model.signal_len(input)?;
                if input_len != len && input_len != 1 {
                    return Err(ArchError::unwired(format!(
                        "{} contributor of length {input_len} cannot be summed into length {len}",
                        path(scope, output)
                    )));
                }
            }
            let handle = model.add(
                node,
                Sum::new(format!("{output}_sum"), output, unit, len, inputs.len()),
            );
            for (i, &input) in inputs.iter().enumerate() {
                model.connect(input, handle.input(i))?;
            }
            handle.output(0)
        }
    };

    model.alias(path(scope, output), signal)?;
    Ok(Aggregate {
        signal,
        contributors: inputs.len(),
    })
}
