//! Graph + blocks + external inputs, evaluated as a residual system.

use std::collections::HashMap;

use nalgebra::DVector;
use pf_components::Block;
use pf_core::numeric::broadcast;
use pf_core::PortId;
use pf_graph::{Graph, IndexMap, Node};

use crate::error::{SolverError, SolverResult};

/// A compiled graph ready for evaluation.
///
/// `blocks[i]` implements node `i`. External inputs override the defaults of
/// undriven ports; driven ports always read their source signal.
pub struct Problem<'a> {
    pub graph: &'a Graph,
    blocks: &'a [Box<dyn Block>],
    index: IndexMap,
    overrides: HashMap<PortId, Vec<f64>>,
}

impl<'a> Problem<'a> {
    pub fn new(graph: &'a Graph, blocks: &'a [Box<dyn Block>]) -> SolverResult<Self> {
        if blocks.len() != graph.nodes().len() {
            return Err(SolverError::ProblemSetup {
                what: format!(
                    "{} blocks for {} graph nodes",
                    blocks.len(),
                    graph.nodes().len()
                ),
            });
        }
        for (node, block) in graph.nodes().iter().zip(blocks) {
            let iface = block.interface();
            if iface.kind != node.kind
                || iface.inputs.len() != node.inputs.len()
                || iface.outputs.len() != node.outputs.len()
            {
                return Err(SolverError::ProblemSetup {
                    what: format!("block '{}' does not match node '{}'", block.name(), node.name),
                });
            }
        }

        Ok(Self {
            graph,
            blocks,
            index: IndexMap::from_graph(graph),
            overrides: HashMap::new(),
        })
    }

    /// Set the value of an undriven input port. Scalars broadcast.
    pub fn set_input(&mut self, port: PortId, values: &[f64]) -> SolverResult<()> {
        let decl = self
            .graph
            .port(port)
            .ok_or(pf_graph::GraphError::InvalidPortRef { port })?;
        if decl.source.is_some() {
            return Err(SolverError::ProblemSetup {
                what: format!(
                    "input '{}' is driven by the graph",
                    self.graph.port_path(port).unwrap_or_default()
                ),
            });
        }
        let values = broadcast(values, decl.len, "external input")?;
        self.overrides.insert(port, values);
        Ok(())
    }

    pub fn index(&self) -> &IndexMap {
        &self.index
    }

    /// Number of scalar unknowns.
    pub fn num_unknowns(&self) -> usize {
        self.index.unknown_len()
    }

    /// Starting point built from each implicit output's declared initial value.
    pub fn initial_guess(&self) -> DVector<f64> {
        let mut x = DVector::zeros(self.index.unknown_len());
        for &signal in self.index.unknown_signals() {
            let (Ok(range), Some(decl)) = (self.index.unknown_range(signal), self.graph.signal(signal))
            else {
                continue;
            };
            for i in range {
                x[i] = decl.initial;
            }
        }
        x
    }

    /// Run every explicit node once with the unknowns set to `x`.
    ///
    /// Returns the flat value buffer laid out by `index()`.
    pub fn evaluate(&self, x: &DVector<f64>) -> SolverResult<Vec<f64>> {
        if x.len() != self.index.unknown_len() {
            return Err(SolverError::InvalidState {
                what: format!(
                    "expected {} unknowns, got {}",
                    self.index.unknown_len(),
                    x.len()
                ),
            });
        }

        let mut values = vec![0.0; self.index.value_len()];
        for &signal in self.index.unknown_signals() {
            let src = self.index.unknown_range(signal)?;
            let dst = self.index.value_range(signal)?;
            values[dst].copy_from_slice(&x.as_slice()[src]);
        }

        for &node_id in self.graph.evaluation_order() {
            let node = self.node(node_id)?;
            let block = &self.blocks[node_id.slot()];
            let inputs = self.gather_inputs(node, &values)?;
            let outputs = block
                .compute(&inputs)
                .map_err(|source| SolverError::Component {
                    node: node.name.clone(),
                    source,
                })?;
            if outputs.len() != node.outputs.len() {
                return Err(SolverError::InvalidState {
                    what: format!("block '{}' returned {} outputs", node.name, outputs.len()),
                });
            }
            for (&signal, output) in node.outputs.iter().zip(outputs) {
                let dst = self.index.value_range(signal)?;
                if dst.len() != output.len() {
                    return Err(SolverError::InvalidState {
                        what: format!(
                            "block '{}' output has length {}, expected {}",
                            node.name,
                            output.len(),
                            dst.len()
                        ),
                    });
                }
                values[dst].copy_from_slice(&output);
            }
        }

        Ok(values)
    }

    /// Residuals of all implicit nodes for a value buffer from `evaluate`.
    pub fn residuals_from(&self, values: &[f64]) -> SolverResult<DVector<f64>> {
        let mut residuals = Vec::with_capacity(self.index.unknown_len());
        for &node_id in self.graph.implicit_nodes() {
            let node = self.node(node_id)?;
            let inputs = self.gather_inputs(node, values)?;
            let outputs = node
                .outputs
                .iter()
                .map(|&s| Ok(values[self.index.value_range(s)?].to_vec()))
                .collect::<SolverResult<Vec<_>>>()?;
            let expected: usize = outputs.iter().map(Vec::len).sum();

            let r = self.blocks[node_id.slot()]
                .residuals(&inputs, &outputs)
                .map_err(|source| SolverError::Component {
                    node: node.name.clone(),
                    source,
                })?;
            if r.len() != expected {
                return Err(SolverError::InvalidState {
                    what: format!("block '{}' returned {} residuals", node.name, r.len()),
                });
            }
            residuals.extend(r);
        }
        Ok(DVector::from_vec(residuals))
    }

    /// Evaluate and return the residual vector.
    pub fn residuals(&self, x: &DVector<f64>) -> SolverResult<DVector<f64>> {
        let values = self.evaluate(x)?;
        self.residuals_from(&values)
    }

    fn node(&self, id: pf_core::NodeId) -> SolverResult<&Node> {
        self.graph
            .node(id)
            .ok_or_else(|| SolverError::InvalidState {
                what: format!("node {} missing from graph", id),
            })
    }

    fn gather_inputs(&self, node: &Node, values: &[f64]) -> SolverResult<Vec<Vec<f64>>> {
        let mut inputs = Vec::with_capacity(node.inputs.len());
        for &port_id in &node.inputs {
            let port = self
                .graph
                .port(port_id)
                .ok_or(pf_graph::GraphError::InvalidPortRef { port: port_id })?;
            let value = match port.source {
                Some(signal) => broadcast(&values[self.index.value_range(signal)?], port.len, "port input")?,
                None => self
                    .overrides
                    .get(&port_id)
                    .cloned()
                    .unwrap_or_else(|| port.default.clone()),
            };
            inputs.push(value);
        }
        Ok(inputs)
    }
}
