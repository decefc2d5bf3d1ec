//! Beam model - arena of nodes and co-rotational elements
//!
//! Nodes and elements are addressed by index. Each element owns its private
//! rotation and frame state; the model only hands it the two node snapshots
//! it is connected to.

use log::debug;

use crate::analysis::AnalysisOptions;
use crate::corotational::CrBeam3D2N;
use crate::elements::{Node, Properties, Support};
use crate::error::{BeamError, BeamResult, ConfigurationError};
use crate::math::{self, Mat, Mat12, Vec as FEVec};
use crate::results::{LocalSystem, StepReport};

/// Index of a node in the model
pub type NodeId = usize;
/// Index of an element in the model
pub type ElementId = usize;

/// Nodes, beams, supports and nodal loads
#[derive(Debug, Clone, Default)]
pub struct BeamModel {
    nodes: Vec<Node>,
    elements: Vec<CrBeam3D2N>,
    supports: Vec<Support>,
    loads: Vec<[f64; 6]>,
}

impl BeamModel {
    /// Create a new empty model
    pub fn new() -> Self {
        Self::default()
    }

    // ========================
    // Model Building Methods
    // ========================

    /// Add a node and return its id
    pub fn add_node(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        self.supports.push(Support::new());
        self.loads.push([0.0; 6]);
        self.nodes.len() - 1
    }

    /// Add a two-node beam and return its id
    pub fn add_beam(&mut self, node_ids: &[NodeId], properties: Properties) -> BeamResult<ElementId> {
        let id = self.elements.len();
        let [a, b] = node_ids else {
            return Err(BeamError::configuration(
                id,
                ConfigurationError::NodeCount(node_ids.len()),
            ));
        };
        let node_a = self.node(*a)?;
        let node_b = self.node(*b)?;
        if node_a.distance_to(node_b) == 0.0 {
            return Err(BeamError::configuration(id, ConfigurationError::ZeroLength));
        }

        self.elements.push(CrBeam3D2N::new(id, [*a, *b], properties));
        Ok(id)
    }

    /// Restrain DOFs of a node
    pub fn add_support(&mut self, node: NodeId, support: Support) -> BeamResult<()> {
        let slot = self
            .supports
            .get_mut(node)
            .ok_or(BeamError::NodeNotFound(node))?;
        *slot = support;
        Ok(())
    }

    /// Add a nodal load `[FX, FY, FZ, MX, MY, MZ]`
    pub fn add_nodal_load(&mut self, node: NodeId, load: [f64; 6]) -> BeamResult<()> {
        let slot = self.loads.get_mut(node).ok_or(BeamError::NodeNotFound(node))?;
        for (total, value) in slot.iter_mut().zip(load) {
            *total += value;
        }
        Ok(())
    }

    // ========================
    // Access
    // ========================

    pub fn node(&self, id: NodeId) -> BeamResult<&Node> {
        self.nodes.get(id).ok_or(BeamError::NodeNotFound(id))
    }

    /// Mutable node access, e.g. to write the driver's nodal values
    pub fn node_mut(&mut self, id: NodeId) -> BeamResult<&mut Node> {
        self.nodes.get_mut(id).ok_or(BeamError::NodeNotFound(id))
    }

    pub fn element(&self, id: ElementId) -> BeamResult<&CrBeam3D2N> {
        self.elements.get(id).ok_or(BeamError::ElementNotFound(id))
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn elements(&self) -> &[CrBeam3D2N] {
        &self.elements
    }

    /// Total displacement and rotation of a node
    pub fn displacement(&self, id: NodeId) -> BeamResult<[f64; 6]> {
        Ok(self.node(id)?.values().displacement)
    }

    /// Global equation numbers of an element's 12 DOFs
    pub fn dof_indices(&self, id: ElementId) -> BeamResult<[usize; 12]> {
        let element = self.element(id)?;
        let mut indices = [0; 12];
        for (i, node) in element.node_ids().iter().enumerate() {
            for k in 0..6 {
                indices[i * 6 + k] = node * 6 + k;
            }
        }
        Ok(indices)
    }

    // ========================
    // Element Operations
    // ========================

    /// Run `check` on every element
    pub fn check_all(&self) -> BeamResult<()> {
        for element in &self.elements {
            element.check(self.element_nodes(element)?)?;
        }
        Ok(())
    }

    /// Run `initialize` on every element
    pub fn initialize_all(&mut self) -> BeamResult<()> {
        let nodes = &self.nodes;
        for element in &mut self.elements {
            let [a, b] = element.node_ids();
            let pair = [
                nodes.get(a).ok_or(BeamError::NodeNotFound(a))?,
                nodes.get(b).ok_or(BeamError::NodeNotFound(b))?,
            ];
            element.initialize(pair)?;
        }
        Ok(())
    }

    /// Mark the start of a new solution step on every element
    pub fn initialize_solution_step(&mut self) {
        for element in &mut self.elements {
            element.initialize_solution_step();
        }
    }

    /// Global tangent and residual of one element
    pub fn compute_local_system(&mut self, id: ElementId) -> BeamResult<LocalSystem> {
        let nodes = &self.nodes;
        let element = self
            .elements
            .get_mut(id)
            .ok_or(BeamError::ElementNotFound(id))?;
        let [a, b] = element.node_ids();
        let pair = [
            nodes.get(a).ok_or(BeamError::NodeNotFound(a))?,
            nodes.get(b).ok_or(BeamError::NodeNotFound(b))?,
        ];
        element.compute_local_system(pair)
    }

    /// Global mass matrix of one element
    pub fn compute_mass(&self, id: ElementId) -> BeamResult<Mat12> {
        self.element(id)?.compute_mass()
    }

    /// Global Rayleigh damping matrix of one element
    pub fn compute_damping(&self, id: ElementId, options: &AnalysisOptions) -> BeamResult<Mat12> {
        self.element(id)?.compute_damping(options)
    }

    fn element_nodes(&self, element: &CrBeam3D2N) -> BeamResult<[&Node; 2]> {
        let [a, b] = element.node_ids();
        Ok([self.node(a)?, self.node(b)?])
    }

    // ========================
    // Static Driver
    // ========================

    /// Assemble the global tangent and internal residual of all elements
    pub fn assemble(&mut self) -> BeamResult<(Mat, FEVec)> {
        let n_dofs = self.nodes.len() * 6;
        let mut k_global = Mat::zeros(n_dofs, n_dofs);
        let mut r_global = FEVec::zeros(n_dofs);

        for id in 0..self.elements.len() {
            let system = self.compute_local_system(id)?;
            let dofs = self.dof_indices(id)?;

            for (a, &da) in dofs.iter().enumerate() {
                r_global[da] += system.residual[a];
                for (b, &db) in dofs.iter().enumerate() {
                    k_global[(da, db)] += system.tangent[(a, b)];
                }
            }
        }

        Ok((k_global, r_global))
    }

    /// Global equation numbers that are not restrained
    fn free_dofs(&self) -> Vec<usize> {
        self.supports
            .iter()
            .enumerate()
            .flat_map(|(node, support)| support.free_dofs().map(move |k| node * 6 + k))
            .collect()
    }

    /// Incremental Newton-Raphson solution under the nodal loads
    ///
    /// The loads are applied in `options.load_steps` equal increments. Nodal
    /// values are updated in place; one report is returned per step.
    pub fn solve_static(&mut self, options: &AnalysisOptions) -> BeamResult<Vec<StepReport>> {
        let free = self.free_dofs();
        if free.is_empty() {
            return Err(BeamError::InvalidInput(
                "No free degrees of freedom".to_string(),
            ));
        }

        let external: Vec<f64> = self.loads.iter().flatten().copied().collect();
        let steps = options.load_steps.max(1);
        let mut reports = Vec::with_capacity(steps);

        for step in 1..=steps {
            let load_factor = step as f64 / steps as f64;
            let load_norm = free
                .iter()
                .map(|&d| (external[d] * load_factor).powi(2))
                .sum::<f64>()
                .sqrt();
            let reference = if load_norm > 0.0 { load_norm } else { 1.0 };

            self.initialize_solution_step();
            let mut converged = None;
            let mut residual_norm = f64::INFINITY;

            for iteration in 0..=options.max_iterations {
                let (k_global, r_internal) = self.assemble()?;

                let n_free = free.len();
                let mut k11 = Mat::zeros(n_free, n_free);
                let mut r1 = FEVec::zeros(n_free);
                for (i, &di) in free.iter().enumerate() {
                    r1[i] = external[di] * load_factor + r_internal[di];
                    for (j, &dj) in free.iter().enumerate() {
                        k11[(i, j)] = k_global[(di, dj)];
                    }
                }

                residual_norm = r1.norm();
                debug!(
                    "step {}: iteration {}, residual norm {:.3e}",
                    step, iteration, residual_norm
                );
                if iteration > 0 && residual_norm <= options.tolerance * reference {
                    converged = Some(iteration);
                    break;
                }
                if iteration == options.max_iterations {
                    break;
                }

                let du = math::solve_linear_system(&k11, &r1).ok_or(BeamError::SingularMatrix)?;
                for (i, &di) in free.iter().enumerate() {
                    let node = &mut self.nodes[di / 6];
                    let mut increment = [0.0; 6];
                    increment[di % 6] = du[i];
                    node.add_displacement(&increment);
                }
            }

            let iterations = converged.ok_or(BeamError::NotConverged {
                step,
                iterations: options.max_iterations,
                residual: residual_norm,
            })?;
            reports.push(StepReport {
                load_factor,
                iterations,
                residual_norm,
            });
        }

        Ok(reports)
    }
}
