//! Two-node co-rotational beam element (Crisfield bisector formulation)
//!
//! Large rigid-body motion is carried by per-node quaternions and a
//! co-rotating local frame; the six deformational modes measured in that
//! frame drive a linear Euler-Bernoulli/Timoshenko material law.
//!
//! Lifecycle: `check` once, `initialize` once, then one
//! `compute_local_system` per nonlinear iteration. `initialize_solution_step`
//! marks the start of a new step so a tangent read without a fresh local
//! system is rejected.

use log::{debug, trace, warn};

use super::forces::{deformation_vector, element_forces, local_nodal_forces};
use super::frame::{update_frame, CorotationalFrame};
use super::rotation::RotationTracker;
use crate::analysis::AnalysisOptions;
use crate::elements::{Dof, ElementConstants, Node, Orientation, Properties, PropertyKey};
use crate::error::{BeamError, BeamResult, ConfigurationError, NumericalWarning};
use crate::math::{
    assemble_rotation_blocks, consistent_mass, geometric_stiffness, material_operator,
    material_stiffness, rotate_to_global, Mat12, Mat3, Vec12, Vec3, Vec6,
};
use crate::results::{DeformationModes, LocalSystem, SectionResultants};

/// Reference and current data of the two element nodes, node A first
pub type ElementNodes<'a> = [&'a Node; 2];

/// Kinematic state of one evaluation, committed only on success
struct TrialState {
    rotations: RotationTracker,
    totals: Vec12,
    frame: CorotationalFrame,
    length: f64,
    modes: Vec6,
    local_forces: Vec12,
}

/// Co-rotational 3D beam with two nodes and six DOFs per node
#[derive(Debug, Clone)]
pub struct CrBeam3D2N {
    id: usize,
    node_ids: [usize; 2],
    properties: Properties,

    constants: Option<ElementConstants>,
    orientation: Option<Orientation>,
    reference_length: f64,
    current_length: f64,

    rotations: RotationTracker,
    /// Nodal unknowns seen by the last committed evaluation
    total_nodal_deformation: Vec12,
    frame: Option<CorotationalFrame>,
    modes: Vec6,
    local_forces: Vec12,

    tangent: Mat12,
    body_forces: Vec12,
    stiffness_valid: bool,
    iteration_count: usize,
}

impl CrBeam3D2N {
    /// Create an element bound to two nodes and a property set
    pub fn new(id: usize, node_ids: [usize; 2], properties: Properties) -> Self {
        Self {
            id,
            node_ids,
            properties,
            constants: None,
            orientation: None,
            reference_length: 0.0,
            current_length: 0.0,
            rotations: RotationTracker::identity(),
            total_nodal_deformation: Vec12::zeros(),
            frame: None,
            modes: Vec6::zeros(),
            local_forces: Vec12::zeros(),
            tangent: Mat12::zeros(),
            body_forces: Vec12::zeros(),
            stiffness_valid: false,
            iteration_count: 0,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Ids of node A and node B
    pub fn node_ids(&self) -> [usize; 2] {
        self.node_ids
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn is_initialized(&self) -> bool {
        self.constants.is_some()
    }

    pub fn reference_length(&self) -> f64 {
        self.reference_length
    }

    pub fn current_length(&self) -> f64 {
        self.current_length
    }

    /// Number of full local systems computed since construction
    pub fn iteration_count(&self) -> usize {
        self.iteration_count
    }

    /// Accumulated nodal rotations
    pub fn rotations(&self) -> &RotationTracker {
        &self.rotations
    }

    /// Whether the cached tangent belongs to the current step
    pub fn has_valid_stiffness(&self) -> bool {
        self.stiffness_valid
    }

    /// Initial local triad, columns are the local axes
    pub fn initial_triad(&self) -> BeamResult<Mat3> {
        Ok(self.initialized_orientation()?.rotation_matrix())
    }

    /// Current local triad, or the initial one before any evaluation
    pub fn current_triad(&self) -> BeamResult<Mat3> {
        match &self.frame {
            Some(frame) => Ok(frame.triad),
            None => self.initial_triad(),
        }
    }

    /// Local nodal forces `S t` of the last evaluation
    pub fn local_forces(&self) -> &Vec12 {
        &self.local_forces
    }

    /// Validate nodes and properties before any computation
    pub fn check(&self, nodes: ElementNodes<'_>) -> BeamResult<()> {
        for (node, id) in nodes.iter().zip(self.node_ids) {
            for dof in Dof::ALL {
                if !node.has_dof(dof) {
                    return Err(self.configuration(ConfigurationError::MissingDof { node: id, dof }));
                }
            }
        }

        self.properties.require_non_zero(self.id, PropertyKey::CrossArea)?;
        self.properties.require_non_zero(self.id, PropertyKey::YoungModulus)?;
        self.properties.require(self.id, PropertyKey::Density)?;

        if nodes[0].distance_to(nodes[1]) == 0.0 {
            return Err(self.configuration(ConfigurationError::ZeroLength));
        }
        Ok(())
    }

    /// Fix the reference length, material constants and initial triad
    ///
    /// Calling this again re-derives the constants but keeps the iteration
    /// counter, so the accumulated rotation state is not reset.
    pub fn initialize(&mut self, nodes: ElementNodes<'_>) -> BeamResult<()> {
        let chord = nodes[1].reference_position() - nodes[0].reference_position();
        let length = chord.norm();
        if length == 0.0 {
            return Err(self.configuration(ConfigurationError::ZeroLength));
        }

        let constants = ElementConstants::resolve(self.id, &self.properties, length)?;
        let orientation = match &constants.local_axis_2 {
            Some(v2) => Orientation::from_directions(&chord, v2),
            None => Orientation::from_direction(&chord, constants.roll_angle),
        }
        .map_err(|kind| self.configuration(kind))?;

        debug!(
            "element {}: initialized, L0 = {:.6e}, psi_y = {:.6}, psi_z = {:.6}",
            self.id, length, constants.section.psi_y, constants.section.psi_z
        );

        self.constants = Some(constants);
        self.orientation = Some(orientation);
        self.reference_length = length;
        self.current_length = length;
        self.stiffness_valid = false;
        Ok(())
    }

    /// Start of a new solution step: the cached tangent is no longer current
    pub fn initialize_solution_step(&mut self) {
        if self.stiffness_valid {
            debug!("element {}: cached tangent invalidated for new step", self.id);
        }
        self.stiffness_valid = false;
    }

    /// Global tangent stiffness and residual for the current nodal values
    ///
    /// On error the persistent state is left as it was and the cached
    /// tangent is marked invalid.
    pub fn compute_local_system(&mut self, nodes: ElementNodes<'_>) -> BeamResult<LocalSystem> {
        self.stiffness_valid = false;
        let constants = self.initialized_constants()?;
        let trial = self.evaluate(nodes)?;

        let k_local = material_stiffness(&constants.section, self.reference_length)
            + geometric_stiffness(&trial.local_forces, trial.length);
        let t = assemble_rotation_blocks(&trial.frame.triad);
        let tangent = rotate_to_global(&t, &k_local);

        let body_forces = self.body_forces(nodes)?;
        let residual = -(t * trial.local_forces) + body_forces;

        debug!(
            "element {}: local system at iteration {}, L - L0 = {:.6e}",
            self.id,
            self.iteration_count,
            trial.length - self.reference_length
        );

        self.commit(trial);
        self.tangent = tangent;
        self.body_forces = body_forces;
        self.stiffness_valid = true;
        self.iteration_count += 1;

        Ok(LocalSystem { tangent, residual })
    }

    /// Global residual for the current nodal values
    ///
    /// Updates the kinematic state like `compute_local_system` but neither
    /// rebuilds the tangent nor advances the iteration counter. Body forces
    /// are the ones cached by the last local system.
    pub fn compute_right_hand_side(&mut self, nodes: ElementNodes<'_>) -> BeamResult<Vec12> {
        self.initialized_constants()?;
        let trial = self.evaluate(nodes)?;
        let t = assemble_rotation_blocks(&trial.frame.triad);
        let residual = -(t * trial.local_forces) + self.body_forces;
        self.commit(trial);
        Ok(residual)
    }

    /// Cached global tangent of the last local system in this step
    pub fn left_hand_side(&self) -> BeamResult<Mat12> {
        if !self.stiffness_valid {
            return Err(BeamError::StaleStiffness(self.id));
        }
        Ok(self.tangent)
    }

    /// Consistent mass matrix in global coordinates
    pub fn compute_mass(&self) -> BeamResult<Mat12> {
        let constants = self.initialized_constants()?;
        let m_local = consistent_mass(constants.rho, constants.section.a, self.reference_length);
        let t = assemble_rotation_blocks(&self.current_triad()?);
        Ok(rotate_to_global(&t, &m_local))
    }

    /// Rayleigh damping `alpha M + beta K`
    ///
    /// Coefficients come from the element properties, then `options`, then 0.
    pub fn compute_damping(&self, options: &AnalysisOptions) -> BeamResult<Mat12> {
        let constants = self.initialized_constants()?;
        let alpha = constants
            .rayleigh_alpha
            .or(options.rayleigh_alpha)
            .unwrap_or(0.0);
        let beta = constants
            .rayleigh_beta
            .or(options.rayleigh_beta)
            .unwrap_or(0.0);

        let stiffness = self.left_hand_side()?;
        let mass = self.compute_mass()?;
        Ok(mass * alpha + stiffness * beta)
    }

    /// Lumped body forces from the nodal volume accelerations
    pub fn body_forces(&self, nodes: ElementNodes<'_>) -> BeamResult<Vec12> {
        let constants = self.initialized_constants()?;
        let half_mass = constants.rho * constants.section.a * self.reference_length * 0.5;

        let mut f = Vec12::zeros();
        for (i, node) in nodes.iter().enumerate() {
            for (k, g) in node.volume_acceleration.iter().enumerate() {
                f[i * 6 + k] = half_mass * g;
            }
        }
        Ok(f)
    }

    /// Force and moment resultants at three points along the member
    ///
    /// Refreshes the kinematic state first, like `compute_right_hand_side`.
    pub fn internal_resultants(&mut self, nodes: ElementNodes<'_>) -> BeamResult<SectionResultants> {
        self.initialized_constants()?;
        let trial = self.evaluate(nodes)?;
        self.commit(trial);
        Ok(SectionResultants::from_local_forces(&self.local_forces))
    }

    /// Deformational modes of the last committed evaluation
    pub fn deformation_modes(&self) -> DeformationModes {
        DeformationModes::from_vector(&self.modes, self.current_length, self.reference_length)
    }

    /// Axial Green-Lagrange strain `(L² - L0²) / (2 L0²)`
    pub fn green_lagrange_strain(&self) -> BeamResult<f64> {
        self.initialized_constants()?;
        let l0 = self.reference_length;
        let l = self.current_length;
        Ok((l * l - l0 * l0) / (2.0 * l0 * l0))
    }

    /// `(local node, dof)` for each entry of the element vectors
    pub fn dof_list(&self) -> [(usize, Dof); 12] {
        let mut list = [(0, Dof::DisplacementX); 12];
        for i in 0..2 {
            for (k, dof) in Dof::ALL.iter().enumerate() {
                list[i * 6 + k] = (i, *dof);
            }
        }
        list
    }

    /// Total displacements and rotations of both nodes
    pub fn values_vector(&self, nodes: ElementNodes<'_>) -> Vec12 {
        gather(nodes, |node| node.values().displacement)
    }

    /// Velocities and angular velocities of both nodes
    pub fn first_derivatives_vector(&self, nodes: ElementNodes<'_>) -> Vec12 {
        gather(nodes, |node| node.values().velocity)
    }

    /// Accelerations and angular accelerations of both nodes
    pub fn second_derivatives_vector(&self, nodes: ElementNodes<'_>) -> Vec12 {
        gather(nodes, |node| node.values().acceleration)
    }

    fn initialized_constants(&self) -> BeamResult<ElementConstants> {
        self.constants.ok_or(BeamError::NotInitialized(self.id))
    }

    fn initialized_orientation(&self) -> BeamResult<&Orientation> {
        self.orientation
            .as_ref()
            .ok_or(BeamError::NotInitialized(self.id))
    }

    fn configuration(&self, kind: ConfigurationError) -> BeamError {
        BeamError::configuration(self.id, kind)
    }

    fn numerical(&self, kind: NumericalWarning) -> BeamError {
        warn!("element {}: {}", self.id, kind);
        BeamError::numerical(self.id, kind)
    }

    /// Deformation state for the current nodal values, without committing it
    fn evaluate(&self, nodes: ElementNodes<'_>) -> BeamResult<TrialState> {
        let constants = self.initialized_constants()?;
        let initial_triad = self.initialized_orientation()?.rotation_matrix();

        // first iteration starts from the unrotated, undeformed state
        let (base_rotations, base_totals) = if self.iteration_count == 0 {
            (RotationTracker::identity(), Vec12::zeros())
        } else {
            (self.rotations, self.total_nodal_deformation)
        };

        let totals = self.values_vector(nodes);
        let increment = totals - base_totals;
        let d_phi = [
            increment.fixed_rows::<3>(3).into_owned(),
            increment.fixed_rows::<3>(9).into_owned(),
        ];
        let rotations = base_rotations
            .advanced(&d_phi)
            .map_err(|kind| self.numerical(kind))?;

        let chord: Vec3 = nodes[1].current_position() - nodes[0].current_position();
        let length = chord.norm();
        let frame = update_frame(&initial_triad, &rotations, &chord)
            .map_err(|kind| self.numerical(kind))?;

        let modes = deformation_vector(&frame, length, self.reference_length);
        trace!(
            "element {}: phi_s = {:?}, phi_a = {:?}",
            self.id,
            frame.phi_symmetric.as_slice(),
            frame.phi_antisymmetric.as_slice()
        );

        let kd = material_operator(&constants.section, self.reference_length);
        let t = element_forces(&kd, &modes);
        let local_forces = local_nodal_forces(&t, length);

        Ok(TrialState {
            rotations,
            totals,
            frame,
            length,
            modes,
            local_forces,
        })
    }

    fn commit(&mut self, trial: TrialState) {
        self.rotations = trial.rotations;
        self.total_nodal_deformation = trial.totals;
        self.frame = Some(trial.frame);
        self.current_length = trial.length;
        self.modes = trial.modes;
        self.local_forces = trial.local_forces;
    }
}

fn gather(nodes: ElementNodes<'_>, pick: impl Fn(&Node) -> [f64; 6]) -> Vec12 {
    let mut v = Vec12::zeros();
    for (i, node) in nodes.into_iter().enumerate() {
        for (k, value) in pick(node).iter().enumerate() {
            v[i * 6 + k] = *value;
        }
    }
    v
}
