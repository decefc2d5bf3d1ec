//! Error types for the co-rotational beam element

use thiserror::Error;

use crate::elements::{Dof, PropertyKey};

/// Main error type for element and model operations
#[derive(Error, Debug)]
pub enum BeamError {
    #[error("Configuration error in element {element}: {kind}")]
    Configuration {
        element: usize,
        kind: ConfigurationError,
    },

    #[error("Numerical warning in element {element}: {kind}")]
    Numerical {
        element: usize,
        kind: NumericalWarning,
    },

    #[error("Element {0}: tangent stiffness requested before a local system was computed in this step")]
    StaleStiffness(usize),

    #[error("Element {0} has not been initialized - run initialize() first")]
    NotInitialized(usize),

    #[error("Node {0} not found in model")]
    NodeNotFound(usize),

    #[error("Element {0} not found in model")]
    ElementNotFound(usize),

    #[error("Load step {step} did not converge in {iterations} iterations (residual {residual:.3e})")]
    NotConverged {
        step: usize,
        iterations: usize,
        residual: f64,
    },

    #[error("Singular stiffness matrix - system may be unstable or have insufficient supports")]
    SingularMatrix,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl BeamError {
    /// Fatal setup problem that must abort before any computation
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }

    /// Numerical condition the driver may answer by cutting the step
    pub fn is_numerical(&self) -> bool {
        matches!(self, Self::Numerical { .. })
    }

    pub(crate) fn configuration(element: usize, kind: ConfigurationError) -> Self {
        Self::Configuration { element, kind }
    }

    pub(crate) fn numerical(element: usize, kind: NumericalWarning) -> Self {
        Self::Numerical { element, kind }
    }
}

/// Setup errors reported by `check` and `initialize`
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("zero reference length (coincident nodes)")]
    ZeroLength,

    #[error("property {0} not provided")]
    MissingProperty(PropertyKey),

    #[error("property {0} must be non-zero")]
    ZeroProperty(PropertyKey),

    #[error("node {node} is missing degree of freedom {dof}")]
    MissingDof { node: usize, dof: Dof },

    #[error("element needs exactly 2 nodes, got {0}")]
    NodeCount(usize),

    #[error("degenerate orientation: {0}")]
    DegenerateOrientation(String),
}

/// Numerical-stability conditions surfaced during an iteration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NumericalWarning {
    /// `local_node` is 0 for node A and 1 for node B
    #[error("rotation increment of magnitude {magnitude} at local node {local_node} is too large for one step")]
    RotationIncrementTooLarge { local_node: usize, magnitude: f64 },

    #[error("current chord length is zero")]
    DegenerateChord,

    #[error("current chord points opposite to the rotated element axis")]
    InvertedChord,

    #[error("nodal rotations differ by a full turn, mean rotation is undefined")]
    OpposedNodalRotations,
}

/// Result type for element operations
pub type BeamResult<T> = Result<T, BeamError>;
