//! CR Beam - Co-rotational geometrically nonlinear 3D beam element
//!
//! This library provides a two-node, six-DOF-per-node beam element for
//! large-displacement, large-rotation structural analysis:
//! - Exact finite-rotation tracking with nodal quaternions
//! - Crisfield bisector co-rotational frame
//! - Euler-Bernoulli/Timoshenko material law in the co-rotated frame
//! - Material + geometric tangent stiffness, consistent mass, Rayleigh damping
//! - A small Newton-Raphson driver for static load stepping
//!
//! ## Example
//! ```rust
//! use crbeam::prelude::*;
//!
//! let mut model = BeamModel::new();
//!
//! // Add nodes (2m cantilever along X)
//! let n1 = model.add_node(Node::new(0.0, 0.0, 0.0));
//! let n2 = model.add_node(Node::new(2.0, 0.0, 0.0));
//!
//! // Add beam
//! let props = Properties::new()
//!     .with(PropertyKey::CrossArea, 0.01)
//!     .with(PropertyKey::YoungModulus, 2e11)
//!     .with(PropertyKey::PoissonRatio, 0.3)
//!     .with(PropertyKey::Density, 7850.0)
//!     .with(PropertyKey::Ix, 1e-6)
//!     .with(PropertyKey::Iy, 1e-6)
//!     .with(PropertyKey::Iz, 1e-6);
//! model.add_beam(&[n1, n2], props).unwrap();
//!
//! // Clamp N1 and load N2
//! model.add_support(n1, Support::fixed()).unwrap();
//! model.add_nodal_load(n2, [0.0, -1.0, 0.0, 0.0, 0.0, 0.0]).unwrap();
//!
//! // Analyze
//! model.check_all().unwrap();
//! model.initialize_all().unwrap();
//! model.solve_static(&AnalysisOptions::new()).unwrap();
//!
//! // Tip deflection matches FL³/(3EI)
//! let tip = model.displacement(n2).unwrap();
//! assert!((tip[1] + 8.0 / (3.0 * 2e11 * 1e-6)).abs() < 1e-9);
//! ```

pub mod analysis;
pub mod corotational;
pub mod elements;
pub mod error;
pub mod math;
pub mod model;
pub mod results;

// Re-export common types
pub mod prelude {
    pub use crate::analysis::AnalysisOptions;
    pub use crate::corotational::{CrBeam3D2N, ElementNodes, RotationTracker};
    pub use crate::elements::{
        Dof, Material, NodalValues, Node, Orientation, Properties, PropertyKey, Section,
        ShearModel, Support,
    };
    pub use crate::error::{BeamError, BeamResult, ConfigurationError, NumericalWarning};
    pub use crate::model::{BeamModel, ElementId, NodeId};
    pub use crate::results::{DeformationModes, LocalSystem, SectionResultants, StepReport};
}
