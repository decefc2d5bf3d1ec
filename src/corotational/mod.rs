//! Co-rotational kinematics and the two-node beam element

mod element;
mod forces;
mod frame;
mod rotation;

pub use element::{CrBeam3D2N, ElementNodes};
pub use forces::{deformation_vector, element_forces, local_nodal_forces};
pub use frame::{difference_vector, mean_rotation, update_frame, CorotationalFrame};
pub use rotation::{compose, incremental_quaternion, RotationTracker};
