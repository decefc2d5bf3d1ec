//! Deformational modes to element forces and local nodal forces

use super::frame::CorotationalFrame;
use crate::math::beam::expansion_operator;
use crate::math::{Mat6, Vec12, Vec6};

/// Reduced deformation vector `[φs0, φs1, φs2, L - L0, φa1, φa2]`
pub fn deformation_vector(frame: &CorotationalFrame, length: f64, reference_length: f64) -> Vec6 {
    let phi_s = &frame.phi_symmetric;
    let phi_a = &frame.phi_antisymmetric;
    Vec6::new(
        phi_s[0],
        phi_s[1],
        phi_s[2],
        length - reference_length,
        phi_a[1],
        phi_a[2],
    )
}

/// Element forces `t = Kd d`
pub fn element_forces(material_operator: &Mat6, modes: &Vec6) -> Vec6 {
    material_operator * modes
}

/// Local nodal forces `q = S(L) t`
pub fn local_nodal_forces(element_forces: &Vec6, length: f64) -> Vec12 {
    expansion_operator(length) * element_forces
}
