//! Mathematical utilities for the beam element

pub mod beam;

use nalgebra::{DMatrix, DVector, Matrix3, Matrix6, SMatrix, SVector, Vector3, Vector6};

pub type Mat = DMatrix<f64>;
pub type Vec = DVector<f64>;
pub type Mat3 = Matrix3<f64>;
pub type Mat6 = Matrix6<f64>;
pub type Vec3 = Vector3<f64>;
pub type Vec6 = Vector6<f64>;

/// 12x12 matrix for element stiffness, mass and damping
pub type Mat12 = SMatrix<f64, 12, 12>;
/// 12-element vector for element forces/displacements
pub type Vec12 = SVector<f64, 12>;
/// Expansion from the 6 reduced element forces to the 12 nodal forces
pub type Mat12x6 = SMatrix<f64, 12, 6>;

// Re-export beam matrices
pub use beam::{
    consistent_mass, expansion_operator, geometric_stiffness, material_operator,
    material_stiffness, shear_correction_factor,
};

/// Tile a 3x3 rotation onto the four diagonal blocks of a 12x12 operator
///
/// Translations and rotations of both nodes get the same block, so the
/// result maps local element quantities to global ones: `x_g = T * x_l`.
pub fn assemble_rotation_blocks(r: &Mat3) -> Mat12 {
    let mut t = Mat12::zeros();

    for i in 0..4 {
        let offset = i * 3;
        for row in 0..3 {
            for col in 0..3 {
                t[(offset + row, offset + col)] = r[(row, col)];
            }
        }
    }

    t
}

/// Similarity transform of a local element matrix: `T * K * T^T`
pub fn rotate_to_global(t: &Mat12, k_local: &Mat12) -> Mat12 {
    t * k_local * t.transpose()
}

/// Check that a matrix equals its transpose entry by entry
pub fn is_symmetric(m: &Mat12) -> bool {
    for i in 0..12 {
        for j in (i + 1)..12 {
            if m[(i, j)] != m[(j, i)] {
                return false;
            }
        }
    }
    true
}

/// Solve a linear system using LU decomposition
pub fn solve_linear_system(a: &Mat, b: &Vec) -> Option<Vec> {
    a.clone().lu().solve(b)
}
