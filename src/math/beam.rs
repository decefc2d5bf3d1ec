//! Closed-form local matrices for the two-node co-rotational beam
//!
//! Local DOF order per node is `[ux, uy, uz, rx, ry, rz]`, node A first.
//! The reduced (deformational) order is
//! `[torsion, sym_y, sym_z, axial, anti_y, anti_z]`.

use super::{Mat12, Mat12x6, Mat6, Vec12};

/// Elastic constants of a cross-section, resolved once at initialization
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionConstants {
    /// Young's modulus
    pub e: f64,
    /// Shear modulus
    pub g: f64,
    /// Cross-sectional area
    pub a: f64,
    /// Torsional constant (Ix)
    pub j: f64,
    /// Moment of inertia about local y
    pub iy: f64,
    /// Moment of inertia about local z
    pub iz: f64,
    /// Shear-correction factor for bending about y
    pub psi_y: f64,
    /// Shear-correction factor for bending about z
    pub psi_z: f64,
}

/// Timoshenko shear-correction factor `1 / (1 + 12EI / (L² G A_eff))`
///
/// An effective shear area of exactly zero selects the shear-rigid limit.
pub fn shear_correction_factor(e: f64, g: f64, i: f64, area_eff: f64, length: f64) -> f64 {
    if area_eff == 0.0 {
        return 1.0;
    }
    let phi = 12.0 * e * i / (length * length * g * area_eff);
    1.0 / (1.0 + phi)
}

/// Copy the upper triangle onto the lower one
fn mirror_upper(k: &mut Mat12) {
    for i in 0..12 {
        for j in (i + 1)..12 {
            k[(j, i)] = k[(i, j)];
        }
    }
}

/// Local material stiffness (Euler-Bernoulli/Timoshenko)
///
/// # Arguments
/// * `c` - Section constants including the shear-correction factors
/// * `length` - Reference length
pub fn material_stiffness(c: &SectionConstants, length: f64) -> Mat12 {
    let l = length;
    let l2 = l * l;
    let l3 = l2 * l;

    let ea_l = c.e * c.a / l;
    let gj_l = c.g * c.j / l;

    let shear_z = 12.0 * c.e * c.iz * c.psi_z / l3;
    let shear_y = 12.0 * c.e * c.iy * c.psi_y / l3;
    let couple_z = 6.0 * c.e * c.iz * c.psi_z / l2;
    let couple_y = 6.0 * c.e * c.iy * c.psi_y / l2;

    let mut k = Mat12::zeros();

    // axial
    k[(0, 0)] = ea_l;
    k[(0, 6)] = -ea_l;
    k[(6, 6)] = ea_l;

    // bending in the local xy plane
    k[(1, 1)] = shear_z;
    k[(1, 5)] = couple_z;
    k[(1, 7)] = -shear_z;
    k[(1, 11)] = couple_z;
    k[(5, 5)] = c.e * c.iz * (3.0 * c.psi_z + 1.0) / l;
    k[(5, 7)] = -couple_z;
    k[(5, 11)] = c.e * c.iz * (3.0 * c.psi_z - 1.0) / l;
    k[(7, 7)] = shear_z;
    k[(7, 11)] = -couple_z;
    k[(11, 11)] = k[(5, 5)];

    // bending in the local xz plane
    k[(2, 2)] = shear_y;
    k[(2, 4)] = -couple_y;
    k[(2, 8)] = -shear_y;
    k[(2, 10)] = -couple_y;
    k[(4, 4)] = c.e * c.iy * (3.0 * c.psi_y + 1.0) / l;
    k[(4, 8)] = couple_y;
    k[(4, 10)] = c.e * c.iy * (3.0 * c.psi_y - 1.0) / l;
    k[(8, 8)] = shear_y;
    k[(8, 10)] = couple_y;
    k[(10, 10)] = k[(4, 4)];

    // torsion
    k[(3, 3)] = gj_l;
    k[(3, 9)] = -gj_l;
    k[(9, 9)] = gj_l;

    mirror_upper(&mut k);
    k
}

/// Local geometric (stress) stiffness from the current local nodal forces
///
/// # Arguments
/// * `qe` - Local nodal forces `[F_A, M_A, F_B, M_B]`
/// * `length` - Current length
pub fn geometric_stiffness(qe: &Vec12, length: f64) -> Mat12 {
    let l = length;

    let n = qe[6];
    let mt = qe[9];
    let my_a = qe[4];
    let mz_a = qe[5];
    let my_b = qe[10];
    let mz_b = qe[11];

    let qy = -(mz_a + mz_b) / l;
    let qz = (my_a + my_b) / l;

    let mut k = Mat12::zeros();

    k[(0, 1)] = -qy / l;
    k[(0, 2)] = -qz / l;
    k[(0, 7)] = qy / l;
    k[(0, 8)] = qz / l;

    k[(1, 1)] = 1.2 * n / l;
    k[(1, 3)] = my_a / l;
    k[(1, 4)] = mt / l;
    k[(1, 5)] = n / 10.0;
    k[(1, 6)] = qy / l;
    k[(1, 7)] = -1.2 * n / l;
    k[(1, 9)] = my_b / l;
    k[(1, 10)] = -mt / l;
    k[(1, 11)] = n / 10.0;

    k[(2, 2)] = 1.2 * n / l;
    k[(2, 3)] = mz_a / l;
    k[(2, 4)] = -n / 10.0;
    k[(2, 5)] = mt / l;
    k[(2, 6)] = qz / l;
    k[(2, 8)] = -1.2 * n / l;
    k[(2, 9)] = mz_b / l;
    k[(2, 10)] = -n / 10.0;
    k[(2, 11)] = -mt / l;

    k[(3, 4)] = -mz_a / 3.0 + mz_b / 6.0;
    k[(3, 5)] = my_a / 3.0 - my_b / 6.0;
    k[(3, 10)] = l * qy / 6.0;
    k[(3, 11)] = l * qz / 6.0;

    k[(4, 4)] = 2.0 * l * n / 15.0;
    k[(4, 6)] = -my_a / l;
    k[(4, 7)] = -mt / l;
    k[(4, 8)] = -n / 10.0;
    k[(4, 9)] = l * qy / 6.0;
    k[(4, 10)] = -l * n / 30.0;
    k[(4, 11)] = mt / 2.0;

    k[(5, 5)] = 2.0 * l * n / 15.0;
    k[(5, 6)] = -mz_a / l;
    k[(5, 7)] = n / 10.0;
    k[(5, 8)] = -mt / l;
    k[(5, 9)] = l * qz / 6.0;
    k[(5, 10)] = -mt / 2.0;
    k[(5, 11)] = -l * n / 30.0;

    k[(6, 7)] = -qy / l;
    k[(6, 8)] = -qz / l;

    k[(7, 7)] = 1.2 * n / l;
    k[(7, 9)] = -my_b / l;
    k[(7, 10)] = mt / l;
    k[(7, 11)] = -n / 10.0;

    k[(8, 8)] = 1.2 * n / l;
    k[(8, 9)] = -mz_b / l;
    k[(8, 10)] = n / 10.0;
    k[(8, 11)] = mt / l;

    k[(9, 10)] = mz_a / 6.0 - mz_b / 3.0;
    k[(9, 11)] = -my_a / 6.0 + my_b / 3.0;

    k[(10, 10)] = 2.0 * l * n / 15.0;
    k[(11, 11)] = 2.0 * l * n / 15.0;

    mirror_upper(&mut k);
    k
}

/// Local consistent mass matrix scaled by `rho * A * L`
pub fn consistent_mass(rho: f64, a: f64, length: f64) -> Mat12 {
    let l = length;
    let l2 = l * l;

    let mut m = Mat12::zeros();

    m[(0, 0)] = 140.0;
    m[(0, 6)] = 70.0;
    m[(6, 6)] = 140.0;

    m[(3, 3)] = 140.0;
    m[(3, 9)] = 70.0;
    m[(9, 9)] = 140.0;

    // xy plane (uy, rz)
    m[(1, 1)] = 156.0;
    m[(1, 5)] = 22.0 * l;
    m[(1, 7)] = 54.0;
    m[(1, 11)] = -13.0 * l;
    m[(5, 5)] = 4.0 * l2;
    m[(5, 7)] = 13.0 * l;
    m[(5, 11)] = -3.0 * l2;
    m[(7, 7)] = 156.0;
    m[(7, 11)] = -22.0 * l;
    m[(11, 11)] = 4.0 * l2;

    // xz plane (uz, ry) follows the sign convention of the stiffness
    m[(2, 2)] = 156.0;
    m[(2, 4)] = -22.0 * l;
    m[(2, 8)] = 54.0;
    m[(2, 10)] = 13.0 * l;
    m[(4, 4)] = 4.0 * l2;
    m[(4, 8)] = -13.0 * l;
    m[(4, 10)] = -3.0 * l2;
    m[(8, 8)] = 156.0;
    m[(8, 10)] = 22.0 * l;
    m[(10, 10)] = 4.0 * l2;

    mirror_upper(&mut m);
    m * (rho * a * l / 420.0)
}

/// Diagonal operator mapping deformational modes to element forces
pub fn material_operator(c: &SectionConstants, length: f64) -> Mat6 {
    let l = length;
    Mat6::from_diagonal(&nalgebra::Vector6::new(
        c.g * c.j / l,
        c.e * c.iy / l,
        c.e * c.iz / l,
        c.e * c.a / l,
        3.0 * c.e * c.iy * c.psi_y / l,
        3.0 * c.e * c.iz * c.psi_z / l,
    ))
}

/// Expansion `S` from the 6 element forces to the 12 local nodal forces
///
/// End shears follow from moment equilibrium over the current length.
pub fn expansion_operator(length: f64) -> Mat12x6 {
    let l = length;
    let mut s = Mat12x6::zeros();

    s[(0, 3)] = -1.0;
    s[(1, 5)] = 2.0 / l;
    s[(2, 4)] = -2.0 / l;
    s[(3, 0)] = -1.0;
    s[(4, 1)] = -1.0;
    s[(4, 4)] = 1.0;
    s[(5, 2)] = -1.0;
    s[(5, 5)] = 1.0;

    s[(6, 3)] = 1.0;
    s[(7, 5)] = -2.0 / l;
    s[(8, 4)] = 2.0 / l;
    s[(9, 0)] = 1.0;
    s[(10, 1)] = 1.0;
    s[(10, 4)] = 1.0;
    s[(11, 2)] = 1.0;
    s[(11, 5)] = 1.0;

    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::is_symmetric;
    use approx::assert_relative_eq;

    fn section() -> SectionConstants {
        SectionConstants {
            e: 2e11,
            g: 2e11 / 2.6,
            a: 0.01,
            j: 1e-6,
            iy: 2e-6,
            iz: 3e-6,
            psi_y: 1.0,
            psi_z: 1.0,
        }
    }

    #[test]
    fn test_material_stiffness_symmetry() {
        let mut c = section();
        c.psi_y = 0.8;
        c.psi_z = 0.6;
        let k = material_stiffness(&c, 2.0);
        assert!(is_symmetric(&k));
    }

    #[test]
    fn test_material_stiffness_euler_bernoulli_terms() {
        let c = section();
        let l = 2.0;
        let k = material_stiffness(&c, l);

        assert_relative_eq!(k[(0, 0)], c.e * c.a / l);
        assert_relative_eq!(k[(1, 1)], 12.0 * c.e * c.iz / (l * l * l));
        assert_relative_eq!(k[(5, 5)], 4.0 * c.e * c.iz / l);
        assert_relative_eq!(k[(5, 11)], 2.0 * c.e * c.iz / l);
        assert_relative_eq!(k[(2, 4)], -6.0 * c.e * c.iy / (l * l));
        assert_relative_eq!(k[(4, 10)], 2.0 * c.e * c.iy / l);
        assert_relative_eq!(k[(3, 9)], -c.g * c.j / l);
    }

    #[test]
    fn test_material_stiffness_factorizes_through_reduced_modes() {
        // S * Kd * S^T reproduces the full material stiffness
        let mut c = section();
        c.psi_y = 0.7;
        c.psi_z = 0.9;
        let l = 1.5;
        let s = expansion_operator(l);
        let kd = material_operator(&c, l);
        let k = material_stiffness(&c, l);

        let rebuilt = s * kd * s.transpose();
        for i in 0..12 {
            for j in 0..12 {
                assert_relative_eq!(rebuilt[(i, j)], k[(i, j)], epsilon = 1e-3, max_relative = 1e-10);
            }
        }
    }

    #[test]
    fn test_geometric_stiffness_symmetric_and_zero_without_forces() {
        let k0 = geometric_stiffness(&Vec12::zeros(), 2.0);
        assert_eq!(k0, Mat12::zeros());

        let qe = Vec12::from_row_slice(&[
            -10.0, 1.0, 2.0, -3.0, 4.0, 5.0, 10.0, -1.0, -2.0, 3.0, 6.0, 7.0,
        ]);
        let k = geometric_stiffness(&qe, 2.0);
        assert!(is_symmetric(&k));
        assert_relative_eq!(k[(1, 1)], 1.2 * 10.0 / 2.0);
        assert_relative_eq!(k[(4, 11)], 3.0 / 2.0);
    }

    #[test]
    fn test_consistent_mass_total() {
        let (rho, a, l) = (7850.0, 0.01, 2.0);
        let m = consistent_mass(rho, a, l);
        assert!(is_symmetric(&m));

        // rigid translation along each axis recovers the total mass
        for axis in 0..3 {
            let mut u = Vec12::zeros();
            u[axis] = 1.0;
            u[axis + 6] = 1.0;
            let total = (u.transpose() * m * u)[(0, 0)];
            assert_relative_eq!(total, rho * a * l, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_shear_correction_limits() {
        assert_eq!(shear_correction_factor(2e11, 8e10, 1e-6, 0.0, 2.0), 1.0);

        let stiff = shear_correction_factor(2e11, 8e10, 1e-6, 1e12, 2.0);
        assert!(stiff > 0.999_999);

        let flexible = shear_correction_factor(2e11, 8e10, 1e-6, 1e-12, 2.0);
        assert!(flexible < 1e-3);
    }
}
