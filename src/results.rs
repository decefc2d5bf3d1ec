//! Result types returned by the beam element

use serde::{Deserialize, Serialize};

use crate::math::{Mat12, Vec12, Vec3, Vec6};

/// Barycentric weights `(w_A, w_B)` of the three resultant sample points
pub const SAMPLE_WEIGHTS: [(f64, f64); 3] = [(0.75, 0.25), (0.5, 0.5), (0.25, 0.75)];

/// Global tangent and residual of one element
#[derive(Debug, Clone, PartialEq)]
pub struct LocalSystem {
    /// Global 12x12 tangent stiffness
    pub tangent: Mat12,
    /// Global residual `-T q + f_body` (external minus internal)
    pub residual: Vec12,
}

impl LocalSystem {
    /// Tangent as row arrays
    pub fn tangent_rows(&self) -> Vec<[f64; 12]> {
        (0..12)
            .map(|i| {
                let mut row = [0.0; 12];
                for (j, value) in row.iter_mut().enumerate() {
                    *value = self.tangent[(i, j)];
                }
                row
            })
            .collect()
    }

    /// Residual as a plain array
    pub fn residual_array(&self) -> [f64; 12] {
        let mut out = [0.0; 12];
        out.copy_from_slice(self.residual.as_slice());
        out
    }
}

/// Deformational modes of the element in the current iteration
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DeformationModes {
    /// Torsion (symmetric x)
    pub torsion: f64,
    /// Symmetric bending about local y
    pub symmetric_y: f64,
    /// Symmetric bending about local z
    pub symmetric_z: f64,
    /// Change of length `L - L0`
    pub elongation: f64,
    /// Antisymmetric bending about local y
    pub antisymmetric_y: f64,
    /// Antisymmetric bending about local z
    pub antisymmetric_z: f64,
    /// Current length
    pub length: f64,
    /// Reference length
    pub reference_length: f64,
}

impl DeformationModes {
    /// Create from the reduced vector `[φs0, φs1, φs2, ΔL, φa1, φa2]`
    pub fn from_vector(d: &Vec6, length: f64, reference_length: f64) -> Self {
        Self {
            torsion: d[0],
            symmetric_y: d[1],
            symmetric_z: d[2],
            elongation: d[3],
            antisymmetric_y: d[4],
            antisymmetric_z: d[5],
            length,
            reference_length,
        }
    }

    /// Reduced vector in material-operator order
    pub fn as_vector(&self) -> Vec6 {
        Vec6::new(
            self.torsion,
            self.symmetric_y,
            self.symmetric_z,
            self.elongation,
            self.antisymmetric_y,
            self.antisymmetric_z,
        )
    }

    pub fn phi_symmetric(&self) -> Vec3 {
        Vec3::new(self.torsion, self.symmetric_y, self.symmetric_z)
    }

    /// The x-component is not a deformation measure and is reported as zero
    pub fn phi_antisymmetric(&self) -> Vec3 {
        Vec3::new(0.0, self.antisymmetric_y, self.antisymmetric_z)
    }

    /// Largest absolute mode, elongation included
    pub fn max_abs(&self) -> f64 {
        self.as_vector().amax()
    }
}

/// Local force and moment resultants at three points along the member
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SectionResultants {
    /// `[N, Vy, Vz]` at each sample point
    pub forces: [[f64; 3]; 3],
    /// `[Mt, My, Mz]` at each sample point
    pub moments: [[f64; 3]; 3],
}

impl SectionResultants {
    /// Interpolate the local nodal forces `q` as `-q_A w_A + q_B w_B`
    pub fn from_local_forces(q: &Vec12) -> Self {
        let mut forces = [[0.0; 3]; 3];
        let mut moments = [[0.0; 3]; 3];

        for (k, (wa, wb)) in SAMPLE_WEIGHTS.iter().enumerate() {
            for c in 0..3 {
                forces[k][c] = -q[c] * wa + q[c + 6] * wb;
                moments[k][c] = -q[c + 3] * wa + q[c + 9] * wb;
            }
        }

        Self { forces, moments }
    }

    /// Axial force at the midpoint sample
    pub fn axial(&self) -> f64 {
        self.forces[1][0]
    }

    /// Largest absolute moment component over all samples
    pub fn max_moment(&self) -> f64 {
        self.moments
            .iter()
            .flatten()
            .fold(0.0_f64, |acc, m| acc.max(m.abs()))
    }
}

/// Convergence record of one load step of the static driver
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepReport {
    /// Fraction of the total load applied in this step
    pub load_factor: f64,
    /// Newton iterations used
    pub iterations: usize,
    /// Norm of the free residual at convergence
    pub residual_norm: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_modes_vector_order() {
        let d = Vec6::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0);
        let modes = DeformationModes::from_vector(&d, 2.5, 2.0);
        assert_eq!(modes.elongation, 4.0);
        assert_eq!(modes.as_vector(), d);
        assert_eq!(modes.phi_antisymmetric(), Vec3::new(0.0, 5.0, 6.0));
        assert_eq!(modes.max_abs(), 6.0);
    }

    #[test]
    fn test_resultants_of_axial_tension() {
        // bar in tension: -N at node A, +N at node B
        let mut q = Vec12::zeros();
        q[0] = -10.0;
        q[6] = 10.0;
        let r = SectionResultants::from_local_forces(&q);
        for k in 0..3 {
            assert_relative_eq!(r.forces[k][0], 10.0);
        }
        assert_relative_eq!(r.axial(), 10.0);
        assert_eq!(r.max_moment(), 0.0);
    }

    #[test]
    fn test_resultants_interpolate_end_moments() {
        let mut q = Vec12::zeros();
        q[5] = -4.0;
        q[11] = 8.0;
        let r = SectionResultants::from_local_forces(&q);
        assert_relative_eq!(r.moments[0][2], 4.0 * 0.75 + 8.0 * 0.25);
        assert_relative_eq!(r.moments[1][2], 6.0);
        assert_relative_eq!(r.moments[2][2], 4.0 * 0.25 + 8.0 * 0.75);
    }

    #[test]
    fn test_local_system_rows() {
        let mut tangent = Mat12::zeros();
        tangent[(2, 7)] = 3.5;
        let system = LocalSystem {
            tangent,
            residual: Vec12::from_element(1.0),
        };
        let rows = system.tangent_rows();
        assert_eq!(rows.len(), 12);
        assert_eq!(rows[2][7], 3.5);
        assert_eq!(system.residual_array(), [1.0; 12]);
    }
}
