//! Current local triad and deformational rotations (bisector method)
//!
//! The rigid part of the element rotation is the mean of the two nodal
//! quaternions. The initial triad rotated by that mean is then reflected
//! about the bisector of its x-axis and the current chord, which aligns the
//! local x-axis with the chord exactly.

use nalgebra::{Quaternion, UnitQuaternion};

use super::rotation::RotationTracker;
use crate::error::NumericalWarning;
use crate::math::{Mat3, Vec3};

/// Below this the rotated x-axis and the chord are treated as opposite
const BISECTOR_TOLERANCE: f64 = 1e-12;

/// Local frame of the deformed element for one iteration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorotationalFrame {
    /// Columns are the current local axes in global coordinates
    pub triad: Mat3,
    /// Symmetric deformational rotations (torsion, bending y, bending z)
    pub phi_symmetric: Vec3,
    /// Antisymmetric deformational rotations; only y and z are used
    pub phi_antisymmetric: Vec3,
    /// Unit bisector of the rotated x-axis and the chord
    pub bisector: Vec3,
}

/// Normalized average of two nodal quaternions, with `|qA + qB| / 2`
///
/// Returns `None` when the quaternions cancel.
pub fn mean_rotation(qa: &Quaternion<f64>, qb: &Quaternion<f64>) -> Option<(UnitQuaternion<f64>, f64)> {
    let sum = qa + qb;
    let half_norm = 0.5 * sum.norm();
    if half_norm == 0.0 {
        return None;
    }
    let mean = sum * (0.5 / half_norm);
    Some((UnitQuaternion::new_unchecked(mean), half_norm))
}

/// Vector part of the relative rotation between the nodes
///
/// `0.5 (sA vB - sB vA + vA x vB) / half_norm`, where `half_norm` comes from
/// [`mean_rotation`].
pub fn difference_vector(qa: &Quaternion<f64>, qb: &Quaternion<f64>, half_norm: f64) -> Vec3 {
    let va = qa.imag();
    let vb = qb.imag();
    (vb * qa.w - va * qb.w + va.cross(&vb)) * (0.5 / half_norm)
}

/// Build the current frame from the initial triad, the nodal rotations and
/// the current chord `xB - xA`
pub fn update_frame(
    initial_triad: &Mat3,
    rotations: &RotationTracker,
    chord: &Vec3,
) -> Result<CorotationalFrame, NumericalWarning> {
    let qa = rotations.node_a();
    let qb = rotations.node_b();

    let (mean, half_norm) =
        mean_rotation(qa, qb).ok_or(NumericalWarning::OpposedNodalRotations)?;
    let vector_diff = difference_vector(qa, qb, half_norm);

    let rotated = mean.to_rotation_matrix().into_inner() * initial_triad;
    let rotated_x = rotated.column(0).into_owned();

    let length = chord.norm();
    if length == 0.0 {
        return Err(NumericalWarning::DegenerateChord);
    }
    let delta_x = chord / length;

    let sum = rotated_x + delta_x;
    let sum_norm = sum.norm();
    if sum_norm < BISECTOR_TOLERANCE {
        return Err(NumericalWarning::InvertedChord);
    }
    let n = sum / sum_norm;

    let reflection = Mat3::identity() - 2.0 * n * n.transpose();
    let flipped = Mat3::from_columns(&[
        -rotated_x,
        rotated.column(1).into_owned(),
        rotated.column(2).into_owned(),
    ]);
    let triad = reflection * flipped;

    let phi_symmetric = 4.0 * triad.transpose() * vector_diff;
    let axis = triad.column(0).into_owned();
    let phi_antisymmetric = 4.0 * triad.transpose() * axis.cross(&n);

    Ok(CorotationalFrame {
        triad,
        phi_symmetric,
        phi_antisymmetric,
        bisector: n,
    })
}
