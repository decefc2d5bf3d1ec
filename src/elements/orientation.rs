//! Initial local triad of a beam
//!
//! The local x-axis runs along the member; y and z span the cross-section.
//! The triad is stored as a unit quaternion and expanded to basis vectors
//! on demand.

use nalgebra::{Rotation3, UnitQuaternion};

use crate::error::ConfigurationError;
use crate::math::{Mat3, Vec3};

/// Orthonormal right-handed triad `{x, y, z}` held as a quaternion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orientation {
    quaternion: UnitQuaternion<f64>,
}

fn normalized(v: Vec3) -> Vec3 {
    let norm = v.norm();
    if norm != 0.0 {
        v / norm
    } else {
        v
    }
}

impl Orientation {
    /// Triad from the member direction and a roll angle about it
    ///
    /// The local y-axis is horizontal (perpendicular to global Z) unless the
    /// member itself is vertical, in which case y is the global Y-axis.
    pub fn from_direction(v1: &Vec3, theta: f64) -> Result<Self, ConfigurationError> {
        let v1 = unit_axis(v1)?;
        let global_z = Vec3::z();

        let (mut v2, mut v3) = if v1.z == 1.0 {
            (Vec3::y(), -Vec3::x())
        } else if v1.z == -1.0 {
            (Vec3::y(), Vec3::x())
        } else {
            let v2 = normalized(global_z.cross(&v1));
            let v3 = normalized(v1.cross(&v2));
            (v2, v3)
        };

        if theta != 0.0 {
            let (sin, cos) = theta.sin_cos();
            let (ny, nz) = (v2, v3);
            v2 = normalized(ny * cos + nz * sin);
            v3 = normalized(nz * cos - ny * sin);
        }

        Ok(Self::from_basis(&v1, &v2, &v3))
    }

    /// Triad from the member direction and an explicit local y direction
    ///
    /// The component of `v2` along the member is removed first.
    pub fn from_directions(v1: &Vec3, v2: &Vec3) -> Result<Self, ConfigurationError> {
        let v1 = unit_axis(v1)?;
        let projected = v2 - v1 * v2.dot(&v1);
        if projected.norm() == 0.0 {
            return Err(ConfigurationError::DegenerateOrientation(
                "local y direction is parallel to the member axis".to_string(),
            ));
        }
        let v2 = normalized(projected);
        let v3 = normalized(v1.cross(&v2));

        Ok(Self::from_basis(&v1, &v2, &v3))
    }

    fn from_basis(v1: &Vec3, v2: &Vec3, v3: &Vec3) -> Self {
        let m = Mat3::from_columns(&[*v1, *v2, *v3]);
        let rotation = Rotation3::from_matrix_unchecked(m);
        Self {
            quaternion: UnitQuaternion::from_rotation_matrix(&rotation),
        }
    }

    /// Quaternion representation of the triad
    pub fn quaternion(&self) -> &UnitQuaternion<f64> {
        &self.quaternion
    }

    /// Triad as a matrix whose columns are the local axes
    pub fn rotation_matrix(&self) -> Mat3 {
        self.quaternion.to_rotation_matrix().into_inner()
    }

    /// Local axes `(x, y, z)` in global coordinates
    pub fn basis_vectors(&self) -> (Vec3, Vec3, Vec3) {
        let r = self.rotation_matrix();
        (
            r.column(0).into_owned(),
            r.column(1).into_owned(),
            r.column(2).into_owned(),
        )
    }
}

fn unit_axis(v1: &Vec3) -> Result<Vec3, ConfigurationError> {
    let norm = v1.norm();
    if norm == 0.0 {
        return Err(ConfigurationError::DegenerateOrientation(
            "member direction has zero length".to_string(),
        ));
    }
    Ok(v1 / norm)
}
