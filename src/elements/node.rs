//! Node - a point in 3D space carrying six generalized coordinates

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::math::Vec3;

/// Nodal degrees of freedom in element order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dof {
    DisplacementX,
    DisplacementY,
    DisplacementZ,
    RotationX,
    RotationY,
    RotationZ,
}

impl Dof {
    /// All six DOFs in the order used by element vectors
    pub const ALL: [Dof; 6] = [
        Dof::DisplacementX,
        Dof::DisplacementY,
        Dof::DisplacementZ,
        Dof::RotationX,
        Dof::RotationY,
        Dof::RotationZ,
    ];

    /// Position of this DOF within a node's 6-vector
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Dof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dof::DisplacementX => "DISPLACEMENT_X",
            Dof::DisplacementY => "DISPLACEMENT_Y",
            Dof::DisplacementZ => "DISPLACEMENT_Z",
            Dof::RotationX => "ROTATION_X",
            Dof::RotationY => "ROTATION_Y",
            Dof::RotationZ => "ROTATION_Z",
        };
        f.write_str(name)
    }
}

/// Snapshot of a node's generalized coordinates at the current iteration
///
/// Each array is `[DX, DY, DZ, RX, RY, RZ]` (and their time derivatives).
/// Rotations are the driver's accumulated totals; the element only ever
/// consumes their increments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NodalValues {
    pub displacement: [f64; 6],
    #[serde(default)]
    pub velocity: [f64; 6],
    #[serde(default)]
    pub acceleration: [f64; 6],
}

/// A node of the beam mesh
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// X coordinate (reference)
    pub x: f64,
    /// Y coordinate (reference)
    pub y: f64,
    /// Z coordinate (reference)
    pub z: f64,

    /// Active degrees of freedom `[DX, DY, DZ, RX, RY, RZ]`
    pub dofs: [bool; 6],

    /// Volume acceleration applied to the element mass (e.g. gravity)
    #[serde(default)]
    pub volume_acceleration: [f64; 3],

    /// Current values written by the driver
    #[serde(skip)]
    pub(crate) values: NodalValues,
}

impl Node {
    /// Create a new node with all six DOFs active
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z,
            dofs: [true; 6],
            volume_acceleration: [0.0; 3],
            values: NodalValues::default(),
        }
    }

    /// Node carrying translations only (as used by truss meshes)
    pub fn translational(x: f64, y: f64, z: f64) -> Self {
        Self {
            dofs: [true, true, true, false, false, false],
            ..Self::new(x, y, z)
        }
    }

    /// Set the volume acceleration acting on attached elements
    pub fn with_volume_acceleration(mut self, g: [f64; 3]) -> Self {
        self.volume_acceleration = g;
        self
    }

    /// Get the reference coordinates as an array
    pub fn coords(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Reference position as a vector
    pub fn reference_position(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Current position: reference plus translational displacement
    pub fn current_position(&self) -> Vec3 {
        let d = &self.values.displacement;
        Vec3::new(self.x + d[0], self.y + d[1], self.z + d[2])
    }

    /// Calculate reference distance to another node
    pub fn distance_to(&self, other: &Node) -> f64 {
        (other.reference_position() - self.reference_position()).norm()
    }

    /// Whether the given DOF is active on this node
    pub fn has_dof(&self, dof: Dof) -> bool {
        self.dofs[dof.index()]
    }

    /// Current snapshot
    pub fn values(&self) -> &NodalValues {
        &self.values
    }

    /// Replace the whole snapshot
    pub fn set_values(&mut self, values: NodalValues) {
        self.values = values;
    }

    /// Set the total displacement/rotation `[DX, DY, DZ, RX, RY, RZ]`
    pub fn set_displacement(&mut self, displacement: [f64; 6]) {
        self.values.displacement = displacement;
    }

    /// Add an increment to the total displacement/rotation
    pub fn add_displacement(&mut self, increment: &[f64; 6]) {
        for (total, inc) in self.values.displacement.iter_mut().zip(increment) {
            *total += inc;
        }
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_creation() {
        let node = Node::new(1.0, 2.0, 3.0);
        assert_eq!(node.coords(), [1.0, 2.0, 3.0]);
        assert!(Dof::ALL.iter().all(|&d| node.has_dof(d)));
    }

    #[test]
    fn test_node_distance() {
        let n1 = Node::new(0.0, 0.0, 0.0);
        let n2 = Node::new(3.0, 4.0, 0.0);
        assert!((n1.distance_to(&n2) - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_current_position_follows_displacement() {
        let mut node = Node::new(1.0, 0.0, 0.0);
        node.set_displacement([0.5, -1.0, 0.0, 0.3, 0.0, 0.0]);
        node.add_displacement(&[0.5, 0.0, 2.0, 0.0, 0.0, 0.0]);

        let p = node.current_position();
        assert_eq!((p.x, p.y, p.z), (2.0, -1.0, 2.0));
        assert_eq!(node.values().displacement[3], 0.3);
    }

    #[test]
    fn test_translational_node_lacks_rotations() {
        let node = Node::translational(0.0, 0.0, 0.0);
        assert!(node.has_dof(Dof::DisplacementZ));
        assert!(!node.has_dof(Dof::RotationX));
        assert_eq!(Dof::RotationX.to_string(), "ROTATION_X");
    }
}
