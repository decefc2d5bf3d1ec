//! Finite rotation tracking at the two element nodes
//!
//! Each node keeps a unit quaternion of the rotation accumulated since the
//! element was initialized. Increments are composed exactly; no small-angle
//! linearization is applied to the accumulated state.

use nalgebra::Quaternion;

use crate::error::NumericalWarning;
use crate::math::Vec3;

/// Quaternion `(sqrt(1 - |v|²), v)` with `v = dφ / 2`
///
/// Returns `None` when the increment is too large for a single step
/// (negative radicand).
pub fn incremental_quaternion(d_phi: &Vec3) -> Option<Quaternion<f64>> {
    let v = d_phi * 0.5;
    let radicand = 1.0 - v.norm_squared();
    if radicand < 0.0 {
        return None;
    }
    Some(Quaternion::from_parts(radicand.sqrt(), v))
}

/// Hamilton product `increment ⊗ old`
pub fn compose(increment: &Quaternion<f64>, old: &Quaternion<f64>) -> Quaternion<f64> {
    let s = increment.w;
    let v = increment.imag();
    let s0 = old.w;
    let v0 = old.imag();

    Quaternion::from_parts(s * s0 - v.dot(&v0), v0 * s + v * s0 + v.cross(&v0))
}

/// Accumulated rotation of node A and node B
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationTracker {
    nodes: [Quaternion<f64>; 2],
}

impl Default for RotationTracker {
    fn default() -> Self {
        Self::identity()
    }
}

impl RotationTracker {
    /// Both nodes unrotated
    pub fn identity() -> Self {
        Self {
            nodes: [Quaternion::identity(); 2],
        }
    }

    /// Quaternion of local node 0 (A) or 1 (B)
    pub fn node(&self, local_node: usize) -> &Quaternion<f64> {
        &self.nodes[local_node]
    }

    pub fn node_a(&self) -> &Quaternion<f64> {
        &self.nodes[0]
    }

    pub fn node_b(&self) -> &Quaternion<f64> {
        &self.nodes[1]
    }

    /// State after composing one rotation increment per node
    ///
    /// `self` is left untouched so a rejected increment never corrupts the
    /// accumulated rotation.
    pub fn advanced(&self, increments: &[Vec3; 2]) -> Result<Self, NumericalWarning> {
        let mut nodes = self.nodes;
        for (local_node, (q, d_phi)) in nodes.iter_mut().zip(increments).enumerate() {
            let dq = incremental_quaternion(d_phi).ok_or(
                NumericalWarning::RotationIncrementTooLarge {
                    local_node,
                    magnitude: d_phi.norm(),
                },
            )?;
            *q = compose(&dq, q);
        }
        Ok(Self { nodes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{Unit, UnitQuaternion};

    /// Rotation vector whose incremental quaternion is exactly `angle` about `axis`
    fn exact_increment(axis: &Unit<Vec3>, angle: f64) -> Vec3 {
        axis.into_inner() * (2.0 * (angle / 2.0).sin())
    }

    fn assert_same_rotation(q: &Quaternion<f64>, expected: &UnitQuaternion<f64>) {
        // q and -q describe the same rotation
        let e = expected.quaternion();
        let sign = if q.dot(e) < 0.0 { -1.0 } else { 1.0 };
        assert_relative_eq!(*q * sign, *e, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_increment_keeps_identity() {
        let tracker = RotationTracker::identity()
            .advanced(&[Vec3::zeros(), Vec3::zeros()])
            .unwrap();
        assert_eq!(*tracker.node_a(), Quaternion::identity());
        assert_eq!(*tracker.node_b(), Quaternion::identity());
    }

    #[test]
    fn test_increments_about_fixed_axis_accumulate() {
        let axis = Unit::new_normalize(Vec3::new(1.0, -2.0, 0.5));
        let step = 0.05;
        let n = 40;

        let mut tracker = RotationTracker::identity();
        for _ in 0..n {
            let d = exact_increment(&axis, step);
            tracker = tracker.advanced(&[d, -d]).unwrap();
        }

        let expected_a = UnitQuaternion::from_axis_angle(&axis, step * n as f64);
        let expected_b = UnitQuaternion::from_axis_angle(&axis, -step * n as f64);
        assert_same_rotation(tracker.node_a(), &expected_a);
        assert_same_rotation(tracker.node_b(), &expected_b);
    }

    #[test]
    fn test_composition_matches_product_of_finite_rotations() {
        let steps = [
            (Unit::new_normalize(Vec3::x()), 0.3),
            (Unit::new_normalize(Vec3::new(0.0, 1.0, 1.0)), -0.7),
            (Unit::new_normalize(Vec3::new(1.0, 1.0, 1.0)), 1.1),
            (Unit::new_normalize(Vec3::z()), 0.2),
        ];

        let mut tracker = RotationTracker::identity();
        let mut expected = UnitQuaternion::identity();
        for (axis, angle) in &steps {
            let d = exact_increment(axis, *angle);
            tracker = tracker.advanced(&[d, Vec3::zeros()]).unwrap();
            // spatial increments compose from the left
            expected = UnitQuaternion::from_axis_angle(axis, *angle) * expected;
        }

        assert_same_rotation(tracker.node_a(), &expected);
        assert_relative_eq!(tracker.node_a().norm(), 1.0, epsilon = 1e-12);
        assert_eq!(*tracker.node_b(), Quaternion::identity());
    }

    #[test]
    fn test_compose_matches_hamilton_product() {
        let a = Quaternion::new(0.9, 0.1, -0.3, 0.2);
        let b = Quaternion::new(0.5, 0.4, 0.2, -0.7);
        assert_relative_eq!(compose(&a, &b), a * b, epsilon = 1e-15);
    }

    #[test]
    fn test_oversized_increment_is_flagged() {
        let tracker = RotationTracker::identity();
        let err = tracker
            .advanced(&[Vec3::zeros(), Vec3::new(0.0, 2.5, 0.0)])
            .unwrap_err();
        match err {
            NumericalWarning::RotationIncrementTooLarge {
                local_node,
                magnitude,
            } => {
                assert_eq!(local_node, 1);
                assert_relative_eq!(magnitude, 2.5);
            }
            other => panic!("unexpected warning {other:?}"),
        }
    }
}
