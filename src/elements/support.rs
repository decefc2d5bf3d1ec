//! Restraint conditions used by the static driver

use serde::{Deserialize, Serialize};

use super::Dof;

/// Restrained DOFs of a node `[DX, DY, DZ, RX, RY, RZ]`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Support {
    pub restrained: [bool; 6],
}

impl Support {
    /// No restraints
    pub fn new() -> Self {
        Self::default()
    }

    /// Clamped: all six DOFs restrained
    pub fn fixed() -> Self {
        Self {
            restrained: [true; 6],
        }
    }

    /// Translations restrained, rotations free
    pub fn pinned() -> Self {
        Self {
            restrained: [true, true, true, false, false, false],
        }
    }

    /// Builder form restraining one more DOF
    pub fn with(mut self, dof: Dof) -> Self {
        self.restrained[dof.index()] = true;
        self
    }

    pub fn is_restrained(&self, dof: Dof) -> bool {
        self.restrained[dof.index()]
    }

    /// Local indices (0-5) of the free DOFs
    pub fn free_dofs(&self) -> impl Iterator<Item = usize> + '_ {
        (0..6).filter(move |&k| !self.restrained[k])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_and_pinned() {
        assert_eq!(Support::fixed().free_dofs().count(), 0);
        let pinned = Support::pinned();
        assert!(pinned.is_restrained(Dof::DisplacementZ));
        assert!(!pinned.is_restrained(Dof::RotationX));
        assert_eq!(pinned.free_dofs().collect::<Vec<_>>(), vec![3, 4, 5]);
    }

    #[test]
    fn test_builder() {
        let s = Support::new().with(Dof::DisplacementY).with(Dof::RotationZ);
        assert_eq!(s.free_dofs().collect::<Vec<_>>(), vec![0, 2, 3, 4]);
    }
}
