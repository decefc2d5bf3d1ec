//! Section properties for beam elements

use serde::{Deserialize, Serialize};

/// How the cross-section responds to transverse shear
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ShearModel {
    /// Euler-Bernoulli: no shear deformation
    Rigid,
    /// Timoshenko with effective shear areas in local y and z
    Flexible { area_y: f64, area_z: f64 },
}

impl ShearModel {
    /// Effective shear areas `(A_y, A_z)`; zero stands for shear-rigid
    pub fn effective_areas(&self) -> (f64, f64) {
        match *self {
            ShearModel::Rigid => (0.0, 0.0),
            ShearModel::Flexible { area_y, area_z } => (area_y, area_z),
        }
    }
}

/// Cross-section properties for beam elements
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    /// Cross-sectional area in m²
    pub a: f64,
    /// Moment of inertia about local y-axis in m⁴
    pub iy: f64,
    /// Moment of inertia about local z-axis in m⁴
    pub iz: f64,
    /// Torsional constant in m⁴
    pub j: f64,
    /// Shear response
    pub shear: ShearModel,
    /// Rotation of the section about the element axis (radians)
    pub rotation: f64,
    /// Explicit direction of the local y-axis, overrides `rotation`
    pub local_axis_2: Option<[f64; 3]>,
}

impl Section {
    /// Create a new shear-rigid section with basic properties
    pub fn new(a: f64, iy: f64, iz: f64, j: f64) -> Self {
        Self {
            a,
            iy,
            iz,
            j,
            shear: ShearModel::Rigid,
            rotation: 0.0,
            local_axis_2: None,
        }
    }

    /// Create a rectangular section (width along local y, depth along local z)
    pub fn rectangular(width: f64, depth: f64) -> Self {
        let a = width * depth;
        let iy = width * depth.powi(3) / 12.0;
        let iz = depth * width.powi(3) / 12.0;

        // Torsional constant for rectangle (approximate)
        let (a_dim, b_dim) = if width > depth { (width, depth) } else { (depth, width) };
        let j = a_dim * b_dim.powi(3) / 3.0 * (1.0 - 0.63 * b_dim / a_dim);

        Self::new(a, iy, iz, j).with_shear_model(ShearModel::Flexible {
            area_y: 5.0 / 6.0 * a,
            area_z: 5.0 / 6.0 * a,
        })
    }

    /// Create a circular section
    pub fn circular(diameter: f64) -> Self {
        let r = diameter / 2.0;
        let a = std::f64::consts::PI * r.powi(2);
        let i = std::f64::consts::PI * r.powi(4) / 4.0;
        let j = std::f64::consts::PI * r.powi(4) / 2.0;

        Self::new(a, i, i, j).with_shear_model(ShearModel::Flexible {
            area_y: 0.9 * a,
            area_z: 0.9 * a,
        })
    }

    /// Select the shear response
    pub fn with_shear_model(mut self, shear: ShearModel) -> Self {
        self.shear = shear;
        self
    }

    /// Set section rotation about the element axis
    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    /// Fix the local y-axis to an explicit direction
    pub fn with_local_axis_2(mut self, direction: [f64; 3]) -> Self {
        self.local_axis_2 = Some(direction);
        self
    }
}

impl Default for Section {
    fn default() -> Self {
        // Default to a 200mm x 200mm rectangular section
        Self::rectangular(0.2, 0.2)
    }
}
