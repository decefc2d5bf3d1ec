//! Material properties

use serde::{Deserialize, Serialize};

/// Linear-elastic material for the beam cross-section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Material {
    /// Modulus of elasticity (Young's modulus) in Pa
    pub e: f64,
    /// Shear modulus in Pa
    pub g: f64,
    /// Poisson's ratio
    pub nu: f64,
    /// Density in kg/m³
    pub rho: f64,
    /// Rayleigh damping coefficients (alpha, beta), if the material sets its own
    pub rayleigh: Option<(f64, f64)>,
}

impl Material {
    /// Create a new material with given properties
    pub fn new(e: f64, g: f64, nu: f64, rho: f64) -> Self {
        Self {
            e,
            g,
            nu,
            rho,
            rayleigh: None,
        }
    }

    /// Create a new isotropic material from E and nu
    /// G is calculated as E / (2 * (1 + nu))
    pub fn isotropic(e: f64, nu: f64, rho: f64) -> Self {
        let g = e / (2.0 * (1.0 + nu));
        Self::new(e, g, nu, rho)
    }

    /// Attach material-specific Rayleigh damping
    pub fn with_rayleigh(mut self, alpha: f64, beta: f64) -> Self {
        self.rayleigh = Some((alpha, beta));
        self
    }

    /// Create a structural steel material
    pub fn steel() -> Self {
        Self::isotropic(2e11, 0.3, 7850.0)
    }

    /// Create an aluminum material (6061-T6)
    pub fn aluminum() -> Self {
        Self::isotropic(68.9e9, 0.33, 2700.0)
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::steel()
    }
}
