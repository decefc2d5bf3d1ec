//! Element properties addressed by named keys
//!
//! Every key is optional at the type level. Presence is enforced when the
//! element is checked and initialized, so a missing value is always
//! reported rather than silently defaulted.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Material, Section};
use crate::error::{BeamError, BeamResult, ConfigurationError};
use crate::math::beam::{shear_correction_factor, SectionConstants};
use crate::math::Vec3;

/// Named scalar properties
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyKey {
    CrossArea,
    YoungModulus,
    PoissonRatio,
    ShearModulus,
    Density,
    Ix,
    Iy,
    Iz,
    AreaEffectiveY,
    AreaEffectiveZ,
    RollAngle,
    RayleighAlpha,
    RayleighBeta,
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PropertyKey::CrossArea => "CROSS_AREA",
            PropertyKey::YoungModulus => "YOUNG_MODULUS",
            PropertyKey::PoissonRatio => "POISSON_RATIO",
            PropertyKey::ShearModulus => "SHEAR_MODULUS",
            PropertyKey::Density => "DENSITY",
            PropertyKey::Ix => "IX",
            PropertyKey::Iy => "IY",
            PropertyKey::Iz => "IZ",
            PropertyKey::AreaEffectiveY => "AREA_EFFECTIVE_Y",
            PropertyKey::AreaEffectiveZ => "AREA_EFFECTIVE_Z",
            PropertyKey::RollAngle => "ANG_ROT",
            PropertyKey::RayleighAlpha => "RAYLEIGH_ALPHA",
            PropertyKey::RayleighBeta => "RAYLEIGH_BETA",
        };
        f.write_str(name)
    }
}

/// Property set bound to an element at construction
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct Properties {
    #[serde(default)]
    pub cross_area: Option<f64>,
    #[serde(default)]
    pub young_modulus: Option<f64>,
    #[serde(default)]
    pub poisson_ratio: Option<f64>,
    #[serde(default)]
    pub shear_modulus: Option<f64>,
    #[serde(default)]
    pub density: Option<f64>,
    #[serde(default)]
    pub ix: Option<f64>,
    #[serde(default)]
    pub iy: Option<f64>,
    #[serde(default)]
    pub iz: Option<f64>,
    #[serde(default)]
    pub area_effective_y: Option<f64>,
    #[serde(default)]
    pub area_effective_z: Option<f64>,
    #[serde(default, rename = "ANG_ROT")]
    pub roll_angle: Option<f64>,
    #[serde(default)]
    pub local_axis_2: Option<[f64; 3]>,
    #[serde(default)]
    pub rayleigh_alpha: Option<f64>,
    #[serde(default)]
    pub rayleigh_beta: Option<f64>,
}

impl Properties {
    /// Empty property set
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a complete property set from a material and a section
    pub fn from_parts(material: &Material, section: &Section) -> Self {
        let (area_y, area_z) = section.shear.effective_areas();
        let mut props = Self::new()
            .with(PropertyKey::CrossArea, section.a)
            .with(PropertyKey::YoungModulus, material.e)
            .with(PropertyKey::ShearModulus, material.g)
            .with(PropertyKey::PoissonRatio, material.nu)
            .with(PropertyKey::Density, material.rho)
            .with(PropertyKey::Ix, section.j)
            .with(PropertyKey::Iy, section.iy)
            .with(PropertyKey::Iz, section.iz)
            .with(PropertyKey::AreaEffectiveY, area_y)
            .with(PropertyKey::AreaEffectiveZ, area_z)
            .with(PropertyKey::RollAngle, section.rotation);
        props.local_axis_2 = section.local_axis_2;
        if let Some((alpha, beta)) = material.rayleigh {
            props = props
                .with(PropertyKey::RayleighAlpha, alpha)
                .with(PropertyKey::RayleighBeta, beta);
        }
        props
    }

    /// Parse a property set from JSON using the named keys
    pub fn from_json(json: &str) -> BeamResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    fn slot(&self, key: PropertyKey) -> &Option<f64> {
        match key {
            PropertyKey::CrossArea => &self.cross_area,
            PropertyKey::YoungModulus => &self.young_modulus,
            PropertyKey::PoissonRatio => &self.poisson_ratio,
            PropertyKey::ShearModulus => &self.shear_modulus,
            PropertyKey::Density => &self.density,
            PropertyKey::Ix => &self.ix,
            PropertyKey::Iy => &self.iy,
            PropertyKey::Iz => &self.iz,
            PropertyKey::AreaEffectiveY => &self.area_effective_y,
            PropertyKey::AreaEffectiveZ => &self.area_effective_z,
            PropertyKey::RollAngle => &self.roll_angle,
            PropertyKey::RayleighAlpha => &self.rayleigh_alpha,
            PropertyKey::RayleighBeta => &self.rayleigh_beta,
        }
    }

    fn slot_mut(&mut self, key: PropertyKey) -> &mut Option<f64> {
        match key {
            PropertyKey::CrossArea => &mut self.cross_area,
            PropertyKey::YoungModulus => &mut self.young_modulus,
            PropertyKey::PoissonRatio => &mut self.poisson_ratio,
            PropertyKey::ShearModulus => &mut self.shear_modulus,
            PropertyKey::Density => &mut self.density,
            PropertyKey::Ix => &mut self.ix,
            PropertyKey::Iy => &mut self.iy,
            PropertyKey::Iz => &mut self.iz,
            PropertyKey::AreaEffectiveY => &mut self.area_effective_y,
            PropertyKey::AreaEffectiveZ => &mut self.area_effective_z,
            PropertyKey::RollAngle => &mut self.roll_angle,
            PropertyKey::RayleighAlpha => &mut self.rayleigh_alpha,
            PropertyKey::RayleighBeta => &mut self.rayleigh_beta,
        }
    }

    /// Look up a property by key
    pub fn get(&self, key: PropertyKey) -> Option<f64> {
        *self.slot(key)
    }

    /// Whether a property is present
    pub fn has(&self, key: PropertyKey) -> bool {
        self.slot(key).is_some()
    }

    /// Set a property
    pub fn set(&mut self, key: PropertyKey, value: f64) {
        *self.slot_mut(key) = Some(value);
    }

    /// Remove a property
    pub fn remove(&mut self, key: PropertyKey) {
        *self.slot_mut(key) = None;
    }

    /// Builder form of `set`
    pub fn with(mut self, key: PropertyKey, value: f64) -> Self {
        self.set(key, value);
        self
    }

    /// Builder for the explicit local y direction
    pub fn with_local_axis_2(mut self, direction: [f64; 3]) -> Self {
        self.local_axis_2 = Some(direction);
        self
    }

    /// Fetch a property that must be present
    pub fn require(&self, element: usize, key: PropertyKey) -> BeamResult<f64> {
        self.get(key).ok_or_else(|| {
            BeamError::configuration(element, ConfigurationError::MissingProperty(key))
        })
    }

    /// Fetch a property that must be present and non-zero
    pub fn require_non_zero(&self, element: usize, key: PropertyKey) -> BeamResult<f64> {
        let value = self.require(element, key)?;
        if value == 0.0 {
            return Err(BeamError::configuration(
                element,
                ConfigurationError::ZeroProperty(key),
            ));
        }
        Ok(value)
    }

    /// Shear modulus, given directly or derived as E / (2(1 + nu))
    pub fn resolve_shear_modulus(&self, element: usize) -> BeamResult<f64> {
        if let Some(g) = self.shear_modulus {
            return Ok(g);
        }
        let e = self.require(element, PropertyKey::YoungModulus)?;
        let nu = self.require(element, PropertyKey::PoissonRatio)?;
        Ok(e / (2.0 * (1.0 + nu)))
    }
}

/// Material-derived constants fixed by `initialize`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementConstants {
    pub section: SectionConstants,
    /// Density
    pub rho: f64,
    /// Manual roll about the element axis
    pub roll_angle: f64,
    /// Explicit local y direction, if given
    pub local_axis_2: Option<Vec3>,
    pub rayleigh_alpha: Option<f64>,
    pub rayleigh_beta: Option<f64>,
}

impl ElementConstants {
    /// Resolve all constants for an element of the given reference length
    pub fn resolve(element: usize, props: &Properties, length: f64) -> BeamResult<Self> {
        let e = props.require_non_zero(element, PropertyKey::YoungModulus)?;
        let a = props.require_non_zero(element, PropertyKey::CrossArea)?;
        let rho = props.require(element, PropertyKey::Density)?;
        let j = props.require(element, PropertyKey::Ix)?;
        let iy = props.require(element, PropertyKey::Iy)?;
        let iz = props.require(element, PropertyKey::Iz)?;
        let g = props.resolve_shear_modulus(element)?;

        let area_eff_y = props.get(PropertyKey::AreaEffectiveY).unwrap_or(0.0);
        let area_eff_z = props.get(PropertyKey::AreaEffectiveZ).unwrap_or(0.0);

        // bending about y shears along z and vice versa
        let psi_y = shear_correction_factor(e, g, iy, area_eff_z, length);
        let psi_z = shear_correction_factor(e, g, iz, area_eff_y, length);

        Ok(Self {
            section: SectionConstants {
                e,
                g,
                a,
                j,
                iy,
                iz,
                psi_y,
                psi_z,
            },
            rho,
            roll_angle: props.get(PropertyKey::RollAngle).unwrap_or(0.0),
            local_axis_2: props.local_axis_2.map(|d| Vec3::new(d[0], d[1], d[2])),
            rayleigh_alpha: props.get(PropertyKey::RayleighAlpha),
            rayleigh_beta: props.get(PropertyKey::RayleighBeta),
        })
    }
}
