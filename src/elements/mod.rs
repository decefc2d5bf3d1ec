//! Mesh-side building blocks: nodes, supports, material, section, properties, orientation

mod material;
mod node;
mod orientation;
mod properties;
mod section;
mod support;

pub use material::Material;
pub use node::{Dof, NodalValues, Node};
pub use orientation::Orientation;
pub use properties::{ElementConstants, Properties, PropertyKey};
pub use section::{Section, ShearModel};
pub use support::Support;
