//! Asset provider boundary
//!
//! The pipeline never loads or owns meshes and materials. It only holds the
//! opaque handles an [`AssetProvider`] hands out by name.

pub mod registry;

pub use registry::AssetRegistry;

use std::fmt;
use thiserror::Error;

/// Non-owning handle to a mesh held by the asset provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshHandle(pub u32);

/// Non-owning handle to a material held by the asset provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialHandle(pub u32);

/// Kind of asset a lookup was asking for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    /// Mesh geometry
    Mesh,
    /// Material / shader program
    Material,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mesh => f.write_str("mesh"),
            Self::Material => f.write_str("material"),
        }
    }
}

/// Asset lookup errors
///
/// A miss is fatal for the scene being assembled; nothing retries.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    /// No asset with this name is known to the provider
    #[error("Asset not found: {kind} '{name}'")]
    NotFound {
        /// Which kind of asset was requested
        kind: AssetKind,
        /// The name that failed to resolve
        name: String,
    },
}

/// Resolves asset names into handles
pub trait AssetProvider {
    /// Look up a mesh by name
    fn get_mesh(&self, name: &str) -> Result<MeshHandle, AssetError>;

    /// Look up a material by name
    fn get_material(&self, name: &str) -> Result<MaterialHandle, AssetError>;
}
