//! In-memory asset registry
//!
//! Hands out sequential handles for names registered up front. Headless
//! demos and tests use it in place of a real loader.

use std::collections::HashMap;

use super::{AssetError, AssetKind, AssetProvider, MaterialHandle, MeshHandle};

/// Name-to-handle registry implementing [`AssetProvider`]
#[derive(Debug, Clone)]
pub struct AssetRegistry {
    meshes: HashMap<String, MeshHandle>,
    materials: HashMap<String, MaterialHandle>,
    next_id: u32,
}

impl AssetRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            meshes: HashMap::new(),
            materials: HashMap::new(),
            next_id: 1, // Start from 1, reserve 0 for "no asset"
        }
    }

    /// Register a mesh name, returning its handle
    ///
    /// Registering the same name twice returns the original handle.
    pub fn register_mesh(&mut self, name: impl Into<String>) -> MeshHandle {
        let name = name.into();
        if let Some(handle) = self.meshes.get(&name) {
            return *handle;
        }
        let handle = MeshHandle(self.allocate_id());
        log::debug!("Registered mesh '{}' as {:?}", name, handle);
        self.meshes.insert(name, handle);
        handle
    }

    /// Register a material name, returning its handle
    pub fn register_material(&mut self, name: impl Into<String>) -> MaterialHandle {
        let name = name.into();
        if let Some(handle) = self.materials.get(&name) {
            return *handle;
        }
        let handle = MaterialHandle(self.allocate_id());
        log::debug!("Registered material '{}' as {:?}", name, handle);
        self.materials.insert(name, handle);
        handle
    }

    /// Builder-style mesh registration
    pub fn with_mesh(mut self, name: impl Into<String>) -> Self {
        self.register_mesh(name);
        self
    }

    /// Builder-style material registration
    pub fn with_material(mut self, name: impl Into<String>) -> Self {
        self.register_material(name);
        self
    }

    /// Get number of registered assets of both kinds
    pub fn asset_count(&self) -> usize {
        self.meshes.len() + self.materials.len()
    }

    fn allocate_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl Default for AssetRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetProvider for AssetRegistry {
    fn get_mesh(&self, name: &str) -> Result<MeshHandle, AssetError> {
        self.meshes.get(name).copied().ok_or_else(|| AssetError::NotFound {
            kind: AssetKind::Mesh,
            name: name.to_string(),
        })
    }

    fn get_material(&self, name: &str) -> Result<MaterialHandle, AssetError> {
        self.materials.get(name).copied().ok_or_else(|| AssetError::NotFound {
            kind: AssetKind::Material,
            name: name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_registered_assets() {
        let registry = AssetRegistry::new()
            .with_mesh("sphere")
            .with_material("portalLight");

        assert!(registry.get_mesh("sphere").is_ok());
        assert!(registry.get_material("portalLight").is_ok());
        assert_eq!(registry.asset_count(), 2);
    }

    #[test]
    fn test_lookup_miss_reports_kind_and_name() {
        let registry = AssetRegistry::new().with_mesh("sphere");

        let err = registry.get_material("sphere").unwrap_err();
        assert_eq!(
            err,
            AssetError::NotFound { kind: AssetKind::Material, name: "sphere".to_string() }
        );
        assert_eq!(err.to_string(), "Asset not found: material 'sphere'");
    }

    #[test]
    fn test_handles_are_stable_and_unique() {
        let mut registry = AssetRegistry::new();
        let a = registry.register_mesh("a");
        let b = registry.register_mesh("b");
        assert_ne!(a, b);
        assert_eq!(registry.register_mesh("a"), a);
    }
}
