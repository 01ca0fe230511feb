//! Tracked objects and the registry that holds them
//!
//! A tracked object is any scene entity whose position feeds ray picking or
//! fake-shadow projection. Capabilities are declared once at registration
//! through [`ObjectFlags`].

use bitflags::bitflags;
use slotmap::{new_key_type, SlotMap};

use crate::assets::{MaterialHandle, MeshHandle};
use crate::foundation::math::Vec3;
use crate::picking::ray::{BoundingBox, BoundingSphere, Ray};

new_key_type! {
    /// Stable identity of a tracked object for the whole session
    pub struct ObjectId;
}

bitflags! {
    /// Capabilities a tracked object takes part in
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ObjectFlags: u32 {
        /// Considered by the ray picker and tinted by the highlight pass
        const PICKABLE = 0b0001;
        /// Owns a shadow decal projected onto the reference plane
        const CASTS_SHADOW = 0b0010;
    }
}

impl Default for ObjectFlags {
    fn default() -> Self {
        Self::PICKABLE | Self::CASTS_SHADOW
    }
}

/// Bounding representation used for ray intersection
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bounds {
    /// Sphere centered on the object's position
    Sphere {
        /// Sphere radius
        radius: f32,
    },
    /// Axis-aligned box centered on the object's position
    Box {
        /// Half size along each axis
        half_extents: Vec3,
    },
}

impl Bounds {
    /// Distance to the first forward hit when placed at `center`
    pub fn intersect_ray(&self, center: Vec3, ray: &Ray) -> Option<f32> {
        match *self {
            Self::Sphere { radius } => BoundingSphere::new(center, radius).intersect_ray(ray),
            Self::Box { half_extents } => BoundingBox::from_center(center, half_extents).intersect_ray(ray),
        }
    }
}

/// A scene entity the pipeline reads each frame
#[derive(Debug, Clone)]
pub struct TrackedObject {
    /// Human-readable name, used in logs
    pub name: String,
    /// Position in world space
    pub position: Vec3,
    /// Euler rotation in radians (X, Y, Z)
    pub rotation: Vec3,
    /// Mesh owned by the asset provider
    pub mesh: MeshHandle,
    /// Material owned by the asset provider
    pub material: MaterialHandle,
    /// Bounding shape for picking
    pub bounds: Bounds,
    /// Capabilities this object takes part in
    pub flags: ObjectFlags,
}

impl TrackedObject {
    /// Create an object at the origin with default capabilities
    pub fn new(name: impl Into<String>, mesh: MeshHandle, material: MaterialHandle, bounds: Bounds) -> Self {
        Self {
            name: name.into(),
            position: Vec3::zeros(),
            rotation: Vec3::zeros(),
            mesh,
            material,
            bounds,
            flags: ObjectFlags::default(),
        }
    }

    /// Set the starting position
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Replace the capability flags
    pub fn with_flags(mut self, flags: ObjectFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Whether the picker considers this object
    pub fn is_pickable(&self) -> bool {
        self.flags.contains(ObjectFlags::PICKABLE)
    }

    /// Whether this object owns a shadow decal
    pub fn casts_shadow(&self) -> bool {
        self.flags.contains(ObjectFlags::CASTS_SHADOW)
    }
}

/// Insertion-ordered registry of tracked objects
///
/// Objects are registered while a scene is assembled and never removed, so
/// iteration order equals registration order.
#[derive(Debug, Clone, Default)]
pub struct ObjectSet {
    objects: SlotMap<ObjectId, TrackedObject>,
}

impl ObjectSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an object
    pub fn insert(&mut self, object: TrackedObject) -> ObjectId {
        self.objects.insert(object)
    }

    /// Get an object by id
    pub fn get(&self, id: ObjectId) -> Option<&TrackedObject> {
        self.objects.get(id)
    }

    /// Get a mutable object by id
    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut TrackedObject> {
        self.objects.get_mut(id)
    }

    /// Move an object; returns false for unknown ids
    pub fn set_position(&mut self, id: ObjectId, position: Vec3) -> bool {
        self.objects
            .get_mut(id)
            .map(|object| object.position = position)
            .is_some()
    }

    /// Iterate objects in registration order
    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &TrackedObject)> {
        self.objects.iter()
    }

    /// Iterate pickable objects in registration order
    pub fn pickable(&self) -> impl Iterator<Item = (ObjectId, &TrackedObject)> {
        self.iter().filter(|(_, object)| object.is_pickable())
    }

    /// Get number of tracked objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether no objects are registered
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
