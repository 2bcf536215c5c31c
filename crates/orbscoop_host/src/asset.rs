//! Asset handles.
//!
//! An [`AssetRef`] names a material or mesh resource living somewhere in the
//! world. Two handles are equal only when they point at the same resource:
//! two materials with identical names and settings are still different
//! assets.

use core::fmt;
use core::hash::{Hash, Hasher};
use std::sync::Arc;

/// The two asset kinds tools can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    /// Surface materials, applied by material tools.
    Material,
    /// Geometry, applied by mesh tools.
    Mesh,
}

impl AssetKind {
    /// Every kind, materials first.
    pub const ALL: [AssetKind; 2] = [AssetKind::Material, AssetKind::Mesh];
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetKind::Material => f.write_str("material"),
            AssetKind::Mesh => f.write_str("mesh"),
        }
    }
}

struct AssetData {
    kind: AssetKind,
    name: String,
}

/// Shared handle to an asset resource.
///
/// Equality and hashing use reference identity.
///
/// ```
/// use orbscoop_host::asset::{AssetKind, AssetRef};
///
/// let brick = AssetRef::new(AssetKind::Material, "Brick");
/// let other_brick = AssetRef::new(AssetKind::Material, "Brick");
///
/// assert_eq!(brick, brick.clone());
/// assert_ne!(brick, other_brick);
/// ```
#[derive(Clone)]
pub struct AssetRef(Arc<AssetData>);

impl AssetRef {
    /// Creates a new, distinct asset.
    #[must_use]
    pub fn new(kind: AssetKind, name: impl Into<String>) -> Self {
        Self(Arc::new(AssetData {
            kind,
            name: name.into(),
        }))
    }

    /// Shorthand for `AssetRef::new(AssetKind::Material, name)`.
    #[must_use]
    pub fn material(name: impl Into<String>) -> Self {
        Self::new(AssetKind::Material, name)
    }

    /// Shorthand for `AssetRef::new(AssetKind::Mesh, name)`.
    #[must_use]
    pub fn mesh(name: impl Into<String>) -> Self {
        Self::new(AssetKind::Mesh, name)
    }

    /// The kind of resource this handle points at.
    #[must_use]
    pub fn kind(&self) -> AssetKind {
        self.0.kind
    }

    /// Display name, for logs only.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0.name
    }
}

impl PartialEq for AssetRef {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for AssetRef {}

impl Hash for AssetRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.0).hash(state);
    }
}

impl fmt::Debug for AssetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AssetRef({} {:?} @{:p})", self.0.kind, self.0.name, Arc::as_ptr(&self.0))
    }
}

impl fmt::Display for AssetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.0.kind, self.0.name)
    }
}
