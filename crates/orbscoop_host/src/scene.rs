//! The scene graph contract the orb policy runs against.
//!
//! A scene is a tree of slots. Slots can carry *asset markers* (a reference
//! to a material or mesh the slot stands for), *host* asset resources, and
//! renderers that draw with a material and a mesh. Orbs are slots under a
//! tool's orb slot.

use core::fmt;

use crate::asset::{AssetKind, AssetRef};

/// Identifier of a slot in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(u64);

impl SlotId {
    /// Wraps a raw identifier.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Local placement of a slot relative to its parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Offset from the parent.
    pub position: [f32; 3],
    /// Rotation quaternion `(x, y, z, w)`.
    pub rotation: [f32; 4],
    /// Per-axis scale.
    pub scale: [f32; 3],
}

impl Transform {
    /// No offset, no rotation, unit scale.
    pub const IDENTITY: Self = Self {
        position: [0.0; 3],
        rotation: [0.0, 0.0, 0.0, 1.0],
        scale: [1.0; 3],
    };

    /// Identity rotation and scale at `position`.
    #[must_use]
    pub const fn at(position: [f32; 3]) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Errors returned by scene mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
    /// The slot does not exist, or was destroyed.
    #[error("slot {0} does not exist")]
    MissingSlot(SlotId),

    /// Reparenting would make a slot its own ancestor.
    #[error("cannot parent slot {child} under its descendant {parent}")]
    Cycle {
        /// The slot being moved.
        child: SlotId,
        /// The requested parent.
        parent: SlotId,
    },

    /// The slot is structural and cannot be moved or destroyed.
    #[error("slot {0} is protected")]
    Protected(SlotId),
}

/// Read and mutate access to a scene.
///
/// Reads on a missing slot return an empty answer; mutations on a missing
/// slot return [`SceneError::MissingSlot`].
pub trait SceneGraph: Send + Sync + 'static {
    /// Returns true if the slot exists.
    fn contains(&self, slot: SlotId) -> bool;

    /// Direct children of `slot`, oldest first.
    fn children(&self, slot: SlotId) -> Vec<SlotId>;

    /// Returns true if `slot` itself carries an asset marker of `kind`.
    ///
    /// A marker can be empty: it stays attached after the asset it pointed
    /// at was released.
    fn has_marker(&self, slot: SlotId, kind: AssetKind) -> bool;

    /// The asset the marker of `kind` on `slot` points at.
    fn marker(&self, slot: SlotId, kind: AssetKind) -> Option<AssetRef>;

    /// The asset of the first marker of `kind` found depth-first from
    /// `slot`, the slot itself included.
    ///
    /// The search stops at the first marker even if it is empty.
    fn find_marker(&self, slot: SlotId, kind: AssetKind) -> Option<AssetRef> {
        self.find_marker_slot(slot, kind)
            .and_then(|found| self.marker(found, kind))
    }

    /// The first slot carrying a marker of `kind`, depth-first from `slot`.
    fn find_marker_slot(&self, slot: SlotId, kind: AssetKind) -> Option<SlotId> {
        if self.has_marker(slot, kind) {
            return Some(slot);
        }
        self.children(slot)
            .into_iter()
            .find_map(|child| self.find_marker_slot(child, kind))
    }

    /// The asset of `kind` that the renderer on `slot` draws with.
    fn rendered_asset(&self, slot: SlotId, kind: AssetKind) -> Option<AssetRef>;

    /// The world's fallback asset of `kind`, such as the skybox material.
    fn ambient_asset(&self, kind: AssetKind) -> Option<AssetRef>;

    /// Moves `slot` to the end of `parent`'s children.
    ///
    /// # Errors
    ///
    /// Fails if either slot is missing, if `parent` lies under `slot`, or if
    /// `slot` is structural.
    fn set_parent(&mut self, slot: SlotId, parent: SlotId) -> Result<(), SceneError>;

    /// Resets the local transform of `slot`.
    ///
    /// # Errors
    ///
    /// Fails if the slot is missing.
    fn set_identity_transform(&mut self, slot: SlotId) -> Result<(), SceneError>;

    /// Destroys `slot` and its descendants.
    ///
    /// Asset resources hosted under the destroyed slots that are still
    /// referenced from outside them survive the destruction.
    ///
    /// # Errors
    ///
    /// Fails if the slot is missing or structural.
    fn destroy_preserving_assets(&mut self, slot: SlotId) -> Result<(), SceneError>;
}
