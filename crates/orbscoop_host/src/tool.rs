//! Tools and the users holding them.

use core::fmt;

use crate::asset::{AssetKind, AssetRef};
use crate::scene::SlotId;

/// Identifier of a tool instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToolId(u64);

impl ToolId {
    /// Wraps a raw identifier.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ToolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tool#{}", self.0)
    }
}

/// Identifier of a user in the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(u64);

impl UserId {
    /// Wraps a raw identifier.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "user#{}", self.0)
    }
}

/// What a tool's user is currently grabbing.
#[derive(Debug, Clone, PartialEq)]
pub enum HeldReference {
    /// An asset picked up directly, e.g. dragged from an inspector.
    Asset(AssetRef),
    /// A scene object.
    Container(SlotId),
}

/// An interactive tool that applies assets of one kind.
#[derive(Debug, Clone, PartialEq)]
pub struct Tool {
    /// This tool's id.
    pub id: ToolId,
    /// Which asset kind the tool applies.
    pub kind: AssetKind,
    /// The slot whose children are the tool's orbs.
    pub orb_slot: SlotId,
    /// The reference the user holds, if any.
    pub held: Option<HeldReference>,
    /// Whether the tool aims with a laser and can probe for targets.
    pub uses_probe: bool,
    /// Where dropped orbs go: the owning user's space.
    pub user_space: SlotId,
}

impl Tool {
    /// The explicitly held asset, if the held reference is an asset.
    #[must_use]
    pub fn held_asset(&self) -> Option<&AssetRef> {
        match &self.held {
            Some(HeldReference::Asset(asset)) => Some(asset),
            _ => None,
        }
    }

    /// Returns true if the user is holding a scene object.
    #[must_use]
    pub fn holds_container(&self) -> bool {
        matches!(self.held, Some(HeldReference::Container(_)))
    }
}

/// Which hand an interaction handler belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Left hand.
    Left,
    /// Right hand.
    Right,
}

impl Side {
    /// The other hand.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// One of a user's interaction handlers (one per hand).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandlerInfo {
    /// The hand.
    pub side: Side,
    /// True if this is the user's primary hand.
    pub primary: bool,
    /// The tool currently equipped in this hand.
    pub active_tool: Option<ToolId>,
}

/// Lookup of tools and the handlers that equip them.
pub trait ToolRig {
    /// Returns a snapshot of the tool.
    fn tool(&self, id: ToolId) -> Option<Tool>;

    /// The user's interaction handlers, in discovery order.
    fn handlers(&self, user: UserId) -> Vec<HandlerInfo>;
}
