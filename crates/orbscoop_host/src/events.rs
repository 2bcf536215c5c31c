//! Host events and their schedule markers.
//!
//! The host reports two kinds of interaction. Each has a marker type used to
//! register hooks on [`HostHooksAPI`](crate::hooks::HostHooksAPI), and a
//! [`HostEvent`] variant carrying the data hooks receive.

use orbscoop_system::plugin::{Schedule, ScheduleId};

use crate::scene::SlotId;
use crate::tool::{ToolId, UserId};

/// Hooks run when a user presses the secondary button on a tool.
///
/// Event data: [`HostEvent::SecondaryPress`]
pub struct OnSecondaryPress;
impl Schedule for OnSecondaryPress {}

/// Hooks run when a user finishes creating an asset container.
///
/// Creation callbacks of the host may still be pending when this fires.
///
/// Event data: [`HostEvent::AssetCreated`]
pub struct OnAssetCreated;
impl Schedule for OnAssetCreated {}

/// Data passed to host event hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// Secondary press on a tool.
    SecondaryPress {
        /// The pressed tool.
        tool: ToolId,
    },
    /// A new asset container was created.
    AssetCreated {
        /// The container holding the new asset.
        container: SlotId,
        /// The user who created it.
        user: UserId,
    },
}

impl HostEvent {
    /// The schedule this event is dispatched on.
    #[must_use]
    pub fn schedule(&self) -> ScheduleId {
        match self {
            HostEvent::SecondaryPress { .. } => ScheduleId::of::<OnSecondaryPress>(),
            HostEvent::AssetCreated { .. } => ScheduleId::of::<OnAssetCreated>(),
        }
    }
}
