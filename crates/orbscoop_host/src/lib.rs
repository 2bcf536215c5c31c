//! Host collaborator interfaces for orbscoop (Layer 2).
//!
//! The orb policy never talks to a concrete platform. It sees the host
//! through the contracts in this crate:
//!
//! - [`scene::SceneGraph`] - slot tree, asset markers, reparenting and
//!   asset-preserving destruction
//! - [`tool::ToolRig`] - tools and the per-hand handlers equipping them
//! - [`probe::Prober`] - what a tool's laser is pointing at
//! - [`hooks::HostHooksAPI`] - subscription to host events
//! - [`menu::MenuAPI`] - tool context menu contributions
//! - [`capabilities::HostCapabilities`] - what the host advertises
//!
//! [`world::World`] is an in-memory implementation of the scene and tool
//! contracts, and [`plugin::WorldPlugin`] hosts it in a session.
//!
//! # Feature Flags
//!
//! - `test-utils` - Enables the [`testing`] fixtures
//!
//! # Architecture
//!
//! - **Layer 1** (`orbscoop_system`): plugins, resources, sessions
//! - **Layer 2** (`orbscoop_host`): host contracts and the reference world
//! - **Layer 3** (`orbscoop_core`, `orbscoop_plugins`): the orb policy and
//!   the plugins wiring it to host events

pub mod asset;
pub mod capabilities;
pub mod events;
pub mod hooks;
pub mod menu;
pub mod plugin;
pub mod probe;
pub mod scene;
pub mod tool;
pub mod world;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

/// Commonly used host types.
pub mod prelude {
    pub use crate::asset::{AssetKind, AssetRef};
    pub use crate::capabilities::HostCapabilities;
    pub use crate::events::{HostEvent, OnAssetCreated, OnSecondaryPress};
    pub use crate::hooks::{HookRegistrationError, HostHooksAPI, emit};
    pub use crate::menu::{ContextMenu, CycleOption, MenuAPI, MenuColor, MenuItem};
    pub use crate::plugin::{WorldPlugin, open_menu};
    pub use crate::probe::{Aim, LaserProber, Probe, Prober};
    pub use crate::scene::{SceneError, SceneGraph, SlotId, Transform};
    pub use crate::tool::{HandlerInfo, HeldReference, Side, Tool, ToolId, ToolRig, UserId};
    pub use crate::world::{Renderer, World};
}
