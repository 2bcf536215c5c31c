//! The orb lifecycle policy (Layer 3).
//!
//! Decides what happens to the orbs a tool carries when it is about to pick
//! up a new asset, and equips freshly created assets onto the creator's
//! tool.
//!
//! - [`config`] - the option set and the shared [`PolicyStore`](config::PolicyStore)
//! - [`registry`] - enumerating and classifying a tool's orbs
//! - [`resolver`] - which asset a tool is about to apply
//! - [`policy`] - destroy or drop, per orb
//! - [`scheduler`] - one-shot actions deferred to a later frame
//! - [`equip`] - deferred auto-equip of created assets
//!
//! Everything here is host-agnostic: the scene is reached only through
//! [`orbscoop_host::scene::SceneGraph`] and [`orbscoop_host::tool::ToolRig`].
//!
//! # Example
//!
//! ```
//! use orbscoop_core::prelude::*;
//! use orbscoop_host::prelude::*;
//!
//! let mut world = World::new();
//! let user = world.add_user(Side::Right).unwrap();
//! let space = world.user_space(user).unwrap();
//! let tool_id = world.add_tool(AssetKind::Material, space).unwrap();
//! let tool = world.tool(tool_id).unwrap();
//! let brick = world.spawn_asset_container(tool.orb_slot, AssetRef::material("Brick")).unwrap();
//!
//! let engine = LifecyclePolicyEngine::new(PolicyStore::default());
//! let glass = AssetRef::material("Glass");
//! let outcome = engine.apply_policy(&mut world, &tool, Some(&glass));
//!
//! // The default mode drops orbs that still reference an asset
//! assert_eq!(outcome.actions(), &[OrbAction::Dropped(brick)]);
//! assert_eq!(world.parent(brick), Some(space));
//! ```

pub mod config;
pub mod equip;
pub mod policy;
pub mod registry;
pub mod resolver;
pub mod scheduler;

/// Commonly used policy types.
pub mod prelude {
    pub use crate::config::{ConfigError, PolicyMode, PolicyStore, ScoopConfig};
    pub use crate::equip::AutoEquip;
    pub use crate::policy::{Disposition, LifecyclePolicyEngine, OrbAction, PolicyOutcome, SkipReason};
    pub use crate::registry::{Orb, OrbKind, OrbRegistry};
    pub use crate::resolver::TargetResolver;
    pub use crate::scheduler::{DeferredAction, DeferredHookScheduler};
}
