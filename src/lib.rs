//! Orb lifecycle policies and auto-equip for material and mesh tools.
//!
//! Re-exports the orbscoop crates:
//!
//! - [`orbscoop_system`] (Layer 1): plugins, resources, sessions
//! - [`orbscoop_host`] (Layer 2): host contracts and the in-memory world
//! - [`orbscoop_core`] (Layer 3): the policy engine, scheduler and auto-equip
//! - [`orbscoop_plugins`] (Layer 3): plugins wiring it all into a session
//!
//! # Example
//!
//! ```
//! use orbscoop::prelude::*;
//!
//! let mut world = World::new();
//! let user = world.add_user(Side::Right).unwrap();
//! let space = world.user_space(user).unwrap();
//! let tool = world.add_tool(AssetKind::Material, space).unwrap();
//! world.equip(user, Side::Right, Some(tool));
//! let orb_slot = world.tool(tool).unwrap().orb_slot;
//! world.spawn_asset_container(orb_slot, AssetRef::material("Brick")).unwrap();
//! world.set_skybox(AssetRef::material("Sky"));
//!
//! let mut session = Session::new();
//! session.add_plugins(WorldPlugin::with_world(world));
//! session.add_plugins(MinimalPlugins.build());
//! session.finish();
//!
//! // The laser hits nothing, so the tool targets the skybox and the
//! // default mode drops the Brick orb into the user's space
//! emit(&session, HostEvent::SecondaryPress { tool });
//! assert!(session.get_resource::<World>().unwrap().children(orb_slot).is_empty());
//! ```

/// Layer 1: plugin runtime.
pub use orbscoop_system;

/// Layer 2: host contracts.
pub use orbscoop_host;

/// Layer 3: orb policy.
pub use orbscoop_core;

/// Layer 3: session plugins.
pub use orbscoop_plugins;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use orbscoop_core::prelude::*;
    pub use orbscoop_host::prelude::*;
    pub use orbscoop_plugins::{
        ConfigPlugin, DefaultPlugins, MinimalPlugins, ModInfo, ModInfoPlugin, ScoopMenuPlugin,
        ScoopPlugin, TracingPlugin,
    };
    pub use orbscoop_system::prelude::*;
}
