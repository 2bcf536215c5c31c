//! Plugins wiring the orb policy into a session.
//!
//! - [`ModInfoPlugin`] - mod name, author and version
//! - [`TracingPlugin`] - logging via the `tracing` crate
//! - [`ConfigPlugin`] - the shared [`PolicyStore`](orbscoop_core::config::PolicyStore),
//!   optionally backed by a JSON file
//! - [`ScoopPlugin`] - secondary-press and creation hooks, deferred actions
//! - [`ScoopMenuPlugin`] - the Scoop Mode control in tool menus
//! - [`DefaultPlugins`] - all of the above
//!
//! A host plugin, such as [`orbscoop_host::plugin::WorldPlugin`], must be
//! added alongside them.
//!
//! # Example
//!
//! ```
//! use orbscoop_host::plugin::WorldPlugin;
//! use orbscoop_plugins::MinimalPlugins;
//! use orbscoop_system::plugin::PluginGroup;
//! use orbscoop_system::session::Session;
//!
//! let mut session = Session::new();
//! session.add_plugins(WorldPlugin::new());
//! session.add_plugins(MinimalPlugins.build());
//! session.finish();
//! session.update();
//! ```

mod config_plugin;
mod menu_plugin;
mod mod_info;
mod scoop_plugin;
mod tracing_plugin;

pub use config_plugin::{ConfigPlugin, PersistenceError, load_config, save_config};
pub use menu_plugin::{MENU_CONTRIBUTOR, SCOOP_MODE_LABEL, ScoopMenuPlugin, mode_options};
pub use mod_info::{ModInfo, ModInfoPlugin};
pub use scoop_plugin::{AUTO_EQUIP_HOOK, SCOOP_HOOK, ScoopPlugin};
pub use tracing_plugin::{TRACE_HOOK, TracingConfig, TracingFormat, TracingPlugin};

use orbscoop_system::plugin::{PluginGroup, PluginGroupBuilder};

/// Every orbscoop plugin, for the in-memory world host.
///
/// ```ignore
/// session.add_plugins(
///     DefaultPlugins
///         .build()
///         .set(ConfigPlugin::from_file("orbscoop.json"))
///         .disable::<TracingPlugin>(),
/// );
/// ```
pub struct DefaultPlugins;

impl PluginGroup for DefaultPlugins {
    fn build(self) -> PluginGroupBuilder {
        PluginGroupBuilder::new()
            .add(ModInfoPlugin)
            .add(TracingPlugin::default())
            .add(ConfigPlugin::new())
            .add(ScoopPlugin::new())
            .add(ScoopMenuPlugin)
    }
}

/// [`DefaultPlugins`] without tracing, for tests and hosts that install
/// their own subscriber.
pub struct MinimalPlugins;

impl PluginGroup for MinimalPlugins {
    fn build(self) -> PluginGroupBuilder {
        PluginGroupBuilder::new()
            .add(ModInfoPlugin)
            .add(ConfigPlugin::new())
            .add(ScoopPlugin::new())
            .add(ScoopMenuPlugin)
    }
}
