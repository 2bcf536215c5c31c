//! Mod metadata plugin and resource.
//!
//! Provides [`ModInfoPlugin`] which registers the mod's identity as a
//! resource. Other plugins, such as the tracing plugin, read it when they
//! announce themselves.
//!
//! ```
//! use orbscoop_plugins::{ModInfo, ModInfoPlugin};
//! use orbscoop_system::session::Session;
//!
//! let mut session = Session::new();
//! session.add_plugins(ModInfoPlugin);
//! session.finish();
//!
//! let info = session.get_resource::<ModInfo>().unwrap();
//! assert_eq!(info.name, "OrbCartridgeAutoScoop");
//! ```

use orbscoop_system::plugin::Plugin;
use orbscoop_system::session::Session;
use serde::Serialize;

/// Identity of the mod as the host's mod loader lists it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModInfo {
    /// Display name.
    pub name: &'static str,
    /// Author handle.
    pub author: &'static str,
    /// Release version.
    pub version: &'static str,
    /// Project page.
    pub link: &'static str,
}

impl Default for ModInfo {
    fn default() -> Self {
        Self {
            name: "OrbCartridgeAutoScoop",
            author: "badhaloninja",
            version: "2.1.0",
            link: "https://github.com/badhaloninja/OrbCartridgeAutoScoop",
        }
    }
}

/// Plugin that provides mod metadata.
///
/// # Resources Provided
///
/// | Resource | Description |
/// |----------|-------------|
/// | [`ModInfo`] | Mod name, author, version and link |
///
/// # Dependencies
///
/// None.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModInfoPlugin;

impl Plugin for ModInfoPlugin {
    fn build(&self, session: &mut Session) {
        session.insert_resource(ModInfo::default());
    }
}
