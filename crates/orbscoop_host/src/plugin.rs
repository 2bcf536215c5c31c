//! Plugin that runs the reference host inside a session.

use std::sync::Arc;

use parking_lot::Mutex;
use orbscoop_system::plugin::Plugin;
use orbscoop_system::session::Session;

use crate::capabilities::HostCapabilities;
use crate::hooks::HostHooksAPI;
use crate::menu::{ContextMenu, MenuAPI};
use crate::probe::{LaserProber, Prober};
use crate::tool::{ToolId, ToolRig};
use crate::world::World;

/// Hosts a [`World`] in the session.
///
/// Inserts the world as a resource and publishes [`HostHooksAPI`],
/// [`MenuAPI`] and [`HostCapabilities`] (a [`LaserProber`] and the creation
/// signal).
///
/// # Example
///
/// ```
/// use orbscoop_host::plugin::WorldPlugin;
/// use orbscoop_host::probe::Aim;
/// use orbscoop_host::tool::ToolId;
/// use orbscoop_host::world::World;
/// use orbscoop_system::session::Session;
///
/// let host = WorldPlugin::new();
/// let laser = host.prober();
///
/// let mut session = Session::new();
/// session.add_plugins(host);
/// session.finish();
///
/// // The prober handle stays usable after the plugin moved into the session
/// laser.aim(ToolId::from_raw(0), Aim::Nothing);
/// assert!(session.contains_resource::<World>());
/// ```
pub struct WorldPlugin {
    world: Mutex<Option<World>>,
    prober: Arc<LaserProber>,
    probing: bool,
    creation_signal: bool,
}

impl Default for WorldPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl WorldPlugin {
    /// Hosts an empty world.
    #[must_use]
    pub fn new() -> Self {
        Self {
            world: Mutex::new(None),
            prober: Arc::new(LaserProber::new()),
            probing: true,
            creation_signal: true,
        }
    }

    /// Hosts a pre-populated world.
    #[must_use]
    pub fn with_world(world: World) -> Self {
        Self {
            world: Mutex::new(Some(world)),
            ..Self::new()
        }
    }

    /// Handle to the laser prober, for aiming tools.
    #[must_use]
    pub fn prober(&self) -> Arc<LaserProber> {
        Arc::clone(&self.prober)
    }

    /// Does not advertise a prober.
    #[must_use]
    pub fn without_probing(mut self) -> Self {
        self.probing = false;
        self
    }

    /// Does not advertise the creation signal.
    #[must_use]
    pub fn without_creation_signal(mut self) -> Self {
        self.creation_signal = false;
        self
    }
}

impl Plugin for WorldPlugin {
    fn build(&self, session: &mut Session) {
        let world = self.world.lock().take().unwrap_or_default();
        session.insert_resource(world);

        if !session.contains_api::<HostHooksAPI>() {
            session.insert_api(HostHooksAPI::new());
        }
        if !session.contains_api::<MenuAPI>() {
            session.insert_api(MenuAPI::new());
        }

        let prober: Option<Arc<dyn Prober>> = if self.probing {
            Some(self.prober())
        } else {
            None
        };
        session.insert_api(HostCapabilities {
            prober,
            creation_signal: self.creation_signal,
        });
    }
}

/// Opens the context menu of a tool in the hosted world.
///
/// Returns `None` if the session has no world, no menu registry, or no such
/// tool.
#[must_use]
pub fn open_menu(session: &Session, tool: ToolId) -> Option<ContextMenu> {
    let tool = session.get_resource::<World>()?.tool(tool)?;
    let menus = session.api::<MenuAPI>()?;
    Some(menus.open(session.resources(), &tool))
}
