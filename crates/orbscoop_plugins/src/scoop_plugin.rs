//! Wires the orb policy to host events.
//!
//! [`ScoopPlugin`] subscribes the policy engine to secondary presses and the
//! auto-equip path to asset creation, and advances the deferred scheduler
//! once per frame.
//!
//! # Lifecycle
//!
//! - **`build()`** inserts the [`DeferredHookScheduler`], sharing the
//!   [`PolicyStore`] from [`ConfigPlugin`].
//! - **`ready()`** checks the host's [`HostCapabilities`] and registers the
//!   hooks. A host that cannot probe or does not signal asset creation
//!   cannot run the policy; the session refuses to start.
//! - **`update()`** runs deferred actions on [`FrameUpdate`].

use core::marker::PhantomData;
use std::sync::Arc;

use orbscoop_core::config::PolicyStore;
use orbscoop_core::equip::AutoEquip;
use orbscoop_core::policy::LifecyclePolicyEngine;
use orbscoop_core::resolver::TargetResolver;
use orbscoop_core::scheduler::DeferredHookScheduler;
use orbscoop_host::capabilities::HostCapabilities;
use orbscoop_host::events::{HostEvent, OnAssetCreated, OnSecondaryPress};
use orbscoop_host::hooks::HostHooksAPI;
use orbscoop_host::probe::Prober;
use orbscoop_host::scene::SceneGraph;
use orbscoop_host::tool::ToolRig;
use orbscoop_host::world::World;
use orbscoop_system::plugin::{Plugin, PluginId, ScheduleId};
use orbscoop_system::resource::Resources;
use orbscoop_system::session::{FrameUpdate, Session};
use tracing::{debug, warn};

use crate::config_plugin::ConfigPlugin;

/// Hook name for the secondary-press pass.
pub const SCOOP_HOOK: &str = "orbscoop::scoop";
/// Hook name for the creation signal.
pub const AUTO_EQUIP_HOOK: &str = "orbscoop::auto_equip";

/// Subscribes the orb policy to host events.
///
/// `H` is the session resource holding the host's scene and tools.
///
/// # Resources Provided
///
/// | Resource | Description |
/// |----------|-------------|
/// | [`DeferredHookScheduler`] | Deferred actions, advanced every frame |
///
/// # Dependencies
///
/// - [`ConfigPlugin`]
///
/// # Panics
///
/// `ready()` panics if the host published no [`HostHooksAPI`], no
/// [`HostCapabilities`], or capabilities missing the prober or the creation
/// signal.
pub struct ScoopPlugin<H = World> {
    _host: PhantomData<fn() -> H>,
}

impl<H> Default for ScoopPlugin<H> {
    fn default() -> Self {
        Self { _host: PhantomData }
    }
}

impl ScoopPlugin {
    /// Scoop plugin for the in-memory [`World`] host.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<H> ScoopPlugin<H>
where
    H: SceneGraph + ToolRig,
{
    /// Scoop plugin for the host resource `H`.
    #[must_use]
    pub fn for_host() -> Self {
        Self::default()
    }
}

fn required_prober(session: &Session) -> Arc<dyn Prober> {
    let Some(caps) = session.api::<HostCapabilities>() else {
        panic!("ScoopPlugin requires HostCapabilities. Add a host plugin to the session.");
    };
    match (&caps.prober, caps.creation_signal) {
        (Some(prober), true) => Arc::clone(prober),
        _ => panic!(
            "ScoopPlugin requires host capabilities that are missing: {}",
            caps.missing().join(", ")
        ),
    }
}

fn on_press<H: SceneGraph + ToolRig>(
    engine: &LifecyclePolicyEngine,
    resolver: &TargetResolver,
    resources: &Resources,
    event: &HostEvent,
) {
    let HostEvent::SecondaryPress { tool } = *event else {
        return;
    };
    let mut host = match resources.get_mut::<H>() {
        Ok(host) => host,
        Err(error) => {
            warn!(%tool, %error, "scene unavailable for secondary press");
            return;
        }
    };
    let Some(tool) = host.tool(tool) else {
        debug!(%tool, "secondary press on unknown tool");
        return;
    };
    engine.scoop(&mut *host, resolver, &tool);
}

fn on_created<H: SceneGraph + ToolRig>(auto_equip: &AutoEquip, resources: &Resources, event: &HostEvent) {
    let HostEvent::AssetCreated { container, user } = *event else {
        return;
    };
    match resources.get::<DeferredHookScheduler>() {
        Ok(scheduler) => {
            auto_equip.on_created::<H>(&scheduler, container, user);
        }
        Err(error) => warn!(%container, %error, "scheduler unavailable for created asset"),
    }
}

impl<H> Plugin for ScoopPlugin<H>
where
    H: SceneGraph + ToolRig,
{
    fn build(&self, session: &mut Session) {
        let Some(store) = session.get_resource::<PolicyStore>().map(|s| PolicyStore::clone(&s)) else {
            panic!("ScoopPlugin requires the PolicyStore resource from ConfigPlugin");
        };
        session.insert_resource(DeferredHookScheduler::new(store));
    }

    fn ready(&self, session: &mut Session) {
        let prober = required_prober(session);
        let Some(store) = session.get_resource::<PolicyStore>().map(|s| PolicyStore::clone(&s)) else {
            panic!("ScoopPlugin requires the PolicyStore resource from ConfigPlugin");
        };
        let Some(hooks) = session.api::<HostHooksAPI>() else {
            panic!("ScoopPlugin requires HostHooksAPI. Add a host plugin to the session.");
        };

        let engine = LifecyclePolicyEngine::new(store);
        let resolver = TargetResolver::new(prober);
        let auto_equip = AutoEquip::new(engine.clone());

        let registered = hooks
            .register_observer::<OnSecondaryPress, _>(SCOOP_HOOK, move |resources, event| {
                on_press::<H>(&engine, &resolver, resources, event);
            })
            .and_then(|hooks| {
                hooks.register_observer::<OnAssetCreated, _>(AUTO_EQUIP_HOOK, move |resources, event| {
                    on_created::<H>(&auto_equip, resources, event);
                })
            });
        if let Err(error) = registered {
            panic!("ScoopPlugin could not register its hooks: {error}");
        }

        debug!(host = core::any::type_name::<H>(), "scoop hooks registered");
    }

    fn update(&self, session: &mut Session, _schedule: ScheduleId) {
        if let Some(scheduler) = session.get_resource::<DeferredHookScheduler>() {
            scheduler.run_due(session.resources());
        }
    }

    fn tick_schedules(&self) -> Vec<ScheduleId> {
        vec![ScheduleId::of::<FrameUpdate>()]
    }

    fn dependencies(&self) -> Vec<PluginId> {
        vec![PluginId::of::<ConfigPlugin>()]
    }
}
