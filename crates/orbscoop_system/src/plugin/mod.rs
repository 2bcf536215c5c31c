//! Plugin system for extensible session functionality.
//!
//! Everything a session does is delivered by plugins: the host adapter that
//! owns the scene, the tracing setup, the configuration layer and the orb
//! policy itself. The [`Session`] only orders them and calls their hooks.
//!
//! # Example
//!
//! ```
//! use orbscoop_system::plugin::{Plugin, PluginId};
//! use orbscoop_system::session::Session;
//!
//! struct HostPlugin;
//! impl Plugin for HostPlugin {
//!     fn build(&self, _session: &mut Session) {}
//! }
//!
//! struct Greeting(String);
//!
//! struct GreeterPlugin {
//!     text: String,
//! }
//!
//! impl Plugin for GreeterPlugin {
//!     fn build(&self, session: &mut Session) {
//!         session.insert_resource(Greeting(self.text.clone()));
//!     }
//!
//!     fn dependencies(&self) -> Vec<PluginId> {
//!         vec![PluginId::of::<HostPlugin>()]
//!     }
//! }
//!
//! let mut session = Session::new();
//! session
//!     .add_plugins(HostPlugin)
//!     .add_plugins(GreeterPlugin { text: "hi".into() });
//! session.finish();
//! ```

mod schedule;

pub use schedule::{IntoScheduleIds, Schedule, ScheduleId};

use core::any::TypeId;

use crate::session::Session;

// ─────────────────────────────────────────────────────────────────────────────
// PluginId
// ─────────────────────────────────────────────────────────────────────────────

/// Unique identifier for a plugin type.
///
/// Used for dependency resolution and duplicate detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PluginId {
    type_id: TypeId,
    type_name: &'static str,
}

impl PluginId {
    /// Creates a `PluginId` for the given plugin type.
    #[must_use]
    pub fn of<P: Plugin>() -> Self {
        Self {
            type_id: TypeId::of::<P>(),
            type_name: core::any::type_name::<P>(),
        }
    }

    /// Returns the underlying `TypeId`.
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns the type name for debugging.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Plugin Trait
// ─────────────────────────────────────────────────────────────────────────────

/// A unit of session functionality.
///
/// Plugins follow a strict lifecycle managed by the session:
///
/// 1. **Build Phase** - `build()` is called in dependency order
/// 2. **Ready Phase** - `ready()` is called in dependency order
/// 3. **Tick Phase** - `update()` is called for each schedule the plugin
///    subscribed to, e.g. [`FrameUpdate`](crate::session::FrameUpdate)
/// 4. **Cleanup Phase** - `cleanup()` is called in reverse dependency order
///
/// # Example
///
/// ```ignore
/// impl Plugin for ScoopPlugin {
///     fn build(&self, session: &mut Session) {
///         session.insert_resource(DeferredHookScheduler::new(store));
///     }
///
///     fn ready(&self, session: &mut Session) {
///         let caps = session.api::<HostCapabilities>()
///             .expect("ScoopPlugin requires HostCapabilities");
///     }
///
///     fn tick_schedules(&self) -> Vec<ScheduleId> {
///         vec![ScheduleId::of::<FrameUpdate>()]
///     }
///
///     fn update(&self, session: &mut Session, _schedule: ScheduleId) {
///         // run deferred actions that are due this frame
///     }
/// }
/// ```
pub trait Plugin: Send + Sync + 'static {
    /// Configures the session. Called once when the session is finished.
    ///
    /// Register resources and APIs here. Keep it lightweight; validation
    /// that depends on other plugins belongs in `ready()`.
    fn build(&self, session: &mut Session);

    /// Called after every plugin has been built.
    ///
    /// This is where a plugin checks that the capabilities it needs were
    /// published by someone else, and registers hooks on their APIs.
    fn ready(&self, _session: &mut Session) {}

    /// Called when a schedule this plugin registered for is triggered.
    ///
    /// Only called if the plugin declared interest via
    /// [`tick_schedules()`](Self::tick_schedules).
    fn update(&self, _session: &mut Session, _schedule: ScheduleId) {}

    /// Called when the session is shutting down, in **reverse** dependency order.
    fn cleanup(&self, _session: &mut Session) {}

    /// Declares which schedules this plugin wants to receive updates on.
    fn tick_schedules(&self) -> Vec<ScheduleId> {
        Vec::new()
    }

    /// Returns the plugin's name for debugging and error messages.
    fn name(&self) -> &str {
        core::any::type_name::<Self>()
    }

    /// Declares plugins that must be added before this one.
    ///
    /// The session panics in `finish()` if a dependency is missing.
    fn dependencies(&self) -> Vec<PluginId> {
        Vec::new()
    }

    /// Returns true if this plugin can only be added once.
    fn is_unique(&self) -> bool {
        true
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Plugins Trait (for add_plugins polymorphism)
// ─────────────────────────────────────────────────────────────────────────────

/// Types that can be added to a session as plugins: a single [`Plugin`] or a
/// [`PluginGroupBuilder`].
pub trait Plugins {
    /// Adds these plugins to the session.
    fn add_to_session(self, session: &mut Session);
}

impl<P: Plugin> Plugins for P {
    fn add_to_session(self, session: &mut Session) {
        // Capture the id while we still have the concrete type
        let id = PluginId::of::<P>();
        session.add_plugin_boxed(id, Box::new(self));
    }
}

impl Plugins for PluginGroupBuilder {
    fn add_to_session(self, session: &mut Session) {
        for boxed in self.plugins {
            session.add_plugin_boxed(boxed.id, boxed.plugin);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// PluginGroup Trait
// ─────────────────────────────────────────────────────────────────────────────

/// A collection of plugins that can be added together.
///
/// ```ignore
/// session.add_plugins(
///     DefaultPlugins
///         .build()
///         .disable::<TracingPlugin>()
/// );
/// ```
pub trait PluginGroup {
    /// Returns the plugins in this group.
    fn build(self) -> PluginGroupBuilder;
}

/// A boxed plugin with its captured [`PluginId`].
pub(crate) struct BoxedPlugin {
    pub(crate) id: PluginId,
    pub(crate) plugin: Box<dyn Plugin>,
}

#[cfg(test)]
impl BoxedPlugin {
    fn name(&self) -> &str {
        self.plugin.name()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// PluginGroupBuilder
// ─────────────────────────────────────────────────────────────────────────────

/// Builder for customizing plugin groups.
#[derive(Default)]
pub struct PluginGroupBuilder {
    pub(crate) plugins: Vec<BoxedPlugin>,
}

impl PluginGroupBuilder {
    /// Creates a new empty plugin group builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            plugins: Vec::new(),
        }
    }

    /// Adds a plugin to the end of the group.
    #[must_use]
    #[expect(
        clippy::should_implement_trait,
        reason = "This is a builder method, not std::ops::Add"
    )]
    pub fn add<P: Plugin>(mut self, plugin: P) -> Self {
        self.plugins.push(BoxedPlugin {
            id: PluginId::of::<P>(),
            plugin: Box::new(plugin),
        });
        self
    }

    /// Adds a plugin after `Target`, or at the end if `Target` is absent.
    #[must_use]
    pub fn add_after<P: Plugin, Target: Plugin>(mut self, plugin: P) -> Self {
        let target = PluginId::of::<Target>();
        let position = self
            .plugins
            .iter()
            .position(|p| p.id == target)
            .map_or(self.plugins.len(), |i| i + 1);
        self.plugins.insert(
            position,
            BoxedPlugin {
                id: PluginId::of::<P>(),
                plugin: Box::new(plugin),
            },
        );
        self
    }

    /// Removes a plugin from the group by type. No-op if absent.
    #[must_use]
    pub fn disable<P: Plugin>(mut self) -> Self {
        let id = PluginId::of::<P>();
        self.plugins.retain(|p| p.id != id);
        self
    }

    /// Replaces the plugin of type `P` in place, or appends it if absent.
    ///
    /// Handy for swapping a configured instance into a default group without
    /// changing the group's ordering.
    #[must_use]
    pub fn set<P: Plugin>(mut self, plugin: P) -> Self {
        let id = PluginId::of::<P>();
        let boxed = BoxedPlugin {
            id,
            plugin: Box::new(plugin),
        };
        match self.plugins.iter().position(|p| p.id == id) {
            Some(index) => self.plugins[index] = boxed,
            None => self.plugins.push(boxed),
        }
        self
    }

    /// Returns the number of plugins in the group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Returns true if the group contains no plugins.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct HostStub;
    impl Plugin for HostStub {
        fn build(&self, _session: &mut Session) {}
    }

    struct ScoopStub;
    impl Plugin for ScoopStub {
        fn build(&self, _session: &mut Session) {}
        fn dependencies(&self) -> Vec<PluginId> {
            vec![PluginId::of::<HostStub>()]
        }
    }

    struct MenuStub {
        label: &'static str,
    }
    impl Plugin for MenuStub {
        fn build(&self, _session: &mut Session) {}
        fn name(&self) -> &str {
            self.label
        }
    }

    #[test]
    fn plugin_id_equality() {
        assert_eq!(PluginId::of::<HostStub>(), PluginId::of::<HostStub>());
        assert_ne!(PluginId::of::<HostStub>(), PluginId::of::<ScoopStub>());
        assert_eq!(
            PluginId::of::<HostStub>().type_id(),
            TypeId::of::<HostStub>()
        );
    }

    #[test]
    fn plugin_defaults() {
        let plugin = HostStub;
        assert!(plugin.name().contains("HostStub"));
        assert!(plugin.is_unique());
        assert!(plugin.dependencies().is_empty());
        assert!(plugin.tick_schedules().is_empty());
    }

    #[test]
    fn plugin_with_dependencies() {
        let deps = ScoopStub.dependencies();
        assert_eq!(deps, vec![PluginId::of::<HostStub>()]);
    }

    #[test]
    fn group_add_and_disable() {
        let builder = PluginGroupBuilder::new()
            .add(HostStub)
            .add(ScoopStub)
            .disable::<HostStub>();

        assert_eq!(builder.len(), 1);
        assert!(builder.plugins[0].name().contains("ScoopStub"));
    }

    #[test]
    fn group_add_after_missing_target_appends() {
        let builder = PluginGroupBuilder::new()
            .add(HostStub)
            .add_after::<_, ScoopStub>(MenuStub { label: "menu" });

        assert_eq!(builder.len(), 2);
        assert_eq!(builder.plugins[1].name(), "menu");
    }

    #[test]
    fn group_set_replaces_in_place() {
        let builder = PluginGroupBuilder::new()
            .add(MenuStub { label: "first" })
            .add(HostStub)
            .set(MenuStub { label: "second" });

        assert_eq!(builder.len(), 2);
        assert_eq!(builder.plugins[0].name(), "second");
        assert!(builder.plugins[1].name().contains("HostStub"));
    }

    #[test]
    fn group_empty() {
        let builder = PluginGroupBuilder::new();
        assert!(builder.is_empty());
        assert_eq!(builder.len(), 0);
    }
}
