//! Session runtime for plugin orchestration.
//!
//! A [`Session`] is one user's view of a running world: it owns the plugins,
//! the shared [`Resources`] (scene, configuration, scheduler) and the
//! capability [`API`]s the host publishes. The host drives it by calling
//! [`Session::update()`] once per frame.
//!
//! # Lifecycle
//!
//! 1. **Dependency Resolution** - Validate and topologically sort plugins
//! 2. **Build Phase** - Call `plugin.build()` in dependency order
//! 3. **Ready Phase** - Call `plugin.ready()` in dependency order
//! 4. **Frame Loop** - Each `update()` advances the frame counter and ticks
//!    [`FrameUpdate`]
//! 5. **Cleanup Phase** - Call `plugin.cleanup()` in reverse order
//!
//! # Example
//!
//! ```
//! use orbscoop_system::plugin::{Plugin, ScheduleId};
//! use orbscoop_system::session::{FrameUpdate, Session};
//!
//! struct FramesSeen(u64);
//!
//! struct CounterPlugin;
//!
//! impl Plugin for CounterPlugin {
//!     fn build(&self, session: &mut Session) {
//!         session.insert_resource(FramesSeen(0));
//!     }
//!
//!     fn tick_schedules(&self) -> Vec<ScheduleId> {
//!         vec![ScheduleId::of::<FrameUpdate>()]
//!     }
//!
//!     fn update(&self, session: &mut Session, _schedule: ScheduleId) {
//!         if let Some(mut seen) = session.get_resource_mut::<FramesSeen>() {
//!             seen.0 += 1;
//!         }
//!     }
//! }
//!
//! let mut session = Session::new();
//! session.add_plugins(CounterPlugin);
//! session.finish();
//!
//! session.update();
//! session.update();
//! assert_eq!(session.frame(), 2);
//! assert_eq!(session.get_resource::<FramesSeen>().unwrap().0, 2);
//! ```

use crate::api::API;
use crate::plugin::{Plugin, PluginId, Plugins, Schedule, ScheduleId};
use crate::resource::{Resource, ResourceRef, ResourceRefMut, Resources};
use core::any::TypeId;
use hashbrown::{HashMap, HashSet};
use std::sync::Arc;

/// Schedule ticked once per host frame by [`Session::update()`].
pub struct FrameUpdate;
impl Schedule for FrameUpdate {}

type BoxedAPI = Box<dyn core::any::Any + Send + Sync>;

/// Build state of the session: `NotStarted` → `Building` → `Built`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum BuildState {
    #[default]
    NotStarted,
    Building,
    Built,
}

/// The runtime that orchestrates plugins, resources and frame ticks.
pub struct Session {
    /// Shared state read and written by hooks and deferred actions.
    resources: Resources,

    /// Capability registries published by plugins.
    apis: HashMap<TypeId, BoxedAPI>,

    /// Plugins pending build (not yet sorted).
    pending_plugins: Vec<PluginEntry>,

    /// Plugins that have been built, in dependency order.
    built_plugins: Vec<PluginEntry>,

    /// Ids of every plugin added so far (duplicate detection).
    plugin_ids: HashSet<PluginId>,

    /// Maps schedule → indices into `built_plugins`, in dependency order.
    schedule_registry: HashMap<ScheduleId, Vec<usize>>,

    build_state: BuildState,

    /// Number of completed `update()` calls.
    frame: u64,
}

struct PluginEntry {
    id: PluginId,
    plugin: Arc<dyn Plugin>,
    name: String,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Creates a new empty session.
    #[must_use]
    pub fn new() -> Self {
        Self {
            resources: Resources::new(),
            apis: HashMap::new(),
            pending_plugins: Vec::new(),
            built_plugins: Vec::new(),
            plugin_ids: HashSet::new(),
            schedule_registry: HashMap::new(),
            build_state: BuildState::NotStarted,
            frame: 0,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Plugin Management
    // ─────────────────────────────────────────────────────────────────────────

    /// Adds one plugin or a plugin group to the session.
    ///
    /// # Panics
    ///
    /// Panics if a unique plugin is added twice.
    pub fn add_plugins<P: Plugins>(&mut self, plugins: P) -> &mut Self {
        plugins.add_to_session(self);
        self
    }

    pub(crate) fn add_plugin_boxed(&mut self, id: PluginId, plugin: Box<dyn Plugin>) {
        let name = plugin.name().to_string();

        if plugin.is_unique() && self.plugin_ids.contains(&id) {
            panic!(
                "Plugin '{}' is unique and was already added.\n\
                 If you intended to add this plugin multiple times, \
                 set `is_unique()` to return `false`.",
                name
            );
        }
        self.plugin_ids.insert(id);

        let entry = PluginEntry {
            id,
            plugin: Arc::from(plugin),
            name,
        };

        // Plugins added by another plugin's build() are built right away
        if self.build_state == BuildState::Building {
            entry.plugin.build(self);
            self.built_plugins.push(entry);
        } else {
            self.pending_plugins.push(entry);
        }
    }

    /// Returns true if a plugin of the given type has been added.
    #[must_use]
    pub fn has_plugin<P: Plugin>(&self) -> bool {
        self.plugin_ids.contains(&PluginId::of::<P>())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Resource Access
    // ─────────────────────────────────────────────────────────────────────────

    /// Inserts a resource, returning the previous value of that type if any.
    pub fn insert_resource<R: Resource>(&mut self, resource: R) -> Option<R> {
        self.resources.insert(resource)
    }

    /// Returns true if a resource of type `R` exists.
    #[must_use]
    pub fn contains_resource<R: Resource>(&self) -> bool {
        self.resources.contains::<R>()
    }

    /// Gets shared access to a resource.
    ///
    /// Returns `None` if the resource doesn't exist or is mutably borrowed.
    #[must_use]
    pub fn get_resource<R: Resource>(&self) -> Option<ResourceRef<'_, R>> {
        self.resources.get::<R>().ok()
    }

    /// Gets exclusive access to a resource.
    ///
    /// Returns `None` if the resource doesn't exist or is already borrowed.
    #[must_use]
    pub fn get_resource_mut<R: Resource>(&self) -> Option<ResourceRefMut<'_, R>> {
        self.resources.get_mut::<R>().ok()
    }

    /// Removes a resource from the session and returns it.
    pub fn remove_resource<R: Resource>(&mut self) -> Option<R> {
        self.resources.remove::<R>()
    }

    /// Returns the underlying resources container.
    #[must_use]
    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    // ─────────────────────────────────────────────────────────────────────────
    // API Access
    // ─────────────────────────────────────────────────────────────────────────

    /// Inserts an API, returning the previous value of that type if any.
    pub fn insert_api<A: API>(&mut self, api: A) -> Option<A> {
        let boxed: BoxedAPI = Box::new(api);
        self.apis
            .insert(TypeId::of::<A>(), boxed)
            .and_then(|old| old.downcast::<A>().ok())
            .map(|b| *b)
    }

    /// Gets a reference to an API, or `None` if no plugin published it.
    #[must_use]
    pub fn api<A: API>(&self) -> Option<&A> {
        self.apis
            .get(&TypeId::of::<A>())
            .and_then(|boxed| boxed.downcast_ref::<A>())
    }

    /// Returns true if an API of type `A` exists.
    #[must_use]
    pub fn contains_api<A: API>(&self) -> bool {
        self.apis.contains_key(&TypeId::of::<A>())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Frames and Ticks
    // ─────────────────────────────────────────────────────────────────────────

    /// Advances the session by one host frame.
    ///
    /// Increments [`frame()`](Self::frame) and ticks [`FrameUpdate`].
    ///
    /// # Panics
    ///
    /// Panics if the session has not been finished.
    pub fn update(&mut self) {
        assert!(
            self.is_built(),
            "Session::update() called before Session::finish()"
        );
        self.frame += 1;
        self.tick::<FrameUpdate>();
    }

    /// Number of frames completed so far.
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Triggers a tick for the given schedule type.
    ///
    /// Only plugins that declared interest in this schedule have their
    /// [`Plugin::update()`] called, in dependency order.
    pub fn tick<S: 'static>(&mut self) {
        self.tick_schedule(ScheduleId::of::<S>());
    }

    /// Non-generic version of [`tick()`](Self::tick).
    pub fn tick_schedule(&mut self, schedule: ScheduleId) {
        let Some(indices) = self.schedule_registry.get(&schedule).cloned() else {
            return;
        };

        for idx in indices {
            let plugin = Arc::clone(&self.built_plugins[idx].plugin);
            plugin.update(self, schedule);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lifecycle Methods
    // ─────────────────────────────────────────────────────────────────────────

    /// Builds all plugins and prepares the session for its first frame.
    ///
    /// # Panics
    ///
    /// - If a plugin's dependency is not satisfied
    /// - If there is a circular dependency between plugins
    /// - If called more than once
    /// - If a plugin's `ready()` panics on a missing capability
    pub fn finish(&mut self) {
        if self.build_state != BuildState::NotStarted {
            panic!("Session::finish() was already called. Cannot build twice.");
        }

        let sorted_plugins = self.sort_plugins_by_dependencies();

        self.build_state = BuildState::Building;
        for entry in sorted_plugins {
            entry.plugin.build(self);
            self.built_plugins.push(entry);
        }

        for i in 0..self.built_plugins.len() {
            let plugin = Arc::clone(&self.built_plugins[i].plugin);
            plugin.ready(self);
        }

        self.build_schedule_registry();
        self.build_state = BuildState::Built;
    }

    fn build_schedule_registry(&mut self) {
        self.schedule_registry.clear();
        for (idx, entry) in self.built_plugins.iter().enumerate() {
            for schedule in entry.plugin.tick_schedules() {
                self.schedule_registry
                    .entry(schedule)
                    .or_default()
                    .push(idx);
            }
        }
    }

    /// Returns whether `finish()` has completed.
    #[must_use]
    pub fn is_built(&self) -> bool {
        self.build_state == BuildState::Built
    }

    /// Cleans up all plugins in reverse dependency order.
    pub fn cleanup(&mut self) {
        for i in (0..self.built_plugins.len()).rev() {
            let plugin = Arc::clone(&self.built_plugins[i].plugin);
            plugin.cleanup(self);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal: Dependency Resolution
    // ─────────────────────────────────────────────────────────────────────────

    /// Sorts pending plugins by dependencies (Kahn's algorithm).
    ///
    /// Plugins with no ordering constraint between them keep the order in
    /// which they were added.
    fn sort_plugins_by_dependencies(&mut self) -> Vec<PluginEntry> {
        let pending = core::mem::take(&mut self.pending_plugins);
        let n = pending.len();
        if n == 0 {
            return Vec::new();
        }

        let mut in_degree = vec![0usize; n];
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); n];
        {
            let id_to_index: HashMap<PluginId, usize> = pending
                .iter()
                .enumerate()
                .map(|(i, entry)| (entry.id, i))
                .collect();

            for (i, entry) in pending.iter().enumerate() {
                for dep_id in entry.plugin.dependencies() {
                    let dep_name = dep_id.type_name();
                    if let Some(&dep_idx) = id_to_index.get(&dep_id) {
                        dependents[dep_idx].push(i);
                        in_degree[i] += 1;
                    } else if !self.built_plugins.iter().any(|p| p.id == dep_id) {
                        panic!(
                            "Plugin '{}' requires '{}' which was not added.\n\
                             Add {} before {}, or use a plugin group that includes it.",
                            entry.name, dep_name, dep_name, entry.name
                        );
                    }
                }
            }
        }

        // Always take the lowest ready index so insertion order breaks ties
        let mut ready: Vec<usize> = (0..n).filter(|&i| in_degree[i] == 0).collect();
        let mut sorted_indices: Vec<usize> = Vec::with_capacity(n);

        while !ready.is_empty() {
            ready.sort_unstable_by(|a, b| b.cmp(a));
            let Some(idx) = ready.pop() else { break };
            sorted_indices.push(idx);

            for &dependent_idx in &dependents[idx] {
                in_degree[dependent_idx] -= 1;
                if in_degree[dependent_idx] == 0 {
                    ready.push(dependent_idx);
                }
            }
        }

        if sorted_indices.len() != n {
            let in_cycle: Vec<&str> = in_degree
                .iter()
                .enumerate()
                .filter(|(_, deg)| **deg > 0)
                .map(|(i, _)| pending[i].name.as_str())
                .collect();

            panic!(
                "Circular dependency detected among plugins: {:?}\n\
                 Break the cycle by extracting shared functionality into a separate plugin.",
                in_cycle
            );
        }

        let mut slots: Vec<Option<PluginEntry>> = pending.into_iter().map(Some).collect();
        sorted_indices
            .into_iter()
            .filter_map(|idx| slots[idx].take())
            .collect()
    }
}
