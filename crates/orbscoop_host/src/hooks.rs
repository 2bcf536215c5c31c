//! Hook registration API for host events.
//!
//! The [`HostHooksAPI`] is how plugins attach behavior to host interactions
//! without patching the host. Plugins register observers during `ready()`;
//! the host calls [`emit`] when something happens.
//!
//! # Multi-Schedule Registration
//!
//! ```ignore
//! hooks.register_observer::<(OnSecondaryPress, OnAssetCreated), _>(
//!     "audit",
//!     |_resources, event| tracing::debug!(?event, "host event"),
//! )?;
//! ```

use std::sync::Arc;

use hashbrown::HashMap;
use parking_lot::RwLock;
use orbscoop_system::api::API;
use orbscoop_system::plugin::{IntoScheduleIds, ScheduleId};
use orbscoop_system::resource::Resources;
use orbscoop_system::session::Session;

use crate::events::HostEvent;

type HookFn = dyn Fn(&Resources, &HostEvent) + Send + Sync;

/// Type-erased hook receiving the session resources and the event.
pub struct BoxedHook {
    handler: Box<HookFn>,
}

impl BoxedHook {
    /// Wraps a hook function.
    #[must_use]
    pub fn new(handler: impl Fn(&Resources, &HostEvent) + Send + Sync + 'static) -> Self {
        Self {
            handler: Box::new(handler),
        }
    }

    /// Invokes the hook.
    pub fn invoke(&self, resources: &Resources, event: &HostEvent) {
        (self.handler)(resources, event);
    }
}

/// Errors that can occur during hook registration.
#[derive(Debug, Clone, thiserror::Error)]
pub enum HookRegistrationError {
    /// A hook with this name already exists on the schedule.
    #[error("hook '{name}' already registered for schedule '{}'", .schedule.type_name())]
    DuplicateName {
        /// The schedule where the duplicate was found.
        schedule: ScheduleId,
        /// The duplicate hook name.
        name: String,
    },
}

struct HookEntry {
    name: String,
    hook: BoxedHook,
}

/// Registry of host event hooks, keyed by schedule.
#[derive(Default)]
pub struct HostHooksAPI {
    hooks: RwLock<HashMap<ScheduleId, Vec<HookEntry>>>,
}

impl API for HostHooksAPI {}

impl HostHooksAPI {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an observer for one or more schedules.
    ///
    /// When `S` is a tuple, the hook is stored once per schedule under the
    /// name `"{name}@{schedule}"`.
    ///
    /// # Errors
    ///
    /// Returns [`HookRegistrationError::DuplicateName`] if a hook with the
    /// same name is already registered on one of the schedules. Schedules
    /// before the failing one keep their registration.
    pub fn register_observer<S, F>(
        &self,
        name: impl Into<String>,
        hook: F,
    ) -> Result<&Self, HookRegistrationError>
    where
        S: IntoScheduleIds,
        F: Fn(&Resources, &HostEvent) + Send + Sync + 'static,
    {
        let schedules = S::schedule_ids();
        let name = name.into();
        let hook = Arc::new(hook);

        for schedule in &schedules {
            let hook_name = if schedules.len() > 1 {
                format!("{}@{}", name, schedule.short_name())
            } else {
                name.clone()
            };
            let hook = Arc::clone(&hook);
            self.register_boxed(
                *schedule,
                hook_name,
                BoxedHook::new(move |resources, event| hook(resources, event)),
            )?;
        }
        Ok(self)
    }

    /// Registers a pre-built hook for a schedule.
    ///
    /// # Errors
    ///
    /// Returns [`HookRegistrationError::DuplicateName`] if the name is taken.
    pub fn register_boxed(
        &self,
        schedule: ScheduleId,
        name: impl Into<String>,
        hook: BoxedHook,
    ) -> Result<(), HookRegistrationError> {
        let name = name.into();
        let mut hooks = self.hooks.write();
        let entries = hooks.entry(schedule).or_default();

        if entries.iter().any(|entry| entry.name == name) {
            return Err(HookRegistrationError::DuplicateName { schedule, name });
        }

        entries.push(HookEntry { name, hook });
        Ok(())
    }

    /// Invokes every hook registered for `schedule`, in registration order.
    pub fn invoke(&self, schedule: ScheduleId, resources: &Resources, event: &HostEvent) {
        let hooks = self.hooks.read();
        if let Some(entries) = hooks.get(&schedule) {
            for entry in entries {
                entry.hook.invoke(resources, event);
            }
        }
    }

    /// Number of hooks registered for `schedule`.
    #[must_use]
    pub fn hook_count(&self, schedule: ScheduleId) -> usize {
        self.hooks.read().get(&schedule).map_or(0, Vec::len)
    }

    /// Returns true if a hook named `name` exists on `schedule`.
    #[must_use]
    pub fn contains_hook(&self, schedule: ScheduleId, name: &str) -> bool {
        self.hooks
            .read()
            .get(&schedule)
            .is_some_and(|entries| entries.iter().any(|entry| entry.name == name))
    }
}

/// Dispatches `event` to the hooks registered on the session's
/// [`HostHooksAPI`].
///
/// Does nothing if no plugin published the API.
pub fn emit(session: &Session, event: HostEvent) {
    if let Some(hooks) = session.api::<HostHooksAPI>() {
        hooks.invoke(event.schedule(), session.resources(), &event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{OnAssetCreated, OnSecondaryPress};
    use crate::scene::SlotId;
    use crate::tool::{ToolId, UserId};
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn press() -> HostEvent {
        HostEvent::SecondaryPress {
            tool: ToolId::from_raw(0),
        }
    }

    #[test]
    fn register_increments_count() {
        let api = HostHooksAPI::new();
        let schedule = ScheduleId::of::<OnSecondaryPress>();

        api.register_observer::<OnSecondaryPress, _>("a", |_, _| {})
            .expect("registration should succeed");
        api.register_observer::<OnSecondaryPress, _>("b", |_, _| {})
            .expect("registration should succeed");

        assert_eq!(api.hook_count(schedule), 2);
        assert_eq!(api.hook_count(ScheduleId::of::<OnAssetCreated>()), 0);
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let api = HostHooksAPI::new();
        api.register_observer::<OnSecondaryPress, _>("scoop", |_, _| {})
            .expect("registration should succeed");

        let err = api
            .register_observer::<OnSecondaryPress, _>("scoop", |_, _| {})
            .err()
            .expect("duplicate should fail");

        assert!(matches!(err, HookRegistrationError::DuplicateName { ref name, .. } if name == "scoop"));
        assert!(err.to_string().contains("already registered"));
    }

    #[test]
    fn invoke_runs_hooks_in_registration_order() {
        let api = HostHooksAPI::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for name in ["first", "second", "third"] {
            let order = Arc::clone(&order);
            api.register_observer::<OnSecondaryPress, _>(name, move |_, _| {
                order.lock().push(name);
            })
            .expect("registration should succeed");
        }

        api.invoke(
            ScheduleId::of::<OnSecondaryPress>(),
            &Resources::new(),
            &press(),
        );

        assert_eq!(*order.lock(), vec!["first", "second", "third"]);
    }

    #[test]
    fn tuple_registration_covers_every_schedule() {
        let api = HostHooksAPI::new();
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);

        api.register_observer::<(OnSecondaryPress, OnAssetCreated), _>("audit", move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .expect("registration should succeed");

        assert!(api.contains_hook(ScheduleId::of::<OnSecondaryPress>(), "audit@OnSecondaryPress"));
        assert!(api.contains_hook(ScheduleId::of::<OnAssetCreated>(), "audit@OnAssetCreated"));

        let resources = Resources::new();
        let created = HostEvent::AssetCreated {
            container: SlotId::from_raw(3),
            user: UserId::from_raw(0),
        };
        api.invoke(press().schedule(), &resources, &press());
        api.invoke(created.schedule(), &resources, &created);

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn invoke_unknown_schedule_is_noop() {
        let api = HostHooksAPI::new();
        api.invoke(
            ScheduleId::of::<OnAssetCreated>(),
            &Resources::new(),
            &press(),
        );
    }

    #[test]
    fn emit_routes_by_event_schedule() {
        let mut session = Session::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let api = HostHooksAPI::new();
        {
            let seen = Arc::clone(&seen);
            api.register_observer::<OnAssetCreated, _>("created", move |_, event| {
                seen.lock().push(*event);
            })
            .expect("registration should succeed");
        }
        session.insert_api(api);

        emit(&session, press());
        let created = HostEvent::AssetCreated {
            container: SlotId::from_raw(8),
            user: UserId::from_raw(1),
        };
        emit(&session, created);

        assert_eq!(*seen.lock(), vec![created]);
    }

    #[test]
    fn emit_without_api_is_noop() {
        emit(&Session::new(), press());
    }
}
