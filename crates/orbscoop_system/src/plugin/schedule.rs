//! Schedule identifiers for tick-based plugin updates and event hooks.
//!
//! A schedule is identified by a marker type wrapped in a [`ScheduleId`].
//! The same identifiers key two things:
//!
//! - plugin ticks, triggered with [`Session::tick()`](crate::session::Session::tick)
//!   (the session itself triggers [`FrameUpdate`](crate::session::FrameUpdate)
//!   once per host frame);
//! - host event hooks registered in Layer 2 (`OnSecondaryPress`,
//!   `OnAssetCreated`).

use core::any::TypeId;
use variadics_please::all_tuples;

/// Identifier for a tick schedule, derived from a marker type.
///
/// # Example
///
/// ```
/// # use orbscoop_system::plugin::ScheduleId;
/// pub struct OnSecondaryPress;
///
/// let schedule = ScheduleId::of::<OnSecondaryPress>();
/// assert!(schedule.type_name().ends_with("OnSecondaryPress"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScheduleId {
    type_id: TypeId,
    type_name: &'static str,
}

impl ScheduleId {
    /// Creates a `ScheduleId` for the given schedule marker type.
    #[must_use]
    pub fn of<S: 'static>() -> Self {
        Self {
            type_id: TypeId::of::<S>(),
            type_name: core::any::type_name::<S>(),
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

    /// Returns the marker's name without its module path.
    #[must_use]
    pub fn short_name(&self) -> &'static str {
        self.type_name
            .rsplit("::")
            .next()
            .unwrap_or(self.type_name)
    }
}

/// Marker trait for schedule types.
///
/// [`ScheduleId::of`] accepts any `'static` type; this trait exists so that
/// [`IntoScheduleIds`] can accept schedule types by bound.
pub trait Schedule: 'static {}

/// Types that can be converted into a list of schedule IDs: a single
/// schedule or a tuple of schedules.
pub trait IntoScheduleIds {
    /// Returns the schedule IDs for this type.
    fn schedule_ids() -> Vec<ScheduleId>;
}

impl<S: Schedule> IntoScheduleIds for S {
    fn schedule_ids() -> Vec<ScheduleId> {
        vec![ScheduleId::of::<S>()]
    }
}

macro_rules! impl_into_schedule_ids_for_tuple {
    ($($S:ident),*) => {
        impl<$($S: Schedule),*> IntoScheduleIds for ($($S,)*) {
            fn schedule_ids() -> Vec<ScheduleId> {
                vec![$(ScheduleId::of::<$S>()),*]
            }
        }
    };
}

all_tuples!(impl_into_schedule_ids_for_tuple, 2, 8, S);
