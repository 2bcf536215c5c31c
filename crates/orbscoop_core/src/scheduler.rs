//! One-shot actions deferred to a later frame.
//!
//! The host signals asset creation before its own creation callbacks have
//! finished. Work that must observe the finished container is scheduled here
//! and runs on a later [`run_due`](DeferredHookScheduler::run_due), which the
//! scoop plugin calls once per frame.
//!
//! # Timing
//!
//! An action scheduled with `min_delay` runs on the `min_delay + 1`-th pass
//! after it was scheduled, never earlier:
//!
//! ```
//! use orbscoop_core::config::PolicyStore;
//! use orbscoop_core::scheduler::DeferredHookScheduler;
//! use orbscoop_system::resource::Resources;
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicBool, Ordering};
//!
//! let scheduler = DeferredHookScheduler::new(PolicyStore::default());
//! let ran = Arc::new(AtomicBool::new(false));
//! let flag = Arc::clone(&ran);
//! scheduler.schedule(1, Box::new(move |_| flag.store(true, Ordering::SeqCst)));
//!
//! let resources = Resources::new();
//! scheduler.run_due(&resources);
//! assert!(!ran.load(Ordering::SeqCst));
//! scheduler.run_due(&resources);
//! assert!(ran.load(Ordering::SeqCst));
//! ```

use parking_lot::Mutex;
use orbscoop_system::resource::Resources;
use tracing::{debug, trace};

use crate::config::PolicyStore;

/// An action run once by the scheduler.
pub type DeferredAction = Box<dyn FnOnce(&Resources) + Send + Sync>;

struct Pending {
    due: u64,
    action: DeferredAction,
}

#[derive(Default)]
struct Queue {
    tick: u64,
    pending: Vec<Pending>,
}

/// Queue of deferred one-shot actions, advanced once per frame.
///
/// Shared through `&self` so that hooks holding a shared borrow of the
/// session's resources can schedule work.
pub struct DeferredHookScheduler {
    store: PolicyStore,
    queue: Mutex<Queue>,
}

impl DeferredHookScheduler {
    /// Creates an empty scheduler gated on `store`'s master switch.
    #[must_use]
    pub fn new(store: PolicyStore) -> Self {
        Self {
            store,
            queue: Mutex::new(Queue::default()),
        }
    }

    /// Number of passes run so far.
    #[must_use]
    pub fn tick(&self) -> u64 {
        self.queue.lock().tick
    }

    /// Number of actions waiting to run.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.lock().pending.len()
    }

    /// Schedules `action` to run once, `min_delay` passes after the next.
    ///
    /// Returns false, dropping the action, when the feature is disabled.
    pub fn schedule(&self, min_delay: u64, action: DeferredAction) -> bool {
        if !self.store.enabled() {
            debug!("deferred action dropped, scoop is disabled");
            return false;
        }

        let mut queue = self.queue.lock();
        let due = queue.tick + min_delay + 1;
        queue.pending.push(Pending { due, action });
        trace!(due, "deferred action scheduled");
        true
    }

    /// Advances one pass and removes the actions now due, in scheduling
    /// order.
    ///
    /// The lock is released before the actions are returned, so running them
    /// may schedule more work; that work waits for a later pass.
    pub fn take_due(&self) -> Vec<DeferredAction> {
        let mut queue = self.queue.lock();
        queue.tick += 1;
        let tick = queue.tick;

        let (due, waiting): (Vec<_>, Vec<_>) =
            core::mem::take(&mut queue.pending)
                .into_iter()
                .partition(|pending| pending.due <= tick);
        queue.pending = waiting;

        due.into_iter().map(|pending| pending.action).collect()
    }

    /// Advances one pass and runs every action now due.
    ///
    /// Returns how many actions ran.
    pub fn run_due(&self, resources: &Resources) -> usize {
        let due = self.take_due();
        let count = due.len();
        for action in due {
            action(resources);
        }
        if count > 0 {
            debug!(count, tick = self.tick(), "deferred actions ran");
        }
        count
    }
}

impl core::fmt::Debug for DeferredHookScheduler {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let queue = self.queue.lock();
        f.debug_struct("DeferredHookScheduler")
            .field("tick", &queue.tick)
            .field("pending", &queue.pending.len())
            .finish_non_exhaustive()
    }
}
