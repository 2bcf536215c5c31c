//! The session runtime underneath orbscoop (Layer 1).
//!
//! `orbscoop_system` provides the primitives every other crate builds on:
//!
//! - [`api`] - API trait for build-time capability registration
//! - [`plugin`] - Plugin trait, plugin groups and tick schedules
//! - [`resource`] - Type-keyed shared state for a session
//! - [`session`] - The runtime that orchestrates plugins and drives frames
//!
//! # Architecture
//!
//! - **Layer 1** (`orbscoop_system`): plugin lifecycle and frame ticks (this crate)
//! - **Layer 2** (`orbscoop_host`): host collaborators (scene, tools, probing, events)
//! - **Layer 3** (`orbscoop_core`, `orbscoop_plugins`): orb policies and adapters
//!
//! # Example
//!
//! ```
//! use orbscoop_system::plugin::Plugin;
//! use orbscoop_system::session::Session;
//!
//! struct FrameBudget { max_actions: usize }
//!
//! struct BudgetPlugin;
//!
//! impl Plugin for BudgetPlugin {
//!     fn build(&self, session: &mut Session) {
//!         session.insert_resource(FrameBudget { max_actions: 8 });
//!     }
//! }
//!
//! let mut session = Session::new();
//! session.add_plugins(BudgetPlugin);
//! session.finish();
//! assert!(session.contains_resource::<FrameBudget>());
//! ```

/// API trait for capability registration.
pub mod api;

/// Plugin trait for extensible functionality.
pub mod plugin;

/// Resource container management.
pub mod resource;

/// Session runtime for plugin orchestration.
pub mod session;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::api::*;
    pub use crate::plugin::*;
    pub use crate::resource::*;
    pub use crate::session::*;
}
