//! API trait for capability registration.
//!
//! APIs are registries that plugins use to expose capabilities to each other
//! while the session is being assembled. The host adapter publishes what it
//! can do (probing, creation signals, menus, event hooks) as APIs, and the
//! scoop plugins look them up in `ready()`.
//!
//! # API vs Resource
//!
//! | Aspect | API | Resource |
//! |--------|-----|----------|
//! | **Purpose** | Plugin wiring | Runtime state |
//! | **Accessed by** | Plugins | Hooks, deferred actions |
//! | **Access method** | `session.api::<A>()` | `resources.get::<T>()` |
//! | **Phase** | Build/Ready (and dispatch) | Every frame |
//!
//! # Interior Mutability Pattern
//!
//! APIs that accept registrations use interior mutability so that plugins
//! can register through a shared reference:
//!
//! ```
//! use hashbrown::HashMap;
//! use parking_lot::RwLock;
//! use orbscoop_system::api::API;
//!
//! #[derive(Default)]
//! pub struct IconAPI {
//!     icons: RwLock<HashMap<String, String>>,
//! }
//!
//! impl API for IconAPI {}
//!
//! impl IconAPI {
//!     pub fn register(&self, key: &str, url: &str) {
//!         self.icons.write().insert(key.into(), url.into());
//!     }
//! }
//! # let api = IconAPI::default();
//! # api.register("scoop", "asset:///scoop.png");
//! ```

/// Marker trait for capability APIs.
///
/// # Usage in Plugins
///
/// ```ignore
/// impl Plugin for HostPlugin {
///     fn build(&self, session: &mut Session) {
///         session.insert_api(HostCapabilities::new().with_prober(prober));
///     }
/// }
///
/// impl Plugin for ScoopPlugin {
///     fn ready(&self, session: &mut Session) {
///         let caps = session.api::<HostCapabilities>()
///             .expect("ScoopPlugin requires HostCapabilities");
///     }
/// }
/// ```
pub trait API: Send + Sync + 'static {}
