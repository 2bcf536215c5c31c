//! Tracing and observability plugin.
//!
//! Provides [`TracingPlugin`] which configures the `tracing` subscriber and
//! exposes its configuration as a resource.
//!
//! # Lifecycle
//!
//! - **`build()`** registers the [`TracingConfig`] resource.
//! - **`ready()`** installs the subscriber. If the host process already has
//!   a global subscriber, that one is kept. When a host published
//!   [`HostHooksAPI`], every host event is also traced at `trace` level.
//!
//! # Example
//!
//! ```
//! use orbscoop_plugins::{ModInfoPlugin, TracingFormat, TracingPlugin};
//! use orbscoop_system::session::Session;
//! use tracing::Level;
//!
//! let mut session = Session::new();
//! session.add_plugins(ModInfoPlugin);
//! session.add_plugins(
//!     TracingPlugin::default()
//!         .with_level(Level::DEBUG)
//!         .with_format(TracingFormat::Compact)
//!         .with_env_filter("orbscoop_core=trace"),
//! );
//! session.finish();
//! ```

use orbscoop_host::events::{OnAssetCreated, OnSecondaryPress};
use orbscoop_host::hooks::HostHooksAPI;
use orbscoop_system::plugin::{Plugin, PluginId};
use orbscoop_system::session::Session;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::mod_info::{ModInfo, ModInfoPlugin};

/// Hook name of the host event tracer, suffixed per schedule.
pub const TRACE_HOOK: &str = "orbscoop::trace";

/// Tracing output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TracingFormat {
    /// Human-readable colored output (default).
    #[default]
    Pretty,
    /// Compact single-line output.
    Compact,
    /// JSON structured output for log aggregation.
    Json,
}

/// The tracing configuration the session was built with.
#[derive(Debug, Clone, Copy)]
pub struct TracingConfig {
    /// The configured log level.
    pub level: Level,
    /// The configured output format.
    pub format: TracingFormat,
}

/// Tracing and logging plugin.
///
/// # Resources Provided
///
/// | Resource | Description |
/// |----------|-------------|
/// | [`TracingConfig`] | Tracing configuration (read-only) |
///
/// # Dependencies
///
/// - [`ModInfoPlugin`]
#[derive(Debug, Clone)]
pub struct TracingPlugin {
    level: Level,
    format: TracingFormat,
    /// e.g. `"orbscoop_core=debug,orbscoop_host=warn"`
    env_filter: Option<String>,
    span_events: bool,
}

impl Default for TracingPlugin {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: TracingFormat::Pretty,
            env_filter: None,
            span_events: false,
        }
    }
}

impl TracingPlugin {
    /// Creates a new `TracingPlugin` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum log level.
    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Sets the output format.
    #[must_use]
    pub fn with_format(mut self, format: TracingFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets a target filter, `target=level,target=level,...`.
    ///
    /// An unparsable filter falls back to the plain level.
    #[must_use]
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Enables span enter/exit events in output.
    #[must_use]
    pub fn with_span_events(mut self, enabled: bool) -> Self {
        self.span_events = enabled;
        self
    }

    fn filter(&self) -> EnvFilter {
        match &self.env_filter {
            Some(filter) => {
                EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(self.level.as_str()))
            }
            None => EnvFilter::new(self.level.as_str()),
        }
    }
}

impl Plugin for TracingPlugin {
    fn build(&self, session: &mut Session) {
        session.insert_resource(TracingConfig {
            level: self.level,
            format: self.format,
        });
    }

    fn ready(&self, session: &mut Session) {
        let env_filter = self.filter();
        let span_events = if self.span_events {
            FmtSpan::ENTER | FmtSpan::EXIT
        } else {
            FmtSpan::NONE
        };

        // try_init fails if a global subscriber is already installed
        match self.format {
            TracingFormat::Pretty => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .pretty()
                            .with_span_events(span_events),
                    )
                    .try_init()
                    .ok();
            }
            TracingFormat::Compact => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .compact()
                            .with_span_events(span_events),
                    )
                    .try_init()
                    .ok();
            }
            TracingFormat::Json => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .json()
                            .with_span_events(span_events),
                    )
                    .try_init()
                    .ok();
            }
        }

        let info = session
            .get_resource::<ModInfo>()
            .map(|info| ModInfo::clone(&info))
            .unwrap_or_default();
        tracing::info!(
            name = info.name,
            version = info.version,
            level = %self.level,
            format = ?self.format,
            "tracing initialized"
        );

        if let Some(hooks) = session.api::<HostHooksAPI>() {
            let registered = hooks.register_observer::<(OnSecondaryPress, OnAssetCreated), _>(
                TRACE_HOOK,
                |_resources, event| tracing::trace!(?event, "host event"),
            );
            if let Err(error) = registered {
                tracing::warn!(%error, "host events will not be traced");
            }
        }
    }

    fn cleanup(&self, _session: &mut Session) {
        tracing::info!("tracing shutting down");
    }

    fn dependencies(&self) -> Vec<PluginId> {
        vec![PluginId::of::<ModInfoPlugin>()]
    }
}
