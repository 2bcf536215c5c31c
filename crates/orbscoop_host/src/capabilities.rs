//! Capabilities a host adapter publishes to the session.

use core::fmt;
use std::sync::Arc;

use orbscoop_system::api::API;

use crate::probe::Prober;

/// What the host can do for plugins.
///
/// Published by the host plugin during `build()`. Plugins that cannot work
/// without a capability check for it in `ready()`.
#[derive(Clone, Default)]
pub struct HostCapabilities {
    /// Directional probing along a tool's aim.
    pub prober: Option<Arc<dyn Prober>>,
    /// Whether the host emits [`OnAssetCreated`](crate::events::OnAssetCreated).
    pub creation_signal: bool,
}

impl API for HostCapabilities {}

impl HostCapabilities {
    /// Capabilities with a prober and the creation signal.
    #[must_use]
    pub fn full(prober: Arc<dyn Prober>) -> Self {
        Self {
            prober: Some(prober),
            creation_signal: true,
        }
    }

    /// Names of the capabilities that are missing, for diagnostics.
    #[must_use]
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.prober.is_none() {
            missing.push("prober");
        }
        if !self.creation_signal {
            missing.push("creation signal");
        }
        missing
    }
}

impl fmt::Debug for HostCapabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostCapabilities")
            .field("prober", &self.prober.is_some())
            .field("creation_signal", &self.creation_signal)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::LaserProber;

    #[test]
    fn default_reports_everything_missing() {
        assert_eq!(
            HostCapabilities::default().missing(),
            vec!["prober", "creation signal"]
        );
    }

    #[test]
    fn full_reports_nothing_missing() {
        let caps = HostCapabilities::full(Arc::new(LaserProber::new()));
        assert!(caps.missing().is_empty());
    }
}
