//! Scoop configuration and the shared handle the engine reads it through.
//!
//! [`ScoopConfig`] is the option set, serialized with the camelCase keys the
//! host's mod configuration uses. [`PolicyStore`] is a cheap-to-clone handle
//! around one session's config. The engine, the scheduler and the menu all
//! hold the same store, so a write through any of them is seen by the next
//! decision.
//!
//! `scoopMode` is range-checked at this boundary: an out-of-range value
//! never becomes a [`PolicyMode`].
//!
//! ```
//! use orbscoop_core::config::{ConfigError, PolicyMode, ScoopConfig};
//!
//! let config: ScoopConfig = serde_json::from_str(r#"{ "scoopMode": 2 }"#).unwrap();
//! assert_eq!(config.scoop_mode, PolicyMode::AlwaysDrop);
//! assert!(config.enabled);
//!
//! assert!(serde_json::from_str::<ScoopConfig>(r#"{ "scoopMode": 3 }"#).is_err());
//! assert_eq!(PolicyMode::try_from(-1), Err(ConfigError::ScoopModeOutOfRange(-1)));
//! ```

use core::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Config key of the master switch.
pub const KEY_ENABLED: &str = "enabled";
/// Config key of the policy mode.
pub const KEY_SCOOP_MODE: &str = "scoopMode";
/// Config key of the auto-equip switch.
pub const KEY_SCOOP_ON_CREATED: &str = "scoopMaterialOnCreated";
/// Config key hiding the tool's built-in menu items.
pub const KEY_HIDE_EJECT_ORB: &str = "hideEjectOrb";
/// Config key hiding the Scoop Mode menu control.
pub const KEY_HIDE_SCOOP_MODE: &str = "hideScoopMode";

/// Errors raised at the configuration boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// `scoopMode` outside `0..=2`.
    #[error("scoopMode must be 0, 1 or 2, got {0}")]
    ScoopModeOutOfRange(i64),

    /// The key is not one of the recognized options.
    #[error("unknown configuration key '{0}'")]
    UnknownKey(String),

    /// The value has the wrong JSON type for its key.
    #[error("invalid value for '{key}': expected {expected}")]
    InvalidValue {
        /// The key being written.
        key: String,
        /// What the key accepts.
        expected: &'static str,
    },
}

/// What happens to asset orbs when a tool's target changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum PolicyMode {
    /// Destroy every asset orb.
    AlwaysDestroy = 0,
    /// Destroy orbs whose marker no longer points at an asset; drop the rest.
    #[default]
    DestroyIfUnreferenced = 1,
    /// Drop every asset orb into the user's space.
    AlwaysDrop = 2,
}

impl PolicyMode {
    /// Every mode, in menu order.
    pub const ALL: [PolicyMode; 3] = [
        PolicyMode::AlwaysDestroy,
        PolicyMode::DestroyIfUnreferenced,
        PolicyMode::AlwaysDrop,
    ];

    /// The stored integer value.
    #[must_use]
    pub const fn index(self) -> i64 {
        self as i64
    }

    /// The label shown in the tool menu.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            PolicyMode::AlwaysDestroy => "Always Destroy Orb",
            PolicyMode::DestroyIfUnreferenced => "Destroy Reference Orbs",
            PolicyMode::AlwaysDrop => "Always Drop Orb",
        }
    }
}

impl TryFrom<i64> for PolicyMode {
    type Error = ConfigError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(PolicyMode::AlwaysDestroy),
            1 => Ok(PolicyMode::DestroyIfUnreferenced),
            2 => Ok(PolicyMode::AlwaysDrop),
            other => Err(ConfigError::ScoopModeOutOfRange(other)),
        }
    }
}

impl From<PolicyMode> for i64 {
    fn from(mode: PolicyMode) -> Self {
        mode.index()
    }
}

impl fmt::Display for PolicyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The option set. Missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScoopConfig {
    /// Master switch; everything no-ops when false.
    pub enabled: bool,
    /// The active policy.
    pub scoop_mode: PolicyMode,
    /// Equip freshly created materials onto the active material tool.
    pub scoop_material_on_created: bool,
    /// Hide the tool's built-in context menu items, "Eject Orb" included.
    pub hide_eject_orb: bool,
    /// Hide the Scoop Mode context menu control.
    pub hide_scoop_mode: bool,
}

impl Default for ScoopConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            scoop_mode: PolicyMode::DestroyIfUnreferenced,
            scoop_material_on_created: true,
            hide_eject_orb: false,
            hide_scoop_mode: false,
        }
    }
}

/// Shared handle to one session's [`ScoopConfig`].
///
/// Clones share the same config.
#[derive(Debug, Clone, Default)]
pub struct PolicyStore {
    inner: Arc<RwLock<ScoopConfig>>,
}

impl PolicyStore {
    /// Creates a store holding `config`.
    #[must_use]
    pub fn new(config: ScoopConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    /// A copy of the current config.
    #[must_use]
    pub fn snapshot(&self) -> ScoopConfig {
        self.inner.read().clone()
    }

    /// The master switch.
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.inner.read().enabled
    }

    /// The active policy.
    #[must_use]
    pub fn mode(&self) -> PolicyMode {
        self.inner.read().scoop_mode
    }

    /// Sets the active policy.
    ///
    /// [`set_value`](Self::set_value) with [`KEY_SCOOP_MODE`] ends up here.
    pub fn set_mode(&self, mode: PolicyMode) {
        self.inner.write().scoop_mode = mode;
        debug!(mode = %mode, "scoop mode changed");
    }

    /// Replaces the whole config.
    pub fn replace(&self, config: ScoopConfig) {
        *self.inner.write() = config;
    }

    /// Applies `f` to the config under the write lock.
    pub fn update<R>(&self, f: impl FnOnce(&mut ScoopConfig) -> R) -> R {
        f(&mut self.inner.write())
    }

    /// Writes one option by its config key.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::UnknownKey`] for unrecognized keys
    /// - [`ConfigError::InvalidValue`] if the JSON type does not fit the key
    /// - [`ConfigError::ScoopModeOutOfRange`] for a `scoopMode` outside `0..=2`
    ///
    /// The config is unchanged on error.
    pub fn set_value(&self, key: &str, value: &Value) -> Result<(), ConfigError> {
        let flag = |expected| {
            value.as_bool().ok_or_else(|| ConfigError::InvalidValue {
                key: key.to_owned(),
                expected,
            })
        };

        match key {
            KEY_SCOOP_MODE => {
                let raw = value.as_i64().ok_or_else(|| ConfigError::InvalidValue {
                    key: key.to_owned(),
                    expected: "an integer",
                })?;
                self.set_mode(PolicyMode::try_from(raw)?);
                return Ok(());
            }
            KEY_ENABLED => {
                let enabled = flag("a boolean")?;
                self.inner.write().enabled = enabled;
            }
            KEY_SCOOP_ON_CREATED => {
                let on = flag("a boolean")?;
                self.inner.write().scoop_material_on_created = on;
            }
            KEY_HIDE_EJECT_ORB => {
                let hide = flag("a boolean")?;
                self.inner.write().hide_eject_orb = hide;
            }
            KEY_HIDE_SCOOP_MODE => {
                let hide = flag("a boolean")?;
                self.inner.write().hide_scoop_mode = hide;
            }
            other => return Err(ConfigError::UnknownKey(other.to_owned())),
        }

        debug!(key, %value, "configuration updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_match_option_table() {
        let config = ScoopConfig::default();
        assert!(config.enabled);
        assert_eq!(config.scoop_mode, PolicyMode::DestroyIfUnreferenced);
        assert!(config.scoop_material_on_created);
        assert!(!config.hide_eject_orb);
        assert!(!config.hide_scoop_mode);
    }

    #[test]
    fn serializes_with_camel_case_keys_and_integer_mode() {
        let value = serde_json::to_value(ScoopConfig::default()).unwrap();
        assert_eq!(
            value,
            json!({
                "enabled": true,
                "scoopMode": 1,
                "scoopMaterialOnCreated": true,
                "hideEjectOrb": false,
                "hideScoopMode": false,
            })
        );
    }

    #[test]
    fn missing_keys_take_defaults() {
        let config: ScoopConfig = serde_json::from_str(r#"{ "hideScoopMode": true }"#).unwrap();
        assert!(config.hide_scoop_mode);
        assert_eq!(config.scoop_mode, PolicyMode::DestroyIfUnreferenced);
    }

    #[test]
    fn out_of_range_mode_fails_to_deserialize() {
        for raw in ["3", "-1", "100"] {
            let text = format!(r#"{{ "scoopMode": {} }}"#, raw);
            let err = serde_json::from_str::<ScoopConfig>(&text).unwrap_err();
            assert!(err.to_string().contains("scoopMode must be 0, 1 or 2"), "{}", err);
        }
    }

    #[test]
    fn mode_conversions() {
        for mode in PolicyMode::ALL {
            assert_eq!(PolicyMode::try_from(mode.index()), Ok(mode));
        }
        assert_eq!(i64::from(PolicyMode::AlwaysDrop), 2);
        assert_eq!(PolicyMode::AlwaysDestroy.to_string(), "Always Destroy Orb");
    }

    #[test]
    fn clones_share_state() {
        let store = PolicyStore::default();
        let other = store.clone();

        other.set_mode(PolicyMode::AlwaysDrop);
        assert_eq!(store.mode(), PolicyMode::AlwaysDrop);

        store.update(|c| c.enabled = false);
        assert!(!other.enabled());
    }

    #[test]
    fn set_value_writes_known_keys() {
        let store = PolicyStore::default();
        store.set_value(KEY_SCOOP_MODE, &json!(0)).unwrap();
        store.set_value(KEY_HIDE_EJECT_ORB, &json!(true)).unwrap();
        store.set_value(KEY_SCOOP_ON_CREATED, &json!(false)).unwrap();

        let config = store.snapshot();
        assert_eq!(config.scoop_mode, PolicyMode::AlwaysDestroy);
        assert!(config.hide_eject_orb);
        assert!(!config.scoop_material_on_created);
    }

    #[test]
    fn set_value_mode_matches_set_mode() {
        let by_key = PolicyStore::default();
        let direct = PolicyStore::default();

        by_key.set_value(KEY_SCOOP_MODE, &json!(2)).unwrap();
        direct.set_mode(PolicyMode::AlwaysDrop);

        assert_eq!(by_key.mode(), PolicyMode::AlwaysDrop);
        assert_eq!(by_key.snapshot(), direct.snapshot());
    }

    #[test]
    fn set_value_rejects_bad_input_without_writing() {
        let store = PolicyStore::default();

        assert_eq!(
            store.set_value(KEY_SCOOP_MODE, &json!(3)),
            Err(ConfigError::ScoopModeOutOfRange(3))
        );
        assert_eq!(
            store.set_value(KEY_SCOOP_MODE, &json!(-1)),
            Err(ConfigError::ScoopModeOutOfRange(-1))
        );
        assert!(matches!(
            store.set_value(KEY_ENABLED, &json!("yes")),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert_eq!(
            store.set_value("scoopSpeed", &json!(1)),
            Err(ConfigError::UnknownKey("scoopSpeed".to_owned()))
        );

        assert_eq!(store.snapshot(), ScoopConfig::default());
    }
}
