//! Configuration loading and persistence.
//!
//! [`ConfigPlugin`] owns the session's [`PolicyStore`]. With a backing file
//! it loads the stored options at build and writes them back on cleanup, so
//! mode changes made from the tool menu survive a restart.
//!
//! Stored options are applied key by key. A key with a bad value, such as
//! an out-of-range `scoopMode`, is skipped with a warning and keeps its
//! default while the other keys still apply. A file that cannot be read or
//! parsed is skipped as a whole. Either way the file is left as it was on
//! cleanup, so a rejected file never loses the user's settings.
//!
//! ```
//! use orbscoop_core::config::{PolicyMode, PolicyStore};
//! use orbscoop_plugins::ConfigPlugin;
//! use orbscoop_system::session::Session;
//!
//! let mut session = Session::new();
//! session.add_plugins(ConfigPlugin::new());
//! session.finish();
//!
//! let store = session.get_resource::<PolicyStore>().unwrap();
//! assert_eq!(store.mode(), PolicyMode::DestroyIfUnreferenced);
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use orbscoop_core::config::{PolicyStore, ScoopConfig};
use orbscoop_system::plugin::Plugin;
use serde_json::{Map, Value};
use orbscoop_system::session::Session;
use tracing::{debug, info, warn};

/// Error type for configuration persistence.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// Reading or writing the file failed.
    #[error("config file {path}: {source}")]
    Io {
        /// The file involved.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },

    /// Serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn read_text(path: &Path) -> Result<Option<String>, PersistenceError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(source) if source.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(PersistenceError::Io {
            path: path.to_owned(),
            source,
        }),
    }
}

/// Reads the options stored at `path`.
///
/// Returns `Ok(None)` if the file does not exist.
///
/// # Errors
///
/// - [`PersistenceError::Io`] if the file exists but cannot be read
/// - [`PersistenceError::Serialization`] if it is not a valid config,
///   e.g. `"scoopMode": 3`
pub fn load_config(path: &Path) -> Result<Option<ScoopConfig>, PersistenceError> {
    match read_text(path)? {
        Some(text) => Ok(Some(serde_json::from_str(&text)?)),
        None => Ok(None),
    }
}

/// Reads the stored options at `path` as raw key/value pairs.
fn load_entries(path: &Path) -> Result<Option<Map<String, Value>>, PersistenceError> {
    match read_text(path)? {
        Some(text) => Ok(Some(serde_json::from_str(&text)?)),
        None => Ok(None),
    }
}

/// Writes `config` to `path` as pretty JSON.
///
/// # Errors
///
/// Fails if serialization or the write fails.
pub fn save_config(path: &Path, config: &ScoopConfig) -> Result<(), PersistenceError> {
    let text = serde_json::to_string_pretty(config)?;
    fs::write(path, text).map_err(|source| PersistenceError::Io {
        path: path.to_owned(),
        source,
    })
}

/// Provides the session's [`PolicyStore`].
///
/// # Resources Provided
///
/// | Resource | Description |
/// |----------|-------------|
/// | [`PolicyStore`] | Shared handle to the live options |
///
/// # Dependencies
///
/// None.
#[derive(Debug, Clone, Default)]
pub struct ConfigPlugin {
    path: Option<PathBuf>,
    initial: ScoopConfig,
}

impl ConfigPlugin {
    /// In-memory options starting from the defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Options loaded from and saved to `path`.
    #[must_use]
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Starts from `config` instead of the defaults.
    ///
    /// With a backing file, the stored keys override it.
    #[must_use]
    pub fn with_config(mut self, config: ScoopConfig) -> Self {
        self.initial = config;
        self
    }

    /// The backing file, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Builds the store, applying the stored file on top of `initial`.
    ///
    /// Returns whether the file may be overwritten on cleanup.
    fn load_store(&self) -> (PolicyStore, bool) {
        let store = PolicyStore::new(self.initial.clone());
        let Some(path) = &self.path else {
            return (store, false);
        };

        let entries = match load_entries(path) {
            Ok(Some(entries)) => entries,
            Ok(None) => {
                debug!(path = %path.display(), "no stored configuration");
                return (store, true);
            }
            Err(error) => {
                warn!(path = %path.display(), %error, "stored configuration rejected, using defaults");
                return (store, false);
            }
        };

        let mut rejected = 0usize;
        for (key, value) in &entries {
            if let Err(error) = store.set_value(key, value) {
                warn!(path = %path.display(), key = %key, %error, "stored option skipped");
                rejected += 1;
            }
        }

        if rejected == 0 {
            info!(path = %path.display(), "configuration loaded");
        } else {
            warn!(path = %path.display(), rejected, "configuration partly loaded, file will not be overwritten");
        }
        (store, rejected == 0)
    }
}

/// Where [`ConfigPlugin`] saves on cleanup. Absent when the stored file was
/// rejected.
struct SaveTarget(PathBuf);

impl Plugin for ConfigPlugin {
    fn build(&self, session: &mut Session) {
        let (store, writable) = self.load_store();
        session.insert_resource(store);
        if let (Some(path), true) = (&self.path, writable) {
            session.insert_resource(SaveTarget(path.clone()));
        }
    }

    fn cleanup(&self, session: &mut Session) {
        let Some(path) = session.get_resource::<SaveTarget>().map(|target| target.0.clone()) else {
            if let Some(path) = &self.path {
                debug!(path = %path.display(), "stored configuration left untouched");
            }
            return;
        };
        let Some(config) = session.get_resource::<PolicyStore>().map(|store| store.snapshot()) else {
            return;
        };

        match save_config(&path, &config) {
            Ok(()) => debug!(path = %path.display(), "configuration saved"),
            Err(error) => warn!(path = %path.display(), %error, "configuration could not be saved"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orbscoop_core::config::PolicyMode;

    fn session_with(plugin: ConfigPlugin) -> Session {
        let mut session = Session::new();
        session.add_plugins(plugin);
        session.finish();
        session
    }

    #[test]
    fn in_memory_uses_initial_config() {
        let session = session_with(ConfigPlugin::new().with_config(ScoopConfig {
            scoop_mode: PolicyMode::AlwaysDrop,
            ..ScoopConfig::default()
        }));

        let store = session.get_resource::<PolicyStore>().unwrap();
        assert_eq!(store.mode(), PolicyMode::AlwaysDrop);
    }

    #[test]
    fn loads_stored_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scoop.json");
        fs::write(&path, r#"{ "scoopMode": 0, "hideEjectOrb": true }"#).unwrap();

        let session = session_with(ConfigPlugin::from_file(&path));
        let config = session.get_resource::<PolicyStore>().unwrap().snapshot();

        assert_eq!(config.scoop_mode, PolicyMode::AlwaysDestroy);
        assert!(config.hide_eject_orb);
        assert!(config.enabled);
    }

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");

        assert!(load_config(&path).unwrap().is_none());
        let session = session_with(ConfigPlugin::from_file(&path));
        assert_eq!(
            session.get_resource::<PolicyStore>().unwrap().snapshot(),
            ScoopConfig::default()
        );
    }

    #[test]
    fn out_of_range_mode_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scoop.json");
        fs::write(&path, r#"{ "scoopMode": 3 }"#).unwrap();

        assert!(matches!(load_config(&path), Err(PersistenceError::Serialization(_))));
        let session = session_with(ConfigPlugin::from_file(&path));
        assert_eq!(
            session.get_resource::<PolicyStore>().unwrap().mode(),
            PolicyMode::DestroyIfUnreferenced
        );
    }

    #[test]
    fn bad_key_keeps_the_other_options_and_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scoop.json");
        let stored = r#"{ "enabled": false, "scoopMode": 3, "hideScoopMode": true }"#;
        fs::write(&path, stored).unwrap();

        let mut session = session_with(ConfigPlugin::from_file(&path));
        let config = session.get_resource::<PolicyStore>().unwrap().snapshot();
        assert!(!config.enabled);
        assert!(config.hide_scoop_mode);
        assert_eq!(config.scoop_mode, PolicyMode::DestroyIfUnreferenced);

        session.cleanup();
        assert_eq!(fs::read_to_string(&path).unwrap(), stored);
    }

    #[test]
    fn unknown_key_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scoop.json");
        fs::write(&path, r#"{ "scoopSpeed": 9, "scoopMode": 2 }"#).unwrap();

        let session = session_with(ConfigPlugin::from_file(&path));
        assert_eq!(
            session.get_resource::<PolicyStore>().unwrap().mode(),
            PolicyMode::AlwaysDrop
        );
    }

    #[test]
    fn unparsable_file_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scoop.json");
        fs::write(&path, "{ not json").unwrap();

        let mut session = session_with(ConfigPlugin::from_file(&path));
        assert_eq!(
            session.get_resource::<PolicyStore>().unwrap().snapshot(),
            ScoopConfig::default()
        );

        session.cleanup();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[test]
    fn in_memory_plugin_writes_nothing() {
        let mut session = session_with(ConfigPlugin::new());
        assert!(!session.contains_resource::<SaveTarget>());
        session.cleanup();
    }

    #[test]
    fn cleanup_saves_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scoop.json");

        let mut session = session_with(ConfigPlugin::from_file(&path));
        session
            .get_resource::<PolicyStore>()
            .unwrap()
            .set_mode(PolicyMode::AlwaysDrop);
        session.cleanup();

        let stored = load_config(&path).unwrap().unwrap();
        assert_eq!(stored.scoop_mode, PolicyMode::AlwaysDrop);
    }

    #[test]
    fn save_into_missing_directory_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("scoop.json");

        let err = save_config(&path, &ScoopConfig::default()).unwrap_err();
        assert!(matches!(err, PersistenceError::Io { .. }));
        assert!(err.to_string().contains("scoop.json"));
    }
}
