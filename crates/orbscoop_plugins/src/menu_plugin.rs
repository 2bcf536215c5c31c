//! Tool context menu integration.
//!
//! Adds the "Scoop Mode" cycle control to every tool's context menu and
//! optionally hides the host's built-in items. Pressing the control walks
//! the modes in order and writes the choice back through the
//! [`PolicyStore`], so the next policy pass already uses it.

use orbscoop_core::config::{KEY_SCOOP_MODE, PolicyMode, PolicyStore};
use orbscoop_host::menu::{ContextMenu, CycleOption, MenuAPI, MenuColor, MenuItem};
use orbscoop_system::plugin::{Plugin, PluginId};
use orbscoop_system::session::Session;
use tracing::warn;

use crate::config_plugin::ConfigPlugin;

/// Title of the mode control.
pub const SCOOP_MODE_LABEL: &str = "Scoop Mode";

/// Name the contributor is registered under.
pub const MENU_CONTRIBUTOR: &str = "orbscoop::menu";

fn mode_color(mode: PolicyMode) -> MenuColor {
    match mode {
        PolicyMode::AlwaysDestroy => MenuColor::Red,
        PolicyMode::DestroyIfUnreferenced => MenuColor::Yellow,
        PolicyMode::AlwaysDrop => MenuColor::Green,
    }
}

/// The three mode options, in cycle order.
#[must_use]
pub fn mode_options() -> Vec<CycleOption> {
    PolicyMode::ALL
        .into_iter()
        .map(|mode| CycleOption::new(mode.index(), mode.label(), mode_color(mode)))
        .collect()
}

fn contribute(store: &PolicyStore, menu: &mut ContextMenu) {
    let config = store.snapshot();
    if !config.enabled {
        return;
    }

    if config.hide_eject_orb {
        menu.clear_builtins();
    }

    if !config.hide_scoop_mode {
        let writer = store.clone();
        menu.add(MenuItem::cycle(
            SCOOP_MODE_LABEL,
            mode_options(),
            config.scoop_mode.index(),
            move |_resources, value| {
                if let Err(error) = writer.set_value(KEY_SCOOP_MODE, &serde_json::Value::from(value)) {
                    warn!(%error, "scoop mode not changed");
                }
            },
        ));
    }
}

/// Contributes the Scoop Mode control to tool context menus.
///
/// # Dependencies
///
/// - [`ConfigPlugin`]
///
/// # Panics
///
/// `ready()` panics if no host published a [`MenuAPI`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoopMenuPlugin;

impl Plugin for ScoopMenuPlugin {
    fn build(&self, _session: &mut Session) {}

    fn ready(&self, session: &mut Session) {
        let Some(store) = session.get_resource::<PolicyStore>().map(|s| PolicyStore::clone(&s)) else {
            panic!("ScoopMenuPlugin requires the PolicyStore resource from ConfigPlugin");
        };
        let Some(menus) = session.api::<MenuAPI>() else {
            panic!("ScoopMenuPlugin requires MenuAPI. Add a host plugin to the session.");
        };

        menus.register(MENU_CONTRIBUTOR, move |_resources, _tool, menu| {
            contribute(&store, menu);
        });
    }

    fn dependencies(&self) -> Vec<PluginId> {
        vec![PluginId::of::<ConfigPlugin>()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orbscoop_core::config::ScoopConfig;
    use orbscoop_host::menu::EJECT_ORB;
    use orbscoop_system::resource::Resources;

    fn open(config: ScoopConfig) -> (PolicyStore, ContextMenu) {
        let store = PolicyStore::new(config);
        let mut menu = ContextMenu::new();
        menu.add(MenuItem::builtin(EJECT_ORB));
        contribute(&store, &mut menu);
        (store, menu)
    }

    #[test]
    fn options_are_labeled_and_colored() {
        let options = mode_options();
        let summary: Vec<(i64, &str, MenuColor)> = options
            .iter()
            .map(|o| (o.value, o.label.as_str(), o.color))
            .collect();

        assert_eq!(
            summary,
            vec![
                (0, "Always Destroy Orb", MenuColor::Red),
                (1, "Destroy Reference Orbs", MenuColor::Yellow),
                (2, "Always Drop Orb", MenuColor::Green),
            ]
        );
    }

    #[test]
    fn default_menu_keeps_builtins_and_adds_control() {
        let (_, menu) = open(ScoopConfig::default());

        assert!(menu.item(EJECT_ORB).is_some());
        let control = menu.item(SCOOP_MODE_LABEL).unwrap();
        assert_eq!(control.selected().unwrap().value, 1);
    }

    #[test]
    fn hide_options() {
        let (_, menu) = open(ScoopConfig {
            hide_eject_orb: true,
            hide_scoop_mode: true,
            ..ScoopConfig::default()
        });
        assert!(menu.items().is_empty());
    }

    #[test]
    fn disabled_leaves_menu_untouched() {
        let (_, menu) = open(ScoopConfig {
            enabled: false,
            hide_eject_orb: true,
            ..ScoopConfig::default()
        });

        assert!(menu.item(EJECT_ORB).is_some());
        assert!(menu.item(SCOOP_MODE_LABEL).is_none());
    }

    #[test]
    fn pressing_cycles_and_writes_the_store() {
        let (store, mut menu) = open(ScoopConfig {
            scoop_mode: PolicyMode::AlwaysDestroy,
            ..ScoopConfig::default()
        });
        let resources = Resources::new();

        let mut seen = Vec::new();
        for _ in 0..3 {
            menu.press(SCOOP_MODE_LABEL, &resources);
            seen.push(store.mode());
        }

        assert_eq!(
            seen,
            vec![
                PolicyMode::DestroyIfUnreferenced,
                PolicyMode::AlwaysDrop,
                PolicyMode::AlwaysDestroy,
            ]
        );
    }
}
