//! Tool context menus.
//!
//! When a user opens a tool's context menu the host fills it with its own
//! built-in items, then lets registered contributors edit it. A contributor
//! can remove the built-ins or add value-cycle controls whose changes are
//! written back through a callback.

use core::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use orbscoop_system::api::API;
use orbscoop_system::resource::Resources;

use crate::tool::Tool;

/// Label of the host's built-in orb ejection item.
pub const EJECT_ORB: &str = "Eject Orb";

/// Tint of a menu item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MenuColor {
    /// Default tint.
    #[default]
    White,
    /// Destructive choices.
    Red,
    /// Cautious choices.
    Yellow,
    /// Safe choices.
    Green,
}

/// One selectable value of a cycle control.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleOption {
    /// The stored value.
    pub value: i64,
    /// Text shown while this value is selected.
    pub label: String,
    /// Tint shown while this value is selected.
    pub color: MenuColor,
}

impl CycleOption {
    /// Creates an option.
    #[must_use]
    pub fn new(value: i64, label: impl Into<String>, color: MenuColor) -> Self {
        Self {
            value,
            label: label.into(),
            color,
        }
    }
}

type ChangeFn = dyn Fn(&Resources, i64) + Send + Sync;

/// What pressing an item does.
#[derive(Clone)]
pub enum MenuAction {
    /// Host-defined behavior.
    Builtin,
    /// Steps through `options`, reporting each new value to `on_change`.
    Cycle {
        /// Available values, in cycling order.
        options: Vec<CycleOption>,
        /// Index into `options`.
        selected: usize,
        /// Called with the newly selected value.
        on_change: Arc<ChangeFn>,
    },
}

impl fmt::Debug for MenuAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuAction::Builtin => f.write_str("Builtin"),
            MenuAction::Cycle {
                options, selected, ..
            } => f
                .debug_struct("Cycle")
                .field("options", options)
                .field("selected", selected)
                .finish_non_exhaustive(),
        }
    }
}

/// An entry in a context menu.
#[derive(Debug, Clone)]
pub struct MenuItem {
    /// Item title.
    pub label: String,
    /// Item tint.
    pub color: MenuColor,
    /// Press behavior.
    pub action: MenuAction,
}

impl MenuItem {
    /// A host built-in item.
    #[must_use]
    pub fn builtin(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            color: MenuColor::White,
            action: MenuAction::Builtin,
        }
    }

    /// A value-cycle control starting on the option whose value is
    /// `current`, or on the first option if none matches.
    #[must_use]
    pub fn cycle(
        label: impl Into<String>,
        options: Vec<CycleOption>,
        current: i64,
        on_change: impl Fn(&Resources, i64) + Send + Sync + 'static,
    ) -> Self {
        let selected = options.iter().position(|o| o.value == current).unwrap_or(0);
        Self {
            label: label.into(),
            color: MenuColor::White,
            action: MenuAction::Cycle {
                options,
                selected,
                on_change: Arc::new(on_change),
            },
        }
    }

    /// Returns true for host built-ins.
    #[must_use]
    pub fn is_builtin(&self) -> bool {
        matches!(self.action, MenuAction::Builtin)
    }

    /// The currently selected option of a cycle control.
    #[must_use]
    pub fn selected(&self) -> Option<&CycleOption> {
        match &self.action {
            MenuAction::Cycle {
                options, selected, ..
            } => options.get(*selected),
            MenuAction::Builtin => None,
        }
    }
}

/// The menu opened on a tool.
#[derive(Debug, Clone, Default)]
pub struct ContextMenu {
    items: Vec<MenuItem>,
}

impl ContextMenu {
    /// An empty menu.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The host's default menu for a tool.
    #[must_use]
    pub fn for_tool(_tool: &Tool) -> Self {
        Self {
            items: vec![MenuItem::builtin(EJECT_ORB)],
        }
    }

    /// Appends an item.
    pub fn add(&mut self, item: MenuItem) -> &mut Self {
        self.items.push(item);
        self
    }

    /// Removes every host built-in item.
    pub fn clear_builtins(&mut self) {
        self.items.retain(|item| !item.is_builtin());
    }

    /// The menu's items, in display order.
    #[must_use]
    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    /// The first item titled `label`.
    #[must_use]
    pub fn item(&self, label: &str) -> Option<&MenuItem> {
        self.items.iter().find(|item| item.label == label)
    }

    /// Presses the cycle control titled `label`: advances to the next option
    /// (wrapping) and reports the new value.
    ///
    /// Returns the new value, or `None` if no cycle control has that title.
    pub fn press(&mut self, label: &str, resources: &Resources) -> Option<i64> {
        let item = self.items.iter_mut().find(|item| item.label == label)?;
        let MenuAction::Cycle {
            options,
            selected,
            on_change,
        } = &mut item.action
        else {
            return None;
        };
        if options.is_empty() {
            return None;
        }

        *selected = (*selected + 1) % options.len();
        let value = options[*selected].value;
        on_change(resources, value);
        Some(value)
    }
}

type ContributorFn = dyn Fn(&Resources, &Tool, &mut ContextMenu) + Send + Sync;

/// Registry of context menu contributors.
#[derive(Default)]
pub struct MenuAPI {
    contributors: RwLock<Vec<(String, Box<ContributorFn>)>>,
}

impl API for MenuAPI {}

impl MenuAPI {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a contributor. Contributors run in registration order.
    pub fn register(
        &self,
        name: impl Into<String>,
        contributor: impl Fn(&Resources, &Tool, &mut ContextMenu) + Send + Sync + 'static,
    ) {
        self.contributors
            .write()
            .push((name.into(), Box::new(contributor)));
    }

    /// Number of registered contributors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.contributors.read().len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contributors.read().is_empty()
    }

    /// Builds the context menu for `tool`.
    #[must_use]
    pub fn open(&self, resources: &Resources, tool: &Tool) -> ContextMenu {
        let mut menu = ContextMenu::for_tool(tool);
        for (_, contributor) in self.contributors.read().iter() {
            contributor(resources, tool, &mut menu);
        }
        menu
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::AssetKind;
    use crate::scene::SlotId;
    use crate::tool::ToolId;
    use std::sync::atomic::{AtomicI64, Ordering};

    fn tool() -> Tool {
        Tool {
            id: ToolId::from_raw(0),
            kind: AssetKind::Material,
            orb_slot: SlotId::from_raw(1),
            held: None,
            uses_probe: true,
            user_space: SlotId::from_raw(2),
        }
    }

    fn options() -> Vec<CycleOption> {
        vec![
            CycleOption::new(0, "Zero", MenuColor::Red),
            CycleOption::new(1, "One", MenuColor::Yellow),
            CycleOption::new(2, "Two", MenuColor::Green),
        ]
    }

    #[test]
    fn default_menu_has_builtins() {
        let menu = ContextMenu::for_tool(&tool());
        assert!(menu.item(EJECT_ORB).is_some_and(MenuItem::is_builtin));
    }

    #[test]
    fn cycle_starts_on_current_value() {
        let item = MenuItem::cycle("Mode", options(), 2, |_, _| {});
        assert_eq!(item.selected().map(|o| o.value), Some(2));

        let fallback = MenuItem::cycle("Mode", options(), 9, |_, _| {});
        assert_eq!(fallback.selected().map(|o| o.value), Some(0));
    }

    #[test]
    fn press_wraps_and_reports() {
        let written = Arc::new(AtomicI64::new(-1));
        let sink = Arc::clone(&written);
        let mut menu = ContextMenu::new();
        menu.add(MenuItem::cycle("Mode", options(), 1, move |_, v| {
            sink.store(v, Ordering::SeqCst);
        }));

        let resources = Resources::new();
        assert_eq!(menu.press("Mode", &resources), Some(2));
        assert_eq!(written.load(Ordering::SeqCst), 2);
        assert_eq!(menu.press("Mode", &resources), Some(0));
        assert_eq!(
            menu.item("Mode").and_then(MenuItem::selected).map(|o| o.color),
            Some(MenuColor::Red)
        );
    }

    #[test]
    fn press_ignores_builtins_and_unknown_labels() {
        let mut menu = ContextMenu::for_tool(&tool());
        let resources = Resources::new();
        assert_eq!(menu.press(EJECT_ORB, &resources), None);
        assert_eq!(menu.press("Nope", &resources), None);
    }

    #[test]
    fn contributors_run_in_order() {
        let api = MenuAPI::new();
        api.register("hide", |_, _, menu| menu.clear_builtins());
        api.register("add", |_, _, menu| {
            menu.add(MenuItem::cycle("Mode", options(), 0, |_, _| {}));
        });
        assert_eq!(api.len(), 2);

        let menu = api.open(&Resources::new(), &tool());
        let labels: Vec<&str> = menu.items().iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, vec!["Mode"]);
    }
}
