//! In-memory reference host.
//!
//! [`World`] implements [`SceneGraph`] and [`ToolRig`] over plain maps. It
//! is the host the default plugin set runs against, and the one the test
//! suites drive.
//!
//! ```
//! use orbscoop_host::asset::AssetRef;
//! use orbscoop_host::scene::SceneGraph;
//! use orbscoop_host::world::World;
//!
//! let mut world = World::new();
//! let shelf = world.spawn(world.root(), "Shelf").unwrap();
//! let orb = world.spawn(shelf, "Brick Orb").unwrap();
//! world.attach_marker(orb, AssetRef::material("Brick")).unwrap();
//!
//! assert_eq!(world.children(shelf), vec![orb]);
//! assert!(world.find_marker(shelf, orbscoop_host::asset::AssetKind::Material).is_some());
//! ```

use hashbrown::{HashMap, HashSet};
use tracing::debug;

use crate::asset::{AssetKind, AssetRef};
use crate::scene::{SceneError, SceneGraph, SlotId, Transform};
use crate::tool::{HandlerInfo, HeldReference, Side, Tool, ToolId, ToolRig, UserId};

/// What a slot's renderer draws with.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Renderer {
    /// Surface material.
    pub material: Option<AssetRef>,
    /// Geometry.
    pub mesh: Option<AssetRef>,
}

impl Renderer {
    fn get(&self, kind: AssetKind) -> Option<&AssetRef> {
        match kind {
            AssetKind::Material => self.material.as_ref(),
            AssetKind::Mesh => self.mesh.as_ref(),
        }
    }
}

#[derive(Debug)]
struct Marker {
    kind: AssetKind,
    target: Option<AssetRef>,
}

#[derive(Debug)]
struct SlotData {
    name: String,
    parent: Option<SlotId>,
    children: Vec<SlotId>,
    transform: Transform,
    markers: Vec<Marker>,
    hosted: Vec<AssetRef>,
    renderer: Option<Renderer>,
}

impl SlotData {
    fn new(name: String, parent: Option<SlotId>) -> Self {
        Self {
            name,
            parent,
            children: Vec::new(),
            transform: Transform::IDENTITY,
            markers: Vec::new(),
            hosted: Vec::new(),
            renderer: None,
        }
    }

    fn references(&self, asset: &AssetRef) -> bool {
        self.markers
            .iter()
            .any(|m| m.target.as_ref() == Some(asset))
            || self
                .renderer
                .as_ref()
                .is_some_and(|r| r.get(asset.kind()) == Some(asset))
    }
}

#[derive(Debug)]
struct UserData {
    space: SlotId,
    handlers: Vec<HandlerInfo>,
}

/// An in-memory scene with tools and users.
#[derive(Debug)]
pub struct World {
    slots: HashMap<SlotId, SlotData>,
    root: SlotId,
    assets_root: SlotId,
    ambient: HashMap<AssetKind, AssetRef>,
    tools: HashMap<ToolId, Tool>,
    users: HashMap<UserId, UserData>,
    next_slot: u64,
    next_tool: u64,
    next_user: u64,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Creates a world holding only the root and the shared assets slot.
    #[must_use]
    pub fn new() -> Self {
        let root = SlotId::from_raw(0);
        let assets_root = SlotId::from_raw(1);

        let mut root_data = SlotData::new("Root".to_owned(), None);
        root_data.children.push(assets_root);

        let mut slots = HashMap::new();
        slots.insert(root, root_data);
        slots.insert(assets_root, SlotData::new("Assets".to_owned(), Some(root)));

        Self {
            slots,
            root,
            assets_root,
            ambient: HashMap::new(),
            tools: HashMap::new(),
            users: HashMap::new(),
            next_slot: 2,
            next_tool: 0,
            next_user: 0,
        }
    }

    /// The root slot.
    #[must_use]
    pub fn root(&self) -> SlotId {
        self.root
    }

    /// Where assets that outlive their slot are re-homed.
    #[must_use]
    pub fn assets_root(&self) -> SlotId {
        self.assets_root
    }

    // ─────────────────────────────────────────────────────────────────────
    // Slots
    // ─────────────────────────────────────────────────────────────────────

    /// Creates an empty slot at the end of `parent`'s children.
    ///
    /// # Errors
    ///
    /// Fails if `parent` does not exist.
    pub fn spawn(&mut self, parent: SlotId, name: impl Into<String>) -> Result<SlotId, SceneError> {
        let parent_data = self
            .slots
            .get_mut(&parent)
            .ok_or(SceneError::MissingSlot(parent))?;

        let id = SlotId::from_raw(self.next_slot);
        self.next_slot += 1;
        parent_data.children.push(id);
        self.slots.insert(id, SlotData::new(name.into(), Some(parent)));
        Ok(id)
    }

    /// Spawns a slot that hosts `asset` and carries its marker. Orbs and
    /// freshly created assets have this shape.
    ///
    /// # Errors
    ///
    /// Fails if `parent` does not exist.
    pub fn spawn_asset_container(
        &mut self,
        parent: SlotId,
        asset: AssetRef,
    ) -> Result<SlotId, SceneError> {
        let slot = self.spawn(parent, asset.name().to_owned())?;
        self.host_asset(slot, asset.clone())?;
        self.attach_marker(slot, asset)?;
        Ok(slot)
    }

    /// The slot's name.
    #[must_use]
    pub fn name(&self, slot: SlotId) -> Option<&str> {
        self.slots.get(&slot).map(|s| s.name.as_str())
    }

    /// The slot's parent. `None` for the root and for missing slots.
    #[must_use]
    pub fn parent(&self, slot: SlotId) -> Option<SlotId> {
        self.slots.get(&slot).and_then(|s| s.parent)
    }

    /// The slot's local transform.
    #[must_use]
    pub fn transform(&self, slot: SlotId) -> Option<Transform> {
        self.slots.get(&slot).map(|s| s.transform)
    }

    /// Sets the slot's local transform.
    ///
    /// # Errors
    ///
    /// Fails if the slot does not exist.
    pub fn set_transform(&mut self, slot: SlotId, transform: Transform) -> Result<(), SceneError> {
        self.slot_mut(slot)?.transform = transform;
        Ok(())
    }

    /// Attaches an asset marker, replacing any marker of the same kind.
    ///
    /// # Errors
    ///
    /// Fails if the slot does not exist.
    pub fn attach_marker(&mut self, slot: SlotId, asset: AssetRef) -> Result<(), SceneError> {
        let data = self.slot_mut(slot)?;
        data.markers.retain(|m| m.kind != asset.kind());
        data.markers.push(Marker {
            kind: asset.kind(),
            target: Some(asset),
        });
        Ok(())
    }

    /// Empties the marker of `kind` on `slot`, as when the asset it pointed
    /// at is released. The marker itself stays attached.
    ///
    /// Returns false if the slot has no such marker.
    ///
    /// # Errors
    ///
    /// Fails if the slot does not exist.
    pub fn release_marker(&mut self, slot: SlotId, kind: AssetKind) -> Result<bool, SceneError> {
        let data = self.slot_mut(slot)?;
        match data.markers.iter_mut().find(|m| m.kind == kind) {
            Some(marker) => {
                marker.target = None;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Makes `slot` the home of an asset resource.
    ///
    /// # Errors
    ///
    /// Fails if the slot does not exist.
    pub fn host_asset(&mut self, slot: SlotId, asset: AssetRef) -> Result<(), SceneError> {
        let data = self.slot_mut(slot)?;
        if !data.hosted.contains(&asset) {
            data.hosted.push(asset);
        }
        Ok(())
    }

    /// Asset resources hosted on `slot`.
    #[must_use]
    pub fn hosted(&self, slot: SlotId) -> Vec<AssetRef> {
        self.slots
            .get(&slot)
            .map(|s| s.hosted.clone())
            .unwrap_or_default()
    }

    /// Returns true if some slot in the world still hosts `asset`.
    #[must_use]
    pub fn is_hosted(&self, asset: &AssetRef) -> bool {
        self.slots.values().any(|s| s.hosted.contains(asset))
    }

    /// Puts a renderer on `slot`.
    ///
    /// # Errors
    ///
    /// Fails if the slot does not exist.
    pub fn set_renderer(&mut self, slot: SlotId, renderer: Renderer) -> Result<(), SceneError> {
        self.slot_mut(slot)?.renderer = Some(renderer);
        Ok(())
    }

    /// Sets the skybox material, the fallback for material probes that hit
    /// nothing.
    pub fn set_skybox(&mut self, material: AssetRef) {
        self.ambient.insert(AssetKind::Material, material);
    }

    /// Number of live slots, structural ones included.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    fn slot_mut(&mut self, slot: SlotId) -> Result<&mut SlotData, SceneError> {
        self.slots.get_mut(&slot).ok_or(SceneError::MissingSlot(slot))
    }

    fn is_protected(&self, slot: SlotId) -> bool {
        slot == self.root || slot == self.assets_root
    }

    fn subtree(&self, slot: SlotId) -> Vec<SlotId> {
        let mut out = Vec::new();
        let mut stack = vec![slot];
        while let Some(current) = stack.pop() {
            if let Some(data) = self.slots.get(&current) {
                out.push(current);
                stack.extend(data.children.iter().rev().copied());
            }
        }
        out
    }

    fn is_referenced(&self, asset: &AssetRef) -> bool {
        self.slots.values().any(|s| s.references(asset))
            || self
                .tools
                .values()
                .any(|t| matches!(&t.held, Some(HeldReference::Asset(held)) if held == asset))
            || self.ambient.values().any(|a| a == asset)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Users and tools
    // ─────────────────────────────────────────────────────────────────────

    /// Adds a user with a personal space slot and one empty handler per hand.
    ///
    /// # Errors
    ///
    /// Propagates failure to create the user's space slot.
    pub fn add_user(&mut self, primary: Side) -> Result<UserId, SceneError> {
        let id = UserId::from_raw(self.next_user);
        self.next_user += 1;

        let space = self.spawn(self.root, format!("User Space {}", id))?;
        let handlers = [Side::Left, Side::Right]
            .into_iter()
            .map(|side| HandlerInfo {
                side,
                primary: side == primary,
                active_tool: None,
            })
            .collect();

        self.users.insert(id, UserData { space, handlers });
        Ok(id)
    }

    /// The user's personal space.
    #[must_use]
    pub fn user_space(&self, user: UserId) -> Option<SlotId> {
        self.users.get(&user).map(|u| u.space)
    }

    /// Creates a tool with its own slot and an empty orb slot.
    ///
    /// The tool probes by default. Dropped orbs go to `user_space`.
    ///
    /// # Errors
    ///
    /// Fails if `user_space` does not exist.
    pub fn add_tool(&mut self, kind: AssetKind, user_space: SlotId) -> Result<ToolId, SceneError> {
        if !self.contains(user_space) {
            return Err(SceneError::MissingSlot(user_space));
        }
        let tool_slot = self.spawn(self.root, format!("{} Tool", kind))?;
        let orb_slot = self.spawn(tool_slot, "Orb Slot")?;

        let id = ToolId::from_raw(self.next_tool);
        self.next_tool += 1;
        self.tools.insert(
            id,
            Tool {
                id,
                kind,
                orb_slot,
                held: None,
                uses_probe: true,
                user_space,
            },
        );
        Ok(id)
    }

    /// Mutable access to a tool.
    pub fn tool_mut(&mut self, id: ToolId) -> Option<&mut Tool> {
        self.tools.get_mut(&id)
    }

    /// Sets the active tool of one of the user's hands.
    ///
    /// Returns false if the user is unknown.
    pub fn equip(&mut self, user: UserId, side: Side, tool: Option<ToolId>) -> bool {
        let Some(data) = self.users.get_mut(&user) else {
            return false;
        };
        for handler in data.handlers.iter_mut().filter(|h| h.side == side) {
            handler.active_tool = tool;
        }
        true
    }
}

impl SceneGraph for World {
    fn contains(&self, slot: SlotId) -> bool {
        self.slots.contains_key(&slot)
    }

    fn children(&self, slot: SlotId) -> Vec<SlotId> {
        self.slots
            .get(&slot)
            .map(|s| s.children.clone())
            .unwrap_or_default()
    }

    fn has_marker(&self, slot: SlotId, kind: AssetKind) -> bool {
        self.slots
            .get(&slot)
            .is_some_and(|s| s.markers.iter().any(|m| m.kind == kind))
    }

    fn marker(&self, slot: SlotId, kind: AssetKind) -> Option<AssetRef> {
        self.slots
            .get(&slot)?
            .markers
            .iter()
            .find(|m| m.kind == kind)?
            .target
            .clone()
    }

    fn rendered_asset(&self, slot: SlotId, kind: AssetKind) -> Option<AssetRef> {
        self.slots.get(&slot)?.renderer.as_ref()?.get(kind).cloned()
    }

    fn ambient_asset(&self, kind: AssetKind) -> Option<AssetRef> {
        self.ambient.get(&kind).cloned()
    }

    fn set_parent(&mut self, slot: SlotId, parent: SlotId) -> Result<(), SceneError> {
        if !self.contains(slot) {
            return Err(SceneError::MissingSlot(slot));
        }
        if !self.contains(parent) {
            return Err(SceneError::MissingSlot(parent));
        }
        if self.is_protected(slot) {
            return Err(SceneError::Protected(slot));
        }

        let mut cursor = Some(parent);
        while let Some(current) = cursor {
            if current == slot {
                return Err(SceneError::Cycle {
                    child: slot,
                    parent,
                });
            }
            cursor = self.parent(current);
        }

        if let Some(old) = self.parent(slot)
            && let Some(old_data) = self.slots.get_mut(&old)
        {
            old_data.children.retain(|c| *c != slot);
        }
        self.slot_mut(parent)?.children.push(slot);
        self.slot_mut(slot)?.parent = Some(parent);
        Ok(())
    }

    fn set_identity_transform(&mut self, slot: SlotId) -> Result<(), SceneError> {
        self.set_transform(slot, Transform::IDENTITY)
    }

    fn destroy_preserving_assets(&mut self, slot: SlotId) -> Result<(), SceneError> {
        if !self.contains(slot) {
            return Err(SceneError::MissingSlot(slot));
        }
        if self.is_protected(slot) {
            return Err(SceneError::Protected(slot));
        }

        if let Some(parent) = self.parent(slot)
            && let Some(parent_data) = self.slots.get_mut(&parent)
        {
            parent_data.children.retain(|c| *c != slot);
        }

        let doomed: HashSet<SlotId> = self.subtree(slot).into_iter().collect();
        let mut orphaned = Vec::new();
        for id in &doomed {
            if let Some(data) = self.slots.remove(id) {
                orphaned.extend(data.hosted);
            }
        }

        for asset in orphaned {
            if self.is_referenced(&asset) {
                debug!(asset = %asset, from = %slot, "re-homing shared asset");
                self.slots
                    .get_mut(&self.assets_root)
                    .ok_or(SceneError::MissingSlot(self.assets_root))?
                    .hosted
                    .push(asset);
            }
        }
        Ok(())
    }
}

impl ToolRig for World {
    fn tool(&self, id: ToolId) -> Option<Tool> {
        self.tools.get(&id).cloned()
    }

    fn handlers(&self, user: UserId) -> Vec<HandlerInfo> {
        self.users
            .get(&user)
            .map(|u| u.handlers.clone())
            .unwrap_or_default()
    }
}
