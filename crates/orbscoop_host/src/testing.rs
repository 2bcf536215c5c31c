//! Test fixtures.
//!
//! Available with the `test-utils` feature.

use crate::asset::{AssetKind, AssetRef};
use crate::probe::{Probe, Prober};
use crate::scene::{SceneGraph, SlotId};
use crate::tool::{Side, Tool, ToolId, ToolRig, UserId};
use crate::world::World;

/// A world with one right-handed user holding one tool in the right hand.
#[derive(Debug)]
pub struct Rig {
    /// The world.
    pub world: World,
    /// The user.
    pub user: UserId,
    /// The user's space, where dropped orbs land.
    pub user_space: SlotId,
    /// The equipped tool.
    pub tool: ToolId,
    /// The tool's orb slot.
    pub orb_slot: SlotId,
}

impl Rig {
    /// A rig holding a material tool.
    #[must_use]
    pub fn material() -> Self {
        Self::new(AssetKind::Material)
    }

    /// A rig holding a mesh tool.
    #[must_use]
    pub fn mesh() -> Self {
        Self::new(AssetKind::Mesh)
    }

    /// A rig holding a tool of `kind`.
    ///
    /// # Panics
    ///
    /// Never in practice; world setup on a fresh world cannot fail.
    #[must_use]
    pub fn new(kind: AssetKind) -> Self {
        let mut world = World::new();
        let user = world.add_user(Side::Right).expect("fresh world");
        let user_space = world.user_space(user).expect("user was just added");
        let tool = world.add_tool(kind, user_space).expect("user space exists");
        world.equip(user, Side::Right, Some(tool));
        let orb_slot = world.tool(tool).expect("tool was just added").orb_slot;

        Self {
            world,
            user,
            user_space,
            tool,
            orb_slot,
        }
    }

    /// Snapshot of the equipped tool.
    ///
    /// # Panics
    ///
    /// If the tool was removed from the world.
    #[must_use]
    pub fn tool(&self) -> Tool {
        self.world.tool(self.tool).expect("rig tool exists")
    }

    /// Adds an orb carrying `asset` under the tool's orb slot.
    ///
    /// # Panics
    ///
    /// If the orb slot was destroyed.
    pub fn add_orb(&mut self, asset: &AssetRef) -> SlotId {
        self.world
            .spawn_asset_container(self.orb_slot, asset.clone())
            .expect("orb slot exists")
    }

    /// Adds a purely visual child under the tool's orb slot.
    ///
    /// # Panics
    ///
    /// If the orb slot was destroyed.
    pub fn add_decoration(&mut self) -> SlotId {
        self.world
            .spawn(self.orb_slot, "Decoration")
            .expect("orb slot exists")
    }

    /// Current children of the orb slot, oldest first.
    #[must_use]
    pub fn orbs(&self) -> Vec<SlotId> {
        self.world.children(self.orb_slot)
    }
}

/// Prober that always returns the same answer.
#[derive(Debug, Clone)]
pub struct FixedProber(pub Probe);

impl Prober for FixedProber {
    fn probe(&self, _tool: &Tool, _scene: &dyn SceneGraph) -> Probe {
        self.0.clone()
    }
}
