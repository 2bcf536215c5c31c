//! Directional probing.
//!
//! A probe answers "what is this tool pointing at?". The answer keeps three
//! cases apart: nothing was hit, something was hit and has an asset of the
//! tool's kind, and something was hit that has none.

use hashbrown::HashMap;
use parking_lot::RwLock;

use crate::asset::AssetRef;
use crate::scene::{SceneGraph, SlotId};
use crate::tool::{Tool, ToolId};

/// Result of a probe.
#[derive(Debug, Clone, PartialEq)]
pub enum Probe {
    /// The probe hit nothing.
    Miss,
    /// The probe hit an object; `asset` is what it renders with, if anything.
    Hit {
        /// Asset of the tool's kind found on the hit object.
        asset: Option<AssetRef>,
    },
}

/// Host capability that probes along a tool's aim.
pub trait Prober: Send + Sync + 'static {
    /// Probes from `tool` into `scene`.
    fn probe(&self, tool: &Tool, scene: &dyn SceneGraph) -> Probe;
}

/// Where a tool's laser points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aim {
    /// Pointing at open space.
    Nothing,
    /// Pointing at a slot.
    Slot(SlotId),
}

/// Prober backed by an explicit aim table.
///
/// Tools without an entry aim at nothing. An aim at a slot that no longer
/// exists also reports a miss.
#[derive(Debug, Default)]
pub struct LaserProber {
    aims: RwLock<HashMap<ToolId, Aim>>,
}

impl LaserProber {
    /// Creates a prober where every tool aims at nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Points `tool` at `aim`.
    pub fn aim(&self, tool: ToolId, aim: Aim) {
        self.aims.write().insert(tool, aim);
    }

    /// Current aim of `tool`.
    #[must_use]
    pub fn aim_of(&self, tool: ToolId) -> Aim {
        self.aims.read().get(&tool).copied().unwrap_or(Aim::Nothing)
    }
}

impl Prober for LaserProber {
    fn probe(&self, tool: &Tool, scene: &dyn SceneGraph) -> Probe {
        match self.aim_of(tool.id) {
            Aim::Slot(slot) if scene.contains(slot) => Probe::Hit {
                asset: scene.rendered_asset(slot, tool.kind),
            },
            _ => Probe::Miss,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::AssetKind;
    use crate::tool::{Side, ToolRig};
    use crate::world::{Renderer, World};

    fn setup() -> (World, Tool) {
        let mut world = World::new();
        let user = world.add_user(Side::Right).unwrap();
        let space = world.user_space(user).unwrap();
        let id = world.add_tool(AssetKind::Material, space).unwrap();
        let tool = world.tool(id).unwrap();
        (world, tool)
    }

    #[test]
    fn unaimed_tool_misses() {
        let (world, tool) = setup();
        assert_eq!(LaserProber::new().probe(&tool, &world), Probe::Miss);
    }

    #[test]
    fn hit_reports_asset_of_tool_kind() {
        let (mut world, tool) = setup();
        let brick = AssetRef::material("Brick");
        let wall = world.spawn(world.root(), "Wall").unwrap();
        world
            .set_renderer(
                wall,
                Renderer {
                    material: Some(brick.clone()),
                    mesh: Some(AssetRef::mesh("Quad")),
                },
            )
            .unwrap();

        let prober = LaserProber::new();
        prober.aim(tool.id, Aim::Slot(wall));

        assert_eq!(
            prober.probe(&tool, &world),
            Probe::Hit { asset: Some(brick) }
        );
    }

    #[test]
    fn hit_without_renderer_has_no_asset() {
        let (mut world, tool) = setup();
        let empty = world.spawn(world.root(), "Empty").unwrap();

        let prober = LaserProber::new();
        prober.aim(tool.id, Aim::Slot(empty));

        assert_eq!(prober.probe(&tool, &world), Probe::Hit { asset: None });
    }

    #[test]
    fn aim_at_destroyed_slot_misses() {
        let (mut world, tool) = setup();
        let gone = world.spawn(world.root(), "Gone").unwrap();
        world.destroy_preserving_assets(gone).unwrap();

        let prober = LaserProber::new();
        prober.aim(tool.id, Aim::Slot(gone));

        assert_eq!(prober.probe(&tool, &world), Probe::Miss);
    }
}
