//! Equipping freshly created assets onto the creator's tool.
//!
//! When a user creates a new asset container, the matching tool in their
//! hand should pick it up as its orb, clearing the old orbs by the active
//! policy first. The host signals creation before its creation callbacks
//! have filled the container, so the equip is deferred one frame through the
//! [`DeferredHookScheduler`] and inspects the container only when it runs.

use orbscoop_host::asset::{AssetKind, AssetRef};
use orbscoop_host::scene::{SceneGraph, SlotId};
use orbscoop_host::tool::{HandlerInfo, Tool, ToolId, ToolRig, UserId};
use orbscoop_system::resource::Resources;
use tracing::{debug, info, warn};

use crate::policy::LifecyclePolicyEngine;
use crate::registry::OrbRegistry;
use crate::scheduler::DeferredHookScheduler;

/// Auto-equip of created assets.
#[derive(Debug, Clone)]
pub struct AutoEquip {
    engine: LifecyclePolicyEngine,
}

impl AutoEquip {
    /// Creates the auto-equip path on top of `engine`.
    #[must_use]
    pub fn new(engine: LifecyclePolicyEngine) -> Self {
        Self { engine }
    }

    /// Handles a creation signal by deferring [`equip`](Self::equip) to the
    /// next frame.
    ///
    /// The deferred action borrows the host `H` from the session resources.
    /// Returns false when nothing was scheduled because the feature or the
    /// auto-equip option is off.
    pub fn on_created<H>(&self, scheduler: &DeferredHookScheduler, container: SlotId, user: UserId) -> bool
    where
        H: SceneGraph + ToolRig,
    {
        let config = self.engine.store().snapshot();
        if !config.enabled || !config.scoop_material_on_created {
            debug!(%container, %user, "auto-equip is off");
            return false;
        }

        let this = self.clone();
        scheduler.schedule(
            0,
            Box::new(move |resources: &Resources| {
                let mut host = match resources.get_mut::<H>() {
                    Ok(host) => host,
                    Err(error) => {
                        warn!(%container, %error, "auto-equip could not reach the scene");
                        return;
                    }
                };
                this.equip(&mut *host, container, user);
            }),
        )
    }

    /// Equips `container` onto the first of `user`'s tools matching the
    /// created asset's kind, primary hand first.
    ///
    /// Does nothing if the container is gone, carries no asset, or no hand
    /// holds a matching tool. Returns the tool that took the container.
    pub fn equip<H>(&self, host: &mut H, container: SlotId, user: UserId) -> Option<ToolId>
    where
        H: SceneGraph + ToolRig,
    {
        if !host.contains(container) {
            debug!(%container, "created container is gone");
            return None;
        }
        let Some(asset) = created_asset(&*host, container) else {
            debug!(%container, "created container carries no asset");
            return None;
        };
        let Some(tool) = pick_tool(&*host, user, asset.kind()) else {
            debug!(%container, %user, kind = %asset.kind(), "no matching tool in hand");
            return None;
        };

        self.engine.apply_policy(host, &tool, Some(&asset));

        let attached = host
            .set_parent(container, tool.orb_slot)
            .and_then(|()| host.set_identity_transform(container));
        if let Err(error) = attached {
            warn!(%container, tool = %tool.id, %error, "created asset could not be equipped");
            return None;
        }

        info!(%container, tool = %tool.id, asset = %asset, "created asset equipped");
        Some(tool.id)
    }
}

fn created_asset<H: SceneGraph + ?Sized>(host: &H, container: SlotId) -> Option<AssetRef> {
    AssetKind::ALL
        .into_iter()
        .find_map(|kind| OrbRegistry::get_asset(host, container, kind))
}

/// Handlers whose active tool applies `kind`, primary hand first, otherwise
/// in discovery order.
fn pick_tool<H: ToolRig + ?Sized>(host: &H, user: UserId, kind: AssetKind) -> Option<Tool> {
    let (primary, secondary): (Vec<HandlerInfo>, Vec<HandlerInfo>) =
        host.handlers(user).into_iter().partition(|h| h.primary);

    primary
        .into_iter()
        .chain(secondary)
        .filter_map(|handler| handler.active_tool)
        .filter_map(|id| host.tool(id))
        .find(|tool| tool.kind == kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PolicyMode, PolicyStore, ScoopConfig};
    use orbscoop_host::scene::Transform;
    use orbscoop_host::testing::Rig;
    use orbscoop_host::tool::Side;
    use orbscoop_host::world::World;

    fn auto_equip(mode: PolicyMode) -> AutoEquip {
        AutoEquip::new(LifecyclePolicyEngine::new(PolicyStore::new(ScoopConfig {
            scoop_mode: mode,
            ..ScoopConfig::default()
        })))
    }

    fn created(rig: &mut Rig, asset: &AssetRef) -> SlotId {
        let space = rig.user_space;
        let container = rig.world.spawn_asset_container(space, asset.clone()).unwrap();
        rig.world
            .set_transform(container, Transform::at([1.0, 2.0, 3.0]))
            .unwrap();
        container
    }

    #[test]
    fn equips_onto_matching_tool_after_policy() {
        let mut rig = Rig::material();
        let old = rig.add_orb(&AssetRef::material("Old"));
        let container = created(&mut rig, &AssetRef::material("New"));

        let equipped = auto_equip(PolicyMode::AlwaysDestroy).equip(&mut rig.world, container, rig.user);

        assert_eq!(equipped, Some(rig.tool));
        assert!(!rig.world.contains(old));
        assert_eq!(rig.orbs(), vec![container]);
        assert_eq!(rig.world.transform(container), Some(Transform::IDENTITY));
    }

    #[test]
    fn primary_hand_wins() {
        let mut rig = Rig::material();
        let off_hand = rig.world.add_tool(AssetKind::Material, rig.user_space).unwrap();
        rig.world.equip(rig.user, Side::Left, Some(off_hand));
        let container = created(&mut rig, &AssetRef::material("New"));

        let equipped = auto_equip(PolicyMode::AlwaysDrop).equip(&mut rig.world, container, rig.user);
        assert_eq!(equipped, Some(rig.tool));
    }

    #[test]
    fn falls_back_to_off_hand_when_primary_does_not_match() {
        let mut rig = Rig::mesh();
        let off_hand = rig.world.add_tool(AssetKind::Material, rig.user_space).unwrap();
        rig.world.equip(rig.user, Side::Left, Some(off_hand));
        let container = created(&mut rig, &AssetRef::material("New"));

        let equipped = auto_equip(PolicyMode::AlwaysDrop).equip(&mut rig.world, container, rig.user);

        assert_eq!(equipped, Some(off_hand));
        let orb_slot = rig.world.tool(off_hand).unwrap().orb_slot;
        assert_eq!(rig.world.parent(container), Some(orb_slot));
    }

    #[test]
    fn no_matching_tool_is_a_noop() {
        let mut rig = Rig::mesh();
        let container = created(&mut rig, &AssetRef::material("New"));

        assert_eq!(auto_equip(PolicyMode::AlwaysDestroy).equip(&mut rig.world, container, rig.user), None);
        assert_eq!(rig.world.parent(container), Some(rig.user_space));
    }

    #[test]
    fn vanished_container_is_a_noop() {
        let mut rig = Rig::material();
        let orb = rig.add_orb(&AssetRef::material("Old"));
        let container = created(&mut rig, &AssetRef::material("New"));
        rig.world.destroy_preserving_assets(container).unwrap();

        assert_eq!(auto_equip(PolicyMode::AlwaysDestroy).equip(&mut rig.world, container, rig.user), None);
        assert_eq!(rig.orbs(), vec![orb]);
    }

    #[test]
    fn empty_container_is_a_noop() {
        let mut rig = Rig::material();
        let space = rig.user_space;
        let container = rig.world.spawn(space, "Pending").unwrap();

        assert_eq!(auto_equip(PolicyMode::AlwaysDestroy).equip(&mut rig.world, container, rig.user), None);
    }

    #[test]
    fn on_created_defers_until_the_next_pass() {
        let mut resources = Resources::new();
        let mut rig = Rig::material();
        let container = created(&mut rig, &AssetRef::material("New"));
        let (user, tool) = (rig.user, rig.tool);
        resources.insert(rig.world);

        let equip = auto_equip(PolicyMode::AlwaysDestroy);
        let scheduler = DeferredHookScheduler::new(equip.engine.store().clone());
        assert!(equip.on_created::<World>(&scheduler, container, user));

        let orb_slot = resources.get::<World>().unwrap().tool(tool).unwrap().orb_slot;
        assert_ne!(resources.get::<World>().unwrap().parent(container), Some(orb_slot));

        assert_eq!(scheduler.run_due(&resources), 1);
        assert_eq!(resources.get::<World>().unwrap().parent(container), Some(orb_slot));
    }

    #[test]
    fn on_created_respects_the_option() {
        let equip = auto_equip(PolicyMode::AlwaysDestroy);
        let scheduler = DeferredHookScheduler::new(equip.engine.store().clone());
        equip.engine.store().update(|c| c.scoop_material_on_created = false);

        assert!(!equip.on_created::<World>(&scheduler, SlotId::from_raw(5), UserId::from_raw(0)));
        assert_eq!(scheduler.pending(), 0);
    }
}
