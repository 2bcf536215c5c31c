//! Target resolution for tools.
//!
//! The order is fixed:
//!
//! 1. an asset the user holds, if it matches the tool's kind
//! 2. otherwise, for probing tools, what the probe hit
//! 3. a probe that hit nothing falls back to the scene's ambient asset
//!
//! A probe that hit an object without an asset of the tool's kind resolves
//! to nothing. It does not fall back.

use std::sync::Arc;

use orbscoop_host::asset::AssetRef;
use orbscoop_host::probe::{Probe, Prober};
use orbscoop_host::scene::SceneGraph;
use orbscoop_host::tool::Tool;
use tracing::trace;

/// Computes the asset a tool is about to apply.
#[derive(Clone)]
pub struct TargetResolver {
    prober: Arc<dyn Prober>,
}

impl TargetResolver {
    /// Creates a resolver probing through `prober`.
    #[must_use]
    pub fn new(prober: Arc<dyn Prober>) -> Self {
        Self { prober }
    }

    /// Resolves the tool's target asset.
    #[must_use]
    pub fn resolve(&self, scene: &dyn SceneGraph, tool: &Tool) -> Option<AssetRef> {
        if let Some(held) = tool.held_asset().filter(|a| a.kind() == tool.kind) {
            trace!(tool = %tool.id, asset = %held, "target from held reference");
            return Some(held.clone());
        }

        if !tool.uses_probe {
            return None;
        }

        match self.prober.probe(tool, scene) {
            Probe::Hit { asset } => {
                trace!(tool = %tool.id, found = asset.is_some(), "probe hit");
                asset
            }
            Probe::Miss => {
                trace!(tool = %tool.id, "probe missed, using ambient asset");
                scene.ambient_asset(tool.kind)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orbscoop_host::asset::AssetKind;
    use orbscoop_host::testing::{FixedProber, Rig};
    use orbscoop_host::tool::HeldReference;

    fn resolver(probe: Probe) -> TargetResolver {
        TargetResolver::new(Arc::new(FixedProber(probe)))
    }

    fn skybox_rig() -> (Rig, AssetRef) {
        let mut rig = Rig::material();
        let skybox = AssetRef::material("Skybox");
        rig.world.set_skybox(skybox.clone());
        (rig, skybox)
    }

    #[test]
    fn held_asset_wins_over_probe() {
        let (mut rig, _) = skybox_rig();
        let held = AssetRef::material("Held");
        rig.world.tool_mut(rig.tool).unwrap().held = Some(HeldReference::Asset(held.clone()));

        let hit = AssetRef::material("Hit");
        let target = resolver(Probe::Hit { asset: Some(hit) }).resolve(&rig.world, &rig.tool());
        assert_eq!(target, Some(held));
    }

    #[test]
    fn held_asset_of_other_kind_is_ignored() {
        let (mut rig, _) = skybox_rig();
        rig.world.tool_mut(rig.tool).unwrap().held =
            Some(HeldReference::Asset(AssetRef::mesh("Cube")));

        let hit = AssetRef::material("Hit");
        let target = resolver(Probe::Hit {
            asset: Some(hit.clone()),
        })
        .resolve(&rig.world, &rig.tool());
        assert_eq!(target, Some(hit));
    }

    #[test]
    fn probe_hit_returns_its_asset() {
        let (rig, _) = skybox_rig();
        let hit = AssetRef::material("Hit");
        let target = resolver(Probe::Hit {
            asset: Some(hit.clone()),
        })
        .resolve(&rig.world, &rig.tool());
        assert_eq!(target, Some(hit));
    }

    #[test]
    fn probe_miss_falls_back_to_ambient() {
        let (rig, skybox) = skybox_rig();
        let target = resolver(Probe::Miss).resolve(&rig.world, &rig.tool());
        assert_eq!(target, Some(skybox));
    }

    #[test]
    fn hit_without_asset_does_not_fall_back() {
        let (rig, _) = skybox_rig();
        let target = resolver(Probe::Hit { asset: None }).resolve(&rig.world, &rig.tool());
        assert_eq!(target, None);
    }

    #[test]
    fn non_probing_tool_without_hold_resolves_nothing() {
        let (mut rig, _) = skybox_rig();
        rig.world.tool_mut(rig.tool).unwrap().uses_probe = false;

        let target = resolver(Probe::Miss).resolve(&rig.world, &rig.tool());
        assert_eq!(target, None);
    }

    #[test]
    fn mesh_miss_has_no_ambient_asset() {
        let mut rig = Rig::mesh();
        rig.world.set_skybox(AssetRef::material("Skybox"));

        let target = resolver(Probe::Miss).resolve(&rig.world, &rig.tool());
        assert_eq!(target, None);
        assert_eq!(rig.tool().kind, AssetKind::Mesh);
    }
}
