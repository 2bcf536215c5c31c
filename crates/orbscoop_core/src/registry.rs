//! Orb enumeration and classification.

use orbscoop_host::asset::{AssetKind, AssetRef};
use orbscoop_host::scene::{SceneGraph, SlotId};

/// Whether a child of an orb slot takes part in policy decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrbKind {
    /// Carries an asset marker of the pass's kind.
    AssetOrb,
    /// Anything else under the orb slot, such as visuals.
    Decorative,
}

/// A child of a tool's orb slot, as seen by one policy pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Orb {
    /// The child slot.
    pub container: SlotId,
    /// The asset its marker points at. Absent for decorative children and
    /// for emptied markers.
    pub asset: Option<AssetRef>,
    /// Classification for the pass's asset kind.
    pub kind: OrbKind,
}

/// Reads orbs out of the scene.
///
/// Nothing is cached; every call inspects the scene as it is now.
pub struct OrbRegistry;

impl OrbRegistry {
    /// Lists the children of `orb_slot`, newest first.
    ///
    /// Walking newest first means removing a visited orb never disturbs the
    /// ones still to visit.
    #[must_use]
    pub fn list<S: SceneGraph + ?Sized>(scene: &S, orb_slot: SlotId, kind: AssetKind) -> Vec<Orb> {
        scene
            .children(orb_slot)
            .into_iter()
            .rev()
            .map(|container| Orb {
                container,
                asset: scene.marker(container, kind),
                kind: Self::classify(scene, container, kind),
            })
            .collect()
    }

    /// [`OrbKind::AssetOrb`] iff `container` itself carries a marker of
    /// `kind`.
    #[must_use]
    pub fn classify<S: SceneGraph + ?Sized>(scene: &S, container: SlotId, kind: AssetKind) -> OrbKind {
        if scene.has_marker(container, kind) {
            OrbKind::AssetOrb
        } else {
            OrbKind::Decorative
        }
    }

    /// The asset of the first marker of `kind` on `container` or below it.
    ///
    /// Applied to an orb slot, this is the asset the tool currently holds.
    #[must_use]
    pub fn get_asset<S: SceneGraph + ?Sized>(
        scene: &S,
        container: SlotId,
        kind: AssetKind,
    ) -> Option<AssetRef> {
        scene.find_marker(container, kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orbscoop_host::testing::Rig;

    #[test]
    fn list_is_newest_first_and_classified() {
        let mut rig = Rig::material();
        let brick = AssetRef::material("Brick");
        let first = rig.add_orb(&brick);
        let deco = rig.add_decoration();
        let last = rig.add_orb(&AssetRef::material("Glass"));

        let orbs = OrbRegistry::list(&rig.world, rig.orb_slot, AssetKind::Material);
        let containers: Vec<SlotId> = orbs.iter().map(|o| o.container).collect();
        assert_eq!(containers, vec![last, deco, first]);

        assert_eq!(orbs[1].kind, OrbKind::Decorative);
        assert_eq!(orbs[1].asset, None);
        assert_eq!(orbs[2].kind, OrbKind::AssetOrb);
        assert_eq!(orbs[2].asset, Some(brick));
    }

    #[test]
    fn classification_is_per_kind() {
        let mut rig = Rig::mesh();
        let material_orb = rig.add_orb(&AssetRef::material("Brick"));

        assert_eq!(
            OrbRegistry::classify(&rig.world, material_orb, AssetKind::Mesh),
            OrbKind::Decorative
        );
        assert_eq!(
            OrbRegistry::classify(&rig.world, material_orb, AssetKind::Material),
            OrbKind::AssetOrb
        );
    }

    #[test]
    fn emptied_marker_is_still_an_asset_orb() {
        let mut rig = Rig::material();
        let orb = rig.add_orb(&AssetRef::material("Released"));
        rig.world.release_marker(orb, AssetKind::Material).unwrap();

        let orbs = OrbRegistry::list(&rig.world, rig.orb_slot, AssetKind::Material);
        assert_eq!(
            orbs,
            vec![Orb {
                container: orb,
                asset: None,
                kind: OrbKind::AssetOrb,
            }]
        );
    }

    #[test]
    fn get_asset_finds_nested_marker() {
        let mut rig = Rig::material();
        let wrapper = rig.add_decoration();
        let brick = AssetRef::material("Brick");
        rig.world.spawn_asset_container(wrapper, brick.clone()).unwrap();

        assert_eq!(
            OrbRegistry::get_asset(&rig.world, rig.orb_slot, AssetKind::Material),
            Some(brick)
        );
        assert_eq!(
            OrbRegistry::classify(&rig.world, wrapper, AssetKind::Material),
            OrbKind::Decorative
        );
    }

    #[test]
    fn list_reflects_current_scene() {
        let mut rig = Rig::material();
        let orb = rig.add_orb(&AssetRef::material("Brick"));
        assert_eq!(OrbRegistry::list(&rig.world, rig.orb_slot, AssetKind::Material).len(), 1);

        rig.world.destroy_preserving_assets(orb).unwrap();
        assert!(OrbRegistry::list(&rig.world, rig.orb_slot, AssetKind::Material).is_empty());
    }
}
