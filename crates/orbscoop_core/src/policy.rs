//! The orb lifecycle policy engine.
//!
//! When a tool is about to pick up a new asset, the orbs it already carries
//! are either destroyed (their container is removed, shared assets survive)
//! or dropped (reparented into the user's space with their asset intact).
//! [`LifecyclePolicyEngine::decide`] makes that call per orb from the active
//! [`PolicyMode`]; [`LifecyclePolicyEngine::apply_policy`] runs it over a
//! whole orb slot.
//!
//! Decorative children of the orb slot are never touched.

use orbscoop_host::asset::{AssetKind, AssetRef};
use orbscoop_host::scene::{SceneGraph, SlotId};
use orbscoop_host::tool::Tool;
use tracing::{debug, info, warn};

use crate::config::{PolicyMode, PolicyStore};
use crate::registry::{Orb, OrbKind, OrbRegistry};
use crate::resolver::TargetResolver;

/// What to do with one asset orb.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Remove the container, preserving shared assets.
    Destroy,
    /// Move the container into the user's space.
    Drop,
}

/// Why a pass did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The feature is switched off.
    Disabled,
    /// No target asset was resolved.
    NoTarget,
    /// The tool already holds the target asset.
    TargetUnchanged,
    /// The orb slot has no children.
    EmptyOrbSlot,
    /// The user is holding a scene object rather than an asset.
    HoldingContainer,
}

/// A mutation performed by a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrbAction {
    /// The orb's container was destroyed.
    Destroyed(SlotId),
    /// The orb's container was moved into the user's space.
    Dropped(SlotId),
}

/// Result of a policy pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyOutcome {
    /// Nothing happened.
    Skipped(SkipReason),
    /// The pass ran. The list can be empty when only decorative children
    /// were present.
    Applied(Vec<OrbAction>),
}

impl PolicyOutcome {
    /// The mutations performed, empty when skipped.
    #[must_use]
    pub fn actions(&self) -> &[OrbAction] {
        match self {
            PolicyOutcome::Applied(actions) => actions,
            PolicyOutcome::Skipped(_) => &[],
        }
    }

    /// The skip reason, if the pass was skipped.
    #[must_use]
    pub fn skip_reason(&self) -> Option<SkipReason> {
        match self {
            PolicyOutcome::Skipped(reason) => Some(*reason),
            PolicyOutcome::Applied(_) => None,
        }
    }
}

/// Applies the configured [`PolicyMode`] to a tool's orbs.
#[derive(Debug, Clone)]
pub struct LifecyclePolicyEngine {
    store: PolicyStore,
}

impl LifecyclePolicyEngine {
    /// Creates an engine reading its settings from `store`.
    #[must_use]
    pub fn new(store: PolicyStore) -> Self {
        Self { store }
    }

    /// The store this engine reads.
    #[must_use]
    pub fn store(&self) -> &PolicyStore {
        &self.store
    }

    /// Decides the fate of one orb.
    ///
    /// In [`PolicyMode::DestroyIfUnreferenced`] only the presence of an
    /// asset counts. An orb holding some other asset than the new target is
    /// still dropped.
    #[must_use]
    pub fn decide(orb: &Orb, mode: PolicyMode) -> Disposition {
        match mode {
            PolicyMode::AlwaysDestroy => Disposition::Destroy,
            PolicyMode::AlwaysDrop => Disposition::Drop,
            PolicyMode::DestroyIfUnreferenced => {
                if orb.asset.is_none() {
                    Disposition::Destroy
                } else {
                    Disposition::Drop
                }
            }
        }
    }

    /// Clears the tool's orb slot ahead of `new_target`.
    ///
    /// Skips when disabled, when there is no target, when the orb slot
    /// already holds `new_target`, or when the orb slot is empty. Otherwise
    /// visits the orb slot's children newest first and destroys or drops
    /// each asset orb.
    ///
    /// A scene error on one orb is logged and the pass moves on.
    pub fn apply_policy<S: SceneGraph + ?Sized>(
        &self,
        scene: &mut S,
        tool: &Tool,
        new_target: Option<&AssetRef>,
    ) -> PolicyOutcome {
        let config = self.store.snapshot();
        if !config.enabled {
            return skip(tool, SkipReason::Disabled);
        }
        let Some(target) = new_target else {
            return skip(tool, SkipReason::NoTarget);
        };
        if OrbRegistry::get_asset(&*scene, tool.orb_slot, tool.kind).as_ref() == Some(target) {
            return skip(tool, SkipReason::TargetUnchanged);
        }
        if scene.children(tool.orb_slot).is_empty() {
            return skip(tool, SkipReason::EmptyOrbSlot);
        }

        let mut actions = Vec::new();
        for orb in OrbRegistry::list(&*scene, tool.orb_slot, tool.kind) {
            if orb.kind == OrbKind::Decorative {
                continue;
            }

            let result = match Self::decide(&orb, config.scoop_mode) {
                Disposition::Destroy => scene
                    .destroy_preserving_assets(orb.container)
                    .map(|()| OrbAction::Destroyed(orb.container)),
                Disposition::Drop => scene
                    .set_parent(orb.container, tool.user_space)
                    .map(|()| OrbAction::Dropped(orb.container)),
            };

            match result {
                Ok(action) => actions.push(action),
                Err(error) => {
                    warn!(tool = %tool.id, orb = %orb.container, %error, "orb could not be cleared");
                }
            }
        }

        info!(
            tool = %tool.id,
            target = %target,
            mode = %config.scoop_mode,
            cleared = actions.len(),
            "orb policy applied"
        );
        PolicyOutcome::Applied(actions)
    }

    /// Secondary-press pass: resolves the tool's target and applies the
    /// policy against it.
    ///
    /// A material tool whose user holds a scene object is left alone.
    pub fn scoop<S: SceneGraph>(
        &self,
        scene: &mut S,
        resolver: &TargetResolver,
        tool: &Tool,
    ) -> PolicyOutcome {
        if !self.store.enabled() {
            return skip(tool, SkipReason::Disabled);
        }
        if tool.kind == AssetKind::Material && tool.holds_container() {
            return skip(tool, SkipReason::HoldingContainer);
        }

        let target = resolver.resolve(&*scene, tool);
        self.apply_policy(scene, tool, target.as_ref())
    }
}

fn skip(tool: &Tool, reason: SkipReason) -> PolicyOutcome {
    debug!(tool = %tool.id, ?reason, "orb policy skipped");
    PolicyOutcome::Skipped(reason)
}
