//! Click semantics: select, deselect, cascading reset.
//!
//! [`transition`] is pure and total — illegal clicks are no-ops, and the
//! previous selection is never mutated in place. Preference changes surface
//! as an annotation on the outcome; the engine performs no IO.

use tracing::debug;

use keyfit_config::{CascadePolicy, EnginePolicy};
use keyfit_types::{
    ComponentState, Dataset, ItemRef, MultiSelection, Selection, SignerWillingness,
    SingleSelection, UserPreference, WalletId,
};

use crate::derive::derive_state;
use crate::query;

/// Result of one click: the next selection, plus a preference update the
/// caller should persist, if the click implied one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionOutcome {
    pub selection: Selection,
    pub preference_update: Option<UserPreference>,
}

impl TransitionOutcome {
    fn unchanged(selection: &Selection) -> Self {
        Self {
            selection: selection.clone(),
            preference_update: None,
        }
    }
}

/// Apply one click to the selection.
#[must_use]
pub fn transition(
    dataset: &Dataset,
    selection: &Selection,
    preference: &UserPreference,
    policy: &EnginePolicy,
    item: ItemRef<'_>,
) -> TransitionOutcome {
    // Unknown ids never alter state.
    let known = match item {
        ItemRef::Signer(id) => dataset.signer(id).is_some(),
        ItemRef::Wallet(id) => dataset.wallet(id).is_some(),
        ItemRef::Node(id) => dataset.node(id).is_some(),
    };
    if !known {
        debug!(category = %item.category(), id = item.id_str(), "ignoring click on unknown item");
        return TransitionOutcome::unchanged(selection);
    }

    match selection {
        Selection::Single(single) => {
            single_transition(dataset, selection, single, preference, policy, item)
        }
        Selection::Multi(multi) => multi_transition(dataset, multi, preference, item),
    }
}

fn single_transition(
    dataset: &Dataset,
    selection: &Selection,
    single: &SingleSelection,
    preference: &UserPreference,
    policy: &EnginePolicy,
    item: ItemRef<'_>,
) -> TransitionOutcome {
    match derive_state(dataset, selection, preference, policy, item) {
        ComponentState::Inactive => hard_reset(dataset, preference, policy, item),
        ComponentState::Active => deselect(single, policy, item),
        ComponentState::Breathing => select(dataset, single, preference, policy, item),
    }
}

/// Clicking a blocked item restarts the cascade from that item: every pick
/// is dropped and the clicked item becomes the sole selection.
fn hard_reset(
    dataset: &Dataset,
    preference: &UserPreference,
    policy: &EnginePolicy,
    item: ItemRef<'_>,
) -> TransitionOutcome {
    debug!(category = %item.category(), id = item.id_str(), "hard reset");
    let mut next = SingleSelection::default();
    let mut preference_update = None;
    match item {
        ItemRef::Signer(id) => {
            next.add_signer(id.clone());
            if policy.willingness_gating
                && let Some(signer) = dataset.signer(id)
            {
                let willingness = if signer.null_signer {
                    SignerWillingness::NoSigner
                } else {
                    SignerWillingness::WithSigner
                };
                if preference.signer_willingness != willingness {
                    preference_update = Some(preference.with_willingness(willingness));
                }
            }
        }
        ItemRef::Wallet(id) => {
            next.set_wallet(Some(id.clone()));
            preference_update = align_device_type(dataset, preference, id);
        }
        ItemRef::Node(id) => next.set_node(Some(id.clone())),
    }
    TransitionOutcome {
        selection: Selection::Single(next),
        preference_update,
    }
}

fn deselect(single: &SingleSelection, policy: &EnginePolicy, item: ItemRef<'_>) -> TransitionOutcome {
    let mut next = single.clone();
    let downstream = policy.cascade == CascadePolicy::Downstream;
    match item {
        ItemRef::Signer(id) => {
            next.remove_signer(id);
            if downstream {
                next.set_wallet(None);
                next.set_node(None);
            }
        }
        ItemRef::Wallet(_) => {
            next.set_wallet(None);
            if downstream {
                next.set_node(None);
            }
        }
        ItemRef::Node(_) => next.set_node(None),
    }
    TransitionOutcome {
        selection: Selection::Single(next),
        preference_update: None,
    }
}

fn select(
    dataset: &Dataset,
    single: &SingleSelection,
    preference: &UserPreference,
    policy: &EnginePolicy,
    item: ItemRef<'_>,
) -> TransitionOutcome {
    let mut next = single.clone();
    let mut preference_update = None;
    match item {
        ItemRef::Signer(id) => next.add_signer(id.clone()),
        ItemRef::Wallet(id) => {
            next.set_wallet(Some(id.clone()));
            match policy.cascade {
                // A new wallet may not pair with the old node; restart the
                // node leg of the cascade.
                CascadePolicy::Downstream => next.set_node(None),
                CascadePolicy::None => {
                    let keep = next.node().is_some_and(|node_id| {
                        dataset
                            .wallet(id)
                            .is_some_and(|wallet| wallet.lists_node(node_id))
                    });
                    if !keep {
                        next.set_node(None);
                    }
                }
            }
            preference_update = align_device_type(dataset, preference, id);
        }
        ItemRef::Node(id) => next.set_node(Some(id.clone())),
    }
    TransitionOutcome {
        selection: Selection::Single(next),
        preference_update,
    }
}

fn multi_transition(
    dataset: &Dataset,
    multi: &MultiSelection,
    preference: &UserPreference,
    item: ItemRef<'_>,
) -> TransitionOutcome {
    let mut next = multi.clone();
    let mut preference_update = None;
    match item {
        // Multi-sig signer membership is slot-addressed; a bare category
        // click has no slot to land in.
        ItemRef::Signer(_) => {}
        ItemRef::Wallet(id) => {
            if next.wallet() == Some(id) {
                next.set_wallet(None);
                next.set_node(None);
            } else if query::multi_compatible_wallets(dataset, multi).contains(id) {
                next.set_wallet(Some(id.clone()));
                next.set_node(None);
                preference_update = align_device_type(dataset, preference, id);
            }
        }
        ItemRef::Node(id) => {
            if next.node() == Some(id) {
                next.set_node(None);
            } else if next.wallet().is_some()
                && query::multi_compatible_nodes(dataset, multi).contains(id)
            {
                next.set_node(Some(id.clone()));
            }
        }
    }
    TransitionOutcome {
        selection: Selection::Multi(next),
        preference_update,
    }
}

/// A wallet that runs on exactly one platform drags the device type along.
fn align_device_type(
    dataset: &Dataset,
    preference: &UserPreference,
    wallet_id: &WalletId,
) -> Option<UserPreference> {
    let sole = dataset.wallet(wallet_id)?.single_platform()?;
    (sole != preference.device_type).then(|| preference.with_device_type(sole))
}
