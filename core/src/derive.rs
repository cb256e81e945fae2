//! State derivation: map (dataset, selection, preference, item) to a
//! display state.
//!
//! Pure and total. Unknown ids derive [`ComponentState::Inactive`] — the
//! engine treats them as "no matching item", never as an error.

use keyfit_config::EnginePolicy;
use keyfit_types::{
    ComponentState, Dataset, ItemRef, MultiSelection, NodeId, Selection, SignerId,
    SignerWillingness, SingleSelection, UserPreference, WalletId,
};

use crate::query;

/// Display state for one candidate item under the current selection.
#[must_use]
pub fn derive_state(
    dataset: &Dataset,
    selection: &Selection,
    preference: &UserPreference,
    policy: &EnginePolicy,
    item: ItemRef<'_>,
) -> ComponentState {
    match selection {
        Selection::Single(single) => match item {
            ItemRef::Signer(id) => single_signer(dataset, single, preference, policy, id),
            ItemRef::Wallet(id) => single_wallet(dataset, single, preference, id),
            ItemRef::Node(id) => single_node(dataset, single, id),
        },
        Selection::Multi(multi) => match item {
            ItemRef::Signer(id) => multi_signer(dataset, multi, id),
            ItemRef::Wallet(id) => multi_wallet(dataset, multi, id),
            ItemRef::Node(id) => multi_node(dataset, multi, id),
        },
    }
}

fn single_signer(
    dataset: &Dataset,
    single: &SingleSelection,
    preference: &UserPreference,
    policy: &EnginePolicy,
    id: &SignerId,
) -> ComponentState {
    if single.has_signer(id) {
        return ComponentState::Active;
    }
    // One live choice per category: any selected signer freezes the rest.
    if !single.signers().is_empty() {
        return ComponentState::Inactive;
    }
    let Some(signer) = dataset.signer(id) else {
        return ComponentState::Inactive;
    };

    if signer.null_signer {
        // The null signer pairs with every wallet, so its eligibility
        // ignores the wallet/node picks entirely. In the guided variant it
        // yields to a recorded "with-signer" willingness.
        if policy.willingness_gating
            && preference.signer_willingness == SignerWillingness::WithSigner
        {
            return ComponentState::Inactive;
        }
        return ComponentState::Breathing;
    }

    // With a wallet on the board, the wallet-side relation decides.
    if let Some(wallet_id) = single.wallet() {
        return match dataset.wallet(wallet_id) {
            Some(wallet) if wallet.accepts_signer(signer) => ComponentState::Breathing,
            _ => ComponentState::Inactive,
        };
    }

    let willing = !policy.willingness_gating
        || preference.signer_willingness == SignerWillingness::WithSigner;
    if willing && single.node().is_none() {
        return ComponentState::Breathing;
    }
    ComponentState::Inactive
}

fn single_wallet(
    dataset: &Dataset,
    single: &SingleSelection,
    preference: &UserPreference,
    id: &WalletId,
) -> ComponentState {
    if single.wallet() == Some(id) {
        return ComponentState::Active;
    }
    if single.wallet().is_some() {
        return ComponentState::Inactive;
    }
    let Some(wallet) = dataset.wallet(id) else {
        return ComponentState::Inactive;
    };
    // Platform mismatch dominates every other factor.
    if !wallet.supports(preference.device_type) {
        return ComponentState::Inactive;
    }

    // The node relation takes priority when a node is on the board.
    if let Some(node_id) = single.node() {
        return match dataset.node(node_id) {
            Some(node) if node.serves_wallet(id) => ComponentState::Breathing,
            _ => ComponentState::Inactive,
        };
    }

    if single.signers().is_empty() {
        return ComponentState::Inactive;
    }
    let compatible = single
        .signers()
        .iter()
        .filter_map(|signer_id| dataset.signer(signer_id))
        .any(|signer| wallet.accepts_signer(signer));
    if compatible {
        ComponentState::Breathing
    } else {
        ComponentState::Inactive
    }
}

fn single_node(dataset: &Dataset, single: &SingleSelection, id: &NodeId) -> ComponentState {
    if single.node() == Some(id) {
        return ComponentState::Active;
    }
    if single.node().is_some() {
        return ComponentState::Inactive;
    }
    if dataset.node(id).is_none() {
        return ComponentState::Inactive;
    }
    // Nodes only light up once a wallet vouches for them.
    match single.wallet().and_then(|wallet_id| dataset.wallet(wallet_id)) {
        Some(wallet) if wallet.lists_node(id) => ComponentState::Breathing,
        _ => ComponentState::Inactive,
    }
}

fn multi_signer(dataset: &Dataset, multi: &MultiSelection, id: &SignerId) -> ComponentState {
    if multi.contains_signer(id) {
        return ComponentState::Active;
    }
    if query::multi_compatible_signers(dataset, multi).contains(id) {
        ComponentState::Breathing
    } else {
        ComponentState::Inactive
    }
}

fn multi_wallet(dataset: &Dataset, multi: &MultiSelection, id: &WalletId) -> ComponentState {
    if multi.wallet() == Some(id) {
        return ComponentState::Active;
    }
    if query::multi_compatible_wallets(dataset, multi).contains(id) {
        ComponentState::Breathing
    } else {
        ComponentState::Inactive
    }
}

fn multi_node(dataset: &Dataset, multi: &MultiSelection, id: &NodeId) -> ComponentState {
    if multi.node() == Some(id) {
        return ComponentState::Active;
    }
    if query::multi_compatible_nodes(dataset, multi).contains(id) {
        ComponentState::Breathing
    } else {
        ComponentState::Inactive
    }
}
