//! Compatible-candidate queries.
//!
//! Used by multi-sig rendering and by the transition engine's validity
//! checks. Results are id lists in dataset order (the display order); set
//! semantics apply — only membership matters to the engine.

use keyfit_types::{Dataset, MultiSelection, NodeId, Selection, Signer, SignerId, Wallet, WalletId};

/// Wallets compatible with every currently chosen signer.
///
/// With no signer chosen, every wallet qualifies. Adding a signer can only
/// shrink or preserve the result (set intersection).
#[must_use]
pub fn compatible_wallets(dataset: &Dataset, selection: &Selection) -> Vec<WalletId> {
    let chosen: Vec<&Signer> = match selection {
        Selection::Single(single) => single
            .signers()
            .iter()
            .filter_map(|id| dataset.signer(id))
            .collect(),
        Selection::Multi(multi) => multi.filled().filter_map(|id| dataset.signer(id)).collect(),
    };
    wallets_for_signers(dataset, &chosen)
}

/// Signers compatible with the chosen wallet, excluding the null signer.
///
/// With no wallet chosen, every hardware signer qualifies.
#[must_use]
pub fn compatible_signers(dataset: &Dataset, selection: &Selection) -> Vec<SignerId> {
    let wallet = match selection {
        Selection::Single(single) => single.wallet(),
        Selection::Multi(multi) => multi.wallet(),
    };
    signers_for_wallet(dataset, wallet.and_then(|id| dataset.wallet(id)))
}

/// Nodes serving the chosen wallet. With no wallet chosen, every node
/// qualifies.
#[must_use]
pub fn compatible_nodes(dataset: &Dataset, selection: &Selection) -> Vec<NodeId> {
    let wallet = match selection {
        Selection::Single(single) => single.wallet(),
        Selection::Multi(multi) => multi.wallet(),
    };
    nodes_for_wallet(dataset, wallet)
}

pub(crate) fn multi_compatible_wallets(dataset: &Dataset, multi: &MultiSelection) -> Vec<WalletId> {
    let chosen: Vec<&Signer> = multi.filled().filter_map(|id| dataset.signer(id)).collect();
    wallets_for_signers(dataset, &chosen)
}

pub(crate) fn multi_compatible_signers(dataset: &Dataset, multi: &MultiSelection) -> Vec<SignerId> {
    signers_for_wallet(dataset, multi.wallet().and_then(|id| dataset.wallet(id)))
}

pub(crate) fn multi_compatible_nodes(dataset: &Dataset, multi: &MultiSelection) -> Vec<NodeId> {
    nodes_for_wallet(dataset, multi.wallet())
}

fn wallets_for_signers(dataset: &Dataset, chosen: &[&Signer]) -> Vec<WalletId> {
    dataset
        .wallets()
        .iter()
        .filter(|wallet| chosen.iter().all(|signer| wallet.accepts_signer(signer)))
        .map(|wallet| wallet.id.clone())
        .collect()
}

fn signers_for_wallet(dataset: &Dataset, wallet: Option<&Wallet>) -> Vec<SignerId> {
    dataset
        .signers()
        .iter()
        .filter(|signer| !signer.null_signer)
        .filter(|signer| wallet.is_none_or(|wallet| wallet.accepts_signer(signer)))
        .map(|signer| signer.id.clone())
        .collect()
}

fn nodes_for_wallet(dataset: &Dataset, wallet: Option<&WalletId>) -> Vec<NodeId> {
    dataset
        .nodes()
        .iter()
        .filter(|node| wallet.is_none_or(|wallet| node.serves_wallet(wallet)))
        .map(|node| node.id.clone())
        .collect()
}
