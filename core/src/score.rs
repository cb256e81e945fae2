//! Completion score: a monotone progress indicator over the selection.
//!
//! Purely informational — never a correctness gate. All constants come from
//! [`ScoreConfig`]; the defaults reproduce the reference bucket table.

use keyfit_config::{MultiScoreConfig, ScoreConfig, SingleScoreTable};
use keyfit_types::{Dataset, MultiSelection, Selection, SingleSelection, Threshold};

#[must_use]
pub fn completion_score(dataset: &Dataset, selection: &Selection, score: &ScoreConfig) -> u32 {
    match selection {
        Selection::Single(single) => single_score(dataset, single, &score.single),
        Selection::Multi(multi) => multi_score(multi, &score.multi),
    }
}

fn single_score(dataset: &Dataset, single: &SingleSelection, table: &SingleScoreTable) -> u32 {
    let has_wallet = single.wallet().is_some();
    // The default public node is always reachable; only a deliberately
    // chosen backend counts.
    let has_node = single
        .node()
        .and_then(|id| dataset.node(id))
        .is_some_and(|node| !node.default_node);
    let has_null = single
        .signers()
        .iter()
        .any(|id| dataset.signer(id).is_some_and(|signer| signer.null_signer));
    let has_hardware = single
        .signers()
        .iter()
        .any(|id| dataset.signer(id).is_some_and(|signer| !signer.null_signer));

    if has_hardware && has_wallet && has_node {
        table.hardware_wallet_node
    } else if has_hardware && has_wallet {
        table.hardware_wallet
    } else if has_null && has_wallet && has_node {
        table.null_wallet_node
    } else if has_null && has_wallet {
        table.null_wallet
    } else if has_hardware {
        table.hardware_only
    } else {
        0
    }
}

fn multi_score(multi: &MultiSelection, config: &MultiScoreConfig) -> u32 {
    let filled = u32::try_from(multi.filled_count()).unwrap_or(u32::MAX);
    let mut score = config.base + filled * config.slot_weight(multi.threshold());
    if multi.wallet().is_some() {
        score += config.wallet;
    }
    if multi.node().is_some() {
        score += config.node;
    }
    if multi.threshold() == Threshold::ThreeOfFive && filled == 5 {
        score += config.full_slot_bonus_five;
    }
    match config.cap {
        Some(cap) => score.min(cap),
        None => score,
    }
}
