//! Mode and threshold control.
//!
//! Switching between single-sig and multi-sig, or between multi-sig
//! thresholds, discards dependent state: the target shape always comes back
//! in its empty form. All functions return a new selection; re-applying the
//! current mode or threshold is a no-op.

use tracing::debug;

use keyfit_types::{Mode, MultiSelection, Selection, SignerId, Threshold};

/// Threshold a fresh multi-sig selection starts on.
pub const DEFAULT_THRESHOLD: Threshold = Threshold::TwoOfThree;

#[must_use]
pub fn switch_mode(selection: &Selection, mode: Mode) -> Selection {
    match (selection, mode) {
        (Selection::Single(_), Mode::Single) | (Selection::Multi(_), Mode::Multi) => {
            selection.clone()
        }
        (_, Mode::Single) => {
            debug!("switching to single-sig, dropping multi-sig picks");
            Selection::new()
        }
        (_, Mode::Multi) => {
            debug!("switching to multi-sig, dropping single-sig picks");
            Selection::multi(DEFAULT_THRESHOLD)
        }
    }
}

/// Change the multi-sig threshold, resetting all slots and the wallet/node.
/// Single-sig selections are returned unchanged.
#[must_use]
pub fn set_threshold(selection: &Selection, threshold: Threshold) -> Selection {
    match selection {
        Selection::Multi(multi) if multi.threshold() != threshold => {
            debug!(threshold = %threshold, "threshold changed, resetting slots");
            Selection::multi(threshold)
        }
        _ => selection.clone(),
    }
}

/// Set or clear one signer slot. No compatibility gating happens here — the
/// candidate queries pre-filter choices, the engine never rejects a set.
/// Out-of-range indices and single-sig selections are returned unchanged.
#[must_use]
pub fn set_slot(selection: &Selection, index: usize, signer: Option<SignerId>) -> Selection {
    match selection {
        Selection::Multi(multi) => {
            let mut next: MultiSelection = multi.clone();
            next.set_slot(index, signer);
            Selection::Multi(next)
        }
        Selection::Single(_) => selection.clone(),
    }
}
