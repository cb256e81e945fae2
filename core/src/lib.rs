//! The Keyfit selection engine.
//!
//! Pure functions over an immutable [`Dataset`], the current [`Selection`],
//! the user's [`UserPreference`] and an [`EnginePolicy`]: derive a display
//! state per candidate item, apply click semantics, answer compatibility
//! queries, and compute the completion score. Every operation is synchronous,
//! total, and side-effect free — selections are replaced wholesale, never
//! mutated in place, and preference changes are returned as annotations
//! rather than written anywhere.

mod derive;
mod modes;
mod query;
mod score;
mod transition;


pub use derive::derive_state;
pub use modes::{DEFAULT_THRESHOLD, set_slot, set_threshold, switch_mode};
pub use query::{compatible_nodes, compatible_signers, compatible_wallets};
pub use score::completion_score;
pub use transition::{TransitionOutcome, transition};

use keyfit_config::EnginePolicy;
use keyfit_types::{
    ComponentState, Dataset, ItemRef, Mode, NodeId, Selection, SignerId, Threshold, UserPreference,
    WalletId,
};

/// Policy-carrying facade over the engine functions.
///
/// Convenient for callers that hold one policy for a whole session; the free
/// functions remain available for one-off calls.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    policy: EnginePolicy,
}

impl Engine {
    #[must_use]
    pub fn new(policy: EnginePolicy) -> Self {
        Self { policy }
    }

    #[must_use]
    pub fn policy(&self) -> &EnginePolicy {
        &self.policy
    }

    #[must_use]
    pub fn derive_state(
        &self,
        dataset: &Dataset,
        selection: &Selection,
        preference: &UserPreference,
        item: ItemRef<'_>,
    ) -> ComponentState {
        derive_state(dataset, selection, preference, &self.policy, item)
    }

    #[must_use]
    pub fn transition(
        &self,
        dataset: &Dataset,
        selection: &Selection,
        preference: &UserPreference,
        item: ItemRef<'_>,
    ) -> TransitionOutcome {
        transition(dataset, selection, preference, &self.policy, item)
    }

    #[must_use]
    pub fn completion_score(&self, dataset: &Dataset, selection: &Selection) -> u32 {
        completion_score(dataset, selection, &self.policy.score)
    }

    #[must_use]
    pub fn compatible_wallets(&self, dataset: &Dataset, selection: &Selection) -> Vec<WalletId> {
        compatible_wallets(dataset, selection)
    }

    #[must_use]
    pub fn compatible_signers(&self, dataset: &Dataset, selection: &Selection) -> Vec<SignerId> {
        compatible_signers(dataset, selection)
    }

    #[must_use]
    pub fn compatible_nodes(&self, dataset: &Dataset, selection: &Selection) -> Vec<NodeId> {
        compatible_nodes(dataset, selection)
    }

    #[must_use]
    pub fn switch_mode(&self, selection: &Selection, mode: Mode) -> Selection {
        switch_mode(selection, mode)
    }

    #[must_use]
    pub fn set_threshold(&self, selection: &Selection, threshold: Threshold) -> Selection {
        set_threshold(selection, threshold)
    }

    #[must_use]
    pub fn set_slot(
        &self,
        selection: &Selection,
        index: usize,
        signer: Option<SignerId>,
    ) -> Selection {
        set_slot(selection, index, signer)
    }
}
