//! Selection state: the user's current picks.
//!
//! A [`Selection`] is in exactly one of two shapes — single-sig or multi-sig
//! — and switching shape discards the other's state entirely. Selections are
//! owned by the hosting UI loop and replaced wholesale on each transition;
//! they are never persisted.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::ids::{NodeId, SignerId, WalletId};

/// Multi-sig scheme name. Fixes the slot count and required-signature count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Threshold {
    TwoOfThree,
    ThreeOfFive,
}

impl Threshold {
    #[must_use]
    pub const fn slot_count(self) -> usize {
        match self {
            Threshold::TwoOfThree => 3,
            Threshold::ThreeOfFive => 5,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Threshold::TwoOfThree => "2-of-3",
            Threshold::ThreeOfFive => "3-of-5",
        }
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown threshold {0:?}, expected \"2-of-3\" or \"3-of-5\"")]
pub struct ThresholdParseError(String);

impl FromStr for Threshold {
    type Err = ThresholdParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "2-of-3" => Ok(Threshold::TwoOfThree),
            "3-of-5" => Ok(Threshold::ThreeOfFive),
            other => Err(ThresholdParseError(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Single,
    Multi,
}

/// Single-sig picks: an ordered signer set (semantically 0-or-1 effective
/// choice plus the null signer), one wallet, one node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SingleSelection {
    signers: Vec<SignerId>,
    wallet: Option<WalletId>,
    node: Option<NodeId>,
}

impl SingleSelection {
    #[must_use]
    pub fn signers(&self) -> &[SignerId] {
        &self.signers
    }

    #[must_use]
    pub fn wallet(&self) -> Option<&WalletId> {
        self.wallet.as_ref()
    }

    #[must_use]
    pub fn node(&self) -> Option<&NodeId> {
        self.node.as_ref()
    }

    #[must_use]
    pub fn has_signer(&self, id: &SignerId) -> bool {
        self.signers.contains(id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.signers.is_empty() && self.wallet.is_none() && self.node.is_none()
    }

    /// Append a signer pick. Duplicates are ignored.
    pub fn add_signer(&mut self, id: SignerId) {
        if !self.signers.contains(&id) {
            self.signers.push(id);
        }
    }

    pub fn remove_signer(&mut self, id: &SignerId) {
        self.signers.retain(|selected| selected != id);
    }

    pub fn set_wallet(&mut self, wallet: Option<WalletId>) {
        self.wallet = wallet;
    }

    pub fn set_node(&mut self, node: Option<NodeId>) {
        self.node = node;
    }

    pub fn clear(&mut self) {
        self.signers.clear();
        self.wallet = None;
        self.node = None;
    }
}

/// Multi-sig picks: N signer slots fixed by the threshold, one wallet, one
/// node. The slot count always matches `threshold.slot_count()` — the only
/// way to change it is [`MultiSelection::new`] with a different threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiSelection {
    threshold: Threshold,
    slots: Vec<Option<SignerId>>,
    wallet: Option<WalletId>,
    node: Option<NodeId>,
}

impl MultiSelection {
    #[must_use]
    pub fn new(threshold: Threshold) -> Self {
        Self {
            threshold,
            slots: vec![None; threshold.slot_count()],
            wallet: None,
            node: None,
        }
    }

    #[must_use]
    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    #[must_use]
    pub fn slots(&self) -> &[Option<SignerId>] {
        &self.slots
    }

    /// The signers currently occupying slots, in slot order.
    pub fn filled(&self) -> impl Iterator<Item = &SignerId> {
        self.slots.iter().filter_map(Option::as_ref)
    }

    #[must_use]
    pub fn filled_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    #[must_use]
    pub fn contains_signer(&self, id: &SignerId) -> bool {
        self.filled().any(|selected| selected == id)
    }

    #[must_use]
    pub fn wallet(&self) -> Option<&WalletId> {
        self.wallet.as_ref()
    }

    #[must_use]
    pub fn node(&self) -> Option<&NodeId> {
        self.node.as_ref()
    }

    /// Set or clear one slot. Out-of-range indices are ignored — setting is
    /// total and never rejected by the engine.
    pub fn set_slot(&mut self, index: usize, signer: Option<SignerId>) {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = signer;
        }
    }

    pub fn set_wallet(&mut self, wallet: Option<WalletId>) {
        self.wallet = wallet;
    }

    pub fn set_node(&mut self, node: Option<NodeId>) {
        self.node = node;
    }
}

/// The user's current picks. Exactly one field group is live per mode by
/// construction; the other shape's state does not exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Single(SingleSelection),
    Multi(MultiSelection),
}

impl Default for Selection {
    fn default() -> Self {
        Self::Single(SingleSelection::default())
    }
}

impl Selection {
    /// An empty single-sig selection, the session-start state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty multi-sig selection for the given threshold.
    #[must_use]
    pub fn multi(threshold: Threshold) -> Self {
        Self::Multi(MultiSelection::new(threshold))
    }

    #[must_use]
    pub const fn mode(&self) -> Mode {
        match self {
            Selection::Single(_) => Mode::Single,
            Selection::Multi(_) => Mode::Multi,
        }
    }

    #[must_use]
    pub const fn as_single(&self) -> Option<&SingleSelection> {
        match self {
            Selection::Single(single) => Some(single),
            Selection::Multi(_) => None,
        }
    }

    #[must_use]
    pub const fn as_multi(&self) -> Option<&MultiSelection> {
        match self {
            Selection::Single(_) => None,
            Selection::Multi(multi) => Some(multi),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_fixes_slot_count() {
        assert_eq!(MultiSelection::new(Threshold::TwoOfThree).slots().len(), 3);
        assert_eq!(MultiSelection::new(Threshold::ThreeOfFive).slots().len(), 5);
    }

    #[test]
    fn threshold_round_trips_through_str() {
        for threshold in [Threshold::TwoOfThree, Threshold::ThreeOfFive] {
            assert_eq!(threshold.as_str().parse::<Threshold>(), Ok(threshold));
        }
        assert!("4-of-7".parse::<Threshold>().is_err());
    }

    #[test]
    fn out_of_range_slot_is_ignored() {
        let mut multi = MultiSelection::new(Threshold::TwoOfThree);
        multi.set_slot(7, Some(SignerId::from("trezor")));
        assert_eq!(multi.filled_count(), 0);
        multi.set_slot(2, Some(SignerId::from("trezor")));
        assert_eq!(multi.filled_count(), 1);
        assert!(multi.contains_signer(&SignerId::from("trezor")));
    }

    #[test]
    fn duplicate_signer_pick_is_ignored() {
        let mut single = SingleSelection::default();
        single.add_signer(SignerId::from("trezor"));
        single.add_signer(SignerId::from("trezor"));
        assert_eq!(single.signers().len(), 1);
    }

    #[test]
    fn clear_empties_every_category() {
        let mut single = SingleSelection::default();
        single.add_signer(SignerId::from("trezor"));
        single.set_wallet(Some(WalletId::from("sparrow")));
        single.set_node(Some(NodeId::from("bitcoin-core")));
        single.clear();
        assert!(single.is_empty());
    }

    #[test]
    fn selection_starts_single_and_empty() {
        let selection = Selection::new();
        assert_eq!(selection.mode(), Mode::Single);
        assert!(selection.as_single().is_some_and(SingleSelection::is_empty));
    }
}
