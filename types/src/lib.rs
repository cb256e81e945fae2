//! Core domain types for Keyfit.
//!
//! This crate contains pure domain types with no IO, no async, and minimal
//! dependencies: the compatibility dataset, the selection state, the
//! persisted preference, and the display-state vocabulary shared by the
//! engine and its callers. Invariants are enforced at construction time;
//! invalid selections are unrepresentable.

mod dataset;
mod ids;
mod preference;
mod selection;

pub use dataset::{
    Dataset, DatasetError, Feature, FeatureKind, Node, Platform, Signer, TransferMethods, Wallet,
};
pub use ids::{NodeId, SignerId, WalletId};
pub use preference::{SignerWillingness, UserPreference};
pub use selection::{
    Mode, MultiSelection, Selection, SingleSelection, Threshold, ThresholdParseError,
};

use std::fmt;

/// Display state of a candidate item.
///
/// `Breathing` means "valid, not yet chosen, eligible to become active";
/// `Inactive` means selecting the item now would be redundant, incompatible,
/// or blocked by another pick in the same category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentState {
    Inactive,
    Breathing,
    Active,
}

impl ComponentState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ComponentState::Inactive => "inactive",
            ComponentState::Breathing => "breathing",
            ComponentState::Active => "active",
        }
    }
}

impl fmt::Display for ComponentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Signer,
    Wallet,
    Node,
}

impl Category {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Category::Signer => "signer",
            Category::Wallet => "wallet",
            Category::Node => "node",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A category-tagged borrowed item id, the engine's "clicked item" argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemRef<'a> {
    Signer(&'a SignerId),
    Wallet(&'a WalletId),
    Node(&'a NodeId),
}

impl<'a> ItemRef<'a> {
    #[must_use]
    pub const fn category(self) -> Category {
        match self {
            ItemRef::Signer(_) => Category::Signer,
            ItemRef::Wallet(_) => Category::Wallet,
            ItemRef::Node(_) => Category::Node,
        }
    }

    #[must_use]
    pub fn id_str(self) -> &'a str {
        match self {
            ItemRef::Signer(id) => id.as_str(),
            ItemRef::Wallet(id) => id.as_str(),
            ItemRef::Node(id) => id.as_str(),
        }
    }
}
