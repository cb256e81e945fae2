//! The compatibility dataset: signers, wallets, nodes and the relations
//! between them.
//!
//! The dataset is a static, declarative graph shipped as data. Item structs
//! mirror the JSON wire shape (camelCase field names); [`Dataset`] is the
//! validated container. Compatibility is never computed from protocol
//! behavior, only read from these relations.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ids::{NodeId, SignerId, WalletId};

/// How a feature reads on a card: a selling point, a drawback, or a caveat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureKind {
    Positive,
    Negative,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: FeatureKind,
    pub text: String,
}

/// Platform a wallet runs on. Doubles as the preference's device type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Mobile,
    Desktop,
}

impl Platform {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Platform::Mobile => "mobile",
            Platform::Desktop => "desktop",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A hardware signing device, or the distinguished "no hardware signer"
/// entry tagged `null_signer`.
///
/// The signer-side `compatible_wallets` list is derivable from the
/// wallet-side relation; the wallet side is authoritative and loaders
/// rebuild this list from it. A null signer is compatible with every wallet
/// and participates only in single-sig mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signer {
    pub id: SignerId,
    pub name: String,
    #[serde(default)]
    pub features: Vec<Feature>,
    #[serde(default)]
    pub compatible_wallets: Vec<WalletId>,
    #[serde(default)]
    pub null_signer: bool,
}

/// Wallet software. Holds the authoritative signer relation plus the node
/// relation and supported platforms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    pub id: WalletId,
    pub name: String,
    #[serde(default)]
    pub features: Vec<Feature>,
    #[serde(default)]
    pub compatible_signers: Vec<SignerId>,
    #[serde(default)]
    pub compatible_nodes: Vec<NodeId>,
    #[serde(default)]
    pub supported_platforms: Vec<Platform>,
}

impl Wallet {
    /// Whether this wallet pairs with the given signer.
    ///
    /// The wallet-side relation decides; a null signer pairs with every
    /// wallet regardless of the list.
    #[must_use]
    pub fn accepts_signer(&self, signer: &Signer) -> bool {
        signer.null_signer || self.compatible_signers.contains(&signer.id)
    }

    #[must_use]
    pub fn supports(&self, platform: Platform) -> bool {
        self.supported_platforms.contains(&platform)
    }

    #[must_use]
    pub fn lists_node(&self, node: &NodeId) -> bool {
        self.compatible_nodes.contains(node)
    }

    /// The sole supported platform, if the wallet supports exactly one.
    #[must_use]
    pub fn single_platform(&self) -> Option<Platform> {
        match self.supported_platforms.as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }
}

/// A network backend. The distinguished public/default node is tagged
/// `default_node` and never counts as a real node pick for scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    #[serde(default)]
    pub features: Vec<Feature>,
    #[serde(default)]
    pub compatible_wallets: Vec<WalletId>,
    #[serde(default)]
    pub default_node: bool,
}

impl Node {
    #[must_use]
    pub fn serves_wallet(&self, wallet: &WalletId) -> bool {
        self.compatible_wallets.contains(wallet)
    }
}

/// Signer x wallet -> ordered transfer-method labels. Display only: absence
/// means "no known method", not incompatibility.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransferMethods(HashMap<SignerId, HashMap<WalletId, Vec<String>>>);

impl TransferMethods {
    #[must_use]
    pub fn new(map: HashMap<SignerId, HashMap<WalletId, Vec<String>>>) -> Self {
        Self(map)
    }

    #[must_use]
    pub fn between(&self, signer: &SignerId, wallet: &WalletId) -> &[String] {
        self.0
            .get(signer)
            .and_then(|methods| methods.get(wallet))
            .map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DatasetError {
    #[error("duplicate signer id {0}")]
    DuplicateSigner(SignerId),
    #[error("duplicate wallet id {0}")]
    DuplicateWallet(WalletId),
    #[error("duplicate node id {0}")]
    DuplicateNode(NodeId),
    #[error("more than one null signer ({first} and {second})")]
    MultipleNullSigners { first: SignerId, second: SignerId },
    #[error("more than one default node ({first} and {second})")]
    MultipleDefaultNodes { first: NodeId, second: NodeId },
}

/// Validated, immutable compatibility dataset.
///
/// Construction via [`Dataset::new`] checks id uniqueness per category and
/// that at most one null signer and one default node exist. Item order is
/// preserved (it is the display order). Lookups by unknown id return `None`;
/// the engine treats that as "no matching item", never as an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    signers: Vec<Signer>,
    wallets: Vec<Wallet>,
    nodes: Vec<Node>,
    transfer_methods: TransferMethods,
}

impl Dataset {
    pub fn new(
        signers: Vec<Signer>,
        wallets: Vec<Wallet>,
        nodes: Vec<Node>,
        transfer_methods: TransferMethods,
    ) -> Result<Self, DatasetError> {
        let mut seen_signers = HashSet::new();
        let mut null_signer: Option<&SignerId> = None;
        for signer in &signers {
            if !seen_signers.insert(&signer.id) {
                return Err(DatasetError::DuplicateSigner(signer.id.clone()));
            }
            if signer.null_signer {
                if let Some(first) = null_signer {
                    return Err(DatasetError::MultipleNullSigners {
                        first: first.clone(),
                        second: signer.id.clone(),
                    });
                }
                null_signer = Some(&signer.id);
            }
        }

        let mut seen_wallets = HashSet::new();
        for wallet in &wallets {
            if !seen_wallets.insert(&wallet.id) {
                return Err(DatasetError::DuplicateWallet(wallet.id.clone()));
            }
        }

        let mut seen_nodes = HashSet::new();
        let mut default_node: Option<&NodeId> = None;
        for node in &nodes {
            if !seen_nodes.insert(&node.id) {
                return Err(DatasetError::DuplicateNode(node.id.clone()));
            }
            if node.default_node {
                if let Some(first) = default_node {
                    return Err(DatasetError::MultipleDefaultNodes {
                        first: first.clone(),
                        second: node.id.clone(),
                    });
                }
                default_node = Some(&node.id);
            }
        }

        Ok(Self {
            signers,
            wallets,
            nodes,
            transfer_methods,
        })
    }

    #[must_use]
    pub fn signers(&self) -> &[Signer] {
        &self.signers
    }

    #[must_use]
    pub fn wallets(&self) -> &[Wallet] {
        &self.wallets
    }

    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[must_use]
    pub fn signer(&self, id: &SignerId) -> Option<&Signer> {
        self.signers.iter().find(|signer| signer.id == *id)
    }

    #[must_use]
    pub fn wallet(&self, id: &WalletId) -> Option<&Wallet> {
        self.wallets.iter().find(|wallet| wallet.id == *id)
    }

    #[must_use]
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == *id)
    }

    /// The distinguished "no hardware signer" entry, if the dataset ships one.
    #[must_use]
    pub fn null_signer(&self) -> Option<&Signer> {
        self.signers.iter().find(|signer| signer.null_signer)
    }

    #[must_use]
    pub fn transfer_methods(&self, signer: &SignerId, wallet: &WalletId) -> &[String] {
        self.transfer_methods.between(signer, wallet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer(id: &str) -> Signer {
        Signer {
            id: SignerId::from(id),
            name: id.to_owned(),
            features: Vec::new(),
            compatible_wallets: Vec::new(),
            null_signer: false,
        }
    }

    fn wallet(id: &str) -> Wallet {
        Wallet {
            id: WalletId::from(id),
            name: id.to_owned(),
            features: Vec::new(),
            compatible_signers: Vec::new(),
            compatible_nodes: Vec::new(),
            supported_platforms: vec![Platform::Desktop],
        }
    }

    fn node(id: &str) -> Node {
        Node {
            id: NodeId::from(id),
            name: id.to_owned(),
            features: Vec::new(),
            compatible_wallets: Vec::new(),
            default_node: false,
        }
    }

    #[test]
    fn rejects_duplicate_signer_id() {
        let err = Dataset::new(
            vec![signer("trezor"), signer("trezor")],
            Vec::new(),
            Vec::new(),
            TransferMethods::default(),
        )
        .unwrap_err();
        assert_eq!(err, DatasetError::DuplicateSigner(SignerId::from("trezor")));
    }

    #[test]
    fn rejects_second_null_signer() {
        let mut first = signer("none");
        first.null_signer = true;
        let mut second = signer("also-none");
        second.null_signer = true;
        let err = Dataset::new(
            vec![first, second],
            Vec::new(),
            Vec::new(),
            TransferMethods::default(),
        )
        .unwrap_err();
        assert!(matches!(err, DatasetError::MultipleNullSigners { .. }));
    }

    #[test]
    fn rejects_second_default_node() {
        let mut first = node("public");
        first.default_node = true;
        let mut second = node("also-public");
        second.default_node = true;
        let err = Dataset::new(
            Vec::new(),
            Vec::new(),
            vec![first, second],
            TransferMethods::default(),
        )
        .unwrap_err();
        assert!(matches!(err, DatasetError::MultipleDefaultNodes { .. }));
    }

    #[test]
    fn null_signer_pairs_with_any_wallet() {
        let mut none = signer("none");
        none.null_signer = true;
        let w = wallet("sparrow");
        assert!(w.accepts_signer(&none));
        assert!(!w.accepts_signer(&signer("trezor")));
    }

    #[test]
    fn single_platform_reports_sole_entry() {
        let mut w = wallet("sparrow");
        assert_eq!(w.single_platform(), Some(Platform::Desktop));
        w.supported_platforms.push(Platform::Mobile);
        assert_eq!(w.single_platform(), None);
    }

    #[test]
    fn signer_wire_shape_is_camel_case() {
        let json = serde_json::json!({
            "id": "coldcard",
            "name": "ColdCard",
            "features": [{ "type": "positive", "text": "air-gapped" }],
            "compatibleWallets": ["sparrow"]
        });
        let parsed: Signer = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.id.as_str(), "coldcard");
        assert_eq!(parsed.features[0].kind, FeatureKind::Positive);
        assert_eq!(parsed.compatible_wallets, [WalletId::from("sparrow")]);
        assert!(!parsed.null_signer);
    }

    #[test]
    fn transfer_methods_absent_pair_is_empty() {
        let methods = TransferMethods::default();
        assert!(
            methods
                .between(&SignerId::from("trezor"), &WalletId::from("sparrow"))
                .is_empty()
        );
    }
}
