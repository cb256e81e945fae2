//! JSON dataset loading, validation and normalization.
//!
//! The wire shape matches the shipped `custody-data.json`: camelCase keys,
//! item lists per category, and a nested transfer-method map. Loading
//! normalizes the raw graph before handing it to [`Dataset::new`]:
//! relations referencing unknown ids are dropped, and the signer-side
//! wallet list is rebuilt from the authoritative wallet-side relation.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use keyfit_types::{
    Dataset, DatasetError, Node, Signer, SignerId, TransferMethods, Wallet, WalletId,
};

const BUNDLED_JSON: &str = include_str!("../assets/custody-data.json");

#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read dataset file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse dataset JSON")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] DatasetError),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDataset {
    #[serde(default)]
    hardware_signers: Vec<Signer>,
    #[serde(default)]
    software_wallets: Vec<Wallet>,
    #[serde(default)]
    nodes: Vec<Node>,
    #[serde(default)]
    transfer_methods: HashMap<SignerId, HashMap<WalletId, Vec<String>>>,
}

/// Load and validate a dataset from a JSON file.
pub fn load_dataset(path: &Path) -> Result<Dataset, DataError> {
    let raw = fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "loading compatibility dataset");
    dataset_from_json(&raw)
}

/// Parse and validate a dataset from a JSON string.
pub fn dataset_from_json(json: &str) -> Result<Dataset, DataError> {
    let raw: RawDataset = serde_json::from_str(json)?;
    let raw = normalize(raw);
    let dataset = Dataset::new(
        raw.hardware_signers,
        raw.software_wallets,
        raw.nodes,
        TransferMethods::new(raw.transfer_methods),
    )?;
    debug!(
        signers = dataset.signers().len(),
        wallets = dataset.wallets().len(),
        nodes = dataset.nodes().len(),
        "dataset loaded"
    );
    Ok(dataset)
}

/// The dataset compiled into the binary, used when no file is supplied.
#[must_use]
pub fn bundled_dataset() -> Dataset {
    dataset_from_json(BUNDLED_JSON).expect("bundled dataset must be valid")
}

/// Drop dangling relation entries and rebuild the signer-side wallet lists
/// from the authoritative wallet-side relation. Asymmetry between the two
/// sides is logged, never fatal.
fn normalize(mut raw: RawDataset) -> RawDataset {
    let signer_ids: HashSet<SignerId> =
        raw.hardware_signers.iter().map(|s| s.id.clone()).collect();
    let wallet_ids: HashSet<WalletId> =
        raw.software_wallets.iter().map(|w| w.id.clone()).collect();
    let node_ids: HashSet<_> = raw.nodes.iter().map(|n| n.id.clone()).collect();

    for wallet in &mut raw.software_wallets {
        wallet.compatible_signers.retain(|id| {
            let known = signer_ids.contains(id);
            if !known {
                warn!(wallet = %wallet.id, signer = %id, "dropping unknown signer from wallet relation");
            }
            known
        });
        wallet.compatible_nodes.retain(|id| {
            let known = node_ids.contains(id);
            if !known {
                warn!(wallet = %wallet.id, node = %id, "dropping unknown node from wallet relation");
            }
            known
        });
    }

    for node in &mut raw.nodes {
        node.compatible_wallets.retain(|id| {
            let known = wallet_ids.contains(id);
            if !known {
                warn!(node = %node.id, wallet = %id, "dropping unknown wallet from node relation");
            }
            known
        });
    }

    for signer in &mut raw.hardware_signers {
        let derived: Vec<WalletId> = if signer.null_signer {
            // The null signer pairs with everything.
            raw.software_wallets.iter().map(|w| w.id.clone()).collect()
        } else {
            raw.software_wallets
                .iter()
                .filter(|wallet| wallet.compatible_signers.contains(&signer.id))
                .map(|wallet| wallet.id.clone())
                .collect()
        };
        if signer.compatible_wallets != derived {
            warn!(
                signer = %signer.id,
                "signer-side wallet list disagrees with the wallet-side relation; using the wallet side"
            );
        }
        signer.compatible_wallets = derived;
    }

    raw
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyfit_types::Platform;

    #[test]
    fn bundled_dataset_parses_and_validates() {
        let dataset = bundled_dataset();
        assert!(!dataset.signers().is_empty());
        assert!(!dataset.wallets().is_empty());
        assert!(!dataset.nodes().is_empty());
        assert!(dataset.null_signer().is_some());
        assert_eq!(
            dataset.nodes().iter().filter(|n| n.default_node).count(),
            1
        );
    }

    #[test]
    fn bundled_relations_are_symmetric_after_normalization() {
        let dataset = bundled_dataset();
        for signer in dataset.signers() {
            for wallet_id in &signer.compatible_wallets {
                let wallet = dataset.wallet(wallet_id).expect("wallet exists");
                assert!(wallet.accepts_signer(signer), "{} vs {}", signer.id, wallet.id);
            }
        }
    }

    #[test]
    fn dangling_relations_are_dropped() {
        let dataset = dataset_from_json(
            r#"{
                "hardwareSigners": [
                    { "id": "trezor", "name": "Trezor" }
                ],
                "softwareWallets": [
                    {
                        "id": "sparrow",
                        "name": "Sparrow",
                        "compatibleSigners": ["trezor", "ghost"],
                        "compatibleNodes": ["lnd"],
                        "supportedPlatforms": ["desktop"]
                    }
                ],
                "nodes": [
                    { "id": "bitcoin-core", "name": "Bitcoin Core", "compatibleWallets": ["sparrow", "ghost"] }
                ]
            }"#,
        )
        .unwrap();

        let wallet = dataset.wallet(&WalletId::from("sparrow")).unwrap();
        assert_eq!(wallet.compatible_signers, [SignerId::from("trezor")]);
        assert!(wallet.compatible_nodes.is_empty());
        let node = dataset.nodes().first().unwrap();
        assert_eq!(node.compatible_wallets, [WalletId::from("sparrow")]);
    }

    #[test]
    fn signer_side_relation_is_rebuilt_from_wallets() {
        let dataset = dataset_from_json(
            r#"{
                "hardwareSigners": [
                    { "id": "trezor", "name": "Trezor", "compatibleWallets": ["stale"] },
                    { "id": "none", "name": "No signer", "nullSigner": true }
                ],
                "softwareWallets": [
                    {
                        "id": "sparrow",
                        "name": "Sparrow",
                        "compatibleSigners": ["trezor"],
                        "supportedPlatforms": ["desktop"]
                    },
                    {
                        "id": "bluewallet",
                        "name": "BlueWallet",
                        "compatibleSigners": [],
                        "supportedPlatforms": ["mobile"]
                    }
                ],
                "nodes": []
            }"#,
        )
        .unwrap();

        let trezor = dataset.signer(&SignerId::from("trezor")).unwrap();
        assert_eq!(trezor.compatible_wallets, [WalletId::from("sparrow")]);
        // The null signer ends up compatible with every wallet.
        let none = dataset.null_signer().unwrap();
        assert_eq!(
            none.compatible_wallets,
            [WalletId::from("sparrow"), WalletId::from("bluewallet")]
        );
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = dataset_from_json(
            r#"{
                "hardwareSigners": [
                    { "id": "trezor", "name": "Trezor" },
                    { "id": "trezor", "name": "Trezor again" }
                ],
                "softwareWallets": [],
                "nodes": []
            }"#,
        )
        .unwrap_err();
        assert!(matches!(err, DataError::Invalid(_)));
    }

    #[test]
    fn bundled_wallets_all_support_a_platform() {
        let dataset = bundled_dataset();
        for wallet in dataset.wallets() {
            assert!(
                wallet.supports(Platform::Desktop) || wallet.supports(Platform::Mobile),
                "{} supports no platform",
                wallet.id
            );
        }
    }
}
