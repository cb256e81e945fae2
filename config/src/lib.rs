//! Engine policy configuration.
//!
//! The selection engine's historical rule variants are configuration, not
//! code forks: the cascade behavior on deselect, whether signer breathing is
//! gated by the recorded willingness, and every completion-score constant
//! live here. Raw TOML deserialization structs (with `Option` fields) stay
//! private; [`EnginePolicy::from_toml_str`] resolves them into validated
//! values at the parse boundary.

use std::fs;
use std::io;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use keyfit_types::Threshold;

/// What deselecting an item (or replacing a wallet) does to downstream picks.
///
/// `Downstream` eagerly clears them; `None` leaves them in place and lets
/// the next derivation pass re-validate lazily. Cascades never run upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CascadePolicy {
    #[default]
    Downstream,
    None,
}

/// Discrete single-sig score buckets, keyed on what is selected.
///
/// Reproduces the literal table of the reference implementation; the exact
/// values are configuration, not hard law.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SingleScoreTable {
    /// Hardware signer only, no wallet.
    pub hardware_only: u32,
    /// Null signer plus wallet.
    pub null_wallet: u32,
    /// Null signer plus wallet plus non-default node.
    pub null_wallet_node: u32,
    /// Hardware signer plus wallet.
    pub hardware_wallet: u32,
    /// Hardware signer plus wallet plus non-default node.
    pub hardware_wallet_node: u32,
}

impl Default for SingleScoreTable {
    fn default() -> Self {
        Self {
            hardware_only: 50,
            null_wallet: 60,
            null_wallet_node: 80,
            hardware_wallet: 100,
            hardware_wallet_node: 120,
        }
    }
}

/// Multi-sig score weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MultiScoreConfig {
    /// Credit for having chosen a threshold at all.
    pub base: u32,
    /// Per-filled-slot weight under 2-of-3.
    pub slot_weight_three: u32,
    /// Per-filled-slot weight under 3-of-5.
    pub slot_weight_five: u32,
    pub wallet: u32,
    pub node: u32,
    /// Extra credit when all five slots of a 3-of-5 fill.
    pub full_slot_bonus_five: u32,
    /// Upper clamp; `None` lets multi-sig exceed the single-sig ceiling.
    pub cap: Option<u32>,
}

impl MultiScoreConfig {
    #[must_use]
    pub fn slot_weight(&self, threshold: Threshold) -> u32 {
        match threshold {
            Threshold::TwoOfThree => self.slot_weight_three,
            Threshold::ThreeOfFive => self.slot_weight_five,
        }
    }
}

/// All completion-score constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreConfig {
    pub single: SingleScoreTable,
    pub multi: MultiScoreConfig,
}

impl ScoreConfig {
    /// The reference formula: discrete single-sig buckets, multi-sig
    /// `10 + slots x {20,12} + 20 + 10` capped at 100.
    #[must_use]
    pub fn classic() -> Self {
        Self {
            single: SingleScoreTable::default(),
            multi: MultiScoreConfig {
                base: 10,
                slot_weight_three: 20,
                slot_weight_five: 12,
                wallet: 20,
                node: 10,
                full_slot_bonus_five: 0,
                cap: Some(100),
            },
        }
    }

    /// The uncapped variant: heavier wallet/node weights and a full-slot
    /// bonus so multi-sig tops out above single-sig (130 for 2-of-3, 150
    /// for 3-of-5), signalling "more signers = more secure".
    #[must_use]
    pub fn extended() -> Self {
        Self {
            single: SingleScoreTable::default(),
            multi: MultiScoreConfig {
                base: 0,
                slot_weight_three: 20,
                slot_weight_five: 15,
                wallet: 50,
                node: 20,
                full_slot_bonus_five: 5,
                cap: None,
            },
        }
    }
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self::classic()
    }
}

/// Resolved engine policy. Existence of a value proves it parsed cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnginePolicy {
    pub cascade: CascadePolicy,
    /// Gate signer breathing on the recorded willingness (the guided-intro
    /// variant). When off, hardware signers breathe unconditionally and the
    /// null signer is always eligible.
    pub willingness_gating: bool,
    pub score: ScoreConfig,
}

impl Default for EnginePolicy {
    fn default() -> Self {
        Self {
            cascade: CascadePolicy::Downstream,
            willingness_gating: true,
            score: ScoreConfig::classic(),
        }
    }
}

#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("failed to read policy file {path}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse policy file")]
    Parse(#[from] toml::de::Error),
    #[error("unknown score preset {0:?}, expected \"classic\" or \"extended\"")]
    UnknownPreset(String),
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPolicy {
    cascade: Option<CascadePolicy>,
    willingness_gating: Option<bool>,
    score: Option<RawScore>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawScore {
    preset: Option<String>,
    single: Option<RawSingleScore>,
    multi: Option<RawMultiScore>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSingleScore {
    hardware_only: Option<u32>,
    null_wallet: Option<u32>,
    null_wallet_node: Option<u32>,
    hardware_wallet: Option<u32>,
    hardware_wallet_node: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawMultiScore {
    base: Option<u32>,
    slot_weight_three: Option<u32>,
    slot_weight_five: Option<u32>,
    wallet: Option<u32>,
    node: Option<u32>,
    full_slot_bonus_five: Option<u32>,
    /// A cap of 0 means "uncapped" in the file format.
    cap: Option<u32>,
}

impl EnginePolicy {
    pub fn load(path: &Path) -> Result<Self, PolicyError> {
        let raw = fs::read_to_string(path).map_err(|source| PolicyError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, PolicyError> {
        let raw: RawPolicy = toml::from_str(raw)?;
        let defaults = Self::default();

        let score_raw = raw.score.unwrap_or_default();
        let mut score = match score_raw.preset.as_deref() {
            None | Some("classic") => ScoreConfig::classic(),
            Some("extended") => ScoreConfig::extended(),
            Some(other) => return Err(PolicyError::UnknownPreset(other.to_owned())),
        };
        if let Some(single) = score_raw.single {
            apply_single_overrides(&mut score.single, &single);
        }
        if let Some(multi) = score_raw.multi {
            apply_multi_overrides(&mut score.multi, &multi);
        }

        Ok(Self {
            cascade: raw.cascade.unwrap_or(defaults.cascade),
            willingness_gating: raw.willingness_gating.unwrap_or(defaults.willingness_gating),
            score,
        })
    }
}

fn apply_single_overrides(table: &mut SingleScoreTable, raw: &RawSingleScore) {
    if let Some(value) = raw.hardware_only {
        table.hardware_only = value;
    }
    if let Some(value) = raw.null_wallet {
        table.null_wallet = value;
    }
    if let Some(value) = raw.null_wallet_node {
        table.null_wallet_node = value;
    }
    if let Some(value) = raw.hardware_wallet {
        table.hardware_wallet = value;
    }
    if let Some(value) = raw.hardware_wallet_node {
        table.hardware_wallet_node = value;
    }
}

fn apply_multi_overrides(config: &mut MultiScoreConfig, raw: &RawMultiScore) {
    if let Some(value) = raw.base {
        config.base = value;
    }
    if let Some(value) = raw.slot_weight_three {
        config.slot_weight_three = value;
    }
    if let Some(value) = raw.slot_weight_five {
        config.slot_weight_five = value;
    }
    if let Some(value) = raw.wallet {
        config.wallet = value;
    }
    if let Some(value) = raw.node {
        config.node = value;
    }
    if let Some(value) = raw.full_slot_bonus_five {
        config.full_slot_bonus_five = value;
    }
    if let Some(value) = raw.cap {
        config.cap = (value > 0).then_some(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_variant() {
        let policy = EnginePolicy::default();
        assert_eq!(policy.cascade, CascadePolicy::Downstream);
        assert!(policy.willingness_gating);
        assert_eq!(policy.score.multi.cap, Some(100));
        assert_eq!(policy.score.single.hardware_wallet_node, 120);
    }

    #[test]
    fn empty_file_resolves_to_defaults() {
        let policy = EnginePolicy::from_toml_str("").unwrap();
        assert_eq!(policy, EnginePolicy::default());
    }

    #[test]
    fn extended_preset_lifts_the_cap() {
        let policy = EnginePolicy::from_toml_str("[score]\npreset = \"extended\"\n").unwrap();
        assert_eq!(policy.score.multi.cap, None);
        assert_eq!(policy.score.multi.wallet, 50);
        assert_eq!(policy.score.multi.full_slot_bonus_five, 5);
    }

    #[test]
    fn overrides_apply_on_top_of_preset() {
        let policy = EnginePolicy::from_toml_str(
            "cascade = \"none\"\n\n[score.multi]\nnode = 15\ncap = 0\n",
        )
        .unwrap();
        assert_eq!(policy.cascade, CascadePolicy::None);
        assert_eq!(policy.score.multi.node, 15);
        assert_eq!(policy.score.multi.cap, None);
        // untouched fields keep the classic preset
        assert_eq!(policy.score.multi.slot_weight_five, 12);
    }

    #[test]
    fn unknown_preset_is_rejected() {
        let err = EnginePolicy::from_toml_str("[score]\npreset = \"legacy\"\n").unwrap_err();
        assert!(matches!(err, PolicyError::UnknownPreset(name) if name == "legacy"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(EnginePolicy::from_toml_str("cascde = \"none\"\n").is_err());
    }

    #[test]
    fn slot_weight_follows_threshold() {
        let score = ScoreConfig::classic();
        assert_eq!(score.multi.slot_weight(Threshold::TwoOfThree), 20);
        assert_eq!(score.multi.slot_weight(Threshold::ThreeOfFive), 12);
    }
}
