//! Persisted user preference.
//!
//! The engine only ever reads a preference and may hand back an updated copy
//! as a side-effect annotation; storage IO belongs to the collaborator that
//! owns the file.

use serde::{Deserialize, Serialize};

use crate::dataset::Platform;

/// Whether the user is willing to use a hardware signer at all, as recorded
/// by the guided intro. Gates signer breathing in the guided variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SignerWillingness {
    NoSigner,
    WithSigner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreference {
    pub device_type: Platform,
    pub signer_willingness: SignerWillingness,
}

impl Default for UserPreference {
    fn default() -> Self {
        Self {
            device_type: Platform::Desktop,
            signer_willingness: SignerWillingness::WithSigner,
        }
    }
}

impl UserPreference {
    #[must_use]
    pub fn new(device_type: Platform, signer_willingness: SignerWillingness) -> Self {
        Self {
            device_type,
            signer_willingness,
        }
    }

    #[must_use]
    pub fn with_device_type(self, device_type: Platform) -> Self {
        Self {
            device_type,
            ..self
        }
    }

    #[must_use]
    pub fn with_willingness(self, signer_willingness: SignerWillingness) -> Self {
        Self {
            signer_willingness,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_shape_matches_stored_preference() {
        let json = serde_json::json!({
            "deviceType": "mobile",
            "signerWillingness": "no-signer"
        });
        let parsed: UserPreference = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.device_type, Platform::Mobile);
        assert_eq!(parsed.signer_willingness, SignerWillingness::NoSigner);
    }

    #[test]
    fn with_device_type_preserves_willingness() {
        let pref = UserPreference::new(Platform::Desktop, SignerWillingness::NoSigner);
        let updated = pref.with_device_type(Platform::Mobile);
        assert_eq!(updated.device_type, Platform::Mobile);
        assert_eq!(updated.signer_willingness, SignerWillingness::NoSigner);
    }
}
