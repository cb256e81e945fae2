//! Persisted user preference store.
//!
//! One small JSON file. Malformed content is validated and discarded here,
//! before the engine ever sees it — the engine always receives either a
//! well-formed preference or none. Writes go through a temp file + rename
//! so a crash mid-write never leaves a torn file behind.

use std::fs;
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use keyfit_types::UserPreference;

#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored preference. A missing file or unparsable content
    /// yields `None`.
    #[must_use]
    pub fn load(&self) -> Option<UserPreference> {
        let bytes = fs::read(&self.path).ok()?;
        match serde_json::from_slice(&bytes) {
            Ok(preference) => Some(preference),
            Err(err) => {
                warn!(
                    path = %self.path.display(),
                    "discarding malformed stored preference: {err}"
                );
                None
            }
        }
    }

    /// Persist the preference atomically.
    pub fn save(&self, preference: &UserPreference) -> io::Result<()> {
        let parent = self.path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent)?;
        let json = serde_json::to_vec_pretty(preference).map_err(io::Error::other)?;

        let mut tmp = NamedTempFile::new_in(parent)?;
        tmp.write_all(&json)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|err| err.error)?;
        debug!(path = %self.path.display(), "preference saved");
        Ok(())
    }

    /// Remove the stored preference. Missing files are fine.
    pub fn clear(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyfit_types::{Platform, SignerWillingness};

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = PreferenceStore::new(dir.path().join("preference.json"));

        assert_eq!(store.load(), None);

        let preference = UserPreference::new(Platform::Mobile, SignerWillingness::NoSigner);
        store.save(&preference).unwrap();
        assert_eq!(store.load(), Some(preference));
    }

    #[test]
    fn malformed_content_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preference.json");
        fs::write(&path, b"{\"deviceType\": 7}").unwrap();

        let store = PreferenceStore::new(&path);
        assert_eq!(store.load(), None);
    }

    #[test]
    fn clear_tolerates_a_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = PreferenceStore::new(dir.path().join("preference.json"));
        store.clear().unwrap();

        store
            .save(&UserPreference::default())
            .unwrap();
        store.clear().unwrap();
        assert_eq!(store.load(), None);
    }
}
