//! Dataset and preference collaborators for Keyfit.
//!
//! The engine itself performs no IO; this crate owns the two external
//! boundaries: loading the immutable compatibility dataset from JSON and
//! persisting the small user-preference record. Everything handed to the
//! engine is validated here first.

mod loader;
mod prefs;

pub use loader::{DataError, bundled_dataset, dataset_from_json, load_dataset};
pub use prefs::PreferenceStore;
