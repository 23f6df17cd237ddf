//! ProfileStore - per-user profile and goal records
//!
//! Keeps one record per user identifier holding the onboarding profile and
//! the most recently submitted goals text. Records are independent by key;
//! every update is a locked read-modify-write of the whole document so two
//! near-simultaneous updates for the same user cannot drop a field.
//!
//! # Layout
//!
//! ```text
//! memory.json
//! {
//!   "42": {
//!     "profile": { "name": "Ada", "role": "student", "hours_per_day": 2.0, "hours_per_week": null },
//!     "last_goals": "thesis; db course"
//!   }
//! }
//! ```
//!
//! # Example
//!
//! ```ignore
//! use profilestore::{JsonProfileStore, Profile, ProfileStore};
//!
//! let store = JsonProfileStore::open("data/memory.json")?;
//! store.set("42", &Profile::new("Ada", "student"))?;
//! store.set_last_goal("42", "thesis; db course")?;
//! ```

pub mod cli;
pub mod config;
mod profile;
mod store;

pub use profile::Profile;
pub use store::{JsonProfileStore, MemoryProfileStore, ProfileStore, UserRecord};

use std::path::PathBuf;

/// File name of the default store document
pub const DEFAULT_FILE_NAME: &str = "memory.json";

/// Default location of the store document (`<data_dir>/planbot/memory.json`)
pub fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("planbot"))
        .unwrap_or_else(|| PathBuf::from("./data"))
        .join(DEFAULT_FILE_NAME)
}
