//! Application state shared across handlers.

use std::sync::Arc;

use tutordesk_core::{Storage, StudentStore, TutordeskConfig};

/// Shared application state.
///
/// Nothing in here mutates in place: [`Storage`] carries only the fixed root
/// path and the sled-backed [`StudentStore`] synchronizes internally, so a
/// plain `Arc` is enough.
pub struct AppState {
    /// Loaded application configuration.
    pub config: TutordeskConfig,

    /// Sandboxed PDF storage.
    pub storage: Storage,

    /// Student record store.
    pub students: StudentStore,
}

/// Handle shared by all request handlers.
pub type SharedState = Arc<AppState>;

impl AppState {
    /// Build the application state from configuration, opening the storage
    /// root and the student database.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage root cannot be created or the
    /// database cannot be opened.
    pub fn new(config: TutordeskConfig) -> anyhow::Result<SharedState> {
        let storage = Storage::open(&config.storage.root)?;
        let students = StudentStore::open(&config.database.path)?;

        Ok(Arc::new(Self {
            config,
            storage,
            students,
        }))
    }
}
