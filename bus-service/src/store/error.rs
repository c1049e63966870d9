//! Record store error types.

use std::path::PathBuf;

/// Errors from the record store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No record with this id
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// The record changed after the caller read it
    #[error("{entity} {id} was changed by someone else, please reload and try again")]
    StaleVersion { entity: &'static str, id: String },

    /// The record was deleted after the caller read it
    #[error("{entity} {id} was deleted by someone else")]
    Deleted { entity: &'static str, id: String },

    /// A record with this id already exists
    #[error("{entity} {id} already exists")]
    Duplicate { entity: &'static str, id: String },

    /// The change would break a reference between records
    #[error("{entity} {id}: {reason}")]
    Referential {
        entity: &'static str,
        id: String,
        reason: String,
    },

    /// The store could not be reached
    #[error("record store unavailable: {0}")]
    Unavailable(String),

    /// Snapshot file could not be read
    #[error("failed to read snapshot {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Snapshot file is not valid
    #[error("invalid snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
}

impl StoreError {
    /// Whether the user can resolve this by reloading or changing related
    /// records and trying again.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            StoreError::StaleVersion { .. }
                | StoreError::Deleted { .. }
                | StoreError::Duplicate { .. }
                | StoreError::Referential { .. }
        )
    }
}
