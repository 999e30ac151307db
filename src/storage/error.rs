use std::path::PathBuf;
use thiserror::Error;

/// Failure reported by a [`Store`](super::Store) operation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to open database at {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("failed to create data directory {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: i64 },

    #[error("stored {kind} {id} is unreadable: {detail}")]
    Corrupt {
        kind: &'static str,
        id: i64,
        detail: String,
    },
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}
