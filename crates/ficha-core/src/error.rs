use std::path::PathBuf;

/// Alias for `Result<T, StoreError>`.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by a [`CharacterStore`](crate::CharacterStore).
///
/// These are opaque to the rules engine: it never retries, it only
/// propagates them to the caller.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("store I/O error on {path}: {source}")]
    Io {
        /// The file being accessed.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The snapshot could not be encoded or decoded.
    #[error("store JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The snapshot was written by an incompatible format version.
    #[error("store version mismatch: expected {expected}, found {found}")]
    VersionMismatch {
        /// The version this build reads and writes.
        expected: u32,
        /// The version found on disk.
        found: u32,
    },

    /// A row was written for a character that does not exist.
    #[error("no character row for {0}")]
    MissingParent(String),

    /// A rename targeted a name the owner already uses.
    #[error("a character named {0} already exists")]
    NameTaken(String),

    /// A writer panicked while holding the table lock.
    #[error("store lock poisoned")]
    Poisoned,
}
