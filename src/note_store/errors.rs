use std::io::Error as IoError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NoteStoreError {
    #[error("data directory is not initialized properly")]
    DataDirNotInitialized,

    #[error(transparent)]
    Io(#[from] IoError),

    #[error("note store is locked by another process")]
    LockingFailed,

    #[error("invalid note db contents: {0}")]
    Parsing(#[from] toml::de::Error),

    #[error("serializing the note db failed: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("note not found")]
    NoteNotFound,

    #[error("text not provided")]
    EmptyText,

    #[error("could not generate a unique secret key")]
    KeyGeneration,
}

impl From<std::fs::TryLockError> for NoteStoreError {
    fn from(e: std::fs::TryLockError) -> Self {
        match e {
            std::fs::TryLockError::WouldBlock => NoteStoreError::LockingFailed,
            std::fs::TryLockError::Error(e) => NoteStoreError::Io(e),
        }
    }
}
