//! The note of every owner, and the secret keys that open them to anonymous
//! api callers.

mod errors;
mod internal;

use std::sync::Arc;
use async_trait::async_trait;
use crate::data::{Note, PublicNote};
use crate::owner_id::OwnerIdString;
use crate::secret_key::SecretKey;

pub use errors::NoteStoreError;
pub use internal::ProductionNoteStore;

#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Returns the owner's note, creating an empty one on first access.
    async fn get_or_create(
        &self,
        owner_id: &OwnerIdString,
    ) -> Result<Arc<Note>, NoteStoreError>;

    async fn write(
        &self,
        owner_id: &OwnerIdString,
        text: &str,
    ) -> Result<Arc<Note>, NoteStoreError>;

    /// Replaces the owner's secret key, the previous one stops resolving
    /// immediately.
    async fn generate_key(
        &self,
        owner_id: &OwnerIdString,
    ) -> Result<SecretKey, NoteStoreError>;

    async fn find_by_key(
        &self,
        key: &str,
    ) -> Result<Option<Arc<Note>>, NoteStoreError>;

    async fn read_by_key(
        &self,
        key: &str,
    ) -> Result<PublicNote, NoteStoreError> {
        self.find_by_key(key)
            .await?
            .map(|note| PublicNote::from(note.as_ref()))
            .ok_or(NoteStoreError::NoteNotFound)
    }

    /// Fails with [`NoteStoreError::EmptyText`] on empty text before looking
    /// at the key.
    async fn write_by_key(
        &self,
        key: &str,
        text: &str,
    ) -> Result<(), NoteStoreError>;
}
