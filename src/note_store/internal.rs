use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use async_trait::async_trait;
use log::{debug, error, info, trace, warn};
use rand::rngs::StdRng;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use crate::config::app_config::AppConfig;
use crate::data::Note;
use crate::lib_constants::MAX_KEY_GENERATION_ATTEMPTS;
use crate::note_store::internal::data::{NoteData, NotesData};
use crate::note_store::internal::io_trait::{NoteStoreIo, ProductionNoteStoreIo};
use crate::note_store::{NoteStore, NoteStoreError};
use crate::owner_id::OwnerIdString;
use crate::rng::SyncRng;
use crate::secret_key::SecretKey;

#[cfg(test)] mod tests;
mod data;
mod io_trait;

pub type ProductionNoteStore = NoteStoreImpl<ProductionNoteStoreIo>;

#[allow(private_bounds)]
pub struct NoteStoreImpl<Io: NoteStoreIo> {
    state: RwLock<State>,
    io: Io,
}

#[derive(Debug, Default)]
struct State {
    owner_to_note: HashMap<OwnerIdString, Arc<Note>>,
    key_to_owner: HashMap<SecretKey, OwnerIdString>,
}

impl From<NotesData> for State {
    fn from(value: NotesData) -> Self {
        let mut state = State::default();
        for note_data in value.notes {
            if state.owner_to_note.contains_key(&note_data.owner_id) {
                warn!(
                    "duplicate note for owner \"{}\" in the note db, \
                        keeping the last one",
                    note_data.owner_id,
                );
            }
            if let Some(ref key) = note_data.secret_key
                && let Some(other_owner) = state.key_to_owner.get(key)
                && *other_owner != note_data.owner_id
            {
                warn!(
                    "secret key {} is shared by owners \"{other_owner}\" \
                        and \"{}\", dropping it from both",
                    key.redacted(),
                    note_data.owner_id,
                );
                let other_owner = other_owner.clone();
                state.key_to_owner.remove(key);
                if let Some(other_note) = state.owner_to_note.get(&other_owner) {
                    let mut other_note = other_note.as_ref().clone();
                    other_note.secret_key = None;
                    state.owner_to_note.insert(other_owner, Arc::new(other_note));
                }
                let mut note: Note = note_data.into();
                note.secret_key = None;
                state.commit(note);
                continue;
            }
            state.commit(note_data.into());
        }
        state
    }
}

impl State {
    fn get(&self, owner_id: &str) -> Option<&Arc<Note>> {
        self.owner_to_note.get(owner_id)
    }

    fn get_by_key(&self, key: &SecretKey) -> Option<&Arc<Note>> {
        self.key_to_owner
            .get(key)
            .and_then(|owner_id| self.owner_to_note.get(owner_id))
    }

    /// The db contents as they would be with `changed` committed.
    fn to_data_with(&self, changed: &Note) -> NotesData {
        let mut notes: Vec<_> = self.owner_to_note
            .values()
            .filter(|note| note.owner_id != changed.owner_id)
            .map(|note| NoteData::from(note.as_ref()))
            .chain(std::iter::once(NoteData::from(changed)))
            .collect();
        notes.sort_by(|a, b| a.owner_id.cmp(&b.owner_id));
        NotesData { notes }
    }

    fn commit(&mut self, note: Note) -> Arc<Note> {
        let note = Arc::new(note);
        if let Some(previous) = self.owner_to_note
            .insert(note.owner_id.clone(), note.clone())
            && let Some(ref previous_key) = previous.secret_key
            && note.secret_key.as_ref() != Some(previous_key)
        {
            self.key_to_owner.remove(previous_key);
        }
        if let Some(ref key) = note.secret_key {
            self.key_to_owner.insert(key.clone(), note.owner_id.clone());
        }
        note
    }
}

impl ProductionNoteStore {
    pub async fn new(
        app_config: &AppConfig,
        rng: SyncRng<StdRng>,
    ) -> Result<ProductionNoteStore, NoteStoreError> {
        debug!(
            "creating note store at {}",
            app_config.data_directory.display(),
        );
        Self::new_impl(
            ProductionNoteStoreIo::new(&app_config.data_directory, rng)?,
        ).await
    }
}

#[allow(private_bounds)]
impl<Io: NoteStoreIo> NoteStoreImpl<Io> {
    async fn new_impl(io: Io) -> Result<Self, NoteStoreError> {
        let state: State = io.read_notes_file()
            .await?
            .into();
        info!("loaded {} notes", state.owner_to_note.len());
        Ok(
            NoteStoreImpl {
                state: RwLock::new(state),
                io,
            }
        )
    }

    /// Writes the db with `note` in it and only then makes the note visible.
    async fn persist(
        &self,
        state: &mut State,
        note: Note,
    ) -> Result<Arc<Note>, NoteStoreError> {
        let data = state.to_data_with(&note);
        self.io.write_notes_file(&data)
            .await
            .inspect_err(|e|
                error!(
                    "failed to save the note of \"{}\": {e}",
                    note.owner_id,
                )
            )?;
        Ok(state.commit(note))
    }

    fn next_mtime(&self, previous: Option<&Note>) -> OffsetDateTime {
        let now = self.io.get_time();
        match previous {
            Some(previous) if previous.last_modified > now => {
                warn!(
                    "clock went backwards: now {now}, note of \"{}\" \
                        last modified at {}",
                    previous.owner_id,
                    previous.last_modified,
                );
                previous.last_modified
            },
            _ => now,
        }
    }

    fn unique_key(&self, state: &State) -> Result<SecretKey, NoteStoreError> {
        for _ in 0..MAX_KEY_GENERATION_ATTEMPTS {
            let key = self.io.gen_secret_key();
            if !state.key_to_owner.contains_key(&key) {
                return Ok(key);
            }
            warn!("generated secret key collides with an existing one, retrying");
        }
        error!(
            "failed to generate a unique secret key \
                in {MAX_KEY_GENERATION_ATTEMPTS} attempts"
        );
        Err(NoteStoreError::KeyGeneration)
    }

    fn empty_note(&self, owner_id: &OwnerIdString) -> Note {
        Note {
            owner_id: owner_id.clone(),
            text: String::new(),
            last_modified: self.io.get_time(),
            secret_key: None,
        }
    }
}

#[async_trait]
impl<Io: NoteStoreIo> NoteStore for NoteStoreImpl<Io> {
    async fn get_or_create(
        &self,
        owner_id: &OwnerIdString,
    ) -> Result<Arc<Note>, NoteStoreError> {
        if let Some(note) = self.state.read().await.get(owner_id) {
            trace!("found note of \"{owner_id}\"");
            return Ok(note.clone());
        }
        let mut state = self.state.write().await;
        if let Some(note) = state.get(owner_id) {
            trace!("note of \"{owner_id}\" was created concurrently");
            return Ok(note.clone());
        }
        info!("creating note for \"{owner_id}\"");
        let note = self.empty_note(owner_id);
        self.persist(&mut state, note).await
    }

    async fn write(
        &self,
        owner_id: &OwnerIdString,
        text: &str,
    ) -> Result<Arc<Note>, NoteStoreError> {
        debug!("writing note of \"{owner_id}\", {} bytes", text.len());
        let mut state = self.state.write().await;
        let previous = state.get(owner_id).cloned();
        let note = Note {
            owner_id: owner_id.clone(),
            text: text.to_owned(),
            last_modified: self.next_mtime(previous.as_deref()),
            secret_key: previous.and_then(|p| p.secret_key.clone()),
        };
        self.persist(&mut state, note).await
    }

    async fn generate_key(
        &self,
        owner_id: &OwnerIdString,
    ) -> Result<SecretKey, NoteStoreError> {
        let mut state = self.state.write().await;
        let key = self.unique_key(&state)?;
        let mut note = match state.get(owner_id) {
            Some(note) => note.as_ref().clone(),
            None => self.empty_note(owner_id),
        };
        note.secret_key = Some(key.clone());
        self.persist(&mut state, note).await?;
        info!("rotated secret key of \"{owner_id}\" to {}", key.redacted());
        Ok(key)
    }

    async fn find_by_key(
        &self,
        key: &str,
    ) -> Result<Option<Arc<Note>>, NoteStoreError> {
        let Ok(key) = SecretKey::from_str(key) else {
            trace!("malformed secret key requested");
            return Ok(None);
        };
        let found = self.state.read().await.get_by_key(&key).cloned();
        trace!(
            "looked up secret key {}: {}",
            key.redacted(),
            if found.is_some() { "found" } else { "not found" },
        );
        Ok(found)
    }

    async fn write_by_key(
        &self,
        key: &str,
        text: &str,
    ) -> Result<(), NoteStoreError> {
        if text.is_empty() {
            return Err(NoteStoreError::EmptyText);
        }
        let key = SecretKey::from_str(key)
            .map_err(|_| NoteStoreError::NoteNotFound)?;
        let mut state = self.state.write().await;
        let previous = state.get_by_key(&key)
            .cloned()
            .ok_or(NoteStoreError::NoteNotFound)?;
        debug!(
            "writing note by secret key {}, {} bytes",
            key.redacted(),
            text.len(),
        );
        let note = Note {
            owner_id: previous.owner_id.clone(),
            text: text.to_owned(),
            last_modified: self.next_mtime(Some(&previous)),
            secret_key: previous.secret_key.clone(),
        };
        self.persist(&mut state, note).await?;
        Ok(())
    }
}
