use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use async_trait::async_trait;
use log::{error, trace};
use rand::rngs::StdRng;
use time::OffsetDateTime;
use tokio::fs;
use crate::lib_constants::{NOTES_DB_FILE, NOTES_LOCK_FILE, TMP_FILENAME_INFIX};
use crate::note_store::internal::data::NotesData;
use crate::note_store::NoteStoreError;
use crate::rng::{make_uuid, SyncRng};
use crate::secret_key::SecretKey;

/// Everything the store needs from the outside world: the db file, the
/// clock and the entropy source.
#[async_trait]
pub(crate) trait NoteStoreIo: Send + Sync {
    async fn read_notes_file(
        &self,
    ) -> Result<NotesData, NoteStoreError>;

    async fn write_notes_file(
        &self,
        notes_data: &NotesData,
    ) -> Result<(), NoteStoreError>;

    fn gen_secret_key(&self) -> SecretKey;

    fn get_time(&self) -> OffsetDateTime;
}

pub struct ProductionNoteStoreIo {
    db_path: PathBuf,
    rng: SyncRng<StdRng>,
    _lock_file: std::fs::File, // holds the store lock
}

impl ProductionNoteStoreIo {
    pub fn new(
        data_directory: &Path,
        rng: SyncRng<StdRng>,
    ) -> Result<Self, NoteStoreError> {
        match std::fs::metadata(data_directory) {
            Ok(meta) if meta.is_dir() => {},
            Ok(_) => return Err(NoteStoreError::DataDirNotInitialized),
            Err(e) if e.kind() == ErrorKind::NotFound =>
                return Err(NoteStoreError::DataDirNotInitialized),
            Err(e) => return Err(e.into()),
        }
        let lock_file = std::fs::File::options()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(data_directory.join(NOTES_LOCK_FILE))?;
        lock_file.try_lock()?;
        Ok(
            ProductionNoteStoreIo {
                db_path: data_directory.join(NOTES_DB_FILE),
                rng,
                _lock_file: lock_file,
            }
        )
    }

    fn get_tmp_path(&self) -> PathBuf {
        let mut name = self.db_path.as_os_str().to_owned();
        name.push(TMP_FILENAME_INFIX);
        name.push(
            make_uuid(&mut *self.rng.get_rng())
                .hyphenated()
                .to_string()
        );
        name.into()
    }
}

#[async_trait]
impl NoteStoreIo for ProductionNoteStoreIo {
    async fn read_notes_file(
        &self,
    ) -> Result<NotesData, NoteStoreError> {
        trace!("reading note db at \"{}\"", self.db_path.display());
        match fs::read_to_string(&self.db_path).await {
            Ok(contents) => Ok(toml::from_str(&contents)?),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                trace!("no note db yet at \"{}\"", self.db_path.display());
                Ok(NotesData::default())
            },
            Err(e) => Err(e.into()),
        }
    }

    async fn write_notes_file(
        &self,
        notes_data: &NotesData,
    ) -> Result<(), NoteStoreError> {
        let contents = toml::to_string(notes_data)?;
        let tmp_path = self.get_tmp_path();
        trace!("writing note db to tmp file \"{}\"", tmp_path.display());
        fs::write(&tmp_path, contents).await?;
        if let Err(e) = fs::rename(&tmp_path, &self.db_path).await {
            error!(
                "failed to rename tmp file \"{}\" to \"{}\": {e}",
                tmp_path.display(),
                self.db_path.display(),
            );
            if let Err(e) = fs::remove_file(&tmp_path).await {
                error!(
                    "failed to remove tmp file \"{}\": {e}",
                    tmp_path.display(),
                );
            }
            return Err(e.into())
        }
        Ok(())
    }

    fn gen_secret_key(&self) -> SecretKey {
        SecretKey::generate(&mut *self.rng.get_rng())
    }

    fn get_time(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}
