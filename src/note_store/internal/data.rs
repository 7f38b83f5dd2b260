use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use crate::data::Note;
use crate::owner_id::OwnerIdString;
use crate::secret_key::SecretKey;

#[derive(Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct NotesData {
    #[serde(default, rename = "note")]
    pub notes: Vec<NoteData>,
}

#[derive(Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct NoteData {
    pub owner_id: OwnerIdString,

    #[serde(with = "time::serde::rfc3339")]
    pub last_modified: OffsetDateTime,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<SecretKey>,

    pub text: String,
}

impl From<NoteData> for Note {
    fn from(value: NoteData) -> Self {
        Note {
            owner_id: value.owner_id,
            text: value.text,
            last_modified: value.last_modified,
            secret_key: value.secret_key,
        }
    }
}

impl From<&Note> for NoteData {
    fn from(value: &Note) -> Self {
        NoteData {
            owner_id: value.owner_id.clone(),
            last_modified: value.last_modified,
            secret_key: value.secret_key.clone(),
            text: value.text.clone(),
        }
    }
}
