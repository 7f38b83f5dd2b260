use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use crate::owner_id::OwnerIdString;
use crate::secret_key::SecretKey;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Note {
    pub owner_id: OwnerIdString,
    pub text: String,
    pub last_modified: OffsetDateTime,
    pub secret_key: Option<SecretKey>,
}

/// What a secret key holder gets to see of a note.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PublicNote {
    pub text: String,

    /// seconds since the unix epoch
    pub last_modified: i64,
}

impl From<&Note> for PublicNote {
    fn from(note: &Note) -> Self {
        PublicNote {
            text: note.text.clone(),
            last_modified: note.last_modified.unix_timestamp(),
        }
    }
}
