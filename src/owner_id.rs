use std::borrow::Borrow;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::str::FromStr;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde::de::Error as DeError;
use serde::de::Unexpected::Str;
use thiserror::Error;
use crate::lib_constants::MAX_OWNER_ID_LEN;

/// Stable identifier of an authenticated principal, the primary key of a note.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct OwnerIdString(String);

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum OwnerIdParseError {
    #[error("owner id is empty")]
    Empty,

    #[error("owner id is longer than {} bytes", MAX_OWNER_ID_LEN)]
    TooLong,

    #[error("owner id contains control characters")]
    ControlCharacter,
}

impl OwnerIdString {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn validate(s: &str) -> Result<(), OwnerIdParseError> {
    if s.is_empty() {
        Err(OwnerIdParseError::Empty)
    } else if s.len() > MAX_OWNER_ID_LEN {
        Err(OwnerIdParseError::TooLong)
    } else if s.chars().any(char::is_control) {
        Err(OwnerIdParseError::ControlCharacter)
    } else {
        Ok(())
    }
}

impl FromStr for OwnerIdString {
    type Err = OwnerIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate(s)?;
        Ok(OwnerIdString(s.to_owned()))
    }
}

impl Deref for OwnerIdString {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

// Maps keyed by owner id can be queried with a plain &str.
impl Borrow<str> for OwnerIdString {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl Display for OwnerIdString {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for OwnerIdString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for OwnerIdString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct Visitor;
        impl serde::de::Visitor<'_> for Visitor {
            type Value = OwnerIdString;

            fn expecting(&self, formatter: &mut Formatter) -> std::fmt::Result {
                formatter.write_str("string containing a valid owner id")
            }

            fn visit_str<E>(self, v: &str) -> Result<OwnerIdString, E>
            where
                E: DeError
            {
                OwnerIdString::from_str(v)
                    .map_err(|_| DeError::invalid_value(Str(v), &self))
            }
        }

        deserializer.deserialize_str(Visitor)
    }
}
