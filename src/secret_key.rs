use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;
use rand::CryptoRng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde::de::Error as DeError;
use serde::de::Unexpected::Str;
use thiserror::Error;
use crate::lib_constants::{SECRET_KEY_BYTES, SECRET_KEY_HEX_LEN};

const REDACTED_PREFIX_LEN: usize = 6;

/// Token granting anonymous read/write access to exactly one note.
///
/// Always [`SECRET_KEY_HEX_LEN`] lowercase hex digits, so it can be embedded
/// into a url path segment as is. `Debug` and [`SecretKey::redacted`] only
/// show a short prefix.
#[derive(Clone, Eq, Hash, PartialEq)]
pub struct SecretKey(String);

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[error("malformed secret key")]
pub struct SecretKeyParseError;

impl SecretKey {
    pub fn generate(rng: &mut impl CryptoRng) -> SecretKey {
        let mut bytes = [0u8; SECRET_KEY_BYTES];
        rng.fill_bytes(&mut bytes);
        SecretKey(hex::encode(bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn redacted(&self) -> Redacted<'_> {
        Redacted(&self.0[..REDACTED_PREFIX_LEN])
    }
}

pub struct Redacted<'a>(&'a str);

impl Display for Redacted<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}…", self.0)
    }
}

impl Debug for SecretKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SecretKey")
            .field(&format_args!("{}", self.redacted()))
            .finish()
    }
}

impl FromStr for SecretKey {
    type Err = SecretKeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() == SECRET_KEY_HEX_LEN
            && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
        {
            Ok(SecretKey(s.to_owned()))
        } else {
            Err(SecretKeyParseError)
        }
    }
}

impl Serialize for SecretKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for SecretKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct Visitor;
        impl serde::de::Visitor<'_> for Visitor {
            type Value = SecretKey;

            fn expecting(&self, formatter: &mut Formatter) -> std::fmt::Result {
                write!(formatter, "{SECRET_KEY_HEX_LEN} lowercase hex digits")
            }

            fn visit_str<E>(self, v: &str) -> Result<SecretKey, E>
            where
                E: DeError
            {
                SecretKey::from_str(v)
                    .map_err(|_| DeError::invalid_value(Str(v), &self))
            }
        }

        deserializer.deserialize_str(Visitor)
    }
}
