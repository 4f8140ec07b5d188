use std::fmt;
use std::str::FromStr;

use bson::oid::ObjectId;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Length of the canonical hex form of a document identifier.
pub const ID_LENGTH: usize = 24;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Invalid id: {0}")]
pub struct IdError(pub String);

/// Store-assigned document identifier (a 12-byte ObjectId).
///
/// The wire form is always the 24 character lowercase hex string. Identifiers sort
/// by creation time because the leading four bytes are a timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(ObjectId);

impl DocumentId {
    pub fn new() -> Self {
        Self(ObjectId::new())
    }

    /// Parse a canonical identifier, rejecting anything that does not round-trip
    /// unchanged (wrong length, non-hex characters, uppercase hex).
    pub fn parse(value: &str) -> Result<Self, IdError> {
        if value.len() != ID_LENGTH {
            return Err(IdError(value.to_string()));
        }
        let oid = ObjectId::parse_str(value).map_err(|_| IdError(value.to_string()))?;
        if oid.to_hex() != value {
            return Err(IdError(value.to_string()));
        }
        Ok(Self(oid))
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

/// Request admission guard for `:id` path parameters.
pub fn is_valid_id(value: &str) -> bool {
    DocumentId::parse(value).is_ok()
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_hex())
    }
}

impl FromStr for DocumentId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for DocumentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for DocumentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DocumentId::parse(&raw).map_err(serde::de::Error::custom)
    }
}
