use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

static RECORD_ID_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9a-fA-F]{24}$").expect("static regex is valid"));

/// System-generated identifier for a stored entity.
///
/// Always 24 lowercase hexadecimal characters (12 random bytes).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordId(String);

impl RecordId {
    // ---
    /// Generate a fresh identifier.
    pub fn generate() -> Self {
        // ---
        let uuid = Uuid::new_v4();
        RecordId(hex::encode(&uuid.as_bytes()[..12]))
    }

    /// Parse a token that has the identifier shape. Case-insensitive.
    pub fn parse(token: &str) -> Option<Self> {
        // ---
        RECORD_ID_SHAPE
            .is_match(token)
            .then(|| RecordId(token.to_ascii_lowercase()))
    }

    /// Wrap a value read back from storage, where the shape is already enforced.
    pub(crate) fn from_trusted(value: String) -> Self {
        RecordId(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for RecordId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        RecordId::parse(&value).ok_or_else(|| format!("invalid record id: {value:?}"))
    }
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

/// A reference to a student as typed by a caller.
///
/// Callers may address a student either by the internal identifier or by the
/// institution-issued student ID. Classification is purely by shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudentRef {
    Internal(RecordId),
    External(String),
}

impl StudentRef {
    // ---
    pub fn classify(token: &str) -> Self {
        // ---
        match RecordId::parse(token) {
            Some(id) => StudentRef::Internal(id),
            None => StudentRef::External(token.to_string()),
        }
    }
}
