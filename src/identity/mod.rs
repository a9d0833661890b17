//! Player identity record: parsing, validation and generation.
//!
//! The canonical stored form is a JSON object with two non-empty string
//! fields:
//!
//! ```text
//! {"player_id":"3050371449-1021597263-1427962418-3860590587","name":"Guest A3F"}
//! ```

pub mod provisioner;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::ports::Entropy;

pub use provisioner::{Provisioner, Resolution, Source, StoragePolicy};

/// Number of 32-bit words drawn for a player identifier (128 bits).
pub const PLAYER_ID_WORDS: usize = 4;

/// Guest numbers are drawn from `0..GUEST_NUMBER_SPAN`.
pub const GUEST_NUMBER_SPAN: u32 = 4096;

const GUEST_PREFIX: &str = "Guest ";

/// A resolved player identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Opaque player identifier.
    pub player_id: String,
    /// Display name shown to other players.
    pub name: String,
}

impl Identity {
    /// Serializes the identity in its stored JSON form.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn encode(&self) -> Result<String, String> {
        serde_json::to_string(self)
            .map_err(|e| format!("Failed to encode identity {}: {e}", self.player_id))
    }
}

/// Outcome of inspecting a raw stored value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredIdentity {
    /// The value parsed and every required field is present.
    Valid(Identity),
    /// The value must be replaced.
    Invalid(Rejection),
}

/// Why a stored value was not accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Nothing is stored under the key.
    Missing,
    /// The value is not a JSON identity object.
    Malformed(String),
    /// A required field is absent or empty.
    Incomplete(&'static str),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "no stored identity"),
            Self::Malformed(detail) => write!(f, "malformed identity: {detail}"),
            Self::Incomplete(field) => write!(f, "identity is missing `{field}`"),
        }
    }
}

/// Classifies a raw stored value.
///
/// Only a JSON object is accepted; arrays and scalars are malformed even
/// when they would deserialize positionally. An empty string counts as
/// missing. Unknown extra fields are ignored.
#[must_use]
pub fn inspect(raw: Option<&str>) -> StoredIdentity {
    let Some(raw) = raw.filter(|r| !r.is_empty()) else {
        return StoredIdentity::Invalid(Rejection::Missing);
    };
    let fields = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(fields)) => fields,
        Ok(other) => {
            let found = json_kind(&other);
            return StoredIdentity::Invalid(Rejection::Malformed(format!(
                "expected a JSON object, found {found}"
            )));
        }
        Err(e) => return StoredIdentity::Invalid(Rejection::Malformed(e.to_string())),
    };
    let fields = (text_field(&fields, "player_id"), text_field(&fields, "name"));
    match fields {
        (Ok(player_id), Ok(name)) => StoredIdentity::Valid(Identity { player_id, name }),
        (Err(rejection), _) | (_, Err(rejection)) => StoredIdentity::Invalid(rejection),
    }
}

/// Extracts a required non-empty string field.
fn text_field(fields: &Map<String, Value>, name: &'static str) -> Result<String, Rejection> {
    match fields.get(name) {
        None | Some(Value::Null) => Err(Rejection::Incomplete(name)),
        Some(Value::String(text)) if text.is_empty() => Err(Rejection::Incomplete(name)),
        Some(Value::String(text)) => Ok(text.clone()),
        Some(other) => {
            Err(Rejection::Malformed(format!("`{name}` must be a string, found {}", json_kind(other))))
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Generates a fresh identity.
///
/// The identifier comes from the strong entropy source. When that source is
/// unavailable the weak generator fills in; such identifiers are predictable
/// and only suitable as low-stakes labels.
pub fn generate(entropy: &dyn Entropy) -> Identity {
    let mut words = [0u32; PLAYER_ID_WORDS];
    if let Err(e) = entropy.fill_strong(&mut words) {
        warn!(error = %e, "strong entropy unavailable, using weak generator for player id");
        for word in &mut words {
            *word = entropy.next_weak();
        }
    }
    let player_id = words.iter().map(u32::to_string).collect::<Vec<_>>().join("-");
    let name = guest_name(entropy.next_weak() % GUEST_NUMBER_SPAN);
    Identity { player_id, name }
}

/// Formats a guest display name: uppercase hex, no zero padding.
#[must_use]
pub fn guest_name(number: u32) -> String {
    format!("{GUEST_PREFIX}{number:X}")
}

/// Extracts the guest number from a generated guest name.
///
/// Returns `None` unless the name is `Guest ` followed by one to three
/// uppercase hex digits.
#[must_use]
pub fn parse_guest_number(name: &str) -> Option<u32> {
    let digits = name.strip_prefix(GUEST_PREFIX)?;
    let well_formed = (1..=3).contains(&digits.len())
        && digits.chars().all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c));
    if !well_formed {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}

/// Returns `true` for four hyphen-separated unsigned 32-bit decimal groups.
#[must_use]
pub fn is_composite_player_id(id: &str) -> bool {
    let groups: Vec<&str> = id.split('-').collect();
    groups.len() == PLAYER_ID_WORDS
        && groups
            .iter()
            .all(|g| !g.is_empty() && g.bytes().all(|b| b.is_ascii_digit()) && g.parse::<u32>().is_ok())
}
