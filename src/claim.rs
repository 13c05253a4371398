//! Identity claim carried inside tokens, and its payload codec.
//!
//! The payload is a flat JSON object with the fields `id`, `roles` and
//! `permissions`. The expiry field (`exp`) lives in the same object but is
//! owned by the token layer, so the codec neither writes nor reads it.

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Generic key/value payload embedded in a signed token.
pub type Payload = Map<String, Value>;

pub const ID_FIELD: &str = "id";
pub const ROLES_FIELD: &str = "roles";
pub const PERMISSIONS_FIELD: &str = "permissions";

/// Errors produced while building or decoding a claim.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("missing claim field `{0}`")]
    MissingField(&'static str),

    #[error("claim field `{field}` must be {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },
}

/// Authenticated identity: member id plus granted roles and permissions.
///
/// Roles and permissions keep their first-seen order (duplicates dropped) so
/// encoding is deterministic, but equality treats them as sets.
#[derive(Debug, Clone, Serialize)]
pub struct Claim {
    id: u64,
    roles: Vec<String>,
    permissions: Vec<String>,
}

impl Claim {
    /// Build a claim. `id` must be positive.
    pub fn new<R, P>(id: u64, roles: R, permissions: P) -> Result<Self, CodecError>
    where
        R: IntoIterator,
        R::Item: Into<String>,
        P: IntoIterator,
        P::Item: Into<String>,
    {
        if id == 0 {
            return Err(CodecError::InvalidField {
                field: ID_FIELD,
                expected: "a positive integer",
            });
        }
        Ok(Self {
            id,
            roles: dedup(roles.into_iter().map(Into::into)),
            permissions: dedup(permissions.into_iter().map(Into::into)),
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    pub fn permissions(&self) -> &[String] {
        &self.permissions
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }
}

impl PartialEq for Claim {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && same_members(&self.roles, &other.roles)
            && same_members(&self.permissions, &other.permissions)
    }
}

impl Eq for Claim {}

fn dedup(items: impl Iterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

// Both sides are duplicate-free, so equal length plus containment is set equality.
fn same_members(a: &[String], b: &[String]) -> bool {
    a.len() == b.len() && a.iter().all(|x| b.contains(x))
}

/// Encode a claim into a token payload.
pub fn to_payload(claim: &Claim) -> Payload {
    let mut payload = Payload::new();
    payload.insert(ID_FIELD.to_string(), Value::from(claim.id));
    payload.insert(ROLES_FIELD.to_string(), string_array(&claim.roles));
    payload.insert(PERMISSIONS_FIELD.to_string(), string_array(&claim.permissions));
    payload
}

fn string_array(items: &[String]) -> Value {
    Value::Array(items.iter().cloned().map(Value::String).collect())
}

/// Decode a claim from a token payload.
///
/// Fields outside the claim schema are ignored. A missing or `null` role or
/// permission list decodes as empty; `id` is required.
pub fn from_payload(payload: &Payload) -> Result<Claim, CodecError> {
    let id = match payload.get(ID_FIELD) {
        None | Some(Value::Null) => return Err(CodecError::MissingField(ID_FIELD)),
        Some(value) => value.as_u64().ok_or(CodecError::InvalidField {
            field: ID_FIELD,
            expected: "a positive integer",
        })?,
    };
    let roles = string_list(payload, ROLES_FIELD)?;
    let permissions = string_list(payload, PERMISSIONS_FIELD)?;
    Claim::new(id, roles, permissions)
}

fn string_list(payload: &Payload, field: &'static str) -> Result<Vec<String>, CodecError> {
    let invalid = CodecError::InvalidField {
        field,
        expected: "an array of strings",
    };
    match payload.get(field) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string).ok_or(invalid.clone()))
            .collect(),
        Some(_) => Err(invalid),
    }
}
