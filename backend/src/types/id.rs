//! Typed identifiers.
//!
//! Request identifiers are opaque tokens assigned by whichever store holds the
//! request. They are compared and echoed back, never interpreted.

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;

/// Unique identifier for a leave request.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[serde(transparent)]
#[sqlx(transparent)]
#[schema(value_type = String, example = "6716c0a9e3b1f2a4c8d90e11")]
pub struct LeaveRequestId(String);

impl LeaveRequestId {
    /// Wraps a token handed out by a store.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Mints a fresh random token, used by stores that assign their own ids.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LeaveRequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LeaveRequestId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for LeaveRequestId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<LeaveRequestId> for String {
    fn from(id: LeaveRequestId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_plain_string() {
        let id = LeaveRequestId::new("42");
        assert_eq!(serde_json::to_value(&id).unwrap(), serde_json::json!("42"));
        let back: LeaveRequestId = serde_json::from_str("\"42\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn generated_ids_are_distinct() {
        assert_ne!(LeaveRequestId::generate(), LeaveRequestId::generate());
    }
}
