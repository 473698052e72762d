//! Canonical request status and its external spellings.
//!
//! The hostel backends in use spell statuses differently (`Approved` vs
//! `ACCEPT` vs `Accepted`). Inside this crate there is one tagged variant; a
//! [`StatusVocabulary`] converts at the edge of whichever system is being
//! talked to.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema, Default,
)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
/// Workflow status of a leave / mess-cut request.
pub enum RequestStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

impl RequestStatus {
    pub const ALL: [RequestStatus; 3] = [
        RequestStatus::Pending,
        RequestStatus::Accepted,
        RequestStatus::Rejected,
    ];

    pub fn db_value(&self) -> &'static str {
        StatusVocabulary::Canonical.encode(*self)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, RequestStatus::Pending)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.db_value())
    }
}

impl FromStr for RequestStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StatusVocabulary::Canonical.decode(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("status {value:?} is not part of the {vocabulary} vocabulary")]
pub struct UnknownStatus {
    pub value: String,
    pub vocabulary: StatusVocabulary,
}

/// Spelling of statuses used by an external system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StatusVocabulary {
    /// `pending` / `accepted` / `rejected`, used by this crate's own API and database.
    Canonical,
    /// `Pending` / `Approved` / `Rejected`.
    #[default]
    Title,
    /// `Pending` / `ACCEPT` / `REJECT`.
    Short,
}

impl StatusVocabulary {
    pub fn encode(self, status: RequestStatus) -> &'static str {
        match (self, status) {
            (StatusVocabulary::Canonical, RequestStatus::Pending) => "pending",
            (StatusVocabulary::Canonical, RequestStatus::Accepted) => "accepted",
            (StatusVocabulary::Canonical, RequestStatus::Rejected) => "rejected",
            (StatusVocabulary::Title, RequestStatus::Pending) => "Pending",
            (StatusVocabulary::Title, RequestStatus::Accepted) => "Approved",
            (StatusVocabulary::Title, RequestStatus::Rejected) => "Rejected",
            (StatusVocabulary::Short, RequestStatus::Pending) => "Pending",
            (StatusVocabulary::Short, RequestStatus::Accepted) => "ACCEPT",
            (StatusVocabulary::Short, RequestStatus::Rejected) => "REJECT",
        }
    }

    /// Exact-match decode. No case folding: a spelling from another
    /// vocabulary is an error, not a guess.
    pub fn decode(self, value: &str) -> Result<RequestStatus, UnknownStatus> {
        RequestStatus::ALL
            .into_iter()
            .find(|status| self.encode(*status) == value)
            .ok_or_else(|| UnknownStatus {
                value: value.to_string(),
                vocabulary: self,
            })
    }
}

impl fmt::Display for StatusVocabulary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StatusVocabulary::Canonical => "canonical",
            StatusVocabulary::Title => "title",
            StatusVocabulary::Short => "short",
        };
        f.write_str(name)
    }
}

impl FromStr for StatusVocabulary {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "canonical" => Ok(StatusVocabulary::Canonical),
            "title" => Ok(StatusVocabulary::Title),
            "short" => Ok(StatusVocabulary::Short),
            other => Err(format!("unknown status vocabulary: {other}")),
        }
    }
}
