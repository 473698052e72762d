//! The request store collaborator.
//!
//! Filtering and bulk approval only ever need two things from wherever the
//! requests live: list them, and set the status of one of them.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{LeaveRequest, RequestStatus};
use crate::types::LeaveRequestId;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("leave request {0} not found")]
    NotFound(LeaveRequestId),

    #[error("request store unavailable: {0}")]
    Unavailable(String),

    #[error("request store timed out after {0}")]
    Timeout(String),

    #[error("unexpected response from request store: {0}")]
    InvalidResponse(String),

    #[error("operation not supported by this store: {0}")]
    Unsupported(&'static str),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Holds leave / mess-cut requests on behalf of the admin core.
///
/// This trait is designed to be mockable using mockall for testing.
/// Use `MockRequestStore` in tests to mock the behavior.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RequestStore: Send + Sync {
    /// All known requests, optionally narrowed to one status, in the store's
    /// own order.
    async fn list(&self, status: Option<RequestStatus>) -> Result<Vec<LeaveRequest>, StoreError>;

    /// Sets the status of a single request. Setting the status a request
    /// already has succeeds.
    async fn update_status(
        &self,
        id: &LeaveRequestId,
        status: RequestStatus,
    ) -> Result<(), StoreError>;

    /// Registers a new request. Stores fed by an external submission flow
    /// may refuse.
    async fn insert(&self, request: LeaveRequest) -> Result<LeaveRequest, StoreError>;
}
