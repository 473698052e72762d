//! The admin approval workflow: pick requests, apply one status to all of
//! them, then read the list back so the caller sees what the store now holds.

use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::error::CoreError;
use crate::models::{LeaveRequest, RequestStatus, SelectionSet, WindowInput};
use crate::repositories::{RequestStore, StoreError};
use crate::services::bulk_transition::{BulkResult, BulkTransitionEngine};
use crate::services::report::filter_by_window;

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ApprovalOutcome {
    pub result: BulkResult,
    /// The full list as read back from the store after the transition.
    pub requests: Vec<LeaveRequest>,
}

/// Applies `target` to an explicit selection and re-reads the store.
pub async fn apply_selection(
    store: &dyn RequestStore,
    engine: &BulkTransitionEngine,
    selection: &SelectionSet,
    target: RequestStatus,
) -> Result<ApprovalOutcome, WorkflowError> {
    let result = engine.apply(selection, target, store).await?;
    let requests = store.list(None).await?;
    Ok(ApprovalOutcome { result, requests })
}

/// Selects every pending request leaving inside `window` and applies
/// `target` to them.
///
/// The window is validated before the store is read. A window that matches
/// no pending request yields `EmptySelection` and nothing is written.
pub async fn approve_window(
    store: &dyn RequestStore,
    engine: &BulkTransitionEngine,
    window: &WindowInput,
    target: RequestStatus,
) -> Result<ApprovalOutcome, WorkflowError> {
    let window = window.validate()?;
    let current = store.list(None).await?;
    let matched: Vec<LeaveRequest> = filter_by_window(&current, &window).cloned().collect();
    let selection = SelectionSet::pending_of(&matched);

    tracing::debug!(
        matched = matched.len(),
        selected = selection.len(),
        "window selection resolved"
    );

    apply_selection(store, engine, &selection, target).await
}
