//! Applies one status to many requests.
//!
//! Each id is an independent store call. There is no batch transaction: an
//! update that succeeded stays applied when a later one fails, and a failure
//! is recorded against its own id without stopping the rest of the batch.

use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::time::Duration;
use tokio::sync::watch;
use utoipa::ToSchema;

use crate::error::CoreError;
use crate::models::{RequestStatus, SelectionSet};
use crate::repositories::RequestStore;
use crate::types::LeaveRequestId;

/// How per-id store calls are issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchMode {
    /// One call at a time, in selection order.
    Sequential,
    /// Up to `max_in_flight` calls at once. Results are still reported in
    /// selection order.
    Concurrent { max_in_flight: usize },
}

impl Default for DispatchMode {
    fn default() -> Self {
        DispatchMode::Sequential
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct BulkFailure {
    pub id: LeaveRequestId,
    pub reason: String,
}

impl BulkFailure {
    pub fn to_error(&self) -> CoreError {
        CoreError::StoreUpdateFailure {
            id: self.id.clone(),
            reason: self.reason.clone(),
        }
    }
}

/// Outcome of one bulk transition, every list in selection order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct BulkResult {
    pub target_status: RequestStatus,
    pub attempted: usize,
    pub succeeded: Vec<LeaveRequestId>,
    pub failed: Vec<BulkFailure>,
    /// Never dispatched because the batch was cancelled first.
    pub skipped: Vec<LeaveRequestId>,
}

impl BulkResult {
    fn new(target_status: RequestStatus) -> Self {
        Self {
            target_status,
            attempted: 0,
            succeeded: Vec::new(),
            failed: Vec::new(),
            skipped: Vec::new(),
        }
    }

    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty() && self.skipped.is_empty()
    }

    pub fn errors(&self) -> Vec<CoreError> {
        self.failed.iter().map(BulkFailure::to_error).collect()
    }

    fn record(&mut self, id: LeaveRequestId, outcome: Outcome) {
        match outcome {
            Outcome::Updated => {
                self.attempted += 1;
                self.succeeded.push(id);
            }
            Outcome::Failed(reason) => {
                self.attempted += 1;
                self.failed.push(BulkFailure { id, reason });
            }
            Outcome::Skipped => self.skipped.push(id),
        }
    }
}

enum Outcome {
    Updated,
    Failed(String),
    Skipped,
}

/// Receiving side of a cancel switch: once it reads `true` no further ids are
/// dispatched. Calls already issued run to completion and are not undone.
pub type CancelSignal = watch::Receiver<bool>;

#[derive(Debug, Clone)]
pub struct BulkTransitionEngine {
    dispatch: DispatchMode,
    call_timeout: Duration,
}

impl BulkTransitionEngine {
    pub fn new(dispatch: DispatchMode, call_timeout: Duration) -> Self {
        Self {
            dispatch,
            call_timeout,
        }
    }

    pub fn dispatch(&self) -> DispatchMode {
        self.dispatch
    }

    /// Sets `target` on every selected request. Fails fast with
    /// `EmptySelection` before the store is contacted.
    pub async fn apply(
        &self,
        selection: &SelectionSet,
        target: RequestStatus,
        store: &dyn RequestStore,
    ) -> Result<BulkResult, CoreError> {
        self.run(selection, target, store, None).await
    }

    /// Like [`apply`](Self::apply), but stops dispatching once `cancel` flips
    /// to `true`. Ids never dispatched are reported as skipped.
    pub async fn apply_cancellable(
        &self,
        selection: &SelectionSet,
        target: RequestStatus,
        store: &dyn RequestStore,
        cancel: &CancelSignal,
    ) -> Result<BulkResult, CoreError> {
        self.run(selection, target, store, Some(cancel)).await
    }

    async fn run(
        &self,
        selection: &SelectionSet,
        target: RequestStatus,
        store: &dyn RequestStore,
        cancel: Option<&CancelSignal>,
    ) -> Result<BulkResult, CoreError> {
        if selection.is_empty() {
            return Err(CoreError::EmptySelection);
        }

        tracing::info!(
            target_status = %target,
            selected = selection.len(),
            dispatch = ?self.dispatch,
            "starting bulk status transition"
        );

        let mut result = BulkResult::new(target);
        match self.dispatch {
            DispatchMode::Sequential => {
                for id in selection {
                    let outcome = self.update_one(id, target, store, cancel).await;
                    result.record(id.clone(), outcome);
                }
            }
            DispatchMode::Concurrent { max_in_flight } => {
                let outcomes: Vec<(LeaveRequestId, Outcome)> =
                    stream::iter(selection.iter().cloned())
                        .map(|id| async move {
                            let outcome = self.update_one(&id, target, store, cancel).await;
                            (id, outcome)
                        })
                        .buffered(max_in_flight.max(1))
                        .collect()
                        .await;
                for (id, outcome) in outcomes {
                    result.record(id, outcome);
                }
            }
        }

        tracing::info!(
            target_status = %target,
            attempted = result.attempted,
            succeeded = result.succeeded.len(),
            failed = result.failed.len(),
            skipped = result.skipped.len(),
            "bulk status transition finished"
        );
        Ok(result)
    }

    async fn update_one(
        &self,
        id: &LeaveRequestId,
        target: RequestStatus,
        store: &dyn RequestStore,
        cancel: Option<&CancelSignal>,
    ) -> Outcome {
        if cancel.is_some_and(|signal| *signal.borrow()) {
            tracing::debug!(request_id = %id, "bulk transition cancelled before dispatch");
            return Outcome::Skipped;
        }

        match tokio::time::timeout(self.call_timeout, store.update_status(id, target)).await {
            Ok(Ok(())) => {
                tracing::debug!(request_id = %id, target_status = %target, "request status updated");
                Outcome::Updated
            }
            Ok(Err(err)) => {
                tracing::warn!(request_id = %id, error = %err, "request status update failed");
                Outcome::Failed(err.to_string())
            }
            Err(_) => {
                tracing::warn!(
                    request_id = %id,
                    timeout_ms = self.call_timeout.as_millis() as u64,
                    "request status update timed out"
                );
                Outcome::Failed(format!(
                    "timed out after {}ms",
                    self.call_timeout.as_millis()
                ))
            }
        }
    }
}

impl Default for BulkTransitionEngine {
    fn default() -> Self {
        Self::new(DispatchMode::Sequential, Duration::from_secs(5))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{MockRequestStore, StoreError};
    use mockall::predicate::eq;

    fn selection(ids: &[&str]) -> SelectionSet {
        SelectionSet::from_ids(ids.iter().map(|id| LeaveRequestId::new(*id)))
    }

    #[tokio::test]
    async fn empty_selection_never_reaches_the_store() {
        let mut store = MockRequestStore::new();
        store.expect_update_status().never();
        let err = BulkTransitionEngine::default()
            .apply(&SelectionSet::new(), RequestStatus::Accepted, &store)
            .await
            .unwrap_err();
        assert_eq!(err, CoreError::EmptySelection);
    }

    #[tokio::test]
    async fn one_failure_does_not_abort_the_rest() {
        let mut store = MockRequestStore::new();
        store
            .expect_update_status()
            .with(mockall::predicate::always(), eq(RequestStatus::Accepted))
            .times(3)
            .returning(|id, _| {
                if id.as_str() == "2" {
                    Err(StoreError::Unavailable("connection reset".into()))
                } else {
                    Ok(())
                }
            });

        let result = BulkTransitionEngine::default()
            .apply(&selection(&["1", "2", "3"]), RequestStatus::Accepted, &store)
            .await
            .unwrap();

        assert_eq!(result.attempted, 3);
        assert_eq!(result.succeeded, vec![LeaveRequestId::new("1"), LeaveRequestId::new("3")]);
        assert_eq!(result.failed.len(), 1);
        assert_eq!(result.failed[0].id.as_str(), "2");
        assert!(result.failed[0].reason.contains("connection reset"));
        assert!(!result.is_complete_success());
        assert!(matches!(
            &result.errors()[0],
            CoreError::StoreUpdateFailure { id, .. } if id.as_str() == "2"
        ));
    }

    #[tokio::test]
    async fn concurrent_dispatch_reports_in_selection_order() {
        let mut store = MockRequestStore::new();
        store.expect_update_status().times(4).returning(|id, _| {
            if id.as_str() == "c" {
                Err(StoreError::NotFound(id.clone()))
            } else {
                Ok(())
            }
        });

        let engine = BulkTransitionEngine::new(
            DispatchMode::Concurrent { max_in_flight: 2 },
            Duration::from_secs(1),
        );
        let result = engine
            .apply(&selection(&["d", "c", "b", "a"]), RequestStatus::Rejected, &store)
            .await
            .unwrap();

        let succeeded: Vec<_> = result.succeeded.iter().map(|id| id.as_str()).collect();
        assert_eq!(succeeded, ["d", "b", "a"]);
        assert_eq!(result.failed[0].id.as_str(), "c");
        assert_eq!(result.target_status, RequestStatus::Rejected);
    }

    #[tokio::test]
    async fn cancelled_batch_skips_everything_not_yet_dispatched() {
        let mut store = MockRequestStore::new();
        store.expect_update_status().never();
        let (_tx, rx) = watch::channel(true);

        let result = BulkTransitionEngine::default()
            .apply_cancellable(&selection(&["1", "2"]), RequestStatus::Accepted, &store, &rx)
            .await
            .unwrap();

        assert_eq!(result.attempted, 0);
        assert_eq!(result.skipped.len(), 2);
        assert!(!result.is_complete_success());
    }
}
