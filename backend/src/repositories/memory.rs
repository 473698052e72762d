//! In-memory request store.
//!
//! Stands in for the backend while screens are developed and in tests. The
//! vector order is the "store order" every listing preserves.

use async_trait::async_trait;
use chrono_tz::Tz;
use tokio::sync::RwLock;

use crate::models::{LeaveRequest, RequestStatus};
use crate::repositories::request_store::{RequestStore, StoreError};
use crate::types::LeaveRequestId;
use crate::utils::time;

#[derive(Debug)]
pub struct InMemoryRequestStore {
    requests: RwLock<Vec<LeaveRequest>>,
    time_zone: Tz,
}

impl InMemoryRequestStore {
    pub fn new(time_zone: Tz) -> Self {
        Self::with_requests(Vec::new(), time_zone)
    }

    pub fn with_requests(requests: Vec<LeaveRequest>, time_zone: Tz) -> Self {
        Self {
            requests: RwLock::new(requests),
            time_zone,
        }
    }

    pub async fn snapshot(&self) -> Vec<LeaveRequest> {
        self.requests.read().await.clone()
    }
}

impl Default for InMemoryRequestStore {
    fn default() -> Self {
        Self::new(chrono_tz::UTC)
    }
}

#[async_trait]
impl RequestStore for InMemoryRequestStore {
    async fn list(&self, status: Option<RequestStatus>) -> Result<Vec<LeaveRequest>, StoreError> {
        let requests = self.requests.read().await;
        Ok(requests
            .iter()
            .filter(|r| status.map_or(true, |s| r.status == s))
            .cloned()
            .collect())
    }

    async fn update_status(
        &self,
        id: &LeaveRequestId,
        status: RequestStatus,
    ) -> Result<(), StoreError> {
        let mut requests = self.requests.write().await;
        let request = requests
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        if request.status != status {
            request.status = status;
            request.updated_at = Some(time::now_utc(&self.time_zone));
        }
        Ok(())
    }

    async fn insert(&self, request: LeaveRequest) -> Result<LeaveRequest, StoreError> {
        let mut requests = self.requests.write().await;
        requests.push(request.clone());
        Ok(request)
    }
}
