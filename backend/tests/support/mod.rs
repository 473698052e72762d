#![allow(dead_code)]
use async_trait::async_trait;
use chrono::NaiveDate;
use std::{
    collections::HashSet,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use messcut_backend::{
    build_router,
    config::Config,
    models::{LeaveRequest, RequestStatus},
    repositories::{InMemoryRequestStore, RequestStore, StoreError},
    state::AppState,
    types::LeaveRequestId,
    utils::time::parse_time_label,
};

pub fn date(value: &str) -> NaiveDate {
    value.parse().expect("valid date")
}

pub fn leave_request(
    id: &str,
    name: &str,
    admission_no: &str,
    leaving: (&str, &str),
    returning: (&str, &str),
    status: RequestStatus,
) -> LeaveRequest {
    LeaveRequest {
        id: LeaveRequestId::new(id),
        student_name: name.to_string(),
        admission_no: Some(admission_no.to_string()),
        room_no: Some("233".to_string()),
        leaving_date: date(leaving.0),
        leaving_time: parse_time_label(leaving.1).expect("valid leaving time"),
        returning_date: date(returning.0),
        returning_time: parse_time_label(returning.1).expect("valid returning time"),
        reason: Some("Going home".to_string()),
        status,
        updated_at: None,
    }
}

/// Five requests around 18-20 October 2025: three pending, one accepted,
/// one rejected.
pub fn seed_requests() -> Vec<LeaveRequest> {
    vec![
        leave_request(
            "r1",
            "EDWIN PAUL",
            "12213015",
            ("2025-10-18", "08:15 AM"),
            ("2025-10-20", "06:00 PM"),
            RequestStatus::Pending,
        ),
        leave_request(
            "r2",
            "ALFRED JOHN",
            "12213016",
            ("2025-10-18", "07:45 AM"),
            ("2025-10-19", "08:00 PM"),
            RequestStatus::Pending,
        ),
        leave_request(
            "r3",
            "KIRAN DAS",
            "12213017",
            ("2025-10-19", "12:00 PM"),
            ("2025-10-21", "09:00 AM"),
            RequestStatus::Accepted,
        ),
        leave_request(
            "r4",
            "LINS MARIA",
            "12213018",
            ("2025-10-20", "03:30 PM"),
            ("2025-10-22", "10:00 AM"),
            RequestStatus::Pending,
        ),
        leave_request(
            "r5",
            "EDWIN PAUL",
            "12213015",
            ("2025-10-21", "09:00 AM"),
            ("2025-10-23", "09:00 AM"),
            RequestStatus::Rejected,
        ),
    ]
}

pub fn memory_store() -> Arc<InMemoryRequestStore> {
    Arc::new(InMemoryRequestStore::with_requests(
        seed_requests(),
        chrono_tz::UTC,
    ))
}

pub fn test_config() -> Config {
    Config {
        store_call_timeout: Duration::from_millis(200),
        ..Config::default()
    }
}

pub fn test_router(store: Arc<dyn RequestStore>) -> axum::Router {
    test_router_with(store, test_config())
}

pub fn test_router_with(store: Arc<dyn RequestStore>, config: Config) -> axum::Router {
    build_router(AppState::new(store, config))
}

/// Wraps a store and fails or stalls status updates for chosen ids while
/// recording every update it is asked to make. Listing can be made to fail
/// too, and list calls are counted.
pub struct FlakyStore {
    inner: Arc<dyn RequestStore>,
    failing: HashSet<LeaveRequestId>,
    stalling: HashSet<LeaveRequestId>,
    failing_list: bool,
    calls: Mutex<Vec<LeaveRequestId>>,
    list_calls: AtomicUsize,
}

impl FlakyStore {
    pub fn new(inner: Arc<dyn RequestStore>) -> Self {
        Self {
            inner,
            failing: HashSet::new(),
            stalling: HashSet::new(),
            failing_list: false,
            calls: Mutex::new(Vec::new()),
            list_calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(mut self, id: &str) -> Self {
        self.failing.insert(LeaveRequestId::new(id));
        self
    }

    pub fn stalling(mut self, id: &str) -> Self {
        self.stalling.insert(LeaveRequestId::new(id));
        self
    }

    pub fn failing_list(mut self) -> Self {
        self.failing_list = true;
        self
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<LeaveRequestId> {
        self.calls.lock().expect("lock calls").clone()
    }
}

#[async_trait]
impl RequestStore for FlakyStore {
    async fn list(&self, status: Option<RequestStatus>) -> Result<Vec<LeaveRequest>, StoreError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_list {
            return Err(StoreError::Unavailable("connection refused".into()));
        }
        self.inner.list(status).await
    }

    async fn update_status(
        &self,
        id: &LeaveRequestId,
        status: RequestStatus,
    ) -> Result<(), StoreError> {
        self.calls.lock().expect("lock calls").push(id.clone());
        if self.failing.contains(id) {
            return Err(StoreError::Unavailable("connection refused".into()));
        }
        if self.stalling.contains(id) {
            tokio::time::sleep(Duration::from_secs(30)).await;
        }
        self.inner.update_status(id, status).await
    }

    async fn insert(&self, request: LeaveRequest) -> Result<LeaveRequest, StoreError> {
        self.inner.insert(request).await
    }
}
