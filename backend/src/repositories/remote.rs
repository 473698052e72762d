//! REST-backed request store.
//!
//! Talks to the hostel backend the student app submits to. Statuses cross
//! the wire in that backend's own spelling, chosen by a [`StatusVocabulary`].

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::models::{LeaveRequest, RequestStatus, StatusVocabulary};
use crate::repositories::request_store::{RequestStore, StoreError};
use crate::types::LeaveRequestId;
use crate::utils::time::parse_time_label;

const LIST_PATH: &str = "/api/apology/all";
const UPDATE_PATH: &str = "/api/apology/update";

/// Request as the backend serializes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteLeaveRequest {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(alias = "name")]
    pub student_name: String,
    #[serde(default)]
    pub admission_no: Option<String>,
    #[serde(default)]
    pub room_no: Option<String>,
    pub leaving_date: NaiveDate,
    pub leaving_time: String,
    #[serde(alias = "returningDate")]
    pub return_date: NaiveDate,
    #[serde(alias = "returningTime")]
    pub return_time: String,
    #[serde(default)]
    pub reason: Option<String>,
    pub status: String,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    data: Option<T>,
}

#[derive(Debug, Serialize)]
struct StatusBody<'a> {
    status: &'a str,
}

impl RemoteLeaveRequest {
    fn into_request(self, vocabulary: StatusVocabulary) -> Result<LeaveRequest, StoreError> {
        let invalid = |what: String| StoreError::InvalidResponse(format!("request {}: {}", self.id, what));
        let leaving_time = parse_time_label(&self.leaving_time).map_err(|e| invalid(e.to_string()))?;
        let returning_time = parse_time_label(&self.return_time).map_err(|e| invalid(e.to_string()))?;
        let status = vocabulary
            .decode(&self.status)
            .map_err(|e| invalid(e.to_string()))?;

        Ok(LeaveRequest {
            id: LeaveRequestId::new(self.id),
            student_name: self.student_name,
            admission_no: self.admission_no,
            room_no: self.room_no,
            leaving_date: self.leaving_date,
            leaving_time,
            returning_date: self.return_date,
            returning_time,
            reason: self.reason,
            status,
            updated_at: None,
        })
    }
}

#[derive(Debug, Clone)]
pub struct RemoteRequestStore {
    client: Client,
    base_url: String,
    token: Option<String>,
    vocabulary: StatusVocabulary,
}

impl RemoteRequestStore {
    pub fn new(
        base_url: impl Into<String>,
        token: Option<String>,
        vocabulary: StatusVocabulary,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let client = Client::builder()
            .user_agent("messcut-backend/1.0")
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::Unavailable(format!("failed to initialize HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
            vocabulary,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

fn transport_error(err: reqwest::Error) -> StoreError {
    if err.is_timeout() {
        StoreError::Timeout(err.to_string())
    } else {
        StoreError::Unavailable(err.to_string())
    }
}

fn status_error(status: StatusCode, id: Option<&LeaveRequestId>) -> StoreError {
    match (status, id) {
        (StatusCode::NOT_FOUND, Some(id)) => StoreError::NotFound(id.clone()),
        (StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT, _) => {
            StoreError::Timeout(format!("backend answered {}", status))
        }
        _ => StoreError::Unavailable(format!("backend answered {}", status)),
    }
}

#[async_trait]
impl RequestStore for RemoteRequestStore {
    async fn list(&self, status: Option<RequestStatus>) -> Result<Vec<LeaveRequest>, StoreError> {
        let mut builder = self.authorized(self.client.get(self.url(LIST_PATH)));
        if let Some(status) = status {
            builder = builder.query(&[("status", self.vocabulary.encode(status))]);
        }
        let response = builder.send().await.map_err(transport_error)?;
        if !response.status().is_success() {
            return Err(status_error(response.status(), None));
        }

        let envelope: Envelope<Vec<RemoteLeaveRequest>> = response
            .json()
            .await
            .map_err(|e| StoreError::InvalidResponse(e.to_string()))?;
        if !envelope.success {
            return Err(StoreError::Unavailable(
                envelope.message.unwrap_or_else(|| "backend reported failure".to_string()),
            ));
        }

        let requests = envelope
            .data
            .unwrap_or_default()
            .into_iter()
            .map(|r| r.into_request(self.vocabulary))
            .collect::<Result<Vec<_>, _>>()?;

        // The backend may ignore the status parameter.
        Ok(match status {
            Some(status) => requests.into_iter().filter(|r| r.status == status).collect(),
            None => requests,
        })
    }

    async fn update_status(
        &self,
        id: &LeaveRequestId,
        status: RequestStatus,
    ) -> Result<(), StoreError> {
        let url = self.url(&format!("{}/{}", UPDATE_PATH, id));
        let response = self
            .authorized(self.client.put(url))
            .json(&StatusBody {
                status: self.vocabulary.encode(status),
            })
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(status_error(response.status(), Some(id)));
        }
        Ok(())
    }

    async fn insert(&self, _request: LeaveRequest) -> Result<LeaveRequest, StoreError> {
        Err(StoreError::Unsupported(
            "requests are submitted through the student app",
        ))
    }
}
