use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::{AppError, CoreError},
    models::{LeaveRequest, NewLeaveRequest, RequestStatus, SelectionSet, WindowInput},
    services::{
        approval::{self, ApprovalOutcome},
        report::{self, MessCutDays, RequestQuery, RequestSort, StudentSummary},
    },
    state::AppState,
    types::LeaveRequestId,
    validation::{rules::validate_search_term, Validate},
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct RequestListQuery {
    #[param(value_type = Option<String>, example = "pending")]
    pub status: Option<RequestStatus>,
    /// Case-insensitive match on name, admission number or room.
    pub search: Option<String>,
    /// `newest`, `oldest` (default), `admission_no` or `status`.
    #[param(value_type = Option<String>, example = "newest")]
    pub sort: Option<RequestSort>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RequestListResponse {
    pub total: usize,
    pub requests: Vec<LeaveRequest>,
}

pub async fn list_requests(
    State(state): State<AppState>,
    Query(q): Query<RequestListQuery>,
) -> Result<Json<RequestListResponse>, AppError> {
    let search = q
        .search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    if let Some(term) = search.as_deref() {
        validate_search_term(term)
            .map_err(|e| AppError::Validation(vec![format!("search: {}", e.code)]))?;
    }

    let query = RequestQuery {
        status: q.status,
        search,
        sort: q.sort,
    };
    let requests = report::list_requests(state.store(), &query).await?;
    Ok(Json(RequestListResponse {
        total: requests.len(),
        requests,
    }))
}

pub async fn create_request(
    State(state): State<AppState>,
    Json(payload): Json<NewLeaveRequest>,
) -> Result<(StatusCode, Json<LeaveRequest>), AppError> {
    payload.validate()?;
    let request = payload.into_request(LeaveRequestId::generate());
    let created = state.store().insert(request).await?;
    tracing::info!(request_id = %created.id, student = %created.student_key(), "leave request created");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn filter_requests(
    State(state): State<AppState>,
    Json(window): Json<WindowInput>,
) -> Result<Json<RequestListResponse>, AppError> {
    let window = window.validate()?;
    let all = state.store().list(None).await?;
    let requests: Vec<LeaveRequest> = report::filter_by_window(&all, &window).cloned().collect();
    Ok(Json(RequestListResponse {
        total: requests.len(),
        requests,
    }))
}

/// Exactly one of `ids` and `window` must be given.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct BulkStatusPayload {
    pub status: RequestStatus,
    pub ids: Option<Vec<LeaveRequestId>>,
    pub window: Option<WindowInput>,
}

pub async fn bulk_update_status(
    State(state): State<AppState>,
    Json(payload): Json<BulkStatusPayload>,
) -> Result<Json<ApprovalOutcome>, AppError> {
    let outcome = match (payload.ids, payload.window) {
        (Some(ids), None) => {
            let selection = SelectionSet::from_ids(ids);
            approval::apply_selection(state.store(), &state.engine, &selection, payload.status)
                .await?
        }
        (None, Some(window)) => {
            approval::approve_window(state.store(), &state.engine, &window, payload.status).await?
        }
        _ => {
            return Err(AppError::BadRequest(
                "Provide either ids or window, not both".into(),
            ))
        }
    };
    Ok(Json(outcome))
}

pub async fn student_report(
    State(state): State<AppState>,
) -> Result<Json<Vec<StudentSummary>>, AppError> {
    let requests = state.store().list(None).await?;
    Ok(Json(report::student_summaries(&requests)))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct MessCutQuery {
    /// First day of the report, inclusive.
    pub from: NaiveDate,
    /// Last day of the report, inclusive.
    pub to: NaiveDate,
}

pub async fn mess_cut_report(
    State(state): State<AppState>,
    Query(q): Query<MessCutQuery>,
) -> Result<Json<Vec<MessCutDays>>, AppError> {
    if q.from > q.to {
        return Err(CoreError::InvertedWindow {
            from: q.from,
            to: q.to,
        }
        .into());
    }
    let accepted = state.store().list(Some(RequestStatus::Accepted)).await?;
    Ok(Json(report::mess_cut_report(&accepted, q.from, q.to)?))
}
