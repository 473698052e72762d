#![allow(dead_code)] // OpenAPI doc stubs are only referenced by utoipa macros.

use crate::{
    handlers::admin::{BulkStatusPayload, MessCutQuery, RequestListQuery, RequestListResponse},
    models::{LeaveRequest, NewLeaveRequest, RequestStatus, WindowInput},
    services::{
        bulk_transition::{BulkFailure, BulkResult},
        report::{MessCutDays, RequestSort, StudentSummary},
        ApprovalOutcome,
    },
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health_doc,
        admin_list_requests_doc,
        admin_create_request_doc,
        admin_filter_requests_doc,
        admin_bulk_status_doc,
        admin_student_report_doc,
        admin_mess_cut_report_doc
    ),
    components(
        schemas(
            LeaveRequest,
            NewLeaveRequest,
            RequestStatus,
            RequestSort,
            WindowInput,
            RequestListResponse,
            BulkStatusPayload,
            BulkResult,
            BulkFailure,
            ApprovalOutcome,
            StudentSummary,
            MessCutDays
        )
    ),
    tags(
        (name = "Admin", description = "Leave / mess-cut request administration"),
        (name = "Reports", description = "Per-student summaries"),
        (name = "System", description = "Liveness")
    )
)]
pub struct ApiDoc;

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, body = serde_json::Value)),
    tag = "System"
)]
fn health_doc() {}

#[utoipa::path(
    get,
    path = "/api/admin/requests",
    params(RequestListQuery),
    responses(
        (status = 200, body = RequestListResponse),
        (status = 400, description = "Search term rejected")
    ),
    tag = "Admin"
)]
fn admin_list_requests_doc() {}

#[utoipa::path(
    post,
    path = "/api/admin/requests",
    request_body = NewLeaveRequest,
    responses(
        (status = 201, body = LeaveRequest),
        (status = 400, description = "Invalid payload or leaving after returning")
    ),
    tag = "Admin"
)]
fn admin_create_request_doc() {}

#[utoipa::path(
    post,
    path = "/api/admin/requests/filter",
    request_body = WindowInput,
    responses(
        (status = 200, body = RequestListResponse),
        (status = 400, description = "Incomplete, malformed or inverted window")
    ),
    tag = "Admin"
)]
fn admin_filter_requests_doc() {}

#[utoipa::path(
    post,
    path = "/api/admin/requests/bulk-status",
    request_body = BulkStatusPayload,
    responses(
        (status = 200, body = ApprovalOutcome),
        (status = 400, description = "Empty selection or invalid window")
    ),
    tag = "Admin"
)]
fn admin_bulk_status_doc() {}

#[utoipa::path(
    get,
    path = "/api/admin/reports/students",
    responses((status = 200, body = [StudentSummary])),
    tag = "Reports"
)]
fn admin_student_report_doc() {}

#[utoipa::path(
    get,
    path = "/api/admin/reports/mess-cut",
    params(MessCutQuery),
    responses(
        (status = 200, body = [MessCutDays]),
        (status = 400, description = "from is after to")
    ),
    tag = "Reports"
)]
fn admin_mess_cut_report_doc() {}
