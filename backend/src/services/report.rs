//! Report queries over a request collection.
//!
//! Every function here is a stable filter or fold over its input: the order
//! requests come in is the order they go out, and the input is never touched.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use utoipa::ToSchema;

use crate::error::CoreError;
use crate::models::{DateTimeWindow, LeaveRequest, RequestStatus, WindowInput};
use crate::repositories::{RequestStore, StoreError};
use crate::services::range_matcher;

/// Requests whose leaving timestamp falls inside `window`.
pub fn filter_by_window<'a>(
    requests: &'a [LeaveRequest],
    window: &'a DateTimeWindow,
) -> impl Iterator<Item = &'a LeaveRequest> + 'a {
    requests
        .iter()
        .filter(move |request| range_matcher::matches(request, window))
}

/// Validates the raw form window, then filters. Nothing is filtered when the
/// window is incomplete, malformed or inverted.
pub fn filter_requests(
    requests: &[LeaveRequest],
    input: &WindowInput,
) -> Result<Vec<LeaveRequest>, CoreError> {
    let window = input.validate()?;
    Ok(filter_by_window(requests, &window).cloned().collect())
}

/// Case-insensitive substring search over name, admission number and room.
/// A blank term matches everything.
pub fn search_requests<'a>(
    requests: &'a [LeaveRequest],
    term: &str,
) -> impl Iterator<Item = &'a LeaveRequest> + 'a {
    let needle = term.trim().to_lowercase();
    requests.iter().filter(move |request| {
        needle.is_empty()
            || contains_folded(&request.student_name, &needle)
            || request
                .admission_no
                .as_deref()
                .is_some_and(|v| contains_folded(v, &needle))
            || request
                .room_no
                .as_deref()
                .is_some_and(|v| contains_folded(v, &needle))
    })
}

fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Ordering of the request listing. Stores return requests in submission
/// order, which is what `Oldest` keeps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RequestSort {
    Newest,
    #[default]
    Oldest,
    AdmissionNo,
    Status,
}

/// Stable reorder of `requests`. Requests without an admission number sort
/// after the numbered ones.
pub fn sort_requests(requests: &mut [LeaveRequest], sort: RequestSort) {
    match sort {
        RequestSort::Oldest => {}
        RequestSort::Newest => requests.reverse(),
        RequestSort::AdmissionNo => requests.sort_by(|a, b| {
            match (a.admission_no.as_deref(), b.admission_no.as_deref()) {
                (Some(a), Some(b)) => a.cmp(b),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            }
        }),
        RequestSort::Status => requests.sort_by_key(|r| r.status.db_value()),
    }
}

/// Listing criteria of the request screens.
#[derive(Debug, Clone, Default)]
pub struct RequestQuery {
    pub status: Option<RequestStatus>,
    pub search: Option<String>,
    pub sort: Option<RequestSort>,
}

/// Loads from the store (status narrowed there), applies the search, then
/// the requested order.
pub async fn list_requests(
    store: &dyn RequestStore,
    query: &RequestQuery,
) -> Result<Vec<LeaveRequest>, StoreError> {
    let requests = store.list(query.status).await?;
    let mut requests = match query.search.as_deref() {
        Some(term) if !term.trim().is_empty() => {
            search_requests(&requests, term).cloned().collect()
        }
        _ => requests,
    };
    sort_requests(&mut requests, query.sort.unwrap_or_default());
    Ok(requests)
}

/// Per-student decision counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct StudentSummary {
    pub student_key: String,
    pub student_name: String,
    pub room_no: Option<String>,
    pub total: usize,
    pub pending: usize,
    pub accepted: usize,
    pub rejected: usize,
}

/// Groups requests by student (admission number, else name) in first-seen order.
pub fn student_summaries(requests: &[LeaveRequest]) -> Vec<StudentSummary> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut summaries: Vec<StudentSummary> = Vec::new();

    for request in requests {
        let key = request.student_key();
        let slot = *index.entry(key).or_insert_with(|| {
            summaries.push(StudentSummary {
                student_key: key.to_string(),
                student_name: request.student_name.clone(),
                room_no: request.room_no.clone(),
                total: 0,
                pending: 0,
                accepted: 0,
                rejected: 0,
            });
            summaries.len() - 1
        });

        let summary = &mut summaries[slot];
        summary.total += 1;
        match request.status {
            RequestStatus::Pending => summary.pending += 1,
            RequestStatus::Accepted => summary.accepted += 1,
            RequestStatus::Rejected => summary.rejected += 1,
        }
    }

    summaries
}

/// Days a student is off the mess within the report range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct MessCutDays {
    pub student_key: String,
    pub student_name: String,
    pub days: usize,
}

/// Counts, per student, the calendar days in `[from, to]` covered by their
/// accepted requests (leaving and returning days both count). Overlapping
/// requests of one student are counted once; students with no days are left
/// out.
pub fn mess_cut_report(
    requests: &[LeaveRequest],
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<MessCutDays>, CoreError> {
    if from > to {
        return Err(CoreError::InvertedWindow { from, to });
    }

    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut rows: Vec<(&LeaveRequest, BTreeSet<NaiveDate>)> = Vec::new();

    for request in requests
        .iter()
        .filter(|r| r.status == RequestStatus::Accepted)
    {
        let start = request.leaving_date.max(from);
        let end = request.returning_date.min(to);
        if start > end {
            continue;
        }

        let slot = *index.entry(request.student_key()).or_insert_with(|| {
            rows.push((request, BTreeSet::new()));
            rows.len() - 1
        });
        rows[slot]
            .1
            .extend(start.iter_days().take_while(|day| *day <= end));
    }

    Ok(rows
        .into_iter()
        .map(|(first, days)| MessCutDays {
            student_key: first.student_key().to_string(),
            student_name: first.student_name.clone(),
            days: days.len(),
        })
        .collect())
}
