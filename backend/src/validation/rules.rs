//! Validation rules shared across request payloads.

use validator::ValidationError;

use crate::models::leave_request::NewLeaveRequest;

/// Longest free-text search the request list accepts.
pub const MAX_SEARCH_LENGTH: usize = 100;

/// Leaving must not come after returning.
///
/// Only applied when a request is created here; requests already held by a
/// store are filtered as they are.
pub fn validate_leave_period(request: &NewLeaveRequest) -> Result<(), ValidationError> {
    let leaving = (request.leaving_date, request.leaving_time);
    let returning = (request.returning_date, request.returning_time);
    if leaving > returning {
        return Err(ValidationError::new("leaving_after_returning"));
    }
    Ok(())
}

/// Search text must stay short and free of control characters.
pub fn validate_search_term(term: &str) -> Result<(), ValidationError> {
    if term.chars().count() > MAX_SEARCH_LENGTH {
        return Err(ValidationError::new("search_too_long"));
    }
    if term.chars().any(char::is_control) {
        return Err(ValidationError::new("search_invalid_characters"));
    }
    Ok(())
}
