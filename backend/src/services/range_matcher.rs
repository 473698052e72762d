//! Decides whether a request's leaving timestamp falls inside a window.

use chrono::NaiveDate;

use crate::models::{DateTimeWindow, LeaveRequest};
use crate::utils::time::TimeOfDay;

/// True when the request leaves within `window`.
pub fn matches(request: &LeaveRequest, window: &DateTimeWindow) -> bool {
    leaves_within(request.leaving_date, request.leaving_time, window)
}

/// Dates outside `[from_date, to_date]` never match. On the first day the
/// leaving time must be at or after `from_time`; on the last day at or before
/// `to_time`. A single-day window applies both bounds to the same day, so a
/// window whose `from_time` is after its `to_time` on one day matches nothing.
pub fn leaves_within(date: NaiveDate, time: TimeOfDay, window: &DateTimeWindow) -> bool {
    if date < window.from_date() || date > window.to_date() {
        return false;
    }
    if date == window.from_date() && time < window.from_time() {
        return false;
    }
    if date == window.to_date() && time > window.to_time() {
        return false;
    }
    true
}
