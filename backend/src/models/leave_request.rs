use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::request_status::RequestStatus;
use crate::types::LeaveRequestId;
use crate::utils::time::TimeOfDay;
use crate::validation::rules::validate_leave_period;

/// A student's leave / mess-cut application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LeaveRequest {
    pub id: LeaveRequestId,
    pub student_name: String,
    pub admission_no: Option<String>,
    pub room_no: Option<String>,
    #[schema(value_type = String, format = Date, example = "2025-10-18")]
    pub leaving_date: NaiveDate,
    pub leaving_time: TimeOfDay,
    #[schema(value_type = String, format = Date, example = "2025-10-20")]
    pub returning_date: NaiveDate,
    pub returning_time: TimeOfDay,
    pub reason: Option<String>,
    pub status: RequestStatus,
    #[schema(value_type = Option<String>, format = DateTime)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl LeaveRequest {
    pub fn leaving_at(&self) -> NaiveDateTime {
        at(self.leaving_date, self.leaving_time)
    }

    pub fn returning_at(&self) -> NaiveDateTime {
        at(self.returning_date, self.returning_time)
    }

    /// Leaving must not come after returning. Stores accept such rows anyway;
    /// only creation through [`NewLeaveRequest`] enforces it.
    pub fn has_valid_period(&self) -> bool {
        self.leaving_at() <= self.returning_at()
    }

    pub fn is_pending(&self) -> bool {
        self.status.is_pending()
    }

    /// Key used to group requests by student: admission number when known,
    /// otherwise the display name.
    pub fn student_key(&self) -> &str {
        self.admission_no
            .as_deref()
            .filter(|admn| !admn.trim().is_empty())
            .unwrap_or(&self.student_name)
    }
}

fn at(date: NaiveDate, time: TimeOfDay) -> NaiveDateTime {
    let minutes = u32::from(time.minutes());
    date.and_hms_opt(minutes / 60, minutes % 60, 0)
        .unwrap_or_else(|| date.and_time(chrono::NaiveTime::MIN))
}

/// Payload for registering a request directly with the store.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_leave_period"))]
pub struct NewLeaveRequest {
    #[validate(length(min = 1, max = 100))]
    pub student_name: String,
    #[validate(length(max = 32))]
    pub admission_no: Option<String>,
    #[validate(length(max = 16))]
    pub room_no: Option<String>,
    #[schema(value_type = String, format = Date, example = "2025-10-18")]
    pub leaving_date: NaiveDate,
    pub leaving_time: TimeOfDay,
    #[schema(value_type = String, format = Date, example = "2025-10-20")]
    pub returning_date: NaiveDate,
    pub returning_time: TimeOfDay,
    #[validate(length(max = 500))]
    pub reason: Option<String>,
}

impl NewLeaveRequest {
    /// New requests always start out pending.
    pub fn into_request(self, id: LeaveRequestId) -> LeaveRequest {
        LeaveRequest {
            id,
            student_name: self.student_name,
            admission_no: self.admission_no,
            room_no: self.room_no,
            leaving_date: self.leaving_date,
            leaving_time: self.leaving_time,
            returning_date: self.returning_date,
            returning_time: self.returning_time,
            reason: self.reason,
            status: RequestStatus::Pending,
            updated_at: None,
        }
    }
}
