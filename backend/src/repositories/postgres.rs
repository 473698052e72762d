//! PostgreSQL-backed request store.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use crate::db::connection::DbPool;
use crate::models::{LeaveRequest, RequestStatus};
use crate::repositories::common::{push_clause, LEAVE_REQUEST_COLUMNS};
use crate::repositories::request_store::{RequestStore, StoreError};
use crate::types::LeaveRequestId;
use crate::utils::time::{self, parse_time_label};

const TABLE: &str = "leave_requests";

/// Row shape of `leave_requests`; times are kept as their 12-hour labels.
#[derive(Debug, FromRow)]
struct LeaveRequestRow {
    id: String,
    student_name: String,
    admission_no: Option<String>,
    room_no: Option<String>,
    leaving_date: NaiveDate,
    leaving_time: String,
    returning_date: NaiveDate,
    returning_time: String,
    reason: Option<String>,
    status: RequestStatus,
    updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<LeaveRequestRow> for LeaveRequest {
    type Error = StoreError;

    fn try_from(row: LeaveRequestRow) -> Result<Self, Self::Error> {
        let parse = |label: &str| {
            parse_time_label(label)
                .map_err(|e| StoreError::InvalidResponse(format!("request {}: {}", row.id, e)))
        };
        Ok(LeaveRequest {
            leaving_time: parse(&row.leaving_time)?,
            returning_time: parse(&row.returning_time)?,
            id: LeaveRequestId::new(row.id),
            student_name: row.student_name,
            admission_no: row.admission_no,
            room_no: row.room_no,
            leaving_date: row.leaving_date,
            returning_date: row.returning_date,
            reason: row.reason,
            status: row.status,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone)]
pub struct PgRequestStore {
    pool: DbPool,
    time_zone: Tz,
}

impl PgRequestStore {
    pub fn new(pool: DbPool, time_zone: Tz) -> Self {
        Self { pool, time_zone }
    }

    fn db(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl RequestStore for PgRequestStore {
    async fn list(&self, status: Option<RequestStatus>) -> Result<Vec<LeaveRequest>, StoreError> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {} FROM {}", LEAVE_REQUEST_COLUMNS, TABLE));
        let mut has_clause = false;
        if let Some(status) = status {
            push_clause(&mut builder, &mut has_clause);
            builder.push("status = ").push_bind(status.db_value());
        }
        builder.push(" ORDER BY created_at ASC, id ASC");

        let rows = builder
            .build_query_as::<LeaveRequestRow>()
            .fetch_all(self.db())
            .await
            .map_err(|err| {
                tracing::error!(error = %err, "failed to list leave requests");
                StoreError::Database(err)
            })?;

        rows.into_iter().map(LeaveRequest::try_from).collect()
    }

    async fn update_status(
        &self,
        id: &LeaveRequestId,
        status: RequestStatus,
    ) -> Result<(), StoreError> {
        let query = format!(
            "UPDATE {} SET updated_at = CASE WHEN status <> $1 THEN $2 ELSE updated_at END, \
             status = $1 WHERE id = $3",
            TABLE
        );
        let result = sqlx::query(&query)
            .bind(status.db_value())
            .bind(time::now_utc(&self.time_zone))
            .bind(id.as_str())
            .execute(self.db())
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id.clone()));
        }
        Ok(())
    }

    async fn insert(&self, request: LeaveRequest) -> Result<LeaveRequest, StoreError> {
        let query = format!(
            "INSERT INTO {} ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {}",
            TABLE, LEAVE_REQUEST_COLUMNS, LEAVE_REQUEST_COLUMNS
        );
        let row = sqlx::query_as::<_, LeaveRequestRow>(&query)
            .bind(request.id.as_str())
            .bind(&request.student_name)
            .bind(&request.admission_no)
            .bind(&request.room_no)
            .bind(request.leaving_date)
            .bind(request.leaving_time.to_label())
            .bind(request.returning_date)
            .bind(request.returning_time.to_label())
            .bind(&request.reason)
            .bind(request.status.db_value())
            .bind(request.updated_at)
            .fetch_one(self.db())
            .await?;
        LeaveRequest::try_from(row)
    }
}
