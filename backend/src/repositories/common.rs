//! Shared repository utilities.

use sqlx::{Postgres, QueryBuilder};

/// Column list shared by every `leave_requests` query.
pub const LEAVE_REQUEST_COLUMNS: &str = "id, student_name, admission_no, room_no, leaving_date, \
     leaving_time, returning_date, returning_time, reason, status, updated_at";

/// Appends WHERE or AND to the query builder depending on whether a clause has already been added.
pub fn push_clause(builder: &mut QueryBuilder<'_, Postgres>, has_clause: &mut bool) {
    if *has_clause {
        builder.push(" AND ");
    } else {
        builder.push(" WHERE ");
        *has_clause = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_clause_uses_where_then_and() {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("SELECT 1 FROM leave_requests");
        let mut has_clause = false;
        push_clause(&mut builder, &mut has_clause);
        builder.push("status = 'pending'");
        push_clause(&mut builder, &mut has_clause);
        builder.push("room_no = '15'");
        assert_eq!(
            builder.sql(),
            "SELECT 1 FROM leave_requests WHERE status = 'pending' AND room_no = '15'"
        );
    }
}
