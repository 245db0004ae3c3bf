use chrono::{DateTime, NaiveDate, Utc};
use sqlx::MySqlPool;

/// ===============================
/// SQL bindable value enum
/// ===============================
#[derive(Debug)]
pub enum SqlValue {
    String(String),
    U64(u64),
    U32(u32),
    Str(&'static str),
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
}

/// ===============================
/// Dynamic UPDATE builder
/// ===============================
///
/// Collects `SET` columns plus `WHERE` predicates and executes as a single
/// runtime-bound statement. Every guarded write in this service carries an
/// `id` predicate and a `status` predicate so a concurrent decision makes
/// the update a no-op (`rows_affected == 0`).
#[derive(Debug)]
pub struct SqlUpdate {
    table: &'static str,
    sets: Vec<(&'static str, SqlValue)>,
    wheres: Vec<(&'static str, SqlValue)>,
}

impl SqlUpdate {
    pub fn new(table: &'static str) -> Self {
        Self { table, sets: Vec::new(), wheres: Vec::new() }
    }

    pub fn set(mut self, column: &'static str, value: SqlValue) -> Self {
        self.sets.push((column, value));
        self
    }

    pub fn set_if(self, column: &'static str, value: Option<SqlValue>) -> Self {
        match value {
            Some(v) => self.set(column, v),
            None => self,
        }
    }

    pub fn filter(mut self, column: &'static str, value: SqlValue) -> Self {
        self.wheres.push((column, value));
        self
    }

    pub fn has_sets(&self) -> bool {
        !self.sets.is_empty()
    }

    fn sql(&self) -> String {
        let set_clause = self
            .sets
            .iter()
            .map(|(col, _)| format!("{} = ?", col))
            .collect::<Vec<_>>()
            .join(", ");
        let where_clause = self
            .wheres
            .iter()
            .map(|(col, _)| format!("{} = ?", col))
            .collect::<Vec<_>>()
            .join(" AND ");
        format!("UPDATE {} SET {} WHERE {}", self.table, set_clause, where_clause)
    }

    /// Execute the update; returns rows affected.
    pub async fn execute(self, pool: &MySqlPool) -> Result<u64, sqlx::Error> {
        let sql = self.sql();
        tracing::debug!(sql = %sql, "Executing guarded update");

        let mut query = sqlx::query(&sql);
        for (_, value) in self.sets.into_iter().chain(self.wheres) {
            query = match value {
                SqlValue::String(v) => query.bind(v),
                SqlValue::U64(v) => query.bind(v),
                SqlValue::U32(v) => query.bind(v),
                SqlValue::Str(v) => query.bind(v),
                SqlValue::Date(v) => query.bind(v),
                SqlValue::DateTime(v) => query.bind(v),
            };
        }

        let result = query.execute(pool).await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_update_with_guard_predicates() {
        let update = SqlUpdate::new("leave_requests")
            .set("status", SqlValue::Str("pending_admin"))
            .set("paid_leave", SqlValue::U32(3))
            .filter("id", SqlValue::U64(1))
            .filter("status", SqlValue::Str("pending_dept_head"));

        assert_eq!(
            update.sql(),
            "UPDATE leave_requests SET status = ?, paid_leave = ? \
             WHERE id = ? AND status = ?"
        );
    }

    #[test]
    fn set_if_skips_absent_values() {
        let update = SqlUpdate::new("leave_requests")
            .set_if("reason", None)
            .set_if("paid_leave", Some(SqlValue::U32(2)))
            .filter("id", SqlValue::U64(9));

        assert!(update.has_sets());
        assert_eq!(update.sql(), "UPDATE leave_requests SET paid_leave = ? WHERE id = ?");
    }
}
