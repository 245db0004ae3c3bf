use chrono::NaiveDate;
use serde::Serialize;

/// Holiday calendar entry, sourced from the external admin-config screens.
/// This service only reads it for working-day math.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Holiday {
    pub id: u64,
    pub name: String,
    pub holiday_date: NaiveDate,
}
