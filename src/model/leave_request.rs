use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use std::str::FromStr;
use strum_macros::{Display, EnumString, IntoStaticStr};
use utoipa::ToSchema;

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord,
    Serialize, Deserialize, Display, EnumString, IntoStaticStr, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LeaveType {
    Annual,
    Casual,
    Medical,
}

/// Request lifecycle states. `status` is never written directly by callers;
/// it only changes through `leave::state::transition`.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq,
    Serialize, Deserialize, Display, EnumString, IntoStaticStr, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LeaveStatus {
    PendingDeptHead,
    PendingAdmin,
    Approved,
    Rejected,
}

impl LeaveStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, LeaveStatus::Approved | LeaveStatus::Rejected)
    }
}

#[derive(
    Debug, Copy, Clone, Eq, PartialEq,
    Serialize, Deserialize, Display, EnumString, IntoStaticStr, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LeaveAction {
    Approved,
    Rejected,
}

/// The leave request aggregate. Both stage outcomes live on the record;
/// `paid_leave + unpaid_leave` always equals the working-day count of the
/// current date range.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LeaveRequest {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 1000)]
    pub employee_id: u64,
    #[schema(example = 10)]
    pub department_id: u64,
    #[schema(example = "annual")]
    pub leave_type: LeaveType,
    #[schema(example = "2026-01-05", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-01-09", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = "Family trip")]
    pub reason: String,
    #[schema(example = 5)]
    pub paid_leave: u32,
    #[schema(example = 0)]
    pub unpaid_leave: u32,
    #[schema(example = "pending_dept_head")]
    pub status: LeaveStatus,

    /// Department heads eligible to decide the first stage.
    #[schema(example = json!([7, 12]))]
    pub dept_head_ids: Vec<u64>,
    /// Who decided the dept-head stage (an admin id when the admin overrode it).
    pub dept_head_id: Option<u64>,
    pub dept_head_action: Option<LeaveAction>,
    pub dept_head_comment: Option<String>,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub dept_head_action_at: Option<DateTime<Utc>>,

    pub admin_id: Option<u64>,
    pub admin_action: Option<LeaveAction>,
    pub admin_comment: Option<String>,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub admin_action_at: Option<DateTime<Utc>>,

    #[schema(value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String, format = "date-time")]
    pub updated_at: DateTime<Utc>,
}

impl LeaveRequest {
    /// Working days covered by the request, as persisted by the accounting engine.
    pub fn working_days(&self) -> u32 {
        self.paid_leave + self.unpaid_leave
    }
}

/// Raw `leave_requests` row; enums are stored as snake_case strings and
/// `dept_head_ids` as a JSON array.
#[derive(Debug, sqlx::FromRow)]
pub struct LeaveRequestRow {
    pub id: u64,
    pub employee_id: u64,
    pub department_id: u64,
    pub leave_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
    pub paid_leave: u32,
    pub unpaid_leave: u32,
    pub status: String,
    pub dept_head_ids: Json<Vec<u64>>,
    pub dept_head_id: Option<u64>,
    pub dept_head_action: Option<String>,
    pub dept_head_comment: Option<String>,
    pub dept_head_action_at: Option<DateTime<Utc>>,
    pub admin_id: Option<u64>,
    pub admin_action: Option<String>,
    pub admin_comment: Option<String>,
    pub admin_action_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn parse_action(value: Option<String>) -> Result<Option<LeaveAction>, String> {
    value
        .map(|v| LeaveAction::from_str(&v).map_err(|_| format!("unknown action '{}'", v)))
        .transpose()
}

impl TryFrom<LeaveRequestRow> for LeaveRequest {
    type Error = String;

    fn try_from(row: LeaveRequestRow) -> Result<Self, Self::Error> {
        Ok(LeaveRequest {
            id: row.id,
            employee_id: row.employee_id,
            department_id: row.department_id,
            leave_type: LeaveType::from_str(&row.leave_type)
                .map_err(|_| format!("unknown leave type '{}'", row.leave_type))?,
            start_date: row.start_date,
            end_date: row.end_date,
            reason: row.reason,
            paid_leave: row.paid_leave,
            unpaid_leave: row.unpaid_leave,
            status: LeaveStatus::from_str(&row.status)
                .map_err(|_| format!("unknown status '{}'", row.status))?,
            dept_head_ids: row.dept_head_ids.0,
            dept_head_id: row.dept_head_id,
            dept_head_action: parse_action(row.dept_head_action)?,
            dept_head_comment: row.dept_head_comment,
            dept_head_action_at: row.dept_head_action_at,
            admin_id: row.admin_id,
            admin_action: parse_action(row.admin_action)?,
            admin_comment: row.admin_comment,
            admin_action_at: row.admin_action_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_strings_round_trip_snake_case() {
        assert_eq!(LeaveStatus::PendingDeptHead.to_string(), "pending_dept_head");
        assert_eq!(
            LeaveStatus::from_str("pending_admin").unwrap(),
            LeaveStatus::PendingAdmin
        );
        assert_eq!(LeaveType::from_str("medical").unwrap(), LeaveType::Medical);
        assert!(LeaveStatus::from_str("cancelled").is_err());
    }

    #[test]
    fn terminal_states() {
        assert!(LeaveStatus::Approved.is_terminal());
        assert!(LeaveStatus::Rejected.is_terminal());
        assert!(!LeaveStatus::PendingDeptHead.is_terminal());
        assert!(!LeaveStatus::PendingAdmin.is_terminal());
    }
}
