//! The leave-request domain core: working-day calendar math, the two-stage
//! approval state machine, paid/unpaid accounting, the authorization policy
//! and the reporting aggregator. Everything here is pure; persistence and
//! HTTP live in `api`.

pub mod accounting;
pub mod calendar;
pub mod error;
pub mod policy;
pub mod state;
pub mod stats;

#[cfg(test)]
pub mod testutil {
    use crate::model::leave_request::{LeaveRequest, LeaveStatus, LeaveType};
    use chrono::{NaiveDate, TimeZone, Utc};

    /// Minimal request fixture: employee 1000 in department 10, dept heads 7
    /// and 12, a 5-working-day annual range.
    pub fn request(employee_id: u64, status: LeaveStatus) -> LeaveRequest {
        request_with(employee_id, 10, LeaveType::Annual, status, 2026, 5, 0)
    }

    pub fn request_with(
        employee_id: u64,
        department_id: u64,
        leave_type: LeaveType,
        status: LeaveStatus,
        year: i32,
        paid: u32,
        unpaid: u32,
    ) -> LeaveRequest {
        let created = Utc.with_ymd_and_hms(year, 1, 2, 9, 0, 0).unwrap();
        LeaveRequest {
            id: 1,
            employee_id,
            department_id,
            leave_type,
            start_date: NaiveDate::from_ymd_opt(year, 1, 5).unwrap(),
            end_date: NaiveDate::from_ymd_opt(year, 1, 9).unwrap(),
            reason: "Family trip".to_string(),
            paid_leave: paid,
            unpaid_leave: unpaid,
            status,
            dept_head_ids: vec![7, 12],
            dept_head_id: None,
            dept_head_action: None,
            dept_head_comment: None,
            dept_head_action_at: None,
            admin_id: None,
            admin_action: None,
            admin_comment: None,
            admin_action_at: None,
            created_at: created,
            updated_at: created,
        }
    }
}
