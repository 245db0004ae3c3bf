use crate::model::leave_request::{LeaveRequest, LeaveStatus, LeaveType};
use chrono::Datelike;
use serde::Serialize;
use std::collections::BTreeMap;
use utoipa::ToSchema;

const ALL_TYPES: [LeaveType; 3] = [LeaveType::Annual, LeaveType::Casual, LeaveType::Medical];

/// Request count plus working-day sum for one status bucket.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Serialize, ToSchema)]
pub struct Bucket {
    #[schema(example = 3)]
    pub requests: u64,
    #[schema(example = 12)]
    pub days: u64,
}

impl Bucket {
    fn add(&mut self, days: u64) {
        self.requests += 1;
        self.days += days;
    }
}

/// Buckets per status, plus their sum. Both pending states fold into one
/// `pending` bucket for dashboard purposes.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Serialize, ToSchema)]
pub struct StatusBreakdown {
    pub total: Bucket,
    pub approved: Bucket,
    pub pending: Bucket,
    pub rejected: Bucket,
}

impl StatusBreakdown {
    fn add(&mut self, status: LeaveStatus, days: u64) {
        self.total.add(days);
        match status {
            LeaveStatus::Approved => self.approved.add(days),
            LeaveStatus::PendingDeptHead | LeaveStatus::PendingAdmin => self.pending.add(days),
            LeaveStatus::Rejected => self.rejected.add(days),
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct StatsFilter {
    pub employee_id: Option<u64>,
    pub department_id: Option<u64>,
    /// Calendar year of the request's start date; `None` aggregates all years.
    pub year: Option<i32>,
}

impl StatsFilter {
    fn matches(&self, request: &LeaveRequest) -> bool {
        self.employee_id.is_none_or(|id| request.employee_id == id)
            && self.department_id.is_none_or(|id| request.department_id == id)
            && self.year.is_none_or(|y| request.start_date.year() == y)
    }
}

/// Derived reporting snapshot; recomputed from the matching requests on every
/// query and never stored.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LeaveStatsSnapshot {
    #[schema(example = 2026)]
    pub year: Option<i32>,
    pub total: StatusBreakdown,
    /// Keyed by leave type (`annual` / `casual` / `medical`).
    pub by_type: BTreeMap<String, StatusBreakdown>,
}

/// Roll up the requests matching `filter` into per-type, per-status counts
/// and day sums. Pure projection: idempotent, no side effects.
pub fn aggregate(requests: &[LeaveRequest], filter: &StatsFilter) -> LeaveStatsSnapshot {
    let mut total = StatusBreakdown::default();
    let mut by_type: BTreeMap<String, StatusBreakdown> = ALL_TYPES
        .iter()
        .map(|t| (t.to_string(), StatusBreakdown::default()))
        .collect();

    for request in requests.iter().filter(|r| filter.matches(r)) {
        let days = u64::from(request.working_days());
        total.add(request.status, days);
        by_type
            .entry(request.leave_type.to_string())
            .or_default()
            .add(request.status, days);
    }

    LeaveStatsSnapshot { year: filter.year, total, by_type }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leave::testutil::request_with;

    fn sample_set() -> Vec<LeaveRequest> {
        vec![
            // employee 1000, dept 10
            request_with(1000, 10, LeaveType::Annual, LeaveStatus::Approved, 2026, 5, 0),
            request_with(1000, 10, LeaveType::Annual, LeaveStatus::PendingDeptHead, 2026, 2, 1),
            request_with(1000, 10, LeaveType::Medical, LeaveStatus::Rejected, 2026, 0, 3),
            // employee 2000, dept 20
            request_with(2000, 20, LeaveType::Casual, LeaveStatus::PendingAdmin, 2026, 1, 0),
            // prior year
            request_with(1000, 10, LeaveType::Annual, LeaveStatus::Approved, 2025, 10, 0),
        ]
    }

    #[test]
    fn totals_match_request_count_and_bucket_sum() {
        let set = sample_set();
        let snap = aggregate(&set, &StatsFilter { year: Some(2026), ..Default::default() });

        assert_eq!(snap.total.total.requests, 4);
        assert_eq!(
            snap.total.approved.requests + snap.total.pending.requests
                + snap.total.rejected.requests,
            snap.total.total.requests
        );
        // Days are paid + unpaid working days.
        assert_eq!(snap.total.total.days, 5 + 3 + 3 + 1);
    }

    #[test]
    fn both_pending_states_fold_into_one_bucket() {
        let set = sample_set();
        let snap = aggregate(&set, &StatsFilter { year: Some(2026), ..Default::default() });
        assert_eq!(snap.total.pending.requests, 2);
        assert_eq!(snap.total.pending.days, 3 + 1);
    }

    #[test]
    fn grouped_by_leave_type_with_all_types_present() {
        let set = sample_set();
        let snap = aggregate(&set, &StatsFilter { year: Some(2026), ..Default::default() });

        assert_eq!(snap.by_type["annual"].total.requests, 2);
        assert_eq!(snap.by_type["annual"].approved.days, 5);
        assert_eq!(snap.by_type["casual"].pending.requests, 1);
        assert_eq!(snap.by_type["medical"].rejected.days, 3);
        // Types with no requests still appear with zero buckets.
        let snap = aggregate(&[], &StatsFilter::default());
        assert_eq!(snap.by_type.len(), 3);
        assert_eq!(snap.by_type["casual"].total, Bucket::default());
    }

    #[test]
    fn employee_department_and_year_filters_apply() {
        let set = sample_set();

        let snap = aggregate(
            &set,
            &StatsFilter { employee_id: Some(2000), year: Some(2026), ..Default::default() },
        );
        assert_eq!(snap.total.total.requests, 1);

        let snap = aggregate(
            &set,
            &StatsFilter { department_id: Some(10), year: Some(2026), ..Default::default() },
        );
        assert_eq!(snap.total.total.requests, 3);

        let snap = aggregate(&set, &StatsFilter { year: Some(2025), ..Default::default() });
        assert_eq!(snap.total.total.requests, 1);
        assert_eq!(snap.total.approved.days, 10);

        // No year filter aggregates everything.
        let snap = aggregate(&set, &StatsFilter::default());
        assert_eq!(snap.total.total.requests, 5);
    }

    #[test]
    fn aggregation_is_idempotent() {
        let set = sample_set();
        let filter = StatsFilter { year: Some(2026), ..Default::default() };
        let a = aggregate(&set, &filter);
        let b = aggregate(&set, &filter);
        assert_eq!(a.total, b.total);
        assert_eq!(a.by_type, b.by_type);
    }
}
