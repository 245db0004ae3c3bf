use crate::leave::error::LeaveError;
use crate::model::leave_request::{LeaveAction, LeaveStatus};

/// The two sequential decision points of the approval chain.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Stage {
    DeptHead,
    Admin,
}

/// Outcome of a legal transition: the next status plus which stage records
/// must be stamped. The admin fast path from `pending_dept_head` stamps both
/// stages on approve, and only the dept-head stage on reject (the rejection
/// is recorded as a dept-head-stage decision performed by the admin).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Transition {
    pub next: LeaveStatus,
    pub records_dept_stage: bool,
    pub records_admin_stage: bool,
}

/// Compute the transition for `(current status, acting stage, action)`.
/// Any pair outside the table is `AlreadyDecided`: the stage the actor is
/// trying to decide has already been settled (or the request is terminal).
pub fn transition(
    current: LeaveStatus,
    stage: Stage,
    action: LeaveAction,
) -> Result<Transition, LeaveError> {
    match (current, stage, action) {
        (LeaveStatus::PendingDeptHead, Stage::DeptHead, LeaveAction::Approved) => {
            Ok(Transition {
                next: LeaveStatus::PendingAdmin,
                records_dept_stage: true,
                records_admin_stage: false,
            })
        }
        (LeaveStatus::PendingDeptHead, Stage::DeptHead, LeaveAction::Rejected) => {
            Ok(Transition {
                next: LeaveStatus::Rejected,
                records_dept_stage: true,
                records_admin_stage: false,
            })
        }
        // Admin override: approval finalizes both stages at once.
        (LeaveStatus::PendingDeptHead, Stage::Admin, LeaveAction::Approved) => Ok(Transition {
            next: LeaveStatus::Approved,
            records_dept_stage: true,
            records_admin_stage: true,
        }),
        (LeaveStatus::PendingDeptHead, Stage::Admin, LeaveAction::Rejected) => Ok(Transition {
            next: LeaveStatus::Rejected,
            records_dept_stage: true,
            records_admin_stage: false,
        }),
        (LeaveStatus::PendingAdmin, Stage::Admin, LeaveAction::Approved) => Ok(Transition {
            next: LeaveStatus::Approved,
            records_dept_stage: false,
            records_admin_stage: true,
        }),
        (LeaveStatus::PendingAdmin, Stage::Admin, LeaveAction::Rejected) => Ok(Transition {
            next: LeaveStatus::Rejected,
            records_dept_stage: false,
            records_admin_stage: true,
        }),
        _ => Err(LeaveError::AlreadyDecided),
    }
}

/// A rejection must carry a non-empty comment; clients enforce this too, but
/// the service validates independently.
pub fn validate_comment(action: LeaveAction, comment: Option<&str>) -> Result<(), LeaveError> {
    if action == LeaveAction::Rejected
        && comment.map(str::trim).filter(|c| !c.is_empty()).is_none()
    {
        return Err(LeaveError::Validation(
            "A rejection requires a non-empty comment".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dept_head_approve_moves_to_pending_admin() {
        let t = transition(
            LeaveStatus::PendingDeptHead,
            Stage::DeptHead,
            LeaveAction::Approved,
        )
        .unwrap();
        assert_eq!(t.next, LeaveStatus::PendingAdmin);
        assert!(t.records_dept_stage);
        assert!(!t.records_admin_stage);
    }

    #[test]
    fn dept_head_reject_is_terminal() {
        let t = transition(
            LeaveStatus::PendingDeptHead,
            Stage::DeptHead,
            LeaveAction::Rejected,
        )
        .unwrap();
        assert_eq!(t.next, LeaveStatus::Rejected);
        assert!(t.records_dept_stage);
        assert!(!t.records_admin_stage);
    }

    #[test]
    fn admin_approve_at_first_stage_finalizes_both_stages() {
        let t = transition(
            LeaveStatus::PendingDeptHead,
            Stage::Admin,
            LeaveAction::Approved,
        )
        .unwrap();
        assert_eq!(t.next, LeaveStatus::Approved);
        assert!(t.records_dept_stage);
        assert!(t.records_admin_stage);
    }

    #[test]
    fn admin_reject_at_first_stage_records_dept_stage_only() {
        let t = transition(
            LeaveStatus::PendingDeptHead,
            Stage::Admin,
            LeaveAction::Rejected,
        )
        .unwrap();
        assert_eq!(t.next, LeaveStatus::Rejected);
        assert!(t.records_dept_stage);
        assert!(!t.records_admin_stage);
    }

    #[test]
    fn admin_decides_second_stage() {
        let t = transition(
            LeaveStatus::PendingAdmin,
            Stage::Admin,
            LeaveAction::Approved,
        )
        .unwrap();
        assert_eq!(t.next, LeaveStatus::Approved);
        assert!(!t.records_dept_stage);
        assert!(t.records_admin_stage);

        let t = transition(
            LeaveStatus::PendingAdmin,
            Stage::Admin,
            LeaveAction::Rejected,
        )
        .unwrap();
        assert_eq!(t.next, LeaveStatus::Rejected);
    }

    #[test]
    fn dept_head_cannot_act_after_own_stage_decided() {
        for action in [LeaveAction::Approved, LeaveAction::Rejected] {
            assert!(matches!(
                transition(LeaveStatus::PendingAdmin, Stage::DeptHead, action),
                Err(LeaveError::AlreadyDecided)
            ));
        }
    }

    #[test]
    fn terminal_states_accept_no_action() {
        for current in [LeaveStatus::Approved, LeaveStatus::Rejected] {
            for stage in [Stage::DeptHead, Stage::Admin] {
                for action in [LeaveAction::Approved, LeaveAction::Rejected] {
                    assert!(matches!(
                        transition(current, stage, action),
                        Err(LeaveError::AlreadyDecided)
                    ));
                }
            }
        }
    }

    #[test]
    fn reject_requires_comment() {
        assert!(validate_comment(LeaveAction::Rejected, None).is_err());
        assert!(validate_comment(LeaveAction::Rejected, Some("   ")).is_err());
        assert!(validate_comment(LeaveAction::Rejected, Some("insufficient coverage")).is_ok());
        assert!(validate_comment(LeaveAction::Approved, None).is_ok());
    }
}
