use crate::leave::error::LeaveError;
use crate::leave::state::Stage;
use crate::model::leave_request::{LeaveRequest, LeaveStatus};
use crate::model::role::Role;

/// May this actor decide the given stage of the request?
///
/// Department heads act only on the dept-head stage and only when listed as
/// an eligible approver for the request, or when they currently manage the
/// employee's department (`manages_department`, resolved by the caller from
/// the directory; covers heads appointed after the request was filed).
/// Admins act on either stage (the state machine enforces which statuses
/// each stage can still decide).
pub fn can_decide(
    role: Role,
    actor_id: u64,
    request: &LeaveRequest,
    stage: Stage,
    manages_department: bool,
) -> Result<(), LeaveError> {
    match (stage, role) {
        (Stage::DeptHead, Role::DeptHead) => {
            if request.dept_head_ids.contains(&actor_id) || manages_department {
                Ok(())
            } else {
                Err(LeaveError::Unauthorized(
                    "You are not an eligible department head for this request".to_string(),
                ))
            }
        }
        (Stage::Admin, Role::Admin) => Ok(()),
        (Stage::DeptHead, Role::Admin) => Err(LeaveError::Unauthorized(
            "Admins decide through the admin action endpoint".to_string(),
        )),
        _ => Err(LeaveError::Unauthorized(
            "Your role cannot decide leave requests".to_string(),
        )),
    }
}

/// May this actor edit or delete the request?
///
/// Admins may at any status. Everyone else only on their own request and
/// only while it is still `pending_dept_head`; once the first decision of
/// either stage is recorded the window is closed.
pub fn can_modify(
    role: Role,
    actor_employee_id: Option<u64>,
    request: &LeaveRequest,
) -> Result<(), LeaveError> {
    if role == Role::Admin {
        return Ok(());
    }
    if actor_employee_id != Some(request.employee_id) {
        return Err(LeaveError::Unauthorized(
            "Only the owner of a leave request may change it".to_string(),
        ));
    }
    if request.status != LeaveStatus::PendingDeptHead {
        return Err(LeaveError::EditWindowClosed);
    }
    Ok(())
}

/// May this actor view the request? Owners, eligible department heads and
/// admins only; the list endpoints apply the same scoping in SQL.
pub fn can_view(
    role: Role,
    actor_employee_id: Option<u64>,
    request: &LeaveRequest,
) -> Result<(), LeaveError> {
    let allowed = match role {
        Role::Admin => true,
        Role::DeptHead => {
            actor_employee_id == Some(request.employee_id)
                || actor_employee_id
                    .map(|id| request.dept_head_ids.contains(&id))
                    .unwrap_or(false)
        }
        Role::Employee => actor_employee_id == Some(request.employee_id),
    };
    if allowed {
        Ok(())
    } else {
        Err(LeaveError::Unauthorized(
            "You are not allowed to view this leave request".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leave::testutil::request;

    #[test]
    fn eligible_dept_head_may_decide_first_stage() {
        let req = request(1000, LeaveStatus::PendingDeptHead);
        assert!(can_decide(Role::DeptHead, 7, &req, Stage::DeptHead, false).is_ok());
    }

    #[test]
    fn unlisted_dept_head_is_denied() {
        let req = request(1000, LeaveStatus::PendingDeptHead);
        assert!(matches!(
            can_decide(Role::DeptHead, 99, &req, Stage::DeptHead, false),
            Err(LeaveError::Unauthorized(_))
        ));
        // A head appointed after filing is still eligible.
        assert!(can_decide(Role::DeptHead, 99, &req, Stage::DeptHead, true).is_ok());
    }

    #[test]
    fn admin_decides_admin_stage_regardless_of_eligibility_list() {
        let req = request(1000, LeaveStatus::PendingDeptHead);
        assert!(can_decide(Role::Admin, 1, &req, Stage::Admin, false).is_ok());
        let req = request(1000, LeaveStatus::PendingAdmin);
        assert!(can_decide(Role::Admin, 1, &req, Stage::Admin, false).is_ok());
    }

    #[test]
    fn employees_cannot_decide() {
        let req = request(1000, LeaveStatus::PendingDeptHead);
        assert!(can_decide(Role::Employee, 1000, &req, Stage::DeptHead, false).is_err());
        assert!(can_decide(Role::Employee, 1000, &req, Stage::Admin, false).is_err());
    }

    #[test]
    fn owner_may_modify_while_pending_dept_head() {
        let req = request(1000, LeaveStatus::PendingDeptHead);
        assert!(can_modify(Role::Employee, Some(1000), &req).is_ok());
    }

    #[test]
    fn owner_loses_edit_window_after_first_decision() {
        for status in [LeaveStatus::PendingAdmin, LeaveStatus::Approved, LeaveStatus::Rejected] {
            let req = request(1000, status);
            assert!(matches!(
                can_modify(Role::Employee, Some(1000), &req),
                Err(LeaveError::EditWindowClosed)
            ));
        }
    }

    #[test]
    fn non_owner_is_unauthorized_not_window_closed() {
        let req = request(1000, LeaveStatus::PendingDeptHead);
        assert!(matches!(
            can_modify(Role::Employee, Some(2000), &req),
            Err(LeaveError::Unauthorized(_))
        ));
        assert!(matches!(
            can_modify(Role::DeptHead, Some(7), &req),
            Err(LeaveError::Unauthorized(_))
        ));
    }

    #[test]
    fn admin_may_modify_at_any_status() {
        for status in [
            LeaveStatus::PendingDeptHead,
            LeaveStatus::PendingAdmin,
            LeaveStatus::Approved,
            LeaveStatus::Rejected,
        ] {
            let req = request(1000, status);
            assert!(can_modify(Role::Admin, None, &req).is_ok());
        }
    }

    #[test]
    fn view_scope_covers_owner_dept_head_and_admin() {
        let req = request(1000, LeaveStatus::PendingDeptHead);
        assert!(can_view(Role::Employee, Some(1000), &req).is_ok());
        assert!(can_view(Role::Employee, Some(2000), &req).is_err());
        assert!(can_view(Role::DeptHead, Some(7), &req).is_ok());
        assert!(can_view(Role::DeptHead, Some(99), &req).is_err());
        assert!(can_view(Role::Admin, None, &req).is_ok());
    }
}
