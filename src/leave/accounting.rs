/// Paid/unpaid day split for a request. `clamped` is set when a caller's
/// requested paid-day value exceeded the allowed ceiling and was reduced;
/// it surfaces as an `ExceedsEntitlement` warning on an otherwise successful
/// response, never as a failure.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Split {
    pub paid_leave: u32,
    pub unpaid_leave: u32,
    pub clamped: bool,
}

/// Derive the paid/unpaid split for `working_days` against the employee's
/// remaining yearly entitlement.
///
/// `annualized_limit` is the yearly ceiling for the leave type;
/// `prior_approved_days` the paid days already approved for this employee,
/// type and year. When `requested_paid` is given (an approver adjusting the
/// request) it is clamped to `[0, min(working_days, remaining)]`; otherwise
/// the split defaults to the maximum paid days available.
pub fn split(
    working_days: u32,
    annualized_limit: u32,
    prior_approved_days: u32,
    requested_paid: Option<u32>,
) -> Split {
    let remaining = annualized_limit.saturating_sub(prior_approved_days);
    let ceiling = working_days.min(remaining);

    let (paid_leave, clamped) = match requested_paid {
        Some(requested) => (requested.min(ceiling), requested > ceiling),
        None => (ceiling, false),
    };

    Split {
        paid_leave,
        unpaid_leave: working_days - paid_leave,
        clamped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_split_uses_full_entitlement() {
        // 5 working days, yearly limit 20, nothing taken yet.
        let s = split(5, 20, 0, None);
        assert_eq!(s, Split { paid_leave: 5, unpaid_leave: 0, clamped: false });
    }

    #[test]
    fn default_split_clamps_to_remaining_entitlement() {
        // 18 of 20 annual days already approved; 5-day request leaves 2 paid.
        let s = split(5, 20, 18, None);
        assert_eq!(s, Split { paid_leave: 2, unpaid_leave: 3, clamped: false });
    }

    #[test]
    fn exhausted_entitlement_goes_fully_unpaid() {
        let s = split(4, 20, 20, None);
        assert_eq!(s, Split { paid_leave: 0, unpaid_leave: 4, clamped: false });

        // Prior days beyond the limit must not underflow.
        let s = split(4, 20, 25, None);
        assert_eq!(s, Split { paid_leave: 0, unpaid_leave: 4, clamped: false });
    }

    #[test]
    fn requested_paid_within_ceiling_is_honored() {
        let s = split(5, 20, 0, Some(3));
        assert_eq!(s, Split { paid_leave: 3, unpaid_leave: 2, clamped: false });

        let s = split(5, 20, 0, Some(0));
        assert_eq!(s, Split { paid_leave: 0, unpaid_leave: 5, clamped: false });
    }

    #[test]
    fn requested_paid_above_ceiling_is_clamped_and_flagged() {
        // Over the working-day count.
        let s = split(5, 20, 0, Some(9));
        assert_eq!(s, Split { paid_leave: 5, unpaid_leave: 0, clamped: true });

        // Over the remaining entitlement.
        let s = split(5, 20, 18, Some(4));
        assert_eq!(s, Split { paid_leave: 2, unpaid_leave: 3, clamped: true });
    }

    #[test]
    fn split_invariant_paid_plus_unpaid_equals_working_days() {
        for w in 0..10u32 {
            for prior in [0u32, 5, 19, 20, 30] {
                for requested in [None, Some(0), Some(3), Some(50)] {
                    let s = split(w, 20, prior, requested);
                    assert_eq!(s.paid_leave + s.unpaid_leave, w);
                    assert!(s.paid_leave <= 20u32.saturating_sub(prior).min(w));
                }
            }
        }
    }
}
