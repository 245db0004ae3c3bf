use crate::model::leave_request::LeaveType;
use chrono::Weekday;
use std::collections::{HashMap, HashSet};
use std::str::FromStr;
use strum_macros::{Display, EnumString};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum LimitUnit {
    Yearly,
    Monthly,
}

/// Per-leave-type entitlement limit as configured by the admin screens.
#[derive(Debug, Copy, Clone)]
pub struct LeaveLimit {
    pub unit: LimitUnit,
    pub value: u32,
}

impl LeaveLimit {
    /// Annualized ceiling. Monthly limits are enforced as a yearly ceiling
    /// (value x 12); per-month roll-over is not tracked.
    pub fn annualized(&self) -> u32 {
        match self.unit {
            LimitUnit::Yearly => self.value,
            LimitUnit::Monthly => self.value.saturating_mul(12),
        }
    }
}

/// Organization-wide leave settings. Read-only input to the engine; owned by
/// the external admin-config service.
#[derive(Debug, Clone)]
pub struct EntitlementConfig {
    pub limits: HashMap<LeaveType, LeaveLimit>,
    pub weekends: HashSet<Weekday>,
}

impl EntitlementConfig {
    /// Annualized paid-day ceiling for a leave type. A type with no
    /// configured limit has no paid entitlement.
    pub fn annualized_limit(&self, leave_type: LeaveType) -> u32 {
        self.limits
            .get(&leave_type)
            .map(LeaveLimit::annualized)
            .unwrap_or(0)
    }
}

/// Parse weekend day names as stored in `calendar_settings.weekend_days`
/// (JSON array, e.g. `["saturday", "sunday"]`).
pub fn parse_weekends(names: &[String]) -> Result<HashSet<Weekday>, String> {
    names
        .iter()
        .map(|n| Weekday::from_str(n).map_err(|_| format!("unknown weekday '{}'", n)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monthly_limit_annualizes_by_twelve() {
        let limit = LeaveLimit { unit: LimitUnit::Monthly, value: 2 };
        assert_eq!(limit.annualized(), 24);

        let limit = LeaveLimit { unit: LimitUnit::Yearly, value: 20 };
        assert_eq!(limit.annualized(), 20);
    }

    #[test]
    fn missing_limit_means_zero_entitlement() {
        let config = EntitlementConfig {
            limits: HashMap::from([(
                LeaveType::Annual,
                LeaveLimit { unit: LimitUnit::Yearly, value: 20 },
            )]),
            weekends: HashSet::new(),
        };
        assert_eq!(config.annualized_limit(LeaveType::Annual), 20);
        assert_eq!(config.annualized_limit(LeaveType::Medical), 0);
    }

    #[test]
    fn weekend_names_parse_to_weekdays() {
        let names = vec!["saturday".to_string(), "Sunday".to_string()];
        let weekends = parse_weekends(&names).unwrap();
        assert!(weekends.contains(&Weekday::Sat));
        assert!(weekends.contains(&Weekday::Sun));
        assert!(parse_weekends(&["noday".to_string()]).is_err());
    }
}
