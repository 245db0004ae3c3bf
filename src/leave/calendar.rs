use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::HashSet;

/// Number of working days in `[start, end]` inclusive: calendar days whose
/// weekday is not in `weekends` and whose date is not in `holidays`.
///
/// `start == end` on a non-excluded day yields 1; on an excluded day it
/// yields 0, which callers must treat as an invalid request. `start > end`
/// yields 0 (callers validate the range before accounting).
pub fn working_days(
    start: NaiveDate,
    end: NaiveDate,
    weekends: &HashSet<Weekday>,
    holidays: &HashSet<NaiveDate>,
) -> u32 {
    if start > end {
        return 0;
    }
    start
        .iter_days()
        .take_while(|day| *day <= end)
        .filter(|day| !weekends.contains(&day.weekday()) && !holidays.contains(day))
        .count() as u32
}
