//! Daily login streak evaluation.
//!
//! Runs once per login event. The comparison uses calendar-day granularity,
//! not 24-hour rounding: logging in at 23:59 and again at 00:01 counts as
//! consecutive days.

use chrono::{DateTime, Utc};

/// Compute the new streak value for a login at `now`.
///
/// - first-ever login (`last_login` is `None`) starts the streak at 1
/// - a same-day re-login leaves the streak unchanged
/// - a login on the next calendar day increments it
/// - a missed day resets it to 1
/// - a `last_login` in the future (clock skew or backdated data) leaves the
///   streak unchanged
pub fn compute_streak(
    last_login: Option<DateTime<Utc>>,
    current_streak: u32,
    now: DateTime<Utc>,
) -> u32 {
    let Some(last) = last_login else {
        return 1;
    };
    let days_diff = now
        .date_naive()
        .signed_duration_since(last.date_naive())
        .num_days();
    match days_diff {
        0 => current_streak,
        1 => current_streak + 1,
        d if d > 1 => 1,
        // Negative: last login is ahead of the clock. Leave the streak alone.
        _ => current_streak,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn first_login_starts_at_one() {
        assert_eq!(compute_streak(None, 0, at(2024, 3, 10, 9)), 1);
        assert_eq!(compute_streak(None, 7, at(2024, 3, 10, 9)), 1);
    }

    #[test]
    fn same_day_relogin_is_unchanged() {
        let last = at(2024, 3, 10, 8);
        assert_eq!(compute_streak(Some(last), 5, at(2024, 3, 10, 22)), 5);
    }

    #[test]
    fn next_day_increments() {
        let last = at(2024, 3, 10, 9);
        assert_eq!(compute_streak(Some(last), 5, at(2024, 3, 11, 9)), 6);
    }

    #[test]
    fn calendar_day_boundary_counts_as_consecutive() {
        // 23:59 then 00:01 the next day is one calendar day apart.
        let last = Utc.with_ymd_and_hms(2024, 3, 10, 23, 59, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 3, 11, 0, 1, 0).unwrap();
        assert_eq!(compute_streak(Some(last), 3, now), 4);
    }

    #[test]
    fn missed_day_resets() {
        let last = at(2024, 3, 10, 9);
        assert_eq!(compute_streak(Some(last), 5, at(2024, 3, 13, 9)), 1);
    }

    #[test]
    fn future_last_login_is_a_noop() {
        let last = at(2024, 3, 15, 9);
        assert_eq!(compute_streak(Some(last), 5, at(2024, 3, 10, 9)), 5);
    }
}
