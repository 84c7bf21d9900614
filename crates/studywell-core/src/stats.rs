//! Daily focus statistics.
//!
//! Completed sessions land in a per-calendar-day bucket; the analytics view
//! reads the last seven days back out.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One calendar day's focus totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStat {
    pub date: NaiveDate,
    pub minutes: u64,
    pub xp: u64,
}

/// The last seven days of activity, oldest first. Days without any
/// completed session are simply absent.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WeeklyReport {
    pub days: Vec<DailyStat>,
}

impl WeeklyReport {
    pub fn total_minutes(&self) -> u64 {
        self.days.iter().map(|d| d.minutes).sum()
    }

    pub fn total_xp(&self) -> u64 {
        self.days.iter().map(|d| d.xp).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_sum_over_days() {
        let report = WeeklyReport {
            days: vec![
                DailyStat {
                    date: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
                    minutes: 25,
                    xp: 250,
                },
                DailyStat {
                    date: NaiveDate::from_ymd_opt(2024, 3, 11).unwrap(),
                    minutes: 50,
                    xp: 500,
                },
            ],
        };
        assert_eq!(report.total_minutes(), 75);
        assert_eq!(report.total_xp(), 750);
    }
}
