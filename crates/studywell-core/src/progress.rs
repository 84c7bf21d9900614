//! User progress: XP, level, streak, and the persistence seam.
//!
//! The core computes deltas (rewards, streak values); writing them is an
//! external responsibility behind [`ProgressSink`]. Callers treat sink
//! failures as fire-and-forget: the error is logged and the in-memory
//! numbers are not rolled back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// XP needed per level above the first.
pub const XP_PER_LEVEL: u64 = 1000;

/// Cumulative progress for a user.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserProgress {
    pub xp: u64,
    pub level: u32,
    /// Consecutive-day login count. 0 only before the first login.
    pub streak: u32,
    pub total_minutes: u64,
    pub last_login: Option<DateTime<Utc>>,
}

/// A row on the leaderboard, ordered by XP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub id: String,
    pub display_name: String,
    pub xp: u64,
    pub level: u32,
}

pub fn level_for_xp(xp: u64) -> u32 {
    (xp / XP_PER_LEVEL) as u32 + 1
}

/// Persistence seam for progress updates.
///
/// `apply_reward` increments cumulative XP, total minutes, and the per-day
/// stats bucket for the current calendar date. `apply_streak` records the
/// re-evaluated streak together with the login timestamp.
pub trait ProgressSink {
    fn apply_reward(&self, minutes: u64, xp: u64) -> Result<()>;
    fn apply_streak(&self, streak: u32, at: DateTime<Utc>) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_scales_with_xp() {
        assert_eq!(level_for_xp(0), 1);
        assert_eq!(level_for_xp(999), 1);
        assert_eq!(level_for_xp(1000), 2);
        assert_eq!(level_for_xp(5230), 6);
    }
}
