//! Reward calculation for completed focus sessions.
//!
//! XP is earned at a fixed rate per focused minute. Sessions shorter than a
//! minute still count as one minute, so short demo sessions always yield a
//! visible reward.

use serde::{Deserialize, Serialize};

/// XP earned per focused minute.
pub const XP_PER_MINUTE: u64 = 10;

/// Reward derived from a completed session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    /// Focused minutes credited, always at least 1.
    pub minutes: u64,
    pub xp: u64,
}

/// Compute the reward for a session of `initial_secs` total duration.
///
/// `minutes = max(1, initial_secs / 60)`, `xp = minutes * 10`.
pub fn compute_reward(initial_secs: u64) -> Reward {
    let minutes = (initial_secs / 60).max(1);
    Reward {
        minutes,
        xp: minutes * XP_PER_MINUTE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_session_floors_to_one_minute() {
        assert_eq!(compute_reward(5), Reward { minutes: 1, xp: 10 });
        assert_eq!(compute_reward(59), Reward { minutes: 1, xp: 10 });
    }

    #[test]
    fn partial_minutes_are_truncated() {
        assert_eq!(compute_reward(125), Reward { minutes: 2, xp: 20 });
    }

    #[test]
    fn exact_minutes() {
        assert_eq!(compute_reward(60), Reward { minutes: 1, xp: 10 });
        assert_eq!(
            compute_reward(25 * 60),
            Reward {
                minutes: 25,
                xp: 250
            }
        );
    }
}
