use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Every state change in the system produces an Event.
/// The CLI prints them as JSON; UI surfaces subscribe to them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        session_id: String,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// Timer was stopped before completion; remaining time is discarded
    /// and no reward is granted.
    TimerStopped {
        discarded_secs: u64,
        at: DateTime<Utc>,
    },
    TimerCompleted {
        session_id: String,
        focus_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        at: DateTime<Utc>,
    },
    /// Reward computed from a completed session and handed to persistence.
    RewardGranted {
        minutes: u64,
        xp: u64,
        at: DateTime<Utc>,
    },
    /// Daily login streak re-evaluated.
    StreakUpdated {
        streak: u32,
        at: DateTime<Utc>,
    },
    /// A scheduled session matched the current hour for the first time.
    /// Emitted at most once per session id per process lifetime.
    SessionDue {
        session_id: String,
        subject_name: String,
        subject_color: String,
        at: DateTime<Utc>,
    },
    SubjectRemoved {
        id: String,
        at: DateTime<Utc>,
    },
    SessionRemoved {
        id: String,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        phase: crate::timer::TimerPhase,
        time_left_secs: u64,
        initial_secs: u64,
        active_session_id: Option<String>,
        at: DateTime<Utc>,
    },
}
