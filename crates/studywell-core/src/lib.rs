//! # StudyWell Core Library
//!
//! Core business logic for StudyWell, a study-habit tracker: subjects are
//! scheduled on a daily timeline, a focus timer is run against a scheduled
//! (or free-form) session, and completed sessions earn experience points
//! that feed a leaderboard and a daily login streak.
//!
//! ## Architecture
//!
//! - **Timer**: a caller-driven countdown state machine; the caller invokes
//!   `tick()` once per second while the timer is running
//! - **Reward / Streak**: pure functions turning focused time into XP and
//!   login timestamps into consecutive-day streaks
//! - **Schedule**: subject/session types plus the hour-of-day matcher that
//!   decides which subject is "active now"
//! - **Storage**: SQLite-backed subjects, sessions, progress, daily stats
//!   and a key-value slot used to persist timer state across restarts
//!
//! ## Key Components
//!
//! - [`FocusTimer`]: countdown state machine
//! - [`Database`]: persistence and the [`ProgressSink`] implementation
//! - [`find_active_slot`]: schedule matcher
//! - [`compute_reward`] / [`compute_streak`]: reward and streak rules

pub mod error;
pub mod events;
pub mod progress;
pub mod reward;
pub mod schedule;
pub mod stats;
pub mod storage;
pub mod streak;
pub mod timer;

pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use events::Event;
pub use progress::{level_for_xp, LeaderboardEntry, ProgressSink, UserProgress};
pub use reward::{compute_reward, Reward};
pub use schedule::matcher::{find_active_slot, ActiveSlot, NotificationTracker};
pub use schedule::{ScheduledSession, Subject, SUBJECT_COLORS};
pub use stats::{DailyStat, WeeklyReport};
pub use storage::{Config, Database};
pub use streak::compute_streak;
pub use timer::{FocusTimer, TimerPhase};
