//! Focus timer implementation.
//!
//! The timer is a countdown state machine. It does not use internal threads
//! or hold a clock reference - the caller is responsible for calling `tick()`
//! once per second while the timer is running, which makes the machine
//! trivially testable by synchronous repeated calls.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> Paused -> Running -> Completed -> Idle
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut timer = FocusTimer::new();
//! timer.start("session-1", 25 * 60);
//! // Once per second:
//! timer.tick(); // Returns Some(Event::TimerCompleted) on the final tick
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::events::Event;

/// Observable timer phase, derived from the underlying fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerPhase {
    Idle,
    Running,
    Paused,
    Completed,
}

/// Countdown timer for a single focus session.
///
/// Invariants: `time_left_secs <= initial_secs`, and a timer is never both
/// running and completed. There is no observable state where the remaining
/// time is zero while the timer is still running - the final `tick()` lands
/// directly on `Completed`.
///
/// Invalid transitions (pausing an idle timer, ticking while paused, ...)
/// are silent no-ops rather than errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FocusTimer {
    /// Remaining time in seconds for the current session.
    time_left_secs: u64,
    /// Total time of the session, kept for progress display and rewards.
    initial_secs: u64,
    is_running: bool,
    is_completed: bool,
    /// Which timeline session is currently active, if any.
    active_session_id: Option<String>,
}

impl FocusTimer {
    /// Create a new idle timer.
    pub fn new() -> Self {
        Self {
            time_left_secs: 0,
            initial_secs: 0,
            is_running: false,
            is_completed: false,
            active_session_id: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> TimerPhase {
        if self.is_completed {
            TimerPhase::Completed
        } else if self.is_running {
            TimerPhase::Running
        } else if self.time_left_secs > 0 {
            TimerPhase::Paused
        } else {
            TimerPhase::Idle
        }
    }

    pub fn time_left_secs(&self) -> u64 {
        self.time_left_secs
    }

    pub fn initial_secs(&self) -> u64 {
        self.initial_secs
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn is_completed(&self) -> bool {
        self.is_completed
    }

    pub fn active_session_id(&self) -> Option<&str> {
        self.active_session_id.as_deref()
    }

    /// 0.0 .. 1.0 progress within the current session.
    pub fn progress(&self) -> f64 {
        if self.initial_secs == 0 {
            return 0.0;
        }
        1.0 - (self.time_left_secs as f64 / self.initial_secs as f64)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            phase: self.phase(),
            time_left_secs: self.time_left_secs,
            initial_secs: self.initial_secs,
            active_session_id: self.active_session_id.clone(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start a session. No-op when already running for the same session id
    /// (guards against duplicate restarts) or when `duration_secs` is zero.
    pub fn start(&mut self, session_id: &str, duration_secs: u64) -> Option<Event> {
        if duration_secs == 0 {
            return None;
        }
        if self.is_running && self.active_session_id.as_deref() == Some(session_id) {
            return None;
        }
        self.time_left_secs = duration_secs;
        self.initial_secs = duration_secs;
        self.is_running = true;
        self.is_completed = false;
        self.active_session_id = Some(session_id.to_string());
        Some(Event::TimerStarted {
            session_id: session_id.to_string(),
            duration_secs,
            at: Utc::now(),
        })
    }

    /// Pause the countdown. No-op unless running.
    pub fn pause(&mut self) -> Option<Event> {
        if !self.is_running {
            return None;
        }
        self.is_running = false;
        Some(Event::TimerPaused {
            remaining_secs: self.time_left_secs,
            at: Utc::now(),
        })
    }

    /// Resume a paused countdown. No-op unless paused.
    pub fn resume(&mut self) -> Option<Event> {
        if self.phase() != TimerPhase::Paused {
            return None;
        }
        self.is_running = true;
        Some(Event::TimerResumed {
            remaining_secs: self.time_left_secs,
            at: Utc::now(),
        })
    }

    /// Stop from any state and return to idle. Remaining time is discarded;
    /// no partial credit is awarded.
    pub fn stop(&mut self) -> Option<Event> {
        let discarded = self.time_left_secs;
        self.time_left_secs = 0;
        self.initial_secs = 0;
        self.is_running = false;
        self.is_completed = false;
        self.active_session_id = None;
        Some(Event::TimerStopped {
            discarded_secs: discarded,
            at: Utc::now(),
        })
    }

    /// Advance the countdown by one second. Only valid while running.
    ///
    /// When the last second elapses, the same call transitions straight to
    /// `Completed` and returns the completion event. The session id stays
    /// set so the reward can be attributed until `reset()` is called.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.is_running {
            return None;
        }
        if self.time_left_secs <= 1 {
            self.time_left_secs = 0;
            self.is_running = false;
            self.is_completed = true;
            return Some(Event::TimerCompleted {
                session_id: self.active_session_id.clone().unwrap_or_default(),
                focus_secs: self.initial_secs,
                at: Utc::now(),
            });
        }
        self.time_left_secs -= 1;
        None
    }

    /// Return to idle. Used after the completion reward has been claimed.
    pub fn reset(&mut self) -> Option<Event> {
        self.time_left_secs = 0;
        self.initial_secs = 0;
        self.is_running = false;
        self.is_completed = false;
        self.active_session_id = None;
        Some(Event::TimerReset { at: Utc::now() })
    }
}

impl Default for FocusTimer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn start_pause_resume() {
        let mut timer = FocusTimer::new();
        assert_eq!(timer.phase(), TimerPhase::Idle);

        assert!(timer.start("s1", 60).is_some());
        assert_eq!(timer.phase(), TimerPhase::Running);
        assert_eq!(timer.time_left_secs(), 60);
        assert_eq!(timer.initial_secs(), 60);

        assert!(timer.pause().is_some());
        assert_eq!(timer.phase(), TimerPhase::Paused);

        assert!(timer.resume().is_some());
        assert_eq!(timer.phase(), TimerPhase::Running);
    }

    #[test]
    fn start_is_idempotent_for_same_running_session() {
        let mut timer = FocusTimer::new();
        timer.start("s1", 60);
        timer.tick();
        let before = timer.clone();
        assert!(timer.start("s1", 60).is_none());
        assert_eq!(timer.time_left_secs(), before.time_left_secs());
        assert_eq!(timer.phase(), TimerPhase::Running);
    }

    #[test]
    fn start_with_other_session_replaces_running_timer() {
        let mut timer = FocusTimer::new();
        timer.start("s1", 60);
        assert!(timer.start("s2", 120).is_some());
        assert_eq!(timer.active_session_id(), Some("s2"));
        assert_eq!(timer.time_left_secs(), 120);
    }

    #[test]
    fn zero_duration_start_is_rejected() {
        let mut timer = FocusTimer::new();
        assert!(timer.start("s1", 0).is_none());
        assert_eq!(timer.phase(), TimerPhase::Idle);
    }

    #[test]
    fn tick_is_noop_when_paused() {
        let mut timer = FocusTimer::new();
        timer.start("s1", 10);
        timer.pause();
        for _ in 0..20 {
            assert!(timer.tick().is_none());
        }
        assert_eq!(timer.time_left_secs(), 10);
    }

    #[test]
    fn final_tick_completes_in_one_step() {
        let mut timer = FocusTimer::new();
        timer.start("s1", 3);
        assert!(timer.tick().is_none());
        assert!(timer.tick().is_none());
        // time_left is now 1; the next tick must land on Completed directly.
        let event = timer.tick();
        assert!(matches!(event, Some(Event::TimerCompleted { .. })));
        assert_eq!(timer.phase(), TimerPhase::Completed);
        assert_eq!(timer.time_left_secs(), 0);
        assert!(!timer.is_running());
    }

    #[test]
    fn completed_timer_keeps_session_until_reset() {
        let mut timer = FocusTimer::new();
        timer.start("s1", 1);
        timer.tick();
        assert_eq!(timer.active_session_id(), Some("s1"));
        timer.reset();
        assert_eq!(timer.active_session_id(), None);
        assert_eq!(timer.phase(), TimerPhase::Idle);
    }

    #[test]
    fn stop_returns_to_idle_from_any_state() {
        let mut timer = FocusTimer::new();
        timer.start("s1", 60);
        timer.tick();
        timer.stop();
        assert_eq!(timer.phase(), TimerPhase::Idle);
        assert_eq!(timer.time_left_secs(), 0);
        assert_eq!(timer.active_session_id(), None);
        assert!(!timer.is_completed());

        timer.start("s2", 60);
        timer.pause();
        timer.stop();
        assert_eq!(timer.phase(), TimerPhase::Idle);
    }

    #[test]
    fn serde_round_trip_preserves_state() {
        let mut timer = FocusTimer::new();
        timer.start("s1", 90);
        timer.tick();
        timer.pause();
        let json = serde_json::to_string(&timer).unwrap();
        let restored: FocusTimer = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.phase(), TimerPhase::Paused);
        assert_eq!(restored.time_left_secs(), 89);
        assert_eq!(restored.active_session_id(), Some("s1"));
    }

    proptest! {
        /// `d` ticks after `start(_, d)` always reach Completed with no
        /// intermediate zero-while-running state.
        #[test]
        fn countdown_completes_after_exactly_d_ticks(d in 1u64..5000) {
            let mut timer = FocusTimer::new();
            timer.start("s1", d);
            for i in 0..d {
                prop_assert!(!(timer.time_left_secs() == 0 && timer.is_running()));
                let event = timer.tick();
                if i == d - 1 {
                    let completed = matches!(event, Some(Event::TimerCompleted { .. }));
                    prop_assert!(completed);
                } else {
                    prop_assert!(event.is_none());
                }
                prop_assert!(timer.time_left_secs() <= timer.initial_secs());
            }
            prop_assert!(timer.is_completed());
            prop_assert_eq!(timer.time_left_secs(), 0);
        }
    }
}
