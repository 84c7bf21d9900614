//! Hour-of-day schedule matching.
//!
//! Matching is deliberately coarse: a session is "active" when its start
//! time falls in the same clock hour as `now`, regardless of minute or
//! date. At most one session per hour is expected; when several share an
//! hour the first one encountered wins. This mirrors the product behavior
//! and is not tightened here.
//!
//! The matcher itself is a pure function of its inputs and is meant to be
//! re-evaluated once per minute (and immediately when the session or
//! subject lists change). [`NotificationTracker`] adds the one piece of
//! mutable memory on top: a session id is surfaced as due at most once per
//! process lifetime, even though the matcher would keep re-matching it
//! every subsequent minute.

use std::collections::HashSet;

use chrono::{DateTime, TimeZone, Timelike};
use serde::{Deserialize, Serialize};

use super::{ScheduledSession, Subject};

/// The subject matched to the current hour. Derived data - recomputed on
/// every poll, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveSlot {
    pub subject_name: String,
    pub subject_color: String,
    pub session_id: String,
    pub is_scheduled: bool,
}

/// Find the session scheduled for the current hour, if any.
///
/// Returns `None` when no session matches, and also when the matching
/// session references a subject that does not exist - a dangling reference
/// is treated as no active slot rather than a partial one.
pub fn find_active_slot<Tz: TimeZone>(
    sessions: &[ScheduledSession],
    subjects: &[Subject],
    now: &DateTime<Tz>,
) -> Option<ActiveSlot> {
    let hour = now.hour();
    let tz = now.timezone();
    let session = sessions.iter().find(|s| {
        tz.timestamp_millis_opt(s.start_time)
            .single()
            .map(|start| start.hour() == hour)
            .unwrap_or(false)
    })?;
    let subject = subjects.iter().find(|s| s.id == session.subject_id)?;
    Some(ActiveSlot {
        subject_name: subject.name.clone(),
        subject_color: subject.color.clone(),
        session_id: session.id.clone(),
        is_scheduled: true,
    })
}

/// One-shot notification memory for due sessions.
///
/// In-memory only: a restart re-enables notification for sessions still
/// matching the current hour.
#[derive(Debug, Default)]
pub struct NotificationTracker {
    seen: HashSet<String>,
}

impl NotificationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the matcher and return the active slot if it has not been
    /// surfaced before. Subsequent calls for the same session return `None`.
    pub fn check<Tz: TimeZone>(
        &mut self,
        sessions: &[ScheduledSession],
        subjects: &[Subject],
        now: &DateTime<Tz>,
    ) -> Option<ActiveSlot> {
        let slot = find_active_slot(sessions, subjects, now)?;
        if !self.seen.insert(slot.session_id.clone()) {
            return None;
        }
        Some(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn subject(id: &str, name: &str) -> Subject {
        Subject {
            id: id.into(),
            name: name.into(),
            color: "#3b82f6".into(),
            created_at: Utc::now(),
        }
    }

    fn session_at(id: &str, subject_id: &str, y: i32, m: u32, d: u32, h: u32, min: u32) -> ScheduledSession {
        let start = Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap();
        ScheduledSession {
            id: id.into(),
            subject_id: subject_id.into(),
            start_time: start.timestamp_millis(),
            end_time: start.timestamp_millis() + 60 * 60 * 1000,
            duration_minutes: 60,
        }
    }

    #[test]
    fn matches_by_hour_regardless_of_minute() {
        let subjects = vec![subject("a", "Math")];
        let sessions = vec![session_at("s1", "a", 2024, 3, 10, 14, 0)];

        let now = Utc.with_ymd_and_hms(2024, 3, 10, 14, 37, 0).unwrap();
        let slot = find_active_slot(&sessions, &subjects, &now).unwrap();
        assert_eq!(slot.session_id, "s1");
        assert_eq!(slot.subject_name, "Math");
        assert!(slot.is_scheduled);

        let later = Utc.with_ymd_and_hms(2024, 3, 10, 15, 1, 0).unwrap();
        assert!(find_active_slot(&sessions, &subjects, &later).is_none());
    }

    #[test]
    fn first_match_wins_when_sessions_share_an_hour() {
        let subjects = vec![subject("a", "Math"), subject("b", "History")];
        let sessions = vec![
            session_at("s1", "a", 2024, 3, 10, 9, 0),
            session_at("s2", "b", 2024, 3, 10, 9, 30),
        ];
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 9, 45, 0).unwrap();
        let slot = find_active_slot(&sessions, &subjects, &now).unwrap();
        assert_eq!(slot.session_id, "s1");
    }

    #[test]
    fn dangling_subject_yields_none() {
        let subjects = vec![subject("a", "Math")];
        let sessions = vec![session_at("s1", "deleted", 2024, 3, 10, 9, 0)];
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 9, 15, 0).unwrap();
        assert!(find_active_slot(&sessions, &subjects, &now).is_none());
    }

    #[test]
    fn empty_schedule_yields_none() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 9, 15, 0).unwrap();
        assert!(find_active_slot(&[], &[], &now).is_none());
    }

    #[test]
    fn tracker_notifies_each_session_once() {
        let subjects = vec![subject("a", "Math")];
        let sessions = vec![session_at("s1", "a", 2024, 3, 10, 14, 0)];
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 14, 5, 0).unwrap();

        let mut tracker = NotificationTracker::new();
        assert!(tracker.check(&sessions, &subjects, &now).is_some());
        // The matcher still matches, but the tracker stays quiet.
        assert!(find_active_slot(&sessions, &subjects, &now).is_some());
        assert!(tracker.check(&sessions, &subjects, &now).is_none());
    }

    #[test]
    fn tracker_fires_again_for_a_new_session() {
        let subjects = vec![subject("a", "Math")];
        let morning = vec![session_at("s1", "a", 2024, 3, 10, 9, 0)];
        let afternoon = vec![session_at("s2", "a", 2024, 3, 10, 14, 0)];

        let mut tracker = NotificationTracker::new();
        let at9 = Utc.with_ymd_and_hms(2024, 3, 10, 9, 5, 0).unwrap();
        let at14 = Utc.with_ymd_and_hms(2024, 3, 10, 14, 5, 0).unwrap();
        assert!(tracker.check(&morning, &subjects, &at9).is_some());
        assert!(tracker.check(&afternoon, &subjects, &at14).is_some());
        assert!(tracker.check(&afternoon, &subjects, &at14).is_none());
    }
}
