//! Schedule types: subjects and timeline sessions.
//!
//! Subjects are the user's study categories; sessions place a subject on
//! the daily timeline. Both are reference data for the matcher in
//! [`matcher`] - the core never mutates a session once stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod matcher;

/// A study subject, e.g. "Linear Algebra".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    pub name: String,
    /// Hex color used for the subject tag, e.g. `#3b82f6`.
    pub color: String,
    pub created_at: DateTime<Utc>,
}

/// A session scheduled on the daily timeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledSession {
    pub id: String,
    pub subject_id: String,
    /// Epoch milliseconds.
    pub start_time: i64,
    /// Epoch milliseconds.
    pub end_time: i64,
    pub duration_minutes: i64,
}

/// The fixed palette offered by the subject color picker.
pub const SUBJECT_COLORS: &[(&str, &str)] = &[
    ("Zinc", "#71717a"),
    ("Red", "#ef4444"),
    ("Orange", "#f97316"),
    ("Amber", "#f59e0b"),
    ("Green", "#22c55e"),
    ("Emerald", "#10b981"),
    ("Teal", "#14b8a6"),
    ("Cyan", "#06b6d4"),
    ("Blue", "#3b82f6"),
    ("Indigo", "#6366f1"),
    ("Violet", "#8b5cf6"),
    ("Purple", "#a855f7"),
    ("Fuchsia", "#d946ef"),
    ("Pink", "#ec4899"),
    ("Rose", "#f43f5e"),
];

/// Check that `color` looks like a `#rrggbb` hex code.
pub fn is_valid_hex_color(color: &str) -> bool {
    let Some(hex) = color.strip_prefix('#') else {
        return false;
    };
    hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_colors_are_valid() {
        for (_, value) in SUBJECT_COLORS {
            assert!(is_valid_hex_color(value), "bad palette entry: {value}");
        }
    }

    #[test]
    fn rejects_malformed_colors() {
        assert!(!is_valid_hex_color("3b82f6"));
        assert!(!is_valid_hex_color("#3b82f"));
        assert!(!is_valid_hex_color("#3b82fg"));
        assert!(!is_valid_hex_color(""));
    }
}
