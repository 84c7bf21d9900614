//! SQLite-based persistence.
//!
//! Provides storage for:
//! - Subjects and timeline sessions
//! - User progress (XP, level, streak) and the leaderboard
//! - Per-day focus statistics
//! - A key-value slot used to keep timer state across restarts

use chrono::{DateTime, Days, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::error::{DatabaseError, Result, ValidationError};
use crate::progress::{level_for_xp, LeaderboardEntry, ProgressSink, UserProgress};
use crate::schedule::{is_valid_hex_color, ScheduledSession, Subject};
use crate::stats::{DailyStat, WeeklyReport};

use super::data_dir;

/// The single local user every CLI invocation acts as.
const LOCAL_USER_ID: &str = "local";

/// SQLite database for StudyWell data.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `~/.config/studywell/studywell.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("studywell.db");
        let conn = Connection::open(&path).map_err(|source| DatabaseError::OpenFailed {
            path: path.clone(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    #[cfg(test)]
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(DatabaseError::from)?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS subjects (
                    id          TEXT PRIMARY KEY,
                    name        TEXT NOT NULL,
                    color       TEXT NOT NULL,
                    created_at  TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS sessions (
                    id               TEXT PRIMARY KEY,
                    subject_id       TEXT NOT NULL,
                    start_time       INTEGER NOT NULL,
                    end_time         INTEGER NOT NULL,
                    duration_minutes INTEGER NOT NULL
                );

                CREATE TABLE IF NOT EXISTS users (
                    id            TEXT PRIMARY KEY,
                    display_name  TEXT NOT NULL,
                    xp            INTEGER NOT NULL DEFAULT 0,
                    level         INTEGER NOT NULL DEFAULT 1,
                    streak        INTEGER NOT NULL DEFAULT 0,
                    total_minutes INTEGER NOT NULL DEFAULT 0,
                    last_login    TEXT
                );

                CREATE TABLE IF NOT EXISTS daily_stats (
                    date    TEXT PRIMARY KEY,
                    minutes INTEGER NOT NULL DEFAULT 0,
                    xp      INTEGER NOT NULL DEFAULT 0
                );

                CREATE TABLE IF NOT EXISTS kv (
                    key   TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_sessions_start_time ON sessions(start_time);
                CREATE INDEX IF NOT EXISTS idx_users_xp ON users(xp);",
            )
            .map_err(DatabaseError::from)?;
        self.conn
            .execute(
                "INSERT OR IGNORE INTO users (id, display_name) VALUES (?1, 'Student')",
                params![LOCAL_USER_ID],
            )
            .map_err(DatabaseError::from)?;
        Ok(())
    }

    // ── Subjects ─────────────────────────────────────────────────────

    /// Create a subject. The color must be a `#rrggbb` hex code.
    pub fn add_subject(&self, name: &str, color: &str) -> Result<Subject> {
        if name.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "name".into(),
                message: "subject name must not be empty".into(),
            }
            .into());
        }
        if !is_valid_hex_color(color) {
            return Err(ValidationError::InvalidValue {
                field: "color".into(),
                message: format!("'{color}' is not a #rrggbb hex color"),
            }
            .into());
        }
        let subject = Subject {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            color: color.to_string(),
            created_at: Utc::now(),
        };
        self.conn
            .execute(
                "INSERT INTO subjects (id, name, color, created_at) VALUES (?1, ?2, ?3, ?4)",
                params![
                    subject.id,
                    subject.name,
                    subject.color,
                    subject.created_at.to_rfc3339()
                ],
            )
            .map_err(DatabaseError::from)?;
        Ok(subject)
    }

    pub fn subjects(&self) -> Result<Vec<Subject>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, color, created_at FROM subjects ORDER BY created_at")
            .map_err(DatabaseError::from)?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })
            .map_err(DatabaseError::from)?;

        let mut subjects = Vec::new();
        for row in rows {
            let (id, name, color, created_at) = row.map_err(DatabaseError::from)?;
            subjects.push(Subject {
                id,
                name,
                color,
                created_at: parse_timestamp(&created_at)?,
            });
        }
        Ok(subjects)
    }

    /// Delete a subject. Sessions that reference it are kept; the matcher
    /// treats the dangling reference as "no active slot".
    pub fn remove_subject(&self, id: &str) -> Result<()> {
        let n = self
            .conn
            .execute("DELETE FROM subjects WHERE id = ?1", params![id])
            .map_err(DatabaseError::from)?;
        if n == 0 {
            return Err(DatabaseError::NotFound(format!("subject {id}")).into());
        }
        Ok(())
    }

    // ── Sessions ─────────────────────────────────────────────────────

    /// Schedule a session for an existing subject. Times are epoch ms.
    pub fn add_session(
        &self,
        subject_id: &str,
        start_time: i64,
        end_time: i64,
    ) -> Result<ScheduledSession> {
        if end_time <= start_time {
            return Err(ValidationError::InvalidTimeRange {
                start_ms: start_time,
                end_ms: end_time,
            }
            .into());
        }
        let exists: Option<String> = self
            .conn
            .query_row(
                "SELECT id FROM subjects WHERE id = ?1",
                params![subject_id],
                |row| row.get(0),
            )
            .optional()
            .map_err(DatabaseError::from)?;
        if exists.is_none() {
            return Err(ValidationError::UnknownSubject(subject_id.to_string()).into());
        }

        let session = ScheduledSession {
            id: Uuid::new_v4().to_string(),
            subject_id: subject_id.to_string(),
            start_time,
            end_time,
            duration_minutes: (end_time - start_time) / 60_000,
        };
        self.conn
            .execute(
                "INSERT INTO sessions (id, subject_id, start_time, end_time, duration_minutes)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    session.id,
                    session.subject_id,
                    session.start_time,
                    session.end_time,
                    session.duration_minutes
                ],
            )
            .map_err(DatabaseError::from)?;
        Ok(session)
    }

    pub fn sessions(&self) -> Result<Vec<ScheduledSession>> {
        self.query_sessions("SELECT id, subject_id, start_time, end_time, duration_minutes
             FROM sessions ORDER BY start_time", &[])
    }

    /// Sessions whose start time falls in `[start_ms, end_ms)`.
    pub fn sessions_between(&self, start_ms: i64, end_ms: i64) -> Result<Vec<ScheduledSession>> {
        self.query_sessions(
            "SELECT id, subject_id, start_time, end_time, duration_minutes
             FROM sessions WHERE start_time >= ?1 AND start_time < ?2 ORDER BY start_time",
            &[&start_ms, &end_ms],
        )
    }

    fn query_sessions(
        &self,
        sql: &str,
        params: &[&dyn rusqlite::ToSql],
    ) -> Result<Vec<ScheduledSession>> {
        let mut stmt = self.conn.prepare(sql).map_err(DatabaseError::from)?;
        let rows = stmt
            .query_map(params, |row| {
                Ok(ScheduledSession {
                    id: row.get(0)?,
                    subject_id: row.get(1)?,
                    start_time: row.get(2)?,
                    end_time: row.get(3)?,
                    duration_minutes: row.get(4)?,
                })
            })
            .map_err(DatabaseError::from)?;
        let mut sessions = Vec::new();
        for row in rows {
            sessions.push(row.map_err(DatabaseError::from)?);
        }
        Ok(sessions)
    }

    pub fn remove_session(&self, id: &str) -> Result<()> {
        let n = self
            .conn
            .execute("DELETE FROM sessions WHERE id = ?1", params![id])
            .map_err(DatabaseError::from)?;
        if n == 0 {
            return Err(DatabaseError::NotFound(format!("session {id}")).into());
        }
        Ok(())
    }

    // ── Progress & leaderboard ───────────────────────────────────────

    pub fn progress(&self) -> Result<UserProgress> {
        let row = self
            .conn
            .query_row(
                "SELECT xp, level, streak, total_minutes, last_login
                 FROM users WHERE id = ?1",
                params![LOCAL_USER_ID],
                |row| {
                    Ok((
                        row.get::<_, u64>(0)?,
                        row.get::<_, u32>(1)?,
                        row.get::<_, u32>(2)?,
                        row.get::<_, u64>(3)?,
                        row.get::<_, Option<String>>(4)?,
                    ))
                },
            )
            .map_err(DatabaseError::from)?;
        let (xp, level, streak, total_minutes, last_login) = row;
        let last_login = match last_login {
            Some(s) => Some(parse_timestamp(&s)?),
            None => None,
        };
        Ok(UserProgress {
            xp,
            level,
            streak,
            total_minutes,
            last_login,
        })
    }

    pub fn set_display_name(&self, name: &str) -> Result<()> {
        self.conn
            .execute(
                "UPDATE users SET display_name = ?1 WHERE id = ?2",
                params![name, LOCAL_USER_ID],
            )
            .map_err(DatabaseError::from)?;
        Ok(())
    }

    /// Insert or update a leaderboard user. The local user is created
    /// automatically; this is for imported peers.
    pub fn upsert_user(&self, id: &str, display_name: &str, xp: u64) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO users (id, display_name, xp, level) VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(id) DO UPDATE SET
                    display_name = excluded.display_name,
                    xp = excluded.xp,
                    level = excluded.level",
                params![id, display_name, xp, level_for_xp(xp)],
            )
            .map_err(DatabaseError::from)?;
        Ok(())
    }

    /// Top users ordered by XP.
    pub fn leaderboard(&self, limit: u32) -> Result<Vec<LeaderboardEntry>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, display_name, xp, level FROM users ORDER BY xp DESC LIMIT ?1")
            .map_err(DatabaseError::from)?;
        let rows = stmt
            .query_map(params![limit], |row| {
                Ok(LeaderboardEntry {
                    id: row.get(0)?,
                    display_name: row.get(1)?,
                    xp: row.get(2)?,
                    level: row.get(3)?,
                })
            })
            .map_err(DatabaseError::from)?;
        let mut entries = Vec::new();
        for row in rows {
            entries.push(row.map_err(DatabaseError::from)?);
        }
        Ok(entries)
    }

    // ── Stats ────────────────────────────────────────────────────────

    pub fn stats_today(&self) -> Result<DailyStat> {
        let today = Utc::now().date_naive();
        let row = self
            .conn
            .query_row(
                "SELECT minutes, xp FROM daily_stats WHERE date = ?1",
                params![format_date(today)],
                |row| Ok((row.get::<_, u64>(0)?, row.get::<_, u64>(1)?)),
            )
            .optional()
            .map_err(DatabaseError::from)?;
        let (minutes, xp) = row.unwrap_or((0, 0));
        Ok(DailyStat {
            date: today,
            minutes,
            xp,
        })
    }

    /// Buckets for the last seven calendar days (today included),
    /// oldest first. Days without activity are absent.
    pub fn stats_week(&self) -> Result<WeeklyReport> {
        let since = Utc::now()
            .date_naive()
            .checked_sub_days(Days::new(6))
            .unwrap_or(Utc::now().date_naive());
        let mut stmt = self
            .conn
            .prepare(
                "SELECT date, minutes, xp FROM daily_stats
                 WHERE date >= ?1 ORDER BY date",
            )
            .map_err(DatabaseError::from)?;
        let rows = stmt
            .query_map(params![format_date(since)], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, u64>(1)?,
                    row.get::<_, u64>(2)?,
                ))
            })
            .map_err(DatabaseError::from)?;

        let mut days = Vec::new();
        for row in rows {
            let (date, minutes, xp) = row.map_err(DatabaseError::from)?;
            let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
                .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
            days.push(DailyStat { date, minutes, xp });
        }
        Ok(WeeklyReport { days })
    }

    // ── Key-value slot ───────────────────────────────────────────────

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>> {
        let result = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional()
            .map_err(DatabaseError::from)?;
        Ok(result)
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<()> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
                params![key, value],
            )
            .map_err(DatabaseError::from)?;
        Ok(())
    }
}

impl ProgressSink for Database {
    fn apply_reward(&self, minutes: u64, xp: u64) -> Result<()> {
        let progress = self.progress()?;
        let new_xp = progress.xp + xp;
        self.conn
            .execute(
                "UPDATE users SET xp = ?1, level = ?2, total_minutes = total_minutes + ?3
                 WHERE id = ?4",
                params![new_xp, level_for_xp(new_xp), minutes, LOCAL_USER_ID],
            )
            .map_err(DatabaseError::from)?;
        self.conn
            .execute(
                "INSERT INTO daily_stats (date, minutes, xp) VALUES (?1, ?2, ?3)
                 ON CONFLICT(date) DO UPDATE SET
                    minutes = minutes + excluded.minutes,
                    xp = xp + excluded.xp",
                params![format_date(Utc::now().date_naive()), minutes, xp],
            )
            .map_err(DatabaseError::from)?;
        Ok(())
    }

    fn apply_streak(&self, streak: u32, at: DateTime<Utc>) -> Result<()> {
        self.conn
            .execute(
                "UPDATE users SET streak = ?1, last_login = ?2 WHERE id = ?3",
                params![streak, at.to_rfc3339(), LOCAL_USER_ID],
            )
            .map_err(DatabaseError::from)?;
        Ok(())
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DatabaseError::QueryFailed(format!("bad timestamp '{s}': {e}")).into())
}
