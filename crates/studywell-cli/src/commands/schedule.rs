use chrono::{Local, NaiveTime, TimeZone, Utc};
use clap::Subcommand;
use studywell_core::storage::Database;
use studywell_core::{find_active_slot, Event};

#[derive(Subcommand)]
pub enum ScheduleAction {
    /// Schedule a session on today's timeline
    Add {
        /// Subject id
        subject: String,
        /// Start time as HH:MM (local)
        start: String,
        /// Session length in minutes
        #[arg(long, default_value_t = 60)]
        minutes: i64,
    },
    /// List scheduled sessions as JSON
    List {
        /// Include sessions from other days
        #[arg(long)]
        all: bool,
    },
    /// Remove a scheduled session
    Remove { id: String },
    /// Print the slot matching the current hour, or null
    Current,
}

pub fn run(action: ScheduleAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        ScheduleAction::Add {
            subject,
            start,
            minutes,
        } => {
            let time = NaiveTime::parse_from_str(&start, "%H:%M")
                .map_err(|e| format!("invalid start time '{start}': {e}"))?;
            let start_local = Local::now()
                .date_naive()
                .and_time(time);
            let start_ms = Local
                .from_local_datetime(&start_local)
                .single()
                .ok_or("ambiguous local time")?
                .timestamp_millis();
            let end_ms = start_ms + minutes * 60_000;
            let session = db.add_session(&subject, start_ms, end_ms)?;
            println!("{}", serde_json::to_string_pretty(&session)?);
        }
        ScheduleAction::List { all } => {
            let sessions = if all {
                db.sessions()?
            } else {
                let day_start = Local::now()
                    .with_time(NaiveTime::MIN)
                    .single()
                    .ok_or("ambiguous local midnight")?;
                let day_end = day_start + chrono::Duration::days(1);
                db.sessions_between(day_start.timestamp_millis(), day_end.timestamp_millis())?
            };
            println!("{}", serde_json::to_string_pretty(&sessions)?);
        }
        ScheduleAction::Remove { id } => {
            db.remove_session(&id)?;
            let event = Event::SessionRemoved { id, at: Utc::now() };
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        ScheduleAction::Current => {
            let sessions = db.sessions()?;
            let subjects = db.subjects()?;
            let now = Local::now();
            let slot = find_active_slot(&sessions, &subjects, &now);
            println!("{}", serde_json::to_string_pretty(&slot)?);
        }
    }
    Ok(())
}
