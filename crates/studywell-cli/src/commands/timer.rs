use chrono::{Local, NaiveTime, Utc};
use clap::Subcommand;
use studywell_core::storage::Database;
use studywell_core::{
    compute_reward, find_active_slot, Config, Event, FocusTimer, NotificationTracker,
    ProgressSink, ScheduledSession,
};

/// kv slot holding the serialized timer state.
const TIMER_KEY: &str = "focus_timer";
/// kv slot holding the epoch second the timer was last saved at. Used to
/// replay ticks that elapsed between CLI invocations.
const TIMER_STAMP_KEY: &str = "focus_timer_saved_at";

/// Session id used when no scheduled slot matches the current hour.
const FREE_STUDY_ID: &str = "free-study";

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start a focus session. Defaults to the slot scheduled for the
    /// current hour, falling back to a free study session.
    Start {
        /// Timeline session id to run against
        #[arg(long)]
        session: Option<String>,
        /// Session length in minutes (overrides configured defaults)
        #[arg(long)]
        minutes: Option<u64>,
    },
    /// Pause the countdown
    Pause,
    /// Resume a paused countdown
    Resume,
    /// Stop and discard the remaining time (no reward)
    Stop,
    /// Return to idle after a completed session's reward is claimed
    Reset,
    /// Print current timer state as JSON
    Status,
    /// Run the countdown in the foreground, emitting due-session
    /// notifications once per minute, until the session completes
    Watch,
}

fn load_timer(db: &Database) -> FocusTimer {
    if let Ok(Some(json)) = db.kv_get(TIMER_KEY) {
        if let Ok(timer) = serde_json::from_str::<FocusTimer>(&json) {
            return timer;
        }
    }
    FocusTimer::new()
}

fn save_timer(db: &Database, timer: &FocusTimer) -> Result<(), Box<dyn std::error::Error>> {
    db.kv_set(TIMER_KEY, &serde_json::to_string(timer)?)?;
    db.kv_set(TIMER_STAMP_KEY, &Utc::now().timestamp().to_string())?;
    Ok(())
}

/// Catch the countdown up with wall-clock time elapsed since the last save.
/// Returns the completion event if the session ran out in the meantime.
fn replay_missed_ticks(db: &Database, timer: &mut FocusTimer) -> Option<Event> {
    let saved_at: i64 = db.kv_get(TIMER_STAMP_KEY).ok().flatten()?.parse().ok()?;
    replay_ticks(timer, saved_at, Utc::now().timestamp())
}

/// Replay one tick per second elapsed between `saved_at` and `now`
/// (epoch seconds). A stamp from the future replays nothing. The
/// completion event fires at most once: the final tick emits it and the
/// timer stops running.
fn replay_ticks(timer: &mut FocusTimer, saved_at: i64, now: i64) -> Option<Event> {
    if !timer.is_running() {
        return None;
    }
    let elapsed = (now - saved_at).max(0) as u64;
    for _ in 0..elapsed.min(timer.time_left_secs()) {
        if let Some(event) = timer.tick() {
            return Some(event);
        }
    }
    None
}

/// Turn a completion event into a persisted reward.
///
/// Persistence is fire-and-forget: a failed write is logged and swallowed,
/// not retried, and nothing is rolled back.
fn grant_reward(db: &Database, event: &Event) -> Result<(), Box<dyn std::error::Error>> {
    let Event::TimerCompleted { focus_secs, .. } = event else {
        return Ok(());
    };
    let reward = compute_reward(*focus_secs);
    if let Err(e) = db.apply_reward(reward.minutes, reward.xp) {
        eprintln!("warning: failed to persist reward: {e}");
    }
    let granted = Event::RewardGranted {
        minutes: reward.minutes,
        xp: reward.xp,
        at: Utc::now(),
    };
    println!("{}", serde_json::to_string_pretty(&granted)?);
    Ok(())
}

fn today_sessions(db: &Database) -> Result<Vec<ScheduledSession>, Box<dyn std::error::Error>> {
    let now = Local::now();
    let day_start = now
        .with_time(NaiveTime::MIN)
        .single()
        .ok_or("ambiguous local midnight")?;
    let day_end = day_start + chrono::Duration::days(1);
    Ok(db.sessions_between(day_start.timestamp_millis(), day_end.timestamp_millis())?)
}

fn finish_replay(db: &Database, timer: &mut FocusTimer) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(event) = replay_missed_ticks(db, timer) {
        println!("{}", serde_json::to_string_pretty(&event)?);
        grant_reward(db, &event)?;
    }
    Ok(())
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut timer = load_timer(&db);
    finish_replay(&db, &mut timer)?;

    match action {
        TimerAction::Start { session, minutes } => {
            let config = Config::load()?;
            let (session_id, duration_secs) = match session {
                Some(id) => (
                    id,
                    minutes.unwrap_or(config.timer.scheduled_session_minutes) * 60,
                ),
                None => {
                    // Timer pre-fill: consult the matcher for the slot
                    // scheduled in the current hour.
                    let sessions = today_sessions(&db)?;
                    let subjects = db.subjects()?;
                    let now = Local::now();
                    match find_active_slot(&sessions, &subjects, &now) {
                        Some(slot) => (
                            slot.session_id,
                            minutes.unwrap_or(config.timer.scheduled_session_minutes) * 60,
                        ),
                        None => (
                            FREE_STUDY_ID.to_string(),
                            minutes.unwrap_or(config.timer.free_study_minutes) * 60,
                        ),
                    }
                }
            };
            match timer.start(&session_id, duration_secs) {
                Some(event) => println!("{}", serde_json::to_string_pretty(&event)?),
                // Already running for this session: report state unchanged.
                None => println!("{}", serde_json::to_string_pretty(&timer.snapshot())?),
            }
        }
        TimerAction::Pause => match timer.pause() {
            Some(event) => println!("{}", serde_json::to_string_pretty(&event)?),
            None => println!("{}", serde_json::to_string_pretty(&timer.snapshot())?),
        },
        TimerAction::Resume => match timer.resume() {
            Some(event) => println!("{}", serde_json::to_string_pretty(&event)?),
            None => println!("{}", serde_json::to_string_pretty(&timer.snapshot())?),
        },
        TimerAction::Stop => {
            if let Some(event) = timer.stop() {
                println!("{}", serde_json::to_string_pretty(&event)?);
            }
        }
        TimerAction::Reset => {
            if let Some(event) = timer.reset() {
                println!("{}", serde_json::to_string_pretty(&event)?);
            }
        }
        TimerAction::Status => {
            println!("{}", serde_json::to_string_pretty(&timer.snapshot())?);
        }
        TimerAction::Watch => {
            save_timer(&db, &timer)?;
            watch(&db, &mut timer)?;
        }
    }

    save_timer(&db, &timer)?;
    Ok(())
}

/// Foreground loop mirroring the dashboard's two cadences: a one-second
/// tick while the timer runs, and a once-per-minute schedule poll that
/// surfaces each due session at most once per process.
fn watch(db: &Database, timer: &mut FocusTimer) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let mut tracker = NotificationTracker::new();
    let mut seconds: u64 = 0;

    loop {
        if config.notifications.enabled && seconds % 60 == 0 {
            let sessions = today_sessions(db)?;
            let subjects = db.subjects()?;
            let now = Local::now();
            if let Some(slot) = tracker.check(&sessions, &subjects, &now) {
                let due = Event::SessionDue {
                    session_id: slot.session_id,
                    subject_name: slot.subject_name,
                    subject_color: slot.subject_color,
                    at: Utc::now(),
                };
                println!("{}", serde_json::to_string_pretty(&due)?);
            }
        }

        if timer.is_running() {
            if let Some(event) = timer.tick() {
                println!("{}", serde_json::to_string_pretty(&event)?);
                grant_reward(db, &event)?;
                save_timer(db, timer)?;
                return Ok(());
            }
            save_timer(db, timer)?;
        }

        std::thread::sleep(std::time::Duration::from_secs(1));
        seconds += 1;
    }
}
