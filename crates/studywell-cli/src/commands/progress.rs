use chrono::Utc;
use clap::Subcommand;
use studywell_core::storage::Database;
use studywell_core::{compute_streak, Config, Event, ProgressSink};

#[derive(Subcommand)]
pub enum ProgressAction {
    /// Record a login and re-evaluate the daily streak
    Login,
    /// Print XP, level, streak and focus totals as JSON
    Show,
}

pub fn run(action: ProgressAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        ProgressAction::Login => {
            let config = Config::load()?;
            db.set_display_name(&config.display_name)?;

            let progress = db.progress()?;
            let now = Utc::now();
            let streak = compute_streak(progress.last_login, progress.streak, now);
            // Fire-and-forget persistence: log and move on.
            if let Err(e) = db.apply_streak(streak, now) {
                eprintln!("warning: failed to persist streak: {e}");
            }
            let event = Event::StreakUpdated { streak, at: now };
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        ProgressAction::Show => {
            let progress = db.progress()?;
            println!("{}", serde_json::to_string_pretty(&progress)?);
        }
    }
    Ok(())
}
