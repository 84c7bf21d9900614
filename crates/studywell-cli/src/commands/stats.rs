use clap::Subcommand;
use studywell_core::storage::Database;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Today's focus minutes and XP
    Today,
    /// Last seven days, oldest first
    Week,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        StatsAction::Today => {
            let stats = db.stats_today()?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        StatsAction::Week => {
            let report = db.stats_week()?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}
