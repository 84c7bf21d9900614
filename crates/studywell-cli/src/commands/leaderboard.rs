use studywell_core::storage::Database;

pub fn run(limit: u32) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let entries = db.leaderboard(limit)?;
    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(())
}
