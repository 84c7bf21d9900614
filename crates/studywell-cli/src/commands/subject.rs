use chrono::Utc;
use clap::Subcommand;
use studywell_core::storage::Database;
use studywell_core::{Event, SUBJECT_COLORS};

#[derive(Subcommand)]
pub enum SubjectAction {
    /// Create a subject
    Add {
        /// Subject name, e.g. "Linear Algebra"
        name: String,
        /// Tag color as a #rrggbb hex code; defaults to the next
        /// palette color
        #[arg(long)]
        color: Option<String>,
    },
    /// List subjects as JSON
    List,
    /// Delete a subject (scheduled sessions are kept)
    Remove { id: String },
    /// Print the color palette
    Colors,
}

pub fn run(action: SubjectAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        SubjectAction::Add { name, color } => {
            let color = match color {
                Some(c) => c,
                None => {
                    // Cycle through the palette as subjects are added.
                    let index = db.subjects()?.len() % SUBJECT_COLORS.len();
                    SUBJECT_COLORS[index].1.to_string()
                }
            };
            let subject = db.add_subject(&name, &color)?;
            println!("{}", serde_json::to_string_pretty(&subject)?);
        }
        SubjectAction::List => {
            let subjects = db.subjects()?;
            println!("{}", serde_json::to_string_pretty(&subjects)?);
        }
        SubjectAction::Remove { id } => {
            db.remove_subject(&id)?;
            let event = Event::SubjectRemoved { id, at: Utc::now() };
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        SubjectAction::Colors => {
            for (name, value) in SUBJECT_COLORS {
                println!("{name}\t{value}");
            }
        }
    }
    Ok(())
}
