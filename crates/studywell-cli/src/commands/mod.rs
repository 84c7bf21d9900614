pub mod config;
pub mod leaderboard;
pub mod progress;
pub mod schedule;
pub mod stats;
pub mod subject;
pub mod timer;
