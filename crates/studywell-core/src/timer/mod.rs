//! Focus timer state machine.

mod engine;

pub use engine::{FocusTimer, TimerPhase};
