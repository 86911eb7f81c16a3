//! Core data models: match telemetry inputs and derived statistics.

mod match_record;
mod player;
mod round;
mod stats;

pub use match_record::*;
pub use player::*;
pub use round::*;
pub use stats::*;
