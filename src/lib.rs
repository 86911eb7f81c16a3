//! # Tacscope
//!
//! A statistics derivation engine for round-based tactical shooter
//! telemetry. Takes one match payload, produces combat scores, KAST
//! impact analysis, and team economy patterns, with graceful fallback
//! to estimation when round-by-round history is missing.
//!
//! ## Architecture
//!
//! - **models**: Match telemetry inputs and derived stat outputs
//! - **engine**: The derivation core (combat, KAST, economy, estimation)
//! - **ingest**: Match payload file loading and the built-in sample match
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod config;
pub mod engine;
pub mod ingest;
pub mod models;

pub use engine::{InvalidMatchData, StatsEngine};
pub use models::*;
