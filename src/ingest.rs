//! Match telemetry ingestion.
//!
//! Loads match records from JSON exports on disk, plus the built-in
//! sample match the demo surfaces serve.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};
use tracing::{info, warn};

use crate::models::{MatchRecord, PlayerAggregate, PlayerRoundState, RoundRecord, TeamSide};

/// Outcome of one ingestion pass over a directory.
#[derive(Debug, Default)]
pub struct IngestReport {
    pub matches_loaded: usize,
    pub files_skipped: usize,
    pub errors: Vec<String>,
}

/// Read a single match record from a JSON export.
pub fn read_match_file(path: impl AsRef<Path>) -> Result<MatchRecord> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read match file {}", path.display()))?;
    let record: MatchRecord = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse match file {}", path.display()))?;
    Ok(record)
}

/// Load every `.json` match record in a directory.
///
/// Unreadable files are reported and skipped, so one bad export never
/// blocks the rest of a batch.
pub fn read_match_dir(dir: impl AsRef<Path>) -> Result<(Vec<MatchRecord>, IngestReport)> {
    let dir = dir.as_ref();
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read match directory {}", dir.display()))?;

    let mut paths: Vec<_> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    // Batch order is part of the output, keep it stable
    paths.sort();

    let mut matches = Vec::new();
    let mut report = IngestReport::default();
    for path in paths {
        match read_match_file(&path) {
            Ok(record) => {
                info!(match_id = %record.match_id, file = %path.display(), "loaded match");
                matches.push(record);
                report.matches_loaded += 1;
            }
            Err(e) => {
                warn!(file = %path.display(), "skipping unreadable match: {e:#}");
                report.files_skipped += 1;
                report.errors.push(format!("{}: {e:#}", path.display()));
            }
        }
    }

    Ok((matches, report))
}

fn state(
    name: &str,
    side: TeamSide,
    kills: u32,
    deaths: u32,
    assists: u32,
    alive: bool,
    loadout: u32,
) -> PlayerRoundState {
    PlayerRoundState::new(name, side)
        .with_combat(kills, deaths, assists)
        .with_alive(alive)
        .with_loadout(loadout)
}

/// A complete 3v3 sample match with full round history.
///
/// Eight rounds covering every category, including two bonus rounds
/// thrown away after won force buys, so the snowball insight fires for
/// Vanguard out of the box.
pub fn sample_match() -> MatchRecord {
    use TeamSide::{Attack, Defense};

    let mut record = MatchRecord::new("sample-ascent-001", "Vanguard", "Borealis")
        .with_map("Ascent")
        .with_score(5, 3)
        .with_total_rounds(8)
        .with_player(
            PlayerAggregate::new("Vexa", "Vanguard")
                .with_agent("Jett")
                .with_combat(9, 4, 1)
                .with_damage(1840)
                .with_headshots(9)
                .with_shots_fired(120),
        )
        .with_player(
            PlayerAggregate::new("Rook", "Vanguard")
                .with_agent("Omen")
                .with_combat(5, 6, 5)
                .with_damage(960)
                .with_headshots(3),
        )
        .with_player(
            PlayerAggregate::new("Saber", "Vanguard")
                .with_agent("Sova")
                .with_combat(4, 4, 4)
                .with_damage(810)
                .with_headshots(2),
        )
        .with_player(
            PlayerAggregate::new("Lumen", "Borealis")
                .with_agent("Sage")
                .with_combat(2, 5, 4)
                .with_damage(540)
                .with_headshots(1),
        )
        .with_player(
            PlayerAggregate::new("Drift", "Borealis")
                .with_agent("Raze")
                .with_combat(8, 8, 0)
                .with_damage(1510)
                .with_headshots(6),
        )
        .with_player(
            PlayerAggregate::new("Onyx", "Borealis")
                .with_agent("Killjoy")
                .with_combat(4, 5, 1)
                .with_damage(935)
                .with_headshots(3),
        )
        // R1: pistol, Vanguard convert
        .with_round(
            RoundRecord::new(1, "Vanguard", "Borealis", "Vanguard")
                .with_category("PISTOL")
                .with_first_blood("Vexa", "Lumen")
                .with_player(state("Vexa", Attack, 2, 0, 0, true, 800))
                .with_player(state("Rook", Attack, 1, 1, 1, false, 800))
                .with_player(state("Saber", Attack, 0, 0, 1, true, 850))
                .with_player(state("Lumen", Defense, 0, 1, 0, false, 800))
                .with_player(state("Drift", Defense, 1, 1, 0, false, 850))
                .with_player(state("Onyx", Defense, 0, 1, 0, false, 800)),
        )
        // R2: Vanguard force beats the Borealis eco
        .with_round(
            RoundRecord::new(2, "Vanguard", "Borealis", "Vanguard")
                .with_player(state("Vexa", Attack, 1, 0, 1, true, 4500))
                .with_player(state("Rook", Attack, 1, 1, 0, false, 4600))
                .with_player(state("Saber", Attack, 1, 0, 0, true, 4400))
                .with_player(state("Lumen", Defense, 0, 1, 1, false, 1800))
                .with_player(state("Drift", Defense, 1, 1, 0, false, 1800))
                .with_player(state("Onyx", Defense, 0, 1, 0, false, 1800)),
        )
        // R3: bonus off the force win, thrown away
        .with_round(
            RoundRecord::new(3, "Vanguard", "Borealis", "Borealis")
                .with_category("BONUS")
                .with_first_blood("Drift", "Rook")
                .with_player(state("Vexa", Attack, 1, 1, 0, false, 5300))
                .with_player(state("Rook", Attack, 0, 1, 0, false, 5300))
                .with_player(state("Saber", Attack, 0, 1, 1, false, 5300))
                .with_player(state("Lumen", Defense, 1, 0, 1, true, 4000))
                .with_player(state("Drift", Defense, 1, 1, 0, false, 4000))
                .with_player(state("Onyx", Defense, 1, 0, 0, true, 4000)),
        )
        // R4: broke after the lost bonus, eco rolled by the full buy
        .with_round(
            RoundRecord::new(4, "Vanguard", "Borealis", "Borealis")
                .with_player(state("Vexa", Attack, 0, 1, 0, false, 2700))
                .with_player(state("Rook", Attack, 1, 1, 0, false, 2700))
                .with_player(state("Saber", Attack, 0, 1, 0, false, 2700))
                .with_player(state("Lumen", Defense, 0, 0, 1, true, 6800))
                .with_player(state("Drift", Defense, 2, 1, 0, false, 6800))
                .with_player(state("Onyx", Defense, 1, 0, 0, true, 6800)),
        )
        // R5: second force win against a full buy
        .with_round(
            RoundRecord::new(5, "Vanguard", "Borealis", "Vanguard")
                .with_first_blood("Vexa", "Onyx")
                .with_player(state("Vexa", Attack, 2, 0, 0, true, 4100))
                .with_player(state("Rook", Attack, 0, 1, 1, false, 4100))
                .with_player(state("Saber", Attack, 1, 0, 0, true, 4100))
                .with_player(state("Lumen", Defense, 0, 1, 0, false, 7000))
                .with_player(state("Drift", Defense, 1, 1, 0, false, 7000))
                .with_player(state("Onyx", Defense, 0, 1, 0, false, 7000)),
        )
        // R6: second bonus, also thrown away
        .with_round(
            RoundRecord::new(6, "Vanguard", "Borealis", "Borealis")
                .with_category("BONUS")
                .with_player(state("Vexa", Attack, 1, 1, 0, false, 4800))
                .with_player(state("Rook", Attack, 0, 1, 0, false, 4800))
                .with_player(state("Saber", Attack, 0, 1, 1, false, 4800))
                .with_player(state("Lumen", Defense, 1, 0, 0, true, 7200))
                .with_player(state("Drift", Defense, 1, 1, 0, false, 7200))
                .with_player(state("Onyx", Defense, 1, 0, 1, true, 7200)),
        )
        // R7: full buys on both sides
        .with_round(
            RoundRecord::new(7, "Vanguard", "Borealis", "Vanguard")
                .with_first_blood("Rook", "Drift")
                .with_player(state("Vexa", Attack, 0, 1, 0, false, 6700))
                .with_player(state("Rook", Attack, 2, 0, 1, true, 6700))
                .with_player(state("Saber", Attack, 1, 0, 1, true, 6700))
                .with_player(state("Lumen", Defense, 0, 1, 1, false, 7300))
                .with_player(state("Drift", Defense, 1, 1, 0, false, 7300))
                .with_player(state("Onyx", Defense, 0, 1, 0, false, 7300)),
        )
        // R8: Borealis broke, Vanguard close it out
        .with_round(
            RoundRecord::new(8, "Vanguard", "Borealis", "Vanguard")
                .with_player(state("Vexa", Attack, 2, 0, 0, true, 7000))
                .with_player(state("Rook", Attack, 0, 0, 2, true, 7000))
                .with_player(state("Saber", Attack, 1, 1, 0, false, 7000))
                .with_player(state("Lumen", Defense, 0, 1, 0, false, 2900))
                .with_player(state("Drift", Defense, 0, 1, 0, false, 2900))
                .with_player(state("Onyx", Defense, 1, 1, 0, false, 2900)),
        );

    if let Some(played_at) = Utc.with_ymd_and_hms(2026, 3, 14, 18, 30, 0).single() {
        record = record.with_played_at(played_at);
    }
    record
}
