use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tacscope::api::state::AppState;
use tacscope::config::AppConfig;
use tacscope::engine::StatsEngine;
use tacscope::ingest;
use tacscope::models::{MatchRecord, MatchStatsBundle};

#[derive(Parser)]
#[command(name = "tacscope")]
#[command(about = "Statistics derivation engine for round-based shooter telemetry")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: String,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address; overrides the config file
        #[arg(long)]
        host: Option<String>,

        /// Port number; overrides the config file
        #[arg(long)]
        port: Option<u16>,
    },

    /// Analyze a match payload from a JSON file
    Analyze {
        /// Path to the match payload
        file: PathBuf,

        /// Only report economy for this team
        #[arg(long)]
        team: Option<String>,

        /// Print the raw stats bundle as JSON
        #[arg(long)]
        json: bool,
    },

    /// Analyze the built-in sample match
    Sample {
        /// Print the raw stats bundle as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = PathBuf::from(&cli.config);
    let config = if config_path.exists() {
        AppConfig::from_file(&config_path)?
    } else {
        AppConfig::default()
    };

    // Initialize tracing
    let log_level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Starting tacscope v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);

            let state = AppState {
                engine: Arc::new(StatsEngine::new(config.engine.clone())),
            };
            let app = tacscope::api::build_router(state);
            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Analyze { file, team, json } => {
            let record = ingest::read_match_file(&file)?;
            let engine = StatsEngine::new(config.engine.clone());
            let bundle = engine.process_match_stats(&record)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&bundle)?);
            } else {
                print_report(&record, &bundle, team.as_deref());
            }
        }
        Commands::Sample { json } => {
            let record = ingest::sample_match();
            let engine = StatsEngine::new(config.engine.clone());
            let bundle = engine.process_match_stats(&record)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&bundle)?);
            } else {
                print_report(&record, &bundle, None);
            }
        }
    }

    Ok(())
}

/// Print a human-readable match report.
fn print_report(record: &MatchRecord, bundle: &MatchStatsBundle, team: Option<&str>) {
    println!("\n=== Match Report: {} ===", bundle.match_id);
    if let Some(map) = &record.map_name {
        println!("Map:    {}", map);
    }
    println!(
        "Score:  {} {} - {} {}",
        record.team_one, record.team_one_score, record.team_two_score, record.team_two
    );
    println!("Digest: {}", bundle.source_digest);

    println!("\n=== Combat Scores ===");
    for stat in bundle.player_stats.values() {
        println!(
            "  {:<16} {:<10} ACS {:>6.1}  ADR {:>6.1}  HS {:>5.1}%",
            stat.player_name,
            stat.agent.as_deref().unwrap_or("-"),
            stat.acs,
            stat.adr,
            stat.headshot_percentage
        );
    }

    println!("\n=== KAST Impact ===");
    for stat in &bundle.kast_impact {
        println!(
            "  {:<16} KAST {:>5.1}%  loss without {:>5.1}%  win with {:>5.1}%",
            stat.player_name,
            stat.kast_percentage,
            stat.loss_rate_without_kast,
            stat.win_rate_with_kast
        );
        println!("    {}", stat.insight);
    }

    println!("\n=== Economy Patterns ===");
    let mut shown = 0;
    for (name, stat) in &bundle.economy {
        if team.is_some_and(|t| t != name) {
            continue;
        }
        shown += 1;
        println!("  {} ({} rounds)", name, stat.total_rounds);
        println!(
            "    Pistol {:>5.1}%  Force {:>5.1}%  Eco {:>5.1}%  Bonus loss {:>5.1}%  Full buy {:>5.1}%",
            stat.pistol_win_rate,
            stat.force_buy_win_rate,
            stat.eco_conversion_rate,
            stat.bonus_loss_rate,
            stat.full_buy_win_rate
        );
        for insight in &stat.insights {
            println!("    - {}", insight);
        }
    }
    if shown == 0 {
        if let Some(t) = team {
            println!("  (no economy data for team \"{}\")", t);
        }
    }

    if !bundle.round_totals.is_empty() {
        println!("\n=== Round Ledger ===");
        for (name, totals) in &bundle.round_totals {
            println!(
                "  {:<16} K/D/A {:>2}/{:>2}/{:>2}  first bloods {:>2}  first deaths {:>2}",
                name,
                totals.kills,
                totals.deaths,
                totals.assists,
                totals.first_bloods,
                totals.first_deaths
            );
        }
    }
}
