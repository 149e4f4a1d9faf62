// Roster pass entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file)
// 2. Copy missing config files from defaults/, then load config
// 3. Load the league snapshot (and the trade file, if any)
// 4. Run the roster pass
// 5. Write the updated snapshot and print the report

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use rostercraft_app::{load_league, run_pass, TradeRequest};
use rostercraft_core::config;

#[derive(Parser)]
#[command(name = "rostercraft")]
#[command(about = "Enforce roster bounds, sort depth charts and value trades for a league")]
struct Cli {
    /// League snapshot (JSON)
    league: PathBuf,

    /// Directory holding config/ and defaults/
    #[arg(long, default_value = ".")]
    base: PathBuf,

    /// Trade proposal to evaluate (JSON)
    #[arg(long)]
    trade: Option<PathBuf>,

    /// Where to write the updated snapshot; defaults to overwriting the input
    #[arg(long)]
    out: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing()?;
    info!("rostercraft starting up");

    let copied = config::ensure_config_files(&cli.base).context("failed to initialize config")?;
    for path in &copied {
        info!("Copied default config to {}", path.display());
    }
    let config = config::load_config_from(&cli.base).context("failed to load configuration")?;
    info!(
        "Config loaded: league={}, sport={}, roster {}-{}",
        config.league.name,
        config.league.sport,
        config.league.rules.min_roster,
        config.league.rules.max_roster
    );

    let store = load_league(&cli.league, &config)
        .with_context(|| format!("failed to load league snapshot {}", cli.league.display()))?;
    let trade = cli
        .trade
        .as_deref()
        .map(TradeRequest::load)
        .transpose()
        .context("failed to load trade proposal")?;

    let report = run_pass(&store, &config, trade.as_ref())
        .await
        .context("roster pass failed")?;

    let out = cli.out.unwrap_or_else(|| cli.league.clone());
    store
        .save(&out)
        .with_context(|| format!("failed to write league snapshot {}", out.display()))?;
    info!("Snapshot written to {}", out.display());

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{report}");
    }
    Ok(())
}

/// Initialize tracing to log to a file so the report on stdout stays clean.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("rostercraft.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("rostercraft=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
