mod input;
mod telemetry;

use std::{
    fs,
    io::{stdout, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::Parser;
use plan_selection::{recommend_from, RecommendationRequest, Settings, WeightVector};

use crate::input::JsonLines;

#[derive(Parser, Debug)]
#[command(
    name = "plan-ranker",
    about = "Rank insurance plans read as JSON lines and print the recommendations as JSON",
    version
)]
struct Cli {
    /// JSON-lines file of plans (reads stdin when omitted)
    #[arg(long, short)]
    input: Option<PathBuf>,
    /// Number of recommendations to return
    #[arg(long, env = "PLAN_RANKER_TOP_N")]
    top_n: Option<usize>,
    /// Criterion weights, e.g. cost=0.3,coverage=0.25,service=0.25,reliability=0.2
    #[arg(long, env = "PLAN_RANKER_WEIGHTS")]
    weights: Option<WeightVector>,
    /// Upper bound on the number of recommendations
    #[arg(long)]
    max_top_n: Option<usize>,
    /// JSON settings file (default_top_n, max_top_n, weights)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Log filter used when RUST_LOG is not set
    #[arg(long, env = "PLAN_RANKER_LOG_LEVEL", default_value = "info")]
    log_level: String,
    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    telemetry::init(&cli.log_level)?;

    let settings = settings(&cli)?;
    let request = RecommendationRequest {
        top_n: cli.top_n,
        weights: cli.weights,
    };
    let source = JsonLines::new(cli.input.clone());
    let recommendation =
        recommend_from(&source, &request, &settings).context("failed to rank plans")?;

    let mut out = stdout().lock();
    if cli.pretty {
        serde_json::to_writer_pretty(&mut out, &recommendation)?;
    } else {
        serde_json::to_writer(&mut out, &recommendation)?;
    }
    writeln!(out)?;
    Ok(())
}

fn settings(cli: &Cli) -> anyhow::Result<Settings> {
    let mut settings = match &cli.config {
        Some(path) => load_settings(path)?,
        None => Settings::default(),
    };
    if let Some(max_top_n) = cli.max_top_n {
        settings.max_top_n = max_top_n;
    }
    Ok(settings)
}

fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("invalid settings in {}", path.display()))
}
