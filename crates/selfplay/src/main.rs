//! Self-play CLI
//!
//! Plays the greedy family of engines against each other and prints or saves
//! a match report.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chess_core::{Agent, Color, Engine, Position};
use clap::{Parser, Subcommand, ValueEnum};
use greedy_engine::{AgentFactory, ExplorationConfig, ExplorationEngine, GreedyEngine};
use rand::rngs::StdRng;
use rand::SeedableRng;
use random_engine::{RandomAgent, RandomEngine};
use selfplay::{MatchConfig, MatchReport, MatchRunner, ReportSettings};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "selfplay", about = "Engine-vs-engine matches for the greedy rollout engine")]
struct Cli {
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Play a match between two engines
    Match {
        engine1: EngineKind,
        engine2: EngineKind,
        #[arg(long, short = 'g', default_value_t = 10)]
        games: u32,
        #[arg(long, default_value_t = 300)]
        max_plies: u32,
        /// TOML file with exploration settings
        #[arg(long)]
        config: Option<PathBuf>,
        /// Agents used inside exploration rollouts
        #[arg(long, value_enum, default_value_t = RolloutAgent::Greedy)]
        rollout_agent: RolloutAgent,
        /// Start every game from this FEN instead of the initial position
        #[arg(long)]
        fen: Option<String>,
        /// Write the JSON report here
        #[arg(long)]
        report: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum EngineKind {
    Random,
    Greedy,
    Exploration,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum RolloutAgent {
    Greedy,
    Random,
}

fn random_factory() -> Arc<dyn AgentFactory> {
    Arc::new(|_: Color| Box::new(RandomAgent::new(StdRng::from_entropy())) as Box<dyn Agent>)
}

fn create_engine(
    kind: EngineKind,
    exploration: &ExplorationConfig,
    rollout_agent: RolloutAgent,
) -> Result<Box<dyn Engine>> {
    Ok(match kind {
        EngineKind::Random => Box::new(RandomEngine::new()),
        EngineKind::Greedy => Box::new(GreedyEngine::new()),
        EngineKind::Exploration => {
            let engine = match rollout_agent {
                RolloutAgent::Greedy => ExplorationEngine::new(exploration.clone()),
                RolloutAgent::Random => {
                    ExplorationEngine::with_factory(exploration.clone(), random_factory())
                }
            };
            Box::new(engine.context("invalid exploration settings")?)
        }
    })
}

#[allow(clippy::too_many_arguments)]
async fn run_match(
    engine1: EngineKind,
    engine2: EngineKind,
    games: u32,
    max_plies: u32,
    config: Option<PathBuf>,
    rollout_agent: RolloutAgent,
    fen: Option<String>,
    report: Option<PathBuf>,
) -> Result<()> {
    let exploration = match &config {
        Some(path) => ExplorationConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ExplorationConfig::default(),
    };
    let opening = match &fen {
        Some(fen) => Position::from_fen(fen).with_context(|| format!("bad FEN {fen:?}"))?,
        None => Position::startpos(),
    };

    let mut first = create_engine(engine1, &exploration, rollout_agent)?;
    let mut second = create_engine(engine2, &exploration, rollout_agent)?;
    info!(
        engine1 = first.name(),
        engine2 = second.name(),
        games,
        max_plies,
        "starting match"
    );

    let match_config = MatchConfig {
        num_games: games,
        max_plies,
        alternate_colors: true,
        opening,
    };
    let runner = MatchRunner::new(match_config);
    let result = runner.run_match(first.as_mut(), second.as_mut()).await;

    let uses_exploration = engine1 == EngineKind::Exploration || engine2 == EngineKind::Exploration;
    let settings = ReportSettings::new(runner.config(), uses_exploration.then_some(exploration));
    let report_data = MatchReport::new(first.name(), second.name(), settings, result);
    report_data.print_report();

    if let Some(path) = report {
        report_data
            .save(&path)
            .with_context(|| format!("writing report to {}", path.display()))?;
        info!(path = %path.display(), "report saved");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Cmd::Match {
            engine1,
            engine2,
            games,
            max_plies,
            config,
            rollout_agent,
            fen,
            report,
        } => {
            run_match(
                engine1,
                engine2,
                games,
                max_plies,
                config,
                rollout_agent,
                fen,
                report,
            )
            .await
        }
    }
}
