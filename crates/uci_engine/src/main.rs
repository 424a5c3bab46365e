use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chess_core::{move_to_uci, set_position_from_uci, Decision, Engine, Position};
use clap::Parser;
use greedy_engine::{rank_moves, ExplorationConfig, ExplorationEngine};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "uci_engine", about = "Greedy rollout chess engine speaking UCI")]
struct Cli {
    /// TOML file with exploration settings
    #[arg(long)]
    config: Option<PathBuf>,
    /// Fixed rollout seed for reproducible play
    #[arg(long)]
    seed: Option<u64>,
}

/// What the input loop should do after a command.
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// One UCI conversation: the current position and the engine that answers `go`.
struct UciSession {
    pos: Position,
    engine: ExplorationEngine,
}

impl UciSession {
    fn new(config: ExplorationConfig) -> Result<Self> {
        Ok(Self {
            pos: Position::startpos(),
            engine: ExplorationEngine::new(config).context("invalid exploration settings")?,
        })
    }

    /// Handles one input line, returning the lines to print.
    async fn handle(&mut self, line: &str) -> (Vec<String>, Flow) {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some(&command) = parts.first() else {
            return (Vec::new(), Flow::Continue);
        };

        let out = match command {
            "uci" => self.identify(),
            "isready" => vec!["readyok".to_string()],
            "setoption" => {
                self.set_option(&parts[1..]);
                Vec::new()
            }
            "ucinewgame" => {
                self.pos = Position::startpos();
                self.engine.new_game();
                Vec::new()
            }
            "position" => {
                let mut next = self.pos.clone();
                match set_position_from_uci(&mut next, &parts[1..]) {
                    Ok(()) => self.pos = next,
                    Err(err) => warn!(error = %err, "ignoring position command"),
                }
                Vec::new()
            }
            "go" => vec![format!("bestmove {}", self.best_move().await)],
            "quit" => return (Vec::new(), Flow::Quit),
            _ => Vec::new(),
        };
        (out, Flow::Continue)
    }

    fn identify(&self) -> Vec<String> {
        let config = self.engine.config();
        vec![
            format!("id name {}", self.engine.name()),
            format!("id author {}", self.engine.author()),
            format!(
                "option name ExplorationSize type spin default {} min 1 max 64",
                config.exploration_size
            ),
            format!(
                "option name ExplorationDepth type spin default {} min -1 max 100",
                config.exploration_depth
            ),
            format!(
                "option name ExplorationSample type spin default {} min 2 max 5000",
                config.exploration_sample
            ),
            format!(
                "option name ChoiceExploration type spin default {} min -1 max 32",
                config.choice_exploration
            ),
            "uciok".to_string(),
        ]
    }

    /// `name <Option> value <N>`; a rejected value keeps the current settings.
    fn set_option(&mut self, args: &[&str]) {
        let (Some(name_at), Some(value_at)) = (
            args.iter().position(|&a| a == "name"),
            args.iter().position(|&a| a == "value"),
        ) else {
            warn!(?args, "malformed setoption");
            return;
        };
        let name = args.get(name_at + 1).copied().unwrap_or_default();
        let Some(value) = args.get(value_at + 1).and_then(|v| v.parse::<i64>().ok()) else {
            warn!(option = name, "setoption without a numeric value");
            return;
        };

        let mut config = self.engine.config().clone();
        match name {
            "ExplorationSize" => config.exploration_size = value.max(0) as usize,
            "ExplorationDepth" => config.exploration_depth = value as i32,
            "ExplorationSample" => config.exploration_sample = value.max(0) as usize,
            "ChoiceExploration" => config.choice_exploration = value as i32,
            _ => {
                warn!(option = name, "unknown option");
                return;
            }
        }
        match self.engine.reconfigure(config) {
            Ok(()) => info!(option = name, value, "option set"),
            Err(err) => warn!(option = name, value, error = %err, "option rejected"),
        }
    }

    async fn best_move(&mut self) -> String {
        match self.engine.select_move(&self.pos).await {
            Ok(Decision::Move(mv)) => move_to_uci(mv),
            Ok(Decision::NoMove) => "0000".to_string(),
            Err(err) => {
                warn!(error = %err, "exploration failed, playing the greedy move");
                rank_moves(&self.pos, -1)
                    .first()
                    .map(|mv| move_to_uci(*mv))
                    .unwrap_or_else(|| "0000".to_string())
            }
        }
    }
}

fn main() -> Result<()> {
    // stdout carries the UCI protocol, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => ExplorationConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ExplorationConfig::default(),
    };
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    let runtime = tokio::runtime::Runtime::new().context("starting runtime")?;
    let mut session = UciSession::new(config)?;
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = line.context("reading stdin")?;
        let (out, flow) = runtime.block_on(session.handle(&line));
        for reply in out {
            writeln!(stdout, "{reply}")?;
        }
        stdout.flush()?;
        if flow == Flow::Quit {
            break;
        }
    }
    Ok(())
}
