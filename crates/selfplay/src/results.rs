//! Match report storage and text summaries

use greedy_engine::ExplorationConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::match_runner::{MatchConfig, MatchResult};

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("cannot access report {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed report: {0}")]
    Json(#[from] serde_json::Error),
}

/// Settings a match was played with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSettings {
    pub num_games: u32,
    pub max_plies: u32,
    pub alternate_colors: bool,
    pub opening_fen: String,
    /// Present when an exploration engine took part.
    pub exploration: Option<ExplorationConfig>,
}

impl ReportSettings {
    pub fn new(config: &MatchConfig, exploration: Option<ExplorationConfig>) -> Self {
        Self {
            num_games: config.num_games,
            max_plies: config.max_plies,
            alternate_colors: config.alternate_colors,
            opening_fen: config.opening.to_fen(),
            exploration,
        }
    }
}

/// Complete record of one match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReport {
    pub engine1: String,
    pub engine2: String,
    pub settings: ReportSettings,
    pub score: f64,
    pub result: MatchResult,
}

impl MatchReport {
    pub fn new(engine1: &str, engine2: &str, settings: ReportSettings, result: MatchResult) -> Self {
        Self {
            engine1: engine1.to_string(),
            engine2: engine2.to_string(),
            settings,
            score: result.score(),
            result,
        }
    }

    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Save report to JSON file
    pub fn save(&self, path: &Path) -> Result<(), ReportError> {
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load report from JSON file
    pub fn load(path: &Path) -> Result<Self, ReportError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Generate a text report
    pub fn generate_report(&self) -> String {
        let mut report = String::new();
        report.push_str(&format!("=== Match: {} vs {} ===\n\n", self.engine1, self.engine2));
        report.push_str(&format!(
            "Config: {} games, {} plies max\n",
            self.settings.num_games, self.settings.max_plies
        ));
        if let Some(exploration) = &self.settings.exploration {
            report.push_str(&format!(
                "Exploration: size {}, depth {}, samples {}, choices {}\n",
                exploration.exploration_size,
                exploration.exploration_depth,
                exploration.exploration_sample,
                exploration.choice_exploration
            ));
        }
        report.push('\n');

        report.push_str(&format!(
            "{:<6} {:<6} {:<6} {:>6}  {}\n",
            "Game", "Colour", "Result", "Plies", "Termination"
        ));
        report.push_str(&"-".repeat(60));
        report.push('\n');
        for (i, game) in self.result.games.iter().enumerate() {
            report.push_str(&format!(
                "{:<6} {:<6} {:<6} {:>6}  {:?}\n",
                i + 1,
                if game.engine1_white { "W" } else { "B" },
                format!("{:?}", game.result),
                game.plies,
                game.termination
            ));
        }

        report.push_str(&format!(
            "\n{}: {} wins, {} losses, {} draws (score {:.1}%)\n",
            self.engine1,
            self.result.wins,
            self.result.losses,
            self.result.draws,
            self.score * 100.0
        ));
        report
    }

    /// Print report to stdout
    pub fn print_report(&self) {
        println!("{}", self.generate_report());
    }
}

#[cfg(test)]
#[path = "results_tests.rs"]
mod results_tests;
