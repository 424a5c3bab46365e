//! Self-play harness for the greedy engines
//!
//! This crate provides infrastructure for:
//! - Running matches between engines with alternating colours
//! - Recording how every game ended
//! - Writing JSON match reports
//!
//! # Usage
//!
//! ```bash
//! # Exploration engine against the single-ply greedy player
//! cargo run -p selfplay -- match exploration greedy --games 10 --report report.json
//!
//! # Smaller rollouts from a TOML file
//! cargo run -p selfplay -- match exploration random --config exploration.toml
//! ```

mod match_runner;
mod results;

pub use match_runner::*;
pub use results::*;
