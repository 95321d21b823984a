//! Waypoint scenario runner.
//!
//! Loads a graph tree and a navigation script from TOML, mounts real hosts
//! for it and prints the host tree as the script runs.

mod cli;
mod replay;
mod scenario;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::replay::Replay;
use crate::scenario::{Scenario, load_graph};

fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();
	setup_tracing(cli.log_level());

	match cli.command {
		Command::Replay { file, quiet } => {
			let scenario = Scenario::load(&file)?;
			let replay = Replay::new(&scenario)?;
			if !quiet {
				print!("{}", replay.tree());
			}
			for (index, step) in scenario.steps.iter().enumerate() {
				replay
					.apply(step)
					.with_context(|| format!("step {} ({step}) failed", index + 1))?;
				if !quiet {
					println!("[{}] {step}", index + 1);
					print!("{}", replay.tree());
				}
			}
			if quiet {
				print!("{}", replay.tree());
			}
		}
		Command::Check { file } => {
			let graph = load_graph(&file)?;
			println!("ok: {} graphs", graph.graph_count());
		}
	}
	Ok(())
}

fn setup_tracing(default_level: &str) {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.init();
}
