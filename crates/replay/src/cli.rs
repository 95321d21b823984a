use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "waypoint")]
#[command(about = "Replays navigation scenarios against real hosts")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Raise log verbosity (-v debug, -vv trace); `RUST_LOG` takes precedence
	#[arg(short, long, action = ArgAction::Count, global = true)]
	pub verbose: u8,

	/// Subcommand to execute.
	#[command(subcommand)]
	pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
	/// Run a scenario and print the host tree after every step
	Replay {
		/// Scenario file (TOML)
		#[arg(value_name = "PATH")]
		file: PathBuf,

		/// Only print the final tree
		#[arg(short, long)]
		quiet: bool,
	},
	/// Validate a graph file or the graph of a scenario file
	Check {
		/// Graph or scenario file (TOML)
		#[arg(value_name = "PATH")]
		file: PathBuf,
	},
}

impl Cli {
	/// Default log filter for the requested verbosity.
	pub fn log_level(&self) -> &'static str {
		match self.verbose {
			0 => "warn",
			1 => "debug",
			_ => "trace",
		}
	}
}
