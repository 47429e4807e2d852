use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
	name = "epc",
	version,
	about = "Translate and run epc scripts",
	after_long_help = "Set DEBUG=true, or pass --debug to `run`, for verbose tracing. RUST_LOG takes precedence."
)]
pub struct Cli {
	#[command(subcommand)]
	pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
	/// Translate and execute a script
	Run {
		/// Path to a .epc file
		path:  PathBuf,
		/// Trace every stage and print the source and generated code afterwards
		#[arg(long)]
		debug: bool,
	},
	/// Print the generated host code without running it
	Translate {
		/// Path to a .epc file
		path: PathBuf,
	},
}

impl Command {
	pub fn debug_flag(&self) -> bool { matches!(self, Command::Run { debug: true, .. }) }
}
