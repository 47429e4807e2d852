use std::{path::Path, process::ExitCode};

use clap::Parser;
use epc::{
	Config, Epc, EpcError,
	cli::{Cli, Command},
};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
	let cli = Cli::parse();
	let config = Config::from_env().with_debug(cli.command.debug_flag());
	init_tracing(config);

	let result = match &cli.command {
		Command::Run { path, .. } => run(path, config),
		Command::Translate { path } => Epc::load(path).map(|source| println!("{}", Epc::compile(&source))),
	};
	match result {
		Ok(()) => ExitCode::SUCCESS,
		Err(error) => {
			report(&error);
			ExitCode::FAILURE
		}
	}
}

fn init_tracing(config: Config) {
	let fallback = if config.debug { "debug" } else { "warn" };
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn run(path: &Path, config: Config) -> Result<(), EpcError> {
	let source = Epc::load(path)?;
	let program = Epc::compile(&source);
	let result = Epc::new().execute(&program);
	if config.debug {
		println!("\n=== SOURCE ===\n{source}\n=== GENERATED ===\n{program}");
	}
	result
}

fn report(error: &EpcError) {
	let rule = "━".repeat(63);
	eprintln!("\n✗ {}\n{rule}\n   {error}\n{rule}", error.title());
}
