use clap::Parser;

mod cli;
mod flows;
mod logging;
mod repl;

use cli::{Cli, Command};

#[tokio::main]
async fn main() {
	let cli = Cli::parse();
	logging::init_logging(cli.verbose);

	if let Err(err) = run(cli).await {
		eprintln!("error: {err:#}");
		std::process::exit(1);
	}
}

async fn run(cli: Cli) -> anyhow::Result<()> {
	let config = cli.driver_config();
	match cli.command.unwrap_or(Command::Interactive) {
		Command::Interactive => repl::plur::run(config).await,
		Command::Drive => repl::drive::run(config).await,
		Command::TestInviteFlow => flows::run_invite_flow(config).await,
		Command::TestCommunityCreation => flows::run_community_creation(config).await,
	}
}
