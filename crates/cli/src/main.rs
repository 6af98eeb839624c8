use acctswitch_cli::{cli::Cli, commands, logging};
use clap::Parser;

#[tokio::main(flavor = "current_thread")]
async fn main() {
	let cli = Cli::parse();
	logging::init_logging(cli.verbose);

	// Errors are already printed by dispatch.
	if commands::dispatch(cli).await.is_err() {
		std::process::exit(1);
	}
}
