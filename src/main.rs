use clap::Parser;
use spreadwatch::cli::{check, run, CheckCommand, Cli, Commands};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Run(args) => run::execute(args).await,
        Commands::Check(CheckCommand::Config(args)) => check::execute_config(&args.config),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
