use clap::Parser;
use cognitive_core::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve => cli::serve::run().await,
        Command::Classify { query } => cli::classify::run(&query).await,
        Command::Ask { query } => cli::ask::run(&query).await,
        Command::CheckStore => cli::check_store::run().await,
    }
}
