use clap::Parser;
use versioned_users::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let parsed = Cli::parse();

    match parsed.command {
        Command::Serve(args) => cli::serve::run(args).await,
        Command::InitDb => cli::init_db::run().await,
    }
}
