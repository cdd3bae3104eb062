use batch_dashboard::cli::{Cli, execute_command};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    execute_command(cli).await
}
