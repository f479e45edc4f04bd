use anyhow::Result;
use chromatic_atmospheres::{app, config::Cli};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    app::run(cli.into()).await
}
