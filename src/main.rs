#![deny(clippy::all)]
use color_eyre::eyre::Result;
use nori_cli::cli::{extra::AppState, Cli};
use nori_cli::clap::Parser;
use nori_common::ApiType;

#[tokio::main]
async fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    env_logger::builder().format_timestamp(None).init();
    color_eyre::install()?;

    let mut state = AppState::open(&ApiType::config_dir()?).await?;

    args.run(&mut state).await?;

    Ok(())
}
