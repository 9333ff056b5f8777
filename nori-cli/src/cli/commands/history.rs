use clap::{Args, Subcommand};
use owo_colors::OwoColorize;

use crate::{cli::extra::AppState, error::CliError};

#[derive(Debug, Args)]
pub struct History {
    #[clap(subcommand)]
    pub action: HistoryAction,
}

#[derive(Debug, Subcommand)]
pub enum HistoryAction {
    /// Show recent searches, newest first
    List,
    /// Forget every search
    Clear,
}

impl History {
    pub async fn run(&self, state: &mut AppState) -> Result<(), CliError> {
        match self.action {
            HistoryAction::List => {
                for entry in state.history.entries() {
                    println!(
                        "{}  {}  {}",
                        entry.searched_at.format("%Y-%m-%d %H:%M").to_string().dimmed(),
                        entry.service.green(),
                        entry.query.bold()
                    );
                }
                Ok(())
            }
            HistoryAction::Clear => {
                state.history.clear();
                state.save_history().await
            }
        }
    }
}
