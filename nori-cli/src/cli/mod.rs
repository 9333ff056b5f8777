use clap::{Parser, Subcommand};

use self::commands::{filter::Filter, history::History, search::TagSearch, services::Services};
use self::extra::AppState;
use crate::error::CliError;

pub mod commands;
pub mod extra;

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Search a service for images with tags
    Search(TagSearch),
    /// Manage the configured services
    Services(Services),
    /// Manage the tags hidden from search results
    Filter(Filter),
    /// Show or clear the search history
    History(History),
}

#[derive(Parser, Debug)]
#[clap(name = "nori", author, version, about, long_about = None)]
pub struct Cli {
    #[clap(subcommand)]
    pub mode: Commands,

    /// Id of the service to use instead of the active one
    ///
    /// Run `nori services list` to see the ids.
    #[clap(short, long, value_name = "ID", global = true, help_heading = "GENERAL")]
    pub service: Option<i64>,
}

impl Cli {
    pub async fn run(&self, state: &mut AppState) -> Result<(), CliError> {
        match &self.mode {
            Commands::Search(com) => com.run(state, self.service).await,
            Commands::Services(com) => com.run(state).await,
            Commands::Filter(com) => com.run(state).await,
            Commands::History(com) => com.run(state).await,
        }
    }
}
