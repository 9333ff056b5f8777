use clap::{Args, Subcommand};
use owo_colors::OwoColorize;

use crate::{cli::extra::AppState, error::CliError};

#[derive(Debug, Args)]
pub struct Filter {
    #[clap(subcommand)]
    pub action: FilterAction,
}

#[derive(Debug, Subcommand)]
pub enum FilterAction {
    /// Show the filtered tags
    List,
    /// Hide images with these tags
    Add {
        #[clap(required = true)]
        tags: Vec<String>,
    },
    /// Stop hiding images with these tags
    Remove {
        #[clap(required = true)]
        tags: Vec<String>,
    },
}

impl Filter {
    pub async fn run(&self, state: &mut AppState) -> Result<(), CliError> {
        let mut filter = state.prefs.tag_filter();

        match &self.action {
            FilterAction::List => {
                if filter.is_empty() {
                    println!("{}", "No tags are filtered".italic());
                }
                for tag in filter.tags() {
                    println!("{}", tag.red());
                }
                return Ok(());
            }
            FilterAction::Add { tags } => {
                for tag in tags {
                    if !filter.add(tag) {
                        println!("{} is already filtered", tag.bold());
                    }
                }
            }
            FilterAction::Remove { tags } => {
                for tag in tags {
                    if !filter.remove(tag) {
                        println!("{} was not filtered", tag.bold());
                    }
                }
            }
        }

        state.prefs.set_tag_filter(&filter);
        state.save_preferences().await
    }
}

#[cfg(test)]
mod test {
    use super::{Filter, FilterAction};
    use crate::cli::extra::AppState;

    #[tokio::test]
    async fn filter_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::open(dir.path()).await.unwrap();

        Filter {
            action: FilterAction::Add {
                tags: vec!["comic".to_string(), "gore".to_string(), "comic".to_string()],
            },
        }
        .run(&mut state)
        .await
        .unwrap();

        Filter {
            action: FilterAction::Remove {
                tags: vec!["gore".to_string()],
            },
        }
        .run(&mut state)
        .await
        .unwrap();

        let reopened = AppState::open(dir.path()).await.unwrap();
        assert_eq!(reopened.prefs.tag_filter, "comic");
    }
}
