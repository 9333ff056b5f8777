use clap::Args;
use log::{debug, warn};
use nori_clients::client::caps::AuthenticationType;
use nori_common::{serde_json, Rating};
use owo_colors::OwoColorize;

use crate::{
    cli::extra::{print_image, AppState},
    error::CliError,
    RatingArg,
};

#[derive(Debug, Args)]
pub struct TagSearch {
    /// Tags to search. Leave empty to use the service's default query
    #[clap(value_parser)]
    pub tags: Vec<String>,

    /// Result page to start from
    #[clap(
        short,
        long,
        value_parser(clap::value_parser!(u32).range(1..)),
        default_value_t = 1,
        value_name = "PAGE",
        help_heading = "SEARCH"
    )]
    pub page: u32,

    /// Number of pages to load
    #[clap(
        long,
        value_parser(clap::value_parser!(u32).range(1..=50)),
        default_value_t = 1,
        help_heading = "SEARCH"
    )]
    pub pages: u32,

    /// Print the results as JSON
    #[clap(long, action, default_value_t = false, help_heading = "OUTPUT")]
    pub json: bool,

    /// Do not hide images matching the tag filter
    #[clap(long, action, default_value_t = false, help_heading = "GENERAL")]
    pub no_filter: bool,

    /// Only show images with the selected rating. Overrides the SafeSearch preference.
    /// Can be used multiple times
    #[clap(short, long, value_parser, help_heading = "GENERAL")]
    pub rating: Vec<RatingArg>,
}

impl TagSearch {
    /// Ratings given on the command line, or the SafeSearch preference. An empty preference
    /// shows everything.
    fn selected_ratings(&self, state: &AppState) -> Vec<Rating> {
        if !self.rating.is_empty() {
            return self.rating.iter().map(|r| r.0).collect();
        }

        let ratings = state.prefs.allowed_ratings();
        if ratings.is_empty() {
            Rating::ALL.to_vec()
        } else {
            ratings
        }
    }

    pub async fn run(&self, state: &mut AppState, service: Option<i64>) -> Result<(), CliError> {
        let (id, settings) = state.resolve_service(service)?;
        let client = settings.create_client()?;

        if client.requires_authentication() == AuthenticationType::Required
            && settings.credentials().is_none()
        {
            warn!("{} requires credentials, the search will probably fail", settings.name);
        }

        let query = if self.tags.is_empty() {
            client.default_query().to_string()
        } else {
            self.tags.join(" ")
        };
        debug!("Searching service {id} for '{query}'");

        let mut result = client.search_page(&query, self.page - 1).await?;
        for _ in 1..self.pages {
            if !result.has_next_page() {
                break;
            }
            client.fetch_next_page(&mut result).await?;
        }

        let filtered = if self.no_filter {
            0
        } else {
            state.prefs.tag_filter().apply(&mut result)
        };
        let hidden = result.filter_ratings(&self.selected_ratings(state));

        if self.json {
            println!("{}", serde_json::to_string_pretty(result.images())?);
        } else {
            for image in result.images() {
                print_image(image);
            }
            println!(
                "{} {} {} {} {}",
                result.len().to_string().bold().blue(),
                "images from".bold(),
                settings.name.bold().green(),
                format!("({filtered} filtered by tag, {hidden} by rating)").dimmed(),
                if result.has_next_page() {
                    "More pages available".italic().to_string()
                } else {
                    String::new()
                }
            );
        }

        state.history.push(&settings.name, &query);
        state.save_history().await?;

        Ok(())
    }
}
