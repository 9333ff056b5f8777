use std::path::{Path, PathBuf};

use log::{debug, warn};
use nori_clients::settings::Settings;
use nori_common::{Image, Rating};
use nori_core::{
    history::HISTORY_FILE, preferences::PREFERENCES_FILE, Preferences, SearchHistory,
    ServiceDatabase,
};
use owo_colors::OwoColorize;

use crate::error::CliError;

pub const DATABASE_FILE: &str = "services.db";

/// Everything the commands read from or write to the config directory.
pub struct AppState {
    pub db: ServiceDatabase,
    pub prefs: Preferences,
    pub history: SearchHistory,
    prefs_path: PathBuf,
    history_path: PathBuf,
}

impl AppState {
    pub async fn open(config_dir: &Path) -> Result<Self, CliError> {
        debug!("Using config dir {}", config_dir.display());

        let db = ServiceDatabase::open(&config_dir.join(DATABASE_FILE))?;

        let prefs_path = config_dir.join(PREFERENCES_FILE);
        let prefs = Preferences::load(&prefs_path).await?;

        let history_path = config_dir.join(HISTORY_FILE);
        let history = match SearchHistory::load(&history_path, prefs.history_size).await {
            Ok(history) => history,
            Err(error) => {
                warn!("Search history is unreadable, starting a new one: {error}");
                SearchHistory::new(prefs.history_size)
            }
        };

        Ok(Self {
            db,
            prefs,
            history,
            prefs_path,
            history_path,
        })
    }

    pub async fn save_preferences(&self) -> Result<(), CliError> {
        self.prefs.save(&self.prefs_path).await?;
        Ok(())
    }

    pub async fn save_history(&self) -> Result<(), CliError> {
        self.history.save(&self.history_path).await?;
        Ok(())
    }

    /// Picks the service to search: the one asked for, then the active one, then the first
    /// stored one.
    pub fn resolve_service(&self, id: Option<i64>) -> Result<(i64, Settings), CliError> {
        if let Some(id) = id {
            return self
                .db
                .get(id)?
                .map(|settings| (id, settings))
                .ok_or(CliError::ServiceNotExists { id });
        }

        if let Some(active) = self.prefs.active_service {
            match self.db.get(active)? {
                Some(settings) => return Ok((active, settings)),
                None => warn!("Active service {active} no longer exists"),
            }
        }

        self.db
            .get_all()?
            .into_iter()
            .next()
            .ok_or(CliError::NoServicesConfigured)
    }
}

fn colored_rating(rating: Rating) -> String {
    let name = rating.to_string();
    match rating {
        Rating::Safe => name.green().to_string(),
        Rating::Questionable => name.yellow().to_string(),
        Rating::Explicit => name.red().to_string(),
        Rating::Unknown => name.dimmed().to_string(),
    }
}

pub fn print_image(image: &Image) {
    println!(
        "{} {} {}x{} {} {}",
        image.id.bold(),
        colored_rating(image.rating),
        image.width,
        image.height,
        format!("[{}]", image.score).dimmed(),
        image.web_url.as_deref().unwrap_or(&image.file_url).blue()
    );

    let tags: Vec<String> = image
        .tags
        .iter()
        .map(|tag| {
            let (r, g, b) = tag.tag_type().rgb();
            tag.name().truecolor(r, g, b).to_string()
        })
        .collect();

    if !tags.is_empty() {
        println!("    {}", tags.join(" "));
    }
}

#[cfg(test)]
mod test {
    use super::AppState;
    use crate::error::CliError;
    use nori_clients::settings::DEFAULT_SERVICES;
    use nori_common::ApiType;

    #[tokio::test]
    async fn fresh_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::open(dir.path()).await.unwrap();

        let (_, settings) = state.resolve_service(None).unwrap();
        assert_eq!(settings.api_type, ApiType::Flickr);
        assert!(state.history.entries().is_empty());
    }

    #[tokio::test]
    async fn service_resolution_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::open(dir.path()).await.unwrap();
        let danbooru = state.db.insert(&DEFAULT_SERVICES["danbooru"]).unwrap();
        let e926 = state.db.insert(&DEFAULT_SERVICES["e926"]).unwrap();

        state.prefs.active_service = Some(e926);
        assert_eq!(state.resolve_service(None).unwrap().0, e926);
        assert_eq!(state.resolve_service(Some(danbooru)).unwrap().0, danbooru);
        assert!(matches!(
            state.resolve_service(Some(999)),
            Err(CliError::ServiceNotExists { id: 999 })
        ));

        // A deleted active service falls back to the first row.
        state.db.delete(e926).unwrap();
        assert_eq!(state.resolve_service(None).unwrap().1.api_type, ApiType::Flickr);

        for (id, _) in state.db.get_all().unwrap() {
            state.db.delete(id).unwrap();
        }
        assert!(matches!(
            state.resolve_service(None),
            Err(CliError::NoServicesConfigured)
        ));
    }

    #[tokio::test]
    async fn state_is_saved() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut state = AppState::open(dir.path()).await.unwrap();
            state.prefs.tag_filter = "comic".to_string();
            state.history.push("Flickr", "sunset");
            state.save_preferences().await.unwrap();
            state.save_history().await.unwrap();
        }

        let state = AppState::open(dir.path()).await.unwrap();
        assert_eq!(state.prefs.tag_filter, "comic");
        assert_eq!(state.history.entries()[0].query, "sunset");
    }
}
