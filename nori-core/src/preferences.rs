//! User preferences, stored as `preferences.toml` inside the nori config directory.
use std::{path::Path, time::Duration};

use nori_clients::detect::DEFAULT_DETECTION_TIMEOUT;
use nori_common::{
    log::debug,
    serde::{self, Deserialize, Serialize},
    tokio::fs::{create_dir_all, read_to_string, write},
    Rating,
};

use crate::error::CoreError;
use crate::filter::TagFilter;

pub const PREFERENCES_FILE: &str = "preferences.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(crate = "self::serde", default)]
pub struct Preferences {
    /// Space-separated list of tags to hide from search results.
    pub tag_filter: String,
    /// Ratings allowed through SafeSearch.
    pub safe_search: Vec<String>,
    pub detection_timeout_ms: u64,
    /// Number of queries kept in the search history.
    pub history_size: usize,
    /// Id of the service used when none is given on the command line.
    pub active_service: Option<i64>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            tag_filter: String::new(),
            safe_search: vec![Rating::Safe.as_str().to_string()],
            detection_timeout_ms: DEFAULT_DETECTION_TIMEOUT.as_millis() as u64,
            history_size: 50,
            active_service: None,
        }
    }
}

impl Preferences {
    /// Reads the preferences at `path`, writing the defaults there first if the file is missing.
    pub async fn load(path: &Path) -> Result<Self, CoreError> {
        if !path.exists() {
            debug!("No preferences at {}, writing defaults", path.display());
            let prefs = Self::default();
            prefs.save(path).await?;
            return Ok(prefs);
        }

        let content = read_to_string(path).await?;
        Ok(toml::from_str(&content)?)
    }

    pub async fn save(&self, path: &Path) -> Result<(), CoreError> {
        if let Some(parent) = path.parent() {
            create_dir_all(parent).await?;
        }
        write(path, toml::to_string_pretty(self)?).await?;
        Ok(())
    }

    pub fn allowed_ratings(&self) -> Vec<Rating> {
        Rating::from_filter_strs(&self.safe_search)
    }

    pub fn tag_filter(&self) -> TagFilter {
        TagFilter::from_preference(&self.tag_filter)
    }

    pub fn set_tag_filter(&mut self, filter: &TagFilter) {
        self.tag_filter = filter.to_preference();
    }

    pub const fn detection_timeout(&self) -> Duration {
        Duration::from_millis(self.detection_timeout_ms)
    }
}

#[cfg(test)]
mod test {
    use super::{Preferences, PREFERENCES_FILE};
    use crate::filter::TagFilter;
    use nori_common::Rating;
    use std::time::Duration;

    #[tokio::test]
    async fn missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(PREFERENCES_FILE);

        let prefs = Preferences::load(&path).await.unwrap();
        assert_eq!(prefs, Preferences::default());
        assert!(path.exists());
        assert_eq!(prefs.allowed_ratings(), vec![Rating::Safe]);
    }

    #[tokio::test]
    async fn save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PREFERENCES_FILE);

        let mut prefs = Preferences::default();
        let mut filter = TagFilter::default();
        filter.add("comic");
        prefs.set_tag_filter(&filter);
        prefs.active_service = Some(3);
        prefs.save(&path).await.unwrap();

        let loaded = Preferences::load(&path).await.unwrap();
        assert_eq!(loaded.tag_filter().tags(), ["comic"]);
        assert_eq!(loaded.active_service, Some(3));
    }

    #[tokio::test]
    async fn partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PREFERENCES_FILE);
        tokio::fs::write(
            &path,
            "safe_search = [\"safe\", \"questionable\", \"undefined\"]\ndetection_timeout_ms = 2500\n",
        )
        .await
        .unwrap();

        let prefs = Preferences::load(&path).await.unwrap();
        assert_eq!(
            prefs.allowed_ratings(),
            vec![Rating::Safe, Rating::Questionable, Rating::Unknown]
        );
        assert_eq!(prefs.detection_timeout(), Duration::from_millis(2500));
        assert_eq!(prefs.history_size, 50);
        assert!(prefs.tag_filter.is_empty());
    }

    #[tokio::test]
    async fn broken_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PREFERENCES_FILE);
        tokio::fs::write(&path, "history_size = \"lots\"").await.unwrap();

        assert!(Preferences::load(&path).await.is_err());
    }
}
