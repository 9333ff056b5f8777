//! Everything needed to instantiate a search client.
//!
//! A [`Settings`] value is what gets persisted in the service database: the API flavour, a
//! display name, the endpoint and optional credentials.
use nori_common::{
    log::debug,
    serde::{self, Deserialize, Serialize},
    ApiType,
};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt::Display;
use url::Url;

use crate::client::dispatch::ServiceClient;
use crate::error::ClientError;
use crate::service_preset;

pub mod macros;

/// Endpoint of the Flickr REST API, shared by the `Flickr` and `FlickrUser` clients.
pub const FLICKR_API_ENDPOINT: &str = "https://api.flickr.com/services/rest";

/// Built-in service presets, keyed by a short identifier.
pub static DEFAULT_SERVICES: Lazy<HashMap<String, Settings>> = Lazy::new(|| {
    let mut hmap = HashMap::with_capacity(10);
    hmap.insert(
        "flickr".to_string(),
        service_preset!(ApiType::Flickr, "Flickr", FLICKR_API_ENDPOINT),
    );
    hmap.insert(
        "danbooru".to_string(),
        service_preset!(ApiType::Danbooru, "Danbooru", "https://danbooru.donmai.us"),
    );
    hmap.insert(
        "safebooru".to_string(),
        service_preset!(ApiType::Gelbooru, "Safebooru", "https://safebooru.org"),
    );
    hmap.insert(
        "gelbooru".to_string(),
        service_preset!(ApiType::Gelbooru, "Gelbooru", "https://gelbooru.com"),
    );
    hmap.insert(
        "rule34".to_string(),
        service_preset!(ApiType::Gelbooru, "Rule34", "https://api.rule34.xxx"),
    );
    hmap.insert(
        "e926".to_string(),
        service_preset!(ApiType::E621, "E926", "https://e926.net"),
    );
    hmap.insert(
        "e621".to_string(),
        service_preset!(ApiType::E621, "E621", "https://e621.net"),
    );
    hmap.insert(
        "konachan".to_string(),
        service_preset!(ApiType::DanbooruLegacy, "Konachan", "https://konachan.com"),
    );
    hmap.insert(
        "yandere".to_string(),
        service_preset!(ApiType::DanbooruLegacy, "Yande.re", "https://yande.re"),
    );
    hmap.insert(
        "paheal".to_string(),
        service_preset!(ApiType::Shimmie, "Paheal", "https://rule34.paheal.net"),
    );
    hmap
});

/// Configuration of a single search service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(crate = "self::serde")]
pub struct Settings {
    pub api_type: ApiType,
    /// Human readable name, shown in the service list.
    pub name: String,
    /// Base URL of the service, without a trailing slash.
    pub endpoint: String,
    #[serde(default)]
    pub username: Option<String>,
    /// Password, API key or password hash, depending on the API.
    #[serde(default)]
    pub password: Option<String>,
}

impl Settings {
    /// Creates new settings. Empty credential strings are treated as absent and a trailing
    /// slash is removed from the endpoint.
    pub fn new(
        api_type: ApiType,
        name: &str,
        endpoint: &str,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Self {
        Self {
            api_type,
            name: name.trim().to_string(),
            endpoint: endpoint.trim().trim_end_matches('/').to_string(),
            username: normalize_credential(username),
            password: normalize_credential(password),
        }
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref().filter(|s| !s.is_empty())
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref().filter(|s| !s.is_empty())
    }

    /// Returns `(username, password)` only when both are set.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        self.username().zip(self.password())
    }

    /// Parses the endpoint, rejecting anything that isn't an absolute http(s) URL.
    pub fn endpoint_url(&self) -> Result<Url, ClientError> {
        let invalid = || ClientError::InvalidEndpoint {
            url: self.endpoint.clone(),
        };

        let url = Url::parse(&self.endpoint).map_err(|_| invalid())?;
        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(invalid());
        }
        Ok(url)
    }

    /// Instantiates the search client matching [`api_type`](Self::api_type).
    pub fn create_client(&self) -> Result<ServiceClient, ClientError> {
        debug!("Creating {} client for {}", self.api_type, self.endpoint);
        ServiceClient::new(self.clone())
    }
}

impl Display for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

fn normalize_credential(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}
