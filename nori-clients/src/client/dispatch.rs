//! Runtime selection of a search client from stored [`Settings`].
use nori_common::{reqwest::Client, ApiType, SearchResult};

use crate::apis::prelude::*;
use crate::client::caps::{AuthenticationType, SearchThreadHandle, ServiceFeatures};
use crate::client::SearchClient;
use crate::error::ClientError;
use crate::settings::Settings;

/// Any of the supported search clients.
#[derive(Debug, Clone)]
pub enum ServiceClient {
    Danbooru(SearchClient<DanbooruApi>),
    DanbooruLegacy(SearchClient<DanbooruLegacyApi>),
    Gelbooru(SearchClient<GelbooruApi>),
    Shimmie(SearchClient<ShimmieApi>),
    E621(SearchClient<E621Api>),
    Flickr(SearchClient<FlickrApi>),
    FlickrUser(SearchClient<FlickrUserApi>),
}

macro_rules! dispatch {
    ($self:expr, $client:ident => $body:expr) => {
        match $self {
            ServiceClient::Danbooru($client) => $body,
            ServiceClient::DanbooruLegacy($client) => $body,
            ServiceClient::Gelbooru($client) => $body,
            ServiceClient::Shimmie($client) => $body,
            ServiceClient::E621($client) => $body,
            ServiceClient::Flickr($client) => $body,
            ServiceClient::FlickrUser($client) => $body,
        }
    };
}

impl ServiceClient {
    /// Instantiates the client matching `settings.api_type`.
    pub fn new(settings: Settings) -> Result<Self, ClientError> {
        let client = match settings.api_type {
            ApiType::Danbooru => Self::Danbooru(SearchClient::new(DanbooruApi::new(), settings)?),
            ApiType::DanbooruLegacy => {
                Self::DanbooruLegacy(SearchClient::new(DanbooruLegacyApi::new(), settings)?)
            }
            ApiType::Gelbooru => Self::Gelbooru(SearchClient::new(GelbooruApi::new(), settings)?),
            ApiType::Shimmie => Self::Shimmie(SearchClient::new(ShimmieApi::new(), settings)?),
            ApiType::E621 => Self::E621(SearchClient::new(E621Api::new(), settings)?),
            ApiType::Flickr => Self::Flickr(SearchClient::new(FlickrApi::new(), settings)?),
            ApiType::FlickrUser => {
                Self::FlickrUser(SearchClient::new(FlickrUserApi::new(), settings)?)
            }
        };
        Ok(client)
    }

    pub async fn search(&self, tags: &str) -> Result<SearchResult, ClientError> {
        dispatch!(self, c => c.search(tags).await)
    }

    pub async fn search_page(&self, tags: &str, pid: u32) -> Result<SearchResult, ClientError> {
        dispatch!(self, c => c.search_page(tags, pid).await)
    }

    pub async fn fetch_next_page(&self, result: &mut SearchResult) -> Result<usize, ClientError> {
        dispatch!(self, c => c.fetch_next_page(result).await)
    }

    pub fn parse_response(
        &self,
        body: &str,
        tags: &str,
        pid: u32,
    ) -> Result<SearchResult, ClientError> {
        dispatch!(self, c => c.parse_response(body, tags, pid))
    }

    pub fn setup_search_thread(&self, tags: &str, pid: u32) -> SearchThreadHandle {
        dispatch!(self, c => c.setup_search_thread(tags, pid))
    }

    pub fn search_with_callback<F>(
        &self,
        tags: &str,
        pid: u32,
        callback: F,
    ) -> tokio::task::JoinHandle<()>
    where
        F: FnOnce(Result<SearchResult, ClientError>) + Send + 'static,
    {
        dispatch!(self, c => c.search_with_callback(tags, pid, callback))
    }

    pub fn default_query(&self) -> &'static str {
        dispatch!(self, c => c.default_query())
    }

    pub fn requires_authentication(&self) -> AuthenticationType {
        dispatch!(self, c => c.requires_authentication())
    }

    pub fn settings(&self) -> &Settings {
        dispatch!(self, c => c.settings())
    }

    pub fn client(&self) -> Client {
        dispatch!(self, c => c.client())
    }

    pub fn web_url(&self, id: &str) -> String {
        dispatch!(self, c => c.web_url(id))
    }

    pub fn api_type(&self) -> ApiType {
        self.settings().api_type
    }

    pub fn features(&self) -> ServiceFeatures {
        match self {
            Self::Danbooru(_) => SearchClient::<DanbooruApi>::features(),
            Self::DanbooruLegacy(_) => SearchClient::<DanbooruLegacyApi>::features(),
            Self::Gelbooru(_) => SearchClient::<GelbooruApi>::features(),
            Self::Shimmie(_) => SearchClient::<ShimmieApi>::features(),
            Self::E621(_) => SearchClient::<E621Api>::features(),
            Self::Flickr(_) => SearchClient::<FlickrApi>::features(),
            Self::FlickrUser(_) => SearchClient::<FlickrUserApi>::features(),
        }
    }
}
