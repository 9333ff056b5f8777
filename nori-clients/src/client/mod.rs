//! # Search clients
//!
//! Every supported API is described by a [`SiteApi`] implementation, which only knows how to
//! build a search URL and how to turn the response body into a list of [`Image`]s. The generic
//! [`SearchClient`] takes care of the HTTP side and is the type callers interact with.
//!
//! ## Example with the Danbooru API
//! ```rust,no_run
//! use nori_clients::prelude::*;
//!
//! async fn test() {
//!     let settings = DEFAULT_SERVICES.get("danbooru").unwrap().clone();
//!
//!     let client = SearchClient::new(DanbooruApi::new(), settings).unwrap();
//!
//!     let mut result = client.search("blonde_hair").await.unwrap(); // First page
//!
//!     client.fetch_next_page(&mut result).await.unwrap(); // Second page, appended to the first
//!
//!     println!("{:#?}", result.images());
//! }
//! ```
use nori_common::{
    client,
    image::tags::{tags_from_query, tags_to_query, TagType},
    log::debug,
    reqwest::{Client, RequestBuilder},
    tokio::task::JoinHandle,
    ApiType, Image, SearchResult,
};

use crate::client::caps::{AuthenticationType, SearchThreadHandle, ServiceFeatures};
use crate::error::ClientError;
use crate::settings::Settings;

pub mod caps;
pub mod common;
pub mod dispatch;

/// Number of images requested per page unless an API says otherwise.
pub const DEFAULT_LIMIT: u32 = 100;

/// Per-backend part of a search client.
///
/// Implementors are stateless descriptions of an API. Anything that depends on the configured
/// service (endpoint, credentials) comes in through [`Settings`].
pub trait SiteApi: Send + Sync {
    /// Raw representation of a page of results, as deserialized from the response body.
    type PostListResponse: Send;

    fn api_type(&self) -> ApiType;

    /// Builds the URL of the search request for page `pid` (0-indexed).
    ///
    /// `tags` is the raw space-separated query; implementors take care of encoding it.
    fn search_url(
        &self,
        settings: &Settings,
        tags: &str,
        pid: u32,
        limit: u32,
    ) -> Result<String, ClientError>;

    fn deserialize_post_list(&self, data: &str) -> Result<Self::PostListResponse, ClientError>;

    /// Normalizes a page of results. Entries that can't be displayed are skipped, missing
    /// fields are defaulted.
    fn map_post_list_response(
        &self,
        endpoint: &str,
        response: Self::PostListResponse,
    ) -> Result<Vec<Image>, ClientError>;

    /// URL of the page showing the image with the given ID in a web browser.
    fn web_url(&self, endpoint: &str, id: &str) -> String;

    fn authentication(&self) -> AuthenticationType;

    /// Query used when the user hasn't searched for anything yet.
    fn default_query(&self) -> &'static str {
        ""
    }

    fn default_limit(&self) -> u32 {
        DEFAULT_LIMIT
    }

    /// Hook to add headers or credentials to a search request.
    fn prepare_request(&self, request: RequestBuilder, _settings: &Settings) -> RequestBuilder {
        request
    }

    /// Expose some bitflags to indicate the features this API supports
    fn features() -> ServiceFeatures
    where
        Self: Sized;
}

/// A [`SiteApi`] bound to a configured service and an HTTP client.
#[derive(Debug, Clone)]
pub struct SearchClient<S: SiteApi> {
    api: S,
    settings: Settings,
    client: Client,
}

impl<S: SiteApi> SearchClient<S> {
    /// Sets up a client with nori's default HTTP client for the given API.
    pub fn new(api: S, settings: Settings) -> Result<Self, ClientError> {
        let client = client!(api.api_type())?;
        Self::with_client(api, settings, client)
    }

    /// Same as [`new`](Self::new), reusing an existing HTTP client.
    pub fn with_client(api: S, settings: Settings, client: Client) -> Result<Self, ClientError> {
        if settings.api_type != api.api_type() {
            return Err(ClientError::InvalidApiType {
                api: settings.api_type.to_string(),
            });
        }
        settings.endpoint_url()?;
        Ok(Self {
            api,
            settings,
            client,
        })
    }

    /// Searches for the first page of results.
    pub async fn search(&self, tags: &str) -> Result<SearchResult, ClientError> {
        self.search_page(tags, 0).await
    }

    /// Searches for a single page of results. `pid` is 0-indexed for every API.
    pub async fn search_page(&self, tags: &str, pid: u32) -> Result<SearchResult, ClientError> {
        let url = self
            .api
            .search_url(&self.settings, tags, pid, self.api.default_limit())?;

        debug!("Fetching {url}");

        let request = self
            .api
            .prepare_request(self.client.get(&url), &self.settings);
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::ServerStatus { status, url });
        }

        let body = response.text().await?;
        self.parse_response(&body, tags, pid)
    }

    /// Lower level function to build a [`SearchResult`] out of a response body obtained
    /// through other means.
    pub fn parse_response(
        &self,
        body: &str,
        tags: &str,
        pid: u32,
    ) -> Result<SearchResult, ClientError> {
        let response = self.api.deserialize_post_list(body)?;
        let mut images = self
            .api
            .map_post_list_response(&self.settings.endpoint, response)?;

        for (position, image) in (0u32..).zip(images.iter_mut()) {
            image.search_page = Some(pid);
            image.search_page_position = Some(position);
        }

        debug!("Page {pid} of '{tags}' has {} images", images.len());

        Ok(SearchResult::new(
            images,
            tags_from_query(tags, TagType::General),
            pid,
        ))
    }

    /// Loads the page after the last one in `result` and appends its images.
    ///
    /// Returns the number of images added. Nothing is fetched once the last page was reached.
    pub async fn fetch_next_page(&self, result: &mut SearchResult) -> Result<usize, ClientError> {
        if !result.has_next_page() {
            return Ok(0);
        }

        let pid = result.current_offset() + 1;
        let tags = tags_to_query(result.query());
        let page = self.search_page(&tags, pid).await?;
        let added = page.len();

        result.add_images(page.into_images(), pid);
        Ok(added)
    }

    pub fn default_query(&self) -> &'static str {
        self.api.default_query()
    }

    pub fn requires_authentication(&self) -> AuthenticationType {
        self.api.authentication()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns the used client for external use.
    pub fn client(&self) -> Client {
        self.client.clone()
    }

    pub fn api(&self) -> &S {
        &self.api
    }

    pub fn web_url(&self, id: &str) -> String {
        self.api.web_url(&self.settings.endpoint, id)
    }

    pub fn features() -> ServiceFeatures {
        S::features()
    }
}

impl<S: SiteApi + Clone + 'static> SearchClient<S> {
    /// Runs [`search_page`](Self::search_page) on its own task.
    pub fn setup_search_thread(&self, tags: &str, pid: u32) -> SearchThreadHandle {
        let this = self.clone();
        let tags = tags.to_string();
        tokio::spawn(async move { this.search_page(&tags, pid).await })
    }

    /// Runs [`search_page`](Self::search_page) on its own task and hands the outcome to
    /// `callback` once done.
    pub fn search_with_callback<F>(&self, tags: &str, pid: u32, callback: F) -> JoinHandle<()>
    where
        F: FnOnce(Result<SearchResult, ClientError>) + Send + 'static,
    {
        let this = self.clone();
        let tags = tags.to_string();
        tokio::spawn(async move {
            let result = this.search_page(&tags, pid).await;
            callback(result);
        })
    }
}
