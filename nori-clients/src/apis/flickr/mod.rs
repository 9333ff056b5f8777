//! Search clients for the Flickr REST API
//!
//! [`FlickrApi`] searches all public photos, [`FlickrUserApi`] is scoped to a single user's
//! photostream, configured by using the photostream URL as the endpoint.
//!
//! Both need a Flickr API key, read from the service's password or from the
//! `NORI_FLICKR_API_KEY` environment variable.
use self::models::{FlickrPhoto, FlickrPhotos, FlickrResponse};
use crate::client::caps::{AuthenticationType, ServiceFeatures};
use crate::client::common::{non_empty, parse_unix, to_u32, LenientNumber};
use crate::client::SiteApi;
use crate::error::ClientError;
use crate::settings::{Settings, FLICKR_API_ENDPOINT};
use nori_common::{log::debug, serde_json, ApiType, Image, Rating};
use once_cell::sync::Lazy;
use regex::Regex;
use std::env;
use url::Url;

mod models;

pub const FLICKR_API_KEY_ENV: &str = "NORI_FLICKR_API_KEY";

/// Matches photostream URLs, capturing the user ID or path alias.
pub static FLICKR_USER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://(?:www\.|m\.)?flickr\.com/(?:#/)?photos/(.+?)/?$")
        .expect("flickr user pattern is valid")
});

/// Extra fields requested for every photo.
const EXTRAS: &str = "date_upload,owner_name,media,tags,path_alias,views,url_q,url_m,url_l,url_o";

fn api_key(settings: &Settings) -> Result<String, ClientError> {
    if let Some(key) = settings.password() {
        return Ok(key.to_string());
    }
    env::var(FLICKR_API_KEY_ENV)
        .ok()
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| ClientError::MissingCredentials {
            field: format!("Flickr API key (set a password or {FLICKR_API_KEY_ENV})"),
        })
}

/// Builds a REST call with the parameters shared by every search.
fn rest_url(
    api_endpoint: &str,
    settings: &Settings,
    params: &[(&str, &str)],
    pid: u32,
    limit: u32,
) -> Result<String, ClientError> {
    let mut url = Url::parse(api_endpoint).map_err(|_| ClientError::InvalidEndpoint {
        url: api_endpoint.to_string(),
    })?;

    let key = api_key(settings)?;
    url.query_pairs_mut()
        .extend_pairs(params)
        .append_pair("api_key", &key)
        .append_pair("extras", EXTRAS)
        .append_pair("per_page", &limit.to_string())
        // Page numbers are 1-indexed for this API.
        .append_pair("page", &(pid + 1).to_string())
        .append_pair("format", "json")
        .append_pair("nojsoncallback", "1");

    Ok(url.into())
}

/// Turns a failed call into an error, returning the photo page otherwise.
fn check_response(response: FlickrResponse) -> Result<FlickrPhotos, ClientError> {
    if response.stat != "ok" {
        return Err(ClientError::FlickrApi {
            code: response.code.unwrap_or_default(),
            message: response.message.unwrap_or_default(),
        });
    }

    let photos = response.photos.unwrap_or_default();
    debug!(
        "Flickr page {:?} of {:?}",
        photos.page.as_ref().and_then(LenientNumber::as_i64),
        photos.pages.as_ref().and_then(LenientNumber::as_i64)
    );
    Ok(photos)
}

fn size(
    url: Option<String>,
    width: Option<&LenientNumber>,
    height: Option<&LenientNumber>,
) -> Option<(String, u32, u32)> {
    non_empty(url).map(|url| (url, to_u32(width), to_u32(height)))
}

/// Maps a photo, picking the best size available for each role. Photos without any image URL
/// are skipped.
fn map_photo(photo: FlickrPhoto) -> Option<Image> {
    let tags = photo.map_tags();
    let original = size(photo.url_o, photo.width_o.as_ref(), photo.height_o.as_ref());
    let large = size(photo.url_l, photo.width_l.as_ref(), photo.height_l.as_ref());
    let medium = size(photo.url_m, photo.width_m.as_ref(), photo.height_m.as_ref());
    let square = size(photo.url_q, photo.width_q.as_ref(), photo.height_q.as_ref());

    let (file_url, width, height) = original
        .or_else(|| large.clone())
        .or_else(|| medium.clone())
        .or_else(|| square.clone())?;
    let (sample_url, sample_width, sample_height) = large
        .or_else(|| medium.clone())
        .unwrap_or_else(|| (file_url.clone(), width, height));
    let (preview_url, preview_width, preview_height) = square
        .or(medium)
        .unwrap_or_else(|| (sample_url.clone(), sample_width, sample_height));

    let owner = non_empty(photo.pathalias).or(photo.owner);
    let web_url = match owner {
        Some(owner) => format!("https://www.flickr.com/photos/{owner}/{}", photo.id),
        None => format!("https://www.flickr.com/photo.gne?id={}", photo.id),
    };

    Some(Image {
        file_url,
        width,
        height,
        preview_url,
        preview_width,
        preview_height,
        sample_url,
        sample_width,
        sample_height,
        tags,
        id: photo.id,
        web_url: Some(web_url),
        // Searches are made with `safe_search=1`.
        rating: Rating::Safe,
        score: photo
            .views
            .as_ref()
            .and_then(LenientNumber::as_i64)
            .unwrap_or_default(),
        created_at: photo.dateupload.as_deref().and_then(parse_unix),
        ..Default::default()
    })
}

fn map_photos(photos: FlickrPhotos) -> Vec<Image> {
    photos.photo.into_iter().filter_map(map_photo).collect()
}

/// API logic for Flickr.
#[derive(Debug, Clone, Default)]
pub struct FlickrApi {}

impl FlickrApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SiteApi for FlickrApi {
    type PostListResponse = FlickrPhotos;

    fn api_type(&self) -> ApiType {
        ApiType::Flickr
    }

    fn search_url(
        &self,
        settings: &Settings,
        tags: &str,
        pid: u32,
        limit: u32,
    ) -> Result<String, ClientError> {
        let tags = tags.trim();
        let params: Vec<(&str, &str)> = if tags.is_empty() {
            vec![("method", "flickr.photos.getRecent")]
        } else {
            vec![
                ("method", "flickr.photos.search"),
                ("text", tags),
                ("safe_search", "1"),
            ]
        };
        rest_url(&settings.endpoint, settings, &params, pid, limit)
    }

    fn deserialize_post_list(&self, data: &str) -> Result<Self::PostListResponse, ClientError> {
        let response: FlickrResponse = serde_json::from_str(data)?;
        check_response(response)
    }

    fn map_post_list_response(
        &self,
        _endpoint: &str,
        response: Self::PostListResponse,
    ) -> Result<Vec<Image>, ClientError> {
        Ok(map_photos(response))
    }

    fn web_url(&self, _endpoint: &str, id: &str) -> String {
        format!("https://www.flickr.com/photo.gne?id={id}")
    }

    fn authentication(&self) -> AuthenticationType {
        AuthenticationType::None
    }

    fn features() -> ServiceFeatures {
        ServiceFeatures::TagSearch | ServiceFeatures::Score
    }
}

/// API logic for a single Flickr user's photostream.
#[derive(Debug, Clone)]
pub struct FlickrUserApi {
    api_endpoint: String,
}

impl Default for FlickrUserApi {
    fn default() -> Self {
        Self {
            api_endpoint: FLICKR_API_ENDPOINT.to_string(),
        }
    }
}

impl FlickrUserApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sends REST calls somewhere other than the public Flickr API.
    #[must_use]
    pub fn with_api_endpoint(api_endpoint: &str) -> Self {
        Self {
            api_endpoint: api_endpoint.trim_end_matches('/').to_string(),
        }
    }

    /// Extracts the user ID (or path alias) from a photostream URL.
    pub fn user_id(photostream: &str) -> Option<String> {
        FLICKR_USER_REGEX
            .captures(photostream)
            .and_then(|caps| caps.get(1))
            .map(|user| user.as_str().to_string())
    }
}

impl SiteApi for FlickrUserApi {
    type PostListResponse = FlickrPhotos;

    fn api_type(&self) -> ApiType {
        ApiType::FlickrUser
    }

    fn search_url(
        &self,
        settings: &Settings,
        tags: &str,
        pid: u32,
        limit: u32,
    ) -> Result<String, ClientError> {
        let user_id =
            Self::user_id(&settings.endpoint).ok_or_else(|| ClientError::InvalidEndpoint {
                url: settings.endpoint.clone(),
            })?;

        let tags = tags.trim();
        let method = if tags.is_empty() {
            "flickr.people.getPhotos"
        } else {
            "flickr.photos.search"
        };
        let params = [("method", method), ("user_id", user_id.as_str()), ("text", tags)];
        rest_url(&self.api_endpoint, settings, &params, pid, limit)
    }

    fn deserialize_post_list(&self, data: &str) -> Result<Self::PostListResponse, ClientError> {
        let response: FlickrResponse = serde_json::from_str(data)?;
        check_response(response)
    }

    fn map_post_list_response(
        &self,
        _endpoint: &str,
        response: Self::PostListResponse,
    ) -> Result<Vec<Image>, ClientError> {
        Ok(map_photos(response))
    }

    fn web_url(&self, endpoint: &str, id: &str) -> String {
        format!("{endpoint}/{id}")
    }

    fn authentication(&self) -> AuthenticationType {
        AuthenticationType::None
    }

    fn features() -> ServiceFeatures {
        ServiceFeatures::TagSearch | ServiceFeatures::Score
    }
}

#[cfg(test)]
mod test {
    use super::{FlickrApi, FlickrUserApi};
    use crate::client::{SearchClient, SiteApi};
    use crate::error::ClientError;
    use crate::settings::Settings;
    use crate::test_server::{Route, StubServer};
    use nori_common::{ApiType, Rating};

    const PHOTOS: &str = r#"{"photos": {"page": 1, "pages": "10", "perpage": 100, "total": "1000",
        "photo": [
            {"id": "14627423345", "owner": "12345678@N07", "secret": "abc", "server": "3", "farm": 4,
             "title": "Sunset", "ispublic": 1, "dateupload": "1405881328", "ownername": "Someone",
             "views": "42", "tags": "sunset beach", "pathalias": "someone", "media": "photo",
             "url_q": "https://live.staticflickr.com/3/14627423345_abc_q.jpg", "height_q": 150, "width_q": 150,
             "url_m": "https://live.staticflickr.com/3/14627423345_abc.jpg", "height_m": "333", "width_m": "500",
             "url_l": "https://live.staticflickr.com/3/14627423345_abc_b.jpg", "height_l": 683, "width_l": 1024,
             "url_o": "https://live.staticflickr.com/3/14627423345_def_o.jpg", "height_o": "2000", "width_o": "3000"},
            {"id": "14627423346", "owner": "12345678@N07", "pathalias": null, "tags": "",
             "url_m": "https://live.staticflickr.com/3/14627423346_abc.jpg", "height_m": 375, "width_m": 500},
            {"id": "14627423347", "owner": "12345678@N07", "tags": "nothing"}
        ]}, "stat": "ok"}"#;

    const FAILURE: &str = r#"{"stat": "fail", "code": 100, "message": "Invalid API Key (Key has invalid format)"}"#;

    fn settings(endpoint: &str) -> Settings {
        Settings::new(ApiType::Flickr, "Flickr", endpoint, None, Some("0123456789abcdef"))
    }

    #[test]
    fn search_urls() {
        let api = FlickrApi::new();
        let recent = api
            .search_url(&settings("https://api.flickr.com/services/rest"), "", 0, 100)
            .unwrap();
        assert!(recent.starts_with("https://api.flickr.com/services/rest?method=flickr.photos.getRecent&api_key=0123456789abcdef"));
        assert!(recent.contains("&page=1&"));
        assert!(recent.ends_with("&format=json&nojsoncallback=1"));

        let search = api
            .search_url(&settings("https://api.flickr.com/services/rest"), "red car", 2, 50)
            .unwrap();
        assert!(search.contains("method=flickr.photos.search&text=red+car&safe_search=1"));
        assert!(search.contains("&per_page=50&page=3&"));
    }

    #[test]
    fn user_id_from_photostream() {
        assert_eq!(
            FlickrUserApi::user_id("https://www.flickr.com/photos/someone/").as_deref(),
            Some("someone")
        );
        assert_eq!(
            FlickrUserApi::user_id("http://m.flickr.com/#/photos/12345678@N07").as_deref(),
            Some("12345678@N07")
        );
        assert_eq!(FlickrUserApi::user_id("https://www.flickr.com/explore"), None);

        let settings = Settings::new(
            ApiType::FlickrUser,
            "Someone",
            "https://www.flickr.com/photos/someone",
            None,
            Some("key"),
        );
        let url = FlickrUserApi::new().search_url(&settings, "", 0, 100).unwrap();
        assert!(url.starts_with(
            "https://api.flickr.com/services/rest?method=flickr.people.getPhotos&user_id=someone&text=&api_key=key"
        ));
    }

    #[test]
    fn map_photos() {
        let client =
            SearchClient::new(FlickrApi::new(), settings("https://api.flickr.com/services/rest"))
                .unwrap();
        let result = client.parse_response(PHOTOS, "sunset", 0).unwrap();
        assert_eq!(result.len(), 2, "Photos without any size should be skipped");

        let first = &result.images()[0];
        assert_eq!(first.id, "14627423345");
        assert_eq!(first.rating, Rating::Safe);
        assert_eq!((first.width, first.height), (3000, 2000));
        assert_eq!((first.sample_width, first.sample_height), (1024, 683));
        assert_eq!((first.preview_width, first.preview_height), (150, 150));
        assert!(first.file_url.ends_with("_o.jpg"));
        assert_eq!(first.score, 42);
        assert_eq!(first.tags.len(), 2);
        assert!(first.created_at.is_some());
        assert_eq!(
            first.web_url.as_deref(),
            Some("https://www.flickr.com/photos/someone/14627423345")
        );

        let second = &result.images()[1];
        assert_eq!((second.width, second.height), (500, 375));
        assert_eq!(second.file_url, second.sample_url);
        assert_eq!(second.file_url, second.preview_url);
        assert!(second.tags.is_empty());
        assert_eq!(
            second.web_url.as_deref(),
            Some("https://www.flickr.com/photos/12345678@N07/14627423346")
        );
    }

    #[test]
    fn api_failures() {
        let client =
            SearchClient::new(FlickrApi::new(), settings("https://api.flickr.com/services/rest"))
                .unwrap();
        let err = client.parse_response(FAILURE, "", 0).unwrap_err();
        assert!(matches!(err, ClientError::FlickrApi { code: 100, .. }));
    }

    #[tokio::test]
    async fn user_search_against_server() {
        let server = StubServer::start(vec![Route::json("/services/rest", PHOTOS)]).await;
        let api = FlickrUserApi::with_api_endpoint(&format!("{}/services/rest", server.base_url));
        let settings = Settings::new(
            ApiType::FlickrUser,
            "Someone",
            "https://www.flickr.com/photos/someone",
            None,
            Some("key"),
        );
        let client = SearchClient::new(api, settings).unwrap();

        let result = client.search("beach").await.unwrap();
        assert_eq!(result.len(), 2);
        assert!(server.requests()[0].contains("method=flickr.photos.search&user_id=someone&text=beach"));
        assert_eq!(
            client.web_url("123"),
            "https://www.flickr.com/photos/someone/123"
        );
    }
}
