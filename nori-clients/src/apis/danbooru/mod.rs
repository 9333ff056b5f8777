//! Search client for Danbooru 2.x, as served by `https://danbooru.donmai.us`
//!
//! The danbooru client has the following features:
//! - Optional authentication (username + API key)
//! - Tag types
//!
use self::models::DanbooruPost;
use crate::client::caps::{AuthenticationType, ServiceFeatures};
use crate::client::common::{
    encode_tags, non_empty, parent_id, parse_iso8601, rating_with_general, to_u32,
};
use crate::client::SiteApi;
use crate::error::ClientError;
use crate::settings::Settings;
use nori_common::{log::debug, serde_json, ApiType, Image};

mod models;

/// The API doesn't report thumbnail sizes, they are at most this large.
const THUMBNAIL_SIZE: u32 = 150;
/// The API doesn't report sample sizes, they are at most this wide.
const SAMPLE_SIZE: u32 = 850;

/// API logic for Danbooru 2.x.
#[derive(Debug, Clone, Default)]
pub struct DanbooruApi {}

impl DanbooruApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Scales `width`x`height` down to fit in a `max`x`max` box. Unknown sizes give the box itself.
fn fit_within(width: u32, height: u32, max: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (max, max);
    }
    if width <= max && height <= max {
        return (width, height);
    }

    let (w, h, m) = (u64::from(width), u64::from(height), u64::from(max));
    let scaled = if w >= h {
        (m, (h * m / w).max(1))
    } else {
        ((w * m / h).max(1), m)
    };
    (
        u32::try_from(scaled.0).unwrap_or(max),
        u32::try_from(scaled.1).unwrap_or(max),
    )
}

/// Samples are only scaled by width.
fn sample_size(width: u32, height: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (SAMPLE_SIZE, SAMPLE_SIZE);
    }
    if width <= SAMPLE_SIZE {
        return (width, height);
    }
    let h = u64::from(height) * u64::from(SAMPLE_SIZE) / u64::from(width);
    (SAMPLE_SIZE, u32::try_from(h).unwrap_or(SAMPLE_SIZE))
}

impl SiteApi for DanbooruApi {
    type PostListResponse = Vec<DanbooruPost>;

    fn api_type(&self) -> ApiType {
        ApiType::Danbooru
    }

    fn search_url(
        &self,
        settings: &Settings,
        tags: &str,
        pid: u32,
        limit: u32,
    ) -> Result<String, ClientError> {
        // Page numbers are 1-indexed for this API.
        let mut url = format!(
            "{}/posts.json?tags={}&page={}&limit={limit}",
            settings.endpoint,
            encode_tags(tags),
            pid + 1
        );

        if let Some((login, api_key)) = settings.credentials() {
            url.push_str(&format!(
                "&login={}&api_key={}",
                urlencoding::encode(login),
                urlencoding::encode(api_key)
            ));
        }
        Ok(url)
    }

    fn deserialize_post_list(&self, data: &str) -> Result<Self::PostListResponse, ClientError> {
        let post_list = serde_json::from_str(data)?;
        Ok(post_list)
    }

    fn map_post_list_response(
        &self,
        endpoint: &str,
        posts: Self::PostListResponse,
    ) -> Result<Vec<Image>, ClientError> {
        let total = posts.len();
        // Restricted posts come without a file URL.
        let batch = posts.into_iter().filter(|c| c.file_url.is_some());

        let images: Vec<Image> = batch
            .map(|c| {
                let tags = c.map_tags();
                let id = c.id.as_ref().and_then(|i| i.to_id()).unwrap_or_default();
                let width = to_u32(c.image_width.as_ref());
                let height = to_u32(c.image_height.as_ref());
                let file_url = c.file_url.unwrap_or_default();

                let (preview_width, preview_height) = fit_within(width, height, THUMBNAIL_SIZE);
                let (sample_width, sample_height) = sample_size(width, height);
                let source = non_empty(c.source);
                let pixiv_id = c
                    .pixiv_id
                    .as_ref()
                    .and_then(|id| id.to_id())
                    .or_else(|| source.as_deref().and_then(Image::pixiv_id_from_url));

                Image {
                    preview_url: non_empty(c.preview_file_url)
                        .unwrap_or_else(|| file_url.clone()),
                    preview_width,
                    preview_height,
                    sample_url: non_empty(c.large_file_url).unwrap_or_else(|| file_url.clone()),
                    sample_width,
                    sample_height,
                    file_url,
                    width,
                    height,
                    tags,
                    web_url: Some(self.web_url(endpoint, &id)),
                    id,
                    parent_id: parent_id(c.parent_id.as_ref().and_then(|id| id.to_id())),
                    pixiv_id,
                    source,
                    md5: non_empty(c.md5),
                    rating: rating_with_general(c.rating.as_deref().unwrap_or_default()),
                    score: c.score.as_ref().and_then(|s| s.as_i64()).unwrap_or_default(),
                    created_at: c.created_at.as_deref().and_then(parse_iso8601),
                    search_page: None,
                    search_page_position: None,
                }
            })
            .collect();

        debug!("Skipped {} posts without a file", total - images.len());
        Ok(images)
    }

    fn web_url(&self, endpoint: &str, id: &str) -> String {
        format!("{endpoint}/posts/{id}")
    }

    fn authentication(&self) -> AuthenticationType {
        AuthenticationType::Optional
    }

    fn features() -> ServiceFeatures {
        ServiceFeatures::all()
    }
}

#[cfg(test)]
mod test {
    use super::{fit_within, DanbooruApi};
    use crate::client::{caps::AuthenticationType, SearchClient, SiteApi};
    use crate::error::ClientError;
    use crate::settings::Settings;
    use crate::test_server::{Route, StubServer};
    use nori_common::{ApiType, Rating, TagType};

    const POSTS: &str = r#"[
        {
            "id": 1786290,
            "created_at": "2014-07-20T18:35:28.123-04:00",
            "score": 12,
            "source": "http://i2.pixiv.net/img/someone/44466677.jpg",
            "md5": "5ffb7a35ea1e1fba9c4bbf4f1ab6ab3c",
            "rating": "s",
            "image_width": 1700,
            "image_height": 2400,
            "parent_id": null,
            "file_url": "https://cdn.donmai.us/original/5f/fb/5ffb7a35ea1e1fba9c4bbf4f1ab6ab3c.jpg",
            "large_file_url": "https://cdn.donmai.us/sample/5f/fb/sample-5ffb7a35ea1e1fba9c4bbf4f1ab6ab3c.jpg",
            "preview_file_url": "https://cdn.donmai.us/preview/5f/fb/5ffb7a35ea1e1fba9c4bbf4f1ab6ab3c.jpg",
            "tag_string_general": "1girl blonde_hair",
            "tag_string_character": "hakurei_reimu",
            "tag_string_copyright": "touhou",
            "tag_string_artist": "someone",
            "tag_string_meta": "highres"
        },
        {
            "id": 1786291,
            "rating": "e",
            "file_url": null,
            "tag_string_general": "hidden"
        },
        {
            "id": 1786292,
            "rating": "g",
            "image_width": 500,
            "image_height": 400,
            "parent_id": 1786290,
            "file_url": "https://cdn.donmai.us/original/aa/bb/aabb.png"
        }
    ]"#;

    fn settings(endpoint: &str) -> Settings {
        Settings::new(ApiType::Danbooru, "Danbooru", endpoint, None, None)
    }

    #[test]
    fn search_url_with_and_without_credentials() {
        let api = DanbooruApi::new();
        let url = api
            .search_url(&settings("https://danbooru.donmai.us"), "blonde_hair blue_eyes", 0, 100)
            .unwrap();
        assert_eq!(
            url,
            "https://danbooru.donmai.us/posts.json?tags=blonde_hair%20blue_eyes&page=1&limit=100"
        );

        let auth = Settings::new(
            ApiType::Danbooru,
            "Danbooru",
            "https://danbooru.donmai.us",
            Some("user"),
            Some("key"),
        );
        let url = api.search_url(&auth, "", 2, 100).unwrap();
        assert!(url.ends_with("?tags=&page=3&limit=100&login=user&api_key=key"));
    }

    #[test]
    fn map_posts() {
        let client =
            SearchClient::new(DanbooruApi::new(), settings("https://danbooru.donmai.us")).unwrap();
        let result = client.parse_response(POSTS, "blonde_hair", 2).unwrap();

        assert_eq!(result.len(), 2, "Posts without a file should be skipped");
        assert_eq!(result.current_offset(), 2);
        assert!(result.has_next_page());

        let first = &result.images()[0];
        assert_eq!(first.id, "1786290");
        assert_eq!(first.rating, Rating::Questionable);
        assert_eq!((first.width, first.height), (1700, 2400));
        assert_eq!((first.preview_width, first.preview_height), (106, 150));
        assert_eq!((first.sample_width, first.sample_height), (850, 1200));
        assert_eq!(first.score, 12);
        assert_eq!(first.pixiv_id.as_deref(), Some("44466677"));
        assert_eq!(
            first.web_url.as_deref(),
            Some("https://danbooru.donmai.us/posts/1786290")
        );
        assert_eq!(first.search_page, Some(2));
        assert_eq!(first.search_page_position, Some(0));
        assert!(first.created_at.is_some());
        assert_eq!(first.parent_id, None);

        let artist = first.tags.iter().find(|t| t.name() == "someone").unwrap();
        assert_eq!(artist.tag_type(), TagType::Artist);
        let meta = first.tags.iter().find(|t| t.name() == "highres").unwrap();
        assert_eq!(meta.tag_type(), TagType::General);
        assert_eq!(first.tags.len(), 6);

        let second = &result.images()[1];
        assert_eq!(second.rating, Rating::Safe);
        assert_eq!(second.parent_id.as_deref(), Some("1786290"));
        assert_eq!(second.sample_url, second.file_url);
        assert_eq!(second.search_page_position, Some(1));
        assert!(second.tags.is_empty());
    }

    #[test]
    fn malformed_fields_do_not_fail_the_page() {
        let client =
            SearchClient::new(DanbooruApi::new(), settings("https://danbooru.donmai.us")).unwrap();
        let body = r#"[
            {"id": 1, "score": "n/a", "image_width": "wide", "image_height": -5,
             "parent_id": "", "pixiv_id": {"id": 3},
             "file_url": "https://cdn.donmai.us/original/11/11/1.jpg"},
            {"id": "2", "score": 3, "image_width": "640", "image_height": 480, "parent_id": "1",
             "file_url": "https://cdn.donmai.us/original/22/22/2.jpg"}
        ]"#;
        let result = client.parse_response(body, "", 0).unwrap();
        assert_eq!(result.len(), 2);

        let broken = &result.images()[0];
        assert_eq!(broken.id, "1");
        assert_eq!(broken.score, 0);
        assert_eq!((broken.width, broken.height), (0, 0));
        assert_eq!(broken.parent_id, None);
        assert_eq!(broken.pixiv_id, None);

        let good = &result.images()[1];
        assert_eq!(good.id, "2");
        assert_eq!(good.score, 3);
        assert_eq!((good.width, good.height), (640, 480));
        assert_eq!(good.parent_id.as_deref(), Some("1"));
    }

    #[test]
    fn thumbnail_sizes() {
        assert_eq!(fit_within(300, 150, 150), (150, 75));
        assert_eq!(fit_within(100, 120, 150), (100, 120));
        assert_eq!(fit_within(0, 0, 150), (150, 150));
    }

    #[tokio::test]
    async fn search_against_server() {
        let server = StubServer::start(vec![Route::json("/posts.json", POSTS)]).await;
        let client = SearchClient::new(DanbooruApi::new(), settings(&server.base_url)).unwrap();

        assert_eq!(client.requires_authentication(), AuthenticationType::Optional);
        assert_eq!(client.default_query(), "");

        let mut result = client.search("touhou").await.unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result.query()[0].name(), "touhou");

        let added = client.fetch_next_page(&mut result).await.unwrap();
        assert_eq!(added, 2);
        assert_eq!(result.len(), 4);
        assert_eq!(result.current_offset(), 1);
        assert_eq!(result.images()[2].search_page, Some(1));

        let requests = server.requests();
        assert_eq!(requests[0], "/posts.json?tags=touhou&page=1&limit=100");
        assert_eq!(requests[1], "/posts.json?tags=touhou&page=2&limit=100");
    }

    #[tokio::test]
    async fn http_errors_are_reported() {
        let server = StubServer::start(vec![Route::status("/posts.json", 500)]).await;
        let client = SearchClient::new(DanbooruApi::new(), settings(&server.base_url)).unwrap();

        let err = client.search("touhou").await.unwrap_err();
        assert!(matches!(err, ClientError::ServerStatus { status, .. } if status.as_u16() == 500));
    }

    #[tokio::test]
    async fn background_search() {
        let server = StubServer::start(vec![Route::json("/posts.json", "[]")]).await;
        let client = SearchClient::new(DanbooruApi::new(), settings(&server.base_url)).unwrap();

        let result = client.setup_search_thread("nothing", 0).await.unwrap().unwrap();
        assert!(result.is_empty());
        assert!(!result.has_next_page());

        let (tx, rx) = tokio::sync::oneshot::channel();
        client
            .search_with_callback("nothing", 4, move |result| {
                let _ = tx.send(result.map(|r| r.current_offset()));
            })
            .await
            .unwrap();
        assert_eq!(rx.await.unwrap().unwrap(), 4);
    }
}
