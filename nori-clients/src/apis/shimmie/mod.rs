//! Search client for Shimmie2 boards with the danbooru API extension enabled
//!
//! The extension mimics the Danbooru 1.x XML listing, so parsing is shared with
//! [`DanbooruLegacyApi`](crate::apis::danbooru_legacy::DanbooruLegacyApi).
use crate::apis::danbooru_legacy::{deserialize_xml, map_xml_post, models::XmlPostList};
use crate::client::caps::{AuthenticationType, ServiceFeatures};
use crate::client::common::encode_tags;
use crate::client::SiteApi;
use crate::error::ClientError;
use crate::settings::Settings;
use nori_common::{ApiType, Image};

/// API logic for Shimmie2.
#[derive(Debug, Clone, Default)]
pub struct ShimmieApi {}

impl ShimmieApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SiteApi for ShimmieApi {
    type PostListResponse = XmlPostList;

    fn api_type(&self) -> ApiType {
        ApiType::Shimmie
    }

    fn search_url(
        &self,
        settings: &Settings,
        tags: &str,
        pid: u32,
        limit: u32,
    ) -> Result<String, ClientError> {
        // Page numbers are 1-indexed for this API.
        Ok(format!(
            "{}/api/danbooru/find_posts/index.xml?tags={}&page={}&limit={limit}",
            settings.endpoint,
            encode_tags(tags),
            pid + 1
        ))
    }

    fn deserialize_post_list(&self, data: &str) -> Result<Self::PostListResponse, ClientError> {
        deserialize_xml(data)
    }

    fn map_post_list_response(
        &self,
        endpoint: &str,
        response: Self::PostListResponse,
    ) -> Result<Vec<Image>, ClientError> {
        Ok(response
            .posts
            .into_iter()
            .filter_map(|post| map_xml_post(post, |id| self.web_url(endpoint, id)))
            .collect())
    }

    fn web_url(&self, endpoint: &str, id: &str) -> String {
        format!("{endpoint}/post/view/{id}")
    }

    fn authentication(&self) -> AuthenticationType {
        AuthenticationType::None
    }

    fn features() -> ServiceFeatures {
        ServiceFeatures::TagSearch | ServiceFeatures::Score | ServiceFeatures::Rating
    }
}

#[cfg(test)]
mod test {
    use super::ShimmieApi;
    use crate::client::{caps::AuthenticationType, SearchClient, SiteApi};
    use crate::settings::{Settings, DEFAULT_SERVICES};
    use crate::test_server::{Route, StubServer};
    use chrono::Timelike;
    use nori_common::{ApiType, Rating};

    const POSTS: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<posts count="120" offset="0">
<post id="3046" md5="a0b1c2" file_name="cat.jpg" file_url="https://shimmie.example/_images/a0b1c2/3046%20-%20cat.jpg"
 height="768" width="1024" preview_url="https://shimmie.example/_thumbs/a0b1c2/thumb.jpg" preview_height="144" preview_width="192"
 rating="?" date="2014-07-20 18:35:28" is_warehoused="false" tags="cat cute" source="https://example.com/cat" score="2" author="someone"/>
<post id="3047" md5="d3e4f5" file_url="https://shimmie.example/_images/d3e4f5/3047.png" height="10" width="10"
 rating="s" date="2014-07-21 10:00:00" tags="dot" score="0"/>
</posts>"#;

    #[test]
    fn search_url() {
        let url = ShimmieApi::new()
            .search_url(&DEFAULT_SERVICES["paheal"], "cat", 2, 100)
            .unwrap();
        assert_eq!(
            url,
            "https://rule34.paheal.net/api/danbooru/find_posts/index.xml?tags=cat&page=3&limit=100"
        );
    }

    #[test]
    fn map_posts() {
        let settings = Settings::new(
            ApiType::Shimmie,
            "Shimmie",
            "https://shimmie.example",
            None,
            None,
        );
        let client = SearchClient::new(ShimmieApi::new(), settings).unwrap();
        assert_eq!(client.requires_authentication(), AuthenticationType::None);

        let result = client.parse_response(POSTS, "cat", 0).unwrap();
        assert_eq!(result.len(), 2);

        let first = &result.images()[0];
        assert_eq!(first.id, "3046");
        assert_eq!(first.rating, Rating::Unknown);
        assert_eq!(first.source.as_deref(), Some("https://example.com/cat"));
        assert_eq!(first.created_at.unwrap().hour(), 18);
        assert_eq!((first.preview_width, first.preview_height), (192, 144));
        assert_eq!(first.sample_url, first.file_url);
        assert_eq!((first.sample_width, first.sample_height), (1024, 768));
        assert_eq!(
            first.web_url.as_deref(),
            Some("https://shimmie.example/post/view/3046")
        );

        assert_eq!(result.images()[1].rating, Rating::Safe);
    }

    #[tokio::test]
    async fn search_against_server() {
        let server =
            StubServer::start(vec![Route::xml("/api/danbooru/find_posts/index.xml", POSTS)]).await;
        let settings = Settings::new(ApiType::Shimmie, "Local", &server.base_url, None, None);
        let client = SearchClient::new(ShimmieApi::new(), settings).unwrap();

        let result = client.search("").await.unwrap();
        assert_eq!(result.len(), 2);
        assert!(result.query().is_empty());
    }
}
