//! Search client for the deprecated Danbooru 1.x XML API
//!
//! Still spoken by Moebooru boards such as `https://konachan.com` and `https://yande.re`.
//! Authentication uses the account name and the SHA1 password hash.
use self::models::{XmlPost, XmlPostList};
use crate::client::caps::{AuthenticationType, ServiceFeatures};
use crate::client::common::{encode_tags, non_empty, parent_id, parse_date, parse_u32};
use crate::client::SiteApi;
use crate::error::ClientError;
use crate::settings::Settings;
use nori_common::{log::debug, ApiType, Image, Rating};

pub(crate) mod models;

/// API logic for Danbooru 1.x.
#[derive(Debug, Clone, Default)]
pub struct DanbooruLegacyApi {}

impl DanbooruLegacyApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Parses a `<posts>` document. An empty body is an empty result.
pub(crate) fn deserialize_xml(data: &str) -> Result<XmlPostList, ClientError> {
    if data.trim().is_empty() {
        debug!("Empty response body, assuming no results");
        return Ok(XmlPostList::default());
    }

    let post_list: XmlPostList = quick_xml::de::from_str(data)?;
    debug!(
        "XML post list: count={:?} offset={:?}",
        post_list.count, post_list.offset
    );
    Ok(post_list)
}

/// Maps a post from a Danbooru 1.x style XML listing. Posts without a file are skipped.
pub(crate) fn map_xml_post<F>(post: XmlPost, web_url: F) -> Option<Image>
where
    F: FnOnce(&str) -> String,
{
    let file_url = non_empty(post.file_url.clone())?;
    let tags = post.map_tags();
    let id = post.id.clone().unwrap_or_default();
    let width = parse_u32(post.width.as_deref());
    let height = parse_u32(post.height.as_deref());

    let (sample_url, sample_width, sample_height) = match non_empty(post.sample_url) {
        Some(url) => (
            url,
            parse_u32(post.sample_width.as_deref()),
            parse_u32(post.sample_height.as_deref()),
        ),
        None => (file_url.clone(), width, height),
    };
    let (preview_url, preview_width, preview_height) = match non_empty(post.preview_url) {
        Some(url) => (
            url,
            parse_u32(post.preview_width.as_deref()),
            parse_u32(post.preview_height.as_deref()),
        ),
        None => (sample_url.clone(), sample_width, sample_height),
    };

    let source = non_empty(post.source);
    let created_at = post
        .created_at
        .as_deref()
        .or(post.date.as_deref())
        .and_then(parse_date);

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
        web_url: Some(web_url(&id)),
        id,
        parent_id: parent_id(post.parent_id),
        pixiv_id: source.as_deref().and_then(Image::pixiv_id_from_url),
        source,
        md5: non_empty(post.md5),
        rating: Rating::from_rating_str(post.rating.as_deref().unwrap_or_default()),
        score: post
            .score
            .as_deref()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or_default(),
        created_at,
        search_page: None,
        search_page_position: None,
    })
}

impl SiteApi for DanbooruLegacyApi {
    type PostListResponse = XmlPostList;

    fn api_type(&self) -> ApiType {
        ApiType::DanbooruLegacy
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
            "{}/post/index.xml?tags={}&page={}&limit={limit}",
            settings.endpoint,
            encode_tags(tags),
            pid + 1
        );

        if let Some((login, password_hash)) = settings.credentials() {
            url.push_str(&format!(
                "&login={}&password_hash={}",
                urlencoding::encode(login),
                urlencoding::encode(password_hash)
            ));
        }
        Ok(url)
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
        format!("{endpoint}/post/show/{id}")
    }

    fn authentication(&self) -> AuthenticationType {
        AuthenticationType::Optional
    }

    fn features() -> ServiceFeatures {
        ServiceFeatures::TagSearch
            | ServiceFeatures::Auth
            | ServiceFeatures::Score
            | ServiceFeatures::Rating
    }
}

#[cfg(test)]
mod test {
    use super::DanbooruLegacyApi;
    use crate::client::{SearchClient, SiteApi};
    use crate::settings::{Settings, DEFAULT_SERVICES};
    use crate::test_server::{Route, StubServer};
    use chrono::Datelike;
    use nori_common::{ApiType, Rating};

    const POSTS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<posts count="2" offset="0">
  <post id="191544" tags="landscape scenic sky" created_at="1405881328" source="" score="7"
    md5="c0ffee" file_url="https://konachan.com/image/c0ffee/Konachan.com%20-%20191544.png"
    preview_url="https://konachan.com/data/preview/c0/ff/c0ffee.jpg" preview_width="150" preview_height="84"
    sample_url="https://konachan.com/sample/c0ffee/sample.jpg" sample_width="1500" sample_height="844"
    rating="s" parent_id="" width="1920" height="1080"/>
  <post id="191545" tags="night" created_at="Sun Jul 20 18:35:28 -0400 2014" score="1"
    md5="decaf" file_url="https://konachan.com/image/decaf/191545.jpg" rating="q" parent_id="191544"
    width="800" height="600"/>
  <post id="191546" tags="deleted" rating="e" width="800" height="600"/>
</posts>"#;

    #[test]
    fn search_url() {
        let api = DanbooruLegacyApi::new();
        let url = api
            .search_url(&DEFAULT_SERVICES["konachan"], "sky", 0, 100)
            .unwrap();
        assert_eq!(url, "https://konachan.com/post/index.xml?tags=sky&page=1&limit=100");

        let auth = Settings::new(
            ApiType::DanbooruLegacy,
            "Konachan",
            "https://konachan.com",
            Some("user"),
            Some("0123abcd"),
        );
        let url = api.search_url(&auth, "sky", 0, 100).unwrap();
        assert!(url.ends_with("&login=user&password_hash=0123abcd"));
    }

    #[test]
    fn map_posts() {
        let client =
            SearchClient::new(DanbooruLegacyApi::new(), DEFAULT_SERVICES["konachan"].clone())
                .unwrap();
        let result = client.parse_response(POSTS, "sky", 0).unwrap();
        assert_eq!(result.len(), 2, "Posts without a file should be skipped");

        let first = &result.images()[0];
        assert_eq!(first.id, "191544");
        assert_eq!(first.rating, Rating::Safe);
        assert_eq!(first.score, 7);
        assert_eq!((first.width, first.height), (1920, 1080));
        assert_eq!((first.sample_width, first.sample_height), (1500, 844));
        assert_eq!((first.preview_width, first.preview_height), (150, 84));
        assert_eq!(first.tags.len(), 3);
        assert_eq!(first.parent_id, None);
        assert_eq!(first.created_at.unwrap().year(), 2014);
        assert_eq!(
            first.web_url.as_deref(),
            Some("https://konachan.com/post/show/191544")
        );

        let second = &result.images()[1];
        assert_eq!(second.rating, Rating::Questionable);
        assert_eq!(second.parent_id.as_deref(), Some("191544"));
        assert_eq!(second.sample_url, second.file_url);
        assert_eq!(second.preview_url, second.file_url);
        assert_eq!(second.created_at.unwrap().day(), 20);
    }

    #[test]
    fn empty_results() {
        let client =
            SearchClient::new(DanbooruLegacyApi::new(), DEFAULT_SERVICES["yandere"].clone())
                .unwrap();
        let result = client
            .parse_response(r#"<posts count="0" offset="0"></posts>"#, "nothing", 0)
            .unwrap();
        assert!(result.is_empty());
        assert!(!result.has_next_page());
    }

    #[tokio::test]
    async fn search_against_server() {
        let server = StubServer::start(vec![Route::xml("/post/index.xml", POSTS)]).await;
        let settings = Settings::new(
            ApiType::DanbooruLegacy,
            "Local",
            &server.base_url,
            None,
            None,
        );
        let client = SearchClient::new(DanbooruLegacyApi::new(), settings).unwrap();

        let result = client.search_page("landscape sky", 1).await.unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(
            server.requests(),
            vec!["/post/index.xml?tags=landscape%20sky&page=2&limit=100"]
        );
    }
}
