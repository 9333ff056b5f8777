//! Search client for `https://e621.net` and its safe variant `https://e926.net`
//!
//! The e621 client has the following features:
//! - Optional authentication (username + API key)
//! - Tag types, including species
//! - Scores
//!
use self::models::E621TopLevel;
use crate::client::caps::{AuthenticationType, ServiceFeatures};
use crate::client::common::{encode_tags, non_empty, parent_id, parse_iso8601, to_u32};
use crate::client::SiteApi;
use crate::error::ClientError;
use crate::settings::Settings;
use nori_common::{log::debug, serde_json, ApiType, Image, Rating};

mod models;

/// API logic for e621/e926.
#[derive(Debug, Clone, Default)]
pub struct E621Api {}

impl E621Api {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SiteApi for E621Api {
    type PostListResponse = E621TopLevel;

    fn api_type(&self) -> ApiType {
        ApiType::E621
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
        response: Self::PostListResponse,
    ) -> Result<Vec<Image>, ClientError> {
        let total = response.posts.len();
        let batch = response.posts.into_iter().filter(|c| c.file.url.is_some());

        let images: Vec<Image> = batch
            .map(|c| {
                let tags = c.tags.map_tags();
                let id = c.id.as_ref().and_then(|i| i.to_id()).unwrap_or_default();
                let file_url = c.file.url.unwrap_or_default();
                let width = to_u32(c.file.width.as_ref());
                let height = to_u32(c.file.height.as_ref());

                let has_sample = c.sample.has.as_ref().map_or(true, |h| h.as_bool());
                let (sample_url, sample_width, sample_height) = match non_empty(c.sample.url) {
                    Some(url) if has_sample => match (
                        to_u32(c.sample.width.as_ref()),
                        to_u32(c.sample.height.as_ref()),
                    ) {
                        (0, _) | (_, 0) => (url, width, height),
                        size => (url, size.0, size.1),
                    },
                    _ => (file_url.clone(), width, height),
                };
                let source = c.sources.into_iter().next().and_then(|s| non_empty(Some(s)));

                Image {
                    preview_url: non_empty(c.preview.url).unwrap_or_else(|| sample_url.clone()),
                    preview_width: to_u32(c.preview.width.as_ref()),
                    preview_height: to_u32(c.preview.height.as_ref()),
                    sample_url,
                    sample_width,
                    sample_height,
                    file_url,
                    width,
                    height,
                    tags,
                    web_url: Some(self.web_url(endpoint, &id)),
                    id,
                    parent_id: parent_id(
                        c.relationships.parent_id.as_ref().and_then(|id| id.to_id()),
                    ),
                    pixiv_id: source.as_deref().and_then(Image::pixiv_id_from_url),
                    source,
                    md5: non_empty(c.file.md5),
                    rating: Rating::from_rating_str(c.rating.as_deref().unwrap_or_default()),
                    score: c.score.total.as_ref().and_then(|s| s.as_i64()).unwrap_or_default(),
                    created_at: c.created_at.as_deref().and_then(parse_iso8601),
                    search_page: None,
                    search_page_position: None,
                }
            })
            .collect();

        debug!("Skipped {} hidden posts", total - images.len());
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
