//! Search client for Gelbooru 0.2 based imageboards
//!
//! Besides `https://gelbooru.com` itself, this also covers sites like `https://safebooru.org`
//! and `https://rule34.xxx`, which run the same software and expose the same `dapi` endpoint.
//!
//! Modern gelbooru.com requires an API key for heavy use. It can be set as the service's
//! password, with the user ID as username.
use self::models::{GelbooruPost, GelbooruResponse};
use crate::client::caps::{AuthenticationType, ServiceFeatures};
use crate::client::common::{
    encode_tags, non_empty, parent_id, parse_ctime, parse_date, rating_with_general, to_u32,
};
use crate::client::SiteApi;
use crate::error::ClientError;
use crate::settings::Settings;
use nori_common::{log::debug, serde_json, ApiType, Image};

mod models;

/// API logic for Gelbooru and its clones.
#[derive(Debug, Clone, Default)]
pub struct GelbooruApi {}

impl GelbooruApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Derives the sample URL from the file URL, for posts that have a sample but don't say
    /// where it is. Without a file name or hash the file itself is used.
    fn sample_url(file_url: &str, filename: &str, hash: &str) -> String {
        let filename = match filename.trim() {
            "" => file_url
                .split(['?', '#'])
                .next()
                .and_then(|path| path.rsplit('/').next())
                .unwrap_or_default(),
            name => name,
        };
        if filename.is_empty() || hash.is_empty() {
            return file_url.to_string();
        }

        file_url
            .replace("images", "samples")
            .replace(filename, &format!("sample_{hash}.jpg"))
    }

    /// Gelbooru keeps video thumbnails at `thumbs.gelbooru.com/<dir>/<dir>/thumbnail_<hash>.jpg`.
    fn video_thumbnail_url(file_url: &str, hash: &str) -> Option<String> {
        let mut parts = file_url.rsplit('/').skip(1);
        let dir_two = parts.next()?;
        let dir_one = parts.next()?;
        Some(format!(
            "https://thumbs.gelbooru.com/{dir_one}/{dir_two}/thumbnail_{hash}.jpg"
        ))
    }

    fn map_post(&self, endpoint: &str, post: GelbooruPost) -> Image {
        let tags = post.map_tags();
        let id = post.id.as_ref().and_then(|i| i.to_id()).unwrap_or_default();
        let file_url = post.file_url.unwrap_or_default();
        let md5 = non_empty(post.hash);
        let hash = md5.clone().unwrap_or_default();
        let width = to_u32(post.width.as_ref());
        let height = to_u32(post.height.as_ref());

        let has_sample = post.sample.as_ref().is_some_and(|s| s.as_bool());
        let sample_url = non_empty(post.sample_url);

        let mut image = Image {
            file_url,
            width,
            height,
            md5,
            ..Default::default()
        };

        let (sample, sample_width, sample_height) = if has_sample || sample_url.is_some() {
            let url = sample_url.unwrap_or_else(|| {
                Self::sample_url(
                    &image.file_url,
                    post.image.as_deref().unwrap_or_default(),
                    &hash,
                )
            });
            (
                url,
                to_u32(post.sample_width.as_ref()),
                to_u32(post.sample_height.as_ref()),
            )
        } else {
            let url = if image.is_video() && endpoint.contains("gelbooru") {
                Self::video_thumbnail_url(&image.file_url, &hash)
                    .unwrap_or_else(|| image.file_url.clone())
            } else {
                image.file_url.clone()
            };
            (url, width, height)
        };
        // Width and height are zero when the API leaves them out.
        let (sample_width, sample_height) = if sample_width == 0 || sample_height == 0 {
            (width, height)
        } else {
            (sample_width, sample_height)
        };

        match non_empty(post.preview_url) {
            Some(preview) => {
                image.preview_url = preview;
                image.preview_width = to_u32(post.preview_width.as_ref());
                image.preview_height = to_u32(post.preview_height.as_ref());
            }
            None => {
                image.preview_url = sample.clone();
                image.preview_width = sample_width;
                image.preview_height = sample_height;
            }
        }

        let source = non_empty(post.source);
        let created_at = post.created_at.as_deref().and_then(|date| {
            parse_ctime(date).or_else(|| parse_date(date))
        });

        Image {
            sample_url: sample,
            sample_width,
            sample_height,
            tags,
            web_url: Some(self.web_url(endpoint, &id)),
            id,
            parent_id: parent_id(post.parent_id.as_ref().and_then(|p| p.to_id())),
            pixiv_id: source.as_deref().and_then(Image::pixiv_id_from_url),
            source,
            rating: rating_with_general(post.rating.as_deref().unwrap_or_default()),
            score: post
                .score
                .as_ref()
                .and_then(|s| s.as_i64())
                .unwrap_or_default(),
            created_at,
            ..image
        }
    }
}

impl SiteApi for GelbooruApi {
    type PostListResponse = Vec<GelbooruPost>;

    fn api_type(&self) -> ApiType {
        ApiType::Gelbooru
    }

    fn search_url(
        &self,
        settings: &Settings,
        tags: &str,
        pid: u32,
        limit: u32,
    ) -> Result<String, ClientError> {
        // Page numbers are 0-indexed for this API.
        let mut url = format!(
            "{}/index.php?page=dapi&s=post&q=index&tags={}&pid={pid}&limit={limit}&json=1",
            settings.endpoint,
            encode_tags(tags)
        );

        if let Some((user_id, api_key)) = settings.credentials() {
            url.push_str(&format!(
                "&user_id={}&api_key={}",
                urlencoding::encode(user_id),
                urlencoding::encode(api_key)
            ));
        }
        Ok(url)
    }

    fn deserialize_post_list(&self, data: &str) -> Result<Self::PostListResponse, ClientError> {
        // Some boards answer an empty search with an empty body.
        if data.trim().is_empty() {
            debug!("Empty response body, assuming no results");
            return Ok(Vec::new());
        }

        let response: GelbooruResponse = serde_json::from_str(data)?;
        Ok(response.into_posts())
    }

    fn map_post_list_response(
        &self,
        endpoint: &str,
        posts: Self::PostListResponse,
    ) -> Result<Vec<Image>, ClientError> {
        Ok(posts
            .into_iter()
            .map(|post| self.map_post(endpoint, post))
            .collect())
    }

    fn web_url(&self, endpoint: &str, id: &str) -> String {
        format!("{endpoint}/index.php?page=post&s=view&id={id}")
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
