use crate::client::common::{lenient, LenientNumber};
use nori_common::{
    image::tags::{tags_from_query, Tag, TagType},
    serde::{self, Deserialize},
};

/// `gelbooru.com` wraps the post list in an object, most other boards send a bare array.
#[derive(Deserialize, Debug)]
#[serde(crate = "self::serde", untagged)]
pub enum GelbooruResponse {
    List(Vec<GelbooruPost>),
    Wrapped(GelbooruTopLevel),
}

impl GelbooruResponse {
    pub fn into_posts(self) -> Vec<GelbooruPost> {
        match self {
            Self::List(posts) => posts,
            Self::Wrapped(top) => top.post,
        }
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(crate = "self::serde")]
pub struct GelbooruTopLevel {
    /// Missing when the search has no results.
    #[serde(default)]
    pub post: Vec<GelbooruPost>,
}

#[derive(Deserialize, Debug)]
#[serde(crate = "self::serde")]
pub struct GelbooruPost {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<LenientNumber>,
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub score: Option<LenientNumber>,
    #[serde(default, deserialize_with = "lenient")]
    pub width: Option<LenientNumber>,
    #[serde(default, deserialize_with = "lenient")]
    pub height: Option<LenientNumber>,
    /// Called `md5` on gelbooru.com and `hash` everywhere else.
    #[serde(alias = "md5")]
    pub hash: Option<String>,
    /// File name, without the directory.
    pub image: Option<String>,
    pub file_url: Option<String>,
    pub rating: Option<String>,
    pub source: Option<String>,
    pub tags: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub parent_id: Option<LenientNumber>,
    /// An integer on gelbooru.com, a boolean on rule34.xxx.
    #[serde(default, deserialize_with = "lenient")]
    pub sample: Option<LenientNumber>,
    pub sample_url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub sample_width: Option<LenientNumber>,
    #[serde(default, deserialize_with = "lenient")]
    pub sample_height: Option<LenientNumber>,
    pub preview_url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub preview_width: Option<LenientNumber>,
    #[serde(default, deserialize_with = "lenient")]
    pub preview_height: Option<LenientNumber>,
}

impl GelbooruPost {
    /// Gelbooru has no tag types in post listings.
    pub fn map_tags(&self) -> Vec<Tag> {
        self.tags
            .as_deref()
            .map(|tagstr| tags_from_query(tagstr, TagType::General))
            .unwrap_or_default()
    }
}
