use nori_common::{
    image::tags::{tags_from_query, Tag, TagType},
    serde::{self, Deserialize},
};

/// `<posts count=".." offset=".."><post .../></posts>`, shared by Danbooru 1.x, Moebooru and
/// the Shimmie2 danbooru compatibility layer.
#[derive(Deserialize, Debug, Default)]
#[serde(crate = "self::serde")]
pub struct XmlPostList {
    #[serde(rename = "@count")]
    pub count: Option<String>,
    #[serde(rename = "@offset")]
    pub offset: Option<String>,
    #[serde(rename = "post", default)]
    pub posts: Vec<XmlPost>,
}

/// Every value is an attribute. Numbers are kept as strings and parsed leniently.
#[derive(Deserialize, Debug, Default)]
#[serde(crate = "self::serde")]
pub struct XmlPost {
    #[serde(rename = "@id")]
    pub id: Option<String>,
    #[serde(rename = "@file_url")]
    pub file_url: Option<String>,
    #[serde(rename = "@width")]
    pub width: Option<String>,
    #[serde(rename = "@height")]
    pub height: Option<String>,
    #[serde(rename = "@preview_url")]
    pub preview_url: Option<String>,
    #[serde(rename = "@preview_width")]
    pub preview_width: Option<String>,
    #[serde(rename = "@preview_height")]
    pub preview_height: Option<String>,
    #[serde(rename = "@sample_url")]
    pub sample_url: Option<String>,
    #[serde(rename = "@sample_width")]
    pub sample_width: Option<String>,
    #[serde(rename = "@sample_height")]
    pub sample_height: Option<String>,
    #[serde(rename = "@tags")]
    pub tags: Option<String>,
    #[serde(rename = "@rating")]
    pub rating: Option<String>,
    #[serde(rename = "@score")]
    pub score: Option<String>,
    #[serde(rename = "@md5")]
    pub md5: Option<String>,
    #[serde(rename = "@source")]
    pub source: Option<String>,
    #[serde(rename = "@parent_id")]
    pub parent_id: Option<String>,
    /// Unix timestamp on Moebooru, `EEE MMM d HH:mm:ss Z yyyy` on Danbooru 1.x.
    #[serde(rename = "@created_at")]
    pub created_at: Option<String>,
    /// Shimmie2 only, `yyyy-MM-dd HH:mm:ss`.
    #[serde(rename = "@date")]
    pub date: Option<String>,
}

impl XmlPost {
    /// No tag types in post listings.
    pub fn map_tags(&self) -> Vec<Tag> {
        self.tags
            .as_deref()
            .map(|tagstr| tags_from_query(tagstr, TagType::General))
            .unwrap_or_default()
    }
}
