use crate::client::common::{lenient, LenientNumber};
use nori_common::{
    image::tags::{tags_from_query, Tag, TagType},
    serde::{self, Deserialize},
};

/// Envelope of every REST response. Failures still come with a `200 OK`.
#[derive(Deserialize, Debug)]
#[serde(crate = "self::serde")]
pub struct FlickrResponse {
    pub stat: String,
    pub code: Option<i64>,
    pub message: Option<String>,
    pub photos: Option<FlickrPhotos>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(crate = "self::serde")]
pub struct FlickrPhotos {
    #[serde(default, deserialize_with = "lenient")]
    pub page: Option<LenientNumber>,
    #[serde(default, deserialize_with = "lenient")]
    pub pages: Option<LenientNumber>,
    #[serde(default)]
    pub photo: Vec<FlickrPhoto>,
}

#[derive(Deserialize, Debug)]
#[serde(crate = "self::serde")]
pub struct FlickrPhoto {
    pub id: String,
    pub owner: Option<String>,
    pub pathalias: Option<String>,
    pub tags: Option<String>,
    pub dateupload: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub views: Option<LenientNumber>,
    pub url_q: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub width_q: Option<LenientNumber>,
    #[serde(default, deserialize_with = "lenient")]
    pub height_q: Option<LenientNumber>,
    pub url_m: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub width_m: Option<LenientNumber>,
    #[serde(default, deserialize_with = "lenient")]
    pub height_m: Option<LenientNumber>,
    pub url_l: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub width_l: Option<LenientNumber>,
    #[serde(default, deserialize_with = "lenient")]
    pub height_l: Option<LenientNumber>,
    pub url_o: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub width_o: Option<LenientNumber>,
    #[serde(default, deserialize_with = "lenient")]
    pub height_o: Option<LenientNumber>,
}

impl FlickrPhoto {
    /// User tags only, Flickr has no categories.
    pub fn map_tags(&self) -> Vec<Tag> {
        self.tags
            .as_deref()
            .map(|tagstr| tags_from_query(tagstr, TagType::General))
            .unwrap_or_default()
    }
}
