use crate::client::common::{lenient, LenientNumber};
use nori_common::{
    image::tags::{tags_from_query, Tag, TagType},
    serde::{self, Deserialize},
};

#[derive(Deserialize, Debug)]
#[serde(crate = "self::serde")]
pub struct DanbooruPost {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<LenientNumber>,
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub score: Option<LenientNumber>,
    pub source: Option<String>,
    pub md5: Option<String>,
    pub rating: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub image_width: Option<LenientNumber>,
    #[serde(default, deserialize_with = "lenient")]
    pub image_height: Option<LenientNumber>,
    #[serde(default, deserialize_with = "lenient")]
    pub parent_id: Option<LenientNumber>,
    #[serde(default, deserialize_with = "lenient")]
    pub pixiv_id: Option<LenientNumber>,
    pub file_url: Option<String>,
    pub large_file_url: Option<String>,
    pub preview_file_url: Option<String>,
    pub tag_string_general: Option<String>,
    pub tag_string_character: Option<String>,
    pub tag_string_copyright: Option<String>,
    pub tag_string_artist: Option<String>,
    pub tag_string_meta: Option<String>,
}

impl DanbooruPost {
    pub fn map_tags(&self) -> Vec<Tag> {
        let mut tags = Vec::with_capacity(64);
        if let Some(tagstr) = &self.tag_string_artist {
            tags.extend(tags_from_query(tagstr, TagType::Artist));
        }
        if let Some(tagstr) = &self.tag_string_character {
            tags.extend(tags_from_query(tagstr, TagType::Character));
        }
        if let Some(tagstr) = &self.tag_string_copyright {
            tags.extend(tags_from_query(tagstr, TagType::Copyright));
        }
        if let Some(tagstr) = &self.tag_string_general {
            tags.extend(tags_from_query(tagstr, TagType::General));
        }
        if let Some(tagstr) = &self.tag_string_meta {
            tags.extend(tags_from_query(tagstr, TagType::General));
        }

        tags
    }
}
