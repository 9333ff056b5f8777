use crate::client::common::{lenient, null_as_default, LenientNumber};
use nori_common::{
    image::tags::{tags_from_names, Tag, TagType},
    serde::{self, Deserialize},
};

#[derive(Deserialize, Debug)]
#[serde(crate = "self::serde")]
pub struct E621TopLevel {
    pub posts: Vec<E621Post>,
}

#[derive(Deserialize, Debug)]
#[serde(crate = "self::serde")]
pub struct E621Post {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<LenientNumber>,
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub file: E621File,
    #[serde(default, deserialize_with = "null_as_default")]
    pub preview: E621Preview,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sample: E621Sample,
    #[serde(default, deserialize_with = "null_as_default")]
    pub score: E621Score,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Tags,
    pub rating: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sources: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub relationships: E621Relationships,
}

#[derive(Deserialize, Debug, Default)]
#[serde(crate = "self::serde")]
pub struct E621File {
    #[serde(default, deserialize_with = "lenient")]
    pub width: Option<LenientNumber>,
    #[serde(default, deserialize_with = "lenient")]
    pub height: Option<LenientNumber>,
    pub md5: Option<String>,
    /// `null` for posts hidden from the current user.
    pub url: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(crate = "self::serde")]
pub struct E621Preview {
    #[serde(default, deserialize_with = "lenient")]
    pub width: Option<LenientNumber>,
    #[serde(default, deserialize_with = "lenient")]
    pub height: Option<LenientNumber>,
    pub url: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(crate = "self::serde")]
pub struct E621Sample {
    #[serde(default, deserialize_with = "lenient")]
    pub has: Option<LenientNumber>,
    #[serde(default, deserialize_with = "lenient")]
    pub width: Option<LenientNumber>,
    #[serde(default, deserialize_with = "lenient")]
    pub height: Option<LenientNumber>,
    pub url: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(crate = "self::serde")]
pub struct E621Score {
    #[serde(default, deserialize_with = "lenient")]
    pub total: Option<LenientNumber>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(crate = "self::serde")]
pub struct E621Relationships {
    #[serde(default, deserialize_with = "lenient")]
    pub parent_id: Option<LenientNumber>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(crate = "self::serde", default)]
pub struct Tags {
    pub general: Vec<String>,
    pub species: Vec<String>,
    pub character: Vec<String>,
    pub copyright: Vec<String>,
    pub artist: Vec<String>,
}

impl Tags {
    pub fn map_tags(&self) -> Vec<Tag> {
        let mut tag_list = Vec::with_capacity(64);
        tag_list.extend(tags_from_names(&self.artist, TagType::Artist));
        tag_list.extend(tags_from_names(&self.character, TagType::Character));
        tag_list.extend(tags_from_names(&self.copyright, TagType::Copyright));
        tag_list.extend(tags_from_names(&self.species, TagType::Species));
        tag_list.extend(tags_from_names(&self.general, TagType::General));

        tag_list
    }
}
