//! # Image Tags Module
//!
//! This module defines structures for representing and categorizing tags
//! associated with images. Tags are a fundamental part of how
//! imageboards organize and allow searching of content.
//!
//! The primary structures are:
//! - [`Tag`](crate::image::tags::Tag): Represents a single tag, containing its name and its type.
//! - [`TagType`](crate::image::tags::TagType): An enum categorizing the nature of a tag (e.g., artist, character, species).

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::Display;

/// Represents a single tag associated with an image.
///
/// Tags are ordered by name only, while equality also takes the [`TagType`] into account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Tag {
    /// The textual content of the tag (e.g., "blue_sky", "solo_focus").
    name: String,
    /// The category or type of the tag.
    tag_type: TagType,
}

/// Categorizes the type or nature of a `Tag`.
///
/// Some APIs do not use tag types and will only use the [`TagType::General`] type.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum TagType {
    /// General descriptive tags about the content, scene, or attributes.
    #[default]
    General,
    /// Tags identifying the artist(s) of the work.
    Artist,
    /// Tags identifying specific characters depicted.
    Character,
    /// Tags related to copyright, series, or franchise.
    Copyright,
    /// Tags identifying the species of characters, only used on e621/e926.
    Species,
}

impl TagType {
    /// Colour used to display tags of this type.
    pub const fn color(&self) -> &'static str {
        match self {
            Self::Artist => "#A00000",
            Self::Character => "#00AA00",
            Self::Copyright => "#AA00AA",
            Self::Species => "#ED5D1F",
            Self::General => "#0073FF",
        }
    }

    /// Same colour as [`color`](Self::color), split into RGB components.
    pub const fn rgb(&self) -> (u8, u8, u8) {
        match self {
            Self::Artist => (0xA0, 0x00, 0x00),
            Self::Character => (0x00, 0xAA, 0x00),
            Self::Copyright => (0xAA, 0x00, 0xAA),
            Self::Species => (0xED, 0x5D, 0x1F),
            Self::General => (0x00, 0x73, 0xFF),
        }
    }
}

impl Display for TagType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::General => write!(f, "general"),
            Self::Artist => write!(f, "artist"),
            Self::Character => write!(f, "character"),
            Self::Copyright => write!(f, "copyright"),
            Self::Species => write!(f, "species"),
        }
    }
}

impl Tag {
    /// Creates a new `Tag`.
    pub fn new(name: &str, tag_type: TagType) -> Self {
        Self {
            name: name.to_string(),
            tag_type,
        }
    }

    /// Creates a new [`TagType::General`] tag.
    pub fn general(name: &str) -> Self {
        Self::new(name, TagType::General)
    }

    /// Returns a reference to the name of the tag.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the [`TagType`] of the tag.
    pub const fn tag_type(&self) -> TagType {
        self.tag_type
    }
}

impl Ord for Tag {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

impl PartialOrd for Tag {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Creates a tag list from a space-separated query, with every tag set to `tag_type`.
///
/// Blank input gives an empty list.
pub fn tags_from_query(query: &str, tag_type: TagType) -> Vec<Tag> {
    query
        .split_whitespace()
        .map(|name| Tag::new(name, tag_type))
        .collect()
}

/// Creates a tag list out of plain names.
pub fn tags_from_names<I, S>(names: I, tag_type: TagType) -> Vec<Tag>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .filter(|name| !name.as_ref().is_empty())
        .map(|name| Tag::new(name.as_ref(), tag_type))
        .collect()
}

/// Converts a tag list back into a space-separated query.
pub fn tags_to_query(tags: &[Tag]) -> String {
    tags.iter()
        .map(Tag::name)
        .collect::<Vec<&str>>()
        .join(" ")
}
