//! Main representation of an image returned by a search client
//!
//! # Image
//! An [`Image` struct](Image) is a generic representation of a post found on an imageboard.
//!
//! Every API returns a slightly different set of fields, so the parsers fill in what they can
//! and leave the rest to their defaults. Once built, an `Image` is never modified.
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use std::{cmp::Ordering, fmt::Debug};

use self::{rating::Rating, tags::Tag};

pub mod rating;
pub mod tags;

static PIXIV_ID_FROM_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"https?://(?:www|i\d)\.pixiv\.net/.*?(?:illust_id=|img/.+?/)(\d+)")
        .expect("pixiv url pattern is valid")
});

/// Catchall model for the metadata an imageboard API returns for each image.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Image {
    /// Full-resolution image URL
    pub file_url: String,
    pub width: u32,
    pub height: u32,
    /// Thumbnail URL
    pub preview_url: String,
    pub preview_width: u32,
    pub preview_height: u32,
    /// Samples are medium-resolution images downsized for viewing on the web.
    ///
    /// Usually no more than ~1000px wide, suitable for slow networks and small screens.
    pub sample_url: String,
    pub sample_width: u32,
    pub sample_height: u32,
    pub tags: Vec<Tag>,
    /// ID given by the imageboard. Kept as a string since Flickr IDs don't fit the usual
    /// numeric scheme.
    pub id: String,
    /// Used when there are multiple similar images.
    pub parent_id: Option<String>,
    /// Page with this image, viewable in a web browser.
    pub web_url: Option<String>,
    pub pixiv_id: Option<String>,
    pub source: Option<String>,
    pub md5: Option<String>,
    pub rating: Rating,
    /// Popularity score
    pub score: i64,
    /// Upload date
    pub created_at: Option<DateTime<Utc>>,
    /// Search result page that contains this image.
    pub search_page: Option<u32>,
    /// The position of the image on its search result page.
    pub search_page_position: Option<u32>,
}

impl Debug for Image {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Image")
            .field("ID", &self.id)
            .field("File URL", &self.file_url)
            .field("Size", &format_args!("{}x{}", self.width, self.height))
            .field("MD5 Hash", &self.md5)
            .field("Rating", &self.rating)
            .field("Score", &self.score)
            .field("Created", &self.created_at)
            .field("Page", &self.search_page)
            .field("Position", &self.search_page_position)
            .field("Tag List", &self.tags)
            .finish()
    }
}

impl PartialEq for Image {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.file_url == other.file_url
    }
}

impl Eq for Image {}

impl Ord for Image {
    fn cmp(&self, other: &Self) -> Ordering {
        self.search_page
            .cmp(&other.search_page)
            .then(self.search_page_position.cmp(&other.search_page_position))
    }
}

impl PartialOrd for Image {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Image {
    /// Extract a Pixiv ID from an URL to an image's Pixiv page.
    pub fn pixiv_id_from_url(url: &str) -> Option<String> {
        if url.is_empty() {
            return None;
        }

        PIXIV_ID_FROM_URL
            .captures(url)
            .and_then(|caps| caps.get(1))
            .map(|id| id.as_str().to_string())
    }

    /// Guesses the file type from the last path segment of the file URL.
    ///
    /// Returns the lower-case extension without the preceding dot, with `jpeg` normalised into
    /// `jpg`. May be wrong for APIs that don't put the extension in their file names.
    pub fn file_extension(&self) -> Option<String> {
        let url = self
            .file_url
            .split(['?', '#'])
            .next()
            .unwrap_or_default();
        // The host is not a path segment.
        let path = match url.split_once("://") {
            Some((_, rest)) => rest.split_once('/').map_or("", |(_, path)| path),
            None => url,
        };
        let segment = path.rsplit('/').next().unwrap_or_default();

        let (_, ext) = segment.rsplit_once('.')?;
        if ext.is_empty() {
            return None;
        }

        let ext = ext.to_lowercase();
        if ext == "jpeg" {
            Some(String::from("jpg"))
        } else {
            Some(ext)
        }
    }

    /// Checks if the file is a video the image viewer can't display.
    pub fn is_video(&self) -> bool {
        matches!(self.file_extension().as_deref(), Some("mp4" | "webm"))
    }

    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|t| t.name() == name)
    }
}
