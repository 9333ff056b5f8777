//! A page (or several concatenated pages) of images returned by a search.
use log::debug;
use serde::{Deserialize, Serialize};

use crate::image::{rating::Rating, tags::Tag, Image};

/// Images returned by a search, together with the query that produced them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResult {
    images: Vec<Image>,
    query: Vec<Tag>,
    /// Last page loaded into this result (0-indexed).
    offset: u32,
    has_next_page: bool,
}

impl SearchResult {
    /// A result with no images is considered the last page.
    pub fn new(images: Vec<Image>, query: Vec<Tag>, offset: u32) -> Self {
        let has_next_page = !images.is_empty();
        Self {
            images,
            query,
            offset,
            has_next_page,
        }
    }

    pub fn images(&self) -> &[Image] {
        &self.images
    }

    pub fn into_images(self) -> Vec<Image> {
        self.images
    }

    pub fn query(&self) -> &[Tag] {
        &self.query
    }

    pub const fn current_offset(&self) -> u32 {
        self.offset
    }

    pub const fn has_next_page(&self) -> bool {
        self.has_next_page
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Removes all images carrying any of the given tags. Tag types are ignored.
    ///
    /// Returns the number of images removed.
    pub fn filter_tags(&mut self, tags: &[Tag]) -> usize {
        if tags.is_empty() {
            return 0;
        }

        let original_size = self.images.len();
        self.images
            .retain(|image| !tags.iter().any(|t| image.has_tag(t.name())));

        let removed = original_size - self.images.len();
        debug!("Tag filter removed {removed} images");
        removed
    }

    /// Keeps only images whose rating is in `allowed`.
    ///
    /// Returns the number of images removed.
    pub fn filter_ratings(&mut self, allowed: &[Rating]) -> usize {
        let original_size = self.images.len();
        self.images.retain(|image| allowed.contains(&image.rating));

        let removed = original_size - self.images.len();
        debug!("Rating filter removed {removed} images");
        removed
    }

    /// Appends the images of a further page. An empty page means there is nothing left to load.
    pub fn add_images(&mut self, images: Vec<Image>, offset: u32) {
        if images.is_empty() {
            self.on_last_page();
        }
        self.images.extend(images);
        self.offset = offset;
    }

    pub fn on_last_page(&mut self) {
        self.has_next_page = false;
    }
}
