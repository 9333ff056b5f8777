use nori_common::{
    image::tags::{tags_from_names, TagType},
    log::debug,
    SearchResult,
};

/// Tags the user never wants to see.
///
/// Persisted as a single space-separated string in [`Preferences`](crate::Preferences).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagFilter {
    tags: Vec<String>,
}

impl TagFilter {
    pub fn from_preference(value: &str) -> Self {
        let mut filter = Self::default();
        for tag in value.split_whitespace() {
            filter.add(tag);
        }
        filter
    }

    pub fn to_preference(&self) -> String {
        self.tags.join(" ")
    }

    /// Returns `false` if the tag was empty, contained whitespace or was already present.
    pub fn add(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || tag.contains(char::is_whitespace) || self.contains(tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    pub fn remove(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        let before = self.tags.len();
        self.tags.retain(|t| t != tag);
        before != self.tags.len()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Drops every image carrying a filtered tag. Returns how many were removed.
    pub fn apply(&self, result: &mut SearchResult) -> usize {
        let removed = result.filter_tags(&tags_from_names(&self.tags, TagType::General));
        debug!("Filtered {removed} images using {} tags", self.tags.len());
        removed
    }
}
