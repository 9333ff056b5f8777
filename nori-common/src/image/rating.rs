//! General enum for the SafeSearch rating of images returned by a search client
//! # Image Rating
//! In general, most imageboard websites also classify posts considering how explicit they are
//!
//! Images are usually classified into 4 special ratings:
//! * `Safe`: Images that don't involve anything suggestive. Usually normal fanart.
//! * `Questionable`: Images that involve nude/seminude characters or other suggestive art that *might* not be safe for viewing close to other people or at work.
//! * `Explicit`: Images that are explicitly pornographic or have other sensitive content such as gore, etc.
//! * `Unknown`: The API didn't return a rating, or returned one nori doesn't understand.
//!

use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default,
)]
pub enum Rating {
    /// Represents images that are don't involve anything suggestive or sensitive.
    Safe,
    /// Represents images that have some degree of nudity or sexually suggestive elements.
    Questionable,
    /// Represents images that have explicit elements of pornography, gore, death, etc.
    Explicit,
    /// Represents a failure to parse the `rating` field into one of the above.
    #[default]
    Unknown,
}

impl Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Safe => write!(f, "Safe"),
            Self::Questionable => write!(f, "Questionable"),
            Self::Explicit => write!(f, "Explicit"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

impl Rating {
    pub const ALL: [Self; 4] = [Self::Safe, Self::Questionable, Self::Explicit, Self::Unknown];

    /// Guess the variant from the raw rating string returned by an API.
    ///
    /// Only the first character is considered, so `s`, `safe`, `Q` and `explicit` all work.
    pub fn from_rating_str(s: &str) -> Self {
        match s.chars().next().map(|c| c.to_ascii_lowercase()) {
            Some('s') => Self::Safe,
            Some('q') => Self::Questionable,
            Some('e') => Self::Explicit,
            _ => Self::Unknown,
        }
    }

    /// Parses the rating names stored in user preferences.
    ///
    /// Matching is done on a distinctive letter of each name (e**x**plicit, **q**uestionable,
    /// **u**ndefined, sa**f**e) so both long and short spellings are accepted. Strings that
    /// match nothing are skipped.
    pub fn from_filter_strs<I, S>(strings: I) -> Vec<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ratings = Vec::with_capacity(4);
        for string in strings {
            let string = string.as_ref().trim().to_lowercase();
            if string.contains('x') || string == "e" {
                ratings.push(Self::Explicit);
            } else if string.contains('q') {
                ratings.push(Self::Questionable);
            } else if string.starts_with('u') {
                ratings.push(Self::Unknown);
            } else if string.contains('f') || string == "s" {
                ratings.push(Self::Safe);
            }
        }
        ratings
    }

    /// Short lower-case name used when writing preferences back to disk.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Safe => "safe",
            Self::Questionable => "questionable",
            Self::Explicit => "explicit",
            Self::Unknown => "undefined",
        }
    }
}
