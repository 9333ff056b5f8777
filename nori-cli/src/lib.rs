use std::ops::Deref;

pub use clap;

use clap::ValueEnum;
use nori_common::{ApiType, Rating};

pub mod cli;
pub mod error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct ApiTypeArg(pub ApiType);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct RatingArg(pub Rating);

impl ValueEnum for ApiTypeArg {
    fn value_variants<'a>() -> &'a [Self] {
        &[
            Self(ApiType::Danbooru),
            Self(ApiType::DanbooruLegacy),
            Self(ApiType::Gelbooru),
            Self(ApiType::Shimmie),
            Self(ApiType::E621),
            Self(ApiType::Flickr),
            Self(ApiType::FlickrUser),
        ]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(clap::builder::PossibleValue::new(self.0.as_str()).help(self.0.pretty_name()))
    }
}

impl Deref for ApiTypeArg {
    type Target = ApiType;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl ValueEnum for RatingArg {
    fn value_variants<'a>() -> &'a [Self] {
        &[
            Self(Rating::Safe),
            Self(Rating::Questionable),
            Self(Rating::Explicit),
            Self(Rating::Unknown),
        ]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        match self.0 {
            Rating::Safe => Some(
                clap::builder::PossibleValue::new("safe")
                    .help("Images that don't involve anything suggestive or sensitive"),
            ),
            Rating::Questionable => Some(clap::builder::PossibleValue::new("questionable").help(
                "Images that have some degree of nudity or sexually suggestive elements",
            )),
            Rating::Explicit => Some(clap::builder::PossibleValue::new("explicit").help(
                "Images that have explicit elements of pornography, gore, death, etc",
            )),
            Rating::Unknown => Some(
                clap::builder::PossibleValue::new("undefined")
                    .help("Images the service didn't rate"),
            ),
        }
    }
}

impl Deref for RatingArg {
    type Target = Rating;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
