use bitflags::bitflags;
use nori_common::serde::{self, Deserialize, Serialize};
use std::fmt::Display;

use crate::error::ClientError;
use nori_common::SearchResult;
use tokio::task::JoinHandle;

pub type SearchThreadHandle = JoinHandle<Result<SearchResult, ClientError>>;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ServiceFeatures: u8 {
        /// Searches can be narrowed down with tags.
        const TagSearch = 0b0000_0001;
        /// The API reports tag categories (artist, character...).
        const TagTypes = 0b0000_0010;
        /// Credentials are sent along with searches.
        const Auth = 0b0000_0100;
        /// Images come with a popularity score.
        const Score = 0b0000_1000;
        /// Images come with a SafeSearch rating.
        const Rating = 0b0001_0000;
    }
}

/// Whether an API needs user credentials to be searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(crate = "self::serde")]
pub enum AuthenticationType {
    Required,
    Optional,
    None,
}

impl Display for AuthenticationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Required => write!(f, "required"),
            Self::Optional => write!(f, "optional"),
            Self::None => write!(f, "none"),
        }
    }
}
