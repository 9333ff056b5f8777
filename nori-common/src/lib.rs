use std::{
    env,
    fmt::Display,
    fs::create_dir_all,
    io,
    path::{Path, PathBuf},
    str::FromStr,
};

// Public Exports
pub use bincode;
pub use chrono;
pub use directories;
pub use log;
pub use reqwest;
pub use serde;
pub use serde_json;
pub use tokio;
pub use zstd;

use directories::ProjectDirs;

use log::debug;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod image;
pub mod macros;
pub mod search_result;

pub use image::{rating::Rating, tags::Tag, tags::TagType, Image};
pub use search_result::SearchResult;

/// Every API flavour a search client can speak.
///
/// The discriminants are persisted in the settings database, so new variants must only ever be
/// appended.
#[derive(Debug, Copy, Clone, Ord, PartialOrd, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ApiType {
    /// Danbooru 2.x JSON API, as served by ```https://danbooru.donmai.us```.
    Danbooru = 0,
    /// The deprecated Danbooru 1.x XML API.
    DanbooruLegacy = 1,
    /// Gelbooru 0.2 `dapi` endpoint. Also covers ```https://safebooru.org``` and ```https://rule34.xxx```.
    Gelbooru = 2,
    /// Shimmie2 boards exposing the danbooru compatibility extension.
    Shimmie = 3,
    /// Represents ```https://e621.net``` or it's safe variant ```https://e926.net```.
    E621 = 4,
    /// Flickr REST API.
    Flickr = 5,
    /// Flickr REST API scoped to a single user's photostream.
    FlickrUser = 6,
}

#[derive(Error, Debug)]
#[error("Unknown API type: {0}")]
pub struct ParseApiTypeError(pub String);

impl ApiType {
    pub const ALL: [Self; 7] = [
        Self::Danbooru,
        Self::DanbooruLegacy,
        Self::Gelbooru,
        Self::Shimmie,
        Self::E621,
        Self::Flickr,
        Self::FlickrUser,
    ];

    /// Each variant can generate a specific user-agent to connect to the imageboard site.
    ///
    /// It will always follow the version declared inside ```Cargo.toml```
    #[inline]
    pub fn user_agent(self) -> String {
        let app_name = "nori";
        let variant = match self {
            Self::Danbooru => " (by danbooru user nori-rs)",
            Self::E621 => " (by e621 user nori-rs)",
            _ => "",
        };
        let ua = format!("{}/{}{}", app_name, env!("CARGO_PKG_VERSION"), variant);
        debug!("Using user-agent: {}", ua);
        ua
    }

    /// Stable identifier, used on the command line and in config files.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Danbooru => "danbooru",
            Self::DanbooruLegacy => "danbooru_legacy",
            Self::Gelbooru => "gelbooru",
            Self::Shimmie => "shimmie",
            Self::E621 => "e621",
            Self::Flickr => "flickr",
            Self::FlickrUser => "flickr_user",
        }
    }

    /// Human readable name of the API flavour.
    #[inline]
    pub const fn pretty_name(&self) -> &'static str {
        match self {
            Self::Danbooru => "Danbooru 2.x",
            Self::DanbooruLegacy => "Danbooru 1.x",
            Self::Gelbooru => "Gelbooru",
            Self::Shimmie => "Shimmie2",
            Self::E621 => "e621",
            Self::Flickr => "Flickr",
            Self::FlickrUser => "Flickr User",
        }
    }

    /// Inverse of `self as u8`.
    #[inline]
    pub const fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(Self::Danbooru),
            1 => Some(Self::DanbooruLegacy),
            2 => Some(Self::Gelbooru),
            3 => Some(Self::Shimmie),
            4 => Some(Self::E621),
            5 => Some(Self::Flickr),
            6 => Some(Self::FlickrUser),
            _ => None,
        }
    }

    /// Returns a `PathBuf` pointing to nori's configuration directory.
    ///
    /// This is XDG-compliant and saves files to
    /// `$XDG_CONFIG_HOME/nori` on Linux or
    /// `%APPDATA%/nori-rs/nori` on Windows
    ///
    /// Or you can set the env var `NORI_CONFIG_DIR` to point it to a custom location.
    pub fn config_dir() -> Result<PathBuf, io::Error> {
        let cfg_path = match env::var("NORI_CONFIG_DIR") {
            Ok(path) => PathBuf::from(path),
            Err(_) => ProjectDirs::from("com", "nori-rs", "nori")
                .map(|dirs| dirs.config_dir().to_path_buf())
                .ok_or_else(|| {
                    io::Error::new(io::ErrorKind::NotFound, "No home directory available")
                })?,
        };

        let cfold = Path::new(&cfg_path);

        if !cfold.exists() {
            create_dir_all(cfold)?;
        }

        Ok(cfold.to_path_buf())
    }
}

impl Display for ApiType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ApiType {
    type Err = ParseApiTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "danbooru" | "danbooru2" => Ok(Self::Danbooru),
            "danbooru_legacy" | "danbooru1" => Ok(Self::DanbooruLegacy),
            "gelbooru" => Ok(Self::Gelbooru),
            "shimmie" | "shimmie2" => Ok(Self::Shimmie),
            "e621" | "e926" => Ok(Self::E621),
            "flickr" => Ok(Self::Flickr),
            "flickr_user" => Ok(Self::FlickrUser),
            _ => Err(ParseApiTypeError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod test {
    use super::ApiType;
    use std::str::FromStr;

    #[test]
    fn api_type_ids_are_stable() {
        for api in ApiType::ALL {
            assert_eq!(ApiType::from_id(api as u8), Some(api));
            assert_eq!(ApiType::from_str(api.as_str()).unwrap(), api);
        }
        assert_eq!(ApiType::from_id(7), None);
    }

    #[test]
    fn api_type_aliases() {
        assert_eq!(ApiType::from_str("E926").unwrap(), ApiType::E621);
        assert_eq!(ApiType::from_str("shimmie2").unwrap(), ApiType::Shimmie);
        assert!(ApiType::from_str("moebooru").is_err());
    }
}
