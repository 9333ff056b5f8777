pub use super::danbooru::DanbooruApi;
pub use super::danbooru_legacy::DanbooruLegacyApi;
pub use super::e621::E621Api;
pub use super::flickr::{FlickrApi, FlickrUserApi};
pub use super::gelbooru::GelbooruApi;
pub use super::shimmie::ShimmieApi;
