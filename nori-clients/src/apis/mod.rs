//! One module per supported API, each providing a [`SiteApi`](crate::client::SiteApi)
//! implementation and the serde models of its responses.
pub mod danbooru;
pub mod danbooru_legacy;
pub mod e621;
pub mod flickr;
pub mod gelbooru;
pub mod shimmie;

pub mod prelude;
