//! Search clients for imageboards and photo sites.
//!
//! Every supported API implements [`SiteApi`](client::SiteApi) and is driven by a generic
//! [`SearchClient`](client::SearchClient). [`ServiceClient`](client::dispatch::ServiceClient)
//! picks the right one at runtime from stored [`Settings`](settings::Settings).

pub use nori_common;

pub mod apis;
pub mod client;
pub mod detect;
pub mod error;
pub mod prelude;
pub mod settings;

#[cfg(test)]
mod test_server;
