//! Local state kept by nori between runs: configured services, the user's tag filter,
//! preferences and the search history.
pub use nori_clients;
pub use nori_common;

pub mod database;
pub mod error;
pub mod filter;
pub mod history;
pub mod preferences;

pub use database::{DatabaseEvent, ServiceDatabase};
pub use error::CoreError;
pub use filter::TagFilter;
pub use history::{HistoryEntry, SearchHistory};
pub use preferences::Preferences;
