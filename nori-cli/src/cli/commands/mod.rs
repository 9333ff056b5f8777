pub mod filter;
pub mod history;
pub mod search;
pub mod services;
