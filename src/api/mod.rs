pub mod client;
pub mod fetcher;
pub mod schedule;
pub mod types;
