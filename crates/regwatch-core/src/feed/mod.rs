mod fetcher;
mod models;
mod parser;

pub use fetcher::{FeedFetcher, HttpClientOptions};
pub use models::{FeedRecord, FilteredRecord};
pub use parser::parse_feed;
