mod date;
mod keywords;
mod recency;

pub use date::parse_date;
pub use keywords::KeywordMatcher;
pub use recency::{select, Selection};
