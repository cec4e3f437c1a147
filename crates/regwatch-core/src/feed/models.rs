use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One `item` of the feed, as written upstream
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedRecord {
    pub title: String,
    pub link: String,
    pub pub_date_raw: String,
    /// May contain HTML markup
    pub description: String,
}

/// A record that passed the date, window and keyword checks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilteredRecord {
    #[serde(flatten)]
    pub record: FeedRecord,
    pub pub_date: DateTime<Utc>,
}

impl FilteredRecord {
    pub fn title(&self) -> &str {
        &self.record.title
    }

    pub fn link(&self) -> &str {
        &self.record.link
    }

    pub fn description(&self) -> &str {
        &self.record.description
    }
}
