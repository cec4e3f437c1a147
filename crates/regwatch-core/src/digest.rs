use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::feed::{parse_feed, FeedFetcher, FeedRecord, FilteredRecord};
use crate::filter::{select, KeywordMatcher, Selection};
use crate::pdf::{resolve_all, PdfCache, PdfDiscoverer, PdfStatus};
use crate::Result;

/// Per-run choices layered over the configuration
#[derive(Debug, Clone)]
pub struct DigestOptions {
    pub feed_url: String,
    pub window_weeks: u32,
    pub discover_pdfs: bool,
    pub now: DateTime<Utc>,
}

impl DigestOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            feed_url: config.feed.url.clone(),
            window_weeks: config.filter.window_weeks,
            discover_pdfs: config.pdf.enabled,
            now: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigestEntry {
    #[serde(flatten)]
    pub record: FilteredRecord,
    pub pdf: PdfStatus,
}

/// Filtered, newest-first view of one feed fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Digest {
    pub feed_url: String,
    pub window_weeks: u32,
    pub generated_at: DateTime<Utc>,
    pub cutoff: DateTime<Utc>,
    /// Records in the feed before filtering
    pub total_records: usize,
    pub entries: Vec<DigestEntry>,
}

impl Digest {
    /// Select entries from already-parsed records; PDF status comes from `pdfs`
    /// or is `Skipped` when no cache is given.
    pub fn from_records(
        records: &[FeedRecord],
        options: &DigestOptions,
        matcher: &KeywordMatcher,
        pdfs: Option<&PdfCache>,
    ) -> Self {
        let selection = Selection::new(options.window_weeks, options.now);
        let entries = select(records, &selection, matcher)
            .into_iter()
            .map(|record| {
                let pdf = match pdfs {
                    Some(cache) => cache.status(record.link()),
                    None => PdfStatus::Skipped,
                };
                DigestEntry { record, pdf }
            })
            .collect();

        Self {
            feed_url: options.feed_url.clone(),
            window_weeks: options.window_weeks,
            generated_at: options.now,
            cutoff: selection.cutoff(),
            total_records: records.len(),
            entries,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 1-based lookup, matching the numbering shown to users
    pub fn entry(&self, ordinal: usize) -> Option<&DigestEntry> {
        ordinal.checked_sub(1).and_then(|i| self.entries.get(i))
    }
}

/// Fetch the feed and build a digest
pub async fn build_digest(config: &AppConfig, options: &DigestOptions) -> Result<Digest> {
    tracing::info!("Fetching feed from: {}", options.feed_url);

    let fetcher = FeedFetcher::new(config)?;
    let content = fetcher.fetch_raw(&options.feed_url).await?;

    build_digest_from_bytes(config, options, &content).await
}

/// Build a digest from feed bytes obtained elsewhere (a file, a test fixture)
pub async fn build_digest_from_bytes(
    config: &AppConfig,
    options: &DigestOptions,
    content: &[u8],
) -> Result<Digest> {
    let records = parse_feed(content)?;
    let matcher = KeywordMatcher::new(&config.filter.keywords)?;

    let mut digest = Digest::from_records(&records, options, &matcher, None);

    if options.discover_pdfs && !digest.is_empty() {
        let discoverer = Arc::new(PdfDiscoverer::new(config)?);
        let mut cache = PdfCache::new();

        resolve_all(
            discoverer,
            digest.entries.iter().map(|e| e.record.link()),
            config.pdf.concurrency,
            &mut cache,
        )
        .await;

        for entry in &mut digest.entries {
            entry.pdf = cache.status(entry.record.link());
        }
    }

    Ok(digest)
}
