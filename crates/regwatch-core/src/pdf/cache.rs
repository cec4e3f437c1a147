use std::collections::HashMap;
use std::sync::Arc;

use tokio::task::JoinSet;
use url::Url;

use super::discoverer::PdfDiscoverer;
use super::PdfStatus;

/// PDF lookups for one run, keyed by entry link. Each link is fetched at most once.
#[derive(Debug, Clone, Default)]
pub struct PdfCache {
    entries: HashMap<String, Option<Url>>,
}

impl PdfCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, link: &str) -> bool {
        self.entries.contains_key(link)
    }

    pub fn insert(&mut self, link: impl Into<String>, pdf: Option<Url>) {
        self.entries.insert(link.into(), pdf);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Status of a link; links never looked up count as not found
    pub fn status(&self, link: &str) -> PdfStatus {
        match self.entries.get(link) {
            Some(Some(url)) => PdfStatus::Found(url.clone()),
            _ => PdfStatus::NotFound,
        }
    }

    /// Cached result, or look the link up now and remember it
    pub async fn get_or_discover(&mut self, discoverer: &PdfDiscoverer, link: &str) -> Option<Url> {
        if let Some(cached) = self.entries.get(link) {
            return cached.clone();
        }

        let pdf = if link.is_empty() {
            None
        } else {
            discoverer.find_pdf(link).await
        };
        self.entries.insert(link.to_string(), pdf.clone());
        pdf
    }
}

/// Look up every link not yet in the cache, at most `concurrency` at a time
pub async fn resolve_all<'a, I>(
    discoverer: Arc<PdfDiscoverer>,
    links: I,
    concurrency: usize,
    cache: &mut PdfCache,
) where
    I: IntoIterator<Item = &'a str>,
{
    let mut pending: Vec<String> = Vec::new();
    for link in links {
        if link.is_empty() {
            cache.insert(link, None);
        } else if !cache.contains(link) && !pending.iter().any(|p| p == link) {
            pending.push(link.to_string());
        }
    }

    if pending.is_empty() {
        return;
    }

    tracing::info!("Looking up PDFs for {} entries", pending.len());

    let mut join_set: JoinSet<(String, Option<Url>)> = JoinSet::new();
    let mut iter = pending.into_iter();

    fn spawn_task(
        join_set: &mut JoinSet<(String, Option<Url>)>,
        discoverer: Arc<PdfDiscoverer>,
        link: String,
    ) {
        join_set.spawn(async move {
            let pdf = discoverer.find_pdf(&link).await;
            (link, pdf)
        });
    }

    for _ in 0..concurrency.max(1) {
        if let Some(link) = iter.next() {
            spawn_task(&mut join_set, Arc::clone(&discoverer), link);
        }
    }

    let mut found = 0;
    while let Some(result) = join_set.join_next().await {
        match result {
            Ok((link, pdf)) => {
                if pdf.is_some() {
                    found += 1;
                }
                cache.insert(link, pdf);
            }
            Err(e) => {
                tracing::warn!("PDF lookup task failed: {}", e);
            }
        }

        if let Some(link) = iter.next() {
            spawn_task(&mut join_set, Arc::clone(&discoverer), link);
        }
    }

    tracing::info!("Found {} PDFs", found);
}
