mod cache;
mod discoverer;

use serde::{Deserialize, Serialize};
use url::Url;

pub use cache::{resolve_all, PdfCache};
pub use discoverer::{first_iframe_src, is_pdf_url, PdfDiscoverer};

/// What is known about the PDF behind an entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "url", rename_all = "snake_case")]
pub enum PdfStatus {
    Found(Url),
    NotFound,
    /// Lookup was turned off for this run
    Skipped,
}

impl PdfStatus {
    pub fn url(&self) -> Option<&Url> {
        match self {
            Self::Found(url) => Some(url),
            _ => None,
        }
    }
}
