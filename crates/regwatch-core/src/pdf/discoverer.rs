use scraper::{Html, Selector};
use url::Url;

use crate::config::AppConfig;
use crate::feed::{FeedFetcher, HttpClientOptions};
use crate::Result;

/// Best-effort lookup of the document an entry page embeds.
///
/// Every failure (network, status, markup, bad URL) turns into `None`; the
/// reason only goes to the debug log.
#[derive(Debug, Clone)]
pub struct PdfDiscoverer {
    fetcher: FeedFetcher,
    unwrap_viewer_urls: bool,
}

impl PdfDiscoverer {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let fetcher = FeedFetcher::with_options(&HttpClientOptions::for_pages(config))?;
        Ok(Self::with_fetcher(fetcher, config.pdf.unwrap_viewer_urls))
    }

    pub fn with_fetcher(fetcher: FeedFetcher, unwrap_viewer_urls: bool) -> Self {
        Self {
            fetcher,
            unwrap_viewer_urls,
        }
    }

    /// Absolute URL of the first `<iframe src>` on the page
    pub async fn discover(&self, page_url: &str) -> Option<Url> {
        let base = match Url::parse(page_url) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!("Not looking up PDF for {:?}: {}", page_url, e);
                return None;
            }
        };

        let body = match self.fetcher.fetch_raw(page_url).await {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!("PDF lookup failed: {}", e);
                return None;
            }
        };

        let html = String::from_utf8_lossy(&body);
        let Some(src) = first_iframe_src(&html) else {
            tracing::debug!("No iframe on {}", page_url);
            return None;
        };

        match base.join(src.trim()) {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::debug!("Unusable iframe src {:?} on {}: {}", src, page_url, e);
                None
            }
        }
    }

    /// `discover`, keeping the result only if it points at a PDF
    pub async fn find_pdf(&self, page_url: &str) -> Option<Url> {
        let target = self.discover(page_url).await?;
        let pdf = pdf_target(target, self.unwrap_viewer_urls);

        if let Some(ref url) = pdf {
            tracing::debug!("Found PDF for {}: {}", page_url, url);
        }
        pdf
    }
}

/// `src` of the first iframe that has one
pub fn first_iframe_src(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("iframe[src]").ok()?;

    document
        .select(&selector)
        .next()
        .and_then(|frame| frame.value().attr("src"))
        .map(str::to_string)
}

/// Whether the URL path ends in `.pdf` (any case)
pub fn is_pdf_url(url: &Url) -> bool {
    url.path().to_ascii_lowercase().ends_with(".pdf")
}

fn pdf_target(target: Url, unwrap_viewer_urls: bool) -> Option<Url> {
    if is_pdf_url(&target) {
        return Some(target);
    }
    if unwrap_viewer_urls {
        return viewer_file(&target);
    }
    None
}

/// The PDF a viewer page shows through its `file` query parameter
fn viewer_file(viewer: &Url) -> Option<Url> {
    let (_, file) = viewer.query_pairs().find(|(key, _)| key == "file")?;
    let inner = viewer.join(file.trim()).ok()?;
    is_pdf_url(&inner).then_some(inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_iframe_src() {
        let html = r#"<html><body>
            <iframe title="no source"></iframe>
            <iframe src="/docs/circ.pdf"></iframe>
            <iframe src="/docs/other.pdf"></iframe>
        </body></html>"#;
        assert_eq!(first_iframe_src(html).as_deref(), Some("/docs/circ.pdf"));
    }

    #[test]
    fn test_no_iframe() {
        assert_eq!(first_iframe_src("<html><body><p>hi</p></body></html>"), None);
        assert_eq!(first_iframe_src(""), None);
    }

    #[test]
    fn test_is_pdf_url() {
        let pdf = Url::parse("https://www.sebi.gov.in/sebi_data/attachdocs/circ.PDF").unwrap();
        assert!(is_pdf_url(&pdf));

        let query_only = Url::parse("https://example.com/view?doc=a.pdf").unwrap();
        assert!(!is_pdf_url(&query_only));

        let html = Url::parse("https://example.com/page.html").unwrap();
        assert!(!is_pdf_url(&html));
    }

    #[test]
    fn test_pdf_target_unwraps_viewer() {
        let viewer = Url::parse(
            "https://www.sebi.gov.in/web/?file=https://www.sebi.gov.in/sebi_data/attachdocs/oct-2025/circ.pdf",
        )
        .unwrap();

        assert_eq!(
            pdf_target(viewer.clone(), true).map(|u| u.to_string()),
            Some("https://www.sebi.gov.in/sebi_data/attachdocs/oct-2025/circ.pdf".to_string())
        );
        assert_eq!(pdf_target(viewer, false), None);
    }

    #[test]
    fn test_pdf_target_relative_viewer_file() {
        let viewer = Url::parse("https://example.com/viewer/index.html?file=../files/a.pdf").unwrap();
        assert_eq!(
            pdf_target(viewer, true).map(|u| u.to_string()),
            Some("https://example.com/files/a.pdf".to_string())
        );
    }

    #[test]
    fn test_pdf_target_non_pdf_frame() {
        let frame = Url::parse("https://www.youtube.com/embed/xyz").unwrap();
        assert_eq!(pdf_target(frame, true), None);

        let viewer = Url::parse("https://example.com/web/?file=notes.txt").unwrap();
        assert_eq!(pdf_target(viewer, true), None);
    }
}
