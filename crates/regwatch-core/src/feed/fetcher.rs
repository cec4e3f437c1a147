use bytes::Bytes;
use std::time::Duration;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::{Client, Proxy};
use url::Url;

use crate::config::AppConfig;
use crate::error::FetchError;
use crate::{Error, Result};

// Some regulator sites reject non-browser agents outright
const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const MAX_REDIRECTS: usize = 10;

/// Settings for one HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientOptions {
    pub timeout_secs: u64,
    pub proxy_url: Option<String>,
    pub max_bytes: usize,
}

impl HttpClientOptions {
    /// Options for fetching the feed itself
    pub fn for_feed(config: &AppConfig) -> Self {
        Self {
            timeout_secs: config.feed.request_timeout_secs,
            proxy_url: config.http.proxy_url.clone(),
            max_bytes: config.feed.max_bytes,
        }
    }

    /// Options for fetching entry pages during PDF discovery
    pub fn for_pages(config: &AppConfig) -> Self {
        Self {
            timeout_secs: config.pdf.request_timeout_secs,
            proxy_url: config.http.proxy_url.clone(),
            max_bytes: config.feed.max_bytes,
        }
    }
}

/// Single-shot HTTP GET with status and size checks
#[derive(Debug, Clone)]
pub struct FeedFetcher {
    client: Client,
    max_bytes: usize,
}

impl FeedFetcher {
    /// Create a fetcher for the configured feed
    pub fn new(config: &AppConfig) -> Result<Self> {
        Self::with_options(&HttpClientOptions::for_feed(config))
    }

    pub fn with_options(options: &HttpClientOptions) -> Result<Self> {
        let client = Self::build_client(options.timeout_secs, &options.proxy_url)?;

        Ok(Self {
            client,
            max_bytes: options.max_bytes,
        })
    }

    /// Build HTTP client with optional proxy
    fn build_client(timeout_secs: u64, proxy_url: &Option<String>) -> Result<Client> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .default_headers(Self::build_headers())
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS));

        if let Some(ref proxy) = proxy_url {
            let proxy = Proxy::all(proxy)
                .map_err(|e| Error::Config(format!("Invalid proxy URL: {}", e)))?;
            builder = builder.proxy(proxy);
            tracing::info!("Using HTTP proxy for fetching");
        }

        builder
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))
    }

    /// Browser-like headers sent with every request
    fn build_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,application/rss+xml,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers
    }

    /// Fetch a URL and return the body. Any non-2xx status is an error.
    pub async fn fetch_raw(&self, url: &str) -> std::result::Result<Bytes, FetchError> {
        let parsed = Url::parse(url)?;

        tracing::debug!("GET {}", parsed);

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                url: url.to_string(),
            });
        }

        if let Some(length) = response.content_length() {
            self.ensure_content_size(length as usize, url)?;
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        // Content-Length may be missing or wrong
        self.ensure_content_size(body.len(), url)?;

        Ok(body)
    }

    fn ensure_content_size(&self, size: usize, url: &str) -> std::result::Result<(), FetchError> {
        if size > self.max_bytes {
            return Err(FetchError::BodyTooLarge {
                size,
                url: url.to_string(),
            });
        }
        Ok(())
    }
}
