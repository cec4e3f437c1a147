pub mod config;
pub mod json;
pub mod list;
pub mod open;
pub mod table;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use regwatch_core::{build_digest, build_digest_from_bytes, AppConfig, Digest, DigestOptions};

/// Flags shared by every command that reads the feed
#[derive(Args, Debug, Clone, Default)]
pub struct FeedArgs {
    /// Feed URL (defaults to feed.url from the config)
    #[arg(long)]
    pub url: Option<String>,
    /// Trailing window in weeks
    #[arg(short = 'w', long, value_parser = clap::value_parser!(u32).range(1..))]
    pub weeks: Option<u32>,
    /// Skip PDF lookup on entry pages
    #[arg(long)]
    pub no_pdf: bool,
    /// Read the feed from a local file instead of fetching it
    #[arg(short = 'f', long)]
    pub file: Option<PathBuf>,
}

impl FeedArgs {
    pub fn options(&self, config: &AppConfig) -> DigestOptions {
        let mut options = DigestOptions::from_config(config);
        if let Some(ref url) = self.url {
            options.feed_url = url.clone();
        }
        if let Some(weeks) = self.weeks {
            options.window_weeks = weeks;
        }
        if self.no_pdf {
            options.discover_pdfs = false;
        }
        options
    }
}

/// Fetch (or read) the feed and build the digest. Any failure here aborts the command.
pub async fn load_digest(config: &AppConfig, options: &DigestOptions, file: Option<&PathBuf>) -> Result<Digest> {
    let digest = match file {
        Some(path) => {
            tracing::info!("Reading feed from file: {}", path.display());
            let content = std::fs::read(path)
                .with_context(|| format!("Failed to read feed file {}", path.display()))?;
            build_digest_from_bytes(config, options, &content).await
        }
        None => build_digest(config, options).await,
    };

    digest.context("Failed to fetch or parse feed")
}
