use anyhow::{bail, Context, Result};

use regwatch_core::pdf::{PdfCache, PdfDiscoverer};
use regwatch_core::AppConfig;

use super::{load_digest, FeedArgs};

/// Open entry `ordinal` (1-based, as numbered by `list`) in the browser:
/// its PDF when one is found, otherwise the entry page.
pub async fn run(config: &AppConfig, args: &FeedArgs, ordinal: usize, page: bool) -> Result<()> {
    let mut options = args.options(config);
    let look_up_pdf = options.discover_pdfs && !page;
    // Only the chosen entry needs a lookup
    options.discover_pdfs = false;

    let digest = load_digest(config, &options, args.file.as_ref()).await?;

    let Some(entry) = digest.entry(ordinal) else {
        bail!(
            "No entry #{} ({} entries in the last {} weeks)",
            ordinal,
            digest.entries.len(),
            digest.window_weeks
        );
    };

    let link = entry.record.link();
    let pdf = if look_up_pdf {
        let discoverer = PdfDiscoverer::new(config)?;
        PdfCache::new().get_or_discover(&discoverer, link).await
    } else {
        None
    };

    let target = match pdf {
        Some(ref url) => url.as_str(),
        None if !link.is_empty() => {
            if look_up_pdf {
                println!("No PDF found, opening the entry page instead.");
            }
            link
        }
        None => bail!("Entry #{} has no link", ordinal),
    };

    println!("Opening: {}", target);
    open::that(target).with_context(|| format!("Failed to open {}", target))?;

    Ok(())
}
