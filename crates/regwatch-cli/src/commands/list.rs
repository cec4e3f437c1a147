use anyhow::Result;

use regwatch_core::AppConfig;

use super::{load_digest, FeedArgs};
use crate::render::render_list;

pub async fn run(config: &AppConfig, args: &FeedArgs, raw: bool) -> Result<()> {
    let options = args.options(config);
    let digest = load_digest(config, &options, args.file.as_ref()).await?;

    if !digest.is_empty() {
        println!(
            "Circulars, master circulars and regulation updates from the last {} weeks ({} of {} feed entries)\n",
            digest.window_weeks,
            digest.entries.len(),
            digest.total_records
        );
    }
    print!("{}", render_list(&digest, &config.display, raw));
    if digest.is_empty() {
        println!();
    }

    Ok(())
}
