use anyhow::Result;

use regwatch_core::AppConfig;

use super::{load_digest, FeedArgs};
use crate::render::render_table;

pub async fn run(config: &AppConfig, args: &FeedArgs) -> Result<()> {
    let options = args.options(config);
    let digest = load_digest(config, &options, args.file.as_ref()).await?;

    print!("{}", render_table(&digest, &config.display));
    if digest.is_empty() {
        println!();
    }

    Ok(())
}
