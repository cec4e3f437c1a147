use anyhow::Result;

use regwatch_core::AppConfig;

use super::{load_digest, FeedArgs};

pub async fn run(config: &AppConfig, args: &FeedArgs) -> Result<()> {
    let options = args.options(config);
    let digest = load_digest(config, &options, args.file.as_ref()).await?;

    println!("{}", serde_json::to_string_pretty(&digest)?);

    Ok(())
}
