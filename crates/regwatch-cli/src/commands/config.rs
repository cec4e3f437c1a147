use std::path::Path;

use anyhow::{bail, Result};

use regwatch_core::AppConfig;

/// Print the effective configuration as TOML
pub fn show(path: &Path) -> Result<()> {
    let config = if path.exists() {
        AppConfig::load_from(path)?
    } else {
        println!("# {} does not exist; showing defaults\n", path.display());
        AppConfig::default()
    };

    print!("{}", config.to_toml()?);
    Ok(())
}

/// Write the default configuration file
pub fn init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite it)",
            path.display()
        );
    }

    AppConfig::default().save_to(path)?;
    println!("Wrote default configuration to {}", path.display());

    Ok(())
}

pub fn path(path: &Path) -> Result<()> {
    println!("{}", path.display());
    Ok(())
}
