use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use regwatch_core::AppConfig;

mod commands;
mod render;

use commands::FeedArgs;

#[derive(Parser)]
#[command(name = "regwatch")]
#[command(author, version, about = "Recent regulatory circulars, regulations and amendments from an RSS feed")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file (defaults to ~/.config/regwatch/config.toml)
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show matching entries with their PDFs (default)
    List {
        #[command(flatten)]
        feed: FeedArgs,
        /// Print descriptions as-is instead of converting HTML to text
        #[arg(long)]
        raw: bool,
    },
    /// Show matching entries as a table
    Table {
        #[command(flatten)]
        feed: FeedArgs,
    },
    /// Print the digest as JSON
    Json {
        #[command(flatten)]
        feed: FeedArgs,
    },
    /// Open an entry's PDF (or its page) in the browser
    Open {
        /// Entry number as shown by `list`
        index: usize,
        /// Open the entry page even when a PDF exists
        #[arg(long)]
        page: bool,
        #[command(flatten)]
        feed: FeedArgs,
    },
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the configuration file path
    Path,
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // stdout is reserved for the digest
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn run_config(action: ConfigAction, path: &Path) -> Result<()> {
    match action {
        ConfigAction::Show => commands::config::show(path),
        ConfigAction::Init { force } => commands::config::init(path, force),
        ConfigAction::Path => commands::config::path(path),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(AppConfig::config_path);

    let command = cli.command.unwrap_or(Commands::List {
        feed: FeedArgs::default(),
        raw: false,
    });

    // Config commands must work even when the file is broken
    let command = match command {
        Commands::Config { action } => return run_config(action, &config_path),
        command => command,
    };

    let config = if config_path.exists() {
        AppConfig::load_from(&config_path)?
    } else {
        AppConfig::default()
    };

    init_logging(&config.general.log_level);

    match command {
        Commands::List { feed, raw } => commands::list::run(&config, &feed, raw).await,
        Commands::Table { feed } => commands::table::run(&config, &feed).await,
        Commands::Json { feed } => commands::json::run(&config, &feed).await,
        Commands::Open { index, page, feed } => {
            commands::open::run(&config, &feed, index, page).await
        }
        Commands::Config { action } => run_config(action, &config_path),
    }
}
