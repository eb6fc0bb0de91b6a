use clap::Parser;
use feedbridge::config::Config;
use feedbridge::logging::init_tracing;
use feedbridge::store::{FeedStore, MemoryFeedStore};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "feedbridge", version, about = "Terminal reader for a feed store")]
struct Cli {
    /// Config file (default: ~/.config/feedbridge/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print state summaries to stdout instead of drawing the TUI
    #[arg(long)]
    headless: bool,

    /// Ticks to run in headless mode
    #[arg(long, default_value_t = 8, requires = "headless")]
    ticks: u32,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    tracing::info!(headless = cli.headless, "starting feedbridge");

    let memory = MemoryFeedStore::from_settings(&config.store);
    let store: Arc<dyn FeedStore> = memory.clone();

    let result = if cli.headless {
        let mut stdout = std::io::stdout().lock();
        feedbridge::ui::run_headless(store, &config, cli.ticks, &mut stdout)
    } else {
        feedbridge::ui::run(store, &config)
    };

    memory.shutdown();
    result
}
