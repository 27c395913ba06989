use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bing_image_client::BingImageClient;
use platepic_common::Config;
use platepic_fetcher::aliases::{AliasConfig, AliasResolver};
use platepic_fetcher::downloader::HttpDownloader;
use platepic_fetcher::fetcher::{FetchPaths, ImageFetcher};
use platepic_fetcher::names::{collect_names, NameSource};
use platepic_fetcher::providers::{PrimaryChain, SecondaryChain};
use platepic_fetcher::traits::ImageSearch;
use wikipedia_client::WikipediaClient;

#[derive(Parser)]
#[command(name = "platepic-fetcher", about = "Fetch dish images from Wikipedia and Bing")]
struct Cli {
    /// Project root; every other path is relative to it
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Plain-text list of dish names, one per line
    #[arg(long, default_value = "assets/recipes/seed_names.txt")]
    names: PathBuf,

    /// JSON array of seed records with a `name` field
    #[arg(long, default_value = "assets/recipes/seed_more.json")]
    seed: PathBuf,

    /// Persisted name -> image path mapping
    #[arg(long, default_value = "assets/recipes/images.json")]
    mapping: PathBuf,

    /// Directory downloaded images are written to
    #[arg(long, default_value = "assets/images")]
    image_dir: PathBuf,

    /// Directory for report.csv and report.md
    #[arg(long, default_value = "assets/recipes/reports")]
    report_dir: PathBuf,

    /// JSON object of dish name -> alias titles, replacing the built-in table
    #[arg(long)]
    aliases: Option<PathBuf>,

    #[arg(long, default_value = "platepic-image-fetcher/0.1 (dish image sync)")]
    user_agent: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("platepic=info".parse()?))
        .init();

    let cli = Cli::parse();

    let config = Config::from_env()?;
    config.log_redacted();

    let names = collect_names(&[
        NameSource::LineList(cli.root.join(&cli.names)),
        NameSource::SeedRecords(cli.root.join(&cli.seed)),
    ])?;
    if names.is_empty() {
        info!("No dish names found, nothing to do");
        return Ok(());
    }

    let alias_config = match &cli.aliases {
        Some(path) => AliasConfig::default().with_alias_file(&cli.root.join(path))?,
        None => AliasConfig::default(),
    };

    let wikipedia =
        WikipediaClient::new(&cli.user_agent).context("Failed to build Wikipedia client")?;

    let search: Option<Arc<dyn ImageSearch>> = match &config.bing_api_key {
        Some(key) => {
            let client = BingImageClient::new(key, config.bing_search_options())
                .context("Failed to build Bing client")?;
            Some(Arc::new(client) as Arc<dyn ImageSearch>)
        }
        None => {
            info!("BING_IMAGE_KEY not set, image search fallback disabled");
            None
        }
    };

    let fetcher = ImageFetcher::new(
        AliasResolver::new(alias_config),
        PrimaryChain::new(Arc::new(wikipedia)),
        SecondaryChain::new(search),
        Arc::new(HttpDownloader::new(&cli.user_agent)?),
        FetchPaths {
            root: cli.root.clone(),
            mapping: cli.mapping,
            image_dir: cli.image_dir,
            report_dir: cli.report_dir,
        },
    );

    let outcome = fetcher.run(&names).await?;
    info!(
        mapping_size = outcome.mapping_size,
        csv = %outcome.report.csv.display(),
        "Done. {}",
        outcome.summary
    );

    Ok(())
}
