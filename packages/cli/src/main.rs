#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the Trustpilot review source.
//!
//! Sources the review and business nodes for one business, mirrors their
//! rating glyphs into a local cache, and prints the finished nodes as JSON.
//! Set `RUST_LOG=info` (or `debug`) to follow progress.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::sync::mpsc;
use trust_reviews_source::lifecycle::source_nodes;
use trust_reviews_source::mirror::mirror_created_nodes;
use trust_reviews_source::{
    ChannelNodeStore, FsRemoteFileCache, HttpFetcher, Node, RemoteFileCache,
};
use trust_reviews_source_models::{BusinessNames, SourceOptions};

#[derive(Parser)]
#[command(name = "trust_reviews", about = "Fetch Trustpilot reviews as structured nodes")]
struct Cli {
    /// TOML file with `country`, `business`, `languages` and `stars` keys
    #[arg(long)]
    config: Option<PathBuf>,
    /// Two-letter site locale (default: "www", no locale prefix)
    #[arg(long)]
    country: Option<String>,
    /// Business identifier on the review site (e.g. "acme.com")
    #[arg(long)]
    business: Option<String>,
    /// Two-letter review language filter (default: "all")
    #[arg(long)]
    languages: Option<String>,
    /// Comma-separated star ratings to fetch (e.g. "4,5")
    #[arg(long, value_delimiter = ',')]
    stars: Option<Vec<u8>>,
    /// Directory for mirrored rating images
    #[arg(long, default_value = ".cache/trust_reviews")]
    cache_dir: PathBuf,
    /// Skip mirroring rating images
    #[arg(long)]
    no_mirror: bool,
    /// Write nodes to this file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

impl Cli {
    /// Options from the config file (or defaults), overridden by flags.
    fn options(&self) -> Result<SourceOptions, Box<dyn std::error::Error>> {
        let mut options = match &self.config {
            Some(path) => SourceOptions::from_toml_str(&std::fs::read_to_string(path)?)?,
            None => SourceOptions::default(),
        };

        if let Some(country) = &self.country {
            country.clone_into(&mut options.country);
        }
        if let Some(business) = &self.business {
            business.clone_into(&mut options.business);
        }
        if let Some(languages) = &self.languages {
            languages.clone_into(&mut options.languages);
        }
        if let Some(stars) = &self.stars {
            stars.clone_into(&mut options.stars);
        }

        options.validate()?;
        Ok(options)
    }
}

/// Collects created nodes as-is.
async fn collect_nodes(mut created: mpsc::UnboundedReceiver<Node>) -> Vec<Node> {
    let mut nodes = Vec::new();
    while let Some(node) = created.recv().await {
        nodes.push(node);
    }
    nodes
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let options = cli.options()?;
    let names = Arc::new(BusinessNames::from_business(&options.business)?);

    let (store, created) = ChannelNodeStore::new();
    let consumer = if cli.no_mirror {
        tokio::spawn(collect_nodes(created))
    } else {
        let cache: Arc<dyn RemoteFileCache> = Arc::new(FsRemoteFileCache::new(&cli.cache_dir));
        log::info!("Mirroring rating images into {}", cli.cache_dir.display());
        tokio::spawn(mirror_created_nodes(created, Arc::clone(&names), cache))
    };

    let report = source_nodes(&options, &HttpFetcher::new(), &store).await;
    // Closing the channel lets the consumer finish.
    drop(store);
    let nodes = consumer.await?;
    let report = report?;

    if report.is_empty() {
        log::warn!("[{}] No nodes created", names.slug);
    }

    let json = serde_json::to_string_pretty(&nodes)?;
    match &cli.output {
        Some(path) => {
            std::fs::write(path, json)?;
            log::info!("Wrote {} nodes to {}", nodes.len(), path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}
