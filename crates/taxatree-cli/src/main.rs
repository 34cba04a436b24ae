mod chart;
mod export;
mod serve;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{eyre, Result};
use indicatif::ProgressBar;
use tracing_subscriber::EnvFilter;

use taxatree_core::config::{group_filter, TAXON_GROUPS};
use taxatree_core::{
    Config, FileCache, INaturalistClient, TaxonRank, TaxonomyTree, TreeCache, TreeFilter,
    TreeOutcome, TreePipeline, TreeRequest,
};

#[derive(Parser)]
#[command(name = "taxatree")]
#[command(about = "Phylogenetic tree viewer for iNaturalist observations", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the interactive tree viewer in the browser
    Serve {
        /// iNaturalist username to visualize
        username: String,

        /// Port to listen on
        #[arg(short, long, default_value_t = 3333)]
        port: u16,

        /// Do not open the browser automatically
        #[arg(long)]
        no_open: bool,
    },
    /// Export a user's tree to an SVG or JSON file
    Export {
        /// iNaturalist username to visualize
        username: String,

        /// Restrict to a taxonomic group (e.g. insects, fungi, plants)
        #[arg(short, long)]
        group: Option<String>,

        /// Output file; the extension picks the format (.svg or .json)
        #[arg(short, long, default_value = "taxatree.svg")]
        output: PathBuf,

        /// Refetch observations instead of using the cache
        #[arg(long)]
        refresh: bool,
    },
    /// Print summary statistics for a user's tree
    Stats {
        /// iNaturalist username to summarize
        username: String,

        /// Restrict to a taxonomic group (e.g. insects, fungi, plants)
        #[arg(short, long)]
        group: Option<String>,

        /// Refetch observations instead of using the cache
        #[arg(long)]
        refresh: bool,
    },
    /// Remove all cached trees
    ClearCache,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Serve {
            username,
            port,
            no_open,
        } => {
            let pipeline = build_pipeline(&config);
            let serve_config = serve::ServeConfig {
                port,
                open_browser: !no_open,
            };
            serve::start_server(pipeline, config.layout.clone(), username, serve_config).await?;
        }
        Commands::Export {
            username,
            group,
            output,
            refresh,
        } => {
            let filter = resolve_group(group.as_deref())?;
            let pipeline = build_pipeline(&config);
            let request = TreeRequest {
                username,
                filter,
                refresh,
            };
            let outcome = run_with_spinner(&pipeline, &request).await?;
            report(&outcome);

            if outcome.tree.is_empty() {
                println!("No observations found. Nothing to export.");
                return Ok(());
            }
            export::write_chart(&outcome.tree, &config.layout, &output)?;
            println!("Wrote {}", output.display());
        }
        Commands::Stats {
            username,
            group,
            refresh,
        } => {
            let filter = resolve_group(group.as_deref())?;
            let pipeline = build_pipeline(&config);
            let request = TreeRequest {
                username,
                filter,
                refresh,
            };
            let outcome = run_with_spinner(&pipeline, &request).await?;
            report(&outcome);
            print_stats(&outcome.tree);
        }
        Commands::ClearCache => {
            let cache = FileCache::new(&config.cache);
            cache.clear()?;
            println!("Cache cleared.");
        }
    }

    Ok(())
}

fn build_pipeline(config: &Config) -> TreePipeline<INaturalistClient, FileCache> {
    let client = INaturalistClient::new()
        .with_base_url(config.api.base_url.clone())
        .with_per_page(config.api.per_page)
        .with_page_delay(Duration::from_millis(config.api.page_delay_ms))
        .with_taxon_delay(Duration::from_millis(config.api.taxon_delay_ms));
    let cache = FileCache::new(&config.cache);
    TreePipeline::new(client, cache)
}

fn resolve_group(group: Option<&str>) -> Result<Option<TreeFilter>> {
    let Some(name) = group else {
        return Ok(None);
    };
    match group_filter(name) {
        Some(filter) => Ok(Some(filter)),
        None => {
            let known: Vec<&str> = TAXON_GROUPS.iter().map(|(group, _, _)| *group).collect();
            Err(eyre!(
                "unknown taxonomic group '{}'; known groups: {}",
                name,
                known.join(", ")
            ))
        }
    }
}

async fn run_with_spinner(
    pipeline: &TreePipeline<INaturalistClient, FileCache>,
    request: &TreeRequest,
) -> Result<TreeOutcome> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_message(format!("Building tree for {}...", request.username));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let outcome = pipeline.build(request).await;

    spinner.finish_and_clear();
    Ok(outcome?)
}

fn report(outcome: &TreeOutcome) {
    if outcome.from_cache {
        println!(
            "Using cached tree from {}",
            outcome.fetched_at.format("%Y-%m-%d %H:%M UTC")
        );
    } else if let Some(count) = outcome.observation_count {
        println!("Fetched {} observations", count);
    }
}

fn print_stats(tree: &TaxonomyTree) {
    println!("Total Species:   {}", tree.species_count());
    println!("Unique Families: {}", tree.rank_count(TaxonRank::Family));
    println!("Unique Orders:   {}", tree.rank_count(TaxonRank::Order));
}
