//! Marquee CLI - Catalog import, backfill and search
//!
//! Thin client over the Marquee HTTP API.

mod api;
mod config;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use api::{MarqueeClient, SearchRequest};
use config::Config;

#[derive(Parser)]
#[command(name = "marquee")]
#[command(about = "Marquee CLI - Catalog import, backfill and search", long_about = None)]
#[command(version)]
struct Cli {
    /// Verbose logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Override the configured API base URL
    #[arg(long, global = true)]
    url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import the server's catalog source
    Import,

    /// Compute missing embeddings
    Backfill {
        /// Embed a single item instead of a page
        #[arg(long)]
        id: Option<String>,
        /// Keep calling until nothing is left to embed
        #[arg(long)]
        until_done: bool,
        /// Upper bound on rounds with --until-done
        #[arg(long, default_value = "100")]
        max_rounds: usize,
    },

    /// Search the catalog by meaning
    Search {
        /// Search text
        query: String,
        /// EUCLIDEAN, COSINE or DOT_PRODUCT
        #[arg(short, long, default_value = "COSINE")]
        distance: String,
        /// Max results
        #[arg(short, long, default_value = "10")]
        limit: usize,
        /// Drop weaker matches
        #[arg(short, long)]
        threshold: Option<f32>,
    },

    /// Show embedding progress
    Status,

    /// Show current configuration
    Config,

    /// Set the API base URL
    SetUrl {
        url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load()?;
    let base_url = cli.url.clone().unwrap_or_else(|| config.base_url.clone());
    tracing::debug!("Using API at {}", base_url);

    match cli.command {
        Commands::Import => cmd_import(&base_url).await,
        Commands::Backfill {
            id,
            until_done,
            max_rounds,
        } => cmd_backfill(&base_url, id, until_done, max_rounds).await,
        Commands::Search {
            query,
            distance,
            limit,
            threshold,
        } => {
            let request = SearchRequest {
                query: &query,
                distance: &distance,
                limit,
                threshold,
            };
            cmd_search(&base_url, &request).await
        }
        Commands::Status => cmd_status(&base_url).await,
        Commands::Config => cmd_config(&config),
        Commands::SetUrl { url } => cmd_set_url(config, &url).await,
    }
}

// ============================================
// Command Implementations
// ============================================

async fn cmd_import(base_url: &str) -> Result<()> {
    let client = MarqueeClient::new(base_url);
    let written = client.import().await?;
    println!("{} Imported {} items", "✓".green(), written);
    Ok(())
}

async fn cmd_backfill(
    base_url: &str,
    id: Option<String>,
    until_done: bool,
    max_rounds: usize,
) -> Result<()> {
    let client = MarqueeClient::new(base_url);

    if let Some(id) = id {
        let updated = client.recompute_item(&id).await?;
        if updated == 0 {
            println!("{} {} already embedded", "·".dimmed(), id);
        } else {
            println!("{} Embedded {}", "✓".green(), id);
        }
        return Ok(());
    }

    let mut total = 0;
    for round in 1..=max_rounds {
        let updated = client.recompute().await?;
        total += updated;
        tracing::info!("Round {} updated {} items", round, updated);
        println!("  round {}: {} items", round, updated);

        if !until_done || updated == 0 {
            break;
        }
        if round == max_rounds {
            println!(
                "{} Stopped after {} rounds; items may still be pending",
                "!".yellow(),
                max_rounds
            );
        }
    }

    println!("{} Updated {} items", "✓".green(), total);
    Ok(())
}

async fn cmd_search(base_url: &str, request: &SearchRequest<'_>) -> Result<()> {
    let client = MarqueeClient::new(base_url);
    let matches = client.search(request).await?;

    if matches.is_empty() {
        println!("{}", "No matches".dimmed());
        return Ok(());
    }

    for (rank, item) in matches.iter().enumerate() {
        println!(
            "{:>3}. {} {}",
            rank + 1,
            item.title.bold(),
            format!("({:.4})", item.vector_distance).dimmed()
        );
        if !item.genres.is_empty() {
            println!("     {}", item.genres.join(", ").cyan());
        }
        if !item.summary.is_empty() {
            println!("     {}", item.summary);
        }
        if !item.cast.is_empty() {
            println!("     {}", item.cast.join(", ").dimmed());
        }
        tracing::debug!("match id {}", item.id);
    }

    Ok(())
}

async fn cmd_status(base_url: &str) -> Result<()> {
    let client = MarqueeClient::new(base_url);
    let status = client.status().await?;

    println!("{}", "Catalog".bold());
    println!("  total:    {}", status.total);
    println!("  embedded: {}", status.embedded.to_string().green());
    println!("  pending:  {}", status.pending.to_string().yellow());
    Ok(())
}

fn cmd_config(config: &Config) -> Result<()> {
    println!("{}", "Configuration".bold());
    println!("  path:     {:?}", Config::config_path()?);
    println!("  base_url: {}", config.base_url);
    Ok(())
}

async fn cmd_set_url(mut config: Config, url: &str) -> Result<()> {
    config.set_base_url(url);

    let client = MarqueeClient::new(&config.base_url);
    print!("Testing connection... ");

    match client.health().await {
        Ok(true) => println!("{}", "OK".green()),
        _ => {
            println!("{}", "Failed".red());
            bail!("Could not reach Marquee API at {}", config.base_url);
        }
    }

    config.save()?;
    println!("{} Base URL saved to {:?}", "✓".green(), Config::config_path()?);
    Ok(())
}
