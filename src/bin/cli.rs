//! jobsuche CLI
//!
//! Runs a search from the command line, prints the results and optionally
//! writes them to a CSV file.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use jobsuche::{
    error::Result,
    export,
    models::{Config, SearchQuery},
    pipeline::{self, SearchOptions},
    source::HttpJobSource,
};

/// jobsuche - Job search with contact emails
#[derive(Parser, Debug)]
#[command(
    name = "jobsuche",
    version,
    about = "Aggregates job postings and enriches them with contact emails"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search, enrich and display job postings
    Search(SearchArgs),

    /// Validate the configuration file
    Validate,
}

#[derive(Args, Debug)]
struct SearchArgs {
    /// Comma-separated keywords (default from config)
    #[arg(short, long)]
    keywords: Option<String>,

    /// Postal code and/or town
    #[arg(short, long)]
    location: Option<String>,

    /// Search radius in km
    #[arg(short, long)]
    radius: Option<u32>,

    /// Keep postings from temporary-staffing agencies
    #[arg(long)]
    include_agencies: bool,

    /// Only list postings where a contact email was found
    #[arg(long)]
    email_only: bool,

    /// Override limits.max_pages
    #[arg(long)]
    max_pages: Option<usize>,

    /// Override limits.max_details
    #[arg(long)]
    max_details: Option<usize>,

    /// Override http.max_concurrent
    #[arg(long)]
    concurrency: Option<usize>,

    /// Disable TLS certificate validation
    #[arg(long)]
    insecure: bool,

    /// One line per record, e.g. "{title} | {employer} | {email}"
    #[arg(long)]
    format: Option<String>,

    /// Write a CSV file (name from config when given without a value)
    #[arg(short, long, num_args = 0..=1, default_missing_value = "")]
    export: Option<String>,

    /// Directory for the CSV file
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Apply command-line overrides on top of the loaded configuration.
fn apply_overrides(config: &mut Config, args: &SearchArgs) {
    if let Some(max_pages) = args.max_pages {
        config.limits.max_pages = max_pages;
    }
    if let Some(max_details) = args.max_details {
        config.limits.max_details = max_details;
    }
    if let Some(concurrency) = args.concurrency {
        config.http.max_concurrent = concurrency;
    }
    if args.insecure {
        config.http.accept_invalid_certs = true;
    }
}

/// Configured query defaults with command-line values on top.
fn build_query(config: &Config, args: &SearchArgs) -> SearchQuery {
    let mut query = SearchQuery::from_defaults(&config.defaults);
    if let Some(keywords) = &args.keywords {
        query.keywords = SearchQuery::split_keywords(keywords);
    }
    if let Some(location) = &args.location {
        query.location = location.clone();
    }
    if let Some(radius) = args.radius {
        query.radius_km = radius;
    }
    if args.include_agencies {
        query.exclude_staffing_agencies = false;
    }
    query
}

async fn search(mut config: Config, args: SearchArgs) -> Result<()> {
    apply_overrides(&mut config, &args);
    let query = build_query(&config, &args);
    let source = HttpJobSource::new(&config)?;

    let options = SearchOptions {
        email_only: args.email_only,
    };
    let result = pipeline::search_or_empty(&config, &source, &query, options).await;

    match &args.format {
        Some(template) => {
            for record in &result.records {
                println!("{}", record.format(template));
            }
        }
        None => print!("{}", export::render_table(&result.records)),
    }

    if let Some(requested) = &args.export {
        let name = export::export_file_name(requested, &config.defaults.export_file);
        if result.is_empty() {
            log::warn!("No results, skipping export to {name}");
        } else {
            export::write_csv_file(&result.records, &args.output_dir, &name)?;
        }
    }

    log::info!(
        "Keywords: {}, page requests: {}, unique jobs: {}, detail requests: {}, emails: {}",
        result.stats.keyword_count,
        result.stats.page_requests,
        result.stats.unique_jobs,
        result.stats.detail_requests,
        result.stats.emails_found
    );

    Ok(())
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Search(args) => search(Config::load_or_default(&cli.config), args).await?,

        Command::Validate => {
            log::info!("Validating {}...", cli.config.display());
            let config = Config::load(&cli.config)?;

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");
        }
    }

    Ok(())
}
