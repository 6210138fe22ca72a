//! shopscanner - Photograph a product, find where it is sold cheapest

use anyhow::Result;
use clap::{Parser, Subcommand};
use shopscanner::commands::{scan, ScanCommand, SearchCommand};
use shopscanner::config::{Config, OutputFormat};
use shopscanner::output::Output;
use shopscanner::server;
use shopscanner::shopping::SortBy;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "shopscanner",
    version,
    about = "Identify a product from a photo and find the cheapest offers",
    long_about = "Sends a product photo to a vision model, searches shopping offers for the \
                  identified product and lists them from cheapest to most expensive."
)]
struct Cli {
    /// Market to search (us, in, uk, ...)
    #[arg(long, global = true, env = "SHOPSCANNER_COUNTRY")]
    country: Option<String>,

    /// Sort directive sent to the search API
    #[arg(long, global = true)]
    sort: Option<SortBy>,

    /// Output format
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    /// Proxy URL (e.g., socks5://host:port)
    #[arg(long, global = true, env = "SHOPSCANNER_PROXY")]
    proxy: Option<String>,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Identify a product photo and search offers for it (default)
    Scan {
        /// Image file; prompts for one when omitted
        image: Option<PathBuf>,

        #[command(flatten)]
        limits: Limits,
    },

    /// Search offers for a text query, skipping identification
    #[command(alias = "s")]
    Search {
        /// Search query
        query: String,

        #[command(flatten)]
        limits: Limits,
    },

    /// Run the web backend
    Serve {
        /// Address to listen on
        #[arg(long, env = "SHOPSCANNER_BIND")]
        bind: Option<String>,
    },
}

#[derive(clap::Args)]
struct Limits {
    /// Maximum number of results
    #[arg(short, long)]
    max: Option<usize>,

    /// Minimum price filter
    #[arg(long)]
    min_price: Option<f64>,

    /// Maximum price filter
    #[arg(long)]
    max_price: Option<f64>,
}

impl Limits {
    fn apply(self, config: &mut Config) {
        if let Some(max) = self.max {
            config.max_results = Some(max);
        }
        if let Some(min) = self.min_price {
            config.min_price = Some(min);
        }
        if let Some(max) = self.max_price {
            config.max_price = Some(max);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // The web backend logs requests at INFO, the CLI stays quiet
    let default_level = match cli.command {
        Some(Commands::Serve { .. }) => Level::INFO,
        _ => Level::WARN,
    };
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(default_level.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    tokio::select! {
        biased;
        _ = tokio::signal::ctrl_c() => exit_on_interrupt(),
        result = run(cli) => result,
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    // Apply CLI overrides
    if let Some(country) = cli.country {
        config.country = country.trim().to_lowercase();
    }
    if let Some(sort) = cli.sort {
        config.sort_by = sort;
    }
    if let Some(format) = cli.format {
        config.format = format;
    }
    if let Some(proxy) = cli.proxy {
        config.proxy = Some(proxy);
    }

    // Keep stdout clean for machine-readable formats
    let output = Output::new(config.format != OutputFormat::Table);

    let command = cli.command.unwrap_or(Commands::Scan {
        image: None,
        limits: Limits { max: None, min_price: None, max_price: None },
    });

    match command {
        Commands::Scan { image, limits } => {
            limits.apply(&mut config);
            output.banner();

            let image = match image {
                Some(path) => scan::clean_path(&path.to_string_lossy()),
                None => match tokio::task::spawn_blocking(scan::prompt_image_path).await?? {
                    Some(path) => path,
                    None => exit_on_interrupt(),
                },
            };

            let cmd = ScanCommand::new(config, output);
            print_non_empty(&cmd.execute(&image).await?);
        }

        Commands::Search { query, limits } => {
            limits.apply(&mut config);

            let cmd = SearchCommand::new(config, output);
            print_non_empty(&cmd.execute(&query).await?);
        }

        Commands::Serve { bind } => {
            if let Some(bind) = bind {
                config.server.bind = bind;
            }

            server::serve(&config).await?;
        }
    }

    Ok(())
}

fn print_non_empty(output: &str) {
    if !output.is_empty() {
        println!("{}", output);
    }
}

fn exit_on_interrupt() -> ! {
    eprintln!("\nExiting...");
    std::process::exit(0)
}
