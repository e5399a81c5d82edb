//! ecs-search - Signed item-search CLI for the Amazon E-Commerce Service

use anyhow::Result;
use clap::{Parser, Subcommand};
use ecs_search::commands::{parse_param, SearchCommand};
use ecs_search::config::{Config, OutputFormat};
use ecs_search::ecs::{Locale, Params};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "ecs-search",
    version,
    about = "Signed item searches against the Amazon E-Commerce Service",
    long_about = "Builds Signature Version 2 ItemSearch requests, sends them to an ECS endpoint and prints the returned items."
)]
struct Cli {
    /// ECS endpoint locale
    #[arg(short, long, global = true)]
    locale: Option<Locale>,

    /// Proxy URL (e.g., socks5://host:port)
    #[arg(long, global = true, env = "ECS_PROXY")]
    proxy: Option<String>,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an ItemSearch
    #[command(alias = "s")]
    Search {
        /// Search index (Books, DVD, Electronics, ...)
        search_index: String,

        /// Keywords to search for
        #[arg(short, long)]
        keywords: Option<String>,

        /// Extra request parameter as Name=Value (repeatable)
        #[arg(short = 'p', long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,
    },

    /// List supported locales
    Locales,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    // Apply CLI overrides
    if let Some(locale) = cli.locale {
        config.locale = locale;
    }
    if let Some(format) = cli.format {
        config.format = format;
    }
    if let Some(proxy) = cli.proxy {
        config.proxy = Some(proxy);
    }

    match cli.command {
        Commands::Search { search_index, keywords, params } => {
            let mut params: Params = params.into_iter().collect();
            if let Some(keywords) = keywords {
                params.insert("Keywords".to_string(), keywords);
            }

            let cmd = SearchCommand::new(config);
            let output = cmd.execute(&search_index, params).await?;
            println!("{}", output);
        }

        Commands::Locales => {
            println!("Supported ECS locales:\n");
            println!("{:<6} {:<28} {:<20}", "Code", "Host", "Marketplace");
            println!("{:-<6} {:-<28} {:-<20}", "", "", "");

            for locale in Locale::all() {
                println!(
                    "{:<6} {:<28} {:<20}",
                    locale.to_string(),
                    locale.host(),
                    locale.marketplace()
                );
            }
        }
    }

    Ok(())
}
