use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use headlines_retrieval::{SearchConfig, SearchService};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Keyword and similar-keyword search over stored news headlines.
#[derive(Parser, Debug)]
#[command(name = "headlines", version, about)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long, env = "HEADLINES_CONFIG")]
    config: Option<PathBuf>,

    /// Redis URL; overrides the configuration file and REDIS_HOST/REDIS_PORT.
    #[arg(long)]
    redis_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the keywords most similar to the given ones.
    Rank {
        #[arg(required = true)]
        keywords: Vec<String>,

        /// Number of keywords to print.
        #[arg(short = 'n', long)]
        top_n: Option<usize>,
    },
    /// Print headlines filed under keywords similar to the given ones.
    Similar {
        #[arg(required = true)]
        keywords: Vec<String>,
    },
    /// Print headlines filed under the given keywords.
    Search {
        #[arg(required = true)]
        keywords: Vec<String>,
    },
    /// Print every stored headline.
    All,
    /// Print the unix time of the last ingestion run.
    LastUpdated,
}

impl Cli {
    fn load_config(&self) -> Result<SearchConfig> {
        let config = match &self.config {
            Some(path) => SearchConfig::from_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => SearchConfig::default(),
        };
        let config = config.with_env_overrides();

        Ok(match &self.redis_url {
            Some(url) => config.with_redis_url(url),
            None => config,
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.load_config()?;
    debug!("Using configuration: {config:?}");

    let service = SearchService::connect(&config)
        .await
        .context("failed to connect to the headline store")?;

    match cli.command {
        Commands::Rank { keywords, top_n } => {
            let top_n = top_n.unwrap_or(config.ranker.top_n);
            for keyword in service
                .ranker()
                .rank_similar_keywords(&keywords, top_n)
                .await?
            {
                println!("{keyword}");
            }
        }
        Commands::Similar { keywords } => {
            print_json(&service.similar(&keywords).await?)?;
        }
        Commands::Search { keywords } => {
            print_json(&service.search(&keywords).await?)?;
        }
        Commands::All => {
            print_json(&service.all().await?)?;
        }
        Commands::LastUpdated => match service.last_updated().await? {
            Some(timestamp) => println!("{timestamp}"),
            None => println!("never"),
        },
    }

    Ok(())
}

fn print_json(headlines: &BTreeMap<String, String>) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(headlines)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_rank() {
        let cli = Cli::try_parse_from(["headlines", "rank", "dog", "Car", "-n", "5"]).unwrap();
        match cli.command {
            Commands::Rank { keywords, top_n } => {
                assert_eq!(keywords, vec!["dog", "Car"]);
                assert_eq!(top_n, Some(5));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_rank_requires_keywords() {
        assert!(Cli::try_parse_from(["headlines", "rank"]).is_err());
    }

    #[test]
    fn test_redis_url_flag_wins() {
        let cli = Cli::try_parse_from([
            "headlines",
            "--redis-url",
            "redis://flag:1",
            "last-updated",
        ])
        .unwrap();
        let config = cli.load_config().unwrap();
        assert_eq!(config.store.redis_url, "redis://flag:1");
    }
}
