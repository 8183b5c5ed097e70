//! Command-line interface definitions for the BBC Monitoring client.
//!
//! Connection settings can be given as flags, environment variables or a
//! YAML config file; flags win over the file.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments for the `bbc_monitoring` binary.
///
/// # Examples
///
/// ```sh
/// # Print the body text of one product
/// bbc_monitoring --api-key-path ./data/api_key.json article 1ds9ezq2
///
/// # Search headlines, at most five results
/// bbc_monitoring search wildfire --limit 5
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to config.yaml file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// API base URL
    #[arg(long, env = "BBC_MONITORING_BASE_URL")]
    pub base_url: Option<String>,

    /// Path to the JSON file holding the API username and password
    #[arg(short = 'k', long, env = "BBC_MONITORING_API_KEY_PATH")]
    pub api_key_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Fetch a product by id and print its body text
    Article {
        /// Product id
        id: String,

        /// Print the product JSON instead of the extracted text
        #[arg(long)]
        raw: bool,
    },
    /// Search headlines and print the JSON result
    Search {
        /// Term to look for in headlines
        query: String,

        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<u32>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_article() {
        let cli = Cli::parse_from(["bbc_monitoring", "article", "1ds9ezq2"]);
        assert_eq!(
            cli.command,
            Command::Article {
                id: "1ds9ezq2".to_string(),
                raw: false
            }
        );
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_cli_search_with_limit() {
        let cli = Cli::parse_from([
            "bbc_monitoring",
            "--base-url",
            "https://x.test",
            "-k",
            "/tmp/key.json",
            "search",
            "fire",
            "-l",
            "5",
        ]);

        assert_eq!(cli.base_url.as_deref(), Some("https://x.test"));
        assert_eq!(cli.api_key_path, Some(PathBuf::from("/tmp/key.json")));
        assert_eq!(
            cli.command,
            Command::Search {
                query: "fire".to_string(),
                limit: Some(5)
            }
        );
    }

    #[test]
    fn test_cli_requires_command() {
        assert!(Cli::try_parse_from(["bbc_monitoring"]).is_err());
    }
}
