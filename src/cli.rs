//! Command-line interface parsing for Chefify
//!
//! This module handles parsing of CLI arguments using clap: the facet picks
//! that make up the search query, the search API settings, and the run mode.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::query::{Facet, FacetSelection};
use crate::search::{SearchConfig, DEFAULT_ENDPOINT, DEFAULT_MAX_RETRIES};

/// Error types for CLI argument handling
#[derive(Debug, Error)]
pub enum CliError {
    /// Searching needs an API key and none was given
    #[error("Missing API key: pass --api-key or set CHEFIFY_API_KEY")]
    MissingApiKey,

    /// A zero timeout would fail every request
    #[error("Invalid timeout: must be at least 1 second")]
    InvalidTimeout,
}

/// Chefify - find recipes by cuisine, time, audience, complexity and diet
#[derive(Parser, Debug)]
#[command(name = "chefify")]
#[command(about = "Find recipe ideas by cuisine, cooking time, audience, complexity and diet")]
#[command(version)]
pub struct Cli {
    /// Cuisine, e.g. Italian
    #[arg(long)]
    pub cuisine: Option<String>,

    /// Cooking time, e.g. "Less than 30 min"
    #[arg(long = "time", value_name = "TIME")]
    pub cooking_time: Option<String>,

    /// Who you are cooking for, e.g. Family
    #[arg(long = "for", value_name = "AUDIENCE")]
    pub cooking_for: Option<String>,

    /// Complexity level, e.g. Basic
    #[arg(long)]
    pub complexity: Option<String>,

    /// Diet, e.g. Vegetarian
    #[arg(long)]
    pub diet: Option<String>,

    /// Print results to stdout instead of opening the interactive screen
    #[arg(long)]
    pub plain: bool,

    /// Remove all cached searches (exits afterwards unless a facet is given)
    #[arg(long)]
    pub clear_cache: bool,

    /// Print the suggested options for every facet and exit
    #[arg(long)]
    pub list_options: bool,

    /// API key for the image search service
    #[arg(long, env = "CHEFIFY_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Image search endpoint
    #[arg(long, env = "CHEFIFY_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Request timeout in seconds (default: wait indefinitely)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Additional attempts after a failed request
    #[arg(long, default_value_t = DEFAULT_MAX_RETRIES)]
    pub retries: u32,

    /// Directory for cached searches (default: XDG cache directory)
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,
}

/// What the binary should do after startup
#[derive(Debug, Clone)]
pub enum RunMode {
    /// Print the facet options
    ListOptions,
    /// Clear the cache and exit
    ClearCacheOnly,
    /// Run a search
    Search {
        config: SearchConfig,
        /// Clear the cache before searching
        clear_cache: bool,
        /// Print results instead of opening the TUI
        plain: bool,
    },
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone)]
pub struct StartupConfig {
    /// Facet values picked on the command line
    pub selection: FacetSelection,
    /// Cache directory override
    pub cache_dir: Option<PathBuf>,
    pub mode: RunMode,
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with the run mode resolved
    /// * `Err(CliError)` if a search is requested without an API key or with a zero timeout
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let selection = FacetSelection {
            cuisine: cli.cuisine.clone(),
            cooking_time: cli.cooking_time.clone(),
            cooking_for: cli.cooking_for.clone(),
            complexity: cli.complexity.clone(),
            diet: cli.diet.clone(),
        };

        let mode = if cli.list_options {
            RunMode::ListOptions
        } else if cli.clear_cache && selection.is_empty() {
            RunMode::ClearCacheOnly
        } else {
            RunMode::Search {
                config: search_config(cli)?,
                clear_cache: cli.clear_cache,
                plain: cli.plain,
            }
        };

        Ok(StartupConfig {
            selection,
            cache_dir: cli.cache_dir.clone(),
            mode,
        })
    }

    /// The search query for the picked facets
    pub fn query(&self) -> String {
        self.selection.build_query()
    }
}

/// Builds the search settings, requiring an API key
fn search_config(cli: &Cli) -> Result<SearchConfig, CliError> {
    let api_key = cli
        .api_key
        .as_deref()
        .filter(|key| !key.trim().is_empty())
        .ok_or(CliError::MissingApiKey)?;

    let mut config = SearchConfig::new(api_key)
        .with_endpoint(cli.endpoint.clone())
        .with_max_retries(cli.retries);

    match cli.timeout {
        Some(0) => return Err(CliError::InvalidTimeout),
        Some(secs) => config = config.with_timeout(Duration::from_secs(secs)),
        None => {}
    }

    Ok(config)
}

/// Renders the facet option list printed by `--list-options`
pub fn format_facet_options() -> String {
    Facet::ALL
        .iter()
        .map(|facet| format!("{}: {}", facet.label(), facet.options().join(", ")))
        .collect::<Vec<_>>()
        .join("\n")
}
