//! Command-line arguments for `taxa`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use reqwest::Url;

/// `taxa` command arguments.
#[derive(Debug, Parser)]
#[command(
    name = "taxa",
    about = "Search taxa and curate species sets against a taxon-sets server",
    version
)]
pub struct Cli {
    #[command(flatten)]
    pub endpoints: Endpoints,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct Endpoints {
    /// Base URL of the taxon-sets REST API.
    #[arg(long, env = "TAXA_API_URL", default_value = "http://127.0.0.1:8080/")]
    pub api_url: Url,
    /// Base URL of the taxonomy provider.
    #[arg(
        long,
        env = "TAXA_TAXONOMY_URL",
        default_value = "https://api.inaturalist.org/v1/"
    )]
    pub taxonomy_url: Url,
    /// Base URL of the summary provider.
    #[arg(
        long,
        env = "TAXA_SUMMARY_URL",
        default_value = "https://en.wikipedia.org/api/rest_v1/"
    )]
    pub summary_url: Url,
    /// File holding the signed-in session between invocations.
    #[arg(long, env = "TAXA_SESSION_FILE", default_value = ".taxa/session.json")]
    pub session_file: PathBuf,
    /// Timeout for every outbound request, in seconds.
    #[arg(long, env = "TAXA_TIMEOUT_SECS", default_value_t = 10)]
    pub timeout_secs: u64,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Species descending from the best match for a search term.
    Search {
        term: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Details and summaries for one or more taxa.
    Taxa {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Species-rank autocomplete suggestions.
    Suggest { query: String },
    /// Create an account and sign in.
    Signup {
        username: String,
        #[arg(long)]
        password: String,
        #[arg(long = "confirm-password")]
        confirm_password: String,
    },
    /// Sign in.
    Login {
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored session.
    Logout,
    /// Manage species sets.
    #[command(subcommand)]
    Sets(SetsCommand),
}

#[derive(Debug, Subcommand)]
pub enum SetsCommand {
    /// List your sets.
    List,
    /// Show one set with its taxa.
    Show { id: String },
    /// Create a set from a title and taxon ids.
    Create {
        title: String,
        taxon_ids: Vec<String>,
    },
    /// Add a taxon to a set.
    Add { id: String, taxon_id: String },
    /// Remove a taxon from a set.
    Remove { id: String, taxon_id: String },
    /// Delete a set.
    Delete { id: String },
}
