use clap::{ArgAction, ArgGroup, Args, Parser, Subcommand};
use std::path::PathBuf;

/// CLI options
#[derive(Parser, Debug)]
#[command(
    name = "repodigest",
    version,
    about = "LLM-generated summaries of GitHub repositories and their recent commits"
)]
#[command(group(
    ArgGroup::new("model_group")
        .args(["model", "no_model"])
        .multiple(false)
))]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Generation backend: ollama, openai or none
    #[arg(long, global = true)]
    pub backend: Option<String>,

    /// Model name to use (e.g. llama3.2). If 'none', acts like --no-model.
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Disable model calls; use the offline dummy pipeline instead
    #[arg(long, global = true)]
    pub no_model: bool,

    /// Base URL of the backend (Ollama server or OpenAI-compatible API)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// API key for the openai backend (otherwise uses OPENAI_API_KEY env var)
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Seconds to wait for a single generation
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Upper bound on generated output length
    #[arg(long, global = true)]
    pub max_length: Option<u32>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate summaries for one or more repositories
    Summarize {
        #[command(flatten)]
        input: InputArgs,

        /// Print the stored-summary records as JSON instead of plain text
        #[arg(long)]
        json: bool,
    },

    /// Print the prompt that would be sent, without calling a model
    Prompt {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Check whether the configured backend is reachable
    Health,
}

#[derive(Args, Debug)]
pub struct InputArgs {
    /// Repository snapshot JSON file (as returned by the GitHub client); repeatable
    #[arg(long = "repo", required = true, num_args = 1)]
    pub repos: Vec<PathBuf>,

    /// JSON file with the commit list, most recent first
    #[arg(long, conflicts_with = "git")]
    pub commits: Option<PathBuf>,

    /// Read commits from a local git checkout instead of a JSON file
    #[arg(long)]
    pub git: Option<PathBuf>,

    /// How many days of history to read with --git
    #[arg(long, default_value_t = 7)]
    pub days: u32,

    /// Summary kind: overview, technical, business, weekly or commits
    #[arg(long, default_value = "overview")]
    pub kind: String,
}
