use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::cli_args::Cli;

const DEFAULT_TIMEOUT_SECS: u64 = 20;
const DEFAULT_MAX_LENGTH: u32 = 512;

/// Which generation backend to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Ollama,
    OpenAi,
    /// Offline dummy pipeline, no model calls.
    None,
}

impl BackendKind {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "ollama" => Some(BackendKind::Ollama),
            "openai" => Some(BackendKind::OpenAi),
            "none" | "noop" => Some(BackendKind::None),
            _ => None,
        }
    }

    fn default_model(&self) -> &'static str {
        match self {
            BackendKind::Ollama => "llama3.2",
            BackendKind::OpenAi => "gpt-4o-mini",
            BackendKind::None => "none",
        }
    }

    fn default_base_url(&self) -> &'static str {
        match self {
            BackendKind::OpenAi => "https://api.openai.com/v1",
            _ => "http://localhost:11434",
        }
    }
}

/// Final resolved configuration for repodigest.
#[derive(Debug, Clone)]
pub struct Config {
    pub backend: BackendKind,
    pub model: String,
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
    pub max_length: u32,
}

impl Config {
    /// Build the final config from CLI flags, environment, TOML file, and defaults.
    ///
    /// Precedence:
    ///   1. CLI flags (`--backend`, `--model`, ...)
    ///   2. Env vars `REPODIGEST_*` (and `OPENAI_API_KEY`, read by clap)
    ///   3. TOML `~/.config/repodigest.toml`
    ///   4. Hardcoded defaults (ollama, llama3.2, 20s timeout)
    pub fn from_sources(cli: &Cli) -> Result<Self> {
        let file_cfg = load_file_config().unwrap_or_default();
        Self::resolve(cli, |key| env::var(key).ok(), file_cfg)
    }

    fn resolve(
        cli: &Cli,
        env_var: impl Fn(&str) -> Option<String>,
        file_cfg: FileConfig,
    ) -> Result<Self> {
        let model = cli
            .model
            .clone()
            .or_else(|| env_var("REPODIGEST_MODEL"))
            .or(file_cfg.model);

        let no_model = cli.no_model
            || model
                .as_deref()
                .is_some_and(|m| m.eq_ignore_ascii_case("none"));

        let backend = if no_model {
            BackendKind::None
        } else {
            match cli
                .backend
                .clone()
                .or_else(|| env_var("REPODIGEST_BACKEND"))
                .or(file_cfg.backend)
            {
                Some(name) => BackendKind::parse(&name)
                    .ok_or_else(|| anyhow!("unknown backend '{name}' (expected ollama, openai or none)"))?,
                None => BackendKind::Ollama,
            }
        };

        let model = match backend {
            BackendKind::None => BackendKind::None.default_model().to_string(),
            _ => model.unwrap_or_else(|| backend.default_model().to_string()),
        };

        let base_url = cli
            .base_url
            .clone()
            .or_else(|| env_var("REPODIGEST_BASE_URL"))
            .or(file_cfg.base_url)
            .unwrap_or_else(|| backend.default_base_url().to_string());

        let api_key = cli.api_key.clone().or(file_cfg.openai_api_key);
        if backend == BackendKind::OpenAi && api_key.is_none() {
            return Err(anyhow!(
                "OPENAI_API_KEY (or --api-key) is required for the openai backend"
            ));
        }

        let timeout_secs = match cli.timeout {
            Some(secs) => secs,
            None => match env_var("REPODIGEST_TIMEOUT_SECS") {
                Some(raw) => raw
                    .parse()
                    .map_err(|_| anyhow!("REPODIGEST_TIMEOUT_SECS must be a number, got '{raw}'"))?,
                None => file_cfg.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            },
        };

        let max_length = match cli.max_length {
            Some(n) => n,
            None => match env_var("REPODIGEST_MAX_LENGTH") {
                Some(raw) => raw
                    .parse()
                    .map_err(|_| anyhow!("REPODIGEST_MAX_LENGTH must be a number, got '{raw}'"))?,
                None => file_cfg.max_length.unwrap_or(DEFAULT_MAX_LENGTH),
            },
        };

        Ok(Config {
            backend,
            model,
            base_url,
            api_key,
            timeout: Duration::from_secs(timeout_secs),
            max_length,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    pub backend: Option<String>,
    /// Default model to use when not provided via CLI or env.
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub openai_api_key: Option<String>,
    pub timeout_secs: Option<u64>,
    pub max_length: Option<u32>,
}

/// Return `~/.config/repodigest.toml`
fn config_path() -> Option<PathBuf> {
    let home = dirs::home_dir()?;
    Some(home.join(".config").join("repodigest.toml"))
}

fn load_file_config() -> Option<FileConfig> {
    let path = config_path()?;
    if !path.exists() {
        return None;
    }

    let data = fs::read_to_string(&path).ok()?;
    match toml::from_str::<FileConfig>(&data) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            log::warn!("Ignoring invalid config file {}: {e}", path.display());
            None
        }
    }
}
