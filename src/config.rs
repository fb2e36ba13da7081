use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable naming a config file to load when `--config` is absent.
pub const CONFIG_ENV: &str = "AIPROMPTS_CONFIG";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub corpus: CorpusConfig,
    #[serde(default)]
    pub index: IndexConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusConfig {
    /// Directory holding one folder per prompt entry
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Name of the JSON descriptor expected in every entry folder
    #[serde(default = "default_metadata_file")]
    pub metadata_file: String,

    /// File extensions permitted inside an entry folder (without the dot)
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,

    /// Closed set of values accepted for the `type` field
    #[serde(default = "default_allowed_types")]
    pub allowed_types: Vec<String>,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            metadata_file: default_metadata_file(),
            allowed_extensions: default_allowed_extensions(),
            allowed_types: default_allowed_types(),
        }
    }
}

impl CorpusConfig {
    /// Case-insensitive extension check; files without an extension never match.
    pub fn is_allowed_extension(&self, path: &Path) -> bool {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => self
                .allowed_extensions
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(ext)),
            None => false,
        }
    }

    pub fn is_allowed_type(&self, kind: &str) -> bool {
        self.allowed_types.iter().any(|t| t == kind)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Where `build` writes the flattened JSON array
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Pretty-print the JSON output (default: true)
    #[serde(default = "default_true")]
    pub pretty: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            pretty: true,
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from("prompts")
}

fn default_metadata_file() -> String {
    "aiprompt.json".to_string()
}

fn default_allowed_extensions() -> Vec<String> {
    ["md", "mdc", "json"].iter().map(|s| s.to_string()).collect()
}

fn default_allowed_types() -> Vec<String> {
    ["prompt", "rule", "agent", "workflow", "snippet"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_output() -> PathBuf {
    PathBuf::from("dist/prompts.json")
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a specific path, or use default search paths
    pub fn load_with_path(path: Option<&Path>) -> Result<Self> {
        // An explicit path must load; a broken file is not silently replaced by defaults
        if let Some(config_path) = path {
            debug!("Loading config from explicit path: {}", config_path.display());
            return Self::load_from_path(config_path);
        }

        if let Ok(env_path) = env::var(CONFIG_ENV) {
            if !env_path.is_empty() {
                debug!("Loading config from ${}: {}", CONFIG_ENV, env_path);
                return Self::load_from_path(&env_path);
            }
        }

        // Per-repo config
        if let Ok(config) = Self::load_from_path("aiprompts.toml") {
            debug!("Loaded config from ./aiprompts.toml");
            return Ok(config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("aiprompts").join("config.toml");
            if let Ok(config) = Self::load_from_path(&config_path) {
                debug!("Loaded config from {:?}", config_path);
                return Ok(config);
            }
        }

        debug!("Using default config");
        Ok(Self::default())
    }

    fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }

    /// Apply command-line overrides on top of the loaded file.
    pub fn with_overrides(mut self, root: Option<PathBuf>, output: Option<PathBuf>) -> Self {
        if let Some(root) = root {
            self.corpus.root = root;
        }
        if let Some(output) = output {
            self.index.output = output;
        }
        self
    }
}
