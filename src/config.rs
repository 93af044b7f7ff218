use std::path::{Path, PathBuf};

use anyhow::{Context, ensure};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub static_files: StaticConfig,
    pub limits: Limits,
    pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
    pub backlog: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StaticConfig {
    pub root: PathBuf,
}

/// Size bounds applied to every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Largest number of bytes requested from the socket in one read.
    pub read_chunk: usize,
    /// Request buffer capacity. One byte is kept in reserve, so a request
    /// header may use at most `request_buffer - 1` bytes.
    pub request_buffer: usize,
    pub max_filename: usize,
    pub max_path: usize,
    pub max_body: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            static_files: StaticConfig::default(),
            limits: Limits::default(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:3333".to_string(),
            backlog: 16,
        }
    }
}

impl Default for StaticConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("static"),
        }
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            read_chunk: 256,
            request_buffer: 8192 << 1,
            max_filename: 64,
            max_path: 128,
            max_body: 8192,
        }
    }
}

impl Config {
    /// Loads the configuration file if one is given, then applies the
    /// `LISTEN`, `STATIC_ROOT` and `LOG_LEVEL` environment overrides.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut cfg = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        cfg.apply_env(|key| std::env::var(key).ok());
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_yaml(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    pub fn from_yaml(raw: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Applies environment overrides through `lookup`, so callers can
    /// substitute a map for the process environment.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(addr) = lookup("LISTEN") {
            self.server.listen_addr = addr;
        }
        if let Some(root) = lookup("STATIC_ROOT") {
            self.static_files.root = PathBuf::from(root);
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.log_level = level;
        }
    }

    pub fn log_level(&self) -> anyhow::Result<tracing::Level> {
        self.log_level
            .parse()
            .map_err(|_| anyhow::anyhow!("unknown log level {:?}", self.log_level))
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let limits = &self.limits;
        ensure!(limits.read_chunk > 0, "limits.read_chunk must be positive");
        // Room for the 4 byte terminator plus the reserved byte.
        ensure!(
            limits.request_buffer > 4,
            "limits.request_buffer must be larger than 4"
        );
        ensure!(limits.max_filename > 0, "limits.max_filename must be positive");
        ensure!(limits.max_path > 0, "limits.max_path must be positive");
        ensure!(self.server.backlog > 0, "server.backlog must be positive");
        self.log_level()?;
        Ok(())
    }
}
