//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::api::ServerConfig as ApiServerConfig;
use crate::client::ApiClientConfig;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub client: ClientConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// API client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_client_timeout")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_client_timeout() -> u64 {
    10
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_client_timeout(),
        }
    }
}

impl ClientConfig {
    pub fn to_client_config(&self) -> ApiClientConfig {
        ApiClientConfig {
            base_url: self.base_url.clone(),
            request_timeout_ms: self.request_timeout_secs * 1000,
        }
    }
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:5173".to_string(),
        "http://localhost:3000".to_string(),
        "http://127.0.0.1:5173".to_string(),
    ]
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
        }
    }
}

impl ServerConfig {
    pub fn to_server_config(&self) -> ApiServerConfig {
        ApiServerConfig {
            host: self.host.clone(),
            port: self.port,
            cors_origins: self.cors_origins.clone(),
        }
    }
}

/// Session storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_session_file")]
    pub file: String,
}

fn default_session_file() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("gearguard").join("session.json").to_string_lossy().to_string())
        .unwrap_or_else(|| "./gearguard_session.json".to_string())
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            file: default_session_file(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    /// Install the global tracing subscriber
    ///
    /// `RUST_LOG` wins over the configured level.
    pub fn init(&self) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("gearguard={},tower_http=info", self.level))
        });

        let registry = tracing_subscriber::registry().with(filter);
        let result = if self.format == "json" {
            registry
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .try_init()
        } else {
            registry
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .try_init()
        };

        if let Err(e) = result {
            eprintln!("Logging already initialized: {}", e);
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    ///
    /// The first existing file wins. A file that exists but cannot be read
    /// or parsed is an error, not a fallback to defaults.
    pub fn load_default() -> Result<Self, ConfigError> {
        let config_paths: Vec<PathBuf> = [
            dirs::config_dir().map(|p| p.join("gearguard").join("config.toml")),
            Some(PathBuf::from("./gearguard.toml")),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self::load_first(&config_paths)
    }

    fn load_first(paths: &[PathBuf]) -> Result<Self, ConfigError> {
        match paths.iter().find(|path| path.exists()) {
            Some(path) => {
                let config = Self::load_with_env(path)?;
                tracing::info!("Loaded config from {:?}", path);
                Ok(config)
            }
            None => {
                tracing::debug!("Using default config with environment overrides");
                Ok(Self::from_env())
            }
        }
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        // Client overrides
        if let Some(url) = var("GEARGUARD_API_URL") {
            self.client.base_url = url;
        }
        if let Some(timeout) = var("GEARGUARD_API_TIMEOUT_SECS") {
            if let Ok(t) = timeout.parse() {
                self.client.request_timeout_secs = t;
            }
        }

        // Server overrides
        if let Some(host) = var("GEARGUARD_HOST") {
            self.server.host = host;
        }
        if let Some(port) = var("GEARGUARD_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }

        // Session overrides
        if let Some(file) = var("GEARGUARD_SESSION_FILE") {
            self.session.file = file;
        }

        // Logging overrides
        if let Some(level) = var("GEARGUARD_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("GEARGUARD_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# GearGuard Configuration
#
# Environment variables override these settings:
# - GEARGUARD_API_URL
# - GEARGUARD_API_TIMEOUT_SECS
# - GEARGUARD_HOST
# - GEARGUARD_PORT
# - GEARGUARD_SESSION_FILE
# - GEARGUARD_LOG_LEVEL
# - GEARGUARD_LOG_FORMAT

[client]
# Base URL of the GearGuard API
base_url = "http://localhost:8000"

# Request timeout in seconds
request_timeout_secs = 10

[server]
# API server host
host = "127.0.0.1"

# API server port
port = 8000

# Allowed CORS origins
cors_origins = ["http://localhost:5173", "http://localhost:3000", "http://127.0.0.1:5173"]

[session]
# Where the signed-in user is stored
# file = "~/.local/share/gearguard/session.json"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.client.base_url, "http://localhost:8000");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.logging.format, "pretty");
        assert_eq!(config.client.to_client_config().request_timeout_ms, 10_000);
    }

    #[test]
    fn test_generated_config_parses() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.cors_origins.len(), 3);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("gearguard.toml");
        std::fs::write(&path, "[client]\nbase_url = \"http://api:9000\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.client.base_url, "http://api:9000");
        assert_eq!(config.client.request_timeout_secs, 10);
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn test_load_errors() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        assert!(matches!(Config::load(&missing), Err(ConfigError::Io { .. })));

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "[server\nport = ").unwrap();
        assert!(matches!(Config::load(&bad), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_first_existing_file_wins() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        let present = dir.path().join("gearguard.toml");
        std::fs::write(&present, "[server]\nport = 9200\n").unwrap();

        let config = Config::load_first(&[missing.clone(), present]).unwrap();
        assert_eq!(config.server.port, 9200);

        let config = Config::load_first(&[missing]).unwrap();
        assert_eq!(config.client.base_url, Config::from_env().client.base_url);
    }

    #[test]
    fn test_corrupt_default_file_is_an_error() {
        let dir = tempdir().unwrap();
        let corrupt = dir.path().join("gearguard.toml");
        std::fs::write(&corrupt, "[client\nbase_url = \"http://x\"").unwrap();

        let err = Config::load_first(&[corrupt]).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("gearguard.toml"));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("GEARGUARD_API_URL", "http://remote:8000"),
            ("GEARGUARD_PORT", "9100"),
            ("GEARGUARD_API_TIMEOUT_SECS", "not-a-number"),
            ("GEARGUARD_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.client.base_url, "http://remote:8000");
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.client.request_timeout_secs, 10);
        assert_eq!(config.logging.format, "json");
    }
}
