//! Configuration management with TOML, environment variables, and CLI overrides.

use crate::ecs::locale::Locale;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::debug;

/// Client configuration with layered loading.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// ECS endpoint locale
    #[serde(default)]
    pub locale: Locale,

    /// Overrides the locale's host
    #[serde(default)]
    pub host: Option<String>,

    /// Overrides the scheme's default port
    #[serde(default)]
    pub port: Option<u16>,

    /// Use HTTPS
    #[serde(default = "default_is_secure")]
    pub is_secure: bool,

    /// Path prefix in front of the API path
    #[serde(default = "default_path")]
    pub path: String,

    /// Proxy URL (e.g., socks5://host:port)
    #[serde(default)]
    pub proxy: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub access_key_id: Option<String>,

    #[serde(default, skip_serializing)]
    pub secret_access_key: Option<String>,

    /// Output format
    #[serde(default)]
    pub format: OutputFormat,
}

fn default_is_secure() -> bool {
    true
}

fn default_path() -> String {
    "/".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: Locale::Us,
            host: None,
            port: None,
            is_secure: default_is_secure(),
            path: default_path(),
            proxy: None,
            timeout_secs: default_timeout_secs(),
            access_key_id: None,
            secret_access_key: None,
            format: OutputFormat::Table,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("locale", &self.locale)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("is_secure", &self.is_secure)
            .field("path", &self.path)
            .field("proxy", &self.proxy)
            .field("timeout_secs", &self.timeout_secs)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &self.secret_access_key.as_ref().map(|_| "<redacted>"))
            .field("format", &self.format)
            .finish()
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        let local_config = Path::new("config.toml");
        if local_config.exists() {
            debug!("Found config.toml in current directory");
            return Self::from_file(local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("ecs-search").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides.
    pub fn with_env(mut self) -> Self {
        if let Ok(key) = std::env::var("AWS_ACCESS_KEY_ID") {
            self.access_key_id = Some(key);
        }

        if let Ok(secret) = std::env::var("AWS_SECRET_ACCESS_KEY") {
            self.secret_access_key = Some(secret);
        }

        if let Ok(locale) = std::env::var("ECS_LOCALE") {
            if let Ok(l) = locale.parse() {
                self.locale = l;
            }
        }

        if let Ok(proxy) = std::env::var("ECS_PROXY") {
            self.proxy = Some(proxy);
        }

        self
    }

    /// Host the client talks to: the explicit override, else the locale's.
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or_else(|| self.locale.host())
    }

    /// `host[:port]`, lowercased, with the port omitted when it is the
    /// scheme default. This is the name requests are signed for.
    pub fn server_name(&self) -> String {
        let default_port = if self.is_secure { 443 } else { 80 };
        let host = self.host().to_lowercase();
        match self.port {
            Some(port) if port != default_port => format!("{}:{}", host, port),
            _ => host,
        }
    }

    /// `scheme://server_name`
    pub fn base_url(&self) -> String {
        let scheme = if self.is_secure { "https" } else { "http" };
        format!("{}://{}", scheme, self.server_name())
    }

    /// Joins the configured path prefix with `path`.
    pub fn request_path(&self, path: &str) -> String {
        let prefix = self.path.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{}{}", prefix, path)
        } else {
            format!("{}/{}", prefix, path)
        }
    }
}

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Markdown,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use: table, json, markdown, csv", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}
