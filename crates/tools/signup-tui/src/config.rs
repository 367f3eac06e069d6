//! Runtime configuration for the signup page.
//!
//! Sources, lowest precedence first:
//! - built-in defaults
//! - a TOML file (`--config`, `SIGNUP_CONFIG_FILE`, or `./signup.toml`)
//! - environment variables prefixed `SIGNUP`, nested with `__`
//!   (e.g. `SIGNUP__API__BASE_URL`)
//! - command line overrides

use anyhow::{Context, Result};
use config::{Config as ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};
use signup_client::{
    ClientConfig, CredentialPolicy, DEFAULT_TOKEN_KEY, EndpointConfig, LocalStorage,
    SKIP_BROWSER_WARNING, default_headers,
};
use signup_core::{PasswordCharset, ValidationMode, ValidationRules};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub validation: ValidationConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Scheme, host and port of the API server
    pub base_url: String,

    pub base_path: String,

    /// Request timeout; unset leaves the transport default
    pub timeout_seconds: Option<u64>,

    /// Keep and resend cookies set by the server
    pub include_credentials: bool,

    /// Send the proxy interstitial bypass header
    pub skip_browser_warning: bool,

    pub endpoints: EndpointConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Local storage file; defaults to the platform data directory
    pub path: Option<PathBuf>,

    /// Key the bearer token is stored under
    pub token_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub forbidden_words: Vec<String>,
    pub password_charset: PasswordCharset,
    pub mode: ValidationMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level or full filter directive (trace, debug, info, warn, error)
    pub level: String,

    /// The terminal is taken by the UI, so logs go to this file
    pub file: PathBuf,

    /// pretty, compact or json
    pub format: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            base_path: signup_client::DEFAULT_BASE_PATH.to_string(),
            timeout_seconds: None,
            include_credentials: true,
            skip_browser_warning: true,
            endpoints: EndpointConfig::default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: None,
            token_key: DEFAULT_TOKEN_KEY.to_string(),
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        let rules = ValidationRules::default();
        Self {
            forbidden_words: rules.forbidden_words,
            password_charset: rules.password_charset,
            mode: ValidationMode::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: PathBuf::from("signup-tui.log"),
            format: "pretty".to_string(),
        }
    }
}

const VALID_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const VALID_FORMATS: [&str; 3] = ["pretty", "compact", "json"];

impl AppConfig {
    /// Loads defaults, the config file and the environment, then validates.
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let mut builder = ConfigBuilder::builder();

        let config_path = config_file
            .map(Path::to_path_buf)
            .or_else(|| std::env::var("SIGNUP_CONFIG_FILE").ok().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("signup.toml"));

        if config_path.exists() {
            info!("Loading configuration from {}", config_path.display());
            builder = builder.add_source(File::from(config_path.as_path()));
        } else if config_file.is_some() {
            anyhow::bail!("Config file {} does not exist", config_path.display());
        } else {
            debug!("No config file at {}, using defaults", config_path.display());
        }

        builder = builder.add_source(
            Environment::with_prefix("SIGNUP")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("validation.forbidden_words"),
        );

        let settings: AppConfig = builder
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        settings.validate()?;
        Ok(settings)
    }

    /// Applies command line overrides on top of the loaded values.
    pub fn apply_overrides(&mut self, base_url: Option<String>) -> Result<()> {
        if let Some(base_url) = base_url {
            self.api.base_url = base_url;
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            anyhow::bail!("api.base_url cannot be empty");
        }

        if !self.api.base_path.starts_with('/') {
            anyhow::bail!(
                "api.base_path must start with '/', got '{}'",
                self.api.base_path
            );
        }

        if self.api.timeout_seconds == Some(0) {
            anyhow::bail!("api.timeout_seconds must be greater than 0 when set");
        }

        if self.storage.token_key.is_empty() {
            anyhow::bail!("storage.token_key cannot be empty");
        }

        // A full filter directive is accepted as-is.
        let level = self.logging.level.to_lowercase();
        if !level.contains('=') && !level.contains(',') && !VALID_LEVELS.contains(&level.as_str())
        {
            anyhow::bail!(
                "Invalid log level '{}'. Must be one of: {:?}",
                self.logging.level,
                VALID_LEVELS
            );
        }

        let format = self.logging.format.to_lowercase();
        if !VALID_FORMATS.contains(&format.as_str()) {
            anyhow::bail!(
                "Invalid log format '{}'. Must be one of: {:?}",
                self.logging.format,
                VALID_FORMATS
            );
        }

        Ok(())
    }

    pub fn log_filter(&self) -> String {
        if self.logging.level.contains('=') || self.logging.level.contains(',') {
            self.logging.level.clone()
        } else {
            format!(
                "signup_tui={lvl},signup_client={lvl},signup_core={lvl},warn",
                lvl = self.logging.level
            )
        }
    }

    pub fn client_config(&self) -> ClientConfig {
        let mut headers = default_headers();
        if !self.api.skip_browser_warning {
            headers.remove(SKIP_BROWSER_WARNING);
        }
        let credentials = if self.api.include_credentials {
            CredentialPolicy::Include
        } else {
            CredentialPolicy::Omit
        };

        ClientConfig::builder()
            .base_url(self.api.base_url.clone())
            .base_path(self.api.base_path.clone())
            .default_headers(headers)
            .credentials(credentials)
            .maybe_timeout(self.api.timeout_seconds.map(Duration::from_secs))
            .endpoints(self.api.endpoints.clone())
            .build()
    }

    pub fn validation_rules(&self) -> ValidationRules {
        ValidationRules::builder()
            .forbidden_words(self.validation.forbidden_words.clone())
            .password_charset(self.validation.password_charset)
            .build()
    }

    pub fn local_storage(&self) -> Result<LocalStorage> {
        let path = match &self.storage.path {
            Some(path) => path.clone(),
            None => LocalStorage::default_path().context("Failed to resolve local storage path")?,
        };
        Ok(LocalStorage::open(path))
    }
}
