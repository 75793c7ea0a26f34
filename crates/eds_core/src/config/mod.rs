//! Client configuration.
//!
//! Layers, later wins: built-in defaults, `eds.toml` (or an explicit path), then
//! `EDS_*` environment variables with `__` separating nested keys:
//!
//! ```toml
//! base_url = "http://127.0.0.1:8000"
//!
//! [upload]
//! max_file_bytes = 10485760
//!
//! [index]
//! outcome_ttl_ms = 3000
//!
//! [logging]
//! default = "warn"
//!
//! [logging.modules]
//! eds_client = "debug"
//! ```
//!
//! `EDS_RESULTS__REFERENCE_PREVIEW_LIMIT=10` overrides `results.reference_preview_limit`.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::aggregate::DEFAULT_REFERENCE_PREVIEW;
use crate::error::AppError;
use crate::validate::UploadPolicy;

pub const CONFIG_FILE: &str = "eds.toml";
pub const ENV_PREFIX: &str = "EDS_";
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_OUTCOME_TTL_MS: u64 = 3_000;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct IndexSettings {
    pub outcome_ttl_ms: u64,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            outcome_ttl_ms: DEFAULT_OUTCOME_TTL_MS,
        }
    }
}

impl IndexSettings {
    pub fn outcome_ttl(&self) -> Duration {
        Duration::from_millis(self.outcome_ttl_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ResultSettings {
    pub reference_preview_limit: usize,
}

impl Default for ResultSettings {
    fn default() -> Self {
        Self {
            reference_preview_limit: DEFAULT_REFERENCE_PREVIEW,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    pub default: String,
    pub modules: BTreeMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default: "warn".to_string(),
            modules: BTreeMap::new(),
        }
    }
}

impl LoggingConfig {
    /// `EnvFilter` directive string, e.g. `warn,eds_client=debug`.
    pub fn directives(&self) -> String {
        let mut s = self.default.clone();
        for (module, level) in &self.modules {
            s.push_str(&format!(",{module}={level}"));
        }
        s
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    /// Unset means requests wait until the backend answers.
    pub request_timeout_secs: Option<u64>,
    pub upload: UploadPolicy,
    pub index: IndexSettings,
    pub results: ResultSettings,
    pub logging: LoggingConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: None,
            upload: UploadPolicy::default(),
            index: IndexSettings::default(),
            results: ResultSettings::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ClientConfig {
    pub fn figment(path: Option<&Path>) -> Figment {
        let file = path.unwrap_or_else(|| Path::new(CONFIG_FILE));
        Figment::from(Serialized::defaults(ClientConfig::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        if let Some(p) = path {
            if !p.is_file() {
                return Err(AppError::new("CONFIG_INVALID", "Config file not found")
                    .with_details(format!("path={}", p.display())));
            }
        }
        let cfg: Self = Self::figment(path).extract().map_err(|e| {
            AppError::new("CONFIG_INVALID", "Failed to load configuration")
                .with_details(e.to_string())
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        let url = self.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(AppError::new("CONFIG_INVALID", "base_url must be an http(s) URL")
                .with_details(format!("base_url={url}")));
        }
        if self.upload.allowed_extensions.is_empty() {
            return Err(AppError::new(
                "CONFIG_INVALID",
                "upload.allowed_extensions must not be empty",
            ));
        }
        if self.upload.max_file_bytes == 0 {
            return Err(AppError::new(
                "CONFIG_INVALID",
                "upload.max_file_bytes must be greater than zero",
            ));
        }
        if self.results.reference_preview_limit == 0 {
            return Err(AppError::new(
                "CONFIG_INVALID",
                "results.reference_preview_limit must be greater than zero",
            ));
        }
        if self.request_timeout_secs == Some(0) {
            return Err(AppError::new(
                "CONFIG_INVALID",
                "request_timeout_secs must be greater than zero when set",
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
