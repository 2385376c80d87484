//! Assistant configuration loaded from an optional TOML file plus `FCAI_*`
//! environment overrides. The only credential is the Gemini API key.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default Gemini model used for report generation, chat, and NTC mapping.
pub const DEFAULT_MODEL: &str = "gemini-3-pro-preview";

/// Core configuration shared by the library and the gateway.
///
/// | Env | Default | Description |
/// |-----|---------|-------------|
/// | FCAI_APP_NAME | Super FC AI | Application identity. |
/// | FCAI_PORT | 8787 | HTTP port for the gateway. |
/// | FCAI_STORAGE_PATH | ./data/firecode_store | Sled database directory. |
/// | FCAI_MODEL | gemini-3-pro-preview | Gemini model identifier. |
/// | FCAI_API_KEY / GEMINI_API_KEY | (unset) | API credential; unset means every generation fails fast. |
/// | FCAI_REQUEST_TIMEOUT_SECS | 60 | HTTP client timeout for model calls. |
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Application identity shown in logs and the health endpoint.
    pub app_name: String,
    /// HTTP port for the gateway.
    pub port: u16,
    /// Base directory for the Sled store.
    pub storage_path: String,
    /// Gemini model identifier.
    pub model: String,
    /// Explicit API key; usually left unset in favor of `GEMINI_API_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Timeout for a single model call, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            app_name: "Super FC AI".to_string(),
            port: 8787,
            storage_path: "./data/firecode_store".to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            request_timeout_secs: 60,
        }
    }
}

impl CoreConfig {
    /// Loads configuration: defaults, then the TOML file named by `FCAI_CONFIG`
    /// (if it exists), then `FCAI_*` environment overrides.
    pub fn load() -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .set_default("app_name", "Super FC AI")?
            .set_default("port", 8787i64)?
            .set_default("storage_path", "./data/firecode_store")?
            .set_default("model", DEFAULT_MODEL)?
            .set_default("request_timeout_secs", 60i64)?;

        if let Ok(path) = std::env::var("FCAI_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                builder = builder.add_source(config::File::from(path));
            }
        }

        builder
            .add_source(config::Environment::with_prefix("FCAI").separator("__"))
            .build()?
            .try_deserialize()
    }

    /// Resolved API key. Priority: explicit config value > `GEMINI_API_KEY` env.
    /// Blank values count as unset.
    pub fn api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
    }
}
