use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use crate::services::oracle::DEFAULT_MODEL;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub oracle: OracleSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OracleSettings {
    #[serde(default = "default_model")]
    pub model: String,
    pub api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl OracleSettings {
    /// Configured model, trimmed, or [`DEFAULT_MODEL`] when blank
    pub fn model_or_default(&self) -> String {
        let model = self.model.trim();
        if model.is_empty() {
            DEFAULT_MODEL.to_string()
        } else {
            model.to_string()
        }
    }
}

fn default_model() -> String { DEFAULT_MODEL.to_string() }
fn default_base_url() -> String { "https://api.openai.com/v1".to_string() }
fn default_request_timeout() -> u64 { 60 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    /// Caller-side limit on the oracle call
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from defaults, files and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Built-in defaults
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with IDENTITY__)
    /// 5. OPENAI_MODEL, OPENAI_API_KEY and OPENAI_BASE_URL
    pub fn load() -> Result<Self, ConfigError> {
        let settings = with_defaults(Config::builder())?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., IDENTITY__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("IDENTITY")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        substitute_env_vars(settings)?.try_deserialize()
    }
}

fn with_defaults(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
    builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8000_i64)?
        .set_default("oracle.model", DEFAULT_MODEL)?
        .set_default("oracle.base_url", default_base_url())?
        .set_default("oracle.request_timeout_secs", default_request_timeout() as i64)
}

/// Apply the conventional OpenAI environment variables on top of the loaded config
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    apply_openai_overrides(settings, |var| std::env::var(var).ok())
}

/// Override oracle keys from `lookup`. Values are trimmed; blank values are ignored.
fn apply_openai_overrides<F>(settings: Config, lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut builder = Config::builder().add_source(settings);

    let overrides = [
        ("OPENAI_MODEL", "oracle.model"),
        ("OPENAI_API_KEY", "oracle.api_key"),
        ("OPENAI_BASE_URL", "oracle.base_url"),
    ];

    for (var, key) in overrides {
        if let Some(value) = lookup(var).filter(|v| !v.trim().is_empty()) {
            builder = builder.set_override(key, value.trim().to_string())?;
        }
    }

    builder.build()
}
