use std::time::Duration;

use config::{Config, ConfigError, File};
use serde::Deserialize;

use super::Environment;

const ENV_PREFIX: &str = "APP";
const ENV_SEPARATOR: &str = "__";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub inference: InferenceSettings,
    pub relay: RelaySettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InferenceProvider {
    Ollama,
    Echo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InferenceSettings {
    pub provider: InferenceProvider,
    pub base_url: String,
    pub default_model: String,
    pub connect_timeout_seconds: u64,
    pub echo_delay_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RelaySettings {
    pub rate_limit_window_ms: u64,
    pub sse_keep_alive_seconds: u64,
}

impl RelaySettings {
    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_millis(self.rate_limit_window_ms)
    }

    pub fn sse_keep_alive(&self) -> Duration {
        Duration::from_secs(self.sse_keep_alive_seconds)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    pub enable_json: bool,
}

impl Settings {
    /// Layers built-in defaults, the optional `appsettings.{env}` file and
    /// `APP__SECTION__KEY` environment variables, in that order.
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        Self::builder(environment)?
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR),
            )
            .build()?
            .try_deserialize()
    }

    /// Defaults plus the environment file, without reading process variables.
    pub fn load_without_env(environment: Environment) -> Result<Self, ConfigError> {
        Self::builder(environment)?.build()?.try_deserialize()
    }

    fn builder(
        environment: Environment,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Ok(Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("inference.provider", "ollama")?
            .set_default("inference.base_url", "http://localhost:11434")?
            .set_default("inference.default_model", "mistral")?
            .set_default("inference.connect_timeout_seconds", 10)?
            .set_default("inference.echo_delay_ms", 0)?
            .set_default("relay.rate_limit_window_ms", 1000)?
            .set_default("relay.sse_keep_alive_seconds", 15)?
            .set_default("logging.level", "info,chat_relay=debug,tower_http=debug")?
            .set_default("logging.enable_json", false)?
            .add_source(
                File::with_name(&format!("appsettings.{}", environment.as_str())).required(false),
            ))
    }
}
