use std::path::PathBuf;

use config::{Config, ConfigError, File, Map};
use serde::Deserialize;

use crate::application::services::ModelSelection;
use crate::infrastructure::http::BROWSER_USER_AGENT;
use crate::infrastructure::llm::GEMINI_DEFAULT_BASE_URL;

use super::Environment;

const ENV_PREFIX: &str = "APP";
const ENV_SEPARATOR: &str = "__";
const API_KEY_VAR: &str = "GEMINI_API_KEY";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub gemini: GeminiSettings,
    pub download: DownloadSettings,
    pub rendering: RenderingSettings,
    pub logging: LoggingSettings,
    #[serde(default)]
    pub scratch_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiSettings {
    #[serde(default)]
    pub api_key: String,
    pub base_url: String,
    pub timeout_secs: u64,
    pub max_attempts: usize,
    #[serde(default)]
    pub selection: ModelSelection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DownloadSettings {
    pub user_agent: String,
    pub timeout_secs: u64,
    pub max_download_bytes: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderingSettings {
    pub pdf_dpi: f32,
    pub max_dimension: u32,
    pub jpeg_quality: u8,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub json: bool,
    /// `EnvFilter` directives; `RUST_LOG` still wins when set.
    #[serde(default)]
    pub filter: Option<String>,
}

impl Settings {
    /// Defaults, then `appsettings.{Environment}`, then `APP__...` variables,
    /// then `GEMINI_API_KEY`.
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        Self::load_with_vars(environment, None)
    }

    /// Same as `load`, reading variables from `vars` instead of the process
    /// environment when given.
    pub fn load_with_vars(
        environment: Environment,
        vars: Option<Map<String, String>>,
    ) -> Result<Self, ConfigError> {
        Self::builder(environment, vars)?.build()?.try_deserialize()
    }

    fn builder(
        environment: Environment,
        vars: Option<Map<String, String>>,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        let api_key = match &vars {
            Some(vars) => vars.get(API_KEY_VAR).cloned(),
            None => std::env::var(API_KEY_VAR).ok(),
        };

        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("gemini.base_url", GEMINI_DEFAULT_BASE_URL)?
            .set_default("gemini.timeout_secs", 120)?
            .set_default("gemini.max_attempts", 4)?
            .set_default("download.user_agent", BROWSER_USER_AGENT)?
            .set_default("download.timeout_secs", 30)?
            .set_default("download.max_download_bytes", 25 * 1024 * 1024)?
            .set_default("rendering.pdf_dpi", 150.0)?
            .set_default("rendering.max_dimension", 2048)?
            .set_default("rendering.jpeg_quality", 85)?
            .set_default("rendering.timeout_secs", 60)?
            .set_default("logging.json", environment == Environment::Prod)?
            .add_source(
                File::with_name(&format!("appsettings.{}", environment.as_str())).required(false),
            )
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("gemini.selection.models")
                    .with_list_parse_key("gemini.selection.preferences")
                    .with_list_parse_key("gemini.selection.fallback_models")
                    .source(vars),
            )
            .set_override_option("gemini.api_key", api_key)
    }
}
