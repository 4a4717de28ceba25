use anyhow::Result;
use config::Config;
use serde::Deserialize;

use crate::constants::{
    CONFIG_FILE_NAME, DEFAULT_BOTH_REMINDERS, DEFAULT_SUM_NEGATIVE_MATCHES, ENV_PREFIX,
};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub logging: LoggingConfig,
    #[serde(default)]
    pub rules: RulesConfig,
    #[serde(default)]
    pub engine: EngineConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RulesConfig {
    /// Explicit rule document path; the per-user default is used when unset.
    pub path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub both_reminders_default: bool,
    pub sum_negative_matches: bool,
    /// IANA zone treated as local time instead of the system zone.
    pub local_timezone: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            both_reminders_default: DEFAULT_BOTH_REMINDERS,
            sum_negative_matches: DEFAULT_SUM_NEGATIVE_MATCHES,
            local_timezone: None,
        }
    }
}

impl Settings {
    /// ## Summary
    /// Loads configuration from defaults, `icsfilter.toml` and `ICSFILTER_*`
    /// environment variables (`ICSFILTER_ENGINE__LOCAL_TIMEZONE` and so on).
    /// Environment variables take precedence.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        Ok(Config::builder()
            .set_default("logging.level", "info")?
            .set_default("engine.both_reminders_default", DEFAULT_BOTH_REMINDERS)?
            .set_default("engine.sum_negative_matches", DEFAULT_SUM_NEGATIVE_MATCHES)?
            // TOML file
            .add_source(config::File::with_name(CONFIG_FILE_NAME).required(false))
            // Env
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Settings>()?)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            rules: RulesConfig::default(),
            engine: EngineConfig::default(),
        }
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    let settings = Settings::load()?;
    tracing::debug!(settings = ?settings, "Configuration loaded");
    Ok(settings)
}
