use config::{Config, ConfigError, Environment, File};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::core::matcher::DEFAULT_MAX_RESULTS;
use crate::core::scoring::FactorPoints;
use crate::models::MAX_POOL_SIZE;
use crate::services::matchmaker::DEFAULT_MAX_PROMPT_CANDIDATES;
use crate::services::text_generation::{
    Provider, ProviderConfig, GEMINI_DEFAULT_ENDPOINT, GEMINI_DEFAULT_MODEL, GROQ_DEFAULT_ENDPOINT,
    GROQ_DEFAULT_MODEL,
};

const ENV_PREFIX: &str = "PITCHMATCH";

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub ai: AiSettings,
    pub matching: MatchingSettings,
    pub cache: CacheSettings,
    pub scoring: ScoringSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            workers: None,
        }
    }
}

/// Text-generation provider settings.
///
/// With no API key the service runs heuristic-only.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AiSettings {
    pub provider: Provider,
    pub api_key: Option<Secret<String>>,
    pub endpoint: Option<String>,
    pub model: Option<String>,
    pub timeout_secs: u64,
    pub structured_output: bool,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            provider: Provider::Groq,
            api_key: None,
            endpoint: None,
            model: None,
            timeout_secs: 60,
            structured_output: false,
        }
    }
}

impl AiSettings {
    /// Connection settings for the configured provider, or `None` without a usable key
    pub fn provider_config(&self) -> Option<ProviderConfig> {
        let api_key = self
            .api_key
            .as_ref()
            .map(|key| key.expose_secret().trim())
            .filter(|key| !key.is_empty())?;

        let (default_endpoint, default_model) = match self.provider {
            Provider::Groq => (GROQ_DEFAULT_ENDPOINT, GROQ_DEFAULT_MODEL),
            Provider::Gemini => (GEMINI_DEFAULT_ENDPOINT, GEMINI_DEFAULT_MODEL),
        };

        let config = ProviderConfig::new(
            api_key,
            self.endpoint.as_deref().unwrap_or(default_endpoint),
            self.model.as_deref().unwrap_or(default_model),
        )
        .with_timeout(Duration::from_secs(self.timeout_secs))
        .with_structured_output(self.structured_output);

        Some(config)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MatchingSettings {
    pub max_results: usize,
    pub max_prompt_candidates: usize,
    pub max_pool_size: usize,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_MAX_RESULTS,
            max_prompt_candidates: DEFAULT_MAX_PROMPT_CANDIDATES,
            max_pool_size: MAX_POOL_SIZE,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub enabled: bool,
    pub ttl_secs: u64,
    pub max_entries: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: 3600,
            max_entries: 1000,
        }
    }
}

/// Points per heuristic factor
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScoringSettings {
    pub industry: u32,
    pub stage: u32,
    pub geography: u32,
    pub ticket_size: u32,
    pub experience: u32,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        let points = FactorPoints::default();
        Self {
            industry: points.industry,
            stage: points.stage,
            geography: points.geography,
            ticket_size: points.ticket_size,
            experience: points.experience,
        }
    }
}

impl ScoringSettings {
    pub fn points(&self) -> FactorPoints {
        FactorPoints {
            industry: self.industry,
            stage: self.stage,
            geography: self.geography,
            ticket_size: self.ticket_size,
            experience: self.experience,
        }
    }
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
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration files (config/default.toml, then config/local.toml)
    /// 3. Environment variables (prefixed with PITCHMATCH__)
    /// 4. Provider keys from GROQ_API_KEY / GOOGLE_AI_API_KEY when none is set
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., PITCHMATCH__AI__PROVIDER -> ai.provider
            .add_source(environment())
            .build()?;

        let settings: Settings = substitute_env_vars(settings)?.try_deserialize()?;
        Ok(settings.normalized())
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?;

        let settings: Settings = substitute_env_vars(settings)?.try_deserialize()?;
        Ok(settings.normalized())
    }

    /// Clamp values the matching pipeline cannot honour
    fn normalized(mut self) -> Self {
        let max_results = self.matching.max_results.clamp(1, DEFAULT_MAX_RESULTS);
        if max_results != self.matching.max_results {
            tracing::warn!(
                "matching.max_results = {} is outside 1..={}, using {}",
                self.matching.max_results,
                DEFAULT_MAX_RESULTS,
                max_results
            );
            self.matching.max_results = max_results;
        }
        self
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Conventional environment variable holding the key for a provider
fn provider_key_var(provider: &str) -> &'static str {
    if provider.eq_ignore_ascii_case("gemini") {
        "GOOGLE_AI_API_KEY"
    } else {
        "GROQ_API_KEY"
    }
}

/// Fill `ai.api_key` from the provider's conventional variable if it is unset
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    let has_key = settings
        .get_string("ai.api_key")
        .map(|key| !key.trim().is_empty())
        .unwrap_or(false);

    if has_key {
        return Ok(settings);
    }

    let provider = settings
        .get_string("ai.provider")
        .unwrap_or_else(|_| "groq".to_string());

    match std::env::var(provider_key_var(&provider)) {
        Ok(key) if !key.trim().is_empty() => Config::builder()
            .add_source(settings)
            .set_override("ai.api_key", key)?
            .build(),
        _ => Ok(settings),
    }
}
