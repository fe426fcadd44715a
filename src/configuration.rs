use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, ConfigError, Environment as ConfigEnvironment, File};
use secrecy::Secret;
use serde_aux::field_attributes::deserialize_number_from_string;
use tracing::{error, info};

#[derive(serde::Deserialize, Clone, Debug)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub github: GitHubSettings,
    pub devin: DevinSettings,
    pub cache: CacheSettings,
    pub http: HttpSettings,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct ApplicationSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct GitHubSettings {
    pub api_base: String,
    pub web_base: String,
    /// Fallback token for requests that don't carry one.
    #[serde(default)]
    pub token: Option<Secret<String>>,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct DevinSettings {
    pub api_base: String,
    pub app_base: String,
    #[serde(default)]
    pub api_key: Option<Secret<String>>,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct CacheSettings {
    pub path: PathBuf,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct HttpSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_secs: u64,
}

impl HttpSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            application: ApplicationSettings {
                port: 8000,
                host: "0.0.0.0".to_string(),
            },
            github: GitHubSettings {
                api_base: "https://api.github.com".to_string(),
                web_base: "https://github.com".to_string(),
                token: None,
            },
            devin: DevinSettings {
                api_base: "https://api.devin.ai/v1".to_string(),
                app_base: "https://app.devin.ai".to_string(),
                api_key: None,
            },
            cache: CacheSettings {
                path: PathBuf::from("confidence_scores.json"),
            },
            http: HttpSettings { timeout_secs: 30 },
        }
    }
}

pub fn get_configuration() -> Result<Settings, ConfigError> {
    let base_path = std::env::current_dir()
        .map_err(|e| ConfigError::Message(format!("Failed to determine current directory: {}", e)))?
        .join("configuration");

    get_configuration_from(&base_path)
}

pub fn get_configuration_from(base_path: &Path) -> Result<Settings, ConfigError> {
    let environment: AppEnvironment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(ConfigError::Message)?;

    let environment_filename = format!("{}.yaml", environment.as_str());
    info!(
        "Loading configuration for {} from {}",
        environment.as_str(),
        base_path.display()
    );

    let defaults = Settings::default();
    let settings = Config::builder()
        .set_default("application.port", i64::from(defaults.application.port))?
        .set_default("application.host", defaults.application.host)?
        .set_default("github.api_base", defaults.github.api_base)?
        .set_default("github.web_base", defaults.github.web_base)?
        .set_default("devin.api_base", defaults.devin.api_base)?
        .set_default("devin.app_base", defaults.devin.app_base)?
        .set_default(
            "cache.path",
            defaults.cache.path.to_string_lossy().into_owned(),
        )?
        .set_default("http.timeout_secs", defaults.http.timeout_secs as i64)?
        .add_source(File::from(base_path.join("base.yaml")).required(false))
        .add_source(File::from(base_path.join(&environment_filename)).required(false))
        .add_source(
            ConfigEnvironment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .set_override_option("application.port", std::env::var("PORT").ok())?
        .set_override_option("github.token", std::env::var("GITHUB_TOKEN").ok())?
        .set_override_option("devin.api_key", std::env::var("DEVIN_API_KEY").ok())?
        .build()?;

    let settings = settings.try_deserialize::<Settings>()?;

    info!("Application: {}:{}", settings.application.host, settings.application.port);
    info!("GitHub API: {}", settings.github.api_base);
    info!("Devin API: {}", settings.devin.api_base);
    info!("Confidence cache: {}", settings.cache.path.display());

    Ok(settings)
}

pub enum AppEnvironment {
    Local,
    Production,
}

impl AppEnvironment {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppEnvironment::Local => "local",
            AppEnvironment::Production => "production",
        }
    }
}

impl TryFrom<String> for AppEnvironment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => {
                error!("Invalid environment: {}", other);
                Err(format!(
                    "{} is not a supported environment. Use either `local` or `production`.",
                    other
                ))
            }
        }
    }
}
