use crate::{BrowserError, WebSvnBrowser};
use config::{Config, File, FileFormat};
use serde::Deserialize;
use std::env;
use std::str::FromStr;

const BASE_CONFIG: &str = include_str!("../configuration/base.yaml");
const LOCAL_CONFIG: &str = include_str!("../configuration/local.yaml");
const PRODUCTION_CONFIG: &str = include_str!("../configuration/production.yaml");

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub websvn2: BrowserSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApplicationSettings {
    pub log_level: String,
}

/// The persisted fields of the WebSVN browser, as a settings form would submit them.
#[derive(Debug, Deserialize, Clone)]
pub struct BrowserSettings {
    pub url: String,
}

impl BrowserSettings {
    pub fn browser(&self) -> Result<WebSvnBrowser, BrowserError> {
        WebSvnBrowser::new(self.url.as_str())
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    build_configuration(get_environment()?)
}

/// Reads `APP_ENVIRONMENT` after loading `.env`, defaulting to `local`.
pub fn get_environment() -> Result<Environment, config::ConfigError> {
    dotenvy::dotenv().ok();

    env::var("APP_ENVIRONMENT").map_or(Ok(Environment::Local), |name| name.parse())
}

pub fn build_configuration(environment: Environment) -> Result<Settings, config::ConfigError> {
    Config::builder()
        .add_source(File::from_str(BASE_CONFIG, FileFormat::Yaml))
        .add_source(File::from_str(environment.overlay(), FileFormat::Yaml))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?
        .try_deserialize::<Settings>()
}

/// Which embedded YAML overlay is layered on top of `base.yaml`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    const ALL: [Environment; 2] = [Environment::Local, Environment::Production];

    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }

    fn overlay(self) -> &'static str {
        match self {
            Environment::Local => LOCAL_CONFIG,
            Environment::Production => PRODUCTION_CONFIG,
        }
    }
}

impl FromStr for Environment {
    type Err = config::ConfigError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|environment| environment.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| {
                config::ConfigError::Message(format!(
                    "APP_ENVIRONMENT `{name}` is unknown, expected one of: {}",
                    Self::ALL.map(Environment::as_str).join(", ")
                ))
            })
    }
}
