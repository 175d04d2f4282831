use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(anyhow!("Unknown environment: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub environment: Environment,
    /// `None` allows any origin
    pub cors_origin: Option<String>,
    /// Built client to serve in production
    pub web_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            port: 5000,
            environment: Environment::Development,
            cors_origin: None,
            web_dir: None,
        }
    }
}

impl ServerConfig {
    /// Read `SNAKE_*` variables from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub fn from_vars(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = ServerConfig::default();

        let port = match get("SNAKE_PORT") {
            Some(port) => port
                .parse()
                .with_context(|| format!("SNAKE_PORT must be a port number, got {:?}", port))?,
            None => defaults.port,
        };

        let environment = match get("SNAKE_ENV") {
            Some(env) => env.parse().context("Invalid SNAKE_ENV")?,
            None => defaults.environment,
        };

        let cors_origin = get("SNAKE_CORS_ORIGIN").filter(|origin| origin != "*" && !origin.is_empty());
        let web_dir = get("SNAKE_WEB_DIR").map(PathBuf::from);

        Ok(ServerConfig {
            port,
            environment,
            cors_origin,
            web_dir,
        })
    }

    pub fn addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }

    /// Static files are only served by production deployments.
    pub fn static_dir(&self) -> Option<&PathBuf> {
        match self.environment {
            Environment::Production => self.web_dir.as_ref(),
            Environment::Development => None,
        }
    }
}
