//! Server configuration, loaded from environment variables.

use std::path::PathBuf;

use crate::error::ConfigError;

/// Default port the web server binds to.
const DEFAULT_PORT: u16 = 3000;

/// Default base URL of the external join/login backend.
const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port the HTTP server listens on.
    pub port: u16,
    /// Base URL of the external backend API, exposed to the front end via
    /// `GET /api/config`.
    pub api_base_url: String,
    /// Directory holding the static front end.
    pub public_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            public_dir: PathBuf::from("public"),
        }
    }
}

impl AppConfig {
    /// Load configuration from the environment, falling back to defaults.
    ///
    /// Reads `PORT`, `API_BASE_URL`, and `PUBLIC_DIR`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match std::env::var("PORT") {
            Ok(raw) => raw.parse::<u16>().map_err(|e| ConfigError::InvalidValue {
                key: "PORT".to_string(),
                message: e.to_string(),
            })?,
            Err(_) => DEFAULT_PORT,
        };

        let api_base_url = std::env::var("API_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());

        let public_dir = std::env::var("PUBLIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("public"));

        Ok(Self {
            port,
            api_base_url,
            public_dir,
        })
    }
}
