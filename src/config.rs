//! Application configuration loaded from environment variables.

use std::path::PathBuf;

use serde::Deserialize;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Dataset ===
    /// Path to the SQLite database file holding the climate dataset.
    #[serde(default = "default_db_path")]
    pub climate_db_path: PathBuf,

    // === Server Configuration ===
    /// HTTP server port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Enable verbose logging.
    #[serde(default)]
    pub verbose: bool,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("hawaii.sqlite")
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if !self.climate_db_path.is_file() {
            return Err(format!(
                "CLIMATE_DB_PATH does not point to a file: {}",
                self.climate_db_path.display()
            ));
        }

        if self.port == 0 {
            return Err("PORT must be non-zero".to_string());
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            climate_db_path: default_db_path(),
            port: default_port(),
            rust_log: default_log_level(),
            verbose: false,
        }
    }
}
