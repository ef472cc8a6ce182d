use clap::Parser;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub connection_string: String,
    pub pool_size: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct WebConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LlmConfig {
    pub backend: String, // "ollama" or "remote"
    pub model: String,   // Model name
    pub api_key: Option<String>,
    pub api_url: Option<String>,
    pub temperature: f32,
    pub top_p: f32,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SqlConfig {
    /// Parser dialect used to validate generated SQL.
    pub dialect: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub web: WebConfig,
    pub llm: LlmConfig,
    pub sql: SqlConfig,
}

#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Host to bind to
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to
    #[arg(short, long)]
    pub port: Option<u16>,

    /// DuckDB database file holding the videos tables
    #[arg(long)]
    pub database: Option<String>,

    /// Answer a single question and exit instead of serving HTTP
    #[arg(short, long)]
    pub question: Option<String>,
}

pub const ENV_PREFIX: &str = "NL_VIDSTATS";

impl AppConfig {
    pub fn new(args: &CliArgs) -> Result<Self, ConfigError> {
        // Start with default configuration
        let mut config_builder = Config::builder().add_source(Config::try_from(&AppConfig::default())?);

        // Add configuration from file if specified
        if let Some(config_path) = &args.config {
            config_builder = config_builder.add_source(File::from(config_path.as_path()));
        } else {
            // Check for config in default locations
            let default_locations = [
                "config.toml",
                "config/config.toml",
                "/etc/nl-vidstats/config.toml",
            ];

            for location in default_locations {
                if Path::new(location).exists() {
                    config_builder =
                        config_builder.add_source(File::new(location, config::FileFormat::Toml));
                    break;
                }
            }
        }

        // NL_VIDSTATS__LLM__MODEL=... style overrides
        config_builder = config_builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__"),
        );

        let mut config: AppConfig = config_builder.build()?.try_deserialize()?;

        // Override with command line args if provided
        if let Some(host) = &args.host {
            config.web.host = host.clone();
        }
        if let Some(port) = args.port {
            config.web.port = port;
        }
        if let Some(database) = &args.database {
            config.database.connection_string = database.clone();
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let llm = &self.llm;
        if llm.model.trim().is_empty() {
            return Err(ConfigError::Message("llm.model is required".to_string()));
        }
        if !matches!(llm.backend.as_str(), "ollama" | "remote") {
            return Err(ConfigError::Message(format!(
                "Unsupported LLM backend: {}",
                llm.backend
            )));
        }
        if !(0.0..=1.0).contains(&llm.temperature) {
            return Err(ConfigError::Message(format!(
                "llm.temperature must be within 0.0..=1.0, got {}",
                llm.temperature
            )));
        }
        if !(llm.top_p > 0.0 && llm.top_p <= 1.0) {
            return Err(ConfigError::Message(format!(
                "llm.top_p must be within (0.0, 1.0], got {}",
                llm.top_p
            )));
        }
        if llm.timeout_secs == 0 {
            return Err(ConfigError::Message(
                "llm.timeout_secs must be positive".to_string(),
            ));
        }
        if sqlparser::dialect::dialect_from_str(&self.sql.dialect).is_none() {
            return Err(ConfigError::Message(format!(
                "Unknown SQL dialect: {}",
                self.sql.dialect
            )));
        }
        Ok(())
    }
}

// Default implementation
impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                connection_string: "video_analytics.duckdb".to_string(),
                pool_size: 5,
            },
            web: WebConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
            },
            llm: LlmConfig {
                backend: "ollama".to_string(),
                model: "sqlcoder:latest".to_string(),
                api_key: None,
                api_url: None,
                temperature: 0.1,
                top_p: 0.9,
                timeout_secs: 60,
            },
            sql: SqlConfig {
                dialect: "postgres".to_string(),
            },
        }
    }
}
