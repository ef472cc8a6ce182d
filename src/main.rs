use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

use nl_vidstats::config::{AppConfig, CliArgs};
use nl_vidstats::db::{build_pool, execute_scalar_async};
use nl_vidstats::llm::LlmManager;
use nl_vidstats::sql::SqlSafetyValidator;
use nl_vidstats::translator::Translator;
use nl_vidstats::util::logging::init_tracing;
use nl_vidstats::web::{self, state::AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Values in .env behave like real environment variables
    let _ = dotenvy::dotenv();

    // Initialize logging
    init_tracing();

    // Parse command line arguments
    let args = CliArgs::parse();

    // Load configuration
    let config = match AppConfig::new(&args) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    info!("Initializing LLM manager with backend: {}", config.llm.backend);
    let llm_manager = LlmManager::new(&config.llm)?;

    let validator = SqlSafetyValidator::for_dialect(&config.sql.dialect)
        .ok_or_else(|| format!("Unknown SQL dialect: {}", config.sql.dialect))?;
    let translator = Translator::new(llm_manager)
        .with_validator(validator)
        .with_timeout(Duration::from_secs(config.llm.timeout_secs));

    info!(
        "Opening DuckDB database read-only: {}",
        config.database.connection_string
    );
    let pool = build_pool(&config.database.connection_string, config.database.pool_size)?;

    if let Some(question) = &args.question {
        let sql = translator.text_to_sql(question).await?;
        let value = execute_scalar_async(pool, sql).await?;
        println!("{}", value);
        return Ok(());
    }

    let app_state = Arc::new(AppState::new(config.clone(), pool, translator));

    info!("Starting server on {}:{}", config.web.host, config.web.port);
    match web::run_server(config.web, app_state).await {
        Ok(_) => info!("Server stopped gracefully"),
        Err(e) => {
            error!("Server error: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
