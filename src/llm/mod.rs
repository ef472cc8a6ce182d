pub mod models;
pub mod prompt;
pub mod providers;

use crate::config::LlmConfig;
use async_trait::async_trait;
use models::GenerationOptions;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("LLM connection error: {0}")]
    ConnectionError(String),
    #[error("LLM response error: {0}")]
    ResponseError(String),
    #[error("LLM request timed out after {0:?}")]
    Timeout(Duration),
    #[error("LLM configuration error: {0}")]
    ConfigError(String),
}

impl LlmError {
    pub(crate) fn from_reqwest(e: reqwest::Error, timeout: Duration) -> Self {
        if e.is_timeout() {
            LlmError::Timeout(timeout)
        } else {
            LlmError::ConnectionError(e.to_string())
        }
    }
}

/// A text-generation endpoint: one prompt in, one raw completion out.
#[async_trait]
pub trait ModelEndpoint: Send + Sync {
    async fn complete(&self, prompt: &str, options: &GenerationOptions) -> Result<String, LlmError>;

    fn model_name(&self) -> &str;
}

/// Owns the configured endpoint for the lifetime of the process.
pub struct LlmManager {
    endpoint: Box<dyn ModelEndpoint>,
    options: GenerationOptions,
}

impl LlmManager {
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        let endpoint: Box<dyn ModelEndpoint> = match config.backend.as_str() {
            "remote" => Box::new(providers::remote::RemoteLlmProvider::new(config)?),
            "ollama" => Box::new(providers::ollama::OllamaProvider::new(config)?),
            _ => {
                return Err(LlmError::ConfigError(format!(
                    "Unsupported LLM backend: {}",
                    config.backend
                )))
            }
        };

        Ok(Self {
            endpoint,
            options: GenerationOptions::from(config),
        })
    }

    pub fn with_endpoint(endpoint: Box<dyn ModelEndpoint>, options: GenerationOptions) -> Self {
        Self { endpoint, options }
    }

    pub fn model_name(&self) -> &str {
        self.endpoint.model_name()
    }

    pub async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        self.endpoint.complete(prompt, &self.options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[test]
    fn test_manager_picks_backend() {
        let mut config = AppConfig::default().llm;
        let manager = LlmManager::new(&config).unwrap();
        assert_eq!(manager.model_name(), "sqlcoder:latest");

        config.backend = "remote".to_string();
        config.api_url = Some("http://localhost:8000/v1/chat/completions".to_string());
        config.model = "gpt-4o-mini".to_string();
        assert_eq!(LlmManager::new(&config).unwrap().model_name(), "gpt-4o-mini");

        config.backend = "local".to_string();
        assert!(matches!(LlmManager::new(&config), Err(LlmError::ConfigError(_))));
    }
}
