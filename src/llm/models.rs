use crate::config::LlmConfig;
use serde::{Deserialize, Serialize};

/// Sampling options sent with every generation request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    pub temperature: f32,
    pub top_p: f32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: 0.1,
            top_p: 0.9,
        }
    }
}

impl From<&LlmConfig> for GenerationOptions {
    fn from(config: &LlmConfig) -> Self {
        Self {
            temperature: config.temperature,
            top_p: config.top_p,
        }
    }
}

// A question answered end to end
#[derive(Debug, Serialize, Deserialize)]
pub struct NlAnswer {
    pub question: String,
    pub sql: String,
    pub value: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
